pub mod error;
pub mod fvm;
pub mod geometry;
pub mod ibm;
pub mod math;
pub mod operations;
pub mod parallel;

pub use error::{IbmError, Result};
