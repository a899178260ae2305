//! Collective communication between grid partitions.

use std::any::Any;
use std::sync::{Arc, Barrier};

use parking_lot::Mutex;

/// Collective operations every partition of a distributed solve takes part in.
pub trait Communicator {
    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    /// Concatenates `local` from every rank, in rank order.
    ///
    /// Blocking: each rank of the group must call it the same number of
    /// times with the same `T`.
    fn all_gather_v<T: Clone + Send + 'static>(&self, local: Vec<T>) -> Vec<T>;

    #[must_use]
    fn is_main_rank(&self) -> bool {
        self.rank() == 0
    }
}

/// Single-process communicator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialComm;

impl Communicator for SerialComm {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn all_gather_v<T: Clone + Send + 'static>(&self, local: Vec<T>) -> Vec<T> {
        local
    }
}

type Slot = Option<Box<dyn Any + Send>>;

struct LocalGroup {
    size: usize,
    barrier: Barrier,
    slots: Mutex<Vec<Slot>>,
}

/// In-process communicator: one thread per rank sharing a slot table.
#[derive(Clone)]
pub struct ThreadComm {
    rank: usize,
    group: Arc<LocalGroup>,
}

impl ThreadComm {
    /// Creates the handles of a group of `size` ranks. Handle `i` has rank
    /// `i` and must be moved to its own thread.
    #[must_use]
    pub fn group(size: usize) -> Vec<ThreadComm> {
        let size = size.max(1);
        let group = Arc::new(LocalGroup {
            size,
            barrier: Barrier::new(size),
            slots: Mutex::new((0..size).map(|_| None).collect()),
        });
        (0..size)
            .map(|rank| ThreadComm {
                rank,
                group: Arc::clone(&group),
            })
            .collect()
    }
}

impl std::fmt::Debug for ThreadComm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadComm")
            .field("rank", &self.rank)
            .field("size", &self.group.size)
            .finish()
    }
}

impl Communicator for ThreadComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.group.size
    }

    fn all_gather_v<T: Clone + Send + 'static>(&self, local: Vec<T>) -> Vec<T> {
        let group = &self.group;
        group.slots.lock()[self.rank] = Some(Box::new(local));
        group.barrier.wait();

        let gathered: Vec<T> = {
            let slots = group.slots.lock();
            slots
                .iter()
                .filter_map(|slot| {
                    let boxed = slot.as_ref()?;
                    (**boxed).downcast_ref::<Vec<T>>()
                })
                .flat_map(|part| part.iter().cloned())
                .collect()
        };

        // Every rank has read before any slot is reused.
        group.barrier.wait();
        group.slots.lock()[self.rank] = None;
        gathered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_gather_is_identity() {
        let comm = SerialComm;
        assert_eq!(comm.all_gather_v(vec![1, 2, 3]), vec![1, 2, 3]);
        assert_eq!(comm.size(), 1);
        assert!(comm.is_main_rank());
    }

    #[test]
    fn thread_gather_concatenates_in_rank_order() {
        let comms = ThreadComm::group(3);
        let results: Vec<Vec<usize>> = std::thread::scope(|s| {
            let handles: Vec<_> = comms
                .into_iter()
                .map(|comm| {
                    s.spawn(move || {
                        let rank = comm.rank();
                        comm.all_gather_v(vec![rank; rank + 1])
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_default())
                .collect()
        });
        for gathered in results {
            assert_eq!(gathered, vec![0, 1, 1, 2, 2, 2]);
        }
    }

    #[test]
    fn consecutive_gathers_of_different_types() {
        let comms = ThreadComm::group(2);
        let results: Vec<(Vec<f64>, Vec<String>)> = std::thread::scope(|s| {
            let handles: Vec<_> = comms
                .into_iter()
                .map(|comm| {
                    s.spawn(move || {
                        #[allow(clippy::cast_precision_loss)]
                        let a = comm.all_gather_v(vec![comm.rank() as f64]);
                        let b = comm.all_gather_v(vec![format!("r{}", comm.rank())]);
                        (a, b)
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_default())
                .collect()
        });
        for (a, b) in results {
            assert_eq!(a, vec![0.0, 1.0]);
            assert_eq!(b, vec!["r0".to_string(), "r1".to_string()]);
        }
    }
}
