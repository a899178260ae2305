use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GeometryError, Result};
use crate::fvm::Grid;
use crate::geometry::{Circle, Polygon, DEFAULT_CIRCLE_SEGMENTS};
use crate::math::Point2;

use super::boundary::BoundaryCondition;
use super::object::{ImmersedBoundaryObject, Motion};

/// Contour of an immersed body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeConfig {
    Circle {
        center: Point2,
        radius: f64,
        #[serde(default = "default_segments")]
        segments: usize,
    },
    Polygon {
        vertices: Vec<Point2>,
    },
}

fn default_segments() -> usize {
    DEFAULT_CIRCLE_SEGMENTS
}

impl ShapeConfig {
    /// Builds the polygon described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the vertices do not form a
    /// valid simple polygon.
    pub fn to_polygon(&self) -> Result<Polygon> {
        let pgn = match self {
            Self::Circle {
                center,
                radius,
                segments,
            } => Circle::new(*center, *radius).polygonize_with(*segments),
            Self::Polygon { vertices } => Polygon::new(vertices),
        };
        if !pgn.is_valid() {
            return Err(GeometryError::Degenerate("immersed body contour".to_string()).into());
        }
        Ok(pgn)
    }
}

/// Description of one immersed body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImmersedBoundaryConfig {
    pub name: String,
    pub density: f64,
    pub viscosity: f64,
    pub shape: ShapeConfig,
    #[serde(default)]
    pub motion: Option<Motion>,
    /// Boundary conditions keyed by field name.
    #[serde(default)]
    pub boundaries: BTreeMap<String, BoundaryCondition>,
}

impl ImmersedBoundaryConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(invalid("name", "must not be empty"));
        }
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(invalid("density", format!("must be positive, got {}", self.density)));
        }
        if !(self.viscosity.is_finite() && self.viscosity > 0.0) {
            return Err(invalid(
                "viscosity",
                format!("must be positive, got {}", self.viscosity),
            ));
        }
        match &self.shape {
            ShapeConfig::Circle {
                radius, segments, ..
            } => {
                if !(radius.is_finite() && *radius > 0.0) {
                    return Err(invalid("shape.radius", format!("must be positive, got {radius}")));
                }
                if *segments < 3 {
                    return Err(invalid(
                        "shape.segments",
                        format!("need at least 3, got {segments}"),
                    ));
                }
            }
            ShapeConfig::Polygon { vertices } => {
                if vertices.len() < 3 {
                    return Err(invalid(
                        "shape.vertices",
                        format!("need at least 3, got {}", vertices.len()),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn invalid(key: &'static str, reason: impl Into<String>) -> crate::error::IbmError {
    ConfigError::InvalidValue {
        key,
        reason: reason.into(),
    }
    .into()
}

impl<'g, G: Grid> ImmersedBoundaryObject<'g, G> {
    /// Builds a body on `grid` from its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or its contour is
    /// degenerate.
    pub fn from_config(config: &ImmersedBoundaryConfig, grid: &'g G) -> Result<Self> {
        config.validate()?;
        let shape = config.shape.to_polygon()?;
        let mut obj = Self::new(
            config.name.clone(),
            grid,
            shape,
            config.density,
            config.viscosity,
        );
        if let Some(motion) = config.motion {
            obj.set_motion(motion);
        }
        for (field, bc) in &config.boundaries {
            obj.set_boundary(field.clone(), *bc);
        }
        Ok(obj)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::IbmError;
    use crate::fvm::CartesianGrid;
    use crate::ibm::{BoundaryKind, RefValue};
    use crate::math::Vector2;

    const CYLINDER: &str = r#"{
        "name": "cylinder",
        "density": 2.0,
        "viscosity": 0.01,
        "shape": { "type": "circle", "center": [0.1, -0.2], "radius": 0.5 },
        "motion": { "velocity": [1.0, 0.0], "angular_velocity": 0.25 },
        "boundaries": {
            "p": { "kind": "fixed", "value": 0.0 },
            "u": { "kind": "fixed", "value": [0.0, 0.0] },
            "gamma": { "kind": "normal_gradient" }
        }
    }"#;

    #[test]
    fn parses_cylinder() {
        let config: ImmersedBoundaryConfig = serde_json::from_str(CYLINDER).unwrap();
        config.validate().unwrap();
        assert_eq!(config.name, "cylinder");
        assert_eq!(
            config.shape,
            ShapeConfig::Circle {
                center: Point2::new(0.1, -0.2),
                radius: 0.5,
                segments: DEFAULT_CIRCLE_SEGMENTS,
            }
        );
        assert_eq!(config.boundaries["u"].value, RefValue::Vector(Vector2::zeros()));
        assert_eq!(config.boundaries["gamma"].kind, BoundaryKind::NormalGradient);
    }

    #[test]
    fn builds_object() {
        let config: ImmersedBoundaryConfig = serde_json::from_str(CYLINDER).unwrap();
        let grid = CartesianGrid::new(10, 10, 0.2, Point2::new(-1.0, -1.0)).unwrap();
        let obj = ImmersedBoundaryObject::from_config(&config, &grid).unwrap();
        assert_eq!(obj.name(), "cylinder");
        assert_relative_eq!(obj.rho(), 2.0);
        assert_relative_eq!(obj.shape().centroid().x, 0.1, epsilon = 1e-12);
        assert_relative_eq!(obj.motion().angular_velocity, 0.25);
        assert_eq!(obj.boundaries().count(), 3);
    }

    #[test]
    fn polygon_shape_without_optional_fields() {
        let json = r#"{
            "name": "wedge",
            "density": 1.0,
            "viscosity": 1.0,
            "shape": { "type": "polygon", "vertices": [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]] }
        }"#;
        let config: ImmersedBoundaryConfig = serde_json::from_str(json).unwrap();
        assert!(config.motion.is_none());
        assert!(config.boundaries.is_empty());
        assert_relative_eq!(config.shape.to_polygon().unwrap().area(), 0.5);
    }

    #[test]
    fn rejects_invalid_values() {
        let mut config: ImmersedBoundaryConfig = serde_json::from_str(CYLINDER).unwrap();
        config.density = 0.0;
        assert!(matches!(
            config.validate().unwrap_err(),
            IbmError::Config(ConfigError::InvalidValue { key: "density", .. })
        ));

        config.density = 1.0;
        config.shape = ShapeConfig::Circle {
            center: Point2::origin(),
            radius: 1.0,
            segments: 2,
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            IbmError::Config(ConfigError::InvalidValue { key: "shape.segments", .. })
        ));

        config.shape = ShapeConfig::Polygon {
            vertices: vec![Point2::origin(), Point2::new(1.0, 0.0)],
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn collinear_polygon_is_degenerate() {
        let shape = ShapeConfig::Polygon {
            vertices: vec![Point2::origin(), Point2::new(1.0, 0.0), Point2::new(2.0, 0.0)],
        };
        assert!(matches!(
            shape.to_polygon().unwrap_err(),
            IbmError::Geometry(GeometryError::Degenerate(_))
        ));
    }
}
