//! State and control spaces for the cage planning problem.
//!
//! Provides:
//! - per-dimension box bounds over fixed-size vectors
//! - a 2D box workspace with axis-aligned obstacles
//! - the 10-D configuration space (bounds, obstacle checks on the object and gripper footprint)
//! - the control set with time-biased duration sampling
//!
//! Feasibility is always a `bool`; bounds and collision violations are never errors.

pub mod bounds;
pub mod control;
pub mod cspace;
pub mod error;
pub mod workspace;

pub use bounds::BoxBounds;
pub use control::{CageControlSet, TimeBiasSet};
pub use cspace::{CageConfigurationSpace, ConfigurationSpace, standard_bounds};
pub use error::{SpaceError, SpaceResult};
pub use workspace::{Aabb, Geometric2DWorkspace, OrientedBox, Workspace};
