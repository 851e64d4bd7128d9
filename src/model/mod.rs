pub mod coordinate;
pub mod status;

pub use coordinate::{Coordinate, Key, NONE};
pub use status::DependencyStatus;
