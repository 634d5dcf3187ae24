pub mod executor;
pub mod geometry;
pub mod timer;
