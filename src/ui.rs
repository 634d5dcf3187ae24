pub mod panel;
pub mod scheduler;
pub mod surface;
