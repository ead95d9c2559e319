pub mod config;
pub mod plan;
pub mod task;
pub mod timer;
