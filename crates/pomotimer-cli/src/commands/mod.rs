pub mod config;
pub mod timer;
