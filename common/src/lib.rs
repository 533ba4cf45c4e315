pub mod constants;
pub mod log;
pub mod types;
