pub mod action;
pub mod config;
pub mod report;
pub mod storage;
pub mod style;
pub mod testing;

pub use crate::config::TaskConfig;
