#![forbid(unsafe_code)]

pub mod actor;
pub mod config;
pub mod input;
pub mod pipeline;
