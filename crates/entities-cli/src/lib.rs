//! Library side of the `compile-entities` binary.

pub mod config;
pub mod logging;
pub mod pipeline;
