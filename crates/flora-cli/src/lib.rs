//! Library side of the `flora` command: configuration, input discovery and
//! logging setup.

pub mod config;
pub mod input;
pub mod logging;
