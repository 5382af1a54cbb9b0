//! Configuration sources, in ascending precedence.

pub mod environment;
pub mod explicit_file;
pub mod global_file;
