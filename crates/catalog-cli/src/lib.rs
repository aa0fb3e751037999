//! Library side of the `catalog` command: logging setup, option handling
//! and rendering. Argument parsing and command dispatch live in the binary.

pub mod browse;
pub mod logging;
pub mod render;
