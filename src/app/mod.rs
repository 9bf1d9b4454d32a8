//! Application module: the command-line driver around the buffer

pub mod cli;
pub mod error;
pub mod runner;
pub mod startup;
