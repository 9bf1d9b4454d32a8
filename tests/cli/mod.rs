//! CLI integration test modules

pub mod argument_parsing;
pub mod toml_config;
