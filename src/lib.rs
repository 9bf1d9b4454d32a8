pub mod app;
pub mod buffer;
pub mod core;
