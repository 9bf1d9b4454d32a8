//! Test modules for the bounded buffer
//!
//! Tests are organized by functional area for better maintainability.

mod concurrent;
