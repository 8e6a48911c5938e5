//! Unit tests for the harness modules
//!
//! Tests are organized by module. Tests that spawn processes use the fake
//! shell-script encoders from the `util` fixture crate and only run on unix.

pub mod config_tests;
