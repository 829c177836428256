//! Command-line front end helpers

pub mod orchestration;
