//! Command implementations

pub mod download;
