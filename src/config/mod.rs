//! config/mod.rs
pub mod cli;
pub mod demo_config;
