// src/commands/mod.rs
pub mod common;
pub mod resolve;
pub mod version;
