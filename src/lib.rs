// src/lib.rs
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod frontend;
pub mod fuzzy;
pub mod resolve;
pub mod scored;
pub mod sema;
