// src/config/mod.rs
// DOCUMENTATION: Configuration module organization
// PURPOSE: Re-export configuration components

pub mod db;
pub mod env;

pub use db::init_store;
pub use env::Config;

#[cfg(test)]
pub(crate) use env::test_config;
