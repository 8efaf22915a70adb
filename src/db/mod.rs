// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod memory_store;
pub mod pg_store;
pub mod store;

pub use memory_store::*;
pub use pg_store::*;
pub use store::*;
