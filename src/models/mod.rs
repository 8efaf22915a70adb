// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod location;
pub mod photo;
pub mod theme;
pub mod user;

pub use location::*;
pub use photo::*;
pub use theme::*;
pub use user::*;
