// src/views/mod.rs
// DOCUMENTATION: Server-rendered HTML pages
// PURPOSE: One module per page family; layout holds the shared chrome

pub mod auth;
pub mod layout;
pub mod locations;
pub mod maps;
pub mod photos;
pub mod themes;
pub mod upload;

pub use layout::{FlashMessage, PageFrame};
