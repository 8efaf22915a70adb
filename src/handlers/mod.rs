// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Route table and shared request plumbing

pub mod auth;
pub mod extractors;
pub mod flash;
pub mod health;
pub mod locations;
pub mod maps;
pub mod photos;
pub mod themes;

#[cfg(test)]
pub(crate) mod test_support;

use actix_web::web;

/// Register every route of the service
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::config)
        .configure(auth::config)
        .configure(themes::config)
        .configure(maps::config)
        .configure(photos::config)
        .configure(locations::config);
}
