// src/services/authz.rs
// DOCUMENTATION: Ownership guard
// PURPOSE: The single place that decides whether an actor may touch a resource

use crate::errors::JournalError;
use crate::models::{Photo, Theme, User};

/// Anything with an owning user
pub trait Owned {
    /// User the ownership guard compares the actor with
    fn owner_id(&self) -> i64;

    /// Short noun used in messages ("theme", "photo")
    fn kind(&self) -> &'static str;

    fn id(&self) -> i64;
}

impl Owned for Theme {
    fn owner_id(&self) -> i64 {
        self.user_id
    }

    fn kind(&self) -> &'static str {
        "theme"
    }

    fn id(&self) -> i64 {
        self.id
    }
}

/// Photos are owned by their uploader, not by the theme owner
impl Owned for Photo {
    fn owner_id(&self) -> i64 {
        self.user_id
    }

    fn kind(&self) -> &'static str {
        "photo"
    }

    fn id(&self) -> i64 {
        self.id
    }
}

/// PermissionDenied unless `actor` owns `resource`
/// DOCUMENTATION: Used before every mutation of a location (through its
/// theme) or a photo. `action` completes "You don't have permission to ..."
pub fn ensure_owner<R: Owned>(actor: &User, resource: &R, action: &str) -> Result<(), JournalError> {
    if resource.owner_id() == actor.id {
        return Ok(());
    }
    log::warn!(
        "User {} denied: {} on {} {} owned by {}",
        actor.id,
        action,
        resource.kind(),
        resource.id(),
        resource.owner_id()
    );
    Err(JournalError::PermissionDenied(format!(
        "You don't have permission to {}.",
        action
    )))
}

/// The resource itself if `actor` owns it, NotFound otherwise
/// DOCUMENTATION: Theme pages use this so other users' themes look absent
pub fn owned_or_not_found<R: Owned>(actor: &User, resource: R) -> Result<R, JournalError> {
    if resource.owner_id() == actor.id {
        Ok(resource)
    } else {
        Err(JournalError::not_found(resource.kind(), resource.id()))
    }
}
