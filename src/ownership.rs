//! Decides whether a user may change a record.

use crate::{Error, auth::User, auth::UserID};

/// A record that belongs to exactly one user.
pub trait Owned {
    /// The user that created the record.
    fn owner(&self) -> UserID;
}

/// Whether `actor` may edit or delete `record`.
///
/// Superusers may change any record, everyone else only the records they own.
pub fn can_mutate(actor: &User, record: &impl Owned) -> bool {
    actor.is_superuser || record.owner() == actor.id
}

/// Check that `actor` may edit or delete `record`.
///
/// # Errors
///
/// Returns [Error::Forbidden] if [can_mutate] is false.
pub fn ensure_can_mutate(actor: &User, record: &impl Owned) -> Result<(), Error> {
    if can_mutate(actor, record) {
        Ok(())
    } else {
        tracing::warn!(
            "User {} tried to change a record owned by user {}",
            actor.id,
            record.owner()
        );
        Err(Error::Forbidden)
    }
}
