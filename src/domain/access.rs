//! Ownership checks for user records.
//!
//! Comments and notes can only be changed by the user who wrote them. The
//! request layer answers a failed check with 404 so that foreign records are
//! not revealed.

/// A record owned by exactly one user.
pub trait Owned {
    fn owner_id(&self) -> i64;
}

/// Returns true when `owner_identity` may edit or delete `record`.
pub fn can_mutate<R: Owned + ?Sized>(owner_identity: i64, record: &R) -> bool {
    record.owner_id() == owner_identity
}
