//! Core types for Questbook: characters, status records, and attribute allocation.
//!
//! This crate has no I/O. It defines the data model exchanged with the
//! game API and the [`AllocationSession`] that redistributes a character's
//! unspent attribute points before they are committed.

/// Attribute point allocation over a status snapshot.
pub mod allocation;
/// Error types used throughout the crate.
pub mod error;
/// Characters, status records, users, and request payloads.
pub mod model;
/// Local validation of registration and creation input.
pub mod validate;

/// Re-export allocation types.
pub use allocation::{AllocationSession, Attribute};
/// Re-export error types.
pub use error::{AllocationError, CoreError, CoreResult, ValidationError};
/// Re-export model types.
pub use model::{
    Character, CharacterId, Credentials, NewCharacter, Registration, Status, StatusUpdate, User,
    UserId,
};
/// Re-export validation helpers.
pub use validate::validate_password;
