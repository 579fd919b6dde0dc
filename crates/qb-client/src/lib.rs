//! Client side of Questbook: talks to the game API and hosts the status screen.
//!
//! [`ApiClient`] wraps the JSON-over-HTTP contract behind the [`AuthApi`]
//! and [`CharacterApi`] traits. [`SessionStore`] keeps the login token and
//! the selected character between runs. [`StatusScreen`] owns one
//! [`qb_core::AllocationSession`] and drives its commit against the API.

pub mod api;
pub mod config;
pub mod error;
pub mod screen;
pub mod store;
pub mod token;

pub use api::{ApiClient, AuthApi, CharacterApi};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use screen::{CommitTicket, StatusScreen};
pub use store::SessionStore;
pub use token::{AuthToken, TokenClaims};
