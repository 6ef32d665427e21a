//! SafeKeep: an encrypted password vault.
//!
//! Two storage backends share one `EntryStore` interface:
//! a single password-sealed `.vault` file (`vault`, `session::FileSession`)
//! and a SQLite store with per-password encryption (`store::keyed`,
//! `session::KeyedSession`).

pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod session;
pub mod store;
pub mod vault;

#[cfg(feature = "keyring-store")]
pub mod keyring;
