//! Master sessions: the unlock lifecycle around each backend.
//!
//! A session starts `Locked`, passes through `Unlocking` while the
//! password is being checked, and ends up `Unlocked` holding whatever
//! secret the backend needs. `lock()` wipes that secret and always
//! returns to `Locked`.
//!
//! Sessions are plain values owned by the caller; nothing here is global.

pub mod file;
pub mod keyed;

pub use file::FileSession;
pub use keyed::KeyedSession;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Locked,
    Unlocking,
    Unlocked,
}

