//! Configuration: project-level settings from `.safekeep.toml`.

pub mod settings;

pub use settings::{Backend, Settings};
