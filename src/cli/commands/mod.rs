//! One module per subcommand, each exposing an `execute` function.

pub mod add;
pub mod audit_cmd;
pub mod auth;
pub mod delete;
pub mod edit;
pub mod generate;
pub mod info;
pub mod init;
pub mod list;
pub mod rotate;
pub mod search;
pub mod show;
