//! Subcommand implementations.

pub mod auth;
pub mod categories;
pub mod orders;
pub mod products;
pub mod users;
