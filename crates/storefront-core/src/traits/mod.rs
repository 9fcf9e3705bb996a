//! Core traits for client behavior.

mod transport;

pub use transport::Transport;
