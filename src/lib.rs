// Public API for integration tests and embedding in a game server

pub mod config;
pub mod error;
pub mod games;
pub mod handler;
pub mod protocol;
pub mod session;
pub mod types;

// Deadline scheduler for sessions
pub mod timer;
