//! HTTP surface for the Snap manual question-answering service.
//!
//! The service builds its vector index once in `main`, before the listener
//! starts accepting connections; request handlers only ever read shared
//! state, so no locking is involved.

pub mod config;
pub mod routes;

pub use config::ServerConfig;
pub use routes::{AppState, router};
