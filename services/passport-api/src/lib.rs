//! Weather passport HTTP API.
//!
//! Serves precomputed daily alarm buttons from JSON snapshots and an
//! on-demand rain risk averaged from daily IMERG precipitation grids.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod resolver;
pub mod router;
pub mod snapshot;
pub mod state;

pub use config::ApiConfig;
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
