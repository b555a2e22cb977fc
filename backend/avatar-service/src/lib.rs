//! Avatar Service
//!
//! Turns a trip player's reference photo into a set of styled avatars with
//! Gemini, stores them in Cloud Storage and records them on the trip's
//! Firestore document.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod styles;

// Public re-exports
pub use config::Config;
pub use error::{AppError, Result};
