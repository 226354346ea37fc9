//! Client for the meal tracking backend: session token lifecycle,
//! authenticated requests, and the meal operations built on them.
//!
//! Every operation takes a [`ClientContext`] and returns a
//! [`ClientResult`]; failures are values, never panics.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod images;
pub mod meals;
pub mod state;
pub mod storage;

#[cfg(test)]
mod test_support;

pub use auth::{AuthState, SessionManager};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, FieldError};
pub use images::ImageAsset;
pub use meals::{create_meal, get_meals, CreatedMeal, Meal};
pub use state::ClientContext;
pub use storage::{FileStore, MemoryStore, SecureStore, StoreError};
