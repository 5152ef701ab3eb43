pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod ml;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(test)]
pub mod test_support;

pub use config::Config;
pub use error::{ApiError, Result};
