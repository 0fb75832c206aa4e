// src/lib.rs

// Re-export or define the top-level modules you need
pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

// Add this to src/lib.rs or a common module
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
