//! I-HAVEN admin gateway

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

/// Signed image uploads
pub mod cloudinary;

/// Authenticated gateway to the external backend
pub mod gateway;

/// Middleware for protected routes
pub mod middleware;

/// HTTP routes
pub mod routes;

/// Server bootstrap
pub mod server;

/// Typed per-domain backend calls
pub mod services;

/// Admin session cookies
pub mod session;

/// Platform feature flags
pub mod settings;

/// Shared types: environment, errors, envelope, extractors
pub mod types;
