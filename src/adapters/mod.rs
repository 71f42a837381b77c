//! Adapters - Implementations of port interfaces.
//!
//! - `ai` - Gemini text generation and a mock
//! - `auth` - JWT session validation and a mock
//! - `profile` - Profile persistence (in-memory, PostgreSQL)
//! - `http` - axum routes, handlers and middleware

pub mod ai;
pub mod auth;
pub mod http;
pub mod profile;
