//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Completion service clients (OpenAI-compatible, mock)
//! - `http` - axum REST API
//! - `postgres` - PostgreSQL persistence
//! - `storage` - In-memory persistence for tests and development

pub mod ai;
pub mod http;
pub mod postgres;
pub mod storage;
