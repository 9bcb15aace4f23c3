//! Tradeoff Compass - Neutral, AI-assisted option comparison
//!
//! This crate turns a list of options and constraints into a structured,
//! winner-free comparison: it builds a neutral prompt, calls an
//! OpenAI-compatible completion service with bounded retries, normalizes the
//! free-form answer into a strict shape and persists request and result.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
