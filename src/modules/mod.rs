//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients and adapters for external services like photo storage.

pub mod storage;
