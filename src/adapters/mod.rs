// Adapters layer: concrete implementations for external systems.

pub mod bigquery;
pub mod http;
pub mod storage;
