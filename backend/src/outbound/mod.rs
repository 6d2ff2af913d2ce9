//! Outbound adapters towards backing infrastructure.

pub mod persistence;
