//! operator-config: Postgres operator configuration resolution
//!
//! A library for turning a partially populated operator configuration into a
//! fully defaulted, cross-checked configuration and publishing it to readers.

pub mod config;
pub mod publish;
