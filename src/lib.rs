//! Fuzzy Decision Engine - Multi-criteria decisions and pattern learning
//!
//! This crate ranks alternatives under weighted, uncertain criteria
//! (fuzzy aggregation, TOPSIS, AHP) and mines decision history for
//! temporal, behavioral and statistical regularities.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
