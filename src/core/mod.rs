//! Core primitives: contract roles and configuration, checksums, the stage
//! gate, the evolution log, the reconciliation rules and run reporting.
//!
//! Nothing in here knows which entry point is running; the validators
//! compose these pieces.

pub mod checksum;
pub mod config;
pub mod contracts;
pub mod error;
pub mod evolution;
pub mod output;
pub mod reconcile;
pub mod report;
pub mod stage;
pub mod time;
pub mod workspace;
