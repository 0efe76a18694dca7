//! Vigil: Directory Integrity Monitoring
//!
//! A polling integrity monitor that baselines the content of a file tree
//! with streaming BLAKE3 digests, re-samples it on an interval, and records
//! every addition, modification, and deletion in an append-only CSV audit
//! log alongside a per-event stdout alert.

pub mod baseline;
pub mod config;
pub mod detect;
pub mod error;
pub mod hasher;
pub mod logging;
pub mod monitor;
pub mod report;
pub mod walker;
