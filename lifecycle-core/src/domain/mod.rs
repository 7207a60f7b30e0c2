//! Core domain types
//!
//! This module contains the orchestrator entities the harness reads back from
//! the cluster. Field names follow the orchestrator's JSON (PascalCase, `ID`
//! suffixes) through serde renames so the Rust side stays snake_case.

pub mod allocation;
pub mod fs;
pub mod job;
pub mod node;
