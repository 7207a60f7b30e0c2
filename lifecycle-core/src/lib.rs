//! Lifecycle Core
//!
//! Types shared by the lifecycle end-to-end harness.
//!
//! This crate contains:
//! - Domain types: the orchestrator entities the harness observes (Job, Allocation, Node, ...)
//! - DTOs: request and response bodies exchanged with the orchestrator HTTP API

pub mod domain;
pub mod dto;
