//! Data Transfer Objects for the orchestrator HTTP API
//!
//! Request and response bodies that are not domain entities in their own
//! right: registration envelopes, evaluation acknowledgements and the like.

pub mod job;
