//! Task lifecycle management for Triage.
//!
//! This module implements the task-management core: creating task records
//! with create-time classification (category, priority, extracted entities,
//! suggested actions), partial updates with field-level audit history,
//! filtered listing with pagination, and deletion that removes a task
//! together with its history. The module follows hexagonal architecture:
//!
//! - Domain types and the classifier in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
