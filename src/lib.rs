//! Triage: task-management core with create-time classification.
//!
//! This crate implements the lifecycle of task records: creation with
//! keyword-driven category/priority classification and entity extraction,
//! partial updates with field-level audit history, filtered listing with
//! pagination, and cascading deletion of a task together with its history.
//!
//! # Architecture
//!
//! Triage follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! HTTP routing, request validation, and connection-pool configuration are
//! the embedding application's concern; this crate exposes the
//! [`task::services::TaskLifecycleService`] those surfaces drive.

pub mod task;
