//! Shared test helpers for in-memory repository integration tests.

use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;
use triage::task::{
    adapters::memory::InMemoryTaskRepository,
    services::{CreateTaskRequest, TaskLifecycleService},
};

/// Service type exercised by the in-memory suites.
pub type MemoryService = TaskLifecycleService<InMemoryTaskRepository, DefaultClock>;

/// Repository and service wired over shared in-memory state.
pub struct MemoryContext {
    /// Repository handle for direct persistence assertions.
    pub repository: Arc<InMemoryTaskRepository>,
    /// Lifecycle service under test.
    pub service: MemoryService,
}

/// Provides a fresh repository/service pair for each test.
#[fixture]
pub fn context() -> MemoryContext {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let service = TaskLifecycleService::new(repository.clone(), Arc::new(DefaultClock));
    MemoryContext {
        repository,
        service,
    }
}

/// Builds a creation request with a description.
#[must_use]
pub fn request(title: &str, description: &str) -> CreateTaskRequest {
    CreateTaskRequest::new(title).with_description(description)
}
