//! Shared test helpers for `PostgreSQL` integration tests.

pub use super::cluster::{BoxError, PostgresCluster, postgres_cluster};
use super::cluster::TemporaryDatabase;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use std::sync::Arc;
use triage::task::{
    adapters::postgres::{PostgresTaskRepository, TaskPgPool},
    services::{CreateTaskRequest, TaskLifecycleService},
};
use uuid::Uuid;

/// SQL creating the task schema for tests.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-08-03-000000_create_task_tables/up.sql");

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "triage_test_template";

/// Service type exercised by the `PostgreSQL` suites.
pub type PgService = TaskLifecycleService<PostgresTaskRepository, DefaultClock>;

/// Prepared repository context for tests that need database access.
pub struct PgContext {
    /// Repository handle for direct persistence assertions.
    pub repository: Arc<PostgresTaskRepository>,
    /// Lifecycle service under test.
    pub service: PgService,
    _temp_db: TemporaryDatabase,
}

/// Creates a fully prepared context, or `None` when no cluster is
/// available in this environment.
///
/// Ensures the template database exists, clones it into a throwaway
/// database, and wires a repository plus service over a single-connection
/// pool.
///
/// # Errors
///
/// Returns an error when template creation, database cloning, or pool
/// construction fails.
pub async fn prepared_context(
    cluster: Option<PostgresCluster>,
) -> Result<Option<PgContext>, BoxError> {
    let Some(cluster) = cluster else {
        return Ok(None);
    };

    let temp_db = tokio::task::spawn_blocking(move || -> Result<TemporaryDatabase, BoxError> {
        cluster.ensure_template(TEMPLATE_DB, |db_name| {
            apply_migrations(&cluster.database_url(db_name))
        })?;
        cluster.temporary_database(&format!("triage_test_{}", Uuid::new_v4().simple()), TEMPLATE_DB)
    })
    .await
    .map_err(|err| Box::new(err) as BoxError)??;

    let manager = ConnectionManager::<PgConnection>::new(temp_db.url());
    let pool: TaskPgPool = Pool::builder()
        .max_size(1)
        .build(manager)
        .map_err(|err| Box::new(err) as BoxError)?;

    let repository = Arc::new(PostgresTaskRepository::new(pool));
    let service = TaskLifecycleService::new(repository.clone(), Arc::new(DefaultClock));
    Ok(Some(PgContext {
        repository,
        service,
        _temp_db: temp_db,
    }))
}

/// Applies the task schema to the database at the given URL.
///
/// This is a blocking operation that should be called from `spawn_blocking`
/// or a synchronous context.
fn apply_migrations(url: &str) -> Result<(), BoxError> {
    let mut conn = PgConnection::establish(url).map_err(|err| Box::new(err) as BoxError)?;
    conn.batch_execute(CREATE_SCHEMA_SQL)
        .map_err(|err| Box::new(err) as BoxError)?;
    Ok(())
}

/// Builds a creation request with a description.
#[must_use]
pub fn request(title: &str, description: &str) -> CreateTaskRequest {
    CreateTaskRequest::new(title).with_description(description)
}
