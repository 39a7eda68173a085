//! Migration runner, schema management, and seeding over the public API.

use std::cell::RefCell;

use berth::{
    DbError, Migration, MigrationError, Migrator, Model, SchemaManager, Seed, Seeder, SqlBackend,
    SqlExecutor, STATE_TABLE,
};
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use may_postgres::types::ToSql;
use may_postgres::Row;
use sea_query::{ColumnDef, Index, Table};

/// Records every statement it is handed; the state table answers with
/// whatever rows the test scripted.
struct RecordingExecutor {
    executed: RefCell<Vec<String>>,
    state: RefCell<Vec<(String, String)>>,
}

impl RecordingExecutor {
    fn new() -> Self {
        Self {
            executed: RefCell::new(Vec::new()),
            state: RefCell::new(Vec::new()),
        }
    }

    fn with_state(rows: &[(&str, &str)]) -> Self {
        let executor = Self::new();
        *executor.state.borrow_mut() = rows
            .iter()
            .map(|(id, at)| (id.to_string(), at.to_string()))
            .collect();
        executor
    }

    fn statements(&self) -> Vec<String> {
        self.executed.borrow().clone()
    }
}

impl SqlExecutor for RecordingExecutor {
    fn execute(&self, query: &str, _params: &[&dyn ToSql]) -> Result<u64, DbError> {
        self.executed.borrow_mut().push(query.to_string());
        Ok(1)
    }

    fn query_one(&self, _query: &str, _params: &[&dyn ToSql]) -> Result<Row, DbError> {
        Err(DbError::Other("no rows scripted".to_string()))
    }

    fn query_all(&self, _query: &str, _params: &[&dyn ToSql]) -> Result<Vec<Row>, DbError> {
        Ok(Vec::new())
    }

    fn query_text_pairs(&self, _query: &str) -> Result<Vec<(String, String)>, DbError> {
        Ok(self.state.borrow().clone())
    }
}

#[derive(Debug, Clone, Model)]
struct Checkpoint {
    #[primary_key]
    id: u32,
    label: String,
    passed_at: Option<chrono::NaiveDateTime>,
}

struct CreateNotesTable;

impl Migration for CreateNotesTable {
    fn id(&self) -> &str {
        "20240101_create_notes"
    }

    fn up(&self, manager: &SchemaManager<'_>) -> Result<(), DbError> {
        let table = Table::create()
            .table("notes")
            .if_not_exists()
            .col(
                ColumnDef::new("id")
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new("body").string().not_null())
            .to_owned();
        manager.create_table(table)?;
        manager.create_index(
            Index::create()
                .name("idx_notes_body")
                .table("notes")
                .col("body")
                .to_owned(),
        )
    }

    fn down(&self, manager: &SchemaManager<'_>) -> Result<(), DbError> {
        manager.drop_index(Index::drop().name("idx_notes_body").table("notes").to_owned())?;
        manager.drop_table(Table::drop().table("notes").if_exists().to_owned())
    }
}

#[test]
fn test_run_applies_registrations_in_order() {
    let executor = RecordingExecutor::new();
    let mut migrator = Migrator::new(SqlBackend::Postgres);
    migrator.add(CreateNotesTable).add_model::<Checkpoint>();

    let applied = migrator.run(&executor).unwrap();
    assert_eq!(applied, 2);

    let executed = executor.statements();
    assert!(executed[0].contains(STATE_TABLE));

    let notes = executed
        .iter()
        .position(|sql| sql.starts_with("CREATE TABLE") && sql.contains(r#""notes""#))
        .unwrap();
    let index = executed
        .iter()
        .position(|sql| sql.contains("idx_notes_body"))
        .unwrap();
    let checkpoints = executed
        .iter()
        .position(|sql| sql.contains(r#""checkpoints""#))
        .unwrap();
    assert!(notes < index);
    assert!(index < checkpoints);

    let inserts = executed
        .iter()
        .filter(|sql| sql.starts_with("INSERT") && sql.contains(STATE_TABLE))
        .count();
    assert_eq!(inserts, 2);
}

#[test]
fn test_derived_model_produces_full_ddl() {
    let executor = RecordingExecutor::new();
    let mut migrator = Migrator::new(SqlBackend::Postgres);
    migrator.add_model::<Checkpoint>();

    migrator.run(&executor).unwrap();

    let executed = executor.statements();
    let sql = executed
        .iter()
        .find(|sql| sql.contains(r#""checkpoints""#))
        .unwrap();
    assert!(sql.contains("IF NOT EXISTS"));
    assert!(sql.contains("bigserial"));
    assert!(sql.contains("PRIMARY KEY"));
    assert!(sql.contains(r#""label" varchar NOT NULL"#));
    assert!(sql.contains(r#""passed_at" timestamp"#));
    assert!(!sql.contains(r#""passed_at" timestamp NOT NULL"#));
}

#[test]
fn test_empty_registry_is_an_error() {
    let executor = RecordingExecutor::new();
    let migrator = Migrator::new(SqlBackend::Postgres);

    let err = migrator.run(&executor).unwrap_err();
    assert_eq!(err.to_string(), "No migrations to run!");
    assert!(executor.statements().is_empty());
}

#[test]
fn test_duplicate_ids_rejected_before_execution() {
    let executor = RecordingExecutor::new();
    let mut migrator = Migrator::new(SqlBackend::Postgres);
    migrator.add(CreateNotesTable).add(CreateNotesTable);

    let err = migrator.run(&executor).unwrap_err();
    assert!(matches!(err, MigrationError::Duplicate(id) if id == "20240101_create_notes"));
    assert!(executor.statements().is_empty());
}

#[test]
fn test_rollback_with_clean_state_is_a_noop() {
    let executor = RecordingExecutor::new();
    let mut migrator = Migrator::new(SqlBackend::Postgres);
    migrator.add(CreateNotesTable);

    let rolled_back = migrator.rollback(&executor, 2).unwrap();
    assert_eq!(rolled_back, 0);
    assert!(executor
        .statements()
        .iter()
        .all(|sql| !sql.starts_with("DROP")));
}

#[test]
fn test_rerun_applies_nothing_once_recorded() {
    let executor = RecordingExecutor::with_state(&[
        ("20240101_create_notes", "2024-01-01 08:30:00"),
        ("create_checkpoints", "2024-01-02 08:30:00"),
    ]);
    let mut migrator = Migrator::new(SqlBackend::Postgres);
    migrator.add(CreateNotesTable).add_model::<Checkpoint>();

    let applied = migrator.run(&executor).unwrap();
    assert_eq!(applied, 0);

    // Nothing beyond the state table bootstrap.
    let executed = executor.statements();
    assert_eq!(executed.len(), 1);
    assert!(executed[0].contains(STATE_TABLE));
}

#[test]
fn test_rollback_drops_newest_and_clears_its_record() {
    let executor = RecordingExecutor::with_state(&[
        ("20240101_create_notes", "2024-01-01 08:30:00"),
        ("create_checkpoints", "2024-01-02 08:30:00"),
    ]);
    let mut migrator = Migrator::new(SqlBackend::Postgres);
    migrator.add(CreateNotesTable).add_model::<Checkpoint>();

    let rolled_back = migrator.rollback(&executor, 1).unwrap();
    assert_eq!(rolled_back, 1);

    let executed = executor.statements();
    let drop = executed
        .iter()
        .find(|sql| sql.starts_with("DROP TABLE"))
        .unwrap();
    assert!(drop.contains(r#""checkpoints""#));

    let delete = executed
        .iter()
        .find(|sql| sql.starts_with("DELETE FROM"))
        .unwrap();
    assert!(delete.contains(STATE_TABLE));

    // The older registration stays untouched.
    assert!(executed.iter().all(|sql| !sql.contains(r#""notes""#)));
}

#[test]
fn test_status_lists_pending_in_registration_order() {
    let executor = RecordingExecutor::new();
    let mut migrator = Migrator::new(SqlBackend::Postgres);
    migrator.add(CreateNotesTable).add_model::<Checkpoint>();

    let status = migrator.status(&executor).unwrap();
    assert!(status.applied.is_empty());
    assert_eq!(
        status.pending,
        vec![
            "20240101_create_notes".to_string(),
            "create_checkpoints".to_string()
        ]
    );
}

#[test]
fn test_mysql_dialect_reaches_every_statement() {
    let executor = RecordingExecutor::new();
    let mut migrator = Migrator::new(SqlBackend::MySql);
    migrator.add_model::<Checkpoint>();

    migrator.run(&executor).unwrap();

    let executed = executor.statements();
    let create = executed
        .iter()
        .find(|sql| sql.contains("`checkpoints`"))
        .unwrap();
    assert!(create.contains("AUTO_INCREMENT"));

    let insert = executed
        .iter()
        .find(|sql| sql.starts_with("INSERT"))
        .unwrap();
    assert!(insert.contains('?'));
    assert!(!insert.contains("$1"));
}

struct SeedNotes;

impl Seed for SeedNotes {
    fn name(&self) -> &str {
        "sample notes"
    }

    fn run(&self, executor: &dyn SqlExecutor) -> Result<(), DbError> {
        let body: String = Sentence(3..8).fake();
        executor
            .execute("INSERT INTO notes (body) VALUES ($1)", &[&body])
            .map(|_| ())
    }
}

#[test]
fn test_seeder_runs_registered_seeds() {
    let executor = RecordingExecutor::new();
    let mut seeder = Seeder::new();
    seeder.add(SeedNotes).add(SeedNotes);

    let count = seeder.run(&executor).unwrap();
    assert_eq!(count, 2);

    let executed = executor.statements();
    assert_eq!(executed.len(), 2);
    assert!(executed[0].starts_with("INSERT INTO notes"));
}
