use crate::error::{DatabaseError, DatabaseErrorExt};
use fxhash::FxHashSet;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::types::SurrealValue;

const BOOKKEEPING: &str = "
    DEFINE TABLE IF NOT EXISTS migration SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS version ON migration TYPE string;
    DEFINE FIELD IF NOT EXISTS name ON migration TYPE string;
    DEFINE FIELD IF NOT EXISTS applied_at ON migration TYPE datetime DEFAULT time::now();
    DEFINE INDEX IF NOT EXISTS migration_version ON migration FIELDS version UNIQUE;
";

/// A schema script applied exactly once, in declaration order.
#[derive(Debug)]
pub(crate) struct Migration {
    pub version: &'static str,
    pub name: &'static str,
    pub script: &'static str,
}

/// Every migration shipped with the crate, oldest first.
pub(crate) const MIGRATIONS: &[Migration] = &[Migration {
    version: "0001",
    name: "users_and_articles",
    script: include_str!("../migrations/0001_users_and_articles.surql"),
}];

#[derive(Debug, Default)]
pub(crate) struct MigrationReport {
    pub applied: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
}

#[derive(Debug, SurrealValue)]
struct AppliedMigration {
    version: String,
}

#[derive(Debug)]
pub(crate) struct MigrationRunner<'a> {
    db: &'a Surreal<Any>,
}

impl<'a> MigrationRunner<'a> {
    #[must_use]
    pub(crate) const fn new(db: &'a Surreal<Any>) -> Self {
        Self { db }
    }

    pub(crate) async fn run(&self) -> Result<MigrationReport, DatabaseError> {
        self.db
            .query(BOOKKEEPING)
            .await
            .context("Defining migration table")?
            .check()
            .map_err(surrealdb::Error::from)?;

        let applied = self.applied_versions().await?;
        let mut report = MigrationReport::default();

        for migration in MIGRATIONS {
            if applied.contains(migration.version) {
                report.skipped.push(migration.version);
                continue;
            }
            self.apply(migration).await?;
            report.applied.push(migration.version);
        }

        Ok(report)
    }

    async fn applied_versions(&self) -> Result<FxHashSet<String>, DatabaseError> {
        let rows = self
            .db
            .query("SELECT version FROM migration")
            .await
            .context("Loading applied migrations")?
            .take::<Vec<AppliedMigration>>(0)
            .context("Parsing applied migrations")?;

        Ok(rows.into_iter().map(|row| row.version).collect())
    }

    async fn apply(&self, migration: &Migration) -> Result<(), DatabaseError> {
        let query = format!(
            "BEGIN TRANSACTION;
            {}
            CREATE migration CONTENT {{ version: $version, name: $name }};
            COMMIT TRANSACTION;",
            migration.script,
        );

        self.db
            .query(query)
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await
            .context(format!("SQL execution failed at migration {}", migration.version))?
            .check()
            .map_err(surrealdb::Error::from)?;

        Ok(())
    }
}
