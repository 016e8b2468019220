//! Demo data for local runs and end-to-end tests.
//!
//! Records are keyed by their integer id and written with `UPSERT`, so loading
//! the fixtures twice leaves the tables unchanged.

use crate::error::{DatabaseError, DatabaseErrorExt};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

const SEED: &str = include_str!("../fixtures/seed.surql");

pub(crate) async fn load(db: &Surreal<Any>) -> Result<(), DatabaseError> {
    db.query(SEED)
        .await
        .context("Loading fixtures")?
        .check()
        .map_err(surrealdb::Error::from)?;

    Ok(())
}
