pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_tables;
mod m20240301_000001_numeric_columns;
mod tables;

/// Schema version a fresh install writes and every upgrade path ends at.
pub const TARGET_VERSION: i32 = 2;

/// Idempotent creation of every table and index at the current shape.
pub fn baseline() -> Box<dyn MigrationTrait> {
    Box::new(m20240101_000001_create_tables::Migration)
}

/// The step that moves a database from `version` to `version + 1`, if one exists.
pub fn upgrade_from(version: i32) -> Option<Box<dyn MigrationTrait>> {
    match version {
        1 => Some(Box::new(m20240301_000001_numeric_columns::Migration)),
        _ => None,
    }
}
