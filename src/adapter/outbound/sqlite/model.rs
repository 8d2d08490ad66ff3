//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::records;

/// Database row for a stored record (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = records)]
pub struct NewRecordRow {
    pub collection: String,
    pub id: String,
    pub body: String,
    pub updated_at: String,
}

/// Database row for a stored record (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecordRow {
    pub seq: Option<i32>,
    pub collection: String,
    pub id: String,
    pub body: String,
    pub updated_at: String,
}
