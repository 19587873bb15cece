use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Status given to applications created without one.
pub const DEFAULT_STATUS: &str = "applied";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRow {
    pub id: i32,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub requirements: Option<String>,
    pub url: String,
    pub status: String,
    pub notes: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flat insert record; identity and timestamps are assigned by the database.
/// Absent fields decode as empty so validation reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewApplication {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub requirements: Option<String>,
    pub url: String,
    pub status: Option<String>,
    pub notes: Option<String>,
}
