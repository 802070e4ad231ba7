//! Core data models shared by the storage layer, the HTTP boundary, and the
//! terminal client.
//!
//! JSON field names are camelCase to match the public `/advocates` contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored advocate record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advocate {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub degree: String,
    pub specialties: Vec<String>,
    pub years_of_experience: u32,
    pub phone_number: i64,
    pub created_at: DateTime<Utc>,
}

/// An advocate that has not been stored yet; `id` and `created_at` are
/// assigned by the database.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdvocate {
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub degree: String,
    pub specialties: Vec<String>,
    pub years_of_experience: u32,
    pub phone_number: i64,
}

/// One element of the `totalCount` array in a `/advocates` response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountRow {
    pub count: u64,
}

/// Successful `GET /advocates` body: `{ data, totalCount: [{ count }] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvocatePage {
    pub data: Vec<Advocate>,
    pub total_count: Vec<CountRow>,
}

impl AdvocatePage {
    pub fn new(data: Vec<Advocate>, total_count: u64) -> Self {
        Self {
            data,
            total_count: vec![CountRow { count: total_count }],
        }
    }

    /// The matching-set size, or 0 when the count array is empty.
    pub fn count(&self) -> u64 {
        self.total_count.first().map(|c| c.count).unwrap_or(0)
    }
}

/// `POST /seed` body on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedResponse {
    pub advocates: Vec<Advocate>,
}

/// The uniform failure body, `{ ok: false }`, optionally with a message for
/// rejected (invalid) requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Failure {
    pub fn generic() -> Self {
        Self {
            ok: false,
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
        }
    }
}
