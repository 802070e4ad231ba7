//! # Advocate Directory
//!
//! A searchable, paginated directory of advocates backed by SQLite.
//!
//! Free-text search is a ranked FTS5 match over first name, last name, and
//! city. Each query produces a page of rows ordered by id plus the size of
//! the whole matching set, both computed from the same predicate in one read
//! transaction.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  GET /advocates  ┌──────────────┐   ┌──────────────────┐
//! │   browse     │─────────────────▶│    server    │──▶│ query + assemble │
//! │ session/view │◀─────────────────│    (axum)    │   │  SQLite + FTS5   │
//! └──────────────┘ {data,totalCount}└──────────────┘   └──────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Advocate record and wire types |
//! | [`error`] | Query error taxonomy |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema and search index |
//! | [`query`] | Predicate, ordering, and page window construction |
//! | [`assemble`] | Count + fetch into a page result |
//! | [`seed`] | Bootstrap dataset |
//! | [`server`] | HTTP API |
//! | [`search`] | `advdir search` command |
//! | [`session`] | Client paging/sort state machine |
//! | [`client`] | HTTP client for the API |
//! | [`view`] | Text rendering of a session |
//! | [`browse`] | Interactive terminal browser |

pub mod assemble;
pub mod browse;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod migrate;
pub mod models;
pub mod query;
pub mod search;
pub mod seed;
pub mod server;
pub mod session;
pub mod view;
