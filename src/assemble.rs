//! Result assembly: runs the count and the bounded fetch for one predicate
//! and packages rows with pagination metadata.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::config::SearchConfig;
use crate::error::DirectoryError;
use crate::models::{Advocate, AdvocatePage};
use crate::query::{total_pages, OrderBy, PageRequest, Predicate};

/// One page of matching advocates plus the size of the whole matching set.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub rows: Vec<Advocate>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl PageResult {
    /// Converts to the `/advocates` wire body.
    pub fn into_wire(self) -> AdvocatePage {
        AdvocatePage::new(self.rows, self.total_count)
    }
}

/// Counts every row matching `predicate` and fetches the requested window.
///
/// Both statements run inside one transaction so they read the same
/// snapshot: the page is always a slice of the counted set. A page past the
/// end yields no rows, not an error. Read-only.
pub async fn fetch_page(
    pool: &SqlitePool,
    predicate: &Predicate,
    request: PageRequest,
    order_by: OrderBy,
    weights: &SearchConfig,
) -> Result<PageResult, DirectoryError> {
    let mut tx = pool.begin().await?;

    let count_sql = predicate.count_sql();
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(expr) = predicate.fts_expression() {
        count_query = count_query.bind(expr);
    }
    let total_count = count_query.fetch_one(&mut *tx).await?;

    let select_sql = predicate.select_sql(order_by, weights);
    let mut select_query = sqlx::query(&select_sql);
    if let Some(expr) = predicate.fts_expression() {
        select_query = select_query.bind(expr);
    }
    let rows = select_query
        .bind(request.limit())
        .bind(request.offset())
        .fetch_all(&mut *tx)
        .await?;

    tx.commit().await?;

    let rows = rows
        .iter()
        .map(advocate_from_row)
        .collect::<Result<Vec<_>, _>>()?;
    let total_count = u64::try_from(total_count).unwrap_or(0);

    tracing::debug!(
        page = request.page(),
        page_size = request.page_size(),
        total_count,
        returned = rows.len(),
        "assembled advocate page"
    );

    Ok(PageResult {
        rows,
        total_count,
        page: request.page(),
        page_size: request.page_size(),
        total_pages: total_pages(total_count, request.page_size()),
    })
}

/// Decodes one `advocates` row selected with the query module's column list.
pub(crate) fn advocate_from_row(row: &SqliteRow) -> Result<Advocate, DirectoryError> {
    let id: i64 = row.try_get("id")?;

    let specialties_json: String = row.try_get("specialties")?;
    let specialties: Vec<String> =
        serde_json::from_str(&specialties_json).map_err(|e| DirectoryError::MalformedRow {
            id,
            reason: format!("specialties is not a JSON string array: {}", e),
        })?;

    let years: i64 = row.try_get("years_of_experience")?;
    let years_of_experience = u32::try_from(years).map_err(|_| DirectoryError::MalformedRow {
        id,
        reason: format!("years_of_experience out of range: {}", years),
    })?;

    let created_ts: i64 = row.try_get("created_at")?;
    let created_at: DateTime<Utc> =
        DateTime::from_timestamp(created_ts, 0).ok_or_else(|| DirectoryError::MalformedRow {
            id,
            reason: format!("created_at out of range: {}", created_ts),
        })?;

    Ok(Advocate {
        id,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        city: row.try_get("city")?,
        degree: row.try_get("degree")?,
        specialties,
        years_of_experience,
        phone_number: row.try_get("phone_number")?,
        created_at,
    })
}
