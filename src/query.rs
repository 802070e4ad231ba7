//! Query construction: free text plus paging state in, a filter predicate,
//! an ordering clause, and a bounded window out.
//!
//! The same [`Predicate`] renders the `FROM ... WHERE ...` fragment for both
//! the count and the row fetch, so `totalCount` and the page are always
//! computed over one logical set. User text never reaches the SQL string:
//! it is sanitized into an FTS5 expression and bound as a parameter.

use std::fmt;
use std::str::FromStr;

use crate::config::{PaginationConfig, SearchConfig};
use crate::error::DirectoryError;

/// Maximum number of search terms kept from the input text.
pub const MAX_SEARCH_TERMS: usize = 16;

const COLUMNS: &str = "advocates.id, advocates.first_name, advocates.last_name, advocates.city, \
     advocates.degree, advocates.specialties, advocates.years_of_experience, \
     advocates.phone_number, advocates.created_at";

/// Row filter derived from the committed search text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// No search text: every row matches.
    All,
    /// Ranked full-text match against the search index. Holds the sanitized
    /// FTS5 expression.
    Match(String),
    /// Search text was given but contained nothing searchable.
    Nothing,
}

impl Predicate {
    /// Builds the predicate for `search_text`.
    ///
    /// Blank or absent text matches everything. Otherwise each token
    /// (separated by whitespace or control characters) becomes a quoted FTS5
    /// prefix term and the terms are ANDed; tokens with no letters or digits
    /// are dropped since the index tokenizer would discard them anyway.
    pub fn build(search_text: Option<&str>) -> Self {
        let text = match search_text.map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => return Predicate::All,
        };

        let terms: Vec<String> = text
            .split(|c: char| c.is_whitespace() || c.is_control())
            .filter(|token| token.chars().any(char::is_alphanumeric))
            .take(MAX_SEARCH_TERMS)
            .map(quote_term)
            .collect();

        if terms.is_empty() {
            Predicate::Nothing
        } else {
            Predicate::Match(terms.join(" "))
        }
    }

    /// The FTS5 expression to bind, if this predicate needs one.
    pub fn fts_expression(&self) -> Option<&str> {
        match self {
            Predicate::Match(expr) => Some(expr),
            _ => None,
        }
    }

    /// `FROM`/`WHERE` fragment shared by the count and the fetch.
    fn source_clause(&self) -> &'static str {
        match self {
            Predicate::All => "FROM advocates",
            Predicate::Match(_) => {
                "FROM advocates \
                 JOIN advocates_fts ON advocates_fts.rowid = advocates.id \
                 WHERE advocates_fts MATCH ?"
            }
            Predicate::Nothing => "FROM advocates WHERE 0",
        }
    }

    /// SQL counting every row the predicate matches. Binds: the FTS
    /// expression when present.
    pub fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) {}", self.source_clause())
    }

    /// SQL fetching one ordered window of matching rows. Binds: the FTS
    /// expression when present, then `LIMIT`, then `OFFSET`.
    pub fn select_sql(&self, order_by: OrderBy, weights: &SearchConfig) -> String {
        format!(
            "SELECT {} {} {} LIMIT ? OFFSET ?",
            COLUMNS,
            self.source_clause(),
            order_by.clause(self, weights)
        )
    }
}

/// Wraps a raw token as an FTS5 string with prefix matching. Embedded double
/// quotes are doubled, which is the only escape FTS5 strings need; operators
/// such as `AND`, `NEAR` or `*` lose their meaning inside the quotes.
fn quote_term(token: &str) -> String {
    format!("\"{}\"*", token.replace('"', "\"\""))
}

/// Server-side row ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    /// Primary key ascending. Stable across pages.
    #[default]
    IdAsc,
    /// Weighted BM25 relevance (first name, then last name, then city),
    /// ties broken by primary key. Falls back to `IdAsc` without a match.
    Relevance,
}

impl OrderBy {
    fn clause(self, predicate: &Predicate, weights: &SearchConfig) -> String {
        match (self, predicate) {
            (OrderBy::Relevance, Predicate::Match(_)) => format!(
                "ORDER BY bm25(advocates_fts, {:?}, {:?}, {:?}), advocates.id ASC",
                weights.first_name_weight, weights.last_name_weight, weights.city_weight
            ),
            _ => "ORDER BY advocates.id ASC".to_string(),
        }
    }
}

impl FromStr for OrderBy {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "id" => Ok(OrderBy::IdAsc),
            "relevance" => Ok(OrderBy::Relevance),
            other => Err(DirectoryError::validation(format!(
                "orderBy must be 'id' or 'relevance', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBy::IdAsc => f.write_str("id"),
            OrderBy::Relevance => f.write_str("relevance"),
        }
    }
}

/// A validated `(page, pageSize)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// `page` is 1-based; `page_size` must be in `1..=max_page_size`.
    pub fn new(page: u32, page_size: u32, max_page_size: u32) -> Result<Self, DirectoryError> {
        if page == 0 {
            return Err(DirectoryError::validation("page must be >= 1"));
        }
        if page_size == 0 || page_size > max_page_size {
            return Err(DirectoryError::validation(format!(
                "pageSize must be between 1 and {}",
                max_page_size
            )));
        }
        Ok(Self { page, page_size })
    }

    /// Parses raw query-string values. Missing values fall back to page 1 and
    /// the first configured page size.
    pub fn parse(
        page: Option<&str>,
        page_size: Option<&str>,
        pagination: &PaginationConfig,
    ) -> Result<Self, DirectoryError> {
        let page = match page.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => parse_number("page", raw)?,
            None => 1,
        };
        let page_size = match page_size.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => parse_number("pageSize", raw)?,
            None => pagination.default_page_size(),
        };
        Self::new(page, page_size, pagination.max_page_size)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    /// `(page - 1) * pageSize`. Both factors fit in `u32`, so the product
    /// always fits in `i64`.
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }
}

fn parse_number(name: &str, raw: &str) -> Result<u32, DirectoryError> {
    raw.parse::<u32>().map_err(|_| {
        DirectoryError::validation(format!("{} must be a positive integer, got '{}'", name, raw))
    })
}

/// `ceil(total / page_size)`, never less than 1.
pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 1;
    }
    let pages = total_count.div_ceil(u64::from(page_size)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}
