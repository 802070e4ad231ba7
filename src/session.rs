//! Client-side pagination and sort state.
//!
//! [`Session`] is a pure reducer: [`Session::apply`] takes an [`Action`],
//! updates the state, and returns the [`FetchIntent`] the caller must execute
//! (if any). Nothing here does I/O.
//!
//! ```text
//!   Idle ──Mount──▶ Fetching ──Loaded──▶ Loaded
//!                     ▲   └───Failed──▶ Error
//!                     └── Search / ClearSearch / SetPageSize / NextPage / PrevPage
//! ```
//!
//! Every intent carries a monotonic request id. Only the response to the
//! most recent intent is applied; older responses are dropped, so the last
//! issued request always wins.
//!
//! Column sorting is local: it reorders the rows of the loaded page and never
//! issues a fetch.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::models::Advocate;
use crate::query::total_pages;

/// Request lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching,
    Loaded,
    Error,
}

/// Sortable table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    FirstName,
    LastName,
    City,
    Degree,
    Specialties,
    YearsOfExperience,
    PhoneNumber,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::FirstName,
        SortKey::LastName,
        SortKey::City,
        SortKey::Degree,
        SortKey::Specialties,
        SortKey::YearsOfExperience,
        SortKey::PhoneNumber,
    ];

    /// Column header text.
    pub fn title(self) -> &'static str {
        match self {
            SortKey::FirstName => "First Name",
            SortKey::LastName => "Last Name",
            SortKey::City => "City",
            SortKey::Degree => "Degree",
            SortKey::Specialties => "Specialties",
            SortKey::YearsOfExperience => "Years of Experience",
            SortKey::PhoneNumber => "Phone Number",
        }
    }

    fn compare(self, a: &Advocate, b: &Advocate) -> Ordering {
        match self {
            SortKey::FirstName => a.first_name.cmp(&b.first_name),
            SortKey::LastName => a.last_name.cmp(&b.last_name),
            SortKey::City => a.city.cmp(&b.city),
            SortKey::Degree => a.degree.cmp(&b.degree),
            SortKey::Specialties => a.specialties.cmp(&b.specialties),
            SortKey::YearsOfExperience => a.years_of_experience.cmp(&b.years_of_experience),
            SortKey::PhoneNumber => a.phone_number.cmp(&b.phone_number),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "firstname" | "first" => Ok(SortKey::FirstName),
            "lastname" | "last" => Ok(SortKey::LastName),
            "city" => Ok(SortKey::City),
            "degree" => Ok(SortKey::Degree),
            "specialties" => Ok(SortKey::Specialties),
            "yearsofexperience" | "years" | "experience" => Ok(SortKey::YearsOfExperience),
            "phonenumber" | "phone" => Ok(SortKey::PhoneNumber),
            _ => Err(format!("unknown column: {}", s)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// Stable in-place sort of `rows`. Equal keys keep their relative order in
/// both directions.
pub fn sort_rows(rows: &mut [Advocate], sort: SortConfig) {
    match sort.direction {
        SortDirection::Ascending => rows.sort_by(|a, b| sort.key.compare(a, b)),
        SortDirection::Descending => rows.sort_by(|a, b| sort.key.compare(b, a)),
    }
}

/// The paging/search/sort inputs chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub page: u32,
    pub page_size: u32,
    /// Committed search text. Typing alone never changes this.
    pub search_text: Option<String>,
    pub sort: Option<SortConfig>,
}

/// A request the caller must send to the server, then report back with
/// [`Action::Loaded`] or [`Action::Failed`] carrying the same `request_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchIntent {
    pub request_id: u64,
    pub page: u32,
    pub page_size: u32,
    pub search_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Initial load.
    Mount,
    /// Commit a search. Blank text is ignored.
    Search(String),
    /// Drop the committed search. Ignored when none is committed.
    ClearSearch,
    /// Choose a page size from the allowed options.
    SetPageSize(u32),
    NextPage,
    PrevPage,
    /// Column header clicked.
    Sort(SortKey),
    ClearSort,
    Loaded {
        request_id: u64,
        rows: Vec<Advocate>,
        total_count: u64,
    },
    Failed {
        request_id: u64,
        message: String,
    },
}

/// Client session: query inputs plus the last response.
#[derive(Debug, Clone)]
pub struct Session {
    query: QueryState,
    page_size_options: Vec<u32>,
    phase: Phase,
    rows: Vec<Advocate>,
    total_count: Option<u64>,
    total_pages: Option<u32>,
    error: Option<String>,
    /// `(page, page_size)` of the rows in `rows`.
    shown_window: Option<(u32, u32)>,
    last_request_id: u64,
}

impl Session {
    /// A fresh session on page 1 using the first allowed page size.
    pub fn new(page_size_options: Vec<u32>) -> Self {
        let page_size_options = if page_size_options.is_empty() {
            vec![5]
        } else {
            page_size_options
        };
        Self {
            query: QueryState {
                page: 1,
                page_size: page_size_options[0],
                search_text: None,
                sort: None,
            },
            page_size_options,
            phase: Phase::Idle,
            rows: Vec::new(),
            total_count: None,
            total_pages: None,
            error: None,
            shown_window: None,
            last_request_id: 0,
        }
    }

    pub fn apply(&mut self, action: Action) -> Option<FetchIntent> {
        match action {
            Action::Mount => Some(self.begin_fetch()),
            Action::Search(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return None;
                }
                self.query.search_text = Some(text.to_string());
                self.query.page = 1;
                Some(self.begin_fetch())
            }
            Action::ClearSearch => {
                self.query.search_text.take()?;
                self.query.page = 1;
                Some(self.begin_fetch())
            }
            Action::SetPageSize(size) => {
                if size == self.query.page_size || !self.page_size_options.contains(&size) {
                    return None;
                }
                self.query.page_size = size;
                self.query.page = 1;
                Some(self.begin_fetch())
            }
            Action::NextPage => {
                if !self.has_next() {
                    return None;
                }
                self.query.page += 1;
                Some(self.begin_fetch())
            }
            Action::PrevPage => {
                if !self.has_prev() {
                    return None;
                }
                self.query.page -= 1;
                Some(self.begin_fetch())
            }
            Action::Sort(key) => {
                let direction = match self.query.sort {
                    Some(SortConfig {
                        key: current,
                        direction: SortDirection::Ascending,
                    }) if current == key => SortDirection::Descending,
                    _ => SortDirection::Ascending,
                };
                self.query.sort = Some(SortConfig { key, direction });
                None
            }
            Action::ClearSort => {
                self.query.sort = None;
                None
            }
            Action::Loaded {
                request_id,
                rows,
                total_count,
            } => {
                if request_id != self.last_request_id {
                    return None;
                }
                self.phase = Phase::Loaded;
                self.total_pages = Some(total_pages(total_count, self.query.page_size));
                self.total_count = Some(total_count);
                self.rows = rows;
                self.error = None;
                self.shown_window = Some((self.query.page, self.query.page_size));
                None
            }
            Action::Failed {
                request_id,
                message,
            } => {
                if request_id != self.last_request_id {
                    return None;
                }
                // The last good page stays in `rows`; the error is reported
                // alongside it, never in place of it. Paging falls back to
                // that page so the footer describes the rows on screen.
                if let Some((page, page_size)) = self.shown_window {
                    self.query.page = page;
                    self.query.page_size = page_size;
                }
                self.phase = Phase::Error;
                self.error = Some(message);
                None
            }
        }
    }

    fn begin_fetch(&mut self) -> FetchIntent {
        self.last_request_id += 1;
        self.phase = Phase::Fetching;
        FetchIntent {
            request_id: self.last_request_id,
            page: self.query.page,
            page_size: self.query.page_size,
            search_text: self.query.search_text.clone(),
        }
    }

    pub fn has_prev(&self) -> bool {
        self.query.page > 1
    }

    /// False until the total page count is known.
    pub fn has_next(&self) -> bool {
        self.total_pages.is_some_and(|total| self.query.page < total)
    }

    /// Loaded rows with the local column sort applied.
    pub fn visible_rows(&self) -> Vec<Advocate> {
        let mut rows = self.rows.clone();
        if let Some(sort) = self.query.sort {
            sort_rows(&mut rows, sort);
        }
        rows
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn page_size_options(&self) -> &[u32] {
        &self.page_size_options
    }

    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True once a response has been applied with zero rows.
    pub fn is_empty_result(&self) -> bool {
        self.total_count.is_some() && self.rows.is_empty()
    }
}
