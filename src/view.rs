//! Plain-text rendering of a [`Session`] as a table with a paging footer.

use crate::models::Advocate;
use crate::session::{Phase, Session, SortDirection, SortKey};

/// Shown instead of an empty table when a search matches nothing.
pub const NO_RESULTS: &str = "No results match your search criteria.";

const WIDTHS: [usize; 7] = [12, 12, 16, 8, 40, 6, 12];

/// Renders the full view: search line, header, rows or status line, footer.
pub fn render(session: &Session) -> String {
    let mut out = String::new();
    let query = session.query();

    if let Some(text) = &query.search_text {
        out.push_str(&format!("Search: \"{}\"\n", text));
    }

    out.push_str(&header_line(session));
    out.push('\n');
    out.push_str(&"-".repeat(WIDTHS.iter().sum::<usize>() + 2 * (WIDTHS.len() - 1)));
    out.push('\n');

    // Rows from an earlier response stay visible under the marker while a
    // newer request is in flight.
    let rows = session.visible_rows();
    let phase = session.phase();
    if phase == Phase::Fetching || (phase == Phase::Idle && rows.is_empty()) {
        out.push_str("Loading...\n");
    }
    for advocate in &rows {
        out.push_str(&row_line(advocate));
        out.push('\n');
    }
    if session.is_empty_result() && phase == Phase::Loaded {
        out.push_str(NO_RESULTS);
        out.push('\n');
    }

    if let Some(err) = session.error() {
        out.push_str(&format!("! {}\n", err));
    }

    out.push('\n');
    out.push_str(&footer_line(session));
    out.push('\n');
    out
}

fn header_line(session: &Session) -> String {
    let sort = session.query().sort;
    let cells: Vec<String> = SortKey::ALL
        .iter()
        .zip(WIDTHS)
        .map(|(key, width)| {
            let marker = match sort {
                Some(s) if s.key == *key => match s.direction {
                    SortDirection::Ascending => " ^",
                    SortDirection::Descending => " v",
                },
                _ => "",
            };
            cell(&format!("{}{}", key.title(), marker), width)
        })
        .collect();
    cells.join("  ").trim_end().to_string()
}

fn row_line(advocate: &Advocate) -> String {
    let values = [
        advocate.first_name.clone(),
        advocate.last_name.clone(),
        advocate.city.clone(),
        advocate.degree.clone(),
        advocate.specialties.join(", "),
        advocate.years_of_experience.to_string(),
        advocate.phone_number.to_string(),
    ];
    let cells: Vec<String> = values
        .iter()
        .zip(WIDTHS)
        .map(|(value, width)| cell(value, width))
        .collect();
    cells.join("  ").trim_end().to_string()
}

/// Pads or truncates `text` to exactly `width` characters.
fn cell(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{:<width$}", text, width = width)
    } else {
        let mut truncated: String = text.chars().take(width.saturating_sub(3)).collect();
        truncated.push_str("...");
        truncated
    }
}

/// `page X of Y` (Y is `-` until known), page size, and which of Prev/Next
/// are available.
pub fn footer_line(session: &Session) -> String {
    let query = session.query();
    let total = session
        .total_pages()
        .map(|t| t.to_string())
        .unwrap_or_else(|| "-".to_string());
    let options: Vec<String> = session
        .page_size_options()
        .iter()
        .map(|size| {
            if *size == query.page_size {
                format!("[{}]", size)
            } else {
                size.to_string()
            }
        })
        .collect();
    let prev = if session.has_prev() { "<prev" } else { "     " };
    let next = if session.has_next() { "next>" } else { "     " };
    format!(
        "{} of {}   size: {}   {} {}",
        query.page,
        total,
        options.join(" "),
        prev,
        next
    )
    .trim_end()
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Action;
    use chrono::DateTime;

    fn advocate(id: i64, first: &str) -> Advocate {
        Advocate {
            id,
            first_name: first.to_string(),
            last_name: "Smith".to_string(),
            city: "Austin".to_string(),
            degree: "MD".to_string(),
            specialties: vec!["Bipolar".to_string(), "LGBTQ".to_string()],
            years_of_experience: 3,
            phone_number: 5559876543,
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    fn load(session: &mut Session, rows: Vec<Advocate>, total_count: u64) {
        let intent = session.apply(Action::Mount).unwrap();
        session.apply(Action::Loaded {
            request_id: intent.request_id,
            rows,
            total_count,
        });
    }

    #[test]
    fn test_loading_before_first_response() {
        let mut session = Session::new(vec![5, 10]);
        session.apply(Action::Mount);
        let out = render(&session);
        assert!(out.contains("Loading..."));
        assert!(out.contains("1 of -"));
    }

    #[test]
    fn test_loading_marker_over_previous_rows() {
        let mut session = Session::new(vec![5, 10]);
        load(&mut session, vec![advocate(1, "Jane"), advocate(2, "John")], 7);
        assert!(!render(&session).contains("Loading..."));

        session.apply(Action::NextPage).unwrap();
        let out = render(&session);
        assert!(out.contains("Loading..."));
        assert!(out.contains("Jane"));
        assert!(!out.contains(NO_RESULTS));
    }

    #[test]
    fn test_rows_and_footer() {
        let mut session = Session::new(vec![5, 10]);
        load(&mut session, vec![advocate(1, "Jane"), advocate(2, "John")], 7);
        let out = render(&session);
        assert!(out.contains("Jane"));
        assert!(out.contains("Bipolar, LGBTQ"));
        assert!(out.contains("5559876543"));
        assert!(out.contains("1 of 2"));
        assert!(out.contains("[5] 10"));
        assert!(out.contains("next>"));
        assert!(!out.contains("<prev"));
        assert!(!out.contains(NO_RESULTS));
    }

    #[test]
    fn test_no_results_message() {
        let mut session = Session::new(vec![5]);
        load(&mut session, Vec::new(), 0);
        let out = render(&session);
        assert!(out.contains(NO_RESULTS));
        assert!(out.contains("1 of 1"));
    }

    #[test]
    fn test_error_is_distinct_from_empty() {
        let mut session = Session::new(vec![5]);
        let intent = session.apply(Action::Mount).unwrap();
        session.apply(Action::Failed {
            request_id: intent.request_id,
            message: "Failed to fetch advocates.".to_string(),
        });
        let out = render(&session);
        assert!(out.contains("! Failed to fetch advocates."));
        assert!(!out.contains(NO_RESULTS));
    }

    #[test]
    fn test_sort_marker_in_header() {
        let mut session = Session::new(vec![5]);
        load(&mut session, vec![advocate(1, "Jane")], 1);
        session.apply(Action::Sort(SortKey::City));
        assert!(render(&session).contains("City ^"));
        session.apply(Action::Sort(SortKey::City));
        assert!(render(&session).contains("City v"));
    }

    #[test]
    fn test_cell_truncates_long_text() {
        assert_eq!(cell("abcdefghij", 6), "abc...");
        assert_eq!(cell("ab", 4), "ab  ");
    }
}
