//! `advdir search`: run a directory query against the local database and
//! print one page.

use anyhow::Result;

use crate::assemble::{self, PageResult};
use crate::config::Config;
use crate::db;
use crate::query::{OrderBy, PageRequest, Predicate};

pub async fn run_search(
    config: &Config,
    text: Option<&str>,
    page: u32,
    page_size: Option<u32>,
    order_by: &str,
) -> Result<()> {
    let page_size = page_size.unwrap_or_else(|| config.pagination.default_page_size());
    let request = PageRequest::new(page, page_size, config.pagination.max_page_size)?;
    let order_by: OrderBy = order_by.parse()?;
    let predicate = Predicate::build(text);

    let pool = db::connect(config).await?;
    let result =
        assemble::fetch_page(&pool, &predicate, request, order_by, &config.search).await;
    pool.close().await;

    print_page(&result?);
    Ok(())
}

fn print_page(result: &PageResult) {
    if result.total_count == 0 {
        println!("No results match your search criteria.");
        return;
    }

    println!(
        "Page {} of {} ({} matching advocate{})",
        result.page,
        result.total_pages,
        result.total_count,
        if result.total_count == 1 { "" } else { "s" }
    );
    println!();

    if result.rows.is_empty() {
        println!("  (page is past the last result)");
        return;
    }

    for advocate in &result.rows {
        println!(
            "{:>5}. {} {} / {}",
            advocate.id, advocate.first_name, advocate.last_name, advocate.city
        );
        println!(
            "       {}, {} yrs, phone {}",
            advocate.degree, advocate.years_of_experience, advocate.phone_number
        );
        if !advocate.specialties.is_empty() {
            println!("       specialties: {}", advocate.specialties.join("; "));
        }
    }
    println!();
}
