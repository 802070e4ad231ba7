//! Bootstrap dataset and bulk insertion.
//!
//! Used by `advdir seed` and `POST /seed`. Seeding appends; running it twice
//! stores the dataset twice under new ids.

use anyhow::{Context, Result};
use chrono::DateTime;
use sqlx::{Row, SqlitePool};

use crate::models::{Advocate, NewAdvocate};

/// Inserts `advocates` in one transaction and returns the stored rows, in
/// input order, with their assigned ids and creation timestamps.
pub async fn insert_advocates(
    pool: &SqlitePool,
    advocates: &[NewAdvocate],
) -> Result<Vec<Advocate>> {
    let mut tx = pool.begin().await?;
    let mut stored = Vec::with_capacity(advocates.len());

    for new in advocates {
        let specialties = serde_json::to_string(&new.specialties)?;
        let row = sqlx::query(
            r#"
            INSERT INTO advocates (first_name, last_name, city, degree, specialties,
                                   years_of_experience, phone_number)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, created_at
            "#,
        )
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.city)
        .bind(&new.degree)
        .bind(&specialties)
        .bind(i64::from(new.years_of_experience))
        .bind(new.phone_number)
        .fetch_one(&mut *tx)
        .await
        .with_context(|| format!("Failed to insert {} {}", new.first_name, new.last_name))?;

        let id: i64 = row.get("id");
        let created_ts: i64 = row.get("created_at");
        let created_at = DateTime::from_timestamp(created_ts, 0)
            .with_context(|| format!("created_at out of range for advocate {}", id))?;

        stored.push(Advocate {
            id,
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            city: new.city.clone(),
            degree: new.degree.clone(),
            specialties: new.specialties.clone(),
            years_of_experience: new.years_of_experience,
            phone_number: new.phone_number,
            created_at,
        });
    }

    tx.commit().await?;
    tracing::info!(inserted = stored.len(), "inserted advocates");
    Ok(stored)
}

/// Inserts the bootstrap dataset.
pub async fn run_seed(pool: &SqlitePool) -> Result<Vec<Advocate>> {
    insert_advocates(pool, &bootstrap_advocates()).await
}

const SPECIALTIES: &[&str] = &[
    "Bipolar",
    "LGBTQ",
    "Medication/Prescribing",
    "Suicide History/Attempts",
    "General Mental Health (anxiety, depression, stress, grief, life transitions)",
    "Men's issues",
    "Relationship Issues (family, friends, couple, etc)",
    "Trauma & PTSD",
    "Personality disorders",
    "Personal growth",
    "Substance use/abuse",
    "Pediatrics",
    "Women's issues (post-partum, infertility, family planning)",
    "Chronic pain",
    "Weight loss & nutrition",
    "Eating disorders",
    "Diabetic Diet and nutrition",
    "Coaching (leadership, career, academic and wellness)",
    "Life coaching",
    "Obsessive-compulsive disorders",
    "Neuropsychological evaluations & testing (ADHD testing)",
    "Attention and Hyperactivity (ADHD)",
    "Sleep issues",
    "Schizophrenia and psychotic disorders",
    "Learning disorders",
    "Domestic abuse",
];

/// (first name, last name, city, degree, years of experience, phone number)
const PEOPLE: &[(&str, &str, &str, &str, u32, i64)] = &[
    ("John", "Doe", "New York", "MD", 10, 5551234567),
    ("Jane", "Smith", "Los Angeles", "PhD", 8, 5559876543),
    ("Alice", "Johnson", "Chicago", "MSW", 5, 5554567890),
    ("Michael", "Brown", "Houston", "MD", 12, 5556543210),
    ("Emily", "Davis", "Phoenix", "PhD", 7, 5553210987),
    ("Chris", "Martinez", "Philadelphia", "MSW", 9, 5557890123),
    ("Jessica", "Taylor", "San Antonio", "MD", 11, 5554561234),
    ("David", "Harris", "San Diego", "PhD", 6, 5557896543),
    ("Laura", "Clark", "Dallas", "MSW", 4, 5550123456),
    ("Daniel", "Lewis", "San Jose", "MD", 13, 5553217654),
    ("Sarah", "Lee", "Austin", "PhD", 10, 5551238765),
    ("James", "King", "Jacksonville", "MSW", 5, 5556540987),
    ("Megan", "Green", "San Francisco", "MD", 14, 5559873456),
    ("Joshua", "Walker", "Columbus", "PhD", 9, 5556781234),
    ("Amanda", "Hall", "Fort Worth", "MSW", 3, 5559872345),
    ("Patrick", "O'Brien", "Boston", "MD", 15, 5552349876),
];

/// The fixed bootstrap dataset. Specialties are assigned deterministically
/// so every run produces identical rows.
pub fn bootstrap_advocates() -> Vec<NewAdvocate> {
    PEOPLE
        .iter()
        .enumerate()
        .map(|(i, (first, last, city, degree, years, phone))| {
            let count = 1 + i % 3;
            let specialties = (0..count)
                .map(|k| SPECIALTIES[(i * 5 + k * 7) % SPECIALTIES.len()].to_string())
                .collect();
            NewAdvocate {
                first_name: first.to_string(),
                last_name: last.to_string(),
                city: city.to_string(),
                degree: degree.to_string(),
                specialties,
                years_of_experience: *years,
                phone_number: *phone,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db, migrate};
    use tempfile::TempDir;

    #[test]
    fn test_bootstrap_is_deterministic() {
        assert_eq!(bootstrap_advocates(), bootstrap_advocates());
        assert_eq!(bootstrap_advocates().len(), PEOPLE.len());
    }

    #[test]
    fn test_bootstrap_specialties_are_distinct_per_advocate() {
        for advocate in bootstrap_advocates() {
            let mut s = advocate.specialties.clone();
            s.sort();
            s.dedup();
            assert_eq!(s.len(), advocate.specialties.len());
        }
    }

    #[tokio::test]
    async fn test_seed_assigns_increasing_ids() {
        let tmp = TempDir::new().unwrap();
        let pool = db::connect_path(&tmp.path().join("dir.sqlite")).await.unwrap();
        migrate::run_migrations(&pool).await.unwrap();

        let first = run_seed(&pool).await.unwrap();
        let second = run_seed(&pool).await.unwrap();
        assert_eq!(first.len(), PEOPLE.len());

        let ids: Vec<i64> = first.iter().chain(second.iter()).map(|a| a.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(first[1].first_name, "Jane");
        assert_eq!(first[1].phone_number, 5559876543);
    }
}
