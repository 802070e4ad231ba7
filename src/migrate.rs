//! The directory schema: the `advocates` table and its FTS5 search index.
//!
//! The schema is declared once here and applied at startup (`advdir init`,
//! `advdir serve`). Every statement is idempotent.

use anyhow::Result;
use sqlx::SqlitePool;

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS advocates (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            city TEXT NOT NULL,
            degree TEXT NOT NULL,
            specialties TEXT NOT NULL DEFAULT '[]',
            years_of_experience INTEGER NOT NULL CHECK (years_of_experience >= 0),
            phone_number INTEGER NOT NULL,
            created_at INTEGER NOT NULL DEFAULT (CAST(strftime('%s', 'now') AS INTEGER))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS advocates_immutable
        BEFORE UPDATE OF id, created_at ON advocates
        WHEN new.id IS NOT old.id OR new.created_at IS NOT old.created_at
        BEGIN
            SELECT RAISE(ABORT, 'advocate id and created_at are immutable');
        END
        "#,
    )
    .execute(pool)
    .await?;

    // FTS5 CREATE is not idempotent natively, so we check first
    let fts_exists: bool = sqlx::query_scalar(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='advocates_fts'",
    )
    .fetch_one(pool)
    .await?;

    if !fts_exists {
        sqlx::query(
            r#"
            CREATE VIRTUAL TABLE advocates_fts USING fts5(
                first_name,
                last_name,
                city,
                content='advocates',
                content_rowid='id'
            )
            "#,
        )
        .execute(pool)
        .await?;

        // Index rows that were inserted before the index existed.
        sqlx::query("INSERT INTO advocates_fts(advocates_fts) VALUES ('rebuild')")
            .execute(pool)
            .await?;
    }

    // The index is external-content: these triggers are its only writers.
    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS advocates_fts_insert
        AFTER INSERT ON advocates
        BEGIN
            INSERT INTO advocates_fts(rowid, first_name, last_name, city)
            VALUES (new.id, new.first_name, new.last_name, new.city);
        END
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS advocates_fts_delete
        AFTER DELETE ON advocates
        BEGIN
            INSERT INTO advocates_fts(advocates_fts, rowid, first_name, last_name, city)
            VALUES ('delete', old.id, old.first_name, old.last_name, old.city);
        END
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS advocates_fts_update
        AFTER UPDATE OF first_name, last_name, city ON advocates
        BEGIN
            INSERT INTO advocates_fts(advocates_fts, rowid, first_name, last_name, city)
            VALUES ('delete', old.id, old.first_name, old.last_name, old.city);
            INSERT INTO advocates_fts(rowid, first_name, last_name, city)
            VALUES (new.id, new.first_name, new.last_name, new.city);
        END
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("schema migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let tmp = TempDir::new().unwrap();
        let pool = db::connect_path(&tmp.path().join("dir.sqlite")).await.unwrap();

        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE name IN ('advocates', 'advocates_fts')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 2);
    }

    #[tokio::test]
    async fn test_index_follows_text_updates() {
        let tmp = TempDir::new().unwrap();
        let pool = db::connect_path(&tmp.path().join("dir.sqlite")).await.unwrap();
        run_migrations(&pool).await.unwrap();

        sqlx::query(
            "INSERT INTO advocates (first_name, last_name, city, degree, years_of_experience, phone_number)
             VALUES ('Ada', 'Lovelace', 'London', 'PhD', 12, 5551234567)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let count = |term: &'static str| {
            let pool = pool.clone();
            async move {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM advocates_fts WHERE advocates_fts MATCH ?",
                )
                .bind(term)
                .fetch_one(&pool)
                .await
                .unwrap()
            }
        };
        assert_eq!(count("london").await, 1);

        sqlx::query("UPDATE advocates SET city = 'Paris' WHERE first_name = 'Ada'")
            .execute(&pool)
            .await
            .unwrap();
        assert_eq!(count("london").await, 0);
        assert_eq!(count("paris").await, 1);

        sqlx::query("DELETE FROM advocates").execute(&pool).await.unwrap();
        assert_eq!(count("paris").await, 0);
    }

    #[tokio::test]
    async fn test_id_and_created_at_are_immutable() {
        let tmp = TempDir::new().unwrap();
        let pool = db::connect_path(&tmp.path().join("dir.sqlite")).await.unwrap();
        run_migrations(&pool).await.unwrap();

        sqlx::query(
            "INSERT INTO advocates (first_name, last_name, city, degree, years_of_experience, phone_number)
             VALUES ('Ada', 'Lovelace', 'London', 'PhD', 12, 5551234567)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let result = sqlx::query("UPDATE advocates SET created_at = 0")
            .execute(&pool)
            .await;
        assert!(result.is_err());

        let result = sqlx::query("UPDATE advocates SET id = 99")
            .execute(&pool)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_negative_experience_rejected() {
        let tmp = TempDir::new().unwrap();
        let pool = db::connect_path(&tmp.path().join("dir.sqlite")).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let result = sqlx::query(
            "INSERT INTO advocates (first_name, last_name, city, degree, years_of_experience, phone_number)
             VALUES ('Ada', 'Lovelace', 'London', 'PhD', -1, 5551234567)",
        )
        .execute(&pool)
        .await;
        assert!(result.is_err());
    }
}
