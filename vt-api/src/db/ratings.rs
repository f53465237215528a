//! Rating queries
//!
//! One feedback score per user, upsert semantics.

use sqlx::{Pool, Sqlite};
use vt_common::Result;

/// Current rating for a user, `None` if they never rated
pub async fn rating_for(db: &Pool<Sqlite>, email: &str) -> Result<Option<f64>> {
    let value: Option<f64> = sqlx::query_scalar(
        r#"
        SELECT value FROM ratings WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;

    Ok(value)
}

/// Insert or update a user's rating
pub async fn upsert_rating(db: &Pool<Sqlite>, email: &str, value: f64) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO ratings (email, value)
        VALUES (?, ?)
        ON CONFLICT (email) DO UPDATE SET value = excluded.value
        "#,
    )
    .bind(email)
    .bind(value)
    .execute(db)
    .await?;

    Ok(())
}
