use crate::models::User;
use sqlx::{Pool, Row, Sqlite};

pub async fn add_user(
    pool: &Pool<Sqlite>,
    username: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
    email: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO users (username, first_name, last_name, email) VALUES (?, ?, ?, ?)",
    )
    .bind(username)
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn get_user(pool: &Pool<Sqlite>, id: i64) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT id, username, first_name, last_name, email FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| User {
        id: row.get("id"),
        username: row.get("username"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
    }))
}
