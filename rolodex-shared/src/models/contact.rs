/// Contact model and database operations
///
/// The contacts table is the record of truth for the address book. Two
/// invariants hold at all times: no two rows share a `contact` value and no
/// two rows share an `email` value. The API performs a pre-write duplicate
/// lookup, and the table's unique constraints act as the final backstop for
/// the window between check and write.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE contacts (
///     id SERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     contact VARCHAR(9) NOT NULL UNIQUE,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     picture VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Contact record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contact {
    /// Store-assigned id
    pub id: i32,

    /// Display name
    pub name: String,

    /// Phone-like contact number, exactly 9 characters, unique
    pub contact: String,

    /// Email address, unique
    pub email: String,

    /// Filename of the uploaded picture, relative to the upload directory
    pub picture: String,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new contact
///
/// All fields are required; `picture` is the stored filename produced by the
/// file intake, not client-supplied.
#[derive(Debug, Clone)]
pub struct CreateContact {
    pub name: String,
    pub contact: String,
    pub email: String,
    pub picture: String,
}

/// Input for updating an existing contact
///
/// Every mutable field is written on update. `picture` carries either the
/// freshly stored filename or the row's prior value when no new file was
/// attached; resolving which is the caller's job.
#[derive(Debug, Clone)]
pub struct UpdateContact {
    pub name: String,
    pub contact: String,
    pub email: String,
    pub picture: String,
}

impl Contact {
    /// Creates a new contact and returns the canonical stored row
    ///
    /// `RETURNING *` captures the store-assigned id and timestamps in the
    /// same statement, so the response shape always matches a later fetch.
    ///
    /// # Errors
    ///
    /// Returns an error if a unique constraint is violated (duplicate
    /// `contact` or `email` that slipped past the pre-write check) or the
    /// database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateContact) -> Result<Self, sqlx::Error> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (name, contact, email, picture)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, contact, email, picture, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.contact)
        .bind(data.email)
        .bind(data.picture)
        .fetch_one(pool)
        .await?;

        Ok(contact)
    }

    /// Lists all contacts, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let contacts = sqlx::query_as::<_, Contact>(
            r#"
            SELECT id, name, contact, email, picture, created_at, updated_at
            FROM contacts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(contacts)
    }

    /// Finds a contact by id
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            SELECT id, name, contact, email, picture, created_at, updated_at
            FROM contacts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(contact)
    }

    /// Looks up any row already holding the given `contact` or `email`
    ///
    /// This is the pre-write duplicate check for creates. It is a
    /// point-in-time query, not a transactional guarantee: a concurrent
    /// insert between this check and the write is possible and is caught by
    /// the table's unique constraints instead.
    pub async fn find_conflicting(
        pool: &PgPool,
        contact: &str,
        email: &str,
    ) -> Result<Option<i32>, sqlx::Error> {
        let row: Option<(i32,)> = sqlx::query_as(
            r#"
            SELECT id FROM contacts
            WHERE contact = $1 OR email = $2
            LIMIT 1
            "#,
        )
        .bind(contact)
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|(id,)| id))
    }

    /// Like [`find_conflicting`](Self::find_conflicting), but ignores the row
    /// being edited
    pub async fn find_conflicting_excluding(
        pool: &PgPool,
        contact: &str,
        email: &str,
        exclude_id: i32,
    ) -> Result<Option<i32>, sqlx::Error> {
        let row: Option<(i32,)> = sqlx::query_as(
            r#"
            SELECT id FROM contacts
            WHERE (contact = $1 OR email = $2) AND id != $3
            LIMIT 1
            "#,
        )
        .bind(contact)
        .bind(email)
        .bind(exclude_id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|(id,)| id))
    }

    /// Updates every mutable field of a contact and returns the stored row
    ///
    /// `updated_at` is bumped by the statement itself. Returns `None` when no
    /// row exists for the id.
    pub async fn update(
        pool: &PgPool,
        id: i32,
        data: UpdateContact,
    ) -> Result<Option<Self>, sqlx::Error> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            UPDATE contacts
            SET name = $2, contact = $3, email = $4, picture = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, contact, email, picture, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.contact)
        .bind(data.email)
        .bind(data.picture)
        .fetch_optional(pool)
        .await?;

        Ok(contact)
    }

    /// Deletes a contact by id
    ///
    /// Returns true if a row was deleted, false if the id did not exist.
    pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
