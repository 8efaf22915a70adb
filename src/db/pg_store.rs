// src/db/pg_store.rs
// DOCUMENTATION: PostgreSQL implementation of JournalStore
// PURPOSE: All SQL lives here

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::db::store::{JournalStore, LOCATION_CONFLICT, USERNAME_CONFLICT};
use crate::errors::JournalError;
use crate::models::*;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Log and wrap a database failure
fn db_error(context: &str, e: sqlx::Error) -> JournalError {
    log::error!("{}: {}", context, e);
    JournalError::DatabaseError(format!("{}: {}", context, e))
}

/// Unique-constraint violations become UniquenessConflict(message)
fn unique_or_db_error(context: &str, message: &str, e: sqlx::Error) -> JournalError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            log::info!("{}: unique constraint rejected the write", context);
            JournalError::UniquenessConflict(message.to_string())
        }
        _ => db_error(context, e),
    }
}

#[async_trait]
impl JournalStore for PgStore {
    async fn create_user(&self, user: &NewUser) -> Result<User, JournalError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_or_db_error("Create user failed", USERNAME_CONFLICT, e))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, JournalError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Fetch user failed", e))
    }

    async fn create_session(
        &self,
        token: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<(), JournalError> {
        let purged = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Purge sessions failed", e))?
            .rows_affected();
        if purged > 0 {
            log::debug!("Purged {} expired sessions", purged);
        }

        sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(token)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Create session failed", e))?;
        Ok(())
    }

    async fn get_session_user(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, JournalError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT u.*
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = $1 AND s.expires_at > $2
            "#,
        )
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Fetch session failed", e))
    }

    async fn delete_session(&self, token: &str) -> Result<(), JournalError> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Delete session failed", e))?;
        Ok(())
    }

    async fn create_theme(&self, user_id: i64, name: &str) -> Result<Theme, JournalError> {
        sqlx::query_as::<_, Theme>(
            r#"
            INSERT INTO themes (name, user_id, created_at)
            VALUES ($1, $2, NOW())
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Create theme failed", e))
    }

    async fn get_theme(&self, id: i64) -> Result<Theme, JournalError> {
        sqlx::query_as::<_, Theme>("SELECT * FROM themes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Fetch theme failed", e))?
            .ok_or_else(|| JournalError::not_found("theme", id))
    }

    async fn list_themes_by_user(&self, user_id: i64) -> Result<Vec<Theme>, JournalError> {
        sqlx::query_as::<_, Theme>(
            "SELECT * FROM themes WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("List themes failed", e))
    }

    async fn create_location(&self, location: &NewLocation) -> Result<Location, JournalError> {
        sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (name, latitude, longitude, theme_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&location.name)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(location.theme_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_or_db_error("Create location failed", LOCATION_CONFLICT, e))
    }

    async fn get_location(&self, id: i64) -> Result<Location, JournalError> {
        sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Fetch location failed", e))?
            .ok_or_else(|| JournalError::not_found("location", id))
    }

    async fn list_locations_by_theme(&self, theme_id: i64) -> Result<Vec<Location>, JournalError> {
        sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE theme_id = $1 ORDER BY id")
            .bind(theme_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("List locations failed", e))
    }

    async fn update_location(
        &self,
        id: i64,
        input: &LocationInput,
    ) -> Result<Location, JournalError> {
        sqlx::query_as::<_, Location>(
            r#"
            UPDATE locations
            SET name = $1, latitude = $2, longitude = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unique_or_db_error("Update location failed", LOCATION_CONFLICT, e))?
        .ok_or_else(|| JournalError::not_found("location", id))
    }

    async fn delete_location(&self, id: i64) -> Result<Vec<Photo>, JournalError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Begin transaction failed", e))?;

        let photos = sqlx::query_as::<_, Photo>("DELETE FROM photos WHERE location_id = $1 RETURNING *")
            .bind(id)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| db_error("Delete location photos failed", e))?;

        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Delete location failed", e))?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls the photo deletes back
            return Err(JournalError::not_found("location", id));
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Commit failed", e))?;

        Ok(photos)
    }

    async fn create_photo(
        &self,
        photo: &NewPhoto,
        location: &LocationChoice,
    ) -> Result<Photo, JournalError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Begin transaction failed", e))?;

        let location_id = match location {
            LocationChoice::Existing(existing) => existing.id,
            LocationChoice::New(new_location) => {
                let (id,): (i64,) = sqlx::query_as(
                    r#"
                    INSERT INTO locations (name, latitude, longitude, theme_id)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id
                    "#,
                )
                .bind(&new_location.name)
                .bind(new_location.latitude)
                .bind(new_location.longitude)
                .bind(new_location.theme_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| unique_or_db_error("Create location failed", LOCATION_CONFLICT, e))?;
                id
            }
        };

        let created = sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photos (image, caption, taken_at, uploaded_at, location_id, theme_id, user_id)
            SELECT $1, $2, $3, NOW(), l.id, l.theme_id, $4
            FROM locations l
            WHERE l.id = $5
            RETURNING *
            "#,
        )
        .bind(&photo.image)
        .bind(&photo.caption)
        .bind(photo.taken_at)
        .bind(photo.user_id)
        .bind(location_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error("Create photo failed", e))?
        .ok_or_else(|| JournalError::not_found("location", location_id))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Commit failed", e))?;

        Ok(created)
    }

    async fn get_photo(&self, id: i64) -> Result<Photo, JournalError> {
        sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Fetch photo failed", e))?
            .ok_or_else(|| JournalError::not_found("photo", id))
    }

    async fn list_photos_by_theme(&self, theme_id: i64) -> Result<Vec<Photo>, JournalError> {
        sqlx::query_as::<_, Photo>(
            r#"
            SELECT * FROM photos
            WHERE theme_id = $1
            ORDER BY taken_at DESC NULLS LAST, id DESC
            "#,
        )
        .bind(theme_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("List photos failed", e))
    }

    async fn count_photos_by_location(&self, location_id: i64) -> Result<usize, JournalError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM photos WHERE location_id = $1")
            .bind(location_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Count photos failed", e))?;
        Ok(count as usize)
    }

    async fn delete_photo(&self, id: i64) -> Result<(), JournalError> {
        let result = sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Delete photo failed", e))?;

        if result.rows_affected() == 0 {
            return Err(JournalError::not_found("photo", id));
        }
        Ok(())
    }
}
