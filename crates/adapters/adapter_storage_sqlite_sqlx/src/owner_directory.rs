//! `SQLite` implementation of [`OwnerDirectory`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use turfbook_app::ports::OwnerDirectory;
use turfbook_domain::error::TurfBookError;
use turfbook_domain::id::OwnerId;
use turfbook_domain::owner::Owner;

use crate::error::StorageError;

struct Wrapper(Owner);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        Ok(Self(Owner {
            id: OwnerId::from_uuid(id),
            name: row.try_get("name")?,
            phone: row.try_get("phone")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO owners (id, name, phone) VALUES (?, ?, ?)
    ON CONFLICT (id) DO UPDATE SET name = excluded.name, phone = excluded.phone
";
const SELECT_BY_ID: &str = "SELECT * FROM owners WHERE id = ?";

/// `SQLite`-backed mirror of the user directory.
#[derive(Clone)]
pub struct SqliteOwnerDirectory {
    pool: SqlitePool,
}

impl SqliteOwnerDirectory {
    /// Create a new directory using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register or refresh an owner record.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the write fails.
    pub async fn insert(&self, owner: &Owner) -> Result<(), TurfBookError> {
        sqlx::query(INSERT)
            .bind(owner.id.as_uuid())
            .bind(&owner.name)
            .bind(owner.phone.as_deref())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }
}

impl OwnerDirectory for SqliteOwnerDirectory {
    fn lookup_owner(
        &self,
        id: OwnerId,
    ) -> impl Future<Output = Result<Option<Owner>, TurfBookError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.as_uuid())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|w| w.0))
        }
    }
}
