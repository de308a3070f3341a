//! `SQLite` implementation of [`BlockedSlotRepository`].

use std::future::Future;

use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use turfbook_app::ports::BlockedSlotRepository;
use turfbook_domain::blocked_slot::BlockedSlot;
use turfbook_domain::error::TurfBookError;
use turfbook_domain::id::{BlockedSlotId, TurfId};

use crate::decode;
use crate::error::StorageError;

struct Wrapper(BlockedSlot);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let turf_id: uuid::Uuid = row.try_get("turf_id")?;
        let date: String = row.try_get("date")?;
        let start: String = row.try_get("start_time")?;
        let end: String = row.try_get("end_time")?;

        Ok(Self(BlockedSlot {
            id: BlockedSlotId::from_uuid(id),
            turf_id: TurfId::from_uuid(turf_id),
            date: decode::date(&date)?,
            interval: decode::interval(&start, &end)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO blocked_slots (id, turf_id, date, start_time, end_time)
    VALUES (?, ?, ?, ?, ?)
";

const SELECT_BY_TURF_AND_DATE: &str = r"
    SELECT * FROM blocked_slots
    WHERE turf_id = ? AND date = ?
    ORDER BY start_time ASC
";

/// `SQLite`-backed blocked slot repository.
#[derive(Clone)]
pub struct SqliteBlockedSlotRepository {
    pool: SqlitePool,
}

impl SqliteBlockedSlotRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl BlockedSlotRepository for SqliteBlockedSlotRepository {
    fn find_by_turf_and_date(
        &self,
        turf_id: TurfId,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<BlockedSlot>, TurfBookError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_TURF_AND_DATE)
                .bind(turf_id.as_uuid())
                .bind(decode::encode_date(date))
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn create(
        &self,
        blocked: BlockedSlot,
    ) -> impl Future<Output = Result<BlockedSlot, TurfBookError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT)
                .bind(blocked.id.as_uuid())
                .bind(blocked.turf_id.as_uuid())
                .bind(decode::encode_date(blocked.date))
                .bind(decode::encode_time(blocked.interval.start()))
                .bind(decode::encode_time(blocked.interval.end()))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(blocked)
        }
    }
}
