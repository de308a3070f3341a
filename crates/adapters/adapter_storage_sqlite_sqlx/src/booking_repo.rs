//! `SQLite` implementation of [`BookingRepository`].

use std::future::Future;

use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use turfbook_app::ports::BookingRepository;
use turfbook_domain::booking::Booking;
use turfbook_domain::error::{ConflictError, TurfBookError};
use turfbook_domain::id::{BookingId, TurfId};

use crate::decode;
use crate::error::StorageError;

struct Wrapper(Booking);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let turf_id: uuid::Uuid = row.try_get("turf_id")?;
        let date: String = row.try_get("date")?;
        let start: String = row.try_get("slot_start")?;
        let end: String = row.try_get("slot_end")?;

        Ok(Self(Booking {
            id: BookingId::from_uuid(id),
            turf_id: TurfId::from_uuid(turf_id),
            date: decode::date(&date)?,
            interval: decode::interval(&start, &end)?,
        }))
    }
}

// The overlap guard and the insert are one statement, so two writers racing
// for the same slot cannot both succeed.
const INSERT_EXCLUSIVE: &str = r"
    INSERT INTO bookings (id, turf_id, date, slot_start, slot_end)
    SELECT ?1, ?2, ?3, ?4, ?5
    WHERE NOT EXISTS (
        SELECT 1 FROM bookings
        WHERE turf_id = ?2 AND date = ?3 AND slot_start < ?5 AND slot_end > ?4
    )
    AND NOT EXISTS (
        SELECT 1 FROM blocked_slots
        WHERE turf_id = ?2 AND date = ?3 AND start_time < ?5 AND end_time > ?4
    )
";

const SELECT_BY_TURF_AND_DATE: &str = r"
    SELECT * FROM bookings
    WHERE turf_id = ? AND date = ?
    ORDER BY slot_start ASC
";

const SELECT_BY_TURF_FROM: &str = r"
    SELECT * FROM bookings
    WHERE turf_id = ? AND date >= ?
    ORDER BY date ASC, slot_start ASC
";

/// `SQLite`-backed booking repository.
#[derive(Clone)]
pub struct SqliteBookingRepository {
    pool: SqlitePool,
}

impl SqliteBookingRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl BookingRepository for SqliteBookingRepository {
    fn find_by_turf_and_date(
        &self,
        turf_id: TurfId,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Booking>, TurfBookError>> + Send {
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

    fn find_by_turf_from(
        &self,
        turf_id: TurfId,
        from: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Booking>, TurfBookError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_TURF_FROM)
                .bind(turf_id.as_uuid())
                .bind(decode::encode_date(from))
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn insert_exclusive(
        &self,
        booking: Booking,
    ) -> impl Future<Output = Result<Booking, TurfBookError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(INSERT_EXCLUSIVE)
                .bind(booking.id.as_uuid())
                .bind(booking.turf_id.as_uuid())
                .bind(decode::encode_date(booking.date))
                .bind(decode::encode_time(booking.interval.start()))
                .bind(decode::encode_time(booking.interval.end()))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(ConflictError::OverlappingBooking {
                    turf_id: booking.turf_id.to_string(),
                    date: booking.date,
                }
                .into());
            }
            Ok(booking)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{hm, seed_turf, setup_db};
    use turfbook_app::ports::BlockedSlotRepository;
    use turfbook_domain::blocked_slot::BlockedSlot;
    use turfbook_domain::interval::TimeInterval;

    use chrono::NaiveTime;

    use crate::blocked_slot_repo::SqliteBlockedSlotRepository;
    use crate::pool::Config;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn slot(start: u32, end: u32) -> TimeInterval {
        TimeInterval::new(hm(start, 0), hm(end, 0)).unwrap()
    }

    #[tokio::test]
    async fn should_insert_and_find_booking() {
        let db = setup_db().await;
        let turf = seed_turf(&db, "Green Field").await;
        let repo = SqliteBookingRepository::new(db.pool().clone());

        let booking = repo
            .insert_exclusive(Booking::new(turf.id, date(), slot(18, 19)))
            .await
            .unwrap();

        let found = repo.find_by_turf_and_date(turf.id, date()).await.unwrap();
        assert_eq!(found, vec![booking]);
    }

    #[tokio::test]
    async fn should_refuse_overlapping_insert() {
        let db = setup_db().await;
        let turf = seed_turf(&db, "Green Field").await;
        let repo = SqliteBookingRepository::new(db.pool().clone());
        repo.insert_exclusive(Booking::new(turf.id, date(), slot(18, 19)))
            .await
            .unwrap();

        let overlapping = TimeInterval::new(hm(18, 30), hm(19, 30)).unwrap();
        let result = repo
            .insert_exclusive(Booking::new(turf.id, date(), overlapping))
            .await;

        assert!(matches!(
            result,
            Err(TurfBookError::Conflict(ConflictError::OverlappingBooking { .. }))
        ));
        assert_eq!(
            repo.find_by_turf_and_date(turf.id, date())
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn should_allow_adjacent_and_other_day_inserts() {
        let db = setup_db().await;
        let turf = seed_turf(&db, "Green Field").await;
        let repo = SqliteBookingRepository::new(db.pool().clone());
        repo.insert_exclusive(Booking::new(turf.id, date(), slot(18, 19)))
            .await
            .unwrap();

        repo.insert_exclusive(Booking::new(turf.id, date(), slot(19, 20)))
            .await
            .unwrap();
        repo.insert_exclusive(Booking::new(turf.id, date().succ_opt().unwrap(), slot(18, 19)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn should_refuse_insert_into_blocked_window() {
        let db = setup_db().await;
        let turf = seed_turf(&db, "Green Field").await;
        let repo = SqliteBookingRepository::new(db.pool().clone());
        SqliteBlockedSlotRepository::new(db.pool().clone())
            .create(BlockedSlot::new(turf.id, date(), slot(12, 15)))
            .await
            .unwrap();

        let result = repo
            .insert_exclusive(Booking::new(turf.id, date(), slot(14, 15)))
            .await;

        assert!(matches!(result, Err(TurfBookError::Conflict(_))));
    }

    #[tokio::test]
    async fn should_store_sub_second_bounds_exactly() {
        let db = setup_db().await;
        let turf = seed_turf(&db, "Green Field").await;
        let repo = SqliteBookingRepository::new(db.pool().clone());
        let at = |h, m, s, ms| NaiveTime::from_hms_milli_opt(h, m, s, ms).unwrap();
        let shifted = TimeInterval::new(at(9, 0, 0, 500), at(10, 0, 0, 500)).unwrap();
        let narrow = TimeInterval::new(at(18, 0, 0, 200), at(18, 0, 0, 700)).unwrap();

        repo.insert_exclusive(Booking::new(turf.id, date(), shifted))
            .await
            .unwrap();
        repo.insert_exclusive(Booking::new(turf.id, date(), narrow))
            .await
            .unwrap();

        let stored: Vec<TimeInterval> = repo
            .find_by_turf_and_date(turf.id, date())
            .await
            .unwrap()
            .into_iter()
            .map(|booking| booking.interval)
            .collect();
        assert!(stored.contains(&shifted));
        assert!(stored.contains(&narrow));

        let touching = TimeInterval::new(at(10, 0, 0, 500), at(11, 0, 0, 0)).unwrap();
        repo.insert_exclusive(Booking::new(turf.id, date(), touching))
            .await
            .unwrap();
        let clipping = TimeInterval::new(at(10, 0, 0, 0), at(10, 0, 0, 400)).unwrap();
        assert!(
            repo.insert_exclusive(Booking::new(turf.id, date(), clipping))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn should_accept_one_of_many_concurrent_inserts_on_file_database() {
        let path = std::env::temp_dir().join(format!("turfbook-{}.db", uuid::Uuid::new_v4()));
        let db = Config {
            database_url: format!("sqlite:{}", path.display()),
        }
        .build()
        .await
        .unwrap();
        let turf = seed_turf(&db, "Green Field").await;

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..16 {
            let repo = SqliteBookingRepository::new(db.pool().clone());
            let booking = Booking::new(turf.id, date(), slot(18, 19));
            tasks.spawn(async move { repo.insert_exclusive(booking).await });
        }
        let (mut accepted, mut conflicts) = (0, 0);
        while let Some(result) = tasks.join_next().await {
            match result.unwrap() {
                Ok(_) => accepted += 1,
                Err(TurfBookError::Conflict(ConflictError::OverlappingBooking { .. })) => {
                    conflicts += 1;
                }
                Err(err) => panic!("unexpected error: {err}"),
            }
        }

        let stored = SqliteBookingRepository::new(db.pool().clone())
            .find_by_turf_and_date(turf.id, date())
            .await
            .unwrap();
        db.pool().close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
        }

        assert_eq!((accepted, conflicts), (1, 15));
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn should_find_bookings_from_date_onwards() {
        let db = setup_db().await;
        let turf = seed_turf(&db, "Green Field").await;
        let repo = SqliteBookingRepository::new(db.pool().clone());
        let earlier = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
        repo.insert_exclusive(Booking::new(turf.id, earlier, slot(9, 10)))
            .await
            .unwrap();
        repo.insert_exclusive(Booking::new(turf.id, date(), slot(9, 10)))
            .await
            .unwrap();

        let upcoming = repo.find_by_turf_from(turf.id, date()).await.unwrap();

        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].date, date());
    }
}
