//! `SQLite` implementation of [`TurfRepository`].

use std::future::Future;

use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};

use turfbook_app::ports::TurfRepository;
use turfbook_domain::error::{ConflictError, TurfBookError};
use turfbook_domain::id::{OwnerId, TurfId, TurfImageId};
use turfbook_domain::image::TurfImage;
use turfbook_domain::owner::Owner;
use turfbook_domain::turf::{
    SportType, Turf, TurfFilter, TurfOrder, TurfTotals, TurfView, operating_hours,
};

use crate::decode;
use crate::error::StorageError;

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(Turf);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let owner_id: uuid::Uuid = row.try_get("owner_id")?;
        let sport_type: String = row.try_get("sport_type")?;
        let price: String = row.try_get("price_per_slot")?;
        let start: String = row.try_get("operating_start")?;
        let end: String = row.try_get("operating_end")?;

        let sport_type = sport_type
            .parse::<SportType>()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let operating_hours = operating_hours(decode::time(&start)?, decode::time(&end)?)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Turf {
            id: TurfId::from_uuid(id),
            owner_id: OwnerId::from_uuid(owner_id),
            name: row.try_get("name")?,
            phone: row.try_get("phone")?,
            location: row.try_get("location")?,
            sport_type,
            price_per_slot: decode::decimal(&price)?,
            description: row.try_get("description")?,
            operating_hours,
        }))
    }
}

/// A turf joined with its owner and aggregate counters.
struct ViewRow {
    turf: Turf,
    owner: Owner,
    totals: TurfTotals,
}

impl<'r> FromRow<'r, SqliteRow> for ViewRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let Wrapper(turf) = Wrapper::from_row(row)?;
        let bookings: i64 = row.try_get("total_bookings")?;
        let blocked_slots: i64 = row.try_get("total_blocked_slots")?;
        Ok(Self {
            owner: Owner {
                id: turf.owner_id,
                name: row.try_get("owner_name")?,
                phone: row.try_get("owner_phone")?,
            },
            totals: TurfTotals {
                bookings: decode::count(bookings)?,
                blocked_slots: decode::count(blocked_slots)?,
            },
            turf,
        })
    }
}

struct ImageWrapper(TurfImage);

impl<'r> FromRow<'r, SqliteRow> for ImageWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let turf_id: uuid::Uuid = row.try_get("turf_id")?;
        Ok(Self(TurfImage {
            id: TurfImageId::from_uuid(id),
            turf_id: TurfId::from_uuid(turf_id),
            url: row.try_get("url")?,
            name: row.try_get("name")?,
            is_primary: row.try_get("is_primary")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO turfs (
        id, owner_id, name, phone, location, sport_type,
        price_per_slot, description, operating_start, operating_end
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const UPDATE: &str = r"
    UPDATE turfs SET
        name = ?, phone = ?, location = ?, sport_type = ?, price_per_slot = ?,
        description = ?, operating_start = ?, operating_end = ?
    WHERE id = ?
";

const SELECT_BY_ID: &str = "SELECT * FROM turfs WHERE id = ?";
const EXISTS_BY_NAME_AND_OWNER: &str =
    "SELECT EXISTS (SELECT 1 FROM turfs WHERE owner_id = ? AND name = ?)";

const INSERT_IMAGE: &str = r"
    INSERT INTO turf_images (id, turf_id, url, name, is_primary, position)
    VALUES (?, ?, ?, ?, ?, ?)
";
const SELECT_IMAGES: &str = "SELECT * FROM turf_images WHERE turf_id = ? ORDER BY position ASC";
const DELETE_IMAGES: &str = "DELETE FROM turf_images WHERE turf_id = ?";
const DELETE_BLOCKED_SLOTS: &str = "DELETE FROM blocked_slots WHERE turf_id = ?";
const DELETE_PAST_BOOKINGS: &str = "DELETE FROM bookings WHERE turf_id = ? AND date < ?";
const COUNT_BOOKINGS: &str = "SELECT COUNT(*) FROM bookings WHERE turf_id = ?";
const DELETE_BY_ID: &str = "DELETE FROM turfs WHERE id = ?";

const SELECT_VIEWS: &str = r"
    SELECT t.*,
        o.name AS owner_name,
        o.phone AS owner_phone,
        (SELECT COUNT(*) FROM bookings b WHERE b.turf_id = t.id) AS total_bookings,
        (SELECT COUNT(*) FROM blocked_slots s WHERE s.turf_id = t.id) AS total_blocked_slots
    FROM turfs t
    JOIN owners o ON o.id = t.owner_id
    WHERE 1 = 1
";

fn write_error(err: sqlx::Error, turf: &Turf) -> TurfBookError {
    let err = StorageError::from(err);
    if err.is_unique_violation() {
        ConflictError::DuplicateTurfName {
            owner_id: turf.owner_id.to_string(),
            name: turf.name.clone(),
        }
        .into()
    } else {
        err.into()
    }
}

async fn insert_images(
    conn: &mut SqliteConnection,
    images: &[TurfImage],
) -> Result<(), sqlx::Error> {
    for (position, image) in (0_u32..).zip(images) {
        sqlx::query(INSERT_IMAGE)
            .bind(image.id.as_uuid())
            .bind(image.turf_id.as_uuid())
            .bind(&image.url)
            .bind(&image.name)
            .bind(image.is_primary)
            .bind(position)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Rows matching `filter`. Ids, owner and sport narrow the SQL query; the text
/// and price criteria run on the decoded turf so matching is Unicode-aware and
/// price comparison is exact.
async fn select_view_rows(
    pool: &SqlitePool,
    filter: &TurfFilter,
) -> Result<Vec<ViewRow>, sqlx::Error> {
    let mut query: QueryBuilder<'_, Sqlite> = QueryBuilder::new(SELECT_VIEWS);
    if let Some(id) = filter.id {
        query.push(" AND t.id = ").push_bind(id.as_uuid());
    }
    if let Some(owner_id) = filter.owner_id {
        query.push(" AND t.owner_id = ").push_bind(owner_id.as_uuid());
    }
    if let Some(sport_type) = filter.sport_type {
        query.push(" AND t.sport_type = ").push_bind(sport_type.as_str());
    }
    query.push(match filter.order {
        TurfOrder::Name => " ORDER BY t.name ASC",
        TurfOrder::Popularity => " ORDER BY total_bookings DESC, t.name ASC",
    });

    let rows: Vec<ViewRow> = query.build_query_as().fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .filter(|row| filter.matches(&row.turf))
        .collect())
}

/// `SQLite`-backed turf repository.
#[derive(Clone)]
pub struct SqliteTurfRepository {
    pool: SqlitePool,
}

impl SqliteTurfRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl TurfRepository for SqliteTurfRepository {
    fn create(
        &self,
        turf: Turf,
        images: Vec<TurfImage>,
    ) -> impl Future<Output = Result<Turf, TurfBookError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;
            sqlx::query(INSERT)
                .bind(turf.id.as_uuid())
                .bind(turf.owner_id.as_uuid())
                .bind(&turf.name)
                .bind(&turf.phone)
                .bind(&turf.location)
                .bind(turf.sport_type.as_str())
                .bind(turf.price_per_slot.to_string())
                .bind(turf.description.as_deref())
                .bind(decode::encode_time(turf.operating_hours.start()))
                .bind(decode::encode_time(turf.operating_hours.end()))
                .execute(&mut *tx)
                .await
                .map_err(|err| write_error(err, &turf))?;
            insert_images(&mut tx, &images)
                .await
                .map_err(StorageError::from)?;
            tx.commit().await.map_err(StorageError::from)?;

            Ok(turf)
        }
    }

    fn get_by_id(
        &self,
        id: TurfId,
    ) -> impl Future<Output = Result<Option<Turf>, TurfBookError>> + Send {
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

    fn update(
        &self,
        turf: Turf,
        images: Option<Vec<TurfImage>>,
    ) -> impl Future<Output = Result<Turf, TurfBookError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;
            sqlx::query(UPDATE)
                .bind(&turf.name)
                .bind(&turf.phone)
                .bind(&turf.location)
                .bind(turf.sport_type.as_str())
                .bind(turf.price_per_slot.to_string())
                .bind(turf.description.as_deref())
                .bind(decode::encode_time(turf.operating_hours.start()))
                .bind(decode::encode_time(turf.operating_hours.end()))
                .bind(turf.id.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(|err| write_error(err, &turf))?;
            if let Some(images) = images {
                sqlx::query(DELETE_IMAGES)
                    .bind(turf.id.as_uuid())
                    .execute(&mut *tx)
                    .await
                    .map_err(StorageError::from)?;
                insert_images(&mut tx, &images)
                    .await
                    .map_err(StorageError::from)?;
            }
            tx.commit().await.map_err(StorageError::from)?;

            Ok(turf)
        }
    }

    fn delete(
        &self,
        id: TurfId,
        upcoming_from: NaiveDate,
    ) -> impl Future<Output = Result<(), TurfBookError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;
            // The first write takes the database write lock, so no reservation
            // can commit between the count below and the turf delete.
            sqlx::query(DELETE_PAST_BOOKINGS)
                .bind(id.as_uuid())
                .bind(decode::encode_date(upcoming_from))
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            let remaining: i64 = sqlx::query_scalar(COUNT_BOOKINGS)
                .bind(id.as_uuid())
                .fetch_one(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            if remaining > 0 {
                return Err(ConflictError::UpcomingBookings {
                    turf_id: id.to_string(),
                    count: decode::count(remaining).map_err(StorageError::from)?,
                }
                .into());
            }
            for statement in [DELETE_IMAGES, DELETE_BLOCKED_SLOTS, DELETE_BY_ID] {
                sqlx::query(statement)
                    .bind(id.as_uuid())
                    .execute(&mut *tx)
                    .await
                    .map_err(StorageError::from)?;
            }
            tx.commit().await.map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn exists_by_name_and_owner(
        &self,
        name: &str,
        owner_id: OwnerId,
    ) -> impl Future<Output = Result<bool, TurfBookError>> + Send {
        let pool = self.pool.clone();
        let name = name.to_owned();
        async move {
            let exists: bool = sqlx::query_scalar(EXISTS_BY_NAME_AND_OWNER)
                .bind(owner_id.as_uuid())
                .bind(name)
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(exists)
        }
    }

    fn find_views(
        &self,
        filter: &TurfFilter,
    ) -> impl Future<Output = Result<Vec<TurfView>, TurfBookError>> + Send {
        let pool = self.pool.clone();
        let filter = filter.clone();
        async move {
            let rows = select_view_rows(&pool, &filter)
                .await
                .map_err(StorageError::from)?;

            let mut views = Vec::with_capacity(rows.len());
            for row in rows {
                let images: Vec<ImageWrapper> = sqlx::query_as(SELECT_IMAGES)
                    .bind(row.turf.id.as_uuid())
                    .fetch_all(&pool)
                    .await
                    .map_err(StorageError::from)?;
                let images: Vec<TurfImage> = images.into_iter().map(|w| w.0).collect();
                views.push(TurfView::assemble(&row.turf, &row.owner, row.totals, &images));
            }
            Ok(views)
        }
    }

    fn count(&self, filter: &TurfFilter) -> impl Future<Output = Result<u64, TurfBookError>> + Send {
        let pool = self.pool.clone();
        let filter = filter.clone();
        async move {
            let rows = select_view_rows(&pool, &filter)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.len() as u64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use turfbook_app::ports::BookingRepository;
    use turfbook_domain::booking::Booking;
    use turfbook_domain::interval::TimeInterval;

    use crate::booking_repo::SqliteBookingRepository;
    use crate::testing::{hm, seed_owner, setup_db};

    fn turf(owner_id: OwnerId, name: &str) -> Turf {
        Turf::builder()
            .owner_id(owner_id)
            .name(name)
            .location("North Park")
            .sport_type(SportType::Football)
            .price_per_slot(Decimal::new(1500, 2))
            .operating_hours(hm(6, 0), hm(22, 0))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_turf() {
        let db = setup_db().await;
        let owner = seed_owner(&db, "Asha").await;
        let repo = SqliteTurfRepository::new(db.pool().clone());
        let created = turf(owner.id, "Green Field");

        repo.create(created.clone(), vec![]).await.unwrap();

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn should_keep_fractional_operating_hours() {
        let db = setup_db().await;
        let owner = seed_owner(&db, "Asha").await;
        let repo = SqliteTurfRepository::new(db.pool().clone());
        let mut created = turf(owner.id, "Green Field");
        created.operating_hours = operating_hours(
            chrono::NaiveTime::from_hms_milli_opt(6, 0, 0, 250).unwrap(),
            chrono::NaiveTime::from_hms_milli_opt(6, 0, 0, 750).unwrap(),
        )
        .unwrap();

        repo.create(created.clone(), vec![]).await.unwrap();

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.operating_hours, created.operating_hours);
    }

    #[tokio::test]
    async fn should_return_none_when_turf_not_found() {
        let db = setup_db().await;
        let repo = SqliteTurfRepository::new(db.pool().clone());
        assert!(repo.get_by_id(TurfId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_map_duplicate_name_to_conflict() {
        let db = setup_db().await;
        let owner = seed_owner(&db, "Asha").await;
        let repo = SqliteTurfRepository::new(db.pool().clone());
        repo.create(turf(owner.id, "Green Field"), vec![])
            .await
            .unwrap();

        let result = repo.create(turf(owner.id, "Green Field"), vec![]).await;

        assert!(matches!(
            result,
            Err(TurfBookError::Conflict(ConflictError::DuplicateTurfName { .. }))
        ));
        assert!(
            repo.exists_by_name_and_owner("Green Field", owner.id)
                .await
                .unwrap()
        );
        assert!(
            !repo
                .exists_by_name_and_owner("Green Field", OwnerId::new())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn should_keep_image_order_and_primary() {
        let db = setup_db().await;
        let owner = seed_owner(&db, "Asha").await;
        let repo = SqliteTurfRepository::new(db.pool().clone());
        let created = turf(owner.id, "Green Field");
        let images = TurfImage::from_urls(created.id, &["c.jpg", "a.jpg", "b.jpg"]).unwrap();

        repo.create(created.clone(), images).await.unwrap();

        let views = repo.find_views(&TurfFilter::by_id(created.id)).await.unwrap();
        assert_eq!(views[0].image_urls, vec!["c.jpg", "a.jpg", "b.jpg"]);
        assert_eq!(views[0].primary_image_url.as_deref(), Some("c.jpg"));
        assert_eq!(views[0].owner_name, "Asha");
    }

    #[tokio::test]
    async fn should_replace_images_only_when_supplied() {
        let db = setup_db().await;
        let owner = seed_owner(&db, "Asha").await;
        let repo = SqliteTurfRepository::new(db.pool().clone());
        let mut created = turf(owner.id, "Green Field");
        let images = TurfImage::from_urls(created.id, &["a.jpg"]).unwrap();
        repo.create(created.clone(), images).await.unwrap();

        created.location = "South Park".to_string();
        repo.update(created.clone(), None).await.unwrap();
        let views = repo.find_views(&TurfFilter::by_id(created.id)).await.unwrap();
        assert_eq!(views[0].location, "South Park");
        assert_eq!(views[0].image_urls, vec!["a.jpg"]);

        let replacement = TurfImage::from_urls(created.id, &["x.jpg", "y.jpg"]).unwrap();
        repo.update(created.clone(), Some(replacement)).await.unwrap();
        let views = repo.find_views(&TurfFilter::by_id(created.id)).await.unwrap();
        assert_eq!(views[0].image_urls, vec!["x.jpg", "y.jpg"]);
    }

    #[tokio::test]
    async fn should_delete_turf_with_dependents() {
        let db = setup_db().await;
        let owner = seed_owner(&db, "Asha").await;
        let repo = SqliteTurfRepository::new(db.pool().clone());
        let bookings = SqliteBookingRepository::new(db.pool().clone());
        let created = turf(owner.id, "Green Field");
        let images = TurfImage::from_urls(created.id, &["a.jpg"]).unwrap();
        repo.create(created.clone(), images).await.unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let slot = TimeInterval::new(hm(9, 0), hm(10, 0)).unwrap();
        bookings
            .insert_exclusive(Booking::new(created.id, day, slot))
            .await
            .unwrap();

        repo.delete(created.id, day.succ_opt().unwrap()).await.unwrap();

        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
        assert!(
            bookings
                .find_by_turf_and_date(created.id, day)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn should_refuse_delete_while_bookings_are_upcoming() {
        let db = setup_db().await;
        let owner = seed_owner(&db, "Asha").await;
        let repo = SqliteTurfRepository::new(db.pool().clone());
        let bookings = SqliteBookingRepository::new(db.pool().clone());
        let created = turf(owner.id, "Green Field");
        repo.create(created.clone(), vec![]).await.unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let yesterday = today.pred_opt().unwrap();
        let tomorrow = today.succ_opt().unwrap();
        let slot = TimeInterval::new(hm(9, 0), hm(10, 0)).unwrap();
        for day in [yesterday, tomorrow] {
            bookings
                .insert_exclusive(Booking::new(created.id, day, slot))
                .await
                .unwrap();
        }

        let result = repo.delete(created.id, today).await;

        assert!(matches!(
            result,
            Err(TurfBookError::Conflict(ConflictError::UpcomingBookings {
                count: 1,
                ..
            }))
        ));
        assert!(repo.get_by_id(created.id).await.unwrap().is_some());
        assert_eq!(
            bookings
                .find_by_turf_from(created.id, yesterday)
                .await
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn should_filter_and_order_views() {
        let db = setup_db().await;
        let owner = seed_owner(&db, "Asha").await;
        let repo = SqliteTurfRepository::new(db.pool().clone());
        let bookings = SqliteBookingRepository::new(db.pool().clone());

        let alpha = turf(owner.id, "Alpha Ground");
        let mut zulu = turf(owner.id, "Zulu Ground");
        zulu.location = "Riverside".to_string();
        zulu.price_per_slot = Decimal::new(4000, 2);
        repo.create(alpha.clone(), vec![]).await.unwrap();
        repo.create(zulu.clone(), vec![]).await.unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        bookings
            .insert_exclusive(Booking::new(
                zulu.id,
                day,
                TimeInterval::new(hm(9, 0), hm(10, 0)).unwrap(),
            ))
            .await
            .unwrap();

        let by_name = repo.find_views(&TurfFilter::default()).await.unwrap();
        assert_eq!(by_name[0].id, alpha.id);

        let popular = repo
            .find_views(&TurfFilter {
                order: TurfOrder::Popularity,
                ..TurfFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(popular[0].id, zulu.id);
        assert_eq!(popular[0].total_bookings, 1);

        let riverside = TurfFilter {
            location_contains: Some("RIVER".to_string()),
            ..TurfFilter::default()
        };
        assert_eq!(repo.count(&riverside).await.unwrap(), 1);

        let mut munich = turf(owner.id, "Isar Pitch");
        munich.location = "MÜNCHEN Süd".to_string();
        munich.price_per_slot = Decimal::new(2000, 2);
        repo.create(munich.clone(), vec![]).await.unwrap();
        let found = repo
            .find_views(&TurfFilter {
                location_contains: Some("münchen".to_string()),
                ..TurfFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, munich.id);

        let cheap = TurfFilter {
            max_price: Some(Decimal::new(15, 0)),
            ..TurfFilter::default()
        };
        let found = repo.find_views(&cheap).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, alpha.id);

        assert_eq!(
            repo.count(&TurfFilter::by_sport_type(SportType::Tennis))
                .await
                .unwrap(),
            0
        );
        assert_eq!(repo.count(&TurfFilter::by_owner(owner.id)).await.unwrap(), 3);
    }
}
