//! Turf catalog service — listing, editing and searching turfs.

use rust_decimal::Decimal;

use turfbook_domain::error::{ConflictError, NotFoundError, TurfBookError};
use turfbook_domain::id::{OwnerId, TurfId};
use turfbook_domain::image::TurfImage;
use turfbook_domain::owner::Owner;
use turfbook_domain::time::today;
use turfbook_domain::turf::{
    CreateTurfRequest, SportType, Turf, TurfFilter, TurfOrder, TurfView, UpdateTurfRequest,
};

use crate::ports::{BookingRepository, OwnerDirectory, TurfRepository};

/// Application service for turf CRUD and catalog reads.
pub struct TurfCatalogService<O, T, B> {
    owners: O,
    turfs: T,
    bookings: B,
}

impl<O, T, B> TurfCatalogService<O, T, B>
where
    O: OwnerDirectory,
    T: TurfRepository,
    B: BookingRepository,
{
    /// Create a new service backed by the given ports.
    pub fn new(owners: O, turfs: T, bookings: B) -> Self {
        Self {
            owners,
            turfs,
            bookings,
        }
    }

    async fn require_owner(&self, id: OwnerId) -> Result<Owner, TurfBookError> {
        self.owners.lookup_owner(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Owner",
                id: id.to_string(),
            }
            .into()
        })
    }

    async fn require_turf(&self, id: TurfId) -> Result<Turf, TurfBookError> {
        self.turfs.get_by_id(id).await?.ok_or_else(|| turf_not_found(id))
    }

    async fn ensure_name_free(&self, name: &str, owner_id: OwnerId) -> Result<(), TurfBookError> {
        if self.turfs.exists_by_name_and_owner(name, owner_id).await? {
            return Err(ConflictError::DuplicateTurfName {
                owner_id: owner_id.to_string(),
                name: name.to_owned(),
            }
            .into());
        }
        Ok(())
    }

    /// List a new turf with its images.
    ///
    /// # Errors
    ///
    /// Returns [`TurfBookError::NotFound`] when the owner does not exist,
    /// [`TurfBookError::Validation`] when the request breaks an invariant,
    /// [`TurfBookError::Conflict`] when the owner already has a turf with
    /// this name, or a storage error from the repository.
    #[tracing::instrument(skip(self, request), fields(owner_id = %request.owner_id, name = %request.name))]
    pub async fn create_turf(&self, request: CreateTurfRequest) -> Result<TurfView, TurfBookError> {
        self.require_owner(request.owner_id).await?;
        let turf = request.to_turf()?;
        self.ensure_name_free(&turf.name, turf.owner_id).await?;
        let images = TurfImage::from_urls(turf.id, &request.image_urls)?;
        let turf = self.turfs.create(turf, images).await?;
        tracing::info!(turf_id = %turf.id, "turf created");
        self.get_turf(turf.id).await
    }

    /// Apply a partial update to a turf.
    ///
    /// Shrinking the operating window does not touch existing bookings; any
    /// upcoming booking that now falls outside the window is reported in the
    /// logs.
    ///
    /// # Errors
    ///
    /// Returns [`TurfBookError::NotFound`] when the turf does not exist,
    /// [`TurfBookError::Conflict`] when renaming onto another turf of the same
    /// owner, [`TurfBookError::Validation`] when the merged turf breaks an
    /// invariant, or a storage error from the repository.
    #[tracing::instrument(skip(self, request))]
    pub async fn update_turf(
        &self,
        id: TurfId,
        request: UpdateTurfRequest,
    ) -> Result<TurfView, TurfBookError> {
        let mut turf = self.require_turf(id).await?;
        if let Some(name) = request.renamed_to(&turf) {
            self.ensure_name_free(name, turf.owner_id).await?;
        }
        turf.apply_update(&request)?;
        let images = request
            .image_urls
            .as_deref()
            .map(|urls| TurfImage::from_urls(id, urls))
            .transpose()?;
        if request.changes_hours() {
            self.warn_on_stranded_bookings(&turf).await?;
        }
        self.turfs.update(turf, images).await?;
        tracing::info!("turf updated");
        self.get_turf(id).await
    }

    async fn warn_on_stranded_bookings(&self, turf: &Turf) -> Result<(), TurfBookError> {
        let stranded = self
            .bookings
            .find_by_turf_from(turf.id, today())
            .await?
            .into_iter()
            .filter(|booking| !booking.interval.is_within(&turf.operating_hours))
            .count();
        if stranded > 0 {
            tracing::warn!(
                stranded,
                hours = %turf.operating_hours,
                "upcoming bookings fall outside the new operating hours"
            );
        }
        Ok(())
    }

    /// Delete a turf together with its images, blackouts and past bookings.
    ///
    /// # Errors
    ///
    /// Returns [`TurfBookError::NotFound`] when the turf does not exist,
    /// [`TurfBookError::Conflict`] when bookings dated today or later exist,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_turf(&self, id: TurfId) -> Result<(), TurfBookError> {
        self.require_turf(id).await?;
        self.turfs.delete(id, today()).await?;
        tracing::info!("turf deleted");
        Ok(())
    }

    /// Catalog view of a single turf.
    ///
    /// # Errors
    ///
    /// Returns [`TurfBookError::NotFound`] when no turf with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_turf(&self, id: TurfId) -> Result<TurfView, TurfBookError> {
        self.turfs
            .find_views(&TurfFilter::by_id(id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| turf_not_found(id))
    }

    /// Catalog views matching every criterion of `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`TurfBookError::Validation`] when the price range is inverted,
    /// or a storage error from the repository.
    pub async fn search(&self, filter: &TurfFilter) -> Result<Vec<TurfView>, TurfBookError> {
        filter.validate()?;
        self.turfs.find_views(filter).await
    }

    /// All turfs, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_turfs(&self) -> Result<Vec<TurfView>, TurfBookError> {
        self.search(&TurfFilter::default()).await
    }

    /// Turfs listed by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn turfs_by_owner(&self, owner_id: OwnerId) -> Result<Vec<TurfView>, TurfBookError> {
        self.search(&TurfFilter::by_owner(owner_id)).await
    }

    /// Turfs set up for `sport_type`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn turfs_by_sport_type(
        &self,
        sport_type: SportType,
    ) -> Result<Vec<TurfView>, TurfBookError> {
        self.search(&TurfFilter::by_sport_type(sport_type)).await
    }

    /// Turfs whose location contains `location`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn search_by_location(&self, location: &str) -> Result<Vec<TurfView>, TurfBookError> {
        self.search(&TurfFilter {
            location_contains: Some(location.to_owned()),
            ..TurfFilter::default()
        })
        .await
    }

    /// Turfs whose name contains `name`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<TurfView>, TurfBookError> {
        self.search(&TurfFilter {
            name_contains: Some(name.to_owned()),
            ..TurfFilter::default()
        })
        .await
    }

    /// Turfs priced within `[min, max]`.
    ///
    /// # Errors
    ///
    /// Returns [`TurfBookError::Validation`] when `min > max`, or a storage
    /// error from the repository.
    pub async fn turfs_by_price_range(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> Result<Vec<TurfView>, TurfBookError> {
        self.search(&TurfFilter {
            min_price: Some(min),
            max_price: Some(max),
            ..TurfFilter::default()
        })
        .await
    }

    /// All turfs, most booked first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn turfs_by_popularity(&self) -> Result<Vec<TurfView>, TurfBookError> {
        self.search(&TurfFilter {
            order: TurfOrder::Popularity,
            ..TurfFilter::default()
        })
        .await
    }

    /// Total number of turfs.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn count_turfs(&self) -> Result<u64, TurfBookError> {
        self.turfs.count(&TurfFilter::default()).await
    }

    /// Number of turfs set up for `sport_type`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn count_by_sport_type(&self, sport_type: SportType) -> Result<u64, TurfBookError> {
        self.turfs.count(&TurfFilter::by_sport_type(sport_type)).await
    }

    /// Number of turfs listed by an existing owner.
    ///
    /// # Errors
    ///
    /// Returns [`TurfBookError::NotFound`] when the owner does not exist,
    /// or a storage error from the repository.
    pub async fn count_by_owner(&self, owner_id: OwnerId) -> Result<u64, TurfBookError> {
        self.require_owner(owner_id).await?;
        self.turfs.count(&TurfFilter::by_owner(owner_id)).await
    }

    /// Whether an existing owner already uses `name` for one of their turfs.
    ///
    /// # Errors
    ///
    /// Returns [`TurfBookError::NotFound`] when the owner does not exist,
    /// or a storage error from the repository.
    pub async fn name_exists_for_owner(
        &self,
        name: &str,
        owner_id: OwnerId,
    ) -> Result<bool, TurfBookError> {
        self.require_owner(owner_id).await?;
        self.turfs.exists_by_name_and_owner(name.trim(), owner_id).await
    }
}

fn turf_not_found(id: TurfId) -> TurfBookError {
    NotFoundError {
        entity: "Turf",
        id: id.to_string(),
    }
    .into()
}
