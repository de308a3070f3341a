//! Turf: a bookable sports facility with a daily operating window.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{TurfBookError, ValidationError};
use crate::id::{OwnerId, TurfId};
use crate::image::TurfImage;
use crate::interval::TimeInterval;
use crate::owner::Owner;

/// The sport a turf is set up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SportType {
    Football,
    Cricket,
    Badminton,
    Tennis,
    Basketball,
    Volleyball,
    Hockey,
    Other,
}

impl SportType {
    pub const ALL: [Self; 8] = [
        Self::Football,
        Self::Cricket,
        Self::Badminton,
        Self::Tennis,
        Self::Basketball,
        Self::Volleyball,
        Self::Hockey,
        Self::Other,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Football => "FOOTBALL",
            Self::Cricket => "CRICKET",
            Self::Badminton => "BADMINTON",
            Self::Tennis => "TENNIS",
            Self::Basketball => "BASKETBALL",
            Self::Volleyball => "VOLLEYBALL",
            Self::Hockey => "HOCKEY",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for SportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SportType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sport| sport.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownSportType(s.to_owned()))
    }
}

/// Build the daily operating window, enforcing `start < end`.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidOperatingHours`] when `start >= end`.
pub fn operating_hours(start: NaiveTime, end: NaiveTime) -> Result<TimeInterval, ValidationError> {
    TimeInterval::new(start, end).map_err(|_| ValidationError::InvalidOperatingHours { start, end })
}

/// A bookable facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turf {
    pub id: TurfId,
    pub owner_id: OwnerId,
    pub name: String,
    pub phone: String,
    pub location: String,
    pub sport_type: SportType,
    pub price_per_slot: Decimal,
    pub description: Option<String>,
    pub operating_hours: TimeInterval,
}

impl Turf {
    /// Create a builder for constructing a [`Turf`].
    #[must_use]
    pub fn builder() -> TurfBuilder {
        TurfBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// The operating window is valid by construction.
    ///
    /// # Errors
    ///
    /// Returns [`TurfBookError::Validation`] when `name` is blank or the
    /// price is negative.
    pub fn validate(&self) -> Result<(), TurfBookError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.price_per_slot < Decimal::ZERO {
            return Err(ValidationError::NegativePrice(self.price_per_slot).into());
        }
        Ok(())
    }

    /// Apply a partial update in place.
    ///
    /// Blank strings are ignored like absent fields. Operating hours are merged
    /// three ways: a supplied pair is validated as a pair, a single supplied
    /// bound is validated against the stored other bound. Nothing is mutated
    /// when validation fails.
    ///
    /// Name uniqueness is not checked here; see [`UpdateTurfRequest::renamed_to`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidOperatingHours`] or
    /// [`ValidationError::NegativePrice`].
    pub fn apply_update(&mut self, update: &UpdateTurfRequest) -> Result<(), ValidationError> {
        let hours = match (update.operating_start, update.operating_end) {
            (None, None) => self.operating_hours,
            (start, end) => operating_hours(
                start.unwrap_or(self.operating_hours.start()),
                end.unwrap_or(self.operating_hours.end()),
            )?,
        };
        if let Some(price) = update.price_per_slot {
            if price < Decimal::ZERO {
                return Err(ValidationError::NegativePrice(price));
            }
            self.price_per_slot = price;
        }
        if let Some(name) = update.trimmed_name() {
            self.name = name.to_owned();
        }
        if let Some(phone) = non_blank(update.phone.as_deref()) {
            self.phone = phone.to_owned();
        }
        if let Some(location) = non_blank(update.location.as_deref()) {
            self.location = location.to_owned();
        }
        if let Some(sport_type) = update.sport_type {
            self.sport_type = sport_type;
        }
        if let Some(description) = &update.description {
            self.description = Some(description.clone());
        }
        self.operating_hours = hours;
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Step-by-step builder for [`Turf`].
#[derive(Debug, Default)]
pub struct TurfBuilder {
    id: Option<TurfId>,
    owner_id: Option<OwnerId>,
    name: Option<String>,
    phone: Option<String>,
    location: Option<String>,
    sport_type: Option<SportType>,
    price_per_slot: Option<Decimal>,
    description: Option<String>,
    hours: Option<(NaiveTime, NaiveTime)>,
}

impl TurfBuilder {
    #[must_use]
    pub fn id(mut self, id: TurfId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn owner_id(mut self, owner_id: OwnerId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn sport_type(mut self, sport_type: SportType) -> Self {
        self.sport_type = Some(sport_type);
        self
    }

    #[must_use]
    pub fn price_per_slot(mut self, price: Decimal) -> Self {
        self.price_per_slot = Some(price);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn operating_hours(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.hours = Some((start, end));
        self
    }

    /// Consume the builder, validate, and return a [`Turf`].
    ///
    /// # Errors
    ///
    /// Returns [`TurfBookError::Validation`] if the owner or operating hours
    /// are missing, the hours are not ordered, the name is blank, or the
    /// price is negative.
    pub fn build(self) -> Result<Turf, TurfBookError> {
        let owner_id = self
            .owner_id
            .ok_or(ValidationError::MissingField("owner_id"))?;
        let (start, end) = self
            .hours
            .ok_or(ValidationError::MissingField("operating_hours"))?;
        let turf = Turf {
            id: self.id.unwrap_or_default(),
            owner_id,
            name: self.name.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            sport_type: self.sport_type.unwrap_or(SportType::Other),
            price_per_slot: self.price_per_slot.unwrap_or(Decimal::ZERO),
            description: self.description,
            operating_hours: operating_hours(start, end)?,
        };
        turf.validate()?;
        Ok(turf)
    }
}

/// Inbound request for listing a new turf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTurfRequest {
    pub owner_id: OwnerId,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    pub sport_type: SportType,
    pub price_per_slot: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    pub operating_start: NaiveTime,
    pub operating_end: NaiveTime,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

impl CreateTurfRequest {
    /// Build the turf record described by this request.
    ///
    /// # Errors
    ///
    /// Returns [`TurfBookError::Validation`] when the request breaks an invariant.
    pub fn to_turf(&self) -> Result<Turf, TurfBookError> {
        let mut builder = Turf::builder()
            .owner_id(self.owner_id)
            .name(self.name.trim())
            .phone(&self.phone)
            .location(&self.location)
            .sport_type(self.sport_type)
            .price_per_slot(self.price_per_slot)
            .operating_hours(self.operating_start, self.operating_end);
        if let Some(description) = &self.description {
            builder = builder.description(description);
        }
        builder.build()
    }
}

/// Inbound partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateTurfRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub sport_type: Option<SportType>,
    pub price_per_slot: Option<Decimal>,
    pub description: Option<String>,
    pub operating_start: Option<NaiveTime>,
    pub operating_end: Option<NaiveTime>,
    /// Replaces the whole image set when present, even if empty.
    pub image_urls: Option<Vec<String>>,
}

impl UpdateTurfRequest {
    /// The new name when this update renames `turf`, for uniqueness checks.
    #[must_use]
    pub fn renamed_to(&self, turf: &Turf) -> Option<&str> {
        self.trimmed_name().filter(|name| *name != turf.name)
    }

    /// Names are stored trimmed, as on create.
    fn trimmed_name(&self) -> Option<&str> {
        non_blank(self.name.as_deref()).map(str::trim)
    }

    /// Whether this update touches the operating window at all.
    #[must_use]
    pub fn changes_hours(&self) -> bool {
        self.operating_start.is_some() || self.operating_end.is_some()
    }
}

/// Ordering of catalog listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurfOrder {
    #[default]
    Name,
    /// Most booked first.
    Popularity,
}

/// Catalog read criteria; every supplied criterion must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurfFilter {
    pub id: Option<TurfId>,
    pub owner_id: Option<OwnerId>,
    pub sport_type: Option<SportType>,
    /// Case-insensitive substring of the name.
    pub name_contains: Option<String>,
    /// Case-insensitive substring of the location.
    pub location_contains: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
    pub order: TurfOrder,
}

impl TurfFilter {
    #[must_use]
    pub fn by_id(id: TurfId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn by_owner(owner_id: OwnerId) -> Self {
        Self {
            owner_id: Some(owner_id),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn by_sport_type(sport_type: SportType) -> Self {
        Self {
            sport_type: Some(sport_type),
            ..Self::default()
        }
    }

    /// Check the filter's own consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPriceRange`] when `min_price > max_price`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(ValidationError::InvalidPriceRange { min, max });
            }
        }
        Ok(())
    }

    /// Whether the price bounds admit `price`.
    #[must_use]
    pub fn admits_price(&self, price: Decimal) -> bool {
        self.min_price.is_none_or(|min| price >= min) && self.max_price.is_none_or(|max| price <= max)
    }

    /// Whether `turf` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, turf: &Turf) -> bool {
        self.id.is_none_or(|id| turf.id == id)
            && self.owner_id.is_none_or(|owner| turf.owner_id == owner)
            && self.sport_type.is_none_or(|sport| turf.sport_type == sport)
            && contains_ignore_case(&turf.name, self.name_contains.as_deref())
            && contains_ignore_case(&turf.location, self.location_contains.as_deref())
            && self.admits_price(turf.price_per_slot)
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    needle.is_none_or(|needle| haystack.to_lowercase().contains(&needle.to_lowercase()))
}

/// Booking and blackout counts aggregated for a turf.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurfTotals {
    pub bookings: u64,
    pub blocked_slots: u64,
}

/// Read projection returned by every catalog read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurfView {
    pub id: TurfId,
    pub name: String,
    pub phone: String,
    pub location: String,
    pub sport_type: SportType,
    pub price_per_slot: Decimal,
    pub description: Option<String>,
    pub operating_start: NaiveTime,
    pub operating_end: NaiveTime,
    pub owner_id: OwnerId,
    pub owner_name: String,
    pub owner_phone: Option<String>,
    pub total_bookings: u64,
    pub total_blocked_slots: u64,
    pub image_urls: Vec<String>,
    pub primary_image_url: Option<String>,
}

impl TurfView {
    /// Project a turf, its owner, its counters and its ordered image set.
    #[must_use]
    pub fn assemble(turf: &Turf, owner: &Owner, totals: TurfTotals, images: &[TurfImage]) -> Self {
        Self {
            id: turf.id,
            name: turf.name.clone(),
            phone: turf.phone.clone(),
            location: turf.location.clone(),
            sport_type: turf.sport_type,
            price_per_slot: turf.price_per_slot,
            description: turf.description.clone(),
            operating_start: turf.operating_hours.start(),
            operating_end: turf.operating_hours.end(),
            owner_id: owner.id,
            owner_name: owner.name.clone(),
            owner_phone: owner.phone.clone(),
            total_bookings: totals.bookings,
            total_blocked_slots: totals.blocked_slots,
            image_urls: images.iter().map(|image| image.url.clone()).collect(),
            primary_image_url: images
                .iter()
                .find(|image| image.is_primary)
                .map(|image| image.url.clone()),
        }
    }
}
