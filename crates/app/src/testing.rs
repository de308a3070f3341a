//! In-memory port implementations shared by the service tests.

use std::collections::HashMap;
use std::future::{Future, ready};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use turfbook_domain::blocked_slot::BlockedSlot;
use turfbook_domain::booking::Booking;
use turfbook_domain::error::{ConflictError, TurfBookError};
use turfbook_domain::id::{OwnerId, TurfId};
use turfbook_domain::image::TurfImage;
use turfbook_domain::owner::Owner;
use turfbook_domain::turf::{Turf, TurfFilter, TurfOrder, TurfTotals, TurfView};

use crate::ports::{BlockedSlotRepository, BookingRepository, OwnerDirectory, TurfRepository};

#[derive(Default)]
struct State {
    owners: HashMap<OwnerId, Owner>,
    turfs: Vec<Turf>,
    images: HashMap<TurfId, Vec<TurfImage>>,
    bookings: Vec<Booking>,
    blocked: Vec<BlockedSlot>,
}

/// A single shared store; clones see the same data.
#[derive(Clone, Default)]
pub(crate) struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub(crate) fn add_owner(&self, name: &str) -> Owner {
        let owner = Owner {
            id: OwnerId::new(),
            name: name.to_string(),
            phone: Some("555-0100".to_string()),
        };
        self.state
            .lock()
            .unwrap()
            .owners
            .insert(owner.id, owner.clone());
        owner
    }

    pub(crate) fn add_booking(&self, booking: Booking) {
        self.state.lock().unwrap().bookings.push(booking);
    }

    pub(crate) fn add_blocked(&self, blocked: BlockedSlot) {
        self.state.lock().unwrap().blocked.push(blocked);
    }

    pub(crate) fn bookings_of(&self, turf_id: TurfId) -> Vec<Booking> {
        self.state
            .lock()
            .unwrap()
            .bookings
            .iter()
            .filter(|b| b.turf_id == turf_id)
            .cloned()
            .collect()
    }

    pub(crate) fn images_of(&self, turf_id: TurfId) -> Vec<TurfImage> {
        self.state
            .lock()
            .unwrap()
            .images
            .get(&turf_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl State {
    fn view(&self, turf: &Turf) -> Option<TurfView> {
        let owner = self.owners.get(&turf.owner_id)?;
        let totals = TurfTotals {
            bookings: self.bookings.iter().filter(|b| b.turf_id == turf.id).count() as u64,
            blocked_slots: self.blocked.iter().filter(|b| b.turf_id == turf.id).count() as u64,
        };
        let images = self.images.get(&turf.id).map_or(&[][..], Vec::as_slice);
        Some(TurfView::assemble(turf, owner, totals, images))
    }
}

impl OwnerDirectory for InMemoryStore {
    fn lookup_owner(
        &self,
        id: OwnerId,
    ) -> impl Future<Output = Result<Option<Owner>, TurfBookError>> + Send {
        let state = self.state.lock().unwrap();
        ready(Ok(state.owners.get(&id).cloned()))
    }
}

impl TurfRepository for InMemoryStore {
    fn create(
        &self,
        turf: Turf,
        images: Vec<TurfImage>,
    ) -> impl Future<Output = Result<Turf, TurfBookError>> + Send {
        let mut state = self.state.lock().unwrap();
        let duplicate = state
            .turfs
            .iter()
            .any(|t| t.owner_id == turf.owner_id && t.name == turf.name);
        let result = if duplicate {
            Err(ConflictError::DuplicateTurfName {
                owner_id: turf.owner_id.to_string(),
                name: turf.name.clone(),
            }
            .into())
        } else {
            state.images.insert(turf.id, images);
            state.turfs.push(turf.clone());
            Ok(turf)
        };
        ready(result)
    }

    fn get_by_id(
        &self,
        id: TurfId,
    ) -> impl Future<Output = Result<Option<Turf>, TurfBookError>> + Send {
        let state = self.state.lock().unwrap();
        ready(Ok(state.turfs.iter().find(|t| t.id == id).cloned()))
    }

    fn update(
        &self,
        turf: Turf,
        images: Option<Vec<TurfImage>>,
    ) -> impl Future<Output = Result<Turf, TurfBookError>> + Send {
        let mut state = self.state.lock().unwrap();
        if let Some(slot) = state.turfs.iter_mut().find(|t| t.id == turf.id) {
            *slot = turf.clone();
        }
        if let Some(images) = images {
            state.images.insert(turf.id, images);
        }
        ready(Ok(turf))
    }

    fn delete(
        &self,
        id: TurfId,
        upcoming_from: NaiveDate,
    ) -> impl Future<Output = Result<(), TurfBookError>> + Send {
        let mut state = self.state.lock().unwrap();
        let upcoming = state
            .bookings
            .iter()
            .filter(|b| b.turf_id == id && b.date >= upcoming_from)
            .count() as u64;
        if upcoming > 0 {
            return ready(Err(ConflictError::UpcomingBookings {
                turf_id: id.to_string(),
                count: upcoming,
            }
            .into()));
        }
        state.turfs.retain(|t| t.id != id);
        state.images.remove(&id);
        state.bookings.retain(|b| b.turf_id != id);
        state.blocked.retain(|b| b.turf_id != id);
        ready(Ok(()))
    }

    fn exists_by_name_and_owner(
        &self,
        name: &str,
        owner_id: OwnerId,
    ) -> impl Future<Output = Result<bool, TurfBookError>> + Send {
        let state = self.state.lock().unwrap();
        let exists = state
            .turfs
            .iter()
            .any(|t| t.owner_id == owner_id && t.name == name);
        ready(Ok(exists))
    }

    fn find_views(
        &self,
        filter: &TurfFilter,
    ) -> impl Future<Output = Result<Vec<TurfView>, TurfBookError>> + Send {
        let state = self.state.lock().unwrap();
        let mut views: Vec<TurfView> = state
            .turfs
            .iter()
            .filter(|t| filter.matches(t))
            .filter_map(|t| state.view(t))
            .collect();
        match filter.order {
            TurfOrder::Name => views.sort_by(|a, b| a.name.cmp(&b.name)),
            TurfOrder::Popularity => views.sort_by(|a, b| {
                b.total_bookings
                    .cmp(&a.total_bookings)
                    .then_with(|| a.name.cmp(&b.name))
            }),
        }
        ready(Ok(views))
    }

    fn count(&self, filter: &TurfFilter) -> impl Future<Output = Result<u64, TurfBookError>> + Send {
        let state = self.state.lock().unwrap();
        let count = state.turfs.iter().filter(|t| filter.matches(t)).count() as u64;
        ready(Ok(count))
    }
}

impl BookingRepository for InMemoryStore {
    fn find_by_turf_and_date(
        &self,
        turf_id: TurfId,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Booking>, TurfBookError>> + Send {
        let state = self.state.lock().unwrap();
        let found = state
            .bookings
            .iter()
            .filter(|b| b.turf_id == turf_id && b.date == date)
            .cloned()
            .collect();
        ready(Ok(found))
    }

    fn find_by_turf_from(
        &self,
        turf_id: TurfId,
        from: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Booking>, TurfBookError>> + Send {
        let state = self.state.lock().unwrap();
        let found = state
            .bookings
            .iter()
            .filter(|b| b.turf_id == turf_id && b.date >= from)
            .cloned()
            .collect();
        ready(Ok(found))
    }

    fn insert_exclusive(
        &self,
        booking: Booking,
    ) -> impl Future<Output = Result<Booking, TurfBookError>> + Send {
        let mut state = self.state.lock().unwrap();
        let same_day = |turf_id: TurfId, date: NaiveDate| {
            turf_id == booking.turf_id && date == booking.date
        };
        let taken = state
            .bookings
            .iter()
            .any(|b| same_day(b.turf_id, b.date) && b.interval.overlaps(&booking.interval))
            || state
                .blocked
                .iter()
                .any(|b| same_day(b.turf_id, b.date) && b.interval.overlaps(&booking.interval));
        let result = if taken {
            Err(ConflictError::OverlappingBooking {
                turf_id: booking.turf_id.to_string(),
                date: booking.date,
            }
            .into())
        } else {
            state.bookings.push(booking.clone());
            Ok(booking)
        };
        ready(result)
    }
}

impl BlockedSlotRepository for InMemoryStore {
    fn find_by_turf_and_date(
        &self,
        turf_id: TurfId,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<BlockedSlot>, TurfBookError>> + Send {
        let state = self.state.lock().unwrap();
        let found = state
            .blocked
            .iter()
            .filter(|b| b.turf_id == turf_id && b.date == date)
            .cloned()
            .collect();
        ready(Ok(found))
    }

    fn create(
        &self,
        blocked: BlockedSlot,
    ) -> impl Future<Output = Result<BlockedSlot, TurfBookError>> + Send {
        self.state.lock().unwrap().blocked.push(blocked.clone());
        ready(Ok(blocked))
    }
}
