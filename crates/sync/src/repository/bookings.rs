use fitsync_core::entities::{
    compare_bookings_by_class_start, Booking, BookingDto, BookingFilter, CreateBookingRequest,
    ReminderSettings,
};
use fitsync_core::remote::endpoints;
use fitsync_core::store::Query;
use fitsync_core::sync::Result;

use super::NO_BODY;
use crate::engine::{CacheAside, WriteThrough};

/// The signed-in user's class bookings.
#[derive(Clone)]
pub struct BookingRepository {
    engine: CacheAside,
}

impl BookingRepository {
    pub fn new(engine: CacheAside) -> Self {
        Self { engine }
    }

    /// Lists bookings, soonest class first. A network refresh replaces the
    /// cached bookings matching `filter`.
    pub async fn list_bookings(&self, filter: BookingFilter, from_cache: bool) -> Result<Vec<Booking>> {
        self.engine
            .list::<Booking, BookingDto>(
                filter.apply(endpoints::bookings()),
                Query::all()
                    .filter(move |b| filter.matches(b))
                    .sort_by(compare_bookings_by_class_start),
                WriteThrough::scope(move |b| filter.matches(b)),
                from_cache,
            )
            .await
    }

    pub async fn get_booking(&self, id: &str, from_cache: bool) -> Result<Option<Booking>> {
        self.engine
            .get::<Booking, BookingDto>(endpoints::booking(id), id, from_cache)
            .await
    }

    pub async fn create_booking(&self, request: &CreateBookingRequest) -> Result<Booking> {
        self.engine
            .mutate::<Booking, BookingDto, _>(endpoints::create_booking(), Some(request))
            .await
    }

    pub async fn cancel_booking(&self, id: &str) -> Result<Booking> {
        self.engine
            .mutate::<Booking, BookingDto, _>(endpoints::cancel_booking(id), NO_BODY)
            .await
    }

    pub async fn mark_attended(&self, id: &str) -> Result<Booking> {
        self.engine
            .mutate::<Booking, BookingDto, _>(endpoints::attend_booking(id), NO_BODY)
            .await
    }

    pub async fn update_reminder(&self, id: &str, settings: ReminderSettings) -> Result<Booking> {
        self.engine
            .mutate::<Booking, BookingDto, _>(endpoints::booking_reminder(id), Some(&settings))
            .await
    }

    pub async fn delete_booking(&self, id: &str) -> Result<()> {
        self.engine
            .remove::<Booking>(endpoints::delete_booking(id), id)
            .await
    }
}
