//! Per-family repositories.
//!
//! Each repository is configuration over [`CacheAside`](crate::engine::CacheAside):
//! which endpoint, which cache scope a list replaces, how results are ordered.

mod bookings;
mod classes;
mod groups;
mod messaging;
mod reviews;
mod social;
mod users;

pub use bookings::BookingRepository;
pub use classes::ClassRepository;
pub use groups::GroupRepository;
pub use messaging::MessagingRepository;
pub use reviews::ReviewRepository;
pub use social::{FeedPager, SocialRepository};
pub use users::UserRepository;

/// Body argument for requests that send none.
pub(crate) const NO_BODY: Option<&()> = None;
