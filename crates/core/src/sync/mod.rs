//! Error taxonomy of the sync layer and the pure half of optimistic updates.

mod error;
mod optimistic;

pub use error::{Result, SyncError};
pub use optimistic::{
    rsvp_count_after, FollowToggle, LikeToggle, MembershipChange, Patch, RsvpChange,
};
