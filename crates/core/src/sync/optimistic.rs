//! Pure optimistic patches.
//!
//! A patch snapshots exactly the fields it is about to change, applies the
//! new state, and can put the snapshot back. Fields it does not touch are
//! never restored, so a rollback cannot clobber unrelated concurrent writes.

use crate::entities::{Activity, Group, GroupActivity, RsvpStatus, SocialProfile};

/// A reversible change to one cached entity.
pub trait Patch<T>: Send + Sync {
    type Snapshot: Send + 'static;

    /// Captures every field `apply` will change.
    fn snapshot(&self, entity: &T) -> Self::Snapshot;

    fn apply(&self, entity: &mut T);

    /// Restores the captured fields to their pre-patch values.
    fn restore(&self, snapshot: Self::Snapshot, entity: &mut T);
}

/// Returns the yes-count after an RSVP moves from `from` to `to`.
///
/// The count only moves on transitions into or out of `yes`; switching
/// between `no`, `maybe` and no answer leaves it unchanged. Never negative.
pub fn rsvp_count_after(count: u32, from: Option<RsvpStatus>, to: Option<RsvpStatus>) -> u32 {
    let was_yes = from == Some(RsvpStatus::Yes);
    let is_yes = to == Some(RsvpStatus::Yes);
    match (was_yes, is_yes) {
        (false, true) => count.saturating_add(1),
        (true, false) => count.saturating_sub(1),
        _ => count,
    }
}

/// Flips `is_liked` on an activity and adjusts its like counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct LikeToggle;

impl Patch<Activity> for LikeToggle {
    type Snapshot = (bool, u32);

    fn snapshot(&self, activity: &Activity) -> Self::Snapshot {
        (activity.is_liked, activity.likes_count)
    }

    fn apply(&self, activity: &mut Activity) {
        if activity.is_liked {
            activity.is_liked = false;
            activity.likes_count = activity.likes_count.saturating_sub(1);
        } else {
            activity.is_liked = true;
            activity.likes_count = activity.likes_count.saturating_add(1);
        }
    }

    fn restore(&self, (is_liked, likes_count): Self::Snapshot, activity: &mut Activity) {
        activity.is_liked = is_liked;
        activity.likes_count = likes_count;
    }
}

/// Flips `is_following` on a profile and adjusts its follower counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct FollowToggle;

impl Patch<SocialProfile> for FollowToggle {
    type Snapshot = (bool, u32);

    fn snapshot(&self, profile: &SocialProfile) -> Self::Snapshot {
        (profile.is_following, profile.followers_count)
    }

    fn apply(&self, profile: &mut SocialProfile) {
        if profile.is_following {
            profile.is_following = false;
            profile.followers_count = profile.followers_count.saturating_sub(1);
        } else {
            profile.is_following = true;
            profile.followers_count = profile.followers_count.saturating_add(1);
        }
    }

    fn restore(&self, (is_following, followers_count): Self::Snapshot, profile: &mut SocialProfile) {
        profile.is_following = is_following;
        profile.followers_count = followers_count;
    }
}

/// Joins or leaves a group. Re-joining a group already joined changes nothing.
#[derive(Debug, Clone, Copy)]
pub struct MembershipChange {
    pub join: bool,
}

impl Patch<Group> for MembershipChange {
    type Snapshot = (bool, u32);

    fn snapshot(&self, group: &Group) -> Self::Snapshot {
        (group.is_member, group.member_count)
    }

    fn apply(&self, group: &mut Group) {
        if group.is_member == self.join {
            return;
        }
        group.is_member = self.join;
        group.member_count = if self.join {
            group.member_count.saturating_add(1)
        } else {
            group.member_count.saturating_sub(1)
        };
    }

    fn restore(&self, (is_member, member_count): Self::Snapshot, group: &mut Group) {
        group.is_member = is_member;
        group.member_count = member_count;
    }
}

/// Sets the signed-in user's RSVP; `None` withdraws it.
#[derive(Debug, Clone, Copy)]
pub struct RsvpChange {
    pub status: Option<RsvpStatus>,
}

impl Patch<GroupActivity> for RsvpChange {
    type Snapshot = (Option<RsvpStatus>, u32);

    fn snapshot(&self, activity: &GroupActivity) -> Self::Snapshot {
        (activity.user_rsvp, activity.rsvp_count)
    }

    fn apply(&self, activity: &mut GroupActivity) {
        activity.rsvp_count = rsvp_count_after(activity.rsvp_count, activity.user_rsvp, self.status);
        activity.user_rsvp = self.status;
    }

    fn restore(&self, (user_rsvp, rsvp_count): Self::Snapshot, activity: &mut GroupActivity) {
        activity.user_rsvp = user_rsvp;
        activity.rsvp_count = rsvp_count;
    }
}
