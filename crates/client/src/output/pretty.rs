//! Pretty output formatting.

use chrono::{DateTime, Utc};

use fitsync_core::entities::{
    Activity, Booking, Comment, Conversation, FitnessClass, Group, GroupActivity, GroupMember,
    Message, Review, SocialProfile, User,
};

fn time(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Formats a titled list, or `empty` when there is nothing to show.
fn format_list<T>(title: &str, empty: &str, items: &[T], format: impl Fn(&T) -> String) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    let mut output = format!("{title} ({})\n", items.len());
    output.push_str(&"-".repeat(40));
    for item in items {
        output.push_str(&format!("\n{}", format(item)));
        output.push('\n');
    }
    output
}

/// Format a user for display.
pub fn format_user(user: &User) -> String {
    let mut output = format!("{}\n  ID: {}", user.display_name, user.id);
    if let Some(email) = &user.email {
        output.push_str(&format!("\n  Email: {email}"));
    }
    if let Some(bio) = &user.bio {
        output.push_str(&format!("\n  Bio: {bio}"));
    }
    output
}

/// Format a class for display.
pub fn format_class(class: &FitnessClass) -> String {
    let mut output = format!(
        "{} [{}]\n  ID: {}\n  Starts: {} ({} min)\n  Instructor: {}\n  Spots: {}/{}",
        class.name,
        class.category,
        class.id,
        time(&class.start_time),
        class.duration_minutes,
        class.instructor_name,
        class.spots_remaining,
        class.capacity
    );
    if let Some(rating) = class.average_rating {
        output.push_str(&format!("\n  Rating: {rating:.1} ({} reviews)", class.review_count));
    }
    if let Some(location) = &class.location {
        output.push_str(&format!("\n  Location: {location}"));
    }
    output
}

pub fn format_classes(classes: &[FitnessClass]) -> String {
    format_list("CLASSES", "No classes found.", classes, format_class)
}

/// Format a booking for display.
pub fn format_booking(booking: &Booking) -> String {
    let class = booking.class_name.as_deref().unwrap_or(&booking.class_id);
    let mut output = format!("{} [{}]\n  ID: {}", class, booking.status, booking.id);
    if let Some(start) = &booking.class_start_time {
        output.push_str(&format!("\n  Class starts: {}", time(start)));
    }
    if booking.reminder_enabled {
        match booking.reminder_minutes_before {
            Some(minutes) => output.push_str(&format!("\n  Reminder: {minutes} min before")),
            None => output.push_str("\n  Reminder: on"),
        }
    }
    output
}

pub fn format_bookings(bookings: &[Booking]) -> String {
    format_list("BOOKINGS", "No bookings found.", bookings, format_booking)
}

/// Format a group for display.
pub fn format_group(group: &Group) -> String {
    let membership = if group.is_member { "member" } else { "not a member" };
    let mut output = format!(
        "{} ({} members, {})\n  ID: {}",
        group.name, group.member_count, membership, group.id
    );
    if let Some(description) = &group.description {
        output.push_str(&format!("\n  Description: {description}"));
    }
    output
}

pub fn format_groups(groups: &[Group]) -> String {
    format_list("GROUPS", "No groups found.", groups, format_group)
}

pub fn format_members(members: &[GroupMember]) -> String {
    format_list("MEMBERS", "No members found.", members, |m| {
        format!("{} [{:?}]\n  User: {}", m.display_name, m.role, m.user_id)
    })
}

/// Format a group activity for display.
pub fn format_group_activity(activity: &GroupActivity) -> String {
    let answer = activity.user_rsvp.map_or("no answer", |s| s.as_str());
    format!(
        "{}\n  ID: {}\n  When: {}\n  Going: {}\n  Your RSVP: {}",
        activity.title,
        activity.id,
        time(&activity.scheduled_at),
        activity.rsvp_count,
        answer
    )
}

pub fn format_group_activities(activities: &[GroupActivity]) -> String {
    format_list("ACTIVITIES", "No activities scheduled.", activities, format_group_activity)
}

/// Format a conversation summary for display.
pub fn format_conversation(conversation: &Conversation) -> String {
    let title = conversation
        .title
        .clone()
        .unwrap_or_else(|| conversation.participant_ids.join(", "));
    let mut output = format!("{}\n  ID: {}", title, conversation.id);
    if conversation.unread_count > 0 {
        output.push_str(&format!("\n  Unread: {}", conversation.unread_count));
    }
    if let Some(last) = &conversation.last_message {
        output.push_str(&format!("\n  Last: {last}"));
    }
    if conversation.is_typing {
        let who = conversation.typing_user_name.as_deref().unwrap_or("Someone");
        output.push_str(&format!("\n  {who} is typing..."));
    }
    output
}

pub fn format_conversations(conversations: &[Conversation]) -> String {
    format_list("CONVERSATIONS", "No conversations yet.", conversations, format_conversation)
}

/// Format one message line.
pub fn format_message(message: &Message) -> String {
    let sender = message.sender_name.as_deref().unwrap_or(&message.sender_id);
    let pending = if message.is_pending { " (sending)" } else { "" };
    format!("[{}] {}: {}{}", time(&message.sent_at), sender, message.content, pending)
}

pub fn format_messages(messages: &[Message]) -> String {
    if messages.is_empty() {
        return "No messages yet.".to_string();
    }
    messages
        .iter()
        .map(format_message)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_review(review: &Review) -> String {
    let author = review.user_name.as_deref().unwrap_or(&review.user_id);
    let stars = "*".repeat(review.rating as usize);
    let mut output = format!("{stars} by {author}\n  ID: {}", review.id);
    if let Some(comment) = &review.comment {
        output.push_str(&format!("\n  {comment}"));
    }
    output
}

pub fn format_reviews(reviews: &[Review]) -> String {
    format_list("REVIEWS", "No reviews yet.", reviews, format_review)
}

/// Format a feed entry for display.
pub fn format_activity(activity: &Activity) -> String {
    let liked = if activity.is_liked { " (liked)" } else { "" };
    let mut output = format!(
        "{} - {}\n  ID: {}\n  Likes: {}{}  Comments: {}",
        activity.user_name,
        activity.activity_type,
        activity.id,
        activity.likes_count,
        liked,
        activity.comments_count
    );
    if let Some(content) = &activity.content {
        output.push_str(&format!("\n  {content}"));
    }
    output
}

pub fn format_feed(activities: &[Activity]) -> String {
    format_list("FEED", "Nothing in your feed yet.", activities, format_activity)
}

pub fn format_comments(comments: &[Comment]) -> String {
    format_list("COMMENTS", "No comments yet.", comments, |c| {
        format!("{} ({})\n  {}", c.user_name, time(&c.created_at), c.content)
    })
}

pub fn format_profile(profile: &SocialProfile) -> String {
    let following = if profile.is_following {
        "following"
    } else {
        "not following"
    };
    let mut output = format!(
        "{} ({})\n  ID: {}\n  Followers: {}  Following: {}  Activities: {}",
        profile.display_name,
        following,
        profile.id,
        profile.followers_count,
        profile.following_count,
        profile.activities_count
    );
    if let Some(bio) = &profile.bio {
        output.push_str(&format!("\n  Bio: {bio}"));
    }
    output
}
