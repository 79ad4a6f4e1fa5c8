//! Endpoint catalogue for the fitness service API.
//!
//! One constructor per resource path. Query filters are attached by the
//! repositories that know which filters apply.

use super::Endpoint;

// Auth

pub fn login() -> Endpoint {
    Endpoint::post("/auth/login")
}

pub fn register() -> Endpoint {
    Endpoint::post("/auth/register")
}

// Users

pub fn current_user() -> Endpoint {
    Endpoint::get("/users/me")
}

pub fn update_current_user() -> Endpoint {
    Endpoint::put("/users/me")
}

pub fn user(user_id: &str) -> Endpoint {
    Endpoint::get(format!("/users/{user_id}"))
}

// Classes

pub fn classes() -> Endpoint {
    Endpoint::get("/classes")
}

pub fn class(class_id: &str) -> Endpoint {
    Endpoint::get(format!("/classes/{class_id}"))
}

// Bookings

pub fn bookings() -> Endpoint {
    Endpoint::get("/bookings")
}

pub fn booking(booking_id: &str) -> Endpoint {
    Endpoint::get(format!("/bookings/{booking_id}"))
}

pub fn create_booking() -> Endpoint {
    Endpoint::post("/bookings")
}

pub fn cancel_booking(booking_id: &str) -> Endpoint {
    Endpoint::post(format!("/bookings/{booking_id}/cancel"))
}

pub fn attend_booking(booking_id: &str) -> Endpoint {
    Endpoint::post(format!("/bookings/{booking_id}/attend"))
}

pub fn booking_reminder(booking_id: &str) -> Endpoint {
    Endpoint::put(format!("/bookings/{booking_id}/reminder"))
}

pub fn delete_booking(booking_id: &str) -> Endpoint {
    Endpoint::delete(format!("/bookings/{booking_id}"))
}

// Groups

pub fn groups() -> Endpoint {
    Endpoint::get("/groups")
}

pub fn group(group_id: &str) -> Endpoint {
    Endpoint::get(format!("/groups/{group_id}"))
}

pub fn create_group() -> Endpoint {
    Endpoint::post("/groups")
}

pub fn join_group(group_id: &str) -> Endpoint {
    Endpoint::post(format!("/groups/{group_id}/join"))
}

pub fn leave_group(group_id: &str) -> Endpoint {
    Endpoint::post(format!("/groups/{group_id}/leave"))
}

pub fn group_members(group_id: &str) -> Endpoint {
    Endpoint::get(format!("/groups/{group_id}/members"))
}

pub fn group_activities(group_id: &str) -> Endpoint {
    Endpoint::get(format!("/groups/{group_id}/activities"))
}

pub fn create_group_activity(group_id: &str) -> Endpoint {
    Endpoint::post(format!("/groups/{group_id}/activities"))
}

pub fn group_activity_rsvp(activity_id: &str) -> Endpoint {
    Endpoint::post(format!("/group-activities/{activity_id}/rsvp"))
}

// Messaging

pub fn conversations() -> Endpoint {
    Endpoint::get("/conversations")
}

pub fn conversation(conversation_id: &str) -> Endpoint {
    Endpoint::get(format!("/conversations/{conversation_id}"))
}

pub fn create_conversation() -> Endpoint {
    Endpoint::post("/conversations")
}

pub fn messages(conversation_id: &str) -> Endpoint {
    Endpoint::get(format!("/conversations/{conversation_id}/messages"))
}

pub fn send_message(conversation_id: &str) -> Endpoint {
    Endpoint::post(format!("/conversations/{conversation_id}/messages"))
}

pub fn mark_conversation_read(conversation_id: &str) -> Endpoint {
    Endpoint::post(format!("/conversations/{conversation_id}/read"))
}

/// Server-sent stream of messaging events for the signed-in user.
pub fn realtime_events() -> Endpoint {
    Endpoint::get("/realtime/events")
}

// Reviews

pub fn class_reviews(class_id: &str) -> Endpoint {
    Endpoint::get(format!("/classes/{class_id}/reviews"))
}

pub fn my_class_review(class_id: &str) -> Endpoint {
    Endpoint::get(format!("/classes/{class_id}/reviews/mine"))
}

pub fn create_review(class_id: &str) -> Endpoint {
    Endpoint::post(format!("/classes/{class_id}/reviews"))
}

pub fn review(review_id: &str) -> Endpoint {
    Endpoint::get(format!("/reviews/{review_id}"))
}

pub fn update_review(review_id: &str) -> Endpoint {
    Endpoint::put(format!("/reviews/{review_id}"))
}

pub fn delete_review(review_id: &str) -> Endpoint {
    Endpoint::delete(format!("/reviews/{review_id}"))
}

// Social

pub fn feed(page: u32, limit: u32) -> Endpoint {
    Endpoint::get("/feed")
        .with_query("page", page)
        .with_query("limit", limit)
}

pub fn activity(activity_id: &str) -> Endpoint {
    Endpoint::get(format!("/activities/{activity_id}"))
}

pub fn like_activity(activity_id: &str) -> Endpoint {
    Endpoint::post(format!("/activities/{activity_id}/like"))
}

pub fn unlike_activity(activity_id: &str) -> Endpoint {
    Endpoint::delete(format!("/activities/{activity_id}/like"))
}

pub fn activity_comments(activity_id: &str) -> Endpoint {
    Endpoint::get(format!("/activities/{activity_id}/comments"))
}

pub fn create_comment(activity_id: &str) -> Endpoint {
    Endpoint::post(format!("/activities/{activity_id}/comments"))
}

pub fn profile(user_id: &str) -> Endpoint {
    Endpoint::get(format!("/profiles/{user_id}"))
}

pub fn follow(user_id: &str) -> Endpoint {
    Endpoint::post(format!("/profiles/{user_id}/follow"))
}

pub fn unfollow(user_id: &str) -> Endpoint {
    Endpoint::delete(format!("/profiles/{user_id}/follow"))
}
