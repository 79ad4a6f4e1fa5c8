mod booking;
mod class;
mod group;
mod messaging;
mod operations;
mod requests;
mod review;
mod social;
mod user;

pub use booking::{Booking, BookingDto, BookingStatus};
pub use class::{FitnessClass, FitnessClassDto};
pub use group::{
    Group, GroupActivity, GroupActivityDto, GroupDto, GroupMember, GroupMemberDto, MemberRole,
    RsvpStatus,
};
pub use messaging::{Conversation, ConversationDto, Message, MessageDto};
pub use operations::{
    compare_activities_by_recency, compare_bookings_by_class_start, compare_classes_by_start,
    compare_comments_by_time, compare_conversations_by_recency, compare_messages_by_time,
    sort_classes_by_start, sort_conversations_by_recency, sort_messages_by_time,
    validate_comment_content, validate_group_name, validate_message_content, validate_rating,
    ValidationError,
};
pub use requests::{
    BookingFilter, ClassFilter, CreateBookingRequest, CreateCommentRequest,
    CreateConversationRequest, CreateGroupActivityRequest, CreateGroupRequest,
    CreateReviewRequest, FeedPage, MessageWindow, ReminderSettings, RsvpRequest,
    SendMessageRequest, UpdateProfileRequest, UpdateReviewRequest,
};
pub use review::{Review, ReviewDto};
pub use social::{Activity, ActivityDto, Comment, CommentDto, SocialProfile, SocialProfileDto};
pub use user::{User, UserDto};
