//! fitsync CLI entry point.

use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::Parser;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use fitsync::{Config, SyncServices};
use fitsync_client::cli::auth::AuthAction;
use fitsync_client::cli::bookings::BookingsAction;
use fitsync_client::cli::classes::ClassesAction;
use fitsync_client::cli::groups::GroupsAction;
use fitsync_client::cli::messages::MessagesAction;
use fitsync_client::cli::social::SocialAction;
use fitsync_client::cli::{Cli, Commands, OutputFormat};
use fitsync_client::output::{pretty, render};
use fitsync_client::{FileTokenStore, HttpRemoteClient, SseRealtimeChannel};
use fitsync_core::entities::{
    BookingFilter, ClassFilter, CreateBookingRequest, CreateConversationRequest,
    CreateGroupActivityRequest, CreateGroupRequest, CreateReviewRequest, MessageWindow,
    ReminderSettings,
};
use fitsync_core::realtime::RealtimeChannel;
use fitsync_core::sync::SyncError;

/// Everything a command handler needs.
struct App {
    services: SyncServices,
    http: HttpRemoteClient,
    format: OutputFormat,
    cached: bool,
    quiet: bool,
}

impl App {
    fn print<T, F>(&self, value: &T, pretty: F)
    where
        T: serde::Serialize + ?Sized,
        F: FnOnce(&T) -> String,
    {
        println!("{}", render(value, self.format, pretty));
    }

    fn done(&self, message: impl std::fmt::Display) {
        if !self.quiet {
            println!("{message}");
        }
    }
}

fn not_found(kind: &str, id: &str, cached: bool) -> anyhow::Error {
    if cached {
        anyhow!("{kind} {id} is not cached")
    } else {
        anyhow!("{kind} {id} not found")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable.
    let default_filter = if cli.quiet {
        "warn"
    } else {
        "fitsync=info,fitsync_client=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env();
    config.api_url = cli.base_url.clone();
    config.store_path = cli.store_path.clone();
    config.token_path = cli.token_path.clone();

    let tokens = Arc::new(FileTokenStore::new(&config.token_path));
    let http = HttpRemoteClient::new(&config.api_url).with_tokens(tokens.clone());
    let services = SyncServices::open(config, Arc::new(http.clone()), tokens)
        .await
        .context("failed to open the local cache")?;

    let app = App {
        services,
        http,
        format: cli.format,
        cached: cli.cached,
        quiet: cli.quiet,
    };

    let result = match cli.command {
        Commands::Auth(cmd) => auth(&app, cmd.action).await,
        Commands::Classes(cmd) => classes(&app, cmd.action).await,
        Commands::Bookings(cmd) => bookings(&app, cmd.action).await,
        Commands::Groups(cmd) => groups(&app, cmd.action).await,
        Commands::Messages(cmd) => messages(&app, cmd.action).await,
        Commands::Social(cmd) => social(&app, cmd.action).await,
    };
    if result.as_ref().is_err_and(is_retryable) {
        eprintln!("This looks temporary. Run the command again to retry.");
    }
    result
}

/// True if the failure came from the sync layer and may pass on a rerun.
fn is_retryable(err: &anyhow::Error) -> bool {
    err.downcast_ref::<SyncError>().is_some_and(SyncError::is_retryable)
}

async fn auth(app: &App, action: AuthAction) -> anyhow::Result<()> {
    let session = &app.services.session;
    match action {
        AuthAction::Login { email, password } => {
            let user = session.login(&email, &password).await?;
            app.print(&user, pretty::format_user);
        }
        AuthAction::Register {
            email,
            password,
            name,
        } => {
            let user = session.register(&email, &password, &name).await?;
            app.print(&user, pretty::format_user);
        }
        AuthAction::Logout => {
            app.services.logout().await?;
            app.done("Signed out");
        }
        AuthAction::Whoami => {
            let user = app
                .services
                .users
                .current_user(app.cached)
                .await?
                .ok_or_else(|| anyhow!("not signed in"))?;
            app.print(&user, pretty::format_user);
        }
    }
    Ok(())
}

async fn classes(app: &App, action: ClassesAction) -> anyhow::Result<()> {
    let services = &app.services;
    match action {
        ClassesAction::List {
            category,
            search,
            date,
        } => {
            let filter = ClassFilter {
                category,
                search,
                date,
            };
            let classes = services.classes.list_classes(filter, app.cached).await?;
            app.print(&classes, |c| pretty::format_classes(c));
        }
        ClassesAction::Get { id } => {
            let class = services
                .classes
                .get_class(&id, app.cached)
                .await?
                .ok_or_else(|| not_found("class", &id, app.cached))?;
            app.print(&class, pretty::format_class);
        }
        ClassesAction::Reviews { class_id } => {
            let reviews = services.reviews.list_reviews(&class_id, app.cached).await?;
            app.print(&reviews, |r| pretty::format_reviews(r));
        }
        ClassesAction::Review {
            class_id,
            rating,
            comment,
        } => {
            let request = CreateReviewRequest {
                class_id,
                rating,
                comment,
            };
            let review = services.reviews.create_review(&request).await?;
            app.print(&review, pretty::format_review);
        }
    }
    Ok(())
}

async fn bookings(app: &App, action: BookingsAction) -> anyhow::Result<()> {
    let repo = &app.services.bookings;
    match action {
        BookingsAction::List { status } => {
            let bookings = repo
                .list_bookings(BookingFilter { status }, app.cached)
                .await?;
            app.print(&bookings, |b| pretty::format_bookings(b));
        }
        BookingsAction::Get { id } => {
            let booking = repo
                .get_booking(&id, app.cached)
                .await?
                .ok_or_else(|| not_found("booking", &id, app.cached))?;
            app.print(&booking, pretty::format_booking);
        }
        BookingsAction::Create { class_id, remind } => {
            let mut request = CreateBookingRequest::new(class_id);
            if let Some(minutes) = remind {
                request = request.with_reminder(minutes);
            }
            let booking = repo.create_booking(&request).await?;
            app.print(&booking, pretty::format_booking);
        }
        BookingsAction::Cancel { id } => {
            let booking = repo.cancel_booking(&id).await?;
            app.print(&booking, pretty::format_booking);
        }
        BookingsAction::Attend { id } => {
            let booking = repo.mark_attended(&id).await?;
            app.print(&booking, pretty::format_booking);
        }
        BookingsAction::Reminder { id, minutes } => {
            let settings = ReminderSettings {
                enabled: minutes.is_some(),
                minutes_before: minutes,
            };
            let booking = repo.update_reminder(&id, settings).await?;
            app.print(&booking, pretty::format_booking);
        }
        BookingsAction::Delete { id } => {
            repo.delete_booking(&id).await?;
            app.done(format!("Deleted booking {id}"));
        }
    }
    Ok(())
}

async fn groups(app: &App, action: GroupsAction) -> anyhow::Result<()> {
    let repo = &app.services.groups;
    match action {
        GroupsAction::List => {
            let groups = repo.list_groups(app.cached).await?;
            app.print(&groups, |g| pretty::format_groups(g));
        }
        GroupsAction::Get { id } => {
            let group = repo
                .get_group(&id, app.cached)
                .await?
                .ok_or_else(|| not_found("group", &id, app.cached))?;
            app.print(&group, pretty::format_group);
        }
        GroupsAction::Create {
            name,
            description,
            private,
        } => {
            let request = CreateGroupRequest {
                name,
                description,
                is_private: private,
            };
            let group = repo.create_group(&request).await?;
            app.print(&group, pretty::format_group);
        }
        GroupsAction::Join { id } => {
            let group = repo.join_group(&id).await?;
            app.print(&group, pretty::format_group);
        }
        GroupsAction::Leave { id } => {
            let group = repo.leave_group(&id).await?;
            app.print(&group, pretty::format_group);
        }
        GroupsAction::Members { id } => {
            let members = repo.list_members(&id, app.cached).await?;
            app.print(&members, |m| pretty::format_members(m));
        }
        GroupsAction::Activities { id } => {
            let activities = repo.list_activities(&id, app.cached).await?;
            app.print(&activities, |a| pretty::format_group_activities(a));
        }
        GroupsAction::Schedule {
            group_id,
            title,
            at,
            location,
            description,
        } => {
            let request = CreateGroupActivityRequest {
                title,
                description,
                location,
                scheduled_at: at,
            };
            let activity = repo.create_activity(&group_id, &request).await?;
            app.print(&activity, pretty::format_group_activity);
        }
        GroupsAction::Rsvp {
            activity_id,
            answer,
        } => {
            let activity = repo.rsvp(&activity_id, answer.into()).await?;
            app.print(&activity, pretty::format_group_activity);
        }
    }
    Ok(())
}

async fn messages(app: &App, action: MessagesAction) -> anyhow::Result<()> {
    let repo = &app.services.messaging;
    match action {
        MessagesAction::Conversations => {
            let conversations = repo.list_conversations(app.cached).await?;
            app.print(&conversations, |c| pretty::format_conversations(c));
        }
        MessagesAction::Start {
            participants,
            title,
        } => {
            let request = CreateConversationRequest {
                participant_ids: participants,
                title,
            };
            let conversation = repo.create_conversation(&request).await?;
            app.print(&conversation, pretty::format_conversation);
        }
        MessagesAction::Show {
            conversation_id,
            limit,
        } => {
            let window =
                MessageWindow::latest(limit.unwrap_or(app.services.config.message_window_size));
            let messages = repo
                .list_messages(&conversation_id, window, app.cached)
                .await?;
            app.print(&messages, |m| pretty::format_messages(m));
        }
        MessagesAction::Send {
            conversation_id,
            content,
        } => {
            let message = repo
                .send_message_with_placeholder(&conversation_id, &content)
                .await?;
            app.print(&message, pretty::format_message);
        }
        MessagesAction::Read { conversation_id } => {
            repo.mark_read(&conversation_id).await?;
            app.done(format!("Marked {conversation_id} as read"));
        }
        MessagesAction::Watch => watch(app).await?,
    }
    Ok(())
}

/// Streams realtime events into the cache until Ctrl+C.
async fn watch(app: &App) -> anyhow::Result<()> {
    let capacity = app.services.config.realtime_channel_capacity;
    let channel = Arc::new(
        SseRealtimeChannel::connect(&app.http, capacity)
            .await
            .context("failed to connect to the event stream")?,
    );
    let mut events = channel.subscribe()?;
    let listener = app.services.start_realtime(channel.clone())?;
    app.done("Watching for messages (Ctrl+C to stop)");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(event) => app.print(&event, |e| {
                    format!("{} in {}", e.event_type, e.conversation_id)
                }),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event display fell behind");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    app.services.shutdown();
    listener.await.context("realtime listener panicked")?;
    Ok(())
}

async fn social(app: &App, action: SocialAction) -> anyhow::Result<()> {
    let repo = &app.services.social;
    match action {
        SocialAction::Feed { pages } => {
            let mut pager = app.services.feed();
            let mut feed = pager.refresh(app.cached).await?;
            if !app.cached {
                for _ in 1..pages {
                    if !pager.has_more() {
                        break;
                    }
                    feed.extend(pager.load_more().await?);
                }
            }
            app.print(&feed, |f| pretty::format_feed(f));
        }
        SocialAction::Like { id } => {
            let activity = repo.toggle_like(&id).await?;
            app.print(&activity, pretty::format_activity);
        }
        SocialAction::Comments { id } => {
            let comments = repo.list_comments(&id, app.cached).await?;
            app.print(&comments, |c| pretty::format_comments(c));
        }
        SocialAction::Comment { id, content } => {
            let comment = repo.add_comment(&id, &content).await?;
            app.print(&comment, |c| pretty::format_comments(std::slice::from_ref(c)));
        }
        SocialAction::Profile { user_id } => {
            let profile = repo
                .get_profile(&user_id, app.cached)
                .await?
                .ok_or_else(|| not_found("profile", &user_id, app.cached))?;
            app.print(&profile, pretty::format_profile);
        }
        SocialAction::Follow { user_id } => {
            let profile = repo.toggle_follow(&user_id).await?;
            app.print(&profile, pretty::format_profile);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitsync_core::remote::RemoteError;
    use fitsync_core::store::StoreError;

    #[test]
    fn test_transient_failures_suggest_retry() {
        let offline = anyhow::Error::from(SyncError::from(RemoteError::Transport(
            "connection refused".to_string(),
        )));
        let outage = anyhow::Error::from(SyncError::from(RemoteError::Server {
            status: 503,
            message: "maintenance".to_string(),
        }));
        let disk = anyhow::Error::from(SyncError::from(StoreError::QueryFailed(
            "disk I/O error".to_string(),
        )));

        assert!(is_retryable(&offline));
        assert!(is_retryable(&outage));
        assert!(is_retryable(&disk));
    }

    #[test]
    fn test_permanent_failures_do_not_suggest_retry() {
        let full = anyhow::Error::from(SyncError::from(RemoteError::Server {
            status: 409,
            message: "Class is full".to_string(),
        }));
        let signed_out = anyhow::Error::from(SyncError::from(RemoteError::Unauthorized));
        let missing = not_found("class", "c1", false);

        assert!(!is_retryable(&full));
        assert!(!is_retryable(&signed_out));
        assert!(!is_retryable(&missing));
    }
}
