use fitsync_core::entities::{
    compare_activities_by_recency, compare_comments_by_time, validate_comment_content, Activity,
    ActivityDto, Comment, CommentDto, CreateCommentRequest, FeedPage, SocialProfile,
    SocialProfileDto,
};
use fitsync_core::remote::{endpoints, Endpoint};
use fitsync_core::store::Query;
use fitsync_core::sync::{FollowToggle, LikeToggle, Result};

use super::NO_BODY;
use crate::engine::{CacheAside, WriteThrough};
use crate::optimistic::OptimisticMutator;

/// Pages through the activity feed.
///
/// Page 1 replaces the cached feed; later pages are added to it. A page that
/// fails to load is not counted, so `load_more` can simply be called again.
pub struct FeedPager {
    engine: CacheAside,
    page: FeedPage,
    has_more: bool,
}

impl FeedPager {
    pub fn new(engine: CacheAside, page_size: u32) -> Self {
        Self {
            engine,
            page: FeedPage {
                page: 0,
                limit: page_size.max(1),
            },
            has_more: true,
        }
    }

    /// Number of the last page loaded, 0 before the first load.
    pub fn current_page(&self) -> u32 {
        self.page.page
    }

    /// False once a page came back shorter than the page size.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Loads the first page.
    ///
    /// With `from_cache` the cached feed is returned and the pager is left
    /// where it was.
    pub async fn refresh(&mut self, from_cache: bool) -> Result<Vec<Activity>> {
        if from_cache {
            return self.cached_feed().await;
        }
        let activities = self
            .load(endpoints::feed(1, self.page.limit), WriteThrough::whole_collection())
            .await?;
        self.page.page = 1;
        self.has_more = activities.len() >= self.page.limit as usize;
        Ok(activities)
    }

    /// Loads the next page, or nothing if the feed is exhausted.
    pub async fn load_more(&mut self) -> Result<Vec<Activity>> {
        if !self.has_more {
            return Ok(Vec::new());
        }
        self.page.page += 1;
        let endpoint = endpoints::feed(self.page.page, self.page.limit);
        match self.load(endpoint, WriteThrough::Upsert).await {
            Ok(activities) => {
                self.has_more = activities.len() >= self.page.limit as usize;
                Ok(activities)
            }
            Err(err) => {
                self.page.page -= 1;
                tracing::warn!(page = self.page.page + 1, error = %err, "Feed page failed to load");
                Err(err)
            }
        }
    }

    /// Every cached feed entry, newest first.
    pub async fn cached_feed(&self) -> Result<Vec<Activity>> {
        self.engine
            .store()
            .fetch_all(&Query::all().sort_by(compare_activities_by_recency))
            .await
            .map_err(Into::into)
    }

    async fn load(&self, endpoint: Endpoint, write: WriteThrough<Activity>) -> Result<Vec<Activity>> {
        self.engine
            .list::<Activity, ActivityDto>(
                endpoint,
                Query::all().sort_by(compare_activities_by_recency),
                write,
                false,
            )
            .await
    }
}

/// Activities, comments, likes and follows.
#[derive(Clone)]
pub struct SocialRepository {
    engine: CacheAside,
    mutator: OptimisticMutator,
}

impl SocialRepository {
    pub fn new(engine: CacheAside, mutator: OptimisticMutator) -> Self {
        Self { engine, mutator }
    }

    /// A fresh pager over the feed.
    pub fn feed(&self, page_size: u32) -> FeedPager {
        FeedPager::new(self.engine.clone(), page_size)
    }

    pub async fn get_activity(&self, id: &str, from_cache: bool) -> Result<Option<Activity>> {
        self.engine
            .get::<Activity, ActivityDto>(endpoints::activity(id), id, from_cache)
            .await
    }

    /// Likes or unlikes an activity, flipping the cached copy immediately.
    pub async fn toggle_like(&self, activity_id: &str) -> Result<Activity> {
        let engine = self.engine.clone();
        let id = activity_id.to_string();
        self.mutator
            .run::<Activity, _, _, _, _>(activity_id, LikeToggle, move |patched| async move {
                let endpoint = if patched.is_liked {
                    endpoints::like_activity(&id)
                } else {
                    endpoints::unlike_activity(&id)
                };
                engine.call(endpoint, NO_BODY).await?;
                Ok(patched)
            })
            .await
    }

    /// Lists an activity's comments, oldest first.
    pub async fn list_comments(&self, activity_id: &str, from_cache: bool) -> Result<Vec<Comment>> {
        let (filter_id, scope_id) = (activity_id.to_string(), activity_id.to_string());
        self.engine
            .list::<Comment, CommentDto>(
                endpoints::activity_comments(activity_id),
                Query::all()
                    .filter(move |c: &Comment| c.activity_id == filter_id)
                    .sort_by(compare_comments_by_time),
                WriteThrough::scope(move |c: &Comment| c.activity_id == scope_id),
                from_cache,
            )
            .await
    }

    /// Posts a comment and bumps the cached activity's comment count.
    pub async fn add_comment(&self, activity_id: &str, content: &str) -> Result<Comment> {
        let request = CreateCommentRequest {
            content: validate_comment_content(content)?,
        };
        let comment = self
            .engine
            .mutate::<Comment, CommentDto, _>(endpoints::create_comment(activity_id), Some(&request))
            .await?;
        self.engine
            .store()
            .update::<Activity, _>(activity_id, |a| {
                a.comments_count = a.comments_count.saturating_add(1)
            })
            .await?;
        Ok(comment)
    }

    pub async fn get_profile(&self, user_id: &str, from_cache: bool) -> Result<Option<SocialProfile>> {
        self.engine
            .get::<SocialProfile, SocialProfileDto>(endpoints::profile(user_id), user_id, from_cache)
            .await
    }

    /// Follows or unfollows a user, flipping the cached profile immediately.
    pub async fn toggle_follow(&self, user_id: &str) -> Result<SocialProfile> {
        let engine = self.engine.clone();
        let id = user_id.to_string();
        self.mutator
            .run::<SocialProfile, _, _, _, _>(user_id, FollowToggle, move |patched| async move {
                let endpoint = if patched.is_following {
                    endpoints::follow(&id)
                } else {
                    endpoints::unfollow(&id)
                };
                engine.call(endpoint, NO_BODY).await?;
                Ok(patched)
            })
            .await
    }
}
