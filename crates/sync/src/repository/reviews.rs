use serde_json::Value;

use fitsync_core::entities::{
    validate_rating, CreateReviewRequest, Review, ReviewDto, UpdateReviewRequest,
};
use fitsync_core::remote::{endpoints, RemoteError};
use fitsync_core::store::Query;
use fitsync_core::sync::{Result, SyncError};

use super::NO_BODY;
use crate::engine::{decode, CacheAside, WriteThrough};

/// Class reviews. Ratings are checked before anything is sent.
#[derive(Clone)]
pub struct ReviewRepository {
    engine: CacheAside,
}

impl ReviewRepository {
    pub fn new(engine: CacheAside) -> Self {
        Self { engine }
    }

    /// Lists a class's reviews, newest first.
    pub async fn list_reviews(&self, class_id: &str, from_cache: bool) -> Result<Vec<Review>> {
        let (filter_id, scope_id) = (class_id.to_string(), class_id.to_string());
        self.engine
            .list::<Review, ReviewDto>(
                endpoints::class_reviews(class_id),
                Query::all()
                    .filter(move |r: &Review| r.class_id == filter_id)
                    .sort_by(|a, b| b.created_at.cmp(&a.created_at)),
                WriteThrough::scope(move |r: &Review| r.class_id == scope_id),
                from_cache,
            )
            .await
    }

    pub async fn get_review(&self, id: &str, from_cache: bool) -> Result<Option<Review>> {
        self.engine
            .get::<Review, ReviewDto>(endpoints::review(id), id, from_cache)
            .await
    }

    /// Returns `user_id`'s review of `class_id`, if they wrote one.
    ///
    /// When the server reports none, any cached copy is evicted.
    pub async fn my_review(&self, class_id: &str, user_id: &str, from_cache: bool) -> Result<Option<Review>> {
        let store = self.engine.store();
        if from_cache {
            let (class_id, user_id) = (class_id.to_string(), user_id.to_string());
            let mine = store
                .fetch_all(&Query::all().filter(move |r: &Review| r.is_by(&class_id, &user_id)))
                .await?;
            return Ok(mine.into_iter().next());
        }

        let endpoint = endpoints::my_class_review(class_id);
        let value = match self.engine.call(endpoint.clone(), NO_BODY).await {
            Ok(value) => value,
            Err(SyncError::Remote(RemoteError::Server { status: 404, .. })) => Value::Null,
            Err(err) => return Err(err),
        };

        if value.is_null() {
            let (class_id, user_id) = (class_id.to_string(), user_id.to_string());
            let evicted = store
                .delete_where::<Review, _>(move |r| r.is_by(&class_id, &user_id))
                .await?;
            tracing::debug!(evicted, "No review on server");
            return Ok(None);
        }

        let review = Review::from(decode::<ReviewDto>(&endpoint, value)?);
        store.upsert(&review).await?;
        Ok(Some(review))
    }

    pub async fn create_review(&self, request: &CreateReviewRequest) -> Result<Review> {
        validate_rating(request.rating)?;
        self.engine
            .mutate::<Review, ReviewDto, _>(endpoints::create_review(&request.class_id), Some(request))
            .await
    }

    pub async fn update_review(&self, id: &str, request: &UpdateReviewRequest) -> Result<Review> {
        if let Some(rating) = request.rating {
            validate_rating(rating)?;
        }
        self.engine
            .mutate::<Review, ReviewDto, _>(endpoints::update_review(id), Some(request))
            .await
    }

    pub async fn delete_review(&self, id: &str) -> Result<()> {
        self.engine
            .remove::<Review>(endpoints::delete_review(id), id)
            .await
    }
}
