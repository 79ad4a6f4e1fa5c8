use fitsync_core::entities::{UpdateProfileRequest, User, UserDto};
use fitsync_core::remote::endpoints;
use fitsync_core::sync::Result;

use super::NO_BODY;
use crate::engine::{decode, CacheAside};
use crate::session::CurrentUser;

/// User accounts, including the signed-in user's own.
#[derive(Clone)]
pub struct UserRepository {
    engine: CacheAside,
    current_user: CurrentUser,
}

impl UserRepository {
    pub fn new(engine: CacheAside, current_user: CurrentUser) -> Self {
        Self {
            engine,
            current_user,
        }
    }

    /// The signed-in user's account.
    ///
    /// A cache-only read returns `None` when nobody is signed in. A network
    /// read also records who the signed-in user is.
    pub async fn current_user(&self, from_cache: bool) -> Result<Option<User>> {
        if from_cache {
            let Some(id) = self.current_user.get() else {
                return Ok(None);
            };
            return Ok(self.engine.store().fetch_by_id::<User>(&id).await?);
        }

        let endpoint = endpoints::current_user();
        let value = self.engine.call(endpoint.clone(), NO_BODY).await?;
        let user = User::from(decode::<UserDto>(&endpoint, value)?);
        self.engine.store().upsert(&user).await?;
        self.current_user.set(Some(user.id.clone()));
        Ok(Some(user))
    }

    pub async fn get_user(&self, id: &str, from_cache: bool) -> Result<Option<User>> {
        self.engine
            .get::<User, UserDto>(endpoints::user(id), id, from_cache)
            .await
    }

    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<User> {
        self.engine
            .mutate::<User, UserDto, _>(endpoints::update_current_user(), Some(request))
            .await
    }
}
