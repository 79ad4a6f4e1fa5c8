use serde_json::Value;

use fitsync_core::entities::{
    validate_group_name, CreateGroupActivityRequest, CreateGroupRequest, Group, GroupActivity,
    GroupActivityDto, GroupDto, GroupMember, GroupMemberDto, RsvpRequest, RsvpStatus,
};
use fitsync_core::remote::endpoints;
use fitsync_core::store::Query;
use fitsync_core::sync::{MembershipChange, Result, RsvpChange};

use super::NO_BODY;
use crate::engine::{decode, CacheAside, WriteThrough};
use crate::optimistic::OptimisticMutator;

/// Groups, their members and their scheduled activities.
#[derive(Clone)]
pub struct GroupRepository {
    engine: CacheAside,
    mutator: OptimisticMutator,
}

impl GroupRepository {
    pub fn new(engine: CacheAside, mutator: OptimisticMutator) -> Self {
        Self { engine, mutator }
    }

    /// Lists groups by name. A refresh replaces every cached group.
    pub async fn list_groups(&self, from_cache: bool) -> Result<Vec<Group>> {
        self.engine
            .list::<Group, GroupDto>(
                endpoints::groups(),
                Query::all().sort_by(|a: &Group, b: &Group| a.name.cmp(&b.name)),
                WriteThrough::whole_collection(),
                from_cache,
            )
            .await
    }

    pub async fn get_group(&self, id: &str, from_cache: bool) -> Result<Option<Group>> {
        self.engine
            .get::<Group, GroupDto>(endpoints::group(id), id, from_cache)
            .await
    }

    /// Creates a group. A blank name is rejected before any request.
    pub async fn create_group(&self, request: &CreateGroupRequest) -> Result<Group> {
        let request = CreateGroupRequest {
            name: validate_group_name(&request.name)?,
            ..request.clone()
        };
        self.engine
            .mutate::<Group, GroupDto, _>(endpoints::create_group(), Some(&request))
            .await
    }

    /// Joins a group, optimistically marking it joined.
    pub async fn join_group(&self, id: &str) -> Result<Group> {
        self.change_membership(id, true).await
    }

    /// Leaves a group, optimistically marking it left.
    pub async fn leave_group(&self, id: &str) -> Result<Group> {
        self.change_membership(id, false).await
    }

    async fn change_membership(&self, id: &str, join: bool) -> Result<Group> {
        let endpoint = if join {
            endpoints::join_group(id)
        } else {
            endpoints::leave_group(id)
        };
        let engine = self.engine.clone();
        self.mutator
            .run::<Group, _, _, _, _>(id, MembershipChange { join }, move |patched| async move {
                engine.call(endpoint, NO_BODY).await?;
                Ok(patched)
            })
            .await
    }

    /// Lists a group's members. A refresh replaces that group's cached members.
    pub async fn list_members(&self, group_id: &str, from_cache: bool) -> Result<Vec<GroupMember>> {
        let (filter_id, scope_id) = (group_id.to_string(), group_id.to_string());
        self.engine
            .list::<GroupMember, GroupMemberDto>(
                endpoints::group_members(group_id),
                Query::all()
                    .filter(move |m: &GroupMember| m.group_id == filter_id)
                    .sort_by(|a, b| a.joined_at.cmp(&b.joined_at)),
                WriteThrough::scope(move |m: &GroupMember| m.group_id == scope_id),
                from_cache,
            )
            .await
    }

    /// Lists a group's activities, soonest first.
    pub async fn list_activities(&self, group_id: &str, from_cache: bool) -> Result<Vec<GroupActivity>> {
        let (filter_id, scope_id) = (group_id.to_string(), group_id.to_string());
        self.engine
            .list::<GroupActivity, GroupActivityDto>(
                endpoints::group_activities(group_id),
                Query::all()
                    .filter(move |a: &GroupActivity| a.group_id == filter_id)
                    .sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at)),
                WriteThrough::scope(move |a: &GroupActivity| a.group_id == scope_id),
                from_cache,
            )
            .await
    }

    pub async fn create_activity(
        &self,
        group_id: &str,
        request: &CreateGroupActivityRequest,
    ) -> Result<GroupActivity> {
        self.engine
            .mutate::<GroupActivity, GroupActivityDto, _>(
                endpoints::create_group_activity(group_id),
                Some(request),
            )
            .await
    }

    /// Sets or withdraws the signed-in user's RSVP.
    ///
    /// The count and answer change immediately. When the server answers with
    /// the activity, its copy replaces the optimistic one.
    pub async fn rsvp(&self, activity_id: &str, status: Option<RsvpStatus>) -> Result<GroupActivity> {
        let engine = self.engine.clone();
        let endpoint = endpoints::group_activity_rsvp(activity_id);
        let activity = self
            .mutator
            .run::<GroupActivity, _, _, _, _>(activity_id, RsvpChange { status }, move |patched| async move {
                let body = RsvpRequest { status };
                match engine.call(endpoint.clone(), Some(&body)).await? {
                    Value::Null => Ok(patched),
                    value => {
                        let dto: GroupActivityDto = decode(&endpoint, value)?;
                        let server = GroupActivity::from(dto);
                        engine.store().upsert(&server).await?;
                        Ok(server)
                    }
                }
            })
            .await?;
        tracing::debug!(
            activity_id,
            rsvp = ?activity.user_rsvp,
            rsvp_count = activity.rsvp_count,
            "RSVP recorded"
        );
        Ok(activity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;
    use fitsync_core::entities::ValidationError;
    use fitsync_core::remote::{Method, RemoteError};
    use fitsync_core::sync::SyncError;
    use serde_json::json;

    use crate::store::{InMemoryStore, StoreHandle};
    use crate::testing::MockRemote;

    fn group(id: &str, is_member: bool, members: u32) -> Group {
        Group {
            id: id.to_string(),
            name: format!("Group {id}"),
            description: None,
            owner_id: "owner".to_string(),
            is_private: false,
            member_count: members,
            is_member,
            image_url: None,
            created_at: Utc::now(),
        }
    }

    fn activity(id: &str, rsvp: Option<RsvpStatus>, count: u32) -> GroupActivity {
        GroupActivity {
            id: id.to_string(),
            group_id: "grp".to_string(),
            title: "Sunday long run".to_string(),
            description: None,
            location: None,
            scheduled_at: Utc::now(),
            created_by: "owner".to_string(),
            rsvp_count: count,
            user_rsvp: rsvp,
        }
    }

    fn member_json(id: &str, group_id: &str, joined: &str) -> Value {
        json!({
            "id": id,
            "groupId": group_id,
            "userId": format!("user-{id}"),
            "displayName": "Sam",
            "joinedAt": joined
        })
    }

    fn repository(remote: Arc<MockRemote>) -> (StoreHandle, GroupRepository) {
        let store = StoreHandle::new(InMemoryStore::new());
        let repo = GroupRepository::new(
            CacheAside::new(remote, store.clone()),
            OptimisticMutator::new(store.clone()),
        );
        (store, repo)
    }

    #[tokio::test]
    async fn test_rsvp_yes_then_maybe() {
        let remote = Arc::new(MockRemote::new());
        remote.respond(Method::Post, "/group-activities/g1/rsvp", Value::Null);
        let (store, repo) = repository(remote.clone());
        store.upsert(&activity("g1", None, 5)).await.unwrap();

        let yes = repo.rsvp("g1", Some(RsvpStatus::Yes)).await.unwrap();
        assert_eq!(yes.rsvp_count, 6);
        assert_eq!(remote.last_body(), Some(json!({ "status": "yes" })));

        let maybe = repo.rsvp("g1", Some(RsvpStatus::Maybe)).await.unwrap();
        assert_eq!(maybe.rsvp_count, 5);
        assert_eq!(maybe.user_rsvp, Some(RsvpStatus::Maybe));

        let cached = store.fetch_by_id::<GroupActivity>("g1").await.unwrap().unwrap();
        assert_eq!(cached.rsvp_count, 5);
    }

    #[tokio::test]
    async fn test_rsvp_adopts_server_copy() {
        let remote = Arc::new(MockRemote::new());
        remote.respond(
            Method::Post,
            "/group-activities/g1/rsvp",
            json!({
                "id": "g1",
                "groupId": "grp",
                "title": "Sunday long run",
                "scheduledAt": "2024-05-05T07:00:00Z",
                "createdBy": "owner",
                "rsvpCount": 9,
                "userRSVP": "yes"
            }),
        );
        let (store, repo) = repository(remote);
        store.upsert(&activity("g1", None, 5)).await.unwrap();

        let result = repo.rsvp("g1", Some(RsvpStatus::Yes)).await.unwrap();
        assert_eq!(result.rsvp_count, 9);
        let cached = store.fetch_by_id::<GroupActivity>("g1").await.unwrap().unwrap();
        assert_eq!(cached.rsvp_count, 9);
    }

    #[tokio::test]
    async fn test_failed_join_rolls_back() {
        let remote = Arc::new(MockRemote::new());
        remote.fail(
            Method::Post,
            "/groups/grp/join",
            RemoteError::Transport("offline".to_string()),
        );
        let (store, repo) = repository(remote);
        store.upsert(&group("grp", false, 3)).await.unwrap();

        let err = repo.join_group("grp").await.unwrap_err();
        assert!(err.is_retryable());

        let cached = repo.get_group("grp", true).await.unwrap().unwrap();
        assert!(!cached.is_member);
        assert_eq!(cached.member_count, 3);
    }

    #[tokio::test]
    async fn test_leave_group() {
        let remote = Arc::new(MockRemote::new());
        remote.respond(Method::Post, "/groups/grp/leave", json!({ "ok": true }));
        let (store, repo) = repository(remote);
        store.upsert(&group("grp", true, 3)).await.unwrap();

        let left = repo.leave_group("grp").await.unwrap();
        assert!(!left.is_member);
        assert_eq!(left.member_count, 2);
    }

    #[tokio::test]
    async fn test_join_uncached_group_makes_no_request() {
        let remote = Arc::new(MockRemote::new());
        let (_store, repo) = repository(remote.clone());

        let err = repo.join_group("ghost").await.unwrap_err();
        assert!(matches!(err, SyncError::NotCached { .. }));
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn test_members_scoped_per_group() {
        let remote = Arc::new(MockRemote::new());
        remote
            .respond(
                Method::Get,
                "/groups/a/members",
                json!([member_json("m1", "a", "2024-01-02T00:00:00Z")]),
            )
            .respond(
                Method::Get,
                "/groups/b/members",
                json!([
                    member_json("m3", "b", "2024-01-03T00:00:00Z"),
                    member_json("m2", "b", "2024-01-01T00:00:00Z"),
                ]),
            );
        let (_store, repo) = repository(remote.clone());

        repo.list_members("a", false).await.unwrap();
        repo.list_members("b", false).await.unwrap();

        let a = repo.list_members("a", true).await.unwrap();
        assert_eq!(a.len(), 1);
        let b: Vec<_> = repo
            .list_members("b", true)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(b, vec!["m2", "m3"]);
        assert_eq!(remote.calls(), 2);
    }

    #[tokio::test]
    async fn test_create_group_rejects_blank_name() {
        let remote = Arc::new(MockRemote::new());
        let (_store, repo) = repository(remote.clone());

        let err = repo
            .create_group(&CreateGroupRequest {
                name: "   ".to_string(),
                description: None,
                is_private: false,
            })
            .await
            .unwrap_err();

        assert_eq!(err, SyncError::InvalidInput(ValidationError::EmptyGroupName));
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn test_refresh_replaces_group_cached_under_old_schema() {
        use fitsync_core::store::{LocalStore, StoredRecord};

        let memory = InMemoryStore::new();
        memory
            .insert(StoredRecord {
                kind: "group".to_string(),
                id: "stale".to_string(),
                body: br#"{"id":"stale"}"#.to_vec(),
            })
            .await
            .unwrap();
        let remote = Arc::new(MockRemote::new());
        remote.respond(
            Method::Get,
            "/groups",
            json!([{
                "id": "g1",
                "name": "Morning runners",
                "ownerId": "owner",
                "createdAt": "2024-05-01T06:00:00Z"
            }]),
        );
        let store = StoreHandle::new(memory.clone());
        let repo = GroupRepository::new(
            CacheAside::new(remote, store.clone()),
            OptimisticMutator::new(store),
        );

        assert!(repo.list_groups(true).await.unwrap().is_empty());

        let groups = repo.list_groups(false).await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Morning runners");
        assert_eq!(memory.len("group").await, 1);
        assert_eq!(repo.list_groups(true).await.unwrap(), groups);
    }
}
