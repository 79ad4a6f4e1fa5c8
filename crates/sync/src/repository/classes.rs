use fitsync_core::entities::{compare_classes_by_start, ClassFilter, FitnessClass, FitnessClassDto};
use fitsync_core::remote::endpoints;
use fitsync_core::store::Query;
use fitsync_core::sync::Result;

use crate::engine::{CacheAside, WriteThrough};

/// The class catalogue. Read-only from the client's side.
#[derive(Clone)]
pub struct ClassRepository {
    engine: CacheAside,
}

impl ClassRepository {
    pub fn new(engine: CacheAside) -> Self {
        Self { engine }
    }

    /// Lists classes, earliest first.
    ///
    /// A network refresh replaces every cached class the filter matches;
    /// with an empty filter that is the whole catalogue.
    pub async fn list_classes(&self, filter: ClassFilter, from_cache: bool) -> Result<Vec<FitnessClass>> {
        let scope = filter.clone();
        let predicate = filter.clone();
        self.engine
            .list::<FitnessClass, FitnessClassDto>(
                filter.apply(endpoints::classes()),
                Query::all()
                    .filter(move |c| predicate.matches(c))
                    .sort_by(compare_classes_by_start),
                WriteThrough::scope(move |c| scope.matches(c)),
                from_cache,
            )
            .await
    }

    pub async fn get_class(&self, id: &str, from_cache: bool) -> Result<Option<FitnessClass>> {
        self.engine
            .get::<FitnessClass, FitnessClassDto>(endpoints::class(id), id, from_cache)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use fitsync_core::remote::Method;
    use serde_json::json;

    use crate::store::{InMemoryStore, StoreHandle};
    use crate::testing::MockRemote;

    fn class_json(id: &str, category: &str, start: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": format!("Class {id}"),
            "category": category,
            "instructorName": "Dana",
            "startTime": start,
            "durationMinutes": 45,
            "capacity": 12
        })
    }

    fn repository(remote: Arc<MockRemote>) -> ClassRepository {
        ClassRepository::new(CacheAside::new(
            remote,
            StoreHandle::new(InMemoryStore::new()),
        ))
    }

    #[tokio::test]
    async fn test_cache_only_on_empty_store_returns_empty_without_network() {
        let remote = Arc::new(MockRemote::new());
        let repo = repository(remote.clone());

        let classes = repo.list_classes(ClassFilter::default(), true).await.unwrap();

        assert!(classes.is_empty());
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn test_refresh_supersedes_cached_catalogue() {
        let store = StoreHandle::new(InMemoryStore::new());
        let first = Arc::new(MockRemote::new());
        first.respond(
            Method::Get,
            "/classes",
            json!([
                class_json("c2", "yoga", "2024-05-02T18:00:00Z"),
                class_json("c1", "hiit", "2024-05-01T18:00:00Z"),
            ]),
        );
        let repo = ClassRepository::new(CacheAside::new(first, store.clone()));

        let fetched = repo.list_classes(ClassFilter::default(), false).await.unwrap();
        let ids: Vec<_> = fetched.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2"]);

        let second = Arc::new(MockRemote::new());
        second.respond(
            Method::Get,
            "/classes",
            json!([class_json("c3", "spin", "2024-05-03T18:00:00Z")]),
        );
        let repo = ClassRepository::new(CacheAside::new(second, store));
        repo.list_classes(ClassFilter::default(), false).await.unwrap();

        let cached = repo.list_classes(ClassFilter::default(), true).await.unwrap();
        let ids: Vec<_> = cached.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c3"]);
    }

    #[tokio::test]
    async fn test_cache_only_filter_by_category() {
        let remote = Arc::new(MockRemote::new());
        remote.respond(
            Method::Get,
            "/classes",
            json!([
                class_json("c1", "yoga", "2024-05-01T18:00:00Z"),
                class_json("c2", "hiit", "2024-05-02T18:00:00Z"),
            ]),
        );
        let repo = repository(remote);
        repo.list_classes(ClassFilter::default(), false).await.unwrap();

        let yoga = repo
            .list_classes(ClassFilter::default().with_category("yoga"), true)
            .await
            .unwrap();
        assert_eq!(yoga.len(), 1);
        assert_eq!(yoga[0].id, "c1");
    }

    #[tokio::test]
    async fn test_get_class_from_cache() {
        let remote = Arc::new(MockRemote::new());
        remote.respond(
            Method::Get,
            "/classes/c1",
            class_json("c1", "yoga", "2024-05-01T18:00:00Z"),
        );
        let repo = repository(remote.clone());

        repo.get_class("c1", false).await.unwrap();
        let cached = repo.get_class("c1", true).await.unwrap().unwrap();
        assert_eq!(cached.spots_remaining, 12);
        assert_eq!(remote.calls(), 1);
    }
}
