//! Generic cache-aside engine.
//!
//! Every repository read and mutation goes through [`CacheAside`]:
//! - **Cache-only reads** hit the [`StoreHandle`] and never the network; a
//!   miss is an empty result, not an error.
//! - **Network reads** fetch, decode into DTOs, map to entities, write the
//!   result through and return what the server sent.
//! - **Mutations** go to the network first and fold the server's answer back
//!   into the store. Nothing is written when the request fails.
//!
//! A failing write-through fails the whole call even if the fetch succeeded.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use fitsync_core::remote::{Endpoint, RemoteClient, RemoteError};
use fitsync_core::store::{Query, Record};
use fitsync_core::sync::Result;

use crate::store::StoreHandle;

type Scope<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// How a network list result is folded into the store.
pub enum WriteThrough<T> {
    /// Clear every cached record matching the scope, then insert the result.
    ReplaceScope(Scope<T>),
    /// Upsert the result, leaving other cached records alone.
    Upsert,
}

impl<T> WriteThrough<T> {
    /// Replace the records matching `scope`.
    pub fn scope(scope: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        WriteThrough::ReplaceScope(Box::new(scope))
    }

    /// Replace every cached record of the kind.
    pub fn whole_collection() -> Self {
        WriteThrough::ReplaceScope(Box::new(|_| true))
    }
}

/// Decodes a JSON body into `D`, reporting the endpoint on failure.
pub(crate) fn decode<D: DeserializeOwned>(endpoint: &Endpoint, value: Value) -> Result<D> {
    serde_json::from_value(value)
        .map_err(|e| RemoteError::Decode(format!("{endpoint}: {e}")).into())
}

/// Encodes a request payload.
pub(crate) fn encode<B: Serialize>(endpoint: &Endpoint, body: &B) -> Result<Value> {
    serde_json::to_value(body)
        .map_err(|e| RemoteError::Decode(format!("{endpoint}: cannot encode request: {e}")).into())
}

/// Cache-aside access to one remote service and one local store.
#[derive(Clone)]
pub struct CacheAside {
    remote: Arc<dyn RemoteClient>,
    store: StoreHandle,
}

impl CacheAside {
    pub fn new(remote: Arc<dyn RemoteClient>, store: StoreHandle) -> Self {
        Self { remote, store }
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// Lists entities of kind `T`.
    ///
    /// With `from_cache` the query's predicate and ordering run against the
    /// store. Otherwise the server's list is written through according to
    /// `write` and returned in query order.
    pub async fn list<T, D>(
        &self,
        endpoint: Endpoint,
        query: Query<T>,
        write: WriteThrough<T>,
        from_cache: bool,
    ) -> Result<Vec<T>>
    where
        T: Record + From<D>,
        D: DeserializeOwned,
    {
        if from_cache {
            let items = self.store.fetch_all(&query).await?;
            tracing::trace!(kind = T::KIND, count = items.len(), "Cache read for list");
            return Ok(items);
        }

        let value = self.remote.request(&endpoint, None).await?;
        let dtos: Vec<D> = decode(&endpoint, value)?;
        let mut items: Vec<T> = dtos.into_iter().map(T::from).collect();

        match write {
            WriteThrough::ReplaceScope(scope) => {
                self.store.replace_scope(move |item: &T| scope(item), &items).await?
            }
            WriteThrough::Upsert => self.store.upsert_all(&items).await?,
        }
        tracing::debug!(
            kind = T::KIND,
            endpoint = %endpoint,
            count = items.len(),
            "Wrote through list"
        );

        query.sort(&mut items);
        Ok(items)
    }

    /// Fetches one entity by id.
    ///
    /// A 404 from the server evicts any cached copy and returns `None`.
    pub async fn get<T, D>(&self, endpoint: Endpoint, id: &str, from_cache: bool) -> Result<Option<T>>
    where
        T: Record + From<D>,
        D: DeserializeOwned,
    {
        if from_cache {
            let item = self.store.fetch_by_id::<T>(id).await?;
            tracing::trace!(kind = T::KIND, id, hit = item.is_some(), "Cache read by id");
            return Ok(item);
        }

        let value = match self.remote.request(&endpoint, None).await {
            Ok(value) => value,
            Err(RemoteError::Server { status: 404, .. }) => {
                self.store.delete::<T>(id).await?;
                tracing::debug!(kind = T::KIND, id, "Entity gone on server, evicted");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };
        let item = T::from(decode::<D>(&endpoint, value)?);
        self.store.upsert(&item).await?;
        tracing::debug!(kind = T::KIND, id = item.id(), "Wrote through entity");
        Ok(Some(item))
    }

    /// Sends a mutation and upserts the entity the server returns.
    pub async fn mutate<T, D, B>(&self, endpoint: Endpoint, body: Option<&B>) -> Result<T>
    where
        T: Record + From<D>,
        D: DeserializeOwned,
        B: Serialize,
    {
        let value = self.send(&endpoint, body).await?;
        let item = T::from(decode::<D>(&endpoint, value)?);
        self.store.upsert(&item).await?;
        tracing::debug!(kind = T::KIND, id = item.id(), endpoint = %endpoint, "Mutation applied");
        Ok(item)
    }

    /// Sends a delete and evicts the cached entity.
    pub async fn remove<T: Record>(&self, endpoint: Endpoint, id: &str) -> Result<()> {
        self.remote.request(&endpoint, None).await?;
        let removed = self.store.delete::<T>(id).await?;
        tracing::debug!(kind = T::KIND, id, removed, "Entity deleted");
        Ok(())
    }

    /// Sends a request without touching the store and decodes the answer.
    pub async fn fetch<D, B>(&self, endpoint: Endpoint, body: Option<&B>) -> Result<D>
    where
        D: DeserializeOwned,
        B: Serialize,
    {
        let value = self.send(&endpoint, body).await?;
        decode(&endpoint, value)
    }

    /// Sends a request and returns the raw answer.
    pub async fn call<B: Serialize>(&self, endpoint: Endpoint, body: Option<&B>) -> Result<Value> {
        self.send(&endpoint, body).await
    }

    async fn send<B: Serialize>(&self, endpoint: &Endpoint, body: Option<&B>) -> Result<Value> {
        let body = body.map(|b| encode(endpoint, b)).transpose()?;
        Ok(self.remote.request(endpoint, body).await?)
    }
}
