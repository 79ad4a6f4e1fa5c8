//! Test doubles shared by the repository tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use fitsync_core::auth::{AuthError, Result as AuthResult, TokenPair, TokenStore};
use fitsync_core::remote::{Endpoint, Method, RemoteClient, RemoteError, Result as RemoteResult};
use fitsync_core::store::{LocalStore, Result as StoreResult, StoreError, StoredRecord};

use crate::store::InMemoryStore;

type Response = RemoteResult<Value>;

/// Scripted remote client that records every request.
///
/// Responses are queued per `METHOD path`; the last queued response for a
/// route is reused once the queue is down to one.
#[derive(Default)]
pub struct MockRemote {
    responses: Mutex<HashMap<String, VecDeque<Response>>>,
    requests: Mutex<Vec<(Endpoint, Option<Value>)>>,
    calls: AtomicUsize,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    fn route(method: Method, path: &str) -> String {
        format!("{method} {path}")
    }

    pub fn respond(&self, method: Method, path: &str, body: Value) -> &Self {
        self.push(method, path, Ok(body))
    }

    pub fn fail(&self, method: Method, path: &str, error: RemoteError) -> &Self {
        self.push(method, path, Err(error))
    }

    fn push(&self, method: Method, path: &str, response: Response) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .entry(Self::route(method, path))
            .or_default()
            .push_back(response);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(Endpoint, Option<Value>)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_body(&self) -> Option<Value> {
        self.requests
            .lock()
            .unwrap()
            .last()
            .and_then(|(_, body)| body.clone())
    }
}

#[async_trait]
impl RemoteClient for MockRemote {
    async fn request(&self, endpoint: &Endpoint, body: Option<Value>) -> RemoteResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((endpoint.clone(), body));

        let route = Self::route(endpoint.method, &endpoint.path);
        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(&route) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Err(RemoteError::Server {
                status: 404,
                message: format!("no canned response for {route}"),
            }),
        }
    }
}

/// Store that delegates to memory until told to fail writes.
///
/// Clones share state, so a test can keep one and hand another to a handle.
#[derive(Clone, Default)]
pub struct FailingStore {
    inner: InMemoryStore,
    fail_writes: Arc<AtomicBool>,
    /// Writes still allowed before every later write fails.
    write_budget: Arc<Mutex<Option<usize>>>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Lets `writes` more writes through, then fails the rest.
    pub fn fail_after(&self, writes: usize) {
        *self.write_budget.lock().unwrap() = Some(writes);
    }

    fn check(&self) -> StoreResult<()> {
        let failure =
            || -> StoreResult<()> { Err(StoreError::QueryFailed("disk I/O error".to_string())) };
        if self.fail_writes.load(Ordering::SeqCst) {
            return failure();
        }
        let mut budget = self.write_budget.lock().unwrap();
        match budget.as_mut() {
            Some(0) => failure(),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LocalStore for FailingStore {
    async fn fetch_all(&self, kind: &str) -> StoreResult<Vec<StoredRecord>> {
        self.inner.fetch_all(kind).await
    }

    async fn fetch_by_id(&self, kind: &str, id: &str) -> StoreResult<Option<StoredRecord>> {
        self.inner.fetch_by_id(kind, id).await
    }

    async fn insert(&self, record: StoredRecord) -> StoreResult<()> {
        self.check()?;
        self.inner.insert(record).await
    }

    async fn delete(&self, kind: &str, id: &str) -> StoreResult<bool> {
        self.check()?;
        self.inner.delete(kind, id).await
    }

    async fn commit(&self) -> StoreResult<()> {
        self.inner.commit().await
    }

    async fn rollback(&self) -> StoreResult<()> {
        self.inner.rollback().await
    }
}

/// Token store kept in memory. `failing_clear` simulates a locked keychain.
#[derive(Default)]
pub struct MemoryTokens {
    tokens: Mutex<Option<TokenPair>>,
    fail_clear: bool,
}

impl MemoryTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_clear() -> Self {
        Self {
            fail_clear: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokens {
    async fn save(&self, tokens: &TokenPair) -> AuthResult<()> {
        *self.tokens.lock().unwrap() = Some(tokens.clone());
        Ok(())
    }

    async fn load(&self) -> AuthResult<Option<TokenPair>> {
        Ok(self.tokens.lock().unwrap().clone())
    }

    async fn clear(&self) -> AuthResult<()> {
        if self.fail_clear {
            return Err(AuthError::Storage("keychain locked".to_string()));
        }
        *self.tokens.lock().unwrap() = None;
        Ok(())
    }
}
