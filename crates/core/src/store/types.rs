use std::cmp::Ordering;
use std::fmt;

/// A record as seen by a store backend: kind, id and an encoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub kind: String,
    pub id: String,
    /// JSON-encoded entity.
    pub body: Vec<u8>,
}

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
type Comparator<T> = Box<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Typed filter and ordering applied to decoded records.
pub struct Query<T> {
    predicate: Option<Predicate<T>>,
    sort: Option<Comparator<T>>,
}

impl<T> Query<T> {
    /// A query matching every record, in store order.
    pub fn all() -> Self {
        Self {
            predicate: None,
            sort: None,
        }
    }

    /// Restricts the query to records matching `predicate`.
    pub fn filter(mut self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.predicate = Some(Box::new(predicate));
        self
    }

    /// Orders results with `compare`.
    pub fn sort_by(mut self, compare: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) -> Self {
        self.sort = Some(Box::new(compare));
        self
    }

    /// Returns true if `item` passes the predicate (or there is none).
    pub fn matches(&self, item: &T) -> bool {
        self.predicate.as_ref().is_none_or(|p| p(item))
    }

    /// Orders `items` in place without filtering.
    pub fn sort(&self, items: &mut [T]) {
        if let Some(compare) = &self.sort {
            items.sort_by(|a, b| compare(a, b));
        }
    }

    /// Filters and sorts `items` according to this query.
    pub fn apply(&self, items: Vec<T>) -> Vec<T> {
        let mut items: Vec<T> = items.into_iter().filter(|i| self.matches(i)).collect();
        self.sort(&mut items);
        items
    }
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Self::all()
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("filtered", &self.predicate.is_some())
            .field("sorted", &self.sort.is_some())
            .finish()
    }
}
