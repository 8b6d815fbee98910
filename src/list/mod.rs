//! Paginated document lists
//!
//! This module holds the client-side view of server-backed, paginated document
//! collections (samples, HMM profiles, users) and the operations that keep that
//! view aligned with page fetches and push notifications.

pub mod store;
pub mod sync;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use store::{ListChange, ListStore};
pub use sync::{apply_page, edit_in_place, insert_sorted, remove_by_ids};

/// Page number used when none has been fetched yet
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the list view has not been told one
pub const DEFAULT_PER_PAGE: u32 = 25;
/// Page size for collections the server returns whole; inserts never truncate them
pub const UNPAGINATED_PER_PAGE: u32 = u32::MAX;

/// An opaque server document
///
/// Documents are replaced wholesale on update. The only field the client
/// interprets is `id`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Build a document from a JSON value, which must be an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// The document identifier, if it has one
    pub fn id(&self) -> Option<&Value> {
        self.0.get("id")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Document {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

/// A window of a server-held collection, as returned by a list endpoint
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PaginatedList {
    #[serde(default)]
    pub documents: Vec<Document>,

    /// 1-based index of the last page fetched
    #[serde(default = "default_page")]
    pub page: u32,

    #[serde(default = "default_per_page")]
    pub per_page: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u64>,

    /// Any other response metadata, carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for PaginatedList {
    fn default() -> Self {
        Self {
            documents: Vec::new(),
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            total_count: None,
            found_count: None,
            page_count: None,
            extra: Map::new(),
        }
    }
}

impl PaginatedList {
    /// A page response holding `documents` at `page`
    pub fn page_of(page: u32, per_page: u32, documents: Vec<Document>) -> Self {
        Self {
            documents,
            page,
            per_page,
            ..Self::default()
        }
    }

    /// Largest number of documents the fetched pages can hold
    pub fn window(&self) -> usize {
        (self.per_page as usize).saturating_mul(self.page as usize)
    }
}

/// How a list view orders newly inserted documents
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortSpec {
    pub key: String,
    #[serde(default)]
    pub descending: bool,
}

impl SortSpec {
    pub fn ascending(key: &str) -> Self {
        Self {
            key: key.to_string(),
            descending: false,
        }
    }

    pub fn descending(key: &str) -> Self {
        Self {
            key: key.to_string(),
            descending: true,
        }
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 4,
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Array(_) | Value::Object(_) => 3,
    }
}

/// Ascending order over sort-key values
///
/// Missing and `null` keys sort after every present value. Values of different
/// JSON kinds are ranked bool < number < string < array/object; arrays and
/// objects compare equal among themselves.
pub fn compare_sort_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.unwrap_or(&Value::Null);
    let b = b.unwrap_or(&Value::Null);

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}
