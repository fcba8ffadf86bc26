// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Immutable, lazily materialized HTTP header collection
//!
//! [`Headers`] is a case-insensitive multi-map from header name to an
//! ordered list of values. It is immutable from the outside: `append`,
//! `set` and `delete` return a new collection that references the receiver
//! as its parent plus one queued update. No parsing or copying happens until
//! the first read, so request pipelines that rebuild headers several times
//! only pay for the final shape.
//!
//! ```rust
//! use hxclient::Headers;
//!
//! let headers = Headers::parse("Content-Type: application/json\nX-Foo: a");
//! let headers = headers.append("x-foo", "b");
//!
//! assert_eq!(headers.get("content-type"), Some("application/json"));
//! assert_eq!(headers.get_all("X-Foo").unwrap(), ["a", "b"]);
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One or more values for a header name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValues {
    /// A single value
    One(String),
    /// A list of values, one per header line
    Many(Vec<String>),
}

impl HeaderValues {
    /// Flatten into a list
    pub fn into_vec(self) -> Vec<String> {
        match self {
            HeaderValues::One(value) => vec![value],
            HeaderValues::Many(values) => values,
        }
    }
}

impl From<&str> for HeaderValues {
    fn from(value: &str) -> Self {
        HeaderValues::One(value.to_string())
    }
}

impl From<String> for HeaderValues {
    fn from(value: String) -> Self {
        HeaderValues::One(value)
    }
}

impl From<&String> for HeaderValues {
    fn from(value: &String) -> Self {
        HeaderValues::One(value.clone())
    }
}

impl From<Vec<String>> for HeaderValues {
    fn from(values: Vec<String>) -> Self {
        HeaderValues::Many(values)
    }
}

impl From<Vec<&str>> for HeaderValues {
    fn from(values: Vec<&str>) -> Self {
        HeaderValues::Many(values.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for HeaderValues {
    fn from(values: &[&str]) -> Self {
        HeaderValues::Many(values.iter().map(|v| v.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for HeaderValues {
    fn from(values: [&str; N]) -> Self {
        HeaderValues::Many(values.iter().map(|v| v.to_string()).collect())
    }
}

/// Deferred update, replayed in order on initialization
#[derive(Debug, Clone)]
enum Update {
    Append { name: String, values: Vec<String> },
    Set { name: String, values: Vec<String> },
    Delete { name: String, value: Option<String> },
}

/// Where the collection's initial contents come from
#[derive(Clone)]
enum Source {
    Parent(Headers),
    Raw(String),
    Record(Vec<(String, Vec<String>)>),
}

struct Pending {
    source: Option<Source>,
    updates: Vec<Update>,
}

/// Values for one lowercase key together with its display spelling
#[derive(Debug, Clone)]
struct Entry {
    display: String,
    values: Vec<String>,
}

type Store = IndexMap<String, Entry>;

struct Inner {
    /// Taken by the single initializer run
    pending: Mutex<Option<Pending>>,
    store: OnceLock<Store>,
}

impl Drop for Inner {
    /// Unlinks a parent chain one link at a time while this is its last owner
    fn drop(&mut self) {
        let mut next = take_parent(self.pending.get_mut());
        while let Some(parent) = next {
            next = match Arc::try_unwrap(parent.inner) {
                Ok(mut inner) => take_parent(inner.pending.get_mut()),
                Err(_) => None,
            };
        }
    }
}

fn take_parent(pending: &mut Option<Pending>) -> Option<Headers> {
    match pending.as_mut()?.source.take()? {
        Source::Parent(parent) => Some(parent),
        _ => None,
    }
}

/// Case-insensitive, copy-on-write header multi-map
///
/// Cloning is cheap: clones share the same (possibly not yet materialized)
/// contents. Initialization is guarded by a [`OnceLock`], so a collection may
/// be shared across threads before its first read.
#[derive(Clone)]
pub struct Headers {
    inner: Arc<Inner>,
}

impl Headers {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::pending(None, Vec::new())
    }

    /// Create a collection from a raw header block
    ///
    /// The block is split on `\n`; each line is split on its first colon.
    /// Lines without a colon or with an empty name are ignored. Parsing is
    /// deferred until the first read.
    pub fn parse(raw: impl Into<String>) -> Self {
        Self::pending(Some(Source::Raw(raw.into())), Vec::new())
    }

    /// Create a collection from name/value(s) pairs
    ///
    /// Entries whose value list is empty are skipped.
    pub fn from_record<I, K, V>(record: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<HeaderValues>,
    {
        let record = record
            .into_iter()
            .map(|(name, values)| (name.into(), values.into().into_vec()))
            .collect();
        Self::pending(Some(Source::Record(record)), Vec::new())
    }

    fn pending(source: Option<Source>, updates: Vec<Update>) -> Self {
        Self {
            inner: Arc::new(Inner {
                pending: Mutex::new(Some(Pending { source, updates })),
                store: OnceLock::new(),
            }),
        }
    }

    fn fork(&self, update: Update) -> Self {
        Self::pending(Some(Source::Parent(self.clone())), vec![update])
    }

    /// Materialized contents, initializing on first call
    fn store(&self) -> &Store {
        self.inner.store.get_or_init(|| self.materialize())
    }

    /// Build the contents from the pending source and updates
    ///
    /// Walks up the parent links iteratively until it reaches an initialized
    /// ancestor or a root source, then replays every queued update from the
    /// oldest link down. Uninitialized ancestors are left pending.
    fn materialize(&self) -> Store {
        let Some(Pending { source, updates }) = self.inner.pending.lock().take() else {
            return Store::new();
        };

        let mut replay = vec![updates];
        let mut source = source;
        let mut store = loop {
            match source {
                None => break Store::new(),
                Some(Source::Raw(raw)) => {
                    let mut store = Store::new();
                    parse_raw(&raw, &mut store);
                    break store;
                }
                Some(Source::Record(record)) => {
                    let mut store = Store::new();
                    load_record(record, &mut store);
                    break store;
                }
                Some(Source::Parent(parent)) => {
                    if let Some(store) = parent.inner.store.get() {
                        break store.clone();
                    }
                    let next = parent
                        .inner
                        .pending
                        .lock()
                        .as_ref()
                        .map(|pending| (pending.source.clone(), pending.updates.clone()));
                    match next {
                        Some((next_source, updates)) => {
                            replay.push(updates);
                            source = next_source;
                        }
                        // Another thread is initializing this ancestor
                        None => break parent.store().clone(),
                    }
                }
            }
        };

        for updates in replay.into_iter().rev() {
            for update in updates {
                apply(&mut store, update);
            }
        }
        store
    }

    /// Whether the contents have been materialized yet
    pub fn is_initialized(&self) -> bool {
        self.inner.store.get().is_some()
    }

    /// Check whether a header is present
    pub fn has(&self, name: &str) -> bool {
        self.store().contains_key(&normalize(name))
    }

    /// First value for a header
    pub fn get(&self, name: &str) -> Option<&str> {
        self.store()
            .get(&normalize(name))
            .and_then(|entry| entry.values.first())
            .map(String::as_str)
    }

    /// All values for a header, in insertion order
    pub fn get_all(&self, name: &str) -> Option<&[String]> {
        self.store()
            .get(&normalize(name))
            .map(|entry| entry.values.as_slice())
    }

    /// Display names of all headers, one per key
    pub fn keys(&self) -> Vec<&str> {
        self.store()
            .values()
            .map(|entry| entry.display.as_str())
            .collect()
    }

    /// Invoke `f` once per header with its display name and values
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&str, &[String]),
    {
        for entry in self.store().values() {
            f(&entry.display, &entry.values);
        }
    }

    /// Iterate over display names and value lists
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.store()
            .values()
            .map(|entry| (entry.display.as_str(), entry.values.as_slice()))
    }

    /// Number of distinct header names
    pub fn len(&self) -> usize {
        self.store().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store().is_empty()
    }

    /// Return a copy with `values` appended to `name`
    ///
    /// An empty value list leaves the header untouched.
    pub fn append(&self, name: impl Into<String>, values: impl Into<HeaderValues>) -> Self {
        self.fork(Update::Append {
            name: name.into(),
            values: values.into().into_vec(),
        })
    }

    /// Return a copy with the values of `name` replaced by `values`
    ///
    /// An empty value list leaves the header untouched; it does not clear it.
    pub fn set(&self, name: impl Into<String>, values: impl Into<HeaderValues>) -> Self {
        self.fork(Update::Set {
            name: name.into(),
            values: values.into().into_vec(),
        })
    }

    /// Return a copy without `name`, or without one of its values
    ///
    /// With a `value`, only that exact value is removed; the header goes away
    /// once its last value is removed.
    pub fn delete(&self, name: impl Into<String>, value: Option<&str>) -> Self {
        self.fork(Update::Delete {
            name: name.into(),
            value: value.map(String::from),
        })
    }

    /// Convert into a reqwest header map for transport
    ///
    /// Names or values that are not valid on the wire are skipped.
    pub fn to_header_map(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, values) in self.iter() {
            let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) else {
                tracing::debug!(name, "Skipping invalid header name");
                continue;
            };
            for value in values {
                match HeaderValue::from_str(value) {
                    Ok(value) => {
                        map.append(header_name.clone(), value);
                    }
                    Err(_) => tracing::debug!(name, "Skipping invalid header value"),
                }
            }
        }
        map
    }
}

fn normalize(name: &str) -> String {
    name.to_lowercase()
}

fn parse_raw(raw: &str, store: &mut Store) {
    for line in raw.split('\n') {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        store
            .entry(normalize(name))
            .or_insert_with(|| Entry {
                display: name.to_string(),
                values: Vec::new(),
            })
            .values
            .push(value.trim().to_string());
    }
}

fn load_record(record: Vec<(String, Vec<String>)>, store: &mut Store) {
    for (name, values) in record {
        if values.is_empty() {
            continue;
        }
        store
            .entry(normalize(&name))
            .or_insert_with(|| Entry {
                display: name,
                values: Vec::new(),
            })
            .values = values;
    }
}

fn apply(store: &mut Store, update: Update) {
    match update {
        Update::Append { ref values, .. } | Update::Set { ref values, .. } if values.is_empty() => {}
        Update::Append { name, values } => {
            store
                .entry(normalize(&name))
                .or_insert_with(|| Entry {
                    display: name,
                    values: Vec::new(),
                })
                .values
                .extend(values);
        }
        Update::Set { name, values } => {
            store
                .entry(normalize(&name))
                .or_insert_with(|| Entry {
                    display: name,
                    values: Vec::new(),
                })
                .values = values;
        }
        Update::Delete { name, value: None } => {
            store.shift_remove(&normalize(&name));
        }
        Update::Delete {
            name,
            value: Some(value),
        } => {
            let key = normalize(&name);
            let Some(entry) = store.get_mut(&key) else {
                return;
            };
            entry.values.retain(|v| *v != value);
            if entry.values.is_empty() {
                store.shift_remove(&key);
            }
        }
    }
}

impl Default for Headers {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Renders the wire block, one `Name: value` line per value
impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, values) in self.iter() {
            for value in values {
                writeln!(f, "{}: {}", name, value)?;
            }
        }
        Ok(())
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, values) in self.iter() {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<HeaderValues>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::from_record(iter)
    }
}

impl From<&HeaderMap> for Headers {
    fn from(map: &HeaderMap) -> Self {
        let mut record: IndexMap<String, Vec<String>> = IndexMap::new();
        for (name, value) in map.iter() {
            match value.to_str() {
                Ok(value) => record
                    .entry(name.as_str().to_string())
                    .or_default()
                    .push(value.to_string()),
                Err(_) => tracing::debug!(name = %name, "Skipping non-ASCII header value"),
            }
        }
        Self::from_record(record)
    }
}
