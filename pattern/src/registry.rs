//! Handler buckets keyed by glob pattern.

use crate::Glob;
use std::fmt;

struct Bucket<T> {
    glob: Glob,
    handlers: Vec<T>,
}

/// Ordered collection of handler buckets.
///
/// Each distinct pattern owns one bucket. Registering under an existing
/// pattern appends to its bucket, which keeps the position of the pattern's
/// first registration. Lookups return handlers from every matching bucket,
/// buckets in registration order and handlers in insertion order.
pub struct PatternRegistry<T> {
    buckets: Vec<Bucket<T>>,
}

impl<T> Default for PatternRegistry<T> {
    fn default() -> Self {
        Self {
            buckets: Vec::new(),
        }
    }
}

impl<T> PatternRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register handlers under a pattern.
    pub fn on(&mut self, pattern: &str, handlers: impl IntoIterator<Item = T>) -> &mut Self {
        match self.bucket_mut(pattern) {
            Some(bucket) => bucket.handlers.extend(handlers),
            None => self.buckets.push(Bucket {
                glob: Glob::new(pattern),
                handlers: handlers.into_iter().collect(),
            }),
        }
        self
    }

    /// Remove the bucket registered under exactly this pattern.
    pub fn unset(&mut self, pattern: &str) -> &mut Self {
        self.buckets.retain(|bucket| bucket.glob.as_str() != pattern);
        self
    }

    /// Whether a bucket exists for exactly this pattern. No glob matching.
    pub fn has(&self, pattern: &str) -> bool {
        self.buckets
            .iter()
            .any(|bucket| bucket.glob.as_str() == pattern)
    }

    /// Whether any handler matches the member name.
    pub fn handles(&self, name: &str) -> bool {
        self.matching(name).next().is_some()
    }

    /// Iterate handlers whose pattern matches the member name.
    pub fn matching<'r>(&'r self, name: &'r str) -> impl Iterator<Item = &'r T> + 'r {
        self.buckets
            .iter()
            .filter(move |bucket| bucket.glob.matches(name))
            .flat_map(|bucket| bucket.handlers.iter())
    }

    /// Registered patterns in bucket order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|bucket| bucket.glob.as_str())
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    fn bucket_mut(&mut self, pattern: &str) -> Option<&mut Bucket<T>> {
        self.buckets
            .iter_mut()
            .find(|bucket| bucket.glob.as_str() == pattern)
    }
}

impl<T: Clone> PatternRegistry<T> {
    /// Collect handlers whose pattern matches the member name.
    pub fn find(&self, name: &str) -> Vec<T> {
        self.matching(name).cloned().collect()
    }
}

impl<T> fmt::Debug for PatternRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.buckets
                    .iter()
                    .map(|bucket| (bucket.glob.as_str(), bucket.handlers.len())),
            )
            .finish()
    }
}
