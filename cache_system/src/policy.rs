//! Per-entity cache policy
//!
//! An `EntityPolicy` pins down, for one entity type, the shape of every key
//! it produces, how long each kind of entry lives and which patterns a write
//! has to clear. Policies are `const` values so they can live next to the
//! entity definitions.

use crate::keys::list_key;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Lifetime classes, ordered from most to least volatile
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TtlTier {
    /// High churn, e.g. in-tour messages
    Volatile,
    Short,
    Moderate,
    Standard,
    Long,
    /// Near-static configuration
    Static,
}

impl TtlTier {
    pub const ALL: [TtlTier; 6] = [
        TtlTier::Volatile,
        TtlTier::Short,
        TtlTier::Moderate,
        TtlTier::Standard,
        TtlTier::Long,
        TtlTier::Static,
    ];

    pub const fn seconds(self) -> u64 {
        match self {
            TtlTier::Volatile => 120,
            TtlTier::Short => 300,
            TtlTier::Moderate => 600,
            TtlTier::Standard => 1800,
            TtlTier::Long => 3600,
            TtlTier::Static => 7200,
        }
    }

    pub const fn as_duration(self) -> Duration {
        Duration::from_secs(self.seconds())
    }
}

impl From<TtlTier> for Duration {
    fn from(tier: TtlTier) -> Self {
        tier.as_duration()
    }
}

impl fmt::Display for TtlTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({}s)", self, self.seconds())
    }
}

/// Key shapes, lifetimes and invalidation rules for one entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityPolicy {
    /// Kebab-case entity name, used in logs
    pub entity: &'static str,
    /// Single-record keys are `{record_prefix}{id}`
    pub record_prefix: &'static str,
    /// List keys are `{list_prefix}{canonical filter json}`
    pub list_prefix: &'static str,
    pub record_ttl: TtlTier,
    pub list_ttl: TtlTier,
    /// Extra patterns cleared by every write, for globally referenced data
    pub cascades: &'static [&'static str],
}

impl EntityPolicy {
    /// Policy with `{entity}:{id}` records and `{entity}:list:{json}` lists
    ///
    /// Prefixes are spelled out by the caller so they stay greppable and
    /// `const`-constructible.
    pub const fn new(
        entity: &'static str,
        record_prefix: &'static str,
        list_prefix: &'static str,
        ttl: TtlTier,
    ) -> Self {
        Self {
            entity,
            record_prefix,
            list_prefix,
            record_ttl: ttl,
            list_ttl: ttl,
            cascades: &[],
        }
    }

    pub const fn with_list_ttl(mut self, ttl: TtlTier) -> Self {
        self.list_ttl = ttl;
        self
    }

    pub const fn with_cascades(mut self, cascades: &'static [&'static str]) -> Self {
        self.cascades = cascades;
        self
    }

    pub fn record_key(&self, id: &str) -> String {
        format!("{}{}", self.record_prefix, id)
    }

    pub fn list_key<F: Serialize + ?Sized>(&self, filter: &F) -> String {
        list_key(self.list_prefix, filter)
    }

    /// List key for a specialised view, kept under the list pattern
    pub fn scoped_list_key<F: Serialize + ?Sized>(&self, scope: &str, filter: &F) -> String {
        list_key(&format!("{}{}:", self.list_prefix, scope), filter)
    }

    /// Pattern covering every list key of this entity
    pub fn list_pattern(&self) -> String {
        format!("{}*", self.list_prefix)
    }

    /// What a successful write to the records behind `record_keys` must clear
    pub fn invalidation<I>(&self, record_keys: I) -> Invalidation
    where
        I: IntoIterator<Item = String>,
    {
        let mut patterns = Vec::with_capacity(1 + self.cascades.len());
        patterns.push(self.list_pattern());
        for cascade in self.cascades {
            if !patterns.iter().any(|p| p == cascade) {
                patterns.push((*cascade).to_string());
            }
        }

        Invalidation {
            keys: record_keys.into_iter().collect(),
            patterns,
        }
    }
}

/// Exact keys and glob patterns to delete after a write
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invalidation {
    pub keys: Vec<String>,
    pub patterns: Vec<String>,
}

impl Invalidation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.keys.push(key.into());
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    /// Union of two invalidations, duplicates removed
    pub fn merge(mut self, other: Invalidation) -> Self {
        for key in other.keys {
            if !self.keys.contains(&key) {
                self.keys.push(key);
            }
        }
        for pattern in other.patterns {
            if !self.patterns.contains(&pattern) {
                self.patterns.push(pattern);
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.patterns.is_empty()
    }
}
