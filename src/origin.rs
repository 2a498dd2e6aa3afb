use crate::constants::cors::WILDCARD;
use indexmap::IndexSet;

/// Immutable set of origins allowed to receive CORS headers.
///
/// Entries are compared verbatim: no case folding, no scheme or port
/// normalization and no pattern matching. The `*` entry authorizes any
/// non-empty origin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizedOriginSet {
    origins: IndexSet<String>,
}

impl AuthorizedOriginSet {
    /// Builds the set from configured entries, dropping blank ones and
    /// keeping the first occurrence of duplicates.
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let origins = origins
            .into_iter()
            .map(Into::into)
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Self { origins }
    }

    /// Set containing only the wildcard entry.
    pub fn any() -> Self {
        Self::new([WILDCARD])
    }

    pub fn allows_any(&self) -> bool {
        self.origins.contains(WILDCARD)
    }

    pub fn is_authorized(&self, origin: &str) -> bool {
        is_authorized(origin, self)
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.origins.iter().map(String::as_str)
    }
}

/// Returns `true` when `policy` holds the wildcard or `origin` verbatim.
/// An empty origin is never authorized.
pub fn is_authorized(origin: &str, policy: &AuthorizedOriginSet) -> bool {
    if origin.is_empty() {
        return false;
    }

    policy.allows_any() || policy.origins.contains(origin)
}

#[cfg(test)]
#[path = "origin_test.rs"]
mod origin_test;
