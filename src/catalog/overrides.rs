//! Search predicate overrides
//!
//! A column may replace the default substring/regex test with its own logic,
//! either as a static predicate over `(row, search text)` or as a provider that
//! builds one from the search text. Providers may decline by returning `None`.
//!
//! Resolution is first-non-empty-wins over a fixed chain:
//!
//! | rank | global search            | column search            |
//! |------|--------------------------|--------------------------|
//! | 1    | global provider          | column provider          |
//! | 2    | generic provider         | generic provider         |
//! | 3    | global static predicate  | column static predicate  |
//! | 4    | generic static predicate | generic static predicate |
//!
//! When the whole chain is empty the caller falls back to the default test.

use std::fmt;
use std::sync::Arc;

/// Static search predicate: row plus search text.
pub type SearchPredicate<E> = Arc<dyn Fn(&E, &str) -> bool + Send + Sync>;

/// Builds a search predicate from the search text, or declines.
pub type SearchProvider<E> = Arc<dyn Fn(&str) -> Option<SearchPredicate<E>> + Send + Sync>;

/// Which search axis a predicate is being resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    /// `search[value]`, OR-combined across columns
    Global,
    /// `columns[i][search][value]`, AND-combined across columns
    Column,
}

impl SearchScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchScope::Global => "global",
            SearchScope::Column => "column",
        }
    }
}

enum Link<'a, E> {
    Provider(&'a SearchProvider<E>),
    Static(&'a SearchPredicate<E>),
}

/// The optional overrides declared on one column.
pub struct SearchOverrides<E> {
    pub search_predicate: Option<SearchPredicate<E>>,
    pub search_provider: Option<SearchProvider<E>>,
    pub global_predicate: Option<SearchPredicate<E>>,
    pub global_provider: Option<SearchProvider<E>>,
    pub column_predicate: Option<SearchPredicate<E>>,
    pub column_provider: Option<SearchProvider<E>>,
}

impl<E> SearchOverrides<E> {
    /// True when no override is declared at all.
    pub fn is_empty(&self) -> bool {
        self.search_predicate.is_none()
            && self.search_provider.is_none()
            && self.global_predicate.is_none()
            && self.global_provider.is_none()
            && self.column_predicate.is_none()
            && self.column_provider.is_none()
    }

    fn chain(&self, scope: SearchScope) -> [Option<Link<'_, E>>; 4] {
        let (scoped_provider, scoped_predicate) = match scope {
            SearchScope::Global => (&self.global_provider, &self.global_predicate),
            SearchScope::Column => (&self.column_provider, &self.column_predicate),
        };
        [
            scoped_provider.as_ref().map(Link::Provider),
            self.search_provider.as_ref().map(Link::Provider),
            scoped_predicate.as_ref().map(Link::Static),
            self.search_predicate.as_ref().map(Link::Static),
        ]
    }

    /// Resolve the override for `scope` bound to `text`, if any link answers.
    pub fn resolve(&self, scope: SearchScope, text: &str) -> Option<SearchPredicate<E>> {
        self.chain(scope).into_iter().flatten().find_map(|link| match link {
            Link::Provider(provider) => provider(text),
            Link::Static(predicate) => Some(Arc::clone(predicate)),
        })
    }
}

impl<E> Default for SearchOverrides<E> {
    fn default() -> Self {
        Self {
            search_predicate: None,
            search_provider: None,
            global_predicate: None,
            global_provider: None,
            column_predicate: None,
            column_provider: None,
        }
    }
}

impl<E> Clone for SearchOverrides<E> {
    fn clone(&self) -> Self {
        Self {
            search_predicate: self.search_predicate.clone(),
            search_provider: self.search_provider.clone(),
            global_predicate: self.global_predicate.clone(),
            global_provider: self.global_provider.clone(),
            column_predicate: self.column_predicate.clone(),
            column_provider: self.column_provider.clone(),
        }
    }
}

impl<E> fmt::Debug for SearchOverrides<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchOverrides")
            .field("search_predicate", &self.search_predicate.is_some())
            .field("search_provider", &self.search_provider.is_some())
            .field("global_predicate", &self.global_predicate.is_some())
            .field("global_provider", &self.global_provider.is_some())
            .field("column_predicate", &self.column_predicate.is_some())
            .field("column_provider", &self.column_provider.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Row = &'static str;

    fn tagged(tag: &'static str) -> SearchPredicate<Row> {
        Arc::new(move |row: &Row, _text: &str| *row == tag)
    }

    fn provider(tag: &'static str) -> SearchProvider<Row> {
        Arc::new(move |_text: &str| Some(tagged(tag)))
    }

    fn declining() -> SearchProvider<Row> {
        Arc::new(|_text: &str| None)
    }

    fn winner(overrides: &SearchOverrides<Row>, scope: SearchScope) -> Option<&'static str> {
        let predicate = overrides.resolve(scope, "x")?;
        ["global-provider", "generic-provider", "global-static", "generic-static",
         "column-provider", "column-static"]
            .into_iter()
            .find(|tag| predicate(tag, "x"))
    }

    fn fully_loaded() -> SearchOverrides<Row> {
        SearchOverrides {
            search_predicate: Some(tagged("generic-static")),
            search_provider: Some(provider("generic-provider")),
            global_predicate: Some(tagged("global-static")),
            global_provider: Some(provider("global-provider")),
            column_predicate: Some(tagged("column-static")),
            column_provider: Some(provider("column-provider")),
        }
    }

    #[test]
    fn test_empty_chain_resolves_nothing() {
        let overrides = SearchOverrides::<Row>::default();
        assert!(overrides.is_empty());
        assert!(overrides.resolve(SearchScope::Global, "x").is_none());
    }

    #[test]
    fn test_scoped_provider_wins() {
        let overrides = fully_loaded();
        assert_eq!(winner(&overrides, SearchScope::Global), Some("global-provider"));
        assert_eq!(winner(&overrides, SearchScope::Column), Some("column-provider"));
    }

    #[test]
    fn test_precedence_walks_down_the_chain() {
        let mut overrides = fully_loaded();

        overrides.global_provider = None;
        assert_eq!(winner(&overrides, SearchScope::Global), Some("generic-provider"));

        overrides.search_provider = None;
        assert_eq!(winner(&overrides, SearchScope::Global), Some("global-static"));

        overrides.global_predicate = None;
        assert_eq!(winner(&overrides, SearchScope::Global), Some("generic-static"));
    }

    #[test]
    fn test_declining_provider_falls_through() {
        let overrides = SearchOverrides {
            global_provider: Some(declining()),
            search_provider: Some(declining()),
            search_predicate: Some(tagged("generic-static")),
            ..Default::default()
        };
        assert_eq!(winner(&overrides, SearchScope::Global), Some("generic-static"));
    }

    #[test]
    fn test_column_scope_ignores_global_overrides() {
        let overrides = SearchOverrides {
            global_predicate: Some(tagged("global-static")),
            ..Default::default()
        };
        assert!(overrides.resolve(SearchScope::Column, "x").is_none());
    }

    #[test]
    fn test_provider_receives_search_text() {
        let overrides = SearchOverrides::<Row> {
            column_provider: Some(Arc::new(|text: &str| {
                let wanted = text.to_string();
                Some(Arc::new(move |row: &Row, _: &str| *row == wanted) as SearchPredicate<Row>)
            })),
            ..Default::default()
        };

        let predicate = overrides.resolve(SearchScope::Column, "abc").unwrap();
        assert!(predicate(&"abc", "abc"));
        assert!(!predicate(&"abd", "abc"));
    }
}
