//! Observable events
//!
//! Events are explicit and typed; the string form is what lands in the log line.

use std::fmt;

/// Observable events emitted while serving table requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Table manifest loaded from disk
    ConfigLoaded,
    /// Catalog declaration rejected
    CatalogRejected,

    // Request decoding
    /// Wire parameters decoded into a request
    RequestDecoded,
    /// Client referenced a column the catalog does not expose
    ColumnDropped,
    /// Sort slot pointed at no usable column
    SortDropped,
    /// Client asked for regex on a column without server opt-in
    RegexDowngraded,
    /// Client regex did not compile
    InvalidSearchPattern,

    // Execution
    /// Query executed and packaged
    QueryExecuted,
    /// Data source returned an error
    QueryFailed,

    // Server
    /// HTTP surface is accepting requests
    Serving,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::CatalogRejected => "CATALOG_REJECTED",
            Event::RequestDecoded => "REQUEST_DECODED",
            Event::ColumnDropped => "COLUMN_DROPPED",
            Event::SortDropped => "SORT_DROPPED",
            Event::RegexDowngraded => "REGEX_DOWNGRADED",
            Event::InvalidSearchPattern => "INVALID_SEARCH_PATTERN",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::QueryFailed => "QUERY_FAILED",
            Event::Serving => "DATATABLES_SERVING",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::CatalogRejected)
    }

    /// Returns true if this event reports client input that was ignored or narrowed
    pub fn is_client_anomaly(&self) -> bool {
        matches!(
            self,
            Event::ColumnDropped
                | Event::SortDropped
                | Event::RegexDowngraded
                | Event::InvalidSearchPattern
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_screaming_snake() {
        for event in [
            Event::ConfigLoaded,
            Event::RequestDecoded,
            Event::ColumnDropped,
            Event::QueryExecuted,
            Event::Serving,
        ] {
            let name = event.as_str();
            assert!(name.chars().all(|c| c.is_ascii_uppercase() || c == '_'), "{name}");
        }
    }

    #[test]
    fn test_only_catalog_rejection_is_fatal() {
        assert!(Event::CatalogRejected.is_fatal());
        assert!(!Event::QueryFailed.is_fatal());
        assert!(Event::SortDropped.is_client_anomaly());
        assert!(!Event::QueryExecuted.is_client_anomaly());
    }
}
