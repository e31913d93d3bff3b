//! # Table facade
//!
//! A [`DataTable`] ties one catalog to a row mapping, a table configuration
//! and optional diagnostics. It is immutable once built and can serve
//! concurrent requests through a shared reference.
//!
//! ```ignore
//! let table = DataTable::new(catalog, |p: &Person| PersonView::from(p), TableConfig::default());
//! let response = table.render_response(query_string, MemoryQueryable::from(people))?;
//! ```

mod errors;

pub use errors::TableError;

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::catalog::{cell_text, Catalog};
use crate::client::ClientConfiguration;
use crate::config::TableConfig;
use crate::observability::{log_event_with_fields, DiagnosticHook, Event, MetricsRegistry};
use crate::query::{execute, ExecutionOptions, PagedList, Queryable};
use crate::request::{ParsedRequest, RequestParams, RowMapper, WireDecoder};
use crate::response::{DataTablesResponse, SerializationContract};

/// One server-side table.
pub struct DataTable<E, V> {
    catalog: Arc<Catalog<E>>,
    mapping: RowMapper<E, V>,
    config: TableConfig,
    contract: Arc<SerializationContract>,
    log_hook: Option<DiagnosticHook>,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl<E: 'static, V> DataTable<E, V> {
    pub fn new<F>(catalog: Catalog<E>, mapping: F, config: TableConfig) -> Self
    where
        F: Fn(&E) -> V + Send + Sync + 'static,
    {
        let contract = SerializationContract::from_catalog(&catalog)
            .strip_unlisted(config.strip_unlisted_fields);
        Self {
            catalog: Arc::new(catalog),
            mapping: Arc::new(mapping),
            config,
            contract: Arc::new(contract),
            log_hook: None,
            metrics: None,
        }
    }

    /// Receive a dump of every request and its query before execution.
    pub fn with_log_hook(mut self, hook: DiagnosticHook) -> Self {
        self.log_hook = Some(hook);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn catalog(&self) -> &Catalog<E> {
        &self.catalog
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn contract(&self) -> &SerializationContract {
        &self.contract
    }

    /// Decode raw parameters against the catalog.
    pub fn parse_request(&self, raw: impl Into<RequestParams>) -> ParsedRequest<E, V> {
        let request = WireDecoder::new(&self.catalog)
            .with_default_page_size(self.config.default_page_size)
            .decode(raw.into(), Arc::clone(&self.mapping));

        if let Some(metrics) = &self.metrics {
            let diagnostics = &request.diagnostics;
            metrics.increment_requests();
            metrics.add_columns_dropped(diagnostics.dropped_columns.len() as u64);
            metrics.add_sorts_dropped(diagnostics.dropped_sorts.len() as u64);
            metrics.add_regex_downgrades(diagnostics.regex_downgrades.len() as u64);
        }

        request
    }

    /// Decode and execute, returning the page.
    pub fn render_results<Q>(
        &self,
        raw: impl Into<RequestParams>,
        source: Q,
    ) -> Result<PagedList<V>, Q::Error>
    where
        Q: Queryable<E>,
    {
        let request = self.parse_request(raw);
        self.execute(&request, source)
    }

    /// Decode, execute and package the wire response.
    pub fn render_response<Q>(
        &self,
        raw: impl Into<RequestParams>,
        source: Q,
    ) -> Result<DataTablesResponse<V>, Q::Error>
    where
        Q: Queryable<E>,
    {
        let request = self.parse_request(raw);
        let page = self.execute(&request, source)?;
        Ok(DataTablesResponse::from_page(request.draw, page, Arc::clone(&self.contract)))
    }

    /// Execute an already parsed request.
    pub fn execute<Q>(&self, request: &ParsedRequest<E, V>, source: Q) -> Result<PagedList<V>, Q::Error>
    where
        Q: Queryable<E>,
    {
        let options = ExecutionOptions {
            count_unfiltered_total: self.config.count_unfiltered_total,
            log_hook: self.log_hook.as_ref().filter(|_| self.config.log_requests),
        };

        match execute(request, source, options) {
            Ok(page) => {
                if let Some(metrics) = &self.metrics {
                    metrics.increment_queries_executed();
                    metrics.add_rows_returned(page.items.len() as u64);
                }
                Ok(page)
            }
            Err(err) => {
                if let Some(metrics) = &self.metrics {
                    metrics.increment_queries_failed();
                }
                let draw = request.draw.to_string();
                log_event_with_fields(Event::QueryFailed, &[("draw", draw.as_str())]);
                Err(err)
            }
        }
    }

    /// Sorted, de-duplicated text values of one column over the whole source.
    /// Null cells are skipped.
    pub fn distinct_column_values<Q>(
        &self,
        public_name: &str,
        source: Q,
    ) -> Result<Vec<String>, TableError<Q::Error>>
    where
        Q: Queryable<E>,
    {
        let column = self
            .catalog
            .get(public_name)
            .ok_or_else(|| TableError::UnknownColumn(public_name.to_string()))?;

        let rows = source.materialize().map_err(TableError::Source)?;
        let values: BTreeSet<String> = rows
            .iter()
            .filter_map(|row| cell_text(&column.value(row)))
            .collect();

        Ok(values.into_iter().collect())
    }

    /// Widget configuration pointing at `url`.
    pub fn client_configuration(&self, url: &str, method: &str) -> ClientConfiguration {
        ClientConfiguration::from_catalog(
            &self.catalog,
            url,
            method,
            &self.config.additional_options,
        )
    }
}

impl<E, V> Clone for DataTable<E, V> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            mapping: Arc::clone(&self.mapping),
            config: self.config.clone(),
            contract: Arc::clone(&self.contract),
            log_hook: self.log_hook.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl<E, V> std::fmt::Debug for DataTable<E, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTable")
            .field("catalog", &self.catalog)
            .field("config", &self.config)
            .field("log_hook", &self.log_hook.is_some())
            .finish_non_exhaustive()
    }
}
