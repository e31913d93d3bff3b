//! Result packager
//!
//! Wraps a page into the wire response:
//!
//! ```json
//! { "draw": 7, "recordsTotal": 3, "recordsFiltered": 3, "data": [ ... ] }
//! ```

use std::sync::Arc;

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::contract::SerializationContract;
use crate::query::PagedList;

/// Response for one draw of the table.
#[derive(Debug, Clone)]
pub struct DataTablesResponse<V> {
    pub draw: i64,
    pub records_total: u64,
    pub records_filtered: u64,
    pub data: Vec<V>,
    contract: Arc<SerializationContract>,
}

impl<V> DataTablesResponse<V> {
    /// Package `page`. `recordsTotal` is the unfiltered count when the page
    /// carries one, otherwise the filtered count.
    pub fn from_page(draw: i64, page: PagedList<V>, contract: Arc<SerializationContract>) -> Self {
        Self {
            draw,
            records_total: page.unfiltered_count.unwrap_or(page.total_count),
            records_filtered: page.total_count,
            data: page.items,
            contract,
        }
    }

    pub fn contract(&self) -> &SerializationContract {
        &self.contract
    }
}

impl<V: Serialize> DataTablesResponse<V> {
    /// Serialize into a JSON value with relabeled rows.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

struct RelabeledRows<'a, V> {
    rows: &'a [V],
    contract: &'a SerializationContract,
}

impl<V: Serialize> Serialize for RelabeledRows<'_, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in self.rows {
            let value = serde_json::to_value(row).map_err(S::Error::custom)?;
            seq.serialize_element(&self.contract.relabel(value))?;
        }
        seq.end()
    }
}

impl<V: Serialize> Serialize for DataTablesResponse<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("draw", &self.draw)?;
        map.serialize_entry("recordsTotal", &self.records_total)?;
        map.serialize_entry("recordsFiltered", &self.records_filtered)?;
        map.serialize_entry(
            "data",
            &RelabeledRows {
                rows: &self.data,
                contract: &self.contract,
            },
        )?;
        map.end()
    }
}
