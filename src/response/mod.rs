//! # Response packaging
//!
//! Page + counts + echoed draw counter → wire response. Field relabeling to
//! public column names happens here, at serialization time, so one mapped
//! row type can serve several contracts.

mod contract;
mod packager;

pub use contract::SerializationContract;
pub use packager::DataTablesResponse;
