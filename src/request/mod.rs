//! # Request decoding
//!
//! Raw wire parameters in, [`ParsedRequest`] out.
//!
//! Wire keys understood by the decoder:
//!
//! | key | default |
//! |-----|---------|
//! | `start`, `length`, `draw` | `0`, `15`, `0` |
//! | `search[value]`, `search[regex]` | `""`, `false` |
//! | `columns[i][data]`, `columns[i][name]` | column identity, `data` first |
//! | `columns[i][searchable]`, `columns[i][orderable]` | catalog flag |
//! | `columns[i][search][value]`, `columns[i][search][regex]` | `""`, `false` |
//! | `columns[i][cisearch]`, `columns[i][ciorder]` | catalog flag |
//! | `order[i][column]`, `order[i][dir]` | none, `asc` |

mod decoder;
mod params;
mod parsed;

pub use decoder::{WireDecoder, DEFAULT_PAGE_SIZE};
pub use params::RequestParams;
pub use parsed::{
    ColumnOrdering, DecodeDiagnostics, ParsedRequest, RequestColumn, RowMapper, SortDirection,
};
