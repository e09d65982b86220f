//! Store Query Protocol
//!
//! Client side of the store's `/store/query` endpoint:
//!
//! - **engine**: Query strategies the store offers
//! - **request**: Deterministic request construction (method + escaped target)
//! - **result**: Metadata envelope decoding
//! - **records**: Owned record byte stream with guaranteed release
//! - **error**: Error types
//!
//! # Flow
//!
//! ```text
//! QueryRequest::build → StoreClient::execute → QueryResult::decode → report
//!                        (GET, or HEAD for stats)    (headers + body)
//! ```

mod engine;
mod error;
mod records;
mod request;
mod result;

pub use engine::Engine;
pub use error::{QueryError, Result};
pub use records::{RecordSource, RecordStream};
pub use request::{QueryMethod, QueryRequest, QUERY_PATH};
pub use result::{
    QueryResult, QueryStats, HEADER_ENGINE, HEADER_ERROR_COUNT, HEADER_FROM,
    HEADER_NODES_QUERIED, HEADER_Q, HEADER_RECORDS_MATCHED, HEADER_RECORDS_QUERIED,
    HEADER_SEGMENTS_QUERIED, HEADER_TO,
};

#[cfg(test)]
pub(crate) use records::testing;
