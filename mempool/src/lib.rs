//! Capacity-bounded transaction pool ordered by total fee.
//!
//! Transactions arrive one per line as `Key=Value` tokens, are ranked by
//! `FeePerGas × Gas`, and only the best [`DEFAULT_CAPACITY`] (or a chosen
//! bound) survive. Draining the pool writes them back out, highest fee first.
//!
//! The ranking itself lives in [`mempool_collections::BoundedDualHeap`];
//! this crate adds the record format, stream handling and process wiring.

pub mod error;
pub mod log;
pub mod pool;
pub mod settings;
pub mod transaction;

pub use error::{Error, ParseError, Result};
pub use pool::{DEFAULT_CAPACITY, MemPool, prioritize};
pub use settings::Settings;
pub use transaction::Transaction;
