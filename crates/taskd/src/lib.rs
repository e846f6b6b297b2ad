//! taskd — a single-resource task tracking service.
//!
//! Tasks are identified by a unique title and live in a volatile in-memory
//! store for the lifetime of the process. The HTTP layer in [`server`] is
//! thin transport glue over the concurrent store in [`store`].

pub mod error;
pub mod server;
pub mod store;
pub mod task;
