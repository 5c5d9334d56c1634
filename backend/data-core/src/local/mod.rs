//! On-device data sources.
//!
//! - [`SqliteDataSource`]: durable, one table per entity, JSON bodies
//! - [`InMemoryDataSource`]: volatile, for previews and tests
//!
//! Both translate a [`models::Query`] into the same equality-AND semantics:
//! a field matches when its text rendering equals the query value.

pub mod filter;
pub mod memory;
pub mod sqlite;
pub mod store;

pub use memory::InMemoryDataSource;
pub use sqlite::SqliteDataSource;
pub use store::LocalStore;
