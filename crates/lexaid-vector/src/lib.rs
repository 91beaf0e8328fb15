//! lexaid-vector
//!
//! Flat L2 vector index with on-disk persistence, and the retrieval store that
//! keeps it aligned with corpus metadata. See `index`, `persist` and `store`.

pub mod index;
pub mod persist;
pub mod store;

pub use index::{FlatIndex, Neighbor};
pub use persist::{load_or_create, CatalogEntry};
pub use store::{BuildReport, DocumentMeta, RetrievalStore, StoreConfig};
