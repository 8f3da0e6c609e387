//! Input/output helpers.
//!
//! - capture-file ingest + validation (`ingest`)
//! - content hashing (`hash`) and the content-addressed parse cache (`cache`)
//! - per-sample result exports (`export`)
//! - fit JSON read/write (`fit_file`)

pub mod cache;
pub mod export;
pub mod fit_file;
pub mod hash;
pub mod ingest;

pub use cache::*;
pub use export::*;
pub use fit_file::*;
pub use hash::*;
pub use ingest::*;
