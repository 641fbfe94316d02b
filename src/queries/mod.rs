//! Query interfaces over the summary store.
//!
//! Each query struct borrows a [`SummaryStore`](crate::store::SummaryStore) and
//! returns typed rows.

pub mod predictions;

pub use predictions::PredictionReader;
