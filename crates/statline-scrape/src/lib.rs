//! Extraction and reconciliation pipeline for statline.
//!
//! Data flows one way: page → [`extract`]ed tabular rows → per-subject
//! store → [`reconcile`] across stores. The accumulator of observed
//! table keys is an explicit value returned by extraction and handed to
//! reconciliation; there is no process-global state.

pub mod error;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod reconcile;

pub use error::{Error, Result};
pub use fetch::PageFetcher;
pub use pipeline::{PipelineConfig, RunReport, ingest_page, run};
pub use reconcile::reconcile;
