//! Pipeline components: queue wiring, executor, signing stages.

pub mod combine;
pub mod context;
pub mod error_handler;
pub mod executor;
pub mod multi_hash;
pub mod orchestrator;
pub mod single_hash;
pub mod workers;

pub use combine::{Combine, ProgressFn, combine_results};
pub use context::{QueueLink, QueueLinks, create_queue_links, send_item};
pub use error_handler::{FirstError, resolve_stage_outcomes};
pub use executor::{FnStage, Stage, execute_pipeline, run_pipeline};
pub use multi_hash::MultiHash;
pub use orchestrator::{run_signing, signing_stages};
pub use single_hash::SingleHash;
pub use workers::process_per_item;
