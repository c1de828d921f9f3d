pub mod evaluator;
pub mod extractor;
pub mod matcher;
pub mod selector;
pub mod service;

pub use evaluator::{Evaluator, KillSet};
pub use matcher::Matcher;
pub use service::{FilterService, JobSummary};
