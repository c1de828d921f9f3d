pub mod parser;
pub mod repository;
pub mod rule;
pub mod source;

pub use parser::{parse, ParseError};
pub use repository::{parse_killfile, LoadSummary, RejectedLine, RuleRepository};
pub use rule::{Attribute, Operator, Rule};
pub use source::RuleSource;
