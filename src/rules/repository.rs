use tracing::{debug, error, info};

use super::parser::{parse, ParseError};
use super::rule::Rule;
use super::source::RuleSource;

/// A killfile line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based
    pub line_number: usize,
    pub line: String,
    pub error: ParseError,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub parsed: usize,
    pub skipped: usize,
}

/// Parses killfile text line by line. Blank lines are ignored.
pub fn parse_killfile(text: &str) -> (Vec<Rule>, Vec<RejectedLine>) {
    let mut rules = Vec::new();
    let mut rejected = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        match parse(line) {
            Ok(rule) => rules.push(rule),
            Err(e) => rejected.push(RejectedLine {
                line_number: idx + 1,
                line: line.to_string(),
                error: e,
            }),
        }
    }

    (rules, rejected)
}

/// Holds the active rule set. The set is only ever replaced as a whole.
#[derive(Debug, Clone, Default)]
pub struct RuleRepository {
    rules: Vec<Rule>,
}

impl RuleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn replace(&mut self, rules: Vec<Rule>) {
        self.rules = rules;
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Reads and parses the killfile at `source`.
    ///
    /// Failures are logged rather than returned: an unreadable source keeps
    /// the current rules, and unparsable lines are skipped.
    pub async fn load(&mut self, source: &RuleSource, http: &reqwest::Client) {
        match source.read(http).await {
            Ok(text) => {
                let summary = self.load_str(&text);
                info!(
                    source = %source,
                    parsed = summary.parsed,
                    skipped = summary.skipped,
                    "loaded killfile"
                );
            }
            Err(e) => {
                error!(source = %source, error = %e, "failed to read killfile, keeping current rules");
            }
        }
    }

    /// Parses `text` and replaces the rule set with whatever parsed.
    pub fn load_str(&mut self, text: &str) -> LoadSummary {
        let (rules, rejected) = parse_killfile(text);

        for r in &rejected {
            error!(line = r.line_number, expression = %r.line, error = %r.error, "skipping killfile line");
        }
        for rule in &rules {
            debug!(rule = %rule, "parsed rule");
        }

        let summary = LoadSummary {
            parsed: rules.len(),
            skipped: rejected.len(),
        };
        self.replace(rules);
        summary
    }
}
