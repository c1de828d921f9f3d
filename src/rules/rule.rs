use std::fmt;

/// Part of an entry a rule inspects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Attribute {
    Title,
    Content,
    /// Kept for killfiles written against newsboat; reads the entry content.
    Description,
    Author,
    Tag,
    Unknown(String),
}

impl Attribute {
    pub fn as_str(&self) -> &str {
        match self {
            Attribute::Title => "title",
            Attribute::Content => "content",
            Attribute::Description => "description",
            Attribute::Author => "author",
            Attribute::Tag => "tag",
            Attribute::Unknown(s) => s.as_str(),
        }
    }
}

impl From<&str> for Attribute {
    fn from(s: &str) -> Self {
        match s {
            "title" => Attribute::Title,
            "content" => Attribute::Content,
            "description" => Attribute::Description,
            "author" => Attribute::Author,
            "tag" => Attribute::Tag,
            other => Attribute::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=~`
    Matches,
    /// `!~`
    NotMatches,
    /// `#`
    Contains,
    /// `!#`
    NotContains,
    Unknown(String),
}

impl Operator {
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Matches => "=~",
            Operator::NotMatches => "!~",
            Operator::Contains => "#",
            Operator::NotContains => "!#",
            Operator::Unknown(s) => s.as_str(),
        }
    }

    pub fn is_negated(&self) -> bool {
        matches!(self, Operator::NotMatches | Operator::NotContains)
    }
}

impl From<&str> for Operator {
    fn from(s: &str) -> Self {
        match s {
            "=~" => Operator::Matches,
            "!~" => Operator::NotMatches,
            "#" => Operator::Contains,
            "!#" => Operator::NotContains,
            other => Operator::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One killfile line. Follows the newsboat killfile format:
/// <https://newsboat.org/releases/2.15/docs/newsboat.html#_killfiles>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub command: String,
    pub url: String,
    pub attribute: Attribute,
    pub operator: Operator,
    pub pattern: String,
}

impl Rule {
    pub fn new(
        command: impl Into<String>,
        url: impl Into<String>,
        attribute: &str,
        operator: &str,
        pattern: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            url: url.into(),
            attribute: Attribute::from(attribute),
            operator: Operator::from(operator),
            pattern: pattern.into(),
        }
    }
}

/// Renders the rule back into killfile syntax. Backticks are used for the
/// filter clause when the pattern contains a double quote.
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let delim = if self.pattern.contains('"') { '`' } else { '"' };
        write!(
            f,
            "{} \"{}\" {delim}{} {} {}{delim}",
            self.command, self.url, self.attribute, self.operator, self.pattern
        )
    }
}
