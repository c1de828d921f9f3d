//! Line parser for the killfile format.
//!
//! ```text
//! ignore-article "http://example.com/feed.xml" "title =~ [Sponsor]"
//! ^command       ^selector                     ^filter clause
//! ```
//!
//! The filter clause may be wrapped in double quotes or backticks; the
//! latter avoids escaping quotes inside the match expression.

use thiserror::Error;

use super::rule::Rule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid filter expression")]
pub struct ParseError;

pub fn parse(line: &str) -> Result<Rule, ParseError> {
    let (command, rest) = take_field(line.trim_start())?;
    let (url, rest) = take_field(skip_separator(rest)?)?;
    let clause = skip_separator(rest)?.trim_end();

    let (attribute, operator, pattern) = split_clause(unwrap_clause(clause)?)?;

    Ok(Rule::new(command, url, attribute, operator, pattern))
}

/// Takes a double-quoted or bare field, returning it with the unconsumed input.
fn take_field(input: &str) -> Result<(&str, &str), ParseError> {
    let (field, rest) = if let Some(quoted) = input.strip_prefix('"') {
        let end = quoted.find('"').ok_or(ParseError)?;
        (&quoted[..end], &quoted[end + 1..])
    } else {
        let end = input.find(char::is_whitespace).unwrap_or(input.len());
        (&input[..end], &input[end..])
    };

    if field.is_empty() {
        return Err(ParseError);
    }
    Ok((field, rest))
}

fn skip_separator(input: &str) -> Result<&str, ParseError> {
    let trimmed = input.trim_start();
    if trimmed.len() == input.len() {
        return Err(ParseError);
    }
    Ok(trimmed)
}

/// Strips the clause delimiter. The clause closes at the last delimiter on
/// the line, so the match expression may itself contain it. Anything after
/// the closing delimiter is ignored.
fn unwrap_clause(clause: &str) -> Result<&str, ParseError> {
    let delim = match clause.as_bytes().first().copied() {
        Some(b'"') => '"',
        Some(b'`') => '`',
        _ => return Err(ParseError),
    };

    match clause.rfind(delim) {
        Some(end) if end > 0 => Ok(&clause[1..end]),
        _ => Err(ParseError),
    }
}

/// Splits `attribute operator match` on single spaces.
fn split_clause(inner: &str) -> Result<(&str, &str, &str), ParseError> {
    let attr_end = inner
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .ok_or(ParseError)?;
    let attribute = &inner[..attr_end];
    let rest = inner[attr_end..].strip_prefix(' ').ok_or(ParseError)?;

    let op_end = rest.find(' ').ok_or(ParseError)?;
    let operator = &rest[..op_end];
    let pattern = &rest[op_end + 1..];

    if attribute.is_empty()
        || operator.is_empty()
        || operator.contains(char::is_whitespace)
        || pattern.is_empty()
    {
        return Err(ParseError);
    }
    Ok((attribute, operator, pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::rule::{Attribute, Operator};

    #[test]
    fn test_parse_quoted_clause() {
        let rule =
            parse(r#"ignore-article "http://example.com/feed.xml" "title # Moon""#).unwrap();
        assert_eq!(rule.command, "ignore-article");
        assert_eq!(rule.url, "http://example.com/feed.xml");
        assert_eq!(rule.attribute, Attribute::Title);
        assert_eq!(rule.operator, Operator::Contains);
        assert_eq!(rule.pattern, "Moon");
    }

    #[test]
    fn test_parse_backtick_clause() {
        let rule =
            parse(r#"ignore-article "http://example.com/feed.xml" `title =~ \[Sponsor\]`"#)
                .unwrap();
        assert_eq!(rule.operator, Operator::Matches);
        assert_eq!(rule.pattern, r"\[Sponsor\]");
    }

    #[test]
    fn test_parse_quoted_command_and_bare_selector() {
        let rule = parse(r#""ignore-article" * "tag # (?i)podcast""#).unwrap();
        assert_eq!(rule.command, "ignore-article");
        assert_eq!(rule.url, "*");
        assert_eq!(rule.attribute, Attribute::Tag);
        assert_eq!(rule.pattern, "(?i)podcast");
    }

    #[test]
    fn test_parse_category_selector_with_spaces() {
        let rule = parse(r#"ignore-article "category:News, Tech" "author !# Alice, Bob""#)
            .unwrap();
        assert_eq!(rule.url, "category:News, Tech");
        assert_eq!(rule.operator, Operator::NotContains);
        assert_eq!(rule.pattern, "Alice, Bob");
    }

    #[test]
    fn test_pattern_keeps_spaces_and_quotes() {
        let rule = parse(r#"ignore-article * "title =~ say "hi" (?i)now"  "#).unwrap();
        assert_eq!(rule.pattern, r#"say "hi" (?i)now"#);
    }

    #[test]
    fn test_text_after_clause_is_ignored() {
        let rule =
            parse(r#"ignore-article "http://example.com/feed.xml" "title # Moon" # note"#)
                .unwrap();
        assert_eq!(rule.pattern, "Moon");

        let rule = parse(r#"ignore-article * `title =~ \[Sponsor\]` trailing"#).unwrap();
        assert_eq!(rule.pattern, r"\[Sponsor\]");
    }

    #[test]
    fn test_unknown_attribute_and_operator_are_kept() {
        let rule = parse(r#"ignore-article * "link == foo""#).unwrap();
        assert_eq!(rule.attribute, Attribute::Unknown("link".into()));
        assert_eq!(rule.operator, Operator::Unknown("==".into()));
    }

    #[test]
    fn test_parse_display_roundtrip() {
        let line = r#"ignore-article "http://example.com/feed.xml" "title =~ (?i)(Podcast|scooter)""#;
        let rule = parse(line).unwrap();
        assert_eq!(rule.to_string(), line);
        assert_eq!(parse(&rule.to_string()).unwrap(), rule);
    }

    #[test]
    fn test_invalid_lines() {
        let invalid = [
            "",
            "   ",
            "ignore-article",
            r#"ignore-article "http://example.com/feed.xml""#,
            r#"ignore-article "http://example.com/feed.xml" title # Moon"#,
            r#"ignore-article "http://example.com/feed.xml" 'title # Moon'"#,
            r#"ignore-article "http://example.com/feed.xml" "title # Moon"#,
            r#"ignore-article "http://example.com/feed.xml" "title # Moon`"#,
            r#"ignore-article "http://example.com/feed.xml" "title #""#,
            r#"ignore-article "http://example.com/feed.xml" "title # ""#,
            r#"ignore-article "http://example.com/feed.xml" "title""#,
            r#"ignore-article "http://example.com/feed.xml" "feed-title # Moon""#,
            r#"ignore-article "http://example.com/feed.xml" "title  # Moon""#,
            r#"ignore-article "" "title # Moon""#,
            r#"ignore-article "unterminated "title # Moon"#,
        ];
        for line in invalid {
            assert_eq!(parse(line), Err(ParseError), "line: {line:?}");
        }
    }

    #[test]
    fn test_error_message() {
        assert_eq!(ParseError.to_string(), "invalid filter expression");
    }
}
