use crate::domain::Entry;
use crate::rules::Attribute;

/// Text of `entry` that a rule on `attribute` compares against.
///
/// Every attribute yields one value except `tag`, which yields each tag.
/// Unknown attributes yield a single empty string.
pub fn extract<'a>(entry: &'a Entry, attribute: &Attribute) -> Vec<&'a str> {
    match attribute {
        Attribute::Title => vec![entry.title.as_str()],
        Attribute::Content | Attribute::Description => vec![entry.content.as_str()],
        Attribute::Author => vec![entry.author.as_str()],
        Attribute::Tag => entry.tags.iter().map(String::as_str).collect(),
        Attribute::Unknown(_) => vec![""],
    }
}
