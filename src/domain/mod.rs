pub mod entry;
pub mod feed;

pub use entry::{Entry, EntryStatus};
pub use feed::{Category, Feed, User};
