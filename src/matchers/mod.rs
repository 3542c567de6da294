pub use field::FieldMatcher;
pub use suggestion::{SuggestionMatcher, SUGGESTION_LIMIT};

mod field;
mod suggestion;
