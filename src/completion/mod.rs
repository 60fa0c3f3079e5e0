//! Search suggestions for the search box.

pub mod provider;
pub mod search_provider;

pub use provider::SuggestionList;
pub use search_provider::{fetch_suggestions, parse_suggestions, suggestion_url, SuggestionSource};

use crate::config::AppConfig;

/// Suggestions for `query`, honouring the suggestion settings in `config`
pub fn suggestions_for<S: SuggestionSource + ?Sized>(
    config: &AppConfig,
    source: &S,
    query: &str,
) -> SuggestionList {
    if !config.suggestions {
        return SuggestionList::default();
    }
    SuggestionList::new(fetch_suggestions(source, query, config.suggestion_limit))
}
