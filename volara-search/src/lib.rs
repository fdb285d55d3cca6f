pub mod merger;
pub mod suggest;

pub use merger::UnifiedSearch;
pub use suggest::SuggestionService;
