//! textstat-core: pure building blocks of the textstat service.
//!
//! - [`metrics`] -- word, character, sentence and paragraph statistics
//! - [`pagination`] -- query-parameter resolution into a bounded page spec
//!
//! Nothing in this crate performs I/O or can fail; malformed input degrades
//! to well-defined results.

/// Maximum accepted length of a submitted text, in UTF-16 code units.
pub const MAX_TEXT_LENGTH: usize = 50_000;

pub mod metrics;
pub mod pagination;

// ── Convenience re-exports ───────────────────────────────────────────

pub use metrics::{
    count_characters, count_paragraphs, count_sentences, count_words,
    longest_words_in_paragraphs, TextMetrics,
};
pub use pagination::{
    resolve, PaginationMeta, PaginationOptions, PaginationSpec, RawPageQuery, SortDirection,
};
