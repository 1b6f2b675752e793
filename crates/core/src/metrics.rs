//! Deterministic text statistics.
//!
//! Every function here is total: any string, including the empty string,
//! produces a result. Segmentation is purely lexical. Abbreviations such as
//! "Mr." and decimals such as "12.99" end a sentence like any other
//! terminator.
//!
//! Paragraph boundaries are shared by [`count_paragraphs`] and
//! [`longest_words_in_paragraphs`], so the latter always yields exactly one
//! entry per counted paragraph.

use serde::{Deserialize, Serialize};

/// Characters that terminate a sentence. Runs of them form one boundary.
const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// A whitespace run with at least this many newlines separates paragraphs.
const PARAGRAPH_BREAK_NEWLINES: usize = 2;

/// All statistics computed for one text, named as they are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMetrics {
    pub number_of_words: u64,
    pub number_of_characters: u64,
    pub number_of_sentences: u64,
    pub number_of_paragraphs: u64,
    pub longest_words_in_paragraphs: Vec<String>,
}

impl TextMetrics {
    /// Run every metric over `text`.
    pub fn compute(text: &str) -> Self {
        Self {
            number_of_words: count_words(text),
            number_of_characters: count_characters(text),
            number_of_sentences: count_sentences(text),
            number_of_paragraphs: count_paragraphs(text),
            longest_words_in_paragraphs: longest_words_in_paragraphs(text),
        }
    }
}

/// ASCII letters, digits and `_`. Other letters are stripped like
/// punctuation.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Unicode `White_Space` plus U+FEFF, minus U+0085: the set web clients
/// treat as whitespace in patterns and `trim`.
fn is_space(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{85}')
}

/// Strip everything that is neither a word character nor whitespace, then
/// lowercase.
fn normalize(text: &str) -> String {
    text.chars()
        .filter(|&c| is_word_char(c) || is_space(c))
        .collect::<String>()
        .to_lowercase()
}

fn tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split(is_space).filter(|token| !token.is_empty())
}

/// Number of whitespace-separated tokens left after punctuation is removed.
pub fn count_words(text: &str) -> u64 {
    tokens(&normalize(text)).count() as u64
}

/// Raw length of `text` in UTF-16 code units, with no normalization.
///
/// This is the unit JSON clients use for string length, and the unit the
/// submission size limit is expressed in.
pub fn count_characters(text: &str) -> u64 {
    text.encode_utf16().count() as u64
}

/// Number of sentences, where a sentence ends at a run of `.`, `!` or `?`.
///
/// A trailing fragment with no terminator is an incomplete sentence and is
/// not counted.
pub fn count_sentences(text: &str) -> u64 {
    let trimmed = text.trim_matches(is_space);
    if trimmed.is_empty() {
        return 0;
    }

    let fragments = trimmed
        .split(SENTENCE_TERMINATORS)
        .filter(|fragment| !fragment.trim_matches(is_space).is_empty())
        .count() as u64;

    if trimmed.ends_with(SENTENCE_TERMINATORS) {
        fragments
    } else {
        fragments.saturating_sub(1)
    }
}

/// Number of paragraphs, separated by blank lines.
pub fn count_paragraphs(text: &str) -> u64 {
    paragraphs(text).len() as u64
}

/// The longest word of each paragraph, in paragraph order.
///
/// Words are lowercased with punctuation removed. Ties go to the word that
/// appears first. A paragraph made only of punctuation yields `""`.
pub fn longest_words_in_paragraphs(text: &str) -> Vec<String> {
    paragraphs(text).into_iter().map(longest_word).collect()
}

fn longest_word(paragraph: &str) -> String {
    let normalized = normalize(paragraph);

    let mut longest = "";
    let mut longest_len = 0;
    for token in tokens(&normalized) {
        let len = token.chars().count();
        // Strictly greater: the first of equally long tokens wins.
        if len > longest_len {
            longest = token;
            longest_len = len;
        }
    }
    longest.to_string()
}

/// Split `text` at every whitespace run containing at least two newlines and
/// drop fragments that are empty or whitespace-only.
fn paragraphs(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    // (byte offset where the current whitespace run began, newlines seen in it)
    let mut gap: Option<(usize, usize)> = None;

    for (i, c) in text.char_indices() {
        if is_space(c) {
            let (_, newlines) = gap.get_or_insert((i, 0));
            if c == '\n' {
                *newlines += 1;
            }
        } else if let Some((run_start, newlines)) = gap.take() {
            if newlines >= PARAGRAPH_BREAK_NEWLINES {
                pieces.push(&text[start..run_start]);
                start = i;
            }
        }
    }
    pieces.push(&text[start..]);

    pieces.retain(|piece| !piece.trim_matches(is_space).is_empty());
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── count_words ──────────────────────────────────────────────────

    #[test]
    fn words_empty_and_whitespace() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   "), 0);
        assert_eq!(count_words("\t\n  "), 0);
    }

    #[test]
    fn words_basic_and_repeated_whitespace() {
        assert_eq!(count_words("hello"), 1);
        assert_eq!(count_words("the quick brown fox"), 4);
        assert_eq!(count_words("one  two   three    four"), 4);
        assert_eq!(count_words("one\t\ntwo   three"), 3);
    }

    #[test]
    fn words_ignore_punctuation() {
        assert_eq!(count_words("hello, world!"), 2);
        assert_eq!(count_words("don't count punctuation."), 3);
        assert_eq!(count_words("one; two: three? four!"), 4);
        assert_eq!(count_words("  Hello,  WORLD!  How are   you?  "), 5);
        assert_eq!(count_words("\t\nOne,\ttwo.\nThree!\t\n"), 3);
    }

    #[test]
    fn words_only_punctuation_is_zero() {
        assert_eq!(count_words("!@#$%^&*()"), 0);
        assert_eq!(count_words(".,;:!?"), 0);
        assert_eq!(count_words(" - -- ... "), 0);
    }

    #[test]
    fn words_with_digits_and_accents() {
        assert_eq!(count_words("hello123 world456"), 2);
        // Non-ASCII letters are stripped; "naïve" keeps "nave".
        assert_eq!(count_words("naïve café"), 2);
        assert_eq!(count_words("日本語"), 0);
        assert_eq!(count_words("日本語 text"), 1);
    }

    #[test]
    fn words_split_on_byte_order_mark_but_not_next_line() {
        assert_eq!(count_words("a\u{FEFF}b"), 2);
        assert_eq!(count_words("a\u{A0}b"), 2);
        // U+0085 is neither a word character nor whitespace, so it is removed.
        assert_eq!(count_words("a\u{85}b"), 1);
    }

    // ── count_characters ─────────────────────────────────────────────

    #[test]
    fn characters_are_raw_utf16_length() {
        assert_eq!(count_characters(""), 0);
        assert_eq!(count_characters("This is a sample text for testing."), 34);
        assert_eq!(count_characters("  padded  "), 10);
        assert_eq!(count_characters("é"), 1);
        // Astral-plane characters take two code units.
        assert_eq!(count_characters("😀"), 2);
    }

    // ── count_sentences ──────────────────────────────────────────────

    #[test]
    fn sentences_terminated_and_unterminated() {
        assert_eq!(count_sentences("Hello world."), 1);
        assert_eq!(count_sentences("Hello world"), 0);
        assert_eq!(count_sentences("Wait! Stop! Go!"), 3);
        assert_eq!(count_sentences("One. Two. Three"), 2);
    }

    #[test]
    fn sentences_collapse_terminator_runs() {
        assert_eq!(count_sentences("Really?!? Yes..."), 2);
        assert_eq!(count_sentences("..."), 0);
        assert_eq!(count_sentences("  Trailing space.   "), 1);
    }

    #[test]
    fn sentences_split_abbreviations_and_decimals() {
        assert_eq!(count_sentences("Mr. Smith paid $12.99 today."), 3);
    }

    #[test]
    fn sentences_empty() {
        assert_eq!(count_sentences(""), 0);
        assert_eq!(count_sentences(" \n\t "), 0);
    }

    // ── count_paragraphs ─────────────────────────────────────────────

    #[test]
    fn paragraphs_split_on_blank_lines() {
        assert_eq!(count_paragraphs("First.\n\nSecond."), 2);
        assert_eq!(count_paragraphs("One line only"), 1);
        assert_eq!(count_paragraphs("a\nb\nc"), 1);
        assert_eq!(count_paragraphs("a\n  \t\n b"), 2);
        assert_eq!(count_paragraphs("a\r\n\r\nb"), 2);
    }

    #[test]
    fn paragraphs_ignore_leading_trailing_and_repeated_gaps() {
        assert_eq!(count_paragraphs("\n\n\nA\n\n\n\n\nB\n\n"), 2);
        assert_eq!(count_paragraphs(""), 0);
        assert_eq!(count_paragraphs("\n\n \n"), 0);
    }

    // ── longest_words_in_paragraphs ──────────────────────────────────

    #[test]
    fn longest_word_tie_goes_to_first() {
        assert_eq!(longest_words_in_paragraphs("cat dog fox"), vec!["cat"]);
    }

    #[test]
    fn longest_word_per_paragraph_lowercased_without_punctuation() {
        let text = "The Elephant, walked.\n\nA tiny mouse!\n\n!!! ???";
        assert_eq!(
            longest_words_in_paragraphs(text),
            vec!["elephant".to_string(), "mouse".to_string(), String::new()]
        );
    }

    #[test]
    fn longest_word_ignores_non_ascii_letters() {
        assert_eq!(longest_words_in_paragraphs("café lait"), vec!["lait"]);
        assert_eq!(longest_words_in_paragraphs("ééééé abc"), vec!["abc"]);
        assert_eq!(longest_words_in_paragraphs("日本語"), vec![String::new()]);
    }

    #[test]
    fn longest_words_empty_input() {
        assert!(longest_words_in_paragraphs("").is_empty());
        assert!(longest_words_in_paragraphs("  \n\n ").is_empty());
    }

    // ── TextMetrics ──────────────────────────────────────────────────

    #[test]
    fn compute_collects_every_metric() {
        let metrics = TextMetrics::compute("Hello world. Second sentence!");
        assert_eq!(metrics.number_of_words, 4);
        assert_eq!(metrics.number_of_characters, 29);
        assert_eq!(metrics.number_of_sentences, 2);
        assert_eq!(metrics.number_of_paragraphs, 1);
        assert_eq!(metrics.longest_words_in_paragraphs, vec!["sentence"]);
    }

    #[test]
    fn metrics_serialize_with_camel_case_names() {
        let json = serde_json::to_value(TextMetrics::compute("Hi.")).unwrap();
        assert_eq!(json["numberOfWords"], 1);
        assert_eq!(json["numberOfSentences"], 1);
        assert_eq!(json["longestWordsInParagraphs"], serde_json::json!(["hi"]));
    }
}
