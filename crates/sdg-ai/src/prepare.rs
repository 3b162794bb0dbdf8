//! Text → model input.
//!
//! The classifier was fine-tuned on BERT inputs built sentence by sentence:
//! a `[CLS]` marker opens the document and every sentence is closed with
//! `[SEP]`. The marked text is encoded by the pretrained vocabulary, cut at
//! `max_len`, right-padded with 0 and paired with an attention mask that is
//! 1 wherever the id is non-zero.

use std::sync::LazyLock;

use regex::Regex;

pub const DEFAULT_MAX_LEN: usize = 512;

pub const CLS: &str = "[CLS]";
pub const SEP: &str = "[SEP]";

/// Sentence terminator plus any closing quotes/brackets, then whitespace.
static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[.!?]+["'\u{201D}\u{2019})\]]*\s+"#).expect("valid sentence regex")
});

/// Fixed-length `[1, max_len]` input pair for the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInput {
    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
}

impl ModelInput {
    /// Truncate/pad `ids` to `max_len` and derive the attention mask.
    pub fn from_ids(ids: &[u32], max_len: usize) -> Self {
        let input_ids = pad_ids(ids, max_len);
        let attention_mask = attention_mask(&input_ids);
        Self {
            input_ids,
            attention_mask,
        }
    }

    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }

    /// Number of real (non-padding) tokens.
    pub fn token_count(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m > 0).count()
    }
}

/// Split running text into trimmed, non-empty sentences.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_END.find_iter(text) {
        let end = m.start() + m.as_str().trim_end().len();
        let sentence = text[start..end].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        start = m.end();
    }
    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }
    sentences
}

/// Open the document with `[CLS]` and close every sentence with `[SEP]`.
///
/// `"A b. C d."` becomes `"[CLS] A b. [SEP] C d. [SEP] "`.
pub fn mark_sentences(text: &str) -> String {
    let mut marked = String::with_capacity(text.len() + 16);
    marked.push_str(CLS);
    marked.push(' ');
    for sentence in split_sentences(text) {
        marked.push_str(sentence);
        marked.push(' ');
        marked.push_str(SEP);
        marked.push(' ');
    }
    marked
}

/// Truncate at `max_len` (keeping the head) and right-pad with 0.
pub fn pad_ids(ids: &[u32], max_len: usize) -> Vec<i64> {
    let mut padded: Vec<i64> = ids.iter().take(max_len).map(|&id| id as i64).collect();
    padded.resize(max_len, 0);
    padded
}

/// 1 where the id is a real token (> 0), 0 for padding.
pub fn attention_mask(ids: &[i64]) -> Vec<i64> {
    ids.iter().map(|&id| i64::from(id > 0)).collect()
}
