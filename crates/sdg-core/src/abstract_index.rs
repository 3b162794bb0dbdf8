//! Reconstruct abstracts stored as inverted indexes.
//!
//! Bibliographic APIs such as OpenAlex ship abstracts as a word → positions
//! mapping instead of running text:
//!
//! ```json
//! {"the": [1, 3], "cat": [2]}
//! ```
//!
//! Decoding places each word at every position it occupies and joins the
//! slots with single spaces. Positions missing from the index stay as empty
//! slots, so a gap shows up as a double space rather than shifting the words
//! that follow it.

use std::collections::BTreeMap;

use crate::CoreError;

/// Word → positions mapping. Ordered so that duplicate positions resolve the
/// same way on every run: the lexicographically last word wins the slot.
pub type InvertedIndex = BTreeMap<String, Vec<i64>>;

/// Upper bound on the highest position accepted from an index.
pub const MAX_ABSTRACT_POSITIONS: usize = 100_000;

/// Numbering convention of an index's positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexBase {
    /// First word at position 0.
    Zero,
    /// First word at position 1.
    One,
}

impl IndexBase {
    /// Zero-based if any position is 0, otherwise one-based.
    ///
    /// OpenAlex numbers from 0; hand-built and legacy indexes number from 1.
    pub fn detect(index: &InvertedIndex) -> Self {
        if index.values().flatten().any(|&p| p == 0) {
            Self::Zero
        } else {
            Self::One
        }
    }

    fn offset(self) -> i64 {
        match self {
            Self::Zero => 1,
            Self::One => 0,
        }
    }
}

/// Decode a 1-based inverted index into whitespace-joined text.
///
/// An absent or empty index yields an empty string. Non-positive positions
/// are rejected with [`CoreError::InvalidPosition`].
pub fn deabstract(index: Option<&InvertedIndex>) -> Result<String, CoreError> {
    deabstract_with_base(index, IndexBase::One)
}

/// Decode an inverted index whose positions follow `base`.
pub fn deabstract_with_base(
    index: Option<&InvertedIndex>,
    base: IndexBase,
) -> Result<String, CoreError> {
    let Some(index) = index else {
        return Ok(String::new());
    };

    // Validate everything and find the length before allocating.
    let mut len = 0usize;
    for (word, positions) in index {
        for &position in positions {
            let slot = position.saturating_add(base.offset());
            if slot < 1 {
                return Err(CoreError::InvalidPosition {
                    word: word.clone(),
                    position,
                });
            }
            if slot as u64 > MAX_ABSTRACT_POSITIONS as u64 {
                return Err(CoreError::PositionOutOfRange {
                    word: word.clone(),
                    position,
                    limit: MAX_ABSTRACT_POSITIONS,
                });
            }
            len = len.max(slot as usize);
        }
    }

    if len == 0 {
        return Ok(String::new());
    }

    let mut slots = vec![""; len];
    for (word, positions) in index {
        for &position in positions {
            slots[(position.saturating_add(base.offset()) - 1) as usize] = word.as_str();
        }
    }

    Ok(slots.join(" "))
}
