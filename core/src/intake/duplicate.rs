//! Duplicate detection against the retention window.
//!
//! Two signatures are checked: the decoder's content hash for exact repeats,
//! and a fixed interior slice of the payload for repeats that differ only in
//! leading or trailing noise. The slice heuristic assumes the fixed-format
//! preamble of typical alphanumeric pages and can report false positives when
//! unrelated messages share that interior text.

use crate::decoder_interface::PagerMessage;
use crate::intake::window::RetentionWindow;

/// Character offset of the fuzzy signature inside the payload.
pub const FUZZY_OFFSET: usize = 30;
/// Character length of the fuzzy signature.
pub const FUZZY_LEN: usize = 10;

/// True when the window already holds a message with the same hash.
/// Empty payloads never match.
pub fn has_hash_match(candidate: &PagerMessage, window: &RetentionWindow) -> bool {
    !candidate.payload().is_empty() && window.contains(|held| held.hash() == candidate.hash())
}

/// The ten characters starting at offset 30, or `None` for shorter payloads.
pub fn fuzzy_key(payload: &str) -> Option<&str> {
    let mut bounds = payload
        .char_indices()
        .map(|(idx, _)| idx)
        .chain(std::iter::once(payload.len()))
        .skip(FUZZY_OFFSET);
    let start = bounds.next()?;
    let end = bounds.nth(FUZZY_LEN - 1)?;
    Some(&payload[start..end])
}

/// True when any held payload contains the candidate's interior slice.
///
/// Callers must have rejected payloads shorter than `FUZZY_OFFSET + FUZZY_LEN`
/// characters already; the length floor runs first for exactly this reason.
pub fn is_fuzzy_duplicate(candidate: &PagerMessage, window: &RetentionWindow) -> bool {
    let Some(key) = fuzzy_key(candidate.payload()) else {
        debug_assert!(false, "fuzzy check reached with a short payload");
        return false;
    };
    window.contains(|held| held.payload().contains(key))
}
