//! Fuzzy matching of typed quiz answers.
//!
//! Fill-in-the-blank answers are typed free text, so grading tolerates minor
//! typos: both sides are normalized, then compared by Levenshtein similarity
//! against a fixed threshold.

use serde::{Deserialize, Serialize};

/// Similarity at or above which a typed answer counts as correct.
///
/// Fixed grading policy, not user-configurable.
pub const MATCH_THRESHOLD: f64 = 0.85;

/// Result of comparing a typed answer to the expected answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// Whether the answer is graded as correct.
    pub is_correct: bool,
    /// Similarity score between 0.0 and 1.0.
    pub similarity: f64,
    /// Normalized typed answer (for display).
    pub submitted_normalized: String,
    /// Normalized expected answer (for display).
    pub reference_normalized: String,
}

/// Compare a typed answer to the expected answer.
///
/// Both strings are trimmed and lowercased. Identical normalized strings
/// match outright; otherwise the similarity ratio is checked against
/// [`MATCH_THRESHOLD`].
pub fn match_answer(submitted: &str, reference: &str) -> MatchResult {
    let submitted_normalized = normalize_answer(submitted);
    let reference_normalized = normalize_answer(reference);

    if submitted_normalized == reference_normalized {
        return MatchResult {
            is_correct: true,
            similarity: 1.0,
            submitted_normalized,
            reference_normalized,
        };
    }

    let similarity = normalized_similarity(&submitted_normalized, &reference_normalized);
    MatchResult {
        is_correct: similarity >= MATCH_THRESHOLD,
        similarity,
        submitted_normalized,
        reference_normalized,
    }
}

/// Whether a typed answer counts as correct against the expected answer.
pub fn answer_matches(submitted: &str, reference: &str) -> bool {
    match_answer(submitted, reference).is_correct
}

/// Trim surrounding whitespace and lowercase.
fn normalize_answer(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Calculate Levenshtein distance between two strings, over chars.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rows instead of the full matrix.
    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;

        for j in 1..=n {
            let cost = if a_chars[i - 1] == b_chars[j - 1] {
                0
            } else {
                1
            };

            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Calculate normalized similarity (0.0 to 1.0) based on Levenshtein distance.
///
/// The denominator is the longer side's char count, so the ratio stays
/// meaningful for Arabic answers where byte length and char count differ.
/// Two empty strings are identical; empty against non-empty scores 0.
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein_distance(a, b);
    1.0 - (distance as f64 / max_len as f64)
}
