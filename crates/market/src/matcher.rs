//! Fuzzy commodity matching
//!
//! Users write "chikpea", "tamatar", "basmati dhan"; the dataset says
//! "Bengal Gram(Gram)(Whole)", "Tomato", "Paddy(Dhan)(Basmati)". A weighted
//! ratio (best of plain, token-sort and token-set similarity over edit
//! distance, scaled 0-100) scores every vocabulary entry; the best entry is
//! accepted only at or above the caller's threshold. Below threshold there
//! is no partial credit - callers keep the raw text as a label and leave the
//! dataset filter unset rather than risk a wrong match.

use serde::{Deserialize, Serialize};

use crate::vocabulary::CommodityVocabulary;

/// Accepted fuzzy match against the commodity vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommodityMatch {
    pub canonical_name: String,
    /// Weighted-ratio similarity, 0-100
    pub score: u8,
}

/// Levenshtein distance over characters (two-row DP)
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Plain similarity ratio, 0.0-100.0
fn ratio(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 100.0;
    }
    let distance = edit_distance(a, b);
    ((total - distance.min(total)) as f64 / total as f64) * 100.0
}

fn sorted_tokens(s: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens
}

/// Ratio after sorting tokens, so word order stops mattering
fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a).join(" "), &sorted_tokens(b).join(" "))
}

/// Ratio over token intersection/remainder combinations; forgiving when one
/// side carries extra words ("basmati" vs "paddy dhan basmati")
fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a = sorted_tokens(a);
    let tokens_b = sorted_tokens(b);

    let common: Vec<&str> = tokens_a
        .iter()
        .filter(|t| tokens_b.contains(t))
        .copied()
        .collect();
    let only_a: Vec<&str> = tokens_a
        .iter()
        .filter(|t| !common.contains(t))
        .copied()
        .collect();
    let only_b: Vec<&str> = tokens_b
        .iter()
        .filter(|t| !common.contains(t))
        .copied()
        .collect();

    let join = |rest: &[&str]| {
        if rest.is_empty() {
            common.join(" ")
        } else {
            format!("{} {}", common.join(" "), rest.join(" "))
                .trim()
                .to_string()
        }
    };
    let base = common.join(" ");
    let combined_a = join(&only_a);
    let combined_b = join(&only_b);

    ratio(&base, &combined_a)
        .max(ratio(&base, &combined_b))
        .max(ratio(&combined_a, &combined_b))
}

/// Normalize for comparison: lowercase, punctuation to spaces
fn normalize(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Weighted-ratio similarity between a user mention and a vocabulary entry
pub fn weighted_ratio(a: &str, b: &str) -> u8 {
    let a = normalize(a);
    let b = normalize(b);
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let score = ratio(&a, &b)
        .max(token_sort_ratio(&a, &b))
        .max(token_set_ratio(&a, &b));
    score.round().clamp(0.0, 100.0) as u8
}

/// Best vocabulary match for a commodity mention, gated on `threshold`.
///
/// Empty mention or empty vocabulary yields `None` immediately; a best score
/// below threshold also yields `None` - never a low-scored match.
pub fn best_match(
    commodity_text: &str,
    vocabulary: &CommodityVocabulary,
    threshold: u8,
) -> Option<CommodityMatch> {
    if commodity_text.trim().is_empty() || vocabulary.is_empty() {
        return None;
    }

    let best = vocabulary
        .entries()
        .iter()
        .map(|entry| (entry, weighted_ratio(commodity_text, entry)))
        .max_by_key(|(_, score)| *score)?;

    let (entry, score) = best;
    if score < threshold {
        tracing::debug!(
            mention = commodity_text,
            nearest = entry.as_str(),
            score,
            threshold,
            "Commodity match below threshold, leaving unresolved"
        );
        return None;
    }

    Some(CommodityMatch {
        canonical_name: entry.clone(),
        score,
    })
}
