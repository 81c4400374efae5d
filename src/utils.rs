//! Small shared helpers.

use strsim::levenshtein;

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Up to three candidates close to `target`, closest first.
pub fn find_similar(target: &str, available: &[String]) -> Vec<String> {
    let mut scored: Vec<_> =
        available.iter().map(|candidate| (candidate.clone(), levenshtein(target, candidate))).collect();

    scored.sort_by(|(a_name, a_dist), (b_name, b_dist)| a_dist.cmp(b_dist).then(a_name.cmp(b_name)));

    scored
        .into_iter()
        .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
        .take(3)
        .map(|(name, _)| name)
        .collect()
}
