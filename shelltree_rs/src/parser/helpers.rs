//! Helper functions for command parsing.

use strsim::levenshtein;

/// Suggest a similar command using Levenshtein distance.
/// Comparison ignores case; the suggestion keeps the registered spelling.
/// Returns Some(suggestion) if a close match is found (distance <= 2).
pub(crate) fn suggest_similar_command<'a, I>(input: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let input_lower = input.to_lowercase();
    let mut best_match: Option<(&str, usize)> = None;

    for cmd in candidates {
        let distance = levenshtein(&input_lower, &cmd.to_lowercase());
        // Only suggest if distance is small (max 2 for reasonable similarity)
        if distance <= 2 && best_match.is_none_or(|(_, best_dist)| distance < best_dist) {
            best_match = Some((cmd, distance));
        }
    }

    best_match.map(|(cmd, _)| cmd)
}
