use std::collections::HashSet;

/// Ordered sub-sequence of `candidates` absent from `known`.
///
/// Remote order is preserved, and duplicates inside the candidate list
/// itself are collapsed to their first occurrence. Pure computation, no I/O.
pub fn unseen_candidates(candidates: &[String], known: &HashSet<String>) -> Vec<String> {
    let mut emitted: HashSet<&str> = HashSet::new();
    let mut unseen = Vec::new();

    for candidate in candidates {
        if known.contains(candidate) || !emitted.insert(candidate.as_str()) {
            continue;
        }
        unseen.push(candidate.clone());
    }

    unseen
}
