use crate::search::config::MAX_FUZZY_DISTANCE;

const CLASS_FUZZY_BASE: u32 = 20;
const MEMBER_FUZZY_BASE: u32 = 15;
const FUZZY_STEP: u32 = 5;

/// Classic Levenshtein distance (insert, delete and substitute all cost 1),
/// counted in `char`s.
pub fn levenshtein(a: &str, b: &str) -> usize {
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
            let cost = usize::from(ca != cb);
            let insert = curr[j] + 1;
            let delete = prev[j + 1] + 1;
            let replace = prev[j] + cost;
            curr[j + 1] = insert.min(delete).min(replace);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Distance between a lower-cased candidate and query when it is close
/// enough to count as a fuzzy match.
///
/// Admitted only if `distance <= 2` and `distance < query length`, so one
/// character queries never match fuzzily.
pub fn fuzzy_distance(candidate: &str, query: &str) -> Option<usize> {
    let query_len = query.chars().count();
    let candidate_len = candidate.chars().count();

    // The length gap is a lower bound on the distance
    if candidate_len.abs_diff(query_len) > MAX_FUZZY_DISTANCE {
        return None;
    }

    let distance = levenshtein(candidate, query);
    (distance <= MAX_FUZZY_DISTANCE && distance < query_len).then_some(distance)
}

/// Fuzzy class score: 20, 15 or 10
pub fn class_fuzzy_score(distance: usize) -> u32 {
    band(CLASS_FUZZY_BASE, distance)
}

/// Fuzzy member score: 15, 10 or 5
pub fn member_fuzzy_score(distance: usize) -> u32 {
    band(MEMBER_FUZZY_BASE, distance)
}

fn band(base: u32, distance: usize) -> u32 {
    let penalty = u32::try_from(distance)
        .unwrap_or(u32::MAX)
        .saturating_mul(FUZZY_STEP);
    base.saturating_sub(penalty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("Pawn", "Pwn"), 1);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("abc", "abc"), 0);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
    }

    #[test]
    fn test_fuzzy_admission() {
        assert_eq!(fuzzy_distance("pawn", "pwn"), Some(1));
        assert_eq!(fuzzy_distance("pawn", "pan"), Some(1));
        assert_eq!(fuzzy_distance("pawn", "pxyn"), Some(2));
        assert_eq!(fuzzy_distance("pawn", "xyz"), None);
        assert_eq!(fuzzy_distance("pawncontroller", "pawn"), None);
    }

    #[test]
    fn test_single_char_query_never_fuzzy() {
        for candidate in ["b", "ab", "ba", "x", "aaa"] {
            assert_eq!(fuzzy_distance(candidate, "a"), None, "candidate {candidate}");
        }
    }

    #[test]
    fn test_bands_stay_below_exact() {
        assert_eq!(class_fuzzy_score(0), 20);
        assert_eq!(class_fuzzy_score(1), 15);
        assert_eq!(class_fuzzy_score(2), 10);
        assert_eq!(member_fuzzy_score(1), 10);
        assert_eq!(member_fuzzy_score(2), 5);
        assert!(class_fuzzy_score(0) < crate::search::scorer::SCORE_OFFSET_SUBSTRING);
    }
}
