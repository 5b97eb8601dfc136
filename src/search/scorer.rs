//! Relevance scoring for a single candidate against a query.
//!
//! Scores are banded so that a merged list can be ordered by score alone:
//!
//! | band | meaning |
//! |------|---------|
//! | 100 | exact text match |
//! | 90 | exact offset match (ignoring `0x`) |
//! | 80 | text prefix match |
//! | 50 | text substring match |
//! | 40 | offset substring match |
//! | 10-20 | fuzzy class match |
//! | 5-15 | fuzzy member match |

use serde::{Deserialize, Serialize};

use crate::search::index::MemberEntry;

pub const SCORE_EXACT: u32 = 100;
pub const SCORE_OFFSET_EXACT: u32 = 90;
pub const SCORE_PREFIX: u32 = 80;
pub const SCORE_SUBSTRING: u32 = 50;
pub const SCORE_OFFSET_SUBSTRING: u32 = 40;

/// Which member field produced a member's score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedField {
    Name,
    Type,
    Offset,
}

/// Score lower-cased text against a lower-cased, non-empty query.
pub fn score_text(candidate: &str, query: &str) -> u32 {
    if query.is_empty() {
        0
    } else if candidate == query {
        SCORE_EXACT
    } else if candidate.starts_with(query) {
        SCORE_PREFIX
    } else if candidate.contains(query) {
        SCORE_SUBSTRING
    } else {
        0
    }
}

/// Drop one leading `0x` / `0X`
pub fn strip_hex_prefix(text: &str) -> &str {
    text.strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text)
}

/// Score a hexadecimal offset. The `0x` prefix is optional on both sides.
pub fn score_offset(offset: &str, query: &str) -> u32 {
    if offset.is_empty() || query.is_empty() {
        return 0;
    }

    let offset = strip_hex_prefix(offset).to_ascii_lowercase();
    let query = strip_hex_prefix(query).to_ascii_lowercase();

    if offset == query {
        SCORE_OFFSET_EXACT
    } else if offset.contains(&query) {
        SCORE_OFFSET_SUBSTRING
    } else {
        0
    }
}

/// Score a member in name mode (name or offset) or type mode (type only).
///
/// In name mode the higher of the two scores wins; on a tie the name is
/// reported since name search is the declared mode.
pub fn score_member(
    member: &MemberEntry,
    query: &str,
    type_mode: bool,
) -> Option<(u32, MatchedField)> {
    let (score, field) = if type_mode {
        (score_text(member.lower_type_name(), query), MatchedField::Type)
    } else {
        let name_score = score_text(member.lower_name(), query);
        let offset_score = score_offset(member.lower_offset(), query);
        if offset_score > name_score {
            (offset_score, MatchedField::Offset)
        } else {
            (name_score, MatchedField::Name)
        }
    };

    (score > 0).then_some((score, field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_bands() {
        assert_eq!(score_text("health", "health"), 100);
        assert_eq!(score_text("healthmax", "health"), 80);
        assert_eq!(score_text("maxhealth", "health"), 50);
        assert_eq!(score_text("armor", "health"), 0);
        assert_eq!(score_text("health", ""), 0);
    }

    #[test]
    fn test_offset_prefix_agnostic() {
        assert_eq!(score_offset("0x1a2b", "1a2b"), 90);
        assert_eq!(score_offset("1a2b", "0x1a2b"), 90);
        assert_eq!(score_offset("0X1A2B", "0x1a2b"), 90);
        assert_eq!(score_offset("0x1a2b", "a2"), 40);
        assert_eq!(score_offset("0x1a2b", "ff"), 0);
        assert_eq!(score_offset("", "40"), 0);
    }

    #[test]
    fn test_member_best_field() {
        // "40" scores 100 on the name and 90 on the offset
        let member = MemberEntry::new("Pawn", "40", "int", "0x40");
        assert_eq!(score_member(&member, "40", false), Some((100, MatchedField::Name)));

        // Substring on both sides: 50 on the name beats 40 on the offset
        let member = MemberEntry::new("Pawn", "a40b", "int", "0x140");
        assert_eq!(score_member(&member, "40", false), Some((50, MatchedField::Name)));

        let member = MemberEntry::new("Pawn", "Health", "int", "0x40");
        assert_eq!(score_member(&member, "0x40", false), Some((90, MatchedField::Offset)));
    }

    #[test]
    fn test_member_type_mode_ignores_offset() {
        let member = MemberEntry::new("Pawn", "Health", "int32_t", "0x40");
        assert_eq!(score_member(&member, "int", true), Some((80, MatchedField::Type)));
        assert_eq!(score_member(&member, "40", true), None);
        assert_eq!(score_member(&member, "health", true), None);
    }
}
