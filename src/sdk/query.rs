use serde::{Deserialize, Serialize};

use crate::sdk::types::{ClassRecord, SdkDataset};

/// Primitive type names that never resolve to a class in the dump
const BASIC_TYPES: &[&str] = &[
    "bool", "float", "int", "hex", "char", "double", "void", "struct", "class", "enum", "string",
    "vector", "array", "map", "set", "list", "pair", "tuple", "uint8_t", "uint16_t", "uint32_t",
    "uint64_t", "int8_t", "int16_t", "int32_t", "int64_t", "size_t", "ptrdiff_t",
];

/// Root of every inheritance chain in the dump
const ROOT_CLASS: &str = "UObject";

pub fn is_basic_type(type_name: &str) -> bool {
    let lower = type_name.to_lowercase();
    BASIC_TYPES.contains(&lower.as_str())
}

/// One row of a class's member layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRow {
    pub name: String,
    pub type_name: String,
    pub offset: String,
    pub size: String,
    /// Basic types are not navigable
    pub is_basic_type: bool,
}

/// Display view of a class: header stats plus member layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDetails {
    pub name: String,
    pub type_tag: String,
    pub parent: String,
    pub inheritance: String,
    pub size: u64,
    pub size_hex: String,
    pub member_count: usize,
    pub is_globals: bool,
    pub members: Vec<MemberRow>,
}

impl ClassDetails {
    pub fn from_record(class: &ClassRecord) -> Self {
        let inheritance = if class.parent.is_empty() {
            ROOT_CLASS.to_string()
        } else {
            format!("{} > {}", class.parent, ROOT_CLASS)
        };
        let type_tag = if class.type_tag.is_empty() {
            "class".to_string()
        } else {
            class.type_tag.clone()
        };

        Self {
            name: class.name.clone(),
            type_tag,
            parent: class.parent.clone(),
            inheritance,
            size: class.size,
            size_hex: format!("0x{:X}", class.size),
            member_count: class.members.len(),
            is_globals: class.is_globals(),
            members: class
                .members
                .iter()
                .map(|m| MemberRow {
                    name: m.name.clone(),
                    type_name: m.type_name.clone(),
                    offset: m.offset.clone(),
                    size: m.size.clone(),
                    is_basic_type: !m.type_name.is_empty() && is_basic_type(&m.type_name),
                })
                .collect(),
        }
    }

    /// Find the row to reveal after navigating to a member: the first row
    /// whose name or offset equals the member's.
    pub fn locate_member(&self, name: &str, offset: &str) -> Option<usize> {
        self.members
            .iter()
            .position(|row| {
                (!name.is_empty() && row.name == name) || (!offset.is_empty() && row.offset == offset)
            })
    }

    /// Filter rows whose type, name, offset or size contains `query`
    /// (case-insensitive). An empty query keeps every row.
    pub fn filter_members(&self, query: &str) -> Vec<&MemberRow> {
        let query = query.to_lowercase();
        if query.is_empty() {
            return self.members.iter().collect();
        }

        self.members
            .iter()
            .filter(|row| {
                [&row.type_name, &row.name, &row.offset, &row.size]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&query))
            })
            .collect()
    }
}

/// Where clicking a member's type should take the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", content = "name", rename_all = "snake_case")]
pub enum TypeTarget {
    /// Primitive type, nothing to open
    Basic,
    /// The type is a class in the dump
    Class(String),
    /// Unknown type: run a quick search for the cleaned name instead
    Search(String),
}

/// Strip pointer and template punctuation from a type name
pub fn clean_type_name(type_name: &str) -> String {
    type_name
        .chars()
        .filter(|c| !matches!(c, '*' | '<' | '>'))
        .collect::<String>()
        .trim()
        .to_string()
}

pub fn resolve_type(dataset: &SdkDataset, type_name: &str) -> TypeTarget {
    let cleaned = clean_type_name(type_name);
    if is_basic_type(&cleaned) {
        TypeTarget::Basic
    } else if dataset.contains(&cleaned) {
        TypeTarget::Class(cleaned)
    } else {
        TypeTarget::Search(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::types::{GLOBALS_TYPE_TAG, MemberRecord};

    fn pawn() -> ClassRecord {
        ClassRecord::new("Pawn")
            .with_parent("Actor")
            .with_size(0x2A8)
            .with_member(MemberRecord::new("Health", "int", "0x40", "4"))
            .with_member(MemberRecord::new("Controller", "AController*", "0x48", "8"))
            .with_member(MemberRecord::new("Armor", "Float", "0x50", "4"))
    }

    #[test]
    fn test_details_header() {
        let details = ClassDetails::from_record(&pawn());
        assert_eq!(details.inheritance, "Actor > UObject");
        assert_eq!(details.size_hex, "0x2A8");
        assert_eq!(details.type_tag, "class");
        assert_eq!(details.member_count, 3);
        assert!(!details.is_globals);
        assert!(details.members[0].is_basic_type);
        assert!(!details.members[1].is_basic_type);
        assert!(details.members[2].is_basic_type);

        let root = ClassDetails::from_record(&ClassRecord::new("Object"));
        assert_eq!(root.inheritance, "UObject");
        assert_eq!(root.size_hex, "0x0");

        let globals = ClassRecord::new("Offsets and Globals").with_type_tag(GLOBALS_TYPE_TAG);
        assert!(ClassDetails::from_record(&globals).is_globals);
    }

    #[test]
    fn test_locate_member() {
        let details = ClassDetails::from_record(&pawn());
        assert_eq!(details.locate_member("Controller", "0x48"), Some(1));
        assert_eq!(details.locate_member("Renamed", "0x50"), Some(2));
        assert_eq!(details.locate_member("Missing", ""), None);
    }

    #[test]
    fn test_locate_member_by_offset_skips_unnamed_rows() {
        let class = ClassRecord::new("Pawn")
            .with_member(MemberRecord::default())
            .with_member(MemberRecord::new("Health", "int", "0x48", "4"));
        let details = ClassDetails::from_record(&class);

        assert_eq!(details.locate_member("", "0x48"), Some(1));
        assert_eq!(details.locate_member("", ""), None);
    }

    #[test]
    fn test_filter_members() {
        let details = ClassDetails::from_record(&pawn());
        assert_eq!(details.filter_members("").len(), 3);

        let hits: Vec<_> = details
            .filter_members("acontroller")
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(hits, vec!["Controller"]);

        // Offsets 0x40 and 0x48, but not 0x50
        assert_eq!(details.filter_members("0x4").len(), 2);
    }

    #[test]
    fn test_resolve_type() {
        let dataset: SdkDataset = [pawn(), ClassRecord::new("AController")].into_iter().collect();

        assert_eq!(resolve_type(&dataset, "int32_t"), TypeTarget::Basic);
        assert_eq!(
            resolve_type(&dataset, "AController*"),
            TypeTarget::Class("AController".to_string())
        );
        assert_eq!(
            resolve_type(&dataset, "TArray<FName>"),
            TypeTarget::Search("TArrayFName".to_string())
        );
    }
}
