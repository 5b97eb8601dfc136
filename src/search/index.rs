use std::ops::Range;
use std::time::Instant;

use crate::sdk::SdkDataset;

/// A class name with its lower-cased form, plus the slice of the member
/// index holding its named members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    name: String,
    lower_name: String,
    members: Range<usize>,
}

impl ClassEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lower_name(&self) -> &str {
        &self.lower_name
    }
}

/// A named member flattened out of its owning class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberEntry {
    class_name: String,
    name: String,
    lower_name: String,
    type_name: String,
    lower_type_name: String,
    offset: String,
    lower_offset: String,
}

impl MemberEntry {
    pub fn new(
        class_name: impl Into<String>,
        name: impl Into<String>,
        type_name: impl Into<String>,
        offset: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let type_name = type_name.into();
        let offset = offset.into();
        Self {
            class_name: class_name.into(),
            lower_name: name.to_lowercase(),
            lower_type_name: type_name.to_lowercase(),
            lower_offset: offset.to_lowercase(),
            name,
            type_name,
            offset,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lower_name(&self) -> &str {
        &self.lower_name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn lower_type_name(&self) -> &str {
        &self.lower_type_name
    }

    pub fn offset(&self) -> &str {
        &self.offset
    }

    pub fn lower_offset(&self) -> &str {
        &self.lower_offset
    }
}

/// Flat class and member lists built for linear scanning.
///
/// An index is never edited after [`SearchIndex::build`]; a dataset change
/// builds a new one which replaces the old value wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchIndex {
    classes: Vec<ClassEntry>,
    members: Vec<MemberEntry>,
}

impl SearchIndex {
    /// Build the index in a single pass over the dataset.
    ///
    /// Every class is recorded, including classes with no members. Members
    /// without a name are skipped.
    pub fn build(dataset: &SdkDataset) -> Self {
        let start = Instant::now();

        let mut classes = Vec::with_capacity(dataset.len());
        let mut members = Vec::with_capacity(dataset.member_count());

        for class in dataset.classes() {
            let first = members.len();
            for member in class.members.iter().filter(|m| !m.name.is_empty()) {
                members.push(MemberEntry::new(
                    class.name.as_str(),
                    member.name.as_str(),
                    member.type_name.as_str(),
                    member.offset.as_str(),
                ));
            }
            classes.push(ClassEntry {
                lower_name: class.name.to_lowercase(),
                name: class.name.clone(),
                members: first..members.len(),
            });
        }

        tracing::debug!(
            "Search index built in {:.2}ms: {} classes, {} members",
            start.elapsed().as_secs_f64() * 1000.0,
            classes.len(),
            members.len()
        );

        Self { classes, members }
    }

    pub fn classes(&self) -> &[ClassEntry] {
        &self.classes
    }

    pub fn members(&self) -> &[MemberEntry] {
        &self.members
    }

    /// Named members belonging to `class`, in declaration order
    pub fn members_of(&self, class: &ClassEntry) -> &[MemberEntry] {
        &self.members[class.members.clone()]
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::{ClassRecord, MemberRecord};

    #[test]
    fn test_build_skips_unnamed_members() {
        let dataset: SdkDataset = [
            ClassRecord::new("Pawn")
                .with_member(MemberRecord::new("Health", "Int32", "0X40", "4"))
                .with_member(MemberRecord::new("", "int", "0x44", "4")),
            ClassRecord::new("Empty"),
            ClassRecord::new("Vector").with_member(MemberRecord::new("X", "float", "", "")),
        ]
        .into_iter()
        .collect();

        let index = SearchIndex::build(&dataset);

        let names: Vec<_> = index.classes().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Pawn", "Empty", "Vector"]);
        assert_eq!(index.members().len(), 2);

        let health = &index.members()[0];
        assert_eq!(health.class_name(), "Pawn");
        assert_eq!(health.lower_name(), "health");
        assert_eq!(health.lower_type_name(), "int32");
        assert_eq!(health.offset(), "0X40");
        assert_eq!(health.lower_offset(), "0x40");

        assert!(index.members_of(&index.classes()[1]).is_empty());
        let vector_members = index.members_of(&index.classes()[2]);
        assert_eq!(vector_members.len(), 1);
        assert_eq!(vector_members[0].offset(), "");
    }

    #[test]
    fn test_empty_dataset() {
        let index = SearchIndex::build(&SdkDataset::new());
        assert!(index.is_empty());
        assert!(index.members().is_empty());
    }
}
