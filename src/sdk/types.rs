use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Type tag used for the virtual class that holds global offsets
pub const GLOBALS_TYPE_TAG: &str = "Globals";

/// A single field of a dumped class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub name: String,
    pub type_name: String,
    /// Hexadecimal offset, usually `0x` prefixed
    pub offset: String,
    /// Size as emitted by the dumper, kept as display text
    pub size: String,
}

impl MemberRecord {
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        offset: impl Into<String>,
        size: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            offset: offset.into(),
            size: size.into(),
        }
    }
}

/// A named record type in the dump (class, struct or enum)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub name: String,
    pub parent: String,
    pub size: u64,
    /// `class`, `struct`, `enum`, or `Globals` for the virtual globals class
    pub type_tag: String,
    pub members: Vec<MemberRecord>,
}

impl ClassRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = parent.into();
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn with_type_tag(mut self, type_tag: impl Into<String>) -> Self {
        self.type_tag = type_tag.into();
        self
    }

    pub fn with_member(mut self, member: MemberRecord) -> Self {
        self.members.push(member);
        self
    }

    pub fn is_globals(&self) -> bool {
        self.type_tag == GLOBALS_TYPE_TAG
    }
}

/// The full dump: class name to class record, in load order.
///
/// Names are unique. Inserting an existing name replaces the record but keeps
/// its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SdkDataset {
    classes: IndexMap<String, ClassRecord>,
}

impl SdkDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, class: ClassRecord) {
        self.classes.insert(class.name.clone(), class);
    }

    pub fn get(&self, name: &str) -> Option<&ClassRecord> {
        self.classes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn member_count(&self) -> usize {
        self.classes.values().map(|c| c.members.len()).sum()
    }

    /// Classes in load order
    pub fn classes(&self) -> impl Iterator<Item = &ClassRecord> {
        self.classes.values()
    }

    /// The first class in load order, used as the initial selection
    pub fn first(&self) -> Option<&ClassRecord> {
        self.classes.first().map(|(_, class)| class)
    }
}

impl FromIterator<ClassRecord> for SdkDataset {
    fn from_iter<T: IntoIterator<Item = ClassRecord>>(iter: T) -> Self {
        let mut dataset = SdkDataset::new();
        for class in iter {
            dataset.insert(class);
        }
        dataset
    }
}
