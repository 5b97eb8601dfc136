//! Converting C++ SDK dumps into the JSON layout [`parse_sdk_json`] reads.
//!
//! Two inputs are understood:
//!
//! - Dumper-7 headers: a directory tree of `.h` files (or a single one) with
//!   `class`/`struct` blocks whose members carry `// 0xOFFSET(0xSIZE)`
//!   comments.
//! - Offset headers: a single `.hpp` file where each member is a
//!   `static const uint32_t Name = 0xOFFSET; // (0xSIZE)` constant and the
//!   member type has to be inferred from its name and size.
//!
//! [`parse_sdk_json`]: crate::sdk::loader::parse_sdk_json

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use walkdir::WalkDir;

use crate::sdk::types::{ClassRecord, MemberRecord};

/// File name the converted dump is written under
pub const SDK_DATA_FILE: &str = "sdk_data.json";

/// File name the globals template is written under
pub const GLOBALS_FILE: &str = "globals.json";

/// Base addresses every generated globals file starts with
pub const GLOBALS_TEMPLATE_BASES: [&str; 3] = ["GWorld", "GNames", "GObjects"];

/// Class names containing any of these are parameter/graph helpers, not types
const INVALID_CLASS_MARKERS: [&str; 6] = ["<", ">", "Param_", "Parms", "EventGraph", "__"];

/// Member names containing any of these are padding
const SKIPPED_MEMBER_MARKERS: [&str; 8] = [
    "Pad_",
    "pad_",
    "UnknownData",
    "UberGraphFrame",
    "__padding",
    "Padding",
    "Reserved",
    "bPad_",
];

static DUMPER7_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)\b(class|struct)\s+([A-Z][A-Za-z0-9_]*)(?:\s+final)?(?:\s*:\s*public\s+([A-Za-z0-9_:<>]+))?\s*\{(.*?)\};",
    )
    .expect("Dumper-7 block pattern is hardcoded and must be valid")
});

static DUMPER7_MEMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([A-Za-z0-9_:<>,\s\*\[\]&]+)\s+([A-Za-z0-9_]+);\s*//\s*(?:Offset:\s*)?0x([0-9A-Fa-f]+)(?:\s*\(0x([0-9A-Fa-f]+)\)|,\s*Size:\s*0x([0-9A-Fa-f]+))?",
    )
    .expect("Dumper-7 member pattern is hardcoded and must be valid")
});

static SIZE_ASSERT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"sizeof\s*\(\s*([A-Za-z0-9_]+)\s*\)\s*==\s*0x([0-9A-Fa-f]+)")
        .expect("size assertion pattern is hardcoded and must be valid")
});

static TYPE_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:class|struct|enum)\s+").expect("type keyword pattern must be valid")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern must be valid"));

static PRIMITIVE_SPELLINGS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        ("unsigned char", "uint8"),
        ("unsigned short", "uint16"),
        ("unsigned int", "uint32"),
        ("unsigned long long", "uint64"),
        ("signed char", "int8"),
        ("short", "int16"),
        ("long long", "int64"),
    ]
    .into_iter()
    .map(|(from, to)| {
        let pattern = format!(r"\b{}\b", regex::escape(from));
        (Regex::new(&pattern).expect("primitive spelling pattern must be valid"), to)
    })
    .collect()
});

static HPP_TYPE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(class|struct)\s+(\w+)(?:\s*:\s*public\s+(\w+))?\s*\{")
        .expect("offset header type pattern is hardcoded and must be valid")
});

static HPP_MEMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s+static\s+const\s+uint32_t\s+(\w+)\s+=\s+(0x[0-9a-fA-F]+);\s*//\s*\((0x[0-9a-fA-F]+)\)",
    )
    .expect("offset header member pattern is hardcoded and must be valid")
});

/// Input layout for [`convert_path`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ConvertFormat {
    /// Dumper-7 `.h` headers
    #[value(name = "dumper7")]
    Dumper7,
    /// A single `.hpp` of `static const` member offsets
    #[value(name = "hpp")]
    OffsetsHpp,
}

impl ConvertFormat {
    /// `.hpp` files are offset headers; directories and anything else are
    /// read as Dumper-7 headers.
    pub fn detect(path: &Path) -> Self {
        let is_hpp = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("hpp"));
        if path.is_file() && is_hpp {
            ConvertFormat::OffsetsHpp
        } else {
            ConvertFormat::Dumper7
        }
    }
}

/// Convert the dump at `path`. A directory is walked recursively for `.h`
/// files; unreadable files are logged and skipped.
pub fn convert_path(path: &Path, format: ConvertFormat) -> Result<Vec<ClassRecord>> {
    if !path.exists() {
        bail!("SDK path not found: {}", path.display());
    }

    match format {
        ConvertFormat::OffsetsHpp => {
            if !path.is_file() {
                bail!("Offset headers are single files: {}", path.display());
            }
            let content = read_lossy(path)?;
            let classes = parse_offsets_hpp(&content);
            tracing::info!("Found {} types in {}", classes.len(), path.display());
            Ok(classes)
        }
        ConvertFormat::Dumper7 if path.is_file() => Ok(parse_dumper7_header(&read_lossy(path)?)),
        ConvertFormat::Dumper7 => convert_dumper7_dir(path),
    }
}

fn convert_dumper7_dir(dir: &Path) -> Result<Vec<ClassRecord>> {
    let headers: Vec<_> = WalkDir::new(dir)
        .sort_by_file_name()
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "h"))
        .map(|entry| entry.into_path())
        .collect();

    if headers.is_empty() {
        bail!("No .h files found in {}", dir.display());
    }
    tracing::info!("Found {} .h files in {}", headers.len(), dir.display());

    let mut classes = Vec::new();
    for (processed, header) in headers.iter().enumerate() {
        match read_lossy(header) {
            Ok(content) => classes.extend(parse_dumper7_header(&content)),
            Err(e) => tracing::warn!("Skipping {}: {:#}", header.display(), e),
        }
        if (processed + 1) % 1000 == 0 {
            tracing::info!("Processed {} files, {} classes so far", processed + 1, classes.len());
        }
    }

    tracing::info!(
        "Converted {} classes with {} members",
        classes.len(),
        classes.iter().map(|c| c.members.len()).sum::<usize>()
    );
    Ok(classes)
}

fn read_lossy(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn parse_hex(text: &str) -> Option<u64> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u64::from_str_radix(digits, 16).ok()
}

/// Parse every class and struct block in one Dumper-7 header
pub fn parse_dumper7_header(content: &str) -> Vec<ClassRecord> {
    let declared_sizes: HashMap<&str, u64> = SIZE_ASSERT
        .captures_iter(content)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            let size = u64::from_str_radix(caps.get(2)?.as_str(), 16).ok()?;
            Some((name, size))
        })
        .collect();

    DUMPER7_BLOCK
        .captures_iter(content)
        .filter_map(|caps| {
            let name = caps.get(2)?.as_str();
            if !is_valid_class_name(name) {
                return None;
            }

            let members = parse_dumper7_members(caps.get(4).map_or("", |m| m.as_str()));
            let size = declared_sizes
                .get(name)
                .copied()
                .unwrap_or_else(|| members_extent(&members));

            Some(ClassRecord {
                name: name.to_string(),
                parent: clean_parent_name(caps.get(3).map_or("", |m| m.as_str())),
                size,
                type_tag: caps.get(1).map_or("class", |m| m.as_str()).to_string(),
                members,
            })
        })
        .collect()
}

fn parse_dumper7_members(body: &str) -> Vec<MemberRecord> {
    let mut members: Vec<(u64, MemberRecord)> = body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("//"))
        .filter_map(|line| {
            let caps = DUMPER7_MEMBER.captures(line)?;
            let name = caps.get(2)?.as_str();
            if should_skip_member(name) {
                return None;
            }

            let type_name = clean_type_name(caps.get(1)?.as_str());
            let offset = caps.get(3)?.as_str();
            let size = match caps.get(4).or_else(|| caps.get(5)) {
                Some(size) => format!("0x{}", size.as_str().to_ascii_uppercase()),
                None => format!("0x{:02X}", guess_type_size(&type_name)),
            };

            Some((
                u64::from_str_radix(offset, 16).ok()?,
                MemberRecord::new(
                    name,
                    type_name,
                    format!("0x{}", offset.to_ascii_uppercase()),
                    size,
                ),
            ))
        })
        .collect();

    members.sort_by_key(|(offset, _)| *offset);
    members.into_iter().map(|(_, member)| member).collect()
}

/// End of the member reaching furthest into the class
fn members_extent(members: &[MemberRecord]) -> u64 {
    members
        .iter()
        .filter_map(|m| Some(parse_hex(&m.offset)? + parse_hex(&m.size)?))
        .max()
        .unwrap_or(0)
}

pub fn is_valid_class_name(name: &str) -> bool {
    name.len() >= 2 && !INVALID_CLASS_MARKERS.iter().any(|marker| name.contains(marker))
}

pub fn should_skip_member(name: &str) -> bool {
    SKIPPED_MEMBER_MARKERS.iter().any(|marker| name.contains(marker))
}

/// Drop `SDK::` qualification and template arguments from a parent name
pub fn clean_parent_name(parent: &str) -> String {
    let parent = parent.replace("SDK::", "").replace("::", "");
    parent.split('<').next().unwrap_or_default().trim().to_string()
}

/// Normalize a C++ type: collapse whitespace, drop elaborated `class`/
/// `struct`/`enum` keywords and spell primitives the Unreal way.
pub fn clean_type_name(type_name: &str) -> String {
    let collapsed = WHITESPACE.replace_all(type_name.trim(), " ");
    let mut cleaned = TYPE_KEYWORD.replace_all(&collapsed, "").into_owned();
    for (pattern, replacement) in PRIMITIVE_SPELLINGS.iter() {
        cleaned = pattern.replace_all(&cleaned, *replacement).into_owned();
    }
    cleaned.trim().to_string()
}

/// Size in bytes for a member whose dump line carries no size
pub fn guess_type_size(type_name: &str) -> u64 {
    if type_name.contains('*') {
        return 8;
    }
    if type_name.contains('[') {
        return 4;
    }

    let lower = type_name.trim().to_ascii_lowercase();
    match lower.strip_suffix("_t").unwrap_or(&lower) {
        "bool" | "char" | "uint8" | "int8" => 1,
        "uint16" | "int16" | "short" => 2,
        "uint32" | "int32" | "int" | "float" => 4,
        "uint64" | "int64" | "double" | "long long" => 8,
        _ => 4,
    }
}

struct OpenType {
    name: String,
    parent: String,
    type_tag: String,
    members: Vec<MemberRecord>,
    depth: i64,
}

/// Parse a single offsets header. Types without members are dropped.
pub fn parse_offsets_hpp(content: &str) -> Vec<ClassRecord> {
    let mut classes = Vec::new();
    let mut open: Option<OpenType> = None;

    for line in content.lines() {
        let stripped = line.trim();
        if stripped.is_empty() || stripped.starts_with("//") {
            continue;
        }

        let current = match open.as_mut() {
            Some(current) => current,
            None => {
                if let Some(caps) = HPP_TYPE_HEADER.captures(stripped) {
                    open = Some(OpenType {
                        name: caps[2].to_string(),
                        parent: caps.get(3).map_or("", |m| m.as_str()).to_string(),
                        type_tag: caps[1].to_string(),
                        members: Vec::new(),
                        depth: 1,
                    });
                }
                continue;
            }
        };

        current.depth += stripped.matches('{').count() as i64;
        current.depth -= stripped.matches('}').count() as i64;

        if current.depth > 0 {
            if let Some(caps) = HPP_MEMBER.captures(line) {
                let size = parse_hex(&caps[3]).unwrap_or(0);
                current.members.push(MemberRecord::new(
                    &caps[1],
                    infer_member_type(&caps[1], size),
                    &caps[2],
                    &caps[3],
                ));
            }
            continue;
        }

        if let Some(finished) = open.take() {
            if finished.members.is_empty() {
                tracing::debug!("Skipping {} {} (no members)", finished.type_tag, finished.name);
                continue;
            }
            classes.push(ClassRecord {
                size: last_member_end(&finished.members),
                name: finished.name,
                parent: finished.parent,
                type_tag: finished.type_tag,
                members: finished.members,
            });
        }
    }

    classes
}

/// Offset plus size of the member at the highest offset (the last one on ties)
fn last_member_end(members: &[MemberRecord]) -> u64 {
    members
        .iter()
        .filter_map(|m| Some((parse_hex(&m.offset)?, parse_hex(&m.size)?)))
        .fold(None, |last: Option<(u64, u64)>, (offset, size)| match last {
            Some((last_offset, _)) if offset < last_offset => last,
            _ => Some((offset, size)),
        })
        .map_or(0, |(offset, size)| offset + size)
}

/// Best guess at a member type from its name and byte size
pub fn infer_member_type(name: &str, size: u64) -> String {
    let lower = name.to_ascii_lowercase();
    match size {
        0x1 if name.starts_with('b') => "bool".to_string(),
        0x1 => "uint8_t".to_string(),
        0x2 => "uint16_t".to_string(),
        0x4 if lower.contains("float") => "float".to_string(),
        0x4 => "int32_t".to_string(),
        0x8 if ["component", "actor", "object", "class", "ptr"]
            .iter()
            .any(|word| lower.contains(word)) =>
        {
            pointer_type_from_name(name)
        }
        0x8 => "uint64_t".to_string(),
        0x10 if lower.contains("string") || lower.contains("name") => "FString".to_string(),
        0x10 | 0x20 => "TArray<uint8_t>".to_string(),
        _ => format!("uint8_t[{size}]"),
    }
}

fn pointer_type_from_name(name: &str) -> String {
    let words: Vec<&str> = name
        .split('_')
        .filter(|word| word.starts_with(|c: char| c.is_ascii_uppercase()))
        .collect();

    let prefixed = words.iter().find(|word| {
        let mut chars = word.chars();
        matches!(chars.next(), Some('U' | 'A'))
            && chars.next().is_some_and(|c| c.is_ascii_uppercase())
    });
    match (prefixed, words.first()) {
        (Some(word), _) => format!("{word}*"),
        (None, Some(word)) => format!("U{word}*"),
        (None, None) => "UObject*".to_string(),
    }
}

#[derive(Serialize)]
struct DumpMember<'a> {
    #[serde(rename = "N")]
    name: &'a str,
    #[serde(rename = "T")]
    type_name: &'a str,
    #[serde(rename = "O")]
    offset: &'a str,
    #[serde(rename = "S")]
    size: &'a str,
}

#[derive(Serialize)]
struct DumpClass<'a> {
    #[serde(rename = "N")]
    name: &'a str,
    #[serde(rename = "P")]
    parent: &'a str,
    #[serde(rename = "S")]
    size: u64,
    #[serde(rename = "T")]
    type_tag: &'a str,
    #[serde(rename = "M")]
    members: Vec<DumpMember<'a>>,
}

/// Serialize classes in the compact dump layout (`N`/`P`/`S`/`T`/`M`)
pub fn to_sdk_json(classes: &[ClassRecord]) -> Result<String> {
    let dump: Vec<DumpClass<'_>> = classes
        .iter()
        .map(|class| DumpClass {
            name: &class.name,
            parent: &class.parent,
            size: class.size,
            type_tag: &class.type_tag,
            members: class
                .members
                .iter()
                .map(|m| DumpMember {
                    name: &m.name,
                    type_name: &m.type_name,
                    offset: &m.offset,
                    size: &m.size,
                })
                .collect(),
        })
        .collect();
    serde_json::to_string_pretty(&dump).context("Failed to serialize SDK data")
}

/// A globals document with placeholder bases, merged into `existing` when
/// given. Existing values are never overwritten.
pub fn globals_template(existing: Option<&str>) -> Result<String> {
    let mut document = match existing {
        Some(text) => serde_json::from_str::<serde_json::Value>(text)
            .context("Existing globals file is not valid JSON")?,
        None => serde_json::json!({}),
    };
    let Some(root) = document.as_object_mut() else {
        bail!("Existing globals file is not a JSON object");
    };

    let bases = root
        .entry("bases")
        .or_insert_with(|| serde_json::json!({}));
    let Some(bases) = bases.as_object_mut() else {
        bail!("`bases` in the globals file is not an object");
    };
    for name in GLOBALS_TEMPLATE_BASES {
        bases
            .entry(name)
            .or_insert_with(|| serde_json::Value::from("0x0"));
    }
    root.entry("offsets")
        .or_insert_with(|| serde_json::json!({}));

    serde_json::to_string_pretty(&document).context("Failed to serialize globals")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::loader::{parse_globals_json, parse_sdk_json};
    use tempfile::TempDir;

    const WORLD_HEADER: &str = r#"
// Class Engine.World
// 0x08D0 (0x08F8 - 0x0028)
class UWorld final : public UObject
{
public:
	uint8                                         Pad_28[0x8];                                       // 0x0028(0x0008)(Fixing Size After Last Property [ Dumper-7 ])
	TArray<class ULevel*>                         Levels;                                            // Offset: 0x0178, Size: 0x0010
	class ULevel*                                 PersistentLevel;                                   // 0x0030(0x0008)(ZeroConstructor, IsPlainOldData)
	float                                         TimeSeconds;                                       // 0x0170
	class AGameStateBase*                         GameState;                                         // 0x0160(0x0008)
	uint8                                         Pad_UberGraph;                                     // 0x0188(0x0010)

public:
	static class UClass* StaticClass()
	{
		return StaticClassImpl<"World">();
	}
};
static_assert(sizeof(UWorld) == 0x0008F8, "Wrong size on UWorld");

// ScriptStruct CoreUObject.Vector
struct FVector final
{
public:
	double                                        X;                                                 // 0x0000(0x0008)
	double                                        Y;                                                 // 0x0008(0x0008)
	double                                        Z;                                                 // 0x0010(0x0008)
};

struct FItemRow : public SDK::FTableRowBase
{
	int32                                         Tier;                                              // 0x0008(0x0004)
};

class UWorld_Param_Tick final
{
	int32                                         DeltaTime;                                         // 0x0000(0x0004)
};
"#;

    #[test]
    fn test_parse_dumper7_header() {
        let classes = parse_dumper7_header(WORLD_HEADER);
        let names: Vec<_> = classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["UWorld", "FVector", "FItemRow"]);

        let world = &classes[0];
        assert_eq!(world.parent, "UObject");
        assert_eq!(world.type_tag, "class");
        assert_eq!(world.size, 0x8F8);
        assert_eq!(
            world.members,
            vec![
                MemberRecord::new("PersistentLevel", "ULevel*", "0x0030", "0x0008"),
                MemberRecord::new("GameState", "AGameStateBase*", "0x0160", "0x0008"),
                MemberRecord::new("TimeSeconds", "float", "0x0170", "0x04"),
                MemberRecord::new("Levels", "TArray<ULevel*>", "0x0178", "0x0010"),
            ]
        );

        let vector = &classes[1];
        assert_eq!(vector.type_tag, "struct");
        assert_eq!(vector.parent, "");
        // No size assertion: end of the last member
        assert_eq!(vector.size, 0x18);

        assert_eq!(classes[2].parent, "FTableRowBase");
        assert_eq!(classes[2].size, 0xC);
    }

    #[test]
    fn test_empty_block_does_not_swallow_next_class() {
        let header = "struct FEmpty final\n{\n};\n\nstruct FNext final\n{\n\tint32 A; // 0x0000(0x0004)\n};\n";
        let classes = parse_dumper7_header(header);
        assert_eq!(classes.len(), 2);
        assert!(classes[0].members.is_empty());
        assert_eq!(classes[1].members.len(), 1);
    }

    #[test]
    fn test_clean_type_name() {
        assert_eq!(clean_type_name("class   UObject*"), "UObject*");
        assert_eq!(clean_type_name("TMap<class FName, struct FVector>"), "TMap<FName, FVector>");
        assert_eq!(clean_type_name("unsigned long long"), "uint64");
        assert_eq!(clean_type_name("unsigned short"), "uint16");
        assert_eq!(clean_type_name("short"), "int16");
        assert_eq!(clean_type_name("enum class EState"), "EState");
    }

    #[test]
    fn test_guess_type_size() {
        assert_eq!(guess_type_size("UObject*"), 8);
        assert_eq!(guess_type_size("uint64"), 8);
        assert_eq!(guess_type_size("uint8_t"), 1);
        assert_eq!(guess_type_size("bool"), 1);
        assert_eq!(guess_type_size("int16"), 2);
        assert_eq!(guess_type_size("FVector"), 4);
    }

    #[test]
    fn test_names_filters() {
        assert!(is_valid_class_name("UWorld"));
        assert!(!is_valid_class_name("U"));
        assert!(!is_valid_class_name("Actor_Parms"));
        assert!(!is_valid_class_name("ExecuteUbergraph__Foo"));
        assert!(should_skip_member("Pad_1A0"));
        assert!(should_skip_member("UberGraphFrame"));
        assert!(!should_skip_member("Health"));
        assert_eq!(clean_parent_name("SDK::UObject"), "UObject");
        assert_eq!(clean_parent_name("TBase<Foo>"), "TBase");
    }

    const OFFSETS_HPP: &str = r#"
namespace Offsets
{
    class UWorld : public UObject {
        static const uint32_t RootComponent = 0x1B0; // (0x8)
        static const uint32_t bIsTearingDown = 0x10B; // (0x1)
        static const uint32_t TimeSeconds_float = 0x170; // (0x4)
        static const uint32_t Levels = 0x178; // (0x20)
    };

    struct FEmpty {
    };

    struct FNameEntry {
        static const uint32_t DisplayName = 0x0; // (0x10)
        static const uint32_t Blob = 0x10; // (0x24)
    };
}
"#;

    #[test]
    fn test_parse_offsets_hpp() {
        let classes = parse_offsets_hpp(OFFSETS_HPP);
        let names: Vec<_> = classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["UWorld", "FNameEntry"]);

        let world = &classes[0];
        assert_eq!(world.parent, "UObject");
        assert_eq!(world.type_tag, "class");
        // Highest offset is Levels at 0x178 + 0x20
        assert_eq!(world.size, 0x198);
        let types: Vec<_> = world.members.iter().map(|m| m.type_name.as_str()).collect();
        assert_eq!(types, vec!["URootComponent*", "bool", "float", "TArray<uint8_t>"]);
        assert_eq!(world.members[0].offset, "0x1B0");
        assert_eq!(world.members[0].size, "0x8");

        let entry = &classes[1];
        assert_eq!(entry.type_tag, "struct");
        assert_eq!(entry.size, 0x34);
        assert_eq!(entry.members[0].type_name, "FString");
        assert_eq!(entry.members[1].type_name, "uint8_t[36]");
    }

    #[test]
    fn test_infer_member_type() {
        assert_eq!(infer_member_type("Count", 0x1), "uint8_t");
        assert_eq!(infer_member_type("Flags", 0x2), "uint16_t");
        assert_eq!(infer_member_type("Score", 0x4), "int32_t");
        assert_eq!(infer_member_type("Seed", 0x8), "uint64_t");
        assert_eq!(infer_member_type("Owner_AActor", 0x8), "AActor*");
        assert_eq!(infer_member_type("outer_object", 0x8), "UObject*");
    }

    #[test]
    fn test_convert_directory_and_output_layout() {
        let temp_dir = TempDir::new().unwrap();
        let sdk_dir = temp_dir.path().join("SDK");
        fs::create_dir_all(sdk_dir.join("nested")).unwrap();
        fs::write(sdk_dir.join("Engine_classes.h"), WORLD_HEADER).unwrap();
        fs::write(
            sdk_dir.join("nested").join("Basic.h"),
            "struct FName final\n{\n\tint32 ComparisonIndex; // 0x0000(0x0004)\n};\n",
        )
        .unwrap();
        fs::write(sdk_dir.join("readme.txt"), "class UIgnored final\n{\n};\n").unwrap();

        assert_eq!(ConvertFormat::detect(&sdk_dir), ConvertFormat::Dumper7);
        let classes = convert_path(&sdk_dir, ConvertFormat::Dumper7).unwrap();
        let names: Vec<_> = classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["UWorld", "FVector", "FItemRow", "FName"]);

        // The written JSON is what the loader reads back
        let json = to_sdk_json(&classes).unwrap();
        let reloaded = parse_sdk_json(json.as_bytes()).unwrap();
        assert_eq!(reloaded, classes);
    }

    #[test]
    fn test_convert_errors() {
        let temp_dir = TempDir::new().unwrap();
        assert!(convert_path(&temp_dir.path().join("missing"), ConvertFormat::Dumper7).is_err());
        assert!(convert_path(temp_dir.path(), ConvertFormat::Dumper7).is_err());
        assert!(convert_path(temp_dir.path(), ConvertFormat::OffsetsHpp).is_err());

        let hpp = temp_dir.path().join("Offsets.hpp");
        fs::write(&hpp, OFFSETS_HPP).unwrap();
        assert_eq!(ConvertFormat::detect(&hpp), ConvertFormat::OffsetsHpp);
        assert_eq!(convert_path(&hpp, ConvertFormat::OffsetsHpp).unwrap().len(), 2);
    }

    #[test]
    fn test_globals_template() {
        let fresh = globals_template(None).unwrap();
        let class = parse_globals_json(fresh.as_bytes()).unwrap();
        let names: Vec<_> = class.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names.len(), 3);
        for base in GLOBALS_TEMPLATE_BASES {
            assert!(names.contains(&base));
        }

        let existing = r#"{"bases": {"GWorld": "0x1234"}, "offsets": {"UWorld": {"PersistentLevel": "0x30"}}}"#;
        let merged = globals_template(Some(existing)).unwrap();
        let class = parse_globals_json(merged.as_bytes()).unwrap();
        let world = class.members.iter().find(|m| m.name == "GWorld").unwrap();
        assert_eq!(world.offset, "0x1234");
        assert!(class.members.iter().any(|m| m.name == "PersistentLevel"));
        assert_eq!(class.members.len(), 4);

        assert!(globals_template(Some("[1, 2]")).is_err());
    }
}
