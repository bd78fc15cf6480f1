//! Declarative UDM field catalogue.
//!
//! Describes every asset and segment field the dashboard knows about: its
//! dotted key, display label, value kind, whether the converter is expected
//! to fill it, and where the value originates. Provenance and `required`
//! only drive display colouring; nothing here validates records.

/// Value kind of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Date,
    Array,
    Object,
    Enum,
}

/// Where a field's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldSource {
    NasPath,
    NasFilename,
    Sheet,
    Manual,
    Computed,
}

impl FieldSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NasPath => "nas_path",
            Self::NasFilename => "nas_filename",
            Self::Sheet => "sheet",
            Self::Manual => "manual",
            Self::Computed => "computed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NasPath => "NAS path",
            Self::NasFilename => "NAS file name",
            Self::Sheet => "Sheet",
            Self::Manual => "Manual",
            Self::Computed => "Auto",
        }
    }
}

/// Metadata for one field; objects list their nested fields in `children`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldMeta {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub source: FieldSource,
    pub enum_values: &'static [&'static str],
    pub children: &'static [FieldMeta],
}

const fn field(
    key: &'static str,
    label: &'static str,
    kind: FieldKind,
    required: bool,
    source: FieldSource,
) -> FieldMeta {
    FieldMeta {
        key,
        label,
        kind,
        required,
        source,
        enum_values: &[],
        children: &[],
    }
}

const fn enum_field(
    key: &'static str,
    label: &'static str,
    required: bool,
    source: FieldSource,
    enum_values: &'static [&'static str],
) -> FieldMeta {
    FieldMeta {
        key,
        label,
        kind: FieldKind::Enum,
        required,
        source,
        enum_values,
        children: &[],
    }
}

const fn object_field(
    key: &'static str,
    label: &'static str,
    required: bool,
    source: FieldSource,
    children: &'static [FieldMeta],
) -> FieldMeta {
    FieldMeta {
        key,
        label,
        kind: FieldKind::Object,
        required,
        source,
        enum_values: &[],
        children,
    }
}

use FieldKind as K;
use FieldSource as S;

pub const BRANDS: &[&str] = &[
    "WSOP", "WSOPC", "WSOPE", "WSOPP", "HCL", "PAD", "GGMillions", "MPP", "GOG", "WPT", "EPT",
    "OTHER",
];

pub const ASSET_TYPES: &[&str] = &[
    "STREAM",
    "SUBCLIP",
    "HAND_CLIP",
    "MASTER",
    "CLEAN",
    "NO_COMMENTARY",
    "RAW",
    "GENERIC",
    "MOV",
    "MXF",
];

const EVENT_CONTEXT_FIELDS: &[FieldMeta] = &[
    field("year", "Year", K::Number, true, S::NasPath),
    enum_field("brand", "Brand", true, S::NasPath, BRANDS),
    enum_field(
        "event_type",
        "Event type",
        false,
        S::NasPath,
        &["BRACELET", "CIRCUIT", "CASH_GAME_SHOW", "SUPER_MAIN", "ARCHIVE", "SIDE_EVENT"],
    ),
    field("location", "Location", K::String, false, S::NasPath),
    field("venue", "Venue", K::String, false, S::Manual),
    field("event_number", "Event #", K::Number, false, S::NasFilename),
    field("buyin_usd", "Buy-in (USD)", K::Number, false, S::NasFilename),
    enum_field(
        "game_variant",
        "Game variant",
        false,
        S::NasFilename,
        &["NLH", "PLO", "STUD", "RAZZ", "HORSE", "MIXED", "OMAHA_HI_LO", "2-7_TD", "OTHER"],
    ),
    field("is_high_roller", "High roller", K::Boolean, false, S::NasFilename),
    field("is_super_high_roller", "Super high roller", K::Boolean, false, S::NasFilename),
    field("is_final_table", "Final table", K::Boolean, false, S::NasFilename),
    field("season", "Season", K::Number, false, S::NasFilename),
    field("episode", "Episode", K::Number, false, S::NasFilename),
    field("episode_title", "Episode title", K::String, false, S::Sheet),
];

const TECH_SPEC_FIELDS: &[FieldMeta] = &[
    field("fps", "FPS", K::Number, false, S::Manual),
    field("resolution", "Resolution", K::String, false, S::Manual),
    field("duration_sec", "Duration (s)", K::Number, false, S::Computed),
    field("file_size_mb", "File size (MB)", K::Number, false, S::NasPath),
    field("codec", "Codec", K::String, false, S::Manual),
];

const FILE_NAME_META_FIELDS: &[FieldMeta] = &[
    field("code_prefix", "Code prefix", K::String, false, S::NasFilename),
    field("year_code", "Year code", K::String, false, S::NasFilename),
    field("sequence_num", "Sequence #", K::Number, false, S::NasFilename),
    field("clip_type", "Clip type", K::String, false, S::NasFilename),
    field("raw_description", "Description", K::String, false, S::NasFilename),
];

/// Asset-level fields.
pub const ASSET_SCHEMA: &[FieldMeta] = &[
    field("asset_uuid", "Asset UUID", K::String, true, S::Computed),
    field("file_name", "File name", K::String, true, S::NasFilename),
    field("file_path_rel", "Relative path", K::String, false, S::NasPath),
    field("file_path_nas", "NAS path", K::String, false, S::NasPath),
    enum_field("asset_type", "Asset type", false, S::NasPath, ASSET_TYPES),
    object_field(
        "event_context",
        "Event context",
        true,
        S::NasPath,
        EVENT_CONTEXT_FIELDS,
    ),
    object_field("tech_spec", "Tech spec", false, S::NasFilename, TECH_SPEC_FIELDS),
    object_field(
        "file_name_meta",
        "File name meta",
        false,
        S::NasFilename,
        FILE_NAME_META_FIELDS,
    ),
    field("file_number", "File #", K::Number, false, S::Sheet),
    field("tournament_name", "Tournament", K::String, false, S::Sheet),
    field("project_name_tag", "Project tag", K::String, false, S::Sheet),
    field("nas_folder_link", "NAS folder link", K::String, false, S::Sheet),
    field("source_origin", "Source origin", K::String, true, S::Computed),
    field("created_at", "Created", K::Date, false, S::NasPath),
    field("last_modified", "Last modified", K::Date, false, S::NasPath),
    field("segments", "Segments", K::Array, false, S::Sheet),
];

const SITUATION_FLAG_FIELDS: &[FieldMeta] = &[
    field("is_cooler", "Cooler", K::Boolean, false, S::Sheet),
    field("is_badbeat", "Bad beat", K::Boolean, false, S::Sheet),
    field("is_suckout", "Suckout", K::Boolean, false, S::Sheet),
    field("is_bluff", "Bluff", K::Boolean, false, S::Sheet),
    field("is_hero_call", "Hero call", K::Boolean, false, S::Sheet),
    field("is_hero_fold", "Hero fold", K::Boolean, false, S::Sheet),
    field("is_river_killer", "River killer", K::Boolean, false, S::Sheet),
];

/// Segment-level fields.
pub const SEGMENT_SCHEMA: &[FieldMeta] = &[
    field("segment_uuid", "Segment UUID", K::String, true, S::Computed),
    field("parent_asset_uuid", "Parent asset UUID", K::String, true, S::Computed),
    enum_field(
        "segment_type",
        "Segment type",
        false,
        S::Sheet,
        &["HAND", "HIGHLIGHT", "PE", "INTRO", "COMMENTARY"],
    ),
    field("time_in_sec", "Time in (s)", K::Number, true, S::Sheet),
    field("time_out_sec", "Time out (s)", K::Number, true, S::Sheet),
    field("title", "Title", K::String, false, S::Sheet),
    enum_field("game_type", "Game type", false, S::Sheet, &["TOURNAMENT", "CASH_GAME"]),
    field("rating", "Rating", K::Number, false, S::Sheet),
    field("winner", "Winner", K::String, false, S::Sheet),
    field("winning_hand", "Winning hand", K::String, false, S::Sheet),
    field("losing_hand", "Losing hand", K::String, false, S::Sheet),
    field("players", "Players", K::Array, false, S::Sheet),
    field("tags_action", "Action tags", K::Array, false, S::Sheet),
    field("tags_emotion", "Emotion tags", K::Array, false, S::Sheet),
    field("tags_content", "Content tags", K::Array, false, S::Sheet),
    object_field(
        "situation_flags",
        "Situation flags",
        false,
        S::Sheet,
        SITUATION_FLAG_FIELDS,
    ),
    enum_field(
        "all_in_stage",
        "All-in stage",
        false,
        S::Sheet,
        &["preflop", "flop", "turn", "river", "none"],
    ),
    field("board", "Board", K::String, false, S::Sheet),
    field("hand_tag", "Hand tag", K::String, false, S::Sheet),
    field("is_epic_hand", "Epic hand", K::Boolean, false, S::Sheet),
    field("description", "Description", K::String, false, S::Sheet),
];

/// A named set of asset columns shown together in the matrix view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnGroup {
    pub id: &'static str,
    pub label: &'static str,
    pub fields: &'static [&'static str],
    pub default_expanded: bool,
}

pub const COLUMN_GROUPS: &[ColumnGroup] = &[
    ColumnGroup {
        id: "basic",
        label: "Basic",
        fields: &[
            "asset_uuid",
            "file_name",
            "file_path_rel",
            "file_path_nas",
            "asset_type",
            "source_origin",
        ],
        default_expanded: true,
    },
    ColumnGroup {
        id: "event",
        label: "Event",
        fields: &[
            "event_context.brand",
            "event_context.year",
            "event_context.event_type",
            "event_context.location",
            "event_context.venue",
            "event_context.event_number",
            "event_context.buyin_usd",
            "event_context.game_variant",
        ],
        default_expanded: true,
    },
    ColumnGroup {
        id: "season",
        label: "Season",
        fields: &[
            "event_context.season",
            "event_context.episode",
            "event_context.episode_title",
        ],
        default_expanded: false,
    },
    ColumnGroup {
        id: "flags",
        label: "Flags",
        fields: &[
            "event_context.is_final_table",
            "event_context.is_high_roller",
            "event_context.is_super_high_roller",
        ],
        default_expanded: false,
    },
    ColumnGroup {
        id: "tech",
        label: "Tech spec",
        fields: &[
            "tech_spec.fps",
            "tech_spec.resolution",
            "tech_spec.duration_sec",
            "tech_spec.file_size_mb",
            "tech_spec.codec",
        ],
        default_expanded: false,
    },
    ColumnGroup {
        id: "filename_meta",
        label: "File name meta",
        fields: &[
            "file_name_meta.code_prefix",
            "file_name_meta.year_code",
            "file_name_meta.sequence_num",
            "file_name_meta.clip_type",
            "file_name_meta.raw_description",
        ],
        default_expanded: false,
    },
    ColumnGroup {
        id: "sheet",
        label: "Sheet",
        fields: &[
            "file_number",
            "tournament_name",
            "project_name_tag",
            "nas_folder_link",
            "segments",
        ],
        default_expanded: false,
    },
    ColumnGroup {
        id: "meta",
        label: "Meta",
        fields: &["created_at", "last_modified"],
        default_expanded: false,
    },
];

/// Dotted paths of every leaf field, in schema order.
///
/// Object fields with children contribute their children instead of
/// themselves, so a completion score counts each value exactly once.
pub fn leaf_paths(schema: &[FieldMeta]) -> Vec<String> {
    let mut paths = Vec::new();
    // (prefix, remaining fields) frames; reversed push keeps schema order
    let mut stack: Vec<(String, &[FieldMeta])> = vec![(String::new(), schema)];

    while let Some((prefix, fields)) = stack.pop() {
        let Some((first, rest)) = fields.split_first() else {
            continue;
        };
        stack.push((prefix.clone(), rest));

        let path = if prefix.is_empty() {
            first.key.to_string()
        } else {
            format!("{}.{}", prefix, first.key)
        };

        if first.children.is_empty() {
            paths.push(path);
        } else {
            stack.push((path, first.children));
        }
    }

    paths
}

/// Number of fields including nested children.
pub fn count_total_fields(schema: &[FieldMeta]) -> usize {
    let mut count = 0;
    let mut stack = vec![schema];
    while let Some(fields) = stack.pop() {
        for f in fields {
            count += 1;
            if !f.children.is_empty() {
                stack.push(f.children);
            }
        }
    }
    count
}

/// Look up a field by dotted path.
pub fn find_field(schema: &'static [FieldMeta], path: &str) -> Option<&'static FieldMeta> {
    let mut fields = schema;
    let mut found = None;
    for part in path.split('.') {
        let meta = fields.iter().find(|f| f.key == part)?;
        fields = meta.children;
        found = Some(meta);
    }
    found
}

/// Display label for an asset field path, falling back to the last segment.
pub fn field_label(path: &str) -> &str {
    match find_field(ASSET_SCHEMA, path) {
        Some(meta) => meta.label,
        None => path.rsplit('.').next().unwrap_or(path),
    }
}

/// Provenance of an asset field path; unknown paths count as computed.
pub fn field_source(path: &str) -> FieldSource {
    find_field(ASSET_SCHEMA, path)
        .map(|meta| meta.source)
        .unwrap_or(FieldSource::Computed)
}

/// Whether an asset field path is marked required.
pub fn field_required(path: &str) -> bool {
    find_field(ASSET_SCHEMA, path).is_some_and(|meta| meta.required)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_paths_flatten_objects_in_order() {
        let paths = leaf_paths(ASSET_SCHEMA);

        assert_eq!(paths[0], "asset_uuid");
        assert!(paths.contains(&"event_context.brand".to_string()));
        assert!(paths.contains(&"tech_spec.codec".to_string()));
        assert!(!paths.contains(&"event_context".to_string()));

        let year = paths.iter().position(|p| p == "event_context.year").unwrap();
        let brand = paths.iter().position(|p| p == "event_context.brand").unwrap();
        let tech = paths.iter().position(|p| p == "tech_spec.fps").unwrap();
        assert!(year < brand && brand < tech);
        assert_eq!(paths.last().map(String::as_str), Some("segments"));
    }

    #[test]
    fn test_count_total_fields_includes_parents() {
        let leaves = leaf_paths(ASSET_SCHEMA).len();
        // three object parents
        assert_eq!(count_total_fields(ASSET_SCHEMA), leaves + 3);
    }

    #[test]
    fn test_field_lookup() {
        assert_eq!(field_label("event_context.brand"), "Brand");
        assert_eq!(field_label("unknown.thing"), "thing");
        assert_eq!(field_source("tech_spec.fps"), FieldSource::Manual);
        assert_eq!(field_source("nope"), FieldSource::Computed);
        assert!(field_required("event_context.year"));
        assert!(!field_required("tech_spec.codec"));
    }

    #[test]
    fn test_column_groups_reference_known_fields() {
        for group in COLUMN_GROUPS {
            for path in group.fields {
                assert!(
                    find_field(ASSET_SCHEMA, path).is_some(),
                    "{} in group {} is not in the asset schema",
                    path,
                    group.id
                );
            }
        }
    }
}
