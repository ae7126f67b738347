use crate::domain::model::{FieldType, SchemaField, ViewDefinition};
use crate::utils::error::{GenError, Result};

pub const TIME_TIMEFRAMES: &[&str] = &["raw", "time", "date", "week", "month", "quarter", "year"];
pub const DATE_TIMEFRAMES: &[&str] = &["raw", "date", "week", "month", "quarter", "year"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub hidden: bool,
    pub map_layer_name: Option<&'static str>,
    pub group_label: Option<String>,
    pub group_item_label: Option<String>,
    pub dimension_type: Option<&'static str>,
    pub sql: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionGroup {
    pub name: String,
    pub group_label: Option<String>,
    pub group_item_label: Option<String>,
    pub convert_tz: bool,
    pub datatype_date: bool,
    pub timeframes: &'static [&'static str],
    pub sql: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measure {
    pub name: String,
    pub measure_type: &'static str,
    pub sql: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedValue {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewFile {
    pub name: String,
    pub channel_parameter: Vec<AllowedValue>,
    pub sql_table_name: String,
    pub dimensions: Vec<Dimension>,
    pub dimension_groups: Vec<DimensionGroup>,
    pub measures: Vec<Measure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExploreEntry {
    pub name: String,
    pub view_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExploreFile {
    pub include: String,
    pub explores: Vec<ExploreEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFile {
    pub connection: String,
    pub label: String,
    pub includes: Vec<String>,
}

enum DimensionEntry {
    Plain(Dimension),
    Group(DimensionGroup),
}

impl DimensionEntry {
    fn name(&self) -> &str {
        match self {
            DimensionEntry::Plain(d) => &d.name,
            DimensionEntry::Group(g) => &g.name,
        }
    }
}

/// Flatten a table schema into dimensions and dimension groups.
///
/// Fields are visited sorted by name at every nesting level; RECORD columns
/// recurse, joining name parts with `__`. A repeated flattened name is fatal,
/// except `submission`, where the last field in sort order wins (so
/// `submission_timestamp` shadows `submission_date`).
pub fn dimensions_from_schema(
    schema: &[SchemaField],
    table: &str,
) -> Result<(Vec<Dimension>, Vec<DimensionGroup>)> {
    let mut entries: Vec<DimensionEntry> = Vec::new();
    let mut path: Vec<String> = Vec::new();
    walk_fields(schema, &mut path, &mut entries, table)?;

    let mut dimensions = Vec::new();
    let mut groups = Vec::new();
    for entry in entries {
        match entry {
            DimensionEntry::Plain(d) => dimensions.push(d),
            DimensionEntry::Group(g) => groups.push(g),
        }
    }
    Ok((dimensions, groups))
}

fn walk_fields(
    fields: &[SchemaField],
    path: &mut Vec<String>,
    entries: &mut Vec<DimensionEntry>,
    table: &str,
) -> Result<()> {
    let mut sorted: Vec<&SchemaField> = fields.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    for field in sorted {
        path.push(field.name.clone());
        if field.field_type == FieldType::Record {
            walk_fields(&field.fields, path, entries, table)?;
        } else {
            let entry = entry_for_field(field, path);
            insert_entry(entries, entry, table)?;
        }
        path.pop();
    }
    Ok(())
}

fn entry_for_field(field: &SchemaField, path: &[String]) -> DimensionEntry {
    let flat_name = path.join("__");
    let sql = format!("${{TABLE}}.{}", path.join("."));
    let nested = path.len() > 1;
    let group_label = nested.then(|| title_case_parts(&path[..path.len() - 1]));
    let group_item_label = nested.then(|| title_case(&field.name));

    match field.field_type {
        FieldType::Timestamp | FieldType::Datetime => DimensionEntry::Group(DimensionGroup {
            name: strip_time_suffix(&flat_name),
            group_label,
            group_item_label,
            convert_tz: true,
            datatype_date: false,
            timeframes: TIME_TIMEFRAMES,
            sql,
        }),
        FieldType::Date => DimensionEntry::Group(DimensionGroup {
            name: strip_time_suffix(&flat_name),
            group_label,
            group_item_label,
            convert_tz: false,
            datatype_date: true,
            timeframes: DATE_TIMEFRAMES,
            sql,
        }),
        field_type => {
            // id columns carry nothing but hidden + sql, not even when nested
            let hidden = matches!(field.name.as_str(), "client_id" | "document_id");
            let dimension_type = (!hidden).then(|| scalar_type(field_type));
            let map_layer_name = (field.name == "country" && field_type == FieldType::String)
                .then_some("countries");
            DimensionEntry::Plain(Dimension {
                name: flat_name,
                hidden,
                map_layer_name,
                group_label: if hidden { None } else { group_label },
                group_item_label: if hidden { None } else { group_item_label },
                dimension_type,
                sql,
            })
        }
    }
}

// A group named `x_date` or `x_timestamp` reads as `x Date`, `x Week` and so
// on in Looker, so the suffix comes off whatever the column's storage type.
fn strip_time_suffix(name: &str) -> String {
    name.strip_suffix("_timestamp")
        .or_else(|| name.strip_suffix("_datetime"))
        .or_else(|| name.strip_suffix("_date"))
        .unwrap_or(name)
        .to_string()
}

fn insert_entry(entries: &mut Vec<DimensionEntry>, entry: DimensionEntry, table: &str) -> Result<()> {
    if let Some(position) = entries.iter().position(|e| e.name() == entry.name()) {
        // submission_date and submission_timestamp collapse to one group;
        // the timestamp sorts last and wins.
        if entry.name() == "submission" {
            entries[position] = entry;
            return Ok(());
        }
        return Err(GenError::DuplicateDimension {
            name: entry.name().to_string(),
            table: table.to_string(),
        });
    }
    entries.push(entry);
    Ok(())
}

fn scalar_type(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Boolean => "yesno",
        FieldType::Integer | FieldType::Float | FieldType::Numeric => "number",
        _ => "string",
    }
}

pub fn title_case(s: &str) -> String {
    s.split('_')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_parts(parts: &[String]) -> String {
    parts
        .iter()
        .map(|part| title_case(part))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Derive client/ping count measures from the generated dimensions.
pub fn measures_from_dimensions(dimensions: &[Dimension], table: &str) -> Result<Vec<Measure>> {
    let mut measures: Vec<Measure> = Vec::new();
    for dimension in dimensions {
        let leaf = dimension
            .name
            .rsplit("__")
            .next()
            .unwrap_or(&dimension.name);
        let measure = match leaf {
            "client_id" => Some(Measure {
                name: "clients".to_string(),
                measure_type: "count_distinct",
                sql: Some(format!("${{{}}}", dimension.name)),
            }),
            "document_id" => Some(Measure {
                name: "ping_count".to_string(),
                measure_type: "count",
                sql: None,
            }),
            _ => None,
        };
        if let Some(measure) = measure {
            if measures.iter().any(|m| m.name == measure.name) {
                return Err(GenError::DuplicateMeasure {
                    name: measure.name,
                    table: table.to_string(),
                });
            }
            measures.push(measure);
        }
    }
    Ok(measures)
}

/// Assemble a complete view file from its registry definition and the schema
/// of its first (release-channel) table.
pub fn view_from_definition(
    name: &str,
    definition: &ViewDefinition,
    schema: &[SchemaField],
) -> Result<ViewFile> {
    let first = definition
        .tables
        .first()
        .ok_or_else(|| GenError::ProcessingError {
            message: format!("view '{}' has no tables", name),
        })?;

    let (dimensions, dimension_groups) = dimensions_from_schema(schema, &first.table)?;
    let measures = measures_from_dimensions(&dimensions, &first.table)?;

    let (channel_parameter, sql_table_name) = if definition.tables.len() > 1 {
        let allowed = definition
            .tables
            .iter()
            .map(|t| AllowedValue {
                label: capitalize(&t.channel),
                value: t.table.clone(),
            })
            .collect();
        (allowed, "`{% parameter channel %}`".to_string())
    } else {
        (Vec::new(), format!("`{}`", first.table))
    };

    Ok(ViewFile {
        name: name.to_string(),
        channel_parameter,
        sql_table_name,
        dimensions,
        dimension_groups,
        measures,
    })
}
