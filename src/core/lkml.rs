//! Deterministic writer for the generated `.lkml` files. Output is plain
//! LookML: `;;`-terminated sql fields, quoted labels, unquoted identifiers.

use crate::core::lookml::{Dimension, DimensionGroup, ExploreFile, Measure, ModelFile, ViewFile};

pub fn view_file(view: &ViewFile) -> String {
    let mut out = String::new();
    out.push_str(&format!("view: {} {{\n", view.name));

    if !view.channel_parameter.is_empty() {
        out.push_str("  parameter: channel {\n");
        out.push_str("    type: unquoted\n");
        for allowed in &view.channel_parameter {
            out.push_str("    allowed_value: {\n");
            out.push_str(&format!("      label: \"{}\"\n", allowed.label));
            out.push_str(&format!("      value: \"{}\"\n", allowed.value));
            out.push_str("    }\n");
        }
        out.push_str("  }\n\n");
    }

    out.push_str(&format!("  sql_table_name: {} ;;\n", view.sql_table_name));

    for dimension in &view.dimensions {
        out.push('\n');
        write_dimension(&mut out, dimension);
    }
    for group in &view.dimension_groups {
        out.push('\n');
        write_dimension_group(&mut out, group);
    }
    for measure in &view.measures {
        out.push('\n');
        write_measure(&mut out, measure);
    }

    out.push_str("}\n");
    out
}

fn write_dimension(out: &mut String, dimension: &Dimension) {
    out.push_str(&format!("  dimension: {} {{\n", dimension.name));
    if dimension.hidden {
        out.push_str("    hidden: yes\n");
    }
    if let Some(map_layer) = dimension.map_layer_name {
        out.push_str(&format!("    map_layer_name: {}\n", map_layer));
    }
    if let Some(label) = &dimension.group_item_label {
        out.push_str(&format!("    group_item_label: \"{}\"\n", label));
    }
    if let Some(label) = &dimension.group_label {
        out.push_str(&format!("    group_label: \"{}\"\n", label));
    }
    if let Some(dimension_type) = dimension.dimension_type {
        out.push_str(&format!("    type: {}\n", dimension_type));
    }
    out.push_str(&format!("    sql: {} ;;\n", dimension.sql));
    out.push_str("  }\n");
}

fn write_dimension_group(out: &mut String, group: &DimensionGroup) {
    out.push_str(&format!("  dimension_group: {} {{\n", group.name));
    if let Some(label) = &group.group_item_label {
        out.push_str(&format!("    group_item_label: \"{}\"\n", label));
    }
    if let Some(label) = &group.group_label {
        out.push_str(&format!("    group_label: \"{}\"\n", label));
    }
    out.push_str("    type: time\n");
    if !group.convert_tz {
        out.push_str("    convert_tz: no\n");
    }
    if group.datatype_date {
        out.push_str("    datatype: date\n");
    }
    out.push_str("    timeframes: [\n");
    let last = group.timeframes.len() - 1;
    for (i, timeframe) in group.timeframes.iter().enumerate() {
        let separator = if i == last { "" } else { "," };
        out.push_str(&format!("      {}{}\n", timeframe, separator));
    }
    out.push_str("    ]\n");
    out.push_str(&format!("    sql: {} ;;\n", group.sql));
    out.push_str("  }\n");
}

fn write_measure(out: &mut String, measure: &Measure) {
    out.push_str(&format!("  measure: {} {{\n", measure.name));
    out.push_str(&format!("    type: {}\n", measure.measure_type));
    if let Some(sql) = &measure.sql {
        out.push_str(&format!("    sql: {} ;;\n", sql));
    }
    out.push_str("  }\n");
}

pub fn explore_file(file: &ExploreFile) -> String {
    let mut out = String::new();
    out.push_str(&format!("include: \"{}\"\n", file.include));
    for explore in &file.explores {
        out.push('\n');
        out.push_str(&format!("explore: {} {{\n", explore.name));
        out.push_str(&format!("  view_name: {}\n", explore.view_name));
        out.push_str("}\n");
    }
    out
}

pub fn model_file(model: &ModelFile) -> String {
    let mut out = String::new();
    out.push_str(&format!("connection: \"{}\"\n", model.connection));
    out.push_str(&format!("label: \"{}\"\n", model.label));
    out.push('\n');
    for include in &model.includes {
        out.push_str(&format!("include: \"{}\"\n", include));
    }
    out
}
