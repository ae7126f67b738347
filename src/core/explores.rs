use crate::core::lookml::ExploreEntry;
use crate::core::views::{GROWTH_ACCOUNTING_NAME, PING_VIEW};
use crate::domain::model::{ExploreDefinition, ViewDefinition};
use std::collections::BTreeMap;

pub const PING_EXPLORE: &str = "ping_explore";
pub const GROWTH_ACCOUNTING_EXPLORE: &str = "growth_accounting_explore";

const BASE_VIEW: &str = "base_view";

fn base_view_explore(explore_type: &str, view_name: &str) -> ExploreDefinition {
    ExploreDefinition {
        explore_type: explore_type.to_string(),
        views: BTreeMap::from([(BASE_VIEW.to_string(), view_name.to_string())]),
    }
}

/// All explores derivable from a namespace's views: one ping explore per ping
/// view, plus a growth accounting explore when that view exists.
pub fn explores_from_views(
    views: &BTreeMap<String, ViewDefinition>,
) -> BTreeMap<String, ExploreDefinition> {
    let mut explores = BTreeMap::new();
    for (name, view) in views {
        if name == GROWTH_ACCOUNTING_NAME {
            explores.insert(
                name.clone(),
                base_view_explore(GROWTH_ACCOUNTING_EXPLORE, name),
            );
        } else if view.view_type == PING_VIEW {
            explores.insert(name.clone(), base_view_explore(PING_EXPLORE, name));
        }
    }
    explores
}

/// The explore block written to the namespace's explore file.
pub fn explore_entry(name: &str, definition: &ExploreDefinition) -> ExploreEntry {
    ExploreEntry {
        name: name.to_string(),
        view_name: definition
            .views
            .get(BASE_VIEW)
            .cloned()
            .unwrap_or_else(|| name.to_string()),
    }
}
