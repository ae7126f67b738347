use crate::core::explores::explores_from_views;
use crate::core::lookml::title_case;
use crate::core::views::{growth_accounting_view, ping_views, ChannelDataset};
use crate::domain::model::{
    AppListing, ChannelTable, CustomNamespace, Namespace, NamespaceRegistry, TableCatalog,
    ViewDefinition,
};
use crate::utils::error::{GenError, Result};
use regex::Regex;
use std::collections::BTreeMap;

/// Namespace names barred from the generated registry. Glob patterns, one per
/// line, `#` starts a comment.
#[derive(Debug, Default)]
pub struct Disallowlist {
    patterns: Vec<Regex>,
}

impl Disallowlist {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut patterns = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            patterns.push(wildcard_regex(line)?);
        }
        Ok(Self { patterns })
    }

    pub fn is_disallowed(&self, name: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(name))
    }
}

/// Translate a `*` glob into an anchored regex.
pub fn wildcard_regex(pattern: &str) -> Result<Regex> {
    let expr = format!(
        "^{}$",
        pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*")
    );
    Regex::new(&expr).map_err(|e| GenError::ConfigError {
        message: format!("invalid pattern '{}': {}", pattern, e),
    })
}

fn channel_rank(channel: &str) -> u8 {
    match channel {
        "release" => 0,
        "beta" => 1,
        "nightly" => 2,
        _ => 3,
    }
}

/// Build namespaces for every non-deprecated Glean application in the
/// listings, using the table catalog to enumerate each dataset's tables.
pub fn glean_namespaces(
    listings: &[AppListing],
    project: &str,
    catalog: &TableCatalog,
) -> NamespaceRegistry {
    let mut apps: BTreeMap<String, Vec<&AppListing>> = BTreeMap::new();
    for listing in listings {
        if listing.deprecated {
            tracing::debug!("Skipping deprecated app {}", listing.app_name);
            continue;
        }
        apps.entry(listing.app_name.clone()).or_default().push(listing);
    }

    let mut registry = NamespaceRegistry::new();
    for (app_name, mut channels) in apps {
        channels.sort_by(|a, b| {
            channel_rank(&a.app_channel)
                .cmp(&channel_rank(&b.app_channel))
                .then_with(|| a.app_channel.cmp(&b.app_channel))
        });

        let datasets: Vec<ChannelDataset> = channels
            .iter()
            .map(|listing| ChannelDataset {
                channel: listing.app_channel.clone(),
                project: project.to_string(),
                dataset: listing.bq_dataset_family.clone(),
            })
            .collect();

        let mut views = ping_views(&datasets, catalog);
        if let Some((name, view)) = growth_accounting_view(&datasets, catalog) {
            views.insert(name, view);
        }
        if views.is_empty() {
            tracing::warn!("No tables discovered for app {}", app_name);
        }

        let explores = explores_from_views(&views);
        registry.insert(
            app_name,
            Namespace {
                canonical_app_name: channels[0].canonical_app_name.clone(),
                views,
                explores,
            },
        );
    }
    registry
}

/// Expand a custom namespace's view declarations against the table catalog.
///
/// A view literally named `*` fans out to one single-table view per matched
/// table. A concretely named view may use wildcards in its table references,
/// but each pattern must resolve to at most one table.
pub fn expand_custom_views(
    namespace: &str,
    views: &BTreeMap<String, ViewDefinition>,
    catalog: &TableCatalog,
) -> Result<BTreeMap<String, ViewDefinition>> {
    let all_tables = catalog.all_tables();
    let mut expanded: BTreeMap<String, ViewDefinition> = BTreeMap::new();

    for (view_name, definition) in views {
        if view_name == "*" {
            for entry in &definition.tables {
                for table in match_tables(&all_tables, &entry.table)? {
                    let short_name = table.rsplit('.').next().unwrap_or(&table).to_string();
                    expanded
                        .entry(short_name)
                        .or_insert_with(|| ViewDefinition {
                            view_type: definition.view_type.clone(),
                            tables: Vec::new(),
                        })
                        .tables
                        .push(ChannelTable {
                            channel: entry.channel.clone(),
                            table,
                        });
                }
            }
            continue;
        }

        let mut tables = Vec::new();
        for entry in &definition.tables {
            let matches = match_tables(&all_tables, &entry.table)?;
            match matches.len() {
                0 => tracing::warn!(
                    "Pattern '{}' in {}/{} matched no tables",
                    entry.table,
                    namespace,
                    view_name
                ),
                1 => tables.push(ChannelTable {
                    channel: entry.channel.clone(),
                    table: matches.into_iter().next().unwrap_or_default(),
                }),
                n => {
                    return Err(GenError::ConfigError {
                        message: format!(
                            "pattern '{}' in {}/{} matched {} tables, expected one",
                            entry.table, namespace, view_name, n
                        ),
                    })
                }
            }
        }
        if tables.is_empty() {
            tracing::warn!("View {}/{} resolved to no tables, dropping", namespace, view_name);
            continue;
        }
        expanded.insert(
            view_name.clone(),
            ViewDefinition {
                view_type: definition.view_type.clone(),
                tables,
            },
        );
    }
    Ok(expanded)
}

fn match_tables(all_tables: &[String], pattern: &str) -> Result<Vec<String>> {
    if !pattern.contains('*') {
        // Concrete references pass through even when absent from the catalog;
        // the archive only lists generated tables.
        return Ok(vec![pattern.to_string()]);
    }
    let regex = wildcard_regex(pattern)?;
    Ok(all_tables
        .iter()
        .filter(|table| regex.is_match(table))
        .cloned()
        .collect())
}

fn default_canonical_name(namespace: &str) -> String {
    title_case(&namespace.replace('-', "_"))
}

/// Compile the unified registry: Glean-derived namespaces, minus disallowed
/// names, overlaid by custom declarations (custom wins on conflict; a custom
/// declaration re-enables a disallowed name).
pub fn merge_registry(
    listings: &[AppListing],
    project: &str,
    catalog: &TableCatalog,
    custom: &BTreeMap<String, CustomNamespace>,
    disallowlist: &Disallowlist,
) -> Result<NamespaceRegistry> {
    let mut registry = glean_namespaces(listings, project, catalog);
    registry.retain(|name, _| {
        let keep = !disallowlist.is_disallowed(name) || custom.contains_key(name);
        if !keep {
            tracing::info!("Dropping disallowed namespace {}", name);
        }
        keep
    });

    for (name, declaration) in custom {
        let namespace = registry.entry(name.clone()).or_insert_with(|| Namespace {
            canonical_app_name: default_canonical_name(name),
            views: BTreeMap::new(),
            explores: BTreeMap::new(),
        });
        if let Some(canonical) = &declaration.canonical_app_name {
            namespace.canonical_app_name = canonical.clone();
        }
        let views = expand_custom_views(name, &declaration.views, catalog)?;
        namespace.views.extend(views);
    }

    // Explores follow the final view set; explicitly declared explores win.
    for (name, namespace) in registry.iter_mut() {
        let mut explores = explores_from_views(&namespace.views);
        if let Some(declaration) = custom.get(name) {
            explores.extend(declaration.explores.clone());
        }
        namespace.explores = explores;
    }

    Ok(registry)
}
