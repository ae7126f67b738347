use crate::domain::model::{ChannelTable, TableCatalog, ViewDefinition};
use std::collections::BTreeMap;

pub const PING_VIEW: &str = "ping_view";
pub const GROWTH_ACCOUNTING_VIEW: &str = "growth_accounting_view";
pub const GROWTH_ACCOUNTING_TABLE: &str = "baseline_clients_last_seen";
pub const GROWTH_ACCOUNTING_NAME: &str = "growth_accounting";

/// One release channel of an application and the dataset backing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDataset {
    pub channel: String,
    pub project: String,
    pub dataset: String,
}

impl ChannelDataset {
    fn qualify(&self, table: &str) -> String {
        format!("{}.{}.{}", self.project, self.dataset, table)
    }
}

/// One ping view per table of the first (release) channel's dataset, with a
/// table entry for every channel whose dataset also carries that table.
pub fn ping_views(
    channels: &[ChannelDataset],
    catalog: &TableCatalog,
) -> BTreeMap<String, ViewDefinition> {
    let mut views = BTreeMap::new();
    let Some(release) = channels.first() else {
        return views;
    };

    let per_channel: Vec<_> = channels
        .iter()
        .map(|c| (c, catalog.tables_in(&c.project, &c.dataset)))
        .collect();

    for table in catalog.tables_in(&release.project, &release.dataset) {
        let tables: Vec<ChannelTable> = per_channel
            .iter()
            .filter(|(_, available)| available.contains(&table))
            .map(|(channel, _)| ChannelTable {
                channel: channel.channel.clone(),
                table: channel.qualify(&table),
            })
            .collect();
        views.insert(
            table,
            ViewDefinition {
                view_type: PING_VIEW.to_string(),
                tables,
            },
        );
    }
    views
}

/// Growth accounting is only available when the release dataset carries the
/// baseline clients-last-seen table.
pub fn growth_accounting_view(
    channels: &[ChannelDataset],
    catalog: &TableCatalog,
) -> Option<(String, ViewDefinition)> {
    let release = channels.first()?;
    let tables = catalog.tables_in(&release.project, &release.dataset);
    if !tables.contains(GROWTH_ACCOUNTING_TABLE) {
        return None;
    }
    Some((
        GROWTH_ACCOUNTING_NAME.to_string(),
        ViewDefinition {
            view_type: GROWTH_ACCOUNTING_VIEW.to_string(),
            tables: vec![ChannelTable {
                channel: release.channel.clone(),
                table: release.qualify(GROWTH_ACCOUNTING_TABLE),
            }],
        },
    ))
}
