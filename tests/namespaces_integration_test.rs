use httpmock::prelude::*;
use lookml_generator::domain::model::NamespaceRegistry;
use lookml_generator::{Engine, LocalStorage, NamespacesConfig, NamespacesPipeline};
use std::io::{Cursor, Write};
use tempfile::TempDir;
use zip::write::{SimpleFileOptions, ZipWriter};

fn generated_sql_archive() -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for path in [
        "sql/mozdata/glean_app/baseline/view.sql",
        "sql/mozdata/glean_app/metrics/view.sql",
        "sql/mozdata/glean_app/baseline_clients_last_seen/view.sql",
        "sql/mozdata/glean_app_beta/baseline/view.sql",
        "sql/mozdata/internal_app/baseline/view.sql",
        "sql/mozdata/activity/events_daily/view.sql",
        "sql/mozdata/activity/events_hourly/view.sql",
    ] {
        zip.start_file(path, SimpleFileOptions::default()).unwrap();
        zip.write_all(b"SELECT 1").unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn app_listings() -> serde_json::Value {
    serde_json::json!([
        {
            "app_name": "glean-app",
            "app_channel": "release",
            "canonical_app_name": "Glean App",
            "bq_dataset_family": "glean_app"
        },
        {
            "app_name": "glean-app",
            "app_channel": "beta",
            "canonical_app_name": "Glean App Beta",
            "bq_dataset_family": "glean_app_beta"
        },
        {
            "app_name": "internal-app",
            "app_channel": "release",
            "canonical_app_name": "Internal App",
            "bq_dataset_family": "internal_app"
        },
        {
            "app_name": "old-app",
            "app_channel": "release",
            "canonical_app_name": "Old App",
            "bq_dataset_family": "old_app",
            "deprecated": true
        }
    ])
}

async fn run_namespaces(
    server: &MockServer,
    tmp: &TempDir,
    custom_namespaces: Option<String>,
    disallowlist: Option<String>,
) -> NamespaceRegistry {
    let config = NamespacesConfig {
        app_listings_uri: server.url("/app-listings"),
        generated_sql_uri: server.url("/generated-sql.zip"),
        custom_namespaces,
        disallowlist,
        project: "mozdata".to_string(),
        output: "namespaces.yaml".to_string(),
    };

    let storage = LocalStorage::new(tmp.path().to_str().unwrap().to_string());
    let pipeline = NamespacesPipeline::new(storage, config);
    let engine = Engine::new(pipeline);
    let output = engine.run().await.unwrap();
    assert_eq!(output, "namespaces.yaml");

    let yaml = std::fs::read_to_string(tmp.path().join("namespaces.yaml")).unwrap();
    serde_yaml::from_str(&yaml).unwrap()
}

#[tokio::test]
async fn builds_registry_from_listings_and_archive() {
    let tmp = TempDir::new().unwrap();
    let server = MockServer::start();
    let listings_mock = server.mock(|when, then| {
        when.method(GET).path("/app-listings");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(app_listings());
    });
    let archive_mock = server.mock(|when, then| {
        when.method(GET).path("/generated-sql.zip");
        then.status(200).body(generated_sql_archive());
    });

    let registry = run_namespaces(&server, &tmp, None, None).await;
    listings_mock.assert();
    archive_mock.assert();

    // deprecated app dropped, internal-app kept (no disallowlist)
    assert_eq!(
        registry.keys().collect::<Vec<_>>(),
        vec!["glean-app", "internal-app"]
    );

    let glean = &registry["glean-app"];
    assert_eq!(glean.canonical_app_name, "Glean App");

    let baseline = &glean.views["baseline"];
    assert_eq!(baseline.view_type, "ping_view");
    assert_eq!(baseline.tables.len(), 2);
    assert_eq!(baseline.tables[0].channel, "release");
    assert_eq!(baseline.tables[0].table, "mozdata.glean_app.baseline");
    assert_eq!(baseline.tables[1].channel, "beta");
    assert_eq!(baseline.tables[1].table, "mozdata.glean_app_beta.baseline");

    // metrics exists only on release
    assert_eq!(glean.views["metrics"].tables.len(), 1);

    // clients-last-seen table produces the growth accounting pair
    let growth = &glean.views["growth_accounting"];
    assert_eq!(growth.view_type, "growth_accounting_view");
    assert_eq!(
        growth.tables[0].table,
        "mozdata.glean_app.baseline_clients_last_seen"
    );
    assert_eq!(
        glean.explores["growth_accounting"].explore_type,
        "growth_accounting_explore"
    );
    assert_eq!(glean.explores["baseline"].explore_type, "ping_explore");
    assert_eq!(glean.explores["baseline"].views["base_view"], "baseline");
}

#[tokio::test]
async fn custom_and_disallowlist_shape_the_registry() {
    let tmp = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/app-listings");
        then.status(200).json_body(app_listings());
    });
    server.mock(|when, then| {
        when.method(GET).path("/generated-sql.zip");
        then.status(200).body(generated_sql_archive());
    });

    let custom_path = tmp.path().join("custom-namespaces.yaml");
    std::fs::write(
        &custom_path,
        r#"
activity:
  canonical_app_name: Activity
  views:
    "*":
      type: ping_view
      tables:
      - channel: release
        table: mozdata.activity.events_*
glean-app:
  views:
    baseline:
      type: ping_view
      tables:
      - channel: release
        table: mozdata.handwritten.baseline
"#,
    )
    .unwrap();

    let disallow_path = tmp.path().join("disallowlist.txt");
    std::fs::write(&disallow_path, "# not public\ninternal-*\n").unwrap();

    let registry = run_namespaces(
        &server,
        &tmp,
        Some(custom_path.to_str().unwrap().to_string()),
        Some(disallow_path.to_str().unwrap().to_string()),
    )
    .await;

    assert!(!registry.contains_key("internal-app"));

    // wildcard declaration fanned out into one view per matching table
    let activity = &registry["activity"];
    assert_eq!(activity.canonical_app_name, "Activity");
    assert_eq!(
        activity.views.keys().collect::<Vec<_>>(),
        vec!["events_daily", "events_hourly"]
    );
    assert_eq!(
        activity.views["events_daily"].tables[0].table,
        "mozdata.activity.events_daily"
    );
    assert_eq!(activity.explores["events_daily"].explore_type, "ping_explore");

    // hand-authored view overrides the generated one, other views survive
    let glean = &registry["glean-app"];
    assert_eq!(glean.views["baseline"].tables.len(), 1);
    assert_eq!(
        glean.views["baseline"].tables[0].table,
        "mozdata.handwritten.baseline"
    );
    assert!(glean.views.contains_key("metrics"));
}

#[tokio::test]
async fn listings_failure_propagates() {
    let tmp = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/app-listings");
        then.status(500);
    });

    let config = NamespacesConfig {
        app_listings_uri: server.url("/app-listings"),
        generated_sql_uri: server.url("/generated-sql.zip"),
        custom_namespaces: None,
        disallowlist: None,
        project: "mozdata".to_string(),
        output: "namespaces.yaml".to_string(),
    };
    let storage = LocalStorage::new(tmp.path().to_str().unwrap().to_string());
    let pipeline = NamespacesPipeline::new(storage, config);
    let result = Engine::new(pipeline).run().await;

    assert!(result.is_err());
    assert!(!tmp.path().join("namespaces.yaml").exists());
}
