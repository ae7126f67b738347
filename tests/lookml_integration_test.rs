use httpmock::prelude::*;
use lookml_generator::{BigQueryCatalog, Engine, LocalStorage, LookmlConfig, LookmlPipeline};
use tempfile::TempDir;

fn glean_baseline_schema() -> serde_json::Value {
    serde_json::json!({
        "schema": {
            "fields": [
                {
                    "name": "client_info",
                    "type": "RECORD",
                    "fields": [
                        {"name": "client_id", "type": "STRING"},
                        {"name": "parsed_first_run_date", "type": "DATE"}
                    ]
                },
                {
                    "name": "metadata",
                    "type": "RECORD",
                    "fields": [
                        {
                            "name": "geo",
                            "type": "RECORD",
                            "fields": [{"name": "country", "type": "STRING"}]
                        },
                        {
                            "name": "header",
                            "type": "RECORD",
                            "fields": [
                                {"name": "date", "type": "STRING"},
                                {"name": "parsed_date", "type": "TIMESTAMP"}
                            ]
                        }
                    ]
                },
                {"name": "parsed_timestamp", "type": "TIMESTAMP"},
                {"name": "submission_timestamp", "type": "TIMESTAMP"},
                {"name": "submission_date", "type": "DATE"},
                {"name": "test_bignumeric", "type": "BIGNUMERIC"},
                {"name": "test_bool", "type": "BOOLEAN"},
                {"name": "test_bytes", "type": "BYTES"},
                {"name": "test_float64", "type": "FLOAT"},
                {"name": "test_int64", "type": "INTEGER"},
                {"name": "test_numeric", "type": "NUMERIC"},
                {"name": "test_string", "type": "STRING"}
            ]
        }
    })
}

fn custom_baseline_schema() -> serde_json::Value {
    serde_json::json!({
        "schema": {
            "fields": [
                {"name": "client_id", "type": "STRING"},
                {"name": "country", "type": "STRING"},
                {"name": "document_id", "type": "STRING"}
            ]
        }
    })
}

async fn run_lookml(server: &MockServer, tmp: &TempDir, namespaces_yaml: &str) -> Result<String, lookml_generator::GenError> {
    let namespaces_path = tmp.path().join("namespaces.yaml");
    std::fs::write(&namespaces_path, namespaces_yaml).unwrap();
    let target_dir = tmp.path().join("looker-hub");

    let config = LookmlConfig {
        namespaces: namespaces_path.to_str().unwrap().to_string(),
        target_dir: target_dir.to_str().unwrap().to_string(),
        connection: "telemetry".to_string(),
        bigquery_api: server.base_url(),
        access_token: None,
    };
    let catalog = BigQueryCatalog::new(config.bigquery_api.clone(), None);
    let storage = LocalStorage::new(config.target_dir.clone());
    let pipeline = LookmlPipeline::new(storage, config, catalog);
    Engine::new(pipeline).run().await
}

const NAMESPACES_YAML: &str = r#"
custom:
  canonical_app_name: Custom
  views:
    baseline:
      type: ping_view
      tables:
      - channel: release
        table: mozdata.custom.baseline
glean-app:
  canonical_app_name: Glean App
  views:
    baseline:
      type: ping_view
      tables:
      - channel: release
        table: mozdata.glean_app.baseline
      - channel: beta
        table: mozdata.glean_app_beta.baseline
  explores:
    baseline:
      type: ping_explore
      views:
        base_view: baseline
"#;

#[tokio::test]
async fn generates_views_explores_and_models() {
    let tmp = TempDir::new().unwrap();
    let server = MockServer::start();
    let custom_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/projects/mozdata/datasets/custom/tables/baseline");
        then.status(200).json_body(custom_baseline_schema());
    });
    let glean_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/projects/mozdata/datasets/glean_app/tables/baseline");
        then.status(200).json_body(glean_baseline_schema());
    });

    let output = run_lookml(&server, &tmp, NAMESPACES_YAML).await.unwrap();
    custom_mock.assert();
    // only the release table's schema is fetched, never the beta one
    glean_mock.assert();

    let hub = tmp.path().join("looker-hub");
    assert_eq!(output, hub.to_str().unwrap());

    let custom_view =
        std::fs::read_to_string(hub.join("custom/views/baseline.view.lkml")).unwrap();
    let expected_custom = "\
view: baseline {
  sql_table_name: `mozdata.custom.baseline` ;;

  dimension: client_id {
    hidden: yes
    sql: ${TABLE}.client_id ;;
  }

  dimension: country {
    map_layer_name: countries
    type: string
    sql: ${TABLE}.country ;;
  }

  dimension: document_id {
    hidden: yes
    sql: ${TABLE}.document_id ;;
  }

  measure: clients {
    type: count_distinct
    sql: ${client_id} ;;
  }

  measure: ping_count {
    type: count
  }
}
";
    assert_eq!(custom_view, expected_custom);

    let glean_view =
        std::fs::read_to_string(hub.join("glean-app/views/baseline.view.lkml")).unwrap();

    // channel parameter carries one allowed value per table
    assert!(glean_view.contains("  parameter: channel {\n    type: unquoted\n"));
    assert!(glean_view
        .contains("      label: \"Release\"\n      value: \"mozdata.glean_app.baseline\""));
    assert!(glean_view
        .contains("      label: \"Beta\"\n      value: \"mozdata.glean_app_beta.baseline\""));
    assert!(glean_view.contains("  sql_table_name: `{% parameter channel %}` ;;"));

    // nested fields flatten with group labels
    assert!(glean_view.contains(
        "  dimension: metadata__geo__country {\n    map_layer_name: countries\n    group_item_label: \"Country\"\n    group_label: \"Metadata Geo\"\n    type: string\n    sql: ${TABLE}.metadata.geo.country ;;\n  }"
    ));
    assert!(glean_view.contains(
        "  dimension: client_info__client_id {\n    hidden: yes\n    sql: ${TABLE}.client_info.client_id ;;\n  }"
    ));

    // date columns strip the suffix and keep date timeframes
    assert!(glean_view.contains("  dimension_group: client_info__parsed_first_run {"));
    assert!(glean_view.contains("    convert_tz: no\n    datatype: date\n"));

    // submission_timestamp wins over submission_date
    assert_eq!(glean_view.matches("dimension_group: submission {").count(), 1);
    assert!(glean_view.contains("    sql: ${TABLE}.submission_timestamp ;;"));

    assert!(glean_view.contains("  measure: clients {\n    type: count_distinct\n    sql: ${client_info__client_id} ;;\n  }"));
    assert!(!glean_view.contains("measure: ping_count"));

    let explore =
        std::fs::read_to_string(hub.join("glean-app/explores/baseline.explore.lkml")).unwrap();
    let expected_explore = "\
include: \"/looker-hub/glean-app/views/*.view.lkml\"

explore: baseline {
  view_name: baseline
}
";
    assert_eq!(explore, expected_explore);

    // spoke scaffolding ran for both namespaces
    for namespace in ["custom", "glean-app"] {
        for sub_dir in ["views", "explores", "dashboards"] {
            assert!(hub.join(namespace).join(sub_dir).is_dir());
        }
    }
    let model = std::fs::read_to_string(hub.join("glean-app/glean-app.model.lkml")).unwrap();
    assert!(model.contains("connection: \"telemetry\""));
    assert!(model.contains("label: \"Glean App\""));
    assert!(model.contains("include: \"//looker-hub/glean-app/explores/*\""));
}

#[tokio::test]
async fn duplicate_dimension_fails_with_table_diagnostic() {
    let tmp = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/projects/mozdata/datasets/fail/tables/duplicate_dimension");
        then.status(200).json_body(serde_json::json!({
            "schema": {
                "fields": [
                    {"name": "parsed_timestamp", "type": "TIMESTAMP"},
                    {"name": "parsed_date", "type": "DATE"}
                ]
            }
        }));
    });

    let yaml = r#"
custom:
  canonical_app_name: Custom
  views:
    baseline:
      type: ping_view
      tables:
      - channel: release
        table: mozdata.fail.duplicate_dimension
"#;
    let err = run_lookml(&server, &tmp, yaml).await.unwrap_err();
    assert_eq!(
        err.user_friendly_message(),
        "Error: duplicate dimension 'parsed' for table 'mozdata.fail.duplicate_dimension'"
    );
}

#[tokio::test]
async fn duplicate_measure_fails_with_table_diagnostic() {
    let tmp = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/projects/mozdata/datasets/fail/tables/duplicate_measure");
        then.status(200).json_body(serde_json::json!({
            "schema": {
                "fields": [
                    {
                        "name": "client_info",
                        "type": "RECORD",
                        "fields": [{"name": "client_id", "type": "STRING"}]
                    },
                    {"name": "client_id", "type": "STRING"}
                ]
            }
        }));
    });

    let yaml = r#"
custom:
  canonical_app_name: Custom
  views:
    baseline:
      type: ping_view
      tables:
      - channel: release
        table: mozdata.fail.duplicate_measure
"#;
    let err = run_lookml(&server, &tmp, yaml).await.unwrap_err();
    assert_eq!(
        err.user_friendly_message(),
        "Error: duplicate measure 'clients' for table 'mozdata.fail.duplicate_measure'"
    );
}

#[tokio::test]
async fn existing_namespace_directory_is_preserved() {
    let tmp = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(custom_baseline_schema());
    });

    let yaml = r#"
custom:
  canonical_app_name: Custom
  views:
    baseline:
      type: ping_view
      tables:
      - channel: release
        table: mozdata.custom.baseline
"#;
    run_lookml(&server, &tmp, yaml).await.unwrap();

    let marker = tmp.path().join("looker-hub/custom/tmp-file");
    std::fs::write(&marker, "hello, world").unwrap();

    run_lookml(&server, &tmp, yaml).await.unwrap();
    assert!(marker.is_file());

    // generated view content is still refreshed on the second run
    assert!(tmp
        .path()
        .join("looker-hub/custom/views/baseline.view.lkml")
        .is_file());
}
