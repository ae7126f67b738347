#[cfg(feature = "cli")]
pub mod cli;

use crate::adapters::bigquery::DEFAULT_API_BASE;
use crate::domain::ports::{LookmlConfigProvider, NamespacesConfigProvider};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_url, Validate};

/// Arguments of the `namespaces` subcommand.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct NamespacesConfig {
    /// URI of the application listings document
    #[cfg_attr(feature = "cli", arg(long))]
    pub app_listings_uri: String,

    /// URI of the generated-SQL zip archive
    #[cfg_attr(feature = "cli", arg(long))]
    pub generated_sql_uri: String,

    /// Hand-authored namespace declarations (YAML)
    #[cfg_attr(feature = "cli", arg(long))]
    pub custom_namespaces: Option<String>,

    /// Namespace-name patterns to exclude, one per line
    #[cfg_attr(feature = "cli", arg(long))]
    pub disallowlist: Option<String>,

    /// BigQuery project holding the user-facing datasets
    #[cfg_attr(feature = "cli", arg(long, default_value = "mozdata"))]
    pub project: String,

    /// Where to write the registry
    #[cfg_attr(feature = "cli", arg(long, default_value = "namespaces.yaml"))]
    pub output: String,
}

/// Arguments of the `lookml` subcommand.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct LookmlConfig {
    /// The namespace registry to compile
    #[cfg_attr(feature = "cli", arg(long, default_value = "namespaces.yaml"))]
    pub namespaces: String,

    /// Directory the generated files land in
    #[cfg_attr(feature = "cli", arg(long, default_value = "looker-hub"))]
    pub target_dir: String,

    /// Looker connection named in generated models
    #[cfg_attr(feature = "cli", arg(long, default_value = "telemetry"))]
    pub connection: String,

    /// BigQuery REST API base URL
    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_API_BASE))]
    pub bigquery_api: String,

    /// OAuth token for BigQuery requests
    #[cfg_attr(
        feature = "cli",
        arg(long, env = "GOOGLE_OAUTH_ACCESS_TOKEN", hide_env_values = true)
    )]
    pub access_token: Option<String>,
}

impl NamespacesConfigProvider for NamespacesConfig {
    fn app_listings_uri(&self) -> &str {
        &self.app_listings_uri
    }

    fn generated_sql_uri(&self) -> &str {
        &self.generated_sql_uri
    }

    fn project(&self) -> &str {
        &self.project
    }

    fn custom_namespaces_path(&self) -> Option<&str> {
        self.custom_namespaces.as_deref()
    }

    fn disallowlist_path(&self) -> Option<&str> {
        self.disallowlist.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output
    }
}

impl LookmlConfigProvider for LookmlConfig {
    fn namespaces_path(&self) -> &str {
        &self.namespaces
    }

    fn target_dir(&self) -> &str {
        &self.target_dir
    }

    fn connection(&self) -> &str {
        &self.connection
    }
}

impl Validate for NamespacesConfig {
    fn validate(&self) -> Result<()> {
        validate_url("app_listings_uri", &self.app_listings_uri)?;
        validate_url("generated_sql_uri", &self.generated_sql_uri)?;
        validate_non_empty_string("project", &self.project)?;
        validate_path("output", &self.output)?;
        if let Some(path) = &self.custom_namespaces {
            validate_path("custom_namespaces", path)?;
        }
        if let Some(path) = &self.disallowlist {
            validate_path("disallowlist", path)?;
        }
        Ok(())
    }
}

impl Validate for LookmlConfig {
    fn validate(&self) -> Result<()> {
        validate_path("namespaces", &self.namespaces)?;
        validate_path("target_dir", &self.target_dir)?;
        validate_non_empty_string("connection", &self.connection)?;
        validate_url("bigquery_api", &self.bigquery_api)?;
        Ok(())
    }
}
