use crate::config::{LookmlConfig, NamespacesConfig};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "lookml-generator")]
#[command(about = "Generate a namespace registry and LookML from BigQuery metadata")]
pub struct Cli {
    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log process statistics per stage")]
    pub monitor: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Merge app listings, table listings and custom declarations into
    /// namespaces.yaml
    Namespaces(NamespacesConfig),
    /// Compile namespaces.yaml plus live table schemas into LookML files
    Lookml(LookmlConfig),
}
