use clap::Parser;
use lookml_generator::config::cli::{Cli, Commands};
use lookml_generator::utils::error::{ErrorSeverity, GenError};
use lookml_generator::utils::{logger, validation::Validate};
use lookml_generator::{BigQueryCatalog, Engine, LocalStorage, LookmlPipeline, NamespacesPipeline};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting lookml-generator");

    let result = match cli.command {
        Commands::Namespaces(config) => {
            if cli.verbose {
                tracing::debug!("namespaces config: {:?}", config);
            }
            if let Err(e) = config.validate() {
                exit_on_invalid_config(e);
            }
            let storage = LocalStorage::new(".".to_string());
            let pipeline = NamespacesPipeline::new(storage, config);
            Engine::new_with_monitoring(pipeline, cli.monitor).run().await
        }
        Commands::Lookml(config) => {
            if cli.verbose {
                tracing::debug!("lookml config: {:?}", config);
            }
            if let Err(e) = config.validate() {
                exit_on_invalid_config(e);
            }
            let catalog =
                BigQueryCatalog::new(config.bigquery_api.clone(), config.access_token.clone());
            let storage = LocalStorage::new(config.target_dir.clone());
            let pipeline = LookmlPipeline::new(storage, config, catalog);
            Engine::new_with_monitoring(pipeline, cli.monitor).run().await
        }
    };

    match result {
        Ok(output_path) => {
            tracing::info!("Generation completed successfully");
            println!("Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "Generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("{}", e.user_friendly_message());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

fn exit_on_invalid_config(e: GenError) -> ! {
    tracing::error!("Configuration validation failed: {}", e);
    eprintln!("{}", e.user_friendly_message());
    eprintln!("Suggestion: {}", e.recovery_suggestion());
    std::process::exit(1);
}
