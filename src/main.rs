use clap::Parser;
use orca_translate::utils::{logger, validation::Validate};
use orca_translate::{CliConfig, EtlEngine, EtlError, LocalStorage, TomlConfig, TranslationPipeline};

fn exit_with(e: &EtlError) -> ! {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting orca-translate");

    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        match TomlConfig::from_file(&path) {
            Ok(file) => file.apply_to(&mut config),
            Err(e) => exit_with(&e),
        }
    }
    tracing::debug!("Effective config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = match TranslationPipeline::new(storage, &config) {
        Ok(pipeline) => pipeline,
        Err(e) => exit_with(&e),
    };

    if config.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no requests will be sent");
        for iteration in 1..=config.iterations {
            match pipeline.dataset().page_url(iteration) {
                Ok(url) => println!("{}: {}", iteration, url),
                Err(e) => exit_with(&e),
            }
        }
        return Ok(());
    }

    let engine = EtlEngine::new(pipeline, config.iterations);
    match engine.run().await {
        Ok(summary) => {
            tracing::info!(
                "✅ Completed {} iterations, {} records in {}",
                summary.iterations_completed,
                summary.records_in_file,
                summary.output_location
            );
            println!(
                "✅ Wrote {} records ({} total) to {}",
                summary.iterations_completed, summary.records_in_file, summary.output_location
            );
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}
