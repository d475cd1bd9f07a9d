use clap::Parser;
use kldo_miner::config::toml_config::TomlConfig;
use kldo_miner::utils::{banner, logger, validation::Validate};
use kldo_miner::{CliConfig, MinerSettings, MiningCoordinator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting kldo-miner");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let mut settings = MinerSettings::from_cli(&cli);

    if let Some(config_path) = &cli.config {
        tracing::info!("Loading configuration from: {}", config_path);
        let toml_config = match TomlConfig::from_file(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", config_path, e);
                eprintln!("💡 {}", e.recovery_suggestion());
                std::process::exit(1);
            }
        };
        if let Err(e) = toml_config.validate() {
            tracing::error!("Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
        toml_config.apply(&mut settings);
    }

    if let Err(e) = settings.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    banner::display_banner();

    let coordinator = MiningCoordinator::new(settings);

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Shutdown signal received");
    };

    match coordinator.run(shutdown).await {
        Ok(summary) => {
            tracing::info!(
                "=== Final summary ===\n\
                 \twallets: {}\n\
                 \ttotal paid: {:.8} KLDO",
                summary.wallets,
                summary.total_paid
            );
            println!(
                "✅ Mined with {} wallet(s), total paid: {:.8} KLDO",
                summary.wallets, summary.total_paid
            );
        }
        Err(e) => {
            tracing::error!(
                "Mining run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                kldo_miner::utils::error::ErrorSeverity::Low => 0,
                kldo_miner::utils::error::ErrorSeverity::Medium => 2,
                kldo_miner::utils::error::ErrorSeverity::High => 1,
                kldo_miner::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
