use anyhow::Context;
use clap::Parser;
use scalp_place_finder::app::{render_csv, render_json, render_table};
use scalp_place_finder::utils::{logger, validation::Validate};
use scalp_place_finder::{
    annotate_recommendations, CliConfig, OutputFormat, SearchOrchestrator, StageRecommendation,
    TomlConfig,
};
use tokio_util::sync::CancellationToken;

fn load_config(cli: &CliConfig) -> anyhow::Result<TomlConfig> {
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            TomlConfig::from_file(path).with_context(|| format!("failed to load config file '{}'", path))?
        }
        None => TomlConfig::from_env(),
    };

    if let Err(e) = config.validate() {
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        return Err(e).context("configuration validation failed");
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting scalp-place-finder");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證參數
    if let Err(e) = cli.validate() {
        tracing::error!("❌ Argument validation failed: {}", e);
        eprintln!("❌ {}", e);
        eprintln!("💡 建議: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let config = load_config(&cli)?;
    let orchestrator = SearchOrchestrator::from_config(&config).context("failed to build search")?;

    // Ctrl-C 取消進行中的搜尋
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("🛑 Received Ctrl-C, cancelling search");
            signal_token.cancel();
        }
    });

    let mut outcome = orchestrator
        .search_places_with_cancel(&cli.query, cli.location(), cli.radius, cancel)
        .await;

    if let Some(stage) = cli.stage {
        let policy = StageRecommendation::for_stage(stage);
        annotate_recommendations(&mut outcome.places, &policy);
    }

    let rendered = match cli.format {
        OutputFormat::Table => render_table(&outcome),
        OutputFormat::Json => render_json(&outcome).context("failed to render JSON")?,
        OutputFormat::Csv => render_csv(&outcome.places).context("failed to render CSV")?,
    };
    println!("{}", rendered);

    if outcome.cancelled {
        std::process::exit(130);
    }
    Ok(())
}
