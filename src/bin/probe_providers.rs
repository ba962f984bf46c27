use clap::Parser;
use scalp_place_finder::domain::ports::PlaceProvider;
use scalp_place_finder::utils::{logger, validation::Validate};
use scalp_place_finder::{KakaoLocalAdapter, NaverLocalAdapter, TomlConfig};
use std::sync::Arc;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "probe-providers")]
#[command(about = "Check whether the Kakao and Naver local search APIs are reachable")]
struct Args {
    /// TOML 配置檔；省略時從環境變數讀取金鑰
    #[arg(short, long)]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let config = match &args.config {
        Some(path) => TomlConfig::from_file(path)?,
        None => TomlConfig::from_env(),
    };
    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e);
        eprintln!("💡 建議: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let providers: Vec<Arc<dyn PlaceProvider>> = vec![
        Arc::new(KakaoLocalAdapter::new(config.providers.kakao.clone())),
        Arc::new(NaverLocalAdapter::new(config.providers.naver.clone())),
    ];

    println!("🩺 Probing {} providers", providers.len());
    let mut failures = 0;
    for provider in &providers {
        let started = Instant::now();
        let result = provider.health_check().await;
        let elapsed = started.elapsed().as_millis();
        match result {
            Ok(()) => println!("✅ {:<6} healthy ({} ms)", provider.kind(), elapsed),
            Err(e) => {
                failures += 1;
                println!("❌ {:<6} {} ({} ms)", provider.kind(), e, elapsed);
                println!("   💡 {}", e.recovery_suggestion());
            }
        }
    }

    // 0: 全部正常, 2: 部分失敗, 3: 全部失敗
    let exit_code = match failures {
        0 => 0,
        n if n == providers.len() => 3,
        _ => 2,
    };
    if exit_code > 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
