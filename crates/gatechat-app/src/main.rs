mod bootstrap;
mod cli;
mod commands;
mod repl;
mod terminal;

use std::process::ExitCode;

use gatechat_common::GatechatError;
use gatechat_config::schema::LogLevel;
use gatechat_config::ChatConfig;
use tokio::sync::mpsc::unbounded_channel;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

/// Load environment variables from a .env file (KEY=VALUE lines).
///
/// Variables already set in the environment win.
fn load_dotenv() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        std::path::PathBuf::from(".env"),
        // Workspace root, two levels up from crates/gatechat-app/
        manifest_dir.join("..").join("..").join(".env"),
    ];

    for path in &candidates {
        let Ok(contents) = std::fs::read_to_string(path) else {
            continue;
        };
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim().trim_matches('"').trim_matches('\'');
                if std::env::var(key).is_err() {
                    std::env::set_var(key, value);
                }
            }
        }
        return;
    }
}

/// Flag beats config; an unparsable flag falls back to the config level.
fn init_logging(flag: Option<&str>, level: LogLevel) {
    let directive: Directive = match flag.and_then(|d| d.parse().ok()) {
        Some(directive) => directive,
        None => level
            .directive()
            .parse()
            .unwrap_or_else(|_| LevelFilter::INFO.into()),
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();
}

async fn run(config: ChatConfig) -> gatechat_common::Result<()> {
    gatechat_platform::paths::ensure_dirs()?;

    let (display, intents) = unbounded_channel();
    let renderer = tokio::spawn(terminal::run(intents));

    let session = bootstrap::build(&config, display.clone())?;
    let result = repl::run(session, display).await;

    // Every sender is gone once the loop returns; let the renderer drain.
    if let Err(e) = renderer.await {
        tracing::warn!("renderer task failed: {e}");
    }
    result.map_err(GatechatError::from)
}

fn main() -> ExitCode {
    load_dotenv();
    let args = cli::parse();

    let config = match gatechat_config::load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("gatechat: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(args.log_level.as_deref(), config.logging.level);
    tracing::info!("Gatechat v{} starting...", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        model = %config.gemini.model,
        keys = config.gemini.api_keys.len(),
        expiry_hours = config.access.expiry_hours,
        "config loaded"
    );

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("gatechat: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(config)) {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("gatechat: {e}");
            ExitCode::FAILURE
        }
    }
}
