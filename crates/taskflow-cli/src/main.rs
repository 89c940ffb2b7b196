use taskflow_core::config::{AppConfig, default_config_path};

mod cli;
mod commands;
mod logging;

use cli::Command;

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("taskflow error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let config = AppConfig::load(&config_path)?;
    logging::init_logging(args.log_level, config.log_level.as_deref())?;

    match args.command {
        Command::Layout { tasks, levels } => commands::layout::run(&tasks, &config, levels),
        Command::Demo => commands::demo::run(&config).await,
    }
}
