mod cache;
mod cli;
mod config;
mod error;
mod fallback;
mod history;
mod interactive;
mod providers;
mod translator;

use cli::CliHandler;
use config::ConfigManager;
use interactive::InteractiveMode;
use std::sync::Arc;

fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level.trim().to_lowercase());
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    let config_path = ConfigManager::get_default_config_path()?;
    let config_manager = Arc::new(ConfigManager::new(config_path.to_string_lossy().as_ref())?);
    init_logging(&config_manager.get_config().log_level);

    let rt = tokio::runtime::Runtime::new()?;

    if args.len() > 1 {
        let cli = CliHandler::new(config_manager)?;
        if let Err(e) = rt.block_on(cli.process_args(args)) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    } else {
        let interactive = InteractiveMode::new(config_manager)?;
        rt.block_on(interactive.start())?;
    }

    Ok(())
}
