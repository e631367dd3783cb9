//! NuclearCraft bug report collector entry point.

mod app;
mod config;
mod nickname;
mod prompt;
mod run_log;
mod select;

use std::process::ExitCode;
use std::time::Duration;

use config::Config;
use prompt::ConsolePrompt;

fn main() -> ExitCode {
    let (config, loaded) = settle_config(Config::load());

    run_log::init(&config.log_file);
    tracing::info!("Программа запущена.");
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "starting ncbugreport");

    let result = loaded.and_then(|()| run(&config));
    finish(result, &config, std::thread::sleep)
}

/// Splits a configuration load into the config to run with and the load
/// result. A broken file falls back to defaults so the failure still reaches
/// the run log.
fn settle_config(loaded: anyhow::Result<Config>) -> (Config, anyhow::Result<()>) {
    match loaded {
        Ok(config) => (config, Ok(())),
        Err(e) => (Config::default(), Err(e)),
    }
}

fn run(config: &Config) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let mut prompt = ConsolePrompt::stdio();
    rt.block_on(app::run(config, &mut prompt))
}

/// Reports the outcome and waits out the exit delay on every path.
fn finish(result: anyhow::Result<()>, config: &Config, sleep: impl FnOnce(Duration)) -> ExitCode {
    let code = match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = format!("Ошибка: {e:#}");
            println!("{message}");
            tracing::error!("{message}");
            ExitCode::FAILURE
        }
    };

    println!("Программа закроется через {} секунд...", config.exit_delay_secs);
    sleep(config.exit_delay());
    code
}
