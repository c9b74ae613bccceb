use clap::Parser;
use school_roster::app::commands;
use school_roster::config::LogFormat;
use school_roster::utils::logger;
use school_roster::{CliConfig, ConsoleMenu, Result};
use std::io;

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    match config.log_format {
        LogFormat::Compact => logger::init_cli_logger(config.verbose),
        LogFormat::Json => logger::init_json_logger(config.verbose),
    }

    tracing::debug!("Starting school-roster CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(config) {
        tracing::error!(
            "❌ school-roster failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = e.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

fn run(config: CliConfig) -> Result<()> {
    let settings = config.settings()?;
    tracing::debug!("Resolved settings: {:?}", settings);

    match config.command {
        Some(command) => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            commands::execute(command, &settings, &mut out)
        }
        None => {
            let stdin = io::stdin();
            let mut menu = ConsoleMenu::new(
                settings.persistence()?,
                &settings.data_file,
                stdin.lock(),
                io::stdout(),
            )?;
            menu.run()
        }
    }
}
