use clap::Parser;
use color_eyre::Result;
use health_dashboard_tui::app::App;
use health_dashboard_tui::cli::CliArgs;
use health_dashboard_tui::config::AppConfig;
use health_dashboard_tui::logging::{self, LogTarget};
use health_dashboard_tui::{event, report, terminal};

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = AppConfig::from_env()?;

    // Run without a UI when asked to, or when stdout is not a terminal
    if args.headless || !is_terminal() {
        logging::init(LogTarget::Stderr, config.debug)?;
        return report::run_headless(&config.data_source(), config.initial_mode, args.json).await;
    }

    logging::init(LogTarget::File(&config.log_file), config.debug)?;

    let mut app = App::new(config.initial_mode);
    let mut terminal = terminal::setup()?;

    let result = event::run(&mut terminal, &mut app, &config.data_source()).await;

    terminal::cleanup(true, true);

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
