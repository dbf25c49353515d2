use clap::{CommandFactory, Parser};

#[derive(Debug, Parser)]
#[command(
    name = "health-dashboard",
    version,
    about = "Sharqia health indicators compared with Egypt and the world"
)]
pub struct CliArgs {
    /// Print the selected mode's cards and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Directory holding the data/ folder
    #[arg(long = "data-dir", value_name = "PATH")]
    pub data_dir: Option<String>,

    /// Comparison mode to start in: local, national or global
    #[arg(long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Log file used while the dashboard owns the terminal
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,
}

impl CliArgs {
    /// Command-line values win over `.env` and the environment.
    pub fn apply_env_overrides(&self) {
        if let Some(dir) = &self.data_dir {
            std::env::set_var("DASHBOARD_DATA_DIR", dir);
        }
        if let Some(mode) = &self.mode {
            std::env::set_var("DASHBOARD_MODE", mode);
        }
        if let Some(path) = &self.log_file {
            std::env::set_var("DASHBOARD_LOG_FILE", path);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_flag() {
        let args = CliArgs::parse_from([
            "health-dashboard",
            "--headless",
            "--json",
            "--mode",
            "global",
            "--data-dir",
            "/srv/dashboard",
        ]);
        assert!(args.headless);
        assert!(args.json);
        assert_eq!(args.mode.as_deref(), Some("global"));
        assert_eq!(args.data_dir.as_deref(), Some("/srv/dashboard"));
        assert!(args.log_file.is_none());
    }

    #[test]
    fn help_mentions_modes() {
        assert!(CliArgs::help_text().contains("local, national or global"));
    }
}
