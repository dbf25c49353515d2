use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use color_eyre::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    /// Headless runs; the terminal is not taken over
    Stderr,
    /// Interactive runs; stderr would tear through the alternate screen
    File(&'a Path),
}

fn default_directive(debug: bool) -> &'static str {
    if debug {
        "health_core=debug,health_dashboard_tui=debug"
    } else {
        "warn"
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `debug`.
pub fn init(target: LogTarget<'_>, debug: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));
    let registry = Registry::default().with(filter);

    match target {
        LogTarget::Stderr => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()?,
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            registry
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::default_directive;

    #[test]
    fn debug_raises_dashboard_crates_only() {
        assert_eq!(default_directive(false), "warn");
        assert!(default_directive(true).contains("health_core=debug"));
    }
}
