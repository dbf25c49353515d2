use std::io::ErrorKind;

use health_core::{Fetch, LoadFailure};
use tracing::debug;

/// Reads dataset documents from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

impl Fetch for FileFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, LoadFailure> {
        debug!(path = url, "reading dataset file");
        tokio::fs::read_to_string(url)
            .await
            .map_err(|error| match error.kind() {
                ErrorKind::NotFound => LoadFailure::Status(404),
                ErrorKind::PermissionDenied => LoadFailure::Status(403),
                ErrorKind::InvalidData => LoadFailure::Malformed(error.to_string()),
                _ => LoadFailure::Transport(error.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use health_core::{load, DataSource, Mode, Scene};

    fn repo_root() -> String {
        format!("{}/../..", env!("CARGO_MANIFEST_DIR"))
    }

    #[tokio::test]
    async fn missing_file_reads_as_not_found() {
        let failure = FileFetcher
            .fetch_text("no/such/dataset.json")
            .await
            .unwrap_err();
        assert_eq!(failure, LoadFailure::Status(404));
    }

    #[tokio::test]
    async fn loads_the_shipped_sample_data() {
        let datasets = load(&FileFetcher, &DataSource::new(repo_root()))
            .await
            .unwrap();
        assert_eq!(datasets.region.display_name("?"), "Sharqia");

        let mut scene = Scene::new();
        let controller = health_core::bootstrap(Ok(datasets), Mode::Local, &mut scene);
        assert!(controller.is_some());
        assert_eq!(scene.charts().len(), 2);
    }
}
