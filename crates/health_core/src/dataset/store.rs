use std::fmt;
use std::path::Path;

use tracing::{debug, warn};

use crate::dataset::{Datasets, GeoBoundary, RegionDataset};
use crate::domain::Indicator;
use crate::error::{DashboardError, LoadFailure, Result};

/// The four static documents the dashboard needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Region,
    National,
    Global,
    Boundaries,
}

impl Resource {
    pub const ALL: [Self; 4] = [Self::Region, Self::National, Self::Global, Self::Boundaries];

    pub const fn path(self) -> &'static str {
        match self {
            Self::Region => "data/sharqia_data.json",
            Self::National => "data/egypt_data.json",
            Self::Global => "data/world_data.json",
            Self::Boundaries => "data/districts.geo.json",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Transport used to read a resource body.
///
/// The terminal reads files, the browser calls `fetch`, tests script answers.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    async fn fetch_text(&self, url: &str) -> std::result::Result<String, LoadFailure>;
}

/// Base path the resource paths are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    base: String,
}

impl DataSource {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.is_empty() && !base.ends_with('/') {
            base.push('/');
        }
        Self { base }
    }

    /// Paths relative to the page (or working directory).
    pub const fn relative() -> Self {
        Self {
            base: String::new(),
        }
    }

    /// Directory of the page, so an app served from `/repo/` finds
    /// `/repo/data/...`.
    pub fn from_page_path(pathname: &str) -> Self {
        let path = pathname.trim();
        match path.rsplit_once('/') {
            Some((dir, last)) if is_page_file(last) => Self::new(format!("{dir}/")),
            Some(_) => Self::new(path),
            None if is_page_file(path) => Self::relative(),
            None => Self::new(path),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn is_relative(&self) -> bool {
        self.base.is_empty()
    }

    pub fn url(&self, resource: Resource) -> String {
        format!("{}{}", self.base, resource.path())
    }
}

fn is_page_file(segment: &str) -> bool {
    Path::new(segment)
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            extension.eq_ignore_ascii_case("html") || extension.eq_ignore_ascii_case("htm")
        })
}

/// Loads all four datasets, retrying once relative to the page when the
/// primary base fails.
pub async fn load<F: Fetch>(fetcher: &F, source: &DataSource) -> Result<Datasets> {
    match load_from(fetcher, source).await {
        Ok(datasets) => Ok(datasets),
        Err(error) if source.is_relative() => Err(error),
        Err(error) => {
            warn!(
                base = source.base(),
                %error,
                "primary data path failed, retrying with relative paths"
            );
            load_from(fetcher, &DataSource::relative()).await
        }
    }
}

async fn load_from<F: Fetch>(fetcher: &F, source: &DataSource) -> Result<Datasets> {
    let region = fetch_dataset(fetcher, source, Resource::Region, Indicator::Diabetes).await?;
    let national =
        fetch_dataset(fetcher, source, Resource::National, Indicator::InfantMortality).await?;
    let global =
        fetch_dataset(fetcher, source, Resource::Global, Indicator::LifeExpectancy).await?;

    let body = fetch_body(fetcher, source, Resource::Boundaries).await?;
    let boundaries = GeoBoundary::from_json(&body)
        .map_err(|failure| DashboardError::data_unavailable(Resource::Boundaries, failure))?;

    debug!(
        districts = region.entities.len(),
        governorates = national.entities.len(),
        regions = global.entities.len(),
        features = boundaries.features.len(),
        "datasets loaded"
    );

    Ok(Datasets {
        region,
        national,
        global,
        boundaries,
    })
}

async fn fetch_dataset<F: Fetch>(
    fetcher: &F,
    source: &DataSource,
    resource: Resource,
    required: Indicator,
) -> Result<RegionDataset> {
    let body = fetch_body(fetcher, source, resource).await?;
    RegionDataset::from_json(&body, required)
        .map_err(|failure| DashboardError::data_unavailable(resource, failure))
}

async fn fetch_body<F: Fetch>(
    fetcher: &F,
    source: &DataSource,
    resource: Resource,
) -> Result<String> {
    let url = source.url(resource);
    debug!(%url, "fetching dataset");
    fetcher
        .fetch_text(&url)
        .await
        .map_err(|failure| DashboardError::data_unavailable(resource, failure))
}
