// Export our modules for use in the terminal and web front ends and in tests
pub mod controller;
pub mod dataset;
pub mod domain;
pub mod error;
pub mod render;
pub mod scale;
pub mod view;

pub use controller::{bootstrap, ComparisonController, DashboardState, ViewState};
pub use dataset::{load, DataSource, Datasets, Fetch, Resource};
pub use domain::{Indicator, Mode};
pub use error::{DashboardError, LoadFailure, Result};
pub use view::scene::Scene;
