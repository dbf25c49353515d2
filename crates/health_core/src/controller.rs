//! Comparison Controller
//!
//! Owns the loaded datasets and the handles of the active mode. Every mode
//! entry, including re-entering the active mode, tears the previous views
//! down before the next renderer runs.

use tracing::{error, info};

use crate::dataset::Datasets;
use crate::domain::Mode;
use crate::error::Result;
use crate::render::render_mode;
use crate::view::registry::ViewRegistry;
use crate::view::Surface;

/// What is currently on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub active_mode: Option<Mode>,
    pub registry: ViewRegistry,
}

/// Everything the dashboard holds once loading succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub datasets: Datasets,
    pub view: ViewState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonController {
    state: DashboardState,
}

impl ComparisonController {
    pub fn new(datasets: Datasets) -> Self {
        Self {
            state: DashboardState {
                datasets,
                view: ViewState::default(),
            },
        }
    }

    /// Clears the current views, then renders `mode`.
    pub fn select<S: Surface + ?Sized>(&mut self, mode: Mode, surface: &mut S) {
        info!(
            from = self.state.view.active_mode.map(Mode::as_str),
            to = mode.as_str(),
            "switching mode"
        );
        let DashboardState { datasets, view } = &mut self.state;
        view.registry.clear(surface);
        render_mode(mode, datasets, surface, &mut view.registry);
        view.active_mode = Some(mode);
    }

    /// Next mode in selector order, wrapping around.
    pub fn cycle<S: Surface + ?Sized>(&mut self, forward: bool, surface: &mut S) {
        let current = self.active_mode().unwrap_or_default().index();
        let count = Mode::ALL.len();
        let next = if forward {
            (current + 1) % count
        } else {
            (current + count - 1) % count
        };
        if let Some(mode) = Mode::from_index(next) {
            self.select(mode, surface);
        }
    }

    pub const fn active_mode(&self) -> Option<Mode> {
        self.state.view.active_mode
    }

    pub const fn datasets(&self) -> &Datasets {
        &self.state.datasets
    }

    pub const fn registry(&self) -> &ViewRegistry {
        &self.state.view.registry
    }

    pub const fn state(&self) -> &DashboardState {
        &self.state
    }
}

/// Turns a load result into a running controller showing `initial`.
///
/// On failure the error message goes into the cards area and no controller
/// is built.
pub fn bootstrap<S: Surface + ?Sized>(
    loaded: Result<Datasets>,
    initial: Mode,
    surface: &mut S,
) -> Option<ComparisonController> {
    match loaded {
        Ok(datasets) => {
            let mut controller = ComparisonController::new(datasets);
            controller.select(initial, surface);
            Some(controller)
        }
        Err(failure) => {
            error!(error = %failure, "dashboard data could not be loaded");
            if let Err(shown) = surface.show_error(&failure.to_string()) {
                error!(error = %shown, "error message could not be shown");
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{GeoBoundary, RegionDataset, Resource};
    use crate::domain::Indicator;
    use crate::error::{DashboardError, LoadFailure};
    use crate::view::scene::{CardsView, Scene};
    use crate::view::ChartSlot;

    fn datasets() -> Datasets {
        let region = RegionDataset::from_json(
            r#"{"name": "Sharqia", "districts": ["Zagazig", "Belbeis"],
                "indicators": {"diabetes": {"values": [18, 12], "years": [2021], "trend": [17]},
                               "infantMortality": {"values": [18, 17], "years": [2021], "trend": [18]}}}"#,
            Indicator::Diabetes,
        )
        .unwrap();
        let national = RegionDataset::from_json(
            r#"{"name": "Egypt", "governorates": ["Sharqia"],
                "indicators": {"infantMortality": {"values": [18], "years": [2021], "trend": [17]}},
                "locations": [{"lat": 30.7, "lng": 31.6, "population": 7000000}]}"#,
            Indicator::InfantMortality,
        )
        .unwrap();
        let global = RegionDataset::from_json(
            r#"{"regions": ["Africa"], "indicators": {"lifeExpectancy": {"values": [64]}}}"#,
            Indicator::LifeExpectancy,
        )
        .unwrap();
        Datasets {
            region,
            national,
            global,
            boundaries: GeoBoundary::default(),
        }
    }

    #[test]
    fn bootstrap_renders_initial_mode() {
        let mut scene = Scene::new();
        let controller = bootstrap(Ok(datasets()), Mode::National, &mut scene).unwrap();
        assert_eq!(controller.active_mode(), Some(Mode::National));
        assert!(scene.chart(ChartSlot::Comparison).is_some());
    }

    #[test]
    fn bootstrap_failure_shows_error_only() {
        let mut scene = Scene::new();
        let failure = DashboardError::data_unavailable(Resource::Region, LoadFailure::Status(404));
        assert!(bootstrap(Err(failure), Mode::Local, &mut scene).is_none());
        assert_eq!(
            scene.cards(),
            &CardsView::Error("Data unavailable: data/sharqia_data.json (status 404)".to_string())
        );
        assert!(scene.charts().is_empty());
        assert!(scene.layers().is_empty());
    }

    #[test]
    fn reselecting_a_mode_does_not_stack_views() {
        let mut scene = Scene::new();
        let mut controller = ComparisonController::new(datasets());
        controller.select(Mode::Local, &mut scene);
        let first = scene.layers().len();
        controller.select(Mode::Local, &mut scene);

        assert_eq!(scene.charts().len(), 2);
        assert_eq!(scene.layers().len(), first);
        assert_eq!(controller.registry().layers().len(), first);
    }

    #[test]
    fn cycle_wraps_in_both_directions() {
        let mut scene = Scene::new();
        let mut controller = ComparisonController::new(datasets());
        controller.cycle(false, &mut scene);
        assert_eq!(controller.active_mode(), Some(Mode::Global));
        controller.cycle(true, &mut scene);
        assert_eq!(controller.active_mode(), Some(Mode::Local));
    }
}
