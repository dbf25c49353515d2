//! Adapter interface between the mode renderers and whatever draws charts,
//! maps and cards.
//!
//! Renderers only ever build the declarative specs below and hand them to a
//! sink; sinks return handles that the [`registry::ViewRegistry`] owns.

pub mod registry;
pub mod scene;

use std::fmt;

use serde::Serialize;

use crate::dataset::{Bounds, GeoPoint};
use crate::domain::Indicator;
use crate::error::Result;
use crate::scale::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ChartHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LayerHandle(pub u64);

impl LayerHandle {
    /// The tile layer every map starts with; never removed.
    pub const BASE: Self = Self(0);
}

/// Containers a render step writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Cards,
    ComparisonChart,
    TrendChart,
    Map,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cards => "cards container",
            Self::ComparisonChart => "comparison chart",
            Self::TrendChart => "trend chart",
            Self::Map => "map container",
        })
    }
}

/// The two chart canvases on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartSlot {
    Comparison,
    Trend,
}

impl ChartSlot {
    pub const fn target(self) -> Target {
        match self {
            Self::Comparison => Target::ComparisonChart,
            Self::Trend => Target::TrendChart,
        }
    }
}

impl fmt::Display for ChartSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.target().fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    pub label: String,
    pub values: Vec<f64>,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AxisOptions {
    pub begin_at_zero: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
    pub axis: AxisOptions,
}

impl ChartSpec {
    /// Smallest and largest value across datasets; the lower bound is zero
    /// when the axis begins at zero.
    pub fn value_range(&self) -> (f64, f64) {
        let values = self.datasets.iter().flat_map(|dataset| &dataset.values);
        let (low, high) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), v| {
            (low.min(*v), high.max(*v))
        });
        if !low.is_finite() {
            return (0.0, 1.0);
        }
        let low = if self.axis.begin_at_zero { low.min(0.0) } else { low };
        (low, high)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardMetric {
    pub indicator: Indicator,
    pub value: f64,
    pub percent_of_average: Option<f64>,
    pub severity: Severity,
    /// Progress-bar width in percent
    pub bar_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCard {
    pub title: String,
    pub highlight: bool,
    pub metrics: Vec<CardMetric>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MapEvent {
    PointerEnter,
    PointerLeave,
    Click,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeatureAction {
    /// Thicker stroke, drawn above sibling features
    Highlight,
    ResetStyle,
    ZoomToBounds,
}

/// One `{event, handler}` pair attached to a map feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventBinding {
    pub event: MapEvent,
    pub action: FeatureAction,
}

impl EventBinding {
    /// Hover highlights, leaving resets, clicking zooms.
    pub fn hover_and_zoom() -> Vec<Self> {
        vec![
            Self {
                event: MapEvent::PointerEnter,
                action: FeatureAction::Highlight,
            },
            Self {
                event: MapEvent::PointerLeave,
                action: FeatureAction::ResetStyle,
            },
            Self {
                event: MapEvent::Click,
                action: FeatureAction::ZoomToBounds,
            },
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureStyle {
    pub fill: &'static str,
    pub stroke: &'static str,
    pub weight: f64,
    pub fill_opacity: f64,
}

impl FeatureStyle {
    pub const fn filled(fill: &'static str) -> Self {
        Self {
            fill,
            stroke: "#FFFFFF",
            weight: 2.0,
            fill_opacity: 0.7,
        }
    }

    #[must_use]
    pub const fn highlighted(self) -> Self {
        Self {
            stroke: "#666666",
            weight: 5.0,
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonFeature {
    pub name: String,
    #[serde(skip)]
    pub rings: Vec<Vec<GeoPoint>>,
    pub style: FeatureStyle,
    pub tooltip: String,
    pub bindings: Vec<EventBinding>,
}

impl PolygonFeature {
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.rings.iter().flatten())
    }

    pub fn action_for(&self, event: MapEvent) -> Option<FeatureAction> {
        self.bindings
            .iter()
            .find(|binding| binding.event == event)
            .map(|binding| binding.action)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleMarker {
    pub label: String,
    pub center: GeoPoint,
    pub radius: f64,
    pub color: &'static str,
    pub highlight: bool,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointMarker {
    pub label: String,
    pub at: GeoPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MapLayer {
    Polygons(Vec<PolygonFeature>),
    Circles(Vec<CircleMarker>),
    Markers(Vec<PointMarker>),
    Legend {
        corner: Corner,
        title: String,
        entries: Vec<LegendEntry>,
    },
}

impl MapLayer {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Polygons(_) => "polygons",
            Self::Circles(_) => "circles",
            Self::Markers(_) => "markers",
            Self::Legend { .. } => "legend",
        }
    }
}

pub trait CardSink {
    /// Replaces the cards container content.
    fn show_cards(&mut self, cards: Vec<SummaryCard>) -> Result<()>;

    /// Replaces the cards container content with an error message.
    fn show_error(&mut self, message: &str) -> Result<()>;
}

pub trait ChartSink {
    fn draw_chart(&mut self, slot: ChartSlot, spec: ChartSpec) -> Result<ChartHandle>;

    /// Destroying an unknown handle is a no-op.
    fn destroy_chart(&mut self, handle: ChartHandle);
}

pub trait MapSink {
    fn add_layer(&mut self, layer: MapLayer) -> Result<LayerHandle>;

    /// Removing an unknown handle or [`LayerHandle::BASE`] is a no-op.
    fn remove_layer(&mut self, handle: LayerHandle);

    fn fit_bounds(&mut self, bounds: Bounds) -> Result<()>;
}

/// Everything a mode renderer draws into.
pub trait Surface: CardSink + ChartSink + MapSink {}

impl<T: CardSink + ChartSink + MapSink + ?Sized> Surface for T {}
