use serde::Serialize;
use tracing::debug;

use crate::dataset::Bounds;
use crate::error::{DashboardError, Result};
use crate::view::{
    CardSink, ChartHandle, ChartSink, ChartSlot, ChartSpec, FeatureAction, FeatureStyle,
    LayerHandle, MapEvent, MapLayer, MapSink, PolygonFeature, SummaryCard, Target,
};

/// Which page containers exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Targets {
    pub cards: bool,
    pub comparison_chart: bool,
    pub trend_chart: bool,
    pub map: bool,
}

impl Targets {
    pub const ALL: Self = Self {
        cards: true,
        comparison_chart: true,
        trend_chart: true,
        map: true,
    };

    pub const fn has(self, target: Target) -> bool {
        match target {
            Target::Cards => self.cards,
            Target::ComparisonChart => self.comparison_chart,
            Target::TrendChart => self.trend_chart,
            Target::Map => self.map,
        }
    }

    #[must_use]
    pub fn without(mut self, target: Target) -> Self {
        match target {
            Target::Cards => self.cards = false,
            Target::ComparisonChart => self.comparison_chart = false,
            Target::TrendChart => self.trend_chart = false,
            Target::Map => self.map = false,
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "content", rename_all = "lowercase")]
pub enum CardsView {
    Empty,
    Cards(Vec<SummaryCard>),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedChart {
    pub handle: ChartHandle,
    pub slot: ChartSlot,
    pub spec: ChartSpec,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLayer {
    pub handle: LayerHandle,
    pub layer: MapLayer,
    /// Feature drawn above its siblings
    pub raised: Option<usize>,
}

impl PlacedLayer {
    /// Feature indices in paint order, raised feature last.
    pub fn paint_order(&self) -> Vec<usize> {
        let count = match &self.layer {
            MapLayer::Polygons(features) => features.len(),
            _ => 0,
        };
        let mut order = (0..count)
            .filter(|index| Some(*index) != self.raised)
            .collect::<Vec<_>>();
        if let Some(raised) = self.raised.filter(|raised| *raised < count) {
            order.push(raised);
        }
        order
    }
}

/// Feature currently under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pointer {
    pub layer: LayerHandle,
    pub feature: usize,
}

/// In-memory page: implements every sink and keeps what was drawn so a
/// front end can paint it and tests can inspect it.
#[derive(Debug, Clone)]
pub struct Scene {
    targets: Targets,
    next_handle: u64,
    cards: CardsView,
    charts: Vec<PlacedChart>,
    layers: Vec<PlacedLayer>,
    view: Option<Bounds>,
    home_view: Option<Bounds>,
    pointer: Option<Pointer>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub const fn new() -> Self {
        Self::with_targets(Targets::ALL)
    }

    pub const fn with_targets(targets: Targets) -> Self {
        Self {
            targets,
            next_handle: 1,
            cards: CardsView::Empty,
            charts: Vec::new(),
            layers: Vec::new(),
            view: None,
            home_view: None,
            pointer: None,
        }
    }

    pub const fn cards(&self) -> &CardsView {
        &self.cards
    }

    pub fn charts(&self) -> &[PlacedChart] {
        &self.charts
    }

    pub fn chart(&self, slot: ChartSlot) -> Option<&PlacedChart> {
        self.charts.iter().find(|chart| chart.slot == slot)
    }

    /// Overlay layers in paint order; the base tile layer is implied.
    pub fn layers(&self) -> &[PlacedLayer] {
        &self.layers
    }

    /// Every live layer handle, base tile layer first.
    pub fn layer_handles(&self) -> Vec<LayerHandle> {
        std::iter::once(LayerHandle::BASE)
            .chain(self.layers.iter().map(|placed| placed.handle))
            .collect()
    }

    pub const fn view(&self) -> Option<Bounds> {
        self.view
    }

    pub const fn pointer(&self) -> Option<Pointer> {
        self.pointer
    }

    /// Every interactive polygon feature as `(layer, index, name)`, in
    /// dataset order.
    pub fn features(&self) -> Vec<(LayerHandle, usize, &str)> {
        self.layers
            .iter()
            .filter_map(|placed| match &placed.layer {
                MapLayer::Polygons(features) => Some((placed.handle, features)),
                _ => None,
            })
            .flat_map(|(handle, features)| {
                features
                    .iter()
                    .enumerate()
                    .map(move |(index, feature)| (handle, index, feature.name.as_str()))
            })
            .collect()
    }

    pub fn feature(&self, layer: LayerHandle, index: usize) -> Option<&PolygonFeature> {
        match &self.layers.iter().find(|placed| placed.handle == layer)?.layer {
            MapLayer::Polygons(features) => features.get(index),
            _ => None,
        }
    }

    pub fn hovered_feature(&self) -> Option<&PolygonFeature> {
        let pointer = self.pointer?;
        self.feature(pointer.layer, pointer.feature)
    }

    /// Moves the pointer onto a feature, leaving the previous one first.
    pub fn hover(&mut self, layer: LayerHandle, index: usize) {
        let target = Pointer {
            layer,
            feature: index,
        };
        if self.pointer == Some(target) {
            return;
        }
        self.leave();
        if self.feature(layer, index).is_some() {
            self.pointer = Some(target);
            self.dispatch(target, MapEvent::PointerEnter);
        }
    }

    pub fn leave(&mut self) {
        if let Some(pointer) = self.pointer.take() {
            self.dispatch(pointer, MapEvent::PointerLeave);
        }
    }

    pub fn click(&mut self) {
        if let Some(pointer) = self.pointer {
            self.dispatch(pointer, MapEvent::Click);
        }
    }

    /// Back to the view the active mode fitted.
    pub fn reset_view(&mut self) {
        self.view = self.home_view;
    }

    fn dispatch(&mut self, pointer: Pointer, event: MapEvent) {
        let Some(placed) = self
            .layers
            .iter_mut()
            .find(|placed| placed.handle == pointer.layer)
        else {
            return;
        };
        let MapLayer::Polygons(features) = &mut placed.layer else {
            return;
        };
        let Some(feature) = features.get_mut(pointer.feature) else {
            return;
        };
        let Some(action) = feature.action_for(event) else {
            return;
        };

        debug!(feature = %feature.name, ?event, ?action, "map interaction");
        match action {
            FeatureAction::Highlight => {
                feature.style = FeatureStyle::filled(feature.style.fill).highlighted();
                placed.raised = Some(pointer.feature);
            }
            FeatureAction::ResetStyle => {
                feature.style = FeatureStyle::filled(feature.style.fill);
            }
            FeatureAction::ZoomToBounds => {
                if let Some(bounds) = feature.bounds() {
                    self.view = Some(bounds.padded(0.1));
                }
            }
        }
    }

    fn require(&self, target: Target) -> Result<()> {
        if self.targets.has(target) {
            Ok(())
        } else {
            Err(DashboardError::MissingTarget(target))
        }
    }

    fn allocate(&mut self) -> u64 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }
}

impl CardSink for Scene {
    fn show_cards(&mut self, cards: Vec<SummaryCard>) -> Result<()> {
        self.require(Target::Cards)?;
        self.cards = CardsView::Cards(cards);
        Ok(())
    }

    fn show_error(&mut self, message: &str) -> Result<()> {
        self.require(Target::Cards)?;
        self.cards = CardsView::Error(message.to_string());
        Ok(())
    }
}

impl ChartSink for Scene {
    fn draw_chart(&mut self, slot: ChartSlot, spec: ChartSpec) -> Result<ChartHandle> {
        self.require(slot.target())?;
        if self.chart(slot).is_some() {
            return Err(DashboardError::CanvasInUse(slot));
        }
        let handle = ChartHandle(self.allocate());
        self.charts.push(PlacedChart { handle, slot, spec });
        Ok(handle)
    }

    fn destroy_chart(&mut self, handle: ChartHandle) {
        self.charts.retain(|chart| chart.handle != handle);
    }
}

impl MapSink for Scene {
    fn add_layer(&mut self, layer: MapLayer) -> Result<LayerHandle> {
        self.require(Target::Map)?;
        let handle = LayerHandle(self.allocate());
        self.layers.push(PlacedLayer {
            handle,
            layer,
            raised: None,
        });
        Ok(handle)
    }

    fn remove_layer(&mut self, handle: LayerHandle) {
        if handle == LayerHandle::BASE {
            return;
        }
        if self.pointer.is_some_and(|pointer| pointer.layer == handle) {
            self.pointer = None;
        }
        self.layers.retain(|placed| placed.handle != handle);
    }

    fn fit_bounds(&mut self, bounds: Bounds) -> Result<()> {
        self.require(Target::Map)?;
        self.view = Some(bounds);
        self.home_view = Some(bounds);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::GeoPoint;
    use crate::view::{AxisOptions, ChartKind, EventBinding};

    fn spec() -> ChartSpec {
        ChartSpec {
            kind: ChartKind::Line,
            title: "Trend".to_string(),
            labels: vec!["2019".to_string()],
            datasets: vec![],
            axis: AxisOptions::default(),
        }
    }

    fn square(name: &str, origin: f64) -> PolygonFeature {
        PolygonFeature {
            name: name.to_string(),
            rings: vec![vec![
                GeoPoint::new(origin, origin),
                GeoPoint::new(origin + 1.0, origin),
                GeoPoint::new(origin + 1.0, origin + 1.0),
                GeoPoint::new(origin, origin),
            ]],
            style: FeatureStyle::filled("#FEB24C"),
            tooltip: name.to_string(),
            bindings: EventBinding::hover_and_zoom(),
        }
    }

    #[test]
    fn occupied_canvas_is_refused() {
        let mut scene = Scene::new();
        let first = scene.draw_chart(ChartSlot::Trend, spec()).unwrap();
        assert_eq!(
            scene.draw_chart(ChartSlot::Trend, spec()),
            Err(DashboardError::CanvasInUse(ChartSlot::Trend))
        );
        scene.destroy_chart(first);
        assert!(scene.draw_chart(ChartSlot::Trend, spec()).is_ok());
    }

    #[test]
    fn missing_targets_are_reported() {
        let mut scene = Scene::with_targets(Targets::ALL.without(Target::Map));
        assert_eq!(
            scene.add_layer(MapLayer::Markers(vec![])),
            Err(DashboardError::MissingTarget(Target::Map))
        );
        assert!(scene.show_cards(vec![]).is_ok());
    }

    #[test]
    fn base_layer_survives_removal() {
        let mut scene = Scene::new();
        let overlay = scene.add_layer(MapLayer::Markers(vec![])).unwrap();
        scene.remove_layer(LayerHandle::BASE);
        assert_eq!(scene.layer_handles(), vec![LayerHandle::BASE, overlay]);
        scene.remove_layer(overlay);
        assert_eq!(scene.layer_handles(), vec![LayerHandle::BASE]);
    }

    #[test]
    fn hover_highlights_raises_and_leave_resets() {
        let mut scene = Scene::new();
        let layer = scene
            .add_layer(MapLayer::Polygons(vec![square("A", 0.0), square("B", 2.0)]))
            .unwrap();

        scene.hover(layer, 0);
        assert_eq!(scene.hovered_feature().map(|f| f.style.weight), Some(5.0));
        assert_eq!(scene.layers()[0].paint_order(), vec![1, 0]);

        scene.hover(layer, 1);
        assert_eq!(scene.feature(layer, 0).map(|f| f.style.weight), Some(2.0));
        assert_eq!(scene.hovered_feature().map(|f| f.name.as_str()), Some("B"));
        assert_eq!(scene.layers()[0].paint_order(), vec![0, 1]);

        scene.leave();
        assert_eq!(scene.pointer(), None);
        assert_eq!(scene.feature(layer, 1).map(|f| f.style.weight), Some(2.0));
    }

    #[test]
    fn click_zooms_to_feature_and_reset_restores_home() {
        let mut scene = Scene::new();
        let home = Bounds::around(GeoPoint::new(30.7, 31.6), 1.0, 1.0);
        scene.fit_bounds(home).unwrap();
        let layer = scene
            .add_layer(MapLayer::Polygons(vec![square("A", 10.0)]))
            .unwrap();

        scene.hover(layer, 0);
        scene.click();
        let zoomed = scene.view().unwrap();
        assert!(zoomed.contains(GeoPoint::new(10.5, 10.5)));
        assert!(!zoomed.contains(GeoPoint::new(30.7, 31.6)));

        scene.reset_view();
        assert_eq!(scene.view(), Some(home));
    }

    #[test]
    fn removing_hovered_layer_drops_pointer() {
        let mut scene = Scene::new();
        let layer = scene
            .add_layer(MapLayer::Polygons(vec![square("A", 0.0)]))
            .unwrap();
        scene.hover(layer, 0);
        scene.remove_layer(layer);
        assert_eq!(scene.pointer(), None);
        assert!(scene.features().is_empty());
    }
}
