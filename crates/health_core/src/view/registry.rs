use tracing::debug;

use crate::view::{ChartHandle, ChartSink, LayerHandle, MapSink};

/// Charts and map layers created by the active mode.
///
/// The registry is the only owner of these handles; everything it holds is
/// released by [`ViewRegistry::clear`] before the next mode renders.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ViewRegistry {
    charts: Vec<ChartHandle>,
    layers: Vec<LayerHandle>,
}

impl ViewRegistry {
    pub const fn new() -> Self {
        Self {
            charts: Vec::new(),
            layers: Vec::new(),
        }
    }

    pub fn register_chart(&mut self, handle: ChartHandle) {
        self.charts.push(handle);
    }

    /// The base tile layer is never tracked.
    pub fn register_layer(&mut self, handle: LayerHandle) {
        if handle != LayerHandle::BASE {
            self.layers.push(handle);
        }
    }

    /// Destroys every chart and removes every overlay layer. Clearing an
    /// empty registry does nothing.
    pub fn clear<S: ChartSink + MapSink + ?Sized>(&mut self, surface: &mut S) {
        if self.is_empty() {
            return;
        }
        debug!(
            charts = self.charts.len(),
            layers = self.layers.len(),
            "clearing views"
        );
        for handle in self.charts.drain(..) {
            surface.destroy_chart(handle);
        }
        for handle in self.layers.drain(..) {
            surface.remove_layer(handle);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty() && self.layers.is_empty()
    }

    pub fn charts(&self) -> &[ChartHandle] {
        &self.charts
    }

    pub fn layers(&self) -> &[LayerHandle] {
        &self.layers
    }
}
