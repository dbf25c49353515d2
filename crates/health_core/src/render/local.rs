use tracing::{debug, warn};

use super::{
    card_metric, comparison_chart, entity_values, format_population, place_cards, place_chart,
    place_layer, place_view, trend_chart, PRIMARY_COLOR, SECONDARY_COLOR,
};
use crate::dataset::{BoundaryFeature, Bounds, Datasets, GeoPoint, IndicatorSeries, RegionDataset};
use crate::domain::Indicator;
use crate::scale::PREVALENCE_SCALE;
use crate::view::registry::ViewRegistry;
use crate::view::{
    ChartDataset, ChartSlot, ChartSpec, Corner, EventBinding, FeatureStyle, LegendEntry,
    MapLayer, PolygonFeature, SummaryCard, Surface,
};

pub const REGION_FALLBACK: &str = "Sharqia";
const NATIONAL_FALLBACK: &str = "Egypt";
const REGION_CENTER: GeoPoint = GeoPoint::new(30.7, 31.6);

pub fn render<S: Surface + ?Sized>(
    datasets: &Datasets,
    surface: &mut S,
    registry: &mut ViewRegistry,
) {
    let region = &datasets.region;
    let Some(diabetes) = region.series(Indicator::Diabetes) else {
        warn!("region dataset has no diabetes series");
        return;
    };

    place_cards(surface, district_cards(region, diabetes));

    let view = datasets
        .boundaries
        .bounds()
        .map_or_else(|| Bounds::around(REGION_CENTER, 0.35, 0.45), |bounds| bounds.padded(0.05));
    place_view(surface, view);
    place_layer(surface, registry, district_layer(datasets));
    place_layer(surface, registry, legend());

    place_chart(surface, registry, ChartSlot::Comparison, district_chart(region));
    let national = datasets
        .national
        .series(Indicator::Diabetes)
        .map(|series| (datasets.national.display_name(NATIONAL_FALLBACK), series));
    if let Some(spec) = trend_chart(
        Indicator::Diabetes,
        (region.display_name(REGION_FALLBACK), diabetes),
        national,
    ) {
        place_chart(surface, registry, ChartSlot::Trend, spec);
    }
}

/// One card per district, compared with the diabetes reference average.
pub fn district_cards(region: &RegionDataset, diabetes: &IndicatorSeries) -> Vec<SummaryCard> {
    let reference = diabetes.reference_average();
    entity_values(&region.entities, diabetes)
        .map(|(name, value)| SummaryCard {
            title: name.clone(),
            highlight: false,
            metrics: vec![card_metric(Indicator::Diabetes, value, reference)],
        })
        .collect()
}

/// Choropleth of the boundary features joined to districts by name.
pub fn district_layer(datasets: &Datasets) -> MapLayer {
    let region = &datasets.region;
    let features = datasets
        .boundaries
        .features
        .iter()
        .map(|feature| {
            let value = region.value_of(&feature.name, Indicator::Diabetes);
            if value.is_none() {
                debug!(feature = %feature.name, "no district matches boundary feature");
            }
            PolygonFeature {
                name: feature.name.clone(),
                rings: feature.rings.clone(),
                style: FeatureStyle::filled(PREVALENCE_SCALE.color(value)),
                tooltip: district_tooltip(region, feature, value),
                bindings: EventBinding::hover_and_zoom(),
            }
        })
        .collect();
    MapLayer::Polygons(features)
}

fn district_tooltip(region: &RegionDataset, feature: &BoundaryFeature, diabetes: Option<f64>) -> String {
    let mut lines = vec![feature.name.clone()];
    match diabetes {
        Some(value) => lines.push(format!("Diabetes: {}", Indicator::Diabetes.format_value(value))),
        None => lines.push("No data".to_string()),
    }
    if let Some(value) = region.value_of(&feature.name, Indicator::Pollution) {
        lines.push(format!("Pollution: {}", Indicator::Pollution.format_value(value)));
    }
    if let Some(population) = feature.population {
        lines.push(format!("Population: {}", format_population(population)));
    }
    lines.join("\n")
}

pub fn legend() -> MapLayer {
    MapLayer::Legend {
        corner: Corner::BottomRight,
        title: format!("{} ({})", Indicator::Diabetes.label(), Indicator::Diabetes.unit()),
        entries: PREVALENCE_SCALE
            .legend()
            .into_iter()
            .map(|(label, color)| LegendEntry { label, color })
            .collect(),
    }
}

fn district_chart(region: &RegionDataset) -> ChartSpec {
    let mut datasets = Vec::new();
    for (indicator, color) in [
        (Indicator::Diabetes, PRIMARY_COLOR),
        (Indicator::Pollution, SECONDARY_COLOR),
    ] {
        if let Some(series) = region.series(indicator) {
            datasets.push(ChartDataset {
                label: format!("{} ({})", indicator.label(), indicator.unit()),
                values: series.values.clone(),
                color,
            });
        }
    }
    comparison_chart(
        format!("{} Districts", region.display_name(REGION_FALLBACK)),
        region.entities.clone(),
        datasets,
    )
}
