use tracing::{debug, warn};

use super::local::REGION_FALLBACK;
use super::{
    card_metric, comparison_chart, format_population, place_cards, place_chart, place_layer,
    place_view, trend_chart, PRIMARY_COLOR, SECONDARY_COLOR,
};
use crate::dataset::{Bounds, Datasets, GeoPoint, Location, RegionDataset};
use crate::domain::Indicator;
use crate::scale::population_radius;
use crate::view::registry::ViewRegistry;
use crate::view::{ChartDataset, ChartSlot, ChartSpec, CircleMarker, MapLayer, SummaryCard, Surface};

const SUBJECT_COLOR: &str = "#E63946";
const GOVERNORATE_COLOR: &str = "#457B9D";
const NATIONAL_FALLBACK: &str = "Egypt";
const COUNTRY_CENTER: GeoPoint = GeoPoint::new(26.8, 30.8);

const CARD_INDICATORS: [Indicator; 2] = [Indicator::InfantMortality, Indicator::MaternalMortality];

pub fn render<S: Surface + ?Sized>(
    datasets: &Datasets,
    surface: &mut S,
    registry: &mut ViewRegistry,
) {
    let national = &datasets.national;
    let subject = datasets.region.display_name(REGION_FALLBACK);
    let Some(infant) = national.series(Indicator::InfantMortality) else {
        warn!("national dataset has no infant mortality series");
        return;
    };

    place_cards(surface, governorate_cards(national, subject));

    let points = national
        .locations
        .iter()
        .map(Location::point)
        .collect::<Vec<_>>();
    let view = Bounds::from_points(&points)
        .map_or_else(|| Bounds::around(COUNTRY_CENTER, 5.5, 6.0), |bounds| bounds.padded(0.1));
    place_view(surface, view);
    place_layer(surface, registry, governorate_circles(national, subject));

    place_chart(surface, registry, ChartSlot::Comparison, governorate_chart(national));
    let subject_series = datasets
        .region
        .series(Indicator::InfantMortality)
        .map(|series| (subject, series));
    match subject_series {
        Some(subject_series) => {
            let reference = (national.display_name(NATIONAL_FALLBACK), infant);
            if let Some(spec) =
                trend_chart(Indicator::InfantMortality, subject_series, Some(reference))
            {
                place_chart(surface, registry, ChartSlot::Trend, spec);
            }
        }
        None => debug!(subject, "subject has no infant mortality trend"),
    }
}

/// One card per governorate; the subject governorate is highlighted.
pub fn governorate_cards(national: &RegionDataset, subject: &str) -> Vec<SummaryCard> {
    let series = CARD_INDICATORS
        .into_iter()
        .filter_map(|indicator| {
            national
                .series(indicator)
                .map(|series| (indicator, series, series.reference_average()))
        })
        .collect::<Vec<_>>();

    national
        .entities
        .iter()
        .enumerate()
        .map(|(index, name)| SummaryCard {
            title: name.clone(),
            highlight: name == subject,
            metrics: series
                .iter()
                .filter_map(|(indicator, series, reference)| {
                    let value = series.values.get(index)?;
                    Some(card_metric(*indicator, *value, *reference))
                })
                .collect(),
        })
        .collect()
}

/// Population-sized circle per governorate that has a location.
pub fn governorate_circles(national: &RegionDataset, subject: &str) -> MapLayer {
    let circles = national
        .entities
        .iter()
        .enumerate()
        .filter_map(|(index, name)| {
            let location = national.location(index)?;
            let Some(population) = location.population else {
                debug!(governorate = %name, "no population, circle skipped");
                return None;
            };
            let is_subject = name == subject;
            let mut tooltip = vec![
                name.clone(),
                format!("Population: {}", format_population(population)),
            ];
            for indicator in CARD_INDICATORS {
                if let Some(value) = national.value_of(name, indicator) {
                    tooltip.push(format!("{}: {}", indicator.label(), indicator.format_value(value)));
                }
            }
            Some(CircleMarker {
                label: name.clone(),
                center: location.point(),
                radius: population_radius(population),
                color: if is_subject { SUBJECT_COLOR } else { GOVERNORATE_COLOR },
                highlight: is_subject,
                tooltip: tooltip.join("\n"),
            })
        })
        .collect();
    MapLayer::Circles(circles)
}

fn governorate_chart(national: &RegionDataset) -> ChartSpec {
    let datasets = [
        (Indicator::InfantMortality, PRIMARY_COLOR),
        (Indicator::MaternalMortality, SECONDARY_COLOR),
    ]
    .into_iter()
    .filter_map(|(indicator, color)| {
        national.series(indicator).map(|series| ChartDataset {
            label: format!("{} ({})", indicator.label(), indicator.unit()),
            values: series.values.clone(),
            color,
        })
    })
    .collect();
    comparison_chart(
        format!("{} Governorates", national.display_name(NATIONAL_FALLBACK)),
        national.entities.clone(),
        datasets,
    )
}
