use tracing::{debug, warn};

use super::{
    card_metric, comparison_chart, place_cards, place_chart, place_layer, place_view,
    trend_chart, PRIMARY_COLOR,
};
use crate::dataset::{Bounds, Datasets, GeoPoint, RegionDataset};
use crate::domain::Indicator;
use crate::scale::LIFE_EXPECTANCY_SCALE;
use crate::view::registry::ViewRegistry;
use crate::view::{
    CardMetric, ChartDataset, ChartSlot, ChartSpec, CircleMarker, MapLayer, PointMarker,
    SummaryCard, Surface,
};

const HOME_FALLBACK: &str = "Egypt";
const WORLD_FALLBACK: &str = "World";
const HOME_ANCHOR: GeoPoint = GeoPoint::new(26.82, 30.80);
const REGION_RADIUS: f64 = 15.0;

const WORLD_VIEW: Bounds = Bounds {
    south: -55.0,
    west: -170.0,
    north: 70.0,
    east: 180.0,
};

const REGION_ANCHORS: &[(&str, GeoPoint)] = &[
    ("Africa", GeoPoint::new(1.65, 17.0)),
    ("Americas", GeoPoint::new(15.0, -85.0)),
    ("North America", GeoPoint::new(45.0, -100.0)),
    ("South America", GeoPoint::new(-15.0, -60.0)),
    ("Europe", GeoPoint::new(50.0, 15.0)),
    ("Asia", GeoPoint::new(34.0, 100.0)),
    ("Middle East", GeoPoint::new(29.0, 45.0)),
    ("Oceania", GeoPoint::new(-25.0, 140.0)),
];

const CARD_INDICATORS: [Indicator; 2] = [Indicator::LifeExpectancy, Indicator::InfantMortality];

pub fn render<S: Surface + ?Sized>(
    datasets: &Datasets,
    surface: &mut S,
    registry: &mut ViewRegistry,
) {
    let (home, world) = (&datasets.national, &datasets.global);
    let Some(life_expectancy) = world.series(Indicator::LifeExpectancy) else {
        warn!("global dataset has no life expectancy series");
        return;
    };

    place_cards(surface, global_cards(home, world));

    place_view(surface, WORLD_VIEW);
    place_layer(
        surface,
        registry,
        MapLayer::Markers(vec![PointMarker {
            label: home.display_name(HOME_FALLBACK).to_string(),
            at: HOME_ANCHOR,
        }]),
    );
    place_layer(surface, registry, region_circles(world));

    place_chart(surface, registry, ChartSlot::Comparison, region_chart(home, world));
    match home.series(Indicator::LifeExpectancy) {
        Some(home_series) => {
            let subject = (home.display_name(HOME_FALLBACK), home_series);
            let reference = (world.display_name(WORLD_FALLBACK), life_expectancy);
            if let Some(spec) = trend_chart(Indicator::LifeExpectancy, subject, Some(reference)) {
                place_chart(surface, registry, ChartSlot::Trend, spec);
            }
        }
        None => debug!("home country has no life expectancy trend"),
    }
}

/// Home country card first, then one card per world region, all compared
/// with the world averages.
pub fn global_cards(home: &RegionDataset, world: &RegionDataset) -> Vec<SummaryCard> {
    let series = CARD_INDICATORS
        .into_iter()
        .filter_map(|indicator| {
            world
                .series(indicator)
                .map(|series| (indicator, series, series.reference_average()))
        })
        .collect::<Vec<_>>();

    let home_card = SummaryCard {
        title: home.display_name(HOME_FALLBACK).to_string(),
        highlight: true,
        metrics: series
            .iter()
            .filter_map(|(indicator, _, reference)| {
                let value = home.series(*indicator)?.reference_average()?;
                Some(card_metric(*indicator, value, *reference))
            })
            .collect(),
    };

    let region_cards = world.entities.iter().enumerate().map(|(index, name)| SummaryCard {
        title: name.clone(),
        highlight: false,
        metrics: series
            .iter()
            .filter_map(|(indicator, series, reference)| {
                let value = series.values.get(index)?;
                Some(card_metric(*indicator, *value, *reference))
            })
            .collect::<Vec<CardMetric>>(),
    });

    std::iter::once(home_card).chain(region_cards).collect()
}

pub fn region_anchor(name: &str) -> Option<GeoPoint> {
    REGION_ANCHORS
        .iter()
        .find(|(region, _)| region.eq_ignore_ascii_case(name.trim()))
        .map(|(_, anchor)| *anchor)
}

/// Fixed-size circle per anchored region, coloured by life expectancy.
pub fn region_circles(world: &RegionDataset) -> MapLayer {
    let circles = world
        .entities
        .iter()
        .filter_map(|name| {
            let Some(center) = region_anchor(name) else {
                debug!(region = %name, "no anchor for world region, circle skipped");
                return None;
            };
            let value = world.value_of(name, Indicator::LifeExpectancy);
            let tooltip = value.map_or_else(
                || format!("{name}\nNo data"),
                |value| {
                    format!(
                        "{name}\n{}: {}",
                        Indicator::LifeExpectancy.label(),
                        Indicator::LifeExpectancy.format_value(value)
                    )
                },
            );
            Some(CircleMarker {
                label: name.clone(),
                center,
                radius: REGION_RADIUS,
                color: LIFE_EXPECTANCY_SCALE.color(value),
                highlight: false,
                tooltip,
            })
        })
        .collect();
    MapLayer::Circles(circles)
}

fn region_chart(home: &RegionDataset, world: &RegionDataset) -> ChartSpec {
    let mut labels = world.entities.clone();
    let mut values = world
        .series(Indicator::LifeExpectancy)
        .map(|series| series.values.clone())
        .unwrap_or_default();
    if let Some(home_value) = home
        .series(Indicator::LifeExpectancy)
        .and_then(|series| series.reference_average())
    {
        labels.push(home.display_name(HOME_FALLBACK).to_string());
        values.push(home_value);
    }
    comparison_chart(
        "World Regions",
        labels,
        vec![ChartDataset {
            label: format!(
                "{} ({})",
                Indicator::LifeExpectancy.label(),
                Indicator::LifeExpectancy.unit()
            ),
            values,
            color: PRIMARY_COLOR,
        }],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::Severity;

    fn home() -> RegionDataset {
        RegionDataset::from_json(
            r#"{
                "name": "Egypt",
                "governorates": ["Cairo", "Sharqia"],
                "indicators": {
                    "infantMortality": {"values": [14, 18], "egyptAvg": 17},
                    "lifeExpectancy": {"values": [73, 71], "egyptAvg": 72, "years": [2020, 2021], "trend": [71.5, 72]}
                }
            }"#,
            Indicator::InfantMortality,
        )
        .unwrap()
    }

    fn world() -> RegionDataset {
        RegionDataset::from_json(
            r#"{
                "name": "World",
                "regions": ["Africa", "Europe", "Atlantis"],
                "indicators": {
                    "lifeExpectancy": {"values": [64, 79, 90], "worldAvg": 73, "years": [2020, 2021], "trend": [72.8, 73]},
                    "infantMortality": {"values": [45, 3.5, 1], "worldAvg": 28}
                }
            }"#,
            Indicator::LifeExpectancy,
        )
        .unwrap()
    }

    #[test]
    fn home_card_leads_with_national_averages() {
        let cards = global_cards(&home(), &world());
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[0].title, "Egypt");
        assert!(cards[0].highlight);
        assert!((cards[0].metrics[0].value - 72.0).abs() < 1e-9);
        assert_eq!(cards[0].metrics[0].severity, Severity::Good);
    }

    #[test]
    fn regions_above_world_average_warn() {
        let cards = global_cards(&home(), &world());
        assert_eq!(cards[1].metrics[0].severity, Severity::Good);
        assert_eq!(cards[2].metrics[0].severity, Severity::Warning);
        assert_eq!(cards[2].metrics[1].severity, Severity::Good);
    }

    #[test]
    fn unanchored_regions_are_skipped() {
        let MapLayer::Circles(circles) = region_circles(&world()) else {
            panic!("expected circles");
        };
        assert_eq!(circles.len(), 2);
        assert_eq!(circles[0].color, "#D73027");
        assert_eq!(circles[1].color, "#1A9850");
    }

    #[test]
    fn chart_appends_home_country() {
        let spec = region_chart(&home(), &world());
        assert_eq!(spec.labels.last().map(String::as_str), Some("Egypt"));
        assert_eq!(spec.datasets[0].values, vec![64.0, 79.0, 90.0, 72.0]);
    }
}
