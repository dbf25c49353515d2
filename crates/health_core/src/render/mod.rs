//! Mode renderers
//!
//! One renderer per comparison mode. Each one reads the datasets, writes the
//! cards, then builds its map layers and charts through the sinks, handing
//! every handle it gets back to the registry.

pub mod global;
pub mod local;
pub mod national;

use tracing::{debug, error, warn};

use crate::dataset::{Bounds, Datasets, IndicatorSeries};
use crate::domain::{Indicator, Mode};
use crate::error::DashboardError;
use crate::scale::{percent_of_average, Severity};
use crate::view::registry::ViewRegistry;
use crate::view::{
    AxisOptions, CardMetric, ChartDataset, ChartKind, ChartSlot, ChartSpec, MapLayer,
    SummaryCard, Surface,
};

pub const PRIMARY_COLOR: &str = "#36A2EB";
pub const SECONDARY_COLOR: &str = "#FF6384";
pub const REFERENCE_COLOR: &str = "#FF9F40";

/// Renders `mode` into a surface whose registry was just cleared.
pub fn render_mode<S: Surface + ?Sized>(
    mode: Mode,
    datasets: &Datasets,
    surface: &mut S,
    registry: &mut ViewRegistry,
) {
    debug!(mode = mode.as_str(), "rendering mode");
    match mode {
        Mode::Local => local::render(datasets, surface, registry),
        Mode::National => national::render(datasets, surface, registry),
        Mode::Global => global::render(datasets, surface, registry),
    }
}

/// Card entry comparing `value` with the reference average.
pub fn card_metric(indicator: Indicator, value: f64, reference: Option<f64>) -> CardMetric {
    CardMetric {
        indicator,
        value,
        percent_of_average: reference.and_then(|reference| percent_of_average(value, reference)),
        severity: reference.map_or(Severity::Good, |reference| Severity::classify(value, reference)),
        bar_width: crate::scale::bar_width(indicator, value),
    }
}

/// Zero-based bar chart over the entities of one scope.
pub fn comparison_chart(
    title: impl Into<String>,
    labels: Vec<String>,
    datasets: Vec<ChartDataset>,
) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Bar,
        title: title.into(),
        labels,
        datasets,
        axis: AxisOptions {
            begin_at_zero: true,
        },
    }
}

/// Yearly line chart of the subject against its reference scope, over the
/// subject's years. Reference years the subject lacks are dropped; subject
/// years the reference lacks become gaps (NaN).
pub fn trend_chart(
    indicator: Indicator,
    subject: (&str, &IndicatorSeries),
    reference: Option<(&str, &IndicatorSeries)>,
) -> Option<ChartSpec> {
    let (subject_name, subject_series) = subject;
    if !subject_series.has_trend() {
        debug!(
            indicator = indicator.key(),
            subject = subject_name,
            "no yearly trend to chart"
        );
        return None;
    }

    let labels = subject_series.year_labels();
    let mut datasets = vec![ChartDataset {
        label: subject_name.to_string(),
        values: subject_series.trend.clone(),
        color: PRIMARY_COLOR,
    }];

    if let Some((reference_name, reference_series)) =
        reference.filter(|(_, series)| series.has_trend())
    {
        let reference_labels = reference_series.year_labels();
        let values = labels
            .iter()
            .map(|label| {
                reference_labels
                    .iter()
                    .position(|candidate| candidate == label)
                    .and_then(|index| reference_series.trend.get(index).copied())
                    .unwrap_or(f64::NAN)
            })
            .collect();
        datasets.push(ChartDataset {
            label: reference_name.to_string(),
            values,
            color: REFERENCE_COLOR,
        });
    }

    Some(ChartSpec {
        kind: ChartKind::Line,
        title: format!("{} Trend", indicator.label()),
        labels,
        datasets,
        axis: AxisOptions {
            begin_at_zero: false,
        },
    })
}

pub fn format_population(population: f64) -> String {
    if population >= 1_000_000.0 {
        format!("{:.2}M", population / 1_000_000.0)
    } else if population >= 1_000.0 {
        format!("{:.0}k", population / 1_000.0)
    } else {
        format!("{population:.0}")
    }
}

pub(crate) fn place_cards<S: Surface + ?Sized>(surface: &mut S, cards: Vec<SummaryCard>) {
    if let Err(error) = surface.show_cards(cards) {
        skipped("cards", &error);
    }
}

pub(crate) fn place_view<S: Surface + ?Sized>(surface: &mut S, bounds: Bounds) {
    if let Err(error) = surface.fit_bounds(bounds) {
        skipped("map view", &error);
    }
}

pub(crate) fn place_layer<S: Surface + ?Sized>(
    surface: &mut S,
    registry: &mut ViewRegistry,
    layer: MapLayer,
) {
    let kind = layer.kind();
    match surface.add_layer(layer) {
        Ok(handle) => registry.register_layer(handle),
        Err(error) => skipped(kind, &error),
    }
}

pub(crate) fn place_chart<S: Surface + ?Sized>(
    surface: &mut S,
    registry: &mut ViewRegistry,
    slot: ChartSlot,
    spec: ChartSpec,
) {
    match surface.draw_chart(slot, spec) {
        Ok(handle) => registry.register_chart(handle),
        Err(error) => skipped("chart", &error),
    }
}

fn skipped(step: &str, failure: &DashboardError) {
    match failure {
        DashboardError::MissingTarget(_) => warn!(step, error = %failure, "render step skipped"),
        _ => error!(step, error = %failure, "render step failed"),
    }
}

/// Series value for every entity, paired with its name.
pub(crate) fn entity_values<'a>(
    entities: &'a [String],
    series: &'a IndicatorSeries,
) -> impl Iterator<Item = (&'a String, f64)> + 'a {
    entities.iter().zip(series.values.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::YearLabel;

    fn series(years: &[i64], trend: &[f64]) -> IndicatorSeries {
        IndicatorSeries {
            values: vec![],
            years: years.iter().copied().map(YearLabel::Year).collect(),
            trend: trend.to_vec(),
            reference: None,
        }
    }

    #[test]
    fn card_metric_compares_against_reference() {
        let metric = card_metric(Indicator::Diabetes, 18.0, Some(15.2));
        assert_eq!(metric.percent_of_average, Some(118.4));
        assert_eq!(metric.severity, Severity::Warning);
        assert!((metric.bar_width - 90.0).abs() < 1e-9);

        let metric = card_metric(Indicator::Diabetes, 12.0, None);
        assert_eq!(metric.percent_of_average, None);
        assert_eq!(metric.severity, Severity::Good);
    }

    #[test]
    fn trend_aligns_reference_by_year() {
        let subject = series(&[2019, 2020, 2021], &[16.0, 17.0, 18.0]);
        let reference = series(&[2020, 2021, 2022], &[14.0, 14.5, 15.0]);
        let spec = trend_chart(
            Indicator::Diabetes,
            ("Sharqia", &subject),
            Some(("Egypt", &reference)),
        )
        .unwrap();

        assert_eq!(spec.kind, ChartKind::Line);
        assert!(!spec.axis.begin_at_zero);
        assert_eq!(spec.labels, vec!["2019", "2020", "2021"]);
        let aligned = &spec.datasets[1].values;
        assert!(aligned[0].is_nan());
        assert_eq!(&aligned[1..], &[14.0, 14.5]);
    }

    #[test]
    fn trend_needs_subject_years() {
        let subject = series(&[], &[]);
        assert!(trend_chart(Indicator::Diabetes, ("Sharqia", &subject), None).is_none());
    }

    #[test]
    fn population_is_abbreviated() {
        assert_eq!(format_population(1_450_000.0), "1.45M");
        assert_eq!(format_population(850_000.0), "850k");
        assert_eq!(format_population(900.0), "900");
    }
}
