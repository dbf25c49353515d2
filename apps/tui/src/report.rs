use std::fmt::Write as _;

use color_eyre::Result;
use health_core::view::scene::CardsView;
use health_core::{bootstrap, load, DataSource, Mode, Scene};
use serde::Serialize;

use crate::fetch::FileFetcher;

/// Run the dashboard without a UI and print what the selected mode shows
pub async fn run_headless(source: &DataSource, mode: Mode, json: bool) -> Result<()> {
    let loaded = load(&FileFetcher, source).await;
    let mut scene = Scene::new();
    if bootstrap(loaded, mode, &mut scene).is_none() {
        if let CardsView::Error(message) = scene.cards() {
            return Err(color_eyre::eyre::eyre!("{message}"));
        }
        return Err(color_eyre::eyre::eyre!("dashboard could not be built"));
    }

    let report = HeadlessReport::from_scene(mode, &scene);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.to_text());
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct HeadlessReport {
    pub mode: &'static str,
    pub title: &'static str,
    pub cards: Vec<ReportCard>,
    pub charts: Vec<ReportChart>,
    pub layers: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct ReportCard {
    pub name: String,
    pub highlight: bool,
    pub metrics: Vec<ReportMetric>,
}

#[derive(Debug, Serialize)]
pub struct ReportMetric {
    pub indicator: &'static str,
    pub value: String,
    pub percent_of_average: Option<f64>,
    pub severity: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReportChart {
    pub title: String,
    pub labels: Vec<String>,
    pub series: Vec<String>,
}

impl HeadlessReport {
    pub fn from_scene(mode: Mode, scene: &Scene) -> Self {
        let cards = match scene.cards() {
            CardsView::Cards(cards) => cards
                .iter()
                .map(|card| ReportCard {
                    name: card.title.clone(),
                    highlight: card.highlight,
                    metrics: card
                        .metrics
                        .iter()
                        .map(|metric| ReportMetric {
                            indicator: metric.indicator.label(),
                            value: metric.indicator.format_value(metric.value),
                            percent_of_average: metric.percent_of_average,
                            severity: metric.severity.as_str(),
                        })
                        .collect(),
                })
                .collect(),
            CardsView::Empty | CardsView::Error(_) => Vec::new(),
        };

        let charts = scene
            .charts()
            .iter()
            .map(|chart| ReportChart {
                title: chart.spec.title.clone(),
                labels: chart.spec.labels.clone(),
                series: chart
                    .spec
                    .datasets
                    .iter()
                    .map(|dataset| dataset.label.clone())
                    .collect(),
            })
            .collect();

        let layers = scene
            .layers()
            .iter()
            .map(|placed| placed.layer.kind())
            .collect();

        Self {
            mode: mode.as_str(),
            title: mode.label(),
            cards,
            charts,
            layers,
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n{}", self.title);
        let _ = writeln!(out, "{}", "=".repeat(self.title.chars().count()));

        for card in &self.cards {
            let marker = if card.highlight { "*" } else { "-" };
            let _ = writeln!(out, "{marker} {}", card.name);
            for metric in &card.metrics {
                let comparison = metric
                    .percent_of_average
                    .map_or_else(String::new, |percent| {
                        format!(" ({percent:.1}% of avg, {})", metric.severity)
                    });
                let _ = writeln!(out, "    {}: {}{comparison}", metric.indicator, metric.value);
            }
        }

        let _ = writeln!(out, "\nCharts:");
        for chart in &self.charts {
            let _ = writeln!(
                out,
                "- {} [{}] over {} labels",
                chart.title,
                chart.series.join(", "),
                chart.labels.len()
            );
        }
        let _ = writeln!(out, "\nMap layers: {}", self.layers.join(", "));
        out
    }
}
