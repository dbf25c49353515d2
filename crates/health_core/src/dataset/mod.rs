//! Dataset Store
//!
//! The four JSON documents the dashboard renders from, validated at load time
//! so renderers never see a half-shaped dataset.

pub mod geo;
pub mod store;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Indicator;
use crate::error::LoadFailure;

pub use geo::{BoundaryFeature, Bounds, GeoBoundary, GeoPoint};
pub use store::{load, DataSource, Fetch, Resource};

/// Year label as written in the datasets; either `2019` or `"2019"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearLabel {
    Year(i64),
    Label(String),
}

impl fmt::Display for YearLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(year) => write!(f, "{year}"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndicatorSeries {
    /// One value per entity, in entity order
    pub values: Vec<f64>,
    #[serde(default)]
    pub years: Vec<YearLabel>,
    /// Yearly values aligned with `years`
    #[serde(default)]
    pub trend: Vec<f64>,
    #[serde(
        default,
        rename = "egyptAvg",
        alias = "average",
        alias = "nationalAvg",
        alias = "worldAvg"
    )]
    pub reference: Option<f64>,
}

impl IndicatorSeries {
    /// Explicit reference average, or the mean of the entity values.
    pub fn reference_average(&self) -> Option<f64> {
        self.reference.or_else(|| mean(&self.values))
    }

    pub fn has_trend(&self) -> bool {
        !self.trend.is_empty() && self.trend.len() == self.years.len()
    }

    pub fn year_labels(&self) -> Vec<String> {
        self.years.iter().map(ToString::to_string).collect()
    }

    fn validate(&self, key: &str, entity_count: usize) -> Result<(), String> {
        if self.values.len() != entity_count {
            return Err(format!(
                "indicator {key} has {} values for {entity_count} entities",
                self.values.len()
            ));
        }
        if !self.years.is_empty() && !self.trend.is_empty() && self.years.len() != self.trend.len()
        {
            return Err(format!(
                "indicator {key} has {} trend values for {} years",
                self.trend.len(),
                self.years.len()
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub population: Option<f64>,
}

impl Location {
    pub const fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// Local, national or global dataset; the three share one shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegionDataset {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(alias = "districts", alias = "governorates", alias = "regions")]
    pub entities: Vec<String>,
    pub indicators: BTreeMap<String, IndicatorSeries>,
    #[serde(default)]
    pub locations: Vec<Location>,
}

impl RegionDataset {
    /// Parses and validates a dataset that must carry `required`.
    pub fn from_json(body: &str, required: Indicator) -> Result<Self, LoadFailure> {
        let dataset: Self = serde_json::from_str(body).map_err(|error| {
            if error.is_data() {
                LoadFailure::Shape(error.to_string())
            } else {
                LoadFailure::Malformed(error.to_string())
            }
        })?;
        dataset.validate(required).map_err(LoadFailure::Shape)?;
        Ok(dataset)
    }

    pub fn validate(&self, required: Indicator) -> Result<(), String> {
        if self.entities.is_empty() {
            return Err("entity list is empty".to_string());
        }
        if self.series(required).is_none() {
            return Err(format!("indicator {} is missing", required.key()));
        }
        for (key, series) in &self.indicators {
            series.validate(key, self.entities.len())?;
        }
        if !self.locations.is_empty() && self.locations.len() != self.entities.len() {
            return Err(format!(
                "{} locations for {} entities",
                self.locations.len(),
                self.entities.len()
            ));
        }
        Ok(())
    }

    pub fn series(&self, indicator: Indicator) -> Option<&IndicatorSeries> {
        self.indicators.get(indicator.key())
    }

    /// Linear, case-sensitive lookup of an entity by name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entities.iter().position(|entity| entity == name)
    }

    pub fn value_of(&self, name: &str, indicator: Indicator) -> Option<f64> {
        let index = self.position(name)?;
        self.series(indicator)?.values.get(index).copied()
    }

    pub fn location(&self, index: usize) -> Option<&Location> {
        self.locations.get(index)
    }

    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(fallback)
    }
}

/// Everything the renderers read, loaded as one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Datasets {
    pub region: RegionDataset,
    pub national: RegionDataset,
    pub global: RegionDataset,
    pub boundaries: GeoBoundary,
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGION: &str = r#"{
        "name": "Sharqia",
        "districts": ["Zagazig", "Belbeis", "Abu Hammad"],
        "indicators": {
            "diabetes": {
                "values": [18, 22, 15],
                "years": [2019, "2020"],
                "trend": [16.1, 17.0],
                "egyptAvg": 15.2
            },
            "pollution": { "values": [65, 80, 50] }
        }
    }"#;

    #[test]
    fn parses_district_alias_and_mixed_years() {
        let dataset = RegionDataset::from_json(REGION, Indicator::Diabetes).unwrap();
        assert_eq!(dataset.entities, vec!["Zagazig", "Belbeis", "Abu Hammad"]);
        let diabetes = dataset.series(Indicator::Diabetes).unwrap();
        assert_eq!(diabetes.year_labels(), vec!["2019", "2020"]);
        assert!(diabetes.has_trend());
        assert_eq!(diabetes.reference_average(), Some(15.2));
    }

    #[test]
    fn reference_falls_back_to_mean() {
        let dataset = RegionDataset::from_json(REGION, Indicator::Diabetes).unwrap();
        let pollution = dataset.series(Indicator::Pollution).unwrap();
        let mean = pollution.reference_average().unwrap();
        assert!((mean - 65.0).abs() < 1e-9);
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let dataset = RegionDataset::from_json(REGION, Indicator::Diabetes).unwrap();
        assert_eq!(dataset.value_of("Belbeis", Indicator::Diabetes), Some(22.0));
        assert_eq!(dataset.value_of("belbeis", Indicator::Diabetes), None);
        assert_eq!(dataset.value_of("Belbeis", Indicator::LifeExpectancy), None);
    }

    #[test]
    fn missing_required_indicator_is_a_shape_failure() {
        let result = RegionDataset::from_json(REGION, Indicator::LifeExpectancy);
        assert_eq!(
            result,
            Err(LoadFailure::Shape(
                "indicator lifeExpectancy is missing".to_string()
            ))
        );
    }

    #[test]
    fn misaligned_values_are_rejected() {
        let body = r#"{
            "entities": ["A", "B"],
            "indicators": { "diabetes": { "values": [1.0] } }
        }"#;
        let result = RegionDataset::from_json(body, Indicator::Diabetes);
        assert!(matches!(result, Err(LoadFailure::Shape(message)) if message.contains("1 values for 2")));
    }

    #[test]
    fn misaligned_trend_is_rejected() {
        let body = r#"{
            "entities": ["A"],
            "indicators": { "diabetes": { "values": [1.0], "years": [2019, 2020], "trend": [1.0] } }
        }"#;
        let result = RegionDataset::from_json(body, Indicator::Diabetes);
        assert!(matches!(result, Err(LoadFailure::Shape(_))));
    }

    #[test]
    fn missing_key_is_shape_and_bad_syntax_is_malformed() {
        let missing_entities = r#"{ "indicators": {} }"#;
        assert!(matches!(
            RegionDataset::from_json(missing_entities, Indicator::Diabetes),
            Err(LoadFailure::Shape(_))
        ));
        assert!(matches!(
            RegionDataset::from_json("{ not json", Indicator::Diabetes),
            Err(LoadFailure::Malformed(_))
        ));
    }

    #[test]
    fn empty_entity_list_is_rejected() {
        let body = r#"{ "regions": [], "indicators": { "lifeExpectancy": { "values": [] } } }"#;
        assert_eq!(
            RegionDataset::from_json(body, Indicator::LifeExpectancy),
            Err(LoadFailure::Shape("entity list is empty".to_string()))
        );
    }
}
