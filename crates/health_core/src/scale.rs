//! Fixed visual scales: colour buckets, percent-of-average and bar widths.

use crate::domain::Indicator;

/// Whether a value equal to a threshold belongs to the bucket above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LowerBound {
    /// `value >= threshold`
    Closed,
    /// `value > threshold`
    Open,
}

/// Colour table keyed by lower thresholds, highest first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketScale {
    thresholds: &'static [(f64, &'static str)],
    lower_bound: LowerBound,
    default: &'static str,
}

/// District prevalence table used by the local choropleth.
pub const PREVALENCE_SCALE: BucketScale = BucketScale {
    thresholds: &[
        (18.0, "#800026"),
        (16.0, "#BD0026"),
        (14.0, "#E31A1C"),
        (12.0, "#FC4E2A"),
        (10.0, "#FD8D3C"),
        (8.0, "#FEB24C"),
    ],
    lower_bound: LowerBound::Closed,
    default: "#FFEDA0",
};

/// World-region life expectancy table used by the global map: `>75`,
/// `70–75`, `65–70`, `<65`.
pub const LIFE_EXPECTANCY_SCALE: BucketScale = BucketScale {
    thresholds: &[(75.0, "#1A9850"), (70.0, "#91CF60"), (65.0, "#FC8D59")],
    lower_bound: LowerBound::Open,
    default: "#D73027",
};

impl BucketScale {
    /// Colour of the first bucket whose threshold `value` reaches.
    ///
    /// Missing values and NaN fall through every comparison and take the
    /// default colour.
    pub fn color(&self, value: Option<f64>) -> &'static str {
        let Some(value) = value else {
            return self.default;
        };
        self.thresholds
            .iter()
            .find(|(threshold, _)| match self.lower_bound {
                LowerBound::Closed => value >= *threshold,
                LowerBound::Open => value > *threshold,
            })
            .map_or(self.default, |(_, color)| *color)
    }

    pub const fn default_color(&self) -> &'static str {
        self.default
    }

    pub const fn bucket_count(&self) -> usize {
        self.thresholds.len()
    }

    /// Legend rows in ascending order: `8–10`, ..., `18+`.
    pub fn legend(&self) -> Vec<(String, &'static str)> {
        let ascending = self.thresholds.iter().rev().collect::<Vec<_>>();
        ascending
            .iter()
            .enumerate()
            .map(|(index, (threshold, color))| {
                let label = ascending.get(index + 1).map_or_else(
                    || format!("{threshold}+"),
                    |(upper, _)| format!("{threshold}–{upper}"),
                );
                (label, *color)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Good,
    Warning,
}

impl Severity {
    /// `Warning` when the value is above the reference, for every indicator.
    pub fn classify(value: f64, reference: f64) -> Self {
        if value > reference {
            Self::Warning
        } else {
            Self::Good
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
        }
    }
}

/// `value / reference * 100` rounded to one decimal place.
///
/// Returns `None` when the reference is not a positive finite number.
pub fn percent_of_average(value: f64, reference: f64) -> Option<f64> {
    if !reference.is_finite() || reference <= 0.0 {
        return None;
    }
    Some(round_one_decimal(value / reference * 100.0))
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Progress-bar width in percent, clamped to `[0, 100]`.
pub fn bar_width(indicator: Indicator, value: f64) -> f64 {
    (value * indicator.bar_scale()).clamp(0.0, 100.0)
}

/// Circle radius for a governorate marker.
pub fn population_radius(population: f64) -> f64 {
    (population.max(0.0) / 1_000_000.0).sqrt() * 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(diff < 1e-9, "expected {expected}, got {actual}, diff {diff}");
    }

    #[test]
    fn prevalence_thresholds_are_closed_below() {
        assert_eq!(PREVALENCE_SCALE.color(Some(18.0)), "#800026");
        assert_eq!(PREVALENCE_SCALE.color(Some(18.0001)), "#800026");
        assert_eq!(PREVALENCE_SCALE.color(Some(17.999)), "#BD0026");
        assert_eq!(PREVALENCE_SCALE.color(Some(16.0)), "#BD0026");
        assert_eq!(PREVALENCE_SCALE.color(Some(8.0)), "#FEB24C");
        assert_eq!(PREVALENCE_SCALE.color(Some(7.99)), "#FFEDA0");
        assert_eq!(PREVALENCE_SCALE.color(Some(-3.0)), "#FFEDA0");
    }

    #[test]
    fn prevalence_scale_is_monotonic() {
        let order = [
            "#FFEDA0", "#FEB24C", "#FD8D3C", "#FC4E2A", "#E31A1C", "#BD0026", "#800026",
        ];
        let mut last_rank = 0;
        for step in 0..=300 {
            let value = f64::from(step) / 10.0;
            let color = PREVALENCE_SCALE.color(Some(value));
            let rank = order
                .iter()
                .position(|candidate| *candidate == color)
                .unwrap_or(usize::MAX);
            assert!(rank != usize::MAX, "{value} mapped outside the table");
            assert!(rank >= last_rank, "{value} dropped a bucket");
            last_rank = rank;
        }
        assert_eq!(last_rank, order.len() - 1);
    }

    #[test]
    fn missing_values_take_default_bucket() {
        assert_eq!(PREVALENCE_SCALE.color(None), PREVALENCE_SCALE.default_color());
        assert_eq!(PREVALENCE_SCALE.color(Some(f64::NAN)), "#FFEDA0");
    }

    #[test]
    fn legend_lists_six_ascending_buckets() {
        let legend = PREVALENCE_SCALE.legend();
        assert_eq!(legend.len(), PREVALENCE_SCALE.bucket_count());
        assert_eq!(legend[0], ("8–10".to_string(), "#FEB24C"));
        assert_eq!(legend[5], ("18+".to_string(), "#800026"));
    }

    #[test]
    fn life_expectancy_buckets() {
        assert_eq!(LIFE_EXPECTANCY_SCALE.color(Some(78.5)), "#1A9850");
        assert_eq!(LIFE_EXPECTANCY_SCALE.color(Some(75.0)), "#91CF60");
        assert_eq!(LIFE_EXPECTANCY_SCALE.color(Some(75.01)), "#1A9850");
        assert_eq!(LIFE_EXPECTANCY_SCALE.color(Some(72.0)), "#91CF60");
        assert_eq!(LIFE_EXPECTANCY_SCALE.color(Some(66.0)), "#FC8D59");
        assert_eq!(LIFE_EXPECTANCY_SCALE.color(Some(62.0)), "#D73027");
    }

    #[test]
    fn percent_of_average_rounds_to_one_decimal() {
        assert_eq!(percent_of_average(18.0, 15.2), Some(118.4));
        assert_eq!(percent_of_average(15.0, 15.0), Some(100.0));
        assert_eq!(percent_of_average(15.0, 0.0), None);
    }

    #[test]
    fn severity_warns_above_reference() {
        assert_eq!(Severity::classify(18.0, 15.2), Severity::Warning);
        assert_eq!(Severity::classify(15.2, 15.2), Severity::Good);
        assert_eq!(Severity::classify(71.0, 73.2), Severity::Good);
        assert_eq!(Severity::classify(79.0, 73.2), Severity::Warning);
    }

    #[test]
    fn bar_width_never_exceeds_full() {
        assert_close(bar_width(Indicator::Diabetes, 15.0), 75.0);
        assert_close(bar_width(Indicator::Diabetes, 22.0), 100.0);
        assert_close(bar_width(Indicator::InfantMortality, 18.0), 54.0);
        assert_close(bar_width(Indicator::MaternalMortality, 60.0), 30.0);
    }

    #[test]
    fn radius_scales_with_square_root_of_population() {
        assert_close(population_radius(4_000_000.0), 20.0);
        assert_close(population_radius(1_000_000.0), 10.0);
        assert_close(population_radius(-5.0), 0.0);
    }
}
