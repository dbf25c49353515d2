/// Comparison scope selected in the mode selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Local,
    National,
    Global,
}

impl Mode {
    pub const ALL: [Self; 3] = [Self::Local, Self::National, Self::Global];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::National => "national",
            Self::Global => "global",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Local),
            1 => Some(Self::National),
            2 => Some(Self::Global),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Local => 0,
            Self::National => 1,
            Self::Global => 2,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "local" => Some(Self::Local),
            "national" => Some(Self::National),
            "global" => Some(Self::Global),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Local => "Sharqia Districts",
            Self::National => "Egypt Governorates",
            Self::Global => "World Regions",
        }
    }
}

/// Health indicator carried by the datasets, keyed by its JSON name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Indicator {
    Diabetes,
    Pollution,
    InfantMortality,
    MaternalMortality,
    LifeExpectancy,
}

impl Indicator {
    pub const ALL: [Self; 5] = [
        Self::Diabetes,
        Self::Pollution,
        Self::InfantMortality,
        Self::MaternalMortality,
        Self::LifeExpectancy,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Diabetes => "diabetes",
            Self::Pollution => "pollution",
            Self::InfantMortality => "infantMortality",
            Self::MaternalMortality => "maternalMortality",
            Self::LifeExpectancy => "lifeExpectancy",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|indicator| indicator.key() == value)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Diabetes => "Diabetes Rate",
            Self::Pollution => "Air Pollution (PM2.5)",
            Self::InfantMortality => "Infant Mortality",
            Self::MaternalMortality => "Maternal Mortality",
            Self::LifeExpectancy => "Life Expectancy",
        }
    }

    pub const fn unit(self) -> &'static str {
        match self {
            Self::Diabetes => "%",
            Self::Pollution => "µg/m³",
            Self::InfantMortality => "per 1,000",
            Self::MaternalMortality => "per 100k",
            Self::LifeExpectancy => "years",
        }
    }

    /// Multiplier turning a value into a progress-bar width in percent.
    pub const fn bar_scale(self) -> f64 {
        match self {
            Self::Diabetes => 5.0,
            Self::Pollution | Self::LifeExpectancy => 1.0,
            Self::InfantMortality => 3.0,
            Self::MaternalMortality => 0.5,
        }
    }

    /// Value followed by its unit, e.g. `18.0%` or `55.0 per 100k`.
    pub fn format_value(self, value: f64) -> String {
        match self {
            Self::Diabetes => format!("{value:.1}%"),
            _ => format!("{value:.1} {}", self.unit()),
        }
    }
}
