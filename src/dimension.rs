//! The ten wellbeing dimensions.
//!
//! A `Dimension` indexes every per-country score vector in the crate. The
//! declaration order is the canonical order used for column layout and for
//! any arithmetic that folds over dimensions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WellbeingError;

/// Number of wellbeing dimensions
pub const DIMENSION_COUNT: usize = 10;

/// Direction in which a raw indicator value is "better"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Higher raw values are better; min-max scaled
    HigherIsBetter,
    /// Lower raw values are better; percentile-rank inverted
    LowerIsBetter,
}

/// One of the ten OECD wellbeing dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    LifeSatisfaction,
    Health,
    Income,
    Education,
    Jobs,
    WorkLifeBalance,
    Safety,
    Environment,
    SocialConnections,
    Housing,
}

impl Dimension {
    /// All dimensions in canonical order
    pub const ALL: [Dimension; DIMENSION_COUNT] = [
        Dimension::LifeSatisfaction,
        Dimension::Health,
        Dimension::Income,
        Dimension::Education,
        Dimension::Jobs,
        Dimension::WorkLifeBalance,
        Dimension::Safety,
        Dimension::Environment,
        Dimension::SocialConnections,
        Dimension::Housing,
    ];

    /// Position in the canonical order
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Column name in the profile artifact
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LifeSatisfaction => "life_satisfaction",
            Self::Health => "health",
            Self::Income => "income",
            Self::Education => "education",
            Self::Jobs => "jobs",
            Self::WorkLifeBalance => "work_life_balance",
            Self::Safety => "safety",
            Self::Environment => "environment",
            Self::SocialConnections => "social_connections",
            Self::Housing => "housing",
        }
    }

    /// Human readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LifeSatisfaction => "Life Satisfaction",
            Self::Health => "Health",
            Self::Income => "Income",
            Self::Education => "Education",
            Self::Jobs => "Jobs",
            Self::WorkLifeBalance => "Work-Life Balance",
            Self::Safety => "Safety",
            Self::Environment => "Environment",
            Self::SocialConnections => "Social Connections",
            Self::Housing => "Housing",
        }
    }

    /// Name of the gap column in the profile artifact
    #[must_use]
    pub fn gap_column(self) -> String {
        format!("{}_gap", self.name())
    }

    /// OECD measure this dimension is built from by default
    #[must_use]
    pub const fn default_measure(self) -> &'static str {
        match self {
            Self::LifeSatisfaction => "Life satisfaction",
            Self::Health => "Life expectancy at birth",
            Self::Income => "Households and NPISHs net adjusted disposable income per capita",
            Self::Education => "Adult literacy skills",
            Self::Jobs => "Employment rate",
            Self::WorkLifeBalance => "Long hours in paid work",
            Self::Safety => "Homicides",
            Self::Environment => "Access to green space",
            Self::SocialConnections => "Social support",
            Self::Housing => "Housing affordability",
        }
    }

    /// Default polarity of the measure
    #[must_use]
    pub const fn default_polarity(self) -> Polarity {
        match self {
            Self::WorkLifeBalance | Self::Safety | Self::Housing => Polarity::LowerIsBetter,
            _ => Polarity::HigherIsBetter,
        }
    }

    /// Short description of what the raw measure captures
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::LifeSatisfaction => "Overall life satisfaction score",
            Self::Health => "Years of life expectancy",
            Self::Income => "Household income",
            Self::Education => "Adult literacy proficiency",
            Self::Jobs => "Employment rate",
            Self::WorkLifeBalance => "Working very long hours",
            Self::Safety => "Homicide rate per 100k",
            Self::Environment => "Urban green space access",
            Self::SocialConnections => "Having social support",
            Self::Housing => "Housing cost burden",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dimension {
    type Err = WellbeingError;

    /// Accepts the column name, the label, or either with `-`/space separators
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|d| d.name() == key)
            .ok_or_else(|| WellbeingError::UnknownDimension(s.to_string()))
    }
}
