//! Time-of-day and seasonal mood bias.
//!
//! A pure function of wall-clock time: the hour picks one of six day
//! buckets, the month one of four seasons, and both contribute fixed deltas
//! to brightness, density, and timbre, scaled by two independent strength
//! knobs. Nothing here reads the graph; the dynamic orchestration manager
//! folds the result into layer volumes and instrument choices.

use chrono::{DateTime, Datelike, Local, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::SonifierError;

// ============================================================================
// Buckets
// ============================================================================

/// Six-way partition of the day by hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    DeepNight,
    Dawn,
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Bucket an hour (0–23).
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=4 => Self::DeepNight,
            5..=7 => Self::Dawn,
            8..=11 => Self::Morning,
            12..=16 => Self::Afternoon,
            17..=20 => Self::Evening,
            _ => Self::Night,
        }
    }

    fn brightness_delta(self) -> f64 {
        match self {
            Self::DeepNight => -0.25,
            Self::Dawn => 0.05,
            Self::Morning => 0.20,
            Self::Afternoon => 0.10,
            Self::Evening => -0.05,
            Self::Night => -0.15,
        }
    }

    fn density_delta(self) -> f64 {
        match self {
            Self::DeepNight => -0.20,
            Self::Dawn => -0.10,
            Self::Morning => 0.10,
            Self::Afternoon => 0.15,
            Self::Evening => 0.05,
            Self::Night => -0.10,
        }
    }

    fn timbre_delta(self) -> f64 {
        match self {
            Self::DeepNight => -0.30,
            Self::Dawn => 0.10,
            Self::Morning => 0.25,
            Self::Afternoon => 0.15,
            Self::Evening => -0.10,
            Self::Night => -0.20,
        }
    }

    /// Instruments that suit this part of the day.
    pub fn preferred_instruments(self) -> &'static [&'static str] {
        match self {
            Self::DeepNight => &["warm-pad", "soft-strings", "celesta", "choir"],
            Self::Dawn => &["harp", "flute", "celesta", "warm-pad"],
            Self::Morning => &["piano", "violin", "flute", "trumpet"],
            Self::Afternoon => &["piano", "string-ensemble", "brass-ensemble", "violin"],
            Self::Evening => &["french-horn", "string-ensemble", "warm-pad", "harp"],
            Self::Night => &["choir", "warm-pad", "soft-strings", "vibraphone"],
        }
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeepNight => write!(f, "deep-night"),
            Self::Dawn => write!(f, "dawn"),
            Self::Morning => write!(f, "morning"),
            Self::Afternoon => write!(f, "afternoon"),
            Self::Evening => write!(f, "evening"),
            Self::Night => write!(f, "night"),
        }
    }
}

/// Meteorological season by month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Bucket a month (1–12).
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            9..=11 => Self::Autumn,
            _ => Self::Winter,
        }
    }

    fn brightness_delta(self) -> f64 {
        match self {
            Self::Spring => 0.10,
            Self::Summer => 0.15,
            Self::Autumn => -0.05,
            Self::Winter => -0.15,
        }
    }

    fn density_delta(self) -> f64 {
        match self {
            Self::Spring => 0.05,
            Self::Summer => 0.10,
            Self::Autumn => 0.00,
            Self::Winter => -0.10,
        }
    }

    fn timbre_delta(self) -> f64 {
        match self {
            Self::Spring => 0.15,
            Self::Summer => 0.20,
            Self::Autumn => -0.10,
            Self::Winter => -0.25,
        }
    }

    /// Instruments that suit this season.
    pub fn preferred_instruments(self) -> &'static [&'static str] {
        match self {
            Self::Spring => &["flute", "harp", "violin", "celesta"],
            Self::Summer => &["trumpet", "brass-ensemble", "piano", "lead-synth"],
            Self::Autumn => &["french-horn", "string-ensemble", "vibraphone", "warm-pad"],
            Self::Winter => &["choir", "church-organ", "soft-strings", "warm-pad"],
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spring => write!(f, "spring"),
            Self::Summer => write!(f, "summer"),
            Self::Autumn => write!(f, "autumn"),
            Self::Winter => write!(f, "winter"),
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Knobs for how strongly wall-clock time colors the orchestration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    /// Whether temporal influence is applied at all
    pub enabled: bool,
    /// How strongly the time of day shifts the mood (0.0–1.0)
    pub time_of_day_strength: f64,
    /// How strongly the season shifts the mood (0.0–1.0)
    pub seasonal_strength: f64,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            time_of_day_strength: 0.7,
            seasonal_strength: 0.5,
        }
    }
}

impl TemporalConfig {
    pub fn validate(&self) -> Result<(), SonifierError> {
        if !(0.0..=1.0).contains(&self.time_of_day_strength)
            || !(0.0..=1.0).contains(&self.seasonal_strength)
        {
            return Err(SonifierError::InvalidConfig(
                "temporal strengths must be within [0, 1]".into(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Influence snapshot
// ============================================================================

/// Mood bias derived from one moment in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalInfluence {
    pub time_of_day: TimeOfDay,
    pub season: Season,
    /// How bright the instrumentation should lean (0.0–1.0, neutral 0.5)
    pub instrument_brightness: f64,
    /// How many simultaneous voices fit the mood (0.2–1.0, neutral 0.5)
    pub orchestral_density: f64,
    /// Darker/warmer below 0, brighter/sharper above (−1.0–1.0)
    pub timbre_adjustment: f64,
    /// Instruments favored right now, deduplicated, day bucket first
    pub preferred_instruments: Vec<String>,
}

impl TemporalInfluence {
    /// Influence for the current local wall-clock time.
    pub fn sample(config: &TemporalConfig) -> Self {
        Self::at(Local::now(), config)
    }

    /// Influence for an arbitrary moment.
    pub fn at(datetime: DateTime<Local>, config: &TemporalConfig) -> Self {
        Self::from_parts(
            TimeOfDay::from_hour(datetime.hour()),
            Season::from_month(datetime.month()),
            config,
        )
    }

    /// Influence for explicit buckets.
    pub fn from_parts(time_of_day: TimeOfDay, season: Season, config: &TemporalConfig) -> Self {
        let ts = config.time_of_day_strength;
        let ss = config.seasonal_strength;

        let instrument_brightness = (0.5
            + time_of_day.brightness_delta() * ts
            + season.brightness_delta() * ss)
            .clamp(0.0, 1.0);
        let orchestral_density = (0.5
            + time_of_day.density_delta() * ts
            + season.density_delta() * ss)
            .clamp(0.2, 1.0);
        let timbre_adjustment = (time_of_day.timbre_delta() * ts
            + season.timbre_delta() * ss)
            .clamp(-1.0, 1.0);

        let mut preferred_instruments: Vec<String> = Vec::with_capacity(8);
        for name in time_of_day
            .preferred_instruments()
            .iter()
            .chain(season.preferred_instruments())
        {
            if !preferred_instruments.iter().any(|p| p == name) {
                preferred_instruments.push((*name).to_string());
            }
        }

        Self {
            time_of_day,
            season,
            instrument_brightness,
            orchestral_density,
            timbre_adjustment,
            preferred_instruments,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
