use crate::error::HeatError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

use super::ranking::{PriorityEntry, RankedResult};

pub const SURFER_COLORS: &[&str] = &["Red", "Yellow", "Black", "White", "Blue"];

/// A judged wave, always within [0, 10], held in hundredths of a point so
/// sums and comparisons are exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u16);

impl Score {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 10.0;

    /// Rounds to the nearest hundredth after the range check.
    pub fn new(value: f64) -> Result<Self, HeatError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Score((value * 100.0).round() as u16))
        } else {
            Err(HeatError::ScoreOutOfRange(value))
        }
    }

    pub fn hundredths(self) -> u16 {
        self.0
    }

    pub fn value(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Surfer {
    pub color: String,
    pub name: String,
    pub goal: f64,
    pub waves: Vec<Option<Score>>,
    pub interference: u8,
    pub interference_waves: BTreeSet<usize>,
}

impl Surfer {
    pub fn new(color: &str, wave_capacity: usize) -> Self {
        Surfer {
            color: color.to_string(),
            name: String::new(),
            goal: 0.0,
            waves: vec![None; wave_capacity],
            interference: 0,
            interference_waves: BTreeSet::new(),
        }
    }

    pub fn present_waves(&self) -> impl Iterator<Item = Score> + '_ {
        self.waves.iter().flatten().copied()
    }

    pub fn clear_scoring(&mut self) {
        self.waves.iter_mut().for_each(|w| *w = None);
        self.interference = 0;
        self.interference_waves.clear();
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HeatMetadata {
    pub heat_number: String,
    pub category: String,
    pub round: String,
    pub location: String,
    pub duration: u32,
    pub start_time: Option<DateTime<Utc>>,
    pub is_closed: bool,
    pub notes: String,
}

impl HeatMetadata {
    pub fn new(duration: u32) -> Self {
        HeatMetadata {
            heat_number: String::new(),
            category: String::new(),
            round: String::new(),
            location: String::new(),
            duration,
            start_time: None,
            is_closed: false,
            notes: String::new(),
        }
    }

    /// Seconds left on the heat clock, if it has been started.
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> Option<i64> {
        let start = self.start_time?;
        let elapsed = (now - start).num_seconds();
        Some((i64::from(self.duration) * 60 - elapsed).max(0))
    }
}

#[derive(Debug, Clone)]
pub struct Heat {
    pub id: Uuid,
    pub metadata: HeatMetadata,
    pub surfers: Vec<Surfer>,
    pub priority_order: Vec<usize>,
}

// Request bodies

#[derive(Debug, Default, Deserialize)]
pub struct MetadataUpdate {
    pub heat_number: Option<String>,
    pub category: Option<String>,
    pub round: Option<String>,
    pub location: Option<String>,
    pub duration: Option<u32>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SurferDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub goal: f64,
}

/// Keyed by lower-case color, e.g. `{"red": {"name": "Ana", "goal": 15}}`.
pub type SurfersUpdate = HashMap<String, SurferDetails>;

/// Scores arrive as numbers, numeric strings, empty strings or null.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScoreInput {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
pub struct ScoreUpdate {
    pub surfer_idx: usize,
    pub wave_idx: usize,
    #[serde(default)]
    pub score: Option<ScoreInput>,
}

#[derive(Debug, Deserialize)]
pub struct InterferenceUpdate {
    pub surfer_idx: usize,
    /// Absent means advance to the next code.
    #[serde(default)]
    pub code: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct WaveMark {
    pub surfer_idx: usize,
    pub wave_idx: usize,
}

#[derive(Debug, Deserialize)]
pub struct PriorityGrant {
    pub surfer_idx: usize,
}

// Responses

#[derive(Debug, Serialize)]
pub struct SurferView {
    pub idx: usize,
    #[serde(flatten)]
    pub surfer: Surfer,
    pub interference_label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HeatView {
    pub id: Uuid,
    pub ruleset: &'static str,
    pub metadata: HeatMetadata,
    pub remaining_seconds: Option<i64>,
    pub surfers: Vec<SurferView>,
    pub priority_order: Vec<PriorityEntry>,
    pub rankings: Vec<RankedResult>,
}

#[derive(Debug, Serialize)]
pub struct RankingsResponse {
    pub rankings: Vec<RankedResult>,
}

#[derive(Debug, Serialize)]
pub struct InterferenceResult {
    pub interference: u8,
    pub rankings: Vec<RankedResult>,
}

#[derive(Debug, Serialize)]
pub struct WaveMarkResult {
    pub interference_waves: BTreeSet<usize>,
}

#[derive(Debug, Serialize)]
pub struct PriorityResponse {
    pub priority_order: Vec<PriorityEntry>,
}

#[derive(Debug, Serialize)]
pub struct TimerStarted {
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Ack { success: true }
    }
}
