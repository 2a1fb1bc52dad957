use super::heat::Score;
use serde::{Serialize, Serializer};

/// Counted heat total in half-hundredths of a point, so a halved wave
/// stays exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Total(u32);

impl Total {
    pub const ZERO: Total = Total(0);

    pub fn from_half_hundredths(half_hundredths: u32) -> Self {
        Total(half_hundredths)
    }

    pub fn value(self) -> f64 {
        f64::from(self.0) / 200.0
    }
}

impl Serialize for Total {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub idx: usize,
    pub color: String,
    pub name: String,
    pub top_waves: Vec<Score>,
    pub all_waves_sorted: Vec<Score>,
    /// Present waves in ride order.
    pub all_waves: Vec<Score>,
    pub total: Total,
    pub interference: u8,
    pub interference_label: &'static str,
    pub position: usize,
}

/// Surfers without a priority call share `Tied`; called surfers get a
/// numbered place after all tied surfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityPosition {
    Tied,
    Place(usize),
}

impl Serialize for PriorityPosition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PriorityPosition::Tied => serializer.serialize_str("TIED"),
            PriorityPosition::Place(n) => serializer.serialize_u64(*n as u64),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityEntry {
    pub position: PriorityPosition,
    pub color: String,
    pub idx: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_position_serializes_as_tied_or_number() {
        let tied = serde_json::to_value(PriorityPosition::Tied).unwrap();
        assert_eq!(tied, serde_json::json!("TIED"));
        let placed = serde_json::to_value(PriorityPosition::Place(3)).unwrap();
        assert_eq!(placed, serde_json::json!(3));
    }

    #[test]
    fn test_total_serializes_as_points() {
        let total = Total::from_half_hundredths(1680);
        assert_eq!(total.value(), 8.4);
        assert_eq!(serde_json::to_value(total).unwrap(), serde_json::json!(8.4));
    }
}
