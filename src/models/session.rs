use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalStatus {
    AboveGoal,
    GoalHit,
    InProgress,
    NoGoal,
}

impl GoalStatus {
    pub fn evaluate(best: f64, goal: f64) -> Self {
        if goal <= 0.0 {
            GoalStatus::NoGoal
        } else if best > goal {
            GoalStatus::AboveGoal
        } else if best == goal {
            GoalStatus::GoalHit
        } else {
            GoalStatus::InProgress
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GoalStatus::AboveGoal => "Above Goal",
            GoalStatus::GoalHit => "Goal Hit!",
            GoalStatus::InProgress => "In Progress",
            GoalStatus::NoGoal => "-",
        }
    }
}

impl Serialize for GoalStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One tracked competitor across the session's closed heats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRecord {
    pub name: String,
    pub goal: f64,
    pub heats: Vec<f64>,
    pub best: f64,
    pub average: f64,
    pub status: GoalStatus,
}

impl SessionRecord {
    pub fn new(name: String, goal: f64, heats: Vec<f64>) -> Self {
        let best = heats.iter().copied().fold(0.0, f64::max);
        let average = if heats.is_empty() {
            0.0
        } else {
            heats.iter().sum::<f64>() / heats.len() as f64
        };
        SessionRecord {
            status: GoalStatus::evaluate(best, goal),
            name,
            goal,
            heats,
            best,
            average,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionTracker {
    pub tracker: Vec<SessionRecord>,
}
