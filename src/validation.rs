use crate::error::HeatError;
use crate::models::heat::{Score, ScoreInput};
use crate::models::rules::RuleSet;

const MAX_SURFER_NAME_LEN: usize = 32;
const MAX_GOAL: f64 = 20.0;
const MAX_TEXT_LEN: usize = 200;

/// `None`, `""` and whitespace clear the slot; anything else must be a
/// number within [0, 10].
pub fn parse_score(input: Option<&ScoreInput>) -> Result<Option<Score>, HeatError> {
    match input {
        None => Ok(None),
        Some(ScoreInput::Number(n)) => Score::new(*n).map(Some),
        Some(ScoreInput::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            let value: f64 = text
                .parse()
                .map_err(|_| HeatError::ScoreNotNumeric(text.to_string()))?;
            Score::new(value).map(Some)
        }
    }
}

pub fn validate_code(code: i64, rules: &RuleSet) -> Result<u8, HeatError> {
    let max = rules.code_count();
    u8::try_from(code)
        .ok()
        .filter(|c| *c < max)
        .ok_or(HeatError::InvalidCode { code, max })
}

pub fn validate_surfer_name(name: &str) -> String {
    name.trim().chars().take(MAX_SURFER_NAME_LEN).collect()
}

pub fn validate_goal(goal: f64) -> Result<f64, HeatError> {
    if (0.0..=MAX_GOAL).contains(&goal) {
        Ok(goal)
    } else {
        Err(HeatError::InvalidField {
            field: "goal",
            reason: format!("must be between 0 and {}", MAX_GOAL),
        })
    }
}

pub fn validate_duration(minutes: u32) -> Result<u32, HeatError> {
    if (1..=120).contains(&minutes) {
        Ok(minutes)
    } else {
        Err(HeatError::InvalidField {
            field: "duration",
            reason: "must be 1-120 minutes".into(),
        })
    }
}

pub fn validate_text(field: &'static str, value: &str) -> Result<String, HeatError> {
    let trimmed = value.trim();
    if trimmed.chars().count() > MAX_TEXT_LEN {
        Err(HeatError::InvalidField {
            field,
            reason: format!("longer than {} characters", MAX_TEXT_LEN),
        })
    } else {
        Ok(trimmed.to_string())
    }
}
