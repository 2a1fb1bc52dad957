use crate::error::AppError;
use crate::models::heat::{HeatMetadata, Score, Surfer};
use crate::models::ranking::RankedResult;
use crate::models::session::SessionRecord;
use chrono::{DateTime, Utc};

const SESSION_HEAT_COLUMNS: usize = 6;

fn writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new())
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String, AppError> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(e.to_string()))
}

fn two_places(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

/// `<Category>_H<Heat>.csv` with spaces dropped.
pub fn heat_filename(meta: &HeatMetadata) -> String {
    let clean = |value: &str, fallback: &str| {
        if value.is_empty() {
            fallback.to_string()
        } else {
            value.replace(' ', "")
        }
    };
    format!(
        "{}_H{}.csv",
        clean(&meta.category, "Category"),
        clean(&meta.heat_number, "Heat")
    )
}

pub fn session_filename(now: DateTime<Utc>) -> String {
    format!("KSS_Session_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

pub fn heat_csv(
    meta: &HeatMetadata,
    surfers: &[Surfer],
    results: &[RankedResult],
    wave_capacity: usize,
) -> Result<String, AppError> {
    let mut wtr = writer();

    wtr.write_record(["Heat Number", meta.heat_number.as_str()])?;
    wtr.write_record(["Category", meta.category.as_str()])?;
    wtr.write_record(["Round", meta.round.as_str()])?;
    wtr.write_record(["Location", meta.location.as_str()])?;
    wtr.write_record(["Duration".to_string(), format!("{} minutes", meta.duration)])?;
    if !meta.notes.is_empty() {
        wtr.write_record(["Notes", meta.notes.as_str()])?;
    }
    wtr.write_record([""])?;

    wtr.write_record(["FULL SCORING GRID"])?;
    let header = std::iter::once("Surfer".to_string()).chain((1..=wave_capacity).map(|i| format!("W{}", i)));
    wtr.write_record(header)?;
    for surfer in surfers {
        let row = std::iter::once(surfer.color.clone())
            .chain(surfer.waves.iter().map(|w| two_places(w.map(Score::value))));
        wtr.write_record(row)?;
    }
    wtr.write_record([""])?;

    wtr.write_record(["FINAL RESULTS"])?;
    wtr.write_record(["Position", "Surfer", "Best Wave", "2nd Wave", "Total", "Interference"])?;
    for result in results {
        wtr.write_record([
            result.position.to_string(),
            result.color.clone(),
            two_places(result.top_waves.first().copied().map(Score::value)),
            two_places(result.top_waves.get(1).copied().map(Score::value)),
            format!("{:.2}", result.total.value()),
            result.interference_label.to_string(),
        ])?;
    }

    finish(wtr)
}

pub fn session_csv(records: &[SessionRecord], now: DateTime<Utc>) -> Result<String, AppError> {
    let mut wtr = writer();

    wtr.write_record(["SESSION PERFORMANCE TRACKER"])?;
    wtr.write_record(["Generated:".to_string(), now.format("%Y-%m-%d %H:%M:%S").to_string()])?;
    wtr.write_record([""])?;

    let header = std::iter::once("Surfer Name".to_string())
        .chain((1..=SESSION_HEAT_COLUMNS).map(|i| format!("Heat {}", i)))
        .chain(["Average", "Goal Score", "Best Score", "Status"].map(String::from));
    wtr.write_record(header)?;

    for record in records {
        let positive = |v: f64, places: usize| {
            if v > 0.0 {
                format!("{:.*}", places, v)
            } else {
                "-".to_string()
            }
        };
        let heats = (0..SESSION_HEAT_COLUMNS).map(|i| two_places(record.heats.get(i).copied()));
        let row = std::iter::once(record.name.clone()).chain(heats).chain([
            positive(record.average, 2),
            positive(record.goal, 1),
            positive(record.best, 2),
            record.status.label().to_string(),
        ]);
        wtr.write_record(row)?;
    }

    finish(wtr)
}
