use crate::db::Db;
use crate::error::HeatError;
use crate::models::ranking::RankedResult;
use crate::models::session::SessionRecord;
use rusqlite::params;
use uuid::Uuid;

/// Total of one named surfer in one closed heat.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatEntry {
    pub name: String,
    pub goal: f64,
    pub color: String,
    pub total: f64,
}

/// Builds the entries worth recording: only surfers with a name are tracked.
pub fn entries_for(results: &[RankedResult], goals: &[(String, f64)]) -> Vec<HeatEntry> {
    results
        .iter()
        .filter_map(|r| {
            let (name, goal) = goals.get(r.idx)?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some(HeatEntry {
                name: name.to_string(),
                goal: *goal,
                color: r.color.clone(),
                total: r.total.value(),
            })
        })
        .collect()
}

/// Records a heat's totals. A name keeps the goal it was first tracked with.
/// Committing the same heat again replaces everything recorded for it, and
/// names left with no heats drop out of the tracker.
pub fn commit(db: &Db, heat_id: Uuid, entries: &[HeatEntry]) -> Result<usize, HeatError> {
    let heat_id = heat_id.to_string();
    let (written, replaced) = db.with_conn(|conn| {
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT OR IGNORE INTO closed_heats (heat_id) VALUES (?1)",
            params![heat_id],
        )?;
        let replaced = tx.execute("DELETE FROM session_heats WHERE heat_id = ?1", params![heat_id])?;
        for entry in entries {
            tx.execute(
                "INSERT OR IGNORE INTO session_surfers (name, goal) VALUES (?1, ?2)",
                params![entry.name, entry.goal],
            )?;
            tx.execute(
                "INSERT INTO session_heats (name, heat_id, color, total) VALUES (?1, ?2, ?3, ?4)",
                params![entry.name, heat_id, entry.color, entry.total],
            )?;
        }
        tx.execute(
            "DELETE FROM session_surfers
             WHERE name NOT IN (SELECT name FROM session_heats)",
            [],
        )?;
        tx.commit()?;
        Ok((entries.len(), replaced))
    })?;

    if replaced > 0 {
        log::info!("[SESSION] replaced {} rows for heat:{}", replaced, heat_id);
    }
    log::info!("[SESSION] committed heat:{} surfers:{}", heat_id, written);
    Ok(written)
}

pub fn records(db: &Db) -> Result<Vec<SessionRecord>, HeatError> {
    let rows = db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT s.name, s.goal, h.total
             FROM session_surfers s
             LEFT JOIN session_heats h ON h.name = s.name
             LEFT JOIN closed_heats c ON c.heat_id = h.heat_id
             ORDER BY s.rowid, c.seq, h.id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, Option<f64>>(2)?,
            ))
        })?;
        rows.collect::<Result<Vec<_>, _>>()
    })?;

    let mut grouped: Vec<(String, f64, Vec<f64>)> = Vec::new();
    for (name, goal, total) in rows {
        match grouped.last_mut() {
            Some((last, _, heats)) if *last == name => heats.extend(total),
            _ => grouped.push((name, goal, total.into_iter().collect())),
        }
    }

    Ok(grouped
        .into_iter()
        .map(|(name, goal, heats)| SessionRecord::new(name, goal, heats))
        .collect())
}
