use crate::db::Db;
use crate::error::HeatError;
use crate::models::heat::*;
use crate::models::ranking::{PriorityEntry, RankedResult};
use crate::models::rules::RuleSet;
use crate::services::{priority, scoring, session};
use crate::validation;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// The one live heat. Mutations take the write lock, views the read lock.
pub struct HeatStore {
    rules: RuleSet,
    state: RwLock<Heat>,
}

impl HeatStore {
    pub fn new(rules: RuleSet, default_duration: u32) -> Self {
        let surfers = SURFER_COLORS
            .iter()
            .map(|color| Surfer::new(color, rules.wave_capacity))
            .collect();
        let heat = Heat {
            id: Uuid::new_v4(),
            metadata: HeatMetadata::new(default_duration),
            surfers,
            priority_order: Vec::new(),
        };
        HeatStore {
            rules,
            state: RwLock::new(heat),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    fn read(&self) -> RwLockReadGuard<'_, Heat> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Heat> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn rankings(&self) -> Vec<RankedResult> {
        scoring::rank(&self.read().surfers, &self.rules)
    }

    pub fn view(&self, now: DateTime<Utc>) -> HeatView {
        let heat = self.read();
        HeatView {
            id: heat.id,
            ruleset: self.rules.name,
            metadata: heat.metadata.clone(),
            remaining_seconds: heat.metadata.remaining_seconds(now),
            surfers: heat
                .surfers
                .iter()
                .enumerate()
                .map(|(idx, surfer)| SurferView {
                    idx,
                    interference_label: self.rules.penalty(surfer.interference).label,
                    surfer: surfer.clone(),
                })
                .collect(),
            priority_order: priority::view(&heat.priority_order, &heat.surfers),
            rankings: scoring::rank(&heat.surfers, &self.rules),
        }
    }

    pub fn update_metadata(&self, update: MetadataUpdate) -> Result<(), HeatError> {
        let text = |field: &'static str, value: Option<String>| {
            value
                .map(|v| validation::validate_text(field, &v))
                .transpose()
        };
        let heat_number = text("heat_number", update.heat_number)?;
        let category = text("category", update.category)?;
        let round = text("round", update.round)?;
        let location = text("location", update.location)?;
        let notes = text("notes", update.notes)?;
        let duration = update.duration.map(validation::validate_duration).transpose()?;

        let mut heat = self.write();
        let meta = &mut heat.metadata;
        let fields = [
            (&mut meta.heat_number, heat_number),
            (&mut meta.category, category),
            (&mut meta.round, round),
            (&mut meta.location, location),
            (&mut meta.notes, notes),
        ];
        for (slot, value) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(duration) = duration {
            meta.duration = duration;
        }
        Ok(())
    }

    /// Unknown colors are ignored.
    pub fn update_surfers(&self, update: SurfersUpdate) -> Result<(), HeatError> {
        let mut details = Vec::new();
        for (color, d) in update {
            let goal = validation::validate_goal(d.goal)?;
            details.push((color.to_ascii_lowercase(), validation::validate_surfer_name(&d.name), goal));
        }

        let mut heat = self.write();
        for (color, name, goal) in details {
            if let Some(surfer) = heat
                .surfers
                .iter_mut()
                .find(|s| s.color.eq_ignore_ascii_case(&color))
            {
                surfer.name = name;
                surfer.goal = goal;
            }
        }
        Ok(())
    }

    pub fn start_timer(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.write().metadata.start_time = Some(now);
        log::info!("[HEAT] timer started at {}", now.to_rfc3339());
        now
    }

    pub fn set_wave(
        &self,
        surfer_idx: usize,
        wave_idx: usize,
        score: Option<Score>,
    ) -> Result<Vec<RankedResult>, HeatError> {
        let mut heat = self.write();
        let surfer = heat
            .surfers
            .get_mut(surfer_idx)
            .ok_or(HeatError::SurferIndex(surfer_idx))?;
        let slot = surfer
            .waves
            .get_mut(wave_idx)
            .ok_or(HeatError::WaveIndex(wave_idx))?;
        *slot = score;
        log::debug!(
            "score surfer:{} wave:{} value:{:?}",
            surfer_idx,
            wave_idx,
            score.map(Score::value)
        );
        Ok(scoring::rank(&heat.surfers, &self.rules))
    }

    pub fn set_interference(&self, surfer_idx: usize, code: i64) -> Result<InterferenceResult, HeatError> {
        let code = validation::validate_code(code, &self.rules)?;
        self.apply_interference(surfer_idx, |_| code)
    }

    pub fn cycle_interference(&self, surfer_idx: usize) -> Result<InterferenceResult, HeatError> {
        self.apply_interference(surfer_idx, |current| self.rules.next_code(current))
    }

    fn apply_interference(
        &self,
        surfer_idx: usize,
        next: impl FnOnce(u8) -> u8,
    ) -> Result<InterferenceResult, HeatError> {
        let mut heat = self.write();
        let surfer = heat
            .surfers
            .get_mut(surfer_idx)
            .ok_or(HeatError::SurferIndex(surfer_idx))?;
        surfer.interference = next(surfer.interference);
        let interference = surfer.interference;
        log::debug!("interference surfer:{} code:{}", surfer_idx, interference);
        Ok(InterferenceResult {
            interference,
            rankings: scoring::rank(&heat.surfers, &self.rules),
        })
    }

    pub fn toggle_wave_mark(&self, surfer_idx: usize, wave_idx: usize) -> Result<BTreeSet<usize>, HeatError> {
        if wave_idx >= self.rules.wave_capacity {
            return Err(HeatError::WaveIndex(wave_idx));
        }
        let mut heat = self.write();
        let surfer = heat
            .surfers
            .get_mut(surfer_idx)
            .ok_or(HeatError::SurferIndex(surfer_idx))?;
        if !surfer.interference_waves.remove(&wave_idx) {
            surfer.interference_waves.insert(wave_idx);
        }
        Ok(surfer.interference_waves.clone())
    }

    pub fn grant_priority(&self, surfer_idx: usize) -> Result<Vec<PriorityEntry>, HeatError> {
        let mut heat = self.write();
        if surfer_idx >= heat.surfers.len() {
            return Err(HeatError::SurferIndex(surfer_idx));
        }
        priority::grant(&mut heat.priority_order, surfer_idx);
        log::debug!("priority order: {:?}", heat.priority_order);
        Ok(priority::view(&heat.priority_order, &heat.surfers))
    }

    pub fn priority(&self) -> Vec<PriorityEntry> {
        let heat = self.read();
        priority::view(&heat.priority_order, &heat.surfers)
    }

    /// Closes the heat and records named surfers' totals. Closing an
    /// already-closed heat only returns the rankings.
    pub fn close(&self, db: &Db) -> Result<Vec<RankedResult>, HeatError> {
        let mut heat = self.write();
        let results = scoring::rank(&heat.surfers, &self.rules);

        if heat.metadata.is_closed {
            log::warn!("[HEAT] close requested for already closed heat:{}", heat.id);
            return Ok(results);
        }

        let goals: Vec<(String, f64)> = heat
            .surfers
            .iter()
            .map(|s| (s.name.clone(), s.goal))
            .collect();
        let entries = session::entries_for(&results, &goals);
        session::commit(db, heat.id, &entries)?;

        heat.metadata.is_closed = true;
        log::info!("[HEAT] closed heat:{} tracked:{}", heat.id, entries.len());
        Ok(results)
    }

    pub fn reopen(&self) {
        let mut heat = self.write();
        heat.metadata.is_closed = false;
        log::info!("[HEAT] reopened heat:{}", heat.id);
    }

    /// Clears scoring for the current heat. Line-up names, goals and the
    /// descriptive metadata are kept; session history is untouched.
    pub fn reset(&self) {
        let mut heat = self.write();
        for surfer in heat.surfers.iter_mut() {
            surfer.clear_scoring();
        }
        heat.priority_order.clear();
        heat.metadata.start_time = None;
        heat.metadata.is_closed = false;
        heat.metadata.notes.clear();
        heat.id = Uuid::new_v4();
        log::info!("[HEAT] reset, new heat:{}", heat.id);
    }
}
