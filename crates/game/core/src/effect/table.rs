//! The effect aggregation engine.
//!
//! One table per combatant, created fresh at battle start so effects never
//! carry over between battles. The table filters rows by enablement, folds
//! every column under its fixed aggregation rule, and materializes a typed
//! [`EffectResult`].

use arrayvec::ArrayVec;
use strum::IntoEnumIterator;

use super::column::{Aggregation, EffectColumn};
use super::context::EffectContext;
use super::entry::{EffectEntry, EntryId, SourceKind};
use super::result::EffectResult;
use crate::config::BattleConfig;
use crate::env::BattleRng;

/// Ordered collection of effect rows plus a seeded random source for
/// probability entries.
#[derive(Debug)]
pub struct EffectTable {
    entries: ArrayVec<EffectEntry, { BattleConfig::MAX_EFFECT_ENTRIES }>,
    next_id: u32,
    rng: BattleRng,
}

impl EffectTable {
    /// Creates an empty table with its own random stream.
    pub fn new(seed: u64) -> Self {
        Self {
            entries: ArrayVec::new(),
            next_id: 0,
            rng: BattleRng::new(seed),
        }
    }

    /// Inserts a row and assigns its id.
    ///
    /// Rows past [`BattleConfig::MAX_EFFECT_ENTRIES`] are silently dropped;
    /// a full table is a content-balance problem, not a battle-fatal one.
    pub fn add_row(&mut self, mut entry: EffectEntry) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        entry.id = id;
        let _ = self.entries.try_push(entry);
        id
    }

    /// Removes a row by id. Unknown ids are ignored.
    pub fn remove_row(&mut self, id: EntryId) {
        self.entries.retain(|e| e.id != id);
    }

    /// Counts down every timed row and purges the expired ones.
    ///
    /// Permanent rows (`duration == None`) are untouched. Triggered one-shot
    /// rows are purged here as well. Non-positive deltas are no-ops.
    pub fn update_durations(&mut self, delta_seconds: f64) {
        if delta_seconds <= 0.0 {
            return;
        }
        self.entries.retain(|entry| {
            if entry.one_shot && entry.triggered {
                return false;
            }
            match &mut entry.duration {
                Some(remaining) => {
                    *remaining -= delta_seconds;
                    *remaining > 0.0
                }
                None => true,
            }
        });
    }

    /// Evaluates the table against a context snapshot.
    ///
    /// For each column the accumulator starts at the column identity and
    /// every enabled row's contribution is folded in under the column's
    /// aggregation rule. Probability rows roll independently per evaluation.
    pub fn calculate(&mut self, ctx: &EffectContext) -> EffectResult {
        // Enablement and probability are decided once per row, not per
        // column, so one roll gates all of a row's contributions.
        let mut enabled: ArrayVec<bool, { BattleConfig::MAX_EFFECT_ENTRIES }> = ArrayVec::new();
        for entry in &self.entries {
            let mut on = Self::row_enabled(entry, ctx);
            if on && entry.probability < 1.0 {
                on = self.rng.roll(entry.probability);
            }
            enabled.push(on);
        }
        self.fold(&enabled)
    }

    /// Evaluates the table without advancing its random stream.
    ///
    /// Rows gated on a probability roll count as inactive, so repeated
    /// previews (snapshot queries, UI refreshes) are pure reads and leave a
    /// replay's roll sequence intact.
    pub fn preview(&self, ctx: &EffectContext) -> EffectResult {
        let mut enabled: ArrayVec<bool, { BattleConfig::MAX_EFFECT_ENTRIES }> = ArrayVec::new();
        for entry in &self.entries {
            enabled.push(Self::row_enabled(entry, ctx) && entry.probability >= 1.0);
        }
        self.fold(&enabled)
    }

    /// Roll-free part of row enablement. A triggered one-shot row is dead
    /// even before the purge in `update_durations` runs.
    fn row_enabled(entry: &EffectEntry, ctx: &EffectContext) -> bool {
        entry.has_uses()
            && !(entry.one_shot && entry.triggered)
            && entry
                .condition
                .as_ref()
                .is_none_or(|condition| condition.evaluate(ctx))
    }

    fn fold(&self, enabled: &[bool]) -> EffectResult {
        let mut result = EffectResult::identity();
        for column in EffectColumn::iter() {
            let mut acc = column.identity();
            for (entry, &on) in self.entries.iter().zip(enabled) {
                if !on {
                    continue;
                }
                match column.aggregation() {
                    Aggregation::Add => {
                        if let Some(value) = entry.value_for(column) {
                            acc += value;
                        }
                    }
                    Aggregation::Multiply => {
                        if let Some(value) = entry.value_for(column)
                            && value != 1.0
                        {
                            acc *= value;
                        }
                    }
                    Aggregation::Max => {
                        if let Some(value) = entry.value_for(column) {
                            acc = acc.max(value);
                        }
                    }
                    Aggregation::Or => {
                        if entry.flag_for(column) {
                            acc = 1.0;
                        }
                    }
                }
            }
            result.set(column, acc);
        }

        for (entry, &on) in self.entries.iter().zip(enabled) {
            if on && !(entry.values.is_empty() && entry.flags.is_empty()) {
                result.active_ids.push(entry.id);
                result.active_sources.push(entry.name.clone());
            }
        }
        result
    }

    /// Books the activations of an applied evaluation.
    ///
    /// Decrements `uses_left` and marks one-shot rows as triggered for every
    /// row whose id contributed to the result. Ids, not names: two rows may
    /// share a display name without sharing their bookkeeping. The engine
    /// calls this once per applied result so reactive sources burn exactly
    /// one use per fire.
    pub fn note_fired(&mut self, result: &EffectResult) {
        for entry in &mut self.entries {
            if !result.active_ids.contains(&entry.id) {
                continue;
            }
            if let Some(uses) = &mut entry.uses_left {
                *uses = uses.saturating_sub(1);
            }
            if entry.one_shot {
                entry.triggered = true;
            }
        }
    }

    /// Adds a stack to every stacking row from the given source.
    pub fn add_stack(&mut self, source: SourceKind, source_id: u32) {
        for entry in &mut self.entries {
            if entry.source == source && entry.source_id == source_id {
                entry.add_stack();
            }
        }
    }

    /// Whether the table carries at least one hostile row.
    ///
    /// Chain payloads count too: a chain row only lands in an opponent's
    /// table when a module inflicted it.
    pub fn has_debuff(&self) -> bool {
        self.entries
            .iter()
            .any(|e| matches!(e.source, SourceKind::Debuff | SourceKind::Chain))
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
