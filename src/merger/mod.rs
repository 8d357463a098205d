//! Moteur de fusion : superpose les remplacements d'un jour au planning de base.
//!
//! Deux passes, puis un tri :
//! 1. chaque paire de base (filtrée par parité) est émise, remplacée si la
//!    première ligne de même (jour, numéro de paire) porte une charge `to` ;
//! 2. les remplacements sans paire de base correspondante sont ajoutés, puis
//!    tous les commentaires ;
//! 3. tri stable par libellé de paire, commentaires en dernier.
//!
//! La fusion ne renvoie jamais d'erreur : les entrées malformées sont
//! tolérées et signalées dans [`MergeStats::anomalies`].

mod baseline;
mod extras;
mod types;
mod util;

pub use types::{Anomaly, AnomalyKind, MergeOptions, MergeOutcome, MergeStats};

use crate::interval::IntervalCache;
use crate::model::{BaselineSchedule, MergedEntry, MergedSchedule, PeriodRecord, ReplacementBatch};
use tracing::debug;

/// État d'une fusion (un jour, un groupe).
struct MergeState<'a> {
    baseline: &'a [PeriodRecord],
    replacements: &'a ReplacementBatch,
    intervals: IntervalCache,
    /// (jour normalisé, libellé) des paires émises : de base, puis ajoutées.
    emitted: Vec<(String, String)>,
    entries: Vec<MergedEntry>,
    stats: MergeStats,
}

impl<'a> MergeState<'a> {
    fn new(baseline: &'a BaselineSchedule, replacements: &'a ReplacementBatch) -> Self {
        Self {
            baseline: &baseline.schedule,
            replacements,
            intervals: IntervalCache::new(),
            emitted: Vec::new(),
            entries: Vec::with_capacity(baseline.schedule.len() + replacements.records.len()),
            stats: MergeStats::default(),
        }
    }
}

/// Merger : applique les options à chaque fusion, sans état entre deux appels.
#[derive(Debug, Default, Clone)]
pub struct Merger {
    opts: MergeOptions,
}

impl Merger {
    pub fn new(opts: MergeOptions) -> Self {
        Self { opts }
    }

    /// Fusionne un jour déjà filtré des deux sources (chacune peut être vide).
    pub fn merge(
        &self,
        baseline: &BaselineSchedule,
        replacements: &ReplacementBatch,
    ) -> MergeOutcome {
        let mut state = MergeState::new(baseline, replacements);

        baseline::overlay(&mut state);
        extras::append_added_periods(&mut state);
        extras::append_comments(&mut state, self.opts);
        util::sort_entries(&mut state.entries);

        let group = if baseline.group.trim().is_empty() {
            replacements.group.clone()
        } else {
            baseline.group.clone()
        };
        debug!(
            group = %group,
            kept = state.stats.kept,
            replaced = state.stats.replaced,
            added = state.stats.added,
            skipped = state.stats.skipped_parity,
            comments = state.stats.comments,
            "schedules merged"
        );

        MergeOutcome {
            schedule: MergedSchedule {
                group,
                schedule: state.entries,
            },
            stats: state.stats,
        }
    }
}

/// Fusion avec les options par défaut.
pub fn merge_schedules(
    baseline: &BaselineSchedule,
    replacements: &ReplacementBatch,
) -> MergedSchedule {
    Merger::default().merge(baseline, replacements).schedule
}
