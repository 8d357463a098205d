use super::types::{Anomaly, AnomalyKind, MergeStats};
use crate::locale::canonical_day;
use crate::model::{MergedEntry, PeriodRecord, ReplacementBatch, Substitution};
use crate::normalize::{
    normalize_base_period, parse_period_sort_key, sub_slot_index, PeriodKey,
};
use tracing::warn;

/// Même numéro de paire ; deux sous-créneaux explicites doivent en plus coïncider.
///
/// `"4"` couvre `"4/1"` et `"4/2"`, mais `"4/1"` ne couvre pas `"4/2"`.
pub(super) fn labels_match(a: &str, b: &str) -> bool {
    let (Some(base_a), Some(base_b)) = (normalize_base_period(a), normalize_base_period(b)) else {
        return false;
    };
    if base_a != base_b {
        return false;
    }
    match (sub_slot_index(a), sub_slot_index(b)) {
        (Some(x), Some(y)) => x == y,
        _ => true,
    }
}

/// Premier remplacement du même jour dont le libellé correspond ; l'ordre d'entrée fait foi.
pub(super) fn find_substitution<'a>(
    batch: &'a ReplacementBatch,
    day_key: &str,
    label: &str,
) -> Option<&'a Substitution> {
    batch.substitutions().find(|s| {
        canonical_day(&s.day) == day_key
            && s.period_label
                .as_deref()
                .is_some_and(|other| labels_match(label, other))
    })
}

/// Paires de base du même jour partageant le numéro `base`.
pub(super) fn same_base<'a>(
    baseline: &'a [PeriodRecord],
    day_key: &'a str,
    base: &'a str,
) -> impl Iterator<Item = &'a PeriodRecord> + 'a {
    baseline.iter().filter(move |p| {
        canonical_day(&p.day) == day_key
            && p.period_label
                .as_deref()
                .and_then(normalize_base_period)
                .as_deref()
                == Some(base)
    })
}

pub(super) fn trimmed_label(label: Option<&str>) -> Option<&str> {
    label.map(str::trim).filter(|l| !l.is_empty())
}

pub(super) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Les commentaires (sans libellé) passent après toutes les paires.
fn entry_sort_key(entry: &MergedEntry) -> (u8, PeriodKey) {
    match entry {
        MergedEntry::Period(p) => (
            0,
            p.period_label
                .as_deref()
                .map_or(PeriodKey::LAST, parse_period_sort_key),
        ),
        MergedEntry::Comment { .. } => (1, PeriodKey::LAST),
    }
}

/// Tri stable : l'ordre d'entrée départage les égalités.
pub(super) fn sort_entries(entries: &mut [MergedEntry]) {
    entries.sort_by_key(entry_sort_key);
}

pub(super) fn record_anomaly(
    stats: &mut MergeStats,
    kind: AnomalyKind,
    day: &str,
    detail: String,
) {
    warn!(?kind, day, %detail, "schedule anomaly");
    stats.anomalies.push(Anomaly {
        kind,
        day: day.to_string(),
        detail,
    });
}
