use super::types::{AnomalyKind, MergeOptions};
use super::{util, MergeState};
use crate::model::{MergedEntry, MergedPeriod};
use crate::locale::canonical_day;
use crate::normalize::{normalize_base_period, sub_slot_index};
use std::collections::HashSet;
use tracing::debug;

/// Remplacements sans paire de base émise correspondante : paires ajoutées.
pub(super) fn append_added_periods(state: &mut MergeState<'_>) {
    let replacements = state.replacements;
    let mut unnumbered: HashSet<(String, String)> = HashSet::new();

    for sub in replacements.substitutions() {
        let label = util::trimmed_label(sub.period_label.as_deref());
        let Some(to) = &sub.to else {
            util::record_anomaly(
                &mut state.stats,
                AnomalyKind::SubstitutionWithoutPayload,
                &sub.day,
                format!("pair {:?}", label),
            );
            continue;
        };

        let day_key = canonical_day(&sub.day);
        let base = label.and_then(normalize_base_period);
        match (&base, label) {
            (Some(_), Some(label)) => {
                if is_covered(state, &day_key, label) {
                    debug!(day = %sub.day, pair = label, "period already present, not added");
                    continue;
                }
                // Les paires ajoutées couvrent aussi les remplacements suivants.
                state.emitted.push((day_key, label.to_string()));
            }
            _ => {
                util::record_anomaly(
                    &mut state.stats,
                    AnomalyKind::SubstitutionWithoutPeriod,
                    &sub.day,
                    to.subject.clone(),
                );
                let exact = (day_key, label.unwrap_or_default().to_string());
                if !unnumbered.insert(exact) {
                    continue;
                }
            }
        }

        let time = added_period_time(state, &sub.day, label, base.as_deref());
        debug!(day = %sub.day, pair = ?label, subject = %to.subject, "period added by replacement");
        state.entries.push(MergedEntry::Period(MergedPeriod {
            day: sub.day.trim().to_string(),
            time,
            period_label: label.map(str::to_owned),
            room: sub.room.clone().unwrap_or_default(),
            subject: to.subject.clone(),
            teacher: to.teacher.clone(),
            replaced_subject: None,
            replaced_teacher: None,
        }));
        state.stats.added += 1;
    }
}

/// Une paire déjà émise le même jour (de base ou ajoutée) correspond à ce libellé.
fn is_covered(state: &MergeState<'_>, day_key: &str, label: &str) -> bool {
    state
        .emitted
        .iter()
        .any(|(day, emitted)| day == day_key && util::labels_match(emitted, label))
}

/// Horaire d'une paire ajoutée, emprunté au planning de base du même jour.
///
/// Avec un sous-créneau : moitié de la plage de n'importe quelle paire de même
/// numéro. Sinon : paire de base au libellé identique. `None` sans référence.
fn added_period_time(
    state: &mut MergeState<'_>,
    day: &str,
    label: Option<&str>,
    base: Option<&str>,
) -> Option<String> {
    let label = label?;
    let day_key = canonical_day(day);
    let baseline = state.baseline;

    if let (Some(index), Some(base)) = (sub_slot_index(label), base) {
        let reference = util::same_base(baseline, &day_key, base).next()?;
        let raw = reference.raw_time.as_deref().or(reference.time.as_deref())?;
        return Some(state.intervals.half(day, base, raw, index));
    }

    baseline
        .iter()
        .find(|p| {
            canonical_day(&p.day) == day_key
                && util::trimmed_label(p.period_label.as_deref()) == Some(label)
        })
        .and_then(|p| p.raw_time.clone().or_else(|| p.time.clone()))
}

/// Commentaires ajoutés tels quels, jamais rattachés à une paire.
pub(super) fn append_comments(state: &mut MergeState<'_>, opts: MergeOptions) {
    let replacements = state.replacements;
    let mut seen: HashSet<&str> = HashSet::new();
    for record in replacements.comments() {
        if opts.dedupe_comments && !seen.insert(record.comment.as_str()) {
            continue;
        }
        state
            .entries
            .push(MergedEntry::comment(record.comment.clone()));
        state.stats.comments += 1;
    }
}
