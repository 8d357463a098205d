use super::types::AnomalyKind;
use super::{util, MergeState};
use crate::model::{MergedEntry, MergedPeriod, PeriodRecord, WeekParity};
use crate::locale::canonical_day;
use crate::normalize::{has_sub_slot, normalize_base_period, sub_slot_index};
use tracing::debug;

pub(super) fn overlay(state: &mut MergeState<'_>) {
    let baseline = state.baseline;
    let replacements = state.replacements;

    for lesson in baseline {
        if skipped_by_parity(lesson, replacements.week_parity) {
            debug!(
                day = %lesson.day,
                pair = ?lesson.period_label,
                subject = %lesson.subject,
                "slot does not occur this week"
            );
            state.stats.skipped_parity += 1;
            continue;
        }

        let day_key = canonical_day(&lesson.day);
        let label = util::trimmed_label(lesson.period_label.as_deref()).unwrap_or_default();
        let base = normalize_base_period(label);
        let substitution = match &base {
            Some(_) => util::find_substitution(replacements, &day_key, label),
            None => {
                util::record_anomaly(
                    &mut state.stats,
                    AnomalyKind::UnparsablePeriodLabel,
                    &lesson.day,
                    format!("{:?} ({})", lesson.period_label, lesson.subject),
                );
                None
            }
        };

        let time = lesson_time(state, lesson, base.as_deref());
        let mut entry = MergedPeriod {
            day: lesson.day.trim().to_string(),
            time,
            period_label: display_label(lesson, baseline),
            room: lesson.room.clone(),
            subject: lesson.subject.clone(),
            teacher: lesson.teacher.clone(),
            replaced_subject: None,
            replaced_teacher: None,
        };

        match substitution.and_then(|s| s.to.as_ref().map(|to| (s, to))) {
            Some((sub, to)) => {
                debug!(
                    day = %entry.day,
                    pair = ?lesson.period_label,
                    from = %lesson.subject,
                    to = %to.subject,
                    "substitution applied"
                );
                if let Some(subject) = util::non_empty(Some(&to.subject)) {
                    entry.subject = subject.to_string();
                }
                if let Some(teacher) = util::non_empty(Some(&to.teacher)) {
                    entry.teacher = teacher.to_string();
                }
                if let Some(room) = util::non_empty(sub.room.as_deref()) {
                    entry.room = room.to_string();
                }
                entry.replaced_subject = Some(lesson.subject.clone());
                entry.replaced_teacher =
                    util::non_empty(Some(&lesson.teacher)).map(str::to_owned);
                state.stats.replaced += 1;
            }
            None => state.stats.kept += 1,
        }

        if base.is_some() {
            state.emitted.push((day_key, label.to_string()));
        }
        state.entries.push(MergedEntry::Period(entry));
    }
}

/// Parité du créneau incompatible avec celle du lot : la paire n'a pas lieu.
///
/// Couvre aussi l'heure seule de semaine haute en semaine basse.
fn skipped_by_parity(lesson: &PeriodRecord, batch: Option<WeekParity>) -> bool {
    match (lesson.week_parity, batch) {
        (Some(slot), Some(batch)) => slot != batch,
        _ => false,
    }
}

/// `"4/1"` sans `"4/2"` le même jour s'affiche `"4"`, sauf pour une heure seule.
fn display_label(lesson: &PeriodRecord, baseline: &[PeriodRecord]) -> Option<String> {
    let label = util::trimmed_label(lesson.period_label.as_deref())?;
    let Some(base) = label.strip_suffix("/1") else {
        return Some(label.to_string());
    };
    if lesson.is_single_hour() {
        return Some(label.to_string());
    }

    let day_key = canonical_day(&lesson.day);
    let second = format!("{}/2", base.trim());
    let has_second = baseline.iter().any(|other| {
        canonical_day(&other.day) == day_key
            && util::trimmed_label(other.period_label.as_deref())
                .is_some_and(|l| l.starts_with(&second))
    });

    if has_second {
        Some(label.to_string())
    } else {
        Some(base.trim().to_string())
    }
}

/// Sous-créneau : demi-plage ; sinon plage brute.
fn lesson_time(
    state: &mut MergeState<'_>,
    lesson: &PeriodRecord,
    base: Option<&str>,
) -> Option<String> {
    let label = lesson.period_label.as_deref().unwrap_or_default();
    if !has_sub_slot(label) {
        return lesson.raw_time.clone().or_else(|| lesson.time.clone());
    }
    if lesson.time.is_some() {
        return lesson.time.clone();
    }

    // Demi-plage absente : on la recalcule depuis la plage brute.
    let raw = lesson.raw_time.as_deref()?;
    let Some(base) = base else {
        return Some(raw.to_string());
    };
    let index = sub_slot_index(label).unwrap_or(1);
    let half = state.intervals.half(&lesson.day, base, raw, index);
    if half == raw {
        util::record_anomaly(
            &mut state.stats,
            AnomalyKind::UnparsableTimeRange,
            &lesson.day,
            raw.to_string(),
        );
    }
    Some(half)
}
