use crate::locale::Locale;
use crate::merger::{MergeOptions, Merger};
use crate::model::{BaselineSchedule, DaySchedule, MergedEntry, ReplacementBatch, Timetable};
use crate::selection::select_target_days;
use chrono::Weekday;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub group: String,
    pub locale: Locale,
    pub merge: MergeOptions,
}

impl PipelineOptions {
    pub fn new<G: Into<String>>(group: G, locale: Locale) -> Self {
        Self {
            group: group.into(),
            locale,
            merge: MergeOptions::default(),
        }
    }
}

/// Construit l'emploi du temps affichable d'un groupe.
///
/// `None` = source indisponible. Sans planning de base, un unique commentaire
/// « planning indisponible » est renvoyé ; sans remplacements, seul le planning
/// de base est utilisé. Le résultat contient toujours au moins une entrée.
pub fn build_timetable(
    baseline: Option<&BaselineSchedule>,
    replacements: Option<&ReplacementBatch>,
    today: Weekday,
    opts: &PipelineOptions,
) -> Timetable {
    let locale = opts.locale;
    let baseline = baseline.filter(|b| {
        let usable = !b.schedule.is_empty() && b.belongs_to(&opts.group);
        if !usable {
            warn!(group = %opts.group, declared = %b.group, "baseline schedule unusable");
        }
        usable
    });
    let Some(baseline) = baseline else {
        return Timetable {
            group: opts.group.clone(),
            days: vec![DaySchedule {
                day: locale.error_day().to_string(),
                schedule: vec![MergedEntry::comment(
                    locale.schedule_unavailable(&opts.group),
                )],
            }],
        };
    };

    let replacements = replacements.filter(|r| {
        let usable = r.belongs_to(&opts.group);
        if !usable {
            warn!(group = %opts.group, declared = %r.group, "replacements for another group ignored");
        }
        usable
    });

    let targets = select_target_days(today, replacements, locale);
    info!(days = ?targets.days, source = ?targets.source, "target days selected");

    let merger = Merger::new(opts.merge);
    let no_replacements = ReplacementBatch::empty(opts.group.clone());
    let mut days: Vec<DaySchedule> = targets
        .days
        .iter()
        .map(|day| {
            let baseline_day = baseline.for_day(day);
            let replacement_day = replacements
                .map(|r| r.for_day(day))
                .unwrap_or_else(|| no_replacements.clone());
            let outcome = merger.merge(&baseline_day, &replacement_day);
            if !outcome.stats.anomalies.is_empty() {
                warn!(day = %day, count = outcome.stats.anomalies.len(), "anomalies while merging");
            }
            DaySchedule {
                day: day.clone(),
                schedule: outcome.schedule.schedule,
            }
        })
        .collect();

    if days.iter().all(|d| d.schedule.is_empty()) {
        return Timetable {
            group: opts.group.clone(),
            days: vec![DaySchedule {
                day: targets.days.join(", "),
                schedule: vec![MergedEntry::comment(locale.no_classes(&targets.days))],
            }],
        };
    }

    for day in days.iter_mut().filter(|d| d.schedule.is_empty()) {
        let message = locale.no_classes(std::slice::from_ref(&day.day));
        day.schedule.push(MergedEntry::comment(message));
    }

    Timetable {
        group: opts.group.clone(),
        days,
    }
}
