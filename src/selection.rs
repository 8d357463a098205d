use crate::locale::{canonical_day, parse_weekday, weekday_name, Locale};
use crate::model::ReplacementBatch;
use chrono::Weekday;
use std::collections::HashSet;
use tracing::debug;

/// Origine de la liste de jours retenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSource {
    /// Jours cités par le document de remplacements.
    Replacements,
    /// Samedi : samedi + lundi (pas de cours le dimanche).
    Weekend,
    /// Lendemain, dimanche sauté.
    Tomorrow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDays {
    pub days: Vec<String>,
    pub source: TargetSource,
}

/// Jours distincts portant un remplacement `to`, dans l'ordre d'apparition.
pub fn available_replacement_days(batch: &ReplacementBatch) -> Vec<String> {
    let mut seen = HashSet::new();
    batch
        .substitutions()
        .filter(|s| s.to.is_some())
        .map(|s| s.day.trim())
        .filter(|day| !day.is_empty() && seen.insert(canonical_day(day)))
        .map(str::to_owned)
        .collect()
}

fn is_saturday(day: &str) -> bool {
    parse_weekday(day) == Some(Weekday::Sat)
}

/// Choisit les jours à fusionner et afficher.
///
/// Avec des remplacements : leurs jours, samedi en tête, samedi retiré le
/// dimanche. Sinon (ou si cette liste est vide) : samedi + lundi le samedi,
/// le lendemain les autres jours.
pub fn select_target_days(
    today: Weekday,
    replacements: Option<&ReplacementBatch>,
    locale: Locale,
) -> TargetDays {
    if let Some(batch) = replacements.filter(|b| !b.is_empty()) {
        let mut days = available_replacement_days(batch);
        days.sort_by_key(|d| !is_saturday(d));
        if today == Weekday::Sun {
            days.retain(|d| !is_saturday(d));
        }
        if !days.is_empty() {
            return TargetDays {
                days,
                source: TargetSource::Replacements,
            };
        }
        debug!("replacement document names no upcoming day, falling back to calendar");
    }

    if today == Weekday::Sat {
        return TargetDays {
            days: vec![
                weekday_name(Weekday::Sat, locale).to_string(),
                weekday_name(Weekday::Mon, locale).to_string(),
            ],
            source: TargetSource::Weekend,
        };
    }

    let mut tomorrow = today.succ();
    if tomorrow == Weekday::Sun {
        tomorrow = Weekday::Mon;
    }
    TargetDays {
        days: vec![weekday_name(tomorrow, locale).to_string()],
        source: TargetSource::Tomorrow,
    }
}
