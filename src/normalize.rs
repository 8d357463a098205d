//! Formes canoniques des jours, groupes et numéros de paire.
//!
//! Les deux sources (tableur et document de remplacements) ne s'accordent ni
//! sur la casse, ni sur « ё »/« е », ni sur la décoration des numéros de paire
//! (`"4/1"`, `"4а"`, `" 4 "`). Toute comparaison passe par ce module.

use once_cell::sync::Lazy;
use regex::Regex;

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").unwrap());

/// Jour normalisé : espaces retirés, minuscules, « ё » → « е ». Vide si vide.
pub fn normalize_day(day: &str) -> String {
    day.trim().to_lowercase().replace('ё', "е")
}

/// Groupe normalisé : minuscules, sans ponctuation (`"РС02-24"` → `"рс0224"`).
pub fn normalize_group(group: &str) -> String {
    NON_WORD
        .replace_all(&group.trim().to_lowercase(), "")
        .into_owned()
}

/// Premier groupe de chiffres du libellé, sans zéros de tête ; `None` sans chiffre.
pub fn normalize_base_period(label: &str) -> Option<String> {
    DIGITS.find(label).map(|m| {
        let digits = m.as_str().trim_start_matches('0');
        if digits.is_empty() {
            "0".to_string()
        } else {
            digits.to_string()
        }
    })
}

/// Même clé que [`normalize_base_period`], sous forme entière.
pub fn base_period_number(label: &str) -> Option<u32> {
    normalize_base_period(label).and_then(|b| b.parse().ok())
}

pub fn has_sub_slot(label: &str) -> bool {
    label.contains('/')
}

/// Index du sous-créneau (`"4/2"` → `Some(2)`).
pub fn sub_slot_index(label: &str) -> Option<u32> {
    label
        .split_once('/')
        .and_then(|(_, sub)| sub.trim().parse().ok())
}

/// Clé de tri d'un libellé de paire : base puis sous-créneau.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodKey {
    pub base: u32,
    pub sub: u32,
}

impl PeriodKey {
    /// Sentinelle des libellés illisibles : triés en dernier.
    pub const LAST: PeriodKey = PeriodKey {
        base: u32::MAX,
        sub: u32::MAX,
    };
}

/// Base via [`base_period_number`] (`"3а"` se range avec 3), sous-créneau 0 si
/// absent ou illisible. Seul un libellé sans chiffre passe en dernier.
pub fn parse_period_sort_key(label: &str) -> PeriodKey {
    match base_period_number(label) {
        Some(base) => PeriodKey {
            base,
            sub: sub_slot_index(label).unwrap_or(0),
        },
        None => PeriodKey::LAST,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_folding() {
        assert_eq!(normalize_day("  Четвёрг "), "четверг");
        assert_eq!(normalize_day("ЧЕТВЁРГ"), "четверг");
        assert_eq!(normalize_day(""), "");
    }

    #[test]
    fn base_period_extraction() {
        assert_eq!(normalize_base_period("4/1").as_deref(), Some("4"));
        assert_eq!(normalize_base_period(" 4а ").as_deref(), Some("4"));
        assert_eq!(normalize_base_period("пара 12").as_deref(), Some("12"));
        assert_eq!(normalize_base_period("04").as_deref(), Some("4"));
        assert_eq!(normalize_base_period("—"), None);
        assert_eq!(base_period_number("3/2"), Some(3));
    }

    #[test]
    fn sort_keys() {
        assert_eq!(parse_period_sort_key("4"), PeriodKey { base: 4, sub: 0 });
        assert_eq!(parse_period_sort_key("4/2"), PeriodKey { base: 4, sub: 2 });
        assert_eq!(parse_period_sort_key("x"), PeriodKey::LAST);
        assert_eq!(parse_period_sort_key("4/x"), PeriodKey { base: 4, sub: 0 });
        assert_eq!(parse_period_sort_key(" 3а "), PeriodKey { base: 3, sub: 0 });
        assert!(parse_period_sort_key("2") < parse_period_sort_key("3а"));
        assert!(parse_period_sort_key("3а") < parse_period_sort_key("10"));
        assert!(parse_period_sort_key("10") > parse_period_sort_key("9/2"));
    }

    #[test]
    fn group_folding() {
        assert_eq!(normalize_group(" РС02-24 "), "рс0224");
        assert_eq!(normalize_group("рс 02/24"), "рс0224");
    }
}
