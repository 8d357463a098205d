use crate::normalize::normalize_day;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const RU_DAYS: [&str; 7] = [
    "Понедельник",
    "Вторник",
    "Среда",
    "Четверг",
    "Пятница",
    "Суббота",
    "Воскресенье",
];

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const EN_DAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Langue des libellés de jours et des messages synthétiques.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ru,
    En,
}

impl Locale {
    pub fn day_names(self) -> &'static [&'static str; 7] {
        match self {
            Self::Ru => &RU_DAYS,
            Self::En => &EN_DAYS,
        }
    }

    pub fn group_label(self) -> &'static str {
        match self {
            Self::Ru => "Группа",
            Self::En => "Group",
        }
    }

    pub fn error_day(self) -> &'static str {
        match self {
            Self::Ru => "Ошибка",
            Self::En => "Error",
        }
    }

    pub fn schedule_unavailable(self, group: &str) -> String {
        match self {
            Self::Ru => format!("Ошибка загрузки расписания для группы {group}."),
            Self::En => format!("Schedule unavailable for group {group}."),
        }
    }

    pub fn no_classes(self, days: &[String]) -> String {
        let days = days.join(", ");
        match self {
            Self::Ru => format!("Нет пар на {days}."),
            Self::En => format!("No classes on {days}."),
        }
    }

    pub fn instead_of(self, subject: &str) -> String {
        match self {
            Self::Ru => format!("вместо: {subject}"),
            Self::En => format!("instead of: {subject}"),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ru" => Ok(Self::Ru),
            "en" => Ok(Self::En),
            other => Err(format!("unknown locale: {other} (expected ru or en)")),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ru => "ru",
            Self::En => "en",
        })
    }
}

pub fn weekday_name(day: Weekday, locale: Locale) -> &'static str {
    locale.day_names()[day.num_days_from_monday() as usize]
}

/// Reconnaît un nom de jour russe ou anglais (« Суббота », « saturday », « Sat »).
pub fn parse_weekday(raw: &str) -> Option<Weekday> {
    let norm = normalize_day(raw);
    if norm.is_empty() {
        return None;
    }
    if let Some(idx) = RU_DAYS.iter().position(|d| normalize_day(d) == norm) {
        return Some(WEEK[idx]);
    }
    norm.parse::<Weekday>().ok()
}

/// Clé de comparaison d'un jour : le jour de semaine reconnu, quelle que soit
/// la langue, sinon la forme normalisée du libellé.
pub fn canonical_day(raw: &str) -> String {
    match parse_weekday(raw) {
        Some(day) => EN_DAYS[day.num_days_from_monday() as usize].to_lowercase(),
        None => normalize_day(raw),
    }
}
