use crate::locale::canonical_day;
use chrono::{Duration, NaiveTime};
use std::collections::HashMap;
use tracing::debug;

/// Pause entre les deux demi-paires, en minutes.
pub const BREAK_MINUTES: i64 = 10;

/// Lit `"HH:MM-HH:MM"` ; accepte « – », « — » et `.` à la place de `:`.
pub fn parse_time_range(raw: &str) -> Option<(NaiveTime, NaiveTime)> {
    let unified = raw.replace(['–', '—'], "-");
    let parts: Vec<&str> = unified.trim().split('-').collect();
    let [start, end] = parts.as_slice() else {
        return None;
    };
    Some((parse_clock(start)?, parse_clock(end)?))
}

fn parse_clock(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(&raw.trim().replace('.', ":"), "%H:%M").ok()
}

/// Coupe une paire double en deux moitiés séparées par [`BREAK_MINUTES`].
///
/// `"08:00-09:40"` → `("08:00 - 08:45", "08:55 - 09:40")`. Une plage illisible
/// est renvoyée telle quelle pour les deux moitiés.
pub fn split_time_interval(raw: &str) -> (String, String) {
    let Some((start, end)) = parse_time_range(raw) else {
        debug!(range = raw, "unparsable time range, keeping it for both halves");
        return (raw.to_string(), raw.to_string());
    };
    let total = (end - start).num_minutes();
    let half = (total - BREAK_MINUTES).div_euclid(2);
    let first_end = start + Duration::minutes(half);
    let second_start = first_end + Duration::minutes(BREAK_MINUTES);
    (
        format!("{} - {}", start.format("%H:%M"), first_end.format("%H:%M")),
        format!("{} - {}", second_start.format("%H:%M"), end.format("%H:%M")),
    )
}

/// Découpes mémorisées par (jour normalisé, numéro de paire).
#[derive(Debug, Default, Clone)]
pub struct IntervalCache {
    halves: HashMap<(String, String), (String, String)>,
}

impl IntervalCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn split(&mut self, day: &str, base: &str, raw: &str) -> (String, String) {
        self.halves
            .entry((canonical_day(day), base.to_string()))
            .or_insert_with(|| split_time_interval(raw))
            .clone()
    }

    /// Moitié correspondant au sous-créneau : 1 → première, sinon seconde.
    pub fn half(&mut self, day: &str, base: &str, raw: &str, index: u32) -> String {
        let (first, second) = self.split(day, base, raw);
        if index == 1 {
            first
        } else {
            second
        }
    }

    pub fn len(&self) -> usize {
        self.halves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.halves.is_empty()
    }
}
