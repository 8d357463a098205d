use crate::locale::Locale;
use crate::model::{MergedEntry, MergedPeriod, Timetable};
use std::fmt::Write;

/// Permet de customiser le rendu (texte, page, message…).
pub trait ScheduleRenderer {
    fn render(&self, timetable: &Timetable) -> String;
}

/// Rendu texte brut, une ligne par paire.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer {
    pub locale: Locale,
}

impl TextRenderer {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    fn period_line(&self, period: &MergedPeriod) -> String {
        let field = |v: Option<&str>| match v.map(str::trim) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => "-".to_string(),
        };
        let mut line = format!(
            "{} | {} | {} | {}",
            field(period.period_label.as_deref()),
            field(period.time.as_deref()),
            field(Some(period.room.as_str())),
            field(Some(period.subject.as_str())),
        );
        if !period.teacher.trim().is_empty() {
            let _ = write!(line, " ({})", period.teacher.trim());
        }
        if let Some(replaced) = &period.replaced_subject {
            let _ = write!(line, " [{}]", self.locale.instead_of(replaced));
        }
        line
    }
}

impl ScheduleRenderer for TextRenderer {
    fn render(&self, timetable: &Timetable) -> String {
        let mut out = format!("{}: {}\n", self.locale.group_label(), timetable.group);
        for day in &timetable.days {
            let _ = writeln!(out, "\n== {} ==", day.day);
            for entry in &day.schedule {
                match entry {
                    MergedEntry::Period(p) => {
                        let _ = writeln!(out, "{}", self.period_line(p));
                    }
                    MergedEntry::Comment { comment } => {
                        let _ = writeln!(out, "* {comment}");
                    }
                }
            }
        }
        out
    }
}
