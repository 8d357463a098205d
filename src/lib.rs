#![forbid(unsafe_code)]
//! Zamena : fusion de l'emploi du temps de base et des remplacements (sans BD).
//!
//! - Entrées déjà extraites (JSON/CSV) : planning de base + document de remplacements.
//! - Normalisation des jours et des numéros de paire, parité de semaine.
//! - Découpage des paires doubles en deux demi-créneaux.
//! - Choix des jours à afficher, tourné vers « ce qu'il faut préparer ensuite ».

pub mod config;
pub mod interval;
pub mod io;
pub mod locale;
pub mod marker;
pub mod merger;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod selection;

pub use config::{Config, ConfigError};
pub use interval::{split_time_interval, IntervalCache, BREAK_MINUTES};
pub use locale::{canonical_day, parse_weekday, weekday_name, Locale};
pub use marker::{has_url_changed, FileMarkerStore, MarkerError, MarkerStore, MemoryMarkerStore};
pub use merger::{merge_schedules, Anomaly, MergeOptions, MergeOutcome, MergeStats, Merger};
pub use model::{
    BaselineSchedule, CommentRecord, DaySchedule, LessonRef, MergedEntry, MergedPeriod,
    MergedSchedule, PeriodRecord, ReplacementBatch, ReplacementRecord, Substitution, Timetable,
    WeekParity,
};
pub use normalize::{
    normalize_base_period, normalize_day, normalize_group, parse_period_sort_key, PeriodKey,
};
pub use pipeline::{build_timetable, PipelineOptions};
pub use render::{ScheduleRenderer, TextRenderer};
pub use selection::{available_replacement_days, select_target_days, TargetDays, TargetSource};
