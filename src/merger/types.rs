use crate::model::MergedSchedule;

/// Options de fusion.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOptions {
    /// Supprime les commentaires au texte strictement identique (désactivé par défaut).
    pub dedupe_comments: bool,
}

/// Irrégularité tolérée pendant la fusion, remontée pour l'opérateur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnomalyKind {
    UnparsablePeriodLabel,
    UnparsableTimeRange,
    SubstitutionWithoutPeriod,
    SubstitutionWithoutPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    pub day: String,
    pub detail: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub kept: usize,
    pub replaced: usize,
    pub added: usize,
    pub skipped_parity: usize,
    pub comments: usize,
    pub anomalies: Vec<Anomaly>,
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub schedule: MergedSchedule,
    pub stats: MergeStats,
}
