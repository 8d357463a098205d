use crate::locale::canonical_day;
use crate::normalize::normalize_group;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Parité de semaine (semaine « haute » / « basse »).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekParity {
    Upper,
    Lower,
}

impl WeekParity {
    /// Lecture tolérante : toute autre valeur (ex. `"hour"`) donne `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "upper" | "верхняя" => Some(Self::Upper),
            "lower" | "нижняя" => Some(Self::Lower),
            _ => None,
        }
    }
}

/// Paire du planning de base (une ligne du tableur, pour un groupe).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub day: String,
    /// `"4"` ou `"4/1"` quand deux matières se partagent la paire 4.
    #[serde(
        rename = "pair",
        alias = "period_label",
        default,
        deserialize_with = "lenient_opt_string"
    )]
    pub period_label: Option<String>,
    /// Demi-créneau déjà découpé par l'extracteur (si sous-créneau).
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub raw_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub room: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subject: String,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "String::is_empty")]
    pub teacher: String,
    #[serde(
        rename = "week_type",
        alias = "week_parity",
        default,
        deserialize_with = "lenient_parity"
    )]
    pub week_parity: Option<WeekParity>,
    #[serde(default = "default_duration", deserialize_with = "lenient_duration")]
    pub duration: u8,
}

impl PeriodRecord {
    pub fn new<D, L, R, S>(day: D, label: L, room: R, subject: S) -> Self
    where
        D: Into<String>,
        L: Into<String>,
        R: Into<String>,
        S: Into<String>,
    {
        Self {
            day: day.into(),
            period_label: Some(label.into()),
            time: None,
            raw_time: None,
            room: room.into(),
            subject: subject.into(),
            teacher: String::new(),
            week_parity: None,
            duration: default_duration(),
        }
    }

    /// Plage brute `"HH:MM-HH:MM"`, utilisée aussi comme demi-créneau faute de mieux.
    pub fn with_times<R: Into<String>>(mut self, raw_time: R, half: Option<&str>) -> Self {
        self.raw_time = Some(raw_time.into());
        self.time = half.map(str::to_owned);
        self
    }

    pub fn with_teacher<T: Into<String>>(mut self, teacher: T) -> Self {
        self.teacher = teacher.into();
        self
    }

    pub fn with_parity(mut self, parity: WeekParity) -> Self {
        self.week_parity = Some(parity);
        self
    }

    pub fn with_duration(mut self, duration: u8) -> Self {
        self.duration = if duration == 1 { 1 } else { 2 };
        self
    }

    /// Heure académique seule (cellule « rose » du tableur).
    pub fn is_single_hour(&self) -> bool {
        self.duration == 1
    }
}

/// Matière + enseignant, côté « from » ou « to » d'un remplacement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LessonRef {
    #[serde(default, deserialize_with = "lenient_string")]
    pub subject: String,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "String::is_empty")]
    pub teacher: String,
}

impl LessonRef {
    pub fn new<S: Into<String>>(subject: S) -> Self {
        Self {
            subject: subject.into(),
            teacher: String::new(),
        }
    }
}

/// Ligne de remplacement associée à une paire.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Substitution {
    #[serde(default, deserialize_with = "lenient_string")]
    pub day: String,
    #[serde(
        rename = "pair",
        alias = "period_label",
        default,
        deserialize_with = "lenient_opt_string"
    )]
    pub period_label: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<LessonRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<LessonRef>,
}

impl Substitution {
    pub fn new<D: Into<String>, L: Into<String>>(day: D, label: L, to: LessonRef) -> Self {
        Self {
            day: day.into(),
            period_label: Some(label.into()),
            room: None,
            from: None,
            to: Some(to),
        }
    }

    pub fn with_room<R: Into<String>>(mut self, room: R) -> Self {
        self.room = Some(room.into());
        self
    }

    pub fn with_from(mut self, from: LessonRef) -> Self {
        self.from = Some(from);
        self
    }
}

/// Annotation libre d'un jour, sans paire associée.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub day: String,
    #[serde(deserialize_with = "lenient_string")]
    pub comment: String,
}

/// Ligne du document de remplacements. Lue par [`ReplacementRecord::from_value`] :
/// une même ligne peut porter un remplacement et un commentaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReplacementRecord {
    Comment(CommentRecord),
    Substitution(Substitution),
}

impl ReplacementRecord {
    pub fn comment<D: Into<String>, C: Into<String>>(day: D, comment: C) -> Self {
        Self::Comment(CommentRecord {
            day: day.into(),
            comment: comment.into(),
        })
    }

    /// Décompose une ligne brute : remplacement si elle cite une paire ou une
    /// charge `from`/`to`, commentaire si `comment` est renseigné, les deux au besoin.
    pub fn from_value(value: Value) -> Result<Vec<Self>, serde_json::Error> {
        let field = |key: &str| value.get(key).cloned().and_then(value_to_string);
        let comment = field("comment");
        let has_lesson = ["pair", "period_label", "from", "to"]
            .iter()
            .any(|key| value.get(key).is_some_and(|v| !v.is_null()));

        let mut out = Vec::with_capacity(2);
        if has_lesson || comment.is_none() {
            out.push(Self::Substitution(serde_json::from_value(value.clone())?));
        }
        if let Some(comment) = comment {
            out.push(Self::comment(field("day").unwrap_or_default(), comment));
        }
        Ok(out)
    }

    pub fn day(&self) -> &str {
        match self {
            Self::Comment(c) => &c.day,
            Self::Substitution(s) => &s.day,
        }
    }
}

impl From<Substitution> for ReplacementRecord {
    fn from(s: Substitution) -> Self {
        Self::Substitution(s)
    }
}

/// Document de remplacements d'un groupe, avec la parité déclarée pour tout le lot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReplacementBatch {
    #[serde(default, deserialize_with = "lenient_string")]
    pub group: String,
    #[serde(
        rename = "week_type",
        alias = "week_parity",
        default,
        deserialize_with = "lenient_parity",
        skip_serializing_if = "Option::is_none"
    )]
    pub week_parity: Option<WeekParity>,
    #[serde(
        rename = "schedule",
        alias = "records",
        default,
        deserialize_with = "lenient_records"
    )]
    pub records: Vec<ReplacementRecord>,
}

impl ReplacementBatch {
    pub fn empty<G: Into<String>>(group: G) -> Self {
        Self {
            group: group.into(),
            week_parity: None,
            records: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn substitutions(&self) -> impl Iterator<Item = &Substitution> {
        self.records.iter().filter_map(|r| match r {
            ReplacementRecord::Substitution(s) => Some(s),
            ReplacementRecord::Comment(_) => None,
        })
    }

    pub fn comments(&self) -> impl Iterator<Item = &CommentRecord> {
        self.records.iter().filter_map(|r| match r {
            ReplacementRecord::Comment(c) => Some(c),
            ReplacementRecord::Substitution(_) => None,
        })
    }

    /// Restreint le lot à un jour (russe ou anglais), parité conservée.
    pub fn for_day(&self, day: &str) -> Self {
        let day = canonical_day(day);
        Self {
            group: self.group.clone(),
            week_parity: self.week_parity,
            records: self
                .records
                .iter()
                .filter(|r| canonical_day(r.day()) == day)
                .cloned()
                .collect(),
        }
    }

    pub fn belongs_to(&self, group: &str) -> bool {
        groups_match(&self.group, group)
    }
}

/// Planning de base d'un groupe.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BaselineSchedule {
    #[serde(default, deserialize_with = "lenient_string")]
    pub group: String,
    #[serde(default, deserialize_with = "lenient_rows")]
    pub schedule: Vec<PeriodRecord>,
}

impl BaselineSchedule {
    pub fn new<G: Into<String>>(group: G, schedule: Vec<PeriodRecord>) -> Self {
        Self {
            group: group.into(),
            schedule,
        }
    }

    pub fn for_day(&self, day: &str) -> Self {
        let day = canonical_day(day);
        Self {
            group: self.group.clone(),
            schedule: self
                .schedule
                .iter()
                .filter(|p| canonical_day(&p.day) == day)
                .cloned()
                .collect(),
        }
    }

    pub fn belongs_to(&self, group: &str) -> bool {
        groups_match(&self.group, group)
    }
}

/// Groupe vide = document non étiqueté, accepté tel quel.
fn groups_match(declared: &str, wanted: &str) -> bool {
    declared.trim().is_empty() || normalize_group(declared) == normalize_group(wanted)
}

/// Paire affichée après fusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedPeriod {
    pub day: String,
    pub time: Option<String>,
    #[serde(rename = "pair")]
    pub period_label: Option<String>,
    pub room: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub teacher: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaced_subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaced_teacher: Option<String>,
}

impl MergedPeriod {
    pub fn is_replaced(&self) -> bool {
        self.replaced_subject.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MergedEntry {
    Comment { comment: String },
    Period(MergedPeriod),
}

impl MergedEntry {
    pub fn comment<C: Into<String>>(comment: C) -> Self {
        Self::Comment {
            comment: comment.into(),
        }
    }

    pub fn as_period(&self) -> Option<&MergedPeriod> {
        match self {
            Self::Period(p) => Some(p),
            Self::Comment { .. } => None,
        }
    }

    pub fn period_label(&self) -> Option<&str> {
        self.as_period().and_then(|p| p.period_label.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MergedSchedule {
    pub group: String,
    pub schedule: Vec<MergedEntry>,
}

impl MergedSchedule {
    pub fn periods(&self) -> impl Iterator<Item = &MergedPeriod> {
        self.schedule.iter().filter_map(MergedEntry::as_period)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub day: String,
    pub schedule: Vec<MergedEntry>,
}

/// Résultat complet : un bloc par jour cible, dans l'ordre d'affichage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Timetable {
    pub group: String,
    pub days: Vec<DaySchedule>,
}

impl Timetable {
    pub fn has_periods(&self) -> bool {
        self.days
            .iter()
            .flat_map(|d| d.schedule.iter())
            .any(|e| e.as_period().is_some())
    }
}

fn default_duration() -> u8 {
    2
}

// Les extracteurs produisent des cellules de tableur : nombres, null, chaînes.

fn value_to_string(v: Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.and_then(value_to_string))
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(lenient_opt_string(d)?.unwrap_or_default())
}

fn lenient_parity<'de, D: Deserializer<'de>>(d: D) -> Result<Option<WeekParity>, D::Error> {
    Ok(lenient_opt_string(d)?.as_deref().and_then(WeekParity::parse))
}

fn lenient_duration<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
    let single = match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => n.as_u64() == Some(1),
        Some(Value::String(s)) => s.trim() == "1",
        _ => false,
    };
    Ok(if single { 1 } else { default_duration() })
}

// Une ligne illisible est écartée avec un avertissement, jamais tout le document.

fn lenient_rows<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let rows = Option::<Vec<Value>>::deserialize(d)?.unwrap_or_default();
    Ok(rows
        .into_iter()
        .enumerate()
        .filter_map(|(idx, row)| match serde_json::from_value(row) {
            Ok(row) => Some(row),
            Err(err) => {
                warn!(row = idx, error = %err, "malformed schedule row skipped");
                None
            }
        })
        .collect())
}

fn lenient_records<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<ReplacementRecord>, D::Error> {
    let rows = Option::<Vec<Value>>::deserialize(d)?.unwrap_or_default();
    let mut out = Vec::with_capacity(rows.len());
    for (idx, row) in rows.into_iter().enumerate() {
        match ReplacementRecord::from_value(row) {
            Ok(records) => out.extend(records),
            Err(err) => warn!(row = idx, error = %err, "malformed replacement record skipped"),
        }
    }
    Ok(out)
}
