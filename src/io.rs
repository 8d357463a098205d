use crate::model::{BaselineSchedule, MergedEntry, PeriodRecord, ReplacementBatch, Timetable, WeekParity};
use crate::normalize::normalize_group;
use anyhow::{bail, Context};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Planning de base : `.csv` via [`import_baseline_csv`], sinon JSON.
pub fn load_baseline<P: AsRef<Path>>(path: P, group: &str) -> anyhow::Result<BaselineSchedule> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        import_baseline_csv(path, group)
    } else {
        load_baseline_json(path)
    }
}

/// JSON `{"group": ..., "schedule": [...]}` produit par l'extracteur du tableur.
pub fn load_baseline_json<P: AsRef<Path>>(path: P) -> anyhow::Result<BaselineSchedule> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let schedule: BaselineSchedule = serde_json::from_slice(&data)
        .with_context(|| format!("parsing baseline schedule {}", path.display()))?;
    Ok(schedule)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReplacementDocument {
    // Ordre significatif : un tableau se lit aussi comme un lot.
    PerGroup(Vec<ReplacementBatch>),
    Single(ReplacementBatch),
}

/// Document de remplacements : un lot, ou une liste de lots dont on garde `group`.
pub fn load_replacements_json<P: AsRef<Path>>(
    path: P,
    group: &str,
) -> anyhow::Result<ReplacementBatch> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let doc: ReplacementDocument = serde_json::from_slice(&data)
        .with_context(|| format!("parsing replacement document {}", path.display()))?;
    match doc {
        ReplacementDocument::Single(batch) => Ok(batch),
        ReplacementDocument::PerGroup(batches) => {
            let wanted = normalize_group(group);
            match batches
                .into_iter()
                .find(|b| normalize_group(&b.group) == wanted)
            {
                Some(batch) => Ok(batch),
                None => bail!("group {group} not found in {}", path.display()),
            }
        }
    }
}

/// Import CSV du planning de base :
/// header `day,pair,time,raw_time,room,subject[,teacher][,week_type][,duration]`.
///
/// Les lignes sans matière sont ignorées (cellule vide du tableur), les lignes
/// illisibles aussi, avec un avertissement.
pub fn import_baseline_csv<P: AsRef<Path>>(path: P, group: &str) -> anyhow::Result<BaselineSchedule> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for (idx, rec) in rdr.records().enumerate() {
        let rec = match rec {
            Ok(rec) => rec,
            Err(err) => {
                warn!(row = idx + 2, error = %err, "unreadable CSV row skipped");
                continue;
            }
        };
        let subject = cell(&rec, 5).unwrap_or_default();
        if subject.is_empty() {
            continue;
        }
        out.push(PeriodRecord {
            day: cell(&rec, 0).unwrap_or_default(),
            period_label: cell(&rec, 1),
            time: cell(&rec, 2),
            raw_time: cell(&rec, 3),
            room: cell(&rec, 4).unwrap_or_default(),
            subject,
            teacher: cell(&rec, 6).unwrap_or_default(),
            week_parity: cell(&rec, 7).as_deref().and_then(WeekParity::parse),
            duration: if cell(&rec, 8).as_deref() == Some("1") { 1 } else { 2 },
        });
    }
    Ok(BaselineSchedule::new(group, out))
}

fn cell(rec: &StringRecord, idx: usize) -> Option<String> {
    rec.get(idx)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Export JSON de l'emploi du temps (jolie mise en forme)
pub fn export_timetable_json<P: AsRef<Path>>(path: P, timetable: &Timetable) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(timetable)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV : header `day,pair,time,room,subject,teacher,replaced_subject,comment`
pub fn export_timetable_csv<P: AsRef<Path>>(path: P, timetable: &Timetable) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "day",
        "pair",
        "time",
        "room",
        "subject",
        "teacher",
        "replaced_subject",
        "comment",
    ])?;
    for day in &timetable.days {
        for entry in &day.schedule {
            match entry {
                MergedEntry::Period(p) => w.write_record([
                    p.day.as_str(),
                    p.period_label.as_deref().unwrap_or(""),
                    p.time.as_deref().unwrap_or(""),
                    p.room.as_str(),
                    p.subject.as_str(),
                    p.teacher.as_str(),
                    p.replaced_subject.as_deref().unwrap_or(""),
                    "",
                ])?,
                MergedEntry::Comment { comment } => w.write_record([
                    day.day.as_str(),
                    "",
                    "",
                    "",
                    "",
                    "",
                    "",
                    comment.as_str(),
                ])?,
            }
        }
    }
    w.flush()?;
    Ok(())
}
