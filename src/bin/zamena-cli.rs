#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate, Weekday};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use zamena::{
    build_timetable, has_url_changed, io,
    marker::DOCX_URL_KEY,
    model::{BaselineSchedule, DaySchedule, ReplacementBatch, Timetable},
    select_target_days, split_time_interval, Config, FileMarkerStore, Locale, Merger,
    ScheduleRenderer, TextRenderer,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Emploi du temps d'un groupe : planning de base + remplacements
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier de configuration JSON
    #[arg(long, global = true, env = "ZAMENA_CONFIG")]
    config: Option<PathBuf>,

    /// Groupe cible (prioritaire sur la configuration)
    #[arg(long, global = true, env = "ZAMENA_GROUP")]
    group: Option<String>,

    /// Langue des jours et messages : ru | en
    #[arg(long, global = true)]
    locale: Option<Locale>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fusionner un jour précis
    Merge {
        /// Planning de base (JSON ou CSV)
        #[arg(long)]
        baseline: Option<PathBuf>,
        /// Document de remplacements (JSON)
        #[arg(long)]
        replacements: Option<PathBuf>,
        #[arg(long)]
        day: String,
        #[arg(long)]
        out_json: Option<PathBuf>,
    },

    /// Afficher les jours cibles
    Days {
        #[arg(long)]
        replacements: Option<PathBuf>,
        /// Date du jour, AAAA-MM-JJ (défaut : aujourd'hui)
        #[arg(long)]
        today: Option<String>,
    },

    /// Couper une paire double "HH:MM-HH:MM" en deux moitiés
    Split { range: String },

    /// Vérifier si l'URL du document de remplacements a changé
    CheckUrl {
        url: String,
        /// Répertoire du marqueur (prioritaire sur la configuration)
        #[arg(long)]
        marker_dir: Option<PathBuf>,
    },

    /// Emploi du temps complet des jours cibles
    Show {
        #[arg(long)]
        baseline: Option<PathBuf>,
        #[arg(long)]
        replacements: Option<PathBuf>,
        #[arg(long)]
        today: Option<String>,
        #[arg(long)]
        out_json: Option<PathBuf>,
        #[arg(long)]
        out_csv: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(group) = cli.group {
        config.group = group;
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    config.validate()?;
    let renderer = TextRenderer::new(config.locale);

    let code = match cli.cmd {
        Commands::Merge {
            baseline,
            replacements,
            day,
            out_json,
        } => {
            let Some(path) = baseline.or_else(|| config.baseline.clone()) else {
                bail!("no baseline schedule given (--baseline or config)");
            };
            let baseline = io::load_baseline(&path, &config.group)?;
            let replacements = match replacements.or_else(|| config.replacements.clone()) {
                Some(path) => io::load_replacements_json(&path, &config.group)?,
                None => ReplacementBatch::empty(config.group.clone()),
            };
            let outcome = Merger::new(config.merge_options())
                .merge(&baseline.for_day(&day), &replacements.for_day(&day));
            for anomaly in &outcome.stats.anomalies {
                eprintln!("Warning: {:?} on {}: {}", anomaly.kind, anomaly.day, anomaly.detail);
            }
            let timetable = Timetable {
                group: outcome.schedule.group,
                days: vec![DaySchedule {
                    day,
                    schedule: outcome.schedule.schedule,
                }],
            };
            if let Some(path) = out_json {
                io::export_timetable_json(path, &timetable)?;
            }
            print!("{}", renderer.render(&timetable));
            0
        }
        Commands::Days {
            replacements,
            today,
        } => {
            let replacements = load_replacements_lenient(
                replacements.or_else(|| config.replacements.clone()),
                &config.group,
            );
            let targets = select_target_days(
                weekday_of(today.as_deref())?,
                replacements.as_ref(),
                config.locale,
            );
            for day in &targets.days {
                println!("{day}");
            }
            0
        }
        Commands::Split { range } => {
            let (first, second) = split_time_interval(&range);
            println!("{first}");
            println!("{second}");
            0
        }
        Commands::CheckUrl { url, marker_dir } => {
            let store = FileMarkerStore::new(marker_dir.unwrap_or_else(|| config.marker_dir.clone()));
            if has_url_changed(&store, DOCX_URL_KEY, &url)? {
                println!("changed");
            } else {
                println!("unchanged");
            }
            0
        }
        Commands::Show {
            baseline,
            replacements,
            today,
            out_json,
            out_csv,
        } => {
            let baseline = load_baseline_lenient(
                baseline.or_else(|| config.baseline.clone()),
                &config.group,
            );
            let replacements = load_replacements_lenient(
                replacements.or_else(|| config.replacements.clone()),
                &config.group,
            );
            let timetable = build_timetable(
                baseline.as_ref(),
                replacements.as_ref(),
                weekday_of(today.as_deref())?,
                &config.pipeline_options(),
            );
            if let Some(path) = out_json {
                io::export_timetable_json(path, &timetable)?;
            }
            if let Some(path) = out_csv {
                io::export_timetable_csv(path, &timetable)?;
            }
            print!("{}", renderer.render(&timetable));
            // Code 2 = rien à afficher hors messages synthétiques
            if timetable.has_periods() {
                0
            } else {
                2
            }
        }
    };

    std::process::exit(code);
}

fn weekday_of(raw: Option<&str>) -> Result<Weekday> {
    let date = match raw {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .with_context(|| format!("invalid date (expected YYYY-MM-DD): {raw}"))?,
        None => Local::now().date_naive(),
    };
    Ok(date.weekday())
}

// Source indisponible = pas de données, jamais une erreur fatale.

fn load_baseline_lenient(path: Option<PathBuf>, group: &str) -> Option<BaselineSchedule> {
    let path = path?;
    match io::load_baseline(&path, group) {
        Ok(schedule) => Some(schedule),
        Err(err) => {
            eprintln!("Warning: baseline schedule unavailable: {err:#}");
            None
        }
    }
}

fn load_replacements_lenient(path: Option<PathBuf>, group: &str) -> Option<ReplacementBatch> {
    let path = path?;
    match io::load_replacements_json(&path, group) {
        Ok(batch) => Some(batch),
        Err(err) => {
            eprintln!("Warning: replacements unavailable, using baseline only: {err:#}");
            None
        }
    }
}
