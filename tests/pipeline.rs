#![forbid(unsafe_code)]
use chrono::Weekday;
use zamena::{
    build_timetable, BaselineSchedule, LessonRef, Locale, MergedEntry, PeriodRecord,
    PipelineOptions, ReplacementBatch, ReplacementRecord, Substitution,
};

const GROUP: &str = "РС02-24";

fn opts() -> PipelineOptions {
    PipelineOptions::new(GROUP, Locale::En)
}

fn baseline() -> BaselineSchedule {
    BaselineSchedule::new(
        GROUP,
        vec![
            PeriodRecord::new("Saturday", "1", "101", "Math").with_times("08:00-09:40", None),
            PeriodRecord::new("Monday", "1", "102", "Physics").with_times("08:00-09:40", None),
            PeriodRecord::new("Monday", "2", "103", "History").with_times("09:50-11:30", None),
            PeriodRecord::new("Thursday", "1", "104", "Art"),
        ],
    )
}

#[test]
fn missing_baseline_reports_unavailable() {
    let timetable = build_timetable(None, None, Weekday::Mon, &opts());
    assert_eq!(timetable.days.len(), 1);
    assert_eq!(timetable.days[0].day, "Error");
    assert_eq!(
        timetable.days[0].schedule,
        vec![MergedEntry::comment("Schedule unavailable for group РС02-24.")]
    );
    assert!(!timetable.has_periods());
}

#[test]
fn baseline_of_another_group_is_unavailable() {
    let other = BaselineSchedule::new("ТМ01-23", baseline().schedule);
    let timetable = build_timetable(Some(&other), None, Weekday::Mon, &opts());
    assert_eq!(timetable.days[0].day, "Error");
}

#[test]
fn saturday_shows_saturday_and_monday_from_baseline() {
    let timetable = build_timetable(Some(&baseline()), None, Weekday::Sat, &opts());
    let days: Vec<_> = timetable.days.iter().map(|d| d.day.as_str()).collect();
    assert_eq!(days, vec!["Saturday", "Monday"]);
    assert_eq!(timetable.days[0].schedule.len(), 1);
    assert_eq!(timetable.days[1].schedule.len(), 2);
    assert!(timetable.has_periods());
}

#[test]
fn replacements_drive_days_and_stay_on_their_day() {
    let replacements = ReplacementBatch {
        group: "рс 02-24".into(),
        week_parity: None,
        records: vec![
            Substitution::new("Monday", "2", LessonRef::new("Chemistry")).into(),
            ReplacementRecord::comment("Monday", "Room change on floor 2"),
            ReplacementRecord::comment("Saturday", "Saturday note"),
        ],
    };
    let timetable = build_timetable(Some(&baseline()), Some(&replacements), Weekday::Sun, &opts());

    assert_eq!(timetable.days.len(), 1);
    let monday = &timetable.days[0];
    assert_eq!(monday.day, "Monday");
    let subjects: Vec<_> = monday
        .schedule
        .iter()
        .filter_map(MergedEntry::as_period)
        .map(|p| p.subject.as_str())
        .collect();
    assert_eq!(subjects, vec!["Physics", "Chemistry"]);
    assert_eq!(
        monday.schedule.last(),
        Some(&MergedEntry::comment("Room change on floor 2"))
    );
}

#[test]
fn replacements_of_another_group_are_ignored() {
    let replacements = ReplacementBatch {
        group: "ТМ01-23".into(),
        week_parity: None,
        records: vec![Substitution::new("Thursday", "1", LessonRef::new("Chemistry")).into()],
    };
    let timetable = build_timetable(Some(&baseline()), Some(&replacements), Weekday::Sun, &opts());
    assert_eq!(timetable.days[0].day, "Monday");
    assert!(timetable.days[0]
        .schedule
        .iter()
        .filter_map(MergedEntry::as_period)
        .all(|p| p.replaced_subject.is_none()));
}

#[test]
fn no_classes_yields_single_comment() {
    let timetable = build_timetable(Some(&baseline()), None, Weekday::Tue, &opts());
    assert_eq!(timetable.days.len(), 1);
    assert_eq!(timetable.days[0].day, "Wednesday");
    assert_eq!(
        timetable.days[0].schedule,
        vec![MergedEntry::comment("No classes on Wednesday.")]
    );
}

#[test]
fn empty_day_among_others_gets_its_own_comment() {
    let mut baseline = baseline();
    baseline.schedule.retain(|p| p.day != "Saturday");
    let timetable = build_timetable(Some(&baseline), None, Weekday::Sat, &opts());

    let days: Vec<_> = timetable.days.iter().map(|d| d.day.as_str()).collect();
    assert_eq!(days, vec!["Saturday", "Monday"]);
    assert_eq!(
        timetable.days[0].schedule,
        vec![MergedEntry::comment("No classes on Saturday.")]
    );
    assert_eq!(timetable.days[1].schedule.len(), 2);
}

#[test]
fn english_day_names_match_russian_target_days() {
    let opts = PipelineOptions::new(GROUP, Locale::Ru);
    let timetable = build_timetable(Some(&baseline()), None, Weekday::Sun, &opts);
    assert_eq!(timetable.days.len(), 1);
    assert_eq!(timetable.days[0].day, "Понедельник");
    let subjects: Vec<_> = timetable.days[0]
        .schedule
        .iter()
        .filter_map(MergedEntry::as_period)
        .map(|p| p.subject.as_str())
        .collect();
    assert_eq!(subjects, vec!["Physics", "History"]);
}

#[test]
fn russian_replacement_day_applies_to_english_baseline() {
    let replacements = ReplacementBatch {
        group: GROUP.into(),
        week_parity: None,
        records: vec![Substitution::new("Понедельник", "2", LessonRef::new("Chemistry")).into()],
    };
    let timetable = build_timetable(Some(&baseline()), Some(&replacements), Weekday::Sun, &opts());
    assert_eq!(timetable.days.len(), 1);
    let periods: Vec<_> = timetable.days[0]
        .schedule
        .iter()
        .filter_map(MergedEntry::as_period)
        .collect();
    assert_eq!(periods.len(), 2);
    assert_eq!(periods[1].subject, "Chemistry");
    assert_eq!(periods[1].replaced_subject.as_deref(), Some("History"));
}
