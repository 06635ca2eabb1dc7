// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Loading tracker exports.
//!
//! Two formats carry the same tables: plain CSV files (one per table) and the
//! markdown export, where each `## Title` section holds a pipe table. Both go
//! through the same serde row types; markdown rows are converted to
//! `csv::StringRecord`s first.

use chrono::{NaiveDate, NaiveTime};
use csv::StringRecord;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io;

use crate::models::{
    ActivityRecord, ActivityType, ClimbAttempt, ClimbDiscipline, DailyStatsRecord, Grade,
    ReadinessRecord, SleepRecord, Vo2MaxRecord,
};
use crate::services::summary::SummaryInput;
use crate::time_utils::{parse_tracker_date, parse_tracker_timestamp};

const ACTIVITIES: &str = "activities";
const CLIMBING_ROUTES: &str = "climbing routes";
const BOULDER_PROBLEMS: &str = "boulder problems";
const SLEEP: &str = "sleep";
const TRAINING_READINESS: &str = "training readiness";
const DAILY_STATS: &str = "daily stats";
const VO2_MAX: &str = "vo2 max";

/// Placeholder rows the tracker writes for days without activity.
const NO_ACTIVITY: &str = "no activity";

/// Status values that mean the attempt was completed, when `Sent` is absent.
const SENT_STATUSES: [&str; 5] = ["completed", "sent", "topped", "flash", "onsight"];

/// Errors from reading an export.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Failed to read {table}: {source}")]
    Csv {
        table: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{table} row {row}: missing {field}")]
    MissingField {
        table: &'static str,
        row: usize,
        field: &'static str,
    },

    #[error("{table} row {row}: invalid {field} '{value}'")]
    InvalidField {
        table: &'static str,
        row: usize,
        field: &'static str,
        value: String,
    },
}

// ─── Row types ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ActivityRow {
    #[serde(rename = "activityType")]
    activity_type: Option<String>,
    #[serde(rename = "ActivityID", alias = "activityId")]
    activity_id: Option<String>,
    time: Option<String>,
    #[serde(rename = "startTimeGMT")]
    start_time_gmt: Option<String>,
    #[serde(rename = "elapsedDuration")]
    elapsed_duration: Option<String>,
    #[serde(rename = "movingDuration")]
    moving_duration: Option<String>,
    #[serde(rename = "averageHR")]
    average_hr: Option<String>,
    #[serde(rename = "maxHR")]
    max_hr: Option<String>,
    #[serde(rename = "activityName")]
    activity_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AttemptRow {
    time: Option<String>,
    #[serde(rename = "ActivityID", alias = "activityId")]
    activity_id: Option<String>,
    #[serde(rename = "Duration")]
    duration: Option<String>,
    #[serde(rename = "Grade", alias = "climbingGrade", alias = "boulderingGrade")]
    grade: Option<String>,
    #[serde(rename = "MaxHeartRate")]
    max_heart_rate: Option<String>,
    #[serde(rename = "Sent")]
    sent: Option<String>,
    #[serde(rename = "Status", alias = "resultType")]
    status: Option<String>,
    #[serde(rename = "attemptCount", alias = "AttemptCount")]
    attempt_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SleepRow {
    #[serde(rename = "calendarDate")]
    calendar_date: Option<String>,
    date: Option<String>,
    time: Option<String>,
    #[serde(rename = "avgOvernightHrv")]
    avg_overnight_hrv: Option<String>,
    #[serde(rename = "restingHeartRate")]
    resting_heart_rate: Option<String>,
    #[serde(rename = "sleepTimeSeconds")]
    sleep_time_seconds: Option<String>,
    #[serde(rename = "sleepScore")]
    sleep_score: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReadinessRow {
    time: Option<String>,
    #[serde(rename = "calendarDate")]
    calendar_date: Option<String>,
    score: Option<String>,
    level: Option<String>,
    #[serde(rename = "acuteLoad")]
    acute_load: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DailyStatsRow {
    #[serde(rename = "calendarDate")]
    calendar_date: Option<String>,
    date: Option<String>,
    time: Option<String>,
    #[serde(rename = "totalSteps")]
    total_steps: Option<String>,
    #[serde(rename = "restingHeartRate")]
    resting_heart_rate: Option<String>,
    #[serde(rename = "stressDuration")]
    stress_duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Vo2MaxRow {
    #[serde(rename = "calendarDate")]
    calendar_date: Option<String>,
    date: Option<String>,
    time: Option<String>,
    #[serde(rename = "vo2MaxValue", alias = "vo2Max")]
    vo2_max_value: Option<String>,
}

// ─── Cell parsing ────────────────────────────────────────────

/// Cell content, treating blanks and NaN markers as absent.
fn cell(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .filter(|v| !matches!(v.to_ascii_lowercase().as_str(), "nan" | "none" | "null" | "-"))
}

struct RowContext {
    table: &'static str,
    row: usize,
}

impl RowContext {
    fn missing(&self, field: &'static str) -> IngestError {
        IngestError::MissingField {
            table: self.table,
            row: self.row,
            field,
        }
    }

    fn invalid(&self, field: &'static str, value: &str) -> IngestError {
        IngestError::InvalidField {
            table: self.table,
            row: self.row,
            field,
            value: value.to_string(),
        }
    }

    fn required<'v>(&self, value: &'v Option<String>, field: &'static str) -> Result<&'v str, IngestError> {
        cell(value).ok_or_else(|| self.missing(field))
    }

    fn number(&self, value: &str, field: &'static str) -> Result<f64, IngestError> {
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| self.invalid(field, value))
    }

    /// IDs are sometimes written as floats (`12345.0`).
    fn id(&self, value: &str, field: &'static str) -> Result<u64, IngestError> {
        if let Ok(id) = value.parse::<u64>() {
            return Ok(id);
        }
        let n = self.number(value, field)?;
        if n < 0.0 || n.fract() != 0.0 {
            return Err(self.invalid(field, value));
        }
        Ok(n as u64)
    }

    /// Heart rates are rounded to whole bpm.
    fn bpm(&self, value: &Option<String>, field: &'static str) -> Result<Option<u16>, IngestError> {
        let Some(raw) = cell(value) else {
            return Ok(None);
        };
        let n = self.number(raw, field)?;
        if !(0.0..=300.0).contains(&n) {
            return Err(self.invalid(field, raw));
        }
        Ok(Some(n.round() as u16))
    }

    fn optional_number(&self, value: &Option<String>, field: &'static str) -> Result<Option<f64>, IngestError> {
        cell(value).map(|raw| self.number(raw, field)).transpose()
    }

    /// Non-negative counts, rounded. Floats such as `3.0` are accepted.
    fn count(&self, value: &Option<String>, field: &'static str) -> Result<Option<u64>, IngestError> {
        let Some(raw) = cell(value) else {
            return Ok(None);
        };
        let n = self.number(raw, field)?;
        if n < 0.0 {
            return Err(self.invalid(field, raw));
        }
        Ok(Some(n.round() as u64))
    }

    /// Calendar date from the first present column.
    fn date(&self, candidates: &[&Option<String>]) -> Result<NaiveDate, IngestError> {
        let raw = candidates
            .iter()
            .copied()
            .find_map(cell)
            .ok_or_else(|| self.missing("date"))?;
        parse_tracker_date(raw).ok_or_else(|| self.invalid("date", raw))
    }

    fn flag(&self, value: &str, field: &'static str) -> Result<bool, IngestError> {
        match value.to_ascii_lowercase().as_str() {
            "true" | "1" | "1.0" | "yes" | "y" => Ok(true),
            "false" | "0" | "0.0" | "no" | "n" => Ok(false),
            _ => Err(self.invalid(field, value)),
        }
    }
}

// ─── Row conversion ──────────────────────────────────────────

fn activity_from_row(row: ActivityRow, ctx: &RowContext) -> Result<Option<ActivityRecord>, IngestError> {
    let raw_type = ctx.required(&row.activity_type, "activityType")?;
    if raw_type.eq_ignore_ascii_case(NO_ACTIVITY) {
        return Ok(None);
    }

    let id_raw = ctx.required(&row.activity_id, "ActivityID")?;
    let time_raw = cell(&row.time)
        .or_else(|| cell(&row.start_time_gmt))
        .ok_or_else(|| ctx.missing("time"))?;
    let start = parse_tracker_timestamp(time_raw).ok_or_else(|| ctx.invalid("time", time_raw))?;
    let elapsed_raw = ctx.required(&row.elapsed_duration, "elapsedDuration")?;

    Ok(Some(ActivityRecord {
        activity_id: ctx.id(id_raw, "ActivityID")?,
        activity_type: ActivityType::from_tracker(raw_type),
        name: cell(&row.activity_name).map(str::to_string),
        start,
        elapsed_duration_secs: ctx.number(elapsed_raw, "elapsedDuration")?,
        moving_duration_secs: ctx.optional_number(&row.moving_duration, "movingDuration")?,
        avg_hr: ctx.bpm(&row.average_hr, "averageHR")?,
        max_hr: ctx.bpm(&row.max_hr, "maxHR")?,
    }))
}

fn attempt_from_row(
    row: AttemptRow,
    discipline: ClimbDiscipline,
    ctx: &RowContext,
) -> Result<ClimbAttempt, IngestError> {
    let time_raw = ctx.required(&row.time, "time")?;
    let id_raw = ctx.required(&row.activity_id, "ActivityID")?;
    let duration_raw = ctx.required(&row.duration, "Duration")?;
    let status = cell(&row.status).unwrap_or_default().to_string();

    let sent = match cell(&row.sent) {
        Some(raw) => ctx.flag(raw, "Sent")?,
        None => SENT_STATUSES.contains(&status.to_ascii_lowercase().as_str()),
    };

    Ok(ClimbAttempt {
        activity_id: ctx.id(id_raw, "ActivityID")?,
        discipline,
        time: parse_tracker_timestamp(time_raw).ok_or_else(|| ctx.invalid("time", time_raw))?,
        duration_secs: ctx.number(duration_raw, "Duration")?,
        grade: cell(&row.grade)
            .map(Grade::parse)
            .unwrap_or_else(|| Grade::Raw("ungraded".to_string())),
        max_hr: ctx.bpm(&row.max_heart_rate, "MaxHeartRate")?,
        sent,
        status,
        attempt_count: ctx
            .count(&row.attempt_count, "attemptCount")?
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX)),
    })
}

fn sleep_from_row(row: SleepRow, ctx: &RowContext) -> Result<SleepRecord, IngestError> {
    Ok(SleepRecord {
        date: ctx.date(&[&row.calendar_date, &row.date, &row.time])?,
        avg_overnight_hrv: ctx.optional_number(&row.avg_overnight_hrv, "avgOvernightHrv")?,
        resting_hr: ctx.bpm(&row.resting_heart_rate, "restingHeartRate")?,
        sleep_time_secs: ctx.optional_number(&row.sleep_time_seconds, "sleepTimeSeconds")?,
        sleep_score: ctx.optional_number(&row.sleep_score, "sleepScore")?,
    })
}

/// Readings carrying only a calendar date are placed at midnight UTC.
fn readiness_from_row(row: ReadinessRow, ctx: &RowContext) -> Result<ReadinessRecord, IngestError> {
    let time = match cell(&row.time) {
        Some(raw) => parse_tracker_timestamp(raw).ok_or_else(|| ctx.invalid("time", raw))?,
        None => ctx
            .date(&[&row.calendar_date])?
            .and_time(NaiveTime::default())
            .and_utc(),
    };

    Ok(ReadinessRecord {
        time,
        score: ctx.optional_number(&row.score, "score")?,
        level: cell(&row.level).map(str::to_string),
        acute_load: ctx.optional_number(&row.acute_load, "acuteLoad")?,
    })
}

fn daily_stats_from_row(row: DailyStatsRow, ctx: &RowContext) -> Result<DailyStatsRecord, IngestError> {
    Ok(DailyStatsRecord {
        date: ctx.date(&[&row.calendar_date, &row.date, &row.time])?,
        total_steps: ctx.count(&row.total_steps, "totalSteps")?,
        resting_hr: ctx.bpm(&row.resting_heart_rate, "restingHeartRate")?,
        stress_duration_secs: ctx.optional_number(&row.stress_duration, "stressDuration")?,
    })
}

/// Rows without an estimate are dropped.
fn vo2_max_from_row(row: Vo2MaxRow, ctx: &RowContext) -> Result<Option<Vo2MaxRecord>, IngestError> {
    let Some(value) = ctx.optional_number(&row.vo2_max_value, "vo2MaxValue")? else {
        return Ok(None);
    };
    Ok(Some(Vo2MaxRecord {
        date: ctx.date(&[&row.calendar_date, &row.date, &row.time])?,
        value,
    }))
}

// ─── CSV ─────────────────────────────────────────────────────

fn read_rows<R: io::Read, T: DeserializeOwned>(reader: R, table: &'static str) -> Result<Vec<T>, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    rdr.deserialize()
        .map(|row| row.map_err(|source| IngestError::Csv { table, source }))
        .collect()
}

fn convert<T, U>(
    rows: Vec<T>,
    table: &'static str,
    mut f: impl FnMut(T, &RowContext) -> Result<U, IngestError>,
) -> Result<Vec<U>, IngestError> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| f(row, &RowContext { table, row: i + 1 }))
        .collect()
}

fn activities_from_rows(rows: Vec<ActivityRow>) -> Result<Vec<ActivityRecord>, IngestError> {
    let parsed = convert(rows, ACTIVITIES, activity_from_row)?;
    Ok(parsed.into_iter().flatten().collect())
}

/// Read the activity summary table.
pub fn read_activities_csv<R: io::Read>(reader: R) -> Result<Vec<ActivityRecord>, IngestError> {
    activities_from_rows(read_rows(reader, ACTIVITIES)?)
}

/// Read a route or boulder attempt table.
pub fn read_attempts_csv<R: io::Read>(
    reader: R,
    discipline: ClimbDiscipline,
) -> Result<Vec<ClimbAttempt>, IngestError> {
    let table = table_for(discipline);
    let rows: Vec<AttemptRow> = read_rows(reader, table)?;
    convert(rows, table, |row, ctx| attempt_from_row(row, discipline, ctx))
}

/// Read the sleep summary table.
pub fn read_sleep_csv<R: io::Read>(reader: R) -> Result<Vec<SleepRecord>, IngestError> {
    convert(read_rows(reader, SLEEP)?, SLEEP, sleep_from_row)
}

/// Read the training readiness table.
pub fn read_readiness_csv<R: io::Read>(reader: R) -> Result<Vec<ReadinessRecord>, IngestError> {
    convert(
        read_rows(reader, TRAINING_READINESS)?,
        TRAINING_READINESS,
        readiness_from_row,
    )
}

/// Read the daily stats table.
pub fn read_daily_stats_csv<R: io::Read>(reader: R) -> Result<Vec<DailyStatsRecord>, IngestError> {
    convert(read_rows(reader, DAILY_STATS)?, DAILY_STATS, daily_stats_from_row)
}

/// Read the VO2 max table.
pub fn read_vo2_max_csv<R: io::Read>(reader: R) -> Result<Vec<Vo2MaxRecord>, IngestError> {
    let parsed = convert(read_rows(reader, VO2_MAX)?, VO2_MAX, vo2_max_from_row)?;
    Ok(parsed.into_iter().flatten().collect())
}

fn table_for(discipline: ClimbDiscipline) -> &'static str {
    match discipline {
        ClimbDiscipline::Route => CLIMBING_ROUTES,
        ClimbDiscipline::Boulder => BOULDER_PROBLEMS,
    }
}

// ─── Markdown export ─────────────────────────────────────────

/// All tables of one export.
#[derive(Debug, Default)]
pub struct TrainingExport {
    pub activities: Vec<ActivityRecord>,
    pub climbing_routes: Vec<ClimbAttempt>,
    pub boulder_problems: Vec<ClimbAttempt>,
    pub sleep: Vec<SleepRecord>,
    pub training_readiness: Vec<ReadinessRecord>,
    pub daily_stats: Vec<DailyStatsRecord>,
    pub vo2_max: Vec<Vo2MaxRecord>,
}

impl TrainingExport {
    pub fn into_input(self) -> SummaryInput {
        let mut attempts = self.climbing_routes;
        attempts.extend(self.boulder_problems);
        SummaryInput {
            activities: self.activities,
            attempts,
            sleep: self.sleep,
            readiness: self.training_readiness,
            daily_stats: self.daily_stats,
            vo2_max: self.vo2_max,
        }
    }
}

#[derive(Debug)]
struct MarkdownTable {
    key: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl MarkdownTable {
    fn deserialize<T: DeserializeOwned>(&self, table: &'static str) -> Result<Vec<T>, IngestError> {
        let headers = StringRecord::from(self.headers.clone());
        self.rows
            .iter()
            .map(|row| {
                let record = StringRecord::from(row.clone());
                record
                    .deserialize::<T>(Some(&headers))
                    .map_err(|source| IngestError::Csv { table, source })
            })
            .collect()
    }
}

/// Split a pipe-table line into cells, honouring `\|` escapes.
fn split_cells(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = line.trim().chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    cells.push(current);

    // Drop the empty edges outside the leading and trailing pipes
    if cells.first().is_some_and(|c| c.trim().is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.trim().is_empty()) {
        cells.pop();
    }
    cells.into_iter().map(|c| c.trim().to_string()).collect()
}

fn parse_section(title: &str, body: &[&str]) -> Option<MarkdownTable> {
    if body.iter().any(|l| l.contains("No data available")) {
        return None;
    }
    let table_lines: Vec<&str> = body
        .iter()
        .map(|l| l.trim())
        .filter(|l| l.starts_with('|'))
        .collect();
    // Header and separator at minimum
    if table_lines.len() < 2 {
        return None;
    }

    let headers = split_cells(table_lines[0]);
    let rows = table_lines[2..]
        .iter()
        .map(|line| {
            let mut cells = split_cells(line);
            cells.resize(headers.len(), String::new());
            cells
        })
        .collect();

    Some(MarkdownTable {
        key: title.split_whitespace().collect::<String>().to_ascii_lowercase(),
        headers,
        rows,
    })
}

fn markdown_tables(text: &str) -> Vec<MarkdownTable> {
    let mut tables = Vec::new();
    let mut current: Option<(&str, Vec<&str>)> = None;

    for line in text.lines() {
        if let Some(title) = line.strip_prefix("## ") {
            if let Some((t, body)) = current.take() {
                tables.extend(parse_section(t, &body));
            }
            current = Some((title.trim(), Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }
    if let Some((t, body)) = current {
        tables.extend(parse_section(t, &body));
    }
    tables
}

fn table_attempts(
    table: &MarkdownTable,
    discipline: ClimbDiscipline,
) -> Result<Vec<ClimbAttempt>, IngestError> {
    let name = table_for(discipline);
    let rows: Vec<AttemptRow> = table.deserialize(name)?;
    convert(rows, name, |row, ctx| attempt_from_row(row, discipline, ctx))
}

/// Parse the markdown export.
pub fn parse_markdown_export(text: &str) -> Result<TrainingExport, IngestError> {
    let mut export = TrainingExport::default();

    for table in markdown_tables(text) {
        match table.key.as_str() {
            "activitysummary" => {
                export.activities = activities_from_rows(table.deserialize(ACTIVITIES)?)?;
            }
            "climbingroutes" => {
                export.climbing_routes = table_attempts(&table, ClimbDiscipline::Route)?;
            }
            "boulderproblems" => {
                export.boulder_problems = table_attempts(&table, ClimbDiscipline::Boulder)?;
            }
            "sleepsummary" => {
                export.sleep = convert(table.deserialize(SLEEP)?, SLEEP, sleep_from_row)?;
            }
            "trainingreadiness" => {
                export.training_readiness = convert(
                    table.deserialize(TRAINING_READINESS)?,
                    TRAINING_READINESS,
                    readiness_from_row,
                )?;
            }
            "dailystats" => {
                export.daily_stats =
                    convert(table.deserialize(DAILY_STATS)?, DAILY_STATS, daily_stats_from_row)?;
            }
            "vo2_max" | "vo2max" => {
                let parsed = convert(table.deserialize(VO2_MAX)?, VO2_MAX, vo2_max_from_row)?;
                export.vo2_max = parsed.into_iter().flatten().collect();
            }
            other => tracing::debug!(table = other, rows = table.rows.len(), "Skipping export table"),
        }
    }

    tracing::info!(
        activities = export.activities.len(),
        routes = export.climbing_routes.len(),
        boulders = export.boulder_problems.len(),
        nights = export.sleep.len(),
        readiness = export.training_readiness.len(),
        daily_stats = export.daily_stats.len(),
        vo2_max = export.vo2_max.len(),
        "Parsed markdown export"
    );
    Ok(export)
}
