// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Climbing attempt model and grade scales.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Which export table an attempt came from.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ClimbDiscipline {
    /// Roped route
    #[default]
    Route,
    /// Boulder problem
    Boulder,
}

/// One route or boulder-problem attempt within a climbing activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimbAttempt {
    /// Owning activity
    pub activity_id: u64,
    #[serde(default)]
    pub discipline: ClimbDiscipline,
    pub time: DateTime<Utc>,
    /// Time on the wall (seconds)
    pub duration_secs: f64,
    pub grade: Grade,
    #[serde(default)]
    pub max_hr: Option<u16>,
    /// Completed cleanly
    pub sent: bool,
    #[serde(default)]
    pub status: String,
    /// Tries the tracker logged for this climb
    #[serde(default)]
    pub attempt_count: Option<u32>,
}

impl ClimbAttempt {
    pub fn with_discipline(mut self, discipline: ClimbDiscipline) -> Self {
        self.discipline = discipline;
        self
    }
}

/// Grade scale family. Grades only compare within one scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeScale {
    French,
    Yds,
    VScale,
    Unrecognized,
}

/// A climbing grade.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Grade {
    /// French sport / Fontainebleau style: `6a`, `6a+`, `7`.
    French {
        number: u8,
        letter: Option<char>,
        plus: bool,
    },
    /// Yosemite decimal: `5.9`, `5.10a`.
    Yds { number: u8, letter: Option<char> },
    /// Hueco V scale; `None` is `VB`.
    VScale(Option<u8>),
    Raw(String),
}

impl Grade {
    /// Parse a grade as written in the export. Unknown notations are kept raw.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();

        parse_yds(&lower)
            .or_else(|| parse_vscale(&lower))
            .or_else(|| parse_french(&lower))
            .unwrap_or_else(|| Grade::Raw(trimmed.to_string()))
    }

    pub fn scale(&self) -> GradeScale {
        match self {
            Grade::French { .. } => GradeScale::French,
            Grade::Yds { .. } => GradeScale::Yds,
            Grade::VScale(_) => GradeScale::VScale,
            Grade::Raw(_) => GradeScale::Unrecognized,
        }
    }

    /// Sort key within the grade's own scale.
    fn rank(&self) -> Option<(u8, u8, u8)> {
        match self {
            Grade::French {
                number,
                letter,
                plus,
            } => Some((*number, letter_rank(*letter), u8::from(*plus))),
            Grade::Yds { number, letter } => Some((*number, letter_rank(*letter), 0)),
            // VB sorts below every numbered grade
            Grade::VScale(None) => Some((0, 0, 0)),
            Grade::VScale(Some(n)) => Some((1, *n, 0)),
            Grade::Raw(_) => None,
        }
    }
}

fn letter_rank(letter: Option<char>) -> u8 {
    match letter {
        Some(c) => c as u8 - b'a' + 1,
        None => 0,
    }
}

fn parse_french(s: &str) -> Option<Grade> {
    let mut chars = s.chars();
    let number = chars.next()?.to_digit(10)?;
    if number == 0 {
        return None;
    }
    let rest: Vec<char> = chars.collect();
    let (letter, rest) = match rest.split_first() {
        Some((c @ 'a'..='c', tail)) => (Some(*c), tail),
        _ => (None, rest.as_slice()),
    };
    let plus = match rest {
        [] => false,
        ['+'] => true,
        _ => return None,
    };
    Some(Grade::French {
        number: number as u8,
        letter,
        plus,
    })
}

fn parse_yds(s: &str) -> Option<Grade> {
    let body = s.strip_prefix("5.")?;
    let digits: String = body.chars().take_while(|c| c.is_ascii_digit()).collect();
    let number: u8 = digits.parse().ok()?;
    let letter = match &body[digits.len()..] {
        "" => None,
        tail => {
            let mut it = tail.chars();
            match (it.next(), it.next()) {
                (Some(c @ 'a'..='d'), None) => Some(c),
                _ => return None,
            }
        }
    };
    Some(Grade::Yds { number, letter })
}

/// Hardest grade on the V scale.
const MAX_V_GRADE: u8 = 17;

fn parse_vscale(s: &str) -> Option<Grade> {
    let body = s.strip_prefix('v')?;
    if body == "b" {
        return Some(Grade::VScale(None));
    }
    if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    body.parse::<u8>()
        .ok()
        .filter(|n| *n <= MAX_V_GRADE)
        .map(|n| Grade::VScale(Some(n)))
}

impl PartialOrd for Grade {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.scale() != other.scale() {
            return None;
        }
        match (self.rank(), other.rank()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => (self == other).then_some(Ordering::Equal),
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::French {
                number,
                letter,
                plus,
            } => {
                write!(f, "{}", number)?;
                if let Some(c) = letter {
                    write!(f, "{}", c)?;
                }
                if *plus {
                    f.write_str("+")?;
                }
                Ok(())
            }
            Grade::Yds { number, letter } => {
                write!(f, "5.{}", number)?;
                if let Some(c) = letter {
                    write!(f, "{}", c)?;
                }
                Ok(())
            }
            Grade::VScale(None) => f.write_str("VB"),
            Grade::VScale(Some(n)) => write!(f, "V{}", n),
            Grade::Raw(raw) => f.write_str(raw),
        }
    }
}

impl From<String> for Grade {
    fn from(raw: String) -> Self {
        Grade::parse(&raw)
    }
}

impl From<Grade> for String {
    fn from(grade: Grade) -> Self {
        grade.to_string()
    }
}
