//! Availability and preference rule grammar.
//!
//! # Availability
//!
//! Comma-separated windows `Day_HHMM_HHMM` or `Any_HHMM_HHMM`, e.g.
//! `"Mon_0900_1700,Any_0700_1200"`. A shift is available when some window's
//! day matches and the window fully contains the shift.
//!
//! # Preferences
//!
//! Semicolon-separated `key:value` pairs:
//!
//! | key              | value                                            |
//! |------------------|--------------------------------------------------|
//! | `preferred`      | `Day_Block`, `Block` = `Any`, `HHMM_HHMM`, `morning`, `afternoon`, `evening` |
//! | `unpreferred`    | same as `preferred`                              |
//! | `preferredday`   | `Day`                                            |
//! | `unpreferredday` | `Day`                                            |
//!
//! A preference rule matches when its window *overlaps* the shift.
//!
//! Malformed entries never raise: they are skipped at parse time and simply
//! never match.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use std::fmt;
use tracing::trace;

/// Named block `morning`: 07:00–12:00.
pub const MORNING: (u32, u32) = (7, 12);
/// Named block `afternoon`: 12:00–17:00.
pub const AFTERNOON: (u32, u32) = (12, 17);
/// Named block `evening`: 17:00–22:00.
pub const EVENING: (u32, u32) = (17, 22);

/// Parses a three-letter weekday abbreviation (`Mon` … `Sun`, exact case).
pub fn parse_day(s: &str) -> Option<Weekday> {
    match s {
        "Mon" => Some(Weekday::Mon),
        "Tue" => Some(Weekday::Tue),
        "Wed" => Some(Weekday::Wed),
        "Thu" => Some(Weekday::Thu),
        "Fri" => Some(Weekday::Fri),
        "Sat" => Some(Weekday::Sat),
        "Sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Parses a four-digit `HHMM` time.
pub fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour: u32 = s[..2].parse().ok()?;
    let minute: u32 = s[2..].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn hours(block: (u32, u32)) -> (NaiveTime, NaiveTime) {
    (
        NaiveTime::from_hms_opt(block.0, 0, 0).unwrap_or(NaiveTime::MIN),
        NaiveTime::from_hms_opt(block.1, 0, 0).unwrap_or(NaiveTime::MIN),
    )
}

// ============================================================================
// Availability
// ============================================================================

/// Day selector of an availability window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayMatcher {
    /// Every day of the week.
    Any,
    /// A single weekday.
    Day(Weekday),
}

impl DayMatcher {
    fn matches(self, date: NaiveDate) -> bool {
        match self {
            DayMatcher::Any => true,
            DayMatcher::Day(day) => date.weekday() == day,
        }
    }
}

/// One parsed `Day_HHMM_HHMM` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityWindow {
    pub day: DayMatcher,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl AvailabilityWindow {
    fn parse(entry: &str) -> Option<Self> {
        let parts: Vec<&str> = entry.split('_').collect();
        let [day, start, end] = parts.as_slice() else {
            return None;
        };
        let day = if day.eq_ignore_ascii_case("any") {
            DayMatcher::Any
        } else {
            DayMatcher::Day(parse_day(day)?)
        };
        let start = parse_hhmm(start)?;
        let end = parse_hhmm(end)?;
        (end > start).then_some(Self { day, start, end })
    }

    fn contains(&self, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> bool {
        self.day.matches(date) && start >= self.start && end <= self.end
    }
}

/// Parsed availability rule set of one employee.
///
/// An empty rule set (blank or entirely malformed string) means the
/// employee is available for nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub struct AvailabilityRules {
    raw: String,
    windows: Vec<AvailabilityWindow>,
}

impl AvailabilityRules {
    /// Parses a comma-separated availability string, skipping malformed entries.
    pub fn parse(raw: &str) -> Self {
        let windows = raw
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .filter_map(|entry| {
                let window = AvailabilityWindow::parse(entry);
                if window.is_none() {
                    trace!(entry, "skipping malformed availability entry");
                }
                window
            })
            .collect();
        Self {
            raw: raw.to_string(),
            windows,
        }
    }

    /// Whether some window covers the whole shift on `date`.
    pub fn permits(&self, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> bool {
        self.windows.iter().any(|w| w.contains(date, start, end))
    }

    /// The successfully parsed windows.
    pub fn windows(&self) -> &[AvailabilityWindow] {
        &self.windows
    }

    /// The rule string as given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl From<String> for AvailabilityRules {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<AvailabilityRules> for String {
    fn from(rules: AvailabilityRules) -> Self {
        rules.raw
    }
}

impl fmt::Display for AvailabilityRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// ============================================================================
// Preferences
// ============================================================================

/// Whether a rule marks time as wanted or unwanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceKind {
    Preferred,
    Unpreferred,
}

/// Time-of-day part of a preference rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBlock {
    /// The whole day.
    Any,
    /// `[start, end)`, matched by overlap.
    Window(NaiveTime, NaiveTime),
}

/// One parsed preference rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferenceRule {
    pub kind: PreferenceKind,
    pub day: Weekday,
    pub block: TimeBlock,
}

impl PreferenceRule {
    fn parse(entry: &str) -> Option<Self> {
        let (key, value) = entry.split_once(':')?;
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        match key.as_str() {
            "preferred" => Self::parse_window(PreferenceKind::Preferred, value),
            "unpreferred" => Self::parse_window(PreferenceKind::Unpreferred, value),
            "preferredday" => Some(Self::whole_day(PreferenceKind::Preferred, parse_day(value)?)),
            "unpreferredday" => {
                Some(Self::whole_day(PreferenceKind::Unpreferred, parse_day(value)?))
            }
            _ => None,
        }
    }

    fn whole_day(kind: PreferenceKind, day: Weekday) -> Self {
        Self {
            kind,
            day,
            block: TimeBlock::Any,
        }
    }

    fn parse_window(kind: PreferenceKind, value: &str) -> Option<Self> {
        let (day, block) = value.split_once('_').unwrap_or((value, "Any"));
        let day = parse_day(day)?;
        let block = parse_block(block.trim())?;
        Some(Self { kind, day, block })
    }

    /// Whether the rule's day matches and its window overlaps the shift.
    pub fn matches(&self, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> bool {
        if date.weekday() != self.day {
            return false;
        }
        match self.block {
            TimeBlock::Any => true,
            TimeBlock::Window(rule_start, rule_end) => start < rule_end && end > rule_start,
        }
    }
}

fn parse_block(block: &str) -> Option<TimeBlock> {
    if block.eq_ignore_ascii_case("any") {
        return Some(TimeBlock::Any);
    }
    let explicit = block
        .split_once('_')
        .and_then(|(s, e)| Some((parse_hhmm(s)?, parse_hhmm(e)?)));
    let (start, end) = match explicit {
        Some(window) => window,
        None => match block.to_ascii_lowercase().as_str() {
            "morning" => hours(MORNING),
            "afternoon" => hours(AFTERNOON),
            "evening" => hours(EVENING),
            _ => return None,
        },
    };
    (end > start).then_some(TimeBlock::Window(start, end))
}

/// Outcome of checking a shift against an employee's preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceScore {
    Preferred,
    Neutral,
    Unpreferred,
}

/// Parsed preference rule set of one employee.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub struct PreferenceRules {
    raw: String,
    rules: Vec<PreferenceRule>,
}

impl PreferenceRules {
    /// Parses a semicolon-separated preference string, skipping malformed entries.
    pub fn parse(raw: &str) -> Self {
        let rules = raw
            .split(';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .filter_map(|entry| {
                let rule = PreferenceRule::parse(entry);
                if rule.is_none() {
                    trace!(entry, "skipping malformed preference entry");
                }
                rule
            })
            .collect();
        Self {
            raw: raw.to_string(),
            rules,
        }
    }

    /// Scores a shift. Any matching unpreferred rule wins over preferred ones.
    pub fn score(&self, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> PreferenceScore {
        let mut score = PreferenceScore::Neutral;
        for rule in self.rules.iter().filter(|r| r.matches(date, start, end)) {
            match rule.kind {
                PreferenceKind::Unpreferred => return PreferenceScore::Unpreferred,
                PreferenceKind::Preferred => score = PreferenceScore::Preferred,
            }
        }
        score
    }

    /// The successfully parsed rules.
    pub fn rules(&self) -> &[PreferenceRule] {
        &self.rules
    }

    /// The rule string as given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl From<String> for PreferenceRules {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<PreferenceRules> for String {
    fn from(rules: PreferenceRules) -> Self {
        rules.raw
    }
}

impl fmt::Display for PreferenceRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
