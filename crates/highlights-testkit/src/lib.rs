// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use highlights_app::{HighlightRecord, OptionKind, csv::CSV_HEADER};
use std::path::PathBuf;
use time::macros::date;
use time::{Date, Duration};

const USERS: [&str; 12] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Rowan",
];
const STATUSES: [&str; 4] = ["Open", "In Progress", "Blocked", "Done"];
const GROUPS: [&str; 5] = ["Platform", "Support", "Design", "Sales", "Operations"];
const CATEGORIES: [&str; 5] = ["Work", "Growth", "Research", "Support", "Community"];
const ACTIVITIES: [&str; 4] = ["Saved", "Reviewed", "Shared", "Archived"];

const DETAIL_VERBS: [&str; 8] = [
    "Shipped",
    "Reviewed",
    "Planned",
    "Documented",
    "Demoed",
    "Fixed",
    "Mentored on",
    "Wrapped up",
];
const DETAIL_OBJECTS: [&str; 8] = [
    "the onboarding flow",
    "the billing migration",
    "the quarterly roadmap",
    "the release checklist",
    "the search rewrite",
    "the on-call runbook",
    "the design system tokens",
    "the customer feedback survey",
];

const FIRST_DATE: Date = date!(2024 - 01 - 01);
const DATE_SPAN_DAYS: i64 = 365;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator of plausible highlight records.
#[derive(Debug, Clone)]
pub struct HighlightFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl HighlightFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn record(&mut self) -> HighlightRecord {
        let details = format!(
            "{} {}",
            self.pick(&DETAIL_VERBS),
            self.pick(&DETAIL_OBJECTS)
        );
        HighlightRecord {
            user: self.pick(&USERS).to_owned(),
            status: self.pick(&STATUSES).to_owned(),
            group: self.pick(&GROUPS).to_owned(),
            details,
            date: self.date(),
            category: self.pick(&CATEGORIES).to_owned(),
            activity: self.pick(&ACTIVITIES).to_owned(),
        }
    }

    pub fn records(&mut self, count: usize) -> Vec<HighlightRecord> {
        (0..count).map(|_| self.record()).collect()
    }

    /// A `YYYY-MM-DD` date within the reference year.
    pub fn date(&mut self) -> String {
        let offset = self.rng.int_n(DATE_SPAN_DAYS as usize) as i64;
        format_date(FIRST_DATE + Duration::days(offset))
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

pub fn option_values(kind: OptionKind) -> &'static [&'static str] {
    match kind {
        OptionKind::User => &USERS,
        OptionKind::Status => &STATUSES,
        OptionKind::Group => &GROUPS,
        OptionKind::Category => &CATEGORIES,
        OptionKind::Activity => &ACTIVITIES,
    }
}

/// An options file listing every value the faker draws from.
pub fn options_csv() -> String {
    let mut out = String::from("type,value\n");
    for kind in OptionKind::ALL {
        for value in option_values(kind) {
            out.push_str(kind.as_str());
            out.push(',');
            out.push_str(value);
            out.push('\n');
        }
    }
    out
}

/// Three records used to pin filter behavior: two "alice" users sharing a
/// date and one "Bob" on the following day.
pub fn filter_fixture() -> Vec<HighlightRecord> {
    [
        ("Alice", "2024-01-01"),
        ("Bob", "2024-01-02"),
        ("alice2", "2024-01-01"),
    ]
    .into_iter()
    .map(|(user, date)| HighlightRecord {
        user: user.to_owned(),
        status: "Open".to_owned(),
        group: "A".to_owned(),
        details: format!("{user} details"),
        date: date.to_owned(),
        category: "Work".to_owned(),
        activity: "Saved".to_owned(),
    })
    .collect()
}

pub fn sample_csv() -> String {
    format!(
        "{CSV_HEADER}\nDana,Open,Sales,Closed the spring deal,2024-03-04,Work,Saved\nEli,Done,Support,Cut response time,2024-03-05,Support,Reviewed\n"
    )
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("highlights.db");
    Ok((dir, db_path))
}

fn format_date(value: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        value.year(),
        u8::from(value.month()),
        value.day()
    )
}
