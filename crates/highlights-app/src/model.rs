// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::RecordKey;

/// One user-entered highlight row.
///
/// Field order matters: it is the order of the persisted JSON object and of
/// the CSV columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightRecord {
    pub user: String,
    pub status: String,
    pub group: String,
    pub details: String,
    pub date: String,
    pub category: String,
    pub activity: String,
}

impl HighlightRecord {
    pub fn field(&self, field: HighlightField) -> &str {
        match field {
            HighlightField::User => &self.user,
            HighlightField::Status => &self.status,
            HighlightField::Group => &self.group,
            HighlightField::Details => &self.details,
            HighlightField::Date => &self.date,
            HighlightField::Category => &self.category,
            HighlightField::Activity => &self.activity,
        }
    }

    pub fn field_mut(&mut self, field: HighlightField) -> &mut String {
        match field {
            HighlightField::User => &mut self.user,
            HighlightField::Status => &mut self.status,
            HighlightField::Group => &mut self.group,
            HighlightField::Details => &mut self.details,
            HighlightField::Date => &mut self.date,
            HighlightField::Category => &mut self.category,
            HighlightField::Activity => &mut self.activity,
        }
    }
}

impl AsRef<HighlightRecord> for HighlightRecord {
    fn as_ref(&self) -> &HighlightRecord {
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightField {
    User,
    Status,
    Group,
    Details,
    Date,
    Category,
    Activity,
}

impl HighlightField {
    pub const ALL: [Self; 7] = [
        Self::User,
        Self::Status,
        Self::Group,
        Self::Details,
        Self::Date,
        Self::Category,
        Self::Activity,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Status => "status",
            Self::Group => "group",
            Self::Details => "details",
            Self::Date => "date",
            Self::Category => "category",
            Self::Activity => "activity",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Status => "Status",
            Self::Group => "Group",
            Self::Details => "Details",
            Self::Date => "Date",
            Self::Category => "Category",
            Self::Activity => "Activity",
        }
    }

    /// The option bucket that feeds this field, if it is categorical.
    pub const fn option_kind(self) -> Option<OptionKind> {
        match self {
            Self::User => Some(OptionKind::User),
            Self::Status => Some(OptionKind::Status),
            Self::Group => Some(OptionKind::Group),
            Self::Category => Some(OptionKind::Category),
            Self::Activity => Some(OptionKind::Activity),
            Self::Details | Self::Date => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionKind {
    User,
    Status,
    Group,
    Category,
    Activity,
}

impl OptionKind {
    pub const ALL: [Self; 5] = [
        Self::User,
        Self::Status,
        Self::Group,
        Self::Category,
        Self::Activity,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Status => "status",
            Self::Group => "group",
            Self::Category => "category",
            Self::Activity => "activity",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "status" => Some(Self::Status),
            "group" => Some(Self::Group),
            "category" => Some(Self::Category),
            "activity" => Some(Self::Activity),
            _ => None,
        }
    }
}

/// Selectable values for the categorical form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionLists {
    pub user: Vec<String>,
    pub status: Vec<String>,
    pub group: Vec<String>,
    pub category: Vec<String>,
    pub activity: Vec<String>,
}

impl OptionLists {
    pub fn get(&self, kind: OptionKind) -> &[String] {
        match kind {
            OptionKind::User => &self.user,
            OptionKind::Status => &self.status,
            OptionKind::Group => &self.group,
            OptionKind::Category => &self.category,
            OptionKind::Activity => &self.activity,
        }
    }

    pub fn push(&mut self, kind: OptionKind, value: impl Into<String>) {
        let bucket = match kind {
            OptionKind::User => &mut self.user,
            OptionKind::Status => &mut self.status,
            OptionKind::Group => &mut self.group,
            OptionKind::Category => &mut self.category,
            OptionKind::Activity => &mut self.activity,
        };
        bucket.push(value.into());
    }

    pub fn is_empty(&self) -> bool {
        OptionKind::ALL.iter().all(|kind| self.get(*kind).is_empty())
    }

    pub fn total(&self) -> usize {
        OptionKind::ALL.iter().map(|kind| self.get(*kind).len()).sum()
    }
}

/// A record paired with the session-local key used for selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedRecord {
    pub key: RecordKey,
    pub record: HighlightRecord,
}

impl AsRef<HighlightRecord> for KeyedRecord {
    fn as_ref(&self) -> &HighlightRecord {
        &self.record
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Export,
    Import,
}

impl PromptKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Export => "export to",
            Self::Import => "import from",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Nav,
    Form,
    Filter,
    ConfirmDelete(RecordKey),
    Notice,
    Prompt(PromptKind),
}
