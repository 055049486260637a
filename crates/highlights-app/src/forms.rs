// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{HighlightField, HighlightRecord};

/// Activity stored when the form leaves the activity field empty.
pub const DEFAULT_ACTIVITY: &str = "Saved";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightFormInput {
    pub user: String,
    pub status: String,
    pub group: String,
    pub details: String,
    pub date: String,
    pub category: String,
    pub activity: String,
}

impl HighlightFormInput {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn from_record(record: &HighlightRecord) -> Self {
        Self {
            user: record.user.clone(),
            status: record.status.clone(),
            group: record.group.clone(),
            details: record.details.clone(),
            date: record.date.clone(),
            category: record.category.clone(),
            activity: record.activity.clone(),
        }
    }

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

    pub fn to_record(&self) -> HighlightRecord {
        let activity = if self.activity.is_empty() {
            DEFAULT_ACTIVITY.to_owned()
        } else {
            self.activity.clone()
        };

        HighlightRecord {
            user: self.user.clone(),
            status: self.status.clone(),
            group: self.group.clone(),
            details: self.details.clone(),
            date: self.date.clone(),
            category: self.category.clone(),
            activity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_ACTIVITY, HighlightFormInput};
    use crate::{HighlightField, HighlightRecord};

    #[test]
    fn empty_activity_is_stored_as_saved() {
        let form = HighlightFormInput {
            user: "Alice".to_owned(),
            ..HighlightFormInput::blank()
        };
        let record = form.to_record();
        assert_eq!(record.activity, DEFAULT_ACTIVITY);
        assert_eq!(record.user, "Alice");
    }

    #[test]
    fn explicit_activity_is_kept() {
        let form = HighlightFormInput {
            activity: "Reviewed".to_owned(),
            ..HighlightFormInput::blank()
        };
        assert_eq!(form.to_record().activity, "Reviewed");
    }

    #[test]
    fn from_record_reflects_every_field() {
        let record = HighlightRecord {
            user: "Bob".to_owned(),
            status: "Done".to_owned(),
            group: "B".to_owned(),
            details: "notes".to_owned(),
            date: "2024-01-02".to_owned(),
            category: "Ops".to_owned(),
            activity: "Saved".to_owned(),
        };
        let form = HighlightFormInput::from_record(&record);
        for field in HighlightField::ALL {
            assert_eq!(form.field(field), record.field(field));
        }
        assert_eq!(form.to_record(), record);
    }

    #[test]
    fn field_mut_edits_the_named_field() {
        let mut form = HighlightFormInput::blank();
        form.field_mut(HighlightField::Details).push_str("typed");
        assert_eq!(form.details, "typed");
        assert!(form.user.is_empty());
    }
}
