// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::HighlightRecord;

/// Name and date filter values plus their enable toggles.
///
/// A non-empty value whose toggle is off hides every record; an empty value
/// imposes no condition regardless of its toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub name: String,
    pub date: String,
    pub name_enabled: bool,
    pub date_enabled: bool,
}

impl FilterCriteria {
    pub fn matches(&self, record: &HighlightRecord) -> bool {
        if !self.name.is_empty() {
            if !self.name_enabled {
                return false;
            }
            let needle = self.name.to_lowercase();
            if !record.user.to_lowercase().contains(&needle) {
                return false;
            }
        }

        if !self.date.is_empty() {
            if !self.date_enabled {
                return false;
            }
            if record.date != self.date {
                return false;
            }
        }

        true
    }

    pub fn has_values(&self) -> bool {
        !self.name.is_empty() || !self.date.is_empty()
    }
}

/// Returns the items that satisfy `criteria`, in their original order.
pub fn filter_view<'a, T>(items: &'a [T], criteria: &FilterCriteria) -> Vec<&'a T>
where
    T: AsRef<HighlightRecord>,
{
    items
        .iter()
        .filter(|item| criteria.matches(item.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{FilterCriteria, filter_view};
    use crate::HighlightRecord;

    fn fixture() -> Vec<HighlightRecord> {
        [
            ("Alice", "2024-01-01"),
            ("Bob", "2024-01-02"),
            ("alice2", "2024-01-01"),
        ]
        .into_iter()
        .map(|(user, date)| HighlightRecord {
            user: user.to_owned(),
            date: date.to_owned(),
            ..HighlightRecord::default()
        })
        .collect()
    }

    fn users(records: &[&HighlightRecord]) -> Vec<String> {
        records.iter().map(|record| record.user.clone()).collect()
    }

    fn criteria(name_enabled: bool, date_enabled: bool) -> FilterCriteria {
        FilterCriteria {
            name: "alice".to_owned(),
            date: "2024-01-01".to_owned(),
            name_enabled,
            date_enabled,
        }
    }

    #[test]
    fn both_toggles_on_keeps_matching_name_and_date() {
        let records = fixture();
        let view = filter_view(&records, &criteria(true, true));
        assert_eq!(users(&view), ["Alice", "alice2"]);
    }

    #[test]
    fn supplied_value_with_toggle_off_hides_everything() {
        let records = fixture();
        assert!(filter_view(&records, &criteria(true, false)).is_empty());
        assert!(filter_view(&records, &criteria(false, true)).is_empty());
        assert!(filter_view(&records, &criteria(false, false)).is_empty());
    }

    #[test]
    fn empty_values_pass_everything_for_any_toggles() {
        let records = fixture();
        for (name_enabled, date_enabled) in [(false, false), (true, false), (false, true), (true, true)]
        {
            let criteria = FilterCriteria {
                name_enabled,
                date_enabled,
                ..FilterCriteria::default()
            };
            assert_eq!(filter_view(&records, &criteria).len(), 3);
        }
    }

    #[test]
    fn name_match_is_case_insensitive_substring() {
        let records = fixture();
        let criteria = FilterCriteria {
            name: "LIC".to_owned(),
            name_enabled: true,
            ..FilterCriteria::default()
        };
        assert_eq!(users(&filter_view(&records, &criteria)), ["Alice", "alice2"]);
    }

    #[test]
    fn date_match_is_exact_string_equality() {
        let records = fixture();
        let criteria = FilterCriteria {
            date: "2024-01-0".to_owned(),
            date_enabled: true,
            ..FilterCriteria::default()
        };
        assert!(filter_view(&records, &criteria).is_empty());

        let criteria = FilterCriteria {
            date: "2024-01-02".to_owned(),
            date_enabled: true,
            ..FilterCriteria::default()
        };
        assert_eq!(users(&filter_view(&records, &criteria)), ["Bob"]);
    }

    #[test]
    fn only_name_supplied_ignores_date_toggle() {
        let records = fixture();
        let criteria = FilterCriteria {
            name: "bob".to_owned(),
            name_enabled: true,
            date_enabled: false,
            ..FilterCriteria::default()
        };
        assert_eq!(users(&filter_view(&records, &criteria)), ["Bob"]);
    }

    #[test]
    fn filtering_does_not_touch_the_input() {
        let records = fixture();
        let before = records.clone();
        let _ = filter_view(&records, &criteria(true, true));
        assert_eq!(records, before);
    }
}
