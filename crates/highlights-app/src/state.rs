// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    AppMode, FilterCriteria, HighlightField, HighlightFormInput, KeyedRecord, PromptKind, RecordKey,
};

pub const NO_SELECTION_NOTICE: &str = "No entry selected to delete.";
pub const DELETE_CONFIRM_PROMPT: &str =
    "Are you sure you want to delete this entry? This action cannot be undone.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub selection: Option<RecordKey>,
    pub form: HighlightFormInput,
    pub filter: FilterCriteria,
    pub status_line: Option<String>,
    pub notice: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Nav,
            selection: None,
            form: HighlightFormInput::blank(),
            filter: FilterCriteria::default(),
            status_line: None,
            notice: None,
        }
    }
}

/// A completed mutation of the record list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordChange {
    Appended,
    Replaced,
    Removed,
    Imported(usize),
}

impl RecordChange {
    pub fn status_message(self) -> String {
        match self {
            Self::Appended => "entry added".to_owned(),
            Self::Replaced => "entry updated".to_owned(),
            Self::Removed => "entry deleted".to_owned(),
            Self::Imported(1) => "imported 1 entry".to_owned(),
            Self::Imported(count) => format!("imported {count} entries"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NewEntry,
    SelectRecord(KeyedRecord),
    EditForm,
    SetFormField(HighlightField, String),
    ExitToNav,
    OpenFilter,
    SetNameFilter(String),
    SetDateFilter(String),
    ToggleNameFilter,
    ToggleDateFilter,
    ClearFilter,
    RequestDelete,
    CancelDelete,
    DismissNotice,
    OpenPrompt(PromptKind),
    RecordsChanged(RecordChange),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    SelectionChanged(Option<RecordKey>),
    FormReset,
    FormFieldChanged(HighlightField),
    FilterChanged,
    NoticeShown(String),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NewEntry => {
                let mut events = self.reset_form();
                self.mode = AppMode::Form;
                events.push(AppEvent::ModeChanged(self.mode));
                events
            }
            AppCommand::SelectRecord(entry) => {
                self.selection = Some(entry.key);
                self.form = HighlightFormInput::from_record(&entry.record);
                self.mode = AppMode::Form;
                vec![
                    AppEvent::SelectionChanged(self.selection),
                    AppEvent::ModeChanged(self.mode),
                ]
            }
            AppCommand::EditForm => {
                self.mode = AppMode::Form;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::SetFormField(field, value) => {
                *self.form.field_mut(field) = value;
                vec![AppEvent::FormFieldChanged(field)]
            }
            AppCommand::ExitToNav => {
                self.mode = AppMode::Nav;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::OpenFilter => {
                self.mode = AppMode::Filter;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::SetNameFilter(value) => {
                self.filter.name = value;
                vec![AppEvent::FilterChanged]
            }
            AppCommand::SetDateFilter(value) => {
                self.filter.date = value;
                vec![AppEvent::FilterChanged]
            }
            AppCommand::ToggleNameFilter => {
                self.filter.name_enabled = !self.filter.name_enabled;
                let label = toggle_label("name", self.filter.name_enabled);
                vec![AppEvent::FilterChanged, self.set_status(&label)]
            }
            AppCommand::ToggleDateFilter => {
                self.filter.date_enabled = !self.filter.date_enabled;
                let label = toggle_label("date", self.filter.date_enabled);
                vec![AppEvent::FilterChanged, self.set_status(&label)]
            }
            AppCommand::ClearFilter => {
                self.filter = FilterCriteria::default();
                vec![AppEvent::FilterChanged, self.set_status("filter cleared")]
            }
            AppCommand::RequestDelete => match self.selection {
                Some(key) => {
                    self.mode = AppMode::ConfirmDelete(key);
                    vec![AppEvent::ModeChanged(self.mode)]
                }
                None => self.show_notice(NO_SELECTION_NOTICE),
            },
            AppCommand::CancelDelete => {
                self.mode = AppMode::Nav;
                vec![
                    AppEvent::ModeChanged(self.mode),
                    self.set_status("delete cancelled"),
                ]
            }
            AppCommand::DismissNotice => {
                self.notice = None;
                self.mode = AppMode::Nav;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::OpenPrompt(kind) => {
                self.mode = AppMode::Prompt(kind);
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::RecordsChanged(change) => {
                let mut events = self.reset_form();
                self.mode = AppMode::Nav;
                events.push(AppEvent::ModeChanged(self.mode));
                events.push(self.set_status(&change.status_message()));
                events
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn reset_form(&mut self) -> Vec<AppEvent> {
        self.form = HighlightFormInput::blank();
        let mut events = vec![AppEvent::FormReset];
        if self.selection.take().is_some() {
            events.push(AppEvent::SelectionChanged(None));
        }
        events
    }

    fn show_notice(&mut self, message: &str) -> Vec<AppEvent> {
        self.notice = Some(message.to_owned());
        self.mode = AppMode::Notice;
        vec![
            AppEvent::NoticeShown(message.to_owned()),
            AppEvent::ModeChanged(self.mode),
        ]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}

fn toggle_label(name: &str, enabled: bool) -> String {
    let state = if enabled { "on" } else { "off" };
    format!("{name} filter {state}")
}
