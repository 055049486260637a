// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use highlights_app::csv::CSV_FILE_NAME;
use highlights_app::{
    AppCommand, AppEvent, AppMode, AppState, DELETE_CONFIRM_PROMPT, HighlightField,
    HighlightFormInput, KeyedRecord, OptionLists, PromptKind, RecordChange, RecordKey, filter_view,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use std::io;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(4);
const POLL_INTERVAL: Duration = Duration::from_millis(120);

/// Everything the view needs from the record store and options source.
pub trait AppRuntime {
    fn load_records(&mut self) -> Result<Vec<KeyedRecord>>;
    fn option_lists(&mut self) -> OptionLists;
    /// Appends when `selection` is `None`, otherwise replaces that record.
    fn submit_form(
        &mut self,
        selection: Option<RecordKey>,
        form: &HighlightFormInput,
    ) -> Result<RecordChange>;
    fn delete_record(&mut self, key: RecordKey) -> Result<()>;
    fn export_csv(&mut self, path: &Path) -> Result<usize>;
    fn import_csv(&mut self, path: &Path) -> Result<usize>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum FilterField {
    #[default]
    Name,
    Date,
}

impl FilterField {
    const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Date => "date",
        }
    }

    const fn other(self) -> Self {
        match self {
            Self::Name => Self::Date,
            Self::Date => Self::Name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct TableUiState {
    selected_row: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct FormUiState {
    field_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    records: Vec<KeyedRecord>,
    options: OptionLists,
    table_state: TableUiState,
    form: FormUiState,
    filter_field: FilterField,
    prompt_input: String,
    help_visible: bool,
    status_token: u64,
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData {
        options: runtime.option_lists(),
        ..ViewData::default()
    };
    let (internal_tx, internal_rx) = mpsc::channel();

    if let Err(error) = refresh_view_data(state, runtime, &mut view_data) {
        emit_status(
            state,
            &mut view_data,
            &internal_tx,
            format!("load failed: {error:#}"),
        );
    }

    let mut result = Ok(());
    loop {
        process_internal_events(state, &view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(POLL_INTERVAL).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if !has_event {
            continue;
        }
        match event::read().context("read event") {
            Ok(Event::Key(key)) => {
                if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                    break;
                }
            }
            Ok(_) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_DELAY);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    dispatch(
        state,
        view_data,
        internal_tx,
        AppCommand::SetStatus(message.into()),
    );
}

fn dispatch(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = state.dispatch(command);
    for event in &events {
        match event {
            AppEvent::FilterChanged => clamp_table_cursor(state, view_data),
            AppEvent::FormReset | AppEvent::SelectionChanged(Some(_)) => {
                view_data.form = FormUiState::default();
            }
            AppEvent::StatusUpdated(_) => {
                view_data.status_token = view_data.status_token.saturating_add(1);
                schedule_status_clear(internal_tx, view_data.status_token);
            }
            _ => {}
        }
    }
}

fn refresh_view_data<R: AppRuntime>(
    state: &AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
) -> Result<()> {
    view_data.records = runtime.load_records()?;
    clamp_table_cursor(state, view_data);
    Ok(())
}

fn visible_records<'a>(state: &AppState, view_data: &'a ViewData) -> Vec<&'a KeyedRecord> {
    filter_view(&view_data.records, &state.filter)
}

fn clamp_table_cursor(state: &AppState, view_data: &mut ViewData) {
    let visible = visible_records(state, view_data).len();
    view_data.table_state.selected_row = view_data
        .table_state
        .selected_row
        .min(visible.saturating_sub(1));
}

fn move_table_cursor(state: &AppState, view_data: &mut ViewData, delta: isize) {
    let visible = visible_records(state, view_data).len();
    if visible == 0 {
        view_data.table_state.selected_row = 0;
        return;
    }
    let current = view_data.table_state.selected_row as isize;
    let next = (current + delta).clamp(0, visible as isize - 1);
    view_data.table_state.selected_row = next as usize;
}

fn is_text_input(key: KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(ch)
            if key.modifiers == KeyModifiers::NONE || key.modifiers == KeyModifiers::SHIFT =>
        {
            Some(ch)
        }
        _ => None,
    }
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
            emit_status(state, view_data, internal_tx, "help hidden");
        }
        return false;
    }

    match state.mode {
        AppMode::Nav => handle_nav_key(state, view_data, internal_tx, key),
        AppMode::Form => handle_form_key(state, runtime, view_data, internal_tx, key),
        AppMode::Filter => handle_filter_key(state, view_data, internal_tx, key),
        AppMode::ConfirmDelete(target) => {
            handle_confirm_delete_key(state, runtime, view_data, internal_tx, target, key);
        }
        AppMode::Notice => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                dispatch(state, view_data, internal_tx, AppCommand::DismissNotice);
            }
        }
        AppMode::Prompt(kind) => {
            handle_prompt_key(state, runtime, view_data, internal_tx, kind, key);
        }
    }

    false
}

fn handle_nav_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => move_table_cursor(state, view_data, 1),
        KeyCode::Char('k') | KeyCode::Up => move_table_cursor(state, view_data, -1),
        KeyCode::Char('g') | KeyCode::Home => view_data.table_state.selected_row = 0,
        KeyCode::Char('G') | KeyCode::End => move_table_cursor(state, view_data, isize::MAX / 2),
        KeyCode::Enter => {
            let entry = visible_records(state, view_data)
                .get(view_data.table_state.selected_row)
                .map(|entry| (*entry).clone());
            match entry {
                Some(entry) => {
                    dispatch(state, view_data, internal_tx, AppCommand::SelectRecord(entry));
                }
                None => emit_status(state, view_data, internal_tx, "no entry under cursor"),
            }
        }
        KeyCode::Char('a') => dispatch(state, view_data, internal_tx, AppCommand::NewEntry),
        KeyCode::Char('e') => dispatch(state, view_data, internal_tx, AppCommand::EditForm),
        KeyCode::Char('d') => dispatch(state, view_data, internal_tx, AppCommand::RequestDelete),
        KeyCode::Char('/') => dispatch(state, view_data, internal_tx, AppCommand::OpenFilter),
        KeyCode::Char('1') => {
            dispatch(state, view_data, internal_tx, AppCommand::ToggleNameFilter);
        }
        KeyCode::Char('2') => {
            dispatch(state, view_data, internal_tx, AppCommand::ToggleDateFilter);
        }
        KeyCode::Char('c') => dispatch(state, view_data, internal_tx, AppCommand::ClearFilter),
        KeyCode::Char('x') => {
            view_data.prompt_input = CSV_FILE_NAME.to_owned();
            dispatch(
                state,
                view_data,
                internal_tx,
                AppCommand::OpenPrompt(PromptKind::Export),
            );
        }
        KeyCode::Char('i') => {
            view_data.prompt_input.clear();
            dispatch(
                state,
                view_data,
                internal_tx,
                AppCommand::OpenPrompt(PromptKind::Import),
            );
        }
        KeyCode::Char('?') => {
            view_data.help_visible = true;
            emit_status(state, view_data, internal_tx, "help shown");
        }
        _ => {}
    }
}

fn current_form_field(view_data: &ViewData) -> HighlightField {
    let index = view_data
        .form
        .field_index
        .min(HighlightField::ALL.len() - 1);
    HighlightField::ALL[index]
}

fn move_form_field_cursor(view_data: &mut ViewData, delta: isize) -> String {
    let len = HighlightField::ALL.len() as isize;
    let next = (view_data.form.field_index as isize + delta).rem_euclid(len) as usize;
    view_data.form.field_index = next;
    format_form_field_status(view_data)
}

fn format_form_field_status(view_data: &ViewData) -> String {
    let field = current_form_field(view_data);
    format!(
        "field {}/{}: {}",
        view_data.form.field_index + 1,
        HighlightField::ALL.len(),
        field.label()
    )
}

/// Steps the current field through its option list. A value not in the
/// list starts from the first option going forward or the last going back.
fn cycle_form_option(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    delta: isize,
) -> String {
    let field = current_form_field(view_data);
    let Some(kind) = field.option_kind() else {
        return format!("no choices for {}", field.label());
    };
    let choices = view_data.options.get(kind);
    if choices.is_empty() {
        return format!("no {} options loaded", kind.as_str());
    }

    let len = choices.len() as isize;
    let next = match choices
        .iter()
        .position(|choice| choice == state.form.field(field))
    {
        Some(index) => (index as isize + delta).rem_euclid(len) as usize,
        None if delta >= 0 => 0,
        None => choices.len() - 1,
    };
    let value = choices[next].clone();
    let status = format!("{} {value} ({}/{})", kind.as_str(), next + 1, choices.len());
    dispatch(
        state,
        view_data,
        internal_tx,
        AppCommand::SetFormField(field, value),
    );
    status
}

fn edit_form_field(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    edit: impl FnOnce(&mut String),
) {
    let field = current_form_field(view_data);
    let mut value = state.form.field(field).to_owned();
    edit(&mut value);
    dispatch(
        state,
        view_data,
        internal_tx,
        AppCommand::SetFormField(field, value),
    );
}

fn handle_form_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            dispatch(state, view_data, internal_tx, AppCommand::ExitToNav);
        }
        (KeyCode::Enter, _) | (KeyCode::Char('s'), KeyModifiers::CONTROL) => {
            submit_form(state, runtime, view_data, internal_tx);
        }
        (KeyCode::Tab, _) | (KeyCode::Down, _) => {
            let status = move_form_field_cursor(view_data, 1);
            emit_status(state, view_data, internal_tx, status);
        }
        (KeyCode::BackTab, _) | (KeyCode::Up, _) => {
            let status = move_form_field_cursor(view_data, -1);
            emit_status(state, view_data, internal_tx, status);
        }
        (KeyCode::Right, _) => {
            let status = cycle_form_option(state, view_data, internal_tx, 1);
            emit_status(state, view_data, internal_tx, status);
        }
        (KeyCode::Left, _) => {
            let status = cycle_form_option(state, view_data, internal_tx, -1);
            emit_status(state, view_data, internal_tx, status);
        }
        (KeyCode::Backspace, _) => {
            edit_form_field(state, view_data, internal_tx, |value| {
                value.pop();
            });
        }
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
            edit_form_field(state, view_data, internal_tx, String::clear);
        }
        _ => {
            if let Some(ch) = is_text_input(key) {
                edit_form_field(state, view_data, internal_tx, |value| value.push(ch));
            }
        }
    }
}

fn submit_form<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let attempted = if state.selection.is_some() {
        RecordChange::Replaced
    } else {
        RecordChange::Appended
    };
    match runtime.submit_form(state.selection, &state.form) {
        Ok(change) => apply_record_change(state, runtime, view_data, internal_tx, change),
        Err(error) => {
            report_write_failure(state, runtime, view_data, internal_tx, "save", attempted, &error);
        }
    }
}

/// Reports a failed runtime write.
///
/// The runtime keeps an in-memory change when only persisting it failed, so
/// the view is reloaded first. A kept change is applied like a successful
/// one and the status says it was not saved; otherwise the form and mode are
/// left as they are.
fn report_write_failure<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    action: &str,
    attempted: RecordChange,
    error: &anyhow::Error,
) {
    let detail = format!("{error:#}");
    tracing::warn!(error = detail.as_str(), action, "write failed");

    let before = view_data.records.clone();
    if let Err(reload) = refresh_view_data(state, runtime, view_data) {
        let reload = format!("{reload:#}");
        tracing::warn!(error = reload.as_str(), "reload after failed write failed");
    }
    if view_data.records == before {
        emit_status(
            state,
            view_data,
            internal_tx,
            format!("{action} failed: {detail}"),
        );
        return;
    }

    let change = match attempted {
        RecordChange::Imported(_) => RecordChange::Imported(view_data.records.len()),
        other => other,
    };
    dispatch(
        state,
        view_data,
        internal_tx,
        AppCommand::RecordsChanged(change),
    );
    emit_status(
        state,
        view_data,
        internal_tx,
        format!("{} but not saved: {detail}", change.status_message()),
    );
}

fn apply_record_change<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    change: RecordChange,
) {
    tracing::debug!(?change, "record list changed");
    dispatch(
        state,
        view_data,
        internal_tx,
        AppCommand::RecordsChanged(change),
    );
    if let Err(error) = refresh_view_data(state, runtime, view_data) {
        emit_status(
            state,
            view_data,
            internal_tx,
            format!("reload failed: {error:#}"),
        );
    }
}

fn handle_filter_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) | (KeyCode::Enter, _) => {
            dispatch(state, view_data, internal_tx, AppCommand::ExitToNav);
        }
        (KeyCode::Tab, _) | (KeyCode::BackTab, _) => {
            view_data.filter_field = view_data.filter_field.other();
            let status = format!("{} filter", view_data.filter_field.label());
            emit_status(state, view_data, internal_tx, status);
        }
        (KeyCode::Char('t'), KeyModifiers::CONTROL) => {
            let command = match view_data.filter_field {
                FilterField::Name => AppCommand::ToggleNameFilter,
                FilterField::Date => AppCommand::ToggleDateFilter,
            };
            dispatch(state, view_data, internal_tx, command);
        }
        (KeyCode::Backspace, _) => {
            edit_filter_value(state, view_data, internal_tx, |value| {
                value.pop();
            });
        }
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
            edit_filter_value(state, view_data, internal_tx, String::clear);
        }
        _ => {
            if let Some(ch) = is_text_input(key) {
                edit_filter_value(state, view_data, internal_tx, |value| value.push(ch));
            }
        }
    }
}

fn edit_filter_value(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    edit: impl FnOnce(&mut String),
) {
    let command = match view_data.filter_field {
        FilterField::Name => {
            let mut value = state.filter.name.clone();
            edit(&mut value);
            AppCommand::SetNameFilter(value)
        }
        FilterField::Date => {
            let mut value = state.filter.date.clone();
            edit(&mut value);
            AppCommand::SetDateFilter(value)
        }
    };
    dispatch(state, view_data, internal_tx, command);
}

fn handle_confirm_delete_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    target: RecordKey,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => match runtime.delete_record(target) {
            Ok(()) => {
                apply_record_change(state, runtime, view_data, internal_tx, RecordChange::Removed);
            }
            Err(error) => {
                dispatch(state, view_data, internal_tx, AppCommand::ExitToNav);
                report_write_failure(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    "delete",
                    RecordChange::Removed,
                    &error,
                );
            }
        },
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            dispatch(state, view_data, internal_tx, AppCommand::CancelDelete);
        }
        _ => {}
    }
}

fn handle_prompt_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    kind: PromptKind,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            view_data.prompt_input.clear();
            dispatch(state, view_data, internal_tx, AppCommand::ExitToNav);
            let status = match kind {
                PromptKind::Export => "export cancelled",
                PromptKind::Import => "import cancelled",
            };
            emit_status(state, view_data, internal_tx, status);
        }
        (KeyCode::Enter, _) => run_prompt(state, runtime, view_data, internal_tx, kind),
        (KeyCode::Backspace, _) => {
            view_data.prompt_input.pop();
        }
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => view_data.prompt_input.clear(),
        _ => {
            if let Some(ch) = is_text_input(key) {
                view_data.prompt_input.push(ch);
            }
        }
    }
}

fn run_prompt<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    kind: PromptKind,
) {
    let input = view_data.prompt_input.trim().to_owned();
    if input.is_empty() {
        emit_status(state, view_data, internal_tx, "enter a file path");
        return;
    }
    let path = Path::new(&input);
    view_data.prompt_input.clear();

    match kind {
        PromptKind::Export => {
            let status = match runtime.export_csv(path) {
                Ok(count) => format!("exported {count} entries to {input}"),
                Err(error) => format!("export failed: {error:#}"),
            };
            dispatch(state, view_data, internal_tx, AppCommand::ExitToNav);
            emit_status(state, view_data, internal_tx, status);
        }
        PromptKind::Import => match runtime.import_csv(path) {
            Ok(count) => {
                apply_record_change(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    RecordChange::Imported(count),
                );
            }
            Err(error) => {
                dispatch(state, view_data, internal_tx, AppCommand::ExitToNav);
                report_write_failure(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    "import",
                    RecordChange::Imported(0),
                    &error,
                );
            }
        },
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let filter_bar = Paragraph::new(render_filter_bar_text(state, view_data))
        .block(Block::default().title("highlights").borders(Borders::ALL));
    frame.render_widget(filter_bar, layout[0]);

    render_table(frame, layout[1], state, view_data);

    let status_widget = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    match state.mode {
        AppMode::Form => {
            let area = centered_rect(70, 60, frame.area());
            frame.render_widget(Clear, area);
            let title = if state.selection.is_some() {
                "edit entry"
            } else {
                "new entry"
            };
            let form = Paragraph::new(render_form_text(state, view_data))
                .block(Block::default().title(title).borders(Borders::ALL));
            frame.render_widget(form, area);
        }
        AppMode::ConfirmDelete(_) => {
            let area = centered_rect(60, 25, frame.area());
            frame.render_widget(Clear, area);
            let confirm = Paragraph::new(format!("{DELETE_CONFIRM_PROMPT}\n\ny delete | n cancel"))
                .block(
                    Block::default()
                        .title("delete")
                        .borders(Borders::ALL)
                        .style(Style::default().fg(Color::Red)),
                );
            frame.render_widget(confirm, area);
        }
        AppMode::Notice => {
            let area = centered_rect(50, 20, frame.area());
            frame.render_widget(Clear, area);
            let text = state.notice.clone().unwrap_or_default();
            let notice = Paragraph::new(format!("{text}\n\nenter dismiss"))
                .block(Block::default().title("notice").borders(Borders::ALL));
            frame.render_widget(notice, area);
        }
        AppMode::Prompt(kind) => {
            let area = centered_rect(60, 20, frame.area());
            frame.render_widget(Clear, area);
            let prompt = Paragraph::new(render_prompt_text(kind, view_data))
                .block(Block::default().title("csv").borders(Borders::ALL));
            frame.render_widget(prompt, area);
        }
        AppMode::Nav | AppMode::Filter => {}
    }

    if view_data.help_visible {
        let area = centered_rect(80, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let visible = visible_records(state, view_data);
    let widths = vec![Constraint::Min(8); HighlightField::ALL.len()];

    let header = Row::new(HighlightField::ALL.iter().map(|field| {
        Cell::from(field.label()).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let rows = visible.iter().enumerate().map(|(row_index, entry)| {
        let mut style = Style::default();
        if state.selection == Some(entry.key) {
            style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
        }
        if row_index == view_data.table_state.selected_row {
            style = style.bg(Color::DarkGray);
        }
        let cells = HighlightField::ALL
            .iter()
            .map(|field| Cell::from(entry.record.field(*field).to_owned()));
        Row::new(cells).style(style)
    });

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(table_title(visible.len(), view_data.records.len()))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

fn table_title(shown: usize, total: usize) -> String {
    if shown == total {
        format!("entries ({total})")
    } else {
        format!("entries ({shown} of {total})")
    }
}

fn render_filter_bar_text(state: &AppState, view_data: &ViewData) -> String {
    let check = |enabled: bool| if enabled { "[x]" } else { "[ ]" };
    let marker = |field: FilterField| {
        if state.mode == AppMode::Filter && view_data.filter_field == field {
            ">"
        } else {
            " "
        }
    };
    let bar = format!(
        "{}name {} {:<20} {}date {} {}",
        marker(FilterField::Name),
        check(state.filter.name_enabled),
        state.filter.name,
        marker(FilterField::Date),
        check(state.filter.date_enabled),
        state.filter.date,
    );
    if state.filter.has_values() || state.mode == AppMode::Filter {
        bar
    } else {
        format!("{bar}   (press / to filter)")
    }
}

fn render_form_text(state: &AppState, view_data: &ViewData) -> String {
    let current = current_form_field(view_data);
    HighlightField::ALL
        .iter()
        .map(|field| {
            let marker = if *field == current { ">" } else { " " };
            let hint = match field.option_kind() {
                Some(kind) if *field == current => {
                    let count = view_data.options.get(kind).len();
                    if count == 0 {
                        "  (no options)".to_owned()
                    } else {
                        format!("  (left/right: {count} options)")
                    }
                }
                _ => String::new(),
            };
            format!(
                "{marker} {:<9} {}{hint}",
                field.label(),
                state.form.field(*field)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_prompt_text(kind: PromptKind, view_data: &ViewData) -> String {
    format!(
        "{} file:\n> {}_\n\nenter confirm | esc cancel",
        kind.label(),
        view_data.prompt_input
    )
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit | ? help\n\
nav: j/k up/down g/G | enter select entry | a new entry | e reopen form | d delete selected\n\
nav: / filter | 1 toggle name filter | 2 toggle date filter | c clear filter\n\
nav: x export csv | i import csv\n\
form: tab/shift+tab field | left/right choose option | type to edit | ctrl+u clear field\n\
form: enter or ctrl+s save | esc close\n\
filter: tab name/date | type to edit | ctrl+t toggle | enter or esc close\n\
delete: y confirm | n cancel"
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if view_data.help_visible {
        return String::new();
    }

    let (mode, hints) = match state.mode {
        AppMode::Nav => (
            "NAV",
            "enter select | a new | d del | / filter | x export | i import | ? help | ctrl+q",
        ),
        AppMode::Form => (
            "FORM",
            "tab field | left/right option | enter save | esc close",
        ),
        AppMode::Filter => ("FILTER", "tab field | ctrl+t toggle | enter done"),
        AppMode::ConfirmDelete(_) => ("DELETE", "y confirm | n cancel"),
        AppMode::Notice => ("NOTICE", "enter dismiss"),
        AppMode::Prompt(_) => ("CSV", "enter confirm | esc cancel"),
    };
    match &state.status_line {
        Some(status) => format!("{mode} | {status} | {hints}"),
        None => format!("{mode} | {hints}"),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
