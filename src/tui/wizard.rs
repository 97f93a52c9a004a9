use crate::store::ConfigurationStore;
use crate::wizard::gate::{
    redirect_for, step_is_enterable, RedirectNotice, WizardStep, REDIRECT_NOTICE_DELAY,
};
use crate::wizard::rules::{
    validate_basic, validate_rag_draft, ChunkingStrategy, DistanceMetric, EmbeddingSize,
    RagPattern,
};
use crate::wizard::screens::{
    basic_rows, draw_message_screen, draw_overview_screen, draw_step_screen, entry_table_rows,
    overview_sections, rag_rows, redirect_lines, security_rows, sidebar_lines, status_line,
    submitted_lines, workflow_rows, WORKFLOW_CATALOG,
};
use crate::wizard::state::{
    BasicUpdate, RagUpdate, SecurityUpdate, WizardState, WizardStore, WorkflowsUpdate,
};
use crate::wizard::submit::{SubmissionFlow, SubmitOutcome, SubmitPhase, TickOutcome};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph};
use ratatui::{Frame, Terminal};
use std::io::{self, IsTerminal};
use std::time::{Duration, Instant};

const RAG_FIELD_COUNT: usize = 7;
const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

const BASIC_HINT_TEXT: &str = "Up/Down move | Enter edit | Right next step | Esc quit";
const RAG_HINT_TEXT: &str =
    "Up/Down move | Enter edit/cycle | a add | d remove | Left/Right step | Esc back";
const WORKFLOWS_HINT_TEXT: &str = "Up/Down move | Enter/Space toggle | Left/Right step | Esc back";
const SECURITY_HINT_TEXT: &str = "Up/Down move | Enter/Space toggle | Left/Right step | Esc back";
const OVERVIEW_HINT_TEXT: &str = "Enter/s save configuration | Left back | Esc back";

pub(crate) fn cmd_wizard(store: &dyn ConfigurationStore) -> Result<String, String> {
    let mut app = WizardApp::new();
    let exit = if let Some(inputs) = load_scripted_wizard_keys()? {
        run_wizard_scripted(&mut app, store, inputs)?
    } else if is_interactive_wizard() {
        run_wizard_tui(&mut app, store)?
    } else {
        return Err(
            "wizard requires an interactive terminal; set RAGFORGE_WIZARD_SCRIPT_KEYS to run scripted"
                .to_string(),
        );
    };
    Ok(match exit {
        WizardExit::Cancel if app.saved_count == 0 => "wizard canceled".to_string(),
        _ => format!("wizard closed\nsaved_configurations={}", app.saved_count),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WizardExit {
    Done,
    Cancel,
}

fn is_interactive_wizard() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ScriptedInput {
    Key(KeyEvent),
    Tick,
}

fn load_scripted_wizard_keys() -> Result<Option<Vec<ScriptedInput>>, String> {
    let Ok(raw) = std::env::var("RAGFORGE_WIZARD_SCRIPT_KEYS") else {
        return Ok(None);
    };
    parse_script_tokens(&raw).map(Some)
}

fn parse_script_tokens(raw: &str) -> Result<Vec<ScriptedInput>, String> {
    let mut inputs = Vec::new();
    for token in raw.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(text) = trimmed.strip_prefix("text:") {
            for ch in text.chars() {
                inputs.push(ScriptedInput::Key(KeyEvent::new(
                    KeyCode::Char(ch),
                    KeyModifiers::NONE,
                )));
            }
            inputs.push(ScriptedInput::Key(KeyEvent::new(
                KeyCode::Enter,
                KeyModifiers::NONE,
            )));
            continue;
        }
        let normalized = trimmed.to_ascii_lowercase();
        let input = match normalized.as_str() {
            "up" => ScriptedInput::Key(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE)),
            "down" => ScriptedInput::Key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)),
            "left" => ScriptedInput::Key(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE)),
            "right" => ScriptedInput::Key(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE)),
            "enter" => ScriptedInput::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
            "esc" => ScriptedInput::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
            "tab" => ScriptedInput::Key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE)),
            "space" => ScriptedInput::Key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE)),
            "backspace" => {
                ScriptedInput::Key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE))
            }
            "ctrl-c" => {
                ScriptedInput::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            }
            "a" => ScriptedInput::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)),
            "d" => ScriptedInput::Key(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::NONE)),
            "s" => ScriptedInput::Key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE)),
            "t" => ScriptedInput::Key(KeyEvent::new(KeyCode::Char('t'), KeyModifiers::NONE)),
            "1" | "2" | "3" | "4" | "5" => {
                let digit = normalized
                    .chars()
                    .next()
                    .ok_or_else(|| "empty script token".to_string())?;
                ScriptedInput::Key(KeyEvent::new(KeyCode::Char(digit), KeyModifiers::NONE))
            }
            "tick" => ScriptedInput::Tick,
            other => {
                return Err(format!(
                    "invalid RAGFORGE_WIZARD_SCRIPT_KEYS token `{other}`; valid tokens: up,down,left,right,enter,esc,tab,space,backspace,ctrl-c,a,d,s,t,1-5,tick,text:<value>"
                ));
            }
        };
        inputs.push(input);
    }
    Ok(inputs)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WizardAction {
    MovePrev,
    MoveNext,
    PrevStep,
    NextStep,
    GoTo(WizardStep),
    Activate,
    Toggle,
    AddEntry,
    DeleteEntry,
    Submit,
    Back,
    Cancel,
}

fn wizard_action_from_key(step: WizardStep, key: KeyEvent) -> Option<WizardAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(WizardAction::Cancel);
    }
    match key.code {
        KeyCode::Up => Some(WizardAction::MovePrev),
        KeyCode::Down => Some(WizardAction::MoveNext),
        KeyCode::Left => Some(WizardAction::PrevStep),
        KeyCode::Right | KeyCode::Tab => Some(WizardAction::NextStep),
        KeyCode::Esc => Some(if step == WizardStep::Basic {
            WizardAction::Cancel
        } else {
            WizardAction::Back
        }),
        KeyCode::Enter | KeyCode::Char('\n') | KeyCode::Char('\r') => Some(WizardAction::Activate),
        KeyCode::Char(' ') | KeyCode::Char('t') => Some(WizardAction::Toggle),
        KeyCode::Char('a') => Some(WizardAction::AddEntry),
        KeyCode::Char('d') => Some(WizardAction::DeleteEntry),
        KeyCode::Char('s') => Some(WizardAction::Submit),
        KeyCode::Char('1') => Some(WizardAction::GoTo(WizardStep::Basic)),
        KeyCode::Char('2') => Some(WizardAction::GoTo(WizardStep::Rag)),
        KeyCode::Char('3') => Some(WizardAction::GoTo(WizardStep::Workflows)),
        KeyCode::Char('4') => Some(WizardAction::GoTo(WizardStep::Security)),
        KeyCode::Char('5') => Some(WizardAction::GoTo(WizardStep::Overview)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    AppName,
    BasicDescription,
    KnowledgeBaseName,
    RagDescription,
    VectorDb,
}

impl TextTarget {
    fn title(self) -> &'static str {
        match self {
            TextTarget::AppName => "App Name",
            TextTarget::BasicDescription | TextTarget::RagDescription => "Description",
            TextTarget::KnowledgeBaseName => "Knowledge Base Name",
            TextTarget::VectorDb => "Vector Database",
        }
    }

    fn current(self, state: &WizardState) -> &str {
        match self {
            TextTarget::AppName => &state.basic.app_name,
            TextTarget::BasicDescription => &state.basic.description,
            TextTarget::KnowledgeBaseName => &state.rag.knowledge_base_name,
            TextTarget::RagDescription => &state.rag.description,
            TextTarget::VectorDb => &state.rag.vector_db,
        }
    }

    fn apply(self, wizard: &mut WizardStore, value: String) {
        match self {
            TextTarget::AppName => wizard.update_basic(BasicUpdate {
                app_name: Some(value),
                ..Default::default()
            }),
            TextTarget::BasicDescription => wizard.update_basic(BasicUpdate {
                description: Some(value),
                ..Default::default()
            }),
            TextTarget::KnowledgeBaseName => wizard.update_rag(RagUpdate {
                knowledge_base_name: Some(value),
                ..Default::default()
            }),
            TextTarget::RagDescription => wizard.update_rag(RagUpdate {
                description: Some(value),
                ..Default::default()
            }),
            TextTarget::VectorDb => wizard.update_rag(RagUpdate {
                vector_db: Some(value),
                ..Default::default()
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum WizardEffect {
    None,
    EditText(TextTarget),
    Submit,
    Exit(WizardExit),
}

/// In-memory session for one wizard run. Pure transitions against this struct
/// are shared between the interactive loop and the scripted runner.
pub(crate) struct WizardApp {
    wizard: WizardStore,
    flow: SubmissionFlow,
    step: WizardStep,
    selected: usize,
    notice: Option<RedirectNotice>,
    status: String,
    saved_count: usize,
}

impl WizardApp {
    fn new() -> Self {
        Self {
            wizard: WizardStore::new(),
            flow: SubmissionFlow::new(),
            step: WizardStep::Basic,
            selected: 0,
            notice: None,
            status: WizardStep::Basic.title().to_string(),
            saved_count: 0,
        }
    }

    fn item_count(&self) -> usize {
        match self.step {
            WizardStep::Basic => 2,
            WizardStep::Rag => RAG_FIELD_COUNT + self.wizard.state().rag.configurations.len(),
            WizardStep::Workflows => WORKFLOW_CATALOG.len(),
            WizardStep::Security => 3,
            WizardStep::Overview => 0,
        }
    }

    fn reconcile_selection(&mut self) {
        let len = self.item_count();
        if len == 0 {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(len - 1);
        }
    }

    /// Jumps to the notice target after the redirect delay has elapsed.
    fn resolve_notice(&mut self) -> bool {
        let Some(notice) = self.notice.take() else {
            return false;
        };
        self.step = notice.target;
        self.selected = 0;
        self.status = notice.target.title().to_string();
        true
    }

    fn countdown_tick(&mut self) -> TickOutcome {
        let outcome = self.flow.tick(&mut self.wizard);
        if let TickOutcome::Restarted(step) = outcome {
            self.step = step;
            self.selected = 0;
            self.status = "Started a new configuration.".to_string();
        }
        outcome
    }

    fn try_enter(&mut self, target: WizardStep) {
        match redirect_for(&self.wizard, target) {
            None => {
                self.step = target;
                self.selected = 0;
                self.status = target.title().to_string();
            }
            Some(notice) => {
                self.status = notice.message.clone();
                self.notice = Some(notice);
            }
        }
    }

    fn toggle_selected(&mut self) {
        match self.step {
            WizardStep::Workflows => {
                let Some(workflow) = WORKFLOW_CATALOG.get(self.selected) else {
                    return;
                };
                let mut selected = self.wizard.state().workflows.selected_workflows.clone();
                if let Some(position) = selected.iter().position(|name| name == workflow) {
                    selected.remove(position);
                    self.status = format!("Removed {workflow}.");
                } else {
                    selected.push((*workflow).to_string());
                    self.status = format!("Added {workflow}.");
                }
                self.wizard.update_workflows(WorkflowsUpdate {
                    selected_workflows: Some(selected),
                });
            }
            WizardStep::Security => {
                let security = self.wizard.state().security.clone();
                let update = match self.selected {
                    0 => SecurityUpdate {
                        enable_encryption: Some(!security.enable_encryption),
                        ..Default::default()
                    },
                    1 => SecurityUpdate {
                        enable_audit: Some(!security.enable_audit),
                        ..Default::default()
                    },
                    _ => SecurityUpdate {
                        enable_rbac: Some(!security.enable_rbac),
                        ..Default::default()
                    },
                };
                self.wizard.update_security(update);
                self.status = "Security option toggled.".to_string();
            }
            WizardStep::Rag => {
                self.cycle_choice_field();
            }
            WizardStep::Basic | WizardStep::Overview => {}
        }
    }

    fn cycle_choice_field(&mut self) {
        let state = self.wizard.state();
        let (labels, current, field): (Vec<&'static str>, &str, &str) = match self.selected {
            2 => (RagPattern::labels(), state.rag.pattern.as_str(), "Pattern"),
            3 => (
                EmbeddingSize::labels(),
                state.rag.embeddings.as_str(),
                "Embeddings",
            ),
            4 => (
                DistanceMetric::labels(),
                state.rag.metrics.as_str(),
                "Metrics",
            ),
            5 => (
                ChunkingStrategy::labels(),
                state.rag.chunking.as_str(),
                "Chunking",
            ),
            _ => return,
        };
        let next = cycle_label(&labels, current).to_string();
        self.status = format!("{field} set to {next}.");
        let update = match self.selected {
            2 => RagUpdate {
                pattern: Some(next),
                ..Default::default()
            },
            3 => RagUpdate {
                embeddings: Some(next),
                ..Default::default()
            },
            4 => RagUpdate {
                metrics: Some(next),
                ..Default::default()
            },
            _ => RagUpdate {
                chunking: Some(next),
                ..Default::default()
            },
        };
        self.wizard.update_rag(update);
    }

    fn activate_selected(&mut self) -> WizardEffect {
        match self.step {
            WizardStep::Basic => match self.selected {
                0 => WizardEffect::EditText(TextTarget::AppName),
                _ => WizardEffect::EditText(TextTarget::BasicDescription),
            },
            WizardStep::Rag => match self.selected {
                0 => WizardEffect::EditText(TextTarget::KnowledgeBaseName),
                1 => WizardEffect::EditText(TextTarget::RagDescription),
                2..=5 => {
                    self.cycle_choice_field();
                    WizardEffect::None
                }
                6 => WizardEffect::EditText(TextTarget::VectorDb),
                _ => WizardEffect::None,
            },
            WizardStep::Workflows | WizardStep::Security => {
                self.toggle_selected();
                WizardEffect::None
            }
            WizardStep::Overview => WizardEffect::Submit,
        }
    }

    fn add_entry(&mut self) {
        if self.step != WizardStep::Rag {
            return;
        }
        match crate::wizard::entries::add_configuration_from_fields(&mut self.wizard) {
            crate::wizard::entries::AddOutcome::Added => {
                self.status = "Configuration added.".to_string();
            }
            crate::wizard::entries::AddOutcome::MissingFields => {
                let messages: Vec<String> = crate::wizard::rules::validate_rag_submission(
                    &self.wizard.state().rag,
                )
                .errors()
                .iter()
                .map(|error| error.message.clone())
                .collect();
                self.status = format!("Cannot add: {}", messages.join(" "));
            }
        }
    }

    fn delete_entry(&mut self) {
        if self.step != WizardStep::Rag {
            return;
        }
        if self.selected < RAG_FIELD_COUNT {
            self.status = "Select a saved configuration to remove.".to_string();
            return;
        }
        self.wizard
            .remove_configuration(self.selected - RAG_FIELD_COUNT);
        self.status = "Configuration removed.".to_string();
    }

    fn apply_action(&mut self, action: WizardAction) -> WizardEffect {
        // The saved screen only answers Enter (start new now) and quitting.
        if matches!(self.flow.phase(), SubmitPhase::Submitted { .. }) {
            return match action {
                WizardAction::Activate => {
                    if let Some(step) = self.flow.start_new_now(&mut self.wizard) {
                        self.step = step;
                        self.selected = 0;
                        self.status = "Started a new configuration.".to_string();
                    }
                    WizardEffect::None
                }
                WizardAction::Cancel | WizardAction::Back => {
                    WizardEffect::Exit(WizardExit::Done)
                }
                _ => WizardEffect::None,
            };
        }
        match action {
            WizardAction::MovePrev => {
                self.selected = self.selected.saturating_sub(1);
                WizardEffect::None
            }
            WizardAction::MoveNext => {
                let len = self.item_count();
                if len > 0 {
                    self.selected = (self.selected + 1).min(len - 1);
                }
                WizardEffect::None
            }
            WizardAction::PrevStep | WizardAction::Back => {
                if let Some(prev) = self.step.prev() {
                    self.step = prev;
                    self.selected = 0;
                    self.status = prev.title().to_string();
                }
                WizardEffect::None
            }
            WizardAction::NextStep => {
                if let Some(next) = self.step.next() {
                    self.try_enter(next);
                }
                WizardEffect::None
            }
            WizardAction::GoTo(target) => {
                self.try_enter(target);
                WizardEffect::None
            }
            WizardAction::Activate => self.activate_selected(),
            WizardAction::Toggle => {
                self.toggle_selected();
                WizardEffect::None
            }
            WizardAction::AddEntry => {
                self.add_entry();
                WizardEffect::None
            }
            WizardAction::DeleteEntry => {
                self.delete_entry();
                WizardEffect::None
            }
            WizardAction::Submit => {
                if self.step == WizardStep::Overview {
                    WizardEffect::Submit
                } else {
                    WizardEffect::None
                }
            }
            WizardAction::Cancel => WizardEffect::Exit(WizardExit::Cancel),
        }
    }

    fn do_submit(&mut self, store: &dyn ConfigurationStore) {
        match self.flow.submit(&self.wizard, store) {
            SubmitOutcome::Accepted => {
                self.saved_count += 1;
                self.status = "Configuration saved.".to_string();
            }
            SubmitOutcome::Rejected => {
                self.status = self
                    .flow
                    .error_banner()
                    .unwrap_or("Failed to save configuration")
                    .to_string();
            }
            SubmitOutcome::NotStarted => {}
        }
    }
}

fn cycle_label<'a>(labels: &[&'a str], current: &str) -> &'a str {
    let Some(position) = labels.iter().position(|label| *label == current) else {
        return labels[0];
    };
    labels[(position + 1) % labels.len()]
}

fn run_wizard_tui(
    app: &mut WizardApp,
    store: &dyn ConfigurationStore,
) -> Result<WizardExit, String> {
    let mut stdout = io::stdout();
    enable_raw_mode().map_err(|e| format!("failed to enable raw mode: {e}"))?;
    execute!(stdout, EnterAlternateScreen, Hide)
        .map_err(|e| format!("failed to enter wizard screen: {e}"))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("failed to create wizard terminal: {e}"))?;
    let result = run_wizard_tui_loop(app, store, &mut terminal);
    disable_raw_mode().map_err(|e| format!("failed to disable raw mode: {e}"))?;
    execute!(terminal.backend_mut(), Show, LeaveAlternateScreen)
        .map_err(|e| format!("failed to leave wizard screen: {e}"))?;
    result
}

fn run_wizard_tui_loop(
    app: &mut WizardApp,
    store: &dyn ConfigurationStore,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<WizardExit, String> {
    let mut notice_since: Option<Instant> = None;
    let mut last_countdown = Instant::now();
    loop {
        app.reconcile_selection();
        match (&app.notice, notice_since) {
            (Some(_), None) => notice_since = Some(Instant::now()),
            (Some(_), Some(since)) if since.elapsed() >= REDIRECT_NOTICE_DELAY => {
                app.resolve_notice();
                notice_since = None;
            }
            (None, Some(_)) => notice_since = None,
            _ => {}
        }
        if matches!(app.flow.phase(), SubmitPhase::Submitted { .. }) {
            if last_countdown.elapsed() >= COUNTDOWN_TICK {
                app.countdown_tick();
                last_countdown = Instant::now();
            }
        } else {
            last_countdown = Instant::now();
        }
        draw_wizard_screen(terminal, app)?;
        if !event::poll(Duration::from_millis(250))
            .map_err(|e| format!("failed to poll wizard input: {e}"))?
        {
            continue;
        }
        let ev = event::read().map_err(|e| format!("failed to read wizard input: {e}"))?;
        let Event::Key(key) = ev else {
            continue;
        };
        let Some(action) = wizard_action_from_key(app.step, key) else {
            continue;
        };
        match app.apply_action(action) {
            WizardEffect::None => {}
            WizardEffect::Submit => app.do_submit(store),
            WizardEffect::EditText(target) => {
                let current = target.current(app.wizard.state()).to_string();
                if let Some(value) =
                    prompt_line_tui(terminal, target.title(), "Enter value:", &current)?
                {
                    target.apply(&mut app.wizard, value);
                    app.status = format!("{} updated.", target.title());
                }
            }
            WizardEffect::Exit(exit) => return Ok(exit),
        }
    }
}

fn run_wizard_scripted(
    app: &mut WizardApp,
    store: &dyn ConfigurationStore,
    inputs: Vec<ScriptedInput>,
) -> Result<WizardExit, String> {
    let mut iter = inputs.into_iter();
    while let Some(input) = iter.next() {
        app.reconcile_selection();
        let key = match input {
            ScriptedInput::Tick => {
                app.resolve_notice();
                app.countdown_tick();
                continue;
            }
            ScriptedInput::Key(key) => key,
        };
        let Some(action) = wizard_action_from_key(app.step, key) else {
            continue;
        };
        match app.apply_action(action) {
            WizardEffect::None => {}
            WizardEffect::Submit => app.do_submit(store),
            WizardEffect::EditText(target) => {
                let mut value = target.current(app.wizard.state()).to_string();
                let mut canceled = false;
                for next in iter.by_ref() {
                    let ScriptedInput::Key(key) = next else {
                        continue;
                    };
                    match key.code {
                        KeyCode::Enter => break,
                        KeyCode::Esc => {
                            canceled = true;
                            break;
                        }
                        KeyCode::Backspace => {
                            value.pop();
                        }
                        KeyCode::Char(ch) => value.push(ch),
                        _ => {}
                    }
                }
                if !canceled {
                    target.apply(&mut app.wizard, value);
                    app.status = format!("{} updated.", target.title());
                }
            }
            WizardEffect::Exit(exit) => return Ok(exit),
        }
    }
    Err("scripted wizard did not terminate; include an esc or ctrl-c token".to_string())
}

fn draw_wizard_screen(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &WizardApp,
) -> Result<(), String> {
    let state = app.wizard.state();
    if let SubmitPhase::Submitted { remaining } = app.flow.phase() {
        let lines = submitted_lines(*remaining);
        terminal
            .draw(|frame| draw_message_screen(frame, &lines[0], &lines[1..]))
            .map_err(|e| format!("failed to render wizard ui: {e}"))?;
        return Ok(());
    }
    if let Some(notice) = &app.notice {
        let lines = redirect_lines(notice);
        terminal
            .draw(|frame| draw_message_screen(frame, "Step Locked", &lines))
            .map_err(|e| format!("failed to render wizard ui: {e}"))?;
        return Ok(());
    }
    let sidebar = sidebar_lines(&app.wizard, app.step);
    let status = status_line(app.flow.phase(), &app.status);
    match app.step {
        WizardStep::Basic => {
            let rows = basic_rows(state, &validate_basic(&state.basic));
            terminal
                .draw(|frame| {
                    draw_step_screen(
                        frame,
                        WizardStep::Basic.title(),
                        &sidebar,
                        &rows,
                        app.selected,
                        &[],
                        &status,
                        BASIC_HINT_TEXT,
                    )
                })
                .map_err(|e| format!("failed to render wizard ui: {e}"))?;
        }
        WizardStep::Rag => {
            let rows = rag_rows(state, &validate_rag_draft(&state.rag));
            let table = entry_table_rows(&state.rag.configurations);
            terminal
                .draw(|frame| {
                    draw_step_screen(
                        frame,
                        WizardStep::Rag.title(),
                        &sidebar,
                        &rows,
                        app.selected,
                        &table,
                        &status,
                        RAG_HINT_TEXT,
                    )
                })
                .map_err(|e| format!("failed to render wizard ui: {e}"))?;
        }
        WizardStep::Workflows => {
            let rows = workflow_rows(state);
            terminal
                .draw(|frame| {
                    draw_step_screen(
                        frame,
                        WizardStep::Workflows.title(),
                        &sidebar,
                        &rows,
                        app.selected,
                        &[],
                        &status,
                        WORKFLOWS_HINT_TEXT,
                    )
                })
                .map_err(|e| format!("failed to render wizard ui: {e}"))?;
        }
        WizardStep::Security => {
            let rows = security_rows(state);
            terminal
                .draw(|frame| {
                    draw_step_screen(
                        frame,
                        WizardStep::Security.title(),
                        &sidebar,
                        &rows,
                        app.selected,
                        &[],
                        &status,
                        SECURITY_HINT_TEXT,
                    )
                })
                .map_err(|e| format!("failed to render wizard ui: {e}"))?;
        }
        WizardStep::Overview => {
            let sections = overview_sections(state);
            terminal
                .draw(|frame| {
                    draw_overview_screen(frame, &sidebar, &sections, &status, OVERVIEW_HINT_TEXT)
                })
                .map_err(|e| format!("failed to render wizard ui: {e}"))?;
        }
    }
    Ok(())
}

fn prompt_line_tui(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    title: &str,
    prompt: &str,
    initial: &str,
) -> Result<Option<String>, String> {
    let mut value = initial.to_string();
    loop {
        terminal
            .draw(|frame| draw_prompt(frame, title, prompt, &value))
            .map_err(|e| format!("failed to render prompt: {e}"))?;
        let ev = event::read().map_err(|e| format!("failed to read prompt input: {e}"))?;
        let Event::Key(key) = ev else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }
        match key.code {
            KeyCode::Esc => return Ok(None),
            KeyCode::Enter | KeyCode::Char('\n') | KeyCode::Char('\r') => return Ok(Some(value)),
            KeyCode::Backspace => {
                value.pop();
            }
            KeyCode::Char(ch) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL) {
                    value.push(ch);
                }
            }
            _ => {}
        }
    }
}

fn draw_prompt(frame: &mut Frame<'_>, title: &str, prompt: &str, value: &str) {
    let area = crate::wizard::screens::centered_rect(70, 30, frame.area());
    let block = Block::default()
        .borders(Borders::ALL)
        .padding(Padding::new(2, 2, 1, 1));
    frame.render_widget(block.clone(), area);
    let inner = block.inner(area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);
    let max_input_width = rows[3].width.saturating_sub(2) as usize;
    let display_value = tail_for_display(value, max_input_width);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            title.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))),
        rows[0],
    );
    frame.render_widget(Paragraph::new(prompt.to_string()), rows[2]);
    frame.render_widget(
        Paragraph::new(Line::from(format!("> {display_value}"))),
        rows[3],
    );
    frame.render_widget(Paragraph::new("Enter apply, Esc cancel"), rows[4]);
    frame.set_cursor_position((
        rows[3].x + 2 + display_value.chars().count() as u16,
        rows[3].y,
    ));
}

fn tail_for_display(value: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= max_width {
        return value.to_string();
    }
    chars[chars.len() - max_width..].iter().collect()
}
