use crate::wizard::gate::{nav_items, RedirectNotice, WizardStep};
use crate::wizard::rules::ValidationResult;
use crate::wizard::state::{RagEntry, WizardState, WizardStore};
use crate::wizard::submit::SubmitPhase;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, List, ListItem, Padding, Paragraph, Row, Table};
use ratatui::Frame;

pub const WORKFLOW_CATALOG: [&str; 3] = ["default-workflow", "document-ingest", "evaluation-loop"];

pub const ENTRY_TABLE_HEADERS: [&str; 7] = [
    "KB Name",
    "Description",
    "Pattern",
    "Chunking",
    "Embeddings",
    "Metrics",
    "Vector DB",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    pub field: String,
    pub value: String,
    pub message: Option<String>,
}

fn field_row(field: &str, value: &str, result: &ValidationResult, key: &str) -> FieldRow {
    FieldRow {
        field: field.to_string(),
        value: value.to_string(),
        message: result.message_for(key).map(|message| message.to_string()),
    }
}

pub fn basic_rows(state: &WizardState, result: &ValidationResult) -> Vec<FieldRow> {
    vec![
        field_row("App Name", &state.basic.app_name, result, "appName"),
        field_row(
            "Description",
            &state.basic.description,
            result,
            "description",
        ),
    ]
}

pub fn rag_rows(state: &WizardState, result: &ValidationResult) -> Vec<FieldRow> {
    let rag = &state.rag;
    vec![
        field_row(
            "KB Name",
            &rag.knowledge_base_name,
            result,
            "knowledgeBaseName",
        ),
        field_row("Description", &rag.description, result, "description"),
        field_row("Pattern", &rag.pattern, result, "pattern"),
        field_row("Embeddings", &rag.embeddings, result, "embeddings"),
        field_row("Metrics", &rag.metrics, result, "metrics"),
        field_row("Chunking", &rag.chunking, result, "chunking"),
        field_row("Vector DB", &rag.vector_db, result, "vectorDb"),
    ]
}

pub fn entry_table_rows(entries: &[RagEntry]) -> Vec<Vec<String>> {
    entries
        .iter()
        .map(|entry| {
            vec![
                entry.kb_name.clone(),
                entry.description.clone(),
                entry.pattern.clone(),
                entry.chunking.clone(),
                entry.embeddings.clone(),
                entry.metrics.clone(),
                entry.vector_db.clone(),
            ]
        })
        .collect()
}

pub fn workflow_rows(state: &WizardState) -> Vec<FieldRow> {
    WORKFLOW_CATALOG
        .iter()
        .map(|workflow| FieldRow {
            field: (*workflow).to_string(),
            value: if state
                .workflows
                .selected_workflows
                .iter()
                .any(|selected| selected == workflow)
            {
                "[x]".to_string()
            } else {
                "[ ]".to_string()
            },
            message: None,
        })
        .collect()
}

pub fn security_rows(state: &WizardState) -> Vec<FieldRow> {
    let flag = |enabled: bool| {
        if enabled {
            "Enabled".to_string()
        } else {
            "Disabled".to_string()
        }
    };
    vec![
        FieldRow {
            field: "Encryption".to_string(),
            value: flag(state.security.enable_encryption),
            message: None,
        },
        FieldRow {
            field: "Audit".to_string(),
            value: flag(state.security.enable_audit),
            message: None,
        },
        FieldRow {
            field: "RBAC".to_string(),
            value: flag(state.security.enable_rbac),
            message: None,
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewSection {
    pub title: String,
    pub lines: Vec<String>,
}

/// Read-only projection of the full aggregate; optional RAG fields are
/// omitted when empty, mirroring the step's own display rules.
pub fn overview_sections(state: &WizardState) -> Vec<OverviewSection> {
    let mut rag_lines = vec![
        format!("Knowledge Base: {}", state.rag.knowledge_base_name),
        format!("Description: {}", state.rag.description),
    ];
    for (label, value) in [
        ("Pattern", &state.rag.pattern),
        ("Embeddings", &state.rag.embeddings),
        ("Metrics", &state.rag.metrics),
        ("Chunking", &state.rag.chunking),
    ] {
        if !value.is_empty() {
            rag_lines.push(format!("{label}: {value}"));
        }
    }
    rag_lines.push(format!("Vector DB: {}", state.rag.vector_db));
    if !state.rag.configurations.is_empty() {
        rag_lines.push(format!(
            "Saved configurations: {}",
            state.rag.configurations.len()
        ));
    }

    let workflows_line = if state.workflows.selected_workflows.is_empty() {
        "Selected Workflows: None".to_string()
    } else {
        format!(
            "Selected Workflows: {}",
            state.workflows.selected_workflows.join(", ")
        )
    };
    let flag = |enabled: bool| if enabled { "Enabled" } else { "Disabled" };

    vec![
        OverviewSection {
            title: "Basic Configuration".to_string(),
            lines: vec![
                format!("App Name: {}", state.basic.app_name),
                format!("Description: {}", state.basic.description),
            ],
        },
        OverviewSection {
            title: "RAG Configuration".to_string(),
            lines: rag_lines,
        },
        OverviewSection {
            title: "Workflows".to_string(),
            lines: vec![workflows_line],
        },
        OverviewSection {
            title: "Security".to_string(),
            lines: vec![
                format!("Encryption: {}", flag(state.security.enable_encryption)),
                format!("Audit: {}", flag(state.security.enable_audit)),
                format!("RBAC: {}", flag(state.security.enable_rbac)),
            ],
        },
    ]
}

pub fn submitted_lines(remaining: u8) -> Vec<String> {
    vec![
        "Configuration Saved!".to_string(),
        "Your configuration has been saved successfully to the database.".to_string(),
        format!("Redirecting to the start in {remaining} seconds..."),
        "Press Enter to start a new configuration now.".to_string(),
    ]
}

pub fn redirect_lines(notice: &RedirectNotice) -> Vec<String> {
    vec![notice.message.clone(), "Redirecting...".to_string()]
}

/// Sidebar line per step: active marker, lock marker for unreachable steps.
pub fn sidebar_lines(store: &WizardStore, current: WizardStep) -> Vec<String> {
    nav_items(store, current)
        .iter()
        .map(|item| {
            let marker = if item.active { ">" } else { " " };
            let lock = if item.locked { "  [locked]" } else { "" };
            format!("{marker} {}{lock}", item.title)
        })
        .collect()
}

pub fn status_line(phase: &SubmitPhase, fallback: &str) -> String {
    match phase {
        SubmitPhase::Editing { error: Some(text) } => format!("Error saving configuration: {text}"),
        SubmitPhase::Editing { error: None } => fallback.to_string(),
        SubmitPhase::Submitting => "Saving...".to_string(),
        SubmitPhase::Submitted { remaining } => {
            format!("Saved. Restarting in {remaining}s (Enter to start now)")
        }
    }
}

fn main_panel_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .padding(Padding::new(2, 2, 1, 1))
}

fn split_frame(area: Rect) -> (Rect, Rect, Rect, Rect) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(4),
        ])
        .split(area);
    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(20)])
        .split(vertical[1]);
    (vertical[0], middle[0], middle[1], vertical[2])
}

#[allow(clippy::too_many_arguments)]
pub fn draw_step_screen(
    frame: &mut Frame<'_>,
    title: &str,
    sidebar: &[String],
    rows: &[FieldRow],
    selected: usize,
    table_rows: &[Vec<String>],
    status: &str,
    hint: &str,
) {
    let (header_area, sidebar_area, body_area, footer_area) = split_frame(frame.area());

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "ragforge",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(title.to_string()),
    ])
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, header_area);

    let sidebar_items: Vec<ListItem<'_>> = sidebar
        .iter()
        .map(|line| ListItem::new(Line::from(Span::raw(line.clone()))))
        .collect();
    frame.render_widget(
        List::new(sidebar_items).block(Block::default().borders(Borders::ALL).title("Steps")),
        sidebar_area,
    );

    let body_chunks = if table_rows.is_empty() {
        vec![body_area]
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Min(4)])
            .split(body_area)
            .to_vec()
    };

    let field_rows = rows.iter().enumerate().map(|(idx, row)| {
        let style = if idx == selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let rendered_value = match &row.message {
            Some(message) => format!("{}  ({message})", row.value),
            None => row.value.clone(),
        };
        Row::new(vec![Cell::from(row.field.clone()), Cell::from(rendered_value)]).style(style)
    });
    let fields = Table::new(
        field_rows,
        [Constraint::Percentage(35), Constraint::Percentage(65)],
    )
    .column_spacing(2)
    .block(main_panel_block());
    frame.render_widget(fields, body_chunks[0]);

    if let Some(table_area) = body_chunks.get(1) {
        let entry_rows = table_rows
            .iter()
            .map(|columns| Row::new(columns.iter().map(|value| Cell::from(value.clone()))));
        let widths = vec![Constraint::Ratio(1, ENTRY_TABLE_HEADERS.len() as u32);
            ENTRY_TABLE_HEADERS.len()];
        let table = Table::new(entry_rows, widths)
            .header(Row::new(ENTRY_TABLE_HEADERS.map(Cell::from)).style(
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .block(Block::default().borders(Borders::ALL).title("Saved"));
        frame.render_widget(table, *table_area);
    }

    let footer = Paragraph::new(vec![
        Line::from(hint.to_string()),
        Line::from(format!("Status: {status}")),
    ])
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, footer_area);
}

pub fn draw_message_screen(frame: &mut Frame<'_>, title: &str, lines: &[String]) {
    let area = centered_rect(60, 40, frame.area());
    let mut body = vec![Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    ))];
    for line in lines {
        body.push(Line::from(line.clone()));
    }
    frame.render_widget(
        Paragraph::new(body).block(main_panel_block()),
        area,
    );
}

pub fn draw_overview_screen(
    frame: &mut Frame<'_>,
    sidebar: &[String],
    sections: &[OverviewSection],
    status: &str,
    hint: &str,
) {
    let (header_area, sidebar_area, body_area, footer_area) = split_frame(frame.area());

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "ragforge",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("Configuration Overview"),
    ])
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, header_area);

    let sidebar_items: Vec<ListItem<'_>> = sidebar
        .iter()
        .map(|line| ListItem::new(Line::from(Span::raw(line.clone()))))
        .collect();
    frame.render_widget(
        List::new(sidebar_items).block(Block::default().borders(Borders::ALL).title("Steps")),
        sidebar_area,
    );

    let mut body = Vec::new();
    for section in sections {
        body.push(Line::from(Span::styled(
            section.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for line in &section.lines {
            body.push(Line::from(format!("  {line}")));
        }
        body.push(Line::from(""));
    }
    frame.render_widget(Paragraph::new(body).block(main_panel_block()), body_area);

    let footer = Paragraph::new(vec![
        Line::from(hint.to_string()),
        Line::from(format!("Status: {status}")),
    ])
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, footer_area);
}

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
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
