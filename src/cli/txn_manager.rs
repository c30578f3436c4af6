use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use rusqlite::Connection;

use crate::cli::{categories, transactions, types};
use crate::db::get_connection;
use crate::error::Result;
use crate::models::RegisterRow;
use crate::settings::db_path;
use crate::tui::{self, money_span, ViewAction, FOOTER_STYLE, HEADER_STYLE};

const NO_TYPE: &str = "(none)";

// Field indices for TxnForm::new() — keep in sync with field order
const AMOUNT_IDX: usize = 0;
const CATEGORY_IDX: usize = 1;
const DESC_IDX: usize = 2;
const DATE_IDX: usize = 3;
const TYPE_IDX: usize = 4;
const TAGS_IDX: usize = 5;

enum Screen {
    List,
    Add(TxnForm),
    ConfirmDelete,
}

struct TxnForm {
    fields: Vec<FormField>,
    focused: usize,
}

struct FormField {
    label: &'static str,
    value: String,
    kind: FieldKind,
}

enum FieldKind {
    Text,
    Selector { options: Vec<String>, selected: usize },
}

impl TxnForm {
    fn new(categories: Vec<String>, mut type_names: Vec<String>) -> Self {
        type_names.insert(0, NO_TYPE.to_string());
        let first_category = categories.first().cloned().unwrap_or_default();
        Self {
            fields: vec![
                FormField {
                    label: "Amount",
                    value: String::new(),
                    kind: FieldKind::Text,
                },
                FormField {
                    label: "Category",
                    value: first_category,
                    kind: FieldKind::Selector {
                        options: categories,
                        selected: 0,
                    },
                },
                FormField {
                    label: "Description",
                    value: String::new(),
                    kind: FieldKind::Text,
                },
                FormField {
                    label: "Date",
                    value: String::new(),
                    kind: FieldKind::Text,
                },
                FormField {
                    label: "Type",
                    value: NO_TYPE.to_string(),
                    kind: FieldKind::Selector {
                        options: type_names,
                        selected: 0,
                    },
                },
                FormField {
                    label: "Tags",
                    value: String::new(),
                    kind: FieldKind::Text,
                },
            ],
            focused: 0,
        }
    }
}

pub struct TxnManager {
    rows: Vec<RegisterRow>,
    selection: usize,
    screen: Screen,
    status_message: Option<String>,
    /// Remaining keypresses before the status message is cleared.
    status_ttl: u8,
    greeting: String,
}

impl TxnManager {
    pub fn new(conn: &Connection, greeting: &str) -> Self {
        let rows = transactions::list_register(conn).unwrap_or_default();
        Self {
            rows,
            selection: 0,
            screen: Screen::List,
            status_message: None,
            status_ttl: 0,
            greeting: greeting.to_string(),
        }
    }

    fn reload(&mut self, conn: &Connection) {
        self.rows = transactions::list_register(conn).unwrap_or_default();
        if !self.rows.is_empty() {
            self.selection = self.selection.min(self.rows.len() - 1);
        } else {
            self.selection = 0;
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        match &self.screen {
            Screen::List | Screen::ConfirmDelete => self.draw_list(frame),
            Screen::Add(form) => self.draw_form(frame, "Add Transaction", form),
        }
    }

    fn draw_list(&self, frame: &mut Frame) {
        let area = frame.area();
        let border_style = Style::default().fg(Color::DarkGray);

        let [header_area, sep, content_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(format!(" Tally: {}", self.greeting)).style(HEADER_STYLE),
            header_area,
        );

        let sep_line = "━".repeat(area.width as usize);
        frame.render_widget(Paragraph::new(sep_line.as_str()).style(border_style), sep);

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                " Transactions",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        if self.rows.is_empty() {
            lines.push(Line::from("   No transactions yet. Press 'a' to add one."));
        } else {
            lines.push(Line::from(Span::styled(
                format!(
                    "   {:<12} {:>12}  {:<18} {}",
                    "Date", "Amount", "Category", "Description"
                ),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )));

            for (i, row) in self.rows.iter().enumerate() {
                let marker = if i == self.selection { " > " } else { "   " };
                let style = if i == self.selection {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{marker}{:<12} ", row.date),
                        style,
                    ),
                    money_span(row.amount),
                    Span::styled(
                        format!("  {:<18} {}", row.category, row.description),
                        style,
                    ),
                ]));
            }
        }

        if let Screen::ConfirmDelete = &self.screen {
            if let Some(row) = self.rows.get(self.selection) {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!("   Delete '{}' ({})? (y/n)", row.description, row.date),
                    Style::default().fg(Color::Yellow),
                )));
            }
        }

        frame.render_widget(Paragraph::new(lines), content_area);

        if let Some(msg) = &self.status_message {
            frame.render_widget(
                Paragraph::new(format!(" {msg}")).style(Style::default().fg(Color::Yellow)),
                hints_area,
            );
        } else if let Screen::ConfirmDelete = &self.screen {
            frame.render_widget(
                Paragraph::new(" y=confirm  n=cancel").style(FOOTER_STYLE),
                hints_area,
            );
        } else {
            frame.render_widget(
                Paragraph::new(" a=add  d=delete  Esc=back  q=quit").style(FOOTER_STYLE),
                hints_area,
            );
        }
    }

    fn draw_form(&self, frame: &mut Frame, title: &str, form: &TxnForm) {
        let area = frame.area();
        let border_style = Style::default().fg(Color::DarkGray);

        let [header_area, sep, content_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(format!(" Tally: {}", self.greeting)).style(HEADER_STYLE),
            header_area,
        );

        let sep_line = "━".repeat(area.width as usize);
        frame.render_widget(Paragraph::new(sep_line.as_str()).style(border_style), sep);

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!(" {title}"),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        for (i, field) in form.fields.iter().enumerate() {
            let is_focused = i == form.focused;
            let label_style = if is_focused {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            match &field.kind {
                FieldKind::Text => {
                    let cursor = if is_focused { "_" } else { "" };
                    let hint = if i == DATE_IDX && field.value.is_empty() {
                        " (DD/MM/YYYY)"
                    } else {
                        ""
                    };
                    lines.push(Line::from(vec![
                        Span::styled(format!("   {:<14} ", field.label), label_style),
                        Span::styled(
                            format!("{}{cursor}{hint}", field.value),
                            if is_focused {
                                Style::default().fg(Color::Cyan)
                            } else {
                                Style::default()
                            },
                        ),
                    ]));
                }
                FieldKind::Selector { options, selected } => {
                    let arrows = if is_focused { ("< ", " >") } else { ("  ", "  ") };
                    let shown = options
                        .get(*selected)
                        .map(String::as_str)
                        .unwrap_or("(empty)");
                    lines.push(Line::from(vec![
                        Span::styled(format!("   {:<14} ", field.label), label_style),
                        Span::styled(
                            format!("{}{shown}{}", arrows.0, arrows.1),
                            if is_focused {
                                Style::default().fg(Color::Cyan)
                            } else {
                                Style::default()
                            },
                        ),
                    ]));
                }
            }
        }

        if let Some(msg) = &self.status_message {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("   {msg}"),
                Style::default().fg(Color::Yellow),
            )));
        }

        frame.render_widget(Paragraph::new(lines), content_area);

        frame.render_widget(
            Paragraph::new(" Tab=next field  ←/→=choose  Enter=save  Esc=cancel")
                .style(FOOTER_STYLE),
            hints_area,
        );
    }

    fn set_status(&mut self, msg: String) {
        self.status_message = Some(msg);
        self.status_ttl = 3;
    }

    pub fn handle_key(&mut self, code: crossterm::event::KeyCode, conn: &Connection) -> ViewAction {
        if self.status_ttl > 0 {
            self.status_ttl -= 1;
            if self.status_ttl == 0 {
                self.status_message = None;
            }
        }

        match &mut self.screen {
            Screen::List => self.handle_list_key(code, conn),
            Screen::Add(_) => self.handle_form_key(code, conn),
            Screen::ConfirmDelete => self.handle_delete_key(code, conn),
        }
    }

    fn handle_list_key(&mut self, code: crossterm::event::KeyCode, conn: &Connection) -> ViewAction {
        use crossterm::event::KeyCode::*;
        match code {
            Up => {
                self.selection = self.selection.saturating_sub(1);
            }
            Down => {
                if !self.rows.is_empty() {
                    self.selection = (self.selection + 1).min(self.rows.len() - 1);
                }
            }
            Char('a') => {
                let category_names = categories::list_categories(conn)
                    .map(|cats| cats.into_iter().map(|c| c.name).collect())
                    .unwrap_or_default();
                let type_names = types::list_types(conn)
                    .map(|ts| ts.into_iter().map(|t| t.name).collect())
                    .unwrap_or_default();
                self.screen = Screen::Add(TxnForm::new(category_names, type_names));
            }
            Char('d') => {
                if !self.rows.is_empty() {
                    self.screen = Screen::ConfirmDelete;
                }
            }
            Char('q') | Esc => return ViewAction::Close,
            _ => {}
        }
        ViewAction::Continue
    }

    fn handle_form_key(&mut self, code: crossterm::event::KeyCode, conn: &Connection) -> ViewAction {
        use crossterm::event::KeyCode::*;

        let form = match &mut self.screen {
            Screen::Add(f) => f,
            _ => return ViewAction::Continue,
        };

        match code {
            Esc => {
                self.screen = Screen::List;
                return ViewAction::Continue;
            }
            Tab | Down => {
                form.focused = (form.focused + 1) % form.fields.len();
            }
            BackTab | Up => {
                form.focused = if form.focused == 0 {
                    form.fields.len() - 1
                } else {
                    form.focused - 1
                };
            }
            Left => {
                if let FieldKind::Selector { options, selected } =
                    &mut form.fields[form.focused].kind
                {
                    if !options.is_empty() {
                        *selected = if *selected == 0 {
                            options.len() - 1
                        } else {
                            *selected - 1
                        };
                        form.fields[form.focused].value = options[*selected].clone();
                    }
                }
            }
            Right => {
                if let FieldKind::Selector { options, selected } =
                    &mut form.fields[form.focused].kind
                {
                    if !options.is_empty() {
                        *selected = (*selected + 1) % options.len();
                        form.fields[form.focused].value = options[*selected].clone();
                    }
                }
            }
            Char(c) => {
                if let FieldKind::Text = &form.fields[form.focused].kind {
                    form.fields[form.focused].value.push(c);
                }
            }
            Backspace => {
                if let FieldKind::Text = &form.fields[form.focused].kind {
                    form.fields[form.focused].value.pop();
                }
            }
            Enter => {
                let amount: f64 = match form.fields[AMOUNT_IDX].value.trim().parse() {
                    Ok(v) => v,
                    Err(_) => {
                        self.set_status("Amount must be a number".into());
                        return ViewAction::Continue;
                    }
                };
                let category = form.fields[CATEGORY_IDX].value.clone();
                if category.is_empty() {
                    self.set_status("No categories to choose from".into());
                    return ViewAction::Continue;
                }
                let description = form.fields[DESC_IDX].value.trim().to_string();
                let date = form.fields[DATE_IDX].value.trim().to_string();
                let txn_type = {
                    let v = form.fields[TYPE_IDX].value.clone();
                    if v == NO_TYPE { None } else { Some(v) }
                };
                let tags = {
                    let v = form.fields[TAGS_IDX].value.trim().to_string();
                    if v.is_empty() { None } else { Some(v) }
                };

                let new = transactions::NewTransaction {
                    amount,
                    category: &category,
                    description: &description,
                    date: &date,
                    account: None,
                    txn_type: txn_type.as_deref(),
                    tags: tags.as_deref(),
                };
                match transactions::add_transaction(conn, &new) {
                    Ok(()) => {
                        self.reload(conn);
                        self.screen = Screen::List;
                        self.set_status(format!("Added transaction: {description}"));
                    }
                    Err(e) => {
                        self.set_status(e.to_string());
                    }
                }
            }
            _ => {}
        }
        ViewAction::Continue
    }

    fn handle_delete_key(&mut self, code: crossterm::event::KeyCode, conn: &Connection) -> ViewAction {
        use crossterm::event::KeyCode::*;
        match code {
            Char('y') => {
                if let Some(row) = self.rows.get(self.selection) {
                    let description = row.description.clone();
                    match transactions::delete_transaction(conn, row.id) {
                        Ok(()) => {
                            self.reload(conn);
                            self.screen = Screen::List;
                            self.set_status(format!("Deleted transaction: {description}"));
                        }
                        Err(e) => {
                            self.screen = Screen::List;
                            self.set_status(e.to_string());
                        }
                    }
                }
            }
            Char('n') | Esc => {
                self.screen = Screen::List;
            }
            _ => {}
        }
        ViewAction::Continue
    }
}

struct TxnManagerView {
    manager: TxnManager,
    conn: Connection,
}

impl tui::View for TxnManagerView {
    fn draw(&mut self, frame: &mut Frame) {
        self.manager.draw(frame);
    }

    fn handle_key(&mut self, code: crossterm::event::KeyCode) -> ViewAction {
        self.manager.handle_key(code, &self.conn)
    }
}

/// Open the interactive transaction register for the given user.
pub fn run(greeting: &str) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let manager = TxnManager::new(&conn, greeting);
    let mut view = TxnManagerView { manager, conn };
    tui::run_view(&mut view)
}
