use std::io::{self, Stdout, Write as _};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Widget, Wrap,
};

use crate::client::{ApiClient, Role};
use crate::config::ConsoleConfig;
use crate::error::{Error, Result};
use crate::pager::{FilterState, Pager};
use crate::prefs;
use crate::record::{LogRecord, TaskStatus};
use crate::tags;

const BANNER_TEXT: &str = "当前未开启Midjourney回调，部分项目可能无法获得绘图结果，可在运营设置中开启。";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterField {
    ChannelId,
    MjId,
    StartTime,
    EndTime,
}

impl FilterField {
    fn label(self) -> &'static str {
        match self {
            FilterField::ChannelId => "渠道 ID",
            FilterField::MjId => "任务 ID",
            FilterField::StartTime => "起始时间",
            FilterField::EndTime => "结束时间",
        }
    }
}

#[derive(Debug, Clone)]
enum InputMode {
    Normal,
    EditFilter {
        field: FilterField,
        buffer: String,
        error: Option<String>,
    },
    TextModal {
        title: String,
        body: String,
    },
    ManualCopy {
        text: String,
    },
}

/// Outcome of one worker-thread fetch, delivered over the channel and
/// applied on the UI thread. Late outcomes from superseded loads are still
/// applied: last response wins.
struct FetchOutcome {
    page_index: usize,
    result: std::result::Result<Vec<LogRecord>, String>,
}

struct App {
    client: Arc<ApiClient>,
    role: Role,
    filters: FilterState,
    pager: Pager,

    // UI-disabling state only; correctness comes from the single-mutator
    // event loop, not from this flag.
    loading: bool,
    fetch_tx: Sender<FetchOutcome>,
    fetch_rx: Receiver<FetchOutcome>,

    notice: Option<String>,
    table: TableState,
    banner_visible: bool,
    input: InputMode,
}

impl App {
    fn new(cfg: &ConsoleConfig) -> Result<Self> {
        let client = Arc::new(ApiClient::new(
            &cfg.resolve_base_url(),
            cfg.resolve_token(),
        )?);
        let role = cfg.resolve_role()?;
        let stored = prefs::load(&cfg.prefs_path());
        let (fetch_tx, fetch_rx) = channel();

        let mut app = Self {
            client,
            role,
            filters: FilterState::now(),
            pager: Pager::new(cfg.page_size()),
            loading: false,
            fetch_tx,
            fetch_rx,
            notice: None,
            table: TableState::default(),
            banner_visible: role.is_privileged() && !stored.notify_enabled(),
            input: InputMode::Normal,
        };
        app.refresh();
        Ok(app)
    }

    fn start_load(&mut self, page_index: usize) {
        self.loading = true;
        let client = Arc::clone(&self.client);
        let role = self.role;
        let filters = self.filters.clone();
        let tx = self.fetch_tx.clone();
        thread::spawn(move || {
            let result = client
                .list_logs(role, page_index, &filters)
                .map_err(|e| e.to_string());
            let _ = tx.send(FetchOutcome { page_index, result });
        });
    }

    /// The query action: back to page 1, replace the cache from a fresh
    /// page 0. Runs at mount and whenever the user submits the filters.
    fn refresh(&mut self) {
        self.pager.set_active_page(1);
        self.start_load(0);
    }

    fn drain_fetch_outcomes(&mut self) {
        while let Ok(out) = self.fetch_rx.try_recv() {
            self.loading = false;
            match out.result {
                Ok(data) => {
                    self.pager.apply_page(out.page_index, data);
                    self.notice = None;
                }
                Err(msg) => {
                    // Cache and cursor stay as they were; the user may retry.
                    self.notice = Some(msg);
                }
            }
            self.clamp_selection();
        }
    }

    fn clamp_selection(&mut self) {
        let visible = self.pager.page_slice().len();
        if visible == 0 {
            self.table.select(None);
            return;
        }
        let i = self.table.selected().unwrap_or(0);
        self.table.select(Some(i.min(visible - 1)));
    }

    fn selected_record(&self) -> Option<&LogRecord> {
        let idx = self.table.selected()?;
        self.pager.page_slice().get(idx)
    }

    fn select_next_row(&mut self) {
        let visible = self.pager.page_slice().len();
        if visible == 0 {
            return;
        }
        let i = self.table.selected().unwrap_or(0);
        self.table.select(Some((i + 1).min(visible - 1)));
    }

    fn select_prev_row(&mut self) {
        if self.pager.page_slice().is_empty() {
            return;
        }
        let i = self.table.selected().unwrap_or(0);
        self.table.select(Some(i.saturating_sub(1)));
    }

    fn next_page(&mut self) {
        let page = self.pager.active_page() + 1;
        if page > self.pager.last_reachable_page() {
            return;
        }
        // Exactly one page past the cached window fetches and merges;
        // anything in-window is a pure slice.
        if let Some(idx) = self.pager.fetch_trigger(page) {
            self.start_load(idx);
        }
        self.pager.set_active_page(page);
        self.table.select(Some(0));
        self.clamp_selection();
    }

    fn prev_page(&mut self) {
        let page = self.pager.active_page();
        if page <= 1 {
            return;
        }
        self.pager.set_active_page(page - 1);
        self.table.select(Some(0));
    }

    fn begin_edit(&mut self, field: FilterField) {
        if field == FilterField::ChannelId && !self.role.is_privileged() {
            return;
        }
        let buffer = match field {
            FilterField::ChannelId => self.filters.channel_id.clone(),
            FilterField::MjId => self.filters.mj_id.clone(),
            FilterField::StartTime => tags::format_timestamp_ms(self.filters.start_timestamp),
            FilterField::EndTime => tags::format_timestamp_ms(self.filters.end_timestamp),
        };
        self.input = InputMode::EditFilter {
            field,
            buffer,
            error: None,
        };
    }

    /// Commits a filter edit. Editing never refetches; the explicit query
    /// action does.
    fn apply_edit(&mut self) {
        let InputMode::EditFilter { field, buffer, .. } = &self.input else {
            return;
        };
        let field = *field;
        let value = buffer.trim().to_string();
        match field {
            FilterField::ChannelId => {
                self.filters.channel_id = value;
            }
            FilterField::MjId => {
                self.filters.mj_id = value;
            }
            FilterField::StartTime | FilterField::EndTime => match parse_local_time_ms(&value) {
                Ok(ms) => {
                    if field == FilterField::StartTime {
                        self.filters.start_timestamp = ms;
                    } else {
                        self.filters.end_timestamp = ms;
                    }
                }
                Err(e) => {
                    if let InputMode::EditFilter { error, .. } = &mut self.input {
                        *error = Some(e.to_string());
                    }
                    return;
                }
            },
        }
        self.input = InputMode::Normal;
    }

    fn open_text_modal(&mut self, title: &str, body: Option<String>) {
        let body = match body {
            Some(b) if !b.is_empty() => b,
            _ => "无".to_string(),
        };
        self.input = InputMode::TextModal {
            title: title.to_string(),
            body,
        };
    }

    fn copy_selected_channel(&mut self) {
        if !self.role.is_privileged() {
            return;
        }
        let Some(text) = self.selected_record().map(|r| r.channel_id.to_string()) else {
            return;
        };
        match copy_to_clipboard(&text) {
            Ok(()) => self.notice = Some(format!("已复制：{text}")),
            Err(_) => self.input = InputMode::ManualCopy { text },
        }
    }

    fn handle_key(&mut self, code: KeyCode, mods: KeyModifiers) -> Result<bool> {
        if mods.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('c')) {
            return Ok(true);
        }

        match &mut self.input {
            InputMode::EditFilter { buffer, .. } => match code {
                KeyCode::Esc => {
                    self.input = InputMode::Normal;
                    return Ok(false);
                }
                KeyCode::Enter => {
                    self.apply_edit();
                    return Ok(false);
                }
                KeyCode::Backspace => {
                    buffer.pop();
                    return Ok(false);
                }
                KeyCode::Char(c) => {
                    if c != '\n' && c != '\r' {
                        buffer.push(c);
                    }
                    return Ok(false);
                }
                _ => return Ok(false),
            },
            InputMode::TextModal { .. } | InputMode::ManualCopy { .. } => match code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                    self.input = InputMode::Normal;
                    return Ok(false);
                }
                _ => return Ok(false),
            },
            InputMode::Normal => {}
        }

        match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Down | KeyCode::Char('j') => self.select_next_row(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev_row(),
            KeyCode::Right | KeyCode::Char('l') => self.next_page(),
            KeyCode::Left | KeyCode::Char('h') => self.prev_page(),
            KeyCode::Enter | KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('c') => self.begin_edit(FilterField::ChannelId),
            KeyCode::Char('t') => self.begin_edit(FilterField::MjId),
            KeyCode::Char('s') => self.begin_edit(FilterField::StartTime),
            KeyCode::Char('e') => self.begin_edit(FilterField::EndTime),
            KeyCode::Char('p') => {
                let body = self.selected_record().map(|r| r.prompt.clone());
                self.open_text_modal("Prompt", body);
            }
            KeyCode::Char('n') => {
                let body = self.selected_record().map(|r| r.prompt_en.clone());
                self.open_text_modal("PromptEn", body);
            }
            KeyCode::Char('f') => {
                let body = self.selected_record().and_then(|r| r.fail_reason.clone());
                self.open_text_modal("失败原因", body);
            }
            KeyCode::Char('i') => {
                let body = self.selected_record().and_then(|r| r.image_url.clone());
                self.open_text_modal("结果图片", body);
            }
            KeyCode::Char('y') => self.copy_selected_channel(),
            KeyCode::Char('b') => self.banner_visible = false,
            _ => {}
        }
        Ok(false)
    }

    fn draw(&mut self, f: &mut ratatui::Frame) {
        let banner_rows = u16::from(self.banner_visible);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(banner_rows),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.draw_header(f, chunks[0]);
        if self.banner_visible {
            self.draw_banner(f, chunks[1]);
        }
        self.draw_filters(f, chunks[2]);
        self.draw_table(f, chunks[3]);
        self.draw_footer(f, chunks[4]);

        self.draw_modal(f);
    }

    fn draw_header(&self, f: &mut ratatui::Frame, area: ratatui::layout::Rect) {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let role = if self.role.is_privileged() {
            "admin"
        } else {
            "self"
        };
        let line = Line::from(vec![
            Span::styled("MJ Console: Task Logs", Style::default().fg(Color::Cyan)),
            Span::raw("  "),
            Span::styled(self.client.base_url(), Style::default().fg(Color::Gray)),
            Span::raw("  "),
            Span::styled(role, Style::default().fg(Color::LightBlue)),
            Span::raw("  "),
            Span::styled(now, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(Text::from(line)).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BorderType::Plain),
        );
        f.render_widget(p, area);
    }

    fn draw_banner(&self, f: &mut ratatui::Frame, area: ratatui::layout::Rect) {
        let p = Paragraph::new(Line::from(vec![
            Span::styled("INFO ", Style::default().fg(Color::LightBlue)),
            Span::raw(BANNER_TEXT),
            Span::styled("  [b] 关闭", Style::default().fg(Color::Gray)),
        ]));
        f.render_widget(p, area);
    }

    fn draw_filters(&self, f: &mut ratatui::Frame, area: ratatui::layout::Rect) {
        let mut spans = Vec::new();
        let push_field = |spans: &mut Vec<Span<'static>>, key: &str, label: &str, v: String| {
            spans.push(Span::styled(
                format!("[{key}] "),
                Style::default().fg(Color::Gray),
            ));
            spans.push(Span::styled(
                format!("{label}: "),
                Style::default().fg(Color::Yellow),
            ));
            spans.push(Span::raw(if v.is_empty() { "-".to_string() } else { v }));
            spans.push(Span::raw("   "));
        };
        if self.role.is_privileged() {
            push_field(&mut spans, "c", "渠道 ID", self.filters.channel_id.clone());
        }
        push_field(&mut spans, "t", "任务 ID", self.filters.mj_id.clone());
        push_field(
            &mut spans,
            "s",
            "起始时间",
            tags::format_timestamp_ms(self.filters.start_timestamp),
        );
        push_field(
            &mut spans,
            "e",
            "结束时间",
            tags::format_timestamp_ms(self.filters.end_timestamp),
        );

        let mut lines = vec![Line::from(spans)];
        let status = if self.loading {
            Line::from(Span::styled(
                "查询中…",
                Style::default().fg(Color::Yellow),
            ))
        } else if let Some(n) = &self.notice {
            Line::from(Span::styled(n.clone(), Style::default().fg(Color::Red)))
        } else {
            Line::from("")
        };
        lines.push(status);
        f.render_widget(Paragraph::new(Text::from(lines)), area);
    }

    fn draw_table(&mut self, f: &mut ratatui::Frame, area: ratatui::layout::Rect) {
        let privileged = self.role.is_privileged();

        let mut header: Vec<Cell> = vec![
            Cell::from("提交时间"),
            Cell::from("花费时间"),
        ];
        if privileged {
            header.push(Cell::from("渠道"));
        }
        header.push(Cell::from("类型"));
        header.push(Cell::from("任务ID"));
        if privileged {
            header.push(Cell::from("提交结果"));
            header.push(Cell::from("任务状态"));
        }
        header.push(Cell::from("进度"));
        header.push(Cell::from("Prompt"));
        header.push(Cell::from("失败原因"));

        let mut widths: Vec<Constraint> = vec![Constraint::Length(19), Constraint::Length(10)];
        if privileged {
            widths.push(Constraint::Length(6));
        }
        widths.push(Constraint::Length(14));
        widths.push(Constraint::Length(18));
        if privileged {
            widths.push(Constraint::Length(8));
            widths.push(Constraint::Length(8));
        }
        widths.push(Constraint::Length(6));
        widths.push(Constraint::Min(12));
        widths.push(Constraint::Min(8));

        let rows: Vec<Row> = self
            .pager
            .page_slice()
            .iter()
            .map(|rec| {
                let submit = rec
                    .submit_time
                    .map(tags::format_timestamp_ms)
                    .unwrap_or_else(|| "N/A".into());
                let duration = tags::duration_tag(rec.submit_time, rec.finish_time);
                let progress = tags::progress_percent(rec.progress.as_deref());
                let progress_color = if rec.status == TaskStatus::Failure {
                    Color::Red
                } else {
                    Color::Reset
                };

                let mut cells: Vec<Cell> = vec![
                    Cell::from(submit),
                    Cell::from(Span::styled(
                        duration.label,
                        Style::default().fg(duration.color),
                    )),
                ];
                if privileged {
                    let ch = tags::channel_tag(rec.channel_id);
                    cells.push(Cell::from(Span::styled(
                        ch.label,
                        Style::default().fg(ch.color),
                    )));
                }
                let action = tags::action_tag(rec.action);
                cells.push(Cell::from(Span::styled(
                    action.label,
                    Style::default().fg(action.color),
                )));
                cells.push(Cell::from(rec.mj_id.clone()));
                if privileged {
                    let code = tags::code_tag(rec.code);
                    cells.push(Cell::from(Span::styled(
                        code.label,
                        Style::default().fg(code.color),
                    )));
                    let status = tags::status_tag(rec.status);
                    cells.push(Cell::from(Span::styled(
                        status.label,
                        Style::default().fg(status.color),
                    )));
                }
                cells.push(Cell::from(Span::styled(
                    format!("{progress}%"),
                    Style::default().fg(progress_color),
                )));
                cells.push(Cell::from(rec.prompt.clone()));
                cells.push(Cell::from(rec.fail_reason.clone().unwrap_or_default()));
                Row::new(cells)
            })
            .collect();

        let table = Table::new(rows, widths)
            .header(Row::new(header).style(Style::default().add_modifier(Modifier::BOLD)))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            )
            .row_highlight_style(Style::default().fg(Color::Black).bg(Color::LightYellow));
        let mut state = self.table.clone();
        f.render_stateful_widget(table, area, &mut state);
        self.table = state;
    }

    fn draw_footer(&self, f: &mut ratatui::Frame, area: ratatui::layout::Rect) {
        let page_info = format!(
            "第 {}/{} 页 · 共约 {} 条",
            self.pager.active_page(),
            self.pager.last_reachable_page(),
            self.pager.estimated_total()
        );
        let hint = "[←/→] 翻页  [j/k] 选行  [Enter/r] 查询  [c/t/s/e] 编辑筛选  [p/n/f/i] 详情  [y] 复制渠道  [q] 退出";
        let line = Line::from(vec![
            Span::styled(page_info, Style::default().fg(Color::Cyan)),
            Span::raw("  "),
            Span::styled(hint, Style::default().fg(Color::Gray)),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }

    fn draw_modal(&self, f: &mut ratatui::Frame) {
        match &self.input {
            InputMode::Normal => {}
            InputMode::EditFilter {
                field,
                buffer,
                error,
            } => {
                let area = centered_rect(60, 25, f.area());
                self.dim_background(f, area);

                let mut text = Vec::new();
                text.push(Line::from(vec![
                    Span::styled("编辑: ", Style::default().fg(Color::Yellow)),
                    Span::raw(field.label()),
                ]));
                let fmt_hint = match field {
                    FilterField::StartTime | FilterField::EndTime => {
                        "格式: YYYY-MM-DD HH:MM:SS · enter=确认 esc=取消"
                    }
                    _ => "enter=确认 esc=取消",
                };
                text.push(Line::from(fmt_hint));
                if let Some(e) = error {
                    text.push(Line::from(Span::styled(
                        format!("error: {e}"),
                        Style::default().fg(Color::Red),
                    )));
                }
                text.push(Line::from(""));
                text.push(Line::from(format!("{buffer}_")));

                let p = Paragraph::new(Text::from(text))
                    .style(Style::default().fg(Color::White).bg(Color::DarkGray))
                    .wrap(Wrap { trim: false })
                    .block(
                        Block::default()
                            .title("筛选")
                            .borders(Borders::ALL)
                            .border_type(BorderType::Double),
                    );
                f.render_widget(p, area);
            }
            InputMode::TextModal { title, body } => {
                let area = centered_rect(70, 50, f.area());
                self.dim_background(f, area);
                let p = Paragraph::new(body.clone())
                    .style(Style::default().fg(Color::White).bg(Color::DarkGray))
                    .wrap(Wrap { trim: false })
                    .block(
                        Block::default()
                            .title(title.clone())
                            .borders(Borders::ALL)
                            .border_type(BorderType::Double),
                    );
                f.render_widget(p, area);
            }
            InputMode::ManualCopy { text } => {
                let area = centered_rect(70, 30, f.area());
                self.dim_background(f, area);
                let lines = vec![
                    Line::from(Span::styled(
                        "无法复制到剪贴板，请手动复制",
                        Style::default().fg(Color::Red),
                    )),
                    Line::from(""),
                    Line::from(text.clone()),
                ];
                let p = Paragraph::new(Text::from(lines))
                    .style(Style::default().fg(Color::White).bg(Color::DarkGray))
                    .wrap(Wrap { trim: false })
                    .block(
                        Block::default()
                            .title("复制")
                            .borders(Borders::ALL)
                            .border_type(BorderType::Double),
                    );
                f.render_widget(p, area);
            }
        }
    }

    fn dim_background(&self, f: &mut ratatui::Frame, area: ratatui::layout::Rect) {
        let shadow = shadow_rect(area, f.area());
        f.render_widget(
            Fill {
                style: Style::default()
                    .bg(Color::Black)
                    .add_modifier(Modifier::DIM),
            },
            shadow,
        );
        f.render_widget(Clear, area);
    }
}

pub fn run_tui(cfg: &ConsoleConfig) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode().map_err(|e| Error::msg(e.to_string()))?;
    execute!(stdout, EnterAlternateScreen, Hide).map_err(|e| Error::msg(e.to_string()))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| Error::msg(e.to_string()))?;
    terminal
        .clear()
        .map_err(|e| Error::msg(format!("tui clear failed: {e}")))?;

    let result = App::new(cfg).and_then(|app| run_loop(&mut terminal, app));

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen, Show).ok();

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, mut app: App) -> Result<()> {
    let tick = Duration::from_millis(100);
    loop {
        app.drain_fetch_outcomes();
        terminal
            .draw(|f| app.draw(f))
            .map_err(|e| Error::msg(format!("draw error: {e}")))?;

        // Poll so fetch outcomes keep landing while the user is idle.
        if event::poll(tick).map_err(|e| Error::msg(e.to_string()))? {
            match event::read().map_err(|e| Error::msg(e.to_string()))? {
                Event::Key(k) => {
                    if k.kind != KeyEventKind::Press {
                        continue;
                    }
                    if app.handle_key(k.code, k.modifiers)? {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }
    Ok(())
}

fn parse_local_time_ms(raw: &str) -> Result<i64> {
    use chrono::TimeZone;
    let naive = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| Error::msg(format!("invalid time: {e}")))?;
    chrono::Local
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| Error::msg("ambiguous local time"))
}

/// Best-effort system clipboard; callers fall back to a manual-copy modal.
fn copy_to_clipboard(text: &str) -> Result<()> {
    let candidates: [(&str, &[&str]); 3] = [
        ("wl-copy", &[]),
        ("xclip", &["-selection", "clipboard"]),
        ("pbcopy", &[]),
    ];
    for (bin, args) in candidates {
        let spawned = Command::new(bin)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        let Ok(mut child) = spawned else {
            continue;
        };
        if let Some(stdin) = child.stdin.as_mut()
            && stdin.write_all(text.as_bytes()).is_err()
        {
            let _ = child.kill();
            continue;
        }
        drop(child.stdin.take());
        match child.wait() {
            Ok(status) if status.success() => return Ok(()),
            _ => continue,
        }
    }
    Err(Error::msg("no working clipboard helper found"))
}

fn centered_rect(
    percent_x: u16,
    percent_y: u16,
    r: ratatui::layout::Rect,
) -> ratatui::layout::Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let vertical = popup_layout[1];
    let popup_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical);
    popup_layout[1]
}

fn shadow_rect(
    inner: ratatui::layout::Rect,
    bounds: ratatui::layout::Rect,
) -> ratatui::layout::Rect {
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    let x = inner.x.saturating_add(1).min(max_x.saturating_sub(1));
    let y = inner.y.saturating_add(1).min(max_y.saturating_sub(1));
    let w = inner.width.min(max_x.saturating_sub(x));
    let h = inner.height.min(max_y.saturating_sub(y));
    ratatui::layout::Rect {
        x,
        y,
        width: w,
        height: h,
    }
}

struct Fill {
    style: Style,
}

impl Widget for Fill {
    fn render(self, area: ratatui::layout::Rect, buf: &mut Buffer) {
        for y in area.y..area.y.saturating_add(area.height) {
            for x in area.x..area.x.saturating_add(area.width) {
                buf[(x, y)].set_char(' ').set_style(self.style);
            }
        }
    }
}
