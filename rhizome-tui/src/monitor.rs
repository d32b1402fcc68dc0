use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use rhizome_core::EngineStats;
use rhizome_probe::{Node, NodeKind};
use std::io;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::mpsc;

/// Messages flowing from the scan driver into the monitor.
#[derive(Debug, Clone)]
pub enum ScanMessage {
    /// Background scan started with a session id.
    SessionStarted { session_id: String, domain: String },
    /// A node entered the graph.
    Discovered { node: Node },
    /// Fresh engine counters.
    Progress { stats: EngineStats },
    /// Log message.
    Log { level: LogLevel, message: String },
    /// Scan stopped or drained.
    Complete { nodes: usize, edges: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// TUI state for watching a background scan fill the graph.
pub struct ScanMonitor {
    discoveries: Vec<Node>,
    logs: Vec<(LogLevel, String)>,
    stats: EngineStats,
    session_id: Option<String>,
    domain: Option<String>,
    is_complete: bool,
    scroll_discoveries: usize,
    follow_tail: bool,
    rx: mpsc::UnboundedReceiver<ScanMessage>,
}

impl ScanMonitor {
    pub fn new(rx: mpsc::UnboundedReceiver<ScanMessage>) -> Self {
        Self {
            discoveries: Vec::new(),
            logs: Vec::new(),
            stats: EngineStats::default(),
            session_id: None,
            domain: None,
            is_complete: false,
            scroll_discoveries: 0,
            follow_tail: true,
            rx,
        }
    }

    /// Drain all pending messages without blocking.
    fn process_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                ScanMessage::SessionStarted { session_id, domain } => {
                    self.session_id = Some(session_id);
                    self.domain = Some(domain);
                }
                ScanMessage::Discovered { node } => {
                    self.discoveries.push(node);
                    // Keep only the last 1000 to bound memory.
                    if self.discoveries.len() > 1000 {
                        let excess = self.discoveries.len() - 1000;
                        self.discoveries.drain(0..excess);
                        self.scroll_discoveries = self.scroll_discoveries.saturating_sub(excess);
                    }
                }
                ScanMessage::Progress { stats } => {
                    self.stats = stats;
                }
                ScanMessage::Log { level, message } => {
                    self.logs.push((level, message));
                    if self.logs.len() > 500 {
                        let excess = self.logs.len() - 500;
                        self.logs.drain(0..excess);
                    }
                }
                ScanMessage::Complete { nodes, edges } => {
                    self.is_complete = true;
                    self.logs.push((
                        LogLevel::Info,
                        format!("Scan complete: {} nodes, {} edges", nodes, edges),
                    ));
                }
            }
        }
    }

    fn node_color(kind: NodeKind) -> Color {
        match kind {
            NodeKind::Domain => Color::Blue,
            NodeKind::IpV4 => Color::Yellow,
            NodeKind::IpV6 => Color::Red,
            NodeKind::Tld => Color::Magenta,
            NodeKind::Service => Color::Cyan,
            NodeKind::Text => Color::Gray,
        }
    }

    fn render_discoveries(&self, f: &mut Frame, area: Rect) {
        let title = format!(" Discovered ({}) ", self.discoveries.len());
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(area);
        f.render_widget(block, area);

        if self.discoveries.is_empty() {
            let empty_msg = Paragraph::new("Nothing yet... probes are out")
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true });
            f.render_widget(empty_msg, inner);
            return;
        }

        let height = inner.height as usize;
        let total = self.discoveries.len();

        // Follow the tail unless the user scrolled away.
        let scroll_offset = if self.follow_tail {
            total.saturating_sub(height)
        } else {
            self.scroll_discoveries.min(total.saturating_sub(height))
        };

        let items: Vec<ListItem> = self
            .discoveries
            .iter()
            .skip(scroll_offset)
            .take(height)
            .map(|node| {
                let text = format!("{} ({})", node.value, node.kind.as_str());
                ListItem::new(text).style(Style::default().fg(Self::node_color(node.kind)))
            })
            .collect();

        f.render_widget(List::new(items), inner);
    }

    fn render_progress(&self, f: &mut Frame, area: Rect) {
        let (title, border_color) = if self.is_complete {
            (" Complete ", Color::Green)
        } else {
            (" Scanning ", Color::Yellow)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(border_color));

        let inner = block.inner(area);
        f.render_widget(block, area);

        let mut text = Vec::new();
        if let Some(ref domain) = self.domain {
            text.push(Line::from(vec![
                Span::styled("Root: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    domain.clone(),
                    Style::default()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
        }
        if let Some(ref session_id) = self.session_id {
            text.push(Line::from(vec![
                Span::styled("Session: ", Style::default().fg(Color::DarkGray)),
                Span::styled(session_id.clone(), Style::default().fg(Color::Cyan)),
            ]));
        }
        text.push(Line::from(""));
        text.push(Line::from(format!(
            "Nodes: {}   Edges: {}",
            self.stats.nodes, self.stats.edges
        )));
        text.push(Line::from(format!(
            "Expanded: {}   Pending: {}   In flight: {}",
            self.stats.visited, self.stats.pending, self.stats.in_flight
        )));

        f.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), inner);
    }

    fn render_logs(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Logs ")
            .border_style(Style::default().fg(Color::Magenta));

        let inner = block.inner(area);
        f.render_widget(block, area);

        let height = inner.height as usize;
        let total = self.logs.len();

        // The log panel always follows the tail.
        let scroll_offset = total.saturating_sub(height);

        let items: Vec<ListItem> = self
            .logs
            .iter()
            .skip(scroll_offset)
            .take(height)
            .map(|(level, message)| {
                let (prefix, style) = match level {
                    LogLevel::Info => ("INFO ", Style::default().fg(Color::Blue)),
                    LogLevel::Warn => ("WARN ", Style::default().fg(Color::Yellow)),
                    LogLevel::Error => ("ERROR", Style::default().fg(Color::Red)),
                };
                ListItem::new(format!("[{}] {}", prefix, message)).style(style)
            })
            .collect();

        f.render_widget(List::new(items), inner);
    }

    fn render_hints(&self, f: &mut Frame, area: Rect) {
        let hints = Line::from(vec![
            Span::styled(" q/ESC ", Style::default().fg(Color::Black).bg(Color::Gray)),
            Span::raw(if self.is_complete {
                " Exit  "
            } else {
                " Stop & exit  "
            }),
            Span::styled(" ↑/↓ ", Style::default().fg(Color::Black).bg(Color::Gray)),
            Span::raw(" Scroll  "),
            Span::styled(
                " PgUp/PgDn ",
                Style::default().fg(Color::Black).bg(Color::Gray),
            ),
            Span::raw(" Page  "),
            Span::styled(
                " Home/End ",
                Style::default().fg(Color::Black).bg(Color::Gray),
            ),
            Span::raw(" Top/Bottom"),
        ]);

        let paragraph = Paragraph::new(hints).style(Style::default().bg(Color::Black).fg(Color::Gray));
        f.render_widget(paragraph, area);
    }
}

/// Run the scan monitor (blocking; run it on a dedicated thread).
pub fn run_monitor(
    rx: mpsc::UnboundedReceiver<ScanMessage>,
    should_exit: Arc<AtomicBool>,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut monitor = ScanMonitor::new(rx);

    loop {
        monitor.process_messages();

        terminal.draw(|f| {
            let size = f.area();

            let vertical_chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Min(10),   // Main area
                    Constraint::Length(1), // Hints bar
                ])
                .split(size);

            let main_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(60), // Discoveries (left)
                    Constraint::Percentage(40), // Progress + logs (right)
                ])
                .split(vertical_chunks[0]);

            let right_chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(8), // Progress (top right)
                    Constraint::Min(10),   // Logs (bottom right)
                ])
                .split(main_chunks[1]);

            monitor.render_discoveries(f, main_chunks[0]);
            monitor.render_progress(f, right_chunks[0]);
            monitor.render_logs(f, right_chunks[1]);
            monitor.render_hints(f, vertical_chunks[1]);
        })?;

        if should_exit.load(Ordering::Relaxed) {
            break;
        }

        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    break;
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    break;
                }
                KeyCode::Up => {
                    monitor.follow_tail = false;
                    monitor.scroll_discoveries = monitor.scroll_discoveries.saturating_sub(1);
                }
                KeyCode::Down => {
                    let max_scroll = monitor.discoveries.len().saturating_sub(1);
                    monitor.scroll_discoveries = (monitor.scroll_discoveries + 1).min(max_scroll);
                }
                KeyCode::PageUp => {
                    monitor.follow_tail = false;
                    monitor.scroll_discoveries = monitor.scroll_discoveries.saturating_sub(10);
                }
                KeyCode::PageDown => {
                    let max_scroll = monitor.discoveries.len().saturating_sub(1);
                    monitor.scroll_discoveries = (monitor.scroll_discoveries + 10).min(max_scroll);
                }
                KeyCode::Home => {
                    monitor.follow_tail = false;
                    monitor.scroll_discoveries = 0;
                }
                KeyCode::End => {
                    monitor.follow_tail = true;
                }
                _ => {}
            }
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

/// Create a channel pair for scan monitoring.
pub fn create_monitor_channel() -> (
    mpsc::UnboundedSender<ScanMessage>,
    mpsc::UnboundedReceiver<ScanMessage>,
) {
    mpsc::unbounded_channel()
}
