// Terminal frontend
// Maps crossterm input to game events and renders every screen with ratatui

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

use minehunt::mh_campaign::MineSelector;
use minehunt::mh_lang::Lang;
use minehunt::{
    Action, Banner, BoardGeometry, CellView, Control, Frontend, InputEvent, Level, Screen,
};

use crate::mh_color::Theme;

/// Cell glyphs: hidden, revealed-empty and revealed-mine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub hidden: &'static str,
    pub empty: &'static str,
    pub mine: &'static str,
}

impl Glyphs {
    pub fn new(ascii: bool) -> Self {
        if ascii {
            Glyphs { hidden: "*", empty: "E", mine: "M" }
        } else {
            Glyphs { hidden: "■", empty: "·", mine: "☼" }
        }
    }
}

/// Translate a crossterm event into a game input
/// Ctrl+C is the global quit; key releases and repeats are ignored
pub fn translate(event: Event) -> Option<InputEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => translate_key(key),
        Event::Mouse(me) => match me.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::Click {
                x: me.column,
                y: me.row,
            }),
            _ => None,
        },
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<InputEvent> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('c' | 'C')) {
        return Some(InputEvent::Quit);
    }
    let action = match key.code {
        KeyCode::Up => Action::Up,
        KeyCode::Down => Action::Down,
        KeyCode::Left => Action::Left,
        KeyCode::Right => Action::Right,
        KeyCode::Char(' ') => Action::Reveal,
        KeyCode::Enter => Action::Confirm,
        KeyCode::Char('p' | 'P') => Action::Pause,
        KeyCode::Char('r' | 'R') => Action::Resume,
        KeyCode::Char('q' | 'Q') => Action::Quit,
        KeyCode::Char('m' | 'M') => Action::Menu,
        _ => return None,
    };
    Some(InputEvent::Key(action))
}

/// Crossterm/ratatui implementation of the game frontend
/// Theme, glyphs and language are fixed at construction
pub struct TerminalFrontend {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    lang: Lang,
    theme: Theme,
    glyphs: Glyphs,
    geometry: BoardGeometry, // Must match the layout drawn by draw_level
}

impl TerminalFrontend {
    /// Switch the terminal to raw mode, alternate screen and mouse capture
    /// Raw mode is undone again if any later step fails
    pub fn enter(lang: Lang, theme: Theme, glyphs: Glyphs) -> io::Result<Self> {
        enable_raw_mode()?;
        let terminal = or_restore(open_terminal(), || {
            disable_raw_mode()?;
            execute!(io::stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen)
        })?;
        Ok(TerminalFrontend {
            terminal,
            lang,
            theme,
            glyphs,
            geometry: BoardGeometry::TERMINAL,
        })
    }

    /// Restore the terminal; call on every exit path
    pub fn exit(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), DisableMouseCapture, terminal::LeaveAlternateScreen)?;
        self.terminal.show_cursor()
    }
}

fn open_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnableMouseCapture, terminal::EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Run `restore` when `result` is an error; the original error is kept
fn or_restore<T>(result: io::Result<T>, restore: impl FnOnce() -> io::Result<()>) -> io::Result<T> {
    if result.is_err() {
        // best effort, the setup error is the one worth reporting
        let _ = restore();
    }
    result
}

impl Frontend for TerminalFrontend {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn geometry(&self) -> BoardGeometry {
        self.geometry
    }

    fn poll(&mut self, timeout: Duration) -> io::Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        if event::poll(timeout)? {
            // drain everything already queued so it is handled in one iteration
            loop {
                if let Some(e) = translate(event::read()?) {
                    events.push(e);
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }
        Ok(events)
    }

    fn draw(&mut self, screen: Screen<'_>) -> io::Result<()> {
        let TerminalFrontend { terminal, lang, theme, glyphs, geometry } = self;
        terminal.draw(|f| match screen {
            Screen::MineSelect(selector) => draw_selector(f, lang, theme, selector),
            Screen::Playing { level, now } => {
                draw_level(f, lang, theme, glyphs, geometry, level, level.time_left(now))
            }
            Screen::Paused { .. } => draw_paused(f, lang, theme),
            Screen::Banner(banner) => draw_banner(f, lang, theme, banner),
            Screen::Replay(banner) => draw_replay(f, lang, theme, banner),
        })?;
        Ok(())
    }

    fn hold(&mut self, duration: Duration) -> io::Result<Control> {
        let deadline = Instant::now() + duration;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                return Ok(Control::Continue);
            }
            // input during a banner is swallowed, except the global quit
            if event::poll(left)? && translate(event::read()?) == Some(InputEvent::Quit) {
                return Ok(Control::Exit);
            }
        }
    }
}

fn draw_selector<B: Backend>(
    f: &mut Frame<B>,
    lang: &Lang,
    theme: &Theme,
    selector: &MineSelector,
) {
    let a = &lang.assets;
    let title_style = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
    let lines = vec![
        Spans::from(Span::styled(a.title, title_style)),
        Spans::from(Span::raw("")),
        Spans::from(Span::raw(a.select_prompt)),
        Spans::from(Span::styled(
            selector.num_mines().to_string(),
            Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD),
        )),
        Spans::from(Span::raw("")),
        Spans::from(Span::raw(a.select_up)),
        Spans::from(Span::raw(a.select_down)),
        Spans::from(Span::styled(a.select_start, Style::default().fg(theme.success))),
    ];
    draw_message(f, None, lines);
}

fn draw_paused<B: Backend>(f: &mut Frame<B>, lang: &Lang, theme: &Theme) {
    let a = &lang.assets;
    let title_style = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
    let lines = vec![
        Spans::from(Span::styled(a.pause_title, title_style)),
        Spans::from(Span::raw("")),
        Spans::from(Span::raw(a.pause_resume)),
        Spans::from(Span::raw(a.pause_quit)),
    ];
    draw_message(f, None, lines);
}

fn draw_banner<B: Backend>(f: &mut Frame<B>, lang: &Lang, theme: &Theme, banner: Banner) {
    let lines = vec![banner_line(lang, theme, banner)];
    draw_message(f, Some(lang.assets.title), lines);
}

/// Final result plus the restart / selector / quit choices
fn draw_replay<B: Backend>(f: &mut Frame<B>, lang: &Lang, theme: &Theme, banner: Banner) {
    let a = &lang.assets;
    let lines = vec![
        banner_line(lang, theme, banner),
        Spans::from(Span::raw("")),
        Spans::from(Span::styled(a.replay_restart, Style::default().fg(theme.success))),
        Spans::from(Span::raw(a.replay_menu)),
        Spans::from(Span::raw(a.replay_quit)),
    ];
    draw_message(f, Some(a.title), lines);
}

fn banner_line(lang: &Lang, theme: &Theme, banner: Banner) -> Spans<'static> {
    let a = &lang.assets;
    let (text, color) = match banner {
        Banner::HitMine => (a.hit_mine.to_string(), theme.failure),
        Banner::LevelComplete => (a.level_complete.to_string(), theme.success),
        Banner::TimesUp => (a.times_up.to_string(), theme.failure),
        Banner::GameOver { coins } => (lang.game_over(coins), theme.failure),
        Banner::Victory { coins } => (lang.victory(coins), theme.success),
    };
    Spans::from(Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD)))
}

/// Bordered block of centered lines in the middle of the screen
fn draw_message<B: Backend>(f: &mut Frame<B>, title: Option<&str>, lines: Vec<Spans>) {
    let area = f.size();
    let text_w = lines.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
    let rect = center_rect(text_w + 6, lines.len() as u16 + 4, area);
    let mut block = Block::default().borders(Borders::ALL);
    if let Some(title) = title {
        block = block.title(title).title_alignment(Alignment::Center);
    }
    let mut padded = vec![Spans::from(Span::raw(""))];
    padded.extend(lines);
    let paragraph = Paragraph::new(Text::from(padded)).block(block).alignment(Alignment::Center);
    f.render_widget(Clear, area);
    f.render_widget(paragraph, rect);
}

fn draw_level<B: Backend>(
    f: &mut Frame<B>,
    lang: &Lang,
    theme: &Theme,
    glyphs: &Glyphs,
    geometry: &BoardGeometry,
    level: &Level,
    time_left: u64,
) {
    let area = f.size();
    let size = level.size();
    let (board_w, board_h) = geometry.board_extent(size);
    let header_text = lang.header(level.number(), level.coins(), time_left);
    let hint = lang.assets.header_hint;

    // layout: header band, bordered board directly below it, controls line
    // the board border occupies the header's last row and the left offset column
    let header_h = geometry.header.saturating_sub(geometry.left);
    let header_w = (header_text.as_str().width() + hint.width() + 3) as u16;
    let min_w = (board_w + geometry.left * 2).max(header_w);
    let min_h = geometry.header + board_h + geometry.left + 1;
    if area.width < min_w || area.height < min_h {
        draw_too_small(f, lang, min_w, min_h);
        return;
    }

    // header row (level/coins/time on the left, pause hint right-aligned)
    let header_rect = Rect::new(0, 0, min_w, header_h);
    let inner_w = header_rect.width.saturating_sub(2) as usize;
    let used = header_text.as_str().width() + hint.width();
    let mid_spaces = inner_w.saturating_sub(used).max(1);
    let header = Paragraph::new(Spans::from(vec![
        Span::styled(header_text, Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
        Span::raw(" ".repeat(mid_spaces)),
        Span::styled(hint, Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
    ]))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Left);
    f.render_widget(header, header_rect);

    // board
    let board_bg = Style::default().bg(theme.board_bg);
    let gap = " ".repeat(geometry.gap_x as usize);
    let mut lines: Vec<Spans> = Vec::with_capacity(board_h as usize);
    for row in 0..size {
        for _ in 0..geometry.gap_y {
            lines.push(Spans::from(Span::styled(" ".repeat(board_w as usize), board_bg)));
        }
        for line in 0..geometry.box_h {
            let mut spans = Vec::with_capacity(size * 2 + 1);
            for col in 0..size {
                let (glyph, fg, bg) = match level.cell_view((row, col)) {
                    CellView::Hidden => (glyphs.hidden, theme.hidden_fg, theme.hidden_bg),
                    CellView::Empty => (glyphs.empty, theme.cell_fg, theme.empty_bg),
                    CellView::Mine => (glyphs.mine, theme.cell_fg, theme.mine_bg),
                };
                let mut style = Style::default().fg(fg).bg(bg);
                if level.cursor() == (row, col) {
                    style = style.bg(theme.cursor_bg);
                }
                let label = if line == geometry.box_h / 2 { glyph } else { "" };
                spans.push(Span::styled(gap.clone(), board_bg));
                spans.push(Span::styled(pad_center(label, geometry.box_w as usize), style));
            }
            // trailing gap so the right edge uses the board background
            spans.push(Span::styled(gap.clone(), board_bg));
            lines.push(Spans::from(spans));
        }
    }
    let border = geometry.left * 2;
    let board_rect = Rect::new(0, header_h, board_w + border, board_h + border);
    let board = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);
    f.render_widget(board, board_rect);

    // controls line under the board
    let controls_rect = Rect::new(0, board_rect.y + board_rect.height, min_w, 1);
    let controls_style = Style::default().fg(theme.text);
    let controls = Paragraph::new(Span::styled(lang.assets.controls, controls_style));
    f.render_widget(controls, controls_rect);
}

fn draw_too_small<B: Backend>(f: &mut Frame<B>, lang: &Lang, min_w: u16, min_h: u16) {
    let size = f.size();
    let warn_lines = vec![
        Spans::from(Span::raw(lang.assets.tsmsg_line1)),
        Spans::from(Span::raw(lang.min_size(min_w, min_h))),
    ];
    let warn = Paragraph::new(Text::from(warn_lines))
        .block(Block::default().borders(Borders::ALL).title(lang.assets.tsmsg_title))
        .alignment(Alignment::Center);
    // clear screen and render warning centered
    f.render_widget(Clear, size);
    let w = 40u16.min(size.width.saturating_sub(2));
    let h = 5u16.min(size.height.saturating_sub(2));
    f.render_widget(warn, center_rect(w, h, size));
}

/// Center `s` within `width` columns
fn pad_center(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(s.width());
    let left = pad / 2;
    format!("{}{}{}", " ".repeat(left), s, " ".repeat(pad - left))
}

/// Rect of at most width x height centered in r
fn center_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    let x = r.x + (r.width - width) / 2;
    let y = r.y + (r.height - height) / 2;
    Rect::new(x, y, width, height)
}
