use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::game::{
    Board, ExitReason, Game, Menu, Mode, Position, Round, RoundStatus,
};

/// Columns reserved for the side panel
const PANEL_WIDTH: u16 = 30;
/// Every board cell is drawn two columns wide
const CELL_WIDTH: u16 = 2;

/// Outer board dimensions (wall ring included) that fit a terminal of
/// `cols` x `rows`. Must agree with the layout in `render`.
pub fn board_size(cols: u16, rows: u16) -> (i32, i32) {
    // Margin, board border, status line
    let inner_width = cols.saturating_sub(2 + PANEL_WIDTH + 2);
    let inner_height = rows.saturating_sub(2 + 1 + 2);
    (
        i32::from(inner_width / CELL_WIDTH) + 2,
        i32::from(inner_height) + 2,
    )
}

/// Terminal columns taken by the board block: two per interior cell plus
/// the border, which draws the wall ring.
fn board_columns(board: &Board) -> u16 {
    let interior = u16::try_from(board.width() - 2).unwrap_or(0);
    interior.saturating_mul(CELL_WIDTH).saturating_add(2)
}

pub fn render<B: Backend>(f: &mut Frame<B>, game: &Game) {
    let size = f.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(1),    // Board and side panel
            Constraint::Length(1), // Status line
        ].as_ref())
        .split(size);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(board_columns(game.board())),
            Constraint::Min(PANEL_WIDTH),
        ].as_ref())
        .split(chunks[0]);

    let board_area = render_board(f, game, columns[0]);
    render_side_panel(f, game, columns[1]);

    match game.mode {
        Mode::MainMenu => render_menu(f, game.main_menu(), board_area, Color::Green),
        Mode::MapSelect => render_menu(f, game.map_menu(), board_area, Color::Cyan),
        Mode::Options => render_options(f, game, board_area),
        Mode::Playing => {
            if let Some(round) = game.round().filter(|round| round.is_paused()) {
                render_menu(f, round.pause_menu(), board_area, Color::Yellow);
            }
        }
        Mode::RestartPrompt => render_restart_prompt(f, game, board_area),
        Mode::EndlessUnavailable => render_endless_notice(f, board_area),
    }

    render_status_line(f, game, chunks[1]);
}

/// Draw the board frame and, when a round exists, its contents.
/// Returns the inner area for overlays.
fn render_board<B: Backend>(f: &mut Frame<B>, game: &Game, area: Rect) -> Rect {
    let map_name = game
        .round()
        .map(|round| format!(" SNAKE | {} ", round.map().name()))
        .unwrap_or_else(|| " SNAKE ".to_string());

    // The block border stands in for the wall ring
    let board_block = Block::default()
        .title(map_name)
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let inner_area = board_block.inner(area);
    f.render_widget(board_block, area);

    if let Some(round) = game.round() {
        let paragraph = Paragraph::new(grid_lines(round)).alignment(Alignment::Left);
        f.render_widget(paragraph, inner_area);
    }

    inner_area
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Empty,
    Head,
    Body,
    Food,
    Obstacle,
}

fn cell_at(round: &Round, pos: Position) -> Cell {
    if round.snake().head() == pos {
        Cell::Head
    } else if round.snake().contains(pos) {
        Cell::Body
    } else if round.food() == pos {
        Cell::Food
    } else if round.map().is_obstacle(pos) {
        Cell::Obstacle
    } else {
        Cell::Empty
    }
}

fn cell_span(cell: Cell, dimmed: bool) -> Span<'static> {
    let span = match cell {
        Cell::Head => Span::styled(
            "██",
            Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD),
        ),
        Cell::Body => Span::styled("██", Style::default().fg(Color::Green)),
        Cell::Food => Span::styled("●●", Style::default().fg(Color::Red)),
        Cell::Obstacle => Span::styled("▓▓", Style::default().fg(Color::Gray)),
        Cell::Empty => Span::raw("  "),
    };
    if dimmed {
        Span::styled(span.content, span.style.add_modifier(Modifier::DIM))
    } else {
        span
    }
}

/// One line per interior row of the board.
fn grid_lines(round: &Round) -> Vec<Line<'static>> {
    let board: &Board = round.board();
    let dimmed = round.status() != RoundStatus::Running;

    (1..board.height() - 1)
        .map(|y| {
            let spans: Vec<Span> = (1..board.width() - 1)
                .map(|x| cell_span(cell_at(round, Position::new(x, y)), dimmed))
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn render_side_panel<B: Backend>(f: &mut Frame<B>, game: &Game, area: Rect) {
    let panel_block = Block::default()
        .title(" Info ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightBlue));

    let inner_area = panel_block.inner(area);
    f.render_widget(panel_block, area);

    let heading = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))
    };

    let mut text = vec![
        heading("Controls"),
        Line::from("  Arrows/WASD  steer"),
        Line::from("  P/Esc        pause"),
        Line::from("  F            speed up"),
        Line::from("  Q            quit round"),
        Line::from(""),
    ];

    if let Some(round) = game.round() {
        text.push(heading("Round"));
        text.push(Line::from(format!("  Points:     {}", round.score())));
        text.push(Line::from(format!("  Difficulty: {}", round.difficulty())));
        text.push(Line::from(format!("  Length:     {}", round.snake().len())));
        if round.is_fast() {
            text.push(Line::from(Span::styled(
                "  FAST",
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            )));
        }
        text.push(Line::from(""));
    }

    text.push(heading("Leaderboard"));
    for (rank, score) in game.leaderboard().scores().iter().enumerate() {
        text.push(Line::from(format!("  {}. {}", rank + 1, score)));
    }

    f.render_widget(Paragraph::new(text), inner_area);
}

/// A popup box of the given height, centred in `area`.
fn popup_area(rows: u16, area: Rect) -> Rect {
    let height = rows.min(area.height);
    let top = area.y + (area.height - height) / 2;
    let horizontal = centered_rect(60, 100, area);
    Rect::new(horizontal.x, top, horizontal.width, height)
}

fn menu_items<'a>(labels: impl Iterator<Item = &'a str>, selected: usize, color: Color) -> Vec<ListItem<'a>> {
    labels
        .enumerate()
        .map(|(i, label)| {
            if i == selected {
                ListItem::new(Line::from(Span::styled(
                    format!("> {}. {}", i + 1, label),
                    Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD),
                )))
            } else {
                ListItem::new(Line::from(format!("  {}. {}", i + 1, label)))
            }
        })
        .collect()
}

fn render_menu<B: Backend, T: Copy>(f: &mut Frame<B>, menu: &Menu<T>, area: Rect, color: Color) {
    let popup = popup_area(menu.len() as u16 + 2, area);
    f.render_widget(Clear, popup);

    let list = List::new(menu_items(menu.labels(), menu.selected_index(), color)).block(
        Block::default()
            .title(format!(" {} ", menu.title()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );

    f.render_widget(list, popup);
}

fn render_options<B: Backend>(f: &mut Frame<B>, game: &Game, area: Rect) {
    let options = game.options();
    let labels: Vec<String> = options
        .entries()
        .iter()
        .map(|entry| format!("{:<16} < {} >", entry.label, entry.display(&game.config)))
        .chain(std::iter::once("Back".to_string()))
        .collect();

    let popup = popup_area(labels.len() as u16 + 2, area);
    f.render_widget(Clear, popup);

    let items = menu_items(
        labels.iter().map(String::as_str),
        options.selected_index(),
        Color::Cyan,
    );
    let list = List::new(items).block(
        Block::default()
            .title(" Options - Left/Right to change ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(list, popup);
}

fn render_restart_prompt<B: Backend>(f: &mut Frame<B>, game: &Game, area: Rect) {
    let menu = game.restart_menu();
    let popup = popup_area(menu.len() as u16 + 5, area);
    f.render_widget(Clear, popup);

    let (headline, score) = match game.last_result() {
        Some((ExitReason::BoardCleared, score)) => ("Board cleared!", score),
        Some((_, score)) => ("Game Over!", score),
        None => ("Game Over!", 0),
    };

    let block = Block::default()
        .title(" GAME OVER ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)].as_ref())
        .split(inner);

    let summary = Paragraph::new(vec![Line::from(Span::styled(
        format!("{} Score: {}", headline, score),
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    ))])
    .alignment(Alignment::Center);
    f.render_widget(summary, parts[0]);

    f.render_widget(
        List::new(menu_items(menu.labels(), menu.selected_index(), Color::Red)),
        parts[1],
    );
}

fn render_endless_notice<B: Backend>(f: &mut Frame<B>, area: Rect) {
    let popup = popup_area(5, area);
    f.render_widget(Clear, popup);

    let paragraph = Paragraph::new(vec![
        Line::from("Endless mode is not available yet."),
        Line::from("Press Enter or Esc to return"),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(" ENDLESS ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );

    f.render_widget(paragraph, popup);
}

fn render_status_line<B: Backend>(f: &mut Frame<B>, game: &Game, area: Rect) {
    let mode_text = match game.mode {
        Mode::MainMenu => "MAIN MENU".to_string(),
        Mode::MapSelect => "SELECT MAP".to_string(),
        Mode::Options => "OPTIONS".to_string(),
        Mode::Playing => match game.round() {
            Some(round) if round.is_paused() => format!("PAUSED | Score: {}", round.score()),
            Some(round) => format!("PLAYING | Score: {}", round.score()),
            None => "PLAYING".to_string(),
        },
        Mode::RestartPrompt => "GAME OVER".to_string(),
        Mode::EndlessUnavailable => "ENDLESS".to_string(),
    };

    let status = match (game.notice(), game.mode) {
        (Some(notice), _) => format!("{} | {}", mode_text, notice),
        (None, Mode::Playing) => format!("{} | Arrows/WASD to steer | P: pause | F: speed", mode_text),
        (None, _) => format!("{} | Up/Down to move, Enter to select, 1-9 to jump, Esc to go back", mode_text),
    };

    let status_bar = Paragraph::new(status)
        .style(Style::default().bg(Color::LightBlue).fg(Color::Black).add_modifier(Modifier::BOLD));

    f.render_widget(status_bar, area);
}

// Helper function to create a centered rect using percentage of the available space
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
