//! Layout and drawing: board, sidebar (moves, stopwatch, palette, outcome), pause overlay.

use crate::game::{GameState, Outcome, format_elapsed};
use crate::grid::color_name;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::collections::HashSet;
use std::time::Instant;
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};

/// Each cell is two terminal columns wide so the board looks square.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 28;
/// Border + stats + outcome + 8 palette rows + help.
const SIDEBAR_HEIGHT: u16 = 21;

/// Duration of the fade over uncaptured cells after a loss.
const LOSS_FADE_MS: u32 = 900;

/// Front-end state the renderer needs besides the game itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct View {
    pub cursor: usize,
    pub paused: bool,
    pub animate: bool,
}

/// Board with border, in terminal cells.
fn board_outer_size(grid_size: usize) -> (u16, u16) {
    let n = u16::try_from(grid_size).unwrap_or(u16::MAX);
    (
        n.saturating_mul(CELL_WIDTH).saturating_add(2),
        n.saturating_add(2),
    )
}

/// Board (outer) and sidebar rects, centred as one block in `area`.
fn layout(area: Rect, grid_size: usize) -> (Rect, Rect) {
    let (bw, bh) = board_outer_size(grid_size);
    let total_w = bw.saturating_add(SIDEBAR_WIDTH);
    let total_h = bh.max(SIDEBAR_HEIGHT);
    let x = area.x + area.width.saturating_sub(total_w) / 2;
    let y = area.y + area.height.saturating_sub(total_h) / 2;
    let board = Rect {
        x,
        y,
        width: bw.min(area.width),
        height: bh.min(area.height),
    };
    let sidebar_x = x.saturating_add(board.width);
    let sidebar = Rect {
        x: sidebar_x,
        y,
        width: SIDEBAR_WIDTH.min(area.right().saturating_sub(sidebar_x)),
        height: SIDEBAR_HEIGHT.min(area.height),
    };
    (board, sidebar)
}

/// Board inner rect (cells only, no border); matches draw_board layout.
pub fn board_rect(area: Rect, grid_size: usize) -> Rect {
    let (outer, _) = layout(area, grid_size);
    Rect {
        x: outer.x + 1,
        y: outer.y + 1,
        width: outer.width.saturating_sub(2),
        height: outer.height.saturating_sub(2),
    }
}

/// Cell index under terminal position (column, row), if any.
pub fn cell_at(area: Rect, grid_size: usize, column: u16, row: u16) -> Option<usize> {
    let board = board_rect(area, grid_size);
    if !board.contains(Position::new(column, row)) {
        return None;
    }
    let col = ((column - board.x) / CELL_WIDTH) as usize;
    let row = (row - board.y) as usize;
    (col < grid_size && row < grid_size).then(|| row * grid_size + col)
}

/// Draw the board, sidebar and overlays. When the game is lost and `view.animate` is set,
/// runs the TachyonFX fade and updates `loss_effect` / `loss_effect_process_time`.
pub fn draw(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    view: View,
    loss_effect: &mut Option<Effect>,
    loss_effect_process_time: &mut Option<Instant>,
    now: Instant,
) {
    let area = frame.area();
    let lost = state.outcome() == Outcome::Lost;
    let faded = lost && (!view.animate || loss_effect.as_ref().is_some_and(|e| e.done()));

    draw_board(frame, state, theme, area, view.cursor, faded);
    draw_sidebar(frame, state, theme, area);
    if lost && !faded {
        apply_loss_effect(
            frame,
            state,
            theme,
            area,
            loss_effect,
            loss_effect_process_time,
            now,
        );
    }
    if view.paused {
        draw_pause_overlay(frame, theme, area);
    }
}

fn draw_board(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    area: Rect,
    cursor: usize,
    faded: bool,
) {
    let grid = state.grid();
    let (outer, _) = layout(area, grid.size());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" Flood-It ", Style::default().fg(theme.title)));
    let inner = block.inner(outer);
    block.render(outer, frame.buffer_mut());

    let buf = frame.buffer_mut();
    for (index, cell) in grid.cells().iter().enumerate() {
        let (row, col) = grid.position(index);
        let x = inner.x as usize + col * CELL_WIDTH as usize;
        let y = inner.y as usize + row;
        if x + CELL_WIDTH as usize > inner.right() as usize || y >= inner.bottom() as usize {
            continue;
        }
        let color = if faded && !state.is_controlled(index) {
            theme.inactive_fg
        } else {
            theme.flood_color(cell.color)
        };
        let (symbols, style) = if index == cursor {
            (
                ["[", "]"],
                Style::default()
                    .fg(theme.bg)
                    .bg(color)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            (["█", "█"], Style::default().fg(color).bg(theme.bg))
        };
        for (dx, symbol) in symbols.into_iter().enumerate() {
            buf[((x + dx) as u16, y as u16)]
                .set_symbol(symbol)
                .set_style(style);
        }
    }
}

/// Buffer positions of every cell the player never captured.
fn uncaptured_buffer_positions(board: Rect, state: &GameState) -> HashSet<(u16, u16)> {
    let grid = state.grid();
    let mut set = HashSet::new();
    for index in (0..grid.len()).filter(|&i| !state.is_controlled(i)) {
        let (row, col) = grid.position(index);
        let x0 = board.x as usize + col * CELL_WIDTH as usize;
        let y = board.y as usize + row;
        for x in x0..x0 + CELL_WIDTH as usize {
            if x < board.right() as usize && y < board.bottom() as usize {
                set.insert((x as u16, y as u16));
            }
        }
    }
    set
}

/// Create or update the loss fade and process it (TachyonFX: dim uncaptured cells).
fn apply_loss_effect(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    area: Rect,
    loss_effect: &mut Option<Effect>,
    loss_effect_process_time: &mut Option<Instant>,
    now: Instant,
) {
    let board = board_rect(area, state.grid().size());
    let delta = loss_effect_process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    let tfx_delta = TfxDuration::from_millis(delta_ms);
    *loss_effect_process_time = Some(now);

    if loss_effect.is_none() {
        let leftover = uncaptured_buffer_positions(board, state);
        let filter = CellFilter::PositionFn(ref_count(move |pos: Position| {
            leftover.contains(&(pos.x, pos.y))
        }));
        let effect = fx::fade_to(
            theme.inactive_fg,
            theme.bg,
            (LOSS_FADE_MS, Interpolation::Linear),
        )
        .with_filter(filter)
        .with_area(board);
        *loss_effect = Some(effect);
    }

    if let Some(effect) = loss_effect {
        frame.render_effect(effect, board, tfx_delta);
    }
}

fn outcome_line(state: &GameState) -> Line<'static> {
    match state.outcome() {
        Outcome::Won => Line::from(Span::styled(
            " You win ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Outcome::Lost => Line::from(Span::styled(
            " You lose ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        Outcome::Ongoing if state.is_revealing() => Line::from(" flooding… "),
        Outcome::Ongoing => Line::from(""),
    }
}

fn draw_sidebar(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let (_, outer) = layout(area, state.grid().size());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg));
    let inner = block.inner(outer);
    block.render(outer, frame.buffer_mut());

    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let key_style = Style::default().fg(theme.flood_color(2));

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Moves: ", title_style),
            Span::styled(
                format!("{}/{}", state.moves_used(), state.budget()),
                fg_style,
            ),
        ]),
        Line::from(vec![
            Span::styled("Time:  ", title_style),
            Span::styled(format_elapsed(state.elapsed()), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Owned: ", title_style),
            Span::styled(
                format!("{}/{}", state.region().len(), state.grid().len()),
                fg_style,
            ),
        ]),
        outcome_line(state),
        Line::from(Span::styled("Colours", title_style)),
    ];
    for color in 0..state.palette_len() {
        let marker = if color == state.current_color() { "◀" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", color + 1), key_style),
            Span::styled("██", Style::default().fg(theme.flood_color(color))),
            Span::styled(format!(" {:<8}{}", color_name(color), marker), fg_style),
        ]));
    }
    lines.extend([
        Line::from(""),
        Line::from(vec![
            Span::styled(" 1-8 ", key_style),
            Span::from("colour  "),
            Span::styled(" ←↑↓→ ", key_style),
            Span::from("cursor"),
        ]),
        Line::from(vec![
            Span::styled(" ENTER ", key_style),
            Span::from("/ click pick"),
        ]),
        Line::from(vec![
            Span::styled(" R ", key_style),
            Span::from("new  "),
            Span::styled(" P ", key_style),
            Span::from("pause  "),
            Span::styled(" Q ", key_style),
            Span::from("quit"),
        ]),
    ]);
    Paragraph::new(Text::from(lines)).render(inner, frame.buffer_mut());
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup_w = 28u16;
    let popup_h = 5u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(Span::styled(
            " P: resume    Q: quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    );
    p.render(popup, frame.buffer_mut());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::time::Duration;

    fn game(grid_size: usize, num_colors: u8) -> GameState {
        GameState::new(GameConfig {
            grid_size,
            num_colors,
            difficulty: 3,
            tick_interval: Duration::from_millis(10),
            seed: 5,
        })
        .unwrap()
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_cell_at_maps_two_columns_per_cell() {
        let area = Rect::new(0, 0, 80, 30);
        let board = board_rect(area, 4);
        assert_eq!((board.width, board.height), (8, 4));
        assert_eq!(cell_at(area, 4, board.x, board.y), Some(0));
        assert_eq!(cell_at(area, 4, board.x + 1, board.y), Some(0));
        assert_eq!(cell_at(area, 4, board.x + 2, board.y + 1), Some(5));
        assert_eq!(cell_at(area, 4, board.x + 7, board.y + 3), Some(15));
    }

    #[test]
    fn test_cell_at_outside_board() {
        let area = Rect::new(0, 0, 80, 30);
        let board = board_rect(area, 4);
        assert_eq!(cell_at(area, 4, board.x - 1, board.y), None);
        assert_eq!(cell_at(area, 4, board.x + 8, board.y), None);
        assert_eq!(cell_at(area, 4, board.x, board.y + 4), None);
    }

    #[test]
    fn test_draw_shows_counters_and_palette() {
        let state = game(22, 6);
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();
        let view = View {
            cursor: 0,
            paused: false,
            animate: false,
        };
        terminal
            .draw(|f| draw(f, &state, &theme, view, &mut None, &mut None, Instant::now()))
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Moves: 0/42"));
        assert!(text.contains("Time:  0:00"));
        assert!(text.contains("magenta"));
        assert!(!text.contains("orange"));
        assert!(text.contains("Flood-It"));
    }

    #[test]
    fn test_draw_pause_overlay() {
        let state = game(5, 3);
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(60, 24)).unwrap();
        let view = View {
            cursor: 3,
            paused: true,
            animate: true,
        };
        terminal
            .draw(|f| draw(f, &state, &theme, view, &mut None, &mut None, Instant::now()))
            .unwrap();
        assert!(screen_text(&terminal).contains("Paused"));
    }
}
