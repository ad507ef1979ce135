//! Terminal front-end for Chordpad
//!
//! Shows the current chord set as a grid of split buttons and forwards
//! number keys and mouse presses to the voice engine.

mod grid;
mod pad;

pub use grid::{half_areas, hit_test, PadGrid};
pub use pad::{Half, KeyAction, TriggerPad};

use std::io::Stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::engine::{EngineState, VoiceEngine};

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Run the interactive pad until the user quits
///
/// Every sound still held on exit is released so it fades rather than cuts.
pub fn run_ui(engine: &mut VoiceEngine) -> Result<()> {
    // Key releases need the kitty keyboard protocol; without it keys latch
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut pad = TriggerPad::new(!enhanced);
    let result = event_loop(&mut terminal, engine, &mut pad);
    pad.release_all(engine);

    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop(terminal: &mut Term, engine: &mut VoiceEngine, pad: &mut TriggerPad) -> Result<()> {
    let mut grid_area = Rect::default();

    loop {
        let state = engine.state();
        terminal.draw(|f| {
            grid_area = draw_ui(f, pad, state);
        })?;

        if !event::poll(Duration::from_millis(16))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) => {
                if handle_key(engine, pad, key) {
                    break;
                }
            }
            Event::Mouse(mouse) => handle_mouse(engine, pad, grid_area, mouse),
            _ => {}
        }
    }

    Ok(())
}

/// Returns true when the user asked to quit
fn handle_key(engine: &mut VoiceEngine, pad: &mut TriggerPad, key: KeyEvent) -> bool {
    let action = match key.kind {
        KeyEventKind::Press => KeyAction::Press,
        KeyEventKind::Repeat => KeyAction::Repeat,
        KeyEventKind::Release => KeyAction::Release,
    };

    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => action == KeyAction::Press,
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => action == KeyAction::Press,
        (KeyCode::Tab, _) => {
            if action == KeyAction::Press {
                pad.toggle_set(engine);
            }
            false
        }
        (KeyCode::Char(ch), _) => {
            pad.key(engine, ch, action);
            false
        }
        _ => false,
    }
}

fn handle_mouse(engine: &mut VoiceEngine, pad: &mut TriggerPad, grid_area: Rect, mouse: MouseEvent) {
    let target = hit_test(grid_area, mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => pad.pointer_down(engine, target),
        MouseEventKind::Drag(MouseButton::Left) => pad.pointer_moved(engine, target),
        MouseEventKind::Up(MouseButton::Left) => pad.pointer_up(engine),
        _ => {}
    }
}

/// Draw the pad; returns the grid's area for hit testing
fn draw_ui(f: &mut Frame, pad: &TriggerPad, state: EngineState) -> Rect {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),      // Grid
            Constraint::Length(3),   // Status
        ])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Set {} ", pad.set_index() + 1));
    let grid_area = block.inner(chunks[0]);
    f.render_widget(PadGrid::new(pad).block(block), chunks[0]);

    draw_status(f, chunks[1], pad, state);

    grid_area
}

fn draw_status(f: &mut Frame, area: Rect, pad: &TriggerPad, state: EngineState) {
    let (label, color) = match state {
        EngineState::Uninitialized => ("PRESS A KEY", Color::Gray),
        EngineState::Suspended => ("SUSPENDED", Color::Yellow),
        EngineState::Running => ("AUDIO ON", Color::Green),
        EngineState::Unavailable => ("NO AUDIO", Color::Red),
    };
    let mode = if pad.is_latching() { "keys toggle" } else { "hold keys" };

    let text = Line::from(vec![
        Span::raw("  "),
        Span::styled(label, Style::default().fg(color)),
        Span::raw(format!("  |  1-8: play ({})  |  Tab: switch set  |  q: quit", mode)),
    ]);

    let paragraph = Paragraph::new(text).block(Block::default().borders(Borders::ALL));

    f.render_widget(paragraph, area);
}
