/// Turn-based input reader.
///
/// The game advances one turn per keypress, so there is no held-key
/// tracking here: pending terminal events are drained non-blocking and
/// mapped to discrete actions in arrival order. Only Press/Repeat events
/// count; Release events are ignored outright.
///
/// Keys that map to nothing become `Unrecognized` — the simulation still
/// counts those as processed input events, so they must not be dropped.

use std::collections::VecDeque;
use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::sim::player::Move;

/// One discrete thing the player asked for.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum KeyAction {
    Step(Move),
    Unrecognized,
    Confirm,
    Restart,
    /// Debug warp to the boss level.
    WarpFinal,
    Quit,
}

pub struct InputQueue {
    pending: VecDeque<KeyAction>,
}

impl InputQueue {
    pub fn new() -> Self {
        InputQueue { pending: VecDeque::with_capacity(8) }
    }

    /// Drain all pending terminal events. Call once per frame.
    pub fn drain_events(&mut self) {
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    self.pending.push_back(map_key(key));
                }
            }
        }
    }

    /// Next queued action, if any.
    pub fn pop(&mut self) -> Option<KeyAction> {
        self.pending.pop_front()
    }
}

fn map_key(key: KeyEvent) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        return KeyAction::Quit;
    }
    match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Step(Move::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Step(Move::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Step(Move::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Step(Move::Right),
        KeyCode::Enter | KeyCode::Char(' ') => KeyAction::Confirm,
        KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
        KeyCode::Char('b') | KeyCode::Char('B') => KeyAction::WarpFinal,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
        _ => KeyAction::Unrecognized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_wasd_map_to_steps() {
        assert_eq!(map_key(press(KeyCode::Up)), KeyAction::Step(Move::Up));
        assert_eq!(map_key(press(KeyCode::Char('a'))), KeyAction::Step(Move::Left));
        assert_eq!(map_key(press(KeyCode::Char('S'))), KeyAction::Step(Move::Down));
        assert_eq!(map_key(press(KeyCode::Right)), KeyAction::Step(Move::Right));
    }

    #[test]
    fn ctrl_c_always_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(key), KeyAction::Quit);
    }

    #[test]
    fn unmapped_keys_are_kept_as_unrecognized() {
        assert_eq!(map_key(press(KeyCode::Char('x'))), KeyAction::Unrecognized);
        assert_eq!(map_key(press(KeyCode::Tab)), KeyAction::Unrecognized);
    }
}
