// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Input events and what they do to the view.

use std::collections::VecDeque;

/// Pixels the view moves per pan key, at the current scale.
pub const PAN_STEP: f64 = 20.0;

/// An event from the window or a script.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// The window was closed.
    Quit,
    /// A key went down.
    KeyDown {
        /// The key, as the character it types.
        code: char,
        /// Modifier bitmask from the window system.
        modifiers: u32,
    },
    /// A key came up.
    KeyUp {
        /// The key, as the character it types.
        code: char,
        /// Modifier bitmask from the window system.
        modifiers: u32,
    },
    /// A mouse button went down.
    MouseDown {
        /// Column.
        x: u32,
        /// Row.
        y: u32,
        /// Button number.
        button: u32,
    },
    /// A mouse button came up.
    MouseUp {
        /// Column.
        x: u32,
        /// Row.
        y: u32,
        /// Button number.
        button: u32,
    },
    /// The pointer moved.
    MouseMove {
        /// Column.
        x: u32,
        /// Row.
        y: u32,
    },
}

impl InputEvent {
    /// A key press with no modifiers.
    pub fn key(code: char) -> Self {
        InputEvent::KeyDown { code, modifiers: 0 }
    }
}

/// What an event asks the coordinator to do.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    /// Multiply the scale by the factor.
    Zoom(f64),
    /// Move the view by whole pan steps; the coordinator turns steps
    /// into offsets at the current scale.
    Pan {
        /// Steps right (negative is left).
        dx: f64,
        /// Steps down (negative is up).
        dy: f64,
    },
    /// Leave the main loop.
    Quit,
}

/// Maps an event to a command.  Mouse events, key releases and unbound
/// keys map to nothing; modifiers are ignored.
pub fn command_for(event: &InputEvent) -> Option<Command> {
    match *event {
        InputEvent::Quit => Some(Command::Quit),
        InputEvent::KeyDown { code, .. } => match code {
            ' ' => Some(Command::Quit),
            '=' => Some(Command::Zoom(2.0)),
            '-' => Some(Command::Zoom(0.5)),
            'a' => Some(Command::Pan { dx: -1.0, dy: 0.0 }),
            'd' => Some(Command::Pan { dx: 1.0, dy: 0.0 }),
            'w' => Some(Command::Pan { dx: 0.0, dy: -1.0 }),
            's' => Some(Command::Pan { dx: 0.0, dy: 1.0 }),
            _ => None,
        },
        _ => None,
    }
}

/// A poll-style source of events.  `None` means nothing is pending
/// right now, not that the source is finished.
pub trait EventSource {
    /// The next pending event, if any.
    fn poll(&mut self) -> Option<InputEvent>;
}

/// Replays a fixed list of events, one per main-loop iteration, and
/// then reports `Quit` forever.
#[derive(Clone, Debug)]
pub struct ScriptedEvents {
    pending: VecDeque<InputEvent>,
    yielded: bool,
}

impl ScriptedEvents {
    /// Replays the given events.
    pub fn new<I: IntoIterator<Item = InputEvent>>(events: I) -> Self {
        ScriptedEvents {
            pending: events.into_iter().collect(),
            yielded: false,
        }
    }

    /// One key press per character.
    pub fn from_keys(keys: &str) -> Self {
        ScriptedEvents::new(keys.chars().map(InputEvent::key))
    }
}

impl EventSource for ScriptedEvents {
    fn poll(&mut self) -> Option<InputEvent> {
        if self.yielded {
            self.yielded = false;
            return None;
        }
        self.yielded = true;
        Some(self.pending.pop_front().unwrap_or(InputEvent::Quit))
    }
}
