//! Keyboard shortcut mapping.
//!
//! Translates raw key events into editor actions. Shortcuts are suppressed
//! while a text element is being edited (except Escape), so typing never
//! triggers document commands.

/// Modifier state accompanying a key event. `command` covers both Ctrl and
/// the macOS command key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub command: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        command: false,
        shift: false,
    };
    pub const COMMAND: Modifiers = Modifiers {
        command: true,
        shift: false,
    };
    pub const COMMAND_SHIFT: Modifiers = Modifiers {
        command: true,
        shift: true,
    };
    pub const SHIFT: Modifiers = Modifiers {
        command: false,
        shift: true,
    };
}

/// Logical keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Delete,
    Backspace,
    Enter,
    Escape,
    Space,
    Char(char),
}

/// Commands produced by the shortcut map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorAction {
    Nudge { dx: f64, dy: f64 },
    DeleteSelection,
    Copy,
    Cut,
    Paste,
    Duplicate,
    Undo,
    Redo,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    StartPan,
    EnterEditMode,
    Escape,
    SelectAll,
}

/// Arrow-key nudge distance, in page pixels.
const NUDGE: f64 = 1.0;
const NUDGE_LARGE: f64 = 10.0;

/// Map a key event to an action. Returns `None` for unbound keys.
pub fn map_key(key: Key, modifiers: Modifiers, editing: bool) -> Option<EditorAction> {
    if editing {
        // While the text overlay is active, only Escape reaches the editor.
        return match key {
            Key::Escape => Some(EditorAction::Escape),
            _ => None,
        };
    }

    let step = if modifiers.shift { NUDGE_LARGE } else { NUDGE };
    match (key, modifiers.command) {
        (Key::ArrowLeft, false) => Some(EditorAction::Nudge { dx: -step, dy: 0.0 }),
        (Key::ArrowRight, false) => Some(EditorAction::Nudge { dx: step, dy: 0.0 }),
        (Key::ArrowUp, false) => Some(EditorAction::Nudge { dx: 0.0, dy: -step }),
        (Key::ArrowDown, false) => Some(EditorAction::Nudge { dx: 0.0, dy: step }),
        (Key::Delete, false) | (Key::Backspace, false) => Some(EditorAction::DeleteSelection),
        (Key::Enter, false) => Some(EditorAction::EnterEditMode),
        (Key::Escape, _) => Some(EditorAction::Escape),
        (Key::Space, false) => Some(EditorAction::StartPan),
        (Key::Char(c), true) => match c.to_ascii_lowercase() {
            'c' => Some(EditorAction::Copy),
            'x' => Some(EditorAction::Cut),
            'v' => Some(EditorAction::Paste),
            'd' => Some(EditorAction::Duplicate),
            'a' => Some(EditorAction::SelectAll),
            'z' if modifiers.shift => Some(EditorAction::Redo),
            'z' => Some(EditorAction::Undo),
            'y' => Some(EditorAction::Redo),
            '+' | '=' => Some(EditorAction::ZoomIn),
            '-' => Some(EditorAction::ZoomOut),
            '0' => Some(EditorAction::ZoomReset),
            _ => None,
        },
        _ => None,
    }
}
