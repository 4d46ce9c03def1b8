//! Interaction events the host UI forwards to carousels

/// Pointer, touch and focus interactions on a carousel container
///
/// The host wires its native events (mouseenter, touchstart, focusin, ...)
/// to these variants. Leave/end/lost variants describe the new state
/// explicitly, they never toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractionEvent {
    /// Pointer moved over the container
    PointerEntered,
    /// Pointer left the container
    PointerLeft,
    /// A touch started inside the container
    TouchStarted,
    /// The touch inside the container ended
    TouchEnded,
    /// The container or one of its descendants gained focus
    FocusGained,
    /// Focus left the container
    FocusLost,
}

impl InteractionEvent {
    /// Whether this interaction begins a pause (as opposed to ending one)
    pub fn is_start(&self) -> bool {
        matches!(
            self,
            InteractionEvent::PointerEntered
                | InteractionEvent::TouchStarted
                | InteractionEvent::FocusGained
        )
    }

    /// Whether this interaction is focus-driven (gated by `pause_on_focus`)
    pub fn is_focus(&self) -> bool {
        matches!(
            self,
            InteractionEvent::FocusGained | InteractionEvent::FocusLost
        )
    }
}

/// Keys the carousel understands
///
/// Anything else is either a single character or `Unknown`, and the
/// carousel leaves it to the host.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Home,
    End,

    // Arrow keys
    Left,
    Right,

    // Character input
    Char(char),

    // Unknown key
    Unknown,
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` name
    pub fn from_dom_name(name: &str) -> Self {
        match name {
            "Home" => Key::Home,
            "End" => Key::End,
            "ArrowLeft" => Key::Left,
            "ArrowRight" => Key::Right,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Unknown,
                }
            }
        }
    }
}
