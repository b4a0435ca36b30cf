//! Keyboard input handling

use web_sys::KeyboardEvent;

/// Whether a key value means "flap"
pub fn is_jump_key(key: &str) -> bool {
    matches!(key, " " | "Spacebar")
}

/// Jump on the first press of Space; auto-repeat is ignored
pub fn jump_pressed(event: &KeyboardEvent) -> bool {
    !event.repeat() && (event.code() == "Space" || is_jump_key(&event.key()))
}
