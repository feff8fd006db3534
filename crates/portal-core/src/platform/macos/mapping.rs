/*!
Bidirectional mappings between the crate's semantic types and macOS AX*
strings / virtual keycodes.
*/

use crate::types::ActionKind;

/// macOS action string constants (kAX*Action).
mod ax_action {
  pub(super) const PRESS: &str = "AXPress";
  pub(super) const SHOW_MENU: &str = "AXShowMenu";
  pub(super) const INCREMENT: &str = "AXIncrement";
  pub(super) const DECREMENT: &str = "AXDecrement";
  pub(super) const CONFIRM: &str = "AXConfirm";
  pub(super) const CANCEL: &str = "AXCancel";
  pub(super) const PICK: &str = "AXPick";
}

/// Convert a semantic action into the AX action string to invoke, for the
/// actions that correspond to a named AX action. `SetValue` and `Focus`
/// are handled separately by the caller (they write an attribute, not
/// perform a named action).
pub(super) const fn action_to_macos(action: ActionKind) -> Option<&'static str> {
  match action {
    ActionKind::Press => Some(ax_action::PRESS),
    ActionKind::ShowMenu => Some(ax_action::SHOW_MENU),
    ActionKind::Increment => Some(ax_action::INCREMENT),
    ActionKind::Decrement => Some(ax_action::DECREMENT),
    ActionKind::Confirm => Some(ax_action::CONFIRM),
    ActionKind::Cancel => Some(ax_action::CANCEL),
    ActionKind::Pick => Some(ax_action::PICK),
    ActionKind::SetValue | ActionKind::Focus => None,
  }
}

/// Convert an AX action string (as reported by `AXUIElementCopyActionNames`)
/// into our semantic action, if we have a mapping for it.
pub(super) fn action_from_macos(s: &str) -> Option<ActionKind> {
  match s {
    ax_action::PRESS => Some(ActionKind::Press),
    ax_action::SHOW_MENU => Some(ActionKind::ShowMenu),
    ax_action::INCREMENT => Some(ActionKind::Increment),
    ax_action::DECREMENT => Some(ActionKind::Decrement),
    ax_action::CONFIRM => Some(ActionKind::Confirm),
    ax_action::CANCEL => Some(ActionKind::Cancel),
    ax_action::PICK => Some(ActionKind::Pick),
    _ => None,
  }
}

/// Raw AX role strings treated as "writable" for `setValue`/`AXValue`.
pub(super) const WRITABLE_ROLES: &[&str] = &[
  "AXTextField",
  "AXTextArea",
  "AXComboBox",
  "AXSecureTextField",
  "AXSearchField",
];

/// ASCII character to (virtual keycode, needs-shift) for the US keyboard
/// layout. Characters outside this table fall back to a Unicode-string
/// keyboard event (see `platform::macos::input`).
pub(super) fn ascii_to_keycode(ch: char) -> Option<(u16, bool)> {
  let lower = ch.to_ascii_lowercase();
  let base = match lower {
    'a' => 0x00,
    's' => 0x01,
    'd' => 0x02,
    'f' => 0x03,
    'h' => 0x04,
    'g' => 0x05,
    'z' => 0x06,
    'x' => 0x07,
    'c' => 0x08,
    'v' => 0x09,
    'b' => 0x0B,
    'q' => 0x0C,
    'w' => 0x0D,
    'e' => 0x0E,
    'r' => 0x0F,
    'y' => 0x10,
    't' => 0x11,
    '1' => 0x12,
    '2' => 0x13,
    '3' => 0x14,
    '4' => 0x15,
    '6' => 0x16,
    '5' => 0x17,
    '=' => 0x18,
    '9' => 0x19,
    '7' => 0x1A,
    '-' => 0x1B,
    '8' => 0x1C,
    '0' => 0x1D,
    ']' => 0x1E,
    'o' => 0x1F,
    'u' => 0x20,
    '[' => 0x21,
    'i' => 0x22,
    'p' => 0x23,
    'l' => 0x25,
    'j' => 0x26,
    '\'' => 0x27,
    'k' => 0x28,
    ';' => 0x29,
    '\\' => 0x2A,
    ',' => 0x2B,
    '/' => 0x2C,
    'n' => 0x2D,
    'm' => 0x2E,
    '.' => 0x2F,
    '`' => 0x32,
    ' ' => 0x31,
    '\t' => 0x30,
    '\n' | '\r' => 0x24,
    _ => return None,
  };

  // Shifted punctuation variants that share a key with an unshifted glyph.
  let (keycode, shifted) = match ch {
    '!' => (0x12, true),
    '@' => (0x13, true),
    '#' => (0x14, true),
    '$' => (0x15, true),
    '%' => (0x17, true),
    '^' => (0x16, true),
    '&' => (0x1A, true),
    '*' => (0x1C, true),
    '(' => (0x19, true),
    ')' => (0x1D, true),
    '_' => (0x1B, true),
    '+' => (0x18, true),
    '{' => (0x21, true),
    '}' => (0x1E, true),
    ':' => (0x29, true),
    '"' => (0x27, true),
    '|' => (0x2A, true),
    '<' => (0x2B, true),
    '>' => (0x2F, true),
    '?' => (0x2C, true),
    '~' => (0x32, true),
    _ => (base, ch.is_ascii_uppercase()),
  };

  Some((keycode, shifted))
}

/// Named key (as sent to `/key`) to virtual keycode. Accepts both the
/// canonical name and a few common aliases.
pub(super) fn named_key_to_keycode(name: &str) -> Option<u16> {
  match name.to_lowercase().as_str() {
    "return" | "enter" => Some(0x24),
    "escape" | "esc" => Some(0x35),
    "space" => Some(0x31),
    "tab" => Some(0x30),
    "delete" | "backspace" => Some(0x33),
    "forwarddelete" => Some(0x75),
    "up" | "arrowup" => Some(0x7E),
    "down" | "arrowdown" => Some(0x7D),
    "left" | "arrowleft" => Some(0x7B),
    "right" | "arrowright" => Some(0x7C),
    "home" => Some(0x73),
    "end" => Some(0x77),
    "pageup" => Some(0x74),
    "pagedown" => Some(0x79),
    other => {
      let mut chars = other.chars();
      let (Some(ch), None) = (chars.next(), chars.next()) else {
        return None;
      };
      ascii_to_keycode(ch).map(|(code, _shift)| code)
    }
  }
}
