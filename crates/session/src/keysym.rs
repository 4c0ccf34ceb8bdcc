//! X11 keysym constants and the physical-key-code mapping used when
//! forwarding keyboard input to the remote session.

pub const XK_BACKSPACE: u32 = 0xff08;
pub const XK_TAB: u32 = 0xff09;
pub const XK_RETURN: u32 = 0xff0d;
pub const XK_ESCAPE: u32 = 0xff1b;
pub const XK_HOME: u32 = 0xff50;
pub const XK_LEFT: u32 = 0xff51;
pub const XK_UP: u32 = 0xff52;
pub const XK_RIGHT: u32 = 0xff53;
pub const XK_DOWN: u32 = 0xff54;
pub const XK_PAGE_UP: u32 = 0xff55;
pub const XK_PAGE_DOWN: u32 = 0xff56;
pub const XK_END: u32 = 0xff57;
pub const XK_INSERT: u32 = 0xff63;
pub const XK_DELETE: u32 = 0xffff;
pub const XK_SHIFT_L: u32 = 0xffe1;
pub const XK_SHIFT_R: u32 = 0xffe2;
pub const XK_CONTROL_L: u32 = 0xffe3;
pub const XK_CONTROL_R: u32 = 0xffe4;
pub const XK_META_L: u32 = 0xffe7;
pub const XK_META_R: u32 = 0xffe8;
pub const XK_ALT_L: u32 = 0xffe9;
pub const XK_ALT_R: u32 = 0xffea;
pub const XK_SUPER_L: u32 = 0xffeb;
pub const XK_SUPER_R: u32 = 0xffec;
pub const XK_F1: u32 = 0xffbe;

/// Resolve a physical key code (and the logical key string, for
/// single-character fallback) to an X11 keysym.
///
/// Unknown keys return `None` and are dropped by the caller.
pub fn keysym_for_key(code: &str, key: &str) -> Option<u32> {
    if let Some(sym) = keysym_for_code(code) {
        return Some(sym);
    }
    // Single printable character: the character code is the keysym.
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c as u32),
        _ => None,
    }
}

fn keysym_for_code(code: &str) -> Option<u32> {
    let sym = match code {
        "Escape" => XK_ESCAPE,
        "Tab" => XK_TAB,
        "Enter" | "NumpadEnter" => XK_RETURN,
        "Backspace" => XK_BACKSPACE,
        "Delete" => XK_DELETE,
        "Insert" => XK_INSERT,
        "Home" => XK_HOME,
        "End" => XK_END,
        "PageUp" => XK_PAGE_UP,
        "PageDown" => XK_PAGE_DOWN,
        "ArrowLeft" => XK_LEFT,
        "ArrowUp" => XK_UP,
        "ArrowRight" => XK_RIGHT,
        "ArrowDown" => XK_DOWN,
        "ShiftLeft" => XK_SHIFT_L,
        "ShiftRight" => XK_SHIFT_R,
        "ControlLeft" => XK_CONTROL_L,
        "ControlRight" => XK_CONTROL_R,
        "AltLeft" => XK_ALT_L,
        "AltRight" => XK_ALT_R,
        "MetaLeft" | "OSLeft" => XK_META_L,
        "MetaRight" | "OSRight" => XK_META_R,
        _ => {
            // F1..F12 are contiguous from XK_F1.
            if let Some(n) = code.strip_prefix('F') {
                if let Ok(n) = n.parse::<u32>() {
                    if (1..=12).contains(&n) {
                        return Some(XK_F1 + n - 1);
                    }
                }
            }
            return None;
        }
    };
    Some(sym)
}
