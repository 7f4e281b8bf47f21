//! Input bindings and the fixed code translation tables.
//!
//! Native codes use the Windows virtual-key numbering. Hosts on other platforms interpret the
//! same numbers in their `InputSource` implementation.

use std::fmt;

/// A platform-native key/button code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VirtualKey(pub u16);

impl VirtualKey {
    pub const LBUTTON: VirtualKey = VirtualKey(0x01);
    pub const RBUTTON: VirtualKey = VirtualKey(0x02);
    pub const MBUTTON: VirtualKey = VirtualKey(0x04);
    pub const XBUTTON1: VirtualKey = VirtualKey(0x05);
    pub const XBUTTON2: VirtualKey = VirtualKey(0x06);

    pub const BACK: VirtualKey = VirtualKey(0x08);
    pub const TAB: VirtualKey = VirtualKey(0x09);
    pub const RETURN: VirtualKey = VirtualKey(0x0D);
    pub const ESCAPE: VirtualKey = VirtualKey(0x1B);
    pub const SPACE: VirtualKey = VirtualKey(0x20);
    pub const LEFT: VirtualKey = VirtualKey(0x25);
    pub const UP: VirtualKey = VirtualKey(0x26);
    pub const RIGHT: VirtualKey = VirtualKey(0x27);
    pub const DOWN: VirtualKey = VirtualKey(0x28);
    pub const F1: VirtualKey = VirtualKey(0x70);
    pub const LSHIFT: VirtualKey = VirtualKey(0xA0);
    pub const LCONTROL: VirtualKey = VirtualKey(0xA2);
    pub const LMENU: VirtualKey = VirtualKey(0xA4);

    /// Virtual key for an ASCII letter or digit.
    pub const fn from_ascii(ch: u8) -> VirtualKey {
        VirtualKey(ch.to_ascii_uppercase() as u16)
    }

    pub fn is_mouse_button(self) -> bool {
        matches!(
            self,
            VirtualKey::LBUTTON
                | VirtualKey::RBUTTON
                | VirtualKey::MBUTTON
                | VirtualKey::XBUTTON1
                | VirtualKey::XBUTTON2
        )
    }
}

impl fmt::Display for VirtualKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vk:{:#04x}", self.0)
    }
}

/// The `codes` object of a layout element.
///
/// Exactly one source is consulted: `winvk`, then `hid`, then `evdev`. Zero means absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputBinding {
    pub winvk: Option<u16>,
    pub hid: Option<u16>,
    pub evdev: Option<u16>,
}

impl InputBinding {
    pub fn is_empty(&self) -> bool {
        present(self.winvk).is_none() && present(self.hid).is_none() && present(self.evdev).is_none()
    }

    /// Resolve to a native code using the first present source.
    pub fn resolve(&self) -> Option<VirtualKey> {
        if let Some(vk) = present(self.winvk) {
            return Some(VirtualKey(vk));
        }
        if let Some(hid) = present(self.hid) {
            return hid_to_virtual_key(hid);
        }
        present(self.evdev).and_then(evdev_to_virtual_key)
    }
}

fn present(code: Option<u16>) -> Option<u16> {
    code.filter(|&c| c != 0)
}

/// Translate a hardware-independent (HID usage) code.
///
/// Codes 1-5 are mouse buttons, which shadows the HID usages of `A` and `B`.
pub fn hid_to_virtual_key(hid: u16) -> Option<VirtualKey> {
    let vk = match hid {
        1 => VirtualKey::LBUTTON,
        2 => VirtualKey::RBUTTON,
        3 => VirtualKey::MBUTTON,
        4 => VirtualKey::XBUTTON2,
        5 => VirtualKey::XBUTTON1,
        6..=29 => VirtualKey(b'A' as u16 + (hid - 4)),
        30..=38 => VirtualKey(b'1' as u16 + (hid - 30)),
        39 => VirtualKey::from_ascii(b'0'),
        40 => VirtualKey::RETURN,
        41 => VirtualKey::ESCAPE,
        42 => VirtualKey::BACK,
        43 => VirtualKey::TAB,
        44 => VirtualKey::SPACE,
        58..=69 => VirtualKey(VirtualKey::F1.0 + (hid - 58)),
        79 => VirtualKey::RIGHT,
        80 => VirtualKey::LEFT,
        81 => VirtualKey::DOWN,
        82 => VirtualKey::UP,
        224 => VirtualKey::LCONTROL,
        225 => VirtualKey::LSHIFT,
        226 => VirtualKey::LMENU,
        _ => return None,
    };
    Some(vk)
}

/// Translate a Linux evdev key code.
pub fn evdev_to_virtual_key(evdev: u16) -> Option<VirtualKey> {
    const TOP_ROW: &[u8] = b"QWERTYUIOP";
    const HOME_ROW: &[u8] = b"ASDFGHJKL";
    const BOTTOM_ROW: &[u8] = b"ZXCVBNM";

    let vk = match evdev {
        1 => VirtualKey::ESCAPE,
        2..=10 => VirtualKey(b'1' as u16 + (evdev - 2)),
        11 => VirtualKey::from_ascii(b'0'),
        16..=25 => VirtualKey::from_ascii(TOP_ROW[(evdev - 16) as usize]),
        30..=38 => VirtualKey::from_ascii(HOME_ROW[(evdev - 30) as usize]),
        44..=50 => VirtualKey::from_ascii(BOTTOM_ROW[(evdev - 44) as usize]),
        57 => VirtualKey::SPACE,
        103 => VirtualKey::UP,
        105 => VirtualKey::LEFT,
        106 => VirtualKey::RIGHT,
        108 => VirtualKey::DOWN,
        _ => return None,
    };
    Some(vk)
}
