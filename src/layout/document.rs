//! Raw serde representation of a layout document.
//!
//! Every field is optional here so that missing values can be reported with their JSON path
//! instead of a generic serde message. Unknown fields are ignored.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct LayoutDocument {
    pub version: Option<i64>,
    pub texture: Option<TextureDocument>,
    pub canvas: Option<CanvasDocument>,
    pub defaults: Option<DefaultsDocument>,
    #[serde(default)]
    pub elements: Vec<ElementDocument>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TextureDocument {
    pub file: Option<String>,
    pub size: Option<Vec<i64>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CanvasDocument {
    pub size: Option<Vec<i64>>,
    pub background: Option<Vec<i64>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DefaultsDocument {
    pub pressed_offset: Option<Vec<i64>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ElementDocument {
    pub id: Option<String>,
    pub codes: Option<CodesDocument>,
    #[serde(alias = "position")]
    pub pos: Option<Vec<i64>>,
    pub sprite: Option<SpriteDocument>,
    pub z: Option<i32>,
    pub wheel: Option<bool>,
    pub cursor: Option<CursorDocument>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CodesDocument {
    pub hid: Option<u16>,
    pub winvk: Option<u16>,
    pub evdev: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SpriteDocument {
    pub normal: Option<Vec<i64>>,
    pub pressed: Option<Vec<i64>>,
    pub up: Option<Vec<i64>>,
    pub down: Option<Vec<i64>>,
    pub left: Option<Vec<i64>>,
    pub right: Option<Vec<i64>>,
    pub up_left: Option<Vec<i64>>,
    pub up_right: Option<Vec<i64>>,
    pub down_left: Option<Vec<i64>>,
    pub down_right: Option<Vec<i64>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CursorDocument {
    pub mode: Option<String>,
    pub radius: Option<i64>,
    pub sensitivity: Option<f64>,
    pub use_monitor_center: Option<bool>,
    pub monitor_center: Option<Vec<i64>>,
    pub monitor_center_x: Option<i64>,
    pub monitor_center_y: Option<i64>,
}
