use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MouseEventKind {
    MouseDown,
    MouseMove,
    MouseUp,
}

/// Pointer event a customer sends for injection on the kiosk.
///
/// The broker only relays it; coordinates are whatever the customer's
/// renderer reported.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MouseEvent {
    pub mouse_event_type: MouseEventKind,
    pub time_stamp: i64,
    pub x: f32,
    pub y: f32,
}
