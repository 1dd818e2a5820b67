use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered, addressable device offering a streaming/control session.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Kiosk {
    pub kiosk_id: String,
}

impl Kiosk {
    pub fn new(kiosk_id: impl Into<String>) -> Self {
        Self {
            kiosk_id: kiosk_id.into(),
        }
    }
}

impl From<&str> for Kiosk {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for Kiosk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "kiosk:{}", self.kiosk_id)
    }
}
