use serde::{Deserialize, Serialize};
use std::fmt;

/// A transient peer asking for a session with one kiosk.
///
/// The id is generated client-side per attempt and carries no meaning beyond
/// the lifetime of that attempt's socket.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub customer_id: String,
}

impl Customer {
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
        }
    }
}

impl From<&str> for Customer {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "customer:{}", self.customer_id)
    }
}
