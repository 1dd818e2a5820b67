use crate::model::customer::Customer;
use crate::model::kiosk::Kiosk;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The exclusive kiosk/customer pairing for one session.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
pub struct Connection {
    pub customer: Customer,
    pub kiosk: Kiosk,
}

impl Connection {
    pub fn new(kiosk: Kiosk, customer: Customer) -> Self {
        Self { customer, kiosk }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {}", self.kiosk, self.customer)
    }
}
