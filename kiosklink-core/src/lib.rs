pub mod model;
pub mod protocol;

pub use model::{Connection, Customer, Kiosk, MouseEvent, MouseEventKind, SessionId};
pub use protocol::{Envelope, Outcome, ProtocolError, Request, RequestKind, Response};
