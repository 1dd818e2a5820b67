mod connection;
mod customer;
mod kiosk;
mod mouse_event;
mod session;

pub use connection::Connection;
pub use customer::Customer;
pub use kiosk::Kiosk;
pub use mouse_event::{MouseEvent, MouseEventKind};
pub use session::SessionId;
