mod envelope;
mod protocol_error;
mod request;
mod request_kind;
mod response;

pub use envelope::Envelope;
pub use protocol_error::ProtocolError;
pub use request::Request;
pub use request_kind::RequestKind;
pub use response::{Outcome, Response};
