use crate::protocol::protocol_error::ProtocolError;
use crate::protocol::request::Request;
use crate::protocol::request_kind::RequestKind;
use crate::protocol::response::Response;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const TAG: &str = "type";

/// Every text frame on both endpoints is one of these.
///
/// Encoded frames always carry the `type` tag. Decoding also accepts untagged
/// frames from older clients and classifies them by their fields: anything
/// with `result` and `message` is a response, the rest are requests.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Envelope {
    Request(Request),
    Response(Response),
}

impl Envelope {
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(text)?;
        let Some(object) = value.as_object() else {
            return Err(ProtocolError::UnknownShape);
        };

        if object.contains_key(TAG) {
            return Ok(serde_json::from_value(value)?);
        }

        let has_kind = object.contains_key("requestKind") || object.contains_key("requestId");
        if !has_kind || !object.contains_key("payload") {
            return Err(ProtocolError::UnknownShape);
        }

        if object.contains_key("result") && object.contains_key("message") {
            Ok(Envelope::Response(serde_json::from_value(value)?))
        } else {
            Ok(Envelope::Request(serde_json::from_value(value)?))
        }
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn request_kind(&self) -> RequestKind {
        match self {
            Envelope::Request(request) => request.request_kind,
            Envelope::Response(response) => response.request_kind,
        }
    }

    pub fn payload_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, ProtocolError> {
        match self {
            Envelope::Request(request) => request.payload_as(),
            Envelope::Response(response) => response.payload_as(),
        }
    }
}

impl From<Request> for Envelope {
    fn from(request: Request) -> Self {
        Envelope::Request(request)
    }
}

impl From<Response> for Envelope {
    fn from(response: Response) -> Self {
        Envelope::Response(response)
    }
}
