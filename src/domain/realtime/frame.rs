//! Wire envelope shared by inbound and outbound frames.

use serde::{de, Deserialize, Serialize};
use serde_json::Value;

use super::ChannelEvent;

/// One message on the transport: a routing tag and an opaque payload.
///
/// ```text
/// { "type": "order_update", "data": { ... } }
/// ```
///
/// The envelope is not versioned. Unknown tags parse fine and are simply
/// never routed to a handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: Value,
}

impl Frame {
    /// Creates a frame from a tag and a raw payload.
    pub fn new(event_type: impl Into<String>, data: Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    /// Wraps a typed event in its envelope.
    pub fn from_event<E: ChannelEvent>(event: &E) -> Result<Self, serde_json::Error> {
        Ok(Self::new(E::TYPE, serde_json::to_value(event)?))
    }

    /// Parses a text frame received from the transport.
    ///
    /// Only a JSON object is an envelope; arrays and scalars are rejected
    /// even when their elements line up with `type` and `data`.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(de::Error::custom("frame must be a JSON object"));
        }
        serde_json::from_value(value)
    }

    /// Serializes the frame for the transport.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes the payload as `E`.
    ///
    /// Does not check the tag; callers route by tag before decoding.
    pub fn decode<E: ChannelEvent>(&self) -> Result<E, serde_json::Error> {
        <E as Deserialize<'_>>::deserialize(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{OrderId, Timestamp};
    use crate::domain::realtime::{OrderStatus, OrderUpdate, RealtimeEvent};
    use serde_json::json;

    #[test]
    fn parse_reads_type_and_data() {
        let frame = Frame::parse(r#"{"type":"notification","data":{"id":"n-1"}}"#).unwrap();
        assert_eq!(frame.event_type, "notification");
        assert_eq!(frame.data, json!({"id": "n-1"}));
    }

    #[test]
    fn parse_rejects_non_json() {
        assert!(Frame::parse("not json at all").is_err());
        assert!(Frame::parse(r#"{"data": 1}"#).is_err());
    }

    #[test]
    fn parse_rejects_positional_array_form() {
        let err = Frame::parse(r#"["order_update", {"orderId": "X"}]"#).unwrap_err();
        assert!(err.to_string().contains("JSON object"));
        assert!(Frame::parse(r#""order_update""#).is_err());
        assert!(Frame::parse("null").is_err());
    }

    #[test]
    fn missing_data_defaults_to_null() {
        let frame = Frame::parse(r#"{"type":"ping"}"#).unwrap();
        assert_eq!(frame.data, Value::Null);
    }

    #[test]
    fn from_event_matches_realtime_event_encoding() {
        let update = OrderUpdate {
            order_id: OrderId::new("ORD-5").unwrap(),
            status: OrderStatus::Confirmed,
            timestamp: Timestamp::from_unix_millis(1_700_000_000_000).unwrap(),
        };

        let frame = Frame::from_event(&update).unwrap();
        let via_enum = serde_json::to_value(RealtimeEvent::from(update.clone())).unwrap();
        assert_eq!(serde_json::to_value(&frame).unwrap(), via_enum);

        let decoded: OrderUpdate = frame.decode().unwrap();
        assert_eq!(decoded, update);
    }

    #[test]
    fn decode_reports_shape_mismatch() {
        let frame = Frame::new("order_update", json!({"orderId": 42}));
        assert!(frame.decode::<OrderUpdate>().is_err());
    }
}
