//! WebSocket protocol message types.
//!
//! Every frame carries an envelope with a `sendto` routing tag and a `body`
//! object. Device bodies are decoded against an enumerated set of known
//! shapes; anything that matches none of them is dropped and logged, and
//! the connection stays open.

use domain::models::GpsStatus;
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

/// Routing tag present on every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendTo {
    Backend,
    Both,
    Device,
    Frontend,
}

/// The outer message envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub sendto: SendTo,
    #[serde(default)]
    pub body: Option<Value>,
}

impl Envelope {
    /// Parse an inbound text frame. Returns None for anything that is not
    /// an envelope-shaped JSON object.
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }

    /// The envelope body, if it is a JSON object.
    pub fn object_body(&self) -> Option<&Value> {
        self.body.as_ref().filter(|body| body.is_object())
    }
}

/// Accept a coordinate as a JSON number or a numeric string.
/// Non-finite values fail the decode so no partial update can happen.
fn coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    let value = match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => n,
        NumberOrText::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("invalid coordinate: {s:?}")))?,
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(de::Error::custom("coordinate is not a finite number"))
    }
}

/// GPS position report from a device.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    pub gps_status: GpsStatus,
    #[serde(deserialize_with = "coordinate")]
    pub latitude: f64,
    #[serde(deserialize_with = "coordinate")]
    pub longitude: f64,
    pub device_id: String,
}

/// Refill completion report from a device.
#[derive(Debug, Clone, Deserialize)]
pub struct BottleComplete {
    pub order_id: String,
    pub bottle_count: i32,
    pub time_completed: String,
    /// Base64 image of the filled bottles; persisted elsewhere, ignored here.
    #[allow(dead_code)]
    pub image: String,
}

/// LINE-addressed payloads share a `topic` discriminator.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "topic", rename_all = "snake_case")]
pub enum LinePayload {
    /// Free-text chat relayed to a LINE recipient.
    Message(ChatRelay),
    /// Device-computed proximity hint for one order.
    NearOrder(NearOrder),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRelay {
    pub line_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearOrder {
    pub order_id: String,
    pub user_id: String,
    /// Distance to the destination in kilometers, as the device computed it.
    pub distance: f64,
    #[serde(deserialize_with = "coordinate")]
    pub latitude: f64,
    #[serde(deserialize_with = "coordinate")]
    pub longitude: f64,
    /// Required on the wire; the push goes to the user's stored chat id.
    #[allow(dead_code)]
    pub line_id: String,
}

/// Recognized device body shapes.
#[derive(Debug, Clone)]
pub enum DeviceBody {
    LocationUpdate(LocationUpdate),
    BottleComplete(BottleComplete),
    ChatRelay(ChatRelay),
    NearOrder(NearOrder),
}

impl DeviceBody {
    /// Try the known shapes in turn; None means the payload is dropped.
    pub fn decode(body: &Value) -> Option<Self> {
        if !body.is_object() {
            return None;
        }
        if let Ok(update) = serde_json::from_value::<LocationUpdate>(body.clone()) {
            return Some(Self::LocationUpdate(update));
        }
        if let Ok(bottle) = serde_json::from_value::<BottleComplete>(body.clone()) {
            return Some(Self::BottleComplete(bottle));
        }
        match serde_json::from_value::<LinePayload>(body.clone()) {
            Ok(LinePayload::Message(relay)) => Some(Self::ChatRelay(relay)),
            Ok(LinePayload::NearOrder(near)) => Some(Self::NearOrder(near)),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_parse_and_routing_tag() {
        let envelope = Envelope::parse(r#"{"sendto":"backend","body":{}}"#).unwrap();
        assert_eq!(envelope.sendto, SendTo::Backend);
        assert!(envelope.object_body().is_some());

        let envelope = Envelope::parse(r#"{"sendto":"both","body":{"x":1}}"#).unwrap();
        assert_eq!(envelope.sendto, SendTo::Both);
    }

    #[test]
    fn test_envelope_rejects_non_envelope_input() {
        assert!(Envelope::parse("not json").is_none());
        assert!(Envelope::parse(r#"{"sendto":"nowhere","body":{}}"#).is_none());
        assert!(Envelope::parse(r#"{"body":{}}"#).is_none());
    }

    #[test]
    fn test_envelope_non_object_body() {
        let envelope = Envelope::parse(r#"{"sendto":"backend","body":"text"}"#).unwrap();
        assert!(envelope.object_body().is_none());

        let envelope = Envelope::parse(r#"{"sendto":"backend"}"#).unwrap();
        assert!(envelope.object_body().is_none());
    }

    #[test]
    fn test_decode_location_update_with_number_coordinates() {
        let body = json!({
            "gpsStatus": "ready",
            "latitude": 13.7563,
            "longitude": 100.5018,
            "deviceId": "RPI-001"
        });

        match DeviceBody::decode(&body) {
            Some(DeviceBody::LocationUpdate(update)) => {
                assert_eq!(update.gps_status, GpsStatus::Ready);
                assert_eq!(update.latitude, 13.7563);
                assert_eq!(update.device_id, "RPI-001");
            }
            other => panic!("expected location update, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_location_update_with_string_coordinates() {
        let body = json!({
            "gpsStatus": "not_ready",
            "latitude": "13.7563",
            "longitude": "100.5018",
            "deviceId": "RPI-001"
        });

        match DeviceBody::decode(&body) {
            Some(DeviceBody::LocationUpdate(update)) => {
                assert_eq!(update.gps_status, GpsStatus::NotReady);
                assert_eq!(update.longitude, 100.5018);
            }
            other => panic!("expected location update, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_unparseable_coordinate() {
        let body = json!({
            "gpsStatus": "ready",
            "latitude": "somewhere",
            "longitude": 100.5018,
            "deviceId": "RPI-001"
        });
        assert!(DeviceBody::decode(&body).is_none());
    }

    #[test]
    fn test_decode_rejects_non_finite_coordinate() {
        let body = json!({
            "gpsStatus": "ready",
            "latitude": "NaN",
            "longitude": 100.5018,
            "deviceId": "RPI-001"
        });
        assert!(DeviceBody::decode(&body).is_none());
    }

    #[test]
    fn test_decode_bottle_complete() {
        let body = json!({
            "order_id": "ORD-1001",
            "bottle_count": 12,
            "time_completed": "2024-05-01T10:15:00Z",
            "image": "data:image/jpeg;base64,AAAA"
        });

        match DeviceBody::decode(&body) {
            Some(DeviceBody::BottleComplete(bottle)) => {
                assert_eq!(bottle.order_id, "ORD-1001");
                assert_eq!(bottle.bottle_count, 12);
            }
            other => panic!("expected bottle complete, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_chat_relay() {
        let body = json!({
            "lineId": "U123",
            "topic": "message",
            "message": "arriving soon"
        });

        match DeviceBody::decode(&body) {
            Some(DeviceBody::ChatRelay(relay)) => {
                assert_eq!(relay.line_id, "U123");
                assert_eq!(relay.message, "arriving soon");
            }
            other => panic!("expected chat relay, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_near_order() {
        let body = json!({
            "topic": "near_order",
            "orderId": "ORD-1001",
            "userId": "U-42",
            "distance": 0.8,
            "latitude": 13.7563,
            "longitude": 100.5018,
            "lineId": "U123"
        });

        match DeviceBody::decode(&body) {
            Some(DeviceBody::NearOrder(near)) => {
                assert_eq!(near.order_id, "ORD-1001");
                assert_eq!(near.distance, 0.8);
            }
            other => panic!("expected near order, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_fails_closed_on_unknown_shape() {
        assert!(DeviceBody::decode(&json!({"hello": "world"})).is_none());
        assert!(DeviceBody::decode(&json!("just a string")).is_none());
        assert!(DeviceBody::decode(&json!({"lineId": "U123", "topic": "unknown"})).is_none());
    }

    #[test]
    fn test_decode_location_update_missing_field_fails() {
        let body = json!({
            "gpsStatus": "ready",
            "latitude": 13.7563,
            "deviceId": "RPI-001"
        });
        assert!(DeviceBody::decode(&body).is_none());
    }
}
