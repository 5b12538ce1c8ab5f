//! Upstream records and the response shapes built from them.

use serde::{Deserialize, Serialize, Serializer};
use serde::ser::SerializeMap;

/// A launch as returned by `GET /v3/launches`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Launch {
    pub flight_number: u64,
    pub mission_name: String,
    pub rocket: LaunchRocket,
}

/// The rocket reference embedded in a launch.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LaunchRocket {
    pub rocket_id: String,
    pub second_stage: SecondStage,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SecondStage {
    pub payloads: Vec<Payload>,
}

/// A payload carried on a launch's second stage.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Payload {
    pub payload_id: String,
    /// Null for a number of historical payloads.
    pub manufacturer: Option<String>,
    pub payload_type: String,
}

/// A rocket as returned by `GET /v3/rockets`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Rocket {
    pub rocket_id: String,
    pub rocket_name: String,
    pub description: String,
    pub flickr_images: Vec<String>,
}

/// Projection of [`Rocket`] embedded in each response element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RocketSummary {
    pub rocket_id: String,
    pub rocket_name: String,
    pub description: String,
    pub images: Vec<String>,
}

impl From<Rocket> for RocketSummary {
    fn from(rocket: Rocket) -> Self {
        Self {
            rocket_id: rocket.rocket_id,
            rocket_name: rocket.rocket_name,
            description: rocket.description,
            images: rocket.flickr_images,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PayloadSummary {
    pub payload_id: String,
    pub manufacturer: Option<String>,
    #[serde(rename = "type")]
    pub payload_type: String,
}

impl From<Payload> for PayloadSummary {
    fn from(payload: Payload) -> Self {
        Self {
            payload_id: payload.payload_id,
            manufacturer: payload.manufacturer,
            payload_type: payload.payload_type,
        }
    }
}

/// One element of the `/launches` response.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransformedLaunch {
    pub flight_number: u64,
    pub mission_name: String,
    /// Serialized as `{}` when the launch's rocket is unknown.
    #[serde(serialize_with = "rocket_or_empty_object")]
    pub rocket: Option<RocketSummary>,
    pub payloads: Vec<PayloadSummary>,
}

fn rocket_or_empty_object<S>(rocket: &Option<RocketSummary>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match rocket {
        Some(summary) => summary.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_launch_ignores_unknown_fields() {
        let launch: Launch = serde_json::from_value(json!({
            "flight_number": 7,
            "mission_name": "CRS-1",
            "launch_year": "2012",
            "rocket": {
                "rocket_id": "falcon9",
                "rocket_name": "Falcon 9",
                "first_stage": { "cores": [] },
                "second_stage": {
                    "block": 1,
                    "payloads": [{
                        "payload_id": "CRS-1",
                        "manufacturer": null,
                        "payload_type": "Dragon 1.0",
                        "orbit": "ISS"
                    }]
                }
            }
        }))
        .unwrap();

        assert_eq!(launch.rocket.rocket_id, "falcon9");
        assert_eq!(launch.rocket.second_stage.payloads[0].manufacturer, None);
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let result: Result<Launch, _> = serde_json::from_value(json!({
            "flight_number": 1,
            "mission_name": "A",
            "rocket": { "rocket_id": "r1" }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_rocket_serializes_as_empty_object() {
        let launch = TransformedLaunch {
            flight_number: 1,
            mission_name: "A".to_string(),
            rocket: None,
            payloads: vec![],
        };
        assert_eq!(
            serde_json::to_value(&launch).unwrap(),
            json!({ "flight_number": 1, "mission_name": "A", "rocket": {}, "payloads": [] })
        );
    }

    #[test]
    fn test_payload_type_renamed() {
        let payload = PayloadSummary::from(Payload {
            payload_id: "p1".to_string(),
            manufacturer: Some("M".to_string()),
            payload_type: "T".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "payload_id": "p1", "manufacturer": "M", "type": "T" })
        );
    }
}
