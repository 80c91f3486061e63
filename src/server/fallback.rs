//! Risk response for points outside every fetched zone.
//!
//! This is a placeholder kept for client compatibility: a coordinate-threshold
//! rule with no geographic meaning, plus a fixed list of demonstration
//! evacuation zones unrelated to the fetched snapshot.

use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EvacuationZone {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub services: &'static str,
}

pub static EVACUATION_ZONES: [EvacuationZone; 3] = [
    EvacuationZone {
        name: "Zone A",
        lat: 19.0760,
        lon: 72.8777,
        services: "Food, Shelter, Aid",
    },
    EvacuationZone {
        name: "Zone B",
        lat: 28.7041,
        lon: 77.1025,
        services: "Shelter, Aid",
    },
    EvacuationZone {
        name: "Zone C",
        lat: 13.0827,
        lon: 80.2707,
        services: "Food, Shelter",
    },
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResponse {
    pub risk_level: &'static str,
    pub evacuation_needed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evacuation_zones: Option<&'static [EvacuationZone]>,
}

pub fn assess_risk(latitude: f64, longitude: f64) -> RiskResponse {
    if latitude > 35.0 && longitude > 140.0 {
        RiskResponse {
            risk_level: "High Risk",
            evacuation_needed: true,
            evacuation_zones: Some(&EVACUATION_ZONES),
        }
    } else {
        RiskResponse {
            risk_level: "Safe Zone",
            evacuation_needed: false,
            evacuation_zones: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_threshold_is_exclusive() {
        assert!(assess_risk(35.7, 140.1).evacuation_needed);
        assert!(!assess_risk(35.0, 141.0).evacuation_needed);
        assert!(!assess_risk(36.0, 140.0).evacuation_needed);
        assert!(!assess_risk(-36.0, -141.0).evacuation_needed);
    }

    #[test]
    fn test_response_shape() {
        let high = serde_json::to_value(assess_risk(40.0, 145.0)).unwrap();
        assert_eq!(high["riskLevel"], json!("High Risk"));
        assert_eq!(high["evacuationNeeded"], json!(true));
        assert_eq!(high["evacuationZones"].as_array().unwrap().len(), 3);
        assert_eq!(high["evacuationZones"][0]["name"], json!("Zone A"));

        let safe = serde_json::to_value(assess_risk(10.0, 10.0)).unwrap();
        assert_eq!(
            safe,
            json!({ "riskLevel": "Safe Zone", "evacuationNeeded": false })
        );
    }
}
