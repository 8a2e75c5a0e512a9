use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Server-assigned record identifier
pub type RecordId = i64;

/// Records that carry a server-assigned id
pub trait Identified {
    fn id(&self) -> RecordId;
}

/// Missing or null text fields decode as empty strings so one sparse row cannot fail a whole list
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: RecordId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub vehicle_number: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub vehicle_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub vehicle_model_number: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub puc: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub accident_history: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub carrying_capacity: String,
    /// Server fields the dashboard does not edit (audit timestamps and the like)
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePayload {
    pub vehicle_number: String,
    pub vehicle_name: String,
    pub vehicle_model_number: String,
    pub puc: String,
    pub accident_history: String,
    pub carrying_capacity: String,
}

/// Driver shape is owned by the backend; fields beyond the name are kept as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: RecordId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub driver_name: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverPayload {
    pub driver_name: String,
    /// Fields of the edited record carried through unchanged, since an update replaces the whole driver
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Relational reference sent to and returned by the backend as `{"id": n}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: RecordId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: RecordId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub source: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub destination: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub departure_time: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub arrival_time: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_name: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPayload {
    pub source: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub status: String,
    pub driver: EntityRef,
    pub vehicle: EntityRef,
}

impl Identified for Vehicle {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Identified for Driver {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Identified for Trip {
    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Puc {
    Valid,
    Expired,
}

impl Puc {
    pub const ALL: [Puc; 2] = [Puc::Valid, Puc::Expired];

    pub fn as_str(&self) -> &'static str {
        match self {
            Puc::Valid => "Valid",
            Puc::Expired => "Expired",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccidentHistory {
    NoAccidents,
    MinorAccidents,
    MajorAccidents,
}

impl AccidentHistory {
    pub const ALL: [AccidentHistory; 3] = [
        AccidentHistory::NoAccidents,
        AccidentHistory::MinorAccidents,
        AccidentHistory::MajorAccidents,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccidentHistory::NoAccidents => "No Accidents",
            AccidentHistory::MinorAccidents => "Minor Accidents",
            AccidentHistory::MajorAccidents => "Major Accidents",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarryingCapacity {
    Kg500,
    Kg1000,
    Kg2000,
    Kg5000,
}

impl CarryingCapacity {
    pub const ALL: [CarryingCapacity; 4] = [
        CarryingCapacity::Kg500,
        CarryingCapacity::Kg1000,
        CarryingCapacity::Kg2000,
        CarryingCapacity::Kg5000,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CarryingCapacity::Kg500 => "500kg",
            CarryingCapacity::Kg1000 => "1000kg",
            CarryingCapacity::Kg2000 => "2000kg",
            CarryingCapacity::Kg5000 => "5000kg",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_deserialization_with_resolved_names() {
        let body = r#"{
            "id": 7,
            "source": "Pune",
            "destination": "Mumbai",
            "departureTime": "2030-01-01",
            "arrivalTime": "2030-01-02",
            "status": "Scheduled",
            "driver": {"id": 3, "driverName": "Asha"},
            "vehicle": {"id": 4},
            "driverName": "Asha",
            "vehicleName": "Tata Ace"
        }"#;

        let trip: Trip = serde_json::from_str(body).unwrap();
        assert_eq!(trip.driver, Some(EntityRef { id: 3 }));
        assert_eq!(trip.vehicle, Some(EntityRef { id: 4 }));
        assert_eq!(trip.driver_name.as_deref(), Some("Asha"));
        assert_eq!(trip.vehicle_name.as_deref(), Some("Tata Ace"));
    }

    #[test]
    fn test_trip_without_references_still_parses() {
        let body = r#"{"id":1,"source":"A","destination":"B","departureTime":"2030-01-01",
            "arrivalTime":"2030-01-02","status":"Done"}"#;
        let trip: Trip = serde_json::from_str(body).unwrap();
        assert!(trip.driver.is_none());
        assert!(trip.driver_name.is_none());
    }

    #[test]
    fn test_driver_keeps_unknown_fields() {
        let body = r#"{"id":2,"driverName":"Ravi","licenseNumber":"MH-42"}"#;
        let driver: Driver = serde_json::from_str(body).unwrap();
        assert_eq!(driver.extra.get("licenseNumber"), Some(&Value::from("MH-42")));

        let back = serde_json::to_value(&driver).unwrap();
        assert_eq!(back["licenseNumber"], "MH-42");
        assert_eq!(back["driverName"], "Ravi");
    }

    #[test]
    fn test_sparse_rows_decode_and_unknown_fields_survive() {
        let body = r#"[
            {"id":1,"vehicleNumber":"MH12-1234","vehicleName":"Tata Ace","vehicleModelNumber":"ACE-2",
             "puc":"Valid","accidentHistory":"No Accidents","carryingCapacity":"1000kg"},
            {"id":2,"vehicleNumber":"GJ05-1111","vehicleName":"Eicher Pro","vehicleModelNumber":"PRO-3015",
             "puc":null,"accidentHistory":"No Accidents","carryingCapacity":"1000kg","createdAt":"2030-01-01"}
        ]"#;

        let vehicles: Vec<Vehicle> = serde_json::from_str(body).unwrap();
        assert_eq!(vehicles.len(), 2);
        assert_eq!(vehicles[1].puc, "");
        assert_eq!(vehicles[1].extra.get("createdAt"), Some(&Value::from("2030-01-01")));

        let back = serde_json::to_value(&vehicles[1]).unwrap();
        assert_eq!(back["createdAt"], "2030-01-01");
        assert_eq!(back["vehicleNumber"], "GJ05-1111");
        assert!(back.get("extra").is_none());
    }

    #[test]
    fn test_trip_with_null_status_keeps_server_fields() {
        let body = r#"{"id":9,"source":"Pune","destination":"Goa","departureTime":"2030-01-01",
            "arrivalTime":null,"status":null,"distanceKm":450}"#;
        let trip: Trip = serde_json::from_str(body).unwrap();
        assert_eq!(trip.status, "");
        assert_eq!(trip.arrival_time, "");
        assert_eq!(serde_json::to_value(&trip).unwrap()["distanceKm"], 450);
    }

    #[test]
    fn test_enum_labels_match_wire_values() {
        assert_eq!(Puc::Expired.as_str(), "Expired");
        assert_eq!(AccidentHistory::MinorAccidents.as_str(), "Minor Accidents");
        assert_eq!(CarryingCapacity::Kg2000.as_str(), "2000kg");
    }
}
