use std::sync::OnceLock;

use regex::Regex;

use super::{Endpoints, Entity};
use crate::crud::Column;
use crate::form::{FieldErrors, FieldSchema, FormSchema, FormValues};
use crate::models::{AccidentHistory, CarryingCapacity, Puc, Vehicle, VehiclePayload};

#[derive(Debug, Clone, Copy, Default)]
pub struct Vehicles;

fn vehicle_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Z]{2,3}\d{2,4}(-\d{4})?$").expect("vehicle number pattern is valid")
    })
}

impl Entity for Vehicles {
    type Record = Vehicle;
    type Payload = VehiclePayload;

    const NAME: &'static str = "Vehicle";
    const PLURAL: &'static str = "Vehicles";

    fn endpoints() -> Endpoints {
        Endpoints {
            list: "/api/vehicles/GetVehicles",
            create: "/api/vehicles/addvehicle",
            item_prefix: "/api/vehicles",
        }
    }

    fn schema() -> FormSchema {
        let puc: Vec<&str> = Puc::ALL.iter().map(|p| p.as_str()).collect();
        let history: Vec<&str> = AccidentHistory::ALL.iter().map(|h| h.as_str()).collect();
        let capacity: Vec<&str> = CarryingCapacity::ALL.iter().map(|c| c.as_str()).collect();

        FormSchema::new(vec![
            FieldSchema::text("vehicleNumber", "Vehicle Number")
                .with_placeholder("XX12-1234 or XX1234")
                .required("Vehicle number is required")
                .pattern(
                    vehicle_number_pattern(),
                    "Vehicle number must be in the format: XX12-1234 or XX1234",
                ),
            FieldSchema::text("vehicleName", "Vehicle Name")
                .required("Vehicle name is required")
                .length(
                    2,
                    50,
                    "Vehicle name must be at least 2 characters long",
                    "Vehicle name cannot exceed 50 characters",
                ),
            FieldSchema::text("vehicleModelNumber", "Model Number")
                .required("Vehicle model number is required")
                .length(
                    2,
                    50,
                    "Vehicle model number must be at least 2 characters long",
                    "Vehicle model number cannot exceed 50 characters",
                ),
            FieldSchema::choice("puc", "PUC", &puc)
                .required("PUC is required")
                .one_of("PUC must be either \"Valid\" or \"Expired\""),
            FieldSchema::choice("accidentHistory", "Accident History", &history)
                .required("Accident history is required")
                .one_of("Accident history must be one of the specified options"),
            FieldSchema::choice("carryingCapacity", "Carrying Capacity", &capacity)
                .required("Carrying capacity is required")
                .one_of("Select a valid carrying capacity"),
        ])
    }

    fn columns() -> Vec<Column<Vehicle>> {
        vec![
            Column::new("Vehicle Number", "vehicleNumber", 14, |v| v.vehicle_number.clone()),
            Column::new("Vehicle Name", "vehicleName", 20, |v| v.vehicle_name.clone()),
            Column::new("Model Number", "vehicleModelNumber", 14, |v| v.vehicle_model_number.clone()),
            Column::new("PUC", "puc", 8, |v| v.puc.clone()),
            Column::new("Accident History", "accidentHistory", 16, |v| v.accident_history.clone()),
            Column::new("Capacity", "carryingCapacity", 9, |v| v.carrying_capacity.clone()),
        ]
    }

    fn form_values(record: &Vehicle) -> FormValues {
        FormValues::new()
            .with("vehicleNumber", record.vehicle_number.as_str())
            .with("vehicleName", record.vehicle_name.as_str())
            .with("vehicleModelNumber", record.vehicle_model_number.as_str())
            .with("puc", record.puc.as_str())
            .with("accidentHistory", record.accident_history.as_str())
            .with("carryingCapacity", record.carrying_capacity.as_str())
    }

    fn build_payload(values: &FormValues, _editing: Option<&Vehicle>) -> Result<VehiclePayload, FieldErrors> {
        Ok(VehiclePayload {
            vehicle_number: values.get("vehicleNumber").to_string(),
            vehicle_name: values.get("vehicleName").to_string(),
            vehicle_model_number: values.get("vehicleModelNumber").to_string(),
            puc: values.get("puc").to_string(),
            accident_history: values.get("accidentHistory").to_string(),
            carrying_capacity: values.get("carryingCapacity").to_string(),
        })
    }
}
