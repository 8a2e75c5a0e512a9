use async_trait::async_trait;
use tracing::{debug, warn};

use super::{parse_id, Drivers, Endpoints, Entity, Vehicles};
use crate::api::{ApiClient, Resource, ResourceClient};
use crate::crud::Column;
use crate::form::{FieldErrors, FieldSchema, FormSchema, FormValues, RefOption, ReferenceOptions};
use crate::models::{EntityRef, Trip, TripPayload};

pub const DRIVER_SOURCE: &str = "drivers";
pub const VEHICLE_SOURCE: &str = "vehicles";

#[derive(Debug, Clone, Copy, Default)]
pub struct Trips;

#[async_trait]
impl Entity for Trips {
    type Record = Trip;
    type Payload = TripPayload;

    const NAME: &'static str = "Trip";
    const PLURAL: &'static str = "Trips";

    fn endpoints() -> Endpoints {
        Endpoints {
            list: "/api/trips/getTrips",
            create: "/api/trips/postTrip",
            item_prefix: "/api/trips",
        }
    }

    fn schema() -> FormSchema {
        FormSchema::new(vec![
            FieldSchema::text("source", "Source").required("Source is required"),
            FieldSchema::text("destination", "Destination").required("Destination is required"),
            FieldSchema::datetime("departureTime", "Departure Time")
                .required("Departure time is required")
                .not_before_now("Departure time cannot be in the past"),
            FieldSchema::datetime("arrivalTime", "Arrival Time")
                .required("Arrival time is required")
                .not_before("departureTime", "Arrival time must be later than departure time"),
            FieldSchema::text("status", "Status").required("Status is required"),
            FieldSchema::reference("driver", "Driver", DRIVER_SOURCE)
                .required("Driver is required")
                .must_reference("Select a driver from the list"),
            FieldSchema::reference("vehicle", "Vehicle", VEHICLE_SOURCE)
                .required("Vehicle is required")
                .must_reference("Select a vehicle from the list"),
        ])
    }

    fn columns() -> Vec<Column<Trip>> {
        vec![
            Column::new("Source", "source", 14, |t| t.source.clone()),
            Column::new("Destination", "destination", 14, |t| t.destination.clone()),
            Column::new("Departure Time", "departureTime", 19, |t| t.departure_time.clone()),
            Column::new("Arrival Time", "arrivalTime", 19, |t| t.arrival_time.clone()),
            Column::new("Status", "status", 12, |t| t.status.clone()),
            Column::new("Driver", "driverName", 16, |t| t.driver_name.clone().unwrap_or_default()),
            Column::new("Vehicle", "vehicleName", 16, |t| t.vehicle_name.clone().unwrap_or_default()),
        ]
    }

    fn form_values(record: &Trip) -> FormValues {
        let id_or_blank = |r: Option<EntityRef>| r.map(|r| r.id.to_string()).unwrap_or_default();
        FormValues::new()
            .with("source", record.source.as_str())
            .with("destination", record.destination.as_str())
            .with("departureTime", record.departure_time.as_str())
            .with("arrivalTime", record.arrival_time.as_str())
            .with("status", record.status.as_str())
            .with("driver", id_or_blank(record.driver))
            .with("vehicle", id_or_blank(record.vehicle))
    }

    fn build_payload(values: &FormValues, _editing: Option<&Trip>) -> Result<TripPayload, FieldErrors> {
        let mut errors = FieldErrors::new();
        let driver = parse_id(values, "driver", &mut errors);
        let vehicle = parse_id(values, "vehicle", &mut errors);

        match (driver, vehicle) {
            (Some(driver), Some(vehicle)) => Ok(TripPayload {
                source: values.get("source").to_string(),
                destination: values.get("destination").to_string(),
                departure_time: values.get("departureTime").to_string(),
                arrival_time: values.get("arrivalTime").to_string(),
                status: values.get("status").to_string(),
                driver: EntityRef { id: driver },
                vehicle: EntityRef { id: vehicle },
            }),
            _ => Err(errors),
        }
    }

    /// Fetch driver and vehicle option lists side by side
    async fn load_references(api: &ApiClient) -> ReferenceOptions {
        let drivers = ResourceClient::<Drivers>::new(api.clone());
        let vehicles = ResourceClient::<Vehicles>::new(api.clone());
        let (drivers, vehicles) = futures::join!(drivers.list(), vehicles.list());

        let mut options = ReferenceOptions::new();
        match drivers {
            Ok(list) => options.set(
                DRIVER_SOURCE,
                list.into_iter()
                    .map(|d| RefOption::new(d.id, d.driver_name))
                    .collect(),
            ),
            Err(e) => warn!("Error fetching drivers: {}", e),
        }
        match vehicles {
            Ok(list) => options.set(
                VEHICLE_SOURCE,
                list.into_iter()
                    .map(|v| RefOption::new(v.id, v.vehicle_name))
                    .collect(),
            ),
            Err(e) => warn!("Error fetching vehicles: {}", e),
        }

        debug!(
            "Loaded {} driver and {} vehicle options",
            options.get(DRIVER_SOURCE).len(),
            options.get(VEHICLE_SOURCE).len()
        );
        options
    }
}
