use super::{Endpoints, Entity};
use crate::crud::Column;
use crate::form::{FieldErrors, FieldSchema, FormSchema, FormValues};
use crate::models::{Driver, DriverPayload};

/// Drivers are referenced by trips; the screen manages only the display name
#[derive(Debug, Clone, Copy, Default)]
pub struct Drivers;

impl Entity for Drivers {
    type Record = Driver;
    type Payload = DriverPayload;

    const NAME: &'static str = "Driver";
    const PLURAL: &'static str = "Drivers";

    fn endpoints() -> Endpoints {
        Endpoints {
            list: "/api/drivers/getDrivers",
            create: "/api/drivers/adddriver",
            item_prefix: "/api/drivers",
        }
    }

    fn schema() -> FormSchema {
        FormSchema::new(vec![FieldSchema::text("driverName", "Driver Name")
            .required("Driver name is required")
            .length(
                2,
                50,
                "Driver name must be at least 2 characters long",
                "Driver name cannot exceed 50 characters",
            )])
    }

    fn columns() -> Vec<Column<Driver>> {
        vec![
            Column::new("Id", "id", 6, |d| d.id.to_string()),
            Column::new("Driver Name", "driverName", 30, |d| d.driver_name.clone()),
        ]
    }

    fn form_values(record: &Driver) -> FormValues {
        FormValues::new().with("driverName", record.driver_name.as_str())
    }

    fn build_payload(values: &FormValues, editing: Option<&Driver>) -> Result<DriverPayload, FieldErrors> {
        Ok(DriverPayload {
            driver_name: values.get("driverName").to_string(),
            extra: editing.map(|d| d.extra.clone()).unwrap_or_default(),
        })
    }
}
