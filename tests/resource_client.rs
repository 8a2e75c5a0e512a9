//! HTTP contract tests for the resource clients against a mock backend

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fleetdash::api::{ApiClient, ApiError, BearerTokenSigner, Resource, ResourceClient};
use fleetdash::config::ApiConfig;
use fleetdash::entities::{Drivers, Entity, Trips, Vehicles};
use fleetdash::models::{Driver, DriverPayload, EntityRef, TripPayload, VehiclePayload};
use fleetdash::session::SessionStore;

struct Fixture {
    server: MockServer,
    session: SessionStore,
    _dir: TempDir,
}

impl Fixture {
    async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let session = SessionStore::new(dir.path().join("session"));
        session.save_token("secret-token").unwrap();
        Self {
            server: MockServer::start().await,
            session,
            _dir: dir,
        }
    }

    fn api(&self) -> ApiClient {
        let config = ApiConfig {
            base_url: self.server.uri(),
            ..ApiConfig::default()
        };
        ApiClient::new(&config, Arc::new(BearerTokenSigner::new(self.session.clone()))).unwrap()
    }

    fn client<E: Entity>(&self) -> ResourceClient<E> {
        ResourceClient::new(self.api())
    }
}

fn vehicle_json(id: i64, number: &str) -> serde_json::Value {
    json!({
        "id": id,
        "vehicleNumber": number,
        "vehicleName": "Tata Ace",
        "vehicleModelNumber": "ACE-2",
        "puc": "Valid",
        "accidentHistory": "No Accidents",
        "carryingCapacity": "1000kg"
    })
}

#[tokio::test]
async fn test_list_sends_bearer_token() {
    let fx = Fixture::new().await;
    Mock::given(method("GET"))
        .and(path("/api/vehicles/GetVehicles"))
        .and(header("Authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([vehicle_json(1, "MH12-1234")])))
        .expect(1)
        .mount(&fx.server)
        .await;

    let vehicles = fx.client::<Vehicles>().list().await.unwrap();
    assert_eq!(vehicles.len(), 1);
    assert_eq!(vehicles[0].vehicle_number, "MH12-1234");
}

#[tokio::test]
async fn test_token_is_read_on_every_call() {
    let fx = Fixture::new().await;
    let client = fx.client::<Drivers>();

    Mock::given(method("GET"))
        .and(path("/api/drivers/getDrivers"))
        .and(header("Authorization", "Bearer rotated"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&fx.server)
        .await;

    fx.session.save_token("rotated").unwrap();
    assert!(client.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_posts_payload_and_returns_server_record() {
    let fx = Fixture::new().await;
    Mock::given(method("POST"))
        .and(path("/api/vehicles/addvehicle"))
        .and(body_json(json!({
            "vehicleNumber": "KA01-5678",
            "vehicleName": "Tata Ace",
            "vehicleModelNumber": "ACE-2",
            "puc": "Valid",
            "accidentHistory": "No Accidents",
            "carryingCapacity": "1000kg"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(vehicle_json(42, "KA01-5678")))
        .expect(1)
        .mount(&fx.server)
        .await;

    let payload = VehiclePayload {
        vehicle_number: "KA01-5678".to_string(),
        vehicle_name: "Tata Ace".to_string(),
        vehicle_model_number: "ACE-2".to_string(),
        puc: "Valid".to_string(),
        accident_history: "No Accidents".to_string(),
        carrying_capacity: "1000kg".to_string(),
    };
    let created = fx.client::<Vehicles>().create(&payload).await.unwrap();
    assert_eq!(created.id, 42);
}

#[tokio::test]
async fn test_trip_update_wraps_references() {
    let fx = Fixture::new().await;
    Mock::given(method("PUT"))
        .and(path("/api/trips/7"))
        .and(body_json(json!({
            "source": "Pune",
            "destination": "Mumbai",
            "departureTime": "2030-05-11T06:00",
            "arrivalTime": "2030-05-11T12:00",
            "status": "Scheduled",
            "driver": {"id": 3},
            "vehicle": {"id": 4}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "source": "Pune",
            "destination": "Mumbai",
            "departureTime": "2030-05-11T06:00",
            "arrivalTime": "2030-05-11T12:00",
            "status": "Scheduled",
            "driver": {"id": 3},
            "vehicle": {"id": 4},
            "driverName": "Asha",
            "vehicleName": "Tata Ace"
        })))
        .expect(1)
        .mount(&fx.server)
        .await;

    let payload = TripPayload {
        source: "Pune".to_string(),
        destination: "Mumbai".to_string(),
        departure_time: "2030-05-11T06:00".to_string(),
        arrival_time: "2030-05-11T12:00".to_string(),
        status: "Scheduled".to_string(),
        driver: EntityRef { id: 3 },
        vehicle: EntityRef { id: 4 },
    };
    let trip = fx.client::<Trips>().update(7, &payload).await.unwrap();
    assert_eq!(trip.driver_name.as_deref(), Some("Asha"));
}

#[tokio::test]
async fn test_driver_update_sends_back_fields_the_form_does_not_edit() {
    let fx = Fixture::new().await;
    let stored = json!({"id": 2, "driverName": "Ravi", "licenseNumber": "MH-42", "phone": "999"});
    Mock::given(method("PUT"))
        .and(path("/api/drivers/2"))
        .and(body_json(json!({"driverName": "Ravi Kumar", "licenseNumber": "MH-42", "phone": "999"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2, "driverName": "Ravi Kumar", "licenseNumber": "MH-42", "phone": "999"
        })))
        .expect(1)
        .mount(&fx.server)
        .await;

    let driver: Driver = serde_json::from_value(stored).unwrap();
    let mut values = Drivers::form_values(&driver);
    values.set("driverName", "Ravi Kumar");
    let payload = Drivers::build_payload(&values, Some(&driver)).unwrap();

    let updated = fx.client::<Drivers>().update(2, &payload).await.unwrap();
    assert_eq!(updated.driver_name, "Ravi Kumar");
    assert_eq!(updated.extra["licenseNumber"], "MH-42");
}

#[tokio::test]
async fn test_list_tolerates_sparse_rows() {
    let fx = Fixture::new().await;
    let mut sparse = vehicle_json(2, "GJ05-1111");
    sparse["puc"] = serde_json::Value::Null;
    sparse["createdAt"] = json!("2030-01-01");
    Mock::given(method("GET"))
        .and(path("/api/vehicles/GetVehicles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([vehicle_json(1, "MH12-1234"), sparse])))
        .mount(&fx.server)
        .await;

    let vehicles = fx.client::<Vehicles>().list().await.unwrap();
    assert_eq!(vehicles.len(), 2);
    assert_eq!(vehicles[1].puc, "");
    assert_eq!(vehicles[1].extra["createdAt"], "2030-01-01");
}

#[tokio::test]
async fn test_delete_accepts_any_success_status() {
    let fx = Fixture::new().await;
    Mock::given(method("DELETE"))
        .and(path("/api/drivers/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&fx.server)
        .await;

    fx.client::<Drivers>().delete(5).await.unwrap();
}

#[tokio::test]
async fn test_rejected_token_maps_to_unauthorized() {
    let fx = Fixture::new().await;
    Mock::given(method("PUT"))
        .and(path("/api/drivers/2"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&fx.server)
        .await;

    let payload = DriverPayload {
        driver_name: "Ravi".to_string(),
        extra: Default::default(),
    };
    let err = fx.client::<Drivers>().update(2, &payload).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { status: 401, .. }));
}

#[tokio::test]
async fn test_server_error_keeps_body() {
    let fx = Fixture::new().await;
    Mock::given(method("GET"))
        .and(path("/api/trips/getTrips"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&fx.server)
        .await;

    let err = fx.client::<Trips>().list().await.unwrap_err();
    match &err {
        ApiError::Status { status, body, .. } => {
            assert_eq!(*status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_unexpected_body_is_a_decode_error() {
    let fx = Fixture::new().await;
    Mock::given(method("GET"))
        .and(path("/api/vehicles/GetVehicles"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&fx.server)
        .await;

    let err = fx.client::<Vehicles>().list().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
}

#[tokio::test]
async fn test_missing_token_sends_nothing() {
    let fx = Fixture::new().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&fx.server)
        .await;

    fx.session.clear().unwrap();
    let err = fx.client::<Vehicles>().list().await.unwrap_err();
    assert!(matches!(err, ApiError::NotAuthenticated));
}

#[tokio::test]
async fn test_trip_references_load_both_sources() {
    let fx = Fixture::new().await;
    Mock::given(method("GET"))
        .and(path("/api/drivers/getDrivers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 3, "driverName": "Asha"}])))
        .mount(&fx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/vehicles/GetVehicles"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&fx.server)
        .await;

    let references = Trips::load_references(&fx.api()).await;
    assert!(references.contains("drivers", 3));
    assert_eq!(references.get("drivers")[0].label, "Asha");
    assert!(references.get("vehicles").is_empty());
}
