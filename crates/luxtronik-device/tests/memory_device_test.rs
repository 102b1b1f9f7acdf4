#![allow(clippy::unwrap_used)]
// Integration tests for `MemoryDevice` driven through the `DeviceClient` trait.

use pretty_assertions::assert_eq;
use serde_json::json;

use luxtronik_device::{DeviceClient, Error, Group, MemoryDevice, Value};

// ── Helpers ─────────────────────────────────────────────────────────

fn dump() -> String {
    json!({
        "parameters": [
            { "index": 3, "name": "ID_Ba_Hz_akt", "value": "Automatic" },
            { "index": 4, "name": "ID_Ba_Bw_akt", "value": "Off" },
            { "index": 108, "name": "ID_Einst_MK1Typ_akt", "value": 0 }
        ],
        "calculations": [
            { "index": 10, "name": "ID_WEB_Temperatur_TVL", "value": 31.4, "unit": "°C" },
            { "index": 78, "name": "ID_WEB_Code_WP_akt", "value": "LD9" }
        ],
        "visibilities": [
            { "index": 23, "name": "ID_Visi_Vorlauf", "value": true }
        ]
    })
    .to_string()
}

fn boxed(device: &MemoryDevice) -> Box<dyn DeviceClient> {
    Box::new(device.clone())
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_read_through_trait_object() {
    let device = MemoryDevice::from_json(&dump()).unwrap();
    let mut client = boxed(&device);

    let snapshot = client.read().await.unwrap();

    assert_eq!(snapshot.parameters.len(), 3);
    let flow = snapshot.get(Group::Calculations, "ID_WEB_Temperatur_TVL").unwrap();
    assert_eq!(flow.value, Value::Float(31.4));
    assert_eq!(flow.unit.as_deref(), Some("°C"));
    assert_eq!(
        snapshot.get(Group::Visibilities, "23").unwrap().value,
        Value::Bool(true)
    );
    assert_eq!(device.reads(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_read_delay_is_observed() {
    let device = MemoryDevice::from_json(&dump()).unwrap();
    device.set_read_delay(std::time::Duration::from_secs(5));
    let mut client = boxed(&device);

    let started = tokio::time::Instant::now();
    client.read().await.unwrap();

    assert!(started.elapsed() >= std::time::Duration::from_secs(5));
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_write_is_echoed_by_next_read() {
    let device = MemoryDevice::from_json(&dump()).unwrap();
    let mut client = boxed(&device);

    client.set_parameter("ID_Ba_Bw_akt", Value::from("Automatic")).unwrap();
    client.write().await.unwrap();

    let snapshot = client.read().await.unwrap();
    assert_eq!(
        snapshot.parameters.get("ID_Ba_Bw_akt").unwrap().value,
        Value::from("Automatic")
    );
    assert_eq!(device.commits(), 1);
}

#[tokio::test]
async fn test_staging_an_unknown_parameter_fails() {
    let device = MemoryDevice::from_json(&dump()).unwrap();
    let mut client = boxed(&device);

    let result = client.set_parameter("ID_Does_Not_Exist", Value::Integer(1));

    assert!(
        matches!(result, Err(Error::UnknownParameter(_))),
        "expected UnknownParameter, got: {result:?}"
    );
}

#[test]
fn test_malformed_dump_is_a_serialization_error() {
    let result = MemoryDevice::from_json("{ \"parameters\": 3 }");
    assert!(matches!(result, Err(Error::Serialization(_))));
}

#[tokio::test]
async fn test_dump_reloads_after_writing_nan_input() {
    let device = MemoryDevice::from_json(&dump()).unwrap();
    let mut client = boxed(&device);

    let value: Value = "NaN".parse().unwrap();
    client.set_parameter("ID_Ba_Hz_akt", value).unwrap();
    client.write().await.unwrap();

    let reloaded = MemoryDevice::from_json(&device.to_json().unwrap()).unwrap();
    assert_eq!(
        reloaded.snapshot().parameters.get("ID_Ba_Hz_akt").unwrap().value,
        Value::from("NaN")
    );
}

#[tokio::test]
async fn test_non_finite_float_is_refused() {
    let device = MemoryDevice::from_json(&dump()).unwrap();
    let mut client = boxed(&device);

    let err = client
        .set_parameter("ID_Einst_MK1Typ_akt", Value::Float(f64::INFINITY))
        .unwrap_err();
    assert!(matches!(err, Error::Rejected { ref field, .. } if field == "ID_Einst_MK1Typ_akt"));

    client.write().await.unwrap();
    assert!(MemoryDevice::from_json(&device.to_json().unwrap()).is_ok());
}
