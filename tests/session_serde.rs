//! Session state survives a JSON round trip, as an embedding UI would persist it.

use sci_calc::{AngleMode, HistoryEntry, MemoryRegister, Session};

#[test]
fn test_angle_mode_json() {
    assert_eq!(serde_json::to_string(&AngleMode::Degrees).unwrap(), "\"Degrees\"");
    let mode: AngleMode = serde_json::from_str("\"Radians\"").unwrap();
    assert_eq!(mode, AngleMode::Radians);
}

#[test]
fn test_history_entry_json() {
    let entry = Session::default().commit("2×(3+4)^2").unwrap();
    let json = serde_json::to_string(&entry).unwrap();
    assert_eq!(json, r#"{"expression":"2×(3+4)^2","result":"98"}"#);
    let back: HistoryEntry = serde_json::from_str(&json).unwrap();
    assert_eq!(back, entry);
}

#[test]
fn test_memory_register_json() {
    let register = MemoryRegister::new(12.5);
    let json = serde_json::to_value(register).unwrap();
    assert_eq!(json, serde_json::json!({ "value": 12.5 }));
    let back: MemoryRegister = serde_json::from_value(json).unwrap();
    assert_eq!(back.value(), 12.5);
}

#[test]
fn test_session_round_trip_keeps_mode_and_memory() {
    let mut session = Session::new(AngleMode::Radians);
    session.memory_add("40+2");

    let json = serde_json::to_string(&session).unwrap();
    let restored: Session = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.angle_mode(), AngleMode::Radians);
    assert_eq!(restored.memory_recall(), "42");
    // trigonometry follows the restored mode, not the default one
    assert_eq!(restored.preview("sin(π÷2)"), "1");
    assert_ne!(restored.preview("sin(90)"), "1");
}
