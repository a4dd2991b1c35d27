use recipe_copilot::nats::messages::{
    NarrationAction, NarrationEventMessage, NarrationRequest, RecognitionAction,
    RecognitionControl, TranscriptMessage,
};

#[test]
fn test_narration_request_serialization() {
    let msg = NarrationRequest {
        session_id: "copilot-test".to_string(),
        utterance_id: "u-1".to_string(),
        action: NarrationAction::Speak,
        text: Some("Chop onions".to_string()),
        timestamp: "2025-10-27T14:30:00Z".to_string(),
    };

    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("\"action\":\"speak\""));
    assert!(json.contains("\"text\":\"Chop onions\""));
    assert!(json.contains("\"utterance_id\":\"u-1\""));
}

#[test]
fn test_narration_control_omits_text() {
    let msg = NarrationRequest {
        session_id: "copilot-test".to_string(),
        utterance_id: "u-1".to_string(),
        action: NarrationAction::Stop,
        text: None,
        timestamp: "2025-10-27T14:30:00Z".to_string(),
    };

    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("\"action\":\"stop\""));
    assert!(!json.contains("\"text\""));
}

#[test]
fn test_narration_event_deserialization() {
    let json = r#"{
        "session_id": "copilot-test",
        "utterance_id": "u-1",
        "event": "error",
        "error": "interrupted"
    }"#;

    let msg: NarrationEventMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.event, "error");
    assert_eq!(msg.error.as_deref(), Some("interrupted"));

    let json = r#"{"session_id": "copilot-test", "utterance_id": "u-1", "event": "finished"}"#;
    let msg: NarrationEventMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.event, "finished");
    assert_eq!(msg.error, None);
}

#[test]
fn test_recognition_control_serialization() {
    let msg = RecognitionControl {
        session_id: "copilot-test".to_string(),
        action: RecognitionAction::Start,
        timestamp: "2025-10-27T14:30:00Z".to_string(),
    };

    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("\"action\":\"start\""));
    assert!(json.contains("copilot-test"));
}

#[test]
fn test_transcript_deserialization() {
    let json = r#"{
        "session_id": "copilot-test",
        "text": "Next step",
        "partial": false,
        "timestamp": "2025-10-27T14:30:05Z",
        "confidence": 0.95
    }"#;

    let msg: TranscriptMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.session_id, "copilot-test");
    assert_eq!(msg.text, "Next step");
    assert!(!msg.partial);
    assert_eq!(msg.confidence, Some(0.95));
}

#[test]
fn test_transcript_no_confidence() {
    let json = r#"{
        "session_id": "copilot-test",
        "text": "go back",
        "partial": true,
        "timestamp": "2025-10-27T14:30:05Z"
    }"#;

    let msg: TranscriptMessage = serde_json::from_str(json).unwrap();
    assert!(msg.partial);
    assert_eq!(msg.confidence, None);
}
