//! Proto ↔ native conversion tests.

#![cfg(any(feature = "server", feature = "client"))]

use pack_service::server::proto;
use pack_service::{
    CatalogStore, MediaKind, MemoryCatalog, Pack, PackError, PackSummary, Question, QuestionKind,
};

fn proto_question(price: i32, media_type: &str) -> proto::Question {
    proto::Question {
        id: "q1".to_string(),
        price,
        text: "Q".to_string(),
        answer: "A".to_string(),
        question_type: "normal".to_string(),
        media_type: media_type.to_string(),
        media_url: None,
        media_duration_ms: 0,
    }
}

fn proto_content(questions_count: i32) -> proto::PackContentResponse {
    proto::PackContentResponse {
        found: true,
        pack_id: "p1".to_string(),
        name: "Pack".to_string(),
        author: "tester".to_string(),
        description: String::new(),
        rounds_count: 1,
        questions_count,
        has_media: false,
        status: "approved".to_string(),
        created_at: "2024-01-01T00:00:00Z".to_string(),
        rounds: vec![proto::Round {
            id: "r1".to_string(),
            round_number: 1,
            name: "Round".to_string(),
            themes: vec![proto::Theme {
                id: "t1".to_string(),
                name: "Theme".to_string(),
                questions: vec![proto_question(100, "text")],
            }],
        }],
        error: String::new(),
    }
}

#[test]
fn question_to_proto() {
    let q = Question::text("q1", 300, "What?", "That")
        .with_media(MediaKind::Audio, "https://example.com/a.mp3", 15_000)
        .with_kind(QuestionKind::Stake);
    let p = proto::Question::try_from(&q).unwrap();
    assert_eq!(p.price, 300);
    assert_eq!(p.question_type, "stake");
    assert_eq!(p.media_type, "audio");
    assert_eq!(p.media_url.as_deref(), Some("https://example.com/a.mp3"));
    assert_eq!(p.media_duration_ms, 15_000);

    let back = Question::try_from(p).unwrap();
    assert_eq!(back, q);
}

#[test]
fn oversized_counter_is_encoding_error() {
    let q = Question::text("q1", u32::MAX, "Q", "A");
    let err = proto::Question::try_from(&q).unwrap_err();
    assert!(matches!(err, PackError::Encoding(_)));
}

#[test]
fn negative_price_is_rejected() {
    let err = Question::try_from(proto_question(-5, "text")).unwrap_err();
    assert!(matches!(err, PackError::InvalidInput(_)));
}

#[test]
fn unknown_media_type_is_rejected() {
    assert!(Question::try_from(proto_question(100, "hologram")).is_err());
    let empty = Question::try_from(proto_question(100, "")).unwrap();
    assert_eq!(empty.media_type, MediaKind::Text);
}

#[test]
fn content_from_proto_is_validated() {
    let pack = Pack::try_from(proto_content(1)).unwrap();
    assert_eq!(pack.id(), "p1");
    assert_eq!(pack.questions_count(), 1);

    let err = Pack::try_from(proto_content(2)).unwrap_err();
    assert!(matches!(err, PackError::Catalog(_)));
}

#[test]
fn content_error_field_is_surfaced() {
    let mut content = proto_content(1);
    content.error = "catalog unavailable".to_string();
    let err = Pack::try_from(content).unwrap_err();
    assert!(matches!(err, PackError::Rpc { message, .. } if message == "catalog unavailable"));
}

#[test]
fn summary_reports_approved_and_media() {
    let catalog = MemoryCatalog::embedded().unwrap();
    let summary = catalog
        .get_summary("550e8400-e29b-41d4-a716-446655440004")
        .unwrap();
    let p = proto::PackInfoResponse::try_from(&summary).unwrap();
    assert!(p.found);
    assert!(p.has_media);
    assert_eq!(p.status, "approved");

    let back = PackSummary::try_from(p).unwrap();
    assert_eq!(back, summary);
}

#[test]
fn embedded_packs_survive_proto() {
    let catalog = MemoryCatalog::embedded().unwrap();
    for summary in catalog.list_summaries() {
        let pack = catalog.get_full(&summary.id).unwrap();
        let wire = proto::PackContentResponse::try_from(pack.as_ref()).unwrap();
        assert_eq!(wire.rounds.len() as i32, wire.rounds_count);
        assert_eq!(Pack::try_from(wire).unwrap(), *pack);
    }
}
