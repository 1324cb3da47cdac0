//! Catalog construction and lookup tests.

use std::sync::Arc;

use pack_service::{
    CatalogStore, MediaKind, MemoryCatalog, MetricsCollector, Pack, PackError, PackLookup,
    PackRecord, Question, Round, Theme, Lookup,
};

fn pack(id: &str, prices: &[u32]) -> Pack {
    let questions = prices
        .iter()
        .enumerate()
        .map(|(i, &price)| Question::text(format!("q{i}"), price, format!("Q{i}"), format!("A{i}")))
        .collect::<Vec<_>>();
    Pack::from_record(PackRecord {
        id: id.to_string(),
        name: format!("Pack {id}"),
        author: "tester".to_string(),
        description: String::new(),
        rounds_count: 1,
        questions_count: questions.len() as u32,
        created_at: "2024-01-01T00:00:00".to_string(),
        rounds: vec![Round {
            id: "r1".to_string(),
            round_number: 1,
            name: "Round 1".to_string(),
            themes: vec![Theme {
                id: "t1".to_string(),
                name: "Theme".to_string(),
                questions,
            }],
        }],
    })
    .unwrap()
}

#[test]
fn embedded_catalog_has_four_packs() {
    let catalog = MemoryCatalog::embedded().unwrap();
    assert_eq!(catalog.len(), 4);
    assert!(catalog.exists("550e8400-e29b-41d4-a716-446655440001"));
    assert!(!catalog.exists("does-not-exist"));
}

#[test]
fn embedded_counters_match_structure() {
    let catalog = MemoryCatalog::embedded().unwrap();
    for summary in catalog.list_summaries() {
        let pack = catalog.get_full(&summary.id).unwrap();
        assert_eq!(summary.rounds_count as usize, pack.rounds().len());
        let questions: usize = pack.rounds().iter().map(Round::question_count).sum();
        assert_eq!(summary.questions_count as usize, questions);
    }
}

#[test]
fn has_media_reflects_questions() {
    let catalog = MemoryCatalog::embedded().unwrap();
    let media = catalog
        .get_summary("550e8400-e29b-41d4-a716-446655440004")
        .unwrap();
    assert!(media.has_media);
    let plain = catalog
        .get_summary("550e8400-e29b-41d4-a716-446655440001")
        .unwrap();
    assert!(!plain.has_media);

    let pack = catalog.get_full("550e8400-e29b-41d4-a716-446655440004").unwrap();
    assert!(
        pack.rounds()
            .iter()
            .flat_map(|r| &r.themes)
            .flat_map(|t| &t.questions)
            .any(|q| q.media_type == MediaKind::Video)
    );
}

#[test]
fn list_keeps_insertion_order() {
    let catalog = MemoryCatalog::new([pack("b", &[100]), pack("a", &[100]), pack("c", &[100])])
        .unwrap();
    let ids: Vec<_> = catalog.list_summaries().into_iter().map(|s| s.id).collect();
    assert_eq!(ids, ["b", "a", "c"]);
}

#[test]
fn duplicate_pack_ids_are_rejected() {
    let err = MemoryCatalog::new([pack("p1", &[100]), pack("p1", &[200])]).unwrap_err();
    assert!(matches!(err, PackError::Catalog(_)));
}

#[test]
fn mismatched_counters_are_rejected() {
    let json = r#"[{
        "id": "p1", "name": "P", "author": "a", "description": "",
        "rounds_count": 1, "questions_count": 2,
        "created_at": "2024-01-01T00:00:00",
        "rounds": [{"id": "r1", "round_number": 1, "name": "R", "themes": [
            {"id": "t1", "name": "T", "questions": [
                {"id": "q1", "price": 100, "text": "Q", "answer": "A"}
            ]}
        ]}]
    }]"#;
    assert!(MemoryCatalog::from_json(json).is_err());
}

#[test]
fn fixture_with_unservable_id_fails_to_load() {
    let json = r#"[{
        "id": "пак-1", "name": "P", "author": "a", "description": "",
        "rounds_count": 1, "questions_count": 1,
        "created_at": "2024-01-01T00:00:00",
        "rounds": [{"id": "r1", "round_number": 1, "name": "R", "themes": [
            {"id": "t1", "name": "T", "questions": [
                {"id": "q1", "price": 100, "text": "Q", "answer": "A"}
            ]}
        ]}]
    }]"#;
    let err = MemoryCatalog::from_json(json).unwrap_err();
    assert!(err.to_string().contains("invalid character"), "{err}");
}

#[test]
fn full_content_is_shared_not_copied() {
    let catalog = MemoryCatalog::new([pack("p1", &[100, 200])]).unwrap();
    let first = catalog.get_full("p1").unwrap();
    let second = catalog.get_full("p1").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn lookup_distinguishes_absent_and_malformed() {
    let catalog = MemoryCatalog::new([pack("p1", &[100])]).unwrap();
    let lookup = PackLookup::new(Arc::new(catalog), Arc::new(MetricsCollector::new().unwrap()));

    assert!(lookup.info("p1").is_found());
    assert_eq!(lookup.info("does-not-exist"), Lookup::NotFound);
    assert!(matches!(lookup.info("no spaces"), Lookup::Invalid(_)));
    assert_eq!(lookup.exists("does-not-exist"), Lookup::Found(false));
    assert_eq!(lookup.exists("p1"), Lookup::Found(true));

    let list = lookup.list();
    assert!(matches!(list, Lookup::Found(ref l) if l.total == 1 && l.packs[0].id == "p1"));
}
