//! The bundled `content/` directory loads cleanly and answers queries.

use std::path::PathBuf;
use std::sync::Arc;

use vademecum::source::ContentSource;
use vademecum::{select_level, EntityKind, QueryService};

fn bundled() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("content")
}

#[test]
fn test_bundled_content_is_valid() {
    let source = ContentSource::from_paths(&[bundled()]).unwrap();
    assert_eq!(source.files.len(), 2);
    assert!(vademecum::services::validate_all(&source.taxonomy, &source.entities).is_empty());
}

#[test]
fn test_bundled_content_queries() {
    let catalog = ContentSource::from_paths(&[bundled()])
        .unwrap()
        .into_catalog()
        .unwrap();
    let svc = QueryService::new(Arc::new(catalog));

    let htn = svc.get_by_id("htn-stepped").unwrap();
    assert_eq!(htn.kind, EntityKind::Algorithm);
    assert_eq!(select_level(htn, 4).unwrap().steps.len(), 5);

    let hits: Vec<&str> = svc.search("wheezing").into_iter().map(|e| e.id.as_str()).collect();
    // chronic-disease.json sorts before emergency.json
    assert_eq!(hits, vec!["copd-gold", "acute-asthma"]);

    let stats = svc.stats();
    assert_eq!(stats.entity_count, 4);
    assert_eq!(stats.topic_count, 1);
}
