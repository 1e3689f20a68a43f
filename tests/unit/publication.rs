use lab_backend::{
    db::{enums::PublicationKind, models::publication::CreatePublicationRequest},
    validation::publication::{normalize_authors, normalize_doi, validate_publication_title},
};
use validator::Validate;

#[test]
fn test_doi_normalization() {
    assert_eq!(
        normalize_doi(" https://dx.doi.org/10.48550/arXiv.1706.03762 ").unwrap(),
        "10.48550/arxiv.1706.03762"
    );
    assert!(normalize_doi("not-a-doi").is_err());
    assert!(normalize_doi("10.abc/def").is_err());
}

#[test]
fn test_authors_and_title() {
    let authors = vec![" Ada ".to_string(), "".to_string(), "Grace".to_string()];
    assert_eq!(normalize_authors(&authors).unwrap(), vec!["Ada", "Grace"]);
    assert!(normalize_authors(&["  ".to_string()]).is_err());
    assert!(validate_publication_title(&"t".repeat(301)).is_err());
}

#[test]
fn test_create_publication_request_uses_abstract_key() {
    let req: CreatePublicationRequest = serde_json::from_value(serde_json::json!({
        "title": "Attention Is All You Need",
        "authors": ["Vaswani"],
        "kind": "conference",
        "publication_date": "2017-06-12",
        "abstract": "Transformers."
    }))
    .unwrap();
    assert_eq!(req.kind, Some(PublicationKind::Conference));
    assert_eq!(req.abstract_text.as_deref(), Some("Transformers."));
    assert!(req.validate().is_ok());

    let no_authors: CreatePublicationRequest = serde_json::from_value(serde_json::json!({
        "title": "Untitled",
        "authors": [],
        "publication_date": "2017-06-12"
    }))
    .unwrap();
    assert!(no_authors.validate().is_err());
}
