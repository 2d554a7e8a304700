use crate::{
    domain::{parse_tags, AccessToken, Category, Entry, EntryId, NewEntry, UserId},
    error::service_error_message,
    protocol::{Ordering, TokenResponse},
};
use serde_json::json;
use uuid::Uuid;

const OWNER: &str = "6f1c2d0e-9a55-4a3b-8f7e-1b2c3d4e5f60";

#[test]
fn entry_row_deserializes_from_table_columns() {
    let row = json!({
        "id": 42,
        "message": "wire up login",
        "description": "password grant only",
        "commit_type": "Feature",
        "project_tags": ["auth", "ui"],
        "user_id": OWNER,
        "created_at": "2024-05-01T12:30:00+00:00"
    });

    let entry: Entry = serde_json::from_value(row).expect("entry");
    assert_eq!(entry.id, EntryId("42".into()));
    assert_eq!(entry.category, Category::Feature);
    assert_eq!(entry.tags, vec!["auth".to_string(), "ui".to_string()]);
    assert_eq!(entry.owner_id, UserId(Uuid::parse_str(OWNER).expect("uuid")));
    assert_eq!(entry.description(), Some("password grant only"));
}

#[test]
fn null_tags_and_blank_description_read_as_absent() {
    let row = json!({
        "id": "b7c1",
        "message": "hotfix",
        "description": "",
        "commit_type": "Crash",
        "project_tags": null,
        "user_id": OWNER,
        "created_at": "2024-05-01T12:30:00Z"
    });

    let entry: Entry = serde_json::from_value(row).expect("entry");
    assert_eq!(entry.id.to_string(), "b7c1");
    assert!(entry.tags.is_empty());
    assert_eq!(entry.description(), None);
}

#[test]
fn new_entry_serializes_with_table_column_names() {
    let payload = NewEntry {
        message: "split gateway".into(),
        description: String::new(),
        category: Category::Refactor,
        tags: vec!["core".into()],
        owner_id: UserId(Uuid::parse_str(OWNER).expect("uuid")),
    };

    let value = serde_json::to_value(&payload).expect("json");
    assert_eq!(
        value,
        json!({
            "message": "split gateway",
            "description": "",
            "commit_type": "Refactor",
            "project_tags": ["core"],
            "user_id": OWNER
        })
    );
}

#[test]
fn category_parses_case_insensitively() {
    assert_eq!("fix".parse::<Category>().expect("fix"), Category::Fix);
    assert_eq!(" DESIGN ".parse::<Category>().expect("design"), Category::Design);
    let err = "chore".parse::<Category>().expect_err("unknown");
    assert!(err.to_string().contains("chore"));
    assert_eq!(Category::default(), Category::Feature);
}

#[test]
fn parse_tags_trims_and_drops_empty_pieces() {
    assert_eq!(parse_tags(" a, b ,,c "), vec!["a", "b", "c"]);
    assert!(parse_tags("").is_empty());
    assert!(parse_tags(" , ").is_empty());
}

#[test]
fn access_token_debug_is_redacted() {
    let token = AccessToken::new("secret-jwt");
    assert!(!format!("{token:?}").contains("secret-jwt"));
    assert_eq!(token.expose(), "secret-jwt");
}

#[test]
fn token_response_becomes_session() {
    let body = json!({
        "access_token": "jwt",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "r",
        "user": { "id": OWNER, "email": "dev@example.com" }
    });
    let session = serde_json::from_value::<TokenResponse>(body)
        .expect("token")
        .into_session();
    assert_eq!(session.email.as_deref(), Some("dev@example.com"));
    assert_eq!(session.access_token.expose(), "jwt");
}

#[test]
fn newest_first_ordering_query_value() {
    assert_eq!(Ordering::NEWEST_FIRST.to_query_value(), "created_at.desc");
}

#[test]
fn service_error_message_prefers_description_fields() {
    assert_eq!(
        service_error_message(
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
            "Bad Request"
        ),
        "Invalid login credentials"
    );
    assert_eq!(
        service_error_message(r#"{"code":"42501","message":"row-level security"}"#, "Forbidden"),
        "row-level security"
    );
    assert_eq!(
        service_error_message(r#"{"code":400,"msg":"missing email"}"#, "Bad Request"),
        "missing email"
    );
    assert_eq!(service_error_message("upstream down", "Bad Gateway"), "upstream down");
    assert_eq!(service_error_message("  ", "Bad Gateway"), "Bad Gateway");
}
