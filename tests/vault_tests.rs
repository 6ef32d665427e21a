//! Integration tests for the SafeKeep vault module.

use std::fs;

use chrono::Utc;
use safekeep::crypto::Argon2Params;
use safekeep::errors::SafeKeepError;
use safekeep::vault::import::document_from_json;
use safekeep::vault::{
    create_empty, decode, encode, read_vault_file, write_vault_file, Entry, EntryDraft,
};
use tempfile::TempDir;

const FAST: Argon2Params = Argon2Params {
    memory_kib: 8_192,
    iterations: 1,
    parallelism: 1,
};

fn sample_entry(id: i64) -> Entry {
    Entry::from_draft(
        Some(id),
        EntryDraft::new("Example", "p1")
            .with_username("u")
            .with_url("https://example.com"),
        Utc::now(),
    )
}

// ---------------------------------------------------------------------------
// Encode / decode
// ---------------------------------------------------------------------------

#[test]
fn encode_decode_round_trip() {
    let mut doc = create_empty(Some("Round Trip"));
    doc.entries.push(sample_entry(1));
    doc.entries
        .push(Entry::from_draft(Some(2), EntryDraft::new("Bare", "x"), Utc::now()));

    let token = encode(&doc, "pw-12345", &FAST).unwrap();
    assert_eq!(decode(&token, "pw-12345").unwrap(), doc);
}

#[test]
fn end_to_end_example_vault() {
    let mut doc = create_empty(Some("Test"));
    doc.entries.push(sample_entry(1));

    let token = encode(&doc, "master123", &FAST).unwrap();

    let opened = decode(&token, "master123").unwrap();
    assert_eq!(opened.entries.len(), 1);
    assert_eq!(opened.entries[0].site_name, "Example");
    assert_eq!(opened.display_name(), "Test");

    assert!(matches!(
        decode(&token, "wrong"),
        Err(SafeKeepError::InvalidVault)
    ));
}

#[test]
fn decrypted_but_malformed_json_is_invalid_vault() {
    let params = &FAST;
    for body in [
        "not json",
        r#"{"entries": []}"#,
        r#"{"metadata": {}, "entries": {}}"#,
        r#"{"metadata": "x", "entries": []}"#,
    ] {
        let token = safekeep::crypto::seal(body, "pw", params).unwrap();
        assert!(
            matches!(decode(&token, "pw"), Err(SafeKeepError::InvalidVault)),
            "body should be rejected: {body}"
        );
    }
}

#[test]
fn future_major_version_is_unsupported() {
    let mut doc = create_empty(None);
    doc.metadata.version = "2.0.0".into();
    let token = encode(&doc, "pw", &FAST).unwrap();
    assert!(matches!(
        decode(&token, "pw"),
        Err(SafeKeepError::UnsupportedVersion(v)) if v == "2.0.0"
    ));
}

#[test]
fn optional_fields_are_omitted_from_json() {
    let entry = Entry::from_draft(Some(1), EntryDraft::new("Bare", "x"), Utc::now());
    let json = serde_json::to_string(&entry).unwrap();
    assert!(!json.contains("site_url"));
    assert!(!json.contains("notes"));
    assert!(json.contains("\"site_name\""));
    assert!(json.contains("\"created_at\""));
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

#[test]
fn write_and_read_vault_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.vault");

    let mut doc = create_empty(Some("Disk"));
    doc.entries.push(sample_entry(1));
    write_vault_file(&path, &doc, "pw-12345", &FAST).unwrap();

    // No leftover temp file.
    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["test.vault"]);

    let raw = fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("Example"), "vault file must not leak plaintext");

    assert_eq!(read_vault_file(&path, "pw-12345").unwrap(), doc);
}

#[test]
fn read_missing_vault_is_not_found() {
    let dir = TempDir::new().unwrap();
    let err = read_vault_file(&dir.path().join("nope.vault"), "pw").unwrap_err();
    assert!(matches!(err, SafeKeepError::VaultNotFound(_)));
}

#[test]
fn read_binary_garbage_is_invalid_vault() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("junk.vault");
    fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();
    assert!(matches!(
        read_vault_file(&path, "pw"),
        Err(SafeKeepError::InvalidVault)
    ));
}

#[cfg(unix)]
#[test]
fn vault_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("perm.vault");
    write_vault_file(&path, &create_empty(None), "pw", &FAST).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

#[test]
fn imported_document_encrypts_and_reopens() {
    let json = r#"[
        {"site_name": "Example", "site_url": "https://example.com", "username": "u", "password": "p1"},
        {"site_name": "Other", "password": "p2", "notes": "n"}
    ]"#;
    let doc = document_from_json(json, Some("Imported")).unwrap();
    let token = encode(&doc, "master123", &FAST).unwrap();

    let back = decode(&token, "master123").unwrap();
    assert_eq!(back.display_name(), "Imported");
    assert_eq!(back.entries.len(), 2);
    assert_eq!(back.entries[1].notes.as_deref(), Some("n"));
}
