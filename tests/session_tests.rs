//! Integration tests for the master session lifecycle.

use safekeep::crypto::Argon2Params;
use safekeep::errors::SafeKeepError;
use safekeep::session::{FileSession, KeyedSession, SessionState};
use safekeep::store::{EntryStore, KeyedDatabase};
use safekeep::vault::{create_empty, decode, EntryDraft};
use tempfile::TempDir;

const FAST: Argon2Params = Argon2Params {
    memory_kib: 8_192,
    iterations: 1,
    parallelism: 1,
};

#[test]
fn file_session_full_cycle() {
    let mut session = FileSession::new(FAST);
    session
        .open_document(create_empty(Some("Test")), "master123")
        .unwrap();
    assert_eq!(session.state(), SessionState::Unlocked);

    let id = session
        .entries()
        .unwrap()
        .create(EntryDraft::new("Example", "p1").with_username("u"))
        .unwrap();
    let token = session.seal().unwrap();
    session.lock();
    assert_eq!(session.state(), SessionState::Locked);

    session.unlock(&token, "master123").unwrap();
    let entry = session.entries().unwrap().get(id).unwrap().unwrap();
    assert_eq!(entry.site_name, "Example");
    assert_eq!(session.document().unwrap().display_name(), "Test");
}

#[test]
fn file_session_rejects_wrong_password_without_detail() {
    let mut session = FileSession::new(FAST);
    session.open_document(create_empty(None), "master123").unwrap();
    let token = session.seal().unwrap();
    session.lock();

    let err = session.unlock(&token, "wrong").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid vault file or incorrect master password"
    );
    assert_eq!(session.state(), SessionState::Locked);
}

#[test]
fn sealed_output_is_a_regular_vault() {
    let mut session = FileSession::new(FAST);
    session.open_document(create_empty(None), "master123").unwrap();
    session
        .entries()
        .unwrap()
        .create(EntryDraft::new("A", "a"))
        .unwrap();
    let token = session.seal().unwrap();

    let doc = decode(&token, "master123").unwrap();
    assert_eq!(doc.entries.len(), 1);
    assert!(doc.metadata.updated_at > doc.metadata.created_at);
}

#[test]
fn keyed_session_persists_across_connections() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.db");

    let id = {
        let mut session = KeyedSession::new(KeyedDatabase::open(&path).unwrap(), FAST);
        session.initialize("master123").unwrap();
        let id = session
            .entries()
            .unwrap()
            .create(EntryDraft::new("Example", "p1"))
            .unwrap();
        session.lock();
        id
    };

    let mut session = KeyedSession::new(KeyedDatabase::open(&path).unwrap(), FAST);
    assert!(session.master_exists().unwrap());
    assert!(matches!(
        session.unlock("wrong"),
        Err(SafeKeepError::InvalidCredential)
    ));
    session.unlock("master123").unwrap();
    assert_eq!(
        session.entries().unwrap().get(id).unwrap().unwrap().password,
        "p1"
    );
}

#[test]
fn keyed_session_change_password_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.db");

    {
        let mut session = KeyedSession::new(KeyedDatabase::open(&path).unwrap(), FAST);
        session.initialize("master123").unwrap();
        let mut store = session.entries().unwrap();
        store.create(EntryDraft::new("A", "a")).unwrap();
        store.create(EntryDraft::new("B", "b")).unwrap();
        drop(store);
        assert_eq!(session.change_password("rotated-456").unwrap(), 2);
    }

    let mut session = KeyedSession::new(KeyedDatabase::open(&path).unwrap(), FAST);
    assert!(session.unlock("master123").is_err());
    session.unlock("rotated-456").unwrap();
    let passwords: Vec<_> = session
        .entries()
        .unwrap()
        .list()
        .unwrap()
        .into_iter()
        .map(|e| e.password)
        .collect();
    assert_eq!(passwords, vec!["a", "b"]);
}
