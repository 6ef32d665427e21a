//! Session over a password-sealed vault document.

use tracing::{debug, info};
use zeroize::Zeroizing;

use super::SessionState;
use crate::crypto::Argon2Params;
use crate::errors::{Result, SafeKeepError};
use crate::store::DocumentStore;
use crate::vault::document::next_modified_at;
use crate::vault::{codec, VaultDocument};

/// What an unlocked file session holds.
struct Opened {
    document: VaultDocument,
    password: Zeroizing<String>,
}

/// Unlock lifecycle for the file backend.
///
/// While unlocked the session holds the decrypted document and the
/// master password, which is needed again to seal the document.
pub struct FileSession {
    params: Argon2Params,
    state: SessionState,
    opened: Option<Opened>,
}

impl FileSession {
    /// A locked session. `params` are used whenever the document is sealed.
    pub fn new(params: Argon2Params) -> Self {
        Self {
            params,
            state: SessionState::Locked,
            opened: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == SessionState::Unlocked
    }

    /// Decode the raw vault text with `password`.
    ///
    /// On any failure the session stays locked and the codec error is
    /// returned unchanged (normally `InvalidVault`).
    pub fn unlock(&mut self, raw: &str, password: &str) -> Result<()> {
        if self.is_unlocked() {
            return Err(SafeKeepError::AlreadyUnlocked);
        }

        self.state = SessionState::Unlocking;
        match codec::decode(raw, password) {
            Ok(document) => {
                self.finish_unlock(document, password);
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Locked;
                Err(e)
            }
        }
    }

    /// Start a session on a document that exists only in memory so far.
    pub fn open_document(&mut self, document: VaultDocument, password: &str) -> Result<()> {
        if self.is_unlocked() {
            return Err(SafeKeepError::AlreadyUnlocked);
        }
        self.finish_unlock(document, password);
        Ok(())
    }

    /// Entries stored without an id are numbered here so the store can
    /// address them; the ids are persisted by the next `seal`.
    fn finish_unlock(&mut self, mut document: VaultDocument, password: &str) {
        let numbered = document.number_unassigned_entries();
        if numbered > 0 {
            debug!(numbered, "assigned ids to entries stored without one");
        }
        info!(entries = document.entries.len(), "vault session unlocked");
        self.opened = Some(Opened {
            document,
            password: Zeroizing::new(password.to_owned()),
        });
        self.state = SessionState::Unlocked;
    }

    pub fn document(&self) -> Result<&VaultDocument> {
        self.opened
            .as_ref()
            .map(|o| &o.document)
            .ok_or(SafeKeepError::SessionLocked)
    }

    /// Entry store over the unlocked document.
    pub fn entries(&mut self) -> Result<DocumentStore<'_>> {
        let opened = self.opened.as_mut().ok_or(SafeKeepError::SessionLocked)?;
        Ok(DocumentStore::new(&mut opened.document.entries))
    }

    /// Refresh `updatedAt` and encrypt the document under the held password.
    pub fn seal(&mut self) -> Result<String> {
        let opened = self.opened.as_mut().ok_or(SafeKeepError::SessionLocked)?;
        let metadata = &mut opened.document.metadata;
        metadata.updated_at = next_modified_at(metadata.updated_at);
        codec::encode(&opened.document, &opened.password, &self.params)
    }

    /// Replace the held password; the next `seal` encrypts under it.
    pub fn change_password(&mut self, new_password: &str) -> Result<()> {
        let opened = self.opened.as_mut().ok_or(SafeKeepError::SessionLocked)?;
        opened.password = Zeroizing::new(new_password.to_owned());
        info!("vault master password changed");
        Ok(())
    }

    /// Wipe the document and password. Always ends `Locked`.
    pub fn lock(&mut self) {
        if let Some(mut opened) = self.opened.take() {
            opened.document.wipe();
            info!("vault session locked");
        }
        self.state = SessionState::Locked;
    }
}

impl Drop for FileSession {
    fn drop(&mut self) {
        self.lock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::EntryStore;
    use crate::vault::{create_empty, encode, EntryDraft};

    const FAST: Argon2Params = Argon2Params {
        memory_kib: 8_192,
        iterations: 1,
        parallelism: 1,
    };

    fn sealed_vault(password: &str) -> String {
        let mut doc = create_empty(Some("Test"));
        doc.entries.push(crate::vault::Entry::from_draft(
            Some(1),
            EntryDraft::new("Example", "p1").with_username("u"),
            chrono::Utc::now(),
        ));
        encode(&doc, password, &FAST).unwrap()
    }

    #[test]
    fn starts_locked_and_rejects_access() {
        let mut session = FileSession::new(FAST);
        assert_eq!(session.state(), SessionState::Locked);
        assert!(matches!(session.document(), Err(SafeKeepError::SessionLocked)));
        assert!(matches!(session.entries(), Err(SafeKeepError::SessionLocked)));
        assert!(matches!(session.seal(), Err(SafeKeepError::SessionLocked)));
    }

    #[test]
    fn wrong_password_stays_locked() {
        let raw = sealed_vault("master123");
        let mut session = FileSession::new(FAST);
        let err = session.unlock(&raw, "wrong").unwrap_err();
        assert!(matches!(err, SafeKeepError::InvalidVault));
        assert_eq!(session.state(), SessionState::Locked);
    }

    #[test]
    fn unlock_twice_is_rejected() {
        let raw = sealed_vault("master123");
        let mut session = FileSession::new(FAST);
        session.unlock(&raw, "master123").unwrap();
        assert!(matches!(
            session.unlock(&raw, "master123"),
            Err(SafeKeepError::AlreadyUnlocked)
        ));
    }

    #[test]
    fn seal_persists_changes_and_bumps_updated_at() {
        let raw = sealed_vault("master123");
        let mut session = FileSession::new(FAST);
        session.unlock(&raw, "master123").unwrap();
        let before = session.document().unwrap().metadata.updated_at;

        session
            .entries()
            .unwrap()
            .create(EntryDraft::new("Second", "p2"))
            .unwrap();
        let resealed = session.seal().unwrap();

        let reopened = codec::decode(&resealed, "master123").unwrap();
        assert_eq!(reopened.entries.len(), 2);
        assert!(reopened.metadata.updated_at > before);
    }

    #[test]
    fn change_password_reseals_under_new_password() {
        let raw = sealed_vault("master123");
        let mut session = FileSession::new(FAST);
        session.unlock(&raw, "master123").unwrap();
        session.change_password("new-master-456").unwrap();
        let resealed = session.seal().unwrap();

        assert!(codec::decode(&resealed, "master123").is_err());
        assert_eq!(codec::decode(&resealed, "new-master-456").unwrap().entries.len(), 1);
    }

    #[test]
    fn entries_without_ids_become_addressable() {
        let mut doc = create_empty(Some("Generated"));
        let now = chrono::Utc::now();
        doc.entries.push(crate::vault::Entry::from_draft(
            None,
            EntryDraft::new("NoId", "p1"),
            now,
        ));
        doc.entries.push(crate::vault::Entry::from_draft(
            None,
            EntryDraft::new("AlsoNoId", "p2"),
            now,
        ));
        let raw = encode(&doc, "master123", &FAST).unwrap();

        let mut session = FileSession::new(FAST);
        session.unlock(&raw, "master123").unwrap();
        let mut store = session.entries().unwrap();
        let ids: Vec<i64> = store.list().unwrap().iter().filter_map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(store.delete(1).unwrap());
        drop(store);

        let resealed = session.seal().unwrap();
        let reopened = codec::decode(&resealed, "master123").unwrap();
        assert_eq!(reopened.entries.len(), 1);
        assert_eq!(reopened.entries[0].id, Some(2));
    }

    #[test]
    fn lock_discards_document() {
        let raw = sealed_vault("master123");
        let mut session = FileSession::new(FAST);
        session.unlock(&raw, "master123").unwrap();
        session.lock();
        assert_eq!(session.state(), SessionState::Locked);
        assert!(session.document().is_err());

        // Can unlock again after locking.
        session.unlock(&raw, "master123").unwrap();
        assert!(session.is_unlocked());
    }
}
