//! Session over the SQLite keyed store.

use tracing::info;

use super::SessionState;
use crate::crypto::{derive_credential, unlock_key, Argon2Params, MasterKey};
use crate::errors::{Result, SafeKeepError};
use crate::store::{KeyedDatabase, KeyedStore};

/// Unlock lifecycle for the keyed backend.
///
/// The master password is checked against the stored credential; the
/// session then keeps only the derived `MasterKey`, never the password.
pub struct KeyedSession {
    db: KeyedDatabase,
    params: Argon2Params,
    state: SessionState,
    key: Option<MasterKey>,
}

impl KeyedSession {
    /// A locked session. `params` apply to newly derived credentials.
    pub fn new(db: KeyedDatabase, params: Argon2Params) -> Self {
        Self {
            db,
            params,
            state: SessionState::Locked,
            key: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == SessionState::Unlocked
    }

    pub fn master_exists(&self) -> Result<bool> {
        self.db.master_exists()
    }

    /// Store the first master credential and unlock with it.
    pub fn initialize(&mut self, password: &str) -> Result<()> {
        if self.db.master_exists()? {
            return Err(SafeKeepError::MasterAlreadyInitialized);
        }

        let credential = derive_credential(password, &self.params)?;
        self.db.save_credential(&credential)?;
        info!("master credential initialized");

        self.unlock(password)
    }

    /// Verify `password` against the stored credential.
    pub fn unlock(&mut self, password: &str) -> Result<()> {
        if self.is_unlocked() {
            return Err(SafeKeepError::AlreadyUnlocked);
        }
        let credential = self
            .db
            .load_credential()?
            .ok_or(SafeKeepError::MasterNotInitialized)?;

        self.state = SessionState::Unlocking;
        match unlock_key(password, &credential) {
            Some(key) => {
                self.key = Some(key);
                self.state = SessionState::Unlocked;
                info!("keyed session unlocked");
                Ok(())
            }
            None => {
                self.state = SessionState::Locked;
                Err(SafeKeepError::InvalidCredential)
            }
        }
    }

    /// Entry store bound to the unlocked key.
    pub fn entries(&self) -> Result<KeyedStore<'_>> {
        let key = self.key.as_ref().ok_or(SafeKeepError::SessionLocked)?;
        KeyedStore::new(&self.db, key)
    }

    /// Re-encrypt every stored password under `new_password` and replace
    /// the credential. Returns the number of re-encrypted entries.
    pub fn change_password(&mut self, new_password: &str) -> Result<usize> {
        let old_key = self.key.as_ref().ok_or(SafeKeepError::SessionLocked)?;

        let credential = derive_credential(new_password, &self.params)?;
        let new_key = unlock_key(new_password, &credential).ok_or_else(|| {
            SafeKeepError::KeyDerivationFailed("fresh credential did not verify".into())
        })?;

        let count = self.db.rekey(old_key, &new_key, &credential)?;
        self.key = Some(new_key);
        info!(entries = count, "master password changed");
        Ok(count)
    }

    /// Drop the master key. Always ends `Locked`.
    pub fn lock(&mut self) {
        if self.key.take().is_some() {
            info!("keyed session locked");
        }
        self.state = SessionState::Locked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::EntryStore;
    use crate::vault::EntryDraft;

    const FAST: Argon2Params = Argon2Params {
        memory_kib: 8_192,
        iterations: 1,
        parallelism: 1,
    };

    fn session() -> KeyedSession {
        KeyedSession::new(KeyedDatabase::open_in_memory().unwrap(), FAST)
    }

    #[test]
    fn unlock_without_master_fails() {
        let mut s = session();
        assert!(!s.master_exists().unwrap());
        assert!(matches!(
            s.unlock("whatever"),
            Err(SafeKeepError::MasterNotInitialized)
        ));
    }

    #[test]
    fn initialize_unlocks_and_refuses_second_time() {
        let mut s = session();
        s.initialize("master123").unwrap();
        assert!(s.is_unlocked());
        assert!(s.master_exists().unwrap());

        s.lock();
        assert!(matches!(
            s.initialize("other-pass"),
            Err(SafeKeepError::MasterAlreadyInitialized)
        ));
    }

    #[test]
    fn wrong_password_is_invalid_credential() {
        let mut s = session();
        s.initialize("master123").unwrap();
        s.lock();
        assert!(matches!(s.unlock("wrong"), Err(SafeKeepError::InvalidCredential)));
        assert_eq!(s.state(), SessionState::Locked);
        s.unlock("master123").unwrap();
        assert!(s.is_unlocked());
    }

    #[test]
    fn locked_session_has_no_entries() {
        let mut s = session();
        s.initialize("master123").unwrap();
        s.lock();
        assert!(matches!(s.entries(), Err(SafeKeepError::SessionLocked)));
        assert!(matches!(
            s.change_password("x"),
            Err(SafeKeepError::SessionLocked)
        ));
    }

    #[test]
    fn change_password_keeps_entries_readable() {
        let mut s = session();
        s.initialize("master123").unwrap();
        let id = s
            .entries()
            .unwrap()
            .create(EntryDraft::new("Example", "p1"))
            .unwrap();

        assert_eq!(s.change_password("new-master-456").unwrap(), 1);
        s.lock();

        assert!(s.unlock("master123").is_err());
        s.unlock("new-master-456").unwrap();
        assert_eq!(s.entries().unwrap().get(id).unwrap().unwrap().password, "p1");
    }
}
