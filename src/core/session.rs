use crate::core::{Result, SessionData, SessionStore};
use std::fs;
use std::path::{Path, PathBuf};

/// File-backed session store. One JSON file per wallet inside the
/// configured session directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    base_path: PathBuf,
}

impl FileSessionStore {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn session_path(&self, wallet: &str) -> PathBuf {
        self.base_path.join(format!("session_{}.json", wallet))
    }
}

impl SessionStore for FileSessionStore {
    async fn load(&self, wallet: &str) -> Result<Option<SessionData>> {
        let path = self.session_path(wallet);

        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<SessionData>(&data) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                // An unreadable session means a fresh start, not a crash.
                tracing::warn!(
                    "Session file {} is corrupt, starting fresh: {}",
                    path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, wallet: &str, session: &SessionData) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;

        let path = self.session_path(wallet);
        let data = serde_json::to_vec_pretty(session)?;
        fs::write(path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Earnings;
    use tempfile::TempDir;

    const WALLET: &str = "0x1234567890abcdef1234567890abcdef12345678";

    fn sample_session() -> SessionData {
        SessionData {
            start_time: 1_700_000_000_000,
            earnings: Earnings {
                total: 3.5,
                pending: 0.5,
                paid: 2.0,
            },
            referral_bonus: 0.05,
        }
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path());

        store.save(WALLET, &sample_session()).await.unwrap();
        let loaded = store.load(WALLET).await.unwrap().unwrap();

        assert_eq!(loaded.start_time, 1_700_000_000_000);
        assert_eq!(loaded.earnings.total, 3.5);
        assert_eq!(loaded.earnings.paid, 2.0);
        assert_eq!(loaded.referral_bonus, 0.05);
    }

    #[tokio::test]
    async fn test_load_missing_session_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path());

        let loaded = store.load(WALLET).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_load_corrupt_session_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path());

        std::fs::write(store.session_path(WALLET), b"{not json").unwrap();

        let loaded = store.load(WALLET).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_save_creates_session_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("sessions").join("testnet");
        let store = FileSessionStore::new(&nested);

        store.save(WALLET, &sample_session()).await.unwrap();
        assert!(store.session_path(WALLET).exists());
    }
}
