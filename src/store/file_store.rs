use std::path::PathBuf;

use tracing::{debug, warn};

use crate::fs::operations::{read_locked, remove_if_exists, replace_contents};

use super::KeyValueStore;

/// Stores every key as its own file inside a directory.
pub struct FileStore {
    store_dir: PathBuf,
}

impl FileStore {
    pub fn new(store_dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&store_dir)?;

        Ok(Self { store_dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.store_dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    async fn get_raw(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match read_locked(&path).await {
            Ok(value) => {
                debug!("Read {key} from {path:?}, present: {}", value.is_some());
                value
            }
            Err(e) => {
                warn!("Failed to read {key} from {path:?}, treating it as absent: {e}");
                None
            }
        }
    }

    async fn set_raw(&self, key: &str, value: String) {
        let path = self.path_for(key);
        match replace_contents(&path, value.as_bytes()).await {
            Ok(()) => debug!("Wrote {} bytes into {key}", value.len()),
            Err(e) => warn!("Failed to write {key} into {path:?}, value is lost: {e}"),
        }
    }

    async fn remove(&self, key: &str) {
        let path = self.path_for(key);
        if let Err(e) = remove_if_exists(&path).await {
            warn!("Failed to remove {key} at {path:?}: {e}");
        }
    }
}
