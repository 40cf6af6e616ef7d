//! JSON file per cart key.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use till::cart::CartLine;
use tokio::fs;
use tracing::debug;

use crate::storage::{CartStorage, CartStorageError};

/// Stores each cart as `<dir>/<key>.json` containing a JSON array of lines.
#[derive(Debug, Clone)]
pub struct FileCartStorage {
    dir: PathBuf,
}

impl FileCartStorage {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }
}

#[async_trait]
impl CartStorage for FileCartStorage {
    async fn load(&self, key: &str) -> Result<Option<Vec<CartLine>>, CartStorageError> {
        let path = self.path_for(key);

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        let lines = serde_json::from_slice(&bytes)?;

        debug!(path = %path.display(), "loaded persisted cart");

        Ok(Some(lines))
    }

    async fn save(&self, key: &str, lines: &[CartLine]) -> Result<(), CartStorageError> {
        fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        let body = serde_json::to_vec(lines)?;

        fs::write(&staging, body).await?;
        fs::rename(&staging, &path).await?;

        debug!(path = %path.display(), lines = lines.len(), "persisted cart");

        Ok(())
    }
}

/// Keys may embed customer codes. Filename-safe bytes pass through and every
/// other byte, `%` included, becomes `%XX`, so distinct keys never share a file.
fn file_stem(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());

    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b'.') {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("%{byte:02X}"));
        }
    }

    stem
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn missing_file_loads_as_none() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileCartStorage::new(dir.path());

        assert!(storage.load("cart_c1").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn saved_lines_load_back_in_order() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileCartStorage::new(dir.path().join("carts"));

        let lines = vec![
            CartLine::new("p1".parse()?, "Pens", 3, Decimal::new(25, 1)),
            CartLine::new(7_i64.into(), "Paper", 1, Decimal::from(4)),
        ];

        storage.save("cart_c1", &lines).await?;

        assert_eq!(storage.load("cart_c1").await?, Some(lines));

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_is_stored_as_empty_array() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileCartStorage::new(dir.path());

        storage.save("cart_c1", &[]).await?;

        let raw = std::fs::read_to_string(dir.path().join("cart_c1.json"))?;

        assert_eq!(raw, "[]");

        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_a_serialization_error() -> TestResult {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("cart_c1.json"), "{not json")?;

        let storage = FileCartStorage::new(dir.path());
        let result = storage.load("cart_c1").await;

        assert!(
            matches!(result, Err(CartStorageError::Serialization(_))),
            "expected Serialization, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn unsafe_key_characters_are_escaped() {
        assert_eq!(file_stem("cart_../x y"), "cart_..%2Fx%20y");
        assert_eq!(file_stem("cart_50%"), "cart_50%25");
        assert_eq!(file_stem("cart_café"), "cart_caf%C3%A9");
    }

    #[test]
    fn similar_keys_map_to_distinct_files() {
        let keys = ["cart_a b", "cart_a_b", "cart_a%20b", "cart_a/b"];

        let stems: std::collections::BTreeSet<String> =
            keys.iter().map(|key| file_stem(key)).collect();

        assert_eq!(stems.len(), keys.len());
    }

    #[tokio::test]
    async fn customers_with_similar_codes_do_not_share_a_cart() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileCartStorage::new(dir.path());

        let spaced = vec![CartLine::new("p1".parse()?, "Pens", 1, Decimal::from(2))];

        storage.save("cart_a b", &spaced).await?;

        assert!(storage.load("cart_a_b").await?.is_none());
        assert_eq!(storage.load("cart_a b").await?, Some(spaced));

        Ok(())
    }
}
