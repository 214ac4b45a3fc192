use crate::domain::model::TranslationRecord;
use crate::domain::ports::Storage;
use crate::utils::error::Result;

/// Append-only JSON array file, rewritten in full on every append.
///
/// The file must already exist and hold a JSON array. There is no locking;
/// callers are expected to append from a single task.
pub struct JsonArrayStore<S: Storage> {
    storage: S,
    file_name: String,
}

impl<S: Storage> JsonArrayStore<S> {
    pub fn new(storage: S, file_name: impl Into<String>) -> Self {
        Self {
            storage,
            file_name: file_name.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub async fn load_all(&self) -> Result<Vec<TranslationRecord>> {
        let data = self.storage.read_file(&self.file_name).await?;
        let records = serde_json::from_slice(&data)?;
        Ok(records)
    }

    pub async fn len(&self) -> Result<usize> {
        Ok(self.load_all().await?.len())
    }

    /// Returns the array length after the append. Nothing is written if the
    /// existing content cannot be parsed.
    pub async fn append(&self, record: TranslationRecord) -> Result<usize> {
        let mut records = self.load_all().await?;
        records.push(record);

        let data = serde_json::to_vec(&records)?;
        tracing::debug!(
            "Writing {} records ({} bytes) to {}",
            records.len(),
            data.len(),
            self.file_name
        );
        self.storage.write_file(&self.file_name, &data).await?;

        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, content: &str) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), content.as_bytes().to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        fn empty() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn record(n: usize) -> TranslationRecord {
        TranslationRecord {
            instruction: format!("talimat {}", n),
            input: format!("girdi {}", n),
            output: format!("çıktı {}", n),
        }
    }

    #[tokio::test]
    async fn test_append_to_empty_array() {
        let storage = MockStorage::with_file("gpt4.json", "[]");
        let store = JsonArrayStore::new(storage.clone(), "gpt4.json");

        let len = store.append(record(1)).await.unwrap();

        assert_eq!(len, 1);
        let written = storage.get_file("gpt4.json").await.unwrap();
        let records: Vec<TranslationRecord> = serde_json::from_slice(&written).unwrap();
        assert_eq!(records, vec![record(1)]);
    }

    #[tokio::test]
    async fn test_append_preserves_insertion_order() {
        let storage = MockStorage::with_file("gpt4.json", "[]");
        let store = JsonArrayStore::new(storage, "gpt4.json");

        for n in 1..=3 {
            assert_eq!(store.append(record(n)).await.unwrap(), n);
        }
        // 重複的紀錄也照樣附加
        assert_eq!(store.append(record(1)).await.unwrap(), 4);

        let records = store.load_all().await.unwrap();
        assert_eq!(records, vec![record(1), record(2), record(3), record(1)]);
    }

    #[tokio::test]
    async fn test_malformed_file_is_left_untouched() {
        let storage = MockStorage::with_file("gpt4.json", "[{\"instruction\":");
        let store = JsonArrayStore::new(storage.clone(), "gpt4.json");

        let result = store.append(record(1)).await;

        assert!(matches!(result, Err(EtlError::SerializationError(_))));
        assert_eq!(
            storage.get_file("gpt4.json").await.unwrap(),
            b"[{\"instruction\":".to_vec()
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_not_created() {
        let storage = MockStorage::empty();
        let store = JsonArrayStore::new(storage.clone(), "gpt4.json");

        let result = store.append(record(1)).await;

        assert!(matches!(result, Err(EtlError::IoError(_))));
        assert!(storage.get_file("gpt4.json").await.is_none());
    }

    #[test]
    fn test_len_of_existing_array() {
        let storage = MockStorage::with_file(
            "gpt4.json",
            r#"[{"instruction":"a","input":"b","output":"c"}]"#,
        );
        let store = JsonArrayStore::new(storage, "gpt4.json");

        assert_eq!(tokio_test::block_on(store.len()).unwrap(), 1);
    }
}
