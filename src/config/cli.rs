use crate::core::Storage;
use crate::utils::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }

    async fn list_files(&self, dir: &str) -> Result<Vec<String>> {
        let full_path = Path::new(&self.base_path).join(dir);

        let mut entries = match tokio::fs::read_dir(&full_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                files.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        // 檔名排序即為牌組的輸入順序
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parent_dirs_and_reads_back() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_string_lossy().into_owned());

        storage.write_file("diff/diff.json", b"[]").await.unwrap();

        assert_eq!(storage.read_file("diff/diff.json").await.unwrap(), b"[]");
    }

    #[tokio::test]
    async fn test_list_files_sorted_and_missing_dir_empty() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_string_lossy().into_owned());

        storage.write_file("decks/b.txt", b"").await.unwrap();
        storage.write_file("decks/a.txt", b"").await.unwrap();
        storage.write_file("decks/nested/c.txt", b"").await.unwrap();

        assert_eq!(
            storage.list_files("decks").await.unwrap(),
            vec!["a.txt".to_string(), "b.txt".to_string()]
        );
        assert!(storage.list_files("nope").await.unwrap().is_empty());
    }
}
