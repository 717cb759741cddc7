//! Directory-backed object storage: one subdirectory per bucket under a root.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::ensure_plain_name;

#[derive(Debug, Clone)]
pub struct BucketInfo {
    pub name: String,
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct ObjectInfo {
    pub key: String,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn connect(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)
            .with_context(|| format!("Failed to create object store root: {}", root.display()))?;
        let store = Self {
            root: root.to_path_buf(),
        };
        store.list_buckets()?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_path(&self, bucket: &str) -> Result<PathBuf> {
        ensure_plain_name("bucket", bucket)?;
        Ok(self.root.join(bucket.trim()))
    }

    fn existing_bucket(&self, bucket: &str) -> Result<PathBuf> {
        let path = self.bucket_path(bucket)?;
        if !path.is_dir() {
            bail!("bucket '{bucket}' does not exist");
        }
        Ok(path)
    }

    pub fn list_buckets(&self) -> Result<Vec<BucketInfo>> {
        let mut out = Vec::new();
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("Failed to read object store root: {}", self.root.display()))?;
        for entry in entries {
            let entry = entry?;
            let meta = entry.metadata()?;
            if !meta.is_dir() {
                continue;
            }
            out.push(BucketInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                created: meta.created().or_else(|_| meta.modified()).ok().map(Into::into),
            });
        }
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    pub fn create_bucket(&self, bucket: &str) -> Result<()> {
        let path = self.bucket_path(bucket)?;
        if path.exists() {
            bail!("bucket '{bucket}' already exists");
        }
        fs::create_dir(&path).with_context(|| format!("Failed to create bucket '{bucket}'"))
    }

    /// Copy a local file into `bucket` as `object`; returns bytes written.
    pub fn upload_file(&self, file: &Path, bucket: &str, object: &str) -> Result<u64> {
        let dir = self.existing_bucket(bucket)?;
        ensure_plain_name("object", object)?;
        fs::copy(file, dir.join(object.trim()))
            .with_context(|| format!("Failed to upload {}", file.display()))
    }

    pub fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectInfo>> {
        let dir = self.existing_bucket(bucket)?;
        let mut out = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let meta = entry.metadata()?;
            if !meta.is_file() {
                continue;
            }
            out.push(ObjectInfo {
                key: entry.file_name().to_string_lossy().into_owned(),
                size: meta.len(),
                modified: meta.modified().ok().map(Into::into),
            });
        }
        out.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(out)
    }

    pub fn download_file(&self, bucket: &str, object: &str, dest: &Path) -> Result<u64> {
        let dir = self.existing_bucket(bucket)?;
        ensure_plain_name("object", object)?;
        let src = dir.join(object.trim());
        if !src.is_file() {
            bail!("object '{object}' not found in bucket '{bucket}'");
        }
        fs::copy(&src, dest).with_context(|| format!("Failed to download to {}", dest.display()))
    }
}

pub fn format_time(t: Option<DateTime<Utc>>) -> String {
    t.map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::connect(&dir.path().join("objects")).unwrap();
        assert!(store.list_buckets().unwrap().is_empty());

        store.create_bucket("photos").unwrap();
        store.create_bucket("docs").unwrap();
        let names: Vec<_> = store.list_buckets().unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(names, ["docs", "photos"]);
        assert!(store.create_bucket("photos").is_err());
        assert!(store.create_bucket("../escape").is_err());
    }

    #[test]
    fn upload_list_download() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::connect(&dir.path().join("objects")).unwrap();
        store.create_bucket("b").unwrap();

        let local = dir.path().join("hello.txt");
        fs::write(&local, "hello world").unwrap();
        assert_eq!(store.upload_file(&local, "b", "greeting.txt").unwrap(), 11);

        let objects = store.list_objects("b").unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].key, "greeting.txt");
        assert_eq!(objects[0].size, 11);

        let back = dir.path().join("back.txt");
        store.download_file("b", "greeting.txt", &back).unwrap();
        assert_eq!(fs::read_to_string(back).unwrap(), "hello world");

        assert!(store.download_file("b", "missing", &dir.path().join("x")).is_err());
        assert!(store.list_objects("nope").is_err());
        assert!(store.upload_file(&local, "nope", "x").is_err());
    }

    #[test]
    fn format_time_handles_missing() {
        assert_eq!(format_time(None), "unknown");
    }
}
