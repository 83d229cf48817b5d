//! Disk-backed object storage with two buckets.
//!
//! Objects live at `<root>/<bucket>/<path>`. Only the product image bucket is
//! served publicly; payment proofs are read back through admin endpoints.

use std::{
    fmt,
    path::{Component, Path, PathBuf},
    str::FromStr,
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use tokio::fs;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

pub const PUBLIC_OBJECT_PREFIX: &str = "/storage/v1/object/public";
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Bucket {
    #[serde(rename = "product-images")]
    ProductImages,
    #[serde(rename = "payment-proofs")]
    PaymentProofs,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::ProductImages => "product-images",
            Bucket::PaymentProofs => "payment-proofs",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product-images" => Ok(Bucket::ProductImages),
            "payment-proofs" => Ok(Bucket::PaymentProofs),
            _ => Err(AppError::BadRequest(format!("Unknown bucket: {s}"))),
        }
    }
}

#[derive(Clone)]
pub struct Storage {
    inner: Arc<StorageInner>,
}

struct StorageInner {
    root: PathBuf,
    public_base_url: String,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        let public_base_url = public_base_url.into().trim_end_matches('/').to_string();
        Self {
            inner: Arc::new(StorageInner {
                root: root.into(),
                public_base_url,
            }),
        }
    }

    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    pub fn bucket_dir(&self, bucket: Bucket) -> PathBuf {
        self.inner.root.join(bucket.as_str())
    }

    /// `<base>/storage/v1/object/public/<bucket>/<path>`
    pub fn public_url(&self, bucket: Bucket, path: &str) -> String {
        format!(
            "{}{}/{}/{}",
            self.inner.public_base_url,
            PUBLIC_OBJECT_PREFIX,
            bucket,
            path.trim_start_matches('/')
        )
    }

    pub async fn upload(&self, bucket: Bucket, path: &str, bytes: &[u8]) -> AppResult<()> {
        let target = self.resolve(bucket, path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&target, bytes).await?;
        tracing::debug!(%bucket, path, size = bytes.len(), "object stored");
        Ok(())
    }

    /// Lists object names directly under `prefix`, sorted. A missing prefix is an empty list.
    pub async fn list(&self, bucket: Bucket, prefix: &str) -> AppResult<Vec<String>> {
        let dir = if prefix.is_empty() {
            self.bucket_dir(bucket)
        } else {
            self.resolve(bucket, prefix)?
        };

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Removes the given objects; objects that are already gone are skipped.
    pub async fn remove(&self, bucket: Bucket, paths: &[String]) -> AppResult<usize> {
        let mut removed = 0;
        for path in paths {
            let target = self.resolve(bucket, path)?;
            match fs::remove_file(&target).await {
                Ok(()) => removed += 1,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(removed)
    }

    pub async fn read(&self, bucket: Bucket, path: &str) -> AppResult<Vec<u8>> {
        let target = self.resolve(bucket, path)?;
        match fs::read(&target).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(AppError::NotFound),
            Err(err) => Err(err.into()),
        }
    }

    fn resolve(&self, bucket: Bucket, path: &str) -> AppResult<PathBuf> {
        validate_object_path(path)?;
        Ok(self.bucket_dir(bucket).join(path))
    }
}

/// Object paths are relative, slash separated, with no `.`/`..` or empty segments.
pub fn validate_object_path(path: &str) -> AppResult<()> {
    let invalid = || AppError::BadRequest(format!("Invalid object path: {path}"));
    if path.is_empty() || path.starts_with('/') || path.contains('\\') {
        return Err(invalid());
    }
    if path
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(invalid());
    }
    if !Path::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return Err(invalid());
    }
    Ok(())
}

/// Lowercased extension of an uploaded file name, `bin` when there is none.
pub fn file_extension(file_name: &str) -> String {
    let ext = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase(),
        _ => String::new(),
    };
    if ext.is_empty() { "bin".to_string() } else { ext }
}
