use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    presigning::PresigningConfig,
    Client,
};
use aws_smithy_types::byte_stream::ByteStream;
use bytes::Bytes;

use crate::config::{S3Config, StorageConfig};

/// Where QR images live. Keys are flat file names such as
/// `qr_soup_2024-05-01.png`.
#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()>;
    /// Deleting a key that does not exist succeeds.
    async fn delete_object(&self, key: &str) -> anyhow::Result<()>;
    /// URL a browser can load the object from.
    async fn public_url(&self, key: &str) -> anyhow::Result<String>;
}

/// Opens the backend `config` names.
pub async fn connect(config: &StorageConfig) -> anyhow::Result<Arc<dyn StorageClient>> {
    let storage: Arc<dyn StorageClient> = match config {
        StorageConfig::Local { dir } => {
            tracing::info!(dir = %dir, "qr images on local disk");
            Arc::new(LocalStorage::new(dir.clone()))
        }
        StorageConfig::S3(s3) => {
            tracing::info!(endpoint = %s3.endpoint, bucket = %s3.bucket, "qr images in s3");
            Arc::new(S3Storage::new(s3).await?)
        }
    };
    Ok(storage)
}

/// Keys are single path components so a meal date can never point a write
/// outside the image directory or bucket prefix.
fn check_key(key: &str) -> anyhow::Result<()> {
    let flat = !key.is_empty()
        && key != "."
        && key != ".."
        && !key.contains(['/', '\\'])
        && Path::new(key).file_name().is_some();
    anyhow::ensure!(flat, "invalid storage key {key:?}");
    Ok(())
}

/// Files in a directory that the app serves under `/static`.
#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> anyhow::Result<PathBuf> {
        check_key(key)?;
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl StorageClient for LocalStorage {
    async fn put_object(&self, key: &str, body: Bytes, _content_type: &str) -> anyhow::Result<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("create {}", self.root.display()))?;
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove {}", path.display())),
        }
    }

    async fn public_url(&self, key: &str) -> anyhow::Result<String> {
        check_key(key)?;
        Ok(format!("/static/{key}"))
    }
}

/// QR images in a MinIO bucket, shown to staff through presigned GET urls.
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    url_ttl: Duration,
}

impl S3Storage {
    /// Builds the client only; nothing is sent until the first request.
    pub async fn new(cfg: &S3Config) -> anyhow::Result<Self> {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .credentials_provider(Credentials::new(
                cfg.access_key.clone(),
                cfg.secret_key.clone(),
                None,
                None,
                "kitchen-feedback",
            ))
            .endpoint_url(&cfg.endpoint)
            .load()
            .await;

        // MinIO serves buckets as path segments, not subdomains
        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(&cfg.endpoint)
            .force_path_style(true)
            .build();

        anyhow::ensure!(cfg.url_ttl_seconds > 0, "QR_URL_TTL_SECONDS must be positive");
        Ok(Self {
            client: Client::from_conf(conf),
            bucket: cfg.bucket.clone(),
            url_ttl: Duration::from_secs(cfg.url_ttl_seconds),
        })
    }
}

#[async_trait]
impl StorageClient for S3Storage {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()> {
        check_key(key)?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .with_context(|| format!("upload {key} to {}", self.bucket))?;
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        check_key(key)?;
        // S3 answers 204 for keys that are already gone.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .with_context(|| format!("delete {key} from {}", self.bucket))?;
        Ok(())
    }

    async fn public_url(&self, key: &str) -> anyhow::Result<String> {
        check_key(key)?;
        let presigning = PresigningConfig::expires_in(self.url_ttl).context("qr url ttl")?;
        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .with_context(|| format!("presign {key}"))?;
        Ok(presigned.uri().to_string())
    }
}

#[cfg(test)]
pub use memory::MemoryStorage;
