use std::sync::Arc;

use anyhow::Context;

use crate::auth::password::PasswordGate;
use crate::config::AppConfig;
use crate::repo::{self, KitchenRepo};
use crate::storage::{self, StorageClient};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn KitchenRepo>,
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn StorageClient>,
    pub password: PasswordGate,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let repo = repo::connect(&config.database_url).await?;

        let storage = storage::connect(&config.storage).await?;

        let password = PasswordGate::new(&config.staff_password).context("hash staff password")?;

        Ok(Self::from_parts(repo, config, storage, password))
    }

    pub fn from_parts(
        repo: Arc<dyn KitchenRepo>,
        config: Arc<AppConfig>,
        storage: Arc<dyn StorageClient>,
        password: PasswordGate,
    ) -> Self {
        Self {
            repo,
            config,
            storage,
            password,
        }
    }
}

#[cfg(test)]
impl AppState {
    /// In-memory sqlite and storage; staff password `1717`.
    pub async fn fake() -> (Self, Arc<crate::storage::MemoryStorage>) {
        use crate::config::{SessionConfig, StorageConfig};
        use crate::storage::MemoryStorage;

        let repo = repo::connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            public_base_url: "http://kitchen.test".into(),
            staff_password: "1717".into(),
            session: SessionConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            static_dir: "static".into(),
            storage: StorageConfig::Local {
                dir: "static".into(),
            },
        });

        let storage = Arc::new(MemoryStorage::default());
        let password = PasswordGate::new("1717").expect("hash test password");
        let state = Self::from_parts(
            repo,
            config,
            storage.clone() as Arc<dyn StorageClient>,
            password,
        );
        (state, storage)
    }
}
