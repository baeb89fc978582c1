use anyhow::Context;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// MinIO / S3 bucket holding the QR images.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    /// Lifetime of the presigned GET urls shown to staff.
    pub url_ttl_seconds: u64,
}

/// Where generated QR images are written.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Local { dir: String },
    S3(S3Config),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub public_base_url: String,
    pub staff_password: String,
    pub session: SessionConfig,
    pub static_dir: String,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source; `from_env` passes the
    /// process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| get(key).with_context(|| format!("{key} must be set"));
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let database_url = required("DATABASE_URL")?;
        let session = SessionConfig {
            secret: required("SESSION_SECRET")?,
            issuer: or("SESSION_ISSUER", "kitchen-feedback"),
            audience: or("SESSION_AUDIENCE", "kitchen-staff"),
            ttl_minutes: get("SESSION_TTL_MINUTES")
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 12),
        };
        let static_dir = or("STATIC_DIR", "static");

        let storage = match get("QR_STORAGE").as_deref() {
            Some("s3") => StorageConfig::S3(S3Config {
                endpoint: required("MINIO_ENDPOINT")?,
                bucket: required("MINIO_BUCKET")?,
                access_key: required("MINIO_ACCESS_KEY")?,
                secret_key: required("MINIO_SECRET_KEY")?,
                region: or("MINIO_REGION", "us-east-1"),
                url_ttl_seconds: get("QR_URL_TTL_SECONDS")
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60 * 60),
            }),
            Some("local") | None => StorageConfig::Local {
                dir: static_dir.clone(),
            },
            Some(other) => anyhow::bail!("unknown QR_STORAGE backend: {other}"),
        };

        Ok(Self {
            database_url,
            public_base_url: or("PUBLIC_BASE_URL", "http://localhost:8080")
                .trim_end_matches('/')
                .to_string(),
            staff_password: or("STAFF_PASSWORD", "1717"),
            session,
            static_dir,
            storage,
        })
    }

    /// Session cookies only get the `Secure` flag when served over https.
    pub fn secure_cookies(&self) -> bool {
        self.public_base_url.starts_with("https://")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    const MINIMAL: &[(&str, &str)] = &[
        ("DATABASE_URL", "sqlite://kitchen.db"),
        ("SESSION_SECRET", "s3cret"),
    ];

    #[test]
    fn defaults_fill_everything_optional() {
        let cfg = load(MINIMAL).unwrap();
        assert_eq!(cfg.database_url, "sqlite://kitchen.db");
        assert_eq!(cfg.staff_password, "1717");
        assert_eq!(cfg.session.secret, "s3cret");
        assert_eq!(cfg.session.issuer, "kitchen-feedback");
        assert_eq!(cfg.session.audience, "kitchen-staff");
        assert_eq!(cfg.session.ttl_minutes, 720);
        assert_eq!(cfg.public_base_url, "http://localhost:8080");
        assert_eq!(cfg.static_dir, "static");
        assert!(matches!(cfg.storage, StorageConfig::Local { ref dir } if dir == "static"));
        assert!(!cfg.secure_cookies());
    }

    #[test]
    fn base_url_loses_trailing_slash() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("PUBLIC_BASE_URL", "https://kitchen-meals.example/"));
        let cfg = load(&vars).unwrap();
        assert_eq!(cfg.public_base_url, "https://kitchen-meals.example");
        assert!(cfg.secure_cookies());
    }

    #[test]
    fn unparsable_ttl_falls_back() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("SESSION_TTL_MINUTES", "soon"));
        assert_eq!(load(&vars).unwrap().session.ttl_minutes, 720);
    }

    #[test]
    fn missing_required_vars_fail() {
        let err = load(&[("SESSION_SECRET", "x")]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));

        let err = load(&[("DATABASE_URL", "sqlite::memory:")]).unwrap_err();
        assert!(err.to_string().contains("SESSION_SECRET"));
    }

    #[test]
    fn s3_storage_reads_minio_settings() {
        let mut vars = MINIMAL.to_vec();
        vars.extend([
            ("QR_STORAGE", "s3"),
            ("MINIO_ENDPOINT", "http://minio:9000"),
            ("MINIO_BUCKET", "kitchen-qr"),
            ("MINIO_ACCESS_KEY", "minio"),
            ("MINIO_SECRET_KEY", "minio123"),
        ]);
        let StorageConfig::S3(s3) = load(&vars).unwrap().storage else {
            panic!("expected s3 storage");
        };
        assert_eq!(s3.endpoint, "http://minio:9000");
        assert_eq!(s3.bucket, "kitchen-qr");
        assert_eq!(s3.region, "us-east-1");
        assert_eq!(s3.url_ttl_seconds, 3600);
    }

    #[test]
    fn s3_storage_needs_its_credentials() {
        let mut vars = MINIMAL.to_vec();
        vars.extend([("QR_STORAGE", "s3"), ("MINIO_ENDPOINT", "http://minio:9000")]);
        let err = load(&vars).unwrap_err();
        assert!(err.to_string().contains("MINIO_BUCKET"));
    }

    #[test]
    fn unknown_storage_backend_is_rejected() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("QR_STORAGE", "ftp"));
        let err = load(&vars).unwrap_err();
        assert!(err.to_string().contains("unknown QR_STORAGE backend: ftp"));
    }
}
