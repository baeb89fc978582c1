use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

/// The single staff password, held only as an Argon2 PHC string.
///
/// The plain value from the config is hashed once at startup; login attempts
/// are checked with Argon2's verifier, which compares digests in constant
/// time.
#[derive(Clone)]
pub struct PasswordGate {
    phc: String,
}

impl PasswordGate {
    pub fn new(password: &str) -> anyhow::Result<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("argon2 hash: {e}"))?
            .to_string();
        Ok(Self { phc })
    }

    /// `Ok(false)` for a wrong password; `Err` only if the stored hash is
    /// unreadable.
    pub fn check(&self, attempt: &str) -> anyhow::Result<bool> {
        let parsed =
            PasswordHash::new(&self.phc).map_err(|e| anyhow::anyhow!("argon2 parse: {e}"))?;
        match Argon2::default().verify_password(attempt.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => {
                tracing::error!(error = %e, "argon2 verify failed");
                Err(anyhow::anyhow!("argon2 verify: {e}"))
            }
        }
    }
}

impl std::fmt::Debug for PasswordGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordGate(..)")
    }
}
