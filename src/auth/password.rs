use std::sync::{Arc, OnceLock};

use anyhow::{bail, Context};
use tracing::error;

/// bcrypt only reads this many bytes of input; anything past it is ignored.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// bcrypt with a fixed cost taken from configuration.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    // Digest compared against when no account exists, so both login
    // failure paths pay for one bcrypt verification.
    dummy: Arc<OnceLock<String>>,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            dummy: Arc::new(OnceLock::new()),
        }
    }

    pub fn hash(&self, plain: &str) -> anyhow::Result<String> {
        if plain.len() > MAX_PASSWORD_BYTES {
            bail!("password longer than {MAX_PASSWORD_BYTES} bytes");
        }
        bcrypt::hash(plain, self.cost)
            .map_err(|e| {
                error!(error = %e, "bcrypt hash error");
                e
            })
            .context("hash password")
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored digest is unreadable.
    /// Input over [`MAX_PASSWORD_BYTES`] never matches.
    pub fn verify(&self, plain: &str, hash: &str) -> anyhow::Result<bool> {
        if plain.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }
        bcrypt::verify(plain, hash)
            .map_err(|e| {
                error!(error = %e, "bcrypt parse hash error");
                e
            })
            .context("verify password")
    }

    /// Burns one verification against a throwaway digest. Always `false`.
    pub fn verify_dummy(&self, plain: &str) -> anyhow::Result<bool> {
        let digest = match self.dummy.get() {
            Some(d) => d,
            None => {
                let d = self.hash("dummy-Passw0rd!")?;
                self.dummy.get_or_init(|| d)
            }
        };
        self.verify(plain, digest)?;
        Ok(false)
    }
}
