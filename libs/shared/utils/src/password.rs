use argon2::password_hash::{rand_core::OsRng, Error as HashError, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use thiserror::Error;
use tokio::task;
use tracing::instrument;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hash error: {0}")]
    Hash(String),

    #[error("password worker failed: {0}")]
    Worker(#[from] task::JoinError),
}

impl From<HashError> for PasswordError {
    fn from(err: HashError) -> Self {
        PasswordError::Hash(err.to_string())
    }
}

/// Argon2id with a fresh random salt per call. Runs on the blocking pool.
#[instrument(skip(password))]
pub async fn hash_password(password: &str) -> Result<String, PasswordError> {
    let password = password.to_owned();
    task::spawn_blocking(move || hash_blocking(&password)).await?
}

/// Runs on the blocking pool; `Ok(false)` for a wrong password.
#[instrument(skip(password, hash))]
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    task::spawn_blocking(move || verify_blocking(&password, &hash)).await?
}

fn hash_blocking(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

fn verify_blocking(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn hashes_verify_and_are_salted() {
        let first = hash_password("correct horse").await.unwrap();
        let second = hash_password("correct horse").await.unwrap();

        assert_ne!(first, second);
        assert!(verify_password("correct horse", &first).await.unwrap());
        assert!(!verify_password("wrong horse", &first).await.unwrap());
    }

    #[tokio::test]
    async fn corrupt_hash_is_an_error() {
        assert_matches!(
            verify_password("anything", "not-a-phc-string").await,
            Err(PasswordError::Hash(_))
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn hashing_leaves_the_runtime_thread_free() {
        let hashing = tokio::spawn(async {
            let hash = hash_password("correct horse").await.unwrap();
            verify_password("correct horse", &hash).await.unwrap()
        });

        // Single runtime thread: ticks only advance while argon2 runs elsewhere.
        let mut ticks = 0;
        while !hashing.is_finished() && ticks < 10_000 {
            tokio::time::sleep(Duration::from_millis(1)).await;
            ticks += 1;
        }

        assert!(ticks > 1);
        assert!(hashing.await.unwrap());
    }
}
