//! Bearer-token signing key configuration.
//!
//! The key is read from the file named by `TOKEN_KEY_FILE`. Debug builds, or
//! release builds that opt in with `TOKEN_ALLOW_EPHEMERAL`, fall back to a
//! freshly generated key when the file is unreadable; tokens signed with such
//! a key do not survive a restart.

use std::path::{Path, PathBuf};

use actix_web::cookie::Key;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

pub mod fingerprint;

pub const KEY_FILE_ENV: &str = "TOKEN_KEY_FILE";
pub const ALLOW_EPHEMERAL_ENV: &str = "TOKEN_ALLOW_EPHEMERAL";
const KEY_DEFAULT_PATH: &str = "/var/run/secrets/token_key";
const KEY_MIN_LEN: usize = 64;
// `Key::derive_from` panics below this length.
const DERIVE_MIN_LEN: usize = 32;
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";

/// Build mode for key validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Missing or short keys are tolerated with a warning.
    Debug,
    /// Keys must be present and long enough.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while loading the token signing key.
#[derive(thiserror::Error, Debug)]
pub enum TokenConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read token key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("token key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("TOKEN_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Load the token signing key according to environment and build mode.
///
/// # Examples
///
/// ```rust
/// use marketplace::inbound::http::token_config::{BuildMode, token_key_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "TOKEN_KEY_FILE" => Some("/nonexistent/token_key".to_owned()),
///     _ => None,
/// });
///
/// // Debug builds fall back to an ephemeral key.
/// assert!(token_key_from_env(&env, BuildMode::Debug).is_ok());
/// ```
pub fn token_key_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Key, TokenConfigError> {
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| KEY_DEFAULT_PATH.to_owned()),
    );

    match read_key_file(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if length < KEY_MIN_LEN && !mode.is_debug() {
                bytes.zeroize();
                return Err(TokenConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: KEY_MIN_LEN,
                });
            }
            if length < DERIVE_MIN_LEN {
                bytes.zeroize();
                warn!(
                    path = %path.display(),
                    length,
                    "token key too short to derive from; using ephemeral key"
                );
                return Ok(Key::generate());
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(source) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %source,
                "using ephemeral token key; issued tokens will not survive a restart"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(TokenConfigError::KeyRead { path, source }),
    }
}

fn read_key_file(path: &Path) -> std::io::Result<Vec<u8>> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "key path has no file name")
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read(file_name)
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, TokenConfigError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        return if mode.is_debug() {
            Ok(false)
        } else {
            Err(TokenConfigError::MissingEnv {
                name: ALLOW_EPHEMERAL_ENV,
            })
        };
    };
    match (parse_bool(&value), mode) {
        (Some(true), BuildMode::Release) => Err(TokenConfigError::EphemeralNotAllowed),
        (Some(flag), _) => Ok(flag),
        (None, BuildMode::Debug) => {
            warn!(%value, "invalid {ALLOW_EPHEMERAL_ENV}; defaulting to disabled");
            Ok(false)
        }
        (None, BuildMode::Release) => Err(TokenConfigError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
