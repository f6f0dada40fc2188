//! Session cookie settings read from the environment.
//!
//! Debug builds fall back to permissive defaults with a warning; release
//! builds insist on every toggle being present and valid.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroizing;

pub(crate) const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
pub(crate) const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
pub(crate) const SAMESITE_ENV: &str = "SESSION_SAMESITE";
pub(crate) const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";

const DEFAULT_KEY_PATH: &str = "/var/run/secrets/campus_session_key";
pub(crate) const MIN_KEY_LEN: usize = 64;
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Whether configuration mistakes are tolerated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// Mode matching the current compilation profile.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Validated cookie session settings.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("{SAMESITE_ENV}=None requires {COOKIE_SECURE_ENV}=1")]
    InsecureSameSiteNone,
    #[error("{ALLOW_EPHEMERAL_ENV} must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Read and validate session settings.
///
/// # Examples
///
/// ```rust
/// use campus_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|_| None);
///
/// // Debug builds tolerate a bare environment and use an ephemeral key.
/// let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = flag_from_env(env, COOKIE_SECURE_ENV, mode, true)?;
    let same_site = same_site_from_env(env, mode, cookie_secure)?;
    let allow_ephemeral = flag_from_env(env, ALLOW_EPHEMERAL_ENV, mode, false)?;
    if allow_ephemeral && mode == BuildMode::Release {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = key_from_env(env, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Boolean toggle; in debug builds a missing or invalid value yields
/// `debug_default`.
fn flag_from_env<E: Env>(
    env: &E,
    name: &'static str,
    mode: BuildMode,
    debug_default: bool,
) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(name) else {
        if mode == BuildMode::Debug {
            warn!(variable = name, default = debug_default, "session toggle not set");
            return Ok(debug_default);
        }
        return Err(SessionConfigError::MissingEnv { name });
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None if mode == BuildMode::Debug => {
            warn!(variable = name, %value, default = debug_default, "invalid session toggle");
            Ok(debug_default)
        }
        None => Err(SessionConfigError::InvalidEnv {
            name,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn same_site_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let Some(value) = env.string(SAMESITE_ENV) else {
        if mode == BuildMode::Debug {
            warn!(variable = SAMESITE_ENV, "SameSite not set; using Lax");
            return Ok(SameSite::Lax);
        }
        return Err(SessionConfigError::MissingEnv { name: SAMESITE_ENV });
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode == BuildMode::Debug => {
            warn!("SameSite=None on an insecure cookie; browsers may drop it");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ if mode == BuildMode::Debug => {
            warn!(%value, "invalid SameSite; using Lax");
            Ok(SameSite::Lax)
        }
        _ => Err(SessionConfigError::InvalidEnv {
            name: SAMESITE_ENV,
            value,
            expected: SAMESITE_EXPECTED,
        }),
    }
}

fn key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| DEFAULT_KEY_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(bytes) => {
            let bytes = Zeroizing::new(bytes);
            if mode == BuildMode::Release && bytes.len() < MIN_KEY_LEN {
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length: bytes.len(),
                    min_len: MIN_KEY_LEN,
                });
            }
            Ok(Key::derive_from(&bytes))
        }
        Err(_) if mode == BuildMode::Debug || allow_ephemeral => {
            warn!(path = %path.display(), "session key unreadable; using an ephemeral key");
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}

#[cfg(test)]
mod tests {
    //! Environment parsing for session cookies.
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;
    use mockable::MockEnv;
    use rstest::{fixture, rstest};
    use tempfile::NamedTempFile;

    fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |name| vars.get(name).cloned());
        env
    }

    fn key_file(len: usize) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp key file");
        file.write_all(&vec![b'k'; len]).expect("write key bytes");
        file
    }

    #[fixture]
    fn release_key() -> NamedTempFile {
        key_file(MIN_KEY_LEN)
    }

    fn release_vars(key: &NamedTempFile) -> HashMap<&'static str, String> {
        HashMap::from([
            (KEY_FILE_ENV, key.path().display().to_string()),
            (COOKIE_SECURE_ENV, "1".to_owned()),
            (SAMESITE_ENV, "Strict".to_owned()),
            (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
        ])
    }

    fn release_error(vars: HashMap<&'static str, String>) -> SessionConfigError {
        match session_settings_from_env(&mock_env(vars), BuildMode::Release) {
            Ok(_) => panic!("release settings should be rejected"),
            Err(error) => error,
        }
    }

    #[rstest]
    fn release_accepts_complete_configuration(release_key: NamedTempFile) {
        let settings =
            session_settings_from_env(&mock_env(release_vars(&release_key)), BuildMode::Release)
                .expect("valid release settings");

        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Strict);
    }

    #[rstest]
    #[case(COOKIE_SECURE_ENV)]
    #[case(SAMESITE_ENV)]
    #[case(ALLOW_EPHEMERAL_ENV)]
    fn release_requires_every_toggle(release_key: NamedTempFile, #[case] missing: &'static str) {
        let mut vars = release_vars(&release_key);
        vars.remove(missing);

        let error = release_error(vars);

        assert!(matches!(error, SessionConfigError::MissingEnv { name } if name == missing));
    }

    #[rstest]
    #[case(COOKIE_SECURE_ENV, "maybe")]
    #[case(SAMESITE_ENV, "sometimes")]
    #[case(ALLOW_EPHEMERAL_ENV, "")]
    fn release_rejects_invalid_values(
        release_key: NamedTempFile,
        #[case] name: &'static str,
        #[case] value: &str,
    ) {
        let mut vars = release_vars(&release_key);
        vars.insert(name, value.to_owned());

        let error = release_error(vars);

        assert!(matches!(error, SessionConfigError::InvalidEnv { name: got, .. } if got == name));
    }

    #[rstest]
    fn release_rejects_short_keys() {
        let short = key_file(MIN_KEY_LEN - 1);

        let error = release_error(release_vars(&short));

        assert!(matches!(
            error,
            SessionConfigError::KeyTooShort { length, .. } if length == MIN_KEY_LEN - 1
        ));
    }

    #[rstest]
    fn release_rejects_ephemeral_keys(release_key: NamedTempFile) {
        let mut vars = release_vars(&release_key);
        vars.insert(ALLOW_EPHEMERAL_ENV, "yes".to_owned());

        assert!(matches!(
            release_error(vars),
            SessionConfigError::EphemeralNotAllowed
        ));
    }

    #[rstest]
    fn release_rejects_same_site_none_without_secure(release_key: NamedTempFile) {
        let mut vars = release_vars(&release_key);
        vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
        vars.insert(SAMESITE_ENV, "None".to_owned());

        assert!(matches!(
            release_error(vars),
            SessionConfigError::InsecureSameSiteNone
        ));
    }

    #[rstest]
    fn release_reports_unreadable_key_file(release_key: NamedTempFile) {
        let mut vars = release_vars(&release_key);
        vars.insert(KEY_FILE_ENV, "/nonexistent/campus/key".to_owned());

        assert!(matches!(
            release_error(vars),
            SessionConfigError::KeyRead { .. }
        ));
    }

    #[rstest]
    fn debug_tolerates_an_empty_environment() {
        let mut vars = HashMap::new();
        vars.insert(KEY_FILE_ENV, "/nonexistent/campus/key".to_owned());

        let settings = session_settings_from_env(&mock_env(vars), BuildMode::Debug)
            .expect("debug defaults");

        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, SameSite::Lax);
    }

    #[rstest]
    #[case("garbage", true)]
    #[case("no", false)]
    fn debug_cookie_secure_falls_back_to_secure(#[case] value: &str, #[case] expected: bool) {
        let vars = HashMap::from([
            (KEY_FILE_ENV, "/nonexistent/campus/key".to_owned()),
            (COOKIE_SECURE_ENV, value.to_owned()),
        ]);

        let settings = session_settings_from_env(&mock_env(vars), BuildMode::Debug)
            .expect("debug settings");

        assert_eq!(settings.cookie_secure, expected);
    }

    #[rstest]
    #[case("TRUE", Some(true))]
    #[case(" 0 ", Some(false))]
    #[case("y", None)]
    fn booleans_accept_documented_spellings(#[case] raw: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_bool(raw), expected);
    }
}
