//! Tests for token key loading.

use std::io::Write;

use mockable::{DefaultEnv, MockEnv};
use rstest::rstest;
use tempfile::NamedTempFile;

use super::*;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(&vec![b'k'; len]).expect("write key");
    file
}

fn env_with(vars: Vec<(&'static str, String)>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string().times(0..).returning(move |name| {
        vars.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.clone())
    });
    env
}

fn path_of(file: &NamedTempFile) -> String {
    file.path().to_string_lossy().into_owned()
}

#[rstest]
#[case(BuildMode::Debug)]
#[case(BuildMode::Release)]
fn long_key_file_is_accepted(#[case] mode: BuildMode) {
    let file = key_file(64);
    let env = env_with(vec![
        (KEY_FILE_ENV, path_of(&file)),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ]);

    let key = token_key_from_env(&env, mode).expect("key loads");

    assert_eq!(
        fingerprint::key_fingerprint(&key),
        fingerprint::key_fingerprint(&Key::derive_from(&[b'k'; 64]))
    );
}

#[rstest]
fn release_rejects_short_key() {
    let file = key_file(16);
    let env = env_with(vec![
        (KEY_FILE_ENV, path_of(&file)),
        (ALLOW_EPHEMERAL_ENV, "no".to_owned()),
    ]);

    let err = token_key_from_env(&env, BuildMode::Release).err().expect("short key");

    assert!(matches!(
        err,
        TokenConfigError::KeyTooShort { length: 16, .. }
    ));
}

#[rstest]
fn release_requires_readable_key() {
    let env = env_with(vec![
        (KEY_FILE_ENV, "/nonexistent/marketplace/token_key".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ]);

    let err = token_key_from_env(&env, BuildMode::Release).err().expect("missing key");

    assert!(matches!(err, TokenConfigError::KeyRead { .. }));
}

#[rstest]
fn release_forbids_ephemeral_keys() {
    let env = env_with(vec![(ALLOW_EPHEMERAL_ENV, "yes".to_owned())]);

    let err = token_key_from_env(&env, BuildMode::Release).err().expect("ephemeral");

    assert!(matches!(err, TokenConfigError::EphemeralNotAllowed));
}

#[rstest]
#[case(vec![], true)]
#[case(vec![(ALLOW_EPHEMERAL_ENV, "maybe".to_owned())], false)]
fn release_requires_a_valid_ephemeral_toggle(
    #[case] vars: Vec<(&'static str, String)>,
    #[case] missing: bool,
) {
    let env = env_with(vars);

    let err = token_key_from_env(&env, BuildMode::Release).err().expect("toggle");

    if missing {
        assert!(matches!(err, TokenConfigError::MissingEnv { .. }));
    } else {
        assert!(matches!(err, TokenConfigError::InvalidEnv { .. }));
    }
}

#[rstest]
fn debug_falls_back_to_generated_key() {
    let env = env_with(vec![(
        KEY_FILE_ENV,
        "/nonexistent/marketplace/token_key".to_owned(),
    )]);

    assert!(token_key_from_env(&env, BuildMode::Debug).is_ok());
}

#[rstest]
fn debug_tolerates_a_key_too_short_to_derive_from() {
    let file = key_file(8);
    let env = env_with(vec![(KEY_FILE_ENV, path_of(&file))]);

    let key = token_key_from_env(&env, BuildMode::Debug).expect("ephemeral key");

    assert_ne!(
        fingerprint::key_fingerprint(&key),
        fingerprint::key_fingerprint(&Key::derive_from(&[b'k'; 64]))
    );
}

#[rstest]
#[case("1", Some(true))]
#[case("YES", Some(true))]
#[case(" n ", Some(false))]
#[case("false", Some(false))]
#[case("2", None)]
fn parse_bool_accepts_common_spellings(#[case] raw: &str, #[case] expected: Option<bool>) {
    assert_eq!(parse_bool(raw), expected);
}

#[rstest]
fn process_environment_supplies_key_settings() {
    let file = key_file(64);
    let _guard = env_lock::lock_env([
        (KEY_FILE_ENV, Some(path_of(&file))),
        (ALLOW_EPHEMERAL_ENV, Some("0".to_owned())),
    ]);

    let key =
        token_key_from_env(&DefaultEnv::new(), BuildMode::Release).expect("key loads from env");

    assert_eq!(
        fingerprint::key_fingerprint(&key),
        fingerprint::key_fingerprint(&Key::derive_from(&[b'k'; 64]))
    );
}
