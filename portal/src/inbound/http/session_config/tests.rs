//! Environment validation for cookie-session settings.

use std::collections::HashMap;
use std::io::Write as _;

use mockable::MockEnv;
use rstest::rstest;
use tempfile::NamedTempFile;

use super::*;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp key file");
    file.write_all(&vec![b'k'; len]).expect("write key");
    file
}

fn env_with(vars: &[(&str, &str)]) -> MockEnv {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |name| vars.get(name).cloned());
    env
}

fn release_env(key: &NamedTempFile, overrides: &[(&str, &str)]) -> MockEnv {
    let path = key.path().to_str().expect("utf-8 temp path").to_owned();
    let mut vars = vec![
        (KEY_FILE_ENV, path.as_str()),
        (COOKIE_SECURE_ENV, "1"),
        (SAMESITE_ENV, "Strict"),
        (ALLOW_EPHEMERAL_ENV, "0"),
    ];
    for (name, value) in overrides {
        vars.retain(|(existing, _)| existing != name);
        vars.push((*name, *value));
    }
    env_with(&vars)
}

#[rstest]
fn release_accepts_complete_environment() {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let settings = session_settings_from_env(&release_env(&key, &[]), BuildMode::Release)
        .expect("valid settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
#[case::cookie_secure(COOKIE_SECURE_ENV)]
#[case::same_site(SAMESITE_ENV)]
#[case::ephemeral(ALLOW_EPHEMERAL_ENV)]
fn release_rejects_missing_toggle(#[case] missing: &'static str) {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let path = key.path().to_str().expect("utf-8 temp path").to_owned();
    let vars: Vec<(&str, &str)> = [
        (KEY_FILE_ENV, path.as_str()),
        (COOKIE_SECURE_ENV, "1"),
        (SAMESITE_ENV, "Lax"),
        (ALLOW_EPHEMERAL_ENV, "0"),
    ]
    .into_iter()
    .filter(|(name, _)| *name != missing)
    .collect();
    let err = session_settings_from_env(&env_with(&vars), BuildMode::Release)
        .err()
        .expect("missing toggle rejected");
    assert!(matches!(err, SessionConfigError::MissingEnv { name } if name == missing));
}

#[rstest]
#[case("maybe")]
#[case("")]
fn release_rejects_invalid_cookie_secure(#[case] value: &str) {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let err = session_settings_from_env(
        &release_env(&key, &[(COOKIE_SECURE_ENV, value)]),
        BuildMode::Release,
    )
    .err()
    .expect("invalid toggle rejected");
    assert!(matches!(
        err,
        SessionConfigError::InvalidEnv { name: COOKIE_SECURE_ENV, .. }
    ));
}

#[rstest]
fn release_rejects_insecure_same_site_none() {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let err = session_settings_from_env(
        &release_env(&key, &[(COOKIE_SECURE_ENV, "0"), (SAMESITE_ENV, "None")]),
        BuildMode::Release,
    )
    .err()
    .expect("insecure None rejected");
    assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn release_rejects_ephemeral_keys() {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let err = session_settings_from_env(
        &release_env(&key, &[(ALLOW_EPHEMERAL_ENV, "yes")]),
        BuildMode::Release,
    )
    .err()
    .expect("ephemeral rejected");
    assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_rejects_short_keys() {
    let key = key_file(SESSION_KEY_MIN_LEN - 1);
    let err = session_settings_from_env(&release_env(&key, &[]), BuildMode::Release)
        .err()
        .expect("short key rejected");
    assert!(matches!(
        err,
        SessionConfigError::KeyTooShort { length, .. } if length == SESSION_KEY_MIN_LEN - 1
    ));
}

#[rstest]
fn release_rejects_unreadable_key() {
    let env = env_with(&[
        (KEY_FILE_ENV, "/nonexistent/portal/session_key"),
        (COOKIE_SECURE_ENV, "1"),
        (SAMESITE_ENV, "Strict"),
        (ALLOW_EPHEMERAL_ENV, "0"),
    ]);
    let err = session_settings_from_env(&env, BuildMode::Release)
        .err()
        .expect("unreadable key rejected");
    assert!(matches!(err, SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn debug_falls_back_to_defaults() {
    let env = env_with(&[(KEY_FILE_ENV, "/nonexistent/portal/session_key")]);
    let settings =
        session_settings_from_env(&env, BuildMode::Debug).expect("debug tolerates gaps");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
#[case("LAX", SameSite::Lax)]
#[case("strict", SameSite::Strict)]
#[case("bogus", SameSite::Lax)]
fn debug_same_site_parsing(#[case] raw: &str, #[case] expected: SameSite) {
    let env = env_with(&[
        (KEY_FILE_ENV, "/nonexistent/portal/session_key"),
        (SAMESITE_ENV, raw),
    ]);
    let settings = session_settings_from_env(&env, BuildMode::Debug).expect("settings");
    assert_eq!(settings.same_site, expected);
}

#[rstest]
fn derived_key_is_stable_for_same_file() {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let first = session_settings_from_env(&release_env(&key, &[]), BuildMode::Release)
        .expect("first read");
    let second = session_settings_from_env(&release_env(&key, &[]), BuildMode::Release)
        .expect("second read");
    assert_eq!(
        fingerprint::key_fingerprint(&first.key),
        fingerprint::key_fingerprint(&second.key)
    );
}
