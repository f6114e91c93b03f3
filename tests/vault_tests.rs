//! Integration tests for the fernlock vault module.

use std::fs;

use fernlock::crypto::decrypt;
use fernlock::crypto::keys::DerivedKey;
use fernlock::errors::FernlockError;
use fernlock::vault::format::{read_vault, VaultFile};
use fernlock::vault::SecretStore;
use tempfile::TempDir;

const PASSWORD: &str = "longenough1";

/// Helper: create a temporary vault file path inside a fresh temp dir.
fn vault_path() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("test.vault");
    (dir, path)
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_rejects_short_password() {
    let (_dir, path) = vault_path();

    let err = SecretStore::create(&path, "short").unwrap_err();
    assert!(matches!(err, FernlockError::PasswordTooShort(8)));
    let err = SecretStore::create(&path, "seven77").unwrap_err();
    assert!(matches!(err, FernlockError::PasswordTooShort(8)));
    assert!(!path.exists(), "nothing may be written for a rejected password");
}

#[test]
fn create_persists_empty_vault_immediately() {
    let (_dir, path) = vault_path();

    let store = SecretStore::create(&path, PASSWORD).expect("create vault");
    assert_eq!(store.count(), 0);
    assert!(path.exists());

    let file = read_vault(&path).unwrap();
    assert_eq!(file.version, 1);
    assert_eq!(file.token[0], b'g', "Fernet tokens start with 'g' (0x80)");
}

#[test]
fn create_refuses_to_overwrite() {
    let (_dir, path) = vault_path();
    SecretStore::create(&path, PASSWORD).unwrap();

    let err = SecretStore::create(&path, PASSWORD).unwrap_err();
    assert!(matches!(err, FernlockError::VaultAlreadyExists(_)));
}

// ---------------------------------------------------------------------------
// Secret lifecycle
// ---------------------------------------------------------------------------

#[test]
fn set_get_update_delete_lifecycle() {
    let (_dir, path) = vault_path();
    let mut store = SecretStore::create(&path, PASSWORD).unwrap();

    store.set("API_KEY", "sk-test-123").unwrap();
    assert_eq!(store.get("API_KEY"), Some("sk-test-123"));
    assert!(store.exists("API_KEY"));

    let before = store.list()["API_KEY"].clone();
    std::thread::sleep(std::time::Duration::from_millis(5));
    store.set("API_KEY", "sk-test-456").unwrap();
    let after = store.list()["API_KEY"].clone();

    assert_eq!(store.get("API_KEY"), Some("sk-test-456"));
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at > before.updated_at);

    store.delete("API_KEY").unwrap();
    assert_eq!(store.get("API_KEY"), None);
    assert!(!store.exists("API_KEY"));
    assert_eq!(store.count(), 0);
}

#[test]
fn delete_missing_secret_errors() {
    let (_dir, path) = vault_path();
    let mut store = SecretStore::create(&path, PASSWORD).unwrap();

    let err = store.delete("NOPE").unwrap_err();
    assert!(matches!(err, FernlockError::SecretNotFound(ref n) if n == "NOPE"));
}

#[test]
fn get_missing_secret_is_none() {
    let (_dir, path) = vault_path();
    let store = SecretStore::create(&path, PASSWORD).unwrap();
    assert_eq!(store.get("ANYTHING"), None);
}

#[test]
fn set_accepts_names_from_other_tools() {
    let (_dir, path) = vault_path();
    let names = ["my key", "svc/API_KEY", "clé", ""];
    {
        let mut store = SecretStore::create(&path, PASSWORD).unwrap();
        for name in names {
            store.set(name, "v1").unwrap();
        }
        store.set("my key", "v2").unwrap();
    }

    let mut store = SecretStore::unlock(&path, PASSWORD).unwrap();
    assert_eq!(store.count(), names.len());
    assert_eq!(store.get("my key"), Some("v2"));
    assert_eq!(store.get("svc/API_KEY"), Some("v1"));
    assert_eq!(store.get("clé"), Some("v1"));

    store.delete("svc/API_KEY").unwrap();
    assert!(!store.exists("svc/API_KEY"));
}

#[test]
fn names_and_count() {
    let (_dir, path) = vault_path();
    let mut store = SecretStore::create(&path, PASSWORD).unwrap();
    store.set("B", "2").unwrap();
    store.set("A", "1").unwrap();

    let mut names = store.names();
    names.sort();
    assert_eq!(names, vec!["A".to_string(), "B".to_string()]);
    assert_eq!(store.count(), 2);
}

// ---------------------------------------------------------------------------
// Unlock
// ---------------------------------------------------------------------------

#[test]
fn unlock_returns_previously_set_secrets() {
    let (_dir, path) = vault_path();
    {
        let mut store = SecretStore::create(&path, PASSWORD).unwrap();
        store.set("API_KEY", "sk-test-123").unwrap();
        store.set("DB_URL", "postgres://localhost/db").unwrap();
    }

    let store = SecretStore::unlock(&path, PASSWORD).expect("unlock");
    assert_eq!(store.count(), 2);
    assert_eq!(store.get("API_KEY"), Some("sk-test-123"));
    assert_eq!(store.get("DB_URL"), Some("postgres://localhost/db"));
}

#[test]
fn unlock_with_wrong_password_fails_generically() {
    let (_dir, path) = vault_path();
    SecretStore::create(&path, PASSWORD).unwrap();

    let err = SecretStore::unlock(&path, "wrongpassword").unwrap_err();
    assert!(matches!(err, FernlockError::UnlockFailed));
    assert_eq!(
        err.to_string(),
        "Unlock failed — wrong password or corrupted vault"
    );
}

#[test]
fn unlock_of_corrupted_vault_fails_with_same_error() {
    let (_dir, path) = vault_path();
    SecretStore::create(&path, PASSWORD).unwrap();

    // Flip a character inside the token.
    let mut data = fs::read(&path).unwrap();
    let mid = 17 + (data.len() - 17) / 2;
    data[mid] = if data[mid] == b'A' { b'B' } else { b'A' };
    fs::write(&path, &data).unwrap();
    assert!(matches!(
        SecretStore::unlock(&path, PASSWORD),
        Err(FernlockError::UnlockFailed)
    ));

    // Unknown format version.
    data[0] = 2;
    fs::write(&path, &data).unwrap();
    assert!(matches!(
        SecretStore::unlock(&path, PASSWORD),
        Err(FernlockError::UnlockFailed)
    ));

    // Truncated header.
    fs::write(&path, [1u8; 10]).unwrap();
    assert!(matches!(
        SecretStore::unlock(&path, PASSWORD),
        Err(FernlockError::UnlockFailed)
    ));
}

#[test]
fn unlock_missing_vault_is_not_found() {
    let (_dir, path) = vault_path();
    assert!(matches!(
        SecretStore::unlock(&path, PASSWORD),
        Err(FernlockError::VaultNotFound(_))
    ));
}

#[test]
fn unlock_or_create_creates_then_unlocks() {
    let (_dir, path) = vault_path();

    let mut store = SecretStore::unlock_or_create(&path, PASSWORD).unwrap();
    store.set("TOKEN", "abc").unwrap();
    drop(store);

    let store = SecretStore::unlock_or_create(&path, PASSWORD).unwrap();
    assert_eq!(store.get("TOKEN"), Some("abc"));
}

// ---------------------------------------------------------------------------
// Listing and deployments
// ---------------------------------------------------------------------------

#[test]
fn list_never_exposes_values() {
    let (_dir, path) = vault_path();
    let mut store = SecretStore::create(&path, PASSWORD).unwrap();

    for i in 0..5 {
        store
            .set(&format!("SECRET_{i}"), &format!("value-{i}-do-not-leak"))
            .unwrap();
        let listed = store.list();
        assert_eq!(listed.len(), i + 1);

        let rendered = format!("{listed:?}") + &serde_json::to_string(&listed).unwrap();
        assert!(!rendered.contains("do-not-leak"));
    }
}

#[test]
fn record_deployment_upserts_target() {
    let (_dir, path) = vault_path();
    let mut store = SecretStore::create(&path, PASSWORD).unwrap();
    store.set("API_KEY", "v").unwrap();

    store.record_deployment("API_KEY", "worker-prod").unwrap();
    let first = store.list()["API_KEY"].deployed_to["worker-prod"];

    std::thread::sleep(std::time::Duration::from_millis(5));
    store.record_deployment("API_KEY", "worker-prod").unwrap();
    store.record_deployment("API_KEY", "Pages:site").unwrap();

    let meta = &store.list()["API_KEY"];
    assert_eq!(meta.deployed_to.len(), 2);
    assert!(meta.deployed_to["worker-prod"] > first);

    // Deployments survive a value update and a reopen.
    store.set("API_KEY", "v2").unwrap();
    drop(store);
    let store = SecretStore::unlock(&path, PASSWORD).unwrap();
    assert_eq!(store.list()["API_KEY"].deployed_to.len(), 2);
}

#[test]
fn record_deployment_of_missing_secret_errors() {
    let (_dir, path) = vault_path();
    let mut store = SecretStore::create(&path, PASSWORD).unwrap();

    assert!(matches!(
        store.record_deployment("NOPE", "worker"),
        Err(FernlockError::SecretNotFound(_))
    ));
}

// ---------------------------------------------------------------------------
// On-disk format
// ---------------------------------------------------------------------------

#[test]
fn file_is_version_salt_token() {
    let (_dir, path) = vault_path();
    let mut store = SecretStore::create(&path, PASSWORD).unwrap();
    store.set("API_KEY", "sk-test-123").unwrap();

    let data = fs::read(&path).unwrap();
    let file = VaultFile::from_bytes(&data).unwrap();
    assert_eq!(data[0], 1);
    assert_eq!(&data[1..17], &file.salt);

    // Anyone holding the password can open the token with a plain Fernet
    // decrypt, using a key derived from the header salt.
    let key = DerivedKey::derive(PASSWORD.as_bytes(), &file.salt);
    let payload = decrypt(key.as_bytes(), &file.token, None).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&payload).unwrap();
    assert_eq!(json["API_KEY"]["value"], "sk-test-123");
    assert!(json["API_KEY"]["created_at"].is_string());
}

#[test]
fn every_write_uses_a_fresh_token_but_same_salt() {
    let (_dir, path) = vault_path();
    let mut store = SecretStore::create(&path, PASSWORD).unwrap();
    let first = read_vault(&path).unwrap();

    store.set("A", "1").unwrap();
    let second = read_vault(&path).unwrap();

    assert_eq!(first.salt, second.salt);
    assert_ne!(first.token, second.token);
}

#[cfg(unix)]
#[test]
fn vault_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, path) = vault_path();
    let mut store = SecretStore::create(&path, PASSWORD).unwrap();
    store.set("A", "1").unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
}

// ---------------------------------------------------------------------------
// Failed writes
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn failed_write_rolls_back_in_memory_change() {
    let (_dir, path) = vault_path();
    let mut store = SecretStore::create(&path, PASSWORD).unwrap();
    store.set("KEEP", "original").unwrap();

    // Put a non-empty directory where the vault file was, so the final
    // rename fails.
    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();
    fs::write(path.join("blocker"), b"x").unwrap();

    assert!(store.set("NEW", "value").is_err());
    assert!(!store.exists("NEW"));

    assert!(store.set("KEEP", "changed").is_err());
    assert_eq!(store.get("KEEP"), Some("original"));

    assert!(store.delete("KEEP").is_err());
    assert_eq!(store.get("KEEP"), Some("original"));

    assert!(store.record_deployment("KEEP", "w").is_err());
    assert!(store.list()["KEEP"].deployed_to.is_empty());

    assert!(store.change_password("another-password").is_err());
}

// ---------------------------------------------------------------------------
// Password rotation
// ---------------------------------------------------------------------------

#[test]
fn change_password_reencrypts_under_new_salt() {
    let (_dir, path) = vault_path();
    let mut store = SecretStore::create(&path, PASSWORD).unwrap();
    store.set("API_KEY", "sk-test-123").unwrap();
    let old_salt = read_vault(&path).unwrap().salt;

    assert!(matches!(
        store.change_password("short"),
        Err(FernlockError::PasswordTooShort(_))
    ));

    store.change_password("brand-new-password").unwrap();
    assert_ne!(read_vault(&path).unwrap().salt, old_salt);

    // Further writes use the new key.
    store.set("OTHER", "x").unwrap();
    drop(store);

    assert!(matches!(
        SecretStore::unlock(&path, PASSWORD),
        Err(FernlockError::UnlockFailed)
    ));
    let store = SecretStore::unlock(&path, "brand-new-password").unwrap();
    assert_eq!(store.get("API_KEY"), Some("sk-test-123"));
    assert_eq!(store.get("OTHER"), Some("x"));
}
