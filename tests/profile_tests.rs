use std::path::PathBuf;

use formfill::{
    error::StoreError,
    profile::{
        profile_model::{Profile, ProfileField},
        store::{ProfileStore, parse_profiles},
    },
};

use crate::common::fixtures::profile;

mod common;

fn temp_store_path() -> PathBuf {
    std::env::temp_dir().join(format!("formfill-profiles-{}.json", uuid::Uuid::new_v4()))
}

#[test]
fn missing_file_opens_empty() {
    let path = temp_store_path();
    let store = ProfileStore::open(&path).unwrap();
    assert!(store.profiles().is_empty());
    assert!(store.default_profile().is_none());
}

#[test]
fn save_persists_and_reopens() {
    let path = temp_store_path();
    let p = profile(&[("email", "a@b.com")]);

    let mut store = ProfileStore::open(&path).unwrap();
    store.save_profile(p.clone()).unwrap();

    let reopened = ProfileStore::open(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(reopened.profiles(), &[p.clone()]);
    assert_eq!(reopened.find(&p.id), Some(&p));
    assert_eq!(reopened.find("Test"), Some(&p));
}

#[test]
fn save_replaces_profile_with_same_id() {
    let path = temp_store_path();
    let mut p = profile(&[("email", "a@b.com")]);

    let mut store = ProfileStore::open(&path).unwrap();
    store.save_profile(p.clone()).unwrap();
    p.name = "Renamed".into();
    store.save_profile(p.clone()).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(store.profiles().len(), 1);
    assert_eq!(store.profiles()[0].name, "Renamed");
}

#[test]
fn save_rejects_invalid_profile() {
    let path = temp_store_path();
    let mut store = ProfileStore::open(&path).unwrap();

    let blank_key = Profile::new("Work", vec![ProfileField::new("  ", "x")]);
    let err = store.save_profile(blank_key).unwrap_err();

    assert!(matches!(err, StoreError::InvalidFormat(_)));
    assert!(store.profiles().is_empty());
    assert!(!path.exists());
}

#[test]
fn validate_requires_name_and_values() {
    assert!(Profile::new(" ", vec![]).validate().is_err());
    assert!(Profile::new("Work", vec![ProfileField::new("email", "")]).validate().is_err());
    assert!(Profile::new("Work", vec![]).validate().is_ok());
}

#[test]
fn delete_unknown_profile_is_not_found() {
    let path = temp_store_path();
    let mut store = ProfileStore::open(&path).unwrap();
    let p = profile(&[("email", "a@b.com")]);
    store.save_profile(p.clone()).unwrap();

    assert!(matches!(store.delete_profile("nope"), Err(StoreError::NotFound(_))));
    store.delete_profile(&p.id).unwrap();
    std::fs::remove_file(&path).ok();

    assert!(store.profiles().is_empty());
}

#[test]
fn export_then_import_into_another_store() {
    let a = temp_store_path();
    let b = temp_store_path();

    let mut source = ProfileStore::open(&a).unwrap();
    source.save_profile(profile(&[("email", "a@b.com")])).unwrap();
    source.save_profile(profile(&[("city", "Oslo")])).unwrap();
    let exported = source.export_json().unwrap();

    let mut target = ProfileStore::open(&b).unwrap();
    let count = target.import_json(&exported).unwrap();
    std::fs::remove_file(&a).ok();
    std::fs::remove_file(&b).ok();

    assert_eq!(count, 2);
    assert_eq!(target.profiles(), source.profiles());
}

#[test]
fn import_rejects_malformed_payloads() {
    let not_array = parse_profiles(r#"{"id":"1","name":"x","fields":[]}"#);
    assert!(matches!(not_array, Err(StoreError::InvalidFormat(_))));

    let missing_name = parse_profiles(r#"[{"id":"1","fields":[]}]"#);
    assert!(matches!(missing_name, Err(StoreError::InvalidFormat(_))));

    let fields_not_array = parse_profiles(r#"[{"id":"1","name":"x","fields":{}}]"#);
    assert!(matches!(fields_not_array, Err(StoreError::InvalidFormat(_))));

    let not_json = parse_profiles("profiles: []");
    assert!(matches!(not_json, Err(StoreError::Parse(_))));
}

#[test]
fn failed_import_keeps_existing_profiles() {
    let path = temp_store_path();
    let mut store = ProfileStore::open(&path).unwrap();
    store.save_profile(profile(&[("email", "a@b.com")])).unwrap();

    assert!(store.import_json("[{}]").is_err());
    std::fs::remove_file(&path).ok();

    assert_eq!(store.profiles().len(), 1);
}

#[test]
fn clear_empties_the_store() {
    let path = temp_store_path();
    let mut store = ProfileStore::open(&path).unwrap();
    store.save_profile(profile(&[("email", "a@b.com")])).unwrap();
    store.clear().unwrap();

    let reopened = ProfileStore::open(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert!(reopened.profiles().is_empty());
}

#[test]
fn keys_and_lookup_are_exact() {
    let p = profile(&[("email", "a@b.com"), ("Email", "other@b.com")]);
    assert_eq!(p.keys(), vec!["email", "Email"]);
    assert_eq!(p.field_by_key("Email").unwrap().value, "other@b.com");
    assert!(p.field_by_key("EMAIL").is_none());
}
