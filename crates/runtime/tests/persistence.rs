use std::fs;

use save_core::{SaveRecord, SchemaVersion, SlotName, SlotStatus};
use save_runtime::{
    FileSlotRepository, LoadError, LoadNotice, PersistenceConfig, RenameError, SaveService,
    SlotRepository,
};
use serde_json::{Value, json};
use tempfile::TempDir;

fn open(dir: &TempDir) -> SaveService {
    SaveService::open(&PersistenceConfig::new(dir.path())).expect("save root should open")
}

fn character(name: &str, level: u32) -> SaveRecord {
    let mut record = SaveRecord::new_character(name).expect("valid character");
    record.level = level;
    record
}

/// Full slot lifecycle over a real directory:
/// 1. save into two slots
/// 2. list them with player info
/// 3. overwrite one, keeping the previous content as backup
/// 4. load it back unchanged
/// 5. delete it
#[test]
fn slot_lifecycle() {
    let dir = TempDir::new().unwrap();
    let service = open(&dir);

    service.save(&character("Aria", 5), "main").expect("save main");
    service.save(&character("Bram", 12), "alt").expect("save alt");

    let slots = service.list_slots();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].slot.as_str(), "alt");
    assert_eq!(slots[0].player_name.as_deref(), Some("Bram"));
    assert_eq!(slots[1].level, Some(5));

    let mut updated = character("Aria", 6);
    updated.gold = 999;
    updated.inventory.push(json!({"name": "Potion", "quantity": 3}).as_object().unwrap().clone());
    service.save(&updated, "main").expect("overwrite main");
    assert!(dir.path().join("save_main.json.bak").exists());

    let outcome = service.load("main").expect("load main");
    assert!(outcome.notices.is_empty());
    assert_eq!(outcome.record, updated);

    assert!(service.delete_slot("main").unwrap());
    assert!(!service.slot_exists("main"));
    assert!(!dir.path().join("save_main.json.bak").exists());
}

/// Every optional field a game can set survives a save and load through the
/// service, including keys this build does not know.
#[test]
fn optional_fields_round_trip() {
    let dir = TempDir::new().unwrap();
    let service = open(&dir);

    let mut record = character("Aria", 17);
    record.save_slot = "hero".to_string();
    record.current_location = "whispering_woods".to_string();
    record.world_anchor_timestamp = Some(1_718_000_000.5);
    record.attributes.strength = 21;
    record.attributes.stat_points = 4;
    record.skills.fishing_level = 9;
    record.skills.fishing_exp = 55;
    record.skills.cooking_exp_to_next = 340;
    record.skills.mining_level = 3;
    record.equipment.weapon = json!({"name": "Iron Sword", "attack": 7})
        .as_object()
        .cloned();
    record.equipment.tool = None;
    record.tracking.achievements = vec!["first_blood".to_string(), "angler".to_string()];
    record.tracking.total_kills = 120;
    record
        .extra
        .insert("pet".to_string(), json!({"species": "owl", "name": "Hoot"}));

    service.save(&record, "hero").unwrap();
    let outcome = service.load("hero").unwrap();

    assert!(outcome.notices.is_empty());
    assert_eq!(outcome.record, record);
    let stored: Value =
        serde_json::from_slice(&fs::read(dir.path().join("save_hero.json")).unwrap()).unwrap();
    assert_eq!(stored["tool"], Value::Null);
    assert_eq!(stored["pet"]["species"], json!("owl"));
}

/// Simulated termination after staging but before the rename: the primary
/// still holds the previous save and loads cleanly; the next write succeeds.
#[test]
fn interrupted_write_keeps_previous_save() {
    let dir = TempDir::new().unwrap();
    let repo = FileSlotRepository::new(dir.path()).unwrap();
    let slot = SlotName::default();
    repo.save(&slot, &character("Before", 3)).unwrap();

    let staged = repo
        .writer()
        .stage(&slot, &character("After", 4))
        .expect("stage should succeed");
    assert!(staged.temp_path().exists());
    drop(staged);

    let loaded = repo.load(&slot).expect("primary must still load");
    assert_eq!(loaded.record.name, "Before");

    repo.save(&slot, &character("After", 4)).unwrap();
    assert_eq!(repo.load(&slot).unwrap().record.name, "After");
    assert!(!repo.paths(&slot).unwrap().temp.exists());
}

/// Garbage in the primary: load comes from the backup and says so; the
/// listing shows the slot as corrupted rather than hiding it.
#[test]
fn corrupted_primary_recovers_from_backup() {
    let dir = TempDir::new().unwrap();
    let service = open(&dir);
    service.save(&character("First", 2), "main").unwrap();
    service.save(&character("Second", 3), "main").unwrap();
    fs::write(dir.path().join("save_main.json"), "{invalid json").unwrap();

    let outcome = service.load("main").expect("backup should be used");

    assert_eq!(outcome.record.name, "First");
    assert_eq!(outcome.notices, [LoadNotice::BackupRestored]);
    assert_eq!(service.list_slots()[0].status, SlotStatus::Corrupted);
}

#[test]
fn both_copies_corrupted_is_reported() {
    let dir = TempDir::new().unwrap();
    let service = open(&dir);
    fs::write(dir.path().join("save_main.json"), "{nope").unwrap();
    fs::write(dir.path().join("save_main.json.bak"), json!({"name": "x"}).to_string()).unwrap();

    match service.load("main") {
        Err(LoadError::Corrupted { slot, .. }) => assert!(slot.is_default()),
        other => panic!("expected corrupted slot, got {other:?}"),
    }
    assert_eq!(service.load_player("main"), None);
}

#[test]
fn invalid_field_values_are_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let service = open(&dir);
    let mut payload = character("Aria", 5).to_value().unwrap();
    payload["level"] = json!(9999);
    fs::write(dir.path().join("save_main.json"), payload.to_string()).unwrap();

    let err = service.load("main").unwrap_err();

    assert!(err.to_string().contains("exceeds maximum"), "{err}");
}

/// A v1 save is upgraded, persisted with the current tag and loads without
/// notices afterwards.
#[test]
fn legacy_schema_is_migrated_and_persisted() {
    let dir = TempDir::new().unwrap();
    let service = open(&dir);
    let payload = json!({
        "name": "Old Timer", "level": 12, "exp": 40, "exp_to_next": 900,
        "gold": 1234, "inventory": [{"name": "Potion"}], "schema": 1,
        "current_location": "town",
    });
    fs::write(dir.path().join("save_old.json"), payload.to_string()).unwrap();

    let outcome = service.load("old").unwrap();

    assert!(outcome.notices.contains(&LoadNotice::Migrated {
        from: SchemaVersion(1),
        to: SchemaVersion::CURRENT,
    }));
    assert_eq!(outcome.record.skills.mining_level, 1);
    assert_eq!(outcome.record.current_location, "eslania_city");
    let stored: Value =
        serde_json::from_slice(&fs::read(dir.path().join("save_old.json")).unwrap()).unwrap();
    assert_eq!(stored["schema"], json!(3));
    assert_eq!(stored["inventory"][0]["quantity"], json!(1));
}

/// Opening a save root that still has the single-file save moves it into
/// the default slot.
#[test]
fn opening_imports_legacy_save() {
    let dir = TempDir::new().unwrap();
    let legacy = json!({
        "name": "Veteran", "level": 20, "exp": 0, "exp_to_next": 2000,
        "gold": 5, "inventory": [],
    });
    fs::write(dir.path().join("game_save.json"), legacy.to_string()).unwrap();

    let service = open(&dir);

    assert_eq!(service.load_player("main").unwrap().name, "Veteran");
    assert!(dir.path().join("game_save.json.old").exists());
}

#[test]
fn listing_skips_stray_files() {
    let dir = TempDir::new().unwrap();
    let service = open(&dir);
    service.save(&character("Aria", 1), "main").unwrap();
    fs::write(dir.path().join("save_main.json.tmp"), "partial").unwrap();
    fs::write(dir.path().join("README.txt"), "hello").unwrap();
    fs::write(dir.path().join("save_..json"), "{}").unwrap();

    let slots = service.list_slots();

    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].slot.as_str(), "main");
}

#[test]
fn rename_moves_files_on_disk() {
    let dir = TempDir::new().unwrap();
    let service = open(&dir);
    service.save(&character("Aria", 1), "first run").unwrap();

    service.rename_slot("first run", "second run").unwrap();

    assert!(!dir.path().join("save_first run.json").exists());
    let moved = service.load_player("second run").unwrap();
    assert_eq!(moved.save_slot, "second run");
}

/// A slot whose backup is a link out of the save root can be read only through
/// the default slot, and none of the mutating operations touch the default
/// slot or the link target on its behalf.
#[cfg(unix)]
#[test]
fn escaping_slot_is_refused_for_writes() {
    let dir = TempDir::new().unwrap();
    let service = open(&dir);
    service.save(&character("Main", 8), "main").unwrap();
    let elsewhere = TempDir::new().unwrap();
    let victim = elsewhere.path().join("victim.txt");
    fs::write(&victim, b"untouched").unwrap();
    std::os::unix::fs::symlink(&victim, dir.path().join("save_evil.json.bak")).unwrap();

    let outcome = service.load("evil").unwrap();
    assert!(outcome.slot.is_default());
    assert!(service.save(&character("Evil", 1), "evil").is_err());
    assert!(service.delete_slot("evil").is_err());
    assert!(matches!(
        service.rename_slot("evil", "moved"),
        Err(RenameError::Redirected { .. })
    ));

    assert_eq!(service.load_player("main").unwrap().name, "Main");
    assert!(!service.slot_exists("moved"));
    assert_eq!(fs::read(&victim).unwrap(), b"untouched");
}
