/// Unit tests for controller.rs
///
/// Each test builds its own global index, so none of them touch the Runtime
/// singleton.

use super::*;
use crate::cache::GlobalIndex;
use crate::codec::{decode, decode_level};
use crate::renderer::mock_renderer::{MockCall, MockRenderer};
use crate::lifecycle::{CancelToken, SourceImage};
use crate::config::BatchConfig;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn controller_with(
    kind: ResourceKind,
    owner: u64,
    global: &SharedGlobalIndex,
) -> (ResourceLifecycleController, MockRenderer) {
    let mock = MockRenderer::new();
    let renderer: Arc<Mutex<dyn Renderer>> = Arc::new(Mutex::new(mock.clone()));
    let controller = ResourceLifecycleController::new(
        kind,
        OwnerId::new(owner),
        Arc::clone(global),
        renderer,
        CacheConfig::default(),
    );
    (controller, mock)
}

fn textures() -> (ResourceLifecycleController, MockRenderer, SharedGlobalIndex) {
    let global = GlobalIndex::shared();
    let (controller, mock) = controller_with(ResourceKind::Texture, 1, &global);
    (controller, mock, global)
}

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> SourceImage {
    SourceImage::single(PixelBuffer::filled(width, height, rgba).unwrap())
}

fn import(controller: &mut ResourceLifecycleController, name: &str, image: SourceImage) -> ImportOutcome {
    controller.import(ImportRequest::new(name, image)).unwrap()
}

fn visible_pixel(global: &SharedGlobalIndex, name: &str) -> [u8; 4] {
    let record = global.lock().unwrap().lookup(name).unwrap();
    decode(&record, 0).unwrap().pixel(0, 0)
}

// ============================================================================
// IMPORT / REPLACE
// ============================================================================

#[test]
fn test_import_creates_then_replaces() {
    let (mut controller, mock, global) = textures();

    assert_eq!(import(&mut controller, "rock", solid(8, 8, [1, 2, 3, 4])), ImportOutcome::Created);
    assert_eq!(controller.cache().tiers_holding("rock"), Tiers::all());
    assert!(mock.is_bound(ResourceKind::Texture, "rock"));
    assert_eq!(visible_pixel(&global, "rock"), [1, 2, 3, 4]);

    assert_eq!(import(&mut controller, "rock", solid(8, 8, [9, 9, 9, 9])), ImportOutcome::Replaced);
    assert_eq!(controller.len(), 1);
    assert_eq!(visible_pixel(&global, "rock"), [9, 9, 9, 9]);
    assert!(controller.cache().is_consistent("rock"));
}

#[test]
fn test_import_uses_hint_then_default_format() {
    let (mut controller, _mock, _global) = textures();
    import(&mut controller, "plain", solid(8, 8, [0; 4]));
    import(&mut controller, "gray", solid(8, 8, [0; 4]).with_format_hint(TextureFormat::L8));
    controller
        .import(ImportRequest::new("forced", solid(8, 8, [0; 4])).with_format(TextureFormat::Rgb565))
        .unwrap();

    assert_eq!(controller.get("plain").unwrap().format, TextureFormat::Rgba8);
    assert_eq!(controller.get("gray").unwrap().format, TextureFormat::L8);
    assert_eq!(controller.get("forced").unwrap().format, TextureFormat::Rgb565);
}

#[test]
fn test_color_only_replace_keeps_alpha() {
    let (mut controller, _mock, global) = textures();
    import(&mut controller, "rock", solid(8, 8, [200, 100, 50, 128]));

    controller
        .replace(ImportRequest::new("rock", solid(8, 8, [10, 20, 30, 255])).with_mode(EditMode::ColorOnly))
        .unwrap();

    let exported = controller.export("rock", 0, EditMode::Default).unwrap();
    assert!(exported.pixels().iter().all(|p| *p == [10, 20, 30, 128]));
    assert_eq!(visible_pixel(&global, "rock"), [10, 20, 30, 128]);
    assert_eq!(controller.get("rock").unwrap().format, TextureFormat::Rgba8);
}

#[test]
fn test_alpha_only_replace_reads_red_channel() {
    let (mut controller, _mock, _global) = textures();
    import(&mut controller, "leaf", solid(8, 8, [1, 2, 3, 4]));
    controller
        .replace(ImportRequest::new("leaf", solid(8, 8, [77, 0, 0, 0])).with_mode(EditMode::AlphaOnly))
        .unwrap();
    assert_eq!(controller.export("leaf", 0, EditMode::Default).unwrap().pixel(1, 1), [1, 2, 3, 77]);
}

#[test]
fn test_replace_keeps_existing_format() {
    let (mut controller, _mock, _global) = textures();
    controller
        .import(ImportRequest::new("rock", solid(8, 8, [0; 4])).with_format(TextureFormat::La8))
        .unwrap();
    controller
        .replace(ImportRequest::new("rock", solid(16, 16, [255; 4]).with_format_hint(TextureFormat::Rgb8)))
        .unwrap();

    let record = controller.get("rock").unwrap();
    assert_eq!(record.format, TextureFormat::La8);
    assert_eq!((record.width, record.height), (16, 16));
}

#[test]
fn test_replace_inherits_and_clamps_mip_count() {
    let (mut controller, _mock, _global) = textures();
    controller
        .import(ImportRequest::new("rock", solid(64, 64, [0; 4])).with_mip_count(4))
        .unwrap();
    controller.replace(ImportRequest::new("rock", solid(16, 16, [0; 4]))).unwrap();
    // 16x16 -> 8x8 is the longest tile aligned chain
    assert_eq!(controller.get("rock").unwrap().mip_count, 2);
}

#[test]
fn test_replace_clamps_inherited_block_format_chain() {
    let (mut controller, _mock, _global) = textures();
    controller
        .import(ImportRequest::new("etc", solid(32, 32, [40; 4])).with_format(TextureFormat::Etc1).with_mip_count(3))
        .unwrap();

    assert_eq!(import(&mut controller, "etc", solid(16, 16, [90; 4])), ImportOutcome::Replaced);
    let record = controller.get("etc").unwrap();
    assert_eq!((record.format, record.mip_count), (TextureFormat::Etc1, 2));
    assert!(decode_level(record, 0, 1).is_ok());

    // An explicit count is never reduced
    let err = controller
        .replace(ImportRequest::new("etc", solid(16, 16, [0; 4])).with_mip_count(3))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidDimensions(_)));
    assert_eq!(controller.get("etc").unwrap().mip_count, 2);
}

#[test]
fn test_replace_missing_name() {
    let (mut controller, mock, _global) = textures();
    let err = controller.replace(ImportRequest::new("ghost", solid(8, 8, [0; 4]))).unwrap_err();
    assert_eq!(err, Error::ResourceNotFound("ghost".to_string()));
    assert!(controller.is_empty());
    assert!(mock.calls().is_empty());
}

#[test]
fn test_partial_replace_size_mismatch_changes_nothing() {
    let (mut controller, mock, global) = textures();
    import(&mut controller, "rock", solid(8, 8, [1, 2, 3, 4]));
    let before = controller.get("rock").unwrap().clone();
    let calls_before = mock.calls().len();

    let err = controller
        .replace(ImportRequest::new("rock", solid(16, 16, [0; 4])).with_mode(EditMode::ColorOnly))
        .unwrap_err();

    assert_eq!(err, Error::DimensionMismatch { expected: (8, 8), actual: (16, 16) });
    assert!(controller.get("rock").unwrap().shares_payload(&before));
    assert!(global.lock().unwrap().lookup("rock").unwrap().shares_payload(&before));
    assert_eq!(mock.calls().len(), calls_before);
}

#[test]
fn test_full_replace_may_resize() {
    let (mut controller, _mock, _global) = textures();
    import(&mut controller, "rock", solid(8, 8, [0; 4]));
    controller.replace(ImportRequest::new("rock", solid(16, 8, [5; 4]))).unwrap();
    let record = controller.get("rock").unwrap();
    assert_eq!((record.width, record.height), (16, 8));
}

#[test]
fn test_renderer_failure_changes_nothing() {
    let (mut controller, mock, global) = textures();
    import(&mut controller, "rock", solid(8, 8, [1, 1, 1, 1]));
    mock.set_fail_create(true);

    assert!(matches!(
        controller.import(ImportRequest::new("rock", solid(8, 8, [2, 2, 2, 2]))),
        Err(Error::BackendError(_))
    ));
    assert!(controller.import(ImportRequest::new("new", solid(8, 8, [0; 4]))).is_err());

    assert_eq!(visible_pixel(&global, "rock"), [1, 1, 1, 1]);
    assert!(!controller.contains("new"));
    assert_eq!(controller.cache().tiers_holding("new"), Tiers::empty());
    assert!(controller.cache().is_consistent("rock"));
}

#[test]
fn test_encode_failure_changes_nothing() {
    let (mut controller, _mock, _global) = textures();
    let err = controller
        .import(ImportRequest::new("odd", solid(12, 12, [0; 4])).with_format(TextureFormat::Etc1))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidDimensions(_)));
    assert!(!controller.contains("odd"));
    assert_eq!(controller.cache().tiers_holding("odd"), Tiers::empty());
}

#[test]
fn test_empty_name_rejected() {
    let (mut controller, _mock, _global) = textures();
    assert!(matches!(
        controller.import(ImportRequest::new("", solid(8, 8, [0; 4]))),
        Err(Error::InvalidName(_))
    ));
}

#[test]
fn test_lut_controller_rejects_image_import() {
    let global = GlobalIndex::shared();
    let (mut luts, _mock) = controller_with(ResourceKind::Lut, 1, &global);
    assert!(matches!(
        luts.import(ImportRequest::new("curve", solid(8, 8, [0; 4]))),
        Err(Error::UnsupportedFormat(_))
    ));
}

// ============================================================================
// RENAME / REMOVE
// ============================================================================

#[test]
fn test_rename_chain_moves_every_tier() {
    let (mut controller, mock, global) = textures();
    import(&mut controller, "rock", solid(8, 8, [3, 3, 3, 3]));
    let original = controller.get("rock").unwrap().clone();
    let preview = controller.cache().thumbnails().get("rock").cloned();

    controller.rename("rock", "stone").unwrap();
    controller.rename("stone", "rock2").unwrap();

    for stale in ["rock", "stone"] {
        assert_eq!(controller.cache().tiers_holding(stale), Tiers::empty());
        assert!(!mock.is_bound(ResourceKind::Texture, stale));
    }
    assert_eq!(controller.cache().tiers_holding("rock2"), Tiers::all());
    assert!(global.lock().unwrap().lookup("rock2").unwrap().shares_payload(&original));
    assert_eq!(controller.cache().thumbnails().get("rock2").cloned(), preview);
    assert_eq!(controller.names(), vec!["rock2"]);

    // The binding was moved, not recreated
    let creates = mock.calls().iter().filter(|c| matches!(c, MockCall::Create(_))).count();
    assert_eq!(creates, 1);
}

#[test]
fn test_rename_errors() {
    let (mut controller, _mock, _global) = textures();
    import(&mut controller, "a", solid(8, 8, [0; 4]));
    import(&mut controller, "b", solid(8, 8, [0; 4]));

    assert_eq!(controller.rename("a", "b"), Err(Error::NameCollision("b".to_string())));
    assert_eq!(controller.rename("x", "y"), Err(Error::ResourceNotFound("x".to_string())));
    assert!(matches!(controller.rename("a", ""), Err(Error::InvalidName(_))));
    assert_eq!(controller.names(), vec!["a", "b"]);
    assert!(controller.cache().is_consistent("a"));
}

#[test]
fn test_rename_to_same_name_is_noop() {
    let (mut controller, mock, _global) = textures();
    import(&mut controller, "a", solid(8, 8, [0; 4]));
    let calls = mock.calls().len();
    controller.rename("a", "a").unwrap();
    assert_eq!(mock.calls().len(), calls);
    assert_eq!(controller.cache().tiers_holding("a"), Tiers::all());
}

#[test]
fn test_remove_reports_tiers() {
    let (mut controller, mock, global) = textures();
    import(&mut controller, "rock", solid(8, 8, [0; 4]));

    assert_eq!(controller.remove("rock").unwrap(), Tiers::all());
    assert!(controller.is_empty());
    assert!(global.lock().unwrap().lookup("rock").is_none());
    assert!(mock.calls().contains(&MockCall::Unbind(ResourceKind::Texture, "rock".to_string())));

    // Unknown names are a no-op
    assert_eq!(controller.remove("rock").unwrap(), Tiers::empty());
    assert_eq!(controller.remove("never").unwrap(), Tiers::empty());
}

// ============================================================================
// ADD BLANK / CLEAR
// ============================================================================

#[test]
fn test_add_blank_picks_free_names() {
    let (mut controller, _mock, _global) = textures();
    assert_eq!(controller.add_blank().unwrap(), "NewTexture");
    assert_eq!(controller.add_blank().unwrap(), "NewTexture1");
    controller.rename("NewTexture", "used").unwrap();
    assert_eq!(controller.add_blank().unwrap(), "NewTexture");

    let blank = controller.get("NewTexture1").unwrap();
    assert_eq!((blank.width, blank.height, blank.mip_count), (8, 8, 1));
    assert_eq!(controller.export("NewTexture1", 0, EditMode::Default).unwrap().pixel(0, 0), [0; 4]);
}

#[test]
fn test_add_blank_lut() {
    let global = GlobalIndex::shared();
    let (mut luts, _mock) = controller_with(ResourceKind::Lut, 1, &global);
    assert_eq!(luts.add_blank().unwrap(), "NewLut");

    let record = luts.get("NewLut").unwrap();
    assert_eq!(record.payload.byte_len(), 1024);
    // Lookup tables have no preview
    assert_eq!(luts.cache().tiers_holding("NewLut"), Tiers::GLOBAL | Tiers::RENDER);
    assert!(matches!(luts.export("NewLut", 0, EditMode::Default), Err(Error::UnsupportedFormat(_))));
}

#[test]
fn test_clear_empties_every_tier() {
    let (mut controller, mock, global) = textures();
    import(&mut controller, "a", solid(8, 8, [0; 4]));
    import(&mut controller, "b", solid(8, 8, [0; 4]));

    assert_eq!(controller.clear().unwrap(), 2);
    assert!(controller.is_empty());
    assert!(global.lock().unwrap().is_empty());
    assert_eq!(mock.bound_count(), 0);
    assert!(controller.cache().thumbnails().is_empty());
}

// ============================================================================
// LOAD / CLOSE
// ============================================================================

fn record(name: &str, rgba: [u8; 4]) -> Resource {
    let payload = codec::encode_payload(
        &[PixelBuffer::filled(8, 8, rgba).unwrap()],
        TextureFormat::Rgba8,
        1,
    )
    .unwrap();
    Resource::texture(name, 8, 8, TextureFormat::Rgba8, 1, payload)
}

#[test]
fn test_load_keeps_first_duplicate_and_skips_other_kinds() {
    let (mut controller, _mock, global) = textures();
    let loaded = controller
        .load(vec![
            record("rock", [1; 4]),
            record("rock", [2; 4]),
            Resource::lut("curve", vec![0; 1024]),
            record("leaf", [3; 4]),
        ])
        .unwrap();

    assert_eq!(loaded, 2);
    assert_eq!(controller.names(), vec!["rock", "leaf"]);
    assert_eq!(visible_pixel(&global, "rock"), [1; 4]);
}

#[test]
fn test_load_unknown_format_has_no_preview() {
    let (mut controller, _mock, _global) = textures();
    let odd = Resource::texture("odd", 4, 4, TextureFormat::Unknown(0x42), 1,
        crate::resource::Payload::Single(vec![0; 16]));
    controller.load(vec![odd]).unwrap();
    assert_eq!(controller.cache().tiers_holding("odd"), Tiers::GLOBAL | Tiers::RENDER);
}

#[test]
fn test_load_renderer_failure_loads_nothing() {
    let (mut controller, mock, global) = textures();
    mock.set_fail_create(true);
    assert!(controller.load(vec![record("rock", [1; 4])]).is_err());
    assert!(controller.is_empty());
    assert!(global.lock().unwrap().is_empty());
}

#[test]
fn test_first_open_file_stays_visible_until_closed() {
    let global = GlobalIndex::shared();
    let (mut first, _m1) = controller_with(ResourceKind::Texture, 1, &global);
    let (mut second, _m2) = controller_with(ResourceKind::Texture, 2, &global);

    first.load(vec![record("rock", [1; 4])]).unwrap();
    second.load(vec![record("rock", [2; 4])]).unwrap();
    assert_eq!(visible_pixel(&global, "rock"), [1; 4]);
    assert_eq!(second.cache().tiers_holding("rock"), Tiers::all());

    first.close();
    assert!(first.is_empty());
    assert_eq!(visible_pixel(&global, "rock"), [2; 4]);

    second.close();
    assert!(global.lock().unwrap().is_empty());
}

#[test]
fn test_edit_makes_own_version_visible() {
    let global = GlobalIndex::shared();
    let (mut first, _m1) = controller_with(ResourceKind::Texture, 1, &global);
    let (mut second, _m2) = controller_with(ResourceKind::Texture, 2, &global);
    first.load(vec![record("rock", [1; 4])]).unwrap();
    second.load(vec![record("rock", [2; 4])]).unwrap();

    second.replace(ImportRequest::new("rock", solid(8, 8, [5; 4]))).unwrap();
    assert_eq!(visible_pixel(&global, "rock"), [5; 4]);

    // Removing the edited version falls back to the other file's record
    second.remove("rock").unwrap();
    assert_eq!(visible_pixel(&global, "rock"), [1; 4]);
}

#[test]
fn test_drop_releases_global_entries() {
    let (mut controller, mock, global) = textures();
    import(&mut controller, "rock", solid(8, 8, [0; 4]));
    drop(controller);
    assert!(global.lock().unwrap().is_empty());
    assert_eq!(mock.bound_count(), 0);
}

// ============================================================================
// RAW RECORDS
// ============================================================================

#[test]
fn test_import_record_creates_then_replaces() {
    let (mut controller, mock, global) = textures();

    assert_eq!(controller.import_record(record("rock", [1; 4])).unwrap(), ImportOutcome::Created);
    assert_eq!(controller.cache().tiers_holding("rock"), Tiers::all());
    assert_eq!(visible_pixel(&global, "rock"), [1; 4]);

    let raw = record("rock", [7; 4]);
    assert_eq!(controller.import_record(raw.clone()).unwrap(), ImportOutcome::Replaced);
    assert!(controller.get("rock").unwrap().shares_payload(&raw));
    assert!(global.lock().unwrap().lookup("rock").unwrap().shares_payload(&raw));
    assert_eq!(mock.bound_count(), 1);
    assert!(controller.cache().is_consistent("rock"));
}

#[test]
fn test_replace_record_takes_target_name() {
    let (mut controller, _mock, global) = textures();
    import(&mut controller, "rock", solid(8, 8, [1; 4]));

    controller.replace_record("rock", record("from_disk", [6; 4])).unwrap();
    assert_eq!(controller.names(), vec!["rock"]);
    assert_eq!(visible_pixel(&global, "rock"), [6; 4]);
    assert_eq!(controller.cache().tiers_holding("from_disk"), Tiers::empty());

    assert_eq!(
        controller.replace_record("ghost", record("ghost", [0; 4])).unwrap_err(),
        Error::ResourceNotFound("ghost".to_string())
    );
    assert!(!controller.contains("ghost"));
}

#[test]
fn test_import_record_lut() {
    let global = GlobalIndex::shared();
    let (mut luts, mock) = controller_with(ResourceKind::Lut, 1, &global);

    let curve = Resource::lut("curve", vec![1; 1024]);
    assert_eq!(luts.import_record(curve.clone()).unwrap(), ImportOutcome::Created);
    assert_eq!(luts.cache().tiers_holding("curve"), Tiers::GLOBAL | Tiers::RENDER);
    assert!(mock.is_bound(ResourceKind::Lut, "curve"));

    let steeper = Resource::lut("curve", vec![2; 1024]);
    assert_eq!(luts.import_record(steeper.clone()).unwrap(), ImportOutcome::Replaced);
    assert!(global.lock().unwrap().lookup("curve").unwrap().shares_payload(&steeper));
    assert_eq!(luts.len(), 1);

    // A texture record does not belong in a lookup-table section
    assert!(matches!(luts.import_record(record("rock", [0; 4])), Err(Error::UnsupportedFormat(_))));
    assert!(!luts.contains("rock"));
}

#[test]
fn test_import_record_renderer_failure_changes_nothing() {
    let (mut controller, mock, global) = textures();
    controller.import_record(record("rock", [1; 4])).unwrap();
    mock.set_fail_create(true);

    assert!(matches!(controller.import_record(record("rock", [2; 4])), Err(Error::BackendError(_))));
    assert!(controller.import_record(record("new", [3; 4])).is_err());
    assert_eq!(visible_pixel(&global, "rock"), [1; 4]);
    assert!(!controller.contains("new"));
    assert_eq!(controller.cache().tiers_holding("new"), Tiers::empty());

    let lut_global = GlobalIndex::shared();
    let (mut luts, lut_mock) = controller_with(ResourceKind::Lut, 1, &lut_global);
    lut_mock.set_fail_create(true);
    assert!(luts.import_record(Resource::lut("curve", vec![0; 1024])).is_err());
    assert!(luts.is_empty());
    assert!(lut_global.lock().unwrap().is_empty());
}

#[test]
fn test_import_record_checks_payload() {
    let (mut controller, _mock, _global) = textures();

    let short = Resource::texture("short", 8, 8, TextureFormat::Rgba8, 1,
        crate::resource::Payload::Single(vec![0; 10]));
    assert!(matches!(controller.import_record(short), Err(Error::InvalidDimensions(_))));
    assert!(!controller.contains("short"));
    assert_eq!(controller.cache().tiers_holding("short"), Tiers::empty());

    let odd = Resource::texture("odd", 8, 8, TextureFormat::Unknown(0x42), 1,
        crate::resource::Payload::Single(vec![0; 16]));
    assert_eq!(controller.import_record(odd).unwrap(), ImportOutcome::Created);
    assert_eq!(controller.cache().tiers_holding("odd"), Tiers::GLOBAL | Tiers::RENDER);

    let unnamed = record("", [0; 4]);
    assert!(matches!(controller.import_record(unnamed), Err(Error::InvalidName(_))));
}

#[test]
fn test_import_size_follows_faces() {
    let (mut controller, _mock, _global) = textures();
    import(&mut controller, "wide", solid(32, 8, [0; 4]));
    let record = controller.get("wide").unwrap();
    assert_eq!((record.width, record.height), (32, 8));
    assert!(controller.cache().is_consistent("wide"));
}

// ============================================================================
// EXPORT
// ============================================================================

#[test]
fn test_export_modes() {
    let (mut controller, _mock, _global) = textures();
    import(&mut controller, "rock", solid(8, 8, [10, 20, 30, 40]));

    assert_eq!(controller.export("rock", 0, EditMode::Default).unwrap().pixel(0, 0), [10, 20, 30, 40]);
    assert_eq!(controller.export("rock", 0, EditMode::ColorOnly).unwrap().pixel(0, 0), [10, 20, 30, 255]);
    assert_eq!(controller.export("rock", 0, EditMode::AlphaOnly).unwrap().pixel(0, 0), [40, 40, 40, 255]);
    assert_eq!(
        controller.export("ghost", 0, EditMode::Default).unwrap_err(),
        Error::ResourceNotFound("ghost".to_string())
    );
    assert!(matches!(
        controller.export("rock", 1, EditMode::Default),
        Err(Error::IndexOutOfRange { .. })
    ));
}

// ============================================================================
// NAME LOCKS
// ============================================================================

#[test]
fn test_planned_batch_blocks_other_edits() {
    let (mut controller, _mock, _global) = textures();
    import(&mut controller, "rock", solid(8, 8, [0; 4]));
    import(&mut controller, "leaf", solid(8, 8, [0; 4]));

    let plan = controller
        .plan_batch(vec![ImportRequest::new("rock", solid(8, 8, [9; 4]))])
        .unwrap();

    let busy = Error::NameBusy("rock".to_string());
    assert_eq!(controller.import(ImportRequest::new("rock", solid(8, 8, [1; 4]))).unwrap_err(), busy);
    assert_eq!(controller.rename("rock", "stone").unwrap_err(), busy);
    assert_eq!(controller.rename("leaf", "rock").unwrap_err(), busy);
    assert_eq!(controller.remove("rock").unwrap_err(), busy);
    assert_eq!(controller.clear().unwrap_err(), busy);
    assert_eq!(controller.import_record(record("rock", [1; 4])).unwrap_err(), busy);
    assert_eq!(controller.len(), 2);

    // Other names are unaffected
    controller.rename("leaf", "branch").unwrap();

    let encoded = plan.run(&BatchConfig::default(), &CancelToken::new(), |_| {}).unwrap();
    controller.commit_batch(encoded).unwrap();
    assert!(controller.locks().is_empty());
    controller.remove("rock").unwrap();
}
