/// Unit tests for cache_set.rs
///
/// Uses MockRenderer to observe what reaches the renderer.

use super::*;
use crate::codec::{encode, PixelBuffer, TextureFormat};
use crate::renderer::mock_renderer::{MockCall, MockRenderer};
use crate::resource::Payload;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn cache_set(owner: u64, global: &SharedGlobalIndex) -> (ResourceCacheSet, MockRenderer) {
    let mock = MockRenderer::new();
    let renderer: Arc<Mutex<dyn Renderer>> = Arc::new(Mutex::new(mock.clone()));
    let set = ResourceCacheSet::new(
        ResourceKind::Texture,
        OwnerId::new(owner),
        Arc::clone(global),
        renderer,
        &CacheConfig::default(),
    );
    (set, mock)
}

fn texture(name: &str, color: [u8; 4]) -> Resource {
    let pixels = PixelBuffer::filled(8, 8, color).unwrap();
    let payload = encode(&pixels, TextureFormat::Rgba8, 1).unwrap();
    Resource::texture(name, 8, 8, TextureFormat::Rgba8, 1, Payload::Single(payload))
}

fn insert(set: &mut ResourceCacheSet, resource: Resource) {
    let prepared = set.prepare(resource).unwrap();
    set.insert_prepared(prepared);
}

// ============================================================================
// Insert / purge
// ============================================================================

#[test]
fn test_insert_fills_all_tiers() {
    let global = GlobalIndex::shared();
    let (mut set, mock) = cache_set(1, &global);
    insert(&mut set, texture("rock", [1, 2, 3, 4]));

    assert_eq!(set.tiers_holding("rock"), Tiers::all());
    assert!(set.lookup("rock").is_some());
    assert!(mock.is_bound(ResourceKind::Texture, "rock"));
    assert!(set.is_consistent("rock"));
}

#[test]
fn test_prepare_has_no_side_effect() {
    let global = GlobalIndex::shared();
    let (set, mock) = cache_set(1, &global);
    let _prepared = set.prepare(texture("rock", [0; 4])).unwrap();

    assert_eq!(set.tiers_holding("rock"), Tiers::empty());
    assert_eq!(mock.bound_count(), 0);
    assert!(global.lock().unwrap().is_empty());
}

#[test]
fn test_lut_has_no_thumbnail() {
    let global = GlobalIndex::shared();
    let (mut set, _mock) = cache_set(1, &global);
    insert(&mut set, Resource::lut("lut0", vec![0; 1024]));
    assert_eq!(set.tiers_holding("lut0"), Tiers::GLOBAL | Tiers::RENDER);
}

#[test]
fn test_purge_reports_tiers_and_is_idempotent() {
    let global = GlobalIndex::shared();
    let (mut set, mock) = cache_set(1, &global);
    insert(&mut set, texture("rock", [0; 4]));

    assert_eq!(set.purge("rock"), Tiers::all());
    assert_eq!(set.purge("rock"), Tiers::empty());
    assert_eq!(set.purge("never"), Tiers::empty());
    assert!(set.lookup("rock").is_none());
    assert_eq!(mock.bound_count(), 0);
}

#[test]
fn test_prepare_failure_reported() {
    let global = GlobalIndex::shared();
    let (set, mock) = cache_set(1, &global);
    mock.set_fail_create(true);
    assert!(set.prepare(texture("rock", [0; 4])).is_err());
}

#[test]
fn test_prepare_lenient_drops_preview_only() {
    let global = GlobalIndex::shared();
    let (mut set, _mock) = cache_set(1, &global);
    let odd = Resource::texture("odd", 4, 4, TextureFormat::Unknown(99), 1, Payload::Single(vec![1, 2]));
    assert!(set.prepare(odd.clone()).is_err());

    let prepared = set.prepare_lenient(odd).unwrap();
    assert!(prepared.preview.is_none());
    set.insert_prepared(prepared);
    assert_eq!(set.tiers_holding("odd"), Tiers::GLOBAL | Tiers::RENDER);
}

// ============================================================================
// Rename
// ============================================================================

#[test]
fn test_rename_moves_all_tiers_and_reuses_objects() {
    let global = GlobalIndex::shared();
    let (mut set, mock) = cache_set(1, &global);
    let rock = texture("rock", [5, 5, 5, 5]);
    insert(&mut set, rock.clone());
    let binding = set.render().get("rock").unwrap();

    set.rename("rock", rock.renamed("stone"));

    assert_eq!(set.tiers_holding("rock"), Tiers::empty());
    assert_eq!(set.tiers_holding("stone"), Tiers::all());
    assert!(Arc::ptr_eq(&set.render().get("stone").unwrap(), &binding));
    assert!(set.lookup("stone").unwrap().shares_payload(&rock));

    let calls = mock.calls();
    assert_eq!(calls.last(), Some(&MockCall::Bind(ResourceKind::Texture, "stone".to_string())));
    // Renaming creates no new renderer object
    assert_eq!(calls.iter().filter(|c| matches!(c, MockCall::Create(_))).count(), 1);
}

// ============================================================================
// Several owners
// ============================================================================

#[test]
fn test_teardown_keeps_other_owner_entries() {
    let global = GlobalIndex::shared();
    let (mut file_a, _) = cache_set(1, &global);
    let (mut file_b, mock_b) = cache_set(2, &global);

    insert(&mut file_a, texture("rock", [1, 1, 1, 1]));
    insert(&mut file_b, texture("rock", [2, 2, 2, 2]));
    insert(&mut file_b, texture("water", [3, 3, 3, 3]));

    file_b.teardown(["rock", "water"]);

    assert_eq!(mock_b.bound_count(), 0);
    assert!(file_b.thumbnails().is_empty());
    let rock = file_a.lookup("rock").unwrap();
    assert_eq!(rock.payload.face(0).unwrap()[0], 1);
    assert!(file_a.lookup("water").is_none());
    assert_eq!(file_a.tiers_holding("rock"), Tiers::all());
}

#[test]
fn test_purge_keeps_other_owner_entry() {
    let global = GlobalIndex::shared();
    let (mut file_a, _) = cache_set(1, &global);
    let (mut file_b, _) = cache_set(2, &global);
    insert(&mut file_a, texture("rock", [1; 4]));
    insert(&mut file_b, texture("rock", [2; 4]));

    assert_eq!(file_b.purge("rock"), Tiers::all());
    assert!(file_b.lookup("rock").is_some());
    assert_eq!(file_b.tiers_holding("rock"), Tiers::empty());
}

#[test]
fn test_register_keeps_first_visible() {
    let global = GlobalIndex::shared();
    let (mut file_a, _) = cache_set(1, &global);
    let (mut file_b, _) = cache_set(2, &global);
    let prepared = file_a.prepare(texture("rock", [1; 4])).unwrap();
    file_a.register_prepared(prepared);
    let prepared = file_b.prepare(texture("rock", [2; 4])).unwrap();
    file_b.register_prepared(prepared);

    assert_eq!(file_b.lookup("rock").unwrap().payload.face(0).unwrap()[0], 1);
    assert_eq!(file_b.tiers_holding("rock"), Tiers::all());
}

#[test]
fn test_is_consistent_detects_orphan_local_entry() {
    let global = GlobalIndex::shared();
    let (mut set, _) = cache_set(1, &global);
    insert(&mut set, texture("rock", [0; 4]));
    // Drop only the global contribution behind the cache set's back
    global.lock().unwrap().remove(OwnerId::new(1), "rock");
    assert!(!set.is_consistent("rock"));
    assert!(set.is_consistent("never"));
}
