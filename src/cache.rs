//! Optional memoization of emitted paths.
//!
//! The emitter itself is pure; a [`PathCache`] is injected by the caller.
//! Entries are keyed by a [`signature`] of the commands, the bounding box and
//! the target scale, and keep those inputs so a hash collision reads as a
//! miss. Device bounds depend on the coordinate mapper, which is not part of
//! the key, so they are recomputed on every hit.

use std::hash::{BuildHasher, Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

use crate::emit::{CoordinateMapper, OutputPath, device_bounds, emit_with};
use crate::log::debug;
use crate::types::{PathCommand, Point, Rect};

/// One memoized emission together with the inputs that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheEntry {
    pub commands: Vec<PathCommand>,
    pub bounding_box: Rect,
    pub target_scale: i64,
    pub path: OutputPath,
}

impl CacheEntry {
    fn matches(&self, commands: &[PathCommand], bounding_box: Rect, target_scale: i64) -> bool {
        self.target_scale == target_scale
            && self.bounding_box == bounding_box
            && self.commands == commands
    }
}

/// Storage for emitted paths, shareable between threads.
pub trait PathCache: Send + Sync {
    fn get(&self, key: u64) -> Option<CacheEntry>;
    fn put(&self, key: u64, entry: CacheEntry);
}

/// Stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl PathCache for NoCache {
    fn get(&self, _key: u64) -> Option<CacheEntry> {
        None
    }

    fn put(&self, _key: u64, _entry: CacheEntry) {}
}

/// Bounded least-recently-used cache.
///
/// A capacity of 0 disables the cache and allocates nothing.
#[derive(Debug)]
pub struct LruPathCache(Option<Mutex<LruCache<u64, CacheEntry>>>);

impl LruPathCache {
    pub fn new(capacity: usize) -> Self {
        Self(NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))))
    }

    pub fn disabled() -> Self {
        Self(None)
    }

    pub fn is_enabled(&self) -> bool {
        self.0.is_some()
    }

    pub fn len(&self) -> usize {
        self.0
            .as_ref()
            .and_then(|lru| lru.lock().ok().map(|lru| lru.len()))
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PathCache for LruPathCache {
    fn get(&self, key: u64) -> Option<CacheEntry> {
        let mut lru = self.0.as_ref()?.lock().ok()?;
        lru.get(&key).cloned()
    }

    fn put(&self, key: u64, entry: CacheEntry) {
        // A poisoned lock only costs the memoization.
        if let Some(Ok(mut lru)) = self.0.as_ref().map(|m| m.lock()) {
            lru.put(key, entry);
        }
    }
}

fn hash_point(p: Point, state: &mut impl Hasher) {
    p.x.to_bits().hash(state);
    p.y.to_bits().hash(state);
}

/// Stable key for one emission input.
pub fn signature(commands: &[PathCommand], bounding_box: Rect, target_scale: i64) -> u64 {
    let mut state = ahash::RandomState::with_seeds(0x6f6f, 0x7867, 0x656f, 0x6d21).build_hasher();
    for cmd in commands {
        let tag: u8 = match cmd {
            PathCommand::MoveTo(_) => 0,
            PathCommand::LineTo(_) => 1,
            PathCommand::CubicCurveTo(..) => 2,
            PathCommand::ClosePath => 3,
        };
        tag.hash(&mut state);
        for p in cmd.points() {
            hash_point(p, &mut state);
        }
    }
    hash_point(bounding_box.min(), &mut state);
    hash_point(Point::new(bounding_box.width, bounding_box.height), &mut state);
    target_scale.hash(&mut state);
    state.finish()
}

/// [`emit_with`] through `cache`.
pub fn emit_cached(
    commands: &[PathCommand],
    bounding_box: Rect,
    target_scale: i64,
    mapper: &dyn CoordinateMapper,
    cache: &dyn PathCache,
) -> OutputPath {
    let key = signature(commands, bounding_box, target_scale);
    match cache.get(key) {
        Some(entry) if entry.matches(commands, bounding_box, target_scale) => {
            debug!(key, "path cache hit");
            let mut hit = entry.path;
            hit.bounds = device_bounds(bounding_box, mapper);
            return hit;
        }
        Some(_) => {
            debug!(key, "path cache collision");
        }
        None => {}
    }
    let out = emit_with(commands, bounding_box, target_scale, mapper);
    cache.put(
        key,
        CacheEntry {
            commands: commands.to_vec(),
            bounding_box,
            target_scale,
            path: out.clone(),
        },
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::{EmuMapper, PathOp, UserSpace, emit};

    fn triangle(offset: f64) -> Vec<PathCommand> {
        vec![
            PathCommand::MoveTo(Point::new(offset, 0.0)),
            PathCommand::LineTo(Point::new(offset + 10.0, 0.0)),
            PathCommand::LineTo(Point::new(offset, 10.0)),
            PathCommand::ClosePath,
        ]
    }

    #[test]
    fn signature_distinguishes_inputs() {
        let bbox = Rect::new(0.0, 0.0, 10.0, 10.0);
        let a = signature(&triangle(0.0), bbox, 100);
        assert_eq!(a, signature(&triangle(0.0), bbox, 100));
        assert_ne!(a, signature(&triangle(1.0), bbox, 100));
        assert_ne!(a, signature(&triangle(0.0), bbox, 200));
        assert_ne!(a, signature(&triangle(0.0), Rect::new(0.0, 0.0, 10.0, 11.0), 100));
    }

    #[test]
    fn lru_evicts_oldest() {
        let cache = LruPathCache::new(2);
        let bbox = Rect::new(0.0, 0.0, 10.0, 10.0);
        for i in 0..3 {
            emit_cached(&triangle(i as f64), bbox, 100, &UserSpace, &cache);
        }
        assert_eq!(cache.len(), 2);
        assert!(cache.get(signature(&triangle(0.0), bbox, 100)).is_none());
        assert!(cache.get(signature(&triangle(2.0), bbox, 100)).is_some());
    }

    #[test]
    fn zero_capacity_disables() {
        let cache = LruPathCache::new(0);
        assert!(!cache.is_enabled());
        emit_cached(&triangle(0.0), Rect::new(0.0, 0.0, 10.0, 10.0), 100, &UserSpace, &cache);
        assert!(cache.is_empty());
    }

    #[test]
    fn hit_recomputes_device_bounds() {
        let cache = LruPathCache::new(4);
        let bbox = Rect::new(0.0, 0.0, 10.0, 10.0);
        let plain = emit_cached(&triangle(0.0), bbox, 100, &UserSpace, &cache);
        let emu = emit_cached(&triangle(0.0), bbox, 100, &EmuMapper::default(), &cache);
        assert_eq!(plain.ops, emu.ops);
        assert_eq!(plain.bounds.width, 10);
        assert_eq!(emu.bounds.width, 95250);
    }

    #[test]
    fn colliding_entry_is_not_served() {
        let cache = LruPathCache::new(4);
        let bbox = Rect::new(0.0, 0.0, 10.0, 10.0);
        let key = signature(&triangle(0.0), bbox, 100);
        let other = emit_cached(&triangle(5.0), Rect::new(5.0, 0.0, 10.0, 10.0), 100, &UserSpace, &NoCache);
        cache.put(
            key,
            CacheEntry {
                commands: triangle(5.0),
                bounding_box: Rect::new(5.0, 0.0, 10.0, 10.0),
                target_scale: 100,
                path: OutputPath {
                    ops: vec![PathOp::Close],
                    ..other
                },
            },
        );

        let out = emit_cached(&triangle(0.0), bbox, 100, &UserSpace, &cache);
        assert_eq!(out, emit(&triangle(0.0), bbox, 100));
        // The fresh emission replaces the foreign entry.
        let stored = cache.get(key).unwrap();
        assert_eq!(stored.commands, triangle(0.0));
        assert_eq!(stored.path, out);
    }

    #[test]
    fn no_cache_always_misses() {
        let bbox = Rect::new(0.0, 0.0, 10.0, 10.0);
        let path = emit_cached(&triangle(0.0), bbox, 100, &UserSpace, &NoCache);
        NoCache.put(
            1,
            CacheEntry {
                commands: triangle(0.0),
                bounding_box: bbox,
                target_scale: 100,
                path,
            },
        );
        assert!(NoCache.get(1).is_none());
    }
}
