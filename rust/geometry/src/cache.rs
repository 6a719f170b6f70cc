// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spec-keyed mesh memoization for the render loop
//!
//! The editor asks for geometry every frame; meshes are only rebuilt when the
//! spec changes. "No geometry" outcomes are remembered as well, so
//! a half-drawn wall is not re-validated each frame.

use crate::generator::MeshGenerator;
use crate::mesh::Mesh;
use crate::spec::{ElementSpec, FloorSpec, WallSpec};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

/// A built mesh (or its absence) and the spec it was built from
#[derive(Debug)]
struct CacheEntry {
    spec: ElementSpec,
    mesh: Option<Arc<Mesh>>,
}

/// Mesh cache keyed by spec hash
///
/// A hit needs both the FxHash key and the stored spec to match, so two
/// specs that collide on the key overwrite each other instead of sharing a mesh.
#[derive(Debug, Default)]
pub struct MeshCache {
    generator: MeshGenerator,
    entries: FxHashMap<u64, CacheEntry>,
    hits: u64,
    misses: u64,
}

impl MeshCache {
    pub fn new(generator: MeshGenerator) -> Self {
        Self {
            generator,
            entries: FxHashMap::default(),
            hits: 0,
            misses: 0,
        }
    }

    #[inline]
    pub fn generator(&self) -> &MeshGenerator {
        &self.generator
    }

    pub fn get_or_build_wall(&mut self, spec: &WallSpec) -> Option<Arc<Mesh>> {
        let key = spec.cache_key();
        if let Some(mesh) = self.cached(key, |cached| {
            matches!(cached, ElementSpec::Wall(wall) if wall == spec)
        }) {
            return mesh;
        }
        let mesh = self.generator.wall_mesh(spec);
        self.store(key, ElementSpec::Wall(spec.clone()), mesh)
    }

    pub fn get_or_build_floor(&mut self, spec: &FloorSpec) -> Option<Arc<Mesh>> {
        let key = spec.cache_key();
        if let Some(mesh) = self.cached(key, |cached| {
            matches!(cached, ElementSpec::Floor(floor) if floor == spec)
        }) {
            return mesh;
        }
        let mesh = self.generator.floor_mesh(spec);
        self.store(key, ElementSpec::Floor(spec.clone()), mesh)
    }

    pub fn get_or_build(&mut self, spec: &ElementSpec) -> Option<Arc<Mesh>> {
        match spec {
            ElementSpec::Wall(wall) => self.get_or_build_wall(wall),
            ElementSpec::Floor(floor) => self.get_or_build_floor(floor),
        }
    }

    /// The cached result for `key`, if the stored spec passes `same_spec`
    fn cached(
        &mut self,
        key: u64,
        same_spec: impl Fn(&ElementSpec) -> bool,
    ) -> Option<Option<Arc<Mesh>>> {
        match self.entries.get(&key) {
            Some(entry) if same_spec(&entry.spec) => {
                self.hits += 1;
                tracing::trace!(key, "Mesh cache hit");
                Some(entry.mesh.clone())
            }
            Some(_) => {
                tracing::debug!(key, "Mesh cache key collision, rebuilding");
                None
            }
            None => None,
        }
    }

    fn store(&mut self, key: u64, spec: ElementSpec, mesh: Option<Mesh>) -> Option<Arc<Mesh>> {
        self.misses += 1;
        tracing::debug!(key, "Mesh cache miss, rebuilt");
        let mesh = mesh.map(Arc::new);
        self.entries.insert(
            key,
            CacheEntry {
                spec,
                mesh: mesh.clone(),
            },
        );
        mesh
    }

    /// Drop every entry whose key is not in `live_keys`
    ///
    /// Call after an edit with the keys of the specs still in the scene so
    /// meshes of superseded specs are released.
    pub fn retain_keys(&mut self, live_keys: &[u64]) {
        let live: FxHashSet<u64> = live_keys.iter().copied().collect();
        self.entries.retain(|key, _| live.contains(key));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses) since creation or the last `clear`
    #[inline]
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
