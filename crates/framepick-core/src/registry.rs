//! Id-to-object registry, rebuilt for every pick cycle.

use glam::Vec3;

use crate::color::id_to_color;
use crate::scene::PickScene;

/// Lookup table from pick ids to the host's object handles.
///
/// A registry is valid for exactly one pick cycle: it is rebuilt — never
/// incrementally updated — before each encoded-color render, and a decoded
/// id is only meaningful against the build that produced that render.
/// Resolving an id from a stale build against a fresh render is a logic
/// error in the host; the registry itself just answers `None` for ids it
/// does not hold.
#[derive(Debug)]
pub struct PickRegistry<H> {
    entries: Vec<H>,
}

impl<H> Default for PickRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> PickRegistry<H> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Clears the table for reuse.
    ///
    /// Runs at the start of every rebuild so entries from a longer
    /// previous traversal cannot leak into a shorter one.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Assigns the next id to `handle` and returns the color it must be
    /// drawn with.
    ///
    /// Ids count up from 1; 0 stays reserved for the background. Past the
    /// 24-bit limit the returned color is black (see
    /// [`crate::color::id_to_color`]) and the object becomes unpickable.
    #[allow(clippy::cast_possible_truncation)]
    pub fn assign_next(&mut self, handle: H) -> Vec3 {
        self.entries.push(handle);
        id_to_color(self.entries.len() as u32)
    }

    /// Resolves a decoded id. Background (0), out-of-range, and stale ids
    /// all resolve to `None`.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&H> {
        if id == 0 {
            return None;
        }
        self.entries.get(id as usize - 1)
    }

    /// Number of registered objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H: Clone> PickRegistry<H> {
    /// Rebuilds the table over every pickable the scene reaches in its
    /// deterministic traversal order.
    ///
    /// As a side effect every visited object carries its freshly encoded
    /// color attribute afterwards, ready for the render that follows. Must
    /// run to completion before that render is triggered.
    pub fn rebuild<S: PickScene<Handle = H>>(&mut self, scene: &mut S) {
        self.clear();
        scene.for_each_pickable(&mut |handle| self.assign_next(handle));
    }
}
