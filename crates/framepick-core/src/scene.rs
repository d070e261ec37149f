//! Host scene-graph interface.

use glam::Vec3;

/// Scene-graph access the picking subsystem needs from its host.
///
/// Implementations must enumerate every pickable renderable reachable from
/// the designated root containers in a stable, deterministic order
/// (depth-first through each root, roots in root-list order), and stash the
/// color returned by the callback on the object in the attribute slot the
/// pick shader reads.
///
/// The attribute write is transient and pick-scoped: it only has meaning
/// for the encoded-color render that follows, and the subsystem assumes
/// exclusive write access to that slot while a pick is in flight.
pub trait PickScene {
    /// Opaque handle to a renderable owned by the host. The picking
    /// subsystem never owns or mutates the object behind it.
    type Handle: Clone;

    /// Visits every pickable object in traversal order, writing the
    /// encoded color produced by `assign` onto the object.
    fn for_each_pickable(&mut self, assign: &mut dyn FnMut(Self::Handle) -> Vec3);
}
