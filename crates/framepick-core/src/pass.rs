//! Deferred picking through a dedicated render pass.
//!
//! [`ColorPickPass`] integrates with a host render loop that invokes a
//! pre-render and a post-render hook around each execution of the pass.
//! A pick request arms the pass; on its next execution the host draws
//! every pickable with a freshly assigned encoded color, and the
//! post-render hook reads the requested texel back and resolves the
//! request through its callback. While idle the pass contributes nothing
//! to the frame.

use glam::{Vec2, Vec3};

use crate::registry::PickRegistry;
use crate::resolve::resolve_texel;
use crate::target::ColorTarget;
use crate::viewport::Viewport;

/// Completion continuation of a deferred pick request.
pub type PickCallback<H> = Box<dyn FnOnce(Option<H>)>;

enum PassState<H> {
    Idle,
    Armed {
        cursor: Vec2,
        on_resolved: PickCallback<H>,
    },
}

/// A render pass that draws the scene in encoded colors for one frame.
///
/// Two states: **idle** (pass disabled, no work) and **armed** (one pick
/// outstanding). There is no cancellation: once armed, the pass resolves —
/// possibly to no object — on its next execution, and never resolves if
/// the host stops running it.
pub struct ColorPickPass<H> {
    state: PassState<H>,
    /// Pass-local id -> object table, repopulated on every execution.
    table: PickRegistry<H>,
}

impl<H: Clone> ColorPickPass<H> {
    /// Creates an idle pass.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: PassState::Idle,
            table: PickRegistry::new(),
        }
    }

    /// Arms the pass to pick at canvas coordinates `(x, y)` on its next
    /// execution.
    ///
    /// Nothing renders synchronously. A second request issued before the
    /// pass runs overwrites the pending coordinates and completion target
    /// (last-write-wins, no queueing); the superseded callback is dropped
    /// without being invoked.
    pub fn request_pick<F>(&mut self, x: f32, y: f32, on_resolved: F)
    where
        F: FnOnce(Option<H>) + 'static,
    {
        self.state = PassState::Armed {
            cursor: Vec2::new(x, y),
            on_resolved: Box::new(on_resolved),
        };
    }

    /// Whether a request is waiting for the next pass execution.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        matches!(self.state, PassState::Armed { .. })
    }

    /// Pre-render hook. Returns whether the pass should draw this frame.
    ///
    /// When armed, the pass-local id table and counter are reset to a
    /// clean state before any draw call; when idle, the host must skip
    /// the pass entirely.
    pub fn pre_render(&mut self) -> bool {
        if self.is_armed() {
            self.table.clear();
            true
        } else {
            false
        }
    }

    /// Assigns the next encoded color while the pass is drawing.
    ///
    /// The host calls this once per drawn object, in draw order. The id
    /// counter is local to one pass execution, and the table it fills is
    /// the one [`Self::post_render`] resolves against.
    pub fn assign_color(&mut self, handle: H) -> Vec3 {
        self.table.assign_next(handle)
    }

    /// Post-render hook: resolves the pending request, if any.
    ///
    /// Exactly one resolution happens per armed cycle and none while
    /// idle. A failed readback logs a warning and resolves to no object,
    /// so the callback still fires exactly once.
    pub fn post_render<T: ColorTarget + ?Sized>(
        &mut self,
        target: &mut T,
        viewport: Viewport,
        canvas: (u32, u32),
    ) {
        let PassState::Armed {
            cursor,
            on_resolved,
        } = std::mem::replace(&mut self.state, PassState::Idle)
        else {
            return;
        };

        let hit = match resolve_texel(target, &self.table, cursor, viewport, canvas) {
            Ok(hit) => hit,
            Err(err) => {
                log::warn!("pick readback failed, resolving to no object: {err}");
                None
            }
        };
        on_resolved(hit);
    }
}

impl<H: Clone> Default for ColorPickPass<H> {
    fn default() -> Self {
        Self::new()
    }
}
