//! Shared tooltip root and scoped tooltip guards.
//!
//! Every chart shows its tooltips on one [`TooltipLayer`]. Showing a tooltip
//! returns a [`Tooltip`] guard; the tooltip lives exactly as long as the guard.
//! Pointer-leave drops the guard, and so does tearing down the [`HoverTracker`]
//! that holds it, so nothing accumulates across repeated mounts.

use crate::viz::scene::{Placement, Point, Scene, TooltipContent};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A tooltip currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTooltip {
    pub id: u64,
    /// Chart that showed it.
    pub owner: String,
    pub lines: Vec<String>,
    /// Pointer position or fixed anchor, in the owner's surface coordinates.
    pub position: Point,
    /// Follows the pointer (boxed) rather than sitting at a fixed anchor (inline).
    pub floating: bool,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    active: Vec<ActiveTooltip>,
}

/// The single root all tooltips attach to. Cloning shares the root.
#[derive(Debug, Clone, Default)]
pub struct TooltipLayer {
    inner: Rc<RefCell<Registry>>,
}

impl TooltipLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a tooltip; it is removed when the returned guard drops.
    pub fn show(&self, owner: &str, content: &TooltipContent, pointer: Point) -> Tooltip {
        let (position, floating) = match content.placement {
            Placement::Pointer => (pointer, true),
            Placement::At(p) => (p, false),
        };
        let mut reg = self.inner.borrow_mut();
        reg.next_id += 1;
        let id = reg.next_id;
        reg.active.push(ActiveTooltip {
            id,
            owner: owner.to_string(),
            lines: content.lines.clone(),
            position,
            floating,
        });
        Tooltip {
            id,
            floating,
            root: Rc::downgrade(&self.inner),
        }
    }

    pub fn active(&self) -> Vec<ActiveTooltip> {
        self.inner.borrow().active.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Owned handle to one attached tooltip.
#[derive(Debug)]
pub struct Tooltip {
    id: u64,
    floating: bool,
    root: Weak<RefCell<Registry>>,
}

impl Tooltip {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Follow the pointer. Anchored tooltips stay put.
    pub fn move_to(&self, pointer: Point) {
        if !self.floating {
            return;
        }
        if let Some(root) = self.root.upgrade()
            && let Some(t) = root.borrow_mut().active.iter_mut().find(|t| t.id == self.id)
        {
            t.position = pointer;
        }
    }
}

impl Drop for Tooltip {
    fn drop(&mut self) {
        if let Some(root) = self.root.upgrade() {
            root.borrow_mut().active.retain(|t| t.id != self.id);
        }
    }
}

/// Pointer-enter/leave bookkeeping for one chart surface.
#[derive(Debug, Default)]
pub struct HoverTracker {
    hovered: Option<usize>,
    guard: Option<Tooltip>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Re-evaluate the hover state for a pointer at scene coordinates (`None` = outside the surface).
    pub fn update(
        &mut self,
        scene: &Scene,
        elapsed_ms: f64,
        pointer: Option<Point>,
        layer: &TooltipLayer,
        owner: &str,
    ) -> Option<usize> {
        let hit = pointer.and_then(|p| scene.hit_test(p, elapsed_ms));
        if hit != self.hovered {
            // leave, then enter
            self.guard = None;
            self.hovered = hit;
            if let (Some(i), Some(p)) = (hit, pointer) {
                self.guard = scene.tooltip(i).map(|content| layer.show(owner, content, p));
            }
        } else if let (Some(guard), Some(p)) = (&self.guard, pointer) {
            guard.move_to(p);
        }
        self.hovered
    }

    /// Forget the hovered primitive, e.g. because the scene was rebuilt.
    pub fn clear(&mut self) {
        self.hovered = None;
        self.guard = None;
    }
}
