//! Pixel-exact collision detection
//!
//! Broad phase intersects the integer bounding boxes of the two collision
//! masks; the narrow phase walks only the overlap and stops at the first
//! pixel both masks cover.

use super::actor::Actor;
use super::sprite::AlphaMask;

/// Integer screen rectangle (half-open)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Box of `mask` placed with its top-left at (x, y), snapped down to pixels
    pub fn of_mask(x: f32, y: f32, mask: &AlphaMask) -> Self {
        Self::new(
            x.floor() as i32,
            y.floor() as i32,
            mask.width() as i32,
            mask.height() as i32,
        )
    }

    pub fn area(&self) -> i64 {
        self.w.max(0) as i64 * self.h.max(0) as i64
    }

    /// Overlap of two rectangles; None when the overlap has no area
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = (self.x + self.w).min(other.x + other.w);
        let y1 = (self.y + self.h).min(other.y + other.h);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
    }
}

/// Do two placed masks share an opaque pixel
///
/// Zero-area overlaps return false without touching either mask.
pub fn masks_overlap(a: &AlphaMask, a_rect: Rect, b: &AlphaMask, b_rect: Rect) -> bool {
    let Some(overlap) = a_rect.intersect(&b_rect) else {
        return false;
    };

    let (ax, ay) = (overlap.x - a_rect.x, overlap.y - a_rect.y);
    let (bx, by) = (overlap.x - b_rect.x, overlap.y - b_rect.y);
    for y in 0..overlap.h {
        for x in 0..overlap.w {
            if a.alpha_at(x + ax, y + ay) & b.alpha_at(x + bx, y + by) != 0 {
                return true;
            }
        }
    }
    false
}

/// Broad-phase box of an actor's current collision mask
pub fn collision_rect(actor: &Actor) -> Rect {
    let origin = actor.collision_origin();
    Rect::of_mask(origin.x, origin.y, actor.collision_mask())
}

/// Pixel-exact test between two actors
///
/// Brings both rotated masks up to date first, so a stale mask is never
/// compared.
pub fn collides(a: &mut Actor, b: &mut Actor) -> bool {
    // Too far apart for any rotation to touch
    if !reach_overlaps(a, b) {
        return false;
    }
    a.refresh_mask();
    b.refresh_mask();
    masks_overlap(
        a.collision_mask(),
        collision_rect(a),
        b.collision_mask(),
        collision_rect(b),
    )
}

/// Circles around each sprite center that contain every rotation of it
fn reach_overlaps(a: &Actor, b: &Actor) -> bool {
    let reach = (a.size().length() + b.size().length()) / 2.0 + 2.0;
    a.center().distance_squared(b.center()) <= reach * reach
}
