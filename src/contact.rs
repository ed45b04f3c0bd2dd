//! Contact-point classification.
//!
//! The physics engine reports collisions as raw contact points. This module
//! turns a batch of points plus the actor's collider bounds into four
//! directional flags, robust to the noise rounded collider corners produce.
//!
//! Classification uses the **directional-distance** strategy: each point is
//! measured by how far it sits past each collider edge, and edges are tested
//! in the fixed priority order bottom, left/right, top with the first
//! satisfied edge claiming the point. A point therefore contributes exactly
//! one flag, and corner points resolve to the load-bearing edge (standing on
//! a ledge corner counts as ground, not wall).

use bevy::prelude::*;

use crate::state::Facing;

/// Maximum simultaneous contact points processed per event batch.
///
/// Points past this capacity are dropped with a diagnostic warning.
pub const MAX_CONTACT_POINTS: usize = 10;

/// Fraction of the edge threshold a point must clear to claim an edge.
/// Filters out grazing contacts that sit almost exactly on the bounds.
const EDGE_MARGIN_FACTOR: f32 = 0.8;

/// Which collider edges currently have classified contacts.
///
/// `front` and `back` are relative to facing, not world direction: a contact
/// on the world-left edge is `front` while facing left and `back` while
/// facing right.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContactState {
    pub top: bool,
    pub bottom: bool,
    pub front: bool,
    pub back: bool,
}

impl ContactState {
    /// Whether any edge has contact.
    pub fn any(&self) -> bool {
        self.top || self.bottom || self.front || self.back
    }
}

/// Classify a batch of contact points against the collider bounds.
///
/// Pure function of its inputs. Returns the OR over all points of each
/// per-point classification; an empty batch yields all-false.
///
/// # Example
///
/// ```rust
/// use bevy::math::{Rect, Vec2};
/// use contact_character_controller::contact::classify_contacts;
/// use contact_character_controller::state::Facing;
///
/// let bounds = Rect::from_center_half_size(Vec2::ZERO, Vec2::new(1.0, 2.0));
/// let below = [Vec2::new(0.0, -2.2)];
///
/// let state = classify_contacts(&below, bounds, Facing::Right, 0.1);
/// assert!(state.bottom);
/// assert!(!state.front && !state.back && !state.top);
/// ```
pub fn classify_contacts(
    points: &[Vec2],
    bounds: Rect,
    facing: Facing,
    edge_threshold: f32,
) -> ContactState {
    let mut state = ContactState::default();
    let margin = edge_threshold * EDGE_MARGIN_FACTOR;

    for point in points {
        // Signed outward distance past each edge; positive means outside.
        let past_bottom = bounds.min.y - point.y;
        let past_left = bounds.min.x - point.x;
        let past_right = point.x - bounds.max.x;
        let past_top = point.y - bounds.max.y;

        // Priority chain: bottom wins over the sides, the sides win over top.
        if past_bottom > margin {
            state.bottom = true;
        } else if past_left > margin {
            match facing {
                Facing::Left => state.front = true,
                Facing::Right => state.back = true,
            }
        } else if past_right > margin {
            match facing {
                Facing::Right => state.front = true,
                Facing::Left => state.back = true,
            }
        } else if past_top > margin {
            state.top = true;
        }
    }

    state
}

/// Sticky contact state plus the bounded scratch buffer it is computed from.
///
/// The physics adapter feeds each contact event batch through
/// [`begin_update`](ContactTracker::begin_update) /
/// [`push_point`](ContactTracker::push_point) /
/// [`commit`](ContactTracker::commit); the resulting state persists unchanged
/// until the next batch. An exit event with no surviving contacts maps to
/// [`clear_contacts`](ContactTracker::clear_contacts).
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct ContactTracker {
    state: ContactState,
    points: [Vec2; MAX_CONTACT_POINTS],
    len: usize,
    dropped: usize,
}

impl Default for ContactTracker {
    fn default() -> Self {
        Self {
            state: ContactState::default(),
            points: [Vec2::ZERO; MAX_CONTACT_POINTS],
            len: 0,
            dropped: 0,
        }
    }
}

impl ContactTracker {
    /// The last committed classification.
    #[inline]
    pub fn state(&self) -> ContactState {
        self.state
    }

    /// Start collecting a new contact batch, discarding the previous buffer.
    pub fn begin_update(&mut self) {
        self.len = 0;
        self.dropped = 0;
    }

    /// Add one contact point to the current batch.
    ///
    /// Points past [`MAX_CONTACT_POINTS`] are counted and dropped; the
    /// overflow is reported once at [`commit`](ContactTracker::commit).
    pub fn push_point(&mut self, point: Vec2) {
        if self.len < MAX_CONTACT_POINTS {
            self.points[self.len] = point;
            self.len += 1;
        } else {
            self.dropped += 1;
        }
    }

    /// Recompute the contact state from the collected batch.
    pub fn commit(&mut self, bounds: Rect, facing: Facing, edge_threshold: f32) {
        if self.dropped > 0 {
            warn!(
                "contact buffer overflow: dropped {} of {} points",
                self.dropped,
                self.len + self.dropped
            );
        }
        self.state = classify_contacts(&self.points[..self.len], bounds, facing, edge_threshold);
    }

    /// All contacts ended; reset every flag.
    pub fn clear_contacts(&mut self) {
        self.len = 0;
        self.dropped = 0;
        self.state = ContactState::default();
    }
}
