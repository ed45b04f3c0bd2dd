//! Edge sensor overlap counting.
//!
//! Dedicated sensor volumes hug the character's bottom and side edges and
//! report binary overlap enter/exit signals. Contact classification alone is
//! not trusted for grounded/on-wall decisions: a glancing contact can set a
//! directional flag for a frame, so each decision also requires the matching
//! sensor volume to report an overlap.

use bevy::prelude::*;

use crate::contact::ContactState;

/// Logical identity of a sensor volume.
///
/// Several physical volumes may feed the same logical sensor; the original
/// rig wires a row of small ground probes into one grounded signal.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorRole {
    Ground,
    FrontWall,
    BackWall,
}

/// A non-negative overlap reference counter.
///
/// Incremented on overlap enter, decremented on exit. Enter/exit events must
/// balance; an exit on a zero counter means an enter was lost somewhere, so
/// the counter clamps at zero and logs the anomaly rather than going
/// negative.
#[derive(Reflect, Debug, Clone, Copy, Default)]
pub struct OverlapCounter {
    count: u32,
}

impl OverlapCounter {
    /// Record an overlap beginning.
    pub fn on_enter(&mut self) {
        self.count += 1;
    }

    /// Record an overlap ending.
    pub fn on_exit(&mut self) {
        if self.count == 0 {
            warn!("sensor overlap counter underflow: exit without matching enter");
            return;
        }
        self.count -= 1;
    }

    /// Whether anything currently overlaps this sensor.
    #[inline]
    pub fn active(&self) -> bool {
        self.count > 0
    }

    /// Current overlap count.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }
}

/// The character's set of edge sensors: ground, front wall, back wall.
///
/// Owned by the sensing subsystem; the movement controller only reads the
/// derived booleans, recomputed on demand and never cached.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct EdgeSensors {
    pub ground: OverlapCounter,
    pub front_wall: OverlapCounter,
    pub back_wall: OverlapCounter,
}

impl EdgeSensors {
    /// The counter behind a logical sensor role.
    pub fn counter_mut(&mut self, role: SensorRole) -> &mut OverlapCounter {
        match role {
            SensorRole::Ground => &mut self.ground,
            SensorRole::FrontWall => &mut self.front_wall,
            SensorRole::BackWall => &mut self.back_wall,
        }
    }

    /// Grounded: bottom contact confirmed by the ground sensor.
    #[inline]
    pub fn grounded(&self, contacts: ContactState) -> bool {
        contacts.bottom && self.ground.active()
    }

    /// On-wall: front contact confirmed by the front wall sensor.
    #[inline]
    pub fn on_wall(&self, contacts: ContactState) -> bool {
        contacts.front && self.front_wall.active()
    }
}
