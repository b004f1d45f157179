//! Game-specific actors and components

use lockstep_engine::prelude::*;

use crate::config::GameConfig;
use crate::input::ControlScheme;

/// Axis-aligned collision extent attached to an actor
pub struct HitBox {
    half_extents: Vec2,
}

impl HitBox {
    /// Create a hit box from half extents
    pub fn new(half_width: f32, half_height: f32) -> Self {
        Self {
            half_extents: Vec2::new(half_width, half_height),
        }
    }
}

impl ActorComponent for HitBox {
    fn bounds(&self, transform: &Transform) -> Bounds {
        Bounds::centered(
            transform.position,
            Vec3::new(self.half_extents.x * 2.0, self.half_extents.y * 2.0, 1.0),
        )
    }
}

/// The player: hops on input, falls under gravity, dies at the world edge
pub struct Hopper {
    binder: ActionBinder,
    hop_tag: String,
    velocity_y: f32,
    alive: bool,
    gravity: f32,
    hop_impulse: f32,
    world_half_height: f32,
}

impl Hopper {
    /// Create a hopper tuned by `config`
    pub fn new(config: &GameConfig) -> Self {
        Self {
            binder: ActionBinder::new(crate::input::CONTROLS_SOURCE),
            hop_tag: "Hop".into(),
            velocity_y: 0.0,
            alive: true,
            gravity: config.gravity,
            hop_impulse: config.hop_impulse,
            world_half_height: config.world_half_height,
        }
    }

    /// Whether the hopper is still flying
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Kill the hopper; it keeps falling but stops responding to input
    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Put the hopper back at the start of a round
    pub fn revive(&mut self) {
        self.alive = true;
        self.velocity_y = 0.0;
    }
}

impl ActorBehavior for Hopper {
    fn begin_play(&mut self, cx: &mut ActorScope<'_>) {
        if let Some(scheme) = cx.context::<ControlScheme>() {
            self.hop_tag = scheme.hop_action.clone();
        }
    }

    fn update(&mut self, cx: &mut ActorScope<'_>, dt: f32) {
        if self.alive && self.binder.is_action_just_pressed(cx.input(), &self.hop_tag) {
            self.velocity_y = self.hop_impulse;
        }

        self.velocity_y += self.gravity * dt;
        cx.transform_mut().position.y += self.velocity_y * dt;

        // Nose up while rising, down while falling.
        let tilt = (self.velocity_y * 0.002).clamp(-0.8, 0.8);
        cx.transform_mut().rotation.z = tilt;

        if self.alive && cx.transform().position.y.abs() > self.world_half_height {
            log::debug!("hopper left the world at y = {}", cx.transform().position.y);
            self.alive = false;
        }
    }
}

/// One scrolling obstacle; pillars spawn in pairs around a gap
pub struct Pillar {
    /// Whether the hopper has already passed this pillar
    pub passed: bool,
    /// Only one pillar of each pair carries the score
    pub scoring: bool,
    scroll_speed: f32,
    despawn_x: f32,
}

impl Pillar {
    /// Create a pillar scrolling left at `scroll_speed`, despawning once
    /// it is fully past `despawn_x`
    pub fn new(scroll_speed: f32, despawn_x: f32, scoring: bool) -> Self {
        Self {
            passed: false,
            scoring,
            scroll_speed,
            despawn_x,
        }
    }
}

impl ActorBehavior for Pillar {
    fn update(&mut self, cx: &mut ActorScope<'_>, dt: f32) {
        cx.transform_mut().position.x -= self.scroll_speed * dt;
        if cx.transform().position.x < self.despawn_x {
            cx.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hitbox_bounds_follow_the_owner_transform() {
        let hitbox = HitBox::new(30.0, 20.0);
        let transform = Transform::from_xy(100.0, -50.0);
        let bounds = hitbox.bounds(&transform);
        assert_eq!(bounds.min.x, 70.0);
        assert_eq!(bounds.max.x, 130.0);
        assert_eq!(bounds.min.y, -70.0);
        assert_eq!(bounds.max.y, -30.0);
    }

    #[test]
    fn dead_hopper_keeps_falling_but_ignores_hops() {
        let config = GameConfig::default();
        let mut hopper = Hopper::new(&config);
        hopper.kill();
        assert!(!hopper.is_alive());
        hopper.revive();
        assert!(hopper.is_alive());
        assert_eq!(hopper.velocity_y, 0.0);
    }
}
