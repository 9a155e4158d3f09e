use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Moved by the simulation.
    Dynamic,
    /// Immovable; other bodies collide with it.
    Static,
}

/// Circular rigid body. Pieces are discs, so a radius is the whole shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Rotation in degrees.
    pub rotation: f32,
    /// Angular velocity in degrees per second.
    pub angular_velocity: f32,
    pub radius: f32,
    pub kind: BodyKind,
}

impl Body {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Body {
            position,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            angular_velocity: 0.0,
            radius,
            kind: BodyKind::Static,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.kind == BodyKind::Dynamic
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Make the body static and stop all motion.
    pub fn freeze(&mut self) {
        self.kind = BodyKind::Static;
        self.velocity = Vec2::ZERO;
        self.angular_velocity = 0.0;
    }

    /// Hand the body to the simulation with an initial kick.
    pub fn apply_impulse(&mut self, velocity: Vec2, torque: f32) {
        self.kind = BodyKind::Dynamic;
        self.velocity += velocity;
        self.angular_velocity += torque;
    }

    /// Place the body, keeping its kind.
    pub fn teleport(&mut self, position: Vec2, rotation: f32) {
        self.position = position;
        self.rotation = rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_body_is_static() {
        let body = Body::new(Vec2::new(1.0, 2.0), 0.5);
        assert!(!body.is_dynamic());
        assert_eq!(body.speed(), 0.0);
    }

    #[test]
    fn test_impulse_then_freeze() {
        let mut body = Body::new(Vec2::ZERO, 0.5);
        body.apply_impulse(Vec2::new(3.0, 4.0), 10.0);
        assert!(body.is_dynamic());
        assert!((body.speed() - 5.0).abs() < 1e-6);
        assert_eq!(body.angular_velocity, 10.0);

        body.freeze();
        assert!(!body.is_dynamic());
        assert_eq!(body.velocity, Vec2::ZERO);
        assert_eq!(body.angular_velocity, 0.0);
    }
}
