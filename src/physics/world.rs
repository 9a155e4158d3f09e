use glam::Vec2;

use super::{Body, BoardLayout, Rect, Segment};
use crate::config::PhysicsConfig;
use crate::pieces::PieceId;

/// Static collision geometry plus the integration parameters.
///
/// The world does not own any bodies: each step borrows the pieces that are
/// currently simulated from the pool.
#[derive(Debug, Clone)]
pub struct World {
    config: PhysicsConfig,
    channels: Vec<Segment>,
    arena_walls: [Segment; 4],
    arena: Rect,
    bouncers: Vec<Vec2>,
    bouncer_radius: f32,
}

/// A contact between a body and something it must not penetrate.
struct Contact {
    normal: Vec2,
    depth: f32,
}

impl World {
    pub fn new(layout: &BoardLayout, config: PhysicsConfig) -> Self {
        World {
            config,
            channels: layout.channel_segments(),
            arena_walls: layout.arena_segments(),
            arena: layout.arena(),
            bouncers: layout.bouncers(),
            bouncer_radius: layout.bouncer_radius(),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn gravity(&self) -> Vec2 {
        Vec2::new(0.0, self.config.gravity * self.config.gravity_scale)
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Returns the pieces that left the arena when walls are not bouncy; the
    /// caller decides what to do with them.
    pub fn step(&self, dt: f32, bodies: &mut [(PieceId, &mut Body)]) -> Vec<PieceId> {
        let mut escaped = Vec::new();
        if dt <= 0.0 || !bodies.iter().any(|(_, body)| body.is_dynamic()) {
            return escaped;
        }

        let substeps = (dt / self.config.max_substep).ceil().max(1.0) as usize;
        let h = dt / substeps as f32;

        for _ in 0..substeps {
            for (id, body) in bodies.iter_mut() {
                if !body.is_dynamic() {
                    continue;
                }
                self.integrate(body, h);
                self.collide_with_geometry(body);
                if !self.config.bouncy_walls && !self.arena.contains(body.position) {
                    body.freeze();
                    if !escaped.contains(id) {
                        escaped.push(*id);
                    }
                }
            }
            self.collide_bodies(bodies);
        }

        escaped
    }

    fn integrate(&self, body: &mut Body, h: f32) {
        body.velocity += self.gravity() * h;
        body.velocity = body.velocity * (1.0 / (1.0 + self.config.linear_damping * h));
        body.angular_velocity /= 1.0 + self.config.angular_damping * h;
        body.position += body.velocity * h;
        body.rotation = (body.rotation + body.angular_velocity * h).rem_euclid(360.0);
    }

    fn collide_with_geometry(&self, body: &mut Body) {
        for segment in &self.channels {
            if let Some(contact) = segment_contact(segment, body) {
                self.resolve_static(body, &contact);
            }
        }
        if self.config.bouncy_walls {
            for segment in &self.arena_walls {
                if let Some(contact) = segment_contact(segment, body) {
                    self.resolve_static(body, &contact);
                }
            }
        }
        for &peg in &self.bouncers {
            if let Some(contact) = circle_overlap(body.position, body.radius, peg, self.bouncer_radius)
            {
                self.resolve_bouncer(body, &contact);
            }
        }
    }

    fn collide_bodies(&self, bodies: &mut [(PieceId, &mut Body)]) {
        for i in 0..bodies.len() {
            let (head, tail) = bodies.split_at_mut(i + 1);
            let a = &mut *head[i].1;
            for (_, b) in tail.iter_mut() {
                let b = &mut **b;
                match (a.is_dynamic(), b.is_dynamic()) {
                    (false, false) => {}
                    (true, false) => {
                        if let Some(contact) = circle_contact(a, b) {
                            self.resolve_static(a, &contact);
                        }
                    }
                    (false, true) => {
                        if let Some(contact) = circle_contact(b, a) {
                            self.resolve_static(b, &contact);
                        }
                    }
                    (true, true) => {
                        if let Some(contact) = circle_contact(a, b) {
                            self.resolve_pair(a, b, &contact);
                        }
                    }
                }
            }
        }
    }

    /// Push `body` out of an immovable obstacle and respond with
    /// restitution and friction.
    fn resolve_static(&self, body: &mut Body, contact: &Contact) {
        body.position += contact.normal * contact.depth;

        let approach = body.velocity.dot(contact.normal);
        if approach >= 0.0 {
            return;
        }
        let normal_impulse = self.normal_impulse(-approach);
        body.velocity += contact.normal * normal_impulse;
        self.apply_friction(&mut body.velocity, contact.normal, normal_impulse);
    }

    /// Like a static contact, but a real impact also gets kicked away from
    /// the peg by `bouncer_force`.
    fn resolve_bouncer(&self, body: &mut Body, contact: &Contact) {
        let impact = -body.velocity.dot(contact.normal);
        self.resolve_static(body, contact);
        if impact > self.config.resting_speed {
            body.velocity += contact.normal * self.config.bouncer_force;
        }
    }

    /// Split the correction between two moving bodies of equal mass.
    fn resolve_pair(&self, a: &mut Body, b: &mut Body, contact: &Contact) {
        let half = contact.normal * (contact.depth * 0.5);
        a.position += half;
        b.position -= half;

        let relative = a.velocity - b.velocity;
        let approach = relative.dot(contact.normal);
        if approach >= 0.0 {
            return;
        }
        let impulse = self.normal_impulse(-approach) * 0.5;
        a.velocity += contact.normal * impulse;
        b.velocity -= contact.normal * impulse;
        self.apply_friction(&mut a.velocity, contact.normal, impulse);
        self.apply_friction(&mut b.velocity, -contact.normal, impulse);
    }

    /// Velocity change along the normal for a given approach speed. Slow
    /// impacts are fully inelastic so resting bodies read as still.
    fn normal_impulse(&self, approach_speed: f32) -> f32 {
        if approach_speed > self.config.resting_speed {
            approach_speed * (1.0 + self.config.restitution)
        } else {
            approach_speed
        }
    }

    fn apply_friction(&self, velocity: &mut Vec2, normal: Vec2, normal_impulse: f32) {
        let tangent = *velocity - normal * velocity.dot(normal);
        let tangent_speed = tangent.length();
        if tangent_speed <= f32::EPSILON {
            return;
        }
        let reduction = (self.config.friction * normal_impulse.abs()).min(tangent_speed);
        *velocity -= tangent.normalize_or_zero() * reduction;
    }
}

fn segment_contact(segment: &Segment, body: &Body) -> Option<Contact> {
    let closest = segment.closest_point(body.position);
    let offset = body.position - closest;
    let distance = offset.length();
    if distance >= body.radius {
        return None;
    }
    let normal = if distance > f32::EPSILON {
        offset * (1.0 / distance)
    } else {
        // Centre exactly on the segment: push against the direction of travel.
        let back = -body.velocity.normalize_or_zero();
        if back == Vec2::ZERO {
            Vec2::new(0.0, -1.0)
        } else {
            back
        }
    };
    Some(Contact {
        normal,
        depth: body.radius - distance,
    })
}

/// Contact pushing `a` away from `b`.
fn circle_contact(a: &Body, b: &Body) -> Option<Contact> {
    circle_overlap(a.position, a.radius, b.position, b.radius)
}

fn circle_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> Option<Contact> {
    let offset = a - b;
    let distance = offset.length();
    let reach = a_radius + b_radius;
    if distance >= reach {
        return None;
    }
    let normal = if distance > f32::EPSILON {
        offset * (1.0 / distance)
    } else {
        Vec2::new(0.0, -1.0)
    };
    Some(Contact {
        normal,
        depth: reach - distance,
    })
}
