use crate::entities::{Body, Container};
use crate::geometry::primitives::{Point, Vector};
use crate::util::PhysicsConfig;

/// Copy of the dynamic state of a body, resolved outside the arena and written back afterwards.
#[derive(Clone, Copy, Debug)]
pub(super) struct Particle {
    pub pos: Point,
    pub vel: Vector,
    pub radius: f64,
    pub anchored: bool,
}

impl Particle {
    pub fn of(body: &Body) -> Self {
        Particle {
            pos: body.position,
            vel: body.velocity,
            radius: body.radius(),
            anchored: body.is_anchored(),
        }
    }

    pub fn write_to(&self, body: &mut Body) {
        body.position = self.pos;
        body.velocity = self.vel;
    }
}

/// Keeps a free body inside the container, bouncing it off the walls it crossed.
pub(super) fn confine_to_container(p: &mut Particle, container: &Container, cfg: &PhysicsConfig) {
    let r = p.radius;
    match *container {
        Container::Rectangle { width, height } => confine_to_walls(p, width, Some(height), cfg),
        Container::OpenTrough { width, .. } => confine_to_walls(p, width, None, cfg),
        Container::Circle { diameter } => {
            let limit = f64::max(diameter / 2.0 - r, 0.0);
            confine_to_disk(p, container.center(), limit, cfg);
        }
    }
}

fn confine_to_walls(p: &mut Particle, width: f64, ceiling: Option<f64>, cfg: &PhysicsConfig) {
    let r = p.radius;
    let (e, mu) = (cfg.restitution, cfg.friction);
    if p.pos.0 - r < 0.0 {
        p.pos.0 = r;
        p.vel = Vector(-p.vel.0 * e, p.vel.1 * mu);
    }
    if p.pos.0 + r > width {
        p.pos.0 = width - r;
        p.vel = Vector(-p.vel.0 * e, p.vel.1 * mu);
    }
    if p.pos.1 - r < 0.0 {
        p.pos.1 = r;
        p.vel = Vector(p.vel.0 * mu, -p.vel.1 * e);
    }
    if let Some(height) = ceiling {
        if p.pos.1 + r > height {
            p.pos.1 = height - r;
            p.vel = Vector(p.vel.0 * mu, -p.vel.1 * e);
        }
    }
}

/// Clamps the centre of `p` within `limit` of `center`, reflecting the outward velocity component.
pub(super) fn confine_to_disk(p: &mut Particle, center: Point, limit: f64, cfg: &PhysicsConfig) {
    let offset = p.pos - center;
    let dist = offset.norm();
    if dist <= limit || dist == 0.0 {
        return;
    }
    let n = offset * (1.0 / dist);
    p.pos = center.translate(n * limit);
    let vn = p.vel.dot(&n);
    if vn > 0.0 {
        p.vel = p.vel - n * ((1.0 + cfg.restitution) * vn);
    }
}

/// Pushes two overlapping bodies apart along the line joining their centres and exchanges
/// a damped inelastic impulse if they are approaching each other.
/// An anchored particle is never moved; two anchored particles are left alone.
pub(super) fn separate(a: &mut Particle, b: &mut Particle, cfg: &PhysicsConfig) {
    if a.anchored && b.anchored {
        return;
    }
    let offset = b.pos - a.pos;
    let dist = offset.norm();
    let min_dist = a.radius + b.radius;
    if dist >= min_dist {
        return;
    }

    // coincident centres get a fixed normal
    let n = match dist > 1e-9 {
        true => offset * (1.0 / dist),
        false => Vector(1.0, 0.0),
    };
    let overlap = min_dist - dist;

    let (ma, mb) = (cfg.mass(a.radius), cfg.mass(b.radius));
    let (inv_a, inv_b) = (
        if a.anchored { 0.0 } else { 1.0 / ma },
        if b.anchored { 0.0 } else { 1.0 / mb },
    );

    let (share_a, share_b) = match (a.anchored, b.anchored) {
        (true, _) => (0.0, 1.0),
        (_, true) => (1.0, 0.0),
        _ => (mb / (ma + mb), ma / (ma + mb)),
    };
    a.pos = a.pos.translate(n * (-overlap * share_a));
    b.pos = b.pos.translate(n * (overlap * share_b));

    let approach = (b.vel - a.vel).dot(&n);
    if approach < 0.0 {
        let j = -(1.0 + cfg.restitution) * approach / (inv_a + inv_b) * cfg.collision_damping;
        a.vel = a.vel - n * (j * inv_a);
        b.vel = b.vel + n * (j * inv_b);
    }
}
