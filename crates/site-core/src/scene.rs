//! Procedural neural-scene model: a branching 3D structure with particles
//! flowing outward along it.
//!
//! Purely cosmetic and fully decoupled from rendering; the renderer pulls
//! flat dot and segment lists each frame. Generation is seeded so the scene
//! is deterministic under test.

use fnv::FnvHashMap;
use glam::Vec3;
use rand::prelude::*;

use crate::constants::*;

/// Departure direction of a branch, radians around the x and z axes.
#[derive(Clone, Copy, Debug)]
struct BranchAngle {
    x: f32,
    z: f32,
}

struct Node {
    pos: Vec3,
    /// Sub-branch forking off at this node, if any.
    child: Option<usize>,
}

struct Branch {
    /// Node arena indices, root first. The first node is shared with the
    /// parent branch.
    nodes: Vec<usize>,
}

struct Particle {
    branch: usize,
    /// Segment within the branch: travels from `nodes[seg]` to
    /// `nodes[seg + 1]`.
    seg: usize,
    /// Parametric position along the segment, `[0, 1)`.
    t: f32,
    /// Segments per second.
    speed: f32,
}

/// Dot to draw as a camera-facing sprite.
#[derive(Clone, Copy, Debug)]
pub struct DotInstance {
    pub pos: Vec3,
    pub color: [f32; 3],
    pub scale: f32,
}

/// Branch line segment.
#[derive(Clone, Copy, Debug)]
pub struct SegmentInstance {
    pub a: Vec3,
    pub b: Vec3,
    pub half_width: f32,
    pub color: [f32; 3],
}

pub struct NeuralScene {
    nodes: Vec<Node>,
    branches: Vec<Branch>,
    /// Branches leaving the origin; particles spawn onto these.
    base: Vec<usize>,
    particles: FnvHashMap<u64, Particle>,
    next_particle_id: u64,
    spawn_accum: f32,
    rotation: f32,
    rng: StdRng,
}

impl NeuralScene {
    pub fn new(seed: u64) -> Self {
        let mut scene = Self {
            nodes: Vec::new(),
            branches: Vec::new(),
            base: Vec::new(),
            particles: FnvHashMap::default(),
            next_particle_id: 0,
            spawn_accum: 0.0,
            rotation: 0.0,
            rng: StdRng::seed_from_u64(seed),
        };
        scene.build();
        log::debug!(
            "neural scene built: {} nodes, {} branches",
            scene.nodes.len(),
            scene.branches.len()
        );
        scene
    }

    fn build(&mut self) {
        let origin = self.push_node(Vec3::ZERO);
        for (deg_x, deg_z) in BASE_BRANCH_ANGLES {
            let angle = BranchAngle {
                x: deg_x.to_radians(),
                z: deg_z.to_radians(),
            };
            let branch = self.build_branch(origin, angle, BRANCH_NODE_COUNT, BRANCH_NODE_COUNT);
            self.base.push(branch);
        }
    }

    /// Grow one branch of `count` nodes from `start_node`, recursively
    /// spawning narrower sub-branches while `sub_allow` lasts.
    fn build_branch(
        &mut self,
        start_node: usize,
        base_angle: BranchAngle,
        count: usize,
        mut sub_allow: usize,
    ) -> usize {
        let branch_index = self.branches.len();
        self.branches.push(Branch { nodes: Vec::new() });

        let mut node_ids = vec![start_node];
        let mut current = self.nodes[start_node].pos;

        for i in 0..count.saturating_sub(1) {
            let coeff = i as f32 / count.max(1) as f32 / 2.0 + 1.0;
            let stem = self.jitter_angle(base_angle, coeff);
            let pos = self.next_pos(current, stem);
            let node_id = self.push_node(pos);

            if sub_allow > 0 {
                sub_allow -= 1;
                // Sub-branches favor the trunk: the spawn chance fades as the
                // branch thins out, and each fork is shorter than its parent.
                let spawn = i >= 1
                    && count - i >= 2
                    && self.rng.gen::<f32>() * i as f32 <= count as f32 / 2.0;
                if spawn {
                    let sub_angle = self.jitter_angle(base_angle, coeff);
                    let sub_allow_child = (self.rng.gen::<f32>() * i as f32) as usize;
                    let child = self.build_branch(node_id, sub_angle, count - i, sub_allow_child);
                    self.nodes[node_id].child = Some(child);
                }
            }

            node_ids.push(node_id);
            current = pos;
        }

        self.branches[branch_index].nodes = node_ids;
        branch_index
    }

    fn push_node(&mut self, pos: Vec3) -> usize {
        self.nodes.push(Node { pos, child: None });
        self.nodes.len() - 1
    }

    fn jitter_angle(&mut self, angle: BranchAngle, coeff: f32) -> BranchAngle {
        let spread = SUB_BRANCH_SPREAD * coeff;
        BranchAngle {
            x: angle.x - spread + spread * self.rng.gen::<f32>(),
            z: angle.z - spread + spread * self.rng.gen::<f32>(),
        }
    }

    fn next_pos(&mut self, from: Vec3, stem: BranchAngle) -> Vec3 {
        let ax = stem.x - STEM_JITTER + self.rng.gen::<f32>() * STEM_JITTER;
        let az = stem.z - STEM_JITTER + self.rng.gen::<f32>() * STEM_JITTER;
        Vec3::new(
            from.x + ax.sin() * SEGMENT_STEP,
            from.y + ax.cos() * SEGMENT_STEP,
            from.z + az.sin() * SEGMENT_STEP,
        )
    }

    /// Advance the whole scene: rotation, particle spawning, particle flow.
    pub fn tick(&mut self, dt_sec: f32) {
        self.rotation += SCENE_ROTATION_RATE * dt_sec;
        self.spawn_accum += dt_sec;
        while self.spawn_accum >= SPAWN_INTERVAL_SEC {
            self.spawn_accum -= SPAWN_INTERVAL_SEC;
            self.spawn_particle();
        }
        self.advance_particles(dt_sec);
    }

    fn spawn_particle(&mut self) {
        if self.base.is_empty() {
            return;
        }
        let branch = self.base[self.rng.gen_range(0..self.base.len())];
        let speed = self.rng.gen_range(PARTICLE_SPEED_MIN..=PARTICLE_SPEED_MAX);
        let id = self.next_particle_id;
        self.next_particle_id += 1;
        self.particles.insert(
            id,
            Particle {
                branch,
                seg: 0,
                t: 0.0,
                speed,
            },
        );
    }

    fn advance_particles(&mut self, dt_sec: f32) {
        let branches = &self.branches;
        let nodes = &self.nodes;
        let rng = &mut self.rng;
        let mut finished = Vec::new();

        'particles: for (id, p) in self.particles.iter_mut() {
            p.t += p.speed * dt_sec;
            loop {
                let branch = &branches[p.branch];
                if branch.nodes.len() < 2 {
                    finished.push(*id);
                    continue 'particles;
                }
                if p.t < 1.0 {
                    break;
                }
                p.t -= 1.0;

                let target = branch.nodes[p.seg + 1];
                let at_tip = p.seg + 2 >= branch.nodes.len();
                match nodes[target].child {
                    Some(sub) if at_tip || rng.gen_bool(BRANCH_SWITCH_PROBABILITY) => {
                        p.branch = sub;
                        p.seg = 0;
                    }
                    _ if at_tip => {
                        finished.push(*id);
                        continue 'particles;
                    }
                    _ => p.seg += 1,
                }
            }
        }

        for id in finished {
            self.particles.remove(&id);
        }
    }

    /// Whole-scene rotation angle, applied to both the y and z axes.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Append sprite instances for every structure node and live particle.
    pub fn dots(&self, out: &mut Vec<DotInstance>) {
        for node in &self.nodes {
            out.push(DotInstance {
                pos: node.pos,
                color: NODE_COLOR,
                scale: NODE_SCALE,
            });
        }
        for p in self.particles.values() {
            let branch = &self.branches[p.branch];
            let a = self.nodes[branch.nodes[p.seg]].pos;
            let b = self.nodes[branch.nodes[p.seg + 1]].pos;
            out.push(DotInstance {
                pos: a.lerp(b, p.t),
                color: PARTICLE_COLOR,
                scale: PARTICLE_SCALE,
            });
        }
    }

    /// Append one line segment per consecutive node pair of every branch.
    pub fn segments(&self, out: &mut Vec<SegmentInstance>) {
        for branch in &self.branches {
            for pair in branch.nodes.windows(2) {
                out.push(SegmentInstance {
                    a: self.nodes[pair[0]].pos,
                    b: self.nodes[pair[1]].pos,
                    half_width: LINE_HALF_WIDTH,
                    color: LINE_COLOR,
                });
            }
        }
    }
}
