use std::collections::HashMap;

use bevy_math::Vec2;
use serde::{Deserialize, Serialize};

use crate::graph::Graph;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Rest length of every link.
    pub link_distance: f32,
    /// Fraction of the link error corrected per tick; below 1 links stay elastic.
    pub link_strength: f32,
    /// Pairwise charge; negative repels.
    pub charge_strength: f32,
    pub center_strength: f32,
    /// Per-node radius for the overlap constraint.
    pub collide_radius: f32,
    pub collide_strength: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub velocity_decay: f32,
    /// Energy target while a node is being dragged.
    pub drag_alpha_target: f32,
    /// Radius step of the seed spiral.
    pub initial_radius: f32,
    /// Seed nodes that survive a rebuild at their previous position.
    pub carry_positions: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let alpha_min: f32 = 0.001;
        Self {
            link_distance: 70.0,
            link_strength: 0.6,
            charge_strength: -120.0,
            center_strength: 1.0,
            collide_radius: 12.0,
            collide_strength: 1.0,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            velocity_decay: 0.4,
            drag_alpha_target: 0.3,
            initial_radius: 10.0,
            carry_positions: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutPhase {
    #[default]
    Idle,
    Running,
    Converged,
}

#[derive(Debug, Clone)]
struct SimNode {
    id: String,
    pos: Vec2,
    vel: Vec2,
    pin: Option<Vec2>,
}

#[derive(Debug, Clone, Copy)]
struct SimLink {
    link_idx: usize,
    source: usize,
    target: usize,
    /// Share of the correction applied to the target; the busier end moves less.
    bias: f32,
}

#[derive(Debug, Clone)]
struct Simulation {
    nodes: Vec<SimNode>,
    index: HashMap<String, usize>,
    links: Vec<SimLink>,
    center: Vec2,
    alpha: f32,
    alpha_target: f32,
}

impl Simulation {
    fn new(graph: &Graph, center: Vec2, cfg: &LayoutConfig, previous: Option<&Simulation>) -> Self {
        let golden = std::f32::consts::PI * (3.0 - 5f32.sqrt());
        let nodes: Vec<SimNode> = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let carried = previous
                    .filter(|_| cfg.carry_positions)
                    .and_then(|prev| prev.position(&n.id));
                let pos = carried.unwrap_or_else(|| {
                    let r = cfg.initial_radius * (0.5 + i as f32).sqrt();
                    let a = i as f32 * golden;
                    center + Vec2::new(r * a.cos(), r * a.sin())
                });
                SimNode {
                    id: n.id.clone(),
                    pos,
                    vel: Vec2::ZERO,
                    pin: None,
                }
            })
            .collect();

        let index: HashMap<String, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();

        let mut degree = vec![0u32; nodes.len()];
        let mut links = Vec::with_capacity(graph.links.len());
        for (link_idx, l) in graph.links.iter().enumerate() {
            let (Some(&source), Some(&target)) = (index.get(&l.source), index.get(&l.target))
            else {
                continue;
            };
            degree[source] += 1;
            degree[target] += 1;
            links.push(SimLink {
                link_idx,
                source,
                target,
                bias: 0.0,
            });
        }
        for link in links.iter_mut() {
            let s = degree[link.source] as f32;
            let t = degree[link.target] as f32;
            link.bias = s / (s + t);
        }

        Self {
            nodes,
            index,
            links,
            center,
            alpha: 1.0,
            alpha_target: 0.0,
        }
    }

    fn position(&self, id: &str) -> Option<Vec2> {
        self.index.get(id).map(|&i| self.nodes[i].pos)
    }

    fn step(&mut self, cfg: &LayoutConfig) {
        self.alpha += (self.alpha_target - self.alpha) * cfg.alpha_decay;
        self.apply_links(cfg);
        self.apply_charge(cfg);
        self.apply_center(cfg);
        self.apply_collide(cfg);

        let keep = 1.0 - cfg.velocity_decay.clamp(0.0, 1.0);
        for n in self.nodes.iter_mut() {
            match n.pin {
                Some(p) => {
                    n.pos = p;
                    n.vel = Vec2::ZERO;
                }
                None => {
                    n.vel *= keep;
                    n.pos += n.vel;
                }
            }
        }
    }

    fn apply_links(&mut self, cfg: &LayoutConfig) {
        let k = self.alpha * cfg.link_strength;
        for (i, link) in self.links.iter().enumerate() {
            let s = &self.nodes[link.source];
            let t = &self.nodes[link.target];
            let mut d = (t.pos + t.vel) - (s.pos + s.vel);
            if d == Vec2::ZERO {
                d = Vec2::new(jiggle(i), jiggle(i + 1));
            }
            let len = d.length();
            let f = d * ((len - cfg.link_distance) / len * k);
            self.nodes[link.target].vel -= f * link.bias;
            self.nodes[link.source].vel += f * (1.0 - link.bias);
        }
    }

    fn apply_charge(&mut self, cfg: &LayoutConfig) {
        if cfg.charge_strength == 0.0 {
            return;
        }
        let w = cfg.charge_strength * self.alpha;
        let n = self.nodes.len();
        for i in 0..n {
            let mut dv = Vec2::ZERO;
            for j in 0..n {
                if i == j {
                    continue;
                }
                let mut d = self.nodes[j].pos - self.nodes[i].pos;
                if d == Vec2::ZERO {
                    d = Vec2::new(jiggle(i), jiggle(j));
                }
                let mut l2 = d.length_squared();
                // Clamp the singularity for near-coincident nodes.
                if l2 < 1.0 {
                    l2 = l2.sqrt();
                }
                dv += d * (w / l2);
            }
            self.nodes[i].vel += dv;
        }
    }

    fn apply_center(&mut self, cfg: &LayoutConfig) {
        if self.nodes.is_empty() {
            return;
        }
        let mean = self.nodes.iter().map(|n| n.pos).sum::<Vec2>() / self.nodes.len() as f32;
        let shift = (mean - self.center) * cfg.center_strength;
        for n in self.nodes.iter_mut() {
            n.pos -= shift;
        }
    }

    fn apply_collide(&mut self, cfg: &LayoutConfig) {
        let r = cfg.collide_radius * 2.0;
        if r <= 0.0 {
            return;
        }
        let n = self.nodes.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let a = self.nodes[i].pos + self.nodes[i].vel;
                let b = self.nodes[j].pos + self.nodes[j].vel;
                let mut d = a - b;
                let l2 = d.length_squared();
                if l2 >= r * r {
                    continue;
                }
                if d == Vec2::ZERO {
                    d = Vec2::new(jiggle(i), jiggle(j));
                }
                let l = d.length();
                let push = d * ((r - l) / l * cfg.collide_strength);
                // Equal radii: each side takes half.
                self.nodes[i].vel += push * 0.5;
                self.nodes[j].vel -= push * 0.5;
            }
        }
    }
}

/// Tiny deterministic offset used to separate exactly coincident points.
/// Never zero.
fn jiggle(seed: usize) -> f32 {
    let v = ((seed as f32 * 0.618_034).fract() - 0.5) * 1e-6;
    if v == 0.0 {
        1e-6
    } else {
        v
    }
}

/// Owns the one live simulation and every node position.
///
/// Positions only change inside [`LayoutEngine::tick`] and through the
/// explicit pin/drag entry points.
#[derive(Debug, Default)]
pub struct LayoutEngine {
    cfg: LayoutConfig,
    sim: Option<Simulation>,
    phase: LayoutPhase,
    ticks: u64,
}

impl LayoutEngine {
    pub fn new(cfg: LayoutConfig) -> Self {
        Self {
            cfg,
            sim: None,
            phase: LayoutPhase::Idle,
            ticks: 0,
        }
    }

    pub fn phase(&self) -> LayoutPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == LayoutPhase::Running
    }

    pub fn alpha(&self) -> f32 {
        self.sim.as_ref().map(|s| s.alpha).unwrap_or(0.0)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Stops whatever is running and starts a fresh simulation for `graph`.
    pub fn start(&mut self, graph: &Graph, viewport: Vec2) {
        self.stop();
        let previous = self.sim.take();
        let sim = Simulation::new(graph, viewport * 0.5, &self.cfg, previous.as_ref());
        self.phase = if sim.nodes.is_empty() {
            LayoutPhase::Converged
        } else {
            LayoutPhase::Running
        };
        self.ticks = 0;
        tracing::debug!(
            nodes = sim.nodes.len(),
            links = sim.links.len(),
            phase = ?self.phase,
            "layout started"
        );
        self.sim = Some(sim);
    }

    /// Halts ticking. Positions stay readable until the next `start`.
    pub fn stop(&mut self) {
        if self.phase == LayoutPhase::Running {
            tracing::debug!(ticks = self.ticks, "layout stopped");
        }
        self.phase = LayoutPhase::Idle;
    }

    /// Advances one animation frame. Returns `false` when nothing moved.
    pub fn tick(&mut self) -> bool {
        if self.phase != LayoutPhase::Running {
            return false;
        }
        let Some(sim) = self.sim.as_mut() else {
            self.phase = LayoutPhase::Idle;
            return false;
        };
        sim.step(&self.cfg);
        self.ticks += 1;
        if sim.alpha < self.cfg.alpha_min {
            self.phase = LayoutPhase::Converged;
            tracing::debug!(ticks = self.ticks, "layout converged");
        }
        true
    }

    pub fn position(&self, id: &str) -> Option<Vec2> {
        self.sim.as_ref()?.position(id)
    }

    /// Node positions in graph node order.
    pub fn positions(&self) -> impl Iterator<Item = (&str, Vec2)> + '_ {
        self.sim
            .iter()
            .flat_map(|s| s.nodes.iter().map(|n| (n.id.as_str(), n.pos)))
    }

    /// `(index into Graph::links, source position, target position)`.
    pub fn link_segments(&self) -> Vec<(usize, Vec2, Vec2)> {
        let Some(sim) = self.sim.as_ref() else {
            return Vec::new();
        };
        sim.links
            .iter()
            .map(|l| (l.link_idx, sim.nodes[l.source].pos, sim.nodes[l.target].pos))
            .collect()
    }

    /// Closest node within `radius` of `point`.
    pub fn node_at(&self, point: Vec2, radius: f32) -> Option<&str> {
        let sim = self.sim.as_ref()?;
        let mut best: Option<(f32, &str)> = None;
        for n in sim.nodes.iter() {
            let d = n.pos.distance(point);
            if d <= radius && best.map(|(bd, _)| d < bd).unwrap_or(true) {
                best = Some((d, n.id.as_str()));
            }
        }
        best.map(|(_, id)| id)
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.node(id).map(|n| n.pin.is_some()).unwrap_or(false)
    }

    /// Fixes a node at `pos`; it no longer takes part in force integration.
    pub fn pin(&mut self, id: &str, pos: Vec2) -> bool {
        let Some(n) = self.node_mut(id) else {
            return false;
        };
        n.pin = Some(pos);
        n.pos = pos;
        n.vel = Vec2::ZERO;
        true
    }

    pub fn unpin(&mut self, id: &str) -> bool {
        let Some(n) = self.node_mut(id) else {
            return false;
        };
        n.pin = None;
        true
    }

    /// Pins the node where it is and reheats the simulation so neighbours react.
    pub fn drag_start(&mut self, id: &str) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        self.pin(id, pos);
        let target = self.cfg.drag_alpha_target;
        if let Some(sim) = self.sim.as_mut() {
            sim.alpha_target = target;
            // Let the target take effect even after convergence.
            sim.alpha = sim.alpha.max(self.cfg.alpha_min);
        }
        self.phase = LayoutPhase::Running;
        true
    }

    pub fn drag_to(&mut self, id: &str, pos: Vec2) -> bool {
        self.pin(id, pos)
    }

    /// Releases the node and lets the energy decay back to baseline.
    pub fn drag_end(&mut self, id: &str) -> bool {
        if let Some(sim) = self.sim.as_mut() {
            sim.alpha_target = 0.0;
        }
        self.unpin(id)
    }

    fn node(&self, id: &str) -> Option<&SimNode> {
        let sim = self.sim.as_ref()?;
        sim.index.get(id).map(|&i| &sim.nodes[i])
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut SimNode> {
        let sim = self.sim.as_mut()?;
        let i = *sim.index.get(id)?;
        sim.nodes.get_mut(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Link, Node};

    fn node(id: &str) -> Node {
        Node {
            id: id.to_string(),
            title: id.to_string(),
            authors: String::new(),
            url: String::new(),
            cluster_id: String::new(),
            institutions: String::new(),
            produced_period: String::new(),
            analyzed_periods: String::new(),
            confidence: String::new(),
            status: String::new(),
            provenance: String::new(),
        }
    }

    fn link(a: &str, b: &str) -> Link {
        Link {
            source: a.to_string(),
            target: b.to_string(),
            weight: 1.0,
            kind: String::new(),
        }
    }

    fn graph(ids: &[&str], links: &[(&str, &str)]) -> Graph {
        Graph {
            nodes: ids.iter().map(|id| node(id)).collect(),
            links: links.iter().map(|(a, b)| link(a, b)).collect(),
        }
    }

    fn run(engine: &mut LayoutEngine, max_ticks: usize) {
        for _ in 0..max_ticks {
            if !engine.tick() {
                break;
            }
        }
    }

    const VIEW: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn linked_pair_settles_near_rest_length() {
        let mut engine = LayoutEngine::new(LayoutConfig::default());
        engine.start(&graph(&["a", "b"], &[("a", "b")]), VIEW);
        run(&mut engine, 1000);

        let a = engine.position("a").expect("a");
        let b = engine.position("b").expect("b");
        let d = a.distance(b);
        assert!((55.0..95.0).contains(&d), "distance {d}");
    }

    #[test]
    fn converges_and_stays_centred() {
        let mut engine = LayoutEngine::new(LayoutConfig::default());
        engine.start(
            &graph(&["a", "b", "c", "d"], &[("a", "b"), ("b", "c"), ("c", "a")]),
            VIEW,
        );
        assert_eq!(engine.phase(), LayoutPhase::Running);
        run(&mut engine, 1000);
        assert_eq!(engine.phase(), LayoutPhase::Converged);
        assert!(engine.ticks() <= 400);
        assert!(!engine.tick());

        let n = engine.positions().count() as f32;
        let mean = engine.positions().map(|(_, p)| p).sum::<Vec2>() / n;
        assert!(mean.distance(VIEW * 0.5) < 1.0);
    }

    #[test]
    fn collision_keeps_nodes_apart() {
        let cfg = LayoutConfig {
            charge_strength: 0.0,
            ..LayoutConfig::default()
        };
        let mut engine = LayoutEngine::new(cfg);
        engine.start(&graph(&["a", "b", "c"], &[]), VIEW);
        run(&mut engine, 1000);

        let pts: Vec<Vec2> = engine.positions().map(|(_, p)| p).collect();
        for i in 0..pts.len() {
            for j in (i + 1)..pts.len() {
                assert!(pts[i].distance(pts[j]) >= 22.0);
            }
        }
    }

    #[test]
    fn pinned_node_does_not_move() {
        let mut engine = LayoutEngine::new(LayoutConfig::default());
        engine.start(&graph(&["a", "b", "c"], &[("a", "b"), ("a", "c")]), VIEW);
        let pin = Vec2::new(10.0, 20.0);
        assert!(engine.pin("a", pin));
        for _ in 0..50 {
            engine.tick();
            assert_eq!(engine.position("a"), Some(pin));
        }
        assert!(engine.unpin("a"));
        assert!(!engine.is_pinned("a"));
        assert!(!engine.pin("ghost", pin));
    }

    #[test]
    fn drag_reheats_and_release_restores_baseline() {
        let mut engine = LayoutEngine::new(LayoutConfig::default());
        engine.start(&graph(&["a", "b"], &[("a", "b")]), VIEW);
        run(&mut engine, 1000);
        assert_eq!(engine.phase(), LayoutPhase::Converged);

        assert!(engine.drag_start("a"));
        assert!(engine.is_running());
        assert!(engine.is_pinned("a"));
        let target = Vec2::new(100.0, 100.0);
        engine.drag_to("a", target);
        for _ in 0..200 {
            engine.tick();
        }
        assert_eq!(engine.position("a"), Some(target));
        assert!(engine.alpha() > 0.2);

        assert!(engine.drag_end("a"));
        assert!(!engine.is_pinned("a"));
        run(&mut engine, 2000);
        assert_eq!(engine.phase(), LayoutPhase::Converged);
    }

    #[test]
    fn restart_replaces_previous_simulation() {
        let mut engine = LayoutEngine::new(LayoutConfig::default());
        engine.start(&graph(&["a", "b"], &[("a", "b")]), VIEW);
        engine.tick();
        engine.start(&graph(&["c"], &[]), VIEW);

        let ids: Vec<&str> = engine.positions().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["c"]);
        assert_eq!(engine.ticks(), 0);
        assert!(engine.link_segments().is_empty());
    }

    #[test]
    fn stop_halts_ticks_but_keeps_positions() {
        let mut engine = LayoutEngine::new(LayoutConfig::default());
        engine.start(&graph(&["a", "b"], &[("a", "b")]), VIEW);
        engine.tick();
        engine.stop();
        assert_eq!(engine.phase(), LayoutPhase::Idle);
        let before = engine.position("a");
        assert!(!engine.tick());
        assert_eq!(engine.position("a"), before);
    }

    #[test]
    fn carry_positions_seeds_surviving_nodes() {
        let cfg = LayoutConfig {
            carry_positions: true,
            ..LayoutConfig::default()
        };
        let mut engine = LayoutEngine::new(cfg);
        engine.start(&graph(&["a", "b"], &[("a", "b")]), VIEW);
        run(&mut engine, 1000);
        let a = engine.position("a");

        engine.start(&graph(&["x", "a"], &[]), VIEW);
        assert_eq!(engine.position("a"), a);
    }

    #[test]
    fn empty_graph_is_immediately_converged() {
        let mut engine = LayoutEngine::new(LayoutConfig::default());
        engine.start(&Graph::default(), VIEW);
        assert_eq!(engine.phase(), LayoutPhase::Converged);
        assert!(!engine.tick());
    }

    #[test]
    fn hit_test_picks_closest_node() {
        let mut engine = LayoutEngine::new(LayoutConfig::default());
        engine.start(&graph(&["a", "b"], &[]), VIEW);
        engine.pin("a", Vec2::new(0.0, 0.0));
        engine.pin("b", Vec2::new(10.0, 0.0));
        assert_eq!(engine.node_at(Vec2::new(7.0, 0.0), 8.0), Some("b"));
        assert_eq!(engine.node_at(Vec2::new(2.0, 0.0), 8.0), Some("a"));
        assert_eq!(engine.node_at(Vec2::new(50.0, 50.0), 8.0), None);
    }

    #[test]
    fn jiggle_is_never_zero() {
        assert!((0..20_000).all(|seed| jiggle(seed) != 0.0));
    }
}
