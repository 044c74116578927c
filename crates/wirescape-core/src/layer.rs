use glam::Vec2;
use log::debug;
use rand::prelude::*;
use smallvec::SmallVec;

use crate::audio::AudioFeatures;
use crate::bird::Bird;
use crate::config::{EngineConfig, LayerConfig};
use crate::constants::{
    CROSSARM_DROP, CROSSARM_HALF_WIDTH_RANGE, DECOR_BIRD_CHANCE, LEAN_ANGLE_RANGE,
    POLE_HEIGHT_RANGE, TRANSFORMER_CHANCE, T_CLAMP_MAX, T_CLAMP_MIN, WIRE_SAG_RANGE,
};
use crate::score::{placements_for, BarCursor, ScoreTrack};
use crate::wire::{Wire, WireCurve};

/// Stable index into an [`Arena`]. Ids are never reused while their entity
/// is alive and are only handed out by `insert`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotId(u32);

pub type PoleId = SlotId;
pub type WireId = SlotId;
pub type BirdId = SlotId;

/// Slot arena with explicit, index-based cross-references.
///
/// Wires hold pole ids and birds hold wire ids instead of owning pointers,
/// so the pole/wire/bird graph has no cycles to collect: cascade destroy
/// walks ids and removes dependents in the same call.
#[derive(Clone, Debug)]
pub struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self { slots: Vec::new(), free: Vec::new(), len: 0 }
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: T) -> SlotId {
        self.len += 1;
        match self.free.pop() {
            Some(index) => {
                self.slots[index as usize] = Some(value);
                SlotId(index)
            }
            None => {
                self.slots.push(Some(value));
                SlotId((self.slots.len() - 1) as u32)
            }
        }
    }

    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slots.get_mut(id.0 as usize)?;
        let value = slot.take()?;
        self.free.push(id.0);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0 as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0 as usize)?.as_mut()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (SlotId(i as u32), v)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|v| (SlotId(i as u32), v)))
    }
}

/// A utility pole. Moves every tick; created by spawn, destroyed by cull,
/// owned exclusively by its layer.
#[derive(Clone, Copy, Debug)]
pub struct Pole {
    pub x: f32,
    pub height: f32,
    /// Crossarm attach height.
    pub top_y: f32,
    pub crossarm_half_width: f32,
    /// Small tilt in radians; positive leans toward +x.
    pub lean_angle: f32,
    pub has_transformer: bool,
}

impl Pole {
    /// Where a channel's wire attaches: channels spread evenly across the
    /// crossarm, which the lean shifts slightly off the pole's base.
    pub fn attach_point(&self, channel: usize, num_channels: usize) -> Vec2 {
        let frac = if num_channels <= 1 {
            0.5
        } else {
            channel as f32 / (num_channels - 1) as f32
        };
        // Small-angle displacement of the crossarm center by the lean.
        let tilt = self.lean_angle * self.top_y;
        Vec2::new(
            self.x + tilt + (frac * 2.0 - 1.0) * self.crossarm_half_width,
            self.top_y,
        )
    }
}

/// One depth plane of the streaming scene: an ordered run of poles, the
/// wire spans between adjacent poles, and the birds perched on them.
///
/// Each layer draws its randomized attributes from its own seeded stream
/// but all layers share the engine's single bar cursor, so two layers stay
/// musically synchronized while differing visually.
pub struct Layer {
    pub depth_scale: f32,
    pub z_offset: f32,
    poles: Arena<Pole>,
    wires: Arena<Wire>,
    birds: Arena<Bird>,
    /// Pole ids in ascending x order; culled from the front, spawned at the
    /// back. All poles move together, so the ordering is invariant.
    ordered: Vec<PoleId>,
    rng: StdRng,
}

impl Layer {
    pub fn new(layer_cfg: &LayerConfig, seed: u64) -> Self {
        Self {
            depth_scale: layer_cfg.depth_scale,
            z_offset: layer_cfg.z_offset,
            poles: Arena::new(),
            wires: Arena::new(),
            birds: Arena::new(),
            ordered: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Build the initial `min_seed_poles` poles and their spans before the
    /// first tick, left to right, so frame 0 is non-empty. Seeding consumes
    /// the bar cursor exactly as ordinary spans do.
    pub fn seed(&mut self, cfg: &EngineConfig, cursor: &mut BarCursor, track: &ScoreTrack) {
        let count = cfg.min_seed_poles;
        let mut prev: Option<PoleId> = None;
        for i in 0..count {
            let x = cfg.spawn_threshold - (count - 1 - i) as f32 * cfg.pole_spacing;
            let id = self.spawn_pole(x);
            if let Some(left) = prev {
                self.spawn_span(left, id, cfg, cursor, track);
            }
            prev = Some(id);
        }
    }

    /// Shift every pole by `dx` (negative = leftward) and carry the
    /// attached wire geometry along rigidly.
    pub fn advance(&mut self, dx: f32) {
        for (_, pole) in self.poles.iter_mut() {
            pole.x += dx;
        }
        for (_, wire) in self.wires.iter_mut() {
            wire.curve.shift_x(dx);
        }
    }

    /// Destroy every pole past the cull threshold, cascading to its wires
    /// and their birds within this call. Runs before spawn so the
    /// live-object ceiling is enforced deterministically.
    pub fn cull(&mut self, cfg: &EngineConfig) -> usize {
        let mut culled = 0;
        while let Some(&front) = self.ordered.first() {
            let past = self
                .poles
                .get(front)
                .map(|p| p.x < cfg.cull_threshold)
                .unwrap_or(false);
            if !past {
                break;
            }
            self.ordered.remove(0);
            self.destroy_pole(front);
            culled += 1;
        }
        if culled > 0 {
            debug!("culled {culled} pole(s), {} live", self.poles.len());
        }
        culled
    }

    /// Spawn one pole plus its wire span and bird placements when the
    /// rightmost pole has drifted a full spacing inside the spawn
    /// threshold. Advances the shared cursor by one span on success.
    pub fn maybe_spawn(
        &mut self,
        cfg: &EngineConfig,
        cursor: &mut BarCursor,
        track: &ScoreTrack,
    ) -> bool {
        if self.poles.len() >= cfg.max_poles {
            return false;
        }
        let last = self.ordered.last().copied();
        let rightmost_x = last.and_then(|id| self.poles.get(id)).map(|p| p.x);
        match (last, rightmost_x) {
            (None, _) => {
                // Empty layer: place a first pole, the next spawn builds a span.
                self.spawn_pole(cfg.spawn_threshold);
                true
            }
            (Some(left), Some(x)) if x <= cfg.spawn_threshold - cfg.pole_spacing => {
                let right = self.spawn_pole(cfg.spawn_threshold);
                self.spawn_span(left, right, cfg, cursor, track);
                true
            }
            _ => false,
        }
    }

    /// Refresh each wire's channel-intensity snapshot for this tick. An
    /// inactive feed forces every intensity to exactly 0, so no residual
    /// wave survives a pause or track change.
    pub fn update_waves(&mut self, audio: &dyn AudioFeatures) {
        let active = audio.is_signal_active();
        for (_, wire) in self.wires.iter_mut() {
            wire.wave_intensity = if active {
                audio.channel_intensity(wire.channel).clamp(0.0, 1.0)
            } else {
                0.0
            };
        }
    }

    /// Recompute every bird's perch position and modulation. Runs after the
    /// wave update so birds ride the wire's current displacement.
    pub fn update_birds(&mut self, now_sec: f64, audio: &dyn AudioFeatures) {
        let wires = &self.wires;
        for (_, bird) in self.birds.iter_mut() {
            // The cascade invariant guarantees a live wire for a live bird.
            if let Some(wire) = wires.get(bird.wire) {
                bird.update_visual(wire, now_sec, audio);
            }
        }
    }

    /// Destroy everything, walking the same cascade as cull.
    pub fn dispose(&mut self) {
        while let Some(front) = self.ordered.pop() {
            self.destroy_pole(front);
        }
    }

    fn spawn_pole(&mut self, x: f32) -> PoleId {
        let height = self.rng.gen_range(POLE_HEIGHT_RANGE.0..POLE_HEIGHT_RANGE.1);
        let pole = Pole {
            x,
            height,
            top_y: height - CROSSARM_DROP,
            crossarm_half_width: self
                .rng
                .gen_range(CROSSARM_HALF_WIDTH_RANGE.0..CROSSARM_HALF_WIDTH_RANGE.1),
            lean_angle: self.rng.gen_range(LEAN_ANGLE_RANGE.0..LEAN_ANGLE_RANGE.1),
            has_transformer: self.rng.gen_bool(TRANSFORMER_CHANCE),
        };
        let id = self.poles.insert(pole);
        self.ordered.push(id);
        id
    }

    /// Create the `num_channels` wires between two adjacent poles, place
    /// birds for the next `bars_per_span` bars of the score, and advance
    /// the shared cursor.
    fn spawn_span(
        &mut self,
        left: PoleId,
        right: PoleId,
        cfg: &EngineConfig,
        cursor: &mut BarCursor,
        track: &ScoreTrack,
    ) {
        let mut span_wires: SmallVec<[WireId; 8]> = SmallVec::new();
        for channel in 0..cfg.num_channels {
            let start = self.poles.get(left).map(|p| p.attach_point(channel, cfg.num_channels));
            let end = self.poles.get(right).map(|p| p.attach_point(channel, cfg.num_channels));
            let (Some(start), Some(end)) = (start, end) else {
                continue;
            };
            let sag = self.rng.gen_range(WIRE_SAG_RANGE.0..WIRE_SAG_RANGE.1);
            let id = self.wires.insert(Wire {
                start_pole: left,
                end_pole: right,
                channel,
                sag,
                curve: WireCurve::new(start, end, sag),
                wave_intensity: 0.0,
            });
            span_wires.push(id);
        }

        for placement in placements_for(*cursor, cfg.bars_per_span, track) {
            let channel = placement.channel.min(cfg.num_channels - 1);
            if let Some(&wire) = span_wires.get(channel) {
                let phase = self.rng.gen_range(0.0..std::f32::consts::TAU);
                self.birds.insert(Bird::new(wire, placement.t, channel, true, phase));
            }
        }

        // Occasional silent extra so wires aren't populated only where the
        // score has notes.
        if self.rng.gen_bool(DECOR_BIRD_CHANCE) {
            let channel = self.rng.gen_range(0..cfg.num_channels);
            if let Some(&wire) = span_wires.get(channel) {
                let t = self.rng.gen_range(T_CLAMP_MIN..T_CLAMP_MAX);
                let phase = self.rng.gen_range(0.0..std::f32::consts::TAU);
                self.birds.insert(Bird::new(wire, t, channel, false, phase));
            }
        }

        cursor.advance(cfg.bars_per_span, track.len());
        debug!(
            "spawned span: {} poles, {} wires, {} birds live, cursor {}",
            self.poles.len(),
            self.wires.len(),
            self.birds.len(),
            cursor.index()
        );
    }

    /// Remove one pole and, atomically within this call, every wire that
    /// touches it and every bird perched on those wires.
    fn destroy_pole(&mut self, id: PoleId) {
        let dead_wires: SmallVec<[WireId; 8]> = self
            .wires
            .iter()
            .filter(|(_, w)| w.start_pole == id || w.end_pole == id)
            .map(|(wid, _)| wid)
            .collect();
        for wid in dead_wires {
            let dead_birds: SmallVec<[BirdId; 8]> = self
                .birds
                .iter()
                .filter(|(_, b)| b.wire == wid)
                .map(|(bid, _)| bid)
                .collect();
            for bid in dead_birds {
                self.birds.remove(bid);
            }
            self.wires.remove(wid);
        }
        self.poles.remove(id);
    }

    pub fn pole(&self, id: PoleId) -> Option<&Pole> {
        self.poles.get(id)
    }

    pub fn wire(&self, id: WireId) -> Option<&Wire> {
        self.wires.get(id)
    }

    pub fn poles(&self) -> impl Iterator<Item = &Pole> {
        self.poles.iter().map(|(_, p)| p)
    }

    pub fn wires(&self) -> impl Iterator<Item = &Wire> {
        self.wires.iter().map(|(_, w)| w)
    }

    pub fn birds(&self) -> impl Iterator<Item = &Bird> {
        self.birds.iter().map(|(_, b)| b)
    }

    pub fn pole_count(&self) -> usize {
        self.poles.len()
    }

    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    pub fn bird_count(&self) -> usize {
        self.birds.len()
    }

    /// Pole x positions in streaming order (ascending).
    pub fn pole_positions(&self) -> Vec<f32> {
        self.ordered
            .iter()
            .filter_map(|&id| self.poles.get(id).map(|p| p.x))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_reuses_slots_after_remove() {
        let mut arena: Arena<u32> = Arena::new();
        let a = arena.insert(1);
        let b = arena.insert(2);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.remove(a), Some(1));
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.remove(a), None, "double remove must be a no-op");
        let c = arena.insert(3);
        assert_eq!(c, a, "freed slot should be reused");
        assert_eq!(arena.get(b), Some(&2));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn attach_points_spread_across_crossarm() {
        let pole = Pole {
            x: 10.0,
            height: 10.0,
            top_y: 9.2,
            crossarm_half_width: 1.5,
            lean_angle: 0.0,
            has_transformer: false,
        };
        let first = pole.attach_point(0, 4);
        let last = pole.attach_point(3, 4);
        assert!((first.x - 8.5).abs() < 1e-5);
        assert!((last.x - 11.5).abs() < 1e-5);
        assert_eq!(first.y, 9.2);
        let only = pole.attach_point(0, 1);
        assert!((only.x - 10.0).abs() < 1e-5, "single channel attaches centered");
    }
}
