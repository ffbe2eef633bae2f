use std::collections::VecDeque;

use bevy::prelude::*;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    asset::TearEffectAsset,
    geometry::GlyphOutline,
    motion::TearParticle,
    palette::{Palette, Rgb},
    spawner::{ImpactTarget, ScheduledTear},
};

/// A glyph that sheds tears when a [`TriggerTearEffect`] targets it.
///
/// The outline lives in glyph-local space: origin at the top-left corner of a
/// `size` box, y downward. The box is centered on the entity's transform.
#[derive(Component, Debug, Clone)]
#[require(GlyphState, Transform, Visibility)]
pub struct TearGlyph {
    /// Contours tears are sampled from.
    pub outline: GlyphOutline,
    /// Extent of the glyph box.
    pub size: Vec2,
}

impl TearGlyph {
    /// Creates a glyph component.
    pub fn new(outline: GlyphOutline, size: Vec2) -> Self {
        Self { outline, size }
    }
}

/// Whether a glyph is free to accept a new trigger.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub enum GlyphState {
    /// Ready.
    #[default]
    Idle,
    /// Turning after a trigger. Further triggers are rejected until it settles.
    Rotating {
        /// Rotation when the turn began.
        from: Quat,
        /// Degrees still to turn, clockwise on screen. Zero when only spawn points rotate.
        delta: f32,
        /// Clock time the turn began at.
        started_at: f32,
        /// Turn duration in seconds.
        duration: f32,
    },
}

impl GlyphState {
    /// Returns `true` while a turn is in progress.
    pub fn is_rotating(&self) -> bool {
        matches!(self, GlyphState::Rotating { .. })
    }
}

/// A round object tears land on. Its radius is half the smaller side of `size`.
#[derive(Component, Debug, Clone, Copy)]
#[require(Transform)]
pub struct TearTarget {
    /// Extent of the target box.
    pub size: Vec2,
}

/// Uses a custom [`TearEffectAsset`] for a glyph instead of the built-in one.
#[derive(Component, Debug, Clone)]
pub struct TearEffect(pub Handle<TearEffectAsset>);

/// Starts a tear shower on a [`TearGlyph`].
///
/// Triggers aimed at a glyph that is still rotating are ignored.
#[derive(EntityEvent, Debug, Clone, Copy)]
pub struct TriggerTearEffect {
    /// The glyph entity.
    pub entity: Entity,
    /// Base color every droplet tone is derived from.
    pub base_color: Rgb,
    /// Overrides the configured rotation delta. Zero means unset.
    pub rotation_delta: Option<f32>,
    /// Overrides the configured rotation duration.
    pub rotation_duration: Option<f32>,
}

impl TriggerTearEffect {
    /// Triggers `glyph` with `base_color` and the configured rotation.
    pub fn new(glyph: Entity, base_color: Rgb) -> Self {
        Self {
            entity: glyph,
            base_color,
            rotation_delta: None,
            rotation_duration: None,
        }
    }

    /// Overrides the rotation.
    pub fn with_rotation(mut self, delta: f32, duration: f32) -> Self {
        self.rotation_delta = Some(delta);
        self.rotation_duration = Some(duration);
        self
    }
}

/// Source of the per-shower seeds when an effect has no fixed seed.
#[derive(Resource)]
pub struct TearRng(pub StdRng);

impl Default for TearRng {
    fn default() -> Self {
        Self(StdRng::from_os_rng())
    }
}

impl TearRng {
    /// A deterministic source, mostly useful in tests.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

/// A live tear and the entity drawing it.
#[derive(Debug, Clone)]
pub struct TearSlot {
    /// Motion state.
    pub particle: TearParticle,
    /// Root entity of the droplet's sprites.
    pub visual: Option<Entity>,
}

/// Every tear of one trigger.
///
/// Tears wait in a queue until their birth time, then occupy a slot indexed by
/// birth order. A disposed slot is emptied and never reused. The shower entity
/// is despawned once nothing is pending and every slot is empty.
#[derive(Component)]
pub struct TearShower {
    /// The glyph that was triggered.
    pub glyph: Entity,
    /// Tones shared by every droplet.
    pub palette: Palette,
    /// Where the tears land.
    pub target: ImpactTarget,
    /// Baked body texture for [`palette`](Self::palette).
    pub body_texture: Handle<Image>,
    settings: TearEffectAsset,
    started_at: f32,
    pending: VecDeque<ScheduledTear>,
    slots: Vec<Option<TearSlot>>,
    rng: StdRng,
}

impl TearShower {
    /// Creates a shower triggered at `started_at`. Births are sorted by delay.
    pub fn new(
        glyph: Entity,
        started_at: f32,
        mut schedule: Vec<ScheduledTear>,
        base_color: Rgb,
        target: ImpactTarget,
        body_texture: Handle<Image>,
        settings: TearEffectAsset,
        rng: StdRng,
    ) -> Self {
        schedule.sort_by(|a, b| a.delay.total_cmp(&b.delay));
        Self {
            glyph,
            palette: Palette::from_base(base_color),
            target,
            body_texture,
            settings,
            started_at,
            slots: Vec::with_capacity(schedule.len()),
            pending: schedule.into(),
            rng,
        }
    }

    /// Effect parameters captured when the shower was triggered.
    pub fn settings(&self) -> &TearEffectAsset {
        &self.settings
    }

    /// Clock time of the trigger.
    pub fn started_at(&self) -> f32 {
        self.started_at
    }

    /// Births every tear whose time has come by `now` and returns the new slot indices.
    pub fn birth_due(&mut self, now: f32) -> Vec<usize> {
        let mut born = Vec::new();
        while let Some(next) = self.pending.front() {
            let due = self.started_at + next.delay;
            if due > now {
                break;
            }
            let Some(scheduled) = self.pending.pop_front() else {
                break;
            };
            let particle = TearParticle::spawn(&scheduled, due, &self.settings, &mut self.rng);
            born.push(self.slots.len());
            self.slots.push(Some(TearSlot {
                particle,
                visual: None,
            }));
        }
        born
    }

    /// The live slot at `index`, if it has not been disposed.
    pub fn slot(&self, index: usize) -> Option<&TearSlot> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Mutable access to the live slot at `index`.
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut TearSlot> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Iterates over live slots with their indices.
    pub fn live(&self) -> impl Iterator<Item = (usize, &TearSlot)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|slot| (index, slot)))
    }

    /// Iterates mutably over live slots, handing out the settings alongside.
    pub fn live_mut(&mut self) -> (&TearEffectAsset, impl Iterator<Item = (usize, &mut TearSlot)>) {
        let slots = self
            .slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_mut().map(|slot| (index, slot)));
        (&self.settings, slots)
    }

    /// Empties the slot at `index`, returning the visual to release.
    ///
    /// Disposing an already disposed slot returns `None`.
    pub fn dispose(&mut self, index: usize) -> Option<Entity> {
        self.slots
            .get_mut(index)
            .and_then(Option::take)
            .and_then(|slot| slot.visual)
    }

    /// Tears not born yet.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Tears born and not yet disposed.
    pub fn live_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Tears born so far, disposed or not.
    pub fn born_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` when nothing is pending and nothing is alive.
    pub fn is_finished(&self) -> bool {
        self.pending.is_empty() && self.slots.iter().all(Option::is_none)
    }
}

/// Root of a droplet's sprites, placed and faded by the shower that owns it.
#[derive(Component, Debug, Clone, Copy)]
#[require(Transform, Visibility)]
pub struct DropletVisual {
    /// Shower entity.
    pub shower: Entity,
    /// Current opacity, applied to every layer.
    pub opacity: f32,
}

/// One sprite of a droplet: body, highlight, glint, tail or shadow.
#[derive(Component, Debug, Clone, Copy)]
pub struct DropletLayer {
    /// The [`DropletVisual`] this layer belongs to.
    pub root: Entity,
    /// Layer opacity when the droplet is fully opaque.
    pub base_alpha: f32,
}
