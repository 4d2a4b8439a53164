// stage/stage.rs
//
// The composition root: roster, viewport, cast, scenery, and the per-frame
// systems, wired together behind the host command vocabulary. Characters
// are rebuilt from their records whenever attributes, ranks, or the
// viewport change; nothing mutates a live bone tree in place.

use glam::Vec2;

use crate::api::app::{StageConfig, StageContext};
use crate::api::types::{EntityId, SoundCue};
use crate::core::clock::Frame;
use crate::core::rng::Rng;
use crate::extensions::easing::Easing;
use crate::extensions::tween::{Tween, TweenState};
use crate::input::commands::{Command, CommandQueue};
use crate::layout::position::Position;
use crate::layout::viewport::Viewport;
use crate::rig::animator::{AnimatorState, FigureAnimator};
use crate::rig::figure::{build_figure, FigureStyle};
use crate::rig::pose::{MotionParams, PoseDriver};
use crate::stage::roster::{CharacterRecord, Roster, RosterError};
use crate::stage::scenery::{default_clouds, spawn_clouds};

/// Glide time for explicit repositioning.
const MOVE_DURATION: f32 = 0.6;
/// Cue emitted when a figure jumps.
const JUMP_CUE: &str = "jump";

pub struct Stage {
    config: StageConfig,
    viewport: Viewport,
    roster: Roster,
    animators: AnimatorState,
    tweens: TweenState,
    rng: Rng,
    /// Anchor node per roster index, rebuilt together with the cast.
    cast: Vec<EntityId>,
    clouds: Vec<EntityId>,
}

impl Stage {
    pub fn new(config: StageConfig) -> Self {
        let viewport = Viewport::new(config.base.width, config.aspect, config.base);
        let rng = Rng::new(config.seed);
        Self {
            config,
            viewport,
            roster: Roster::new(),
            animators: AnimatorState::new(),
            tweens: TweenState::new(),
            rng,
            cast: Vec::new(),
            clouds: Vec::new(),
        }
    }

    /// Set up scenery and make sure there is something on stage.
    pub fn init(&mut self, ctx: &mut StageContext) {
        if self.roster.is_empty() {
            self.roster.add(CharacterRecord {
                name: "Player".to_string(),
                ..CharacterRecord::default()
            });
        }
        self.rebuild_scenery(ctx);
        self.rebuild_cast(ctx);
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Anchor node of the character at a roster index.
    pub fn anchor_of(&self, index: usize) -> Option<EntityId> {
        self.cast.get(index).copied()
    }

    pub fn animators(&self) -> &AnimatorState {
        &self.animators
    }

    // -- Character CRUD, every mutation rebuilds the cast --

    pub fn add_character(&mut self, ctx: &mut StageContext, record: CharacterRecord) -> usize {
        let index = self.roster.add(record);
        self.rebuild_cast(ctx);
        index
    }

    pub fn add_character_json(
        &mut self,
        ctx: &mut StageContext,
        json: &str,
    ) -> Result<usize, RosterError> {
        let index = self.roster.add_json(json)?;
        self.rebuild_cast(ctx);
        Ok(index)
    }

    pub fn update_character(
        &mut self,
        ctx: &mut StageContext,
        index: usize,
        record: CharacterRecord,
    ) -> Result<(), RosterError> {
        self.roster.update(index, record)?;
        self.rebuild_cast(ctx);
        Ok(())
    }

    pub fn update_character_json(
        &mut self,
        ctx: &mut StageContext,
        index: usize,
        json: &str,
    ) -> Result<(), RosterError> {
        self.roster.update_json(index, json)?;
        self.rebuild_cast(ctx);
        Ok(())
    }

    pub fn remove_character(
        &mut self,
        ctx: &mut StageContext,
        index: usize,
    ) -> Result<(), RosterError> {
        self.roster.remove(index)?;
        self.rebuild_cast(ctx);
        Ok(())
    }

    /// Container resized: width drives everything, the whole stage is
    /// rebuilt at the new ratio.
    pub fn resize(&mut self, ctx: &mut StageContext, width: f32) {
        if width <= 0.0 {
            // Host container not mounted yet; try again on the next resize.
            log::debug!("ignoring resize to non-positive width {}", width);
            return;
        }
        self.viewport.set_width(width);
        self.rebuild_scenery(ctx);
        self.rebuild_cast(ctx);
    }

    /// One frame: apply pending commands, advance tweens, drive poses.
    pub fn update(&mut self, ctx: &mut StageContext, commands: &mut CommandQueue, frame: Frame) {
        for command in commands.drain() {
            self.apply_command(ctx, command);
        }
        // Tweens first so figures follow a gliding anchor within the frame.
        self.tweens.tick(frame.dt, &mut ctx.scene);
        self.animators.tick(frame, &mut ctx.scene);
    }

    fn apply_command(&mut self, ctx: &mut StageContext, command: Command) {
        match command {
            Command::Select { index } => {
                if let Err(err) = self.roster.select(index) {
                    log::warn!("select rejected: {}", err);
                }
            }
            Command::Jump => {
                let selected = self.roster.selected();
                if let Some(anchor) = self.anchor_of(selected) {
                    if let Some(animator) = self.animators.get_mut(anchor) {
                        animator.start_jump();
                        ctx.emit_cue(SoundCue::new(JUMP_CUE, 1.0));
                    }
                }
            }
            Command::MoveTo { x, y } => {
                let selected = self.roster.selected();
                let Some(anchor) = self.anchor_of(selected) else {
                    return;
                };
                let Some(current) = ctx.scene.get(anchor).map(|n| n.pos) else {
                    return;
                };
                let target = Vec2::new(x, y);
                self.tweens.retarget(
                    anchor,
                    Tween::position(current, target, MOVE_DURATION, Easing::QuadOut),
                );
                // Remember the destination so resizes keep the new spot.
                if let Some(mut record) = self.roster.get(selected).cloned() {
                    record.position = Position::percentage_of(target, &self.viewport);
                    // Score unchanged, so ranks are stable and no rebuild
                    // is needed.
                    let _ = self.roster.update(selected, record);
                }
            }
            Command::Play { .. } | Command::StopAnimation | Command::SetDirection { .. } => {
                // Skeletal avatar commands; the host routes them to the
                // avatar controller, not the figure stage.
                log::debug!("avatar command ignored by the figure stage");
            }
        }
    }

    // -- Rebuild machinery --

    fn rebuild_scenery(&mut self, ctx: &mut StageContext) {
        for &id in &self.clouds {
            self.tweens.remove_entity(id);
            ctx.scene.despawn(id);
        }
        self.clouds = spawn_clouds(ctx, &mut self.tweens, &self.viewport, &default_clouds());
    }

    /// Tear down and rebuild every figure from its record. Teardown always
    /// runs deregistration and despawn together, so a destroyed figure's
    /// callback can never fire again.
    fn rebuild_cast(&mut self, ctx: &mut StageContext) {
        let old_cast = std::mem::take(&mut self.cast);
        for anchor in old_cast {
            self.destroy_figure(ctx, anchor);
        }

        let entries: Vec<(CharacterRecord, u32)> = self
            .roster
            .iter()
            .map(|(record, rank)| (record.clone(), rank))
            .collect();
        for (index, (record, rank)) in entries.into_iter().enumerate() {
            self.spawn_figure(ctx, index, &record, rank);
        }
    }

    fn destroy_figure(&mut self, ctx: &mut StageContext, anchor: EntityId) {
        // Deregister first, then despawn: one exit path for both.
        if let Some(animator) = self.animators.remove(anchor) {
            self.tweens.remove_entity(anchor);
            ctx.scene.despawn_family(&animator.figure.family);
        } else {
            // Registration and cast list drifted apart; still reclaim nodes.
            log::warn!("destroying figure {:?} with no registered animator", anchor);
            ctx.scene.despawn(anchor);
        }
    }

    fn spawn_figure(
        &mut self,
        ctx: &mut StageContext,
        index: usize,
        record: &CharacterRecord,
        rank: u32,
    ) {
        let origin = record.position.resolve(&self.viewport);
        let ratio = self.viewport.width_ratio();
        let style = FigureStyle {
            name: record.name.clone(),
            body: record.body,
            face: record.face,
        };
        let figure = build_figure(ctx, index, &style, origin, ratio);
        let params = MotionParams::generate(&mut self.rng);
        // The front-runner holds the salute and stays planted.
        let driver = if rank == 1 {
            PoseDriver::saluting(params)
        } else {
            PoseDriver::new(params)
        };
        let anchor = self.animators.register(FigureAnimator::new(figure, driver));
        self.cast.push(anchor);
    }
}
