// Sandbox state: physics world, entities, textures and camera, advanced one
// frame at a time from user input

use glam::Vec2;
use log::{info, warn};
use std::path::Path;

use super::components::{Body, Registry, Textured};
use super::config::SandboxConfig;
use super::fragment::{build_fragment, Material};
use super::glyph::{self, next_letter};
use super::mask::render_contour;
use super::slicer::{execute_cut, CutOutcome, Slicer};
use super::SandboxError;
use crate::core::{Local, MassProperties, Polygon};
use crate::engine::ecs::Entity;
use crate::engine::game_loop::GameLoop;
use crate::engine::input::{Action, InputManager};
use crate::engine::physics::{presets, CollisionGroups, Isometry, PhysicsWorld, RigidBodyHandle};
use crate::engine::renderer::{Camera, TextureBackend, TextureError, TextureHandle, TextureStore};

/// Whether the window loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Quit,
}

/// Everything the sandbox owns
pub struct SandboxState<B: TextureBackend = TextureStore> {
    config: SandboxConfig,
    material: Material,
    physics: PhysicsWorld,
    registry: Registry,
    textures: B,
    slicer: Slicer,
    camera: Camera,
    clock: GameLoop,
    gravity_enabled: bool,
    /// Glyphs spawned directly, counted against the spawn limit
    spawned: Vec<Entity>,
    level_body: Option<RigidBodyHandle>,
    next_letter: char,
}

impl<B: TextureBackend> SandboxState<B> {
    /// Create an empty sandbox. Call `init` to build the level.
    pub fn new(config: SandboxConfig, textures: B, viewport: Vec2) -> Self {
        let camera = Camera::new(
            config.camera_position,
            config.camera_zoom,
            viewport.x,
            viewport.y,
        );

        Self {
            material: Material::from(&config),
            physics: Self::new_world(&config),
            registry: Registry::new(),
            textures,
            slicer: Slicer::new(),
            camera,
            clock: GameLoop::new(config.timestep),
            gravity_enabled: config.gravity_enabled,
            spawned: Vec::new(),
            level_body: None,
            next_letter: 'A',
            config,
        }
    }

    fn new_world(config: &SandboxConfig) -> PhysicsWorld {
        let mut physics = PhysicsWorld::new();
        physics.set_timestep(config.timestep);
        physics
    }

    /// Build the level and place the initial glyphs
    pub fn init(&mut self) -> Result<(), SandboxError> {
        self.apply_gravity();

        if !self.config.level.is_empty() {
            let level = self.physics.add_rigid_body(presets::level_body());
            for (a, b) in &self.config.level {
                let segment = presets::level_segment(*a, *b, self.config.level_friction);
                self.physics.add_collider(segment, level);
            }
            self.level_body = Some(level);
        }

        let glyphs = self.config.initial_glyphs.clone();
        for (text, position) in &glyphs {
            self.spawn_text(text, *position)?;
        }

        info!(
            "Sandbox ready: {} level segment(s), {} glyph(s)",
            self.config.level.len(),
            glyphs.len()
        );
        Ok(())
    }

    /// Destroy every entity and start over with an empty world
    pub fn shutdown(&mut self) {
        let destroyed = self.registry.clear(&mut self.physics, &mut self.textures);
        self.slicer.clear();
        self.spawned.clear();
        self.level_body = None;
        self.physics = Self::new_world(&self.config);
        self.apply_gravity();
        info!("Sandbox cleared, {} entities destroyed", destroyed);
    }

    /// Shut down and build the initial scene again
    pub fn reset(&mut self) -> Result<(), SandboxError> {
        self.shutdown();
        self.init()
    }

    /// One fixed physics step followed by the cuts queued during it.
    ///
    /// While paused the world doesn't move but queued cuts still run.
    pub fn step(&mut self) -> Vec<CutOutcome> {
        if !self.clock.is_paused() {
            self.physics.step();
        }
        self.run_deferred()
    }

    /// Execute every queued cut
    pub fn run_deferred(&mut self) -> Vec<CutOutcome> {
        let commands = self.slicer.take_pending();
        commands
            .iter()
            .filter_map(|command| {
                execute_cut(
                    command,
                    &mut self.physics,
                    &mut self.registry,
                    &mut self.textures,
                    &self.material,
                )
            })
            .collect()
    }

    /// Handle one frame of input and advance the simulation
    pub fn frame(&mut self, input: &InputManager) -> FrameControl {
        if input.just_pressed(Action::Quit) {
            return FrameControl::Quit;
        }

        let state = input.state();
        let cursor = self.camera.screen_to_world(state.cursor());

        if input.just_pressed(Action::ResetCamera) {
            self.camera.reset();
        }
        if input.just_pressed(Action::Reset) {
            if let Err(err) = self.reset() {
                warn!("Reset failed: {}", err);
            }
        }
        if input.just_pressed(Action::ToggleGravity) {
            self.toggle_gravity();
        }
        if input.just_pressed(Action::Pause) {
            self.clock.toggle_pause();
        }
        if input.just_pressed(Action::Spawn) {
            if let Err(err) = self.spawn_next_letter(cursor) {
                warn!("Spawn failed: {}", err);
            }
        }
        if input.just_pressed(Action::RemoveBody) {
            self.remove_at(cursor);
        }
        if input.just_pressed(Action::DumpMasks) {
            let dir = self.config.dump_dir.clone();
            if let Err(err) = self.dump_textures(&dir) {
                warn!("Texture dump failed: {}", err);
            }
        }

        if state.wheel() != 0.0 {
            self.camera.zoom_at(state.cursor(), state.wheel());
        }
        if input.is_pressed(Action::Pan) {
            self.camera.pan(state.cursor_delta());
        }

        if input.just_pressed(Action::Slice) {
            self.slicer.begin(cursor);
        }
        if input.just_released(Action::Slice) {
            self.slicer.release(cursor, &self.physics);
        }

        for _ in 0..self.clock.begin_frame() {
            self.step();
        }
        // Cuts still run when no step was due this frame
        self.run_deferred();

        FrameControl::Continue
    }

    /// Start a slicing gesture at a world position
    pub fn begin_slice(&mut self, start: Vec2) {
        self.slicer.begin(start);
    }

    /// Finish the gesture, returns the number of cuts queued
    pub fn end_slice(&mut self, end: Vec2) -> usize {
        self.slicer.release(end, &self.physics)
    }

    /// Drop a gesture whose button release will never arrive
    pub fn focus_lost(&mut self) {
        self.slicer.cancel();
    }

    /// Queue cuts along `a -> b`, returns how many were queued
    pub fn slice(&mut self, a: Vec2, b: Vec2) -> usize {
        self.slicer.slice(a, b, &self.physics)
    }

    pub fn gravity_enabled(&self) -> bool {
        self.gravity_enabled
    }

    pub fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity_enabled = enabled;
        self.apply_gravity();
    }

    /// Flip gravity on or off, returns the new setting
    pub fn toggle_gravity(&mut self) -> bool {
        self.set_gravity_enabled(!self.gravity_enabled);
        info!(
            "Gravity {}",
            if self.gravity_enabled { "on" } else { "off" }
        );
        self.gravity_enabled
    }

    fn apply_gravity(&mut self) {
        let gravity = if self.gravity_enabled {
            self.config.gravity
        } else {
            Vec2::ZERO
        };
        self.physics.set_gravity(gravity);
    }

    /// Drop glyphs that were cut or removed from the spawn count, then check
    /// there is room for one more
    fn check_capacity(&mut self) -> Result<(), SandboxError> {
        let registry = &self.registry;
        self.spawned.retain(|entity| registry.valid(*entity));

        match self.config.spawn_limit {
            Some(limit) if self.spawned.len() >= limit => {
                Err(SandboxError::CapacityExceeded { limit })
            }
            _ => Ok(()),
        }
    }

    /// Spawn an untextured box centered on `center`
    pub fn spawn_box(&mut self, center: Vec2, size: Vec2) -> Result<Entity, SandboxError> {
        self.spawn_body(center, size).map(|(entity, _)| entity)
    }

    fn spawn_body(&mut self, center: Vec2, size: Vec2) -> Result<(Entity, Body), SandboxError> {
        self.check_capacity()?;

        let invalid = SandboxError::InvalidShape {
            width: size.x,
            height: size.y,
        };
        let shape = Polygon::<Local>::rectangle(size.x, size.y);
        let Some(mass) = MassProperties::from_polygon(shape.points(), self.material.density)
        else {
            return Err(invalid);
        };

        let entity = self.registry.create();
        let pose = Isometry::translation(center.x, center.y);
        let Some(body) =
            build_fragment(&mut self.physics, entity, &shape, &mass, pose, &self.material)
        else {
            self.registry
                .destroy(entity, &mut self.physics, &mut self.textures);
            return Err(invalid);
        };
        if let Err(orphan) = self.registry.emplace(entity, body) {
            orphan.release(&mut self.physics);
            return Err(invalid);
        }

        self.spawned.push(entity);
        Ok((entity, body))
    }

    /// Spawn a box the size of `skin`, wearing it.
    ///
    /// The sandbox takes ownership of `skin` and releases it if spawning fails.
    pub fn spawn_skinned(
        &mut self,
        skin: TextureHandle,
        center: Vec2,
    ) -> Result<Entity, SandboxError> {
        let Some((width, height)) = self.textures.size(skin) else {
            return Err(TextureError::UnknownHandle(skin).into());
        };

        let (entity, body) = match self.spawn_body(center, Vec2::new(width as f32, height as f32)) {
            Ok(spawned) => spawned,
            Err(err) => {
                self.textures.discard(skin);
                return Err(err);
            }
        };

        let mask = match self.textures.create_target(width, height) {
            Ok(mask) => mask,
            Err(err) => {
                self.textures.discard(skin);
                self.registry
                    .destroy(entity, &mut self.physics, &mut self.textures);
                return Err(err.into());
            }
        };

        let textured = Textured {
            skin,
            mask,
            transform: Isometry::identity(),
        };
        if let Err(err) = render_contour(
            &mut self.textures,
            &self.physics,
            body.body,
            mask,
            &textured.transform,
        ) {
            warn!("Mask of {} not drawn: {}", entity, err);
        }
        if let Err(orphan) = self.registry.emplace(entity, textured) {
            orphan.release(&mut self.textures);
        }

        Ok(entity)
    }

    /// Bake `text` and spawn it centered on `center`
    pub fn spawn_text(&mut self, text: &str, center: Vec2) -> Result<Entity, SandboxError> {
        self.check_capacity()?;
        let skin = glyph::bake(&mut self.textures, text, self.config.glyph_cell)?;
        let entity = self.spawn_skinned(skin, center)?;
        info!("Spawned {:?} as {} at {:?}", text, entity, center);
        Ok(entity)
    }

    /// Spawn the next letter of the alphabet
    pub fn spawn_next_letter(&mut self, center: Vec2) -> Result<Entity, SandboxError> {
        let letter = self.next_letter;
        let entity = self.spawn_text(&letter.to_string(), center)?;
        self.next_letter = next_letter(letter);
        Ok(entity)
    }

    /// Remove whatever sliceable body is under `point`
    pub fn remove_at(&mut self, point: Vec2) -> bool {
        let Some(collider) = self
            .physics
            .collider_at(point, CollisionGroups::Grabbable.memberships())
        else {
            return false;
        };
        let Some(body) = self
            .physics
            .get_collider(collider)
            .and_then(|collider| collider.parent())
        else {
            return false;
        };

        match self.physics.get_entity(body) {
            Some(entity) if self.registry.valid(entity) => {
                info!("Removing {}", entity);
                self.registry
                    .destroy(entity, &mut self.physics, &mut self.textures)
            }
            _ => self.physics.remove_rigid_body(body),
        }
    }

    /// Write every skin and mask to `dir` as PNG, returns how many were written
    pub fn dump_textures(&self, dir: &Path) -> Result<usize, SandboxError> {
        std::fs::create_dir_all(dir)?;

        let mut written = 0;
        for (entity, textured) in self.registry.view::<Textured>() {
            for (kind, handle) in [("skin", textured.skin), ("mask", textured.mask)] {
                self.textures
                    .export_png(handle, &dir.join(format!("{}_{}.png", entity, kind)))?;
                written += 1;
            }
        }

        info!("Wrote {} texture(s) to {}", written, dir.display());
        Ok(written)
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn textures(&self) -> &B {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut B {
        &mut self.textures
    }

    pub fn slicer(&self) -> &Slicer {
        &self.slicer
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn clock(&self) -> &GameLoop {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut GameLoop {
        &mut self.clock
    }
}
