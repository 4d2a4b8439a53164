use puppet_engine::{
    build_draw_list, AvatarController, Command, CommandQueue, DrawList, Facing, FrameProfiler,
    QueueBackend, RecordingRuntime, RosterError, SceneClock, SoundCue, SoundDef, SoundManager,
    Stage, StageConfig, StageContext, TrackEvent, TrackId,
};

/// Frame spans slower than this get logged.
const SLOW_FRAME_MS: f64 = 16.7;

/// Owns the whole stage loop on the Rust side of the bridge.
///
/// The browser host drives it: `tick(dt)` once per display refresh,
/// `resize(width)` when the container changes, commands and character
/// CRUD between frames, then reads back the draw buffer, label texts,
/// audio events, and recorded skeletal-runtime calls.
pub struct StageRunner {
    stage: Stage,
    ctx: StageContext,
    commands: CommandQueue,
    clock: SceneClock,
    draw_list: DrawList,
    sounds: SoundManager<QueueBackend>,
    avatar: AvatarController<RecordingRuntime>,
    profiler: FrameProfiler,
    initialized: bool,
}

impl StageRunner {
    /// `now` supplies monotonic milliseconds (performance.now in the
    /// browser, a fake in tests).
    pub fn new(config: StageConfig, now: Box<dyn Fn() -> f64>) -> Self {
        let clock = SceneClock::new(config.time_scale);
        let draw_list = DrawList::with_capacity(config.max_instances);
        let mut avatar = AvatarController::new(RecordingRuntime::new());
        // Footsteps inside walk cycles drive the step sound.
        avatar.map_sound("footstep", "walk_sound");

        Self {
            stage: Stage::new(config),
            ctx: StageContext::new(),
            commands: CommandQueue::new(),
            clock,
            draw_list,
            sounds: SoundManager::new(QueueBackend::new()),
            avatar,
            profiler: FrameProfiler::new(now),
            initialized: false,
        }
    }

    /// Initialize the stage at the container's current width.
    pub fn init(&mut self, width: f32) {
        self.stage.init(&mut self.ctx);
        if width > 0.0 && (width - self.stage.viewport().width()).abs() > f32::EPSILON {
            self.stage.resize(&mut self.ctx, width);
        }
        self.initialized = true;
    }

    /// Run one frame tick: commands, animation, draw list, sound.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }
        self.profiler.begin("tick");

        self.ctx.clear_frame_data();
        let frame = self.clock.advance(dt);
        self.stage.update(&mut self.ctx, &mut self.commands, frame);

        build_draw_list(self.ctx.scene.iter(), &mut self.draw_list);

        let mut cues = std::mem::take(&mut self.ctx.cues);
        let max_cues = self.stage.config().max_cues;
        if cues.len() > max_cues {
            log::warn!("dropping {} sound cues over the frame cap", cues.len() - max_cues);
            cues.truncate(max_cues);
        }
        self.sounds.dispatch(&cues);

        if let Some(ms) = self.profiler.end("tick") {
            if ms > SLOW_FRAME_MS {
                log::warn!("slow frame: {:.2}ms", ms);
            }
        }
    }

    pub fn resize(&mut self, width: f32) {
        self.stage.resize(&mut self.ctx, width);
    }

    /// Route a command: avatar playback goes straight to the controller,
    /// figure commands queue for the next update.
    pub fn push_command(&mut self, command: Command) {
        match command {
            Command::Play { animation, looped } => {
                let mut cues: Vec<SoundCue> = Vec::new();
                self.avatar.play(&animation, looped, &mut cues);
                self.sounds.dispatch(&cues);
            }
            Command::StopAnimation => self.avatar.stop(),
            Command::SetDirection { left } => {
                let facing = if left { Facing::Left } else { Facing::Right };
                self.avatar.set_direction(facing);
            }
            other => self.commands.push(other),
        }
    }

    /// Completion event fed back from the host-side skeletal runtime.
    pub fn avatar_complete(&mut self, track: u32, animation: &str) {
        let mut cues: Vec<SoundCue> = Vec::new();
        self.avatar.handle_event(
            TrackEvent::Complete {
                track: TrackId(track),
                animation: animation.to_string(),
            },
            &mut cues,
        );
        self.sounds.dispatch(&cues);
    }

    /// Named animation event fed back from the host-side runtime.
    pub fn avatar_named_event(&mut self, name: &str) {
        let mut cues: Vec<SoundCue> = Vec::new();
        self.avatar.handle_event(
            TrackEvent::Named {
                name: name.to_string(),
            },
            &mut cues,
        );
        self.sounds.dispatch(&cues);
    }

    /// Drain recorded runtime calls for the host to apply to the real
    /// skeleton.
    pub fn avatar_calls_json(&mut self) -> String {
        let calls = self.avatar.runtime_mut().drain_calls();
        serde_json::to_string(&calls).unwrap_or_else(|_| "[]".to_string())
    }

    // -- Character CRUD, answering in the form response shape --

    pub fn add_character_json(&mut self, json: &str) -> String {
        match self.stage.add_character_json(&mut self.ctx, json) {
            Ok(index) => api_ok(&format!("character added at index {}", index)),
            Err(err) => api_err(&err),
        }
    }

    pub fn update_character_json(&mut self, index: usize, json: &str) -> String {
        match self.stage.update_character_json(&mut self.ctx, index, json) {
            Ok(()) => api_ok("character updated"),
            Err(err) => api_err(&err),
        }
    }

    pub fn remove_character(&mut self, index: usize) -> String {
        match self.stage.remove_character(&mut self.ctx, index) {
            Ok(()) => api_ok("character removed"),
            Err(err) => api_err(&err),
        }
    }

    pub fn select(&mut self, index: usize) {
        self.commands.push(Command::Select { index });
    }

    /// Current standings: name, score, rank per character.
    pub fn ranks_json(&self) -> String {
        let entries: Vec<serde_json::Value> = self
            .stage
            .roster()
            .iter()
            .map(|(record, rank)| {
                serde_json::json!({
                    "name": record.name,
                    "score": record.score,
                    "rank": rank,
                })
            })
            .collect();
        serde_json::Value::Array(entries).to_string()
    }

    // -- Sound service controls --

    pub fn sound_set_enabled(&mut self, enabled: bool) {
        self.sounds.set_enabled(enabled);
    }

    pub fn sound_set_master_volume(&mut self, volume: f32) {
        self.sounds.set_master_volume(volume);
    }

    /// Register a sample the host finished loading.
    pub fn sound_register(&mut self, name: &str, base_volume: f32, looped: bool) {
        self.sounds.register(
            name,
            SoundDef {
                base_volume,
                looped,
            },
        );
    }

    /// Drain pending audio events (samples to play, tones to synthesize).
    pub fn audio_events_json(&mut self) -> String {
        let events = self.sounds.backend_mut().drain();
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }

    // -- Draw buffer accessors --

    pub fn instances_ptr(&self) -> *const f32 {
        self.draw_list.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.draw_list.instance_count()
    }

    pub fn labels_json(&self) -> String {
        serde_json::to_string(self.draw_list.labels()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn world_width(&self) -> f32 {
        self.stage.viewport().width()
    }

    pub fn world_height(&self) -> f32 {
        self.stage.viewport().height()
    }

    /// Timing report for the host debug overlay.
    pub fn profile_json(&self) -> String {
        let entries: Vec<serde_json::Value> = self
            .profiler
            .report()
            .into_iter()
            .map(|(name, ms)| serde_json::json!({ "name": name, "ms": ms }))
            .collect();
        serde_json::Value::Array(entries).to_string()
    }
}

fn api_ok(message: &str) -> String {
    serde_json::json!({ "success": true, "message": message }).to_string()
}

fn api_err(err: &RosterError) -> String {
    serde_json::json!({ "success": false, "message": err.to_string() }).to_string()
}
