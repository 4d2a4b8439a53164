pub mod runner;

pub use runner::StageRunner;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use puppet_engine::{Command, StageConfig};

thread_local! {
    static RUNNER: RefCell<Option<StageRunner>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut StageRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow
            .as_mut()
            .expect("Stage not initialized. Call stage_init() first.");
        f(runner)
    })
}

/// Create the stage at the container's current width. Call once.
#[wasm_bindgen]
pub fn stage_init(width: f32) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = StageRunner::new(StageConfig::default(), Box::new(js_sys::Date::now));
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });

    with_runner(|r| r.init(width));
    log::info!("puppet stage: initialized at width {}", width);
}

/// Advance one frame. `dt` is elapsed seconds since the last frame.
#[wasm_bindgen]
pub fn stage_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

/// Container width changed; height and scale are re-derived.
#[wasm_bindgen]
pub fn stage_resize(width: f32) {
    with_runner(|r| r.resize(width));
}

// ---- Character CRUD (JSON in, form-response JSON out) ----

#[wasm_bindgen]
pub fn stage_add_character(json: &str) -> String {
    with_runner(|r| r.add_character_json(json))
}

#[wasm_bindgen]
pub fn stage_update_character(index: u32, json: &str) -> String {
    with_runner(|r| r.update_character_json(index as usize, json))
}

#[wasm_bindgen]
pub fn stage_remove_character(index: u32) -> String {
    with_runner(|r| r.remove_character(index as usize))
}

#[wasm_bindgen]
pub fn stage_select(index: u32) {
    with_runner(|r| r.select(index as usize));
}

#[wasm_bindgen]
pub fn get_character_ranks() -> String {
    with_runner(|r| r.ranks_json())
}

// ---- Stage commands ----

#[wasm_bindgen]
pub fn stage_jump() {
    with_runner(|r| r.push_command(Command::Jump));
}

#[wasm_bindgen]
pub fn stage_move_to(x: f32, y: f32) {
    with_runner(|r| r.push_command(Command::MoveTo { x, y }));
}

// ---- Avatar commands and runtime feedback ----

#[wasm_bindgen]
pub fn avatar_play(animation: &str, looped: bool) {
    with_runner(|r| {
        r.push_command(Command::Play {
            animation: animation.to_string(),
            looped,
        })
    });
}

#[wasm_bindgen]
pub fn avatar_stop() {
    with_runner(|r| r.push_command(Command::StopAnimation));
}

#[wasm_bindgen]
pub fn avatar_set_direction(left: bool) {
    with_runner(|r| r.push_command(Command::SetDirection { left }));
}

/// Host reports a non-looping animation finished on a track.
#[wasm_bindgen]
pub fn avatar_animation_complete(track: u32, animation: &str) {
    with_runner(|r| r.avatar_complete(track, animation));
}

/// Host reports a named event fired inside an animation.
#[wasm_bindgen]
pub fn avatar_event(name: &str) {
    with_runner(|r| r.avatar_named_event(name));
}

/// Drain pending skeletal-runtime calls for the host to apply.
#[wasm_bindgen]
pub fn get_avatar_calls() -> String {
    with_runner(|r| r.avatar_calls_json())
}

// ---- Sound service ----

#[wasm_bindgen]
pub fn sound_set_enabled(enabled: bool) {
    with_runner(|r| r.sound_set_enabled(enabled));
}

#[wasm_bindgen]
pub fn sound_set_master_volume(volume: f32) {
    with_runner(|r| r.sound_set_master_volume(volume));
}

/// Register a sample the host finished loading.
#[wasm_bindgen]
pub fn sound_register(name: &str, base_volume: f32, looped: bool) {
    with_runner(|r| r.sound_register(name, base_volume, looped));
}

/// Drain pending audio events (samples and synthesized tones).
#[wasm_bindgen]
pub fn get_audio_events() -> String {
    with_runner(|r| r.audio_events_json())
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_instances_ptr() -> *const f32 {
    with_runner(|r| r.instances_ptr())
}

#[wasm_bindgen]
pub fn get_instance_count() -> u32 {
    with_runner(|r| r.instance_count())
}

#[wasm_bindgen]
pub fn get_labels() -> String {
    with_runner(|r| r.labels_json())
}

#[wasm_bindgen]
pub fn get_world_width() -> f32 {
    with_runner(|r| r.world_width())
}

#[wasm_bindgen]
pub fn get_world_height() -> f32 {
    with_runner(|r| r.world_height())
}

/// Frame timing report for the debug overlay.
#[wasm_bindgen]
pub fn get_profile() -> String {
    with_runner(|r| r.profile_json())
}
