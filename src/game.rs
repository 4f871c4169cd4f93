//! Session context
//!
//! One owned object holds the simulation loop and every collaborator it
//! talks to. Hosts call into it; nothing here is global.

use crate::assets::AssetRegistry;
use crate::audio::AudioSink;
use crate::journal::Journal;
use crate::platform::{FrameHandle, FrameScheduler, Key};
use crate::settings::Settings;
use crate::sim::{Consequence, LoopState, SimEvent, SimulationLoop, SoundCue, WorldState};
use crate::vfs::{RemovalError, Vfs};

pub struct Game<S: FrameScheduler, A: AudioSink> {
    sim: SimulationLoop<S>,
    assets: AssetRegistry,
    vfs: Vfs,
    journal: Journal,
    audio: A,
    settings: Settings,
    /// Last overlay message, replaced by every new one
    overlay: Option<String>,
}

impl<S: FrameScheduler, A: AudioSink> Game<S, A> {
    pub fn new(settings: Settings, scheduler: S, mut audio: A) -> Self {
        let vfs = Vfs::initial();
        audio.apply_settings(&settings);
        Self {
            sim: SimulationLoop::new(settings.viewport(), scheduler),
            assets: AssetRegistry::new(),
            journal: Journal::new(vfs.total_files()),
            vfs,
            audio,
            settings,
            overlay: None,
        }
    }

    pub fn world(&self) -> &WorldState {
        self.sim.world()
    }

    pub fn state(&self) -> LoopState {
        self.sim.state()
    }

    pub fn sim(&self) -> &SimulationLoop<S> {
        &self.sim
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        self.sim.scheduler_mut()
    }

    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    pub fn vfs(&self) -> &Vfs {
        &self.vfs
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn overlay(&self) -> Option<&str> {
        self.overlay.as_deref()
    }

    /// Progress shown in the UI; the completion screen always reads 100%
    pub fn progress(&self) -> f32 {
        if self.world().final_screen {
            100.0
        } else {
            self.journal.progress()
        }
    }

    pub fn update_settings(&mut self, settings: Settings) {
        self.audio.apply_settings(&settings);
        settings.save();
        self.settings = settings;
    }

    pub fn start(&mut self) -> bool {
        let started = self.sim.start();
        self.dispatch_events();
        started
    }

    pub fn toggle_pause(&mut self) -> bool {
        let toggled = self.sim.toggle_pause();
        self.dispatch_events();
        toggled
    }

    /// Rebuild the world, the file tree and every collaborator's state
    pub fn reset(&mut self) {
        self.sim.reset();
        self.vfs = Vfs::initial();
        self.journal = Journal::new(self.vfs.total_files());
        self.assets.reset();
        self.overlay = None;
        self.dispatch_events();
    }

    pub fn on_frame(&mut self, handle: FrameHandle, now_ms: f64) -> bool {
        let stepped = self.sim.on_frame(handle, now_ms);
        self.dispatch_events();
        stepped
    }

    pub fn fade_tick(&mut self, dt: f32) {
        self.sim.fade_tick(dt);
    }

    pub fn key_down(&mut self, key: Key, repeat: bool) {
        self.sim.key_down(key, repeat);
        self.dispatch_events();
    }

    pub fn key_up(&mut self, key: Key) {
        self.sim.key_up(key);
    }

    /// Delete a file from the tree and let the world react.
    ///
    /// The consequence is applied only after the file is gone; on error
    /// nothing changes.
    pub fn delete_resource(
        &mut self,
        path: &str,
        timestamp_ms: f64,
    ) -> Result<Option<Consequence>, RemovalError> {
        if self.world().ritual_complete {
            log::warn!("Refusing to delete {} after collapse", path);
            return Err(RemovalError::Sealed);
        }
        if let Err(e) = self.vfs.remove(path) {
            log::warn!("Delete failed: {}", e);
            return Err(e);
        }

        log::info!("Deleted {}", path);
        self.audio.play(SoundCue::Delete);
        self.journal.record(path, timestamp_ms);
        let consequence = self.sim.apply_consequence(path);
        self.dispatch_events();
        Ok(consequence)
    }

    /// Route queued simulation side effects to their collaborators
    fn dispatch_events(&mut self) {
        for event in self.sim.drain_events() {
            match event {
                SimEvent::Notify(message) => self.overlay = Some(message),
                SimEvent::Sound(cue) => self.audio.play(cue),
                SimEvent::ThemePlay => self.audio.play_theme(),
                SimEvent::ThemeStop { rewind } => self.audio.stop_theme(rewind),
                SimEvent::AssetDeactivated(id) => self.assets.set_active(id, false),
                SimEvent::Collapsed => {
                    log::info!(
                        "Ritual complete after {} deletions",
                        self.journal.deleted()
                    );
                }
            }
        }
    }
}
