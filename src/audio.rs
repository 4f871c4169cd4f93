//! Audio collaborator
//!
//! The simulation only fires cues; an [`AudioSink`] decides what they sound
//! like. The web build synthesises everything with the Web Audio API except
//! the looping theme, which streams from a file.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::settings::Settings;
use crate::sim::SoundCue;

/// Receives fire-and-forget audio requests
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
    fn play_theme(&mut self);
    fn stop_theme(&mut self, rewind: bool);
    fn apply_settings(&mut self, _settings: &Settings) {}
}

/// Silent sink for native builds and tests
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: SoundCue) {}
    fn play_theme(&mut self) {}
    fn stop_theme(&mut self, _rewind: bool) {}
}

/// Shape of a fading white-noise burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseBurst {
    /// Seconds
    pub duration: f32,
    /// Peak sample amplitude
    pub amplitude: f32,
    /// Output gain applied on top
    pub gain: f32,
}

impl NoiseBurst {
    pub const DELETE: Self = Self {
        duration: 0.12,
        amplitude: 0.4,
        gain: 0.25,
    };

    pub const GLITCH: Self = Self {
        duration: 0.3,
        amplitude: 0.6,
        gain: 0.3,
    };

    pub fn for_cue(cue: SoundCue) -> Option<Self> {
        match cue {
            SoundCue::Delete => Some(Self::DELETE),
            SoundCue::Glitch => Some(Self::GLITCH),
            SoundCue::Jump => None,
        }
    }

    /// Render the burst: uniform noise under a linear fade to silence
    pub fn samples(&self, rng: &mut Pcg32, sample_rate: f32) -> Vec<f32> {
        let len = (sample_rate * self.duration).max(0.0) as usize;
        (0..len)
            .map(|i| {
                let fade = 1.0 - i as f32 / len as f32;
                rng.random_range(-1.0..1.0) * fade * self.amplitude
            })
            .collect()
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorType};

    use super::{AudioSink, NoiseBurst};
    use crate::settings::Settings;
    use crate::sim::SoundCue;

    const THEME_SRC: &str = "assets/audio/theme.mp3";

    /// Web Audio backend
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        master: Option<GainNode>,
        theme: Option<HtmlAudioElement>,
        theme_playing: bool,
        rng: Pcg32,
        sfx_volume: f32,
    }

    impl WebAudio {
        pub fn new(settings: &Settings, seed: u64) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - effects disabled");
            }
            let master = ctx.as_ref().and_then(|ctx| {
                let gain = ctx.create_gain().ok()?;
                gain.connect_with_audio_node(&ctx.destination()).ok()?;
                Some(gain)
            });
            let mut audio = Self {
                ctx,
                master,
                theme: None,
                theme_playing: false,
                rng: Pcg32::seed_from_u64(seed),
                sfx_volume: 1.0,
            };
            audio.apply_settings(settings);
            audio
        }

        /// Resume audio context (required after user gesture)
        fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
        }

        fn theme_element(&mut self) -> Option<&HtmlAudioElement> {
            if self.theme.is_none() {
                let element = HtmlAudioElement::new_with_src(THEME_SRC).ok()?;
                element.set_loop(true);
                element.set_preload("auto");
                self.theme = Some(element);
            }
            self.theme.as_ref()
        }

        /// Rising square chirp
        fn play_jump(&self, ctx: &AudioContext, master: &GainNode) -> Option<()> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;
            osc.set_type(OscillatorType::Square);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(master).ok()?;

            let t = ctx.current_time();
            gain.gain().set_value_at_time(0.3 * self.sfx_volume, t).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + 0.3)
                .ok()?;
            osc.frequency().set_value_at_time(440.0, t).ok()?;
            osc.frequency()
                .exponential_ramp_to_value_at_time(880.0, t + 0.3)
                .ok()?;
            osc.start().ok()?;
            osc.stop_with_when(t + 0.32).ok()
        }

        fn play_noise(&mut self, burst: NoiseBurst) -> Option<()> {
            let ctx = self.ctx.as_ref()?;
            let master = self.master.as_ref()?;
            let sample_rate = ctx.sample_rate();
            let mut samples = burst.samples(&mut self.rng, sample_rate);
            if samples.is_empty() {
                return None;
            }

            let buffer = ctx
                .create_buffer(1, samples.len() as u32, sample_rate)
                .ok()?;
            buffer.copy_to_channel(&mut samples, 0).ok()?;
            let source = ctx.create_buffer_source().ok()?;
            source.set_buffer(Some(&buffer));
            let gain = ctx.create_gain().ok()?;
            gain.gain().set_value(burst.gain * self.sfx_volume);
            source.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(master).ok()?;
            source.start().ok()
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, cue: SoundCue) {
            self.resume();
            let played = match NoiseBurst::for_cue(cue) {
                Some(burst) => self.play_noise(burst),
                None => match (&self.ctx, &self.master) {
                    (Some(ctx), Some(master)) => self.play_jump(ctx, master),
                    _ => None,
                },
            };
            if played.is_none() {
                log::debug!("Cue {:?} not played", cue);
            }
        }

        fn play_theme(&mut self) {
            self.resume();
            let Some(element) = self.theme_element() else {
                log::warn!("Theme element unavailable");
                return;
            };
            // Autoplay may be refused until the first user gesture
            let _ = element.play();
            self.theme_playing = true;
        }

        fn stop_theme(&mut self, rewind: bool) {
            if let Some(element) = &self.theme {
                let _ = element.pause();
                if rewind {
                    element.set_current_time(0.0);
                }
            }
            self.theme_playing = false;
        }

        fn apply_settings(&mut self, settings: &Settings) {
            if let Some(master) = &self.master {
                master.gain().set_value(settings.master_volume);
            }
            if let Some(theme) = self.theme_element() {
                theme.set_volume(settings.music_volume as f64);
            }
            self.sfx_volume = settings.sfx_volume;
        }
    }
}
