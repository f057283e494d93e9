//! Procedural audio cues for launches and bursts
//!
//! Sounds are described as data (`Voice`s: an oscillator or filtered noise
//! with a frequency sweep and a gain envelope) and handed to a backend that
//! realizes them. The backend is opened lazily on first use; if the platform
//! has no audio output every call is a silent no-op.

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

/// Volumes at or below this skip synthesis entirely
pub const MIN_AUDIBLE_VOLUME: f32 = 0.01;

/// Events that make noise
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundCue {
    /// Rocket leaves the ground
    Launch,
    /// Shell bursts; `size` is the configuration's explosion size
    Explosion { size: f32 },
}

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
}

/// Filter applied to white noise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseFilter {
    Lowpass,
    Bandpass,
    Highpass,
}

/// What a voice generates. Frequencies sweep exponentially from start to end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Source {
    Oscillator {
        waveform: Waveform,
        freq_start: f32,
        freq_end: f32,
    },
    Noise {
        filter: NoiseFilter,
        cutoff_start: f32,
        cutoff_end: f32,
        q: f32,
    },
}

/// One self-terminating generator chain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub source: Source,
    /// Seconds after the cue fires
    pub delay: f64,
    /// Linear rise to `peak`
    pub attack: f64,
    /// Total length; exponential fall after the attack
    pub duration: f64,
    /// Peak gain, already scaled by master volume
    pub peak: f32,
}

fn osc(waveform: Waveform, freq_start: f32, freq_end: f32) -> Source {
    Source::Oscillator {
        waveform,
        freq_start,
        freq_end,
    }
}

fn noise(filter: NoiseFilter, cutoff_start: f32, cutoff_end: f32, q: f32) -> Source {
    Source::Noise {
        filter,
        cutoff_start,
        cutoff_end,
        q,
    }
}

/// Voices for a cue at master volume `vol` in [0, 1]
pub fn voices(cue: SoundCue, vol: f32) -> Vec<Voice> {
    match cue {
        SoundCue::Launch => launch_voices(vol),
        SoundCue::Explosion { size } => explosion_voices(size, vol),
    }
}

/// Launch - low thump, rising whistle, airy hiss
fn launch_voices(vol: f32) -> Vec<Voice> {
    vec![
        // Mortar thump
        Voice {
            source: osc(Waveform::Sine, 110.0, 40.0),
            delay: 0.0,
            attack: 0.005,
            duration: 0.25,
            peak: vol * 0.5,
        },
        // Whistle climbing with the rocket
        Voice {
            source: osc(Waveform::Triangle, 500.0, 1800.0),
            delay: 0.03,
            attack: 0.08,
            duration: 0.9,
            peak: vol * 0.08,
        },
        // Air rushing past
        Voice {
            source: noise(NoiseFilter::Bandpass, 800.0, 3000.0, 0.8),
            delay: 0.0,
            attack: 0.05,
            duration: 0.7,
            peak: vol * 0.15,
        },
    ]
}

/// Explosion - sharp crack, boom scaled by size, long rumble tail
fn explosion_voices(size: f32, vol: f32) -> Vec<Voice> {
    let size = if size.is_finite() { size.clamp(0.1, 3.0) } else { 1.0 };
    let weight = size.clamp(0.3, 2.0);

    vec![
        // Crack transient
        Voice {
            source: noise(NoiseFilter::Highpass, 3000.0, 1500.0, 0.7),
            delay: 0.0,
            attack: 0.002,
            duration: 0.12,
            peak: vol * 0.45,
        },
        Voice {
            source: osc(Waveform::Square, 1400.0, 300.0),
            delay: 0.0,
            attack: 0.001,
            duration: 0.08,
            peak: vol * 0.1,
        },
        // Boom - bigger shells sit lower and louder
        Voice {
            source: osc(Waveform::Sine, 90.0 / weight.sqrt(), 30.0),
            delay: 0.005,
            attack: 0.01,
            duration: 0.8 + 0.4 * size as f64,
            peak: vol * 0.45 * weight,
        },
        // Rumble tail
        Voice {
            source: noise(NoiseFilter::Lowpass, 900.0, 120.0, 0.5),
            delay: 0.02,
            attack: 0.03,
            duration: 1.6 + 0.6 * size as f64,
            peak: vol * 0.3 * weight,
        },
    ]
}

/// A platform audio output
pub trait AudioBackend: Sized {
    /// Open the output; `None` if the platform has no audio capability
    fn open() -> Option<Self>;
    /// Resume a suspended output (user-gesture gated on the web)
    fn resume(&self);
    /// Schedule one voice; returns immediately
    fn schedule(&self, voice: &Voice);
    /// Release the output
    fn close(&self);
}

/// Backend for headless/native runs: always available, makes no sound
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn open() -> Option<Self> {
        Some(NullAudio)
    }

    fn resume(&self) {}

    fn schedule(&self, _voice: &Voice) {}

    fn close(&self) {}
}

/// Output lifecycle
#[derive(Debug)]
pub enum AudioState<B> {
    /// Not opened yet; the first cue or unlock opens it
    Uninitialized,
    Ready(B),
    /// Platform refused; stays silent
    Unavailable,
    /// Closed by `dispose`; only an explicit `init` reopens
    Disposed,
}

/// Owns the audio output and the master volume
#[derive(Debug)]
pub struct AudioManager<B: AudioBackend> {
    state: AudioState<B>,
    volume: f32,
}

impl<B: AudioBackend> Default for AudioManager<B> {
    fn default() -> Self {
        Self::new(0.7)
    }
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(volume: f32) -> Self {
        Self {
            state: AudioState::Uninitialized,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    /// Open the backend if it isn't already. Returns whether audio is usable.
    pub fn init(&mut self) -> bool {
        if matches!(self.state, AudioState::Uninitialized | AudioState::Disposed) {
            self.state = match B::open() {
                Some(backend) => {
                    log::info!("Audio output initialized");
                    AudioState::Ready(backend)
                }
                None => {
                    log::warn!("No audio output available - audio disabled");
                    AudioState::Unavailable
                }
            };
        }
        self.is_available()
    }

    /// Call from a user-gesture handler; safe to call repeatedly
    pub fn unlock(&mut self) {
        if self.init() {
            if let AudioState::Ready(backend) = &self.state {
                backend.resume();
            }
        }
    }

    /// Close the output
    pub fn dispose(&mut self) {
        if let AudioState::Ready(backend) = &self.state {
            backend.close();
            log::info!("Audio output closed");
        }
        if !matches!(self.state, AudioState::Unavailable) {
            self.state = AudioState::Disposed;
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state, AudioState::Ready(_))
    }

    pub fn state(&self) -> &AudioState<B> {
        &self.state
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Play a cue. Returns true if voices were scheduled.
    pub fn play(&mut self, cue: SoundCue) -> bool {
        if self.volume <= MIN_AUDIBLE_VOLUME {
            return false;
        }
        if matches!(self.state, AudioState::Uninitialized) {
            self.init();
        }
        let AudioState::Ready(backend) = &self.state else {
            return false;
        };

        for voice in voices(cue, self.volume) {
            backend.schedule(&voice);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    thread_local! {
        static OPENS: Cell<usize> = const { Cell::new(0) };
        static SCHEDULED: Cell<usize> = const { Cell::new(0) };
        static CLOSED: Cell<usize> = const { Cell::new(0) };
    }

    struct CountingAudio;

    impl AudioBackend for CountingAudio {
        fn open() -> Option<Self> {
            OPENS.with(|c| c.set(c.get() + 1));
            Some(CountingAudio)
        }
        fn resume(&self) {}
        fn schedule(&self, _voice: &Voice) {
            SCHEDULED.with(|c| c.set(c.get() + 1));
        }
        fn close(&self) {
            CLOSED.with(|c| c.set(c.get() + 1));
        }
    }

    struct NoAudio;

    impl AudioBackend for NoAudio {
        fn open() -> Option<Self> {
            None
        }
        fn resume(&self) {}
        fn schedule(&self, _voice: &Voice) {
            unreachable!("unavailable backend must never schedule");
        }
        fn close(&self) {}
    }

    #[test]
    fn test_lazy_init_on_first_cue() {
        let mut audio = AudioManager::<CountingAudio>::new(0.8);
        assert!(matches!(audio.state(), AudioState::Uninitialized));
        assert_eq!(OPENS.with(Cell::get), 0);

        assert!(audio.play(SoundCue::Launch));
        assert_eq!(OPENS.with(Cell::get), 1);
        assert_eq!(SCHEDULED.with(Cell::get), voices(SoundCue::Launch, 0.8).len());

        audio.unlock();
        audio.unlock();
        assert_eq!(OPENS.with(Cell::get), 1);
    }

    #[test]
    fn test_silent_below_threshold() {
        let mut audio = AudioManager::<CountingAudio>::new(0.005);
        assert!(!audio.play(SoundCue::Explosion { size: 1.0 }));
        assert_eq!(OPENS.with(Cell::get), 0);
        assert_eq!(SCHEDULED.with(Cell::get), 0);
    }

    #[test]
    fn test_missing_capability_degrades_silently() {
        let mut audio = AudioManager::<NoAudio>::new(1.0);
        audio.unlock();
        assert!(!audio.is_available());
        assert!(!audio.play(SoundCue::Launch));
        audio.dispose();
        assert!(matches!(audio.state(), AudioState::Unavailable));
    }

    #[test]
    fn test_dispose_closes_and_stops_playback() {
        let mut audio = AudioManager::<CountingAudio>::new(1.0);
        audio.unlock();
        audio.dispose();
        assert_eq!(CLOSED.with(Cell::get), 1);
        assert!(!audio.play(SoundCue::Launch));
        assert!(audio.init());
        assert!(audio.play(SoundCue::Launch));
    }

    #[test]
    fn test_gain_scales_linearly_with_volume() {
        for cue in [SoundCue::Launch, SoundCue::Explosion { size: 1.5 }] {
            let full = voices(cue, 1.0);
            let half = voices(cue, 0.5);
            assert_eq!(full.len(), half.len());
            for (a, b) in full.iter().zip(&half) {
                assert!((a.peak * 0.5 - b.peak).abs() < 1e-6);
                assert_eq!(a.duration, b.duration);
            }
        }
    }

    #[test]
    fn test_bigger_explosions_boom_longer_and_louder() {
        let small = voices(SoundCue::Explosion { size: 0.5 }, 1.0);
        let big = voices(SoundCue::Explosion { size: 2.0 }, 1.0);
        let boom = |v: &[Voice]| v[2];
        assert!(boom(&big).peak > boom(&small).peak);
        assert!(boom(&big).duration > boom(&small).duration);
        for v in voices(SoundCue::Explosion { size: f32::NAN }, 1.0) {
            assert!(v.peak.is_finite() && v.duration.is_finite());
        }
    }
}
