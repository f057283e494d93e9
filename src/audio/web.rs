//! Web Audio API backend
//!
//! Each voice becomes its own node chain (source -> [filter] -> gain ->
//! destination) that stops itself after its duration.

use web_sys::{
    AudioBuffer, AudioContext, AudioContextState, BiquadFilterType, GainNode, OscillatorType,
};

use super::{AudioBackend, NoiseFilter, Source, Voice, Waveform};

/// Length of the shared white-noise buffer (looped)
const NOISE_SECONDS: f32 = 1.0;
/// Web Audio exponential ramps can't reach zero
const SILENCE: f32 = 0.0001;

pub struct WebAudio {
    ctx: AudioContext,
    noise: AudioBuffer,
}

impl WebAudio {
    fn noise_buffer(ctx: &AudioContext) -> Option<AudioBuffer> {
        let rate = ctx.sample_rate();
        let len = (rate * NOISE_SECONDS) as u32;
        let buffer = ctx.create_buffer(1, len, rate).ok()?;
        let mut samples: Vec<f32> = (0..len).map(|_| rand::random::<f32>() * 2.0 - 1.0).collect();
        buffer.copy_to_channel(&mut samples, 0).ok()?;
        Some(buffer)
    }

    /// Gain node with attack/decay envelope, wired to the destination
    fn envelope(&self, voice: &Voice, t: f64) -> Option<GainNode> {
        let gain = self.ctx.create_gain().ok()?;
        let param = gain.gain();
        param.set_value_at_time(SILENCE, t).ok();
        param
            .linear_ramp_to_value_at_time(voice.peak.max(SILENCE), t + voice.attack)
            .ok();
        param
            .exponential_ramp_to_value_at_time(SILENCE, t + voice.duration)
            .ok();
        gain.connect_with_audio_node(&self.ctx.destination()).ok()?;
        Some(gain)
    }

    fn schedule_oscillator(
        &self,
        waveform: Waveform,
        freq_start: f32,
        freq_end: f32,
        gain: &GainNode,
        t: f64,
        end: f64,
    ) -> Option<()> {
        let osc = self.ctx.create_oscillator().ok()?;
        osc.set_type(match waveform {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Triangle => OscillatorType::Triangle,
            Waveform::Square => OscillatorType::Square,
        });
        osc.frequency().set_value_at_time(freq_start, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(freq_end, end)
            .ok();
        osc.connect_with_audio_node(gain).ok()?;
        osc.start_with_when(t).ok();
        osc.stop_with_when(end + 0.05).ok();
        Some(())
    }

    fn schedule_noise(
        &self,
        filter_kind: NoiseFilter,
        cutoff_start: f32,
        cutoff_end: f32,
        q: f32,
        gain: &GainNode,
        t: f64,
        end: f64,
    ) -> Option<()> {
        let src = self.ctx.create_buffer_source().ok()?;
        src.set_buffer(Some(&self.noise));
        src.set_loop(true);

        let filter = self.ctx.create_biquad_filter().ok()?;
        filter.set_type(match filter_kind {
            NoiseFilter::Lowpass => BiquadFilterType::Lowpass,
            NoiseFilter::Bandpass => BiquadFilterType::Bandpass,
            NoiseFilter::Highpass => BiquadFilterType::Highpass,
        });
        filter.q().set_value(q);
        filter.frequency().set_value_at_time(cutoff_start, t).ok();
        filter
            .frequency()
            .exponential_ramp_to_value_at_time(cutoff_end, end)
            .ok();

        src.connect_with_audio_node(&filter).ok()?;
        filter.connect_with_audio_node(gain).ok()?;
        src.start_with_when(t).ok();
        src.stop_with_when(end + 0.05).ok();
        Some(())
    }
}

impl AudioBackend for WebAudio {
    fn open() -> Option<Self> {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok()?;
        let noise = Self::noise_buffer(&ctx)?;
        Some(Self { ctx, noise })
    }

    fn resume(&self) {
        if self.ctx.state() == AudioContextState::Suspended {
            let _ = self.ctx.resume();
        }
    }

    fn schedule(&self, voice: &Voice) {
        let t = self.ctx.current_time() + voice.delay;
        let end = t + voice.duration;
        let Some(gain) = self.envelope(voice, t) else {
            return;
        };

        let scheduled = match voice.source {
            Source::Oscillator {
                waveform,
                freq_start,
                freq_end,
            } => self.schedule_oscillator(waveform, freq_start, freq_end, &gain, t, end),
            Source::Noise {
                filter,
                cutoff_start,
                cutoff_end,
                q,
            } => self.schedule_noise(filter, cutoff_start, cutoff_end, q, &gain, t, end),
        };
        if scheduled.is_none() {
            log::debug!("Dropped voice {:?}", voice.source);
        }
    }

    fn close(&self) {
        let _ = self.ctx.close();
    }
}
