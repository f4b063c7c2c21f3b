/// Procedural 8-bit style sound effects via rodio.
///
/// Every effect is synthesized once at init into an in-memory WAV
/// buffer; playback detaches a Sink per play so nothing ever blocks
/// the turn loop.
///
/// Building without the "sound" feature swaps in a stub engine whose
/// methods are no-ops, keeping the call sites unconditional.

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_coin: Arc<Vec<u8>>,
        sfx_item: Arc<Vec<u8>>,
        sfx_warp: Arc<Vec<u8>>,
        sfx_door: Arc<Vec<u8>>,
        sfx_boss_hit: Arc<Vec<u8>>,
        sfx_victory: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;

            // ── Generate all sound buffers ──
            let sfx_coin = Arc::new(make_wav(&gen_coin()));
            let sfx_item = Arc::new(make_wav(&gen_item()));
            let sfx_warp = Arc::new(make_wav(&gen_warp()));
            let sfx_door = Arc::new(make_wav(&gen_door()));
            let sfx_boss_hit = Arc::new(make_wav(&gen_boss_hit()));
            let sfx_victory = Arc::new(make_wav(&gen_victory()));

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_coin,
                sfx_item,
                sfx_warp,
                sfx_door,
                sfx_boss_hit,
                sfx_victory,
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        pub fn play_coin(&self) { self.play(&self.sfx_coin); }
        pub fn play_item(&self) { self.play(&self.sfx_item); }
        pub fn play_warp(&self) { self.play(&self.sfx_warp); }
        pub fn play_door(&self) { self.play(&self.sfx_door); }
        pub fn play_boss_hit(&self) { self.play(&self.sfx_boss_hit); }
        pub fn play_victory(&self) { self.play(&self.sfx_victory); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators — all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    fn tone(samples: &mut Vec<f32>, freq: f32, duration: f32, volume: f32) {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32).powf(0.5);
            // Square-ish wave (sine + 3rd harmonic) for retro feel
            let wave = (t * freq * 2.0 * std::f32::consts::PI).sin() * 0.7
                + (t * freq * 3.0 * 2.0 * std::f32::consts::PI).sin() * 0.3;
            samples.push(wave * env * volume);
        }
    }

    /// Coin: quick ascending arpeggio C6→E6→G6
    fn gen_coin() -> Vec<f32> {
        let mut samples = Vec::new();
        for &freq in &[1047.0_f32, 1319.0, 1568.0] {
            tone(&mut samples, freq, 0.045, 0.25);
        }
        samples
    }

    /// Item: two-note chime G5→C6, a bit rounder than the coin
    fn gen_item() -> Vec<f32> {
        let mut samples = Vec::new();
        tone(&mut samples, 784.0, 0.08, 0.3);
        tone(&mut samples, 1047.0, 0.15, 0.3);
        samples
    }

    /// Warp: rising pitch sweep with a wobble — the pipe ride
    fn gen_warp() -> Vec<f32> {
        let duration = 0.22;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let freq = 220.0 + t * 880.0; // 220Hz → 1100Hz
                let wobble = (ti * 30.0 * 2.0 * std::f32::consts::PI).sin() * 40.0;
                let env = (1.0 - t).powf(0.4);
                (ti * (freq + wobble) * 2.0 * std::f32::consts::PI).sin() * env * 0.25
            })
            .collect()
    }

    /// Door: short descending two-step, the level swap
    fn gen_door() -> Vec<f32> {
        let mut samples = Vec::new();
        tone(&mut samples, 523.0, 0.07, 0.25);
        tone(&mut samples, 392.0, 0.12, 0.25);
        samples
    }

    /// Boss hit: low thud with noise
    fn gen_boss_hit() -> Vec<f32> {
        let duration = 0.14;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 987654;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let freq = 160.0 - t * 60.0;
                let thud = (ti * freq * 2.0 * std::f32::consts::PI).sin();
                // Simple LCG noise
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let env = (1.0 - t).powf(0.7);
                (thud * 0.7 + noise * 0.3) * env * 0.35
            })
            .collect()
    }

    /// Victory: ascending fanfare with a sustained top note
    fn gen_victory() -> Vec<f32> {
        let mut samples = Vec::new();
        for &freq in &[523.0_f32, 659.0, 784.0] {
            tone(&mut samples, freq, 0.1, 0.3);
        }
        // Sustain the top C
        let n = (SAMPLE_RATE as f32 * 0.3) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32);
            let wave = (t * 1047.0 * 2.0 * std::f32::consts::PI).sin();
            samples.push(wave * env * 0.3);
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder — wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2; // 16-bit = 2 bytes per sample
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM format
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let clamped = s.max(-1.0).min(1.0);
            let val = (clamped * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API — compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_coin(&self) {}
    pub fn play_item(&self) {}
    pub fn play_warp(&self) {}
    pub fn play_door(&self) {}
    pub fn play_boss_hit(&self) {}
    pub fn play_victory(&self) {}
}
