//! Minimal WAV container encoding for raw synthesis output.
//!
//! The speech model returns headerless mono 16-bit PCM; browsers need a
//! playable container, so the samples are wrapped in a canonical 44-byte
//! RIFF/WAVE header.

use std::sync::OnceLock;

use regex::Regex;

const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;

/// Wrap mono 16-bit PCM sample bytes in a WAV header at the given rate.
pub fn pcm_to_wav(pcm: &[u8], sample_rate: u32) -> Vec<u8> {
    let byte_rate = sample_rate * u32::from(CHANNELS) * u32::from(BITS_PER_SAMPLE) / 8;
    let block_align = CHANNELS * BITS_PER_SAMPLE / 8;
    let data_len = pcm.len() as u32;

    let mut wav = Vec::with_capacity(44 + pcm.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    wav.extend_from_slice(&CHANNELS.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.extend_from_slice(pcm);
    wav
}

/// Sample rate declared in the audio MIME parameters (`rate=<N>`), if any.
pub fn sample_rate_from_mime(mime_type: &str) -> Option<u32> {
    static RATE: OnceLock<Regex> = OnceLock::new();
    let re = RATE.get_or_init(|| Regex::new(r"rate=(\d+)").expect("valid rate pattern"));
    re.captures(mime_type)?.get(1)?.as_str().parse().ok()
}
