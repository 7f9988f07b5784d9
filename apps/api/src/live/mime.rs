//! MIME descriptor parsing for raw PCM fragments from the live backend.
//!
//! The live API labels audio chunks with descriptors like `audio/L16;rate=24000`
//! (linear PCM, 16 bits per sample, 24 kHz). This module turns that string into
//! the parameters the WAV encoder needs. Parsing is total: anything malformed
//! keeps the backend's canonical defaults (mono, 24 kHz, 16-bit).

/// Audio parameters extracted from a live-stream MIME descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioDescriptor {
    pub num_channels: u16,
    pub sample_rate_hz: u32,
    pub bits_per_sample: u16,
}

impl Default for AudioDescriptor {
    fn default() -> Self {
        AudioDescriptor {
            num_channels: 1,
            sample_rate_hz: 24_000,
            bits_per_sample: 16,
        }
    }
}

/// Parses a descriptor of the form `audio/L{bits};rate={hz}` into an
/// [`AudioDescriptor`]. Never fails: unparsable fields keep their defaults.
pub fn parse_audio_descriptor(mime_type: &str) -> AudioDescriptor {
    let mut descriptor = AudioDescriptor::default();

    let mut segments = mime_type.split(';').map(str::trim);

    if let Some(file_type) = segments.next() {
        // Subtype after the slash: "L16" in "audio/L16".
        if let Some(format) = file_type.split('/').nth(1) {
            if let Some(digits) = format.strip_prefix('L') {
                if let Ok(bits) = digits.parse::<u16>() {
                    descriptor.bits_per_sample = bits;
                }
            }
        }
    }

    for param in segments {
        let mut kv = param.splitn(2, '=').map(str::trim);
        if kv.next() == Some("rate") {
            if let Some(Ok(rate)) = kv.next().map(str::parse::<u32>) {
                descriptor.sample_rate_hz = rate;
            }
        }
    }

    descriptor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string_yields_defaults() {
        assert_eq!(parse_audio_descriptor(""), AudioDescriptor::default());
    }

    #[test]
    fn test_garbage_yields_defaults() {
        assert_eq!(parse_audio_descriptor("garbage"), AudioDescriptor::default());
    }

    #[test]
    fn test_canonical_descriptor() {
        let d = parse_audio_descriptor("audio/L16;rate=24000");
        assert_eq!(d.num_channels, 1);
        assert_eq!(d.sample_rate_hz, 24_000);
        assert_eq!(d.bits_per_sample, 16);
    }

    #[test]
    fn test_extracts_bits_and_rate() {
        let d = parse_audio_descriptor("audio/L24;rate=48000");
        assert_eq!(d.num_channels, 1);
        assert_eq!(d.sample_rate_hz, 48_000);
        assert_eq!(d.bits_per_sample, 24);
    }

    #[test]
    fn test_whitespace_around_segments_is_trimmed() {
        let d = parse_audio_descriptor("audio/L16 ; rate = 16000");
        assert_eq!(d.sample_rate_hz, 16_000);
    }

    #[test]
    fn test_unparsable_bits_keeps_default() {
        let d = parse_audio_descriptor("audio/Labc;rate=48000");
        assert_eq!(d.bits_per_sample, 16);
        assert_eq!(d.sample_rate_hz, 48_000);
    }

    #[test]
    fn test_unparsable_rate_keeps_default() {
        let d = parse_audio_descriptor("audio/L24;rate=fast");
        assert_eq!(d.bits_per_sample, 24);
        assert_eq!(d.sample_rate_hz, 24_000);
    }

    #[test]
    fn test_non_audio_subtype_without_l_prefix() {
        let d = parse_audio_descriptor("audio/mpeg;rate=44100");
        assert_eq!(d.bits_per_sample, 16);
        assert_eq!(d.sample_rate_hz, 44_100);
    }
}
