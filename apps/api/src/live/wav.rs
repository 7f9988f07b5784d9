//! WAV encoder — re-containerizes raw PCM fragments from a live turn into a
//! playable RIFF/WAVE buffer.
//!
//! The live backend streams headerless PCM chunks (base64, labeled with an
//! `audio/L16;rate=24000` style descriptor). Browsers cannot play raw PCM, so
//! the orchestrator wraps the concatenated samples in a canonical 44-byte WAV
//! header before handing them to the client.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use bytes::{BufMut, BytesMut};

use crate::errors::AppError;
use crate::live::mime::AudioDescriptor;

const WAV_HEADER_LEN: usize = 44;
/// Size of the `fmt ` subchunk body for plain PCM.
const FMT_CHUNK_LEN: u32 = 16;
/// WAVE audio format tag for uncompressed PCM.
const PCM_FORMAT: u16 = 1;

/// Encodes an ordered sequence of base64 PCM fragments into a WAV buffer.
///
/// Returns `Ok(None)` when no fragments were collected — the turn simply
/// produced no audio. Fragment order is significant: the chunks are sequential
/// samples of one utterance, so they are concatenated exactly in arrival order.
///
/// A fragment that is not valid base64 indicates a corrupt upstream stream and
/// fails the whole turn with [`AppError::Encoding`].
pub fn encode_wav(
    fragments: &[String],
    descriptor: &AudioDescriptor,
) -> Result<Option<Vec<u8>>, AppError> {
    if fragments.is_empty() {
        return Ok(None);
    }

    let decoded: Vec<Vec<u8>> = fragments
        .iter()
        .map(|fragment| {
            BASE64
                .decode(fragment)
                .map_err(|e| AppError::Encoding(format!("invalid base64 audio fragment: {e}")))
        })
        .collect::<Result<_, _>>()?;

    // The header embeds the data length; compute it from the fragments before
    // concatenating so a mismatch cannot slip in.
    let data_length = checked_data_length(decoded.iter().map(Vec::len))?;

    let mut buffer = BytesMut::with_capacity(WAV_HEADER_LEN + data_length as usize);
    write_wav_header(&mut buffer, data_length, descriptor);
    for chunk in &decoded {
        buffer.put_slice(chunk);
    }

    Ok(Some(buffer.to_vec()))
}

/// Sums decoded fragment lengths without overflow. The RIFF `data` chunk size
/// is a u32 field, so anything larger cannot be containerized.
fn checked_data_length(lengths: impl Iterator<Item = usize>) -> Result<u32, AppError> {
    let total: u64 = lengths.map(|len| len as u64).sum();
    u32::try_from(total).map_err(|_| {
        AppError::Encoding(format!(
            "decoded audio too large for a WAV container: {total} bytes"
        ))
    })
}

/// Writes the canonical 44-byte RIFF/WAVE header for PCM data of `data_length`
/// bytes. All multi-byte fields are little-endian.
fn write_wav_header(buffer: &mut BytesMut, data_length: u32, descriptor: &AudioDescriptor) {
    let AudioDescriptor {
        num_channels,
        sample_rate_hz,
        bits_per_sample,
    } = *descriptor;

    let byte_rate = sample_rate_hz * u32::from(num_channels) * u32::from(bits_per_sample) / 8;
    let block_align = num_channels * bits_per_sample / 8;

    buffer.put_slice(b"RIFF");
    buffer.put_u32_le(36 + data_length);
    buffer.put_slice(b"WAVE");
    buffer.put_slice(b"fmt ");
    buffer.put_u32_le(FMT_CHUNK_LEN);
    buffer.put_u16_le(PCM_FORMAT);
    buffer.put_u16_le(num_channels);
    buffer.put_u32_le(sample_rate_hz);
    buffer.put_u32_le(byte_rate);
    buffer.put_u16_le(block_align);
    buffer.put_u16_le(bits_per_sample);
    buffer.put_slice(b"data");
    buffer.put_u32_le(data_length);
}
