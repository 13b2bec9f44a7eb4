//! WAV encoder — serializes decoded audio to a canonical 16-bit PCM WAV buffer.

use log::debug;

use crate::audio::DecodedAudio;

/// Size of the canonical RIFF/WAVE header written by `encode`.
pub const HEADER_LEN: usize = 44;

const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: u32 = (BITS_PER_SAMPLE / 8) as u32;
const PCM_FORMAT: u16 = 1;
const FMT_CHUNK_LEN: u32 = 16;

/// A complete WAV file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavContainer {
    bytes: Vec<u8>,
}

impl WavContainer {
    pub const MIME_TYPE: &'static str = "audio/wav";

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Total file size in bytes, header included.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Length of the sample data following the header.
    pub fn data_len(&self) -> usize {
        self.bytes.len() - HEADER_LEN
    }

    pub fn header(&self) -> Option<WavHeader> {
        WavHeader::parse(&self.bytes)
    }
}

/// Encode `audio` as 16-bit PCM WAV.
///
/// Samples are interleaved frame by frame, clamped to [-1, 1] and
/// quantized with `quantize_sample`. Zero frames still yields a valid
/// 44-byte header.
pub fn encode(audio: &DecodedAudio) -> WavContainer {
    let channels = audio.channel_count();
    let sample_count = audio.frame_count() * channels as usize;

    let mut buf = Vec::with_capacity(HEADER_LEN + sample_count * BYTES_PER_SAMPLE as usize);
    write_header(&mut buf, audio.sample_rate(), channels, sample_count);

    for i in 0..audio.frame_count() {
        for ch in audio.channels() {
            buf.extend_from_slice(&quantize_sample(ch[i]).to_le_bytes());
        }
    }

    debug!(
        "encoded {} frames x {} channels @ {} Hz into {} bytes",
        audio.frame_count(),
        channels,
        audio.sample_rate(),
        buf.len()
    );
    WavContainer { bytes: buf }
}

/// Header-only WAV with no sample data, used as a fallback artifact when
/// an upstream stage fails.
pub fn empty_container(sample_rate: u32, channels: u16) -> WavContainer {
    let mut buf = Vec::with_capacity(HEADER_LEN);
    write_header(&mut buf, sample_rate, channels, 0);
    WavContainer { bytes: buf }
}

/// Convert one float sample to signed 16-bit PCM.
///
/// Negative values scale by 32768 and positive values by 32767 so that
/// both -1.0 and 1.0 land on full scale. Rounds half away from zero.
pub fn quantize_sample(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0).round() as i16
    } else {
        // NaN lands here and saturates to 0
        (s * 32767.0).round() as i16
    }
}

/// Flatten planar audio into channel-minor interleaved order.
pub fn interleave(audio: &DecodedAudio) -> Vec<f32> {
    let mut out = Vec::with_capacity(audio.frame_count() * audio.channel_count() as usize);
    for i in 0..audio.frame_count() {
        for ch in audio.channels() {
            out.push(ch[i]);
        }
    }
    out
}

fn write_header(buf: &mut Vec<u8>, sample_rate: u32, channels: u16, sample_count: usize) {
    // Header fields saturate; values past their width cannot be described
    let byte_rate = sample_rate
        .saturating_mul(channels as u32)
        .saturating_mul(BYTES_PER_SAMPLE);
    let block_align = channels.saturating_mul(BYTES_PER_SAMPLE as u16);
    let data_size = u32::try_from(sample_count * BYTES_PER_SAMPLE as usize).unwrap_or(u32::MAX);
    let file_size = data_size.saturating_add(36);

    // RIFF header
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    // fmt chunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
    buf.extend_from_slice(&PCM_FORMAT.to_le_bytes());
    buf.extend_from_slice(&channels.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    // data chunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
}

/// Fields of a canonical 44-byte PCM header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub riff_size: u32,
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_size: u32,
}

impl WavHeader {
    /// Read back a header in the exact layout `encode` writes.
    /// Returns `None` if the chunk IDs are not where they should be.
    pub fn parse(bytes: &[u8]) -> Option<WavHeader> {
        if bytes.len() < HEADER_LEN {
            return None;
        }
        if &bytes[0..4] != b"RIFF"
            || &bytes[8..12] != b"WAVE"
            || &bytes[12..16] != b"fmt "
            || &bytes[36..40] != b"data"
        {
            return None;
        }
        let u16_at = |o: usize| u16::from_le_bytes([bytes[o], bytes[o + 1]]);
        let u32_at =
            |o: usize| u32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]]);
        Some(WavHeader {
            riff_size: u32_at(4),
            audio_format: u16_at(20),
            channels: u16_at(22),
            sample_rate: u32_at(24),
            byte_rate: u32_at(28),
            block_align: u16_at(32),
            bits_per_sample: u16_at(34),
            data_size: u32_at(40),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono(sample_rate: u32, samples: Vec<f32>) -> DecodedAudio {
        DecodedAudio::new(sample_rate, vec![samples]).unwrap()
    }

    fn sample_at(wav: &WavContainer, index: usize) -> i16 {
        let b = wav.as_bytes();
        let o = HEADER_LEN + index * 2;
        i16::from_le_bytes([b[o], b[o + 1]])
    }

    #[test]
    fn wav_header_valid() {
        let wav = encode(&mono(8000, vec![0.0]));
        let b = wav.as_bytes();

        assert_eq!(&b[0..4], &[0x52, 0x49, 0x46, 0x46]);
        assert_eq!(&b[8..12], &[0x57, 0x41, 0x56, 0x45]);
        assert_eq!(&b[12..16], b"fmt ");
        assert_eq!(&b[20..22], &[0x01, 0x00]);
        assert_eq!(&b[22..24], &[0x01, 0x00]);
        assert_eq!(&b[36..40], b"data");
        assert_eq!(&b[44..46], &[0x00, 0x00]);
        assert_eq!(b.len(), 46);
    }

    #[test]
    fn header_fields_stereo() {
        let audio = DecodedAudio::silence(44100, 2, 10).unwrap();
        let header = encode(&audio).header().unwrap();
        assert_eq!(
            header,
            WavHeader {
                riff_size: 36 + 40,
                audio_format: 1,
                channels: 2,
                sample_rate: 44100,
                byte_rate: 44100 * 2 * 2,
                block_align: 4,
                bits_per_sample: 16,
                data_size: 40,
            }
        );
    }

    #[test]
    fn wav_size_correct() {
        for (frames, channels) in [(0usize, 1u16), (1, 1), (7, 2), (100, 6)] {
            let audio = DecodedAudio::silence(48000, channels, frames).unwrap();
            let wav = encode(&audio);
            let expected_data = frames * channels as usize * 2;
            assert_eq!(wav.len(), 44 + expected_data);
            assert_eq!(wav.data_len(), expected_data);
            assert_eq!(wav.header().unwrap().riff_size as usize, 36 + expected_data);
        }
    }

    #[test]
    fn oversized_rate_fields_saturate() {
        let header = empty_container(u32::MAX, 40000).header().unwrap();
        assert_eq!(header.byte_rate, u32::MAX);
        assert_eq!(header.block_align, u16::MAX);
        assert_eq!(header.channels, 40000);
    }

    #[test]
    fn wide_channel_count_keeps_size_law() {
        let audio = DecodedAudio::silence(8000, u16::MAX, 1).unwrap();
        let wav = encode(&audio);
        let header = wav.header().unwrap();
        assert_eq!(header.channels, u16::MAX);
        assert_eq!(header.data_size as usize, u16::MAX as usize * 2);
        assert_eq!(wav.data_len(), header.data_size as usize);
    }

    #[test]
    fn zero_frames_header_only() {
        let wav = encode(&DecodedAudio::silence(22050, 2, 0).unwrap());
        assert_eq!(wav.len(), 44);
        assert_eq!(wav.header().unwrap().data_size, 0);
        assert_eq!(wav, empty_container(22050, 2));
    }

    #[test]
    fn full_scale_amplitudes() {
        let wav = encode(&mono(8000, vec![1.0, -1.0]));
        assert_eq!(sample_at(&wav, 0), 32767);
        assert_eq!(&wav.as_bytes()[44..46], &[0xFF, 0x7F]);
        assert_eq!(sample_at(&wav, 1), -32768);
        assert_eq!(&wav.as_bytes()[46..48], &[0x00, 0x80]);
    }

    #[test]
    fn half_scale_rounds_away_from_zero() {
        // 0.5 * 32767 = 16383.5 rounds up; -0.5 * 32768 is exact
        assert_eq!(quantize_sample(0.5), 16384);
        assert_eq!(quantize_sample(-0.5), -16384);
        assert_eq!(quantize_sample(0.25), 8192);
        assert_eq!(quantize_sample(-0.25), -8192);
    }

    #[test]
    fn out_of_range_clamps() {
        let hot = encode(&mono(8000, vec![1.5, -3.0]));
        let full = encode(&mono(8000, vec![1.0, -1.0]));
        assert_eq!(hot, full);
        assert_eq!(quantize_sample(f32::INFINITY), 32767);
        assert_eq!(quantize_sample(f32::NEG_INFINITY), -32768);
        assert_eq!(quantize_sample(f32::NAN), 0);
    }

    #[test]
    fn interleaves_frame_by_frame() {
        let (a, b, c, d) = (0.1, 0.2, -0.3, -0.4);
        let audio = DecodedAudio::new(8000, vec![vec![a, b], vec![c, d]]).unwrap();
        assert_eq!(interleave(&audio), vec![a, c, b, d]);

        let wav = encode(&audio);
        let got: Vec<i16> = (0..4).map(|i| sample_at(&wav, i)).collect();
        let want: Vec<i16> = [a, c, b, d].iter().map(|&s| quantize_sample(s)).collect();
        assert_eq!(got, want);
    }

    #[test]
    fn encode_is_deterministic() {
        let audio = DecodedAudio::new(
            44100,
            vec![vec![0.3, -0.7, 0.999], vec![-1.2, 0.0, 0.5]],
        )
        .unwrap();
        assert_eq!(encode(&audio).into_bytes(), encode(&audio).into_bytes());
    }

    #[test]
    fn one_second_of_silence() {
        let audio = DecodedAudio::silence(44100, 1, 44100).unwrap();
        let wav = encode(&audio);
        assert_eq!(wav.len(), 88244);
        assert!(wav.as_bytes()[44..].iter().all(|&b| b == 0));
    }

    #[test]
    fn parse_rejects_foreign_bytes() {
        assert!(WavHeader::parse(b"RIFF").is_none());
        let mut bytes = encode(&mono(8000, vec![0.0])).into_bytes();
        bytes[8..12].copy_from_slice(b"AVI ");
        assert!(WavHeader::parse(&bytes).is_none());
    }
}
