//! Decoded audio — planar multi-channel f32 samples at a fixed sample rate.
//!
//! Produced once per loaded file by a decoder and read-only afterwards.
//! Every conversion stage returns a fresh value instead of mutating one.

use crate::error::AudioError;

/// Immutable planar audio buffer.
///
/// Samples are nominally in [-1.0, 1.0] but are not clamped here;
/// decoders may hand back hot material and the WAV encoder clamps.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl DecodedAudio {
    /// Build from one sample vector per channel. All channels must have
    /// the same number of frames.
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self, AudioError> {
        // NumChannels is a 16-bit header field
        if channels.is_empty() || channels.len() > u16::MAX as usize {
            return Err(AudioError::InvalidChannelCount);
        }
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate);
        }
        let expected = channels[0].len();
        if let Some((channel, ch)) = channels
            .iter()
            .enumerate()
            .find(|(_, ch)| ch.len() != expected)
        {
            return Err(AudioError::ChannelLengthMismatch {
                channel,
                expected,
                found: ch.len(),
            });
        }
        Ok(DecodedAudio {
            sample_rate,
            channels,
        })
    }

    /// Build from interleaved samples. A trailing partial frame is dropped.
    pub fn from_interleaved(
        sample_rate: u32,
        channel_count: u16,
        samples: &[f32],
    ) -> Result<Self, AudioError> {
        if channel_count == 0 {
            return Err(AudioError::InvalidChannelCount);
        }
        let n = channel_count as usize;
        let frames = samples.len() / n;
        let mut channels = vec![Vec::with_capacity(frames); n];
        for frame in samples.chunks_exact(n) {
            for (ch, &s) in channels.iter_mut().zip(frame) {
                ch.push(s);
            }
        }
        Self::new(sample_rate, channels)
    }

    /// All-zero audio of the given shape.
    pub fn silence(
        sample_rate: u32,
        channel_count: u16,
        frame_count: usize,
    ) -> Result<Self, AudioError> {
        Self::new(
            sample_rate,
            vec![vec![0.0; frame_count]; channel_count as usize],
        )
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }

    /// Samples per channel.
    pub fn frame_count(&self) -> usize {
        self.channels[0].len()
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Playback length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_channels() {
        assert_eq!(
            DecodedAudio::new(44100, vec![]),
            Err(AudioError::InvalidChannelCount)
        );
        assert_eq!(
            DecodedAudio::from_interleaved(44100, 0, &[0.0, 0.0]),
            Err(AudioError::InvalidChannelCount)
        );
    }

    #[test]
    fn rejects_more_channels_than_a_header_can_hold() {
        assert_eq!(
            DecodedAudio::new(8000, vec![vec![0.0]; 65537]),
            Err(AudioError::InvalidChannelCount)
        );
        let widest = DecodedAudio::new(8000, vec![vec![0.0]; 65535]).unwrap();
        assert_eq!(widest.channel_count(), u16::MAX);
    }

    #[test]
    fn rejects_zero_sample_rate() {
        assert_eq!(
            DecodedAudio::new(0, vec![vec![0.0]]),
            Err(AudioError::InvalidSampleRate)
        );
    }

    #[test]
    fn rejects_ragged_channels() {
        let err = DecodedAudio::new(8000, vec![vec![0.0; 4], vec![0.0; 3]]).unwrap_err();
        assert_eq!(
            err,
            AudioError::ChannelLengthMismatch {
                channel: 1,
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn deinterleaves_stereo() {
        let audio =
            DecodedAudio::from_interleaved(48000, 2, &[0.1, -0.1, 0.2, -0.2, 0.3]).unwrap();
        assert_eq!(audio.channel_count(), 2);
        assert_eq!(audio.frame_count(), 2);
        assert_eq!(audio.channel(0).unwrap(), &[0.1, 0.2]);
        assert_eq!(audio.channel(1).unwrap(), &[-0.1, -0.2]);
        assert!(audio.channel(2).is_none());
    }

    #[test]
    fn zero_frames_is_valid() {
        let audio = DecodedAudio::silence(22050, 2, 0).unwrap();
        assert_eq!(audio.frame_count(), 0);
        assert!(audio.is_empty());
        assert_eq!(audio.duration_secs(), 0.0);
    }

    #[test]
    fn duration_from_frames_and_rate() {
        let audio = DecodedAudio::silence(44100, 1, 22050).unwrap();
        assert!((audio.duration_secs() - 0.5).abs() < 1e-12);
    }
}
