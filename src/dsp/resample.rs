//! Linear-interpolation resampling for single channels.

/// Read a sample at a fractional position with linear interpolation.
/// Positions before the start or past the end read as silence.
pub fn read_interpolated(data: &[f32], position: f64) -> f32 {
    if data.is_empty() || position < 0.0 {
        return 0.0;
    }

    let idx = position as usize;
    if idx >= data.len() - 1 {
        return if idx < data.len() { data[idx] } else { 0.0 };
    }

    let frac = (position - idx as f64) as f32;
    data[idx] * (1.0 - frac) + data[idx + 1] * frac
}

/// Play `data` back at `rate` times its original speed.
///
/// Output has `floor(len / rate)` samples; sample `j` reads the source at
/// `j * rate`. Pitch and tempo both scale by `rate`.
pub fn varispeed(data: &[f32], rate: f64) -> Vec<f32> {
    let out_len = (data.len() as f64 / rate).floor() as usize;
    (0..out_len)
        .map(|j| read_interpolated(data, j as f64 * rate))
        .collect()
}

/// Resample `data` from `src_rate` to `dst_rate`, producing exactly
/// `out_len` samples. Output past the end of the source is silence.
pub fn resample_to(data: &[f32], src_rate: u32, dst_rate: u32, out_len: usize) -> Vec<f32> {
    let step = src_rate as f64 / dst_rate as f64;
    (0..out_len)
        .map(|j| read_interpolated(data, j as f64 * step))
        .collect()
}
