//! Frame-level loudness and excitement analysis over mono PCM.
//!
//! Loudness is RMS in dBFS over 25 ms frames with a 10 ms hop. The
//! zero-crossing rate of each frame, expressed in Hz, stands in for pitch.

use vvp_models::{AudioFeatures, ExcitementKind, ExcitementPoint, PitchStats, VolumeStats};

use crate::error::{MediaError, MediaResult};

/// Floor of the dB scale.
pub const MIN_DB: f64 = -60.0;
/// Ceiling of the dB scale (full scale).
pub const MAX_DB: f64 = 0.0;

const FRAME_SECS: f64 = 0.025;
const HOP_SECS: f64 = 0.010;

const VOLUME_STD_FACTOR: f64 = 0.8;
const PITCH_STD_FACTOR: f64 = 0.6;
/// Frames this close together belong to the same loud passage.
const GROUP_GAP_FRAMES: usize = 5;
const MIN_GROUP_FRAMES: usize = 3;
const PITCH_SAMPLE_STRIDE: usize = 30;
const PITCH_POINT_INTENSITY: f64 = 0.4;
const PITCH_POINT_DURATION: f64 = 1.0;
const MAX_EXCITEMENT_POINTS: usize = 15;

/// Compute loudness statistics, excitement points and the excitement score.
pub fn analyze_samples(samples: &[f32], sample_rate: u32) -> MediaResult<AudioFeatures> {
    if sample_rate == 0 {
        return Err(MediaError::invalid_audio("sample rate is zero"));
    }
    if samples.is_empty() {
        return Err(MediaError::invalid_audio("no samples to analyze"));
    }

    let sr = sample_rate as f64;
    let frame_len = ((FRAME_SECS * sr) as usize).max(1);
    let hop = ((HOP_SECS * sr) as usize).max(1);
    let duration = samples.len() as f64 / sr;

    let frames = frame_bounds(samples.len(), frame_len, hop);

    let db: Vec<f64> = frames
        .iter()
        .map(|&(start, end)| {
            let rms = rms(&samples[start..end]);
            (20.0 * rms.max(1e-10).log10()).clamp(MIN_DB, MAX_DB)
        })
        .collect();

    let zcr_hz: Vec<f64> = frames
        .iter()
        .map(|&(start, end)| zero_crossing_hz(&samples[start..end], sr))
        .collect();

    let volume = VolumeStats {
        mean_db: mean(&db),
        max_db: db.iter().copied().fold(f64::MIN, f64::max),
        min_db: db.iter().copied().fold(f64::MAX, f64::min),
        variance: variance(&db),
        peak_amplitude: samples.iter().map(|s| s.abs() as f64).fold(0.0, f64::max),
        rms: rms(samples),
    };

    let pitch = PitchStats {
        mean: mean(&zcr_hz),
        variance: variance(&zcr_hz),
        range: zcr_hz.iter().copied().fold(f64::MIN, f64::max)
            - zcr_hz.iter().copied().fold(f64::MAX, f64::min),
    };

    let frame_time = |idx: usize| idx as f64 * hop as f64 / sr;

    let mut points = volume_points(&db, frame_time);
    points.extend(pitch_points(&zcr_hz, duration));
    points.sort_by(|a, b| a.time.total_cmp(&b.time));
    points.truncate(MAX_EXCITEMENT_POINTS);

    let excitement_score = excitement_score(&volume, &pitch);

    Ok(AudioFeatures {
        duration_secs: round2(duration),
        sample_rate,
        volume,
        pitch,
        excitement_points: points,
        excitement_score,
    })
}

/// Weighted blend of dynamic range (40), loudness variance (35) and pitch
/// variance (25), clamped to 0-100.
pub fn excitement_score(volume: &VolumeStats, pitch: &PitchStats) -> f64 {
    let dynamic_range = volume.max_db - volume.min_db;
    let score = dynamic_range / MIN_DB.abs() * 40.0
        + volume.variance / 100.0 * 35.0
        + pitch.variance / 1000.0 * 25.0;
    round2(score.clamp(0.0, 100.0))
}

fn volume_points(db: &[f64], frame_time: impl Fn(usize) -> f64) -> Vec<ExcitementPoint> {
    let threshold = mean(db) + VOLUME_STD_FACTOR * variance(db).sqrt();
    let loud: Vec<usize> = (0..db.len()).filter(|&i| db[i] > threshold).collect();

    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    for idx in loud {
        match current.last() {
            Some(&last) if idx - last <= GROUP_GAP_FRAMES => current.push(idx),
            _ => {
                if current.len() >= MIN_GROUP_FRAMES {
                    groups.push(std::mem::take(&mut current));
                }
                current = vec![idx];
            }
        }
    }
    if current.len() >= MIN_GROUP_FRAMES {
        groups.push(current);
    }

    groups
        .iter()
        .map(|group| {
            let centre = group[group.len() / 2];
            let first = group[0];
            let last = group[group.len() - 1];
            ExcitementPoint {
                time: round2(frame_time(centre)),
                duration: round2(frame_time(last) - frame_time(first)),
                intensity: (group.len() as f64 / 10.0).min(1.0),
                kind: ExcitementKind::Volume,
                level: round2(db[centre]),
            }
        })
        .collect()
}

fn pitch_points(zcr_hz: &[f64], duration: f64) -> Vec<ExcitementPoint> {
    let threshold = mean(zcr_hz) + PITCH_STD_FACTOR * variance(zcr_hz).sqrt();
    let len = zcr_hz.len() as f64;

    (0..zcr_hz.len())
        .filter(|&i| zcr_hz[i] > threshold)
        .step_by(PITCH_SAMPLE_STRIDE)
        .map(|idx| ExcitementPoint {
            time: round2(idx as f64 / len * duration),
            duration: PITCH_POINT_DURATION,
            intensity: PITCH_POINT_INTENSITY,
            kind: ExcitementKind::Pitch,
            level: round2(zcr_hz[idx]),
        })
        .collect()
}

/// Frame `[start, end)` ranges. Input shorter than one frame yields a
/// single partial frame.
fn frame_bounds(len: usize, frame_len: usize, hop: usize) -> Vec<(usize, usize)> {
    if len <= frame_len {
        return vec![(0, len)];
    }
    (0..=(len - frame_len))
        .step_by(hop)
        .map(|start| (start, start + frame_len))
        .collect()
}

fn rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / samples.len() as f64).sqrt()
}

fn zero_crossing_hz(frame: &[f32], sample_rate: f64) -> f64 {
    if frame.len() < 2 {
        return 0.0;
    }
    let crossings = frame
        .windows(2)
        .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
        .count() as f64;
    // Two crossings per cycle
    crossings / 2.0 / (frame.len() as f64 / sample_rate)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance.
fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 8000;

    fn sine(freq: f64, amplitude: f32, secs: f64) -> Vec<f32> {
        let n = (secs * SR as f64) as usize;
        (0..n)
            .map(|i| {
                let t = i as f64 / SR as f64;
                amplitude * (2.0 * std::f64::consts::PI * freq * t).sin() as f32
            })
            .collect()
    }

    #[test]
    fn test_rejects_empty_input() {
        assert!(matches!(
            analyze_samples(&[], SR),
            Err(MediaError::InvalidAudio(_))
        ));
        assert!(matches!(
            analyze_samples(&[0.1], 0),
            Err(MediaError::InvalidAudio(_))
        ));
    }

    #[test]
    fn test_silence_is_clipped_to_floor() {
        let features = analyze_samples(&vec![0.0; SR as usize], SR).unwrap();
        assert_eq!(features.volume.mean_db, MIN_DB);
        assert_eq!(features.volume.max_db, MIN_DB);
        assert_eq!(features.excitement_score, 0.0);
        assert!(features.excitement_points.is_empty());
        assert_eq!(features.duration_secs, 1.0);
    }

    #[test]
    fn test_full_scale_tone_near_zero_db() {
        let features = analyze_samples(&sine(440.0, 1.0, 1.0), SR).unwrap();
        // RMS of a unit sine is 1/sqrt(2), about -3 dB
        assert!((features.volume.mean_db + 3.01).abs() < 0.1);
        assert!(features.volume.peak_amplitude > 0.99);
        // ZCR estimate tracks the tone frequency
        assert!((features.pitch.mean - 440.0).abs() < 40.0);
    }

    #[test]
    fn test_loud_burst_becomes_volume_point() {
        let mut samples = sine(200.0, 0.01, 2.0);
        samples.extend(sine(200.0, 0.9, 0.5));
        samples.extend(sine(200.0, 0.01, 2.0));

        let features = analyze_samples(&samples, SR).unwrap();
        let volume: Vec<_> = features
            .excitement_points
            .iter()
            .filter(|p| p.kind == ExcitementKind::Volume)
            .collect();

        assert_eq!(volume.len(), 1);
        assert!(volume[0].time > 2.0 && volume[0].time < 2.5);
        assert_eq!(volume[0].intensity, 1.0);
        assert!(features.excitement_score > 0.0);
    }

    #[test]
    fn test_points_sorted_and_capped() {
        let mut samples = Vec::new();
        for _ in 0..40 {
            samples.extend(sine(150.0, 0.01, 0.5));
            samples.extend(sine(1500.0, 0.9, 0.2));
        }

        let features = analyze_samples(&samples, SR).unwrap();
        let points = &features.excitement_points;
        assert!(points.len() <= 15);
        assert!(points.windows(2).all(|w| w[0].time <= w[1].time));
    }

    #[test]
    fn test_excitement_score_clamped() {
        let volume = VolumeStats {
            max_db: 0.0,
            min_db: -60.0,
            variance: 500.0,
            ..Default::default()
        };
        let pitch = PitchStats {
            variance: 100_000.0,
            ..Default::default()
        };
        assert_eq!(excitement_score(&volume, &pitch), 100.0);
    }

    #[test]
    fn test_short_input_single_frame() {
        let features = analyze_samples(&[0.5, -0.5, 0.5], SR).unwrap();
        assert!(features.volume.mean_db < 0.0);
    }
}
