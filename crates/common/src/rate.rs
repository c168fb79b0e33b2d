//! Frame rates and frame/time conversion.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A rational frame rate (`num / den` frames per second).
///
/// Core timeline arithmetic is done in integer frames; `FrameRate` exists at
/// the edges for converting frame indices to wall-clock seconds and back
/// (rulers, timecode displays, media import).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Frames per `den` seconds.
    pub num: u32,
    /// Seconds per `num` frames.
    pub den: u32,
}

impl FrameRate {
    /// 24 fps (film).
    pub const FPS_24: FrameRate = FrameRate { num: 24, den: 1 };
    /// 25 fps (PAL).
    pub const FPS_25: FrameRate = FrameRate { num: 25, den: 1 };
    /// 30 fps.
    pub const FPS_30: FrameRate = FrameRate { num: 30, den: 1 };
    /// 60 fps.
    pub const FPS_60: FrameRate = FrameRate { num: 60, den: 1 };
    /// 29.97 fps (NTSC).
    pub const FPS_29_97: FrameRate = FrameRate {
        num: 30000,
        den: 1001,
    };

    /// Create a frame rate. Panics if either component is zero.
    pub fn new(num: u32, den: u32) -> Self {
        assert!(num > 0 && den > 0, "frame rate components must be non-zero");
        Self { num, den }
    }

    /// Frames per second as a float.
    pub fn fps(&self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Convert a frame index to seconds.
    pub fn frame_to_seconds(&self, frame: i64) -> f64 {
        frame as f64 * f64::from(self.den) / f64::from(self.num)
    }

    /// Convert seconds to the nearest frame index.
    pub fn seconds_to_frame(&self, seconds: f64) -> i64 {
        (seconds * self.fps()).round() as i64
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_30
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{} fps", self.num)
        } else {
            write!(f, "{:.2} fps", self.fps())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_rates() {
        assert!((FrameRate::FPS_24.fps() - 24.0).abs() < 1e-9);
        assert!((FrameRate::FPS_60.fps() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn ntsc_rate() {
        assert!((FrameRate::FPS_29_97.fps() - 29.97).abs() < 0.001);
    }

    #[test]
    fn frame_to_seconds_at_30fps() {
        let rate = FrameRate::FPS_30;
        assert!((rate.frame_to_seconds(90) - 3.0).abs() < 1e-9);
        assert!((rate.frame_to_seconds(0)).abs() < 1e-9);
    }

    #[test]
    fn seconds_round_trip() {
        let rate = FrameRate::FPS_29_97;
        let frame = rate.seconds_to_frame(10.0);
        assert_eq!(frame, 300); // 299.7 rounds to 300
        assert!((rate.frame_to_seconds(frame) - 10.01).abs() < 0.001);
    }

    #[test]
    #[should_panic]
    fn zero_denominator_panics() {
        let _ = FrameRate::new(30, 0);
    }

    #[test]
    fn display_formats() {
        assert_eq!(FrameRate::FPS_30.to_string(), "30 fps");
        assert_eq!(FrameRate::FPS_29_97.to_string(), "29.97 fps");
    }
}
