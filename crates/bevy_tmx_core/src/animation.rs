use bevy_tmx_assets::resolve::{ResolvedFrame, TileSprite};

/// A tile animation resampled to one constant frame rate.
///
/// Frame durations are replaced by repetition: the frame period is the
/// greatest common divisor of all durations and each frame is repeated
/// `duration / period` times.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTimeline {
    pub frame_duration_ms: u32,
    pub frames: Vec<TileSprite>,
}

impl AnimationTimeline {
    /// `None` for an empty animation or one whose frames all last 0 ms.
    pub fn from_frames(frames: &[ResolvedFrame]) -> Option<Self> {
        let period = frames
            .iter()
            .map(|frame| frame.duration_ms)
            .fold(0, greatest_common_divisor);
        if period == 0 {
            return None;
        }

        let frames = frames
            .iter()
            .flat_map(|frame| {
                std::iter::repeat_n(frame.sprite.clone(), (frame.duration_ms / period) as usize)
            })
            .collect();
        Some(Self {
            frame_duration_ms: period,
            frames,
        })
    }

    pub fn frames_per_second(&self) -> f32 {
        1000.0 / self.frame_duration_ms as f32
    }

    pub fn total_duration_ms(&self) -> u32 {
        let frames = u32::try_from(self.frames.len()).unwrap_or(u32::MAX);
        self.frame_duration_ms.saturating_mul(frames)
    }
}

fn greatest_common_divisor(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        greatest_common_divisor(b, a % b)
    }
}
