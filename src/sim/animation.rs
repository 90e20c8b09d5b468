//! Spritesheet animation clips and playback state

use serde::{Deserialize, Serialize};

/// A named sequence of spritesheet frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    /// Spritesheet frame indices, in playback order
    pub frames: Vec<u32>,
    /// Frames per second
    pub frame_rate: f32,
    /// Restart from the first frame after the last one
    pub looping: bool,
}

impl AnimationClip {
    /// Consecutive frames `start..=end`
    pub fn range(start: u32, end: u32, frame_rate: f32, looping: bool) -> Self {
        Self {
            frames: (start..=end).collect(),
            frame_rate,
            looping,
        }
    }

    /// Single still frame
    pub fn still(frame: u32, frame_rate: f32) -> Self {
        Self {
            frames: vec![frame],
            frame_rate,
            looping: false,
        }
    }

    pub fn frame_duration_ms(&self) -> f64 {
        if self.frame_rate > 0.0 {
            1000.0 / self.frame_rate as f64
        } else {
            f64::INFINITY
        }
    }
}

/// Per-sprite playback state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationPlayer {
    /// Key of the current clip (empty when nothing has played)
    pub key: String,
    /// Index into the clip's frame list
    pub index: usize,
    /// Time spent on the current frame (ms)
    pub elapsed_ms: f64,
    pub playing: bool,
}

impl AnimationPlayer {
    /// Start `key` from its first frame.
    ///
    /// With `ignore_if_playing`, a clip that is already running is left alone.
    /// A finished non-looping clip is not "playing", so it restarts.
    pub fn play(&mut self, key: &str, ignore_if_playing: bool) {
        if ignore_if_playing && self.playing && self.key == key {
            return;
        }
        self.key.clear();
        self.key.push_str(key);
        self.index = 0;
        self.elapsed_ms = 0.0;
        self.playing = true;
    }

    /// Advance by `dt_ms`. Returns true if the frame changed.
    pub fn advance(&mut self, clip: &AnimationClip, dt_ms: f64) -> bool {
        if !self.playing || clip.frames.is_empty() {
            return false;
        }

        let frame_ms = clip.frame_duration_ms();
        self.elapsed_ms += dt_ms;
        let mut changed = false;

        while self.elapsed_ms >= frame_ms {
            self.elapsed_ms -= frame_ms;
            if self.index + 1 < clip.frames.len() {
                self.index += 1;
                changed = true;
            } else if clip.looping {
                if clip.frames.len() > 1 {
                    changed = true;
                }
                self.index = 0;
            } else {
                // Hold the last frame
                self.playing = false;
                self.elapsed_ms = 0.0;
                break;
            }
        }
        changed
    }

    /// Spritesheet frame currently shown
    pub fn frame(&self, clip: &AnimationClip) -> Option<u32> {
        clip.frames.get(self.index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looping_clip_wraps() {
        let clip = AnimationClip::range(0, 3, 10.0, true);
        let mut player = AnimationPlayer::default();
        player.play("left", true);

        // 4 frames at 100ms each: after 400ms we are back at the start
        for _ in 0..4 {
            player.advance(&clip, 100.0);
        }
        assert_eq!(player.frame(&clip), Some(0));
        assert!(player.playing);
    }

    #[test]
    fn test_one_shot_clip_holds_last_frame() {
        let clip = AnimationClip::range(5, 9, 10.0, false);
        let mut player = AnimationPlayer::default();
        player.play("right", true);

        player.advance(&clip, 1000.0);
        assert_eq!(player.frame(&clip), Some(9));
        assert!(!player.playing);

        // Finished clip restarts even with ignore_if_playing
        player.play("right", true);
        assert!(player.playing);
        assert_eq!(player.frame(&clip), Some(5));
    }

    #[test]
    fn test_ignore_if_playing_keeps_progress() {
        let clip = AnimationClip::range(0, 3, 10.0, true);
        let mut player = AnimationPlayer::default();
        player.play("left", true);
        player.advance(&clip, 150.0);
        assert_eq!(player.index, 1);

        player.play("left", true);
        assert_eq!(player.index, 1);

        player.play("left", false);
        assert_eq!(player.index, 0);
    }

    #[test]
    fn test_still_clip() {
        let clip = AnimationClip::still(4, 10.0);
        let mut player = AnimationPlayer::default();
        player.play("turn", false);
        assert!(!player.advance(&clip, 50.0));
        assert_eq!(player.frame(&clip), Some(4));
    }
}
