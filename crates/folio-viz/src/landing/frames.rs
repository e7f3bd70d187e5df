#![forbid(unsafe_code)]

//! Hand-drawn ouroboros frames for narrow terminals.
//!
//! Twelve frames, head advancing 30 degrees per frame clockwise. Used when
//! the landing surface is too small for the procedural renderer.

use std::time::Duration;

/// Time per frame.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(150);

/// The rotation loop. `@` is the head, `V` the mouth closing on the tail.
pub const FRAMES: [&str; 12] = [
    r#"    .---.
  .'     '.
 /    @    \
|    V      |
|           |
|           |
 \         /
  '.     .'
    '---'"#,
    r#"    .---.
  .'  @  '.
 /    V    \
|           |
|           |
|           |
 \         /
  '.     .'
    '---'"#,
    r#"    .---.
  .'     '.@
 /       V \
|           |
|           |
|           |
 \         /
  '.     .'
    '---'"#,
    r#"    .---.
  .'     '.
 /         \@
|          V|
|           |
|           |
 \         /
  '.     .'
    '---'"#,
    r#"    .---.
  .'     '.
 /         \
|           |@
|           V
|           |
 \         /
  '.     .'
    '---'"#,
    r#"    .---.
  .'     '.
 /         \
|           |
|           |
|           |@
 \        V/
  '.     .'
    '---'"#,
    r#"    .---.
  .'     '.
 /         \
|           |
|           |
|           |
 \         /
  '.  V  .'
    '@--'"#,
    r#"    .---.
  .'     '.
 /         \
|           |
|           |
|           |
 \V       /
  '@    .'
    '---'"#,
    r#"    .---.
  .'     '.
 /         \
|           |
V           |
@           |
 \         /
  '.     .'
    '---'"#,
    r#"    .---.
  .'     '.
 V         \
@           |
|           |
|           |
 \         /
  '.     .'
    '---'"#,
    r#"    .---.
  @'     '.
 V         \
|           |
|           |
|           |
 \         /
  '.     .'
    '---'"#,
    r#"   V.---.
  @'     '.
 /         \
|           |
|           |
|           |
 \         /
  '.     .'
    '---'"#,
];

/// Widest line across all frames, for centering.
pub fn frame_width() -> u16 {
    FRAMES
        .iter()
        .flat_map(|f| f.lines())
        .map(|l| l.len() as u16)
        .max()
        .unwrap_or(0)
}

/// Line count of a frame.
pub fn frame_height() -> u16 {
    FRAMES[0].lines().count() as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_frame_has_head_and_mouth() {
        for (i, frame) in FRAMES.iter().enumerate() {
            assert!(frame.contains('@'), "frame {i} lost its head");
            assert!(frame.contains('V'), "frame {i} lost its mouth");
        }
    }

    #[test]
    fn frames_share_height() {
        for frame in FRAMES {
            assert_eq!(frame.lines().count() as u16, frame_height());
        }
    }

    #[test]
    fn dimensions_are_sane() {
        assert_eq!(frame_height(), 9);
        assert!(frame_width() >= 13);
    }
}
