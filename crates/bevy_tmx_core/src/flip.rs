//! GID flip bits and the tile pose they describe.

use std::f32::consts::PI;

use bevy::math::{Mat4, Quat, Vec3};
use bevy_tmx_assets::resolve::GID_INDEX_MASK;

const FLIP_DIAGONAL: u32 = 1 << 29;
const FLIP_VERTICAL: u32 = 1 << 30;
const FLIP_HORIZONTAL: u32 = 1 << 31;

/// A GID split into its tile index and flip flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlipFlags {
    pub index: u32,
    pub diagonal: bool,
    pub vertical: bool,
    pub horizontal: bool,
}

impl FlipFlags {
    pub fn is_flipped(&self) -> bool {
        self.diagonal || self.vertical || self.horizontal
    }

    /// Rotation and mirroring for this tile.
    ///
    /// The diagonal flip is applied first as a half turn about the X=Y axis,
    /// which swaps the axes, so the remaining mirrors use swapped flags.
    pub fn pose(&self) -> TilePose {
        let rotation = if self.diagonal {
            Quat::from_axis_angle(Vec3::new(1.0, 1.0, 0.0).normalize(), PI)
        } else {
            Quat::IDENTITY
        };
        let (mirror_x, mirror_y) = if self.diagonal {
            (self.vertical, self.horizontal)
        } else {
            (self.horizontal, self.vertical)
        };
        TilePose {
            rotation,
            scale: Vec3::new(sign(mirror_x), sign(mirror_y), 1.0),
        }
    }
}

fn sign(mirrored: bool) -> f32 {
    if mirrored { -1.0 } else { 1.0 }
}

pub fn decode_flip(gid: u32) -> FlipFlags {
    FlipFlags {
        index: gid & GID_INDEX_MASK,
        diagonal: gid & FLIP_DIAGONAL != 0,
        vertical: gid & FLIP_VERTICAL != 0,
        horizontal: gid & FLIP_HORIZONTAL != 0,
    }
}

/// Rotation plus per-axis mirroring of a placed tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePose {
    pub rotation: Quat,
    pub scale: Vec3,
}

impl TilePose {
    /// The diagonal half turn first, then the mirror.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale(self.scale) * Mat4::from_quat(self.rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_maps(pose: &TilePose, from: Vec3, to: Vec3) {
        let mapped = pose.to_matrix().transform_vector3(from);
        assert!(
            mapped.abs_diff_eq(to, 1e-5),
            "{from} mapped to {mapped}, expected {to}"
        );
    }

    #[test]
    fn test_decode_bits() {
        for gid in [0, 5, 0x2000_0001, 0x4000_0002, 0x8000_0003, 0xE000_0004, 0xFFFF_FFFF] {
            let flags = decode_flip(gid);
            assert_eq!(flags.index, gid & 0x1FFF_FFFF);
            assert_eq!(flags.horizontal, (gid >> 31) & 1 == 1);
            assert_eq!(flags.vertical, (gid >> 30) & 1 == 1);
            assert_eq!(flags.diagonal, (gid >> 29) & 1 == 1);
        }
    }

    #[test]
    fn test_diagonal_and_horizontal() {
        let flags = decode_flip(0xA000_0005);
        assert_eq!(
            flags,
            FlipFlags {
                index: 5,
                diagonal: true,
                vertical: false,
                horizontal: true,
            }
        );

        // Tiled's "rotate 90° clockwise": swap the axes, then mirror Y in Y-up space
        let pose = flags.pose();
        assert_eq!(pose.scale, Vec3::new(1.0, -1.0, 1.0));
        assert_maps(&pose, Vec3::X, Vec3::NEG_Y);
        assert_maps(&pose, Vec3::Y, Vec3::X);
    }

    #[test]
    fn test_diagonal_and_vertical() {
        let flags = decode_flip(0x6000_0005);
        assert!(flags.diagonal && flags.vertical && !flags.horizontal);

        let pose = flags.pose();
        // counter-clockwise quarter turn
        assert_eq!(pose.scale, Vec3::new(-1.0, 1.0, 1.0));
        assert_maps(&pose, Vec3::X, Vec3::Y);
        assert_maps(&pose, Vec3::Y, Vec3::NEG_X);
    }

    #[test]
    fn test_diagonal_pose_turns_before_mirroring() {
        // rotate 90° clockwise, 180° and 90° counter-clockwise as Tiled writes them
        let clockwise = decode_flip(0xA000_0001).pose();
        assert_maps(&clockwise, Vec3::new(1.0, 2.0, 0.0), Vec3::new(2.0, -1.0, 0.0));

        let half_turn = decode_flip(0xC000_0001).pose();
        assert_maps(&half_turn, Vec3::new(1.0, 2.0, 0.0), Vec3::new(-1.0, -2.0, 0.0));

        let counter_clockwise = decode_flip(0x6000_0001).pose();
        assert_maps(
            &counter_clockwise,
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(-2.0, 1.0, 0.0),
        );
    }

    #[test]
    fn test_diagonal_only_swaps_axes() {
        let pose = decode_flip(0x2000_0001).pose();
        assert_maps(&pose, Vec3::X, Vec3::Y);
        assert_maps(&pose, Vec3::Y, Vec3::X);
    }

    #[test]
    fn test_plain_mirrors() {
        let pose = decode_flip(0xC000_0001).pose();
        assert_eq!(pose.rotation, Quat::IDENTITY);
        assert_maps(&pose, Vec3::X, Vec3::NEG_X);
        assert_maps(&pose, Vec3::Y, Vec3::NEG_Y);
        assert!(!decode_flip(1).is_flipped());
    }
}
