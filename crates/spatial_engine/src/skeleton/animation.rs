//! Keyframe animation sampling
//!
//! An [`Animation`] is a set of tracks, each driving one channel of one
//! bone by name. Sampling brackets the time between the closest keyframes
//! and interpolates: vectors linearly, rotations with a normalized
//! quaternion lerp. Outside the keyed range the nearest keyframe holds.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::foundation::math::{Quaternion, Vector3};

use super::Skeleton;

/// Which part of a bone transform a track drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Local position
    Translation,
    /// Local rotation
    Rotation,
    /// Local scale
    Scale,
}

/// Keyframe values of one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyframes {
    /// Positions
    Translation(Vec<Vector3>),
    /// Rotations
    Rotation(Vec<Quaternion>),
    /// Scales
    Scale(Vec<Vector3>),
}

impl Keyframes {
    /// Channel these values drive
    pub const fn channel(&self) -> Channel {
        match self {
            Self::Translation(_) => Channel::Translation,
            Self::Rotation(_) => Channel::Rotation,
            Self::Scale(_) => Channel::Scale,
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Translation(values) | Self::Scale(values) => values.len(),
            Self::Rotation(values) => values.len(),
        }
    }
}

/// Interpolated value for one channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelValue {
    /// Local position
    Translation(Vector3),
    /// Local rotation
    Rotation(Quaternion),
    /// Local scale
    Scale(Vector3),
}

/// Keyframes for one channel of one bone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationTrack {
    /// Target bone name
    pub bone: String,
    /// Keyframe times in seconds, non-decreasing
    pub times: Vec<f32>,
    /// Keyframe values, one per time
    pub values: Keyframes,
}

impl AnimationTrack {
    /// Track from parts
    pub fn new(bone: impl Into<String>, times: Vec<f32>, values: Keyframes) -> Self {
        Self {
            bone: bone.into(),
            times,
            values,
        }
    }

    /// Channel this track drives
    pub const fn channel(&self) -> Channel {
        self.values.channel()
    }

    /// Usable keyframes; extra times or values are ignored
    pub fn keyframe_count(&self) -> usize {
        self.times.len().min(self.values.len())
    }

    /// Time of the last usable keyframe, 0 when empty
    pub fn end_time(&self) -> f32 {
        self.times[..self.keyframe_count()]
            .iter()
            .copied()
            .filter(|t| t.is_finite())
            .fold(0.0, f32::max)
    }

    /// Keyframe indices around `time` and the blend factor between them
    ///
    /// `prev` is the last keyframe at or before `time`, `next` the first one
    /// after it. Before the first or after the last keyframe both indices
    /// point at the same keyframe.
    fn bracket(&self, time: f32) -> Option<(usize, usize, f32)> {
        let count = self.keyframe_count();
        if count == 0 {
            return None;
        }
        let times = &self.times[..count];

        let next = times.partition_point(|&t| t <= time);
        if next == 0 {
            return Some((0, 0, 0.0));
        }
        let prev = next - 1;
        if next == count {
            return Some((prev, prev, 0.0));
        }

        let span = times[next] - times[prev];
        let t = if span > f32::EPSILON {
            ((time - times[prev]) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Some((prev, next, t))
    }

    /// Interpolated value at `time`, `None` for an empty track
    pub fn sample(&self, time: f32) -> Option<ChannelValue> {
        let (prev, next, t) = self.bracket(time)?;
        let value = match &self.values {
            Keyframes::Translation(values) => {
                ChannelValue::Translation(Vector3::lerp(values[prev], values[next], t))
            }
            Keyframes::Rotation(values) => {
                ChannelValue::Rotation(Quaternion::lerp(values[prev], values[next], t))
            }
            Keyframes::Scale(values) => {
                ChannelValue::Scale(Vector3::lerp(values[prev], values[next], t))
            }
        };
        Some(value)
    }
}

/// Named clip of tracks with a looping playhead
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// Clip name
    pub name: String,
    /// Channel tracks
    pub tracks: Vec<AnimationTrack>,
    /// Playhead in seconds
    #[serde(default)]
    pub time: f32,
}

impl Animation {
    /// Clip with the playhead at 0
    pub fn new(name: impl Into<String>, tracks: Vec<AnimationTrack>) -> Self {
        let animation = Self {
            name: name.into(),
            tracks,
            time: 0.0,
        };
        debug!(
            "animation {:?}: {} tracks, {:.3}s",
            animation.name,
            animation.tracks.len(),
            animation.duration()
        );
        animation
    }

    /// Length of the clip: the latest keyframe time of any track
    pub fn duration(&self) -> f32 {
        self.tracks
            .iter()
            .map(AnimationTrack::end_time)
            .fold(0.0, f32::max)
    }

    /// Advance the playhead, wrapping it into `[0, duration]`
    ///
    /// Non-finite deltas are ignored. Returns the new playhead.
    pub fn tick(&mut self, delta: f32) -> f32 {
        if !delta.is_finite() {
            warn!("animation {:?}: ignoring delta {delta}", self.name);
            return self.time;
        }

        let duration = self.duration();
        if duration <= 0.0 {
            self.time = 0.0;
            return self.time;
        }

        self.time += delta;
        if !(0.0..=duration).contains(&self.time) {
            self.time = self.time.rem_euclid(duration);
        }
        self.time
    }

    /// Every track's value at `time`, paired with its bone name
    pub fn sample(&self, time: f32) -> Vec<(&str, ChannelValue)> {
        self.tracks
            .iter()
            .filter_map(|track| track.sample(time).map(|value| (track.bone.as_str(), value)))
            .collect()
    }

    /// Push the values at the playhead into a skeleton
    ///
    /// Tracks naming unknown bones are skipped. Returns how many values were
    /// applied; call [`Skeleton::update`] afterwards.
    pub fn apply(&self, skeleton: &mut Skeleton) -> usize {
        self.sample(self.time)
            .into_iter()
            .filter(|&(bone, value)| match value {
                ChannelValue::Translation(position) => skeleton.set_bone_position(bone, position),
                ChannelValue::Rotation(rotation) => skeleton.set_bone_rotation(bone, rotation),
                ChannelValue::Scale(scale) => skeleton.set_bone_scale(bone, scale),
            })
            .count()
    }

    /// Tick, apply and propagate in one call
    pub fn animate(&mut self, delta: f32, skeleton: &mut Skeleton) -> usize {
        self.tick(delta);
        let applied = self.apply(skeleton);
        skeleton.update();
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::AngleUnit;
    use crate::skeleton::{BoneDescription, SkinDescription};
    use approx::assert_relative_eq;

    fn slide() -> AnimationTrack {
        AnimationTrack::new(
            "hand",
            vec![0.0, 1.0, 2.0],
            Keyframes::Translation(vec![
                Vector3::zero(),
                Vector3::new(2.0, 0.0, 0.0),
                Vector3::new(2.0, 4.0, 0.0),
            ]),
        )
    }

    fn translation(value: Option<ChannelValue>) -> Vector3 {
        match value {
            Some(ChannelValue::Translation(v)) => v,
            other => panic!("expected a translation, got {other:?}"),
        }
    }

    #[test]
    fn test_interpolates_between_keyframes() {
        let track = slide();
        assert_relative_eq!(translation(track.sample(0.5)), Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(translation(track.sample(1.0)), Vector3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(translation(track.sample(1.25)), Vector3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_holds_outside_keyed_range() {
        let track = slide();
        assert_relative_eq!(translation(track.sample(-3.0)), Vector3::zero());
        assert_relative_eq!(translation(track.sample(9.0)), Vector3::new(2.0, 4.0, 0.0));
        assert_relative_eq!(translation(track.sample(f32::NAN)), Vector3::zero());
    }

    #[test]
    fn test_empty_and_single_keyframe_tracks() {
        let empty = AnimationTrack::new("hand", Vec::new(), Keyframes::Scale(Vec::new()));
        assert_eq!(empty.sample(0.5), None);
        assert_relative_eq!(empty.end_time(), 0.0);

        let single = AnimationTrack::new(
            "hand",
            vec![0.5],
            Keyframes::Scale(vec![Vector3::new(2.0, 2.0, 2.0)]),
        );
        for time in [0.0, 0.5, 3.0] {
            assert_eq!(
                single.sample(time),
                Some(ChannelValue::Scale(Vector3::new(2.0, 2.0, 2.0)))
            );
        }
    }

    #[test]
    fn test_equal_times_step_to_later_keyframe() {
        let track = AnimationTrack::new(
            "hand",
            vec![0.0, 1.0, 1.0, 2.0],
            Keyframes::Translation(vec![
                Vector3::zero(),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(5.0, 0.0, 0.0),
                Vector3::new(6.0, 0.0, 0.0),
            ]),
        );
        let at_step = translation(track.sample(1.0));
        assert!(at_step.is_finite());
        assert_relative_eq!(at_step, Vector3::new(5.0, 0.0, 0.0));
        assert_relative_eq!(translation(track.sample(0.5)), Vector3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_mismatched_lengths_use_common_prefix() {
        let track = AnimationTrack::new(
            "hand",
            vec![0.0, 1.0, 2.0],
            Keyframes::Translation(vec![Vector3::zero(), Vector3::one()]),
        );
        assert_eq!(track.keyframe_count(), 2);
        assert_relative_eq!(track.end_time(), 1.0);
        assert_relative_eq!(translation(track.sample(5.0)), Vector3::one());
    }

    #[test]
    fn test_rotation_track_is_normalized() {
        let quarter = Quaternion::from_euler_xyz(0.0, 0.0, 90.0, AngleUnit::Deg);
        let track = AnimationTrack::new(
            "hand",
            vec![0.0, 1.0],
            Keyframes::Rotation(vec![Quaternion::identity(), quarter]),
        );
        let Some(ChannelValue::Rotation(half)) = track.sample(0.5) else {
            panic!("expected a rotation");
        };
        assert_relative_eq!(half.magnitude(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(
            half.to_euler().to_deg(),
            Vector3::new(0.0, 0.0, 45.0),
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_tick_loops_over_duration() {
        let mut animation = Animation::new("walk", vec![slide()]);
        assert_relative_eq!(animation.duration(), 2.0);
        assert_relative_eq!(animation.tick(1.5), 1.5);
        assert_relative_eq!(animation.tick(1.0), 0.5, epsilon = 1e-6);
        assert_relative_eq!(animation.tick(-1.0), 1.5, epsilon = 1e-6);
        assert_relative_eq!(animation.tick(f32::INFINITY), 1.5, epsilon = 1e-6);
    }

    #[test]
    fn test_empty_animation_stays_at_zero() {
        let mut animation = Animation::new("idle", Vec::new());
        assert_relative_eq!(animation.tick(0.3), 0.0);
        assert!(animation.sample(0.3).is_empty());
    }

    #[test]
    fn test_animate_drives_skeleton() {
        let skin = SkinDescription {
            bones: vec![
                BoneDescription::new(1, "arm").with_children(&[2]),
                BoneDescription::new(2, "hand").with_position(Vector3::new(0.0, 1.0, 0.0)),
            ],
        };
        let mut skeleton = Skeleton::from_skin(&skin).expect("valid skin");
        let ghost = AnimationTrack::new(
            "tail",
            vec![0.0],
            Keyframes::Translation(vec![Vector3::one()]),
        );
        let mut animation = Animation::new("wave", vec![slide(), ghost]);

        assert_eq!(animation.animate(0.5, &mut skeleton), 1);
        assert_relative_eq!(
            skeleton.world_matrix("hand").expect("hand").get_position(),
            Vector3::new(1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_tracks_deserialize_from_ron() {
        let text = r#"(
            name: "wave",
            tracks: [(
                bone: "hand",
                times: [0.0, 1.0],
                values: translation([(x: 0.0, y: 0.0, z: 0.0), (x: 1.0, y: 0.0, z: 0.0)]),
            )],
        )"#;
        let animation: Animation = ron::from_str(text).expect("parse");
        assert_eq!(animation.tracks[0].channel(), Channel::Translation);
        assert_relative_eq!(animation.time, 0.0);
        assert_relative_eq!(animation.duration(), 1.0);
    }
}
