//! Hierarchical skeletons
//!
//! Bones live in a flat arena in skin order and refer to each other by index.
//! The skeleton is validated once when built; after that every mutation is a
//! lookup by name that quietly does nothing for unknown bones.

mod animation;
mod bone;
mod skin;

pub use animation::{Animation, AnimationTrack, Channel, ChannelValue, Keyframes};
pub use bone::{Bone, BoneTransform};
pub use skin::{BoneDescription, SkeletonError, SkinDescription};

use std::collections::HashMap;

use log::{debug, trace, warn};

use crate::foundation::math::{Matrix4x4, Quaternion, Vector3};

/// Bone hierarchy with world and skin matrices
#[derive(Debug, Clone)]
pub struct Skeleton {
    bones: Vec<Bone>,
    roots: Vec<usize>,
    names: HashMap<String, usize>,
    ids: HashMap<u32, usize>,
    root_position: Vector3,
    root_rotation: Quaternion,
}

impl Skeleton {
    /// Build and validate a skeleton from a skin description
    pub fn from_skin(skin: &SkinDescription) -> Result<Self, SkeletonError> {
        if skin.bones.is_empty() {
            return Err(SkeletonError::Empty);
        }

        let mut ids = HashMap::with_capacity(skin.bones.len());
        for (index, description) in skin.bones.iter().enumerate() {
            if ids.insert(description.id, index).is_some() {
                return Err(SkeletonError::DuplicateId(description.id));
            }
        }

        let mut bones: Vec<Bone> = skin
            .bones
            .iter()
            .map(|d| {
                let transform = BoneTransform {
                    position: d.position,
                    rotation: d.rotation,
                    scale: d.scale,
                };
                Bone::new(d.id, d.name.clone(), transform, d.inverse_bind_matrix)
            })
            .collect();

        for (index, description) in skin.bones.iter().enumerate() {
            for &child_id in &description.children {
                let child = *ids.get(&child_id).ok_or(SkeletonError::UnknownChild {
                    parent: description.id,
                    child: child_id,
                })?;
                if bones[child].parent.is_some() {
                    return Err(SkeletonError::MultipleParents(child_id));
                }
                bones[child].parent = Some(index);
                bones[index].children.push(child);
            }
        }

        let roots: Vec<usize> = (0..bones.len())
            .filter(|&i| bones[i].parent.is_none())
            .collect();
        if roots.is_empty() {
            return Err(SkeletonError::NoRoot);
        }

        let mut reached = vec![false; bones.len()];
        let mut stack = roots.clone();
        while let Some(index) = stack.pop() {
            reached[index] = true;
            stack.extend_from_slice(&bones[index].children);
        }
        if let Some(index) = reached.iter().position(|&r| !r) {
            return Err(SkeletonError::Unreachable(bones[index].id));
        }

        let mut names = HashMap::with_capacity(bones.len());
        for (index, bone) in bones.iter().enumerate() {
            if names.contains_key(&bone.name) {
                warn!("duplicate bone name {:?}, keeping the first", bone.name);
                continue;
            }
            names.insert(bone.name.clone(), index);
        }

        debug!("built skeleton with {} bones, {} roots", bones.len(), roots.len());

        let mut skeleton = Self {
            bones,
            roots,
            names,
            ids,
            root_position: Vector3::zero(),
            root_rotation: Quaternion::identity(),
        };
        skeleton.update();
        Ok(skeleton)
    }

    /// All bones in skin order
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Indices of the root bones in skin order
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Look up a bone by name
    pub fn bone(&self, name: &str) -> Option<&Bone> {
        self.names.get(name).map(|&i| &self.bones[i])
    }

    /// Look up a bone by name for editing
    pub fn bone_mut(&mut self, name: &str) -> Option<&mut Bone> {
        self.names.get(name).map(|&i| &mut self.bones[i])
    }

    /// Look up a bone by skin id
    pub fn bone_by_id(&self, id: u32) -> Option<&Bone> {
        self.ids.get(&id).map(|&i| &self.bones[i])
    }

    /// Offset applied above every root: `T(position) * R(rotation)`
    pub fn set_root_offset(&mut self, position: Vector3, rotation: Quaternion) {
        self.root_position = position;
        self.root_rotation = rotation;
    }

    fn root_matrix(&self) -> Matrix4x4 {
        Matrix4x4::from_translation(self.root_position).rotate_quaternion(self.root_rotation)
    }

    /// Set a bone's local position; unknown names and `None` are ignored
    pub fn set_bone_position(&mut self, name: &str, position: impl Into<Option<Vector3>>) -> bool {
        match (self.bone_mut(name), position.into()) {
            (Some(bone), Some(position)) => {
                bone.transform.position = position;
                true
            }
            _ => false,
        }
    }

    /// Set a bone's local rotation; unknown names and `None` are ignored
    pub fn set_bone_rotation(
        &mut self,
        name: &str,
        rotation: impl Into<Option<Quaternion>>,
    ) -> bool {
        match (self.bone_mut(name), rotation.into()) {
            (Some(bone), Some(rotation)) => {
                bone.transform.rotation = rotation;
                true
            }
            _ => false,
        }
    }

    /// Set a bone's local scale; unknown names and `None` are ignored
    pub fn set_bone_scale(&mut self, name: &str, scale: impl Into<Option<Vector3>>) -> bool {
        match (self.bone_mut(name), scale.into()) {
            (Some(bone), Some(scale)) => {
                bone.transform.scale = scale;
                true
            }
            _ => false,
        }
    }

    /// Set the procedural rotation layered on top of the animated one
    pub fn set_bone_local_rotation(&mut self, name: &str, rotation: Quaternion) -> bool {
        self.bone_mut(name).map_or(false, |bone| {
            bone.local_rotation = rotation;
            true
        })
    }

    /// Parent world matrix from the current local transforms of the ancestors
    fn parent_world_matrix(&self, index: usize) -> Matrix4x4 {
        let mut chain = Vec::new();
        let mut cursor = self.bones[index].parent;
        while let Some(parent) = cursor {
            chain.push(parent);
            cursor = self.bones[parent].parent;
        }

        chain
            .iter()
            .rev()
            .fold(self.root_matrix(), |matrix, &i| matrix * self.bones[i].local_matrix())
    }

    /// Place a bone at a world-space position
    pub fn set_world_position(&mut self, name: &str, position: Vector3) -> bool {
        let Some(&index) = self.names.get(name) else {
            return false;
        };
        let Some(inverse) = self.parent_world_matrix(index).invert() else {
            warn!("bone {name:?} has a singular parent matrix");
            return false;
        };
        self.bones[index].transform.position = inverse.transform_point(position);
        true
    }

    /// Orient a bone in world space, the procedural offset is kept
    pub fn set_world_rotation(&mut self, name: &str, rotation: Quaternion) -> bool {
        let Some(&index) = self.names.get(name) else {
            return false;
        };
        let parent_rotation = self.parent_world_matrix(index).get_rotation();
        let bone = &mut self.bones[index];
        bone.transform.rotation = parent_rotation
            .invert()
            .mul(rotation)
            .mul(bone.local_rotation.invert())
            .normalize();
        true
    }

    /// Recompute world matrices depth-first from the roots
    pub fn update(&mut self) {
        let root = self.root_matrix();
        let mut stack: Vec<(usize, Matrix4x4)> =
            self.roots.iter().rev().map(|&i| (i, root)).collect();

        while let Some((index, parent)) = stack.pop() {
            let bone = &mut self.bones[index];
            bone.world_matrix = parent * bone.local_matrix();
            let world = bone.world_matrix;
            stack.extend(bone.children.iter().rev().map(|&child| (child, world)));
        }
        trace!("skeleton updated ({} bones)", self.bones.len());
    }

    /// World matrix of a bone as of the last update
    pub fn world_matrix(&self, name: &str) -> Option<Matrix4x4> {
        self.bone(name).map(|bone| bone.world_matrix)
    }

    /// `world * inverse_bind` for every bone in skin order
    pub fn skin_matrices(&self) -> Vec<Matrix4x4> {
        self.bones.iter().map(Bone::skin_matrix).collect()
    }

    /// Restore every bone's rest pose; call `update` afterwards
    pub fn reset_to_rest(&mut self) {
        for bone in &mut self.bones {
            bone.reset_to_rest();
        }
    }
}
