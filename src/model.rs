use glam::{Mat4, Vec3};

use crate::mesh::{Mesh, Object};

/// A model resolved from a CGFX container: objects binding meshes to
/// materials, the meshes themselves, and the model's transforms.
#[derive(Clone, Debug)]
pub struct Model {
	pub name: String,
	pub transform_scale: Vec3,
	pub transform_rotation: Vec3,
	pub transform_translation: Vec3,
	pub transform_local: Mat4,
	pub transform_world: Mat4,
	pub is_visible: bool,
	pub objects: Vec<Object>,
	pub meshes: Vec<Mesh>,
	/// Whether the model carries a skeleton entry. Skeleton payloads are
	/// not interpreted.
	pub has_skeleton: bool,
}
