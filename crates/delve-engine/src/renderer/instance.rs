use bytemuck::{Pod, Zeroable};

/// Per-tile draw data handed to the renderer.
/// 6 floats = 24 bytes stride, tightly packed so a batch can be uploaded as-is.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct TileInstance {
    /// Left edge in world pixels.
    pub x: f32,
    /// Top edge in world pixels (Y-down).
    pub y: f32,
    /// Tile edge length in world pixels.
    pub size: f32,
    /// Atlas index, or [`TileInstance::DARK_VARIANT`] for a solid dark fill.
    pub variant: f32,
    /// Draw layer; lower values draw first.
    pub z: f32,
    /// 1.0 when the level's tint colour applies, 0.0 otherwise.
    pub tinted: f32,
}

impl TileInstance {
    pub const FLOATS: usize = 6;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
    pub const DARK_VARIANT: f32 = -1.0;

    pub fn is_dark(&self) -> bool {
        self.variant == Self::DARK_VARIANT
    }
}

/// Flatten a batch into the float layout the renderer consumes.
pub fn as_floats(instances: &[TileInstance]) -> &[f32] {
    bytemuck::cast_slice(instances)
}
