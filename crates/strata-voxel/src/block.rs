//! Block value types.
//!
//! A [`Block`] is an immutable value describing one voxel: its type and its
//! appearance. Colors are either literal RGBA or an index into the shared
//! [`ColorPalette`](crate::palette::ColorPalette); air blocks carry no
//! visible geometry.

use crate::palette::ColorPalette;

/// The kind of material a block is made of.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlockType {
    /// Empty space. Never produces geometry.
    #[default]
    Air,
    /// Solid terrain.
    Stone,
}

/// A block's appearance: a literal color or an index into the color palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockColor {
    /// Literal RGBA color.
    Rgba([u8; 4]),
    /// Index into the process-wide [`ColorPalette`].
    Palette(u8),
}

impl BlockColor {
    /// Decodes this color to RGBA, consulting the palette for indexed colors.
    pub fn resolve(self, palette: &ColorPalette) -> [u8; 4] {
        match self {
            Self::Rgba(color) => color,
            Self::Palette(index) => palette.color(index as usize),
        }
    }
}

impl Default for BlockColor {
    fn default() -> Self {
        Self::Rgba([0, 0, 0, 0])
    }
}

/// One voxel's worth of world data. Immutable once constructed; chunk arrays
/// hold blocks by value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Block {
    /// Material type.
    pub block_type: BlockType,
    /// Appearance.
    pub color: BlockColor,
}

impl Block {
    /// The canonical air block.
    pub const AIR: Self = Self {
        block_type: BlockType::Air,
        color: BlockColor::Rgba([0, 0, 0, 0]),
    };

    /// Creates a new block.
    pub fn new(block_type: BlockType, color: BlockColor) -> Self {
        Self { block_type, color }
    }

    /// Returns `true` if this block is air.
    pub fn is_air(self) -> bool {
        self.block_type == BlockType::Air
    }

    /// Returns `true` if this block produces geometry.
    pub fn is_solid(self) -> bool {
        !self.is_air()
    }
}
