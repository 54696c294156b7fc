// Copyright 2025 the lumen authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines data structures related to GPU texture resources.

use crate::lumen_bitflags;
use std::borrow::Cow;

/// The dimensionality of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureType {
    /// A two-dimensional texture.
    D2,
    /// A cubemap texture (6 faces of a 2D texture).
    Cube,
}

/// Defines the filtering mode for texture sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFilter {
    /// Point sampling. Returns the value of the nearest texel.
    Nearest,
    /// Linear interpolation between the nearest texels.
    #[default]
    Linear,
}

/// Defines how texture coordinates are handled when sampling outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureWrap {
    /// Coordinates wrap around. `1.1` becomes `0.1`.
    Repeat,
    /// Coordinates are clamped to the edge. `1.1` becomes `1.0`.
    #[default]
    ClampToEdge,
    /// Coordinates wrap around, mirroring at each integer boundary.
    MirrorRepeat,
}

/// Defines the memory format of pixels in a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextureFormat {
    /// One 8-bit unsigned normalized component.
    R8Unorm,
    /// Two 8-bit unsigned normalized components.
    Rg8Unorm,
    /// Four 8-bit unsigned normalized components (RGBA).
    Rgba8Unorm,
    /// Four 8-bit unsigned normalized components (RGBA) in the sRGB color space.
    Rgba8UnormSrgb,
    /// Four 8-bit unsigned normalized components (BGRA) in the sRGB color space.
    /// This is a common swapchain format.
    Bgra8UnormSrgb,
    /// Four 16-bit float components.
    Rgba16Float,
    /// Four 32-bit float components.
    Rgba32Float,
    /// A 24-bit unsigned normalized depth format with an 8-bit stencil component.
    Depth24PlusStencil8,
    /// A 32-bit float depth format.
    Depth32Float,
    /// A 32-bit float depth format with an 8-bit stencil component.
    Depth32FloatStencil8,
}

impl TextureFormat {
    /// Returns the size in bytes of a single pixel for this format.
    /// Note: this can be an approximation for packed formats.
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            TextureFormat::R8Unorm => 1,
            TextureFormat::Rg8Unorm => 2,
            TextureFormat::Rgba8Unorm => 4,
            TextureFormat::Rgba8UnormSrgb => 4,
            TextureFormat::Bgra8UnormSrgb => 4,
            TextureFormat::Rgba16Float => 8,
            TextureFormat::Rgba32Float => 16,
            TextureFormat::Depth24PlusStencil8 => 4,
            TextureFormat::Depth32Float => 4,
            TextureFormat::Depth32FloatStencil8 => 5,
        }
    }

    /// Returns `true` if this format carries a depth component.
    pub fn has_depth(&self) -> bool {
        matches!(
            self,
            TextureFormat::Depth24PlusStencil8
                | TextureFormat::Depth32Float
                | TextureFormat::Depth32FloatStencil8
        )
    }

    /// Returns the bit representing this format in a [`TextureFormatSupport`] mask.
    pub const fn support_bit(&self) -> TextureFormatSupport {
        match self {
            TextureFormat::R8Unorm => TextureFormatSupport::R8_UNORM,
            TextureFormat::Rg8Unorm => TextureFormatSupport::RG8_UNORM,
            TextureFormat::Rgba8Unorm => TextureFormatSupport::RGBA8_UNORM,
            TextureFormat::Rgba8UnormSrgb => TextureFormatSupport::RGBA8_UNORM_SRGB,
            TextureFormat::Bgra8UnormSrgb => TextureFormatSupport::BGRA8_UNORM_SRGB,
            TextureFormat::Rgba16Float => TextureFormatSupport::RGBA16_FLOAT,
            TextureFormat::Rgba32Float => TextureFormatSupport::RGBA32_FLOAT,
            TextureFormat::Depth24PlusStencil8 => TextureFormatSupport::DEPTH24_PLUS_STENCIL8,
            TextureFormat::Depth32Float => TextureFormatSupport::DEPTH32_FLOAT,
            TextureFormat::Depth32FloatStencil8 => TextureFormatSupport::DEPTH32_FLOAT_STENCIL8,
        }
    }
}

lumen_bitflags! {
    /// A bit-per-format mask of the texture formats a backend supports.
    ///
    /// Populated once by the backend at initialization and consulted by
    /// texture creation before any native allocation is attempted.
    pub struct TextureFormatSupport: u32 {
        /// [`TextureFormat::R8Unorm`] is supported.
        const R8_UNORM = 1 << 0;
        /// [`TextureFormat::Rg8Unorm`] is supported.
        const RG8_UNORM = 1 << 1;
        /// [`TextureFormat::Rgba8Unorm`] is supported.
        const RGBA8_UNORM = 1 << 2;
        /// [`TextureFormat::Rgba8UnormSrgb`] is supported.
        const RGBA8_UNORM_SRGB = 1 << 3;
        /// [`TextureFormat::Bgra8UnormSrgb`] is supported.
        const BGRA8_UNORM_SRGB = 1 << 4;
        /// [`TextureFormat::Rgba16Float`] is supported.
        const RGBA16_FLOAT = 1 << 5;
        /// [`TextureFormat::Rgba32Float`] is supported.
        const RGBA32_FLOAT = 1 << 6;
        /// [`TextureFormat::Depth24PlusStencil8`] is supported.
        const DEPTH24_PLUS_STENCIL8 = 1 << 7;
        /// [`TextureFormat::Depth32Float`] is supported.
        const DEPTH32_FLOAT = 1 << 8;
        /// [`TextureFormat::Depth32FloatStencil8`] is supported.
        const DEPTH32_FLOAT_STENCIL8 = 1 << 9;
    }
}

lumen_bitflags! {
    /// A set of flags describing the allowed usages of a texture.
    pub struct TextureUsage: u32 {
        /// The texture can be used as the source of a copy operation.
        const COPY_SRC = 1 << 0;
        /// The texture can be used as the destination of a copy operation.
        const COPY_DST = 1 << 1;
        /// The texture can be bound in a shader for sampling.
        const SAMPLED = 1 << 2;
        /// The texture can be used as a color or depth/stencil attachment.
        const RENDER_ATTACHMENT = 1 << 3;
    }
}

/// Sampling parameters attached to a texture: wrap modes, filters, format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureParams {
    /// The wrap mode for the U texture coordinate.
    pub wrap_u: TextureWrap,
    /// The wrap mode for the V texture coordinate.
    pub wrap_v: TextureWrap,
    /// The filter used when the texture is minified.
    pub min_filter: TextureFilter,
    /// The filter used when the texture is magnified.
    pub mag_filter: TextureFilter,
    /// The texel format of the texture.
    pub format: TextureFormat,
}

impl TextureParams {
    /// Default parameters for a given format: clamped, linearly filtered.
    pub fn with_format(format: TextureFormat) -> Self {
        Self {
            wrap_u: TextureWrap::default(),
            wrap_v: TextureWrap::default(),
            min_filter: TextureFilter::default(),
            mag_filter: TextureFilter::default(),
            format,
        }
    }
}

/// A descriptor used to create a [`Texture`].
#[derive(Debug, Clone)]
pub struct TextureDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The dimensionality of the texture.
    pub texture_type: TextureType,
    /// Width of the base mip level in texels.
    pub width: u32,
    /// Height of the base mip level in texels.
    pub height: u32,
    /// The number of mipmap levels.
    pub mip_level_count: u32,
    /// Sampling parameters and format.
    pub params: TextureParams,
    /// A bitmask of [`TextureUsage`] flags describing how the texture will be used.
    pub usage: TextureUsage,
}

/// An opaque handle to a native GPU texture object.
///
/// Only the backend that issued the id may interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// A GPU image plus the metadata needed for validation without touching the
/// native object.
///
/// The original dimensions are recorded at creation and never change; the
/// current dimensions track the live allocation and move only through an
/// explicit resize. The native handle is owned exclusively by this value:
/// textures are released by an explicit destroy call, never collected
/// implicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    handle: TextureId,
    texture_type: TextureType,
    mip_level_count: u32,
    width: u32,
    height: u32,
    original_width: u32,
    original_height: u32,
    params: TextureParams,
}

impl Texture {
    /// Builds the caller-side record for a freshly created native texture.
    ///
    /// Called by backends after the native allocation succeeded; not useful
    /// on its own.
    pub fn new(handle: TextureId, descriptor: &TextureDescriptor) -> Self {
        Self {
            handle,
            texture_type: descriptor.texture_type,
            mip_level_count: descriptor.mip_level_count,
            width: descriptor.width,
            height: descriptor.height,
            original_width: descriptor.width,
            original_height: descriptor.height,
            params: descriptor.params,
        }
    }

    /// The opaque native handle.
    pub fn handle(&self) -> TextureId {
        self.handle
    }

    /// The dimensionality of the texture.
    pub fn texture_type(&self) -> TextureType {
        self.texture_type
    }

    /// The number of mipmap levels.
    pub fn mip_level_count(&self) -> u32 {
        self.mip_level_count
    }

    /// Width of the live allocation in texels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the live allocation in texels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width recorded at creation. Immutable for the texture's lifetime.
    pub fn original_width(&self) -> u32 {
        self.original_width
    }

    /// Height recorded at creation. Immutable for the texture's lifetime.
    pub fn original_height(&self) -> u32 {
        self.original_height
    }

    /// Sampling parameters and format.
    pub fn params(&self) -> &TextureParams {
        &self.params
    }

    /// Records the dimensions of a completed resize.
    ///
    /// Backends call this after swapping the backing storage; mip count,
    /// type, and original dimensions are deliberately untouched.
    pub fn apply_resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor_256() -> TextureDescriptor<'static> {
        TextureDescriptor {
            label: None,
            texture_type: TextureType::D2,
            width: 256,
            height: 256,
            mip_level_count: 1,
            params: TextureParams::with_format(TextureFormat::Rgba8Unorm),
            usage: TextureUsage::SAMPLED | TextureUsage::COPY_DST,
        }
    }

    #[test]
    fn resize_preserves_original_dimensions() {
        let mut texture = Texture::new(TextureId(1), &descriptor_256());
        texture.apply_resize(128, 128);
        assert_eq!(texture.width(), 128);
        assert_eq!(texture.height(), 128);
        assert_eq!(texture.original_width(), 256);
        assert_eq!(texture.original_height(), 256);
        assert_eq!(texture.mip_level_count(), 1);
        assert_eq!(texture.texture_type(), TextureType::D2);
    }

    #[test]
    fn format_support_bits_are_distinct() {
        let formats = [
            TextureFormat::R8Unorm,
            TextureFormat::Rg8Unorm,
            TextureFormat::Rgba8Unorm,
            TextureFormat::Rgba8UnormSrgb,
            TextureFormat::Bgra8UnormSrgb,
            TextureFormat::Rgba16Float,
            TextureFormat::Rgba32Float,
            TextureFormat::Depth24PlusStencil8,
            TextureFormat::Depth32Float,
            TextureFormat::Depth32FloatStencil8,
        ];
        let mut mask = TextureFormatSupport::EMPTY;
        for format in formats {
            let bit = format.support_bit();
            assert!(!mask.intersects(bit), "duplicate bit for {format:?}");
            mask.insert(bit);
        }
    }

    #[test]
    fn depth_format_classification() {
        assert!(TextureFormat::Depth32Float.has_depth());
        assert!(TextureFormat::Depth24PlusStencil8.has_depth());
        assert!(!TextureFormat::Rgba8Unorm.has_depth());
    }
}
