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

use lumen_core::api::{
    BufferUsage, ColorWrites, CompareFunction, IndexFormat, PrimitiveTopology, StencilOperation,
    TextureFilter, TextureFormat, TextureUsage, TextureWrap, VertexElementType, VertexStream,
};

/// A local extension trait to convert core types into wgpu-compatible types.
/// This avoids Rust's orphan rules while keeping an idiomatic `.into_wgpu()`
/// syntax.
pub trait IntoWgpu<T> {
    /// Consumes self and converts it into a wgpu-compatible type.
    fn into_wgpu(self) -> T;
}

impl IntoWgpu<wgpu::TextureFormat> for TextureFormat {
    fn into_wgpu(self) -> wgpu::TextureFormat {
        match self {
            TextureFormat::R8Unorm => wgpu::TextureFormat::R8Unorm,
            TextureFormat::Rg8Unorm => wgpu::TextureFormat::Rg8Unorm,
            TextureFormat::Rgba8Unorm => wgpu::TextureFormat::Rgba8Unorm,
            TextureFormat::Rgba8UnormSrgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            TextureFormat::Bgra8UnormSrgb => wgpu::TextureFormat::Bgra8UnormSrgb,
            TextureFormat::Rgba16Float => wgpu::TextureFormat::Rgba16Float,
            TextureFormat::Rgba32Float => wgpu::TextureFormat::Rgba32Float,
            TextureFormat::Depth24PlusStencil8 => wgpu::TextureFormat::Depth24PlusStencil8,
            TextureFormat::Depth32Float => wgpu::TextureFormat::Depth32Float,
            TextureFormat::Depth32FloatStencil8 => wgpu::TextureFormat::Depth32FloatStencil8,
        }
    }
}

/// Maps a wgpu format back into the core vocabulary. Formats the core layer
/// has no name for come back as `None`.
pub fn from_wgpu_texture_format(format: wgpu::TextureFormat) -> Option<TextureFormat> {
    match format {
        wgpu::TextureFormat::R8Unorm => Some(TextureFormat::R8Unorm),
        wgpu::TextureFormat::Rg8Unorm => Some(TextureFormat::Rg8Unorm),
        wgpu::TextureFormat::Rgba8Unorm => Some(TextureFormat::Rgba8Unorm),
        wgpu::TextureFormat::Rgba8UnormSrgb => Some(TextureFormat::Rgba8UnormSrgb),
        wgpu::TextureFormat::Bgra8UnormSrgb => Some(TextureFormat::Bgra8UnormSrgb),
        wgpu::TextureFormat::Rgba16Float => Some(TextureFormat::Rgba16Float),
        wgpu::TextureFormat::Rgba32Float => Some(TextureFormat::Rgba32Float),
        wgpu::TextureFormat::Depth24PlusStencil8 => Some(TextureFormat::Depth24PlusStencil8),
        wgpu::TextureFormat::Depth32Float => Some(TextureFormat::Depth32Float),
        wgpu::TextureFormat::Depth32FloatStencil8 => Some(TextureFormat::Depth32FloatStencil8),
        _ => None,
    }
}

impl IntoWgpu<wgpu::FilterMode> for TextureFilter {
    fn into_wgpu(self) -> wgpu::FilterMode {
        match self {
            TextureFilter::Nearest => wgpu::FilterMode::Nearest,
            TextureFilter::Linear => wgpu::FilterMode::Linear,
        }
    }
}

impl IntoWgpu<wgpu::AddressMode> for TextureWrap {
    fn into_wgpu(self) -> wgpu::AddressMode {
        match self {
            TextureWrap::Repeat => wgpu::AddressMode::Repeat,
            TextureWrap::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            TextureWrap::MirrorRepeat => wgpu::AddressMode::MirrorRepeat,
        }
    }
}

impl IntoWgpu<wgpu::CompareFunction> for CompareFunction {
    fn into_wgpu(self) -> wgpu::CompareFunction {
        match self {
            CompareFunction::Never => wgpu::CompareFunction::Never,
            CompareFunction::Less => wgpu::CompareFunction::Less,
            CompareFunction::Equal => wgpu::CompareFunction::Equal,
            CompareFunction::LessEqual => wgpu::CompareFunction::LessEqual,
            CompareFunction::Greater => wgpu::CompareFunction::Greater,
            CompareFunction::NotEqual => wgpu::CompareFunction::NotEqual,
            CompareFunction::GreaterEqual => wgpu::CompareFunction::GreaterEqual,
            CompareFunction::Always => wgpu::CompareFunction::Always,
        }
    }
}

impl IntoWgpu<wgpu::StencilOperation> for StencilOperation {
    fn into_wgpu(self) -> wgpu::StencilOperation {
        match self {
            StencilOperation::Keep => wgpu::StencilOperation::Keep,
            StencilOperation::Zero => wgpu::StencilOperation::Zero,
            StencilOperation::Replace => wgpu::StencilOperation::Replace,
            StencilOperation::IncrementClamp => wgpu::StencilOperation::IncrementClamp,
            StencilOperation::DecrementClamp => wgpu::StencilOperation::DecrementClamp,
            StencilOperation::Invert => wgpu::StencilOperation::Invert,
            StencilOperation::IncrementWrap => wgpu::StencilOperation::IncrementWrap,
            StencilOperation::DecrementWrap => wgpu::StencilOperation::DecrementWrap,
        }
    }
}

impl IntoWgpu<wgpu::PrimitiveTopology> for PrimitiveTopology {
    fn into_wgpu(self) -> wgpu::PrimitiveTopology {
        match self {
            PrimitiveTopology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
            PrimitiveTopology::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
            PrimitiveTopology::LineList => wgpu::PrimitiveTopology::LineList,
        }
    }
}

impl IntoWgpu<wgpu::IndexFormat> for IndexFormat {
    fn into_wgpu(self) -> wgpu::IndexFormat {
        match self {
            IndexFormat::Uint16 => wgpu::IndexFormat::Uint16,
            IndexFormat::Uint32 => wgpu::IndexFormat::Uint32,
        }
    }
}

impl IntoWgpu<wgpu::ColorWrites> for ColorWrites {
    fn into_wgpu(self) -> wgpu::ColorWrites {
        let mut writes = wgpu::ColorWrites::empty();
        if self.contains(ColorWrites::R) {
            writes |= wgpu::ColorWrites::RED;
        }
        if self.contains(ColorWrites::G) {
            writes |= wgpu::ColorWrites::GREEN;
        }
        if self.contains(ColorWrites::B) {
            writes |= wgpu::ColorWrites::BLUE;
        }
        if self.contains(ColorWrites::A) {
            writes |= wgpu::ColorWrites::ALPHA;
        }
        writes
    }
}

impl IntoWgpu<wgpu::BufferUsages> for BufferUsage {
    fn into_wgpu(self) -> wgpu::BufferUsages {
        let mut usages = wgpu::BufferUsages::empty();
        if self.contains(BufferUsage::COPY_SRC) {
            usages |= wgpu::BufferUsages::COPY_SRC;
        }
        if self.contains(BufferUsage::COPY_DST) {
            usages |= wgpu::BufferUsages::COPY_DST;
        }
        if self.contains(BufferUsage::VERTEX) {
            usages |= wgpu::BufferUsages::VERTEX;
        }
        if self.contains(BufferUsage::INDEX) {
            usages |= wgpu::BufferUsages::INDEX;
        }
        if self.contains(BufferUsage::UNIFORM) {
            usages |= wgpu::BufferUsages::UNIFORM;
        }
        usages
    }
}

impl IntoWgpu<wgpu::TextureUsages> for TextureUsage {
    fn into_wgpu(self) -> wgpu::TextureUsages {
        let mut usages = wgpu::TextureUsages::empty();
        if self.contains(TextureUsage::COPY_SRC) {
            usages |= wgpu::TextureUsages::COPY_SRC;
        }
        if self.contains(TextureUsage::COPY_DST) {
            usages |= wgpu::TextureUsages::COPY_DST;
        }
        if self.contains(TextureUsage::SAMPLED) {
            usages |= wgpu::TextureUsages::TEXTURE_BINDING;
        }
        if self.contains(TextureUsage::RENDER_ATTACHMENT) {
            usages |= wgpu::TextureUsages::RENDER_ATTACHMENT;
        }
        usages
    }
}

/// Picks the wgpu vertex format for a stream's type, component count, and
/// normalization. Combinations wgpu has no format for return `None`; the
/// declaration is rejected at pipeline build time.
pub fn vertex_format(stream: &VertexStream) -> Option<wgpu::VertexFormat> {
    match (stream.element_type, stream.component_count, stream.normalized) {
        (VertexElementType::Float32, 1, false) => Some(wgpu::VertexFormat::Float32),
        (VertexElementType::Float32, 2, false) => Some(wgpu::VertexFormat::Float32x2),
        (VertexElementType::Float32, 3, false) => Some(wgpu::VertexFormat::Float32x3),
        (VertexElementType::Float32, 4, false) => Some(wgpu::VertexFormat::Float32x4),
        (VertexElementType::Uint8, 2, false) => Some(wgpu::VertexFormat::Uint8x2),
        (VertexElementType::Uint8, 4, false) => Some(wgpu::VertexFormat::Uint8x4),
        (VertexElementType::Uint8, 2, true) => Some(wgpu::VertexFormat::Unorm8x2),
        (VertexElementType::Uint8, 4, true) => Some(wgpu::VertexFormat::Unorm8x4),
        (VertexElementType::Uint16, 2, false) => Some(wgpu::VertexFormat::Uint16x2),
        (VertexElementType::Uint16, 4, false) => Some(wgpu::VertexFormat::Uint16x4),
        (VertexElementType::Uint16, 2, true) => Some(wgpu::VertexFormat::Unorm16x2),
        (VertexElementType::Uint16, 4, true) => Some(wgpu::VertexFormat::Unorm16x4),
        (VertexElementType::Uint32, 1, false) => Some(wgpu::VertexFormat::Uint32),
        (VertexElementType::Uint32, 2, false) => Some(wgpu::VertexFormat::Uint32x2),
        (VertexElementType::Uint32, 3, false) => Some(wgpu::VertexFormat::Uint32x3),
        (VertexElementType::Uint32, 4, false) => Some(wgpu::VertexFormat::Uint32x4),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_format_round_trip() {
        let formats = [
            TextureFormat::R8Unorm,
            TextureFormat::Rgba8UnormSrgb,
            TextureFormat::Bgra8UnormSrgb,
            TextureFormat::Rgba16Float,
            TextureFormat::Depth24PlusStencil8,
            TextureFormat::Depth32FloatStencil8,
        ];
        for format in formats {
            assert_eq!(from_wgpu_texture_format(format.into_wgpu()), Some(format));
        }
    }

    #[test]
    fn unknown_wgpu_format_maps_to_none() {
        assert_eq!(from_wgpu_texture_format(wgpu::TextureFormat::Rg11b10Ufloat), None);
    }

    #[test]
    fn color_writes_conversion() {
        let all: wgpu::ColorWrites = ColorWrites::ALL.into_wgpu();
        assert_eq!(all, wgpu::ColorWrites::ALL);
        let rg: wgpu::ColorWrites = (ColorWrites::R | ColorWrites::G).into_wgpu();
        assert_eq!(rg, wgpu::ColorWrites::RED | wgpu::ColorWrites::GREEN);
    }

    #[test]
    fn vertex_format_selection() {
        let stream = |ty, count, norm| VertexStream {
            name: "attr".to_string(),
            stream_index: 0,
            location: 0,
            component_count: count,
            offset: 0,
            element_type: ty,
            normalized: norm,
        };
        assert_eq!(
            vertex_format(&stream(VertexElementType::Float32, 3, false)),
            Some(wgpu::VertexFormat::Float32x3)
        );
        assert_eq!(
            vertex_format(&stream(VertexElementType::Uint8, 4, true)),
            Some(wgpu::VertexFormat::Unorm8x4)
        );
        // No 3-component byte format exists.
        assert_eq!(vertex_format(&stream(VertexElementType::Uint8, 3, false)), None);
    }
}
