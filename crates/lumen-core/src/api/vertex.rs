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

//! Vertex stream layout descriptors.

use crate::error::GraphicsError;

/// Maximum number of streams a single vertex declaration may carry.
pub const MAX_VERTEX_STREAM_COUNT: usize = 8;

/// The scalar type of a vertex stream's components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VertexElementType {
    /// 32-bit float.
    Float32,
    /// 8-bit unsigned integer.
    Uint8,
    /// 16-bit unsigned integer.
    Uint16,
    /// 32-bit unsigned integer.
    Uint32,
}

impl VertexElementType {
    /// The size in bytes of a single component of this type.
    pub const fn byte_size(&self) -> u16 {
        match self {
            VertexElementType::Float32 => 4,
            VertexElementType::Uint8 => 1,
            VertexElementType::Uint16 => 2,
            VertexElementType::Uint32 => 4,
        }
    }
}

/// A single named attribute within a vertex declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexStream {
    /// The attribute name as it appears in shader source.
    pub name: String,
    /// The position of this stream within its declaration.
    pub stream_index: u32,
    /// The shader input location the stream feeds.
    pub location: u32,
    /// Number of components per vertex, 1 through 4.
    pub component_count: u32,
    /// Byte offset of the first component from the start of the vertex.
    pub offset: u16,
    /// The scalar type of each component.
    pub element_type: VertexElementType,
    /// Whether integer components are normalized to `[0, 1]` when read.
    pub normalized: bool,
}

impl VertexStream {
    /// The number of bytes this stream occupies within a vertex.
    pub fn byte_width(&self) -> u16 {
        self.element_type.byte_size() * self.component_count as u16
    }
}

/// A validated description of how one vertex buffer's bytes map to shader
/// inputs.
///
/// Construction is the only validation point: a value of this type always
/// holds at most [`MAX_VERTEX_STREAM_COUNT`] streams, every stream fits
/// inside the stride, and no two streams overlap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexDeclaration {
    streams: Vec<VertexStream>,
    stride: u16,
}

impl VertexDeclaration {
    /// Validates and builds a declaration from its streams and vertex stride.
    ///
    /// # Errors
    ///
    /// Returns [`GraphicsError::ResourceLimitExceeded`] when more than
    /// [`MAX_VERTEX_STREAM_COUNT`] streams are given, and
    /// [`GraphicsError::InvalidDescriptor`] when a stream has a component
    /// count outside 1..=4, extends past the stride, or overlaps another
    /// stream.
    pub fn new(streams: Vec<VertexStream>, stride: u16) -> Result<Self, GraphicsError> {
        if streams.len() > MAX_VERTEX_STREAM_COUNT {
            return Err(GraphicsError::ResourceLimitExceeded {
                resource: "vertex streams",
                requested: streams.len() as u32,
                limit: MAX_VERTEX_STREAM_COUNT as u32,
            });
        }
        // Widened arithmetic: offset + width can exceed u16 for offsets a
        // caller can legally write into the struct.
        for stream in &streams {
            if stream.component_count == 0 || stream.component_count > 4 {
                return Err(GraphicsError::InvalidDescriptor(format!(
                    "stream '{}' has component count {}, expected 1 through 4",
                    stream.name, stream.component_count
                )));
            }
            let end = stream.offset as u32 + stream.byte_width() as u32;
            if end > stride as u32 {
                return Err(GraphicsError::InvalidDescriptor(format!(
                    "stream '{}' ends at byte {end}, past the declared stride {stride}",
                    stream.name
                )));
            }
        }
        for (i, a) in streams.iter().enumerate() {
            for b in &streams[i + 1..] {
                let a_end = a.offset as u32 + a.byte_width() as u32;
                let b_end = b.offset as u32 + b.byte_width() as u32;
                if (a.offset as u32) < b_end && (b.offset as u32) < a_end {
                    return Err(GraphicsError::InvalidDescriptor(format!(
                        "streams '{}' and '{}' overlap",
                        a.name, b.name
                    )));
                }
            }
        }
        Ok(Self { streams, stride })
    }

    /// The streams in declaration order.
    pub fn streams(&self) -> &[VertexStream] {
        &self.streams
    }

    /// The byte distance between consecutive vertices.
    pub fn stride(&self) -> u16 {
        self.stride
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(name: &str, index: u32, components: u32, offset: u16) -> VertexStream {
        VertexStream {
            name: name.to_string(),
            stream_index: index,
            location: index,
            component_count: components,
            offset,
            element_type: VertexElementType::Float32,
            normalized: false,
        }
    }

    #[test]
    fn accepts_position_normal_uv_layout() {
        let decl = VertexDeclaration::new(
            vec![
                stream("position", 0, 3, 0),
                stream("normal", 1, 3, 12),
                stream("texcoord0", 2, 2, 24),
            ],
            32,
        )
        .unwrap();
        assert_eq!(decl.streams().len(), 3);
        assert_eq!(decl.stride(), 32);
    }

    #[test]
    fn rejects_too_many_streams() {
        let streams: Vec<VertexStream> = (0..9)
            .map(|i| stream(&format!("attr{i}"), i, 1, (i * 4) as u16))
            .collect();
        let err = VertexDeclaration::new(streams, 36).unwrap_err();
        assert!(matches!(
            err,
            GraphicsError::ResourceLimitExceeded {
                resource: "vertex streams",
                requested: 9,
                limit: 8,
            }
        ));
    }

    #[test]
    fn rejects_stream_past_stride() {
        let err = VertexDeclaration::new(vec![stream("position", 0, 4, 4)], 16).unwrap_err();
        assert!(matches!(err, GraphicsError::InvalidDescriptor(_)));
    }

    #[test]
    fn rejects_overlapping_streams() {
        let err = VertexDeclaration::new(
            vec![stream("position", 0, 3, 0), stream("normal", 1, 3, 8)],
            24,
        )
        .unwrap_err();
        assert!(matches!(err, GraphicsError::InvalidDescriptor(_)));
    }

    #[test]
    fn rejects_zero_components() {
        let err = VertexDeclaration::new(vec![stream("position", 0, 0, 0)], 16).unwrap_err();
        assert!(matches!(err, GraphicsError::InvalidDescriptor(_)));
    }

    #[test]
    fn rejects_offset_at_u16_max_without_overflow() {
        // offset + byte_width exceeds u16::MAX; must come back as an error,
        // not wrap around and slip past the stride check.
        let err =
            VertexDeclaration::new(vec![stream("position", 0, 4, u16::MAX)], 16).unwrap_err();
        assert!(matches!(err, GraphicsError::InvalidDescriptor(_)));

        let err = VertexDeclaration::new(
            vec![stream("position", 0, 3, 0), stream("extra", 1, 4, u16::MAX)],
            u16::MAX,
        )
        .unwrap_err();
        assert!(matches!(err, GraphicsError::InvalidDescriptor(_)));
    }
}
