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

//! Backend-agnostic resource descriptors and device limits.
//!
//! Everything here is a plain value type: descriptors carry enough metadata
//! for validation without touching the native object, and handles are opaque
//! ids only the owning backend may interpret.

pub mod adapter;
pub mod buffer;
pub mod draw;
pub mod frame_buffer;
pub mod program;
pub mod render_target;
pub mod state;
pub mod texture;
pub mod vertex;

pub use adapter::{AdapterInfo, DeviceType, GraphicsBackendType};
pub use buffer::{
    BufferDescriptor, BufferId, BufferUsage, BufferUsageHint, IndexBufferBinding,
    VertexBufferBinding,
};
pub use draw::DrawCall;
pub use frame_buffer::{AttachmentType, FrameBuffer, MAX_BUFFER_TYPE_COUNT};
pub use program::{ProgramDescriptor, ProgramId, ShaderSource};
pub use render_target::{RenderTarget, RenderTargetDescriptor, RenderTargetId};
pub use state::{
    ColorWrites, CompareFunction, FixedFunctionState, IndexFormat, PrimitiveTopology, ScissorRect,
    StencilOperation, StencilState,
};
pub use texture::{
    Texture, TextureDescriptor, TextureFilter, TextureFormat, TextureFormatSupport, TextureId,
    TextureParams, TextureType, TextureUsage, TextureWrap,
};
pub use vertex::{VertexDeclaration, VertexElementType, VertexStream, MAX_VERTEX_STREAM_COUNT};

/// Number of 4-component vector registers available for shader constants.
pub const MAX_REGISTER_COUNT: usize = 16;

/// Number of texture units a context can bind simultaneously.
pub const MAX_TEXTURE_UNITS: usize = 32;
