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

//! The backend contract.

use crate::api::{
    AdapterInfo, BufferDescriptor, BufferId, DrawCall, ProgramDescriptor, ProgramId, RenderTarget,
    RenderTargetDescriptor, Texture, TextureDescriptor, TextureFormat, TextureFormatSupport,
};
use crate::context::DeviceContext;
use crate::error::GraphicsError;
use std::fmt::Debug;

/// The operations every rendering backend implements.
///
/// Resource creation is fallible and returns the error to the caller. Draws
/// validate against the [`DeviceContext`] first and drop the submission on
/// an inconsistent binding set, leaving the context untouched. Destruction
/// never fails outward: a backend that cannot release a resource logs the
/// leak and moves on.
pub trait GraphicsDevice: Send + Debug + 'static {
    /// Information about the adapter this device was created on.
    /// ## Returns
    /// A standardized [`AdapterInfo`] describing the adapter and backend.
    fn adapter_info(&self) -> AdapterInfo;

    /// The texture format of the presentation surface.
    fn surface_format(&self) -> TextureFormat;

    /// The formats this backend can create textures in, as a bitmask.
    /// Computed once at initialization.
    fn format_support(&self) -> TextureFormatSupport;

    /// Creates a GPU texture.
    /// ## Arguments
    /// * `descriptor` - The texture configuration.
    /// ## Errors
    /// * [`GraphicsError::UnsupportedFormat`] - The format is outside the
    ///   supported set; no native allocation was attempted.
    /// * [`GraphicsError::ResourceLimitExceeded`] - A dimension exceeds the
    ///   backend's limits.
    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<Texture, GraphicsError>;

    /// Uploads pixel data to one mip level of `texture`.
    /// ## Arguments
    /// * `texture` - The destination texture.
    /// * `mip_level` - The destination mip level.
    /// * `data` - Tightly packed pixel bytes for the whole level. Cube
    ///   textures carry all six faces back to back, +X through -Z.
    fn set_texture_data(
        &self,
        texture: &Texture,
        mip_level: u32,
        data: &[u8],
    ) -> Result<(), GraphicsError>;

    /// Reallocates `texture`'s backing storage at a new size.
    ///
    /// On success the texture's current dimensions change; its original
    /// dimensions and handle do not.
    fn resize_texture(
        &self,
        texture: &mut Texture,
        width: u32,
        height: u32,
    ) -> Result<(), GraphicsError>;

    /// Releases `texture`'s native object and unbinds it from every texture
    /// unit of `context`. Failures are logged, never returned.
    fn destroy_texture(&self, texture: Texture, context: &mut DeviceContext);

    /// Creates a GPU buffer.
    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId, GraphicsError>;

    /// Creates a GPU buffer and initializes it with `data`.
    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, GraphicsError>;

    /// Writes `data` into the buffer at `offset`.
    /// ## Errors
    /// * [`GraphicsError::InvalidHandle`] - The buffer id is unknown.
    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), GraphicsError>;

    /// Releases the buffer's native object. Failures are logged, never
    /// returned.
    fn destroy_buffer(&self, id: BufferId);

    /// Creates a shader program from paired vertex and fragment sources.
    /// No reflection is performed; sources are handed to the native API
    /// as-is.
    fn create_program(&self, descriptor: &ProgramDescriptor) -> Result<ProgramId, GraphicsError>;

    /// Releases the program's native object. Failures are logged, never
    /// returned.
    fn destroy_program(&self, id: ProgramId);

    /// Creates an off-screen render target with the attachments the
    /// descriptor asks for. The returned value owns its color texture.
    fn create_render_target(
        &self,
        descriptor: &RenderTargetDescriptor,
    ) -> Result<RenderTarget, GraphicsError>;

    /// Releases the target and every attachment it owns, and clears any
    /// binding to it (or its textures) from `context`. Failures are logged,
    /// never returned.
    fn destroy_render_target(&self, target: RenderTarget, context: &mut DeviceContext);

    /// Opens the frame: acquires the next surface image and clears it.
    fn begin_frame(&mut self) -> Result<(), GraphicsError>;

    /// Submits one draw using `context`'s current bindings and state.
    /// ## Errors
    /// * [`GraphicsError::InvalidBinding`] - The binding set is inconsistent.
    ///   The draw is dropped and `context` is left exactly as it was.
    /// * [`GraphicsError::NativeSubmissionFailure`] - The native API failed
    ///   an operation it accepted the inputs for.
    fn draw(&mut self, context: &DeviceContext, draw: &DrawCall) -> Result<(), GraphicsError>;

    /// Closes the frame and presents the surface image.
    fn present(&mut self) -> Result<(), GraphicsError>;

    /// Reconfigures the presentation surface after a window resize.
    fn resize_surface(&mut self, width: u32, height: u32);
}
