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

//! Off-screen render target descriptors.

use crate::api::frame_buffer::{AttachmentType, FrameBuffer, MAX_BUFFER_TYPE_COUNT};
use crate::api::texture::{Texture, TextureParams};
use std::borrow::Cow;

/// An opaque handle to a native render target object.
///
/// Only the backend that issued the id may interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTargetId(pub usize);

/// A descriptor used to create a [`RenderTarget`].
#[derive(Debug, Clone)]
pub struct RenderTargetDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// Width of every attachment in texels.
    pub width: u32,
    /// Height of every attachment in texels.
    pub height: u32,
    /// Per-attachment sampling parameters, indexed by [`AttachmentType`].
    /// `None` means the attachment is not created.
    pub attachment_params: [Option<TextureParams>; MAX_BUFFER_TYPE_COUNT],
}

impl RenderTargetDescriptor<'_> {
    /// The parameters requested for `attachment`, if it is to be created.
    pub fn params(&self, attachment: AttachmentType) -> Option<&TextureParams> {
        self.attachment_params[attachment.slot()].as_ref()
    }
}

/// An off-screen rendering destination.
///
/// Owns its color [`Texture`] and its host [`FrameBuffer`]: destroying the
/// target releases both, and any context binding referring to the target or
/// its texture is cleared by the destroy call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTarget {
    handle: RenderTargetId,
    attachment_params: [Option<TextureParams>; MAX_BUFFER_TYPE_COUNT],
    color_texture: Option<Texture>,
    frame_buffer: FrameBuffer,
}

impl RenderTarget {
    /// Builds the caller-side record for a freshly created native target.
    pub fn new(
        handle: RenderTargetId,
        descriptor: &RenderTargetDescriptor,
        color_texture: Option<Texture>,
        frame_buffer: FrameBuffer,
    ) -> Self {
        Self {
            handle,
            attachment_params: descriptor.attachment_params,
            color_texture,
            frame_buffer,
        }
    }

    /// The opaque native handle.
    pub fn handle(&self) -> RenderTargetId {
        self.handle
    }

    /// The parameters of `attachment`, if it exists on this target.
    pub fn params(&self, attachment: AttachmentType) -> Option<&TextureParams> {
        self.attachment_params[attachment.slot()].as_ref()
    }

    /// The owned color texture, if the target has a color attachment.
    pub fn color_texture(&self) -> Option<&Texture> {
        self.color_texture.as_ref()
    }

    /// Mutable access to the owned color texture, used when resizing.
    pub fn color_texture_mut(&mut self) -> Option<&mut Texture> {
        self.color_texture.as_mut()
    }

    /// Removes and returns the owned color texture.
    ///
    /// Called during destruction so the backend can release the native image.
    pub fn take_color_texture(&mut self) -> Option<Texture> {
        self.color_texture.take()
    }

    /// The host-side attachment storage.
    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    /// Mutable host-side attachment storage.
    pub fn frame_buffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.frame_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::texture::TextureFormat;

    #[test]
    fn descriptor_attachment_lookup() {
        let desc = RenderTargetDescriptor {
            label: None,
            width: 128,
            height: 128,
            attachment_params: [
                Some(TextureParams::with_format(TextureFormat::Rgba8Unorm)),
                Some(TextureParams::with_format(TextureFormat::Depth32Float)),
                None,
            ],
        };
        assert!(desc.params(AttachmentType::Color).is_some());
        assert!(desc.params(AttachmentType::Depth).is_some());
        assert!(desc.params(AttachmentType::Stencil).is_none());
    }
}
