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

//! Host-side framebuffer attachment storage.

/// Number of attachment kinds a framebuffer can carry.
pub const MAX_BUFFER_TYPE_COUNT: usize = 3;

/// The kind of a framebuffer attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentType {
    /// The color attachment.
    Color,
    /// The depth attachment.
    Depth,
    /// The stencil attachment.
    Stencil,
}

impl AttachmentType {
    /// All attachment kinds, in slot order.
    pub const ALL: [AttachmentType; MAX_BUFFER_TYPE_COUNT] = [
        AttachmentType::Color,
        AttachmentType::Depth,
        AttachmentType::Stencil,
    ];

    pub(crate) const fn slot(&self) -> usize {
        match self {
            AttachmentType::Color => 0,
            AttachmentType::Depth => 1,
            AttachmentType::Stencil => 2,
        }
    }
}

/// Optional host-memory staging storage for a render target's attachments.
///
/// Each attachment slot independently holds either nothing or a byte buffer
/// whose length is the attachment's size. Absent slots mean the attachment
/// lives only on the GPU.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameBuffer {
    attachments: [Option<Vec<u8>>; MAX_BUFFER_TYPE_COUNT],
}

impl FrameBuffer {
    /// A framebuffer with no host storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates zeroed host storage of `size` bytes for `attachment`,
    /// replacing any previous storage.
    pub fn allocate(&mut self, attachment: AttachmentType, size: usize) {
        self.attachments[attachment.slot()] = Some(vec![0; size]);
    }

    /// Releases the host storage for `attachment`, if any.
    pub fn release(&mut self, attachment: AttachmentType) {
        self.attachments[attachment.slot()] = None;
    }

    /// The host bytes for `attachment`, if allocated.
    pub fn bytes(&self, attachment: AttachmentType) -> Option<&[u8]> {
        self.attachments[attachment.slot()].as_deref()
    }

    /// Mutable host bytes for `attachment`, if allocated.
    pub fn bytes_mut(&mut self, attachment: AttachmentType) -> Option<&mut [u8]> {
        self.attachments[attachment.slot()].as_deref_mut()
    }

    /// The byte size of `attachment`'s host storage, or 0 when absent.
    pub fn size(&self, attachment: AttachmentType) -> usize {
        self.attachments[attachment.slot()]
            .as_ref()
            .map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachments_are_independent() {
        let mut fb = FrameBuffer::new();
        fb.allocate(AttachmentType::Color, 64);
        fb.allocate(AttachmentType::Depth, 16);
        assert_eq!(fb.size(AttachmentType::Color), 64);
        assert_eq!(fb.size(AttachmentType::Depth), 16);
        assert_eq!(fb.size(AttachmentType::Stencil), 0);
        assert!(fb.bytes(AttachmentType::Stencil).is_none());

        fb.release(AttachmentType::Color);
        assert_eq!(fb.size(AttachmentType::Color), 0);
        assert_eq!(fb.size(AttachmentType::Depth), 16);
    }

    #[test]
    fn allocate_replaces_previous_storage() {
        let mut fb = FrameBuffer::new();
        fb.allocate(AttachmentType::Color, 8);
        if let Some(bytes) = fb.bytes_mut(AttachmentType::Color) {
            bytes.fill(0xff);
        }
        fb.allocate(AttachmentType::Color, 4);
        assert_eq!(fb.bytes(AttachmentType::Color), Some(&[0u8; 4][..]));
    }
}
