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

//! Fixed-function pipeline state tracked by the device context.

use crate::lumen_bitflags;

/// A comparison function used for depth and stencil testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompareFunction {
    /// The test never passes.
    Never,
    /// Passes if the new value is less than the existing value.
    #[default]
    Less,
    /// Passes if the new value is equal to the existing value.
    Equal,
    /// Passes if the new value is less than or equal to the existing value.
    LessEqual,
    /// Passes if the new value is greater than the existing value.
    Greater,
    /// Passes if the new value is not equal to the existing value.
    NotEqual,
    /// Passes if the new value is greater than or equal to the existing value.
    GreaterEqual,
    /// The test always passes.
    Always,
}

/// An operation applied to the stencil buffer after a stencil test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StencilOperation {
    /// Keep the current stencil value.
    #[default]
    Keep,
    /// Set the stencil value to zero.
    Zero,
    /// Replace the stencil value with the reference value.
    Replace,
    /// Increment the stencil value, clamping at the maximum.
    IncrementClamp,
    /// Decrement the stencil value, clamping at zero.
    DecrementClamp,
    /// Bitwise invert the stencil value.
    Invert,
    /// Increment the stencil value, wrapping to zero on overflow.
    IncrementWrap,
    /// Decrement the stencil value, wrapping to the maximum on underflow.
    DecrementWrap,
}

/// The element type of an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndexFormat {
    /// 16-bit unsigned indices.
    #[default]
    Uint16,
    /// 32-bit unsigned indices.
    Uint32,
}

/// How a vertex stream is assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimitiveTopology {
    /// Each set of three vertices forms an independent triangle.
    #[default]
    TriangleList,
    /// Each vertex after the first two forms a triangle with the previous two.
    TriangleStrip,
    /// Each pair of vertices forms an independent line segment.
    LineList,
}

lumen_bitflags! {
    /// A bitmask to enable or disable writes to individual color channels.
    pub struct ColorWrites: u8 {
        /// Enable writes to the Red channel.
        const R = 0b0001;
        /// Enable writes to the Green channel.
        const G = 0b0010;
        /// Enable writes to the Blue channel.
        const B = 0b0100;
        /// Enable writes to the Alpha channel.
        const A = 0b1000;
        /// Enable writes to all channels.
        const ALL = Self::R.bits() | Self::G.bits() | Self::B.bits() | Self::A.bits();
    }
}

/// A rectangle restricting rasterization, in framebuffer pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScissorRect {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// The stencil test and the operations applied to both primitive faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilState {
    /// Whether the stencil test is performed at all.
    pub test_enabled: bool,
    /// The comparison applied between the reference value and the stored value.
    pub func: CompareFunction,
    /// The reference value compared against the stencil buffer.
    pub reference: u32,
    /// The mask ANDed with both the reference and the stored value before comparison.
    pub read_mask: u32,
    /// The mask restricting which stencil bits are written.
    pub write_mask: u32,
    /// Operation when the stencil test fails.
    pub fail_op: StencilOperation,
    /// Operation when the stencil test passes but the depth test fails.
    pub depth_fail_op: StencilOperation,
    /// Operation when both the stencil and depth tests pass.
    pub pass_op: StencilOperation,
}

impl Default for StencilState {
    fn default() -> Self {
        Self {
            test_enabled: false,
            func: CompareFunction::Always,
            reference: 0,
            read_mask: u32::MAX,
            write_mask: u32::MAX,
            fail_op: StencilOperation::Keep,
            depth_fail_op: StencilOperation::Keep,
            pass_op: StencilOperation::Keep,
        }
    }
}

/// The mutable fixed-function state a context carries between draws.
///
/// Each field is a named value rather than a packed bitfield; defaults match
/// what a freshly opened context reports: depth test enabled with `Less`,
/// every write mask fully enabled, stencil test off with `Keep` operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedFunctionState {
    /// Whether fragments are depth tested.
    pub depth_test_enabled: bool,
    /// The comparison used by the depth test.
    pub depth_func: CompareFunction,
    /// Whether passing fragments write their depth.
    pub depth_write_enabled: bool,
    /// Stencil test configuration.
    pub stencil: StencilState,
    /// Which color channels draws may write.
    pub color_writes: ColorWrites,
    /// The active scissor rectangle, or `None` to rasterize the full target.
    pub scissor: Option<ScissorRect>,
}

impl Default for FixedFunctionState {
    fn default() -> Self {
        Self {
            depth_test_enabled: true,
            depth_func: CompareFunction::Less,
            depth_write_enabled: true,
            stencil: StencilState::default(),
            color_writes: ColorWrites::ALL,
            scissor: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_function_defaults() {
        let state = FixedFunctionState::default();
        assert!(state.depth_test_enabled);
        assert_eq!(state.depth_func, CompareFunction::Less);
        assert!(state.depth_write_enabled);
        assert_eq!(state.color_writes, ColorWrites::ALL);
        assert!(state.scissor.is_none());
    }

    #[test]
    fn stencil_defaults_are_inert() {
        let stencil = StencilState::default();
        assert!(!stencil.test_enabled);
        assert_eq!(stencil.fail_op, StencilOperation::Keep);
        assert_eq!(stencil.depth_fail_op, StencilOperation::Keep);
        assert_eq!(stencil.pass_op, StencilOperation::Keep);
        assert_eq!(stencil.read_mask, u32::MAX);
        assert_eq!(stencil.write_mask, u32::MAX);
    }

    #[test]
    fn color_writes_channels() {
        let rgb = ColorWrites::R | ColorWrites::G | ColorWrites::B;
        assert!(ColorWrites::ALL.contains(rgb));
        assert!(!rgb.contains(ColorWrites::A));
    }
}
