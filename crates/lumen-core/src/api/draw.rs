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

//! Draw submission parameters.

use crate::api::state::{IndexFormat, PrimitiveTopology};

/// A single draw submission.
///
/// Carries only per-draw parameters; everything else (buffers, declaration,
/// program, fixed-function state) is read from the context at submit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    /// How the vertices are assembled into primitives.
    pub topology: PrimitiveTopology,
    /// First vertex (non-indexed) or first index (indexed).
    pub first: u32,
    /// Number of vertices (non-indexed) or indices (indexed) to draw.
    pub count: u32,
    /// Number of instances to draw.
    pub instance_count: u32,
    /// For indexed draws, the element type the indices are read as. `None`
    /// makes this a non-indexed draw.
    pub index_format: Option<IndexFormat>,
}

impl DrawCall {
    /// A non-indexed draw of `count` vertices starting at `first`.
    pub fn vertices(topology: PrimitiveTopology, first: u32, count: u32) -> Self {
        Self {
            topology,
            first,
            count,
            instance_count: 1,
            index_format: None,
        }
    }

    /// An indexed draw of `count` indices starting at `first`.
    pub fn indexed(
        topology: PrimitiveTopology,
        first: u32,
        count: u32,
        index_format: IndexFormat,
    ) -> Self {
        Self {
            topology,
            first,
            count,
            instance_count: 1,
            index_format: Some(index_format),
        }
    }

    /// Whether this draw reads an index buffer.
    pub fn is_indexed(&self) -> bool {
        self.index_format.is_some()
    }
}
