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

//! Shader program descriptors.

use std::borrow::Cow;

/// An opaque handle to a native shader program object.
///
/// Only the backend that issued the id may interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub usize);

/// Shader source text in a language the backend accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderSource<'a> {
    /// WGSL source text.
    Wgsl(Cow<'a, str>),
}

/// A descriptor used to create a shader program.
///
/// Programs are opaque: no reflection is performed here, the paired entry
/// points are handed to the backend as-is.
#[derive(Debug, Clone)]
pub struct ProgramDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The vertex stage source.
    pub vertex_source: ShaderSource<'a>,
    /// The vertex stage entry point name.
    pub vertex_entry_point: Cow<'a, str>,
    /// The fragment stage source.
    pub fragment_source: ShaderSource<'a>,
    /// The fragment stage entry point name.
    pub fragment_entry_point: Cow<'a, str>,
}
