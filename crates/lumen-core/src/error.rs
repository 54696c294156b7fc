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

//! Defines the error hierarchy for the graphics device layer.

use crate::api::state::IndexFormat;
use crate::api::texture::TextureFormat;
use std::fmt;

/// The reason a draw submission was rejected during binding validation.
///
/// Binding errors are recoverable: the draw is skipped and the context state
/// is left exactly as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingError {
    /// No vertex declaration is bound.
    MissingVertexDeclaration,
    /// No vertex buffer is bound.
    MissingVertexBuffer,
    /// No program is bound.
    MissingProgram,
    /// An indexed draw was requested but no index buffer is bound.
    MissingIndexBuffer,
    /// The bound vertex buffer's stride disagrees with the bound declaration.
    StrideMismatch {
        /// The stride declared by the bound vertex declaration.
        declaration: u16,
        /// The element stride of the bound vertex buffer.
        buffer: u16,
    },
    /// The draw's index element type disagrees with the bound index buffer.
    IndexFormatMismatch {
        /// The element type of the bound index buffer.
        bound: IndexFormat,
        /// The element type the draw call asked to interpret.
        requested: IndexFormat,
    },
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingError::MissingVertexDeclaration => {
                write!(f, "no vertex declaration is bound")
            }
            BindingError::MissingVertexBuffer => write!(f, "no vertex buffer is bound"),
            BindingError::MissingProgram => write!(f, "no program is bound"),
            BindingError::MissingIndexBuffer => {
                write!(f, "indexed draw requested but no index buffer is bound")
            }
            BindingError::StrideMismatch {
                declaration,
                buffer,
            } => {
                write!(
                    f,
                    "vertex declaration stride ({declaration}) does not match vertex buffer stride ({buffer})"
                )
            }
            BindingError::IndexFormatMismatch { bound, requested } => {
                write!(
                    f,
                    "index buffer holds {bound:?} indices but the draw requested {requested:?}"
                )
            }
        }
    }
}

impl std::error::Error for BindingError {}

/// An error produced by the graphics device layer.
#[derive(Debug)]
pub enum GraphicsError {
    /// The backend could not initialize its native device. Fatal: the caller
    /// must abort startup, no context exists after this.
    InitializationFailed(String),
    /// The requested texture format is not in the backend's supported set.
    /// Recoverable: the caller picks a fallback format.
    UnsupportedFormat {
        /// The format that was requested.
        format: TextureFormat,
    },
    /// A creation request exceeded a backend or API limit (stream count,
    /// register index, texture size). Rejected before any native allocation.
    ResourceLimitExceeded {
        /// The limited resource, e.g. `"vertex streams"`.
        resource: &'static str,
        /// The amount that was requested.
        requested: u32,
        /// The maximum the backend supports.
        limit: u32,
    },
    /// A resource descriptor is internally inconsistent, e.g. overlapping
    /// vertex streams. Rejected before any native allocation.
    InvalidDescriptor(String),
    /// A draw was submitted with an inconsistent binding set. The draw is
    /// dropped; context state is untouched.
    InvalidBinding(BindingError),
    /// The native API rejected or failed an operation it accepted the inputs
    /// for. Recoverable at the call site, but usually a driver-level problem.
    NativeSubmissionFailure(String),
    /// The handle used to reference a resource is unknown to the backend.
    InvalidHandle,
    /// An error originating from the specific backend implementation.
    BackendError(String),
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphicsError::InitializationFailed(msg) => {
                write!(f, "Failed to initialize graphics backend: {msg}")
            }
            GraphicsError::UnsupportedFormat { format } => {
                write!(f, "Texture format {format:?} is not supported by this backend")
            }
            GraphicsError::ResourceLimitExceeded {
                resource,
                requested,
                limit,
            } => {
                write!(
                    f,
                    "Resource limit exceeded for {resource}: requested {requested}, limit {limit}"
                )
            }
            GraphicsError::InvalidDescriptor(msg) => {
                write!(f, "Invalid resource descriptor: {msg}")
            }
            GraphicsError::InvalidBinding(err) => {
                write!(f, "Draw rejected by binding validation: {err}")
            }
            GraphicsError::NativeSubmissionFailure(msg) => {
                write!(f, "Native API submission failed: {msg}")
            }
            GraphicsError::InvalidHandle => write!(f, "Invalid resource handle or ID."),
            GraphicsError::BackendError(msg) => {
                write!(f, "Backend-specific error: {msg}")
            }
        }
    }
}

impl std::error::Error for GraphicsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GraphicsError::InvalidBinding(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BindingError> for GraphicsError {
    fn from(err: BindingError) -> Self {
        GraphicsError::InvalidBinding(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn binding_error_display() {
        let err = BindingError::StrideMismatch {
            declaration: 32,
            buffer: 24,
        };
        assert_eq!(
            format!("{err}"),
            "vertex declaration stride (32) does not match vertex buffer stride (24)"
        );
    }

    #[test]
    fn graphics_error_display_wrapping_binding_error() {
        let err: GraphicsError = BindingError::MissingVertexBuffer.into();
        assert_eq!(
            format!("{err}"),
            "Draw rejected by binding validation: no vertex buffer is bound"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn limit_error_display() {
        let err = GraphicsError::ResourceLimitExceeded {
            resource: "vertex streams",
            requested: 9,
            limit: 8,
        };
        assert_eq!(
            format!("{err}"),
            "Resource limit exceeded for vertex streams: requested 9, limit 8"
        );
        assert!(err.source().is_none());
    }
}
