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

//! # Lumen Core
//!
//! Backend-agnostic contracts for the lumen graphics device layer.
//!
//! This crate defines the "common language" every rendering backend speaks:
//! resource descriptors ([`api`]), the mutable device state snapshot
//! ([`context::DeviceContext`]), the [`traits::GraphicsDevice`] contract a
//! backend must satisfy, and the error vocabulary ([`error::GraphicsError`]).
//! Concrete implementations (e.g. the wgpu backend in `lumen-infra`) translate
//! these types into native API calls; nothing in this crate touches a GPU.

#![warn(missing_docs)]

pub mod api;
pub mod context;
pub mod error;
pub mod math;
pub mod platform;
pub mod traits;
pub mod utils;

pub use context::{ContextParams, DeviceContext};
pub use error::{BindingError, GraphicsError};
pub use traits::GraphicsDevice;
