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

//! Asynchronous adapter discovery and selection.

use crate::api::{AdapterInfo, GraphicsBackendType};
use async_trait::async_trait;

/// Preferences and constraints for picking an adapter.
#[derive(Debug, Clone, Default)]
pub struct BackendSelectionConfig {
    /// Backend APIs to try, in preference order. Empty means any.
    pub preferred_backends: Vec<GraphicsBackendType>,
    /// Prefer a discrete GPU over an integrated one when both are present.
    pub prefer_discrete_gpu: bool,
}

/// The outcome of a successful selection.
#[derive(Debug)]
pub struct BackendSelectionResult<TAdapter> {
    /// The chosen native adapter.
    pub adapter: TAdapter,
    /// Standardized information about the chosen adapter.
    pub adapter_info: AdapterInfo,
    /// How long selection took, in milliseconds.
    pub selection_time_ms: u64,
    /// Every backend that was tried, in order, including the winner.
    pub attempted_backends: Vec<GraphicsBackendType>,
}

/// A system that discovers and selects a suitable graphics adapter.
///
/// Adapter enumeration can be a slow I/O operation, so the primary methods
/// are asynchronous. Concrete implementations live in the backend crate and
/// wrap the native instance type.
#[async_trait]
pub trait GraphicsBackendSelector<TAdapter> {
    /// The error type returned if selection fails.
    type Error: std::fmt::Debug + std::fmt::Display + Send + Sync + 'static;

    /// Selects the best available adapter under `config`, falling back to
    /// other options when the preferred ones are absent.
    async fn select_backend(
        &self,
        config: &BackendSelectionConfig,
    ) -> Result<BackendSelectionResult<TAdapter>, Self::Error>;

    /// Lists every compatible adapter for `backend_type`.
    async fn list_adapters(
        &self,
        backend_type: GraphicsBackendType,
    ) -> Result<Vec<AdapterInfo>, Self::Error>;

    /// Whether `backend_type` is likely to be supported on this platform.
    fn is_backend_supported(&self, backend_type: GraphicsBackendType) -> bool;
}
