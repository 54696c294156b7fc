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

//! Graphics backend selection with fallback support.
//!
//! Attempts to initialize backends in the caller's preference order
//! (typically Vulkan, then DX12 on Windows or Metal on macOS) and falls back
//! to more compatible options when preferred backends fail. An empty
//! preference list means "any": the selector substitutes a platform default
//! order.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::time::Instant;
use wgpu::{Adapter, Backend, DeviceType, Instance, RequestAdapterOptions};

use lumen_core::api::{AdapterInfo, DeviceType as LumenDeviceType, GraphicsBackendType};
use lumen_core::traits::{
    BackendSelectionConfig, BackendSelectionResult, GraphicsBackendSelector,
};

/// wgpu-specific implementation of the [`GraphicsBackendSelector`] trait.
pub struct WgpuBackendSelector {
    instance: Instance,
}

impl WgpuBackendSelector {
    /// Creates a new selector around a shared instance.
    pub fn new(instance: Instance) -> Self {
        Self { instance }
    }

    pub(crate) fn backend_to_type(backend: Backend) -> GraphicsBackendType {
        match backend {
            Backend::Vulkan => GraphicsBackendType::Vulkan,
            Backend::Dx12 => GraphicsBackendType::Dx12,
            Backend::Gl => GraphicsBackendType::OpenGL,
            Backend::Metal => GraphicsBackendType::Metal,
            Backend::BrowserWebGpu => GraphicsBackendType::WebGpu,
            #[allow(unreachable_patterns)]
            _ => GraphicsBackendType::Unknown,
        }
    }

    pub(crate) fn device_type_to_type(device_type: DeviceType) -> LumenDeviceType {
        match device_type {
            DeviceType::IntegratedGpu => LumenDeviceType::IntegratedGpu,
            DeviceType::DiscreteGpu => LumenDeviceType::DiscreteGpu,
            DeviceType::VirtualGpu => LumenDeviceType::VirtualGpu,
            DeviceType::Cpu => LumenDeviceType::Cpu,
            _ => LumenDeviceType::Unknown,
        }
    }

    /// The fallback order tried when the caller leaves the preference list
    /// empty.
    fn default_backend_order() -> Vec<GraphicsBackendType> {
        #[cfg(target_os = "windows")]
        return vec![
            GraphicsBackendType::Vulkan,
            GraphicsBackendType::Dx12,
            GraphicsBackendType::OpenGL,
        ];
        #[cfg(target_os = "macos")]
        return vec![GraphicsBackendType::Metal, GraphicsBackendType::OpenGL];
        #[cfg(target_arch = "wasm32")]
        return vec![GraphicsBackendType::WebGpu];
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_arch = "wasm32")))]
        return vec![GraphicsBackendType::Vulkan, GraphicsBackendType::OpenGL];
    }

    fn effective_backends(config: &BackendSelectionConfig) -> Vec<GraphicsBackendType> {
        if config.preferred_backends.is_empty() {
            Self::default_backend_order()
        } else {
            config.preferred_backends.clone()
        }
    }

    fn type_to_backend(backend_type: GraphicsBackendType) -> Backend {
        match backend_type {
            GraphicsBackendType::Vulkan => Backend::Vulkan,
            GraphicsBackendType::Dx12 => Backend::Dx12,
            GraphicsBackendType::OpenGL => Backend::Gl,
            GraphicsBackendType::Metal => Backend::Metal,
            GraphicsBackendType::WebGpu => Backend::BrowserWebGpu,
            GraphicsBackendType::Unknown => Backend::Noop,
        }
    }

    fn adapter_to_info(adapter: &Adapter) -> AdapterInfo {
        let info = adapter.get_info();
        AdapterInfo {
            name: info.name.clone(),
            backend_type: Self::backend_to_type(info.backend),
            device_type: Self::device_type_to_type(info.device_type),
        }
    }

    async fn try_backend(
        &self,
        backend_type: GraphicsBackendType,
        prefer_discrete: bool,
    ) -> Result<Adapter> {
        let backend = Self::type_to_backend(backend_type);

        let power_preference = if prefer_discrete {
            wgpu::PowerPreference::HighPerformance
        } else {
            wgpu::PowerPreference::default()
        };

        let adapter = self
            .instance
            .request_adapter(&RequestAdapterOptions {
                power_preference,
                compatible_surface: None, // no surface needed for selection
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| {
                anyhow!(
                    "Failed to find suitable adapter for {:?}: {}",
                    backend_type,
                    e
                )
            })?;

        // Verify the adapter actually uses the requested backend.
        let adapter_info = adapter.get_info();
        if adapter_info.backend != backend {
            return Err(anyhow!(
                "Adapter returned wrong backend: requested {:?}, got {:?}",
                backend,
                adapter_info.backend
            ));
        }

        log::info!(
            "{:?} backend succeeded with adapter: \"{}\"",
            backend_type,
            adapter_info.name
        );

        Ok(adapter)
    }
}

#[async_trait]
impl GraphicsBackendSelector<Adapter> for WgpuBackendSelector {
    type Error = String;

    async fn select_backend(
        &self,
        config: &BackendSelectionConfig,
    ) -> Result<BackendSelectionResult<Adapter>, Self::Error> {
        let start_time = Instant::now();
        let mut attempted_backends = Vec::new();

        log::info!("Starting wgpu backend selection...");

        for backend_type in Self::effective_backends(config) {
            attempted_backends.push(backend_type);

            log::info!("Attempting to initialize {backend_type:?} backend...");

            match self
                .try_backend(backend_type, config.prefer_discrete_gpu)
                .await
            {
                Ok(adapter) => {
                    let adapter_info = Self::adapter_to_info(&adapter);
                    let selection_time_ms = start_time.elapsed().as_millis() as u64;

                    log::info!(
                        "Selected {:?} backend with adapter: \"{}\" (Device: {:?})",
                        backend_type,
                        adapter_info.name,
                        adapter_info.device_type,
                    );

                    return Ok(BackendSelectionResult {
                        adapter,
                        adapter_info,
                        selection_time_ms,
                        attempted_backends,
                    });
                }
                Err(_) => {
                    log::warn!("Failed to initialize {backend_type:?} backend.");
                    continue;
                }
            }
        }

        Err(format!(
            "All backend attempts failed. Attempted: {attempted_backends:?}"
        ))
    }

    async fn list_adapters(
        &self,
        backend_type: GraphicsBackendType,
    ) -> Result<Vec<AdapterInfo>, Self::Error> {
        if !self.is_backend_supported(backend_type) {
            return Ok(Vec::new());
        }

        match self
            .instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => {
                let adapter_backend = Self::backend_to_type(adapter.get_info().backend);
                if adapter_backend == backend_type {
                    Ok(vec![Self::adapter_to_info(&adapter)])
                } else {
                    Ok(Vec::new())
                }
            }
            Err(_) => Ok(Vec::new()),
        }
    }

    fn is_backend_supported(&self, backend_type: GraphicsBackendType) -> bool {
        match backend_type {
            GraphicsBackendType::Vulkan => {
                #[cfg(any(target_os = "windows", target_os = "linux"))]
                return true;
                #[cfg(not(any(target_os = "windows", target_os = "linux")))]
                return false;
            }
            GraphicsBackendType::Dx12 => {
                #[cfg(target_os = "windows")]
                return true;
                #[cfg(not(target_os = "windows"))]
                return false;
            }
            GraphicsBackendType::Metal => {
                #[cfg(target_os = "macos")]
                return true;
                #[cfg(not(target_os = "macos"))]
                return false;
            }
            GraphicsBackendType::OpenGL => true, // generally available
            GraphicsBackendType::WebGpu => {
                #[cfg(target_arch = "wasm32")]
                return true;
                #[cfg(not(target_arch = "wasm32"))]
                return false;
            }
            GraphicsBackendType::Unknown => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn backend_type_conversion() {
        init_logging();
        assert_eq!(
            WgpuBackendSelector::type_to_backend(GraphicsBackendType::Vulkan),
            Backend::Vulkan
        );
        assert_eq!(
            WgpuBackendSelector::type_to_backend(GraphicsBackendType::Dx12),
            Backend::Dx12
        );
        assert_eq!(
            WgpuBackendSelector::type_to_backend(GraphicsBackendType::OpenGL),
            Backend::Gl
        );
        assert_eq!(
            WgpuBackendSelector::type_to_backend(GraphicsBackendType::Metal),
            Backend::Metal
        );
    }

    #[test]
    fn empty_preference_list_falls_back_to_platform_order() {
        init_logging();
        let order = WgpuBackendSelector::effective_backends(&BackendSelectionConfig::default());
        assert!(!order.is_empty());
        assert!(!order.contains(&GraphicsBackendType::Unknown));
    }

    #[test]
    fn explicit_preference_list_is_used_as_given() {
        let config = BackendSelectionConfig {
            preferred_backends: vec![GraphicsBackendType::OpenGL],
            ..Default::default()
        };
        assert_eq!(
            WgpuBackendSelector::effective_backends(&config),
            vec![GraphicsBackendType::OpenGL]
        );
    }

    #[test]
    fn backend_round_trip() {
        for backend_type in [
            GraphicsBackendType::Vulkan,
            GraphicsBackendType::Dx12,
            GraphicsBackendType::OpenGL,
            GraphicsBackendType::Metal,
            GraphicsBackendType::WebGpu,
        ] {
            let backend = WgpuBackendSelector::type_to_backend(backend_type);
            assert_eq!(WgpuBackendSelector::backend_to_type(backend), backend_type);
        }
    }
}
