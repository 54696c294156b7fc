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

use anyhow::{anyhow, Result};
use lumen_core::platform::LumenWindowHandle;
use wgpu::{Adapter, Instance, SurfaceTargetUnsafe};

/// Holds the core wgpu state objects required for rendering.
///
/// Manages the connection to the graphics API for one surface. Initialized
/// with a pre-selected adapter, so it is a passive component: selection
/// policy lives in [`super::WgpuBackendSelector`].
#[derive(Debug)]
pub struct WgpuGraphicsContext {
    pub(crate) surface: wgpu::Surface<'static>,
    pub(crate) adapter: wgpu::Adapter,
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
    pub(crate) surface_config: wgpu::SurfaceConfiguration,

    pub(crate) adapter_name: String,
    pub(crate) adapter_backend: wgpu::Backend,
    pub(crate) adapter_device_type: wgpu::DeviceType,
    pub(crate) active_device_features: wgpu::Features,
    pub(crate) device_limits: wgpu::Limits,
}

impl WgpuGraphicsContext {
    /// Asynchronously initializes the context for a given window surface.
    ///
    /// ## Arguments
    /// * `instance` - The shared `wgpu::Instance`.
    /// * `window_handle` - Any object that can provide raw window handles.
    /// * `adapter` - The pre-selected adapter to use.
    /// * `window_size` - The initial physical size of the window surface.
    pub async fn new(
        instance: &Instance,
        window_handle: LumenWindowHandle,
        adapter: Adapter,
        window_size: (u32, u32),
    ) -> Result<Self> {
        log::info!("Initializing wgpu graphics context with pre-selected adapter...");

        let surface_target = unsafe {
            SurfaceTargetUnsafe::from_window(&window_handle)
                .map_err(|e| anyhow!("Failed to create surface target: {}", e))?
        };
        let surface = unsafe { instance.create_surface_unsafe(surface_target)? };
        log::debug!("wgpu surface created for the window.");

        let adapter_info = adapter.get_info();
        log::info!(
            "Using graphics adapter: \"{}\" (Backend: {:?})",
            adapter_info.name,
            adapter_info.backend
        );

        // Opt into the extra depth/stencil format when the adapter has it;
        // it feeds the format-support mask.
        let wanted_features = wgpu::Features::DEPTH32FLOAT_STENCIL8;
        let features_to_enable = adapter.features() & wanted_features;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Lumen Logical Device"),
                required_features: features_to_enable,
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::default(),
            })
            .await
            .map_err(|e| anyhow!("Failed to create logical device: {}", e))?;
        log::info!("Logical device and command queue created.");

        device.on_uncaptured_error(Box::new(|e| {
            log::error!("wgpu uncaptured error: {e:?}");
        }));

        let active_device_features = device.features();
        let device_limits = device.limits();
        log::debug!("Active device features: {active_device_features:?}");

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: window_size.0.max(1),
            height: window_size.1.max(1),
            present_mode: surface_caps
                .present_modes
                .iter()
                .copied()
                .find(|m| *m == wgpu::PresentMode::Mailbox)
                .unwrap_or(wgpu::PresentMode::Fifo), // Fifo is guaranteed to be supported
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        Ok(WgpuGraphicsContext {
            surface,
            adapter,
            device,
            queue,
            surface_config,
            adapter_name: adapter_info.name,
            adapter_backend: adapter_info.backend,
            adapter_device_type: adapter_info.device_type,
            active_device_features,
            device_limits,
        })
    }

    /// Reconfigures the surface (swapchain) when the window is resized.
    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            log::info!("WgpuGraphicsContext: resizing surface to {new_width}x{new_height}");
            self.surface_config.width = new_width;
            self.surface_config.height = new_height;
            self.surface.configure(&self.device, &self.surface_config);
        } else {
            log::warn!(
                "WgpuGraphicsContext: ignoring resize request to zero dimensions: {new_width}x{new_height}"
            );
        }
    }

    /// Acquires the current surface texture for rendering.
    pub fn get_current_texture(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    /// The logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// The command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// The configured surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }

    /// The current swapchain dimensions.
    pub fn get_size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }
}
