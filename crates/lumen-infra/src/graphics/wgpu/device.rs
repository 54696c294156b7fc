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

//! The wgpu implementation of [`GraphicsDevice`].
//!
//! Shader binding convention: group 0 binding 0 is the register uniform
//! (the whole constant file, uploaded before each draw); group 1 carries the
//! bound texture units, unit `u` at bindings `2u` (view) and `2u + 1`
//! (sampler). Pipelines are cached by everything that feeds pipeline
//! creation; the scissor rect and stencil reference are dynamic and stay out
//! of the key.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use wgpu::util::DeviceExt;

use lumen_core::api::{
    AdapterInfo, AttachmentType, BufferDescriptor, BufferId, BufferUsageHint, DrawCall,
    FixedFunctionState, FrameBuffer, ProgramDescriptor, ProgramId,
    RenderTarget, RenderTargetDescriptor, RenderTargetId, ShaderSource, Texture,
    TextureDescriptor, TextureFormat, TextureFormatSupport, TextureId, TextureParams, TextureType,
    TextureUsage, VertexDeclaration, MAX_REGISTER_COUNT, MAX_TEXTURE_UNITS,
};
use lumen_core::context::DeviceContext;
use lumen_core::error::GraphicsError;
use lumen_core::platform::LumenWindow;
use lumen_core::traits::{BackendSelectionConfig, GraphicsBackendSelector, GraphicsDevice};

use super::backend::WgpuBackendSelector;
use super::context::WgpuGraphicsContext;
use super::conversions::{from_wgpu_texture_format, vertex_format, IntoWgpu};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.01,
    g: 0.02,
    b: 0.03,
    a: 1.0,
};

#[derive(Debug)]
struct WgpuBufferEntry {
    wgpu_buffer: Arc<wgpu::Buffer>,
    size: u64,
}

#[derive(Debug)]
struct WgpuTextureEntry {
    wgpu_texture: Arc<wgpu::Texture>,
    view: Arc<wgpu::TextureView>,
    texture_type: TextureType,
    mip_level_count: u32,
    params: TextureParams,
    usage: TextureUsage,
}

#[derive(Debug)]
struct WgpuProgramEntry {
    vertex_module: Arc<wgpu::ShaderModule>,
    fragment_module: Arc<wgpu::ShaderModule>,
    vertex_entry: String,
    fragment_entry: String,
}

#[derive(Debug)]
struct WgpuRenderTargetEntry {
    color_texture: Option<TextureId>,
    color_format: Option<wgpu::TextureFormat>,
    depth_view: Option<Arc<wgpu::TextureView>>,
    depth_format: Option<wgpu::TextureFormat>,
}

/// Everything that feeds pipeline creation. Two draws with equal keys can
/// share a native pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PipelineKey {
    program: ProgramId,
    topology: lumen_core::api::PrimitiveTopology,
    declaration: VertexDeclaration,
    fixed_function: FixedFunctionState,
    texture_mask: u32,
    color_format: wgpu::TextureFormat,
    depth_format: Option<wgpu::TextureFormat>,
}

#[derive(Debug)]
struct DepthAttachment {
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

/// Tracks which attachments have had their first-use clear encoded this
/// frame. A clear is marked only after its pass reaches the queue, so a
/// failed draw does not consume it.
#[derive(Debug, Default)]
struct ClearTracker {
    backbuffer_cleared: bool,
    cleared_targets: HashSet<RenderTargetId>,
}

impl ClearTracker {
    fn needs_clear(&self, target: Option<RenderTargetId>) -> bool {
        match target {
            Some(rt) => !self.cleared_targets.contains(&rt),
            None => !self.backbuffer_cleared,
        }
    }

    fn mark_cleared(&mut self, target: Option<RenderTargetId>) {
        match target {
            Some(rt) => {
                self.cleared_targets.insert(rt);
            }
            None => self.backbuffer_cleared = true,
        }
    }
}

#[derive(Debug)]
struct FrameInFlight {
    surface_texture: wgpu::SurfaceTexture,
    view: Arc<wgpu::TextureView>,
    clears: ClearTracker,
}

/// The internal, shareable state of the device: the graphics context plus
/// every resource registry.
#[derive(Debug)]
struct WgpuDeviceInternal {
    context: Arc<Mutex<WgpuGraphicsContext>>,
    buffers: Mutex<HashMap<BufferId, WgpuBufferEntry>>,
    textures: Mutex<HashMap<TextureId, WgpuTextureEntry>>,
    programs: Mutex<HashMap<ProgramId, WgpuProgramEntry>>,
    render_targets: Mutex<HashMap<RenderTargetId, WgpuRenderTargetEntry>>,
    pipelines: Mutex<HashMap<PipelineKey, Arc<wgpu::RenderPipeline>>>,
    samplers: Mutex<HashMap<TextureParams, Arc<wgpu::Sampler>>>,
    texture_layouts: Mutex<HashMap<u32, Arc<wgpu::BindGroupLayout>>>,

    register_buffer: wgpu::Buffer,
    register_layout: wgpu::BindGroupLayout,
    format_support: TextureFormatSupport,

    next_buffer_id: AtomicUsize,
    next_texture_id: AtomicUsize,
    next_program_id: AtomicUsize,
    next_render_target_id: AtomicUsize,
}

/// The wgpu-backed [`GraphicsDevice`].
#[derive(Debug)]
pub struct WgpuDevice {
    internal: Arc<WgpuDeviceInternal>,
    depth: DepthAttachment,
    frame: Option<FrameInFlight>,
}

fn poisoned(what: &str) -> GraphicsError {
    GraphicsError::BackendError(format!("Mutex poisoned ({what})"))
}

/// Computes the supported-format mask from the active device features.
/// The non-optional formats are guaranteed by wgpu on every backend.
fn compute_format_support(features: wgpu::Features) -> TextureFormatSupport {
    let mut support = TextureFormatSupport::R8_UNORM
        | TextureFormatSupport::RG8_UNORM
        | TextureFormatSupport::RGBA8_UNORM
        | TextureFormatSupport::RGBA8_UNORM_SRGB
        | TextureFormatSupport::BGRA8_UNORM_SRGB
        | TextureFormatSupport::RGBA16_FLOAT
        | TextureFormatSupport::RGBA32_FLOAT
        | TextureFormatSupport::DEPTH24_PLUS_STENCIL8
        | TextureFormatSupport::DEPTH32_FLOAT;
    if features.contains(wgpu::Features::DEPTH32FLOAT_STENCIL8) {
        support.insert(TextureFormatSupport::DEPTH32_FLOAT_STENCIL8);
    }
    support
}

impl WgpuDevice {
    /// Selects an adapter, builds the graphics context for the window, and
    /// wraps it in a device, blocking on the async setup.
    pub fn initialize(
        window: &dyn LumenWindow,
        config: &BackendSelectionConfig,
    ) -> Result<Self, GraphicsError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let selector = WgpuBackendSelector::new(instance.clone());
        let selection = pollster::block_on(selector.select_backend(config))
            .map_err(GraphicsError::InitializationFailed)?;
        log::info!(
            "WgpuDevice: selected adapter \"{}\" in {}ms",
            selection.adapter_info.name,
            selection.selection_time_ms
        );

        let context = pollster::block_on(WgpuGraphicsContext::new(
            &instance,
            window.clone_handle_arc(),
            selection.adapter,
            window.inner_size(),
        ))
        .map_err(|e| GraphicsError::InitializationFailed(e.to_string()))?;
        Self::new(Arc::new(Mutex::new(context)))
    }

    /// Builds the device around an initialized graphics context.
    ///
    /// # Errors
    ///
    /// Returns [`GraphicsError::InitializationFailed`] when the context lock
    /// is poisoned. Callers must treat that as fatal.
    pub fn new(context: Arc<Mutex<WgpuGraphicsContext>>) -> Result<Self, GraphicsError> {
        let (register_buffer, register_layout, format_support, depth) = {
            let guard = context
                .lock()
                .map_err(|e| GraphicsError::InitializationFailed(format!("context lock: {e}")))?;
            let device = guard.device();

            let register_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("lumen register file"),
                size: (MAX_REGISTER_COUNT * 16) as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            let register_layout =
                device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("lumen register layout"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    }],
                });

            let format_support = compute_format_support(guard.active_device_features);
            let (width, height) = guard.get_size();
            let depth = Self::make_depth_attachment(device, width, height);

            (register_buffer, register_layout, format_support, depth)
        };

        log::info!("WgpuDevice initialized; supported formats: {format_support:?}");

        Ok(Self {
            internal: Arc::new(WgpuDeviceInternal {
                context,
                buffers: Mutex::new(HashMap::new()),
                textures: Mutex::new(HashMap::new()),
                programs: Mutex::new(HashMap::new()),
                render_targets: Mutex::new(HashMap::new()),
                pipelines: Mutex::new(HashMap::new()),
                samplers: Mutex::new(HashMap::new()),
                texture_layouts: Mutex::new(HashMap::new()),
                register_buffer,
                register_layout,
                format_support,
                next_buffer_id: AtomicUsize::new(0),
                next_texture_id: AtomicUsize::new(0),
                next_program_id: AtomicUsize::new(0),
                next_render_target_id: AtomicUsize::new(0),
            }),
            depth,
            frame: None,
        })
    }

    fn make_depth_attachment(device: &wgpu::Device, width: u32, height: u32) -> DepthAttachment {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lumen backbuffer depth"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        DepthAttachment {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            width,
            height,
        }
    }

    // --- ID generation ---

    fn generate_buffer_id(&self) -> BufferId {
        BufferId(self.internal.next_buffer_id.fetch_add(1, Ordering::Relaxed))
    }

    fn generate_texture_id(&self) -> TextureId {
        TextureId(
            self.internal
                .next_texture_id
                .fetch_add(1, Ordering::Relaxed),
        )
    }

    fn generate_program_id(&self) -> ProgramId {
        ProgramId(
            self.internal
                .next_program_id
                .fetch_add(1, Ordering::Relaxed),
        )
    }

    fn generate_render_target_id(&self) -> RenderTargetId {
        RenderTargetId(
            self.internal
                .next_render_target_id
                .fetch_add(1, Ordering::Relaxed),
        )
    }

    /// Executes an operation with the wgpu device locked.
    fn with_wgpu_device<F, R>(&self, operation: F) -> Result<R, GraphicsError>
    where
        F: FnOnce(&wgpu::Device) -> Result<R, GraphicsError>,
    {
        let guard = self
            .internal
            .context
            .lock()
            .map_err(|_| poisoned("WgpuGraphicsContext"))?;
        operation(guard.device())
    }

    /// The copy extent of one mip of `texture`: per-face size plus the layer
    /// count, 6 for cube maps. Uploads carry all faces in one payload.
    fn upload_extent(texture: &Texture, mip_level: u32) -> (u32, u32, u32) {
        let width = (texture.width() >> mip_level).max(1);
        let height = (texture.height() >> mip_level).max(1);
        let layers = match texture.texture_type() {
            TextureType::D2 => 1,
            TextureType::Cube => 6,
        };
        (width, height, layers)
    }

    fn make_wgpu_texture(
        device: &wgpu::Device,
        label: Option<&str>,
        texture_type: TextureType,
        width: u32,
        height: u32,
        mip_level_count: u32,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let layers = match texture_type {
            TextureType::D2 => 1,
            TextureType::Cube => 6,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: layers,
            },
            mip_level_count: mip_level_count.max(1),
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view_dimension = match texture_type {
            TextureType::D2 => wgpu::TextureViewDimension::D2,
            TextureType::Cube => wgpu::TextureViewDimension::Cube,
        };
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label,
            dimension: Some(view_dimension),
            ..Default::default()
        });
        (texture, view)
    }

    fn sampler_for(&self, params: &TextureParams) -> Result<Arc<wgpu::Sampler>, GraphicsError> {
        {
            let samplers = self
                .internal
                .samplers
                .lock()
                .map_err(|_| poisoned("samplers"))?;
            if let Some(sampler) = samplers.get(params) {
                return Ok(Arc::clone(sampler));
            }
        }
        let sampler = self.with_wgpu_device(|device| {
            Ok(Arc::new(device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("lumen sampler"),
                address_mode_u: params.wrap_u.into_wgpu(),
                address_mode_v: params.wrap_v.into_wgpu(),
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: params.mag_filter.into_wgpu(),
                min_filter: params.min_filter.into_wgpu(),
                mipmap_filter: wgpu::FilterMode::Nearest,
                ..Default::default()
            })))
        })?;
        let mut samplers = self
            .internal
            .samplers
            .lock()
            .map_err(|_| poisoned("samplers"))?;
        Ok(Arc::clone(samplers.entry(*params).or_insert(sampler)))
    }

    fn texture_layout_for(&self, mask: u32) -> Result<Arc<wgpu::BindGroupLayout>, GraphicsError> {
        {
            let layouts = self
                .internal
                .texture_layouts
                .lock()
                .map_err(|_| poisoned("texture_layouts"))?;
            if let Some(layout) = layouts.get(&mask) {
                return Ok(Arc::clone(layout));
            }
        }
        let mut entries = Vec::new();
        for unit in 0..MAX_TEXTURE_UNITS as u32 {
            if mask & (1 << unit) == 0 {
                continue;
            }
            entries.push(wgpu::BindGroupLayoutEntry {
                binding: 2 * unit,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            });
            entries.push(wgpu::BindGroupLayoutEntry {
                binding: 2 * unit + 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            });
        }
        let layout = self.with_wgpu_device(|device| {
            Ok(Arc::new(device.create_bind_group_layout(
                &wgpu::BindGroupLayoutDescriptor {
                    label: Some("lumen texture layout"),
                    entries: &entries,
                },
            )))
        })?;
        let mut layouts = self
            .internal
            .texture_layouts
            .lock()
            .map_err(|_| poisoned("texture_layouts"))?;
        Ok(Arc::clone(layouts.entry(mask).or_insert(layout)))
    }

    fn pipeline_for(&self, key: &PipelineKey) -> Result<Arc<wgpu::RenderPipeline>, GraphicsError> {
        {
            let pipelines = self
                .internal
                .pipelines
                .lock()
                .map_err(|_| poisoned("pipelines"))?;
            if let Some(pipeline) = pipelines.get(key) {
                return Ok(Arc::clone(pipeline));
            }
        }

        let (vertex_module, fragment_module, vertex_entry, fragment_entry) = {
            let programs = self
                .internal
                .programs
                .lock()
                .map_err(|_| poisoned("programs"))?;
            let entry = programs.get(&key.program).ok_or(GraphicsError::InvalidHandle)?;
            (
                Arc::clone(&entry.vertex_module),
                Arc::clone(&entry.fragment_module),
                entry.vertex_entry.clone(),
                entry.fragment_entry.clone(),
            )
        };

        let mut attributes = Vec::with_capacity(key.declaration.streams().len());
        for stream in key.declaration.streams() {
            let format = vertex_format(stream).ok_or_else(|| {
                GraphicsError::InvalidDescriptor(format!(
                    "stream '{}' has no matching vertex format",
                    stream.name
                ))
            })?;
            attributes.push(wgpu::VertexAttribute {
                shader_location: stream.location,
                format,
                offset: stream.offset as u64,
            });
        }

        let texture_layout = if key.texture_mask != 0 {
            Some(self.texture_layout_for(key.texture_mask)?)
        } else {
            None
        };

        let fixed = &key.fixed_function;
        let depth_stencil = key.depth_format.map(|format| {
            let stencil_face = if fixed.stencil.test_enabled {
                wgpu::StencilFaceState {
                    compare: fixed.stencil.func.into_wgpu(),
                    fail_op: fixed.stencil.fail_op.into_wgpu(),
                    depth_fail_op: fixed.stencil.depth_fail_op.into_wgpu(),
                    pass_op: fixed.stencil.pass_op.into_wgpu(),
                }
            } else {
                wgpu::StencilFaceState::default()
            };
            wgpu::DepthStencilState {
                format,
                depth_write_enabled: fixed.depth_write_enabled,
                depth_compare: if fixed.depth_test_enabled {
                    fixed.depth_func.into_wgpu()
                } else {
                    wgpu::CompareFunction::Always
                },
                stencil: wgpu::StencilState {
                    front: stencil_face,
                    back: stencil_face,
                    read_mask: fixed.stencil.read_mask,
                    write_mask: if fixed.stencil.test_enabled {
                        fixed.stencil.write_mask
                    } else {
                        0
                    },
                },
                bias: wgpu::DepthBiasState::default(),
            }
        });

        let pipeline = self.with_wgpu_device(|device| {
            let mut group_layouts: Vec<&wgpu::BindGroupLayout> =
                vec![&self.internal.register_layout];
            if let Some(layout) = texture_layout.as_deref() {
                group_layouts.push(layout);
            }
            let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("lumen pipeline layout"),
                bind_group_layouts: &group_layouts,
                push_constant_ranges: &[],
            });

            let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("lumen pipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &vertex_module,
                    entry_point: Some(&vertex_entry),
                    compilation_options: Default::default(),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: key.declaration.stride() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &attributes,
                    }],
                },
                primitive: wgpu::PrimitiveState {
                    topology: key.topology.into_wgpu(),
                    ..Default::default()
                },
                depth_stencil,
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &fragment_module,
                    entry_point: Some(&fragment_entry),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: key.color_format,
                        blend: None,
                        write_mask: fixed.color_writes.into_wgpu(),
                    })],
                }),
                multiview: None,
                cache: None,
            });
            Ok(Arc::new(pipeline))
        })?;

        let mut pipelines = self
            .internal
            .pipelines
            .lock()
            .map_err(|_| poisoned("pipelines"))?;
        Ok(Arc::clone(
            pipelines.entry(key.clone()).or_insert(pipeline),
        ))
    }

    fn texture_mask(context: &DeviceContext) -> u32 {
        let mut mask = 0u32;
        for (unit, slot) in context.textures().iter().enumerate() {
            if slot.is_some() {
                mask |= 1 << unit;
            }
        }
        mask
    }
}

impl GraphicsDevice for WgpuDevice {
    fn adapter_info(&self) -> AdapterInfo {
        match self.internal.context.lock() {
            Ok(guard) => AdapterInfo {
                name: guard.adapter_name.clone(),
                backend_type: WgpuBackendSelector::backend_to_type(guard.adapter_backend),
                device_type: WgpuBackendSelector::device_type_to_type(guard.adapter_device_type),
            },
            Err(_) => {
                log::error!("WgpuDevice: context mutex poisoned in adapter_info");
                AdapterInfo::default()
            }
        }
    }

    fn surface_format(&self) -> TextureFormat {
        match self.internal.context.lock() {
            Ok(guard) => from_wgpu_texture_format(guard.surface_format())
                .unwrap_or(TextureFormat::Bgra8UnormSrgb),
            Err(_) => TextureFormat::Bgra8UnormSrgb,
        }
    }

    fn format_support(&self) -> TextureFormatSupport {
        self.internal.format_support
    }

    // --- Textures ---

    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<Texture, GraphicsError> {
        let format = descriptor.params.format;
        if !self.internal.format_support.contains(format.support_bit()) {
            return Err(GraphicsError::UnsupportedFormat { format });
        }

        let max_dimension = {
            let guard = self
                .internal
                .context
                .lock()
                .map_err(|_| poisoned("WgpuGraphicsContext"))?;
            guard.device_limits.max_texture_dimension_2d
        };
        let requested = descriptor.width.max(descriptor.height);
        if requested > max_dimension {
            return Err(GraphicsError::ResourceLimitExceeded {
                resource: "texture dimensions",
                requested,
                limit: max_dimension,
            });
        }

        let label = descriptor.label.as_deref();
        let (wgpu_texture, view) = self.with_wgpu_device(|device| {
            Ok(Self::make_wgpu_texture(
                device,
                label,
                descriptor.texture_type,
                descriptor.width,
                descriptor.height,
                descriptor.mip_level_count,
                format.into_wgpu(),
                descriptor.usage.into_wgpu(),
            ))
        })?;

        let id = self.generate_texture_id();
        let mut textures = self
            .internal
            .textures
            .lock()
            .map_err(|_| poisoned("textures"))?;
        textures.insert(
            id,
            WgpuTextureEntry {
                wgpu_texture: Arc::new(wgpu_texture),
                view: Arc::new(view),
                texture_type: descriptor.texture_type,
                mip_level_count: descriptor.mip_level_count,
                params: descriptor.params,
                usage: descriptor.usage,
            },
        );
        log::debug!("WgpuDevice: created texture {id:?} ({label:?})");
        Ok(Texture::new(id, descriptor))
    }

    fn set_texture_data(
        &self,
        texture: &Texture,
        mip_level: u32,
        data: &[u8],
    ) -> Result<(), GraphicsError> {
        if mip_level >= texture.mip_level_count() {
            return Err(GraphicsError::InvalidDescriptor(format!(
                "mip level {mip_level} out of range for texture with {} levels",
                texture.mip_level_count()
            )));
        }
        let wgpu_texture = {
            let textures = self
                .internal
                .textures
                .lock()
                .map_err(|_| poisoned("textures"))?;
            let entry = textures
                .get(&texture.handle())
                .ok_or(GraphicsError::InvalidHandle)?;
            Arc::clone(&entry.wgpu_texture)
        };

        let (width, height, layers) = Self::upload_extent(texture, mip_level);
        let bytes_per_pixel = texture.params().format.bytes_per_pixel();
        let expected = (width * height * layers * bytes_per_pixel) as usize;
        if data.len() != expected {
            return Err(GraphicsError::InvalidDescriptor(format!(
                "texture upload size mismatch: got {} bytes, expected {expected} \
                 ({layers} layer(s) of {width}x{height})",
                data.len()
            )));
        }

        let guard = self
            .internal
            .context
            .lock()
            .map_err(|_| poisoned("WgpuGraphicsContext"))?;
        guard.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &wgpu_texture,
                mip_level,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * bytes_per_pixel),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: layers,
            },
        );
        Ok(())
    }

    fn resize_texture(
        &self,
        texture: &mut Texture,
        width: u32,
        height: u32,
    ) -> Result<(), GraphicsError> {
        let (texture_type, mip_level_count, params, usage) = {
            let textures = self
                .internal
                .textures
                .lock()
                .map_err(|_| poisoned("textures"))?;
            let entry = textures
                .get(&texture.handle())
                .ok_or(GraphicsError::InvalidHandle)?;
            (
                entry.texture_type,
                entry.mip_level_count,
                entry.params,
                entry.usage,
            )
        };

        let (new_texture, new_view) = self.with_wgpu_device(|device| {
            Ok(Self::make_wgpu_texture(
                device,
                Some("lumen resized texture"),
                texture_type,
                width,
                height,
                mip_level_count,
                params.format.into_wgpu(),
                usage.into_wgpu(),
            ))
        })?;

        let mut textures = self
            .internal
            .textures
            .lock()
            .map_err(|_| poisoned("textures"))?;
        let entry = textures
            .get_mut(&texture.handle())
            .ok_or(GraphicsError::InvalidHandle)?;
        entry.wgpu_texture = Arc::new(new_texture);
        entry.view = Arc::new(new_view);

        texture.apply_resize(width, height);
        log::debug!(
            "WgpuDevice: resized texture {:?} to {width}x{height}",
            texture.handle()
        );
        Ok(())
    }

    fn destroy_texture(&self, texture: Texture, context: &mut DeviceContext) {
        context.clear_texture(texture.handle());
        match self.internal.textures.lock() {
            Ok(mut textures) => {
                if textures.remove(&texture.handle()).is_none() {
                    log::warn!(
                        "WgpuDevice: destroy of unknown texture {:?}; leaking",
                        texture.handle()
                    );
                }
            }
            Err(_) => {
                log::error!(
                    "WgpuDevice: texture registry poisoned; leaking {:?}",
                    texture.handle()
                );
            }
        }
    }

    // --- Buffers ---

    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId, GraphicsError> {
        let mut usage: wgpu::BufferUsages = descriptor.usage.into_wgpu();
        // Dynamic and stream buffers get rewritten through the queue.
        if descriptor.usage_hint != BufferUsageHint::Static {
            usage |= wgpu::BufferUsages::COPY_DST;
        }
        let wgpu_buffer = self.with_wgpu_device(|device| {
            Ok(device.create_buffer(&wgpu::BufferDescriptor {
                label: descriptor.label.as_deref(),
                size: descriptor.size,
                usage,
                mapped_at_creation: false,
            }))
        })?;

        let id = self.generate_buffer_id();
        let mut buffers = self
            .internal
            .buffers
            .lock()
            .map_err(|_| poisoned("buffers"))?;
        buffers.insert(
            id,
            WgpuBufferEntry {
                wgpu_buffer: Arc::new(wgpu_buffer),
                size: descriptor.size,
            },
        );
        log::debug!("WgpuDevice: created buffer {id:?} ({} bytes)", descriptor.size);
        Ok(id)
    }

    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, GraphicsError> {
        let wgpu_buffer = self.with_wgpu_device(|device| {
            Ok(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: descriptor.label.as_deref(),
                contents: data,
                usage: descriptor.usage.into_wgpu(),
            }))
        })?;

        let id = self.generate_buffer_id();
        let mut buffers = self
            .internal
            .buffers
            .lock()
            .map_err(|_| poisoned("buffers"))?;
        buffers.insert(
            id,
            WgpuBufferEntry {
                wgpu_buffer: Arc::new(wgpu_buffer),
                size: data.len() as u64,
            },
        );
        Ok(id)
    }

    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), GraphicsError> {
        let (wgpu_buffer, size) = {
            let buffers = self
                .internal
                .buffers
                .lock()
                .map_err(|_| poisoned("buffers"))?;
            let entry = buffers.get(&id).ok_or(GraphicsError::InvalidHandle)?;
            (Arc::clone(&entry.wgpu_buffer), entry.size)
        };
        if offset + data.len() as u64 > size {
            return Err(GraphicsError::InvalidDescriptor(format!(
                "write of {} bytes at offset {offset} past end of {size}-byte buffer",
                data.len()
            )));
        }
        let guard = self
            .internal
            .context
            .lock()
            .map_err(|_| poisoned("WgpuGraphicsContext"))?;
        guard.queue().write_buffer(&wgpu_buffer, offset, data);
        Ok(())
    }

    fn destroy_buffer(&self, id: BufferId) {
        match self.internal.buffers.lock() {
            Ok(mut buffers) => {
                if buffers.remove(&id).is_none() {
                    log::warn!("WgpuDevice: destroy of unknown buffer {id:?}; leaking");
                }
            }
            Err(_) => log::error!("WgpuDevice: buffer registry poisoned; leaking {id:?}"),
        }
    }

    // --- Programs ---

    fn create_program(&self, descriptor: &ProgramDescriptor) -> Result<ProgramId, GraphicsError> {
        let label = descriptor.label.as_deref();
        let (vertex_module, fragment_module) = self.with_wgpu_device(|device| {
            let ShaderSource::Wgsl(vertex_src) = &descriptor.vertex_source;
            let ShaderSource::Wgsl(fragment_src) = &descriptor.fragment_source;
            let vertex = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label,
                source: wgpu::ShaderSource::Wgsl(vertex_src.clone()),
            });
            let fragment = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label,
                source: wgpu::ShaderSource::Wgsl(fragment_src.clone()),
            });
            Ok((Arc::new(vertex), Arc::new(fragment)))
        })?;

        let id = self.generate_program_id();
        let mut programs = self
            .internal
            .programs
            .lock()
            .map_err(|_| poisoned("programs"))?;
        programs.insert(
            id,
            WgpuProgramEntry {
                vertex_module,
                fragment_module,
                vertex_entry: descriptor.vertex_entry_point.to_string(),
                fragment_entry: descriptor.fragment_entry_point.to_string(),
            },
        );
        log::info!("WgpuDevice: created program {id:?} ({label:?})");
        Ok(id)
    }

    fn destroy_program(&self, id: ProgramId) {
        match self.internal.programs.lock() {
            Ok(mut programs) => {
                if programs.remove(&id).is_none() {
                    log::warn!("WgpuDevice: destroy of unknown program {id:?}; leaking");
                }
            }
            Err(_) => log::error!("WgpuDevice: program registry poisoned; leaking {id:?}"),
        }
        // Pipelines referencing the program stay cached; they are keyed by id
        // and an id is never reissued, so they can only go stale, not alias.
    }

    // --- Render targets ---

    fn create_render_target(
        &self,
        descriptor: &RenderTargetDescriptor,
    ) -> Result<RenderTarget, GraphicsError> {
        let color_params = descriptor.params(AttachmentType::Color).copied();
        let depth_params = descriptor.params(AttachmentType::Depth).copied();

        let color_texture = match &color_params {
            Some(params) => Some(self.create_texture(&TextureDescriptor {
                label: Some("lumen render target color".into()),
                texture_type: TextureType::D2,
                width: descriptor.width,
                height: descriptor.height,
                mip_level_count: 1,
                params: *params,
                usage: TextureUsage::RENDER_ATTACHMENT
                    | TextureUsage::SAMPLED
                    | TextureUsage::COPY_SRC,
            })?),
            None => None,
        };

        let (depth_view, depth_format) = match &depth_params {
            Some(params) => {
                if !self
                    .internal
                    .format_support
                    .contains(params.format.support_bit())
                {
                    return Err(GraphicsError::UnsupportedFormat {
                        format: params.format,
                    });
                }
                let format = params.format.into_wgpu();
                let (_texture, view) = self.with_wgpu_device(|device| {
                    Ok(Self::make_wgpu_texture(
                        device,
                        Some("lumen render target depth"),
                        TextureType::D2,
                        descriptor.width,
                        descriptor.height,
                        1,
                        format,
                        wgpu::TextureUsages::RENDER_ATTACHMENT,
                    ))
                })?;
                (Some(Arc::new(view)), Some(format))
            }
            None => (None, None),
        };

        let mut frame_buffer = FrameBuffer::new();
        for attachment in AttachmentType::ALL {
            if let Some(params) = descriptor.params(attachment) {
                let size = (descriptor.width * descriptor.height
                    * params.format.bytes_per_pixel()) as usize;
                frame_buffer.allocate(attachment, size);
            }
        }

        let id = self.generate_render_target_id();
        let mut targets = self
            .internal
            .render_targets
            .lock()
            .map_err(|_| poisoned("render_targets"))?;
        targets.insert(
            id,
            WgpuRenderTargetEntry {
                color_texture: color_texture.as_ref().map(Texture::handle),
                color_format: color_params.map(|p| p.format.into_wgpu()),
                depth_view,
                depth_format,
            },
        );
        log::debug!(
            "WgpuDevice: created render target {id:?} ({}x{})",
            descriptor.width,
            descriptor.height
        );
        Ok(RenderTarget::new(id, descriptor, color_texture, frame_buffer))
    }

    fn destroy_render_target(&self, mut target: RenderTarget, context: &mut DeviceContext) {
        context.clear_render_target(target.handle());
        match self.internal.render_targets.lock() {
            Ok(mut targets) => {
                if targets.remove(&target.handle()).is_none() {
                    log::warn!(
                        "WgpuDevice: destroy of unknown render target {:?}; leaking",
                        target.handle()
                    );
                }
            }
            Err(_) => {
                log::error!(
                    "WgpuDevice: render target registry poisoned; leaking {:?}",
                    target.handle()
                );
            }
        }
        if let Some(color) = target.take_color_texture() {
            self.destroy_texture(color, context);
        }
    }

    // --- Frame ---

    fn begin_frame(&mut self) -> Result<(), GraphicsError> {
        if self.frame.is_some() {
            return Err(GraphicsError::BackendError(
                "begin_frame called with a frame already open".to_string(),
            ));
        }
        let surface_texture = {
            let guard = self
                .internal
                .context
                .lock()
                .map_err(|_| poisoned("WgpuGraphicsContext"))?;
            guard
                .get_current_texture()
                .map_err(|e| GraphicsError::NativeSubmissionFailure(format!("acquire: {e}")))?
        };
        let view = Arc::new(
            surface_texture
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default()),
        );
        self.frame = Some(FrameInFlight {
            surface_texture,
            view,
            clears: ClearTracker::default(),
        });
        Ok(())
    }

    fn draw(&mut self, context: &DeviceContext, call: &DrawCall) -> Result<(), GraphicsError> {
        if let Err(binding) = context.validate_draw(call) {
            log::warn!("WgpuDevice: draw dropped: {binding}");
            return Err(binding.into());
        }
        // Peek only: the clear is marked consumed after the pass is
        // submitted, so an error below leaves it pending.
        let (backbuffer_view, first_use) = {
            let frame = self.frame.as_ref().ok_or_else(|| {
                GraphicsError::BackendError(
                    "draw submitted outside begin_frame/present".to_string(),
                )
            })?;
            let first_use = frame.clears.needs_clear(context.render_target());
            let view = match context.render_target() {
                Some(_) => None,
                None => Some(Arc::clone(&frame.view)),
            };
            (view, first_use)
        };

        // validate_draw guarantees these bindings exist.
        let declaration = context
            .vertex_declaration()
            .ok_or(GraphicsError::InvalidHandle)?;
        let vertex_binding = context.vertex_buffer().ok_or(GraphicsError::InvalidHandle)?;
        let program = context.program().ok_or(GraphicsError::InvalidHandle)?;

        // Resolve the draw destination.
        let surface_format = {
            let guard = self
                .internal
                .context
                .lock()
                .map_err(|_| poisoned("WgpuGraphicsContext"))?;
            guard.surface_format()
        };
        let (color_view, color_format, rt_depth_view, depth_format) = match context.render_target()
        {
            Some(rt) => {
                let targets = self
                    .internal
                    .render_targets
                    .lock()
                    .map_err(|_| poisoned("render_targets"))?;
                let entry = targets.get(&rt).ok_or(GraphicsError::InvalidHandle)?;
                let color_id = entry.color_texture.ok_or_else(|| {
                    GraphicsError::BackendError(
                        "render target has no color attachment".to_string(),
                    )
                })?;
                let color_format = entry.color_format.ok_or(GraphicsError::InvalidHandle)?;
                let depth_view = entry.depth_view.clone();
                let depth_format = entry.depth_format;
                drop(targets);

                let textures = self
                    .internal
                    .textures
                    .lock()
                    .map_err(|_| poisoned("textures"))?;
                let view = Arc::clone(
                    &textures
                        .get(&color_id)
                        .ok_or(GraphicsError::InvalidHandle)?
                        .view,
                );
                (view, color_format, depth_view, depth_format)
            }
            None => {
                let view = backbuffer_view.ok_or_else(|| {
                    GraphicsError::BackendError("missing backbuffer view".to_string())
                })?;
                (view, surface_format, None, Some(DEPTH_FORMAT))
            }
        };
        // Backbuffer draws use the shared depth attachment.
        let depth_view_ref: Option<&wgpu::TextureView> = match context.render_target() {
            Some(_) => rt_depth_view.as_deref(),
            None => Some(&self.depth.view),
        };

        // Pipeline lookup.
        let texture_mask = Self::texture_mask(context);
        let mut fixed = *context.fixed_function();
        fixed.scissor = None; // dynamic state, not part of the key
        let key = PipelineKey {
            program,
            topology: call.topology,
            declaration: declaration.clone(),
            fixed_function: fixed,
            texture_mask,
            color_format,
            depth_format: if depth_view_ref.is_some() {
                depth_format
            } else {
                None
            },
        };
        let pipeline = self.pipeline_for(&key)?;

        // Upload the register file.
        {
            let guard = self
                .internal
                .context
                .lock()
                .map_err(|_| poisoned("WgpuGraphicsContext"))?;
            guard.queue().write_buffer(
                &self.internal.register_buffer,
                0,
                bytemuck::cast_slice(context.registers()),
            );
        }

        // Resolve buffers and textures up front so no registry lock is held
        // across the render pass.
        let vertex_buffer = {
            let buffers = self
                .internal
                .buffers
                .lock()
                .map_err(|_| poisoned("buffers"))?;
            Arc::clone(
                &buffers
                    .get(&vertex_binding.buffer)
                    .ok_or(GraphicsError::InvalidHandle)?
                    .wgpu_buffer,
            )
        };
        let index_buffer = match (call.index_format, context.index_buffer()) {
            (Some(_), Some(binding)) => {
                let buffers = self
                    .internal
                    .buffers
                    .lock()
                    .map_err(|_| poisoned("buffers"))?;
                Some((
                    Arc::clone(
                        &buffers
                            .get(&binding.buffer)
                            .ok_or(GraphicsError::InvalidHandle)?
                            .wgpu_buffer,
                    ),
                    binding.format,
                ))
            }
            _ => None,
        };

        // Views are cloned out of the registry first so no registry lock is
        // held while sampler_for takes the wgpu device lock.
        let mut resolved: Vec<(u32, Arc<wgpu::TextureView>, Arc<wgpu::Sampler>)> = Vec::new();
        if texture_mask != 0 {
            let params_by_unit: Vec<(u32, Arc<wgpu::TextureView>, TextureParams)> = {
                let textures = self
                    .internal
                    .textures
                    .lock()
                    .map_err(|_| poisoned("textures"))?;
                let mut out = Vec::new();
                for (unit, slot) in context.textures().iter().enumerate() {
                    if let Some(texture_id) = slot {
                        let entry = textures
                            .get(texture_id)
                            .ok_or(GraphicsError::InvalidHandle)?;
                        out.push((unit as u32, Arc::clone(&entry.view), entry.params));
                    }
                }
                out
            };
            for (unit, view, params) in params_by_unit {
                let sampler = self.sampler_for(&params)?;
                resolved.push((unit, view, sampler));
            }
        }

        // Bind groups.
        let register_group = self.with_wgpu_device(|device| {
            Ok(device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("lumen register group"),
                layout: &self.internal.register_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.internal.register_buffer.as_entire_binding(),
                }],
            }))
        })?;
        let texture_group = if texture_mask != 0 {
            let layout = self.texture_layout_for(texture_mask)?;
            let mut entries = Vec::with_capacity(resolved.len() * 2);
            for (unit, view, sampler) in &resolved {
                entries.push(wgpu::BindGroupEntry {
                    binding: 2 * unit,
                    resource: wgpu::BindingResource::TextureView(view),
                });
                entries.push(wgpu::BindGroupEntry {
                    binding: 2 * unit + 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                });
            }
            Some(self.with_wgpu_device(|device| {
                Ok(device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("lumen texture group"),
                    layout: &layout,
                    entries: &entries,
                }))
            })?)
        } else {
            None
        };

        // Record and submit.
        let guard = self
            .internal
            .context
            .lock()
            .map_err(|_| poisoned("WgpuGraphicsContext"))?;
        let mut encoder = guard
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("lumen draw encoder"),
            });
        {
            let load = if first_use {
                wgpu::LoadOp::Clear(CLEAR_COLOR)
            } else {
                wgpu::LoadOp::Load
            };
            let depth_attachment =
                depth_view_ref.map(|view| wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: if first_use {
                            wgpu::LoadOp::Clear(1.0)
                        } else {
                            wgpu::LoadOp::Load
                        },
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: if first_use {
                            wgpu::LoadOp::Clear(0)
                        } else {
                            wgpu::LoadOp::Load
                        },
                        store: wgpu::StoreOp::Store,
                    }),
                });
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("lumen draw pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: depth_attachment,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&pipeline);
            pass.set_bind_group(0, &register_group, &[]);
            if let Some(group) = &texture_group {
                pass.set_bind_group(1, group, &[]);
            }
            if let Some(scissor) = context.fixed_function().scissor {
                pass.set_scissor_rect(scissor.x, scissor.y, scissor.width, scissor.height);
            }
            pass.set_stencil_reference(context.fixed_function().stencil.reference);
            pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            match &index_buffer {
                Some((buffer, format)) => {
                    pass.set_index_buffer(buffer.slice(..), (*format).into_wgpu());
                    pass.draw_indexed(
                        call.first..call.first + call.count,
                        0,
                        0..call.instance_count,
                    );
                }
                None => {
                    pass.draw(call.first..call.first + call.count, 0..call.instance_count);
                }
            }
        }
        guard.queue().submit(std::iter::once(encoder.finish()));
        drop(guard);
        if let Some(frame) = self.frame.as_mut() {
            frame.clears.mark_cleared(context.render_target());
        }
        Ok(())
    }

    fn present(&mut self) -> Result<(), GraphicsError> {
        let frame = self.frame.take().ok_or_else(|| {
            GraphicsError::BackendError("present called without an open frame".to_string())
        })?;
        frame.surface_texture.present();
        Ok(())
    }

    fn resize_surface(&mut self, width: u32, height: u32) {
        match self.internal.context.lock() {
            Ok(mut guard) => {
                guard.resize(width, height);
                if self.depth.width != width || self.depth.height != height {
                    self.depth = Self::make_depth_attachment(guard.device(), width, height);
                }
            }
            Err(_) => log::error!("WgpuDevice: context mutex poisoned in resize_surface"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::context::ContextParams;

    #[test]
    fn format_support_tracks_optional_features() {
        let base = compute_format_support(wgpu::Features::empty());
        assert!(base.contains(TextureFormatSupport::RGBA8_UNORM));
        assert!(base.contains(TextureFormatSupport::DEPTH24_PLUS_STENCIL8));
        assert!(!base.contains(TextureFormatSupport::DEPTH32_FLOAT_STENCIL8));

        let extended = compute_format_support(wgpu::Features::DEPTH32FLOAT_STENCIL8);
        assert!(extended.contains(TextureFormatSupport::DEPTH32_FLOAT_STENCIL8));
    }

    #[test]
    fn clear_stays_pending_until_marked() {
        let mut clears = ClearTracker::default();
        let rt = RenderTargetId(7);
        assert!(clears.needs_clear(None));
        assert!(clears.needs_clear(Some(rt)));
        // Peeking does not consume.
        assert!(clears.needs_clear(None));
        assert!(clears.needs_clear(Some(rt)));

        clears.mark_cleared(None);
        assert!(!clears.needs_clear(None));
        assert!(clears.needs_clear(Some(rt)));

        clears.mark_cleared(Some(rt));
        assert!(!clears.needs_clear(Some(rt)));
        assert!(clears.needs_clear(Some(RenderTargetId(8))));
    }

    #[test]
    fn cube_upload_extent_covers_six_faces() {
        let descriptor = TextureDescriptor {
            label: None,
            texture_type: TextureType::Cube,
            width: 16,
            height: 16,
            mip_level_count: 3,
            params: TextureParams::with_format(TextureFormat::Rgba8Unorm),
            usage: TextureUsage::SAMPLED | TextureUsage::COPY_DST,
        };
        let cube = Texture::new(TextureId(1), &descriptor);
        assert_eq!(WgpuDevice::upload_extent(&cube, 0), (16, 16, 6));
        assert_eq!(WgpuDevice::upload_extent(&cube, 2), (4, 4, 6));

        let flat = Texture::new(
            TextureId(2),
            &TextureDescriptor {
                texture_type: TextureType::D2,
                ..descriptor
            },
        );
        assert_eq!(WgpuDevice::upload_extent(&flat, 0), (16, 16, 1));
    }

    #[test]
    fn texture_mask_follows_occupied_units() {
        let mut context = DeviceContext::new(ContextParams::default());
        assert_eq!(WgpuDevice::texture_mask(&context), 0);
        context.bind_texture(0, Some(TextureId(1))).unwrap();
        context.bind_texture(5, Some(TextureId(2))).unwrap();
        assert_eq!(WgpuDevice::texture_mask(&context), 0b10_0001);
        context.bind_texture(0, None).unwrap();
        assert_eq!(WgpuDevice::texture_mask(&context), 0b10_0000);
    }
}
