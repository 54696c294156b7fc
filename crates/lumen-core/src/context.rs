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

//! The mutable per-device state snapshot sitting between callers and a
//! backend.
//!
//! A [`DeviceContext`] records what is currently bound (program, buffers,
//! declaration, render target, texture units), the shader constant register
//! file, fixed-function state, window geometry, and the window callbacks.
//! Backends read this state at draw time; they never own it. The context is
//! single-threaded by design and is not `Sync`.

use crate::api::state::{
    ColorWrites, CompareFunction, FixedFunctionState, ScissorRect, StencilState,
};
use crate::api::{
    DrawCall, IndexBufferBinding, ProgramId, RenderTargetId, TextureFilter, TextureFormat,
    TextureFormatSupport, TextureId, VertexBufferBinding, VertexDeclaration, MAX_REGISTER_COUNT,
    MAX_TEXTURE_UNITS,
};
use crate::error::{BindingError, GraphicsError};
use crate::math::Vec4;

/// Invoked after the window was resized, with the new width and height.
pub type ResizeCallback = Box<dyn FnMut(u32, u32) + Send>;
/// Invoked when the user asks to close the window. Returning `true` accepts
/// the close request.
pub type CloseCallback = Box<dyn FnMut() -> bool + Send>;
/// Invoked when the window gains (`true`) or loses (`false`) focus.
pub type FocusCallback = Box<dyn FnMut(bool) + Send>;

/// Creation parameters for a [`DeviceContext`].
#[derive(Debug, Clone, Copy)]
pub struct ContextParams {
    /// Initial window width in pixels.
    pub window_width: u32,
    /// Initial window height in pixels.
    pub window_height: u32,
    /// Dots per inch of the display the window opened on.
    pub dpi: u32,
    /// Filter used when a texture is sampled without explicit parameters and
    /// is minified.
    pub default_min_filter: TextureFilter,
    /// Filter used when a texture is sampled without explicit parameters and
    /// is magnified.
    pub default_mag_filter: TextureFilter,
}

impl Default for ContextParams {
    fn default() -> Self {
        Self {
            window_width: 960,
            window_height: 540,
            dpi: 96,
            default_min_filter: TextureFilter::Linear,
            default_mag_filter: TextureFilter::Linear,
        }
    }
}

/// A value snapshot of everything that influences a draw.
///
/// Taken before and after a rejected submission to assert the context was
/// left untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingSnapshot {
    /// The register file.
    pub registers: [Vec4; MAX_REGISTER_COUNT],
    /// The bound program, if any.
    pub program: Option<ProgramId>,
    /// The bound vertex buffer, if any.
    pub vertex_buffer: Option<VertexBufferBinding>,
    /// The bound index buffer, if any.
    pub index_buffer: Option<IndexBufferBinding>,
    /// The bound vertex declaration, if any.
    pub vertex_declaration: Option<VertexDeclaration>,
    /// The bound render target, or `None` for the backbuffer.
    pub render_target: Option<RenderTargetId>,
    /// The texture bound to each unit.
    pub textures: [Option<TextureId>; MAX_TEXTURE_UNITS],
    /// The fixed-function state.
    pub fixed_function: FixedFunctionState,
}

/// The mutable device state a single thread drives between draws.
pub struct DeviceContext {
    registers: [Vec4; MAX_REGISTER_COUNT],
    program: Option<ProgramId>,
    vertex_buffer: Option<VertexBufferBinding>,
    index_buffer: Option<IndexBufferBinding>,
    vertex_declaration: Option<VertexDeclaration>,
    render_target: Option<RenderTargetId>,
    textures: [Option<TextureId>; MAX_TEXTURE_UNITS],
    fixed_function: FixedFunctionState,

    window_width: u32,
    window_height: u32,
    backbuffer_width: u32,
    backbuffer_height: u32,
    dpi: u32,
    window_opened: bool,
    close_requested: bool,

    default_min_filter: TextureFilter,
    default_mag_filter: TextureFilter,
    format_support: TextureFormatSupport,

    resize_callback: Option<ResizeCallback>,
    close_callback: Option<CloseCallback>,
    focus_callback: Option<FocusCallback>,
}

impl DeviceContext {
    /// Opens a context with nothing bound and documented default state.
    pub fn new(params: ContextParams) -> Self {
        Self {
            registers: [Vec4::ZERO; MAX_REGISTER_COUNT],
            program: None,
            vertex_buffer: None,
            index_buffer: None,
            vertex_declaration: None,
            render_target: None,
            textures: [None; MAX_TEXTURE_UNITS],
            fixed_function: FixedFunctionState::default(),
            window_width: params.window_width,
            window_height: params.window_height,
            backbuffer_width: params.window_width,
            backbuffer_height: params.window_height,
            dpi: params.dpi,
            window_opened: true,
            close_requested: false,
            default_min_filter: params.default_min_filter,
            default_mag_filter: params.default_mag_filter,
            format_support: TextureFormatSupport::EMPTY,
            resize_callback: None,
            close_callback: None,
            focus_callback: None,
        }
    }

    // --- Shader constant registers ---

    /// Writes one register of the shader constant file.
    ///
    /// # Errors
    ///
    /// Returns [`GraphicsError::ResourceLimitExceeded`] when `index` is
    /// outside the register file.
    pub fn set_register(&mut self, index: usize, value: Vec4) -> Result<(), GraphicsError> {
        if index >= MAX_REGISTER_COUNT {
            return Err(GraphicsError::ResourceLimitExceeded {
                resource: "shader constant registers",
                requested: index as u32,
                limit: MAX_REGISTER_COUNT as u32,
            });
        }
        self.registers[index] = value;
        Ok(())
    }

    /// The whole register file, for upload at draw time.
    pub fn registers(&self) -> &[Vec4; MAX_REGISTER_COUNT] {
        &self.registers
    }

    // --- Bindings ---
    //
    // Every bind replaces the previous binding of the same kind; `None`
    // unbinds. Nothing here is owning.

    /// Binds `program`, or unbinds with `None`.
    pub fn bind_program(&mut self, program: Option<ProgramId>) {
        self.program = program;
    }

    /// The bound program, if any.
    pub fn program(&self) -> Option<ProgramId> {
        self.program
    }

    /// Binds a vertex buffer with its element stride, or unbinds with `None`.
    pub fn bind_vertex_buffer(&mut self, binding: Option<VertexBufferBinding>) {
        self.vertex_buffer = binding;
    }

    /// The bound vertex buffer, if any.
    pub fn vertex_buffer(&self) -> Option<VertexBufferBinding> {
        self.vertex_buffer
    }

    /// Binds an index buffer with its element type, or unbinds with `None`.
    pub fn bind_index_buffer(&mut self, binding: Option<IndexBufferBinding>) {
        self.index_buffer = binding;
    }

    /// The bound index buffer, if any.
    pub fn index_buffer(&self) -> Option<IndexBufferBinding> {
        self.index_buffer
    }

    /// Binds a vertex declaration, or unbinds with `None`.
    pub fn bind_vertex_declaration(&mut self, declaration: Option<VertexDeclaration>) {
        self.vertex_declaration = declaration;
    }

    /// The bound vertex declaration, if any.
    pub fn vertex_declaration(&self) -> Option<&VertexDeclaration> {
        self.vertex_declaration.as_ref()
    }

    /// Binds a render target, or `None` to draw to the backbuffer.
    pub fn bind_render_target(&mut self, target: Option<RenderTargetId>) {
        self.render_target = target;
    }

    /// The bound render target, or `None` for the backbuffer.
    pub fn render_target(&self) -> Option<RenderTargetId> {
        self.render_target
    }

    /// Binds `texture` to `unit`, or unbinds the unit with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphicsError::ResourceLimitExceeded`] when `unit` is
    /// outside the unit array.
    pub fn bind_texture(
        &mut self,
        unit: usize,
        texture: Option<TextureId>,
    ) -> Result<(), GraphicsError> {
        if unit >= MAX_TEXTURE_UNITS {
            return Err(GraphicsError::ResourceLimitExceeded {
                resource: "texture units",
                requested: unit as u32,
                limit: MAX_TEXTURE_UNITS as u32,
            });
        }
        self.textures[unit] = texture;
        Ok(())
    }

    /// The texture bound to `unit`, if any.
    pub fn texture(&self, unit: usize) -> Option<TextureId> {
        self.textures.get(unit).copied().flatten()
    }

    /// The texture bound to each unit, in unit order.
    pub fn textures(&self) -> &[Option<TextureId>; MAX_TEXTURE_UNITS] {
        &self.textures
    }

    /// Unbinds `texture` from every unit it occupies.
    ///
    /// Called by backends when the texture is destroyed so no stale handle
    /// survives in the context.
    pub fn clear_texture(&mut self, texture: TextureId) {
        for slot in self.textures.iter_mut() {
            if *slot == Some(texture) {
                *slot = None;
            }
        }
    }

    /// Unbinds `target` if it is the bound render target.
    ///
    /// Called by backends when the target is destroyed.
    pub fn clear_render_target(&mut self, target: RenderTargetId) {
        if self.render_target == Some(target) {
            self.render_target = None;
        }
    }

    // --- Fixed-function state ---

    /// Enables or disables the depth test.
    pub fn set_depth_test(&mut self, enabled: bool) {
        self.fixed_function.depth_test_enabled = enabled;
    }

    /// Sets the depth comparison function.
    pub fn set_depth_func(&mut self, func: CompareFunction) {
        self.fixed_function.depth_func = func;
    }

    /// Enables or disables depth writes.
    pub fn set_depth_mask(&mut self, enabled: bool) {
        self.fixed_function.depth_write_enabled = enabled;
    }

    /// Replaces the whole stencil configuration.
    pub fn set_stencil(&mut self, stencil: StencilState) {
        self.fixed_function.stencil = stencil;
    }

    /// Sets which color channels draws may write.
    pub fn set_color_mask(&mut self, writes: ColorWrites) {
        self.fixed_function.color_writes = writes;
    }

    /// Sets the scissor rectangle, or `None` to rasterize the full target.
    pub fn set_scissor(&mut self, rect: Option<ScissorRect>) {
        self.fixed_function.scissor = rect;
    }

    /// The complete fixed-function state.
    pub fn fixed_function(&self) -> &FixedFunctionState {
        &self.fixed_function
    }

    // --- Format support ---

    /// Records the backend's supported-format mask. Set once at init.
    pub fn set_format_support(&mut self, support: TextureFormatSupport) {
        self.format_support = support;
    }

    /// The backend's supported-format mask.
    pub fn format_support(&self) -> TextureFormatSupport {
        self.format_support
    }

    /// Whether the backend reported support for `format`.
    pub fn is_format_supported(&self, format: TextureFormat) -> bool {
        self.format_support.contains(format.support_bit())
    }

    // --- Window geometry and callbacks ---

    /// Window width in pixels.
    pub fn window_width(&self) -> u32 {
        self.window_width
    }

    /// Window height in pixels.
    pub fn window_height(&self) -> u32 {
        self.window_height
    }

    /// Backbuffer width in pixels. Tracks the window until a backend decides
    /// otherwise (e.g. fixed-resolution scaling).
    pub fn backbuffer_width(&self) -> u32 {
        self.backbuffer_width
    }

    /// Backbuffer height in pixels.
    pub fn backbuffer_height(&self) -> u32 {
        self.backbuffer_height
    }

    /// Overrides the backbuffer dimensions independently of the window.
    pub fn set_backbuffer_size(&mut self, width: u32, height: u32) {
        self.backbuffer_width = width;
        self.backbuffer_height = height;
    }

    /// Dots per inch of the display.
    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Whether the window behind this context is open.
    pub fn window_opened(&self) -> bool {
        self.window_opened
    }

    /// Whether a close request was accepted. Diagnostic only: reading or
    /// setting it never closes anything.
    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    /// Registers the resize callback, replacing any previous one.
    pub fn set_resize_callback(&mut self, callback: ResizeCallback) {
        self.resize_callback = Some(callback);
    }

    /// Registers the close callback, replacing any previous one.
    pub fn set_close_callback(&mut self, callback: CloseCallback) {
        self.close_callback = Some(callback);
    }

    /// Registers the focus callback, replacing any previous one.
    pub fn set_focus_callback(&mut self, callback: FocusCallback) {
        self.focus_callback = Some(callback);
    }

    /// Records new window dimensions and invokes the latest resize callback
    /// exactly once.
    pub fn emit_resize(&mut self, width: u32, height: u32) {
        log::debug!("DeviceContext: window resized to {width}x{height}");
        self.window_width = width;
        self.window_height = height;
        self.backbuffer_width = width;
        self.backbuffer_height = height;
        if let Some(callback) = self.resize_callback.as_mut() {
            callback(width, height);
        }
    }

    /// Invokes the latest focus callback exactly once.
    pub fn emit_focus(&mut self, focused: bool) {
        if let Some(callback) = self.focus_callback.as_mut() {
            callback(focused);
        }
    }

    /// Forwards a close request to the latest close callback.
    ///
    /// With no callback registered the request is accepted. An accepted
    /// request only raises the diagnostic flag; actually tearing the window
    /// down is the embedder's job.
    pub fn emit_close_request(&mut self) {
        let accepted = match self.close_callback.as_mut() {
            Some(callback) => callback(),
            None => true,
        };
        if accepted {
            log::info!("DeviceContext: close request accepted");
            self.close_requested = true;
        }
    }

    // --- Draw validation ---

    /// Captures everything that influences a draw, for equality assertions.
    pub fn snapshot(&self) -> BindingSnapshot {
        BindingSnapshot {
            registers: self.registers,
            program: self.program,
            vertex_buffer: self.vertex_buffer,
            index_buffer: self.index_buffer,
            vertex_declaration: self.vertex_declaration.clone(),
            render_target: self.render_target,
            textures: self.textures,
            fixed_function: self.fixed_function,
        }
    }

    /// Checks the binding set is consistent for `draw`.
    ///
    /// Pure read: a failed validation leaves the context bit-for-bit as it
    /// was, the caller drops the draw and carries on.
    pub fn validate_draw(&self, draw: &DrawCall) -> Result<(), BindingError> {
        let declaration = self
            .vertex_declaration
            .as_ref()
            .ok_or(BindingError::MissingVertexDeclaration)?;
        let vertex_buffer = self
            .vertex_buffer
            .ok_or(BindingError::MissingVertexBuffer)?;
        if self.program.is_none() {
            return Err(BindingError::MissingProgram);
        }
        if declaration.stride() != vertex_buffer.stride {
            return Err(BindingError::StrideMismatch {
                declaration: declaration.stride(),
                buffer: vertex_buffer.stride,
            });
        }
        if let Some(requested) = draw.index_format {
            let index_buffer = self.index_buffer.ok_or(BindingError::MissingIndexBuffer)?;
            if index_buffer.format != requested {
                return Err(BindingError::IndexFormatMismatch {
                    bound: index_buffer.format,
                    requested,
                });
            }
        }
        Ok(())
    }

    /// The default minification filter for textures created without params.
    pub fn default_min_filter(&self) -> TextureFilter {
        self.default_min_filter
    }

    /// The default magnification filter for textures created without params.
    pub fn default_mag_filter(&self) -> TextureFilter {
        self.default_mag_filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::{IndexFormat, PrimitiveTopology};
    use crate::api::vertex::{VertexElementType, VertexStream};
    use crate::api::BufferId;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn context() -> DeviceContext {
        DeviceContext::new(ContextParams::default())
    }

    fn declaration(stride: u16) -> VertexDeclaration {
        VertexDeclaration::new(
            vec![VertexStream {
                name: "position".to_string(),
                stream_index: 0,
                location: 0,
                component_count: 3,
                offset: 0,
                element_type: VertexElementType::Float32,
                normalized: false,
            }],
            stride,
        )
        .unwrap()
    }

    fn bind_all(ctx: &mut DeviceContext, stride: u16) {
        ctx.bind_program(Some(ProgramId(1)));
        ctx.bind_vertex_declaration(Some(declaration(stride)));
        ctx.bind_vertex_buffer(Some(VertexBufferBinding {
            buffer: BufferId(1),
            stride,
        }));
    }

    #[test]
    fn fresh_context_defaults() {
        let ctx = context();
        assert_eq!(ctx.fixed_function().depth_func, CompareFunction::Less);
        assert!(ctx.fixed_function().depth_write_enabled);
        assert_eq!(ctx.fixed_function().color_writes, ColorWrites::ALL);
        assert_eq!(
            ctx.fixed_function().stencil.fail_op,
            crate::api::StencilOperation::Keep
        );
        assert!(ctx.window_opened());
        assert!(!ctx.close_requested());
        assert_eq!(ctx.registers()[0], Vec4::ZERO);
    }

    #[test]
    fn binding_replaces_instead_of_stacking() {
        let mut ctx = context();
        ctx.bind_vertex_buffer(Some(VertexBufferBinding {
            buffer: BufferId(1),
            stride: 12,
        }));
        ctx.bind_vertex_buffer(Some(VertexBufferBinding {
            buffer: BufferId(2),
            stride: 24,
        }));
        assert_eq!(
            ctx.vertex_buffer(),
            Some(VertexBufferBinding {
                buffer: BufferId(2),
                stride: 24,
            })
        );
    }

    #[test]
    fn none_unbinds() {
        let mut ctx = context();
        ctx.bind_program(Some(ProgramId(7)));
        ctx.bind_program(None);
        assert_eq!(ctx.program(), None);

        ctx.bind_texture(3, Some(TextureId(9))).unwrap();
        ctx.bind_texture(3, None).unwrap();
        assert_eq!(ctx.texture(3), None);
    }

    #[test]
    fn register_index_out_of_range() {
        let mut ctx = context();
        ctx.set_register(15, Vec4::ONE).unwrap();
        assert_eq!(ctx.registers()[15], Vec4::ONE);
        let err = ctx.set_register(16, Vec4::ONE).unwrap_err();
        assert!(matches!(
            err,
            GraphicsError::ResourceLimitExceeded { limit: 16, .. }
        ));
    }

    #[test]
    fn texture_unit_out_of_range() {
        let mut ctx = context();
        let err = ctx
            .bind_texture(MAX_TEXTURE_UNITS, Some(TextureId(1)))
            .unwrap_err();
        assert!(matches!(
            err,
            GraphicsError::ResourceLimitExceeded { limit: 32, .. }
        ));
    }

    #[test]
    fn clear_texture_empties_every_unit_it_occupies() {
        let mut ctx = context();
        ctx.bind_texture(0, Some(TextureId(5))).unwrap();
        ctx.bind_texture(4, Some(TextureId(5))).unwrap();
        ctx.bind_texture(7, Some(TextureId(6))).unwrap();
        ctx.clear_texture(TextureId(5));
        assert_eq!(ctx.texture(0), None);
        assert_eq!(ctx.texture(4), None);
        assert_eq!(ctx.texture(7), Some(TextureId(6)));
    }

    #[test]
    fn clear_render_target_only_when_bound() {
        let mut ctx = context();
        ctx.bind_render_target(Some(RenderTargetId(1)));
        ctx.clear_render_target(RenderTargetId(2));
        assert_eq!(ctx.render_target(), Some(RenderTargetId(1)));
        ctx.clear_render_target(RenderTargetId(1));
        assert_eq!(ctx.render_target(), None);
    }

    #[test]
    fn resize_callback_replace_and_exactly_once() {
        let mut ctx = context();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let counter = first.clone();
        ctx.set_resize_callback(Box::new(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let counter = second.clone();
        ctx.set_resize_callback(Box::new(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        ctx.emit_resize(800, 600);
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert_eq!(ctx.window_width(), 800);
        assert_eq!(ctx.window_height(), 600);
        assert_eq!(ctx.backbuffer_width(), 800);
    }

    #[test]
    fn close_request_consults_callback() {
        let mut ctx = context();
        ctx.set_close_callback(Box::new(|| false));
        ctx.emit_close_request();
        assert!(!ctx.close_requested());

        ctx.set_close_callback(Box::new(|| true));
        ctx.emit_close_request();
        assert!(ctx.close_requested());
    }

    #[test]
    fn close_request_without_callback_is_accepted() {
        let mut ctx = context();
        ctx.emit_close_request();
        assert!(ctx.close_requested());
    }

    #[test]
    fn validate_draw_requires_full_binding_set() {
        let mut ctx = context();
        let draw = DrawCall::vertices(PrimitiveTopology::TriangleList, 0, 3);

        assert_eq!(
            ctx.validate_draw(&draw),
            Err(BindingError::MissingVertexDeclaration)
        );
        ctx.bind_vertex_declaration(Some(declaration(12)));
        assert_eq!(
            ctx.validate_draw(&draw),
            Err(BindingError::MissingVertexBuffer)
        );
        ctx.bind_vertex_buffer(Some(VertexBufferBinding {
            buffer: BufferId(1),
            stride: 12,
        }));
        assert_eq!(ctx.validate_draw(&draw), Err(BindingError::MissingProgram));
        ctx.bind_program(Some(ProgramId(1)));
        assert_eq!(ctx.validate_draw(&draw), Ok(()));
    }

    #[test]
    fn stride_mismatch_rejected_and_state_untouched() {
        let mut ctx = context();
        ctx.bind_program(Some(ProgramId(1)));
        ctx.bind_vertex_declaration(Some(declaration(12)));
        ctx.bind_vertex_buffer(Some(VertexBufferBinding {
            buffer: BufferId(1),
            stride: 16,
        }));
        ctx.set_register(0, Vec4::ONE).unwrap();

        let before = ctx.snapshot();
        let draw = DrawCall::vertices(PrimitiveTopology::TriangleList, 0, 3);
        assert_eq!(
            ctx.validate_draw(&draw),
            Err(BindingError::StrideMismatch {
                declaration: 12,
                buffer: 16,
            })
        );
        assert_eq!(ctx.snapshot(), before);
    }

    #[test]
    fn indexed_draw_needs_matching_index_buffer() {
        let mut ctx = context();
        bind_all(&mut ctx, 12);

        let draw = DrawCall::indexed(PrimitiveTopology::TriangleList, 0, 3, IndexFormat::Uint16);
        assert_eq!(
            ctx.validate_draw(&draw),
            Err(BindingError::MissingIndexBuffer)
        );

        ctx.bind_index_buffer(Some(IndexBufferBinding {
            buffer: BufferId(2),
            format: IndexFormat::Uint32,
        }));
        assert_eq!(
            ctx.validate_draw(&draw),
            Err(BindingError::IndexFormatMismatch {
                bound: IndexFormat::Uint32,
                requested: IndexFormat::Uint16,
            })
        );

        ctx.bind_index_buffer(Some(IndexBufferBinding {
            buffer: BufferId(2),
            format: IndexFormat::Uint16,
        }));
        assert_eq!(ctx.validate_draw(&draw), Ok(()));
    }

    #[test]
    fn format_support_lookup() {
        let mut ctx = context();
        assert!(!ctx.is_format_supported(TextureFormat::Rgba8Unorm));
        ctx.set_format_support(
            TextureFormatSupport::RGBA8_UNORM | TextureFormatSupport::DEPTH32_FLOAT,
        );
        assert!(ctx.is_format_supported(TextureFormat::Rgba8Unorm));
        assert!(ctx.is_format_supported(TextureFormat::Depth32Float));
        assert!(!ctx.is_format_supported(TextureFormat::Rgba16Float));
    }
}
