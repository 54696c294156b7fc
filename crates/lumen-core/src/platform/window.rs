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

//! The boundary between the device layer and whatever windowing library the
//! embedder uses.

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::sync::Arc;

/// Combines the handle traits a graphics backend needs into one trait, so it
/// can be used as a trait object.
pub trait WindowHandle: HasWindowHandle + HasDisplayHandle {}

impl<T: HasWindowHandle + HasDisplayHandle> WindowHandle for T {}

/// A shared, thread-safe handle a backend creates its surface from.
pub type LumenWindowHandle = Arc<dyn WindowHandle + Send + Sync>;

/// Abstracts the behavior of a window.
///
/// Any windowing backend (winit, SDL2, GLFW) can implement this trait to
/// drive the device layer.
pub trait LumenWindow: HasWindowHandle + HasDisplayHandle + Send + Sync {
    /// The physical dimensions (width, height) of the window's inner area.
    fn inner_size(&self) -> (u32, u32);

    /// The scale factor of the window.
    fn scale_factor(&self) -> f64;

    /// Requests that the window be redrawn.
    fn request_redraw(&self);

    /// Clones a shared handle to the window for surface creation.
    fn clone_handle_arc(&self) -> LumenWindowHandle;
}
