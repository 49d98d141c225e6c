//! # vk_engine
//!
//! A small real-time rendering engine built on Vulkan.
//!
//! The crate is organized in layers:
//!
//! - [`render::vulkan`]: RAII wrappers over raw Vulkan objects and the
//!   device context that owns them
//! - [`render`]: meshes, cameras, the material system, and the
//!   [`render::Renderer`] frame loop
//! - [`assets`]: named texture registration with lazy decode and upload
//! - [`foundation`]: math, timing, and logging support
//! - [`config`]: TOML-backed engine configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vk_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     vk_engine::foundation::logging::init();
//!     let config = EngineConfig::default();
//!
//!     let mut window = Window::new(
//!         &config.window.title,
//!         config.window.width,
//!         config.window.height,
//!     )?;
//!     let mut renderer = Renderer::new(&mut window, &config)?;
//!
//!     let camera = Camera::default();
//!     while !window.should_close() {
//!         window.poll_events();
//!         renderer.render(&mut window, &camera)?;
//!     }
//!     renderer.wait_idle()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod render;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetError, AssetManager},
        config::{ConfigError, EngineConfig},
        foundation::{
            math::{Mat4, Transform, Vec3},
            time::Clock,
        },
        render::{
            Camera, FrameOutcome, ImageData, MaterialHandle, Mesh, MeshHandle, Renderer,
            StandardUniforms, TextureHandle, VulkanError, Window,
        },
    };
}
