//! Asset registration and lazy loading
//!
//! Textures are registered by name up front, either one at a time or
//! from a RON manifest, and decoded from disk only on first use. Decoded
//! textures are uploaded through the renderer and cached by handle.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::render::renderer::Renderer;
use crate::render::vulkan::texture::ImageData;
use crate::render::TextureHandle;

/// Errors from asset registration and loading
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Filesystem read failed
    #[error("failed to read asset file {path}: {source}")]
    Io {
        /// Path that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// Manifest was not valid RON
    #[error("invalid asset manifest: {0}")]
    Manifest(#[from] ron::error::SpannedError),
    /// Image file could not be decoded
    #[error("failed to decode image {path}: {source}")]
    Decode {
        /// Path of the undecodable image
        path: PathBuf,
        /// Underlying decoder error
        #[source]
        source: image::ImageError,
    },
    /// Lookup of a name that was never registered
    #[error("asset '{name}' is not registered")]
    Unregistered {
        /// The unknown asset name
        name: String,
    },
    /// Texture upload failed
    #[error(transparent)]
    Upload(#[from] crate::render::VulkanError),
}

/// RON manifest listing texture assets by name
#[derive(Debug, Deserialize)]
pub struct AssetManifest {
    /// Registered texture entries
    #[serde(default)]
    pub textures: Vec<TextureEntry>,
}

/// One texture entry in the manifest
#[derive(Debug, Deserialize)]
pub struct TextureEntry {
    /// Name the texture is looked up by
    pub name: String,
    /// Image file path, relative to the manifest's directory
    pub path: PathBuf,
}

impl AssetManifest {
    /// Parse a manifest from RON text
    pub fn from_ron(text: &str) -> Result<Self, AssetError> {
        Ok(ron::from_str(text)?)
    }
}

enum TextureState {
    Registered(PathBuf),
    Loaded(TextureHandle),
}

/// Registry of named assets with lazy texture loading
#[derive(Default)]
pub struct AssetManager {
    textures: HashMap<String, TextureState>,
}

impl AssetManager {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture file under a name
    ///
    /// Re-registering a name replaces the previous entry and drops any
    /// cached handle for it.
    pub fn register_texture(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        self.textures
            .insert(name.into(), TextureState::Registered(path.into()));
    }

    /// Register every entry of a RON manifest file
    ///
    /// Relative texture paths resolve against the manifest's directory.
    pub fn load_manifest(&mut self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = AssetManifest::from_ron(&text)?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for entry in manifest.textures {
            self.register_texture(entry.name, base.join(entry.path));
        }
        Ok(())
    }

    /// Get the texture handle for a registered name, decoding and
    /// uploading the image on first use.
    pub fn texture(
        &mut self,
        name: &str,
        renderer: &mut Renderer,
    ) -> Result<TextureHandle, AssetError> {
        let state = self
            .textures
            .get_mut(name)
            .ok_or_else(|| AssetError::Unregistered {
                name: name.to_string(),
            })?;

        let path = match state {
            TextureState::Loaded(handle) => return Ok(*handle),
            TextureState::Registered(path) => path.clone(),
        };

        let image = image::open(&path)
            .map_err(|source| AssetError::Decode {
                path: path.clone(),
                source,
            })?
            .to_rgba8();
        let data = ImageData {
            width: image.width(),
            height: image.height(),
            pixels: image.into_raw(),
        };

        log::debug!("Loaded texture '{}' from {}", name, path.display());
        let handle = renderer.create_texture(&data)?;
        *state = TextureState::Loaded(handle);
        Ok(handle)
    }

    /// Whether a name has been registered
    pub fn contains(&self, name: &str) -> bool {
        self.textures.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_parses_texture_entries() {
        let manifest = AssetManifest::from_ron(
            r#"(
                textures: [
                    (name: "crate", path: "textures/crate.png"),
                    (name: "ground", path: "textures/ground.png"),
                ],
            )"#,
        )
        .unwrap();

        assert_eq!(manifest.textures.len(), 2);
        assert_eq!(manifest.textures[0].name, "crate");
        assert_eq!(
            manifest.textures[1].path,
            PathBuf::from("textures/ground.png")
        );
    }

    #[test]
    fn manifest_allows_missing_sections() {
        let manifest = AssetManifest::from_ron("()").unwrap();
        assert!(manifest.textures.is_empty());
    }

    #[test]
    fn manifest_rejects_malformed_ron() {
        assert!(matches!(
            AssetManifest::from_ron("(textures: oops)"),
            Err(AssetError::Manifest(_))
        ));
    }

    #[test]
    fn registration_is_visible() {
        let mut assets = AssetManager::new();
        assert!(!assets.contains("crate"));
        assets.register_texture("crate", "textures/crate.png");
        assert!(assets.contains("crate"));
    }
}
