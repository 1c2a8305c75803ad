//! Shader sources: embedded by default, or read from a directory.

use std::borrow::Cow;
use std::path::Path;

use glyphtess_core::GlyphError;

pub const PATCH_SHADER: &str = "patch.wgsl";
pub const PLAIN_SHADER: &str = "plain.wgsl";

const EMBEDDED_PATCH: &str = include_str!("patch.wgsl");
const EMBEDDED_PLAIN: &str = include_str!("plain.wgsl");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub patch: Cow<'static, str>,
    pub plain: Cow<'static, str>,
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self::embedded()
    }
}

impl ShaderSources {
    pub fn embedded() -> Self {
        Self {
            patch: Cow::Borrowed(EMBEDDED_PATCH),
            plain: Cow::Borrowed(EMBEDDED_PLAIN),
        }
    }

    /// Load both programs. With no directory the embedded copies are used;
    /// with one, both files must exist there and be non-empty.
    pub fn load(dir: Option<&Path>) -> Result<Self, GlyphError> {
        let Some(dir) = dir else {
            return Ok(Self::embedded());
        };
        let sources = Self {
            patch: Cow::Owned(read_source(dir, PATCH_SHADER)?),
            plain: Cow::Owned(read_source(dir, PLAIN_SHADER)?),
        };
        tracing::info!(dir = %dir.display(), "loaded shaders from directory");
        Ok(sources)
    }
}

fn read_source(dir: &Path, name: &str) -> Result<String, GlyphError> {
    let path = dir.join(name);
    let source = std::fs::read_to_string(&path).map_err(|e| {
        GlyphError::InitializationFailure(format!("cannot read shader {}: {e}", path.display()))
    })?;
    if source.trim().is_empty() {
        return Err(GlyphError::InitializationFailure(format!(
            "shader {} is empty",
            path.display()
        )));
    }
    Ok(source)
}
