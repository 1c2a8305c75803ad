//! GPU Rendering Subsystem.
//!
//! Sub-modules:
//!   renderer - wgpu device/surface lifecycle, frame orchestration
//!   patch    - curve and overlay pipelines, plan replay
//!   shaders  - embedded or on-disk WGSL sources

mod patch;
mod renderer;
mod shaders;

pub use patch::{align_to, call_fits, pack_uniforms, Globals, PatchBuffer, PatchPipelines, PATCH_STRIDE};
pub use renderer::GpuState;
pub use shaders::{ShaderSources, PATCH_SHADER, PLAIN_SHADER};

/// Run `f` inside a validation error scope and return whatever error the
/// device reported for it.
pub fn with_validation_scope<T>(
    device: &wgpu::Device,
    f: impl FnOnce() -> T,
) -> (T, Option<wgpu::Error>) {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let out = f();
    let error = pollster::block_on(scope.pop());
    (out, error)
}
