use crate::coords::TargetSize;

/// One acquired surface texture with its encoder.
///
/// Short-lived: holding the surface texture blocks acquisition of the next one.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
    /// Size of `view` in physical pixels.
    pub size: TargetSize,
}
