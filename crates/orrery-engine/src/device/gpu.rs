use std::sync::Arc;

use anyhow::{Context, Result, ensure};
use wgpu::{SurfaceError, TextureFormat};
use winit::dpi::PhysicalSize;
use winit::window::Window;

/// Surface preferences for the window's GPU context.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB surface format when the adapter offers one.
    pub prefer_srgb: bool,

    pub present_mode: wgpu::PresentMode,

    /// Used only when the surface supports it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub limits: wgpu::Limits,

    pub frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            limits: wgpu::Limits::default(),
            frame_latency: 2,
        }
    }
}

/// Device, queue and configured surface for one window.
pub struct Gpu {
    /// Holds an `Arc<Window>`, keeping the window alive.
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    /// Set while the window has a zero-sized drawable.
    minimized: bool,
}

/// An acquired surface texture with its view and a fresh encoder.
pub struct GpuFrame {
    texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// What the backend should do after a failed acquire.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    Reconfigured,
    SkipFrame,
    Fatal,
}

impl Gpu {
    pub async fn new(window: Arc<Window>, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter can present to this window")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("orrery device"),
                required_limits: init.limits,
                ..Default::default()
            })
            .await
            .context("failed to open GPU device")?;

        let caps = surface.get_capabilities(&adapter);
        let format =
            pick_format(&caps.formats, init.prefer_srgb).context("surface reports no formats")?;
        let alpha_mode = init
            .alpha_mode
            .filter(|m| caps.alpha_modes.contains(m))
            .or_else(|| caps.alpha_modes.first().copied())
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: init.present_mode,
            alpha_mode,
            view_formats: Vec::new(),
            desired_maximum_frame_latency: init.frame_latency,
        };
        surface.configure(&device, &config);

        let info = adapter.get_info();
        log::debug!(
            "gpu ready: {} ({:?}), {format:?} {}x{}",
            info.name,
            info.backend,
            size.width,
            size.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            minimized: false,
        })
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.config.format
    }

    /// Width over height of the configured surface.
    pub fn aspect(&self) -> f32 {
        aspect(self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Reconfigures the surface. A zero size keeps the old configuration until
    /// the window is restored.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.minimized = size.width == 0 || size.height == 0;
        if self.minimized {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn begin_frame(&self) -> Result<GpuFrame, SurfaceError> {
        let texture = self.surface.get_current_texture()?;
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("orrery frame"),
            });
        Ok(GpuFrame {
            texture,
            view,
            encoder,
        })
    }

    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame {
            texture,
            view,
            encoder,
        } = frame;
        self.queue.submit([encoder.finish()]);
        drop(view);
        texture.present();
    }

    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        match err {
            SurfaceError::Lost | SurfaceError::Outdated => {
                if !self.minimized {
                    self.surface.configure(&self.device, &self.config);
                }
                SurfaceErrorAction::Reconfigured
            }
            SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
            SurfaceError::Timeout | SurfaceError::Other => SurfaceErrorAction::SkipFrame,
        }
    }
}

fn aspect(width: u32, height: u32) -> f32 {
    if width == 0 || height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

/// First sRGB format when preferred and offered, else the adapter's first choice.
fn pick_format(formats: &[TextureFormat], prefer_srgb: bool) -> Option<TextureFormat> {
    let srgb = formats
        .iter()
        .copied()
        .find(|f| prefer_srgb && f.is_srgb());
    srgb.or_else(|| formats.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_format_is_preferred_when_offered() {
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(pick_format(&formats, true), Some(TextureFormat::Bgra8UnormSrgb));
        assert_eq!(pick_format(&formats, false), Some(TextureFormat::Bgra8Unorm));
        assert_eq!(
            pick_format(&[TextureFormat::Rgba8Unorm], true),
            Some(TextureFormat::Rgba8Unorm)
        );
        assert_eq!(pick_format(&[], true), None);
    }

    #[test]
    fn degenerate_sizes_have_unit_aspect() {
        assert_eq!(aspect(1920, 1080), 1920.0 / 1080.0);
        assert_eq!(aspect(0, 720), 1.0);
        assert_eq!(aspect(800, 0), 1.0);
    }
}
