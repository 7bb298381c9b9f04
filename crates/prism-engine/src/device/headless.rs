use anyhow::{Context, Result};

use super::gpu::install_error_callbacks;
use super::AdapterReport;

/// Device and queue without a presentation surface.
///
/// Used for work that never reaches the screen (buffer copies, readback).
pub struct HeadlessGpu {
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub report: AdapterReport,
}

impl HeadlessGpu {
    pub async fn new(device_label: &str) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        log::info!("requesting adapter...");
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await
            .context("failed to find a GPU adapter")?;

        let report = AdapterReport::from_adapter(&adapter);
        log::info!("got adapter: {}", report.summary());
        report.log();

        log::info!("requesting device...");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some(device_label),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;
        log::info!("got device: {device_label}");

        install_error_callbacks(&device);

        Ok(Self {
            adapter,
            device,
            queue,
            report,
        })
    }

    /// Blocking variant of [`HeadlessGpu::new`].
    pub fn new_blocking(device_label: &str) -> Result<Self> {
        pollster::block_on(Self::new(device_label))
    }
}
