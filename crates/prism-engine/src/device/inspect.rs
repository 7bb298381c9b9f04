/// Human-readable description of an adapter: identity, a handful of limits
/// and the supported feature set.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterReport {
    pub name: String,
    pub vendor_id: u32,
    pub device_id: u32,
    pub device_type: String,
    pub backend: String,
    pub driver: String,
    pub driver_info: String,
    pub limits: Vec<(&'static str, u64)>,
    pub features: String,
}

impl AdapterReport {
    pub fn from_adapter(adapter: &wgpu::Adapter) -> Self {
        let info = adapter.get_info();
        Self {
            name: info.name,
            vendor_id: info.vendor,
            device_id: info.device,
            device_type: format!("{:?}", info.device_type),
            backend: format!("{:?}", info.backend),
            driver: info.driver,
            driver_info: info.driver_info,
            limits: selected_limits(&adapter.limits()),
            features: format!("{:?}", adapter.features()),
        }
    }

    /// One-line identification, e.g. `"GeForce RTX 3060 (Vulkan, DiscreteGpu)"`.
    pub fn summary(&self) -> String {
        format!("{} ({}, {})", self.name, self.backend, self.device_type)
    }

    /// Multi-line report in the order it is logged.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.limits.len() + 8);

        out.push("adapter limits:".to_string());
        for (name, value) in &self.limits {
            out.push(format!(" - {name}: {value}"));
        }

        out.push("adapter features:".to_string());
        out.push(format!(" - {}", self.features));

        out.push("adapter properties:".to_string());
        out.push(format!(" - vendorID: {:#06x}", self.vendor_id));
        out.push(format!(" - deviceID: {:#06x}", self.device_id));
        if !self.name.is_empty() {
            out.push(format!(" - name: {}", self.name));
        }
        if !self.driver.is_empty() {
            out.push(format!(" - driver: {}", self.driver));
        }
        if !self.driver_info.is_empty() {
            out.push(format!(" - driverDescription: {}", self.driver_info));
        }
        out.push(format!(" - adapterType: {}", self.device_type));
        out.push(format!(" - backendType: {}", self.backend));
        out
    }

    /// Emits the report at info level.
    pub fn log(&self) {
        for line in self.lines() {
            log::info!("{line}");
        }
    }
}

fn selected_limits(limits: &wgpu::Limits) -> Vec<(&'static str, u64)> {
    vec![
        ("maxTextureDimension1D", limits.max_texture_dimension_1d as u64),
        ("maxTextureDimension2D", limits.max_texture_dimension_2d as u64),
        ("maxTextureDimension3D", limits.max_texture_dimension_3d as u64),
        ("maxTextureArrayLayers", limits.max_texture_array_layers as u64),
        ("maxBindGroups", limits.max_bind_groups as u64),
        ("maxVertexAttributes", limits.max_vertex_attributes as u64),
        ("maxUniformBufferBindingSize", limits.max_uniform_buffer_binding_size as u64),
        ("minUniformBufferOffsetAlignment", limits.min_uniform_buffer_offset_alignment as u64),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> AdapterReport {
        AdapterReport {
            name: "Test GPU".into(),
            vendor_id: 0x10de,
            device_id: 0x2504,
            device_type: "DiscreteGpu".into(),
            backend: "Vulkan".into(),
            driver: String::new(),
            driver_info: "535.1".into(),
            limits: selected_limits(&wgpu::Limits::default()),
            features: "Features(empty)".into(),
        }
    }

    struct Recorder(std::sync::Mutex<Vec<(log::Level, String)>>);

    impl log::Log for Recorder {
        fn enabled(&self, _: &log::Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &log::Record<'_>) {
            if let Ok(mut records) = self.0.lock() {
                records.push((record.level(), record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static RECORDER: Recorder = Recorder(std::sync::Mutex::new(Vec::new()));

    #[test]
    fn report_is_visible_at_default_filter() {
        if log::set_logger(&RECORDER).is_err() {
            return;
        }
        log::set_max_level(log::LevelFilter::Trace);

        report().log();

        let records = RECORDER.0.lock().unwrap();
        let ours: Vec<_> = records
            .iter()
            .filter(|(_, msg)| msg == " - driverDescription: 535.1" || msg == "adapter limits:")
            .collect();
        assert!(ours.len() >= 2);
        assert!(ours.iter().all(|(level, _)| *level == log::Level::Info));
    }

    #[test]
    fn summary_names_backend_and_type() {
        assert_eq!(report().summary(), "Test GPU (Vulkan, DiscreteGpu)");
    }

    #[test]
    fn lines_include_default_texture_limit() {
        let lines = report().lines();
        let expected = format!(
            " - maxTextureDimension2D: {}",
            wgpu::Limits::default().max_texture_dimension_2d
        );
        assert!(lines.contains(&expected));
    }

    #[test]
    fn empty_strings_are_omitted() {
        let lines = report().lines();
        assert!(!lines.iter().any(|l| l.starts_with(" - driver:")));
        assert!(lines.contains(&" - driverDescription: 535.1".to_string()));
        assert!(lines.contains(&" - vendorID: 0x10de".to_string()));
    }
}
