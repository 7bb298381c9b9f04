//! Uploads sixteen bytes, copies them GPU-side into a mappable buffer and
//! reads them back. No window.

use anyhow::Result;

use prism_engine::device::{copy_roundtrip, HeadlessGpu};
use prism_engine::logging::{init_logging, LoggingConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let gpu = HeadlessGpu::new_blocking("buffer playground device")?;

    let input: Vec<u8> = (0..16).collect();
    log::info!("uploading {input:?}");

    let output = copy_roundtrip(&gpu.device, &gpu.queue, &input)?;
    log::info!("bufferData = {output:?}");

    anyhow::ensure!(output == input, "readback mismatch: {output:?}");
    Ok(())
}
