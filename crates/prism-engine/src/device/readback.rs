use std::ops::Range;
use std::sync::mpsc;

use anyhow::{Context, Result};

/// Maps `range` of a `MAP_READ` buffer, copies the bytes out and unmaps.
///
/// Blocks the calling thread until the GPU has finished all submitted work.
pub fn read_buffer_blocking(
    device: &wgpu::Device,
    buffer: &wgpu::Buffer,
    range: Range<u64>,
) -> Result<Vec<u8>> {
    let slice = buffer.slice(range);
    let (sender, receiver) = mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });

    device
        .poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: None,
        })
        .context("device poll failed while waiting for buffer map")?;

    let status = receiver
        .recv()
        .context("buffer map callback was dropped without running")?;
    log::debug!("buffer mapped with status {status:?}");
    status.context("buffer map request failed")?;

    let bytes = slice.get_mapped_range().to_vec();
    buffer.unmap();
    Ok(bytes)
}

/// Uploads `bytes`, copies them GPU-side into a mappable buffer and reads
/// them back.
///
/// `bytes.len()` must be a non-zero multiple of `wgpu::COPY_BUFFER_ALIGNMENT`.
pub fn copy_roundtrip(device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8]) -> Result<Vec<u8>> {
    let size = checked_copy_size(bytes.len())?;

    let source = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("some GPU-side data buffer"),
        size,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::COPY_SRC,
        mapped_at_creation: false,
    });
    let output = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("output buffer"),
        size,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    queue.write_buffer(&source, 0, bytes);

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("buffer copy encoder"),
    });
    encoder.copy_buffer_to_buffer(&source, 0, &output, 0, size);
    queue.submit(std::iter::once(encoder.finish()));

    read_buffer_blocking(device, &output, 0..size)
}

fn checked_copy_size(len: usize) -> Result<u64> {
    let size = len as u64;
    anyhow::ensure!(size > 0, "cannot copy an empty buffer");
    anyhow::ensure!(
        size % wgpu::COPY_BUFFER_ALIGNMENT == 0,
        "copy size {size} is not a multiple of {}",
        wgpu::COPY_BUFFER_ALIGNMENT
    );
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_size_must_be_aligned() {
        assert_eq!(checked_copy_size(16).unwrap(), 16);
        assert!(checked_copy_size(0).is_err());
        assert!(checked_copy_size(6).is_err());
    }
}
