use std::path::Path;

use anyhow::{Context, Result};

use crate::device::validated;

/// A sampled 2D texture with a full mip chain.
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub size: (u32, u32),
}

/// Number of bits needed to represent `x` (0 for 0).
#[inline]
pub const fn bit_width(x: u32) -> u32 {
    u32::BITS - x.leading_zeros()
}

/// Mip levels for a full chain down to 1x1.
#[inline]
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    bit_width(width.max(height)).max(1)
}

/// Halves an RGBA8 image with a 2x2 box filter.
///
/// Odd or unit dimensions clamp to the last row/column, so the result is
/// `max(w / 2, 1)` by `max(h / 2, 1)`. An empty image stays empty.
pub(crate) fn downsample_box(src: &[u8], width: u32, height: u32) -> (Vec<u8>, u32, u32) {
    if width == 0 || height == 0 {
        return (Vec::new(), 0, 0);
    }
    let (w, h) = (width as usize, height as usize);
    let (nw, nh) = ((w / 2).max(1), (h / 2).max(1));
    let mut out = vec![0u8; nw * nh * 4];

    let texel = |x: usize, y: usize, c: usize| src[4 * (y.min(h - 1) * w + x.min(w - 1)) + c] as u32;

    for y in 0..nh {
        for x in 0..nw {
            for c in 0..4 {
                let sum = texel(2 * x, 2 * y, c)
                    + texel(2 * x + 1, 2 * y, c)
                    + texel(2 * x, 2 * y + 1, c)
                    + texel(2 * x + 1, 2 * y + 1, c);
                out[4 * (y * nw + x) + c] = ((sum + 2) / 4) as u8;
            }
        }
    }
    (out, nw as u32, nh as u32)
}

/// `size`x`size` RGBA8 checkerboard with `cells` squares per side.
pub fn checkerboard_rgba8(size: u32, cells: u32, a: [u8; 4], b: [u8; 4]) -> Vec<u8> {
    let cell = (size / cells.max(1)).max(1);
    let mut out = Vec::with_capacity(size as usize * size as usize * 4);
    for y in 0..size {
        for x in 0..size {
            let even = ((x / cell) + (y / cell)) % 2 == 0;
            out.extend_from_slice(if even { &a } else { &b });
        }
    }
    out
}

/// Normal map whose every texel encodes the unperturbed +Z normal.
pub fn flat_normal_rgba8(size: u32) -> Vec<u8> {
    [128u8, 128, 255, 255].repeat(size as usize * size as usize)
}

/// Checks an RGBA8 upload against the device limits and the pixel count.
fn check_rgba8_upload(limits: &wgpu::Limits, label: &str, (width, height): (u32, u32), len: usize) -> Result<()> {
    anyhow::ensure!(width > 0 && height > 0, "{label}: empty image");

    let max = limits.max_texture_dimension_2d;
    anyhow::ensure!(
        width <= max && height <= max,
        "{label}: {width}x{height} exceeds the device texture limit of {max}"
    );

    let expected = u64::from(width) * u64::from(height) * 4;
    anyhow::ensure!(
        len as u64 == expected,
        "{label}: expected {expected} bytes of RGBA8, got {len}"
    );
    Ok(())
}

impl Texture {
    /// Creates a texture from tightly packed RGBA8 pixels and uploads every
    /// mip level, computed on the CPU.
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        (width, height): (u32, u32),
        pixels: &[u8],
        format: wgpu::TextureFormat,
    ) -> Result<Self> {
        check_rgba8_upload(&device.limits(), label, (width, height), pixels.len())?;

        let mip_levels = mip_level_count(width, height);
        let texture = validated(device, &format!("texture {label}"), || {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: mip_levels,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            })
        })?;

        let mut level = pixels.to_vec();
        let (mut w, mut h) = (width, height);
        for mip in 0..mip_levels {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: mip,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &level,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * w),
                    rows_per_image: Some(h),
                },
                wgpu::Extent3d {
                    width: w,
                    height: h,
                    depth_or_array_layers: 1,
                },
            );

            if mip + 1 < mip_levels {
                (level, w, h) = downsample_box(&level, w, h);
            }
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(label),
            ..Default::default()
        });

        Ok(Self {
            texture,
            view,
            size: (width, height),
        })
    }

    pub fn checkerboard(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Result<Self> {
        let size = 256;
        let pixels = checkerboard_rgba8(size, 8, [230, 230, 230, 255], [60, 60, 60, 255]);
        Self::from_rgba8(device, queue, "checkerboard", (size, size), &pixels, format)
    }

    pub fn flat_normal_map(device: &wgpu::Device, queue: &wgpu::Queue) -> Result<Self> {
        let size = 4;
        Self::from_rgba8(
            device,
            queue,
            "flat normal map",
            (size, size),
            &flat_normal_rgba8(size),
            wgpu::TextureFormat::Rgba8Unorm,
        )
    }
}

/// Decodes an image file and uploads it with a full mip chain.
pub fn load_texture(
    path: &Path,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    format: wgpu::TextureFormat,
) -> Result<Texture> {
    let image = image::open(path)
        .with_context(|| format!("failed to decode image {}", path.display()))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    log::debug!("loaded {} ({width}x{height})", path.display());

    let label = path.display().to_string();
    Texture::from_rgba8(device, queue, &label, (width, height), image.as_raw(), format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_width_matches_definition() {
        assert_eq!(bit_width(0), 0);
        assert_eq!(bit_width(1), 1);
        assert_eq!(bit_width(255), 8);
        assert_eq!(bit_width(256), 9);
    }

    #[test]
    fn mip_chain_reaches_one_pixel() {
        assert_eq!(mip_level_count(256, 256), 9);
        assert_eq!(mip_level_count(300, 20), 9);
        assert_eq!(mip_level_count(1, 1), 1);
    }

    #[test]
    fn box_filter_averages_quads() {
        #[rustfmt::skip]
        let src = [
            0, 0, 0, 255,     100, 0, 0, 255,
            0, 200, 0, 255,   100, 200, 40, 255,
        ];
        let (out, w, h) = downsample_box(&src, 2, 2);
        assert_eq!((w, h), (1, 1));
        assert_eq!(out, vec![50, 100, 10, 255]);
    }

    #[test]
    fn box_filter_handles_single_row() {
        let src = checkerboard_rgba8(4, 4, [255; 4], [0, 0, 0, 255]);
        let (_, w, h) = downsample_box(&src[..16], 4, 1);
        assert_eq!((w, h), (2, 1));
    }

    #[test]
    fn full_chain_size_sequence() {
        let (mut w, mut h) = (5u32, 3u32);
        let mut level = vec![7u8; (w * h * 4) as usize];
        let mut sizes = vec![(w, h)];
        for _ in 1..mip_level_count(w, h) {
            (level, w, h) = downsample_box(&level, w, h);
            sizes.push((w, h));
        }
        assert_eq!(sizes, vec![(5, 3), (2, 1), (1, 1)]);
        assert_eq!(level, vec![7, 7, 7, 7]);
    }

    #[test]
    fn box_filter_keeps_empty_image_empty() {
        assert_eq!(downsample_box(&[], 0, 4), (Vec::new(), 0, 0));
    }

    #[test]
    fn upload_rejects_size_beyond_limit() {
        let limits = wgpu::Limits { max_texture_dimension_2d: 2048, ..wgpu::Limits::downlevel_defaults() };

        let err = check_rgba8_upload(&limits, "wide", (2049, 1), 2049 * 4).unwrap_err();
        assert!(err.to_string().contains("exceeds the device texture limit of 2048"), "{err}");
        assert!(check_rgba8_upload(&limits, "ok", (2048, 1), 2048 * 4).is_ok());
    }

    #[test]
    fn upload_length_is_checked_without_overflow() {
        let limits = wgpu::Limits { max_texture_dimension_2d: u32::MAX, ..wgpu::Limits::downlevel_defaults() };

        // 65536 * 65536 * 4 wraps to 0 in u32.
        let err = check_rgba8_upload(&limits, "huge", (65536, 65536), 0).unwrap_err();
        assert!(err.to_string().contains("expected 17179869184 bytes"), "{err}");
        assert!(check_rgba8_upload(&limits, "empty", (0, 4), 0).is_err());
    }

    #[test]
    fn from_rgba8_rejects_oversized_image_on_device() {
        let Ok(gpu) = crate::device::HeadlessGpu::new_blocking("texture test") else {
            return;
        };

        let width = gpu.device.limits().max_texture_dimension_2d + 1;
        let pixels = vec![0u8; width as usize * 4];
        let result = Texture::from_rgba8(
            &gpu.device,
            &gpu.queue,
            "too wide",
            (width, 1),
            &pixels,
            wgpu::TextureFormat::Rgba8Unorm,
        );
        assert!(result.is_err());
    }

    #[test]
    fn checkerboard_alternates() {
        let px = checkerboard_rgba8(4, 2, [1; 4], [2; 4]);
        assert_eq!(&px[0..4], &[1; 4]);
        assert_eq!(&px[8..12], &[2; 4]);
    }

    #[test]
    fn flat_normal_encodes_plus_z() {
        let px = flat_normal_rgba8(2);
        assert_eq!(px.len(), 16);
        assert!(px.chunks(4).all(|t| t == [128, 128, 255, 255]));
    }
}
