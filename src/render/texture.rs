use std::{num::NonZeroU32, path::Path};

use anyhow::{anyhow, Context, Result};
use image::{imageops::FilterType, RgbaImage};

// Textures are always sampled with repeat wrapping and trilinear filtering,
// and carry a full mip chain built on the CPU with the image crate, since
// wgpu has no equivalent of glGenerateMipmap.

pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

impl Texture {
    pub fn from_path<P: AsRef<Path>>(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        group_layout: &wgpu::BindGroupLayout,
        path: P,
    ) -> Result<Self> {
        let path = path.as_ref();
        let rgba = decode_image(path)?;
        Self::load_image(
            device,
            queue,
            &rgba,
            group_layout,
            path.to_str(),
        )
    }

    /// Uploads raw RGBA8 pixels; `bytes` must hold exactly `width * height * 4` bytes.
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        group_layout: &wgpu::BindGroupLayout,
        bytes: &[u8],
        width: u32,
        height: u32,
        label: Option<&str>,
    ) -> Result<Self> {
        let rgba = rgba_image(bytes, width, height)?;
        Self::load_image(device, queue, &rgba, group_layout, label)
    }

    pub fn load_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &RgbaImage,
        group_layout: &wgpu::BindGroupLayout,
        label: Option<&str>,
    ) -> Result<Self> {
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(anyhow!("texture has zero extent: {}x{}", width, height));
        }

        let mips = mip_chain(rgba);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: mips.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsage::SAMPLED | wgpu::TextureUsage::COPY_DST,
        });

        for (level, mip) in mips.iter().enumerate() {
            let (mip_width, mip_height) = mip.dimensions();
            queue.write_texture(
                wgpu::ImageCopyTexture {
                    texture: &texture,
                    mip_level: level as u32,
                    origin: wgpu::Origin3d::ZERO,
                },
                mip,
                wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: NonZeroU32::new(4 * mip_width),
                    rows_per_image: NonZeroU32::new(mip_height),
                },
                wgpu::Extent3d {
                    width: mip_width,
                    height: mip_height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("texture_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
            label: Some("texture_bind_group"),
        });

        Ok(Self {
            texture,
            view,
            sampler,
            bind_group,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> cgmath::Vector2<f32> {
        cgmath::Vector2::new(self.width as f32, self.height as f32)
    }
}

pub fn texture_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStage::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStage::FRAGMENT,
                ty: wgpu::BindingType::Sampler {
                    comparison: false,
                    filtering: true,
                },
                count: None,
            },
        ],
        label: Some("texture_bind_group_layout"),
    })
}

/// Decodes an image file, flipping it vertically so that texture
/// coordinate (0, 0) addresses the bottom-left pixel.
pub fn decode_image(path: &Path) -> Result<RgbaImage> {
    let rgba = image::open(path)
        .with_context(|| format!("error loading texture {}", path.display()))?
        .flipv()
        .into_rgba8();
    debug!(
        "decoded {} ({}x{})",
        path.display(),
        rgba.width(),
        rgba.height()
    );
    Ok(rgba)
}

pub fn rgba_image(bytes: &[u8], width: u32, height: u32) -> Result<RgbaImage> {
    let expected = width as usize * height as usize * 4;
    if bytes.len() != expected {
        return Err(anyhow!(
            "rgba buffer holds {} bytes, expected {} for {}x{}",
            bytes.len(),
            expected,
            width,
            height
        ));
    }
    RgbaImage::from_raw(width, height, bytes.to_vec())
        .ok_or_else(|| anyhow!("failed to build {}x{} rgba image", width, height))
}

pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Level 0 followed by every successive half-size level down to 1x1.
pub fn mip_chain(base: &RgbaImage) -> Vec<RgbaImage> {
    let (width, height) = base.dimensions();
    let levels = mip_level_count(width, height);
    let mut chain = Vec::with_capacity(levels as usize);
    chain.push(base.clone());
    for level in 1..levels {
        let previous = &chain[level as usize - 1];
        let next_width = (previous.width() / 2).max(1);
        let next_height = (previous.height() / 2).max(1);
        let next = image::imageops::resize(previous, next_width, next_height, FilterType::Triangle);
        chain.push(next);
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_mip_level_count() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 2), 2);
        assert_eq!(mip_level_count(1248, 390), 11);
        assert_eq!(mip_level_count(1024, 1), 11);
        assert_eq!(mip_level_count(3, 5), 3);
    }

    #[test]
    fn test_mip_chain_halves_down_to_one() {
        let base = RgbaImage::from_pixel(8, 2, image::Rgba([255, 0, 0, 255]));
        let chain = mip_chain(&base);
        let dims: Vec<(u32, u32)> = chain.iter().map(|m| m.dimensions()).collect();
        assert_eq!(dims, vec![(8, 2), (4, 1), (2, 1), (1, 1)]);
        assert_eq!(chain[3].get_pixel(0, 0), &image::Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_rgba_image_rejects_wrong_length() {
        assert!(rgba_image(&[0; 15], 2, 2).is_err());
        let image = rgba_image(&[7; 16], 2, 2).unwrap();
        assert_eq!(image.dimensions(), (2, 2));
    }

    // A missing or undecodable sheet is reported instead of being uploaded
    // as an empty texture.
    #[test]
    fn test_decode_missing_file_names_path() {
        let dir = tempdir().expect("failed to create temp directory");
        let path = dir.path().join("missing.png");
        let err = decode_image(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.png"), "{:#}", err);
    }

    #[test]
    fn test_decode_corrupt_file_fails() {
        let dir = tempdir().expect("failed to create temp directory");
        let path = dir.path().join("corrupt.png");
        std::fs::write(&path, b"definitely not a png").expect("failed to write file");
        assert!(decode_image(&path).is_err());
    }

    #[test]
    fn test_decode_flips_rows() {
        let dir = tempdir().expect("failed to create temp directory");
        let path = dir.path().join("column.png");
        let top = image::Rgba([255, 0, 0, 255]);
        let bottom = image::Rgba([0, 0, 255, 255]);
        let mut column = RgbaImage::new(1, 2);
        column.put_pixel(0, 0, top);
        column.put_pixel(0, 1, bottom);
        column.save(&path).expect("failed to save png");

        let decoded = decode_image(&path).expect("failed to decode png");
        assert_eq!(decoded.dimensions(), (1, 2));
        assert_eq!(decoded.get_pixel(0, 0), &bottom);
        assert_eq!(decoded.get_pixel(0, 1), &top);
    }
}
