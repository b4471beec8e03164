//! Format-tagged raster buffers.

use crate::image::OwnedImage;
use crate::util::{ObjFindError, ObjFindResult};

/// Pixel layout of a [`Raster`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// One 8-bit intensity channel.
    Gray,
    /// Three interleaved 8-bit channels in blue, green, red order.
    Bgr,
}

impl PixelFormat {
    /// Returns the number of interleaved channels.
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Gray => 1,
            PixelFormat::Bgr => 3,
        }
    }
}

/// Owned image whose pixel format is resolved once, at construction.
///
/// Rows are contiguous (`stride == width * channels`). Every raster has
/// non-zero width and height.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    data: Vec<u8>,
    width: usize,
    height: usize,
    format: PixelFormat,
}

impl Raster {
    /// Builds a raster from a buffer and an array-style shape.
    ///
    /// `[h, w]` is grayscale and `[h, w, 3]` is BGR. Any other rank or channel
    /// count is rejected with [`ObjFindError::InvalidShape`].
    pub fn from_shape(data: Vec<u8>, shape: &[usize]) -> ObjFindResult<Self> {
        match *shape {
            [height, width] => Self::new(data, width, height, PixelFormat::Gray),
            [height, width, 3] => Self::new(data, width, height, PixelFormat::Bgr),
            _ => Err(ObjFindError::InvalidShape {
                shape: shape.to_vec(),
            }),
        }
    }

    /// Builds a raster from a contiguous buffer with an explicit format.
    pub fn new(
        data: Vec<u8>,
        width: usize,
        height: usize,
        format: PixelFormat,
    ) -> ObjFindResult<Self> {
        if width == 0 || height == 0 {
            return Err(ObjFindError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(format.channels()))
            .ok_or(ObjFindError::InvalidDimensions { width, height })?;
        if data.len() != needed {
            return Err(ObjFindError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            format,
        })
    }

    /// Builds a raster where every pixel has the same value.
    ///
    /// For grayscale rasters only the first element of `value` is used.
    pub fn filled(
        width: usize,
        height: usize,
        format: PixelFormat,
        value: [u8; 3],
    ) -> ObjFindResult<Self> {
        let count = width
            .checked_mul(height)
            .ok_or(ObjFindError::InvalidDimensions { width, height })?;
        let data = match format {
            PixelFormat::Gray => vec![value[0]; count],
            PixelFormat::Bgr => value.repeat(count),
        };
        Self::new(data, width, height, format)
    }

    /// Wraps a grayscale buffer.
    pub fn from_gray(img: OwnedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            data: img.data,
            format: PixelFormat::Gray,
        }
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the pixel format tag.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Returns the array-style shape (`[h, w]` or `[h, w, 3]`).
    pub fn shape(&self) -> Vec<usize> {
        match self.format {
            PixelFormat::Gray => vec![self.height, self.width],
            PixelFormat::Bgr => vec![self.height, self.width, 3],
        }
    }

    /// Returns the interleaved pixel buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the raster and returns its pixel buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Returns the channel values of pixel `(x, y)` if it is within bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let channels = self.format.channels();
        let start = (y * self.width + x) * channels;
        self.data.get(start..start + channels)
    }

    /// Converts to a grayscale buffer.
    ///
    /// BGR pixels use the ITU-R BT.601 luma weights in 14-bit fixed point,
    /// rounded to nearest. Grayscale rasters are copied unchanged.
    pub fn to_gray(&self) -> OwnedImage {
        let data = match self.format {
            PixelFormat::Gray => self.data.clone(),
            PixelFormat::Bgr => self
                .data
                .chunks_exact(3)
                .map(|px| bgr_to_luma(px[0], px[1], px[2]))
                .collect(),
        };
        OwnedImage {
            data,
            width: self.width,
            height: self.height,
        }
    }

    /// Converts to a BGR raster, replicating grayscale intensities.
    pub fn to_bgr(&self) -> Raster {
        match self.format {
            PixelFormat::Bgr => self.clone(),
            PixelFormat::Gray => Raster {
                data: self.data.iter().flat_map(|&v| [v, v, v]).collect(),
                width: self.width,
                height: self.height,
                format: PixelFormat::Bgr,
            },
        }
    }
}

const LUMA_B: u32 = 1868;
const LUMA_G: u32 = 9617;
const LUMA_R: u32 = 4899;
const LUMA_SHIFT: u32 = 14;

pub(crate) fn bgr_to_luma(b: u8, g: u8, r: u8) -> u8 {
    let acc = LUMA_B * b as u32 + LUMA_G * g as u32 + LUMA_R * r as u32;
    ((acc + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
}
