//! Image views, owned buffers and format-tagged rasters.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. ROI slices are zero-copy
//! views into the same backing slice and retain the original stride.
//!
//! `Raster` is the boundary type: a caller-owned image tagged as grayscale or
//! BGR. Algorithms convert it once into an `OwnedImage` grayscale buffer.

use crate::util::{ObjFindError, ObjFindResult};

pub mod draw;
pub mod grid;
#[cfg(feature = "image-io")]
pub mod io;
pub(crate) mod pyramid;
mod raster;
pub mod resize;

pub use raster::{PixelFormat, Raster};

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> ObjFindResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> ObjFindResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(ObjFindError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Returns a zero-copy ROI view that keeps the parent stride.
    pub fn roi(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> ObjFindResult<ImageView<'a, T>> {
        if width == 0 || height == 0 {
            return Err(ObjFindError::InvalidDimensions { width, height });
        }
        let out_of_bounds = ObjFindError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let fits_x = x.checked_add(width).is_some_and(|end| end <= self.width);
        let fits_y = y.checked_add(height).is_some_and(|end| end <= self.height);
        if !(fits_x && fits_y) {
            return Err(out_of_bounds);
        }

        // In bounds, so the offset cannot overflow and lies inside `data`.
        let start = y * self.stride + x;
        let data = self.data.get(start..).ok_or(out_of_bounds)?;
        ImageView::new(data, width, height, self.stride)
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> ObjFindResult<usize> {
    if width == 0 || height == 0 {
        return Err(ObjFindError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(ObjFindError::InvalidStride { width, stride });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(ObjFindError::InvalidDimensions { width, height })?;
    Ok(needed)
}

/// Owned contiguous grayscale image buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Wraps a contiguous row-major buffer of exactly `width * height` bytes.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> ObjFindResult<Self> {
        if width == 0 || height == 0 {
            return Err(ObjFindError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(ObjFindError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(ObjFindError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(ObjFindError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Copies a possibly strided view into a contiguous buffer.
    pub fn from_view(view: ImageView<'_, u8>) -> ObjFindResult<Self> {
        let width = view.width();
        let height = view.height();
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            let row = view.row(y).ok_or(ObjFindError::BufferTooSmall {
                needed: (y + 1) * view.stride(),
                got: view.as_slice().len(),
            })?;
            data.extend_from_slice(row);
        }
        Self::new(data, width, height)
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major pixel buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the image and returns its pixel buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Converts into an `image::GrayImage` without copying.
    pub fn into_gray_image(self) -> ObjFindResult<image::GrayImage> {
        let (width, height) = (self.width, self.height);
        image::GrayImage::from_raw(width as u32, height as u32, self.data)
            .ok_or(ObjFindError::InvalidDimensions { width, height })
    }

    /// Wraps an `image::GrayImage` buffer.
    pub fn from_gray_image(img: image::GrayImage) -> ObjFindResult<Self> {
        let width = img.width() as usize;
        let height = img.height() as usize;
        Self::new(img.into_raw(), width, height)
    }
}
