//! Convenience helpers for loading and saving rasters via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use std::fs;
use std::path::{Path, PathBuf};

use crate::image::{OwnedImage, PixelFormat, Raster};
use crate::trace::trace_warn;
use crate::util::{ObjFindError, ObjFindResult};

fn io_error(err: impl std::fmt::Display) -> ObjFindError {
    ObjFindError::ImageIo {
        reason: err.to_string(),
    }
}

/// Converts a decoded image into a BGR raster.
pub fn raster_from_dynamic_image(img: &image::DynamicImage) -> ObjFindResult<Raster> {
    let rgb = img.to_rgb8();
    let width = rgb.width() as usize;
    let height = rgb.height() as usize;
    let mut data = rgb.into_raw();
    for px in data.chunks_exact_mut(3) {
        px.swap(0, 2);
    }
    Raster::new(data, width, height, PixelFormat::Bgr)
}

/// Loads an image from disk as a BGR raster.
pub fn load_color<P: AsRef<Path>>(path: P) -> ObjFindResult<Raster> {
    let img = image::open(path).map_err(io_error)?;
    raster_from_dynamic_image(&img)
}

/// Loads an image from disk as a grayscale raster.
pub fn load_gray<P: AsRef<Path>>(path: P) -> ObjFindResult<Raster> {
    let img = image::open(path).map_err(io_error)?;
    Ok(Raster::from_gray(OwnedImage::from_gray_image(img.to_luma8())?))
}

/// Loads every file in a directory as a BGR raster.
///
/// Entries are ordered by file name. A file that cannot be decoded yields
/// `None` at its position, so the result lines up with [`list_dir`].
pub fn load_dir<P: AsRef<Path>>(dir: P) -> ObjFindResult<Vec<Option<Raster>>> {
    let paths = list_dir(dir)?;
    Ok(paths
        .iter()
        .map(|path| match load_color(path) {
            Ok(raster) => Some(raster),
            Err(_) => {
                trace_warn!("unreadable image file", path = path.display().to_string().as_str());
                None
            }
        })
        .collect())
}

/// Lists regular files in a directory, sorted by file name.
pub fn list_dir<P: AsRef<Path>>(dir: P) -> ObjFindResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Saves a raster; the encoder is chosen from the file extension.
pub fn save<P: AsRef<Path>>(path: P, raster: &Raster) -> ObjFindResult<()> {
    let width = raster.width() as u32;
    let height = raster.height() as u32;
    match raster.format() {
        PixelFormat::Gray => {
            let img = image::GrayImage::from_raw(width, height, raster.data().to_vec())
                .ok_or_else(|| io_error("gray buffer does not match dimensions"))?;
            img.save(path).map_err(io_error)
        }
        PixelFormat::Bgr => {
            let mut data = raster.data().to_vec();
            for px in data.chunks_exact_mut(3) {
                px.swap(0, 2);
            }
            let img = image::RgbImage::from_raw(width, height, data)
                .ok_or_else(|| io_error("color buffer does not match dimensions"))?;
            img.save(path).map_err(io_error)
        }
    }
}
