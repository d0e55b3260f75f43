use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use exif::{In, Reader, Tag, Value};
use log::{debug, info, warn};
use raylib::prelude::*;

use crate::error::SliderError;

/// Quarter turns needed to display an image upright.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Rotation {
    None,
    Half,
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    // 1 = top-left (normal), 3 = bottom-right, 6 = top-right, 8 = bottom-left.
    // Mirrored orientations are shown unrotated.
    pub fn from_orientation(orientation: u16) -> Rotation {
        match orientation {
            3 => Rotation::Half,
            6 => Rotation::Clockwise,
            8 => Rotation::CounterClockwise,
            _ => Rotation::None,
        }
    }
}

/// Orientation tag of a JPEG container, 1 when missing or unreadable.
pub fn exif_orientation(image_path: &Path, bytes: &[u8]) -> u16 {
    match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => match exif.get_field(Tag::Orientation, In::PRIMARY) {
            Some(field) => match &field.value {
                Value::Short(values) if !values.is_empty() => values[0],
                _ => 1,
            },
            None => 1,
        },
        Err(e) => {
            warn!("Could not read EXIF data for {:?}: {}", image_path, e);
            1
        }
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Decodes an image, applies its EXIF rotation and uploads it with linear filtering.
pub fn load_texture_with_exif_rotation(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    image_path: &Path,
) -> Result<Texture2D, SliderError> {
    let file_bytes = fs::read(image_path).map_err(|e| SliderError::asset(image_path, e))?;

    let extension = extension_of(image_path);
    let orientation = if extension == "jpg" || extension == "jpeg" {
        exif_orientation(image_path, &file_bytes)
    } else {
        1
    };

    let mut image = Image::load_image_from_mem(&format!(".{}", extension), &file_bytes)
        .map_err(|e| SliderError::asset(image_path, e))?;

    let rotation = Rotation::from_orientation(orientation);
    match rotation {
        Rotation::Half => {
            image.rotate_cw();
            image.rotate_cw();
        }
        Rotation::Clockwise => image.rotate_cw(),
        Rotation::CounterClockwise => image.rotate_ccw(),
        Rotation::None => {}
    }
    if rotation != Rotation::None {
        debug!("Applied {:?} rotation to {:?}", rotation, image_path);
    }

    let mut texture = rl
        .load_texture_from_image(thread, &image)
        .map_err(|e| SliderError::asset(image_path, e))?;
    texture.set_texture_filter(thread, TextureFilter::TEXTURE_FILTER_BILINEAR);

    // CPU copy is no longer needed once uploaded
    drop(image);

    Ok(texture)
}

/// Loads every slide texture in order. Any failure aborts the whole set.
pub fn load_textures(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    paths: &[PathBuf],
) -> Result<Vec<Texture2D>, SliderError> {
    let mut textures = Vec::with_capacity(paths.len());
    for path in paths {
        let texture = load_texture_with_exif_rotation(rl, thread, path)?;
        info!("Loaded {:?} ({}x{})", path, texture.width(), texture.height());
        textures.push(texture);
    }
    if textures.is_empty() {
        return Err(SliderError::Empty);
    }
    Ok(textures)
}

/// Source rectangle that covers a `dst_width` x `dst_height` area with a
/// texture without distortion, cropping the excess equally on both sides.
pub fn cover_source_rect(tex_width: f32, tex_height: f32, dst_width: f32, dst_height: f32) -> Rectangle {
    let scale = (dst_width / tex_width).max(dst_height / tex_height);
    let width = dst_width / scale;
    let height = dst_height / scale;
    Rectangle::new(
        (tex_width - width) * 0.5,
        (tex_height - height) * 0.5,
        width,
        height,
    )
}
