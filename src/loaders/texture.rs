use std::path::Path;

use crate::error::AssetError;
use crate::scene_graph::Texture;

/// Decodes an image file into an RGBA8 texture
pub fn load_texture(path: impl AsRef<Path>) -> Result<Texture, AssetError> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|e| AssetError::Texture {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::debug!("Loaded texture {:?} ({}x{})", path, width, height);
    Ok(Texture::new(width, height, rgba.into_raw()))
}

/// Colour and roughness maps of one surface
#[derive(Debug)]
pub struct TextureSet {
    pub color: Texture,
    pub roughness: Texture,
}

/// Loads both maps; the set fails as a whole if either map fails
pub fn load_texture_set(
    color: impl AsRef<Path>,
    roughness: impl AsRef<Path>,
) -> Result<TextureSet, AssetError> {
    Ok(TextureSet {
        color: load_texture(color)?,
        roughness: load_texture(roughness)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("museum-walk-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_png(path: &Path, pixel: [u8; 4]) {
        image::RgbaImage::from_pixel(2, 3, image::Rgba(pixel))
            .save(path)
            .unwrap();
    }

    #[test]
    fn decodes_png_to_rgba() {
        let dir = scratch_dir("texture");
        let path = dir.join("color.png");
        write_png(&path, [10, 20, 30, 255]);

        let texture = load_texture(&path).unwrap();
        assert_eq!((texture.width, texture.height), (2, 3));
        assert_eq!(texture.data.len(), 2 * 3 * 4);
        assert_eq!(&texture.data[..4], &[10, 20, 30, 255]);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn set_fails_when_one_map_is_missing() {
        let dir = scratch_dir("texture-set");
        let color = dir.join("color.png");
        write_png(&color, [255; 4]);

        let result = load_texture_set(&color, dir.join("missing.png"));
        assert!(matches!(result, Err(AssetError::Texture { .. })));

        fs::remove_dir_all(&dir).ok();
    }
}
