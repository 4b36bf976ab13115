//! Texture import. Format detection and decoding are delegated to the [image] crate; this module
//! only decides where a texture comes from, how it is named and whether its pixel layout is usable.

use std::{
    fmt::Display,
    fs, io,
    path::{Path, PathBuf},
};

use image::{ColorType, ImageFormat};
use log::debug;

#[derive(Debug, thiserror::Error)]
/// Possible errors while importing a [Texture].
pub enum Error {
    #[error("Could not read `{}`: {source}", .path.display())]
    /// Source file is missing or unreadable.
    Io {
        #[allow(missing_docs)]
        path: PathBuf,
        #[allow(missing_docs)]
        source: io::Error,
    },

    #[error("Unrecognized image format for `{}`", .0.display())]
    /// The file's content does not match any known image format.
    UnknownFormat(PathBuf),

    #[error("Could not decode `{}`: {source}", .path.display())]
    /// Recognized but corrupted or unsupported image.
    Decode {
        #[allow(missing_docs)]
        path: PathBuf,
        #[allow(missing_docs)]
        source: image::ImageError,
    },

    #[error("Unsupported {0}-bit channels in `{}`, expected 8 or 16", .1.display())]
    /// Only 8 and 16 bits per channel images can be imported.
    BitDepth(u16, PathBuf),

    #[error("Texture path `{0}` does not name a file")]
    /// Empty path or path ending with a separator.
    InvalidPath(String),
}

#[derive(Clone, Debug, PartialEq)]
/// Imported texture asset.
pub struct Texture {
    /// Asset name, i.e. the source file name without its extension.
    pub name: String,
    /// Package the asset is created in.
    pub package: String,
    /// File the texture was imported from.
    pub source: PathBuf,
    #[allow(missing_docs)]
    pub width: u32,
    #[allow(missing_docs)]
    pub height: u32,
    /// Bits per channel of the source image.
    pub bit_depth: u16,
    /// Detected source format.
    pub format: ImageFormat,
    /// Pixels as 8-bit RGBA, row-major.
    pub rgba: Vec<u8>,
}

impl Display for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}x{}, {:?}, {}-bit)",
            self.package, self.width, self.height, self.format, self.bit_depth
        )
    }
}

/// Resolves a texture path found in a description into a [Texture].
pub trait TextureLoader {
    /// Import the texture at `path` next to the material living in `package`.
    fn load(&self, path: &str, package: &str) -> Result<Texture, Error>;
}

/// Asset name for a texture path: the last path component stripped of its extension.
/// Both `/` and `\` are accepted as separators so descriptions written on Windows import the same.
pub fn asset_name(path: &str) -> Result<&str, Error> {
    let file = path
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();
    let name = file.rsplit_once('.').map_or(file, |(stem, _ext)| stem);

    if name.is_empty() {
        return Err(Error::InvalidPath(path.to_owned()));
    }

    Ok(name)
}

/// Package of a texture imported alongside the material living in `material_package`: the
/// material's own asset name is swapped for the texture's.
pub fn package_for(material_package: &str, name: &str) -> String {
    let mut components: Vec<&str> = material_package
        .split('/')
        .filter(|component| !component.is_empty())
        .collect();
    components.pop();
    components.push(name);

    format!("/{}", components.join("/"))
}

/// Bits per channel of a decoded image.
pub fn bit_depth(color: ColorType) -> u16 {
    color.bits_per_pixel() / color.channel_count() as u16
}

#[derive(Clone, Debug, Default)]
/// [TextureLoader] reading textures from the filesystem.
pub struct FileTextureLoader {
    root: Option<PathBuf>,
}

impl FileTextureLoader {
    /// Relative paths are resolved against the current directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Relative paths are resolved against `root`, usually the description's directory.
    pub fn relative_to(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl TextureLoader for FileTextureLoader {
    fn load(&self, path: &str, package: &str) -> Result<Texture, Error> {
        let name = asset_name(path)?;
        let source = self.resolve(path);

        let bytes = fs::read(&source).map_err(|err| Error::Io {
            path: source.clone(),
            source: err,
        })?;

        let format =
            image::guess_format(&bytes).map_err(|_| Error::UnknownFormat(source.clone()))?;
        let decoded =
            image::load_from_memory_with_format(&bytes, format).map_err(|err| Error::Decode {
                path: source.clone(),
                source: err,
            })?;

        let bit_depth = bit_depth(decoded.color());
        if bit_depth != 8 && bit_depth != 16 {
            return Err(Error::BitDepth(bit_depth, source));
        }

        debug!(
            "Imported texture `{name}` from `{}` ({}x{}, {format:?})",
            source.display(),
            decoded.width(),
            decoded.height()
        );

        Ok(Texture {
            name: name.to_owned(),
            package: package_for(package, name),
            width: decoded.width(),
            height: decoded.height(),
            bit_depth,
            format,
            rgba: decoded.to_rgba8().into_raw(),
            source,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("matfactory-texture-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("Could not create scratch directory");
        dir
    }

    #[test]
    fn asset_names() {
        assert_eq!(asset_name("images/brick.png").unwrap(), "brick");
        assert_eq!(asset_name("images\\brick.png").unwrap(), "brick");
        assert_eq!(asset_name("brick").unwrap(), "brick");
        assert_eq!(asset_name("a/b.c.png").unwrap(), "b.c");
        assert!(matches!(asset_name("images/"), Err(Error::InvalidPath(_))));
        assert!(matches!(asset_name(""), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn packages() {
        assert_eq!(
            package_for("/Game/Materials/M_Brick", "brick"),
            "/Game/Materials/brick"
        );
        assert_eq!(package_for("/M_Brick", "brick"), "/brick");
        assert_eq!(package_for("", "brick"), "/brick");
    }

    #[test]
    fn bit_depths() {
        assert_eq!(bit_depth(ColorType::Rgba8), 8);
        assert_eq!(bit_depth(ColorType::L16), 16);
        assert_eq!(bit_depth(ColorType::Rgb32F), 32);
    }

    #[test]
    fn load_png() {
        let dir = scratch_dir();
        image::RgbaImage::from_pixel(4, 2, image::Rgba([255, 0, 0, 255]))
            .save(dir.join("red.png"))
            .expect("Could not write test image");

        let texture = FileTextureLoader::relative_to(&dir)
            .load("red.png", "/Game/Materials/M_Red")
            .expect("Could not load test image");

        assert_eq!(texture.name, "red");
        assert_eq!(texture.package, "/Game/Materials/red");
        assert_eq!((texture.width, texture.height), (4, 2));
        assert_eq!(texture.format, ImageFormat::Png);
        assert_eq!(texture.bit_depth, 8);
        assert_eq!(texture.rgba.len(), 4 * 2 * 4);
        assert_eq!(&texture.rgba[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn load_missing() {
        let res = FileTextureLoader::relative_to(scratch_dir()).load("missing.png", "/Game/M");
        assert!(matches!(res, Err(Error::Io { .. })), "{res:?}");
    }

    #[test]
    fn load_garbage() {
        let dir = scratch_dir();
        fs::write(dir.join("garbage.png"), b"definitely not an image")
            .expect("Could not write test file");

        let res = FileTextureLoader::relative_to(&dir).load("garbage.png", "/Game/M");
        assert!(matches!(res, Err(Error::UnknownFormat(_))), "{res:?}");
    }
}
