//! Font resolution for statement rendering.
//!
//! The statement is set in the standard Helvetica PDF font, so no font program is embedded in
//! the output. genpdf still needs TrueType metrics to lay text out. Liberation Sans is metric
//! compatible with Helvetica and is looked up in a handful of well-known places; on Windows,
//! Arial from the system font directory stands in when Liberation Sans is not installed.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use genpdf::fonts::{self, Builtin, FontData, FontFamily};
use log::{debug, warn};
use printpdf::BuiltinFont;

/// Name of the metric-compatible family looked up on disk.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "LiberationSans";

/// Environment variable that points at a directory containing the family files.
pub const FONTS_DIR_ENV: &str = "STATEMENT_FONTS_DIR";

const SYSTEM_FONT_DIRECTORIES: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/liberation2",
    "/usr/share/fonts/liberation-sans",
    "/usr/share/fonts/liberation",
    "/usr/share/fonts/TTF",
    "/Library/Fonts",
];

/// File names of the four faces of a family, in regular/bold/italic/bold-italic order.
struct FaceFiles {
    family: &'static str,
    files: [&'static str; 4],
}

const LIBERATION_SANS: FaceFiles = FaceFiles {
    family: DEFAULT_FONT_FAMILY_NAME,
    files: [
        "LiberationSans-Regular.ttf",
        "LiberationSans-Bold.ttf",
        "LiberationSans-Italic.ttf",
        "LiberationSans-BoldItalic.ttf",
    ],
};

const ARIAL: FaceFiles = FaceFiles {
    family: "Arial",
    files: ["arial.ttf", "arialbd.ttf", "ariali.ttf", "arialbi.ttf"],
};

/// Built-in PDF fonts the faces are printed with, in the same order as [`FaceFiles::files`].
const HELVETICA_FACES: [BuiltinFont; 4] = [
    BuiltinFont::Helvetica,
    BuiltinFont::HelveticaBold,
    BuiltinFont::HelveticaOblique,
    BuiltinFont::HelveticaBoldOblique,
];

impl FaceFiles {
    fn missing_in(&self, directory: &Path) -> Vec<&'static str> {
        self.files
            .iter()
            .copied()
            .filter(|name| !directory.join(name).is_file())
            .collect()
    }

    fn load(&self, directory: &Path, index: usize) -> Result<FontData, Error> {
        let path = directory.join(self.files[index]);
        FontData::load(&path, Some(HELVETICA_FACES[index])).map_err(|err| {
            Error::new(
                format!("Failed to load {} font at {}: {}", self.family, path.display(), err),
                io::Error::new(io::ErrorKind::InvalidData, err.to_string()),
            )
        })
    }
}

/// A directory known to hold a complete family.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontSource {
    /// Liberation Sans, the preferred family.
    Liberation(PathBuf),
    /// Arial from the Windows font directory.
    Arial(PathBuf),
}

impl FontSource {
    pub fn directory(&self) -> &Path {
        match self {
            FontSource::Liberation(path) | FontSource::Arial(path) => path,
        }
    }

    /// Loads the four faces, mapped onto the built-in Helvetica metrics.
    pub fn load(&self) -> Result<FontFamily<FontData>, Error> {
        match self {
            FontSource::Liberation(directory) => font_family_from_dir(directory),
            FontSource::Arial(directory) => Ok(FontFamily {
                regular: ARIAL.load(directory, 0)?,
                bold: ARIAL.load(directory, 1)?,
                italic: ARIAL.load(directory, 2)?,
                bold_italic: ARIAL.load(directory, 3)?,
            }),
        }
    }
}

/// Directories searched for Liberation Sans, most specific first.
pub fn search_path() -> Vec<PathBuf> {
    let mut directories = Vec::new();
    let mut add = |directory: PathBuf| {
        if !directories.contains(&directory) {
            directories.push(directory);
        }
    };

    if let Some(directory) = non_empty_env_path(FONTS_DIR_ENV) {
        add(directory);
    }
    if let Some(bin_dir) = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        add(bin_dir.join("assets").join("fonts"));
    }
    add(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets").join("fonts"));
    for directory in SYSTEM_FONT_DIRECTORIES {
        add(PathBuf::from(directory));
    }

    directories
}

fn non_empty_env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn windows_fonts_dir() -> Option<PathBuf> {
    ["WINDIR", "SystemRoot"]
        .into_iter()
        .filter_map(non_empty_env_path)
        .map(|root| root.join("Fonts"))
        .find(|directory| directory.is_dir())
}

/// Finds the first directory holding a complete family.
///
/// The error lists every directory that was checked and why it was rejected.
pub fn locate() -> Result<FontSource, Error> {
    let mut rejected = Vec::new();

    for directory in search_path() {
        if !directory.is_dir() {
            rejected.push(format!("{} (directory missing)", directory.display()));
            continue;
        }
        let missing = LIBERATION_SANS.missing_in(&directory);
        if missing.is_empty() {
            return Ok(FontSource::Liberation(directory));
        }
        rejected.push(format!(
            "{} (missing files [{}])",
            directory.display(),
            missing.join(", ")
        ));
    }

    if cfg!(windows) {
        if let Some(directory) = windows_fonts_dir() {
            if ARIAL.missing_in(&directory).is_empty() {
                warn!(
                    "{} fonts unavailable; falling back to {} in {}",
                    DEFAULT_FONT_FAMILY_NAME,
                    ARIAL.family,
                    directory.display()
                );
                return Ok(FontSource::Arial(directory));
            }
        }
    }

    Err(Error::new(
        format!(
            "Unable to locate {} fonts. Checked: {}. Install Liberation Sans or set {}.",
            DEFAULT_FONT_FAMILY_NAME,
            rejected.join(", "),
            FONTS_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "statement fonts not found"),
    ))
}

/// Loads the Helvetica-metric family from `directory`.
pub fn font_family_from_dir(directory: &Path) -> Result<FontFamily<FontData>, Error> {
    fonts::from_files(directory, LIBERATION_SANS.family, Some(Builtin::Helvetica)).map_err(
        |err| {
            Error::new(
                format!(
                    "Failed to load font family '{}' from {}: {}",
                    LIBERATION_SANS.family,
                    directory.display(),
                    err
                ),
                io::Error::new(io::ErrorKind::Other, err.to_string()),
            )
        },
    )
}

/// Resolves and loads the statement font family.
pub fn default_font_family() -> Result<FontFamily<FontData>, Error> {
    let source = locate()?;
    debug!("Using statement fonts from {}", source.directory().display());
    source.load()
}

/// Indicates whether [`default_font_family`] can find a complete family.
pub fn default_fonts_available() -> bool {
    locate().is_ok()
}
