//! Book configuration: hardcoded defaults plus a YAML document merged over them.
//!
//! The merge is shallow and by top-level key, matching the original tool's
//! behaviour: a `margin:` key in the user document replaces the *entire*
//! default margin block, it is not deep-merged. The loaded [`Config`] is an
//! immutable value produced once at startup and passed by reference into the
//! renderer; nothing mutates it afterwards.
//!
//! All lengths are in points (1 inch = 72 pt). Colors are RGB triples of
//! 0.0-1.0 floats.

use crate::error::Error;
use crate::layout::LayoutEntry;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const INCH: f32 = 72.0;

/// US Letter, in points.
const LETTER: (f32, f32) = (612.0, 792.0);

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

/// Document-wide caption defaults; individual pages may override any part.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptionStyle {
    pub size: f32,
    pub font: String,
    pub color: [f32; 3],
}

/// A TTF font to register with the document, addressable from captions by name.
#[derive(Debug, Clone, Deserialize)]
pub struct FontRegistration {
    pub name: String,
    pub file: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Caption {
    pub text: String,
    pub size: Option<f32>,
    pub font: Option<String>,
    pub color: Option<[f32; 3]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageBlock {
    pub url: String,
    /// How many copies of the image to arrange on the page.
    #[serde(default = "default_image_number")]
    pub number: usize,
}

fn default_image_number() -> usize {
    1
}

/// One output page: a caption, and optionally a grid of images above it.
#[derive(Debug, Clone, Deserialize)]
pub struct PageSpec {
    pub caption: Caption,
    pub image: Option<ImageBlock>,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Output PDF file name.
    pub name: String,
    pub pagesize: PageSize,
    pub margin: Margins,
    pub caption: CaptionStyle,
    /// Parsed and defaulted for config compatibility; the grid layout does not
    /// currently consume it.
    #[allow(dead_code)]
    pub padding: f32,
    /// Grid shapes indexed by image count minus one.
    pub layouts: Vec<LayoutEntry>,
    pub fonts: Vec<FontRegistration>,
    pub pages: Vec<PageSpec>,
}

/// The user-facing YAML document: every top-level key optional, each present
/// key replacing the corresponding default wholesale.
#[derive(Debug, Deserialize)]
struct ConfigUpdate {
    name: Option<String>,
    pagesize: Option<PageSize>,
    margin: Option<Margins>,
    caption: Option<CaptionStyle>,
    padding: Option<f32>,
    layouts: Option<Vec<LayoutEntry>>,
    fonts: Option<Vec<FontRegistration>>,
    pages: Option<Vec<PageSpec>>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            name: "book.pdf".to_string(),
            pagesize: PageSize {
                width: LETTER.0,
                height: LETTER.1,
            },
            margin: Margins {
                top: 1.0 * INCH,
                bottom: 1.5 * INCH,
                left: 1.0 * INCH,
                right: 1.0 * INCH,
            },
            caption: CaptionStyle {
                size: 72.0,
                font: "Times-Roman".to_string(),
                color: [0.6, 0.6, 0.6],
            },
            padding: 0.25 * INCH,
            layouts: default_layouts(),
            fonts: Vec::new(),
            pages: Vec::new(),
        }
    }
}

impl Config {
    /// Load the YAML document at `path` and merge it over the defaults.
    ///
    /// Fails with [`Error::ConfigNotFound`] when the file does not exist.
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()).into());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let update: ConfigUpdate = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML in {}", path.display()))?;

        Ok(Config::default().merged(update))
    }

    fn merged(mut self, update: ConfigUpdate) -> Config {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(pagesize) = update.pagesize {
            self.pagesize = pagesize;
        }
        if let Some(margin) = update.margin {
            self.margin = margin;
        }
        if let Some(caption) = update.caption {
            self.caption = caption;
        }
        if let Some(padding) = update.padding {
            self.padding = padding;
        }
        if let Some(layouts) = update.layouts {
            self.layouts = layouts;
        }
        if let Some(fonts) = update.fonts {
            self.fonts = fonts;
        }
        if let Some(pages) = update.pages {
            self.pages = pages;
        }
        self
    }
}

fn row(slots: usize) -> Vec<String> {
    vec!["x".to_string(); slots]
}

/// The built-in layout table, supporting 1 through 10 images per page.
fn default_layouts() -> Vec<LayoutEntry> {
    vec![
        vec![row(1)],
        vec![row(2)],
        vec![row(3)],
        vec![row(2), row(2)],
        vec![row(2), row(3)],
        vec![row(3), row(3)],
        vec![row(3), row(4)],
        vec![row(4), row(4)],
        vec![row(3), row(3), row(3)],
        vec![row(5), row(5)],
    ]
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_layout_entries_hold_their_image_count() {
        let layouts = default_layouts();
        assert_eq!(layouts.len(), 10);
        for (i, entry) in layouts.iter().enumerate() {
            let slots: usize = entry.iter().map(Vec::len).sum();
            assert_eq!(slots, i + 1, "entry {i}");
        }
    }

    #[test]
    fn missing_file_is_config_not_found() {
        let err = Config::load(Path::new("no/such/book.yaml")).unwrap_err();
        match err.downcast_ref::<Error>() {
            Some(Error::ConfigNotFound(path)) => {
                assert_eq!(path, Path::new("no/such/book.yaml"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn user_keys_override_defaults_shallowly() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("book.yaml");
        let mut file = std::fs::File::create(&path).expect("can create config");
        writeln!(
            file,
            "name: zoo.pdf\n\
             margin:\n  top: 36.0\n  bottom: 36.0\n  left: 18.0\n  right: 18.0\n\
             pages:\n\
             - caption:\n    text: Lion\n  image:\n    url: https://example.com/lion.png\n    number: 4\n\
             - caption:\n    text: The End\n    size: 36.0"
        )
        .expect("can write config");
        drop(file);

        let config = Config::load(&path).expect("can load config");

        assert_eq!(config.name, "zoo.pdf");
        // the whole margin block is replaced
        assert_eq!(config.margin.top, 36.0);
        assert_eq!(config.margin.bottom, 36.0);
        // untouched keys keep their defaults
        assert_eq!(config.pagesize.width, 612.0);
        assert_eq!(config.caption.size, 72.0);
        assert_eq!(config.caption.font, "Times-Roman");
        assert_eq!(config.layouts.len(), 10);

        assert_eq!(config.pages.len(), 2);
        let image = config.pages[0].image.as_ref().expect("page has image");
        assert_eq!(image.number, 4);
        assert!(config.pages[1].image.is_none());
        assert_eq!(config.pages[1].caption.size, Some(36.0));
        assert_eq!(config.pages[1].caption.font, None);
    }

    #[test]
    fn image_number_defaults_to_one() {
        let page: PageSpec = serde_yaml::from_str(
            "caption:\n  text: Walrus\nimage:\n  url: https://example.com/walrus.png",
        )
        .expect("can parse page");
        assert_eq!(page.image.unwrap().number, 1);
    }
}
