use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use rayon::prelude::*;

use crate::color_image_mask::tint_image;
use crate::composite::alpha_composite;
use crate::config::BatchConfig;
use crate::error::{Result, TintError};
use crate::helper::{ColorLiteral, force_png_path};

/// An overlay file and the base it should be composited onto
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePair {
    pub overlay: PathBuf,
    pub base: PathBuf,
    /// Overlay file name, as listed in the input directory
    pub overlay_name: String,
    /// Overlay file name without the overlay suffix
    pub stem: String,
}

/// What happened to one pair
#[derive(Debug)]
pub struct PairOutcome {
    pub overlay_name: String,
    pub result: Result<PathBuf>,
}

#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<PairOutcome>,
}

impl BatchReport {
    pub fn exported(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Outcomes that did not produce a file, missing bases included
    pub fn skipped(&self) -> Vec<&PairOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err()).collect()
    }

    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

/// List overlay candidates in the input directory, sorted by file name.
pub fn discover_pairs(config: &BatchConfig) -> Result<Vec<FilePair>> {
    let io_err = |e| TintError::Io {
        path: config.input_dir.clone(),
        source: e,
    };

    let mut pairs = Vec::new();
    for entry in fs::read_dir(&config.input_dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let overlay = entry.path();

        // Names that are not UTF-8 can never carry the suffix
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        let Some(stem) = name.strip_suffix(config.overlay_suffix.as_str()) else {
            continue;
        };
        if !overlay.is_file() {
            continue;
        }

        pairs.push(FilePair {
            base: config
                .input_dir
                .join(format!("{}{}", stem, config.base_extension)),
            stem: stem.to_string(),
            overlay_name: name,
            overlay,
        });
    }

    pairs.sort_by(|a, b| a.overlay_name.cmp(&b.overlay_name));
    Ok(pairs)
}

fn load_rgba(path: &Path) -> Result<RgbaImage> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|e| TintError::Decode {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Tint one overlay, composite it over its base and save the result.
/// Returns the path that was written.
pub fn process_pair(pair: &FilePair, color: &ColorLiteral, output_dir: &Path) -> Result<PathBuf> {
    if !pair.base.is_file() {
        return Err(TintError::MissingBasePair {
            overlay: pair.overlay_name.clone(),
        });
    }

    let base = load_rgba(&pair.base)?;
    let overlay = load_rgba(&pair.overlay)?;

    let tinted_overlay = tint_image(&overlay, color.rgb);
    let result = alpha_composite(&base, &tinted_overlay)?;

    let output_path = force_png_path(output_dir, &pair.stem, color);
    result.save(&output_path).map_err(|e| TintError::Write {
        path: output_path.clone(),
        source: e,
    })?;

    Ok(output_path)
}

/// Create the output directory, then read and parse the color once.
///
/// An invalid literal stops here, before the input directory is touched.
pub fn prepare<F>(config: &BatchConfig, read_color: F) -> Result<ColorLiteral>
where
    F: FnOnce() -> std::io::Result<String>,
{
    fs::create_dir_all(&config.output_dir).map_err(|e| TintError::Io {
        path: config.output_dir.clone(),
        source: e,
    })?;

    let raw = read_color().map_err(TintError::Prompt)?;
    raw.parse()
}

/// Discover pairs and process them. Every pair succeeds or fails on its own.
pub fn process_all(config: &BatchConfig, color: &ColorLiteral) -> Result<BatchReport> {
    let pairs = discover_pairs(config)?;

    // Indexed collect keeps discovery order
    let outcomes = pairs
        .par_iter()
        .map(|pair| PairOutcome {
            overlay_name: pair.overlay_name.clone(),
            result: process_pair(pair, color, &config.output_dir),
        })
        .collect();

    Ok(BatchReport { outcomes })
}
