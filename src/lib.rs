use anyhow::{Context, Result, anyhow};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub mod board;
pub mod error;
pub mod layout;
pub mod logging;
pub mod pdf;
pub mod pools;
pub mod settings;

use board::Board;
use layout::Color;
use layout::page::{BoardStyle, render_page};
use pdf::{A4_PORTRAIT, DocumentSink, FontBook};
use pools::Pools;
use settings::Settings;

pub const DEFAULT_OUTPUT: &str = "bingo_board.pdf";

/// Families tried in order when no explicit font is configured.
const FONT_FALLBACKS: &[&str] = &["Lato", "DejaVu Sans", "Liberation Sans", "Arial", "sans-serif"];

#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub pages: u32,
    pub output: PathBuf,
    pub title: Option<String>,
    pub instructions: Option<String>,
    pub seed: Option<u64>,
    pub font_path: Option<String>,
    pub font_family: Option<String>,
    pub settings_path: Option<String>,
}

/// Generates `config.pages` bingo boards into a single PDF. All fatal
/// validation (pools, fonts, settings) happens before the output document
/// is created, so a failed run leaves no partial file behind.
pub fn run(config: Config) -> Result<()> {
    if config.pages == 0 {
        return Err(anyhow!("page count must be at least 1"));
    }
    let settings_path = config.settings_path.as_deref().map(Path::new);
    let settings = settings::load_settings(settings_path)?;
    let pools = Pools::from_csv_path(&config.input)?;

    let title = config.title.unwrap_or_else(|| settings.title.clone());
    let instructions = config
        .instructions
        .unwrap_or_else(|| settings.instructions.clone());
    let style = board_style(&settings)?;

    let font_path = config
        .font_path
        .as_deref()
        .or(settings.font_path.as_deref())
        .map(Path::new);
    let font_family = config
        .font_family
        .as_deref()
        .or(settings.font_family.as_deref());
    let book = FontBook::resolve(font_path, font_family, FONT_FALLBACKS)?;
    debug!("using font family {:?}", book.regular().family());

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut sink = DocumentSink::create(&config.output, &title, book, A4_PORTRAIT)?;
    for page in 1..=config.pages {
        let board = Board::sample(&pools, &title, &instructions, &mut rng)?;
        let mut canvas = sink.begin_page();
        let overflows = render_page(&mut canvas, &board, &style);
        if overflows > 0 {
            warn!(
                "page {}: {} region(s) still overflow at the minimum font size",
                page, overflows
            );
        }
        debug!("rendered page {}/{}", page, config.pages);
    }
    sink.finish()
        .with_context(|| format!("failed to write {}", config.output.display()))?;
    debug!("wrote {} page(s) to {}", config.pages, config.output.display());
    Ok(())
}

fn board_style(settings: &Settings) -> Result<BoardStyle> {
    Ok(BoardStyle {
        panel_fill: parse_color(&settings.panel_fill)?,
        panel_edge: parse_color(&settings.panel_edge)?,
        free_fill: parse_color(&settings.free_fill)?,
        grid_color: parse_color(&settings.grid_color)?,
        text_color: parse_color(&settings.text_color)?,
    })
}

fn parse_color(value: &str) -> Result<Color> {
    Color::from_hex(value).ok_or_else(|| anyhow!("invalid color '{}': expected #rrggbb", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_style_rejects_bad_hex() {
        let mut settings = Settings::default();
        settings.grid_color = "black".to_string();
        assert!(board_style(&settings).is_err());
        assert!(board_style(&Settings::default()).is_ok());
    }
}
