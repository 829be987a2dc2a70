use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bingo-boards",
    version,
    about = "Generate printable bingo boards as a paginated PDF"
)]
struct Cli {
    /// CSV file with a header row and five label columns (one pool per
    /// grid column)
    input: PathBuf,

    /// Number of boards (pages) to generate
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pages: u32,

    /// Output PDF path
    #[arg(default_value = bingo_boards::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Board title (overrides settings)
    #[arg(short = 't', long = "title")]
    title: Option<String>,

    /// Instructions text (overrides settings)
    #[arg(short = 'i', long = "instructions")]
    instructions: Option<String>,

    /// Seed for deterministic sampling
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// TTF/OTF font file to embed
    #[arg(long = "font-path")]
    font_path: Option<String>,

    /// Font family to resolve from the installed fonts
    #[arg(long = "font-family")]
    font_family: Option<String>,

    /// Read extra settings from a local TOML file
    #[arg(short = 'r', long = "read-settings")]
    read_settings: Option<String>,

    /// Enable verbose logging
    #[arg(long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    bingo_boards::logging::init(cli.verbose)?;
    bingo_boards::run(bingo_boards::Config {
        input: cli.input,
        pages: cli.pages,
        output: cli.output,
        title: cli.title,
        instructions: cli.instructions,
        seed: cli.seed,
        font_path: cli.font_path,
        font_family: cli.font_family,
        settings_path: cli.read_settings,
    })
}
