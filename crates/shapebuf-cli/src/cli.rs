//! CLI argument definitions using Clap v4

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use shapebuf::types::{SerializeFlags, SerializeFormat};

/// Shapebuf - shape text and inspect glyph buffers from the command line
#[derive(Parser, Debug)]
#[command(name = "shapebuf")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Shape text with a font and print the glyph buffer
    #[command(alias = "s")]
    Shape(Box<ShapeArgs>),

    /// Parse serialized glyphs and print them back
    #[command(alias = "d")]
    Deserialize(DeserializeArgs),

    /// Print the direction, script and language guessed for a text
    #[command(alias = "g")]
    Guess(GuessArgs),
}

/// Arguments for the shape command
#[derive(Parser, Debug)]
pub struct ShapeArgs {
    /// Text to shape (reads from stdin if omitted); \uXXXX and \u{X} escapes are decoded
    pub text: Option<String>,

    /// Font file path (.ttf, .otf, .ttc, .otc)
    #[arg(short = 'f', long = "font-file")]
    pub font_file: PathBuf,

    /// Face index for TTC/OTC collections
    #[arg(short = 'y', long = "face-index", default_value = "0")]
    pub face_index: u32,

    /// Shaping backend
    #[arg(long = "shaper", value_enum, default_value = "hr")]
    pub shaper: ShaperKind,

    /// Text direction: auto, ltr, rtl, ttb, btt
    #[arg(short = 'd', long = "direction", default_value = "auto")]
    pub direction: String,

    /// Script tag (ISO 15924), e.g. Latn, Arab, Hani
    #[arg(short = 'S', long = "script", default_value = "auto")]
    pub script: String,

    /// Language tag (BCP 47), e.g. en, ar, zh-Hans
    #[arg(short = 'l', long = "language")]
    pub language: Option<String>,

    /// Font features, comma or space separated: kern, -liga, aalt=2, smcp[3:5]
    #[arg(short = 'F', long = "features")]
    pub features: Option<String>,

    /// Cluster level: 0 (monotone graphemes), 1 (monotone characters), 2 (characters)
    #[arg(long = "cluster-level", default_value = "0")]
    pub cluster_level: String,

    /// Treat the text as the beginning of a paragraph
    #[arg(long = "bot")]
    pub beginning_of_text: bool,

    /// Treat the text as the end of a paragraph
    #[arg(long = "eot")]
    pub end_of_text: bool,

    /// Encoding form the text is handed to the buffer in
    #[arg(long = "utf", value_enum, default_value = "8")]
    pub encoding: Encoding,

    /// First code unit of the item to shape; the rest of the text is context
    #[arg(long = "item-offset", default_value = "0")]
    pub item_offset: usize,

    /// Code units in the item (to the end of the text if omitted)
    #[arg(long = "item-length")]
    pub item_length: Option<usize>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the deserialize command
#[derive(Parser, Debug)]
pub struct DeserializeArgs {
    /// Serialized glyphs (reads from stdin if omitted)
    pub data: Option<String>,

    /// Font used to resolve glyph names
    #[arg(short = 'f', long = "font-file")]
    pub font_file: Option<PathBuf>,

    /// Face index for TTC/OTC collections
    #[arg(short = 'y', long = "face-index", default_value = "0")]
    pub face_index: u32,

    /// Format of the input; output uses --format
    #[arg(short = 'I', long = "input-format", value_enum, default_value = "text")]
    pub input_format: Format,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the guess command
#[derive(Parser, Debug)]
pub struct GuessArgs {
    /// Text to inspect (reads from stdin if omitted)
    pub text: Option<String>,

    /// Print the result as JSON
    #[arg(long = "json")]
    pub json: bool,
}

/// How glyphs are printed
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format
    #[arg(short = 'O', long = "format", value_enum, default_value = "text")]
    pub format: Format,

    /// Leave out glyph clusters
    #[arg(long = "no-clusters")]
    pub no_clusters: bool,

    /// Leave out glyph positions
    #[arg(long = "no-positions")]
    pub no_positions: bool,

    /// Print glyph ids instead of names
    #[arg(long = "no-glyph-names")]
    pub no_glyph_names: bool,

    /// Fold advances into absolute offsets
    #[arg(long = "no-advances")]
    pub no_advances: bool,

    /// Include glyph extents
    #[arg(long = "glyph-extents")]
    pub glyph_extents: bool,

    /// Include glyph flags
    #[arg(long = "glyph-flags")]
    pub glyph_flags: bool,
}

impl OutputArgs {
    pub fn flags(&self) -> SerializeFlags {
        let mut flags = SerializeFlags::empty();
        flags.set(SerializeFlags::NO_CLUSTERS, self.no_clusters);
        flags.set(SerializeFlags::NO_POSITIONS, self.no_positions);
        flags.set(SerializeFlags::NO_GLYPH_NAMES, self.no_glyph_names);
        flags.set(SerializeFlags::NO_ADVANCES, self.no_advances);
        flags.set(SerializeFlags::GLYPH_EXTENTS, self.glyph_extents);
        flags.set(SerializeFlags::GLYPH_FLAGS, self.glyph_flags);
        flags
    }
}

/// Supported shaping backends
#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ShaperKind {
    /// Harfrust (pure Rust)
    Hr,
    /// HarfBuzz (C library)
    Hb,
}

/// Glyph serialization formats
#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Format {
    /// [name=cluster@dx,dy+advance|...]
    Text,
    /// [{"g":...,"cl":...},...]
    Json,
}

impl From<Format> for SerializeFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => SerializeFormat::Text,
            Format::Json => SerializeFormat::Json,
        }
    }
}

/// Unicode encoding forms accepted by the buffer
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Encoding {
    #[value(name = "8")]
    Utf8,
    #[value(name = "16")]
    Utf16,
    #[value(name = "32")]
    Utf32,
}
