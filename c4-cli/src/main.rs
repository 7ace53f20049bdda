use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use c4_align::{ModelType, DEFAULT_MAX_CELLS};
use c4_core::AlphabetType;
use c4_seq::GeneticCodeId;

mod driver;

/// Align query sequences against target sequences with a comparison model
#[derive(Parser, Debug)]
#[command(name = "c4", version, about, long_about = None, disable_version_flag = true)]
pub struct Cli {
    /// Print version
    #[arg(long, action = clap::ArgAction::Version)]
    version: Option<bool>,
    /// Query FASTA file(s)
    #[arg(short, long, num_args = 1.., required = true)]
    query: Vec<PathBuf>,
    /// Target FASTA file(s)
    #[arg(short, long, num_args = 1.., required = true)]
    target: Vec<PathBuf>,
    /// Query alphabet (protein, dna, rna or unknown to guess per record)
    #[arg(short = 'Q', long, default_value = "unknown")]
    querytype: AlphabetType,
    /// Target alphabet (protein, dna, rna or unknown to guess per record)
    #[arg(short = 'T', long, default_value = "unknown")]
    targettype: AlphabetType,
    /// Which query chunk to process (1-based)
    #[arg(long, default_value_t = 0)]
    querychunkid: usize,
    /// Number of query chunks (0 processes every query)
    #[arg(long, default_value_t = 0)]
    querychunktotal: usize,
    /// Which target chunk to process (1-based)
    #[arg(long, default_value_t = 0)]
    targetchunkid: usize,
    /// Number of target chunks (0 processes every target)
    #[arg(long, default_value_t = 0)]
    targetchunktotal: usize,
    /// Verbosity: 0 warnings only, 1 progress, 2 model construction, 3 everything
    #[arg(short = 'V', long, default_value_t = 1)]
    verbose: u8,
    /// Comparison model, as kind or kind:type (e.g. protein2genome:local)
    #[arg(short, long, default_value = "ungapped")]
    model: ModelType,
    /// NCBI genetic code for codon models (1, 2 or 11)
    #[arg(long, default_value = "1")]
    geneticcode: GeneticCodeId,
    /// Skip pairs whose DP table would exceed this many cells
    #[arg(long, default_value_t = DEFAULT_MAX_CELLS)]
    maxcells: usize,
    /// Report only alignments scoring at least this much
    #[arg(short, long, allow_hyphen_values = true)]
    score: Option<i32>,
}

fn level(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::builder()
        .format_timestamp(None)
        .format_indent(Some(8))
        .filter_level(level(cli.verbose))
        .init();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let reported = driver::run(&cli, &mut out)?;
    out.flush()?;
    log::info!("{reported} alignment(s) reported");
    Ok(())
}
