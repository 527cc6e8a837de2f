use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// The level of log messages written to stderr.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: LevelFilter,

    #[command(subcommand)]
    pub command: CliCommands,
}

#[derive(Subcommand)]
pub enum CliCommands {
    /// Only remove exact duplicates and sort by number of Ns, then output FASTA.
    SortUniq(DedupCommand),

    /// Deduplicate using the trie algorithm.
    Trie(DedupCommand),

    /// Deduplicate using the pairwise algorithm.
    Pairwise(DedupCommand),

    /// Generate a benchmark read set with duplicates and Ns from source reads.
    Simulate(SimulateCommand),
}

#[derive(Args)]
pub struct DedupCommand {
    /// Input reads. The format is chosen by file extension: .fa/.fasta, .fq/.fastq, or
    /// .txt/.csv/.tsv/.list with one sequence per line.
    pub input: PathBuf,

    #[command(flatten)]
    pub read_options: CliReadOptions,

    /// Output FASTA file. Written to stdout if omitted or `-`.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// The input is already sorted by the number of Ns.
    #[arg(short, long)]
    pub sorted: bool,

    /// Reads with more Ns are discarded.
    #[arg(short, long, default_value_t = 9999)]
    pub max_missing: usize,
}

#[derive(Args)]
pub struct CliReadOptions {
    /// FASTQ bases with a lower quality are converted to N. Zero disables masking.
    #[arg(short = 'q', long, default_value_t = 0)]
    pub min_base_quality: u8,

    /// The ASCII value representing quality zero in FASTQ files.
    #[arg(short = 't', long, default_value_t = 33)]
    pub quality_offset: u8,

    /// The symbols allowed in input sequences. N is always allowed.
    #[arg(long, default_value = "ACGTN")]
    pub symbols: String,

    /// Additional symbols that are treated as N.
    #[arg(long, default_value = "")]
    pub ambiguous: String,
}

#[derive(Args)]
pub struct SimulateCommand {
    /// Source reads, in any supported input format.
    pub input: PathBuf,

    #[command(flatten)]
    pub read_options: CliReadOptions,

    /// Output FASTA file. Written to stdout if omitted or `-`.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// All source reads are truncated to this length.
    #[arg(long)]
    pub read_length: usize,

    /// The fraction of source reads sampled as unique molecules.
    #[arg(long, default_value_t = 0.01)]
    pub starting_fraction: f64,

    /// The factor by which the unique molecules are inflated by resampling, at most 1000.
    #[arg(long, default_value_t = 1.3)]
    pub inflation_factor: f64,

    /// The start of the region where Ns are inserted, as a fraction of the read length.
    #[arg(long, default_value_t = 0.0)]
    pub region_start: f64,

    /// The end of the region where Ns are inserted, as a fraction of the read length.
    #[arg(long, default_value_t = 1.0)]
    pub region_end: f64,

    /// The fraction of bases in the region that are converted to N.
    #[arg(long, default_value_t = 0.3)]
    pub region_n_fraction: f64,

    #[arg(long, default_value_t = 1)]
    pub random_seed: u64,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use log::LevelFilter;

    use super::{Cli, CliCommands};

    #[test]
    fn command_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn log_level_after_subcommand() {
        let cli = Cli::try_parse_from(["triededup", "trie", "reads.fa", "--log-level", "debug"])
            .unwrap();
        assert_eq!(cli.log_level, LevelFilter::Debug);
        assert!(matches!(cli.command, CliCommands::Trie(_)));

        let cli = Cli::try_parse_from(["triededup", "--log-level", "warn", "pairwise", "reads.fa"])
            .unwrap();
        assert_eq!(cli.log_level, LevelFilter::Warn);

        let cli = Cli::try_parse_from(["triededup", "sort-uniq", "reads.fa"]).unwrap();
        assert_eq!(cli.log_level, LevelFilter::Info);
    }
}
