use std::time::Instant;

use clap::Parser;
use cli::{Cli, CliCommands, CliReadOptions, DedupCommand, SimulateCommand};
use log::info;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use triededup::{
    collapse,
    error::Result,
    io::{open_output, read_records, write_fasta, ReadOptions},
    simulate::{simulate, SimulationParameters},
    uniq_and_sort, Strategy,
};

mod cli;

fn main() {
    let cli = Cli::parse();

    if let Err(error) = run(cli) {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    TermLogger::init(
        cli.log_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let start = Instant::now();
    match cli.command {
        CliCommands::SortUniq(dedup_command) => dedup(dedup_command, None),
        CliCommands::Trie(dedup_command) => dedup(dedup_command, Some(Strategy::Trie)),
        CliCommands::Pairwise(dedup_command) => dedup(dedup_command, Some(Strategy::Pairwise)),
        CliCommands::Simulate(simulate_command) => generate_benchmark(simulate_command),
    }?;
    info!("All done ({:.2?})", start.elapsed());

    Ok(())
}

impl From<CliReadOptions> for ReadOptions {
    fn from(read_options: CliReadOptions) -> Self {
        Self {
            symbols: read_options.symbols.to_ascii_uppercase().into_bytes(),
            ambiguous: read_options.ambiguous.to_ascii_uppercase().into_bytes(),
            min_base_quality: read_options.min_base_quality,
            quality_offset: read_options.quality_offset,
        }
    }
}

/// Without a strategy, reads are only made unique and sorted.
fn dedup(dedup_command: DedupCommand, strategy: Option<Strategy>) -> Result<()> {
    let start = Instant::now();
    let records = read_records(&dedup_command.input, &dedup_command.read_options.into())?;
    info!("Read {} records ({:.2?})", records.len(), start.elapsed());

    let records = uniq_and_sort(records, dedup_command.sorted, dedup_command.max_missing);
    let records = if let Some(strategy) = strategy {
        collapse(records, strategy)
    } else {
        records
    };

    let start = Instant::now();
    write_fasta(open_output(dedup_command.output.as_deref())?, &records)?;
    info!("Wrote {} records ({:.2?})", records.len(), start.elapsed());

    Ok(())
}

fn generate_benchmark(simulate_command: SimulateCommand) -> Result<()> {
    let parameters = SimulationParameters {
        starting_fraction: simulate_command.starting_fraction,
        inflation_factor: simulate_command.inflation_factor,
        read_length: simulate_command.read_length,
        region_start: simulate_command.region_start,
        region_end: simulate_command.region_end,
        region_n_fraction: simulate_command.region_n_fraction,
    };
    parameters.validate()?;

    let source = read_records(
        &simulate_command.input,
        &simulate_command.read_options.into(),
    )?;
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(simulate_command.random_seed);
    let reads = simulate(&source, &parameters, &mut rng)?;

    write_fasta(open_output(simulate_command.output.as_deref())?, &reads)?;
    Ok(())
}
