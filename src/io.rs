//! Reading reads from FASTA, FASTQ, SAM, BAM and plain text files, and writing them as FASTA.
//!
//! Every reader normalises sequences the same way: symbols are uppercased, the configured
//! ambiguous symbols become `N`, and any symbol outside the allowed alphabet is rejected.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Read, Write},
    path::Path,
};

use bio::io::{fasta, fastq};
use log::{info, warn};
use noodles::{bam, sam};

use crate::{
    alphabet::{ACGTN, WILDCARD},
    error::{Error, Result},
    record::SequenceRecord,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Fasta,
    Fastq,
    Sam,
    Bam,
    /// One sequence per line, identified by its line number.
    Text,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(|extension| extension.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "fa" | "fasta" => Ok(Self::Fasta),
            "fq" | "fastq" => Ok(Self::Fastq),
            "sam" => Ok(Self::Sam),
            "bam" => Ok(Self::Bam),
            "txt" | "csv" | "tsv" | "list" => Ok(Self::Text),
            _ => Err(Error::UnsupportedInputFormat(extension)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Allowed symbols. `N` is always allowed.
    pub symbols: Vec<u8>,
    /// Symbols that are converted to `N`.
    pub ambiguous: Vec<u8>,
    /// Bases with a lower quality are converted to `N`. Zero disables masking.
    pub min_base_quality: u8,
    /// The ASCII value of quality zero. Alignment files store raw qualities, which are
    /// compared as if encoded with an offset of 33.
    pub quality_offset: u8,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            symbols: ACGTN.to_vec(),
            ambiguous: Vec::new(),
            min_base_quality: 0,
            quality_offset: 33,
        }
    }
}

impl ReadOptions {
    fn normalise(&self, id: &str, sequence: &[u8]) -> Result<Vec<u8>> {
        sequence
            .iter()
            .enumerate()
            .map(|(position, symbol)| {
                let symbol = symbol.to_ascii_uppercase();
                if symbol == WILDCARD || self.ambiguous.contains(&symbol) {
                    Ok(WILDCARD)
                } else if self.symbols.contains(&symbol) {
                    Ok(symbol)
                } else {
                    Err(Error::InvalidSymbol {
                        id: id.to_string(),
                        symbol: char::from(symbol),
                        position,
                    })
                }
            })
            .collect()
    }

    fn mask_low_quality(&self, id: &str, sequence: &mut [u8], quality: &[u8]) {
        if self.min_base_quality == 0 {
            return;
        }

        if sequence.len() != quality.len() {
            warn!(
                "Read {id:?} has {} bases but {} quality values, masking only the common prefix",
                sequence.len(),
                quality.len()
            );
        }

        for (symbol, &quality) in sequence.iter_mut().zip(quality) {
            if i32::from(quality) - i32::from(self.quality_offset)
                < i32::from(self.min_base_quality)
            {
                *symbol = WILDCARD;
            }
        }
    }
}

/// Reads all records from `path`, choosing the parser by file extension.
pub fn read_records(path: &Path, options: &ReadOptions) -> Result<Vec<SequenceRecord>> {
    let format = InputFormat::from_path(path)?;
    info!("Reading {format:?} records from {path:?}");
    let file = File::open(path)?;

    match format {
        InputFormat::Fasta => read_fasta(file, options),
        InputFormat::Fastq => read_fastq(file, options),
        InputFormat::Sam => read_sam(BufReader::new(file), options),
        InputFormat::Bam => read_bam(file, options),
        InputFormat::Text => read_text(BufReader::new(file), options),
    }
}

pub fn read_fasta(input: impl Read, options: &ReadOptions) -> Result<Vec<SequenceRecord>> {
    fasta::Reader::new(input)
        .records()
        .map(|record| {
            let record = record?;
            let sequence = options.normalise(record.id(), record.seq())?;
            Ok(SequenceRecord::new(record.id(), sequence))
        })
        .collect()
}

/// Reads FASTQ records, converting low quality bases to `N` before normalisation.
pub fn read_fastq(input: impl Read, options: &ReadOptions) -> Result<Vec<SequenceRecord>> {
    fastq::Reader::new(input)
        .records()
        .map(|record| {
            let record = record?;
            let mut sequence = record.seq().to_vec();
            options.mask_low_quality(record.id(), &mut sequence, record.qual());
            let sequence = options.normalise(record.id(), &sequence)?;
            Ok(SequenceRecord::new(record.id(), sequence))
        })
        .collect()
}

/// The offset under which alignment file qualities are compared to `quality_offset`.
const ALIGNMENT_QUALITY_OFFSET: u8 = 33;

/// Reads the sequences of all SAM records as they are stored, without reverse complementing.
/// Records without a name are identified by their record number, counting from one.
pub fn read_sam(input: impl BufRead, options: &ReadOptions) -> Result<Vec<SequenceRecord>> {
    let mut reader = sam::io::Reader::new(input);
    let header = reader.read_header()?;
    read_alignment_records(reader.record_bufs(&header), options)
}

/// Like [`read_sam`], but for BAM input.
pub fn read_bam(input: impl Read, options: &ReadOptions) -> Result<Vec<SequenceRecord>> {
    let mut reader = bam::io::Reader::new(input);
    let header = reader.read_header()?;
    read_alignment_records(reader.record_bufs(&header), options)
}

fn read_alignment_records(
    records: impl Iterator<Item = io::Result<sam::alignment::RecordBuf>>,
    options: &ReadOptions,
) -> Result<Vec<SequenceRecord>> {
    records
        .enumerate()
        .map(|(index, record)| {
            let record = record?;
            let id = record
                .name()
                .map(|name| name.to_string())
                .unwrap_or_else(|| (index + 1).to_string());

            let sequence: &[u8] = record.sequence().as_ref();
            let mut sequence = sequence.to_vec();
            let quality_scores: &[u8] = record.quality_scores().as_ref();
            let quality: Vec<u8> = quality_scores
                .iter()
                .map(|score| score.saturating_add(ALIGNMENT_QUALITY_OFFSET))
                .collect();
            options.mask_low_quality(&id, &mut sequence, &quality);

            let sequence = options.normalise(&id, &sequence)?;
            Ok(SequenceRecord::new(id, sequence))
        })
        .collect()
}

/// Reads one sequence per line. The id of a read is its line number, counting from one.
/// A first line reading `seq` is a column header and skipped, as are empty lines.
pub fn read_text(input: impl BufRead, options: &ReadOptions) -> Result<Vec<SequenceRecord>> {
    let mut result = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() || (index == 0 && line == "seq") {
            continue;
        }

        let id = (index + 1).to_string();
        let sequence = options.normalise(&id, line.as_bytes())?;
        result.push(SequenceRecord::new(id, sequence));
    }
    Ok(result)
}

/// Opens `path` for writing, or stdout if it is `None` or `-`.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
        Some(path) if path == Path::new("-") => Ok(Box::new(BufWriter::new(io::stdout()))),
        Some(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
    }
}

/// Writes each record as `>id` followed by its sequence on one line.
pub fn write_fasta(output: impl Write, records: &[SequenceRecord]) -> Result<()> {
    let mut writer = fasta::Writer::new(output);
    for record in records {
        writer.write(&record.id, None, &record.sequence)?;
    }
    writer.flush()?;
    Ok(())
}
