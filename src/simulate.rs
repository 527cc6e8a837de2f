//! Benchmark read sets with known duplicates.
//!
//! A fraction of the source reads is sampled as the true unique molecules. These are
//! resampled with replacement to create duplicates, truncated to a common length, and a
//! random part of a region of every read is masked with `N`.

use std::collections::HashSet;

use log::info;
use rand::{seq::index, Rng};

use crate::{
    alphabet::WILDCARD,
    error::{Error, Result},
    record::SequenceRecord,
};

#[derive(Debug, Clone, Copy)]
pub struct SimulationParameters {
    /// Fraction of the source reads sampled as unique molecules.
    pub starting_fraction: f64,
    /// Size of the inflated sample relative to the unique molecules.
    pub inflation_factor: f64,
    pub read_length: usize,
    /// Start of the masked region as a fraction of the read length.
    pub region_start: f64,
    /// End of the masked region as a fraction of the read length.
    pub region_end: f64,
    /// Fraction of the bases in the masked region that become `N`.
    pub region_n_fraction: f64,
}

/// Each unique molecule is resampled this many times on average at most.
pub const MAX_INFLATION_FACTOR: f64 = 1000.0;

fn check_range(name: &'static str, value: f64, minimum: f64, maximum: f64) -> Result<()> {
    if (minimum..=maximum).contains(&value) {
        Ok(())
    } else {
        Err(Error::FractionOutOfRange {
            name,
            value,
            minimum,
            maximum,
        })
    }
}

impl SimulationParameters {
    pub fn validate(&self) -> Result<()> {
        check_range("starting fraction", self.starting_fraction, 0.0, 1.0)?;
        check_range(
            "inflation factor",
            self.inflation_factor,
            0.0,
            MAX_INFLATION_FACTOR,
        )?;
        check_range("region start", self.region_start, 0.0, 1.0)?;
        check_range("region end", self.region_end, 0.0, 1.0)?;
        check_range("region N fraction", self.region_n_fraction, 0.0, 1.0)?;
        if self.region_start > self.region_end {
            return Err(Error::RegionEmpty {
                start: self.region_start,
                end: self.region_end,
            });
        }
        Ok(())
    }

    /// The masked region as a range of positions.
    fn region(&self) -> (usize, usize) {
        (
            (self.read_length as f64 * self.region_start) as usize,
            (self.read_length as f64 * self.region_end) as usize,
        )
    }
}

/// Samples and masks a benchmark read set from `source`.
///
/// The ids of the simulated reads are `sim_<index>_<source id>`.
pub fn simulate(
    source: &[SequenceRecord],
    parameters: &SimulationParameters,
    rng: &mut impl Rng,
) -> Result<Vec<SequenceRecord>> {
    parameters.validate()?;

    let unique_amount = (parameters.starting_fraction * source.len() as f64).round() as usize;
    let unique = index::sample(rng, source.len(), unique_amount.min(source.len())).into_vec();
    for &source_index in &unique {
        let record = &source[source_index];
        if record.sequence.len() < parameters.read_length {
            return Err(Error::SourceReadTooShort {
                id: record.id.clone(),
                length: record.sequence.len(),
                read_length: parameters.read_length,
            });
        }
    }

    let inflated_amount = if unique.is_empty() {
        0
    } else {
        (parameters.inflation_factor * unique.len() as f64).round() as usize
    };
    let inflated: Vec<usize> = (0..inflated_amount)
        .map(|_| unique[rng.gen_range(0..unique.len())])
        .collect();
    let distinct_sources: HashSet<&[u8]> = inflated
        .iter()
        .map(|&source_index| &source[source_index].sequence[..parameters.read_length])
        .collect();
    info!(
        "Sampled {} unique reads, inflated to {} reads containing {} distinct sequences",
        unique.len(),
        inflated.len(),
        distinct_sources.len()
    );

    let (region_start, region_end) = parameters.region();
    let region_length = region_end - region_start;
    let n_amount = parameters.region_n_fraction * region_length as f64;
    info!(
        "Masking {n_amount} bases in region {region_start}..{region_end} of each {} bp read",
        parameters.read_length
    );

    Ok(inflated
        .into_iter()
        .enumerate()
        .map(|(read_index, source_index)| {
            let record = &source[source_index];
            let mut sequence = record.sequence[..parameters.read_length].to_vec();

            let mut amount = n_amount.floor() as usize;
            let remainder = n_amount.fract();
            if remainder > 0.0 && rng.gen::<f64>() <= remainder {
                amount += 1;
            }
            for position in index::sample(rng, region_length, amount.min(region_length)) {
                sequence[region_start + position] = WILDCARD;
            }

            SequenceRecord::new(format!("sim_{read_index}_{}", record.id), sequence)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    use super::{simulate, SimulationParameters, MAX_INFLATION_FACTOR};
    use crate::{error::Error, record::SequenceRecord};

    fn source() -> Vec<SequenceRecord> {
        (0..100)
            .map(|index| {
                let sequence: Vec<u8> = (0..12)
                    .map(|position| b"ACGT"[(index * 7 + position * 3) % 4])
                    .collect();
                SequenceRecord::new(format!("s{index}"), sequence)
            })
            .collect()
    }

    fn parameters() -> SimulationParameters {
        SimulationParameters {
            starting_fraction: 0.2,
            inflation_factor: 1.5,
            read_length: 10,
            region_start: 0.5,
            region_end: 1.0,
            region_n_fraction: 0.4,
        }
    }

    #[test]
    fn sizes_and_masking() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let reads = simulate(&source(), &parameters(), &mut rng).unwrap();
        assert_eq!(reads.len(), 30);

        for read in &reads {
            assert!(read.id.starts_with("sim_"));
            assert_eq!(read.sequence.len(), 10);
            assert!(read.sequence[..5].iter().all(|&symbol| symbol != b'N'));
            assert_eq!(read.n_count(), 2);
        }
    }

    #[test]
    fn deterministic_for_seed() {
        let first = simulate(
            &source(),
            &parameters(),
            &mut Xoshiro256PlusPlus::seed_from_u64(5),
        )
        .unwrap();
        let second = simulate(
            &source(),
            &parameters(),
            &mut Xoshiro256PlusPlus::seed_from_u64(5),
        )
        .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn fractional_n_amount() {
        let parameters = SimulationParameters {
            region_n_fraction: 0.5,
            region_start: 0.0,
            region_end: 0.5,
            ..parameters()
        };
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let reads = simulate(&source(), &parameters, &mut rng).unwrap();
        for read in &reads {
            assert!(read.n_count() == 2 || read.n_count() == 3);
            assert!(read.sequence[5..].iter().all(|&symbol| symbol != b'N'));
        }
    }

    #[test]
    fn invalid_parameters() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);

        let invalid = SimulationParameters {
            starting_fraction: 1.5,
            ..parameters()
        };
        assert!(matches!(
            simulate(&source(), &invalid, &mut rng),
            Err(Error::FractionOutOfRange { .. })
        ));

        let invalid = SimulationParameters {
            region_n_fraction: f64::NAN,
            ..parameters()
        };
        assert!(matches!(
            simulate(&source(), &invalid, &mut rng),
            Err(Error::FractionOutOfRange { .. })
        ));

        let invalid = SimulationParameters {
            region_start: 0.8,
            region_end: 0.2,
            ..parameters()
        };
        assert!(matches!(
            simulate(&source(), &invalid, &mut rng),
            Err(Error::RegionEmpty { .. })
        ));

        let too_long = SimulationParameters {
            read_length: 13,
            ..parameters()
        };
        assert!(matches!(
            simulate(&source(), &too_long, &mut rng),
            Err(Error::SourceReadTooShort { .. })
        ));
    }

    #[test]
    fn inflation_factor_is_bounded() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        for inflation_factor in [f64::MAX, f64::INFINITY, MAX_INFLATION_FACTOR * 2.0, -1.0] {
            let invalid = SimulationParameters {
                inflation_factor,
                ..parameters()
            };
            assert!(matches!(
                simulate(&source(), &invalid, &mut rng),
                Err(Error::FractionOutOfRange { name: "inflation factor", .. })
            ));
        }

        let largest = SimulationParameters {
            inflation_factor: MAX_INFLATION_FACTOR,
            ..parameters()
        };
        let reads = simulate(&source(), &largest, &mut rng).unwrap();
        assert_eq!(reads.len(), 20_000);
    }

    #[test]
    fn empty_source() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        assert!(simulate(&[], &parameters(), &mut rng).unwrap().is_empty());
    }
}
