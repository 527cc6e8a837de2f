use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("FASTQ parse error: {0}")]
    Fastq(#[from] bio::io::fastq::Error),

    #[error("logger initialisation error: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("cannot determine the input format from file extension {0:?}")]
    UnsupportedInputFormat(String),

    #[error("record {id:?} contains the symbol {symbol:?} at position {position}, which is not in the allowed alphabet")]
    InvalidSymbol {
        id: String,
        symbol: char,
        position: usize,
    },

    #[error("the given parameter {name} = {value} is out of range [{minimum}, {maximum}]")]
    FractionOutOfRange {
        name: &'static str,
        value: f64,
        minimum: f64,
        maximum: f64,
    },

    #[error("the given N region start {start} is greater than its end {end}")]
    RegionEmpty { start: f64, end: f64 },

    #[error("the source read {id:?} of length {length} is shorter than the read length {read_length}")]
    SourceReadTooShort {
        id: String,
        length: usize,
        read_length: usize,
    },
}
