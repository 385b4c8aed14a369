use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
pub enum Error {
    /// Product files are resolved at startup. A missing file is a
    /// configuration issue and the simulation must not start.
    #[error("gnss product file not found: {0}")]
    FileNotFound(String),

    #[error("failed to read gnss product file {0}")]
    FileRead(String),

    /// Product sort (naming convention tag) is not recognized
    #[error("unknown product sort \"{0}\"")]
    UnknownProductSort(String),

    /// First file name does not follow the expected naming convention
    #[error("invalid product file name \"{0}\"")]
    InvalidFileName(String),

    /// Generated file sequence never reached the last file
    #[error("file sequence from \"{0}\" never reaches \"{1}\"")]
    UnterminatedSequence(String, String),

    #[error("invalid ultra-rapid segment \"{0}\"")]
    InvalidUltraRapidMode(String),

    /// Predicted segments only exist in orbit products
    #[error("clock products do not have predicted ultra-rapid segments")]
    PredictedClockSegment,

    #[error("invalid interpolation method \"{0}\"")]
    InvalidInterpolationMethod(String),

    /// Interpolation windows need at least one sample
    #[error("invalid interpolation number {0}")]
    InvalidInterpolationNumber(usize),

    /// Orbit product header could not be interpreted
    #[error("malformed product header: {0}")]
    MalformedHeader(String),

    /// Calendar fields do not describe an existing instant
    #[error("invalid calendar time {0}")]
    InvalidCalendarTime(String),

    /// Simulation instants must be finite
    #[error("invalid simulation time {0} s")]
    NonFiniteTime(f64),

    #[error("engine is not set up")]
    NotSetUp,

    /// Windows only slide forward: time must never decrease
    #[error("non monotonic time: {requested} s requested after {previous} s")]
    NonMonotonicTime { previous: f64, requested: f64 },
}
