//! Error types for toolpath generation.

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("depth {depth} is above the supported maximum of {max}")]
    DepthTooLarge { depth: u32, max: u32 },

    #[error("angle must be non-zero; its sign selects the curve orientation")]
    ZeroAngle,

    #[error("step size must be non-zero")]
    ZeroStep,

    #[error("plot would reach coordinates beyond +/-{max}")]
    CoordinateOutOfRange { max: u64 },

    #[error("failed to write program: {0}")]
    Io(#[from] std::io::Error),
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;
