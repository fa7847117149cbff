use thiserror::Error;

/// Errors surfaced by the post-processing chain.
///
/// Configuration problems and state-machine violations are always reported to
/// the caller. Capability mismatches are deliberately *not* errors: a pass
/// with no shader variant for the chain's addressing mode is logged once at
/// registration and then skipped forever, so a single misconfigured effect
/// never takes down the whole chain.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Render targets need non-zero dimensions.
    #[error("render targets need non-zero dimensions, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    /// Sample counts are limited to what wgpu render attachments accept.
    #[error("unsupported sample count {0} (expected 0, 1, 2, 4 or 8)")]
    UnsupportedSampleCount(u32),

    /// `reinit` may change dimensions only; the pixel format, addressing mode
    /// and sample count are baked into every registered pass's pipeline.
    #[error("reinit may only change dimensions; format, addressing mode and sample count are fixed at construction")]
    IncompatibleReinit,

    /// Pass names are the lookup key for toggling; duplicates are rejected.
    #[error("a pass named '{0}' is already registered")]
    DuplicatePassName(String),

    /// `begin_capture` was called while a capture is already open, or an
    /// operation that needs the chain idle ran mid-capture.
    #[error("a capture is already open")]
    AlreadyCapturing,

    /// `end_capture` was called without a matching `begin_capture`.
    #[error("end_capture called without a matching begin_capture")]
    NotCapturing,

    /// `process` was called before any frame was captured.
    #[error("process called before any frame was captured")]
    NothingCaptured,

    /// An output handle survived a `reinit`; the texture it referred to no
    /// longer exists.
    #[error("output handle from generation {handle} is stale, chain is at generation {current}")]
    StaleOutput { handle: u64, current: u64 },

    /// GPU target allocation failed. Fatal; the chain is left untouched.
    #[error("GPU allocation failed: {0}")]
    Allocation(String),

    /// A lookup-table file did not parse.
    #[error("malformed LUT data: {0}")]
    LutParse(String),

    /// No usable GPU adapter was found for a headless context.
    #[error("no suitable GPU adapter found")]
    NoAdapter,

    /// The adapter refused to give us a device.
    #[error("device creation failed: {0}")]
    RequestDevice(String),
}
