pub mod builder;
pub mod catalog;
pub mod filter;
pub mod fir_core;
pub mod kernel;
pub mod overlap;
pub mod response;
pub mod window;

pub use builder::FilterBuilder;
pub use catalog::{
    FilterKind, bandpass_filter, bandpass_prototype_length, highpass_filter, lowpass_filter,
    mean_filter, passband_filter, windowed_length,
};
pub use filter::{Filter, filter_in_blocks};
pub use fir_core::BlockFilter;
pub use kernel::{
    compute_convolution, compute_fir_lowpass, convolve, normalize_fir, reverse_fir,
};
pub use overlap::OverlapBuffer;
pub use response::{magnitude_at, magnitude_db, response_db};
pub use window::{Window, apply_window};
