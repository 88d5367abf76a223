mod noise;
mod signal;

pub use noise::{random_partition, white_noise};
pub use signal::{impulse, sine_interleaved};
