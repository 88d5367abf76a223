use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

/// Gaussian white noise with standard deviation `std_dev`.
///
/// A non-finite `std_dev` yields silence.
pub fn white_noise(len: usize, std_dev: f32, seed: Option<u64>) -> Vec<f32> {
    let mut rng = create_rng(seed);
    let Ok(normal) = Normal::new(0.0f32, std_dev.abs()) else {
        return vec![0.0; len];
    };
    (0..len).map(|_| normal.sample(&mut rng)).collect()
}

/// Random chunk sizes in `1..=max_chunk` that sum exactly to `total`.
pub fn random_partition(total: usize, max_chunk: usize, seed: Option<u64>) -> Vec<usize> {
    let mut rng = create_rng(seed);
    let max_chunk = max_chunk.max(1);
    let mut sizes = Vec::new();
    let mut remaining = total;
    while remaining > 0 {
        let size = rng.random_range(1..=max_chunk).min(remaining);
        sizes.push(size);
        remaining -= size;
    }
    sizes
}
