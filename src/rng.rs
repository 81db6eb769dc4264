use getrandom::getrandom;
use oorandom::Rand64;

/// Source of randomness injected into the search engines.
///
/// Both engines only ever draw through this trait, so a run is a pure function
/// of its parameters and the seed of the source.
pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn rand_float(&mut self) -> f64;

    fn rand_u64(&mut self) -> u64;

    /// Uniform integer in `[0, upper)`. `upper` must be positive.
    fn rand_below(&mut self, upper: u64) -> u64;
}

impl RandomSource for Rand64 {
    fn rand_float(&mut self) -> f64 {
        Rand64::rand_float(self)
    }

    fn rand_u64(&mut self) -> u64 {
        Rand64::rand_u64(self)
    }

    fn rand_below(&mut self, upper: u64) -> u64 {
        self.rand_range(0..upper)
    }
}

pub fn rng64(seed: u128) -> Rand64 {
    Rand64::new(seed)
}

pub fn os_random_seed() -> u128 {
    let mut buf = [0; 16];
    let _res = getrandom(&mut buf);
    u128::from_le_bytes(buf)
}

/// Draws a fresh 128 bit seed, used to hand every ant its own generator.
pub fn derive_seed<R: RandomSource>(rng: &mut R) -> u128 {
    rng.rand_u64() as u128 + ((rng.rand_u64() as u128) << 64)
}

/// Uniform integer in the closed interval `[low, high]`.
/// Swapped bounds are treated as `[high, low]`.
pub fn uniform_inclusive<R: RandomSource>(rng: &mut R, low: u32, high: u32) -> u32 {
    let (low, high) = if low <= high { (low, high) } else { (high, low) };
    let span = (high - low) as u64 + 1;
    low + rng.rand_below(span) as u32
}

/// Uniform index into a collection of `len` elements, `None` if empty.
pub fn uniform_index<R: RandomSource>(rng: &mut R, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(rng.rand_below(len as u64) as usize)
    }
}

pub fn choose<'a, T, R: RandomSource>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    uniform_index(rng, items.len()).map(|idx| &items[idx])
}

/// Samples an index proportional to `weights` by walking the cumulative
/// distribution.
///
/// Negative and non-finite weights count as zero. If nothing carries weight
/// the choice falls back to a uniform draw over all indices.
pub fn weighted_index<R: RandomSource>(rng: &mut R, weights: &[f64]) -> usize {
    let usable = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
    let total: f64 = weights.iter().map(|&w| usable(w)).sum();

    if !(total.is_finite() && total > 0.0) {
        return uniform_index(rng, weights.len()).unwrap_or(0);
    }

    let target = rng.rand_float() * total;
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (idx, &weight) in weights.iter().enumerate() {
        let weight = usable(weight);
        if weight == 0.0 {
            continue;
        }
        cumulative += weight;
        last_positive = idx;
        if target < cumulative {
            return idx;
        }
    }

    // rounding can leave target a hair above the final cumulative sum
    last_positive
}
