use num_complex::Complex;
use std::f32::consts::PI;

/// Which transform implementation to run. Both produce identical output;
/// the iterative one keeps the stack flat for constrained targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftAlgorithm {
    Recursive,
    Iterative,
}

pub struct FftEngine {
    size: usize,
    algorithm: FftAlgorithm,
}

impl FftEngine {
    /// `size` must be a power of two (checked by `Config::validate`).
    pub fn new(size: usize, algorithm: FftAlgorithm) -> Self {
        debug_assert!(size.is_power_of_two());
        Self { size, algorithm }
    }

    /// Transform a real sample block into the full complex spectrum.
    pub fn transform(&self, block: &[f32], out: &mut Vec<Complex<f32>>) {
        debug_assert_eq!(block.len(), self.size);
        out.resize(self.size, Complex::new(0.0, 0.0));
        match self.algorithm {
            FftAlgorithm::Recursive => fft_recursive(block, out),
            FftAlgorithm::Iterative => fft_iterative(block, out),
        }
    }
}

/// Decimation-in-time radix-2 Cooley–Tukey over a real input block.
/// Recursion depth is log2(N).
pub fn fft_recursive(block: &[f32], out: &mut [Complex<f32>]) {
    debug_assert_eq!(block.len(), out.len());
    fft_split(block, 1, out);
}

fn fft_split(x: &[f32], stride: usize, out: &mut [Complex<f32>]) {
    let n = out.len();
    if n == 1 {
        out[0] = Complex::new(x[0], 0.0);
        return;
    }

    // Even-indexed samples transform into the lower half, odd-indexed into
    // the upper half, each seen through a doubled stride.
    let (lower, upper) = out.split_at_mut(n / 2);
    fft_split(x, stride * 2, lower);
    fft_split(&x[stride..], stride * 2, upper);

    for i in 0..n / 2 {
        let t = lower[i];
        let u = upper[i];
        let w = twiddle(i, n);
        lower[i] = t + w * u;
        upper[i] = t - w * u;
    }
}

/// Iterative in-place equivalent: bit-reversal permutation, then log2(N)
/// butterfly passes over doubling block lengths.
pub fn fft_iterative(block: &[f32], out: &mut [Complex<f32>]) {
    let n = block.len();
    debug_assert_eq!(n, out.len());
    if n == 1 {
        out[0] = Complex::new(block[0], 0.0);
        return;
    }

    let bits = n.trailing_zeros();
    for (i, &x) in block.iter().enumerate() {
        out[bit_reverse(i, bits)] = Complex::new(x, 0.0);
    }

    let mut len = 2;
    while len <= n {
        let half = len / 2;
        for start in (0..n).step_by(len) {
            for i in 0..half {
                let t = out[start + i];
                let u = twiddle(i, len) * out[start + i + half];
                out[start + i] = t + u;
                out[start + i + half] = t - u;
            }
        }
        len *= 2;
    }
}

// Recomputed per butterfly rather than cached; at N=128 a table buys nothing
// measurable.
fn twiddle(i: usize, n: usize) -> Complex<f32> {
    Complex::from_polar(1.0, -2.0 * PI * i as f32 / n as f32)
}

fn bit_reverse(i: usize, bits: u32) -> usize {
    i.reverse_bits() >> (usize::BITS - bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum(block: &[f32], algorithm: FftAlgorithm) -> Vec<Complex<f32>> {
        let engine = FftEngine::new(block.len(), algorithm);
        let mut out = Vec::new();
        engine.transform(block, &mut out);
        out
    }

    /// Deterministic block with energy spread across several frequencies.
    fn mixed_block(n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                (2.0 * PI * 3.0 * t).sin()
                    + 0.5 * (2.0 * PI * 17.0 * t).cos()
                    + 0.25 * (2.0 * PI * 40.0 * t).sin()
            })
            .collect()
    }

    #[test]
    fn single_sample_is_identity() {
        for algorithm in [FftAlgorithm::Recursive, FftAlgorithm::Iterative] {
            let out = spectrum(&[42.5], algorithm);
            assert_eq!(out.len(), 1);
            assert_eq!(out[0].re, 42.5);
            assert_eq!(out[0].im, 0.0);
        }
    }

    #[test]
    fn zero_block_transforms_to_zero() {
        let out = spectrum(&[0.0; 128], FftAlgorithm::Recursive);
        assert!(out.iter().all(|c| c.norm() == 0.0));
    }

    #[test]
    fn recursive_and_iterative_agree() {
        let block = mixed_block(128);
        let rec = spectrum(&block, FftAlgorithm::Recursive);
        let it = spectrum(&block, FftAlgorithm::Iterative);
        for (a, b) in rec.iter().zip(&it) {
            assert!((a - b).norm() < 1e-3, "{a} vs {b}");
        }
    }

    #[test]
    fn matches_rustfft_oracle() {
        use rustfft::FftPlanner;

        let block = mixed_block(128);
        let mut oracle: Vec<Complex<f32>> =
            block.iter().map(|&x| Complex::new(x, 0.0)).collect();
        FftPlanner::new().plan_fft_forward(128).process(&mut oracle);

        for algorithm in [FftAlgorithm::Recursive, FftAlgorithm::Iterative] {
            let ours = spectrum(&block, algorithm);
            for (a, b) in ours.iter().zip(&oracle) {
                assert!((a - b).norm() < 1e-2, "{a} vs {b}");
            }
        }
    }

    #[test]
    fn aligned_sine_concentrates_energy_in_its_bin() {
        let n = 128;
        let k = 8;
        let block: Vec<f32> = (0..n)
            .map(|i| (2.0 * PI * k as f32 * i as f32 / n as f32).sin())
            .collect();

        let out = spectrum(&block, FftAlgorithm::Recursive);
        let energy: Vec<f32> = out[..n / 2].iter().map(|c| c.norm_sqr()).collect();
        let total: f32 = energy.iter().sum();
        let near: f32 = energy[k - 1..=k + 1].iter().sum();
        assert!(
            near >= 0.9 * total,
            "bin {k}±1 holds {near} of {total} total energy"
        );
    }
}
