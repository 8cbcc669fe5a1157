//! Goodness-of-fit battery for samplers and entropy sources.
//!
//! Two families of checks, both returning a [`TestResult`] with a p-value
//! (where one is meaningful), a pass/fail determination, and a letter grade
//! (A through F):
//!
//! - **Byte-stream tests** (NIST SP 800-22 inspired): monobit, block
//!   frequency, byte frequency, runs, byte mean/variance. Bundled by
//!   [`run_byte_battery`].
//! - **Sample tests**: chi-square uniformity over bucket counts, and mean /
//!   variance checks of `f64` samples against a distribution's theoretical
//!   moments.

use statrs::distribution::{ChiSquared, ContinuousCDF};
use statrs::function::erf::erfc;

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of a single statistical test.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub p_value: Option<f64>,
    pub statistic: f64,
    pub details: String,
    pub grade: char,
}

impl TestResult {
    /// Assign a letter grade based on p-value.
    ///
    /// - A: p >= 0.1
    /// - B: p >= 0.01
    /// - C: p >= 0.001
    /// - D: p >= 0.0001
    /// - F: otherwise or None
    pub fn grade_from_p(p: Option<f64>) -> char {
        match p {
            Some(p) if p >= 0.1 => 'A',
            Some(p) if p >= 0.01 => 'B',
            Some(p) if p >= 0.001 => 'C',
            Some(p) if p >= 0.0001 => 'D',
            _ => 'F',
        }
    }

    /// Determine pass/fail from p-value against a threshold (default 0.01).
    pub fn pass_from_p(p: Option<f64>, threshold: f64) -> bool {
        match p {
            Some(p) => p >= threshold,
            None => false,
        }
    }

    /// Result graded from a p-value at the 0.01 threshold.
    fn from_p(name: &str, p: f64, statistic: f64, details: String) -> Self {
        TestResult {
            name: name.to_string(),
            passed: Self::pass_from_p(Some(p), 0.01),
            p_value: Some(p),
            statistic,
            details,
            grade: Self::grade_from_p(Some(p)),
        }
    }
}

/// Sample size, mean and unbiased variance of a set of draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleMoments {
    pub n: usize,
    pub mean: f64,
    pub variance: f64,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

/// Unpack a byte slice into individual bits (MSB first per byte).
fn to_bits(data: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(data.len() * 8);
    for &byte in data {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1);
        }
    }
    bits
}

/// Return a failing `TestResult` when data is too short.
fn insufficient(name: &str, needed: usize, got: usize) -> TestResult {
    TestResult {
        name: name.to_string(),
        passed: false,
        p_value: None,
        statistic: 0.0,
        details: format!("Insufficient data: need {needed}, got {got}"),
        grade: 'F',
    }
}

/// Upper-tail probability of a chi-square statistic, `None` for a bad `df`.
fn chi2_sf(df: f64, statistic: f64) -> Option<f64> {
    ChiSquared::new(df).ok().map(|d| d.sf(statistic))
}

/// Two-sided normal tail probability of `|z|`.
fn two_sided_p(z: f64) -> f64 {
    erfc(z.abs() / std::f64::consts::SQRT_2)
}

/// Mean and unbiased variance. Fewer than two samples give a NaN variance.
pub fn sample_moments(samples: &[f64]) -> SampleMoments {
    let n = samples.len();
    if n == 0 {
        return SampleMoments {
            n,
            mean: f64::NAN,
            variance: f64::NAN,
        };
    }
    let nf = n as f64;
    let mean = samples.iter().sum::<f64>() / nf;
    let variance = if n < 2 {
        f64::NAN
    } else {
        samples.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (nf - 1.0)
    };
    SampleMoments { n, mean, variance }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 1. SAMPLE TESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Chi-square goodness of fit of bucket counts against a uniform distribution.
///
/// Needs at least two buckets and an expected count of at least 5 per bucket.
pub fn chi_square_uniform(counts: &[u64]) -> TestResult {
    let name = "Chi-Square Uniformity";
    let k = counts.len();
    if k < 2 {
        return insufficient(name, 2, k);
    }
    let total: u64 = counts.iter().sum();
    let expected = total as f64 / k as f64;
    if expected < 5.0 {
        return insufficient(name, 5 * k, total as usize);
    }
    let chi2: f64 = counts
        .iter()
        .map(|&c| {
            let diff = c as f64 - expected;
            diff * diff / expected
        })
        .sum();
    match chi2_sf((k - 1) as f64, chi2) {
        Some(p) => TestResult::from_p(
            name,
            p,
            chi2,
            format!("buckets={k}, n={total}, expected_per_bucket={expected:.1}"),
        ),
        None => insufficient(name, 2, k),
    }
}

/// Sample mean within `sigmas` standard errors of the theoretical `mean`.
///
/// `variance` is the distribution's theoretical variance; the standard error
/// is `sqrt(variance / n)`. Pass/fail is decided by the sigma band, and the
/// reported p-value is the two-sided normal tail of the z-score.
pub fn mean_check(samples: &[f64], mean: f64, variance: f64, sigmas: f64) -> TestResult {
    let name = "Mean Check";
    let n = samples.len();
    if n < 2 {
        return insufficient(name, 2, n);
    }
    let m = sample_moments(samples);
    let se = (variance / n as f64).sqrt();
    let z = if se > 0.0 {
        (m.mean - mean).abs() / se
    } else if m.mean == mean {
        0.0
    } else {
        f64::INFINITY
    };
    let p = two_sided_p(z);
    TestResult {
        name: name.to_string(),
        passed: z <= sigmas,
        p_value: Some(p),
        statistic: z,
        details: format!("mean={:.6} (exp {mean:.6}), z={z:.2}, band={sigmas}", m.mean),
        grade: TestResult::grade_from_p(Some(p)),
    }
}

/// Sample variance within a relative tolerance of the theoretical `variance`.
///
/// No p-value: the sampling distribution of the variance depends on the
/// fourth moment, which differs per distribution.
pub fn variance_check(samples: &[f64], variance: f64, rel_tol: f64) -> TestResult {
    let name = "Variance Check";
    let n = samples.len();
    if n < 2 {
        return insufficient(name, 2, n);
    }
    let m = sample_moments(samples);
    let rel = if variance != 0.0 {
        (m.variance - variance).abs() / variance.abs()
    } else {
        m.variance.abs()
    };
    let passed = rel <= rel_tol;
    TestResult {
        name: name.to_string(),
        passed,
        p_value: None,
        statistic: rel,
        details: format!(
            "var={:.6} (exp {variance:.6}), rel_err={:.3}%",
            m.variance,
            rel * 100.0
        ),
        grade: if passed { 'A' } else { 'F' },
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 2. BYTE-STREAM TESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Monobit frequency -- proportion of 1s vs 0s should be ~50%.
pub fn monobit_frequency(data: &[u8]) -> TestResult {
    let name = "Monobit Frequency";
    let bits = to_bits(data);
    let n = bits.len();
    if n < 100 {
        return insufficient(name, 100, n);
    }
    let s: i64 = bits
        .iter()
        .map(|&b| if b == 1 { 1i64 } else { -1i64 })
        .sum();
    let s_obs = (s as f64).abs() / (n as f64).sqrt();
    let p = two_sided_p(s_obs);
    TestResult::from_p(name, p, s_obs, format!("S={s}, n={n}"))
}

/// Block frequency -- frequency within 128-bit blocks. Chi-squared test.
pub fn block_frequency(data: &[u8]) -> TestResult {
    let name = "Block Frequency";
    let block_size: usize = 128;
    let bits = to_bits(data);
    let n = bits.len();
    let num_blocks = n / block_size;
    if num_blocks < 10 {
        return insufficient(name, block_size * 10, n);
    }
    let mut chi2 = 0.0;
    for block in bits.chunks_exact(block_size) {
        let ones: usize = block.iter().map(|&b| b as usize).sum();
        let proportion = ones as f64 / block_size as f64;
        chi2 += (proportion - 0.5) * (proportion - 0.5);
    }
    chi2 *= 4.0 * block_size as f64;
    match chi2_sf(num_blocks as f64, chi2) {
        Some(p) => {
            TestResult::from_p(name, p, chi2, format!("blocks={num_blocks}, M={block_size}"))
        }
        None => insufficient(name, block_size * 10, n),
    }
}

/// Byte frequency -- chi-squared on byte value distribution (256 bins).
pub fn byte_frequency(data: &[u8]) -> TestResult {
    let name = "Byte Frequency";
    let n = data.len();
    if n < 256 {
        return insufficient(name, 256, n);
    }
    let mut hist = [0u64; 256];
    for &b in data {
        hist[b as usize] += 1;
    }
    let mut result = chi_square_uniform(&hist);
    result.name = name.to_string();
    result
}

/// Runs test -- number of uninterrupted runs of 0s or 1s.
pub fn runs_test(data: &[u8]) -> TestResult {
    let name = "Runs Test";
    let bits = to_bits(data);
    let n = bits.len();
    if n < 100 {
        return insufficient(name, 100, n);
    }
    let ones: usize = bits.iter().map(|&b| b as usize).sum();
    let prop = ones as f64 / n as f64;
    if (prop - 0.5).abs() >= 2.0 / (n as f64).sqrt() {
        return TestResult {
            name: name.to_string(),
            passed: false,
            p_value: Some(0.0),
            statistic: 0.0,
            details: format!("Pre-test failed: proportion={prop:.4}"),
            grade: 'F',
        };
    }
    let runs = 1 + bits.windows(2).filter(|w| w[0] != w[1]).count();
    let expected = 2.0 * n as f64 * prop * (1.0 - prop) + 1.0;
    let std = 2.0 * (2.0 * n as f64).sqrt() * prop * (1.0 - prop);
    let z = (runs as f64 - expected).abs() / std;
    let p = two_sided_p(z);
    TestResult::from_p(name, p, z, format!("runs={runs}, expected={expected:.0}"))
}

/// Mean and variance -- mean (~127.5) and variance (~5461.25) of uniform bytes.
pub fn mean_variance(data: &[u8]) -> TestResult {
    let name = "Mean & Variance";
    let n = data.len();
    if n < 50 {
        return insufficient(name, 50, n);
    }
    let arr: Vec<f64> = data.iter().map(|&b| b as f64).collect();
    let m = sample_moments(&arr);
    let nf = n as f64;

    let expected_mean = 127.5;
    let expected_var = (256.0 * 256.0 - 1.0) / 12.0; // 5461.25

    let z_mean = (m.mean - expected_mean).abs() / (expected_var / nf).sqrt();
    let p_mean = two_sided_p(z_mean);

    let chi2_var = (nf - 1.0) * m.variance / expected_var;
    let Ok(chi_dist) = ChiSquared::new(nf - 1.0) else {
        return insufficient(name, 50, n);
    };
    let p_var = 2.0 * chi_dist.cdf(chi2_var).min(chi_dist.sf(chi2_var));

    let p = p_mean.min(p_var);
    TestResult::from_p(
        name,
        p,
        z_mean,
        format!(
            "mean={:.2} (exp 127.5), var={:.1} (exp {expected_var:.1})",
            m.mean, m.variance
        ),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// Test battery
// ═══════════════════════════════════════════════════════════════════════════════

/// Run every byte-stream test on a byte slice.
pub fn run_byte_battery(data: &[u8]) -> Vec<TestResult> {
    let tests: [fn(&[u8]) -> TestResult; 5] = [
        monobit_frequency,
        block_frequency,
        byte_frequency,
        runs_test,
        mean_variance,
    ];

    tests
        .iter()
        .map(|test_fn| {
            match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| test_fn(data))) {
                Ok(result) => result,
                Err(_) => TestResult {
                    name: "Unknown".to_string(),
                    passed: false,
                    p_value: None,
                    statistic: 0.0,
                    details: "Test panicked".to_string(),
                    grade: 'F',
                },
            }
        })
        .collect()
}

/// Calculate overall quality score (0-100) from test results.
///
/// Each grade maps to a score: A=100, B=75, C=50, D=25, F=0.
/// Returns the average across all tests.
pub fn calculate_quality_score(results: &[TestResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let total: f64 = results
        .iter()
        .map(|r| match r.grade {
            'A' => 100.0,
            'B' => 75.0,
            'C' => 50.0,
            'D' => 25.0,
            _ => 0.0,
        })
        .sum();
    total / results.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Generate pseudo-random data for testing (simple LCG).
    fn pseudo_random(n: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(n);
        let mut state: u64 = 0xDEAD_BEEF_CAFE_BABE;
        for _ in 0..n {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            data.push((state >> 33) as u8);
        }
        data
    }

    #[test]
    fn test_to_bits() {
        let data = [0b10110001u8];
        let bits = to_bits(&data);
        assert_eq!(bits, vec![1, 0, 1, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn test_grade_from_p() {
        assert_eq!(TestResult::grade_from_p(Some(0.5)), 'A');
        assert_eq!(TestResult::grade_from_p(Some(0.05)), 'B');
        assert_eq!(TestResult::grade_from_p(Some(0.005)), 'C');
        assert_eq!(TestResult::grade_from_p(Some(0.0005)), 'D');
        assert_eq!(TestResult::grade_from_p(Some(0.00000001)), 'F');
        assert_eq!(TestResult::grade_from_p(None), 'F');
    }

    #[test]
    fn test_pass_from_p() {
        assert!(TestResult::pass_from_p(Some(0.05), 0.01));
        assert!(!TestResult::pass_from_p(Some(0.005), 0.01));
        assert!(!TestResult::pass_from_p(None, 0.01));
    }

    #[test]
    fn test_insufficient_data() {
        let result = monobit_frequency(&[0u8; 5]);
        assert!(!result.passed);
        assert!(result.details.contains("Insufficient"));
        assert!(!chi_square_uniform(&[10]).passed);
        assert!(!chi_square_uniform(&[1, 1, 1]).passed);
        assert!(!mean_check(&[1.0], 1.0, 1.0, 3.0).passed);
    }

    #[test]
    fn test_sample_moments() {
        let m = sample_moments(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(m.n, 4);
        assert!((m.mean - 2.5).abs() < 1e-12);
        assert!((m.variance - 5.0 / 3.0).abs() < 1e-12);
        assert!(sample_moments(&[]).mean.is_nan());
        assert!(sample_moments(&[7.0]).variance.is_nan());
    }

    #[test]
    fn test_chi_square_uniform_flat_passes() {
        let result = chi_square_uniform(&[1000, 1010, 990, 1005, 995]);
        assert!(result.passed, "{result:?}");
        assert_eq!(result.grade, 'A');
    }

    #[test]
    fn test_chi_square_uniform_skewed_fails() {
        let result = chi_square_uniform(&[2000, 1000, 1000, 1000]);
        assert!(!result.passed);
        assert_eq!(result.grade, 'F');
    }

    #[test]
    fn test_mean_check_band() {
        // mean 0.5, population variance 1/12 for U(0,1): a grid is centered.
        let samples: Vec<f64> = (0..1000).map(|i| (i as f64 + 0.5) / 1000.0).collect();
        assert!(mean_check(&samples, 0.5, 1.0 / 12.0, 3.0).passed);
        assert!(!mean_check(&samples, 0.6, 1.0 / 12.0, 3.0).passed);
    }

    #[test]
    fn test_mean_check_zero_variance() {
        let samples = [2.0; 10];
        assert!(mean_check(&samples, 2.0, 0.0, 1.0).passed);
        assert!(!mean_check(&samples, 3.0, 0.0, 1.0).passed);
    }

    #[test]
    fn test_variance_check() {
        let samples: Vec<f64> = (0..1000).map(|i| (i as f64 + 0.5) / 1000.0).collect();
        assert!(variance_check(&samples, 1.0 / 12.0, 0.01).passed);
        assert!(!variance_check(&samples, 0.5, 0.1).passed);
        assert!(variance_check(&samples, 1.0 / 12.0, 0.01).p_value.is_none());
    }

    #[test]
    fn test_constant_data_fails() {
        let data = vec![0u8; 1000];
        let results = run_byte_battery(&data);
        assert!(results.iter().all(|r| !r.passed), "{results:?}");
    }

    #[test]
    fn test_pseudo_random_passes() {
        let data = pseudo_random(10000);
        let results = run_byte_battery(&data);
        let passed_count = results.iter().filter(|r| r.passed).count();
        assert!(
            passed_count > results.len() / 2,
            "Only {passed_count}/{} tests passed",
            results.len()
        );
    }

    #[test]
    fn test_byte_frequency_named() {
        let result = byte_frequency(&pseudo_random(4096));
        assert_eq!(result.name, "Byte Frequency");
        assert!(result.p_value.is_some());
    }

    #[test]
    fn test_quality_score() {
        let results = vec![
            TestResult {
                name: "A".into(),
                passed: true,
                p_value: Some(0.5),
                statistic: 0.0,
                details: String::new(),
                grade: 'A',
            },
            TestResult {
                name: "F".into(),
                passed: false,
                p_value: Some(0.0),
                statistic: 0.0,
                details: String::new(),
                grade: 'F',
            },
        ];
        let score = calculate_quality_score(&results);
        assert!((score - 50.0).abs() < 0.01);
    }

    #[test]
    fn test_battery_size() {
        assert_eq!(run_byte_battery(&pseudo_random(10000)).len(), 5);
    }

    #[test]
    fn test_calculate_quality_score_empty() {
        assert_eq!(calculate_quality_score(&[]), 0.0);
    }
}
