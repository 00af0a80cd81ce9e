//! Log-gamma, digamma and trigamma for positive arguments.
//!
//! Only the domain `x > 0` is needed: Beta shape parameters are strictly
//! positive.

use std::f64::consts::PI;

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Below this argument the recurrences shift upwards before using the
/// asymptotic series
const ASYMPTOTIC_FROM: f64 = 10.0;

/// Natural log of the gamma function (Lanczos approximation)
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // Gamma(x) = Gamma(x + 1) / x
        return ln_gamma(x + 1.0) - x.ln();
    }

    let x = x - 1.0;
    let mut sum = LANCZOS_COEFFS[0];
    for (i, &c) in LANCZOS_COEFFS.iter().enumerate().skip(1) {
        sum += c / (x + i as f64);
    }
    let t = x + LANCZOS_G + 0.5;

    0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + sum.ln()
}

/// Natural log of the Beta function
pub fn ln_beta(a: f64, b: f64) -> f64 {
    ln_gamma(a) + ln_gamma(b) - ln_gamma(a + b)
}

/// Digamma function, the derivative of `ln_gamma`
pub fn digamma(x: f64) -> f64 {
    let mut x = x;
    let mut result = 0.0;
    while x < ASYMPTOTIC_FROM {
        result -= 1.0 / x;
        x += 1.0;
    }

    let inv = 1.0 / x;
    let inv2 = inv * inv;
    result + x.ln()
        - 0.5 * inv
        - inv2
            * (1.0 / 12.0
                - inv2 * (1.0 / 120.0 - inv2 * (1.0 / 252.0 - inv2 * (1.0 / 240.0 - inv2 / 132.0))))
}

/// Trigamma function, the derivative of `digamma`
pub fn trigamma(x: f64) -> f64 {
    let mut x = x;
    let mut result = 0.0;
    while x < ASYMPTOTIC_FROM {
        result += 1.0 / (x * x);
        x += 1.0;
    }

    let inv = 1.0 / x;
    let inv2 = inv * inv;
    result
        + inv
        + 0.5 * inv2
        + inv * inv2 * (1.0 / 6.0 - inv2 * (1.0 / 30.0 - inv2 * (1.0 / 42.0 - inv2 / 30.0)))
}
