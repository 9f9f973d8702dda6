/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! RGB to luma conversion for a single pixel and a single scanline
//!
//! Formula for the conversion is given by
//!
//! ```text
//! Luma = 0.2126R + 0.7152G + 0.0722B
//! ```
//!
//! The weighted sum is evaluated in `f64`, left to right, and then
//! truncated toward zero. Output is bit-exact with that policy, so e.g.
//! pure white maps to 254 and not 255 since the sum lands just under 255.
use crate::INPUT_COMPONENTS;

const RED_WEIGHT: f64 = 0.2126;
const GREEN_WEIGHT: f64 = 0.7152;
const BLUE_WEIGHT: f64 = 0.0722;

/// Convert one RGB pixel to luma
///
/// Weights sum to one so the result never exceeds 255 and no clamping is done.
#[inline]
#[must_use]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let weighted = f64::from(r) * RED_WEIGHT + f64::from(g) * GREEN_WEIGHT + f64::from(b) * BLUE_WEIGHT;
    // truncate toward zero, weighted is in [0, 255]
    weighted.trunc() as u8
}

/// Convert one scanline of interleaved RGB to luma
///
/// Converts `min(input.len() / 3, output.len())` pixels, trailing
/// samples that do not form a full pixel are ignored.
pub fn luma_row(input: &[u8], output: &mut [u8]) {
    for (pixel, out) in input
        .chunks_exact(INPUT_COMPONENTS)
        .zip(output.iter_mut())
    {
        *out = luma(pixel[0], pixel[1], pixel[2]);
    }
}

#[cfg(test)]
mod tests {
    use crate::luma::{luma, luma_row};

    #[test]
    fn primaries() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 0, 0), 54);
        assert_eq!(luma(0, 255, 0), 182);
        assert_eq!(luma(0, 0, 255), 18);
    }

    #[test]
    fn truncates_instead_of_rounding() {
        // 254.99999999999997
        assert_eq!(luma(255, 255, 255), 254);
        // 142.98
        assert_eq!(luma(100, 150, 200), 142);
        // 117.64999999999999
        assert_eq!(luma(200, 100, 50), 117);
        // 18.596
        assert_eq!(luma(10, 20, 30), 18);
    }

    #[test]
    fn exact_grays_survive() {
        assert_eq!(luma(1, 1, 1), 1);
        assert_eq!(luma(128, 128, 128), 128);
    }

    #[test]
    fn deterministic_over_all_reds_and_greens() {
        for r in 0..=255_u8 {
            for g in 0..=255_u8 {
                let first = luma(r, g, 77);
                assert_eq!(first, luma(r, g, 77));
            }
        }
    }

    #[test]
    fn row_converts_each_pixel() {
        let input = [255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
        let mut output = [7; 4];
        luma_row(&input, &mut output);
        assert_eq!(output, [54, 182, 18, 254]);
    }

    #[test]
    fn row_ignores_trailing_samples() {
        let input = [255, 0, 0, 9, 9];
        let mut output = [0; 2];
        luma_row(&input, &mut output);
        assert_eq!(output, [54, 0]);
    }
}
