/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Conversion options

use crate::errors::LumaErrors;

/// Worker count used when none is configured
pub const DEFAULT_WORKERS: usize = 4;

/// Options respected by the coordinator
///
/// The worker count is fixed for the lifetime of the options,
/// it is not adjusted per image.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LumaOptions {
    workers: usize
}

impl Default for LumaOptions {
    fn default() -> Self {
        LumaOptions {
            workers: DEFAULT_WORKERS
        }
    }
}

impl LumaOptions {
    /// Get the number of workers a conversion is split across
    pub const fn get_workers(&self) -> usize {
        self.workers
    }

    /// Set the number of workers a conversion is split across
    ///
    /// # Arguments
    ///
    /// * `workers`: Number of threads spawned per image, must be non-zero
    ///   and not larger than the image height
    ///
    /// returns: LumaOptions
    pub fn set_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Check that these options can convert an image with `rows` rows
    ///
    /// # Errors
    /// - [`LumaErrors::ZeroWorkers`] if no workers were configured
    /// - [`LumaErrors::TooFewRows`] if there are fewer rows than workers
    pub fn validate(&self, rows: usize) -> Result<(), LumaErrors> {
        if self.workers == 0 {
            return Err(LumaErrors::ZeroWorkers);
        }
        if rows < self.workers {
            return Err(LumaErrors::TooFewRows {
                rows,
                workers: self.workers
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::LumaErrors;
    use crate::options::{LumaOptions, DEFAULT_WORKERS};

    #[test]
    fn default_is_fixed() {
        assert_eq!(LumaOptions::default().get_workers(), DEFAULT_WORKERS);
    }

    #[test]
    fn validate_rejects_zero_workers() {
        let opts = LumaOptions::default().set_workers(0);
        assert!(matches!(opts.validate(10), Err(LumaErrors::ZeroWorkers)));
    }

    #[test]
    fn validate_rejects_short_images() {
        let opts = LumaOptions::default().set_workers(8);
        assert!(matches!(
            opts.validate(7),
            Err(LumaErrors::TooFewRows {
                rows:    7,
                workers: 8
            })
        ));
        assert!(opts.validate(8).is_ok());
    }
}
