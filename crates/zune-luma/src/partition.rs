/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Splitting image rows across workers
use core::ops::Range;

use log::debug;

use crate::errors::LumaErrors;
use crate::options::LumaOptions;

/// A contiguous run of rows handled by one worker
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RowRange {
    pub start: usize,
    pub count: usize
}

impl RowRange {
    /// One past the last row of this range
    pub const fn end(&self) -> usize {
        self.start + self.count
    }

    pub const fn as_range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Assignment of rows to workers
///
/// Ranges are ordered by worker index, contiguous and non-overlapping,
/// and together cover exactly `0..rows`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PartitionPlan {
    ranges: Vec<RowRange>
}

impl PartitionPlan {
    /// Split `rows` rows across `workers` workers
    ///
    /// With `q = rows / workers` and `r = rows % workers` the first
    /// `r` workers receive `q + 1` rows and the rest receive `q` rows,
    /// so two workers never differ by more than one row.
    ///
    /// # Errors
    /// - [`LumaErrors::ZeroWorkers`] if `workers` is zero
    /// - [`LumaErrors::TooFewRows`] if `rows < workers`, no plan is built
    pub fn new(rows: usize, workers: usize) -> Result<PartitionPlan, LumaErrors> {
        LumaOptions::default().set_workers(workers).validate(rows)?;

        let quotient = rows / workers;
        let remainder = rows % workers;

        let mut ranges = Vec::with_capacity(workers);
        let mut start = 0;

        for worker in 0..workers {
            let count = if worker < remainder {
                quotient + 1
            } else {
                quotient
            };
            ranges.push(RowRange { start, count });
            start += count;
        }
        debug_assert_eq!(start, rows);

        debug!("Partitioned {rows} rows over {workers} workers ({quotient} rows each, {remainder} with one extra)");

        Ok(PartitionPlan { ranges })
    }

    /// Build a plan from arbitrary ranges, used to feed malformed plans to the arena
    #[cfg(test)]
    pub(crate) fn from_ranges(ranges: Vec<RowRange>) -> PartitionPlan {
        PartitionPlan { ranges }
    }

    pub fn ranges(&self) -> &[RowRange] {
        &self.ranges
    }

    /// Number of workers in this plan
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Sum of rows over all ranges
    pub fn total_rows(&self) -> usize {
        self.ranges.iter().map(|x| x.count).sum()
    }

    /// Difference in rows between the largest and smallest share
    pub fn max_imbalance(&self) -> usize {
        let max = self.ranges.iter().map(|x| x.count).max().unwrap_or(0);
        let min = self.ranges.iter().map(|x| x.count).min().unwrap_or(0);
        max - min
    }
}
