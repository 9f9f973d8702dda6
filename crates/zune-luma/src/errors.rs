/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during a luma conversion
use std::fmt::{Debug, Display, Formatter};

/// What went wrong inside a single worker
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum FaultKind {
    /// The input view ends before the coordinate
    InputOutOfBounds,
    /// The output view ends before the coordinate
    OutputOutOfBounds,
    /// The descriptor in the shared buffer disagrees with the task handed to the worker
    DescriptorMismatch,
    /// The worker thread panicked before reporting, the coordinate is the start of its range
    Panicked
}

/// A failure reported by one worker, with the offending coordinate
///
/// `row` is an absolute image row, `column` is a pixel index within that row.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct WorkerFault {
    pub worker: usize,
    pub row:    usize,
    pub column: usize,
    pub kind:   FaultKind
}

/// All errors that can occur while converting an image
///
/// Every variant is fatal for the conversion, there is
/// never partial output.
pub enum LumaErrors {
    /// Worker count was configured as zero
    ZeroWorkers,
    /// Image has fewer rows than workers
    TooFewRows { rows: usize, workers: usize },
    /// Image width is zero
    ZeroWidth,
    /// Buffer size does not fit in a usize
    LayoutOverflow {
        width:   usize,
        height:  usize,
        workers: usize
    },
    /// The single buffer allocation failed, contains the requested size in bytes
    AllocationFailed(usize),
    /// Input pixels do not match the dimensions of the image
    InputLengthMismatch { expected: usize, found: usize },
    /// A partition plan was not contiguous and could not be split
    OverlappingRanges {
        worker:         usize,
        expected_start: usize,
        found_start:    usize
    },
    /// A partition plan does not cover the buffer it is applied to
    PlanMismatch {
        planned_rows:    usize,
        rows:            usize,
        planned_workers: usize,
        workers:         usize
    },
    /// One or more workers failed or panicked, collected after the join
    WorkerFaults(Vec<WorkerFault>)
}

impl Debug for FaultKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputOutOfBounds => write!(f, "input out of bounds"),
            Self::OutputOutOfBounds => write!(f, "output out of bounds"),
            Self::DescriptorMismatch => write!(f, "task descriptor mismatch"),
            Self::Panicked => write!(f, "panicked")
        }
    }
}

impl Debug for WorkerFault {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "worker {}: {:?} at row {}, column {}",
            self.worker, self.kind, self.row, self.column
        )
    }
}

impl Debug for LumaErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroWorkers => writeln!(f, "Worker count must be greater than zero"),
            Self::TooFewRows { rows, workers } => {
                writeln!(
                    f,
                    "Cannot distribute {rows} rows over {workers} workers, the image needs at least one row per worker"
                )
            }
            Self::ZeroWidth => writeln!(f, "Image width must be greater than zero"),
            Self::LayoutOverflow {
                width,
                height,
                workers
            } => {
                writeln!(
                    f,
                    "Buffer for a {width}x{height} image with {workers} workers overflows usize"
                )
            }
            Self::AllocationFailed(size) => {
                writeln!(f, "Failed to allocate {size} bytes for the conversion buffer")
            }
            Self::InputLengthMismatch { expected, found } => {
                writeln!(
                    f,
                    "Input length mismatch, expected {expected} bytes but found {found}"
                )
            }
            Self::OverlappingRanges {
                worker,
                expected_start,
                found_start
            } => {
                writeln!(
                    f,
                    "Range for worker {worker} starts at row {found_start}, expected row {expected_start}"
                )
            }
            Self::PlanMismatch {
                planned_rows,
                rows,
                planned_workers,
                workers
            } => {
                writeln!(
                    f,
                    "Plan covers {planned_rows} rows with {planned_workers} workers but the buffer holds {rows} rows for {workers} workers"
                )
            }
            Self::WorkerFaults(faults) => {
                writeln!(f, "{} worker(s) failed", faults.len())?;
                for fault in faults {
                    writeln!(f, "  {fault:?}")?;
                }
                Ok(())
            }
        }
    }
}

impl Display for LumaErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{self:?}")
    }
}

impl std::error::Error for LumaErrors {}

impl From<Vec<WorkerFault>> for LumaErrors {
    fn from(faults: Vec<WorkerFault>) -> Self {
        LumaErrors::WorkerFaults(faults)
    }
}
