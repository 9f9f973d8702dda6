/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Fork-join driver for one conversion
//!
//! A conversion moves through
//!
//! ```text
//! Idle -> Dispatched -> Joined -> Done
//! ```
//!
//! exactly once. Workers are spawned fresh for every image inside a
//! [`std::thread::scope`] and every one of them is joined before the
//! output is released. Timing covers dispatch to join only, decoding and
//! encoding happen outside of it.
//!
//! Every state a round passes through is recorded, a finished image
//! carries the full sequence, see [`ConvertedImage::states`].
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, trace};

use crate::arena::{BufferLayout, ConversionArena};
use crate::errors::{FaultKind, LumaErrors, WorkerFault};
use crate::options::LumaOptions;
use crate::partition::PartitionPlan;
use crate::worker::WorkerReport;
use crate::INPUT_COMPONENTS;

/// Where a conversion round currently is
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RoundState {
    /// Buffer allocated and plan built, workers not started
    Idle,
    /// Workers are running
    Dispatched,
    /// Every worker has finished
    Joined,
    /// Output ready to be handed to an encoder
    Done
}

/// Entry point of a conversion
///
/// Holds the configuration, it is consumed by [`Coordinator::prepare`]
/// so it can serve a single image only.
pub struct Coordinator {
    options: LumaOptions
}

impl Coordinator {
    pub fn new(options: LumaOptions) -> Coordinator {
        Coordinator { options }
    }

    /// Validate the configuration for an image and allocate its buffer
    ///
    /// Validation runs before the allocation, an image with fewer rows
    /// than workers never allocates anything.
    ///
    /// # Errors
    /// - Configuration errors, see [`LumaOptions::validate`]
    /// - Layout and allocation errors, see [`BufferLayout::new`] and
    ///   [`ConversionArena::allocate`]
    pub fn prepare(self, width: usize, height: usize) -> Result<PreparedRound, LumaErrors> {
        let workers = self.options.get_workers();

        self.options.validate(height)?;

        let plan = PartitionPlan::new(height, workers)?;
        let layout = BufferLayout::new(width, height, workers)?;

        debug!("Buffer layout for {width}x{height} image: {layout:?}");

        let arena = ConversionArena::allocate(layout)?;

        trace!("Round state: {:?}", RoundState::Idle);

        Ok(PreparedRound {
            plan,
            arena,
            states: vec![RoundState::Idle]
        })
    }
}

/// A conversion with its buffer allocated, waiting for input pixels
pub struct PreparedRound {
    plan:   PartitionPlan,
    arena:  ConversionArena,
    states: Vec<RoundState>
}

impl PreparedRound {
    /// Input region of the buffer, row-major interleaved RGB
    pub fn input_mut(&mut self) -> &mut [u8] {
        self.arena.input_mut()
    }

    /// Copy decoded pixels into the input region
    ///
    /// # Errors
    /// [`LumaErrors::InputLengthMismatch`] if `pixels` does not match the image size
    pub fn fill_input(&mut self, pixels: &[u8]) -> Result<(), LumaErrors> {
        self.arena.fill_input(pixels)
    }

    pub fn plan(&self) -> &PartitionPlan {
        &self.plan
    }

    pub fn layout(&self) -> &BufferLayout {
        self.arena.layout()
    }

    pub fn state(&self) -> RoundState {
        current(&self.states)
    }

    /// Run the workers and wait for all of them
    ///
    /// # Errors
    /// - Plan errors from [`ConversionArena::split`]
    /// - [`LumaErrors::WorkerFaults`] with every fault reported by the workers,
    ///   see [`aggregate`]
    ///
    /// On error the buffer is dropped, no partial output is returned.
    pub fn run(mut self) -> Result<ConvertedImage, LumaErrors> {
        let tasks = self.arena.split(&self.plan)?;
        let workers = tasks.len();

        let start = Instant::now();

        transition(&mut self.states, RoundState::Dispatched);

        let results = thread::scope(|s| {
            let handles = tasks
                .into_iter()
                .map(|task| s.spawn(move || task.run()))
                .collect::<Vec<_>>();

            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<Vec<_>>()
        });

        let elapsed = start.elapsed();
        transition(&mut self.states, RoundState::Joined);

        let reports = aggregate(&self.plan, results)?;

        transition(&mut self.states, RoundState::Done);

        let layout = *self.arena.layout();

        info!(
            "Converted {}x{} image with {} workers in {:?}",
            layout.width(),
            layout.height(),
            workers,
            elapsed
        );

        Ok(ConvertedImage {
            arena: self.arena,
            reports,
            states: self.states,
            elapsed
        })
    }
}

fn current(states: &[RoundState]) -> RoundState {
    states.last().copied().unwrap_or(RoundState::Idle)
}

fn transition(states: &mut Vec<RoundState>, next: RoundState) {
    trace!("Round state: {:?} -> {:?}", current(states), next);
    states.push(next);
}

/// Fold the joined worker results into one outcome
///
/// `results` holds one slot per worker in worker order. A panicked worker
/// becomes a [`FaultKind::Panicked`] fault at the first row of its range,
/// so no slot is lost.
///
/// # Errors
/// [`LumaErrors::WorkerFaults`] with every failed slot, in worker order
pub fn aggregate(
    plan: &PartitionPlan, results: Vec<thread::Result<Result<WorkerReport, WorkerFault>>>
) -> Result<Vec<WorkerReport>, LumaErrors> {
    let mut reports = Vec::with_capacity(results.len());
    let mut faults = vec![];

    for (worker, result) in results.into_iter().enumerate() {
        match result {
            Ok(Ok(report)) => reports.push(report),
            Ok(Err(fault)) => faults.push(fault),
            Err(_) => {
                let row = plan.ranges().get(worker).map_or(0, |x| x.start);

                faults.push(WorkerFault {
                    worker,
                    row,
                    column: 0,
                    kind: FaultKind::Panicked
                });
            }
        }
    }
    if !faults.is_empty() {
        return Err(LumaErrors::WorkerFaults(faults));
    }
    Ok(reports)
}

/// Output of a finished conversion
pub struct ConvertedImage {
    arena:   ConversionArena,
    reports: Vec<WorkerReport>,
    states:  Vec<RoundState>,
    elapsed: Duration
}

impl ConvertedImage {
    /// Luma pixels, row-major, one byte per pixel
    pub fn pixels(&self) -> &[u8] {
        self.arena.output()
    }

    /// Return the luma pixels, releasing the rest of the buffer
    pub fn into_pixels(self) -> Vec<u8> {
        self.arena.into_output()
    }

    /// Width and height of the image
    pub const fn dimensions(&self) -> (usize, usize) {
        let layout = self.arena.layout();
        (layout.width(), layout.height())
    }

    /// Time between dispatching the first worker and joining the last one
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn workers(&self) -> usize {
        self.reports.len()
    }

    /// One report per worker, in worker order
    pub fn reports(&self) -> &[WorkerReport] {
        &self.reports
    }

    pub fn state(&self) -> RoundState {
        current(&self.states)
    }

    /// Every state the round went through, starting at [`RoundState::Idle`]
    pub fn states(&self) -> &[RoundState] {
        &self.states
    }
}

/// Convert a row-major interleaved RGB image to luma in one call
///
/// # Errors
/// - [`LumaErrors::InputLengthMismatch`] if `pixels` is not `width * height * 3` bytes,
///   checked before anything is allocated
/// - Any error of [`Coordinator::prepare`] and [`PreparedRound::run`]
pub fn convert_rgb_to_luma(
    pixels: &[u8], width: usize, height: usize, options: LumaOptions
) -> Result<Vec<u8>, LumaErrors> {
    options.validate(height)?;

    let expected = width
        .checked_mul(height)
        .and_then(|x| x.checked_mul(INPUT_COMPONENTS))
        .ok_or(LumaErrors::LayoutOverflow {
            width,
            height,
            workers: options.get_workers()
        })?;

    if expected != pixels.len() {
        return Err(LumaErrors::InputLengthMismatch {
            expected,
            found: pixels.len()
        });
    }

    let mut round = Coordinator::new(options).prepare(width, height)?;
    round.fill_input(pixels)?;

    Ok(round.run()?.into_pixels())
}
