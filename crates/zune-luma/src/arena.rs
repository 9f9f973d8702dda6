/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The single buffer backing a conversion
//!
//! One allocation is split into three regions laid out back to back
//!
//! ```text
//! | input: height * width * 3 | output: height * width | tasks: workers * TASK_DESCRIPTOR_SIZE |
//! ```
//!
//! The arena hands each worker a shared view of its input rows and an
//! exclusive view of its output rows. Views are carved with `split_at_mut`
//! from a plan that must be contiguous, so overlapping writes cannot be
//! expressed.
use core::mem::size_of;

use bytemuck::{Pod, Zeroable};
use log::{debug, trace};

use crate::errors::LumaErrors;
use crate::partition::PartitionPlan;
use crate::worker::WorkerTask;
use crate::{INPUT_COMPONENTS, OUTPUT_COMPONENTS};

/// Per-worker record stored in the task region of the buffer
///
/// Written once before dispatch and only read afterwards.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Pod, Zeroable)]
pub struct TaskDescriptor {
    pub worker:    u64,
    pub start_row: u64,
    pub row_count: u64,
    pub width:     u64
}

/// Size in bytes of one [`TaskDescriptor`] in the task region
pub const TASK_DESCRIPTOR_SIZE: usize = size_of::<TaskDescriptor>();

impl TaskDescriptor {
    /// Read the descriptor of `worker` from a task region
    ///
    /// Returns `None` if the region is too small to hold it
    pub fn read(region: &[u8], worker: usize) -> Option<TaskDescriptor> {
        let start = worker.checked_mul(TASK_DESCRIPTOR_SIZE)?;
        let bytes = region.get(start..start.checked_add(TASK_DESCRIPTOR_SIZE)?)?;

        Some(bytemuck::pod_read_unaligned(bytes))
    }

    fn write(&self, region: &mut [u8], worker: usize) {
        let start = worker * TASK_DESCRIPTOR_SIZE;
        region[start..start + TASK_DESCRIPTOR_SIZE].copy_from_slice(bytemuck::bytes_of(self));
    }
}

/// Offsets and strides of the three regions
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BufferLayout {
    width:         usize,
    height:        usize,
    workers:       usize,
    input_stride:  usize,
    output_stride: usize,
    output_offset: usize,
    tasks_offset:  usize,
    total_size:    usize
}

impl BufferLayout {
    /// Compute the layout for a `width` x `height` image split over `workers`
    ///
    /// # Errors
    /// - [`LumaErrors::ZeroWidth`] for a zero width image
    /// - [`LumaErrors::LayoutOverflow`] if any region size overflows
    pub fn new(width: usize, height: usize, workers: usize) -> Result<BufferLayout, LumaErrors> {
        if width == 0 {
            return Err(LumaErrors::ZeroWidth);
        }
        let overflow = || LumaErrors::LayoutOverflow {
            width,
            height,
            workers
        };

        let input_stride = width.checked_mul(INPUT_COMPONENTS).ok_or_else(overflow)?;
        let output_stride = width.checked_mul(OUTPUT_COMPONENTS).ok_or_else(overflow)?;

        let input_len = height.checked_mul(input_stride).ok_or_else(overflow)?;
        let output_len = height.checked_mul(output_stride).ok_or_else(overflow)?;
        let tasks_len = workers
            .checked_mul(TASK_DESCRIPTOR_SIZE)
            .ok_or_else(overflow)?;

        let output_offset = input_len;
        let tasks_offset = output_offset.checked_add(output_len).ok_or_else(overflow)?;
        let total_size = tasks_offset.checked_add(tasks_len).ok_or_else(overflow)?;

        Ok(BufferLayout {
            width,
            height,
            workers,
            input_stride,
            output_stride,
            output_offset,
            tasks_offset,
            total_size
        })
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Bytes in one input row
    pub const fn input_stride(&self) -> usize {
        self.input_stride
    }

    /// Bytes in one output row
    pub const fn output_stride(&self) -> usize {
        self.output_stride
    }

    pub const fn input_len(&self) -> usize {
        self.output_offset
    }

    pub const fn output_len(&self) -> usize {
        self.tasks_offset - self.output_offset
    }

    pub const fn tasks_len(&self) -> usize {
        self.total_size - self.tasks_offset
    }

    pub const fn output_offset(&self) -> usize {
        self.output_offset
    }

    pub const fn tasks_offset(&self) -> usize {
        self.tasks_offset
    }

    /// Size of the whole allocation
    pub const fn total_size(&self) -> usize {
        self.total_size
    }

    /// Offset of `row` within the input region
    pub const fn input_row_offset(&self, row: usize) -> usize {
        row * self.input_stride
    }

    /// Offset of `row` within the output region
    pub const fn output_row_offset(&self, row: usize) -> usize {
        row * self.output_stride
    }
}

/// Owner of the single allocation used by one conversion
pub struct ConversionArena {
    layout: BufferLayout,
    buffer: Vec<u8>
}

impl ConversionArena {
    /// Allocate one zeroed block large enough for every region of `layout`
    ///
    /// # Errors
    /// [`LumaErrors::AllocationFailed`] if the allocator cannot provide the block.
    /// There is no retry.
    pub fn allocate(layout: BufferLayout) -> Result<ConversionArena, LumaErrors> {
        let size = layout.total_size();
        let mut buffer = Vec::new();

        buffer
            .try_reserve_exact(size)
            .map_err(|_| LumaErrors::AllocationFailed(size))?;
        buffer.resize(size, 0);

        debug!(
            "Allocated {} bytes (input {}, output {}, tasks {})",
            size,
            layout.input_len(),
            layout.output_len(),
            layout.tasks_len()
        );

        Ok(ConversionArena { layout, buffer })
    }

    pub const fn layout(&self) -> &BufferLayout {
        &self.layout
    }

    /// Input region, for decoders to write RGB rows into
    pub fn input_mut(&mut self) -> &mut [u8] {
        &mut self.buffer[..self.layout.input_len()]
    }

    pub fn input(&self) -> &[u8] {
        &self.buffer[..self.layout.input_len()]
    }

    /// Copy already decoded RGB pixels into the input region
    ///
    /// # Errors
    /// [`LumaErrors::InputLengthMismatch`] if `pixels` is not exactly the size of the region
    pub fn fill_input(&mut self, pixels: &[u8]) -> Result<(), LumaErrors> {
        let input = self.input_mut();

        if input.len() != pixels.len() {
            return Err(LumaErrors::InputLengthMismatch {
                expected: input.len(),
                found:    pixels.len()
            });
        }
        input.copy_from_slice(pixels);
        Ok(())
    }

    /// Output region, luma rows
    pub fn output(&self) -> &[u8] {
        &self.buffer[self.layout.output_offset()..self.layout.tasks_offset()]
    }

    /// Task descriptor region
    pub fn tasks(&self) -> &[u8] {
        &self.buffer[self.layout.tasks_offset()..]
    }

    /// Consume the arena returning only the output region
    pub fn into_output(self) -> Vec<u8> {
        let mut buffer = self.buffer;
        buffer.truncate(self.layout.tasks_offset());
        buffer.drain(..self.layout.output_offset());
        buffer
    }

    /// Write one descriptor per worker and lend every worker its rows
    ///
    /// The returned tasks borrow the arena, the input region and the task
    /// region are shared and read-only while they exist, the output region is
    /// handed out as one exclusive slice per worker.
    ///
    /// # Errors
    /// - [`LumaErrors::PlanMismatch`] if the plan does not cover every row or
    ///   has a different worker count than the layout
    /// - [`LumaErrors::OverlappingRanges`] if a range does not start where the
    ///   previous one ended
    pub fn split(&mut self, plan: &PartitionPlan) -> Result<Vec<WorkerTask<'_>>, LumaErrors> {
        let layout = self.layout;

        if plan.total_rows() != layout.height() || plan.len() != layout.workers() {
            return Err(LumaErrors::PlanMismatch {
                planned_rows:    plan.total_rows(),
                rows:            layout.height(),
                planned_workers: plan.len(),
                workers:         layout.workers()
            });
        }

        let (input, rest) = self.buffer.split_at_mut(layout.input_len());
        let (mut output, tasks) = rest.split_at_mut(layout.output_len());

        let mut expected_start = 0;

        for (worker, range) in plan.ranges().iter().enumerate() {
            if range.start != expected_start {
                return Err(LumaErrors::OverlappingRanges {
                    worker,
                    expected_start,
                    found_start: range.start
                });
            }
            expected_start = range.end();

            TaskDescriptor {
                worker:    worker as u64,
                start_row: range.start as u64,
                row_count: range.count as u64,
                width:     layout.width() as u64
            }
            .write(tasks, worker);
        }
        // read-only from here on
        let input: &[u8] = input;
        let tasks: &[u8] = tasks;

        let mut worker_tasks = Vec::with_capacity(plan.len());
        let mut input_rows = input;

        for (worker, range) in plan.ranges().iter().enumerate() {
            let (worker_input, input_rest) =
                input_rows.split_at(layout.input_row_offset(range.count));
            let (worker_output, output_rest) =
                core::mem::take(&mut output).split_at_mut(layout.output_row_offset(range.count));

            input_rows = input_rest;
            output = output_rest;

            trace!(
                "Worker {worker} gets rows {:?}, {} input bytes, {} output bytes",
                range.as_range(),
                worker_input.len(),
                worker_output.len()
            );

            worker_tasks.push(WorkerTask::new(
                worker,
                *range,
                layout.width(),
                worker_input,
                worker_output,
                tasks
            ));
        }

        Ok(worker_tasks)
    }
}

#[cfg(test)]
mod tests {
    use crate::arena::{BufferLayout, ConversionArena, TaskDescriptor, TASK_DESCRIPTOR_SIZE};
    use crate::errors::LumaErrors;
    use crate::partition::{PartitionPlan, RowRange};

    #[test]
    fn layout_offsets() {
        let layout = BufferLayout::new(5, 9, 4).unwrap();

        assert_eq!(layout.input_stride(), 15);
        assert_eq!(layout.output_stride(), 5);
        assert_eq!(layout.input_len(), 135);
        assert_eq!(layout.output_offset(), 135);
        assert_eq!(layout.output_len(), 45);
        assert_eq!(layout.tasks_offset(), 180);
        assert_eq!(layout.tasks_len(), 4 * TASK_DESCRIPTOR_SIZE);
        assert_eq!(layout.total_size(), 180 + 4 * TASK_DESCRIPTOR_SIZE);
        assert_eq!(layout.input_row_offset(3), 45);
        assert_eq!(layout.output_row_offset(3), 15);
    }

    #[test]
    fn layout_rejects_zero_width() {
        assert!(matches!(
            BufferLayout::new(0, 9, 4),
            Err(LumaErrors::ZeroWidth)
        ));
    }

    #[test]
    fn layout_detects_overflow() {
        assert!(matches!(
            BufferLayout::new(usize::MAX / 2, 2, 1),
            Err(LumaErrors::LayoutOverflow { .. })
        ));
    }

    #[test]
    fn fill_input_checks_length() {
        let layout = BufferLayout::new(2, 2, 1).unwrap();
        let mut arena = ConversionArena::allocate(layout).unwrap();

        assert!(matches!(
            arena.fill_input(&[0; 11]),
            Err(LumaErrors::InputLengthMismatch {
                expected: 12,
                found:    11
            })
        ));
        arena.fill_input(&[9; 12]).unwrap();
        assert!(arena.input().iter().all(|x| *x == 9));
        assert!(arena.output().iter().all(|x| *x == 0));
    }

    #[test]
    fn split_writes_descriptors_and_disjoint_views() {
        let layout = BufferLayout::new(3, 9, 4).unwrap();
        let plan = PartitionPlan::new(9, 4).unwrap();
        let mut arena = ConversionArena::allocate(layout).unwrap();

        let tasks = arena.split(&plan).unwrap();
        assert_eq!(tasks.len(), 4);

        let mut output_bytes = 0;
        for (task, range) in tasks.iter().zip(plan.ranges()) {
            assert_eq!(task.rows(), *range);
            assert_eq!(task.input().len(), range.count * 9);
            output_bytes += task.output_len();
        }
        assert_eq!(output_bytes, layout.output_len());
        drop(tasks);

        let descriptor = TaskDescriptor::read(arena.tasks(), 2).unwrap();
        assert_eq!(
            descriptor,
            TaskDescriptor {
                worker:    2,
                start_row: 5,
                row_count: 2,
                width:     3
            }
        );
        assert!(TaskDescriptor::read(arena.tasks(), 4).is_none());
    }

    #[test]
    fn split_rejects_gaps() {
        let layout = BufferLayout::new(3, 4, 2).unwrap();
        let plan = PartitionPlan::from_ranges(vec![
            RowRange { start: 0, count: 1 },
            RowRange { start: 1, count: 3 }
        ]);
        let mut arena = ConversionArena::allocate(layout).unwrap();
        assert!(arena.split(&plan).is_ok());

        let bad = PartitionPlan::from_ranges(vec![
            RowRange { start: 0, count: 2 },
            RowRange { start: 1, count: 2 },
        ]);
        // covers 4 rows in total but the second range overlaps the first
        assert!(matches!(
            arena.split(&bad),
            Err(LumaErrors::OverlappingRanges {
                worker:         1,
                expected_start: 2,
                found_start:    1
            })
        ));
    }

    #[test]
    fn split_rejects_plans_for_other_images() {
        let layout = BufferLayout::new(3, 4, 2).unwrap();
        let plan = PartitionPlan::new(5, 2).unwrap();
        let mut arena = ConversionArena::allocate(layout).unwrap();

        assert!(matches!(
            arena.split(&plan),
            Err(LumaErrors::PlanMismatch { .. })
        ));
    }

    #[test]
    fn into_output_keeps_only_output_region() {
        let layout = BufferLayout::new(2, 3, 1).unwrap();
        let arena = ConversionArena::allocate(layout).unwrap();
        assert_eq!(arena.into_output().len(), 6);
    }
}
