/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Per-thread row conversion
use log::trace;

use crate::arena::TaskDescriptor;
use crate::errors::{FaultKind, WorkerFault};
use crate::luma::luma_row;
use crate::partition::RowRange;
use crate::{INPUT_COMPONENTS, OUTPUT_COMPONENTS};

/// Work handed to one thread
///
/// Holds views into the conversion buffer, input rows are shared,
/// output rows belong to this task alone.
pub struct WorkerTask<'a> {
    id:          usize,
    rows:        RowRange,
    width:       usize,
    input:       &'a [u8],
    output:      &'a mut [u8],
    descriptors: &'a [u8]
}

/// Result of a successful worker
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WorkerReport {
    pub worker: usize,
    pub rows:   RowRange
}

impl<'a> WorkerTask<'a> {
    /// Create a task
    ///
    /// `input` and `output` start at the first row of `rows`,
    /// `descriptors` is the whole task region of the buffer.
    pub fn new(
        id: usize, rows: RowRange, width: usize, input: &'a [u8], output: &'a mut [u8],
        descriptors: &'a [u8]
    ) -> WorkerTask<'a> {
        WorkerTask {
            id,
            rows,
            width,
            input,
            output,
            descriptors
        }
    }

    pub const fn id(&self) -> usize {
        self.id
    }

    pub const fn rows(&self) -> RowRange {
        self.rows
    }

    pub const fn input(&self) -> &[u8] {
        self.input
    }

    pub fn output_len(&self) -> usize {
        self.output.len()
    }

    /// Convert every row of this task
    ///
    /// # Errors
    /// A [`WorkerFault`] naming the first row and column that could not be
    /// read or written, or a descriptor mismatch found before touching any row.
    pub fn run(mut self) -> Result<WorkerReport, WorkerFault> {
        trace!("Worker {} starting on rows {:?}", self.id, self.rows.as_range());

        self.check_descriptor()?;

        let input_stride = self.width * INPUT_COMPONENTS;
        let output_stride = self.width * OUTPUT_COMPONENTS;

        for local_row in 0..self.rows.count {
            let row = self.rows.start + local_row;

            let in_start = local_row * input_stride;
            let Some(in_row) = self.input.get(in_start..in_start + input_stride)
            else {
                return Err(self.fault(
                    row,
                    first_missing_column(self.input.len(), in_start, INPUT_COMPONENTS),
                    FaultKind::InputOutOfBounds
                ));
            };

            let out_start = local_row * output_stride;
            let output_len = self.output.len();
            let Some(out_row) = self.output.get_mut(out_start..out_start + output_stride)
            else {
                let column = first_missing_column(output_len, out_start, OUTPUT_COMPONENTS);
                return Err(WorkerFault {
                    worker: self.id,
                    row,
                    column,
                    kind: FaultKind::OutputOutOfBounds
                });
            };

            luma_row(in_row, out_row);
        }

        trace!("Worker {} done", self.id);

        Ok(WorkerReport {
            worker: self.id,
            rows:   self.rows
        })
    }

    fn check_descriptor(&self) -> Result<(), WorkerFault> {
        let expected = TaskDescriptor {
            worker:    self.id as u64,
            start_row: self.rows.start as u64,
            row_count: self.rows.count as u64,
            width:     self.width as u64
        };

        match TaskDescriptor::read(self.descriptors, self.id) {
            Some(found) if found == expected => Ok(()),
            _ => Err(self.fault(self.rows.start, 0, FaultKind::DescriptorMismatch))
        }
    }

    const fn fault(&self, row: usize, column: usize, kind: FaultKind) -> WorkerFault {
        WorkerFault {
            worker: self.id,
            row,
            column,
            kind
        }
    }
}

/// First pixel of a row starting at `row_start` that lies past `len`
fn first_missing_column(len: usize, row_start: usize, components: usize) -> usize {
    len.saturating_sub(row_start) / components
}
