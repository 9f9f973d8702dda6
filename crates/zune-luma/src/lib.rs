/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Multithreaded RGB to grayscale conversion
//!
//! This crate converts interleaved 8-bit RGB pixels into a single 8-bit luma
//! channel by splitting the image rows across a fixed number of worker threads.
//!
//! Every conversion uses one allocation which holds the input pixels, the output
//! pixels and one [`TaskDescriptor`](arena::TaskDescriptor) per worker.
//! Workers receive non-overlapping mutable views into the output region, so the
//! parallel phase needs no locks or atomics, only the final join.
//!
//! # Example
//! - Convert a 4x4 red image using two workers
//! ```
//! use zune_luma::coordinator::Coordinator;
//! use zune_luma::options::LumaOptions;
//!
//! let (width, height) = (4, 4);
//! let options = LumaOptions::default().set_workers(2);
//!
//! let mut round = Coordinator::new(options).prepare(width, height).unwrap();
//! // fill input, this is usually done by a decoder
//! for pixel in round.input_mut().chunks_exact_mut(3) {
//!     pixel.copy_from_slice(&[255, 0, 0]);
//! }
//! let image = round.run().unwrap();
//!
//! assert!(image.pixels().iter().all(|x| *x == 54));
//! ```
#![warn(
    clippy::correctness,
    clippy::perf,
    clippy::pedantic,
    clippy::inline_always,
    clippy::missing_errors_doc,
    clippy::panic
)]
#![allow(
    clippy::needless_return,
    clippy::similar_names,
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

pub use crate::coordinator::convert_rgb_to_luma;

pub mod arena;
pub mod coordinator;
pub mod errors;
pub mod luma;
pub mod options;
pub mod partition;
pub mod worker;

/// Number of interleaved samples in one input pixel (R, G, B)
pub const INPUT_COMPONENTS: usize = 3;

/// Number of samples in one output pixel (luma)
pub const OUTPUT_COMPONENTS: usize = 1;
