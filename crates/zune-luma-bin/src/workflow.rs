/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decode, convert and encode one image
use std::io::Write;
use std::time::Duration;

use log::{info, warn};
use zune_luma::coordinator::Coordinator;
use zune_luma::options::LumaOptions;

use crate::cmd_parsers::global_options::CmdOptions;
use crate::codec::{decode_into_round, decode_rgb, encode_luma};
use crate::errors::ZuneLumaErrors;
use crate::file_io::{create_output, verify_file_paths};

/// Convert the jpeg in `data` to a grayscale jpeg written to `writer`
///
/// Returns the duration of the parallel phase only.
pub fn transcode<W: Write>(
    data: &[u8], options: LumaOptions, quality: u8, writer: W
) -> Result<Duration, ZuneLumaErrors> {
    let (round, density) = decode_into_round(data, options)?;
    let image = round.run()?;
    let (width, height) = image.dimensions();

    encode_luma(image.pixels(), width, height, density, quality, writer)?;

    Ok(image.elapsed())
}

/// Time the parallel phase for every worker count in `1..=max_workers`
///
/// The image is decoded once and copied into a fresh buffer for every run.
/// Worker counts above the image height are skipped. The grayscale image of
/// the last run is written to `writer`, one `threads,time` line per run is
/// written to `csv`.
pub fn benchmark<W: Write, C: Write>(
    data: &[u8], max_workers: usize, quality: u8, writer: W, mut csv: C
) -> Result<Vec<(usize, Duration)>, ZuneLumaErrors> {
    if max_workers == 0 {
        return Err(ZuneLumaErrors::GenericString(
            "Benchmark needs at least one thread".to_string()
        ));
    }
    let decoded = decode_rgb(data)?;

    let max = if max_workers > decoded.height {
        warn!(
            "Image has {} rows, only benchmarking up to {} threads",
            decoded.height, decoded.height
        );
        decoded.height
    } else {
        max_workers
    };

    let mut timings = Vec::with_capacity(max);
    let mut last = None;

    writeln!(csv, "threads,time")?;

    for workers in 1..=max {
        let options = LumaOptions::default().set_workers(workers);
        let mut round = Coordinator::new(options).prepare(decoded.width, decoded.height)?;
        round.fill_input(&decoded.pixels)?;

        let image = round.run()?;

        writeln!(csv, "{},{}", workers, image.elapsed().as_secs_f64())?;
        timings.push((workers, image.elapsed()));
        last = Some(image);
    }

    let image = last.ok_or_else(|| {
        ZuneLumaErrors::GenericString("Benchmark ran no conversion".to_string())
    })?;
    encode_luma(
        image.pixels(),
        decoded.width,
        decoded.height,
        decoded.density,
        quality,
        writer
    )?;

    Ok(timings)
}

pub(crate) fn create_and_exec_workflow_from_cmd(
    cmd_opts: &CmdOptions
) -> Result<(), ZuneLumaErrors> {
    info!("Creating workflow from input");

    verify_file_paths(&cmd_opts.input, &cmd_opts.output, cmd_opts.override_files)?;

    let data = std::fs::read(&cmd_opts.input)?;
    // the output file is only touched once the whole image is encoded
    let mut encoded = vec![];

    if let Some(max) = cmd_opts.bench {
        let stdout = std::io::stdout();
        benchmark(&data, max, cmd_opts.quality, &mut encoded, stdout.lock())?;
    } else {
        let elapsed = transcode(&data, cmd_opts.luma_options(), cmd_opts.quality, &mut encoded)?;
        println!("{}", elapsed.as_nanos());
    }

    let mut writer = create_output(&cmd_opts.output)?;
    writer.write_all(&encoded)?;
    writer.flush()?;

    info!("Wrote {:?}", cmd_opts.output);
    Ok(())
}
