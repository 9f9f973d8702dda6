/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fs::{File, OpenOptions};
use std::io::{stdin, BufRead, BufWriter};
use std::path::Path;

use log::info;

use crate::errors::ZuneLumaErrors;

/// Check that `input` can be read and `output` may be written
///
/// Asks on stdin before overwriting an existing output unless `override_files` is set.
pub fn verify_file_paths(
    input: &Path, output: &Path, override_files: bool
) -> Result<(), ZuneLumaErrors> {
    if input == output {
        return Err(ZuneLumaErrors::GenericString(format!(
            "Cannot use {:?} as both input and output",
            input
        )));
    }

    if !input.exists() {
        return Err(ZuneLumaErrors::GenericString(format!(
            "Path {:?}, does not exist",
            input
        )));
    }

    if !input.is_file() {
        return Err(ZuneLumaErrors::GenericString(format!(
            "Path {:?} is not a file",
            input
        )));
    }

    if output.exists() {
        if override_files {
            info!("Overwriting path {:?} ", output);
        } else {
            println!("File {:?} exists, overwrite [y/N]", output);
            let mut result = String::new();

            stdin().lock().read_line(&mut result)?;

            if result.trim() != "y" {
                return Err(ZuneLumaErrors::GenericString(format!(
                    "Not overwriting file {:?}",
                    output
                )));
            }
        }
    }
    Ok(())
}

pub fn create_output(output: &Path) -> Result<BufWriter<File>, ZuneLumaErrors> {
    let file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(output)?;

    Ok(BufWriter::new(file))
}
