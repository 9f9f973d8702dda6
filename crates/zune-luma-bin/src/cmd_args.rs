/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};

/// Default quality of the written jpeg
pub const DEFAULT_QUALITY: u8 = 90;

#[rustfmt::skip]
pub fn create_cmd_args() -> Command {
    Command::new("zune-gray")
        .about("Convert a jpeg image to grayscale using a fixed number of worker threads")
        .arg(Arg::new("in")
            .short('i')
            .long("input")
            .help("Input jpeg file to read data from")
            .value_parser(value_parser!(PathBuf))
            .required(true))
        .arg(Arg::new("out")
            .short('o')
            .long("output")
            .help("Output jpeg file to write the grayscale image to")
            .value_parser(value_parser!(PathBuf))
            .required(true))
        .arg(Arg::new("threads")
            .short('t')
            .long("threads")
            .help("Number of worker threads to split image rows across")
            .long_help("Number of worker threads to split image rows across.\nThe image must have at least as many rows as there are threads.")
            .value_parser(value_parser!(usize))
            .default_value("4"))
        .arg(Arg::new("quality")
            .short('q')
            .long("quality")
            .help("Quality of the output jpeg, between 1 and 100")
            .value_parser(value_parser!(u8).range(1..=100))
            .default_value("90"))
        .arg(Arg::new("bench")
            .long("bench")
            .help_heading("ADVANCED")
            .help("Time the conversion for every thread count from 1 up to this value")
            .long_help("Time the conversion for every thread count from 1 up to this value.\nPrints `threads,time` csv lines to stdout, time is in seconds.")
            .value_parser(value_parser!(usize)))
        .arg(Arg::new("all-yes")
            .short('y')
            .long("yes")
            .action(ArgAction::SetTrue)
            .help("Overwrite the output file if it exists"))
        .arg(Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display debug information and higher"))
        .arg(Arg::new("trace")
            .long("trace")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display very verbose information"))
        .arg(Arg::new("warn")
            .long("warn")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display warnings and errors"))
        .arg(Arg::new("info")
            .long("info")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display information about the conversion"))
}
