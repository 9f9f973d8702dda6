/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::PathBuf;

use clap::parser::ValueSource;
use clap::ArgMatches;
use log::{info, Level};
use zune_luma::options::LumaOptions;

use crate::cmd_args::DEFAULT_QUALITY;

#[derive(Debug, Clone)]
pub struct CmdOptions {
    pub input:          PathBuf,
    pub output:         PathBuf,
    pub workers:        usize,
    pub quality:        u8,
    pub bench:          Option<usize>,
    pub override_files: bool
}

impl CmdOptions {
    pub fn new(input: PathBuf, output: PathBuf) -> CmdOptions {
        CmdOptions {
            input,
            output,
            workers: LumaOptions::default().get_workers(),
            quality: DEFAULT_QUALITY,
            bench: None,
            override_files: false
        }
    }

    pub fn luma_options(&self) -> LumaOptions {
        LumaOptions::default().set_workers(self.workers)
    }
}

pub fn parse_options(options: &ArgMatches) -> CmdOptions {
    // required and defaulted arguments, clap has already rejected anything missing
    let input = options.get_one::<PathBuf>("in").cloned().unwrap_or_default();
    let output = options.get_one::<PathBuf>("out").cloned().unwrap_or_default();

    let mut cmd_options = CmdOptions::new(input, output);

    if let Some(workers) = options.get_one::<usize>("threads") {
        info!("Using {} worker threads", workers);
        cmd_options.workers = *workers;
    }
    if let Some(quality) = options.get_one::<u8>("quality") {
        cmd_options.quality = *quality;
    }
    if let Some(max) = options.get_one::<usize>("bench") {
        info!("Benchmarking thread counts 1 to {}", max);
        cmd_options.bench = Some(*max);
    }
    if options.value_source("all-yes") == Some(ValueSource::CommandLine) {
        info!("Setting all commands to yes");
        cmd_options.override_files = true;
    }
    cmd_options
}

/// Set up logging options
pub fn setup_logger(options: &ArgMatches) {
    let flag = |name: &str| options.get_flag(name);

    let log_level = if flag("debug") {
        Level::Debug
    } else if flag("trace") {
        Level::Trace
    } else if flag("warn") {
        Level::Warn
    } else if flag("info") {
        Level::Info
    } else {
        Level::Warn
    };

    if let Err(err) = simple_logger::init_with_level(log_level) {
        eprintln!("Could not initialize logger: {err}");
        return;
    }

    info!("Initialized logger");
    info!("Log level :{}", log_level);
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::cmd_args::create_cmd_args;
    use crate::cmd_parsers::global_options::parse_options;

    #[test]
    fn defaults() {
        let matches = create_cmd_args()
            .try_get_matches_from(["zune-gray", "-i", "in.jpg", "-o", "out.jpg"])
            .unwrap();
        let opts = parse_options(&matches);

        assert_eq!(opts.input, PathBuf::from("in.jpg"));
        assert_eq!(opts.output, PathBuf::from("out.jpg"));
        assert_eq!(opts.workers, 4);
        assert_eq!(opts.quality, 90);
        assert_eq!(opts.bench, None);
        assert!(!opts.override_files);
    }

    #[test]
    fn explicit_values() {
        let matches = create_cmd_args()
            .try_get_matches_from([
                "zune-gray", "-i", "a.jpg", "-o", "b.jpg", "-t", "12", "-q", "75", "--bench",
                "20", "-y"
            ])
            .unwrap();
        let opts = parse_options(&matches);

        assert_eq!(opts.workers, 12);
        assert_eq!(opts.quality, 75);
        assert_eq!(opts.bench, Some(20));
        assert!(opts.override_files);
        assert_eq!(opts.luma_options().get_workers(), 12);
    }

    #[test]
    fn quality_out_of_range() {
        let result = create_cmd_args().try_get_matches_from([
            "zune-gray", "-i", "a.jpg", "-o", "b.jpg", "-q", "0"
        ]);
        assert!(result.is_err());
    }
}
