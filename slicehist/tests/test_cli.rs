/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::path::PathBuf;
use clap::{Parser, error::ErrorKind};
use tempfile::tempdir;
use slicehist::{MatchConfig, MatchParams, SliceHistError, DEFAULT_HISTOGRAM_LEVELS, DEFAULT_MATCH_POINTS};
use slicehist_common::save_ron_file;

// run with  cargo test --test test_cli -- --nocapture

fn parse (args: &[&str])->Result<MatchConfig,clap::Error> {
    MatchConfig::try_parse_from( std::iter::once("slice_histogram").chain( args.iter().copied()))
}

#[test]
fn test_short_options() {
    let config = parse( &["-i", "in.tif", "-o", "out.tif", "-t", "12.5", "-r", "3"]).unwrap();
    println!("{config:?}");

    assert_eq!( config.input, PathBuf::from("in.tif"));
    assert_eq!( config.output, PathBuf::from("out.tif"));
    assert_eq!( config.threshold, 12.5);
    assert_eq!( config.ref_slice, 3);
    assert_eq!( config.match_params().unwrap(), MatchParams::default());
}

#[test]
fn test_long_options() {
    let config = parse( &["--input", "a.tif", "--output", "b.tif", "--thresh", "-4", "--refslice", "0",
                          "--levels", "128", "--match-points", "9"]).unwrap();

    assert_eq!( config.threshold, -4.0);
    assert_eq!( config.ref_slice, 0);
    assert_eq!( config.match_params().unwrap(), MatchParams{ histogram_levels: 128, match_points: 9 });
}

#[test]
fn test_defaults() {
    let config = parse( &["-i", "in.tif", "-o", "out.tif", "-t", "0", "-r", "1"]).unwrap();
    assert_eq!( config.levels, DEFAULT_HISTOGRAM_LEVELS);
    assert_eq!( config.match_points, DEFAULT_MATCH_POINTS);
    assert!( config.params.is_none());
}

#[test]
fn test_negative_refslice_is_parsed() {
    // rejected later by the range check, not by the parser
    let config = parse( &["-i", "in.tif", "-o", "out.tif", "-t", "0", "-r", "-2"]).unwrap();
    assert_eq!( config.ref_slice, -2);
}

#[test]
fn test_missing_arguments() {
    for args in [
        vec!["-o", "out.tif", "-t", "0", "-r", "1"],
        vec!["-i", "in.tif", "-t", "0", "-r", "1"],
        vec!["-i", "in.tif", "-o", "out.tif", "-r", "1"],
        vec!["-i", "in.tif", "-o", "out.tif", "-t", "0"],
    ] {
        let err = parse( &args).unwrap_err();
        println!("{args:?} -> {}", err.kind());
        assert_eq!( err.kind(), ErrorKind::MissingRequiredArgument);
    }
}

#[test]
fn test_malformed_arguments() {
    let err = parse( &["-i", "in.tif", "-o", "out.tif", "-t", "high", "-r", "1"]).unwrap_err();
    println!("{err}");
    assert_eq!( err.kind(), ErrorKind::ValueValidation);
    assert!( err.to_string().contains("--thresh"));

    let err = parse( &["-i", "in.tif", "-o", "out.tif", "-t", "NaN", "-r", "1"]).unwrap_err();
    assert_eq!( err.kind(), ErrorKind::ValueValidation);

    let err = parse( &["-i", "in.tif", "-o", "out.tif", "-t", "1", "-r", "1.5"]).unwrap_err();
    assert_eq!( err.kind(), ErrorKind::ValueValidation);
    assert!( err.to_string().contains("--refslice"));
}

#[test]
fn test_params_conflict() {
    let err = parse( &["-i", "in.tif", "-o", "out.tif", "-t", "0", "-r", "1", "--params", "p.ron", "--levels", "64"]).unwrap_err();
    assert_eq!( err.kind(), ErrorKind::ArgumentConflict);
}

#[test]
fn test_params_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("params.ron");
    let params = MatchParams{ histogram_levels: 1024, match_points: 7 };
    save_ron_file( &params, &path).unwrap();

    let config = parse( &["-i", "in.tif", "-o", "out.tif", "-t", "0", "-r", "1", "--params", path.to_str().unwrap()]).unwrap();
    assert_eq!( config.match_params().unwrap(), params);

    // missing fields fall back to defaults
    std::fs::write( &path, "(match_points: 3)").unwrap();
    assert_eq!( config.match_params().unwrap(), MatchParams{ histogram_levels: DEFAULT_HISTOGRAM_LEVELS, match_points: 3 });

    std::fs::write( &path, "(histogram_levels: 0)").unwrap();
    assert!( matches!( config.match_params(), Err(SliceHistError::ArgumentError(_))));

    std::fs::write( &path, "not ron at all").unwrap();
    assert!( matches!( config.match_params(), Err(SliceHistError::ConfigError(_))));
}
