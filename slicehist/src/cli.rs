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
use clap::Parser;
use crate::{
    errors::Result,
    params::{MatchParams, DEFAULT_HISTOGRAM_LEVELS, DEFAULT_MATCH_POINTS}
};

/// command line configuration of the slice histogram matcher. All of input, output, threshold and
/// reference slice are required - clap exits with a usage error if any of them is missing or malformed
#[derive(Parser, Debug, Clone)]
#[command(version, about = "match the intensity histogram of each z-slice of a volume to a reference slice")]
pub struct MatchConfig {
    #[arg(short, long, help = "input volume (multi-page *.tif)")]
    pub input: PathBuf,

    #[arg(short, long, help = "output volume (multi-page *.tif)")]
    pub output: PathBuf,

    #[arg(short = 't', long = "thresh", value_name = "THRESH", allow_negative_numbers = true, value_parser = parse_threshold,
          help = "only intensities above this threshold contribute to the histograms, others are not modified")]
    pub threshold: f64,

    #[arg(short = 'r', long = "refslice", value_name = "REFSLICE", allow_negative_numbers = true,
          help = "z-index of the reference slice")]
    pub ref_slice: i64,

    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_LEVELS, conflicts_with = "params", help = "number of histogram levels")]
    pub levels: usize,

    #[arg(long, default_value_t = DEFAULT_MATCH_POINTS, conflicts_with = "params", help = "number of quantile match points")]
    pub match_points: usize,

    #[arg(long, help = "RON file with matching parameters (replaces --levels and --match-points)")]
    pub params: Option<PathBuf>,
}

impl MatchConfig {
    pub fn match_params (&self)->Result<MatchParams> {
        if let Some(path) = &self.params {
            MatchParams::load( path)
        } else {
            MatchParams::new( self.levels, self.match_points)
        }
    }
}

fn parse_threshold (s: &str)->std::result::Result<f64,String> {
    let v: f64 = s.trim().parse().map_err( |e| format!("not a number: {e}"))?;
    if v.is_finite() { Ok(v) } else { Err( format!("threshold has to be finite, got {s}")) }
}
