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

use std::path::Path;
use serde::{Serialize,Deserialize};
use slicehist_common::load_ron_file;
use crate::errors::{Result,SliceHistError};

pub const DEFAULT_HISTOGRAM_LEVELS: usize = 512;
pub const DEFAULT_MATCH_POINTS: usize = 5;

/// histogram matching parameters, which can be stored in RON config files such as
/// ```text
/// MatchParams(
///     histogram_levels: 1024,
///     match_points: 7,
/// )
/// ```
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(default)]
pub struct MatchParams {
    pub histogram_levels: usize,
    pub match_points: usize
}

impl Default for MatchParams {
    fn default()->Self {
        MatchParams { histogram_levels: DEFAULT_HISTOGRAM_LEVELS, match_points: DEFAULT_MATCH_POINTS }
    }
}

impl MatchParams {
    pub fn new (histogram_levels: usize, match_points: usize)->Result<Self> {
        let params = MatchParams{ histogram_levels, match_points };
        params.check()?;
        Ok(params)
    }

    pub fn load<P> (path: P)->Result<Self> where P: AsRef<Path> {
        let params: MatchParams = load_ron_file( path)?;
        params.check()?;
        Ok(params)
    }

    pub fn check (&self)->Result<()> {
        if self.histogram_levels == 0 {
            Err( SliceHistError::ArgumentError( "histogram_levels has to be > 0".into()))
        } else {
            Ok(())
        }
    }
}
