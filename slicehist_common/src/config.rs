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

/// support for RON based config files

use std::{fs::File, io::Write, path::Path};
use ron::ser::PrettyConfig;
use serde::{Serialize,Deserialize};
use crate::{define_error, fs::filepath_contents};

pub type Result<T> = std::result::Result<T, ConfigError>;

define_error!{ pub ConfigError =
    IOError(#[from] std::io::Error) : "config IO error: {0}",
    RonError(#[from] ron::Error) : "config RON error: {0}",
    RonSerdeError(#[from] ron::error::SpannedError) : "config serialize/deserialize RON error: {0}"
}

/// load a config value of type C from a RON file
pub fn load_ron_file<C,P> (path: P)->Result<C> where C: for <'a> Deserialize<'a>, P: AsRef<Path> {
    let data = filepath_contents( path.as_ref())?;
    Ok( ron::de::from_bytes( data.as_slice())? )
}

/// store a config value as pretty printed RON, replacing existing files
pub fn save_ron_file<C,P> (config: &C, path: P)->Result<()> where C: Serialize, P: AsRef<Path> {
    let s = ron::ser::to_string_pretty( config, PrettyConfig::new().struct_names(true))?;
    let mut file = File::create( path.as_ref())?;
    file.write_all( s.as_bytes())?;
    Ok(())
}
