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

use slicehist_common::{define_error, ConfigError};

pub type Result<T> = std::result::Result<T, SliceHistError>;

define_error!{ pub SliceHistError =
    IOError(#[from] std::io::Error) : "IO error: {0}",
    TiffError(#[from] tiff::TiffError) : "Tiff error: {0}",
    NiftiError(#[from] nifti::error::NiftiError) : "NIfTI error: {0}",
    SerdeError(#[from] serde_json::Error) : "serialization/deserialization error: {0}",
    ShapeError(#[from] ndarray::ShapeError) : "array shape error: {0}",
    ConfigError(#[from] ConfigError) : "config error: {0}",
    ArgumentError(String) : "illegal argument: {0}",
    LoadError(String) : "failed to load volume: {0}",
    WriteError(String) : "failed to write volume: {0}",
    RangeError(String) : "out of range: {0}",
    InvalidImageFormat(String) : "invalid image format: {0}",
    InvalidDimensions(String) : "invalid dimension error: {0}",
    InsufficientData(String) : "insufficient data: {0}"
}

impl SliceHistError {
    /// turn any lower level error encountered while reading into a LoadError, keeping the message
    pub fn into_load_error (self, path: &std::path::Path)->Self {
        match self {
            SliceHistError::LoadError(_) => self,
            e => SliceHistError::LoadError( format!("{}: {}", path.display(), e))
        }
    }

    pub fn into_write_error (self, path: &std::path::Path)->Self {
        match self {
            SliceHistError::WriteError(_) => self,
            e => SliceHistError::WriteError( format!("{}: {}", path.display(), e))
        }
    }
}
