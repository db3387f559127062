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

/// slice-wise histogram matching of 3D volumes
///
/// every z-slice of a volume gets its intensities remapped so that its cumulative histogram approximates
/// the one of a fixed reference slice of the same volume. The processing steps are plain functions
/// (extract -> transform -> apply -> assemble) which can be used and tested individually

use tracing::{debug,info};

mod errors;
pub use errors::{Result,SliceHistError};

mod params;
pub use params::{MatchParams, DEFAULT_HISTOGRAM_LEVELS, DEFAULT_MATCH_POINTS};

mod cli;
pub use cli::MatchConfig;

pub mod histogram;
pub use histogram::{Histogram, control_points};

mod transfer;
pub use transfer::{TransferFunction, HistogramMatcher, compute_histogram_transform, apply_transfer};

mod volume;
pub use volume::{
    Volume, SpatialMetadata, IntensityStats, VolumeFormat, TIFF_EXTENSIONS,
    read_volume, write_volume, extract_slice, assemble_volume
};

mod nifti_io;

/* #region slice histogram matching **********************************************************************************/

/// match all slices of `volume` against its slice `ref_slice`. Slices are processed independently, the
/// result has the same dimensions and spatial metadata as the input
pub fn match_slices (volume: &Volume, ref_slice: i64, threshold: f64, params: &MatchParams)->Result<Volume> {
    let reference = extract_slice( volume, ref_slice)?;
    let matcher = HistogramMatcher::new( reference.view(), threshold, params)?;
    debug!("reference control points: {:?}", matcher.reference_points());

    let mut slices = Vec::with_capacity( volume.depth());
    for (z,slice) in volume.slices().enumerate() {
        let tf = matcher.transfer_function( slice)?;
        if tf.is_identity() {
            debug!("slice {z} has no samples above threshold, passed through");
        }
        slices.push( apply_transfer( slice, &tf));
    }

    assemble_volume( &slices, *volume.metadata())
}

/// the complete read - match - write cycle for a parsed command line config
pub fn match_slice_histograms (config: &MatchConfig)->Result<()> {
    let params = config.match_params()?;

    let volume = read_volume( &config.input)?;
    let (w,h,d) = volume.dimensions();
    info!("read {}: {}x{}x{} voxels", config.input.display(), w, h, d);

    let matched = match_slices( &volume, config.ref_slice, config.threshold, &params)?;
    info!("matched {} slices against reference slice {} (threshold {}, {} levels, {} match points)",
          d, config.ref_slice, config.threshold, params.histogram_levels, params.match_points);

    write_volume( &matched, &config.output)?;
    info!("wrote {}", config.output.display());

    Ok(())
}

/* #endregion slice histogram matching */
