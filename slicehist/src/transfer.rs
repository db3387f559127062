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

use ndarray::{Array2, ArrayView2};
use crate::{
    MatchParams,
    errors::{Result,SliceHistError},
    histogram::{Histogram, control_points}
};

/// piecewise linear intensity mapping from source to reference control points.
/// Values at or below the threshold are passed through unchanged
#[derive(Debug,Clone,PartialEq)]
pub struct TransferFunction {
    threshold: f64,
    source_points: Vec<f64>,
    reference_points: Vec<f64>
}

impl TransferFunction {
    /// maps every value to itself
    pub fn identity (threshold: f64)->Self {
        TransferFunction{ threshold, source_points: Vec::new(), reference_points: Vec::new() }
    }

    /// both point sequences have to be non-decreasing and of the same (non-zero) length
    pub fn new (threshold: f64, source_points: Vec<f64>, reference_points: Vec<f64>)->Result<Self> {
        if source_points.len() != reference_points.len() || source_points.is_empty() {
            return Err( SliceHistError::ArgumentError(
                format!("control point mismatch: {} source, {} reference", source_points.len(), reference_points.len())))
        }
        if !is_non_decreasing( &source_points) || !is_non_decreasing( &reference_points) {
            return Err( SliceHistError::ArgumentError( "control points have to be non-decreasing".into()))
        }

        Ok( TransferFunction{ threshold, source_points, reference_points } )
    }

    pub fn is_identity(&self)->bool { self.source_points.is_empty() }
    pub fn threshold(&self)->f64 { self.threshold }
    pub fn source_points(&self)->&[f64] { &self.source_points }
    pub fn reference_points(&self)->&[f64] { &self.reference_points }

    pub fn map_value (&self, v: f64)->f64 {
        if v <= self.threshold || self.source_points.is_empty() { return v }

        let src = &self.source_points;
        let rf = &self.reference_points;
        let last = src.len() - 1;

        if v <= src[0] { return rf[0] }
        if v >= src[last] { return rf[last] }

        // src[k] <= v < src[k+1], which also means src[k+1] > src[k]
        let k = src.partition_point( |&s| s <= v) - 1;
        let gradient = (rf[k+1] - rf[k]) / (src[k+1] - src[k]);
        rf[k] + (v - src[k]) * gradient
    }

    /// map and round to the nearest representable i16
    #[inline]
    pub fn map_sample (&self, v: i16)->i16 {
        let m = self.map_value( v as f64).round();
        m.clamp( i16::MIN as f64, i16::MAX as f64) as i16
    }
}

fn is_non_decreasing (points: &[f64])->bool {
    points.windows(2).all( |w| w[0] <= w[1])
}

fn histogram_of (slice: &ArrayView2<i16>, threshold: f64, levels: usize)->Option<Histogram> {
    Histogram::new( slice.iter().map( |&v| v as f64), threshold, levels)
}

/// compute the mapping of `source` intensities onto the `reference` intensity distribution. Both histograms
/// use the same threshold and number of levels. If `source` has no value above threshold the result is the
/// identity, if `reference` has none we fail
pub fn compute_histogram_transform (source: ArrayView2<i16>, reference: ArrayView2<i16>, threshold: f64, params: &MatchParams)->Result<TransferFunction> {
    HistogramMatcher::new( reference, threshold, params)?.transfer_function( source)
}

/// remap every sample of `slice` through `tf`
pub fn apply_transfer (slice: ArrayView2<i16>, tf: &TransferFunction)->Array2<i16> {
    if tf.is_identity() {
        slice.to_owned()
    } else {
        slice.map( |&v| tf.map_sample(v))
    }
}

/// caches the reference control points so that we only compute them once per volume
#[derive(Debug,Clone)]
pub struct HistogramMatcher {
    threshold: f64,
    params: MatchParams,
    reference_points: Vec<f64>
}

impl HistogramMatcher {
    pub fn new (reference: ArrayView2<i16>, threshold: f64, params: &MatchParams)->Result<Self> {
        params.check()?;

        let hist = histogram_of( &reference, threshold, params.histogram_levels).ok_or_else( ||
            SliceHistError::InsufficientData( format!("no reference sample above threshold {threshold}")))?;
        let reference_points = control_points( &hist, params.match_points);

        Ok( HistogramMatcher{ threshold, params: params.clone(), reference_points } )
    }

    pub fn reference_points(&self)->&[f64] { &self.reference_points }

    pub fn transfer_function (&self, source: ArrayView2<i16>)->Result<TransferFunction> {
        match histogram_of( &source, self.threshold, self.params.histogram_levels) {
            Some(hist) => {
                let source_points = control_points( &hist, self.params.match_points);
                TransferFunction::new( self.threshold, source_points, self.reference_points.clone())
            }
            None => Ok( TransferFunction::identity( self.threshold) )
        }
    }

    pub fn match_slice (&self, source: ArrayView2<i16>)->Result<Array2<i16>> {
        let tf = self.transfer_function( source)?;
        Ok( apply_transfer( source, &tf) )
    }
}
