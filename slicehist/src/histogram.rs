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

/// intensity histograms with a fixed number of equal-width levels spanning the value range of
/// the samples that are strictly above a threshold

#[derive(Debug,Clone,PartialEq)]
pub struct Histogram {
    lower: f64,
    upper: f64,
    counts: Vec<u64>,
    total: u64
}

impl Histogram {

    /// build histogram from all values > threshold. Returns None if no value contributes or levels == 0
    pub fn new<I> (values: I, threshold: f64, levels: usize)->Option<Self> where I: IntoIterator<Item=f64> + Clone {
        if levels == 0 { return None }

        let mut lower = f64::MAX;
        let mut upper = f64::MIN;
        for v in values.clone() {
            if v > threshold {
                if v < lower { lower = v }
                if v > upper { upper = v }
            }
        }
        if lower > upper { return None } // nothing above threshold

        let mut counts = vec![0u64; levels];
        let mut total = 0;
        let bin_scale = if upper > lower { levels as f64 / (upper - lower) } else { 0.0 };

        for v in values {
            if v > threshold {
                let i = (((v - lower) * bin_scale) as usize).min( levels-1);
                counts[i] += 1;
                total += 1;
            }
        }

        Some( Histogram{ lower, upper, counts, total } )
    }

    /// smallest contributing value
    pub fn lower(&self)->f64 { self.lower }

    /// largest contributing value
    pub fn upper(&self)->f64 { self.upper }

    pub fn levels(&self)->usize { self.counts.len() }
    pub fn total(&self)->u64 { self.total }
    pub fn counts(&self)->&[u64] { &self.counts }

    pub fn bin_width(&self)->f64 {
        (self.upper - self.lower) / self.counts.len() as f64
    }

    /// the value below which fraction `p` of the samples fall. Linearly interpolates within the bin that
    /// crosses the cumulative target. `p` is clamped to [0,1]
    pub fn quantile (&self, p: f64)->f64 {
        let p = p.clamp( 0.0, 1.0);
        let target = p * self.total as f64;
        let bin_width = self.bin_width();
        let mut cum = 0.0;

        for (i,&n) in self.counts.iter().enumerate() {
            if n > 0 {
                let n = n as f64;
                if cum + n >= target {
                    let frac = (target - cum) / n;
                    let q = self.lower + (i as f64 + frac) * bin_width;
                    return q.clamp( self.lower, self.upper)
                }
                cum += n;
            }
        }

        self.upper
    }
}

/// the piecewise linear control points of a histogram: the lower bound, `n_match_points` equidistant
/// quantiles and the upper bound. The result is non-decreasing and has `n_match_points + 2` elements
pub fn control_points (hist: &Histogram, n_match_points: usize)->Vec<f64> {
    let delta = 1.0 / (n_match_points + 1) as f64;
    let mut points = Vec::with_capacity( n_match_points + 2);

    points.push( hist.lower());
    for j in 1..=n_match_points {
        let q = hist.quantile( j as f64 * delta);
        points.push( q.max( points[j-1])); // guard against fp noise
    }
    points.push( hist.upper());

    points
}
