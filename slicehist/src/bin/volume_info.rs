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

use anyhow::Result;
use clap::Parser;
use slicehist::{read_volume, IntensityStats, VolumeFormat};

#[derive(Parser, Debug)]
#[command(version, about = "show dimensions, spatial metadata and per-slice intensity stats of a volume")]
pub struct Args {
    #[arg(long, help = "only show volume level info")]
    pub brief: bool,

    pub volume: String
}

fn print_stats (label: &str, stats: Option<IntensityStats>) {
    match stats {
        Some(s) => println!("{label:>10}: min={:6} max={:6} mean={:10.3} stddev={:10.3}", s.min, s.max, s.mean, s.std_dev),
        None => println!("{label:>10}: no samples")
    }
}

fn main()->Result<()> {
    let args = Args::parse();
    let format = VolumeFormat::from_path( &args.volume)?;
    let volume = read_volume( &args.volume)?;

    let (w,h,d) = volume.dimensions();
    let md = volume.metadata();
    println!("format:     {format:?}");
    println!("dimensions: {w} x {h} x {d}");
    println!("origin:     {:?}", md.origin);
    println!("spacing:    {:?}", md.spacing);
    println!("direction:  {:?}", md.direction);

    print_stats( "volume", volume.stats());

    if !args.brief {
        for (z,slice) in volume.slices().enumerate() {
            print_stats( &z.to_string(), IntensityStats::from_samples( slice.iter()));
        }
    }

    Ok(())
}
