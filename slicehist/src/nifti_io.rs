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

//! NIfTI-1 single file volumes (*.nii, *.nii.gz)
//!
//! NIfTI geometry is given in RAS coordinates (sform affine or qform quaternion). [`SpatialMetadata`] uses the
//! LPS convention of DICOM based toolkits, hence x and y rows are negated in both directions.

use std::{io::Write, path::Path};
use ndarray::Array3;
use nifti::{NiftiHeader, NiftiObject, NiftiVolume, RandomAccessNiftiVolume, ReaderOptions};
use tracing::debug;
use crate::{errors::{Result,SliceHistError}, volume::{SpatialMetadata, Volume}};

/// RAS <-> LPS row signs
const LPS: [f64;3] = [-1.0, -1.0, 1.0];

// NIfTI-1 header field offsets
const SIZEOF_HDR: usize = 0;
const DIM: usize = 40;
const DATATYPE: usize = 70;
const BITPIX: usize = 72;
const PIXDIM: usize = 76;
const VOX_OFFSET: usize = 108;
const SCL_SLOPE: usize = 112;
const SCL_INTER: usize = 116;
const XYZT_UNITS: usize = 123;
const QFORM_CODE: usize = 252;
const SFORM_CODE: usize = 254;
const SROW_X: usize = 280;
const MAGIC: usize = 344;

const HEADER_SIZE: usize = 348;
const DATA_OFFSET: usize = 352; // header + empty extension flag
const DT_INT16: i16 = 4;
const UNITS_MM: u8 = 2;
const XFORM_SCANNER_ANAT: i16 = 1;

/* #region reading ***************************************************************************************************/

pub(crate) fn load_nifti (path: &Path)->Result<Volume> {
    let obj = ReaderOptions::new().read_file( path)?;
    let metadata = metadata_from_header( obj.header());
    let nvol = obj.volume();

    let dim: Vec<usize> = nvol.dim().iter().map( |d| *d as usize).collect();
    if dim.len() < 2 || dim.iter().skip(3).any( |d| *d != 1) {
        return Err( SliceHistError::InvalidDimensions( format!("not a single 3D volume: {:?}", dim)))
    }
    let w = dim[0];
    let h = dim[1];
    let d = dim.get(2).copied().unwrap_or(1);

    let mut data: Vec<i16> = Vec::with_capacity( w*h*d);
    let mut coords = vec![0u16; dim.len()];
    for z in 0..d {
        if coords.len() > 2 { coords[2] = z as u16 }
        for y in 0..h {
            coords[1] = y as u16;
            for x in 0..w {
                coords[0] = x as u16;
                data.push( to_sample( nvol.get_f64( &coords)?)?);
            }
        }
    }

    debug!("read NIfTI volume {}: {}x{}x{}", path.display(), w, h, d);
    let data = Array3::from_shape_vec( (d,h,w), data)?;
    Ok( Volume::new( data, metadata) )
}

fn to_sample (v: f64)->Result<i16> {
    if v.fract() == 0.0 && v >= i16::MIN as f64 && v <= i16::MAX as f64 {
        Ok( v as i16 )
    } else {
        Err( SliceHistError::InvalidImageFormat( format!("sample value {v} is not a 16 bit integer")))
    }
}

/// sform takes precedence over qform. Without either we only have the voxel size
fn metadata_from_header (header: &NiftiHeader)->SpatialMetadata {
    let mut md = SpatialMetadata::default();

    if header.sform_code > 0 {
        let rows = [header.srow_x, header.srow_y, header.srow_z];
        for j in 0..3 {
            let norm = (0..3).map( |i| (rows[i][j] as f64).powi(2)).sum::<f64>().sqrt();
            let spacing = if norm > 0.0 { norm } else { 1.0 };
            md.spacing[j] = spacing;
            for i in 0..3 {
                md.direction[3*i + j] = LPS[i] * rows[i][j] as f64 / spacing;
            }
        }
        for i in 0..3 {
            md.origin[i] = LPS[i] * rows[i][3] as f64;
        }

    } else if header.qform_code > 0 {
        let b = header.quatern_b as f64;
        let c = header.quatern_c as f64;
        let d = header.quatern_d as f64;
        let a = (1.0 - (b*b + c*c + d*d)).max(0.0).sqrt();
        let qfac = if header.pixdim[0] < 0.0 { -1.0 } else { 1.0 };

        let r = [
            a*a + b*b - c*c - d*d,  2.0*(b*c - a*d),        2.0*(b*d + a*c),
            2.0*(b*c + a*d),        a*a + c*c - b*b - d*d,  2.0*(c*d - a*b),
            2.0*(b*d - a*c),        2.0*(c*d + a*b),        a*a + d*d - c*c - b*b
        ];
        for i in 0..3 {
            for j in 0..3 {
                let v = if j == 2 { qfac * r[3*i + j] } else { r[3*i + j] };
                md.direction[3*i + j] = LPS[i] * v;
            }
        }
        md.spacing = voxel_size( header);
        let qoffset = [header.quatern_x, header.quatern_y, header.quatern_z];
        for i in 0..3 {
            md.origin[i] = LPS[i] * qoffset[i] as f64;
        }

    } else {
        md.spacing = voxel_size( header);
    }

    md
}

fn voxel_size (header: &NiftiHeader)->[f64;3] {
    let mut spacing = [1.0;3];
    for i in 0..3 {
        let s = (header.pixdim[i+1] as f64).abs();
        if s > 0.0 { spacing[i] = s }
    }
    spacing
}

/* #endregion reading */

/* #region writing ***************************************************************************************************/

/// write an uncompressed NIfTI-1 image with `INT16` samples. Geometry is stored as sform
pub(crate) fn encode_nifti<W> (volume: &Volume, mut writer: W)->Result<()> where W: Write {
    let header = header_bytes( volume)?;

    let mut buf: Vec<u8> = Vec::with_capacity( header.len() + volume.data().len() * 2);
    buf.extend_from_slice( &header);
    for v in volume.data().iter() { // logical (z,y,x) order, x varies fastest as NIfTI requires
        buf.extend_from_slice( &v.to_le_bytes());
    }

    writer.write_all( &buf)?;
    Ok(())
}

fn header_bytes (volume: &Volume)->Result<Vec<u8>> {
    let (w,h,d) = volume.dimensions();
    let max = i16::MAX as usize;
    if w > max || h > max || d > max {
        return Err( SliceHistError::InvalidDimensions( format!("volume {:?} exceeds NIfTI-1 dimension limit", (w,h,d))))
    }

    let md = volume.metadata();
    let mut buf = vec![0u8; DATA_OFFSET];

    put( &mut buf, SIZEOF_HDR, &(HEADER_SIZE as i32).to_le_bytes());

    let dim: [i16;8] = [3, w as i16, h as i16, d as i16, 1, 1, 1, 1];
    for (i,v) in dim.iter().enumerate() {
        put( &mut buf, DIM + i*2, &v.to_le_bytes());
    }

    put( &mut buf, DATATYPE, &DT_INT16.to_le_bytes());
    put( &mut buf, BITPIX, &16i16.to_le_bytes());

    let pixdim: [f32;8] = [1.0, md.spacing[0] as f32, md.spacing[1] as f32, md.spacing[2] as f32, 1.0, 1.0, 1.0, 1.0];
    for (i,v) in pixdim.iter().enumerate() {
        put( &mut buf, PIXDIM + i*4, &v.to_le_bytes());
    }

    put( &mut buf, VOX_OFFSET, &(DATA_OFFSET as f32).to_le_bytes());
    put( &mut buf, SCL_SLOPE, &1.0f32.to_le_bytes());
    put( &mut buf, SCL_INTER, &0.0f32.to_le_bytes());
    buf[XYZT_UNITS] = UNITS_MM;

    put( &mut buf, QFORM_CODE, &0i16.to_le_bytes());
    put( &mut buf, SFORM_CODE, &XFORM_SCANNER_ANAT.to_le_bytes());

    for i in 0..3 { // srow_x, srow_y and srow_z are consecutive
        let mut row = [0f32;4];
        for j in 0..3 {
            row[j] = (LPS[i] * md.direction[3*i + j] * md.spacing[j]) as f32;
        }
        row[3] = (LPS[i] * md.origin[i]) as f32;

        for (j,v) in row.iter().enumerate() {
            put( &mut buf, SROW_X + i*16 + j*4, &v.to_le_bytes());
        }
    }

    put( &mut buf, MAGIC, b"n+1\0");

    Ok(buf)
}

fn put (buf: &mut [u8], offset: usize, bytes: &[u8]) {
    buf[offset..offset + bytes.len()].copy_from_slice( bytes);
}

/* #endregion writing */
