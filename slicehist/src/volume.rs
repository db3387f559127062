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

use std::{fs::File, io::{BufReader, BufWriter, Read, Seek, Write}, path::Path};
use flate2::{write::GzEncoder, Compression};
use ndarray::{Array2, Array3, ArrayView2, Axis};
use serde::{Serialize,Deserialize};
use tempfile::{Builder, NamedTempFile};
use tiff::{
    ColorType,
    decoder::{Decoder, DecodingResult, Limits},
    encoder::{Compression as TiffCompression, DeflateLevel, TiffEncoder, colortype::GrayI16},
    tags::Tag
};
use tracing::{debug,warn};
use slicehist_common::fs::{has_extension, parent_dir};
use crate::{errors::{Result,SliceHistError}, nifti_io::{encode_nifti, load_nifti}};

pub const TIFF_EXTENSIONS: &[&str] = &["tif", "tiff"];

/// the supported volume containers, determined by file extension
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum VolumeFormat {
    /// multi-page gray TIFF (*.tif, *.tiff)
    Tiff,
    /// NIfTI-1 single file (*.nii)
    Nifti,
    /// gzip compressed NIfTI-1 (*.nii.gz)
    NiftiGz
}

impl VolumeFormat {
    pub fn from_path (path: impl AsRef<Path>)->Result<Self> {
        let path = path.as_ref();
        let name = path.file_name().and_then( |n| n.to_str()).map( |n| n.to_ascii_lowercase()).unwrap_or_default();

        if has_extension( &path, TIFF_EXTENSIONS) {
            Ok( VolumeFormat::Tiff )
        } else if has_extension( &path, &["nii"]) {
            Ok( VolumeFormat::Nifti )
        } else if name.ends_with(".nii.gz") {
            Ok( VolumeFormat::NiftiGz )
        } else {
            Err( SliceHistError::InvalidImageFormat( "volumes have to be stored as *.tif, *.tiff, *.nii or *.nii.gz files".into()))
        }
    }
}

/// the physical placement of a volume. This is carried through processing unchanged.
/// `direction` is a row-major 3x3 matrix
#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq)]
pub struct SpatialMetadata {
    pub origin: [f64;3],
    pub spacing: [f64;3],
    pub direction: [f64;9]
}

impl Default for SpatialMetadata {
    fn default()->Self {
        SpatialMetadata {
            origin: [0.0, 0.0, 0.0],
            spacing: [1.0, 1.0, 1.0],
            direction: [1.0, 0.0, 0.0,  0.0, 1.0, 0.0,  0.0, 0.0, 1.0]
        }
    }
}

/// a 3D volume of signed 16bit intensities, stored as (z,y,x) array
#[derive(Debug,Clone,PartialEq)]
pub struct Volume {
    data: Array3<i16>,
    metadata: SpatialMetadata
}

impl Volume {
    pub fn new (data: Array3<i16>, metadata: SpatialMetadata)->Self {
        Volume{ data, metadata }
    }

    pub fn depth(&self)->usize { self.data.len_of( Axis(0)) }
    pub fn height(&self)->usize { self.data.len_of( Axis(1)) }
    pub fn width(&self)->usize { self.data.len_of( Axis(2)) }

    /// (width,height,depth)
    pub fn dimensions(&self)->(usize,usize,usize) {
        (self.width(), self.height(), self.depth())
    }

    pub fn metadata(&self)->&SpatialMetadata { &self.metadata }
    pub fn data(&self)->&Array3<i16> { &self.data }
    pub fn into_data(self)->Array3<i16> { self.data }

    /// view of slice `z`. Panics if z is out of range - use [`extract_slice`] for checked access
    pub fn slice(&self, z: usize)->ArrayView2<'_,i16> {
        self.data.index_axis( Axis(0), z)
    }

    pub fn slices(&self)->impl Iterator<Item=ArrayView2<'_,i16>> {
        self.data.axis_iter( Axis(0))
    }

    /// None for an empty volume
    pub fn stats(&self)->Option<IntensityStats> {
        IntensityStats::from_samples( self.data.iter())
    }
}

/// min/max/mean/standard deviation of intensity samples
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct IntensityStats {
    pub min: i16,
    pub max: i16,
    pub mean: f64,
    pub std_dev: f64,
    pub count: usize
}

impl IntensityStats {
    /// single pass (Welford) accumulation. Returns None if there are no samples
    pub fn from_samples<'a> (samples: impl IntoIterator<Item=&'a i16>)->Option<Self> {
        let mut min = i16::MAX;
        let mut max = i16::MIN;
        let mut mean = 0.0;
        let mut m2 = 0.0;
        let mut count = 0;

        for &v in samples {
            count += 1;
            min = min.min(v);
            max = max.max(v);

            let x = v as f64;
            let delta = x - mean;
            mean += delta / count as f64;
            m2 += delta * (x - mean);
        }

        if count == 0 {
            None
        } else {
            Some( IntensityStats{ min, max, mean, std_dev: (m2 / count as f64).sqrt(), count } )
        }
    }
}

/* #region slice extraction and assembly *****************************************************************************/

/// get a standalone copy of slice `z`. This does not share storage with the volume
pub fn extract_slice (volume: &Volume, z: i64)->Result<Array2<i16>> {
    let depth = volume.depth();
    if z < 0 || z as u64 >= depth as u64 {
        return Err( SliceHistError::RangeError( format!("slice index {z} not within [0,{depth})")) )
    }

    Ok( volume.slice( z as usize).to_owned() )
}

/// stack slices along z into a new volume with the given metadata
pub fn assemble_volume (slices: &[Array2<i16>], metadata: SpatialMetadata)->Result<Volume> {
    let first = slices.first().ok_or( SliceHistError::InvalidDimensions( "no slices to assemble".into()))?;
    let dim = first.dim();

    if let Some((z,s)) = slices.iter().enumerate().find( |(_,s)| s.dim() != dim) {
        return Err( SliceHistError::InvalidDimensions( format!("slice {z} has shape {:?}, expected {:?}", s.dim(), dim)))
    }

    let views: Vec<ArrayView2<i16>> = slices.iter().map( |s| s.view()).collect();
    let data = ndarray::stack( Axis(0), &views)?;

    Ok( Volume::new( data, metadata) )
}

/* #endregion slice extraction and assembly */

/* #region volume I/O ************************************************************************************************/

/// read a volume from a multi-page gray TIFF (one page per z-slice) or a NIfTI-1 file, depending on the
/// file extension. Any failure is reported as a `LoadError`
pub fn read_volume<P> (path: P)->Result<Volume> where P: AsRef<Path> {
    let path = path.as_ref();
    load_volume( path).map_err( |e| e.into_load_error( path))
}

fn load_volume (path: &Path)->Result<Volume> {
    match VolumeFormat::from_path( path)? {
        VolumeFormat::Tiff => load_tiff( path),
        VolumeFormat::Nifti | VolumeFormat::NiftiGz => load_nifti( path)
    }
}

fn load_tiff (path: &Path)->Result<Volume> {
    let file = File::open( path)?;
    let mut decoder = Decoder::new( BufReader::new( file))?.with_limits( Limits::unlimited());
    let metadata = read_metadata( &mut decoder);

    let (w,h) = decoder.dimensions()?;
    let mut data: Vec<i16> = Vec::new();
    let mut depth = 0;

    loop {
        let (pw,ph) = decoder.dimensions()?;
        if (pw,ph) != (w,h) {
            return Err( SliceHistError::InvalidDimensions( format!("page {depth} is {pw}x{ph}, expected {w}x{h}")))
        }
        match decoder.colortype()? {
            ColorType::Gray(_) => {}
            other => return Err( SliceHistError::InvalidImageFormat( format!("page {depth} is not grayscale: {other:?}")))
        }

        append_samples( &mut data, decoder.read_image()?, depth)?;
        depth += 1;

        if !decoder.more_images() { break }
        decoder.next_image()?;
    }

    debug!("read volume {}: {}x{}x{}", path.display(), w, h, depth);
    let data = Array3::from_shape_vec( (depth, h as usize, w as usize), data)?;
    Ok( Volume::new( data, metadata) )
}

fn read_metadata<R> (decoder: &mut Decoder<R>)->SpatialMetadata where R: Read + Seek {
    match decoder.get_tag_ascii_string( Tag::ImageDescription) {
        Ok(desc) => {
            match serde_json::from_str::<SpatialMetadata>( desc.trim_end_matches('\0')) {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!("ignoring unknown image description ({e}), using default spatial metadata");
                    SpatialMetadata::default()
                }
            }
        }
        Err(_) => {
            debug!("no image description, using default spatial metadata");
            SpatialMetadata::default()
        }
    }
}

fn append_samples (data: &mut Vec<i16>, result: DecodingResult, page: usize)->Result<()> {
    match result {
        DecodingResult::I16(v) => data.extend_from_slice( &v),
        DecodingResult::U8(v) => data.extend( v.iter().map( |s| i16::from(*s))),
        DecodingResult::I8(v) => data.extend( v.iter().map( |s| i16::from(*s))),
        DecodingResult::U16(v) => {
            for s in v {
                let s = i16::try_from(s).map_err( |_| SliceHistError::InvalidImageFormat(
                    format!("page {page}: sample value {s} exceeds i16 range")))?;
                data.push(s);
            }
        }
        _ => return Err( SliceHistError::InvalidImageFormat( format!("page {page}: unsupported sample type")))
    }
    Ok(())
}

/// write volume in the format given by the file extension.
///
/// TIFF output is a Deflate compressed multi-page file with `GrayI16` pages and the spatial metadata stored
/// as JSON in the ImageDescription of the first page. NIfTI output has `INT16` samples and an sform affine.
/// The file is written to a temp file in the target dir that is only moved into place after it is complete.
/// Any failure is reported as `WriteError`
pub fn write_volume<P> (volume: &Volume, path: P)->Result<()> where P: AsRef<Path> {
    let path = path.as_ref();
    store_volume( volume, path).map_err( |e| e.into_write_error( path))
}

fn store_volume (volume: &Volume, path: &Path)->Result<()> {
    let format = VolumeFormat::from_path( path)?;
    if volume.depth() == 0 || volume.width() == 0 || volume.height() == 0 {
        return Err( SliceHistError::InvalidDimensions( format!("cannot store empty volume {:?}", volume.dimensions())))
    }

    let mut tmp = output_tempfile( path)?; // don't write to path directly, we don't want partial output
    match format {
        VolumeFormat::Tiff => encode_tiff( volume, tmp.as_file_mut())?,
        VolumeFormat::Nifti => {
            let mut writer = BufWriter::new( tmp.as_file_mut());
            encode_nifti( volume, &mut writer)?;
            writer.flush()?;
        }
        VolumeFormat::NiftiGz => {
            let mut gz = GzEncoder::new( tmp.as_file_mut(), Compression::default());
            encode_nifti( volume, &mut gz)?;
            gz.finish()?;
        }
    }
    tmp.as_file_mut().flush()?;
    tmp.persist( path).map_err( |e| SliceHistError::IOError( e.error))?;

    debug!("wrote {:?} volume {}", format, path.display());
    Ok(())
}

/// temp file next to `path`. Its mode is subject to the umask like a file opened with `File::create`,
/// not the owner-only mode of default temp files
fn output_tempfile (path: &Path)->Result<NamedTempFile> {
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions( std::fs::Permissions::from_mode( 0o666));
    }
    Ok( builder.tempfile_in( parent_dir( path))? )
}

fn encode_tiff<W> (volume: &Volume, writer: W)->Result<()> where W: Write + Seek {
    let mut tiff = TiffEncoder::new( writer)?.with_compression( TiffCompression::Deflate( DeflateLevel::Best));
    let description = serde_json::to_string( volume.metadata())?;
    let w = volume.width() as u32;
    let h = volume.height() as u32;

    for (z,slice) in volume.slices().enumerate() {
        let mut image = tiff.new_image::<GrayI16>( w, h)?;
        if z == 0 {
            image.encoder().write_tag( Tag::ImageDescription, description.as_str())?;
        }
        let samples: Vec<i16> = slice.iter().copied().collect();
        image.write_data( &samples)?;
    }

    Ok(())
}

/* #endregion volume I/O */
