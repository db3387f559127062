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

use std::fs::File;
use std::io::{self, Read, ErrorKind};
use std::path::{Path,PathBuf};

pub fn extension<'a,T: AsRef<Path>> (path: &'a T)->Option<&'a str> {
    path.as_ref().extension().and_then(|ostr| ostr.to_str())
}

/// case insensitive check if path has one of the given extensions (without leading '.')
pub fn has_extension<T: AsRef<Path>> (path: &T, exts: &[&str])->bool {
    extension( path).map_or( false, |ext| exts.iter().any( |e| e.eq_ignore_ascii_case( ext)))
}

/// the directory a file at `path` would be created in. Bare filenames resolve to "."
pub fn parent_dir (path: impl AsRef<Path>)->PathBuf {
    match path.as_ref().parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from(".")
    }
}

pub fn existing_non_empty_file_from_path (path: impl AsRef<Path>)->io::Result<File> {
    let path = path.as_ref();
    if path.is_file() {
        let file = File::open( path)?;
        if file.metadata()?.len() > 0 {
            Ok(file)
        } else {
            Err( io::Error::new( ErrorKind::InvalidData, format!("empty file: {}", path.display())))
        }
    } else {
        Err( io::Error::new( ErrorKind::NotFound, format!("no such file: {}", path.display())))
    }
}

pub fn filepath_contents (path: impl AsRef<Path>)->io::Result<Vec<u8>> {
    let mut file = existing_non_empty_file_from_path( path)?;
    let len = file.metadata()?.len() as usize;
    let mut buf: Vec<u8> = Vec::with_capacity( len);
    file.read_to_end( &mut buf)?;
    Ok(buf)
}
