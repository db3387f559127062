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

use serde::{Serialize,Deserialize};
use tempfile::tempdir;
use slicehist_common::{load_ron_file, save_ron_file, ConfigError, fs::{has_extension, parent_dir}};

#[derive(Serialize,Deserialize,Debug,PartialEq)]
struct TestConfig {
    name: String,
    levels: Vec<u32>,
    scale: f64
}

#[test]
fn test_ron_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.ron");

    let config = TestConfig { name: "slices".into(), levels: vec![256, 512], scale: 0.5 };
    save_ron_file( &config, &path).unwrap();
    println!("{}", std::fs::read_to_string( &path).unwrap());

    let restored: TestConfig = load_ron_file( &path).unwrap();
    assert_eq!( restored, config);
}

#[test]
fn test_load_errors() {
    let dir = tempdir().unwrap();

    let res: Result<TestConfig,ConfigError> = load_ron_file( dir.path().join("missing.ron"));
    assert!( matches!( res, Err(ConfigError::IOError(_))));

    let path = dir.path().join("empty.ron");
    std::fs::write( &path, "").unwrap();
    let res: Result<TestConfig,ConfigError> = load_ron_file( &path);
    assert!( matches!( res, Err(ConfigError::IOError(_))));

    let path = dir.path().join("bad.ron");
    std::fs::write( &path, "TestConfig(name: 42)").unwrap();
    let res: Result<TestConfig,ConfigError> = load_ron_file( &path);
    println!("{res:?}");
    assert!( matches!( res, Err(ConfigError::RonSerdeError(_))));
}

#[test]
fn test_path_helpers() {
    assert!( has_extension( &"volume.tif", &["tif", "tiff"]));
    assert!( has_extension( &"/data/VOLUME.TIFF", &["tif", "tiff"]));
    assert!( !has_extension( &"volume.nii", &["tif", "tiff"]));
    assert!( !has_extension( &"volume", &["tif"]));

    assert_eq!( parent_dir( "out.tif"), std::path::PathBuf::from("."));
    assert_eq!( parent_dir( "/tmp/x/out.tif"), std::path::PathBuf::from("/tmp/x"));
}
