//! Binary save/load for the feature model.
//!
//! Format: fixed header followed by one record per entry, all fields
//! little-endian.
//!
//! ```text
//! magic u32 | version u32 | capacity u32 | size u32 | write_idx u32
//! entry * size: mean (3 × f32) | covariance row-major (9 × f32)
//! ```
//!
//! Saves write to a `.tmp` sibling and atomically rename over the target,
//! so a failed save leaves any previous file intact.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use nalgebra::{Matrix3, Vector3};

use super::FeatureModel;
use crate::core::types::ModelEntry;
use crate::error::{OdomError, Result};

const MODEL_MAGIC: u32 = 0x4C444D46; // "FMDL"
const MODEL_VERSION: u32 = 1;

/// Save a model to a binary file.
pub fn save<P: AsRef<Path>>(model: &FeatureModel, path: P) -> Result<()> {
    let path = path.as_ref();
    let tmp = path.with_extension("tmp");

    {
        let file = File::create(&tmp)?;
        let mut writer = BufWriter::new(file);

        write_u32(&mut writer, MODEL_MAGIC)?;
        write_u32(&mut writer, MODEL_VERSION)?;
        write_u32(&mut writer, model.capacity() as u32)?;
        write_u32(&mut writer, model.len() as u32)?;
        write_u32(&mut writer, model.write_idx() as u32)?;

        for entry in model.entries() {
            for i in 0..3 {
                write_f32(&mut writer, entry.mean[i])?;
            }
            for r in 0..3 {
                for c in 0..3 {
                    write_f32(&mut writer, entry.covariance[(r, c)])?;
                }
            }
        }
        writer.flush()?;
    }

    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Load a model from a binary file, replacing any in-memory state.
///
/// The spatial index is rebuilt before the model is returned.
pub fn load<P: AsRef<Path>>(path: P) -> Result<FeatureModel> {
    let file = File::open(path.as_ref())?;
    let mut reader = BufReader::new(file);

    let magic = read_u32(&mut reader)?;
    if magic != MODEL_MAGIC {
        return Err(OdomError::CorruptFile("bad magic number".into()));
    }
    let version = read_u32(&mut reader)?;
    if version != MODEL_VERSION {
        return Err(OdomError::CorruptFile(format!(
            "unsupported version {version}"
        )));
    }

    let capacity = read_u32(&mut reader)? as usize;
    let size = read_u32(&mut reader)? as usize;
    let write_idx = read_u32(&mut reader)? as usize;

    if capacity == 0 {
        return Err(OdomError::CorruptFile("zero capacity".into()));
    }
    if size > capacity {
        return Err(OdomError::CorruptFile(format!(
            "declared size {size} exceeds capacity {capacity}"
        )));
    }
    if write_idx >= capacity {
        return Err(OdomError::CorruptFile(format!(
            "write cursor {write_idx} out of range for capacity {capacity}"
        )));
    }

    let mut entries = Vec::with_capacity(size);
    for _ in 0..size {
        let mut mean = Vector3::zeros();
        for i in 0..3 {
            mean[i] = read_f32_entry(&mut reader)?;
        }
        let mut covariance = Matrix3::zeros();
        for r in 0..3 {
            for c in 0..3 {
                covariance[(r, c)] = read_f32_entry(&mut reader)?;
            }
        }
        entries.push(ModelEntry::new(mean, covariance));
    }

    Ok(FeatureModel::from_raw(capacity, entries, write_idx))
}

fn write_u32<W: Write>(writer: &mut W, value: u32) -> Result<()> {
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn write_f32<W: Write>(writer: &mut W, value: f32) -> Result<()> {
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read an entry field; a short read means the file disagrees with its
/// declared size.
fn read_f32_entry<R: Read>(reader: &mut R) -> Result<f32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            OdomError::CorruptFile("entry data shorter than declared size".into())
        } else {
            OdomError::Io(e)
        }
    })?;
    Ok(f32::from_le_bytes(buf))
}
