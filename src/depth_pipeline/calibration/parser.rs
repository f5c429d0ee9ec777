//! Binary calibration blob parsing.
//!
//! The factory calibration is delivered as an opaque byte blob read from the
//! device's calibration file resource. The blob is a fixed little-endian
//! record: a 4-byte magic, a u16 layout version, the reference sensor
//! dimensions as two u32, then nine f64 fields (fx, fy, cx, cy, k1, k2, k3,
//! p1, p2).

use tracing::debug;

use crate::depth_pipeline::calibration::types::{
    CalibrationParameters, CameraIntrinsics, DistortionCoefficients,
};
use crate::depth_pipeline::common::error::{PipelineError, Result};

const MAGIC: [u8; 4] = *b"LCAL";
const LAYOUT_VERSION: u16 = 1;

/// Magic + version + 2 x u32 dimensions + 9 x f64 parameters.
const BLOB_LEN: usize = 4 + 2 + 2 * 4 + 9 * 8;

fn take_u16(rest: &mut &[u8]) -> Option<u16> {
    let (chunk, tail) = rest.split_first_chunk::<2>()?;
    *rest = tail;
    Some(u16::from_le_bytes(*chunk))
}

fn take_u32(rest: &mut &[u8]) -> Option<u32> {
    let (chunk, tail) = rest.split_first_chunk::<4>()?;
    *rest = tail;
    Some(u32::from_le_bytes(*chunk))
}

fn take_f64(rest: &mut &[u8]) -> Option<f64> {
    let (chunk, tail) = rest.split_first_chunk::<8>()?;
    *rest = tail;
    Some(f64::from_le_bytes(*chunk))
}

impl CalibrationParameters {
    /// Parse a factory calibration blob.
    ///
    /// Fails with [`PipelineError::Calibration`] on an empty, truncated,
    /// wrong-magic, or unsupported-version blob, and when the decoded
    /// intrinsics are unusable (non-finite or zero focal lengths). Without
    /// valid calibration no undistortion is possible, so callers treat this
    /// as fatal for the whole session.
    pub fn from_blob(blob: &[u8]) -> Result<Self> {
        if blob.is_empty() {
            return Err(PipelineError::Calibration(
                "calibration blob is empty".to_string(),
            ));
        }
        if blob.len() < BLOB_LEN {
            return Err(PipelineError::Calibration(format!(
                "calibration blob truncated: {} bytes, expected {}",
                blob.len(),
                BLOB_LEN
            )));
        }

        let mut rest = blob;
        let (magic, tail) = rest
            .split_first_chunk::<4>()
            .ok_or_else(|| PipelineError::Calibration("calibration blob truncated".to_string()))?;
        rest = tail;
        if *magic != MAGIC {
            return Err(PipelineError::Calibration(format!(
                "unrecognized calibration magic {magic:02x?}"
            )));
        }

        let malformed =
            || PipelineError::Calibration("calibration blob truncated".to_string());

        let version = take_u16(&mut rest).ok_or_else(malformed)?;
        if version != LAYOUT_VERSION {
            return Err(PipelineError::Calibration(format!(
                "unsupported calibration layout version {version}"
            )));
        }

        let sensor_width = take_u32(&mut rest).ok_or_else(malformed)?;
        let sensor_height = take_u32(&mut rest).ok_or_else(malformed)?;
        if sensor_width == 0 || sensor_height == 0 {
            return Err(PipelineError::Calibration(format!(
                "invalid reference sensor size {sensor_width}x{sensor_height}"
            )));
        }

        let fx = take_f64(&mut rest).ok_or_else(malformed)?;
        let fy = take_f64(&mut rest).ok_or_else(malformed)?;
        let cx = take_f64(&mut rest).ok_or_else(malformed)?;
        let cy = take_f64(&mut rest).ok_or_else(malformed)?;
        let intrinsics = CameraIntrinsics { fx, fy, cx, cy };
        if !intrinsics.is_valid() {
            return Err(PipelineError::Calibration(format!(
                "unusable intrinsics: fx={fx}, fy={fy}, cx={cx}, cy={cy}"
            )));
        }

        let k1 = take_f64(&mut rest).ok_or_else(malformed)?;
        let k2 = take_f64(&mut rest).ok_or_else(malformed)?;
        let k3 = take_f64(&mut rest).ok_or_else(malformed)?;
        let p1 = take_f64(&mut rest).ok_or_else(malformed)?;
        let p2 = take_f64(&mut rest).ok_or_else(malformed)?;
        let distortion = DistortionCoefficients { k1, k2, k3, p1, p2 };

        debug!(
            sensor_width,
            sensor_height, fx, fy, cx, cy, "Parsed calibration blob"
        );

        Ok(Self {
            sensor_width,
            sensor_height,
            intrinsics,
            distortion,
        })
    }

    /// Encode parameters into the blob layout accepted by [`Self::from_blob`].
    ///
    /// Real devices only ever hand out blobs; this direction exists for the
    /// synthetic frame source and round-trip tests.
    pub fn to_blob(&self) -> Vec<u8> {
        let mut blob = Vec::with_capacity(BLOB_LEN);
        blob.extend_from_slice(&MAGIC);
        blob.extend_from_slice(&LAYOUT_VERSION.to_le_bytes());
        blob.extend_from_slice(&self.sensor_width.to_le_bytes());
        blob.extend_from_slice(&self.sensor_height.to_le_bytes());
        for value in [
            self.intrinsics.fx,
            self.intrinsics.fy,
            self.intrinsics.cx,
            self.intrinsics.cy,
            self.distortion.k1,
            self.distortion.k2,
            self.distortion.k3,
            self.distortion.p1,
            self.distortion.p2,
        ] {
            blob.extend_from_slice(&value.to_le_bytes());
        }
        blob
    }
}
