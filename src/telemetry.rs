//! Device, sensor and activity blocks of the signature.
//!
//! Sensor readings are drawn fresh on every request, one uniform sample per
//! axis inside the literal bounds below. The bounds were captured from real
//! handsets; a few are degenerate (min == max) and always yield the constant.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::proto;

/// Inclusive `(min, max)` bounds for one sensor axis.
pub type Bounds = (f64, f64);

pub const LINEAR_ACCELERATION: [Bounds; 3] = [
    (-0.139084026217, 0.138112977147),
    (-0.2, 0.19),
    (-0.2, 0.4),
];

pub const MAGNETIC_FIELD: [Bounds; 3] = [
    (-47.149471283, 61.8397789001),
    (-47.149471283, 61.8397789001),
    (-47.149471283, 5.0),
];

pub const ROTATION_VECTOR: [Bounds; 3] = [
    (0.0729667818829, 0.0729667818829),
    (-2.788630499244109, 3.0586791383810468),
    (-0.34825887123552773, 0.19347580173737935),
];

pub const GYROSCOPE_RAW: [Bounds; 3] = [
    (-0.9703824520111084, 0.8556089401245117),
    (-1.7470258474349976, 1.4218578338623047),
    (-0.9681901931762695, 0.8396636843681335),
];

pub const GRAVITY: [Bounds; 3] = [
    (-0.31110161542892456, 0.1681540310382843),
    (-0.6574847102165222, -0.07290205359458923),
    (-0.9943905472755432, -0.7463029026985168),
];

fn sample<R: Rng>(rng: &mut R, bounds: [Bounds; 3]) -> [f64; 3] {
    bounds.map(|(min, max)| rng.gen_range(min..=max))
}

/// Draw a fresh sensor block stamped with `timestamp_snapshot`.
pub fn random_sensor_info<R: Rng>(rng: &mut R, timestamp_snapshot: u64) -> proto::SensorInfo {
    let [lx, ly, lz] = sample(rng, LINEAR_ACCELERATION);
    let [mx, my, mz] = sample(rng, MAGNETIC_FIELD);
    let [rx, ry, rz] = sample(rng, ROTATION_VECTOR);
    let [gx, gy, gz] = sample(rng, GYROSCOPE_RAW);
    let [vx, vy, vz] = sample(rng, GRAVITY);

    proto::SensorInfo {
        timestamp_snapshot,
        linear_acceleration_x: lx,
        linear_acceleration_y: ly,
        linear_acceleration_z: lz,
        magnetic_field_x: mx,
        magnetic_field_y: my,
        magnetic_field_z: mz,
        rotation_vector_x: rx,
        rotation_vector_y: ry,
        rotation_vector_z: rz,
        gyroscope_raw_x: gx,
        gyroscope_raw_y: gy,
        gyroscope_raw_z: gz,
        gravity_x: vx,
        gravity_y: vy,
        gravity_z: vz,
    }
}

/// An empty activity block. The server only checks that one is present.
pub fn activity_status() -> proto::ActivityStatus {
    proto::ActivityStatus::default()
}

/// Identity of the emulated handset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceInfo {
    pub device_id: String,
    pub android_board_name: Option<String>,
    pub android_bootloader: Option<String>,
    pub device_brand: Option<String>,
    pub device_model: Option<String>,
    pub device_model_identifier: Option<String>,
    pub device_model_boot: Option<String>,
    pub hardware_manufacturer: Option<String>,
    pub hardware_model: Option<String>,
    pub firmware_brand: Option<String>,
    pub firmware_tags: Option<String>,
    pub firmware_type: Option<String>,
    pub firmware_fingerprint: Option<String>,
}

/// Supplies device identity for each signature.
pub trait DeviceInfoProvider: Send + Sync {
    fn device_info(&self) -> DeviceInfo;
}

impl DeviceInfoProvider for DeviceInfo {
    fn device_info(&self) -> DeviceInfo {
        self.clone()
    }
}

impl From<DeviceInfo> for proto::DeviceInfo {
    fn from(d: DeviceInfo) -> Self {
        Self {
            device_id: d.device_id,
            android_board_name: d.android_board_name,
            android_bootloader: d.android_bootloader,
            device_brand: d.device_brand,
            device_model: d.device_model,
            device_model_identifier: d.device_model_identifier,
            device_model_boot: d.device_model_boot,
            hardware_manufacturer: d.hardware_manufacturer,
            hardware_model: d.hardware_model,
            firmware_brand: d.firmware_brand,
            firmware_tags: d.firmware_tags,
            firmware_type: d.firmware_type,
            firmware_fingerprint: d.firmware_fingerprint,
        }
    }
}
