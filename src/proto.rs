//! Envelope wire messages.
//!
//! Only the frames this crate reads or writes are modelled. Sub-request and
//! sub-response payloads stay opaque byte buffers; the auth ticket is carried
//! as its raw serialized bytes, which is wire-identical to the embedded
//! message and is exactly what the signature hashes.

use prost::{Enumeration, Message};

/// Status code of a response envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum StatusCode {
    Unknown = 0,
    Ok = 1,
    OkRpcUrlInResponse = 2,
    BadRequest = 3,
    InvalidRequest = 51,
    InvalidPlatformRequest = 52,
    Redirect = 53,
    SessionInvalidated = 100,
    InvalidAuthToken = 102,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum PlatformRequestType {
    Unset = 0,
    SendEncryptedSignature = 6,
}

/// Status code every outgoing envelope carries.
pub const REQUEST_STATUS_CODE: i32 = 2;

#[derive(Clone, PartialEq, Message)]
pub struct RequestEnvelope {
    #[prost(int32, tag = "1")]
    pub status_code: i32,
    #[prost(uint64, tag = "3")]
    pub request_id: u64,
    #[prost(message, repeated, tag = "4")]
    pub requests: Vec<Request>,
    #[prost(message, repeated, tag = "6")]
    pub platform_requests: Vec<PlatformRequest>,
    #[prost(double, tag = "7")]
    pub latitude: f64,
    #[prost(double, tag = "8")]
    pub longitude: f64,
    #[prost(double, tag = "9")]
    pub accuracy: f64,
    #[prost(message, optional, tag = "10")]
    pub auth_info: Option<AuthInfo>,
    #[prost(bytes = "vec", optional, tag = "11")]
    pub auth_ticket: Option<Vec<u8>>,
    #[prost(int64, tag = "12")]
    pub ms_since_last_locationfix: i64,
}

/// One game-logic sub-request.
#[derive(Clone, PartialEq, Message)]
pub struct Request {
    #[prost(int32, tag = "1")]
    pub request_type: i32,
    #[prost(bytes = "vec", tag = "2")]
    pub request_message: Vec<u8>,
}

/// Credentials sent on the first, unauthenticated, request.
#[derive(Clone, PartialEq, Message)]
pub struct AuthInfo {
    #[prost(string, tag = "1")]
    pub provider: String,
    #[prost(message, optional, tag = "2")]
    pub token: Option<JwtToken>,
}

#[derive(Clone, PartialEq, Message)]
pub struct JwtToken {
    #[prost(string, tag = "1")]
    pub contents: String,
    #[prost(int32, tag = "2")]
    pub unknown2: i32,
}

#[derive(Clone, PartialEq, Message)]
pub struct PlatformRequest {
    #[prost(enumeration = "PlatformRequestType", tag = "1")]
    pub r#type: i32,
    #[prost(bytes = "vec", tag = "2")]
    pub request_message: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct SendEncryptedSignatureRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub encrypted_signature: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Signature {
    #[prost(uint64, tag = "2")]
    pub timestamp_since_start: u64,
    #[prost(message, repeated, tag = "4")]
    pub location_fix: Vec<LocationFix>,
    #[prost(message, optional, tag = "7")]
    pub sensor_info: Option<SensorInfo>,
    #[prost(message, optional, tag = "8")]
    pub device_info: Option<DeviceInfo>,
    #[prost(message, optional, tag = "9")]
    pub activity_status: Option<ActivityStatus>,
    #[prost(uint32, tag = "10")]
    pub location_hash1: u32,
    #[prost(uint32, tag = "20")]
    pub location_hash2: u32,
    #[prost(bytes = "vec", tag = "22")]
    pub session_hash: Vec<u8>,
    #[prost(uint64, tag = "23")]
    pub timestamp: u64,
    #[prost(uint64, repeated, tag = "24")]
    pub request_hash: Vec<u64>,
    #[prost(int64, tag = "25")]
    pub unknown25: i64,
}

#[derive(Clone, PartialEq, Message)]
pub struct LocationFix {
    #[prost(string, tag = "1")]
    pub provider: String,
    #[prost(uint64, tag = "2")]
    pub timestamp_snapshot: u64,
    #[prost(float, tag = "4")]
    pub altitude: f32,
    #[prost(float, tag = "13")]
    pub latitude: f32,
    #[prost(float, tag = "14")]
    pub longitude: f32,
    #[prost(float, tag = "18")]
    pub speed: f32,
    #[prost(float, tag = "20")]
    pub course: f32,
    #[prost(uint64, tag = "26")]
    pub provider_status: u64,
    #[prost(int32, optional, tag = "27")]
    pub floor: Option<i32>,
    #[prost(uint64, tag = "28")]
    pub location_type: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct SensorInfo {
    #[prost(uint64, tag = "1")]
    pub timestamp_snapshot: u64,
    #[prost(double, tag = "2")]
    pub linear_acceleration_x: f64,
    #[prost(double, tag = "3")]
    pub linear_acceleration_y: f64,
    #[prost(double, tag = "4")]
    pub linear_acceleration_z: f64,
    #[prost(double, tag = "5")]
    pub magnetic_field_x: f64,
    #[prost(double, tag = "6")]
    pub magnetic_field_y: f64,
    #[prost(double, tag = "7")]
    pub magnetic_field_z: f64,
    #[prost(double, tag = "8")]
    pub rotation_vector_x: f64,
    #[prost(double, tag = "9")]
    pub rotation_vector_y: f64,
    #[prost(double, tag = "10")]
    pub rotation_vector_z: f64,
    #[prost(double, tag = "11")]
    pub gyroscope_raw_x: f64,
    #[prost(double, tag = "12")]
    pub gyroscope_raw_y: f64,
    #[prost(double, tag = "13")]
    pub gyroscope_raw_z: f64,
    #[prost(double, tag = "14")]
    pub gravity_x: f64,
    #[prost(double, tag = "15")]
    pub gravity_y: f64,
    #[prost(double, tag = "16")]
    pub gravity_z: f64,
}

#[derive(Clone, PartialEq, Message)]
pub struct DeviceInfo {
    #[prost(string, tag = "1")]
    pub device_id: String,
    #[prost(string, optional, tag = "2")]
    pub android_board_name: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub android_bootloader: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub device_brand: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub device_model: Option<String>,
    #[prost(string, optional, tag = "6")]
    pub device_model_identifier: Option<String>,
    #[prost(string, optional, tag = "7")]
    pub device_model_boot: Option<String>,
    #[prost(string, optional, tag = "8")]
    pub hardware_manufacturer: Option<String>,
    #[prost(string, optional, tag = "9")]
    pub hardware_model: Option<String>,
    #[prost(string, optional, tag = "10")]
    pub firmware_brand: Option<String>,
    #[prost(string, optional, tag = "12")]
    pub firmware_tags: Option<String>,
    #[prost(string, optional, tag = "13")]
    pub firmware_type: Option<String>,
    #[prost(string, optional, tag = "14")]
    pub firmware_fingerprint: Option<String>,
}

#[derive(Clone, PartialEq, Message)]
pub struct ActivityStatus {
    #[prost(uint64, tag = "1")]
    pub start_time_ms: u64,
    #[prost(bool, tag = "2")]
    pub unknown_status: bool,
    #[prost(bool, tag = "3")]
    pub walking: bool,
    #[prost(bool, tag = "4")]
    pub running: bool,
    #[prost(bool, tag = "5")]
    pub stationary: bool,
    #[prost(bool, tag = "6")]
    pub automotive: bool,
    #[prost(bool, tag = "7")]
    pub tilting: bool,
    #[prost(bool, tag = "8")]
    pub cycling: bool,
}

#[derive(Clone, PartialEq, Message)]
pub struct ResponseEnvelope {
    #[prost(enumeration = "StatusCode", tag = "1")]
    pub status_code: i32,
    #[prost(uint64, tag = "2")]
    pub request_id: u64,
    #[prost(string, tag = "3")]
    pub api_url: String,
    #[prost(message, repeated, tag = "6")]
    pub platform_returns: Vec<PlatformResponse>,
    #[prost(bytes = "vec", optional, tag = "7")]
    pub auth_ticket: Option<Vec<u8>>,
    #[prost(bytes = "vec", repeated, tag = "100")]
    pub returns: Vec<Vec<u8>>,
    #[prost(string, tag = "101")]
    pub error: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct PlatformResponse {
    #[prost(int32, tag = "1")]
    pub r#type: i32,
    #[prost(bytes = "vec", tag = "2")]
    pub response: Vec<u8>,
}
