//! Points on the unit sphere and their cube-face projection.
//!
//! A point is projected onto the face of the enclosing cube whose axis has
//! the largest absolute component. Each face is described by one row of
//! `FACE_AXES`: the axis normal to the face and the signed axes that become
//! the face's `u` and `v` coordinates.
//!
//! ```text
//! face | normal | u      | v
//! -----+--------+--------+-------
//!  0   |  +x    |  y/x   |  z/x
//!  1   |  +y    | -x/y   |  z/y
//!  2   |  +z    | -x/z   | -y/z
//!  3   |  -x    |  z/x   |  y/x
//!  4   |  -y    |  z/y   | -x/y
//!  5   |  -z    | -y/z   | -x/z
//! ```

use serde::{Deserialize, Serialize};

/// Axis index into a point's `[x, y, z]` components.
const X: usize = 0;
const Y: usize = 1;
const Z: usize = 2;

/// Projection algebra for one cube face.
#[derive(Debug, Clone, Copy)]
struct FaceAxes {
    normal: usize,
    u_axis: usize,
    u_sign: f64,
    v_axis: usize,
    v_sign: f64,
}

const FACE_AXES: [FaceAxes; 6] = [
    FaceAxes { normal: X, u_axis: Y, u_sign: 1.0, v_axis: Z, v_sign: 1.0 },
    FaceAxes { normal: Y, u_axis: X, u_sign: -1.0, v_axis: Z, v_sign: 1.0 },
    FaceAxes { normal: Z, u_axis: X, u_sign: -1.0, v_axis: Y, v_sign: -1.0 },
    FaceAxes { normal: X, u_axis: Z, u_sign: 1.0, v_axis: Y, v_sign: 1.0 },
    FaceAxes { normal: Y, u_axis: Z, u_sign: 1.0, v_axis: X, v_sign: -1.0 },
    FaceAxes { normal: Z, u_axis: Y, u_sign: -1.0, v_axis: X, v_sign: -1.0 },
];

/// A point on (or near) the unit sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A face index together with the point's coordinates on that face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceUv {
    pub face: u8,
    pub u: f64,
    pub v: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Convert a latitude/longitude pair in degrees to a unit vector.
    pub fn from_lat_lng(lat_degrees: f64, lng_degrees: f64) -> Self {
        let phi = lat_degrees.to_radians();
        let theta = lng_degrees.to_radians();
        let cos_phi = phi.cos();
        Self {
            x: theta.cos() * cos_phi,
            y: theta.sin() * cos_phi,
            z: phi.sin(),
        }
    }

    /// Inverse of the face projection: the (unnormalized) point at `(u, v)`
    /// on `face`.
    pub fn from_face_uv(face: u8, u: f64, v: f64) -> Self {
        let axes = &FACE_AXES[face as usize];
        let n = if face < 3 { 1.0 } else { -1.0 };
        let mut c = [0.0; 3];
        c[axes.normal] = n;
        c[axes.u_axis] = axes.u_sign * u * n;
        c[axes.v_axis] = axes.v_sign * v * n;
        Self::new(c[X], c[Y], c[Z])
    }

    pub fn dot(&self, other: &Point) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    fn components(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Index of the component with the largest magnitude. Ties go to the
    /// later axis.
    pub fn largest_abs_component(&self) -> usize {
        let (ax, ay, az) = (self.x.abs(), self.y.abs(), self.z.abs());
        if ax > ay {
            if ax > az {
                X
            } else {
                Z
            }
        } else if ay > az {
            Y
        } else {
            Z
        }
    }

    /// Pick the cube face this point falls on and project onto it.
    pub fn to_face_uv(&self) -> FaceUv {
        let axis = self.largest_abs_component();
        let mut face = axis as u8;
        if self.components()[axis] < 0.0 {
            face += 3;
        }
        let (u, v) = self.valid_face_uv(face);
        FaceUv { face, u, v }
    }

    /// Project onto a face the point is known to lie on.
    ///
    /// The point must be in the face's hemisphere; anything else is a caller
    /// bug, not a recoverable condition.
    pub fn valid_face_uv(&self, face: u8) -> (f64, f64) {
        debug_assert!(
            self.dot(&Point::from_face_uv(face, 0.0, 0.0)) > 0.0,
            "point is not on face {}",
            face
        );
        let axes = &FACE_AXES[face as usize];
        let c = self.components();
        let u = axes.u_sign * c[axes.u_axis] / c[axes.normal];
        let v = axes.v_sign * c[axes.v_axis] / c[axes.normal];
        (u, v)
    }
}

/// The mapping between face coordinates `u` in `[-1, 1]` and cell-space
/// coordinates `s` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Projection {
    Linear,
    /// `s = (2/π)(atan u + π/4)`, the exact inverse of `st_to_uv`.
    ///
    /// Deliberately not the `(2/π)(atan u · π/4)` form some S2 ports ship:
    /// that one maps `[-1, 1]` onto `[-0.25, 0.25]` and cannot round-trip.
    Tan,
    #[default]
    Quadratic,
}

impl Projection {
    pub fn uv_to_st(self, u: f64) -> f64 {
        match self {
            Self::Linear => 0.5 * (u + 1.0),
            Self::Tan => std::f64::consts::FRAC_2_PI * (u.atan() + std::f64::consts::FRAC_PI_4),
            Self::Quadratic => {
                if u >= 0.0 {
                    0.5 * (1.0 + 3.0 * u).sqrt()
                } else {
                    1.0 - 0.5 * (1.0 - 3.0 * u).sqrt()
                }
            }
        }
    }

    pub fn st_to_uv(self, s: f64) -> f64 {
        match self {
            Self::Linear => 2.0 * s - 1.0,
            Self::Tan => (std::f64::consts::FRAC_PI_2 * s - std::f64::consts::FRAC_PI_4).tan(),
            Self::Quadratic => {
                if s >= 0.5 {
                    (4.0 * s * s - 1.0) / 3.0
                } else {
                    (1.0 - 4.0 * (1.0 - s) * (1.0 - s)) / 3.0
                }
            }
        }
    }
}
