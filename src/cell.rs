//! Hierarchical cell identifiers.
//!
//! A cell id is a 64-bit value laid out as:
//!
//! ```text
//! [ face (3 bits) ][ position along the curve (2 bits per level) ][ 1 ][ 0 ... ]
//! ```
//!
//! The trailing `1` (the "lsb") marks the level: a leaf cell at level 30 has
//! it at bit 0, a face cell at level 0 has it at bit 60. Truncating an id to a
//! coarser lsb yields its ancestor, so ids are order-preserving along the
//! space-filling curve and containment is a range check.

use std::fmt;
use std::sync::OnceLock;

use crate::error::RpcError;
use crate::point::{Point, Projection};

/// Finest level. Leaf cells live here.
pub const MAX_LEVEL: u8 = 30;

/// Bits of position data below the face bits, including the lsb marker.
pub const POS_BITS: u32 = 2 * MAX_LEVEL as u32 + 1;

/// Number of leaf cells along one edge of a face.
pub const MAX_SIZE: u32 = 1 << MAX_LEVEL;

const SWAP_MASK: usize = 0x01;
const INVERT_MASK: usize = 0x02;

/// Bits of `i` and `j` consumed per lookup step.
const LOOKUP_BITS: u32 = 4;

/// Orientation change applied after descending into child `pos`.
const POS_TO_ORIENTATION: [usize; 4] = [SWAP_MASK, 0, 0, INVERT_MASK | SWAP_MASK];

/// `(i, j)` quadrant visited at curve position `pos`, per orientation.
const POS_TO_IJ: [[usize; 4]; 4] = [[0, 1, 3, 2], [0, 2, 3, 1], [3, 2, 0, 1], [3, 1, 0, 2]];

/// Maps `(i chunk, j chunk, orientation)` to `(position chunk, orientation)`,
/// both packed as `(value << 2) | orientation`.
type LookupTable = [u16; 1 << (2 * LOOKUP_BITS + 2)];

fn lookup_pos() -> &'static LookupTable {
    static LOOKUP_POS: OnceLock<LookupTable> = OnceLock::new();
    LOOKUP_POS.get_or_init(|| {
        let mut table = [0u16; 1 << (2 * LOOKUP_BITS + 2)];
        for orientation in [0, SWAP_MASK, INVERT_MASK, SWAP_MASK | INVERT_MASK] {
            init_lookup_cell(&mut table, 0, 0, 0, orientation, 0, orientation);
        }
        table
    })
}

fn init_lookup_cell(
    table: &mut LookupTable,
    level: u32,
    i: usize,
    j: usize,
    orig_orientation: usize,
    pos: usize,
    orientation: usize,
) {
    if level == LOOKUP_BITS {
        let ij = (i << LOOKUP_BITS) + j;
        table[(ij << 2) + orig_orientation] = ((pos << 2) + orientation) as u16;
        return;
    }

    let r = POS_TO_IJ[orientation];
    for (index, quadrant) in r.iter().enumerate() {
        init_lookup_cell(
            table,
            level + 1,
            (i << 1) + (quadrant >> 1),
            (j << 1) + (quadrant & 1),
            orig_orientation,
            (pos << 2) + index,
            orientation ^ POS_TO_ORIENTATION[index],
        );
    }
}

/// Discretize a cell-space coordinate in `[0, 1]` to a leaf index.
pub fn st_to_ij(s: f64) -> u32 {
    let scaled = (f64::from(MAX_SIZE) * s).floor() as i64;
    scaled.clamp(0, i64::from(MAX_SIZE) - 1) as u32
}

/// The lsb marker of a cell at `level`.
pub fn lsb_for_level(level: u8) -> u64 {
    1u64 << (2 * u32::from(MAX_LEVEL - level))
}

/// A 64-bit hierarchical cell identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(u64);

impl CellId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Leaf cell containing `p`, under the quadratic projection.
    pub fn from_point(p: &Point) -> Self {
        let fuv = p.to_face_uv();
        let proj = Projection::Quadratic;
        let i = st_to_ij(proj.uv_to_st(fuv.u));
        let j = st_to_ij(proj.uv_to_st(fuv.v));
        Self::from_face_ij(fuv.face, i, j)
    }

    pub fn from_lat_lng(lat_degrees: f64, lng_degrees: f64) -> Self {
        Self::from_point(&Point::from_lat_lng(lat_degrees, lng_degrees))
    }

    /// Leaf cell at leaf coordinates `(i, j)` on `face`.
    ///
    /// Interleaves `i` and `j` four bits at a time, from the most significant
    /// chunk down, carrying the curve orientation between chunks.
    pub fn from_face_ij(face: u8, i: u32, j: u32) -> Self {
        let table = lookup_pos();
        let mask = (1u32 << LOOKUP_BITS) - 1;
        let mut n = u64::from(face) << (POS_BITS - 1);
        let mut bits = usize::from(face) & SWAP_MASK;

        for k in (0..8u32).rev() {
            bits += (((i >> (k * LOOKUP_BITS)) & mask) as usize) << (LOOKUP_BITS + 2);
            bits += (((j >> (k * LOOKUP_BITS)) & mask) as usize) << 2;
            bits = usize::from(table[bits]);
            n |= ((bits >> 2) as u64) << (k * 2 * LOOKUP_BITS);
            bits &= SWAP_MASK | INVERT_MASK;
        }

        Self((n << 1) | 1)
    }

    /// Face cell (level 0) for `face`.
    pub fn from_face(face: u8) -> Self {
        Self((u64::from(face) << (POS_BITS)) + lsb_for_level(0))
    }

    pub fn id(&self) -> u64 {
        self.0
    }

    pub fn face(&self) -> u8 {
        (self.0 >> POS_BITS) as u8
    }

    /// The single set bit marking this cell's level.
    pub fn lsb(&self) -> u64 {
        self.0 & self.0.wrapping_neg()
    }

    pub fn level(&self) -> u8 {
        MAX_LEVEL.saturating_sub((self.0.trailing_zeros() / 2) as u8)
    }

    pub fn is_leaf(&self) -> bool {
        self.0 & 1 != 0
    }

    /// A valid id has a face in `0..6` and its lsb at an even bit position.
    pub fn is_valid(&self) -> bool {
        self.face() < 6 && (self.lsb() & 0x1555_5555_5555_5555) != 0
    }

    /// Ancestor at `level`.
    ///
    /// Asking for a level finer than this cell's own is rejected; the bits
    /// needed to answer it do not exist.
    pub fn parent(&self, level: u8) -> Result<CellId, RpcError> {
        if level > MAX_LEVEL {
            return Err(RpcError::InvalidArgument(format!(
                "level {} exceeds max level {}",
                level, MAX_LEVEL
            )));
        }
        if level > self.level() {
            return Err(RpcError::InvalidArgument(format!(
                "level {} is finer than cell level {}",
                level,
                self.level()
            )));
        }
        let new_lsb = lsb_for_level(level);
        Ok(Self((self.0 & new_lsb.wrapping_neg()) | new_lsb))
    }

    /// Next cell at the same level along the curve.
    pub fn next(&self) -> CellId {
        Self(self.0.wrapping_add(self.lsb() << 1))
    }

    /// Previous cell at the same level along the curve.
    pub fn prev(&self) -> CellId {
        Self(self.0.wrapping_sub(self.lsb() << 1))
    }

    /// Smallest leaf id contained in this cell.
    pub fn range_min(&self) -> u64 {
        self.0 - self.lsb().saturating_sub(1)
    }

    /// Largest leaf id contained in this cell.
    pub fn range_max(&self) -> u64 {
        self.0 + self.lsb().saturating_sub(1)
    }

    pub fn contains(&self, other: &CellId) -> bool {
        other.range_min() >= self.range_min() && other.range_max() <= self.range_max()
    }

    /// Compact hex form with trailing zero nibbles removed.
    pub fn to_token(&self) -> String {
        if self.0 == 0 {
            return "X".to_string();
        }
        let hex = format!("{:016x}", self.0);
        hex.trim_end_matches('0').to_string()
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_token())
    }
}
