//! Column vectors: fixed-capacity batches of decoded values with a shared
//! null mask. The shapes mirror what the primitive decoders produce; the
//! conversion layer reads and writes them through the `MaskedVector` trait.

use crate::decimal::Dec;
use crate::error::{fmt_err, OrcResult};
use crate::time::Timestamp;

/// Null/repeat state shared by every vector shape.
///
/// Invariant: `no_nulls` implies every `is_null` entry is false. When
/// `is_repeating` is set, index 0 is authoritative for the whole batch.
#[derive(Debug)]
pub struct VectorMask {
    pub is_repeating: bool,
    pub no_nulls: bool,
    pub is_null: Vec<bool>,
}

impl VectorMask {
    fn with_capacity(capacity: usize) -> VectorMask {
        VectorMask {
            is_repeating: false,
            no_nulls: true,
            is_null: vec![false; capacity],
        }
    }

    pub fn reset(&mut self) {
        if !self.no_nulls {
            self.is_null.fill(false);
        }
        self.no_nulls = true;
        self.is_repeating = false;
    }

    pub fn set_null(&mut self, index: usize) {
        self.no_nulls = false;
        self.is_null[index] = true;
    }

    pub fn is_null(&self, index: usize) -> bool {
        !self.no_nulls && self.is_null[index]
    }
}

/// Uniform access for the vectorized conversion driver.
pub trait MaskedVector {
    fn mask(&self) -> &VectorMask;
    fn mask_mut(&mut self) -> &mut VectorMask;
    fn reset(&mut self);
}

macro_rules! masked_vector {
    ($type:ty) => {
        impl MaskedVector for $type {
            fn mask(&self) -> &VectorMask {
                &self.mask
            }

            fn mask_mut(&mut self) -> &mut VectorMask {
                &mut self.mask
            }

            fn reset(&mut self) {
                self.reset();
            }
        }
    };
}

/// BOOLEAN through LONG and DATE values.
#[derive(Debug)]
pub struct LongVector {
    pub values: Vec<i64>,
    pub mask: VectorMask,
}

impl LongVector {
    pub fn with_capacity(capacity: usize) -> LongVector {
        LongVector {
            values: vec![0; capacity],
            mask: VectorMask::with_capacity(capacity),
        }
    }

    pub fn reset(&mut self) {
        self.mask.reset();
    }
}

masked_vector!(LongVector);

/// FLOAT and DOUBLE values; floats are widened by the decoder.
#[derive(Debug)]
pub struct DoubleVector {
    pub values: Vec<f64>,
    pub mask: VectorMask,
}

impl DoubleVector {
    pub fn with_capacity(capacity: usize) -> DoubleVector {
        DoubleVector {
            values: vec![0.0; capacity],
            mask: VectorMask::with_capacity(capacity),
        }
    }

    pub fn reset(&mut self) {
        self.mask.reset();
    }
}

masked_vector!(DoubleVector);

/// STRING/CHAR/VARCHAR/BINARY values: one shared byte arena plus per-row
/// start and length.
#[derive(Debug)]
pub struct BytesVector {
    data: Vec<u8>,
    start: Vec<usize>,
    len: Vec<usize>,
    pub mask: VectorMask,
}

impl BytesVector {
    pub fn with_capacity(capacity: usize) -> BytesVector {
        BytesVector {
            data: Vec::new(),
            start: vec![0; capacity],
            len: vec![0; capacity],
            mask: VectorMask::with_capacity(capacity),
        }
    }

    pub fn reset(&mut self) {
        self.data.clear();
        self.mask.reset();
    }

    /// Append `bytes` to the arena and point row `index` at them.
    pub fn set_val(&mut self, index: usize, bytes: &[u8]) {
        let at = self.data.len();
        self.data.extend_from_slice(bytes);
        self.start[index] = at;
        self.len[index] = bytes.len();
    }

    pub fn val(&self, index: usize) -> &[u8] {
        &self.data[self.start[index]..self.start[index] + self.len[index]]
    }

    pub fn len_of(&self, index: usize) -> usize {
        self.len[index]
    }

    /// Shorten row `index` in place. Only ever shrinks.
    pub fn truncate_val(&mut self, index: usize, new_len: usize) {
        debug_assert!(new_len <= self.len[index]);
        self.len[index] = new_len;
    }
}

masked_vector!(BytesVector);

/// Backing store for decimal rows: materialized values, or unscaled i64 at
/// the vector's scale when precision fits 18 digits.
#[derive(Debug)]
enum DecimalStore {
    Values(Vec<Dec>),
    Packed64(Vec<i64>),
}

/// DECIMAL values with the vector's precision/scale enforced on every write.
#[derive(Debug)]
pub struct DecimalVector {
    precision: u8,
    scale: u8,
    store: DecimalStore,
    pub mask: VectorMask,
}

impl DecimalVector {
    pub fn with_capacity(capacity: usize, precision: u8, scale: u8) -> DecimalVector {
        DecimalVector {
            precision,
            scale,
            store: DecimalStore::Values(vec![Dec::ZERO; capacity]),
            mask: VectorMask::with_capacity(capacity),
        }
    }

    /// The 64-bit packed variant; only valid up to 18 digits of precision.
    pub fn packed64_with_capacity(capacity: usize, precision: u8, scale: u8) -> DecimalVector {
        assert!(precision <= 18, "packed decimal vector needs precision <= 18");
        DecimalVector {
            precision,
            scale,
            store: DecimalStore::Packed64(vec![0; capacity]),
            mask: VectorMask::with_capacity(capacity),
        }
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    pub fn is_packed64(&self) -> bool {
        matches!(self.store, DecimalStore::Packed64(_))
    }

    pub fn reset(&mut self) {
        self.mask.reset();
    }

    /// Write a row, enforcing the vector's precision/scale. A value that
    /// cannot be represented nulls the slot.
    pub fn set(&mut self, index: usize, value: Dec) {
        let Some(enforced) = value.enforce(self.precision, self.scale) else {
            self.mask.set_null(index);
            return;
        };
        match &mut self.store {
            DecimalStore::Values(rows) => rows[index] = enforced,
            DecimalStore::Packed64(rows) => {
                // enforce() capped the scale, so rescaling up cannot fail.
                let unscaled = enforced
                    .unscaled_at(self.scale)
                    .expect("enforced decimal rescales to vector scale");
                rows[index] = unscaled as i64;
            }
        }
    }

    pub fn get(&self, index: usize) -> Dec {
        match &self.store {
            DecimalStore::Values(rows) => rows[index],
            DecimalStore::Packed64(rows) => {
                Dec::from_unscaled(rows[index] as i128, self.scale as i64)
                    .expect("packed decimal64 is always in range")
            }
        }
    }
}

masked_vector!(DecimalVector);

/// TIMESTAMP instants.
#[derive(Debug)]
pub struct TimestampVector {
    seconds: Vec<i64>,
    nanos: Vec<u32>,
    pub mask: VectorMask,
}

impl TimestampVector {
    pub fn with_capacity(capacity: usize) -> TimestampVector {
        TimestampVector {
            seconds: vec![0; capacity],
            nanos: vec![0; capacity],
            mask: VectorMask::with_capacity(capacity),
        }
    }

    pub fn reset(&mut self) {
        self.mask.reset();
    }

    /// Write a row; `None` nulls the slot (failed conversions carry no
    /// instant).
    pub fn set(&mut self, index: usize, value: Option<Timestamp>) {
        match value {
            Some(ts) => {
                self.seconds[index] = ts.seconds();
                self.nanos[index] = ts.nanos();
            }
            None => self.mask.set_null(index),
        }
    }

    pub fn get(&self, index: usize) -> Timestamp {
        Timestamp::new(self.seconds[index], self.nanos[index])
    }
}

masked_vector!(TimestampVector);

/// The batch handed across the decoder boundary: one vector, tagged by
/// shape.
#[derive(Debug)]
pub enum ColumnBatch {
    Long(LongVector),
    Double(DoubleVector),
    Bytes(BytesVector),
    Decimal(DecimalVector),
    Timestamp(TimestampVector),
}

macro_rules! batch_accessors {
    ($as_ref:ident, $as_mut:ident, $variant:ident, $vector:ty, $name:literal) => {
        pub fn $as_ref(&self) -> OrcResult<&$vector> {
            match self {
                ColumnBatch::$variant(v) => Ok(v),
                other => Err(fmt_err!(
                    Invalid,
                    "expected {} vector, got {}",
                    $name,
                    other.shape_name()
                )),
            }
        }

        pub fn $as_mut(&mut self) -> OrcResult<&mut $vector> {
            match self {
                ColumnBatch::$variant(v) => Ok(v),
                other => Err(fmt_err!(
                    Invalid,
                    "expected {} vector, got {}",
                    $name,
                    other.shape_name()
                )),
            }
        }
    };
}

impl ColumnBatch {
    batch_accessors!(as_longs, as_longs_mut, Long, LongVector, "long");
    batch_accessors!(as_doubles, as_doubles_mut, Double, DoubleVector, "double");
    batch_accessors!(as_bytes, as_bytes_mut, Bytes, BytesVector, "bytes");
    batch_accessors!(as_decimals, as_decimals_mut, Decimal, DecimalVector, "decimal");
    batch_accessors!(
        as_timestamps,
        as_timestamps_mut,
        Timestamp,
        TimestampVector,
        "timestamp"
    );

    pub fn shape_name(&self) -> &'static str {
        match self {
            ColumnBatch::Long(_) => "long",
            ColumnBatch::Double(_) => "double",
            ColumnBatch::Bytes(_) => "bytes",
            ColumnBatch::Decimal(_) => "decimal",
            ColumnBatch::Timestamp(_) => "timestamp",
        }
    }

    pub fn mask(&self) -> &VectorMask {
        match self {
            ColumnBatch::Long(v) => &v.mask,
            ColumnBatch::Double(v) => &v.mask,
            ColumnBatch::Bytes(v) => &v.mask,
            ColumnBatch::Decimal(v) => &v.mask,
            ColumnBatch::Timestamp(v) => &v.mask,
        }
    }

    pub fn mask_mut(&mut self) -> &mut VectorMask {
        match self {
            ColumnBatch::Long(v) => &mut v.mask,
            ColumnBatch::Double(v) => &mut v.mask,
            ColumnBatch::Bytes(v) => &mut v.mask,
            ColumnBatch::Decimal(v) => &mut v.mask,
            ColumnBatch::Timestamp(v) => &mut v.mask,
        }
    }

    pub fn reset(&mut self) {
        match self {
            ColumnBatch::Long(v) => v.reset(),
            ColumnBatch::Double(v) => v.reset(),
            ColumnBatch::Bytes(v) => v.reset(),
            ColumnBatch::Decimal(v) => v.reset(),
            ColumnBatch::Timestamp(v) => v.reset(),
        }
    }
}
