//! Kernels producing the integer family (BOOLEAN through LONG).

use super::cast::{double_fits_in_long, down_cast_integer, parse_long};
use super::{convert_vector, ConvertKernel, FixUpKernel};
use crate::error::OrcResult;
use crate::time::millis_to_seconds;
use crate::vector::ColumnBatch;
use orc_core::col_type::ColumnTypeTag;

/// Integer file type read as another integer category. The decoder fills
/// the caller's vector directly; narrowing is fixed up in place.
pub(super) struct AnyIntegerFromAnyInteger {
    pub reader_tag: ColumnTypeTag,
    pub down_cast_needed: bool,
}

impl FixUpKernel for AnyIntegerFromAnyInteger {
    fn fix_up(&mut self, output: &mut ColumnBatch, batch_size: usize) -> OrcResult<()> {
        if !self.down_cast_needed {
            return Ok(());
        }
        let out = output.as_longs_mut()?;
        let tag = self.reader_tag;
        if out.mask.is_repeating {
            if out.mask.no_nulls || !out.mask.is_null[0] {
                let value = out.values[0];
                down_cast_integer(out, 0, value, tag);
            }
        } else if out.mask.no_nulls {
            for i in 0..batch_size {
                let value = out.values[i];
                down_cast_integer(out, i, value, tag);
            }
        } else {
            for i in 0..batch_size {
                if !out.mask.is_null[i] {
                    let value = out.values[i];
                    down_cast_integer(out, i, value, tag);
                }
            }
        }
        Ok(())
    }
}

pub(super) struct AnyIntegerFromDouble {
    pub reader_tag: ColumnTypeTag,
}

impl ConvertKernel for AnyIntegerFromDouble {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_doubles()?;
        let output = output.as_longs_mut()?;
        let tag = self.reader_tag;
        convert_vector(input, output, batch_size, |inp, out, i| {
            let value = inp.values[i];
            if !double_fits_in_long(value) {
                out.mask.set_null(i);
            } else {
                down_cast_integer(out, i, value as i64, tag);
            }
        });
        Ok(())
    }
}

pub(super) struct AnyIntegerFromDecimal {
    pub reader_tag: ColumnTypeTag,
}

impl ConvertKernel for AnyIntegerFromDecimal {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_decimals()?;
        let output = output.as_longs_mut()?;
        let tag = self.reader_tag;
        convert_vector(input, output, batch_size, |inp, out, i| {
            let value = inp.get(i);
            let in_range = match tag {
                ColumnTypeTag::Boolean => {
                    out.values[i] = if value.is_zero() { 0 } else { 1 };
                    return;
                }
                ColumnTypeTag::Byte => value.fits_in_byte(),
                ColumnTypeTag::Short => value.fits_in_short(),
                ColumnTypeTag::Int => value.fits_in_int(),
                ColumnTypeTag::Long => value.fits_in_long(),
                other => unreachable!("non-integer target {other:?}"),
            };
            if in_range {
                out.values[i] = value.to_i64();
            } else {
                out.mask.set_null(i);
            }
        });
        Ok(())
    }
}

pub(super) struct AnyIntegerFromStringGroup {
    pub reader_tag: ColumnTypeTag,
}

impl ConvertKernel for AnyIntegerFromStringGroup {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_bytes()?;
        let output = output.as_longs_mut()?;
        let tag = self.reader_tag;
        convert_vector(input, output, batch_size, |inp, out, i| {
            let parsed = std::str::from_utf8(inp.val(i)).ok().and_then(parse_long);
            match parsed {
                Some(value) => down_cast_integer(out, i, value, tag),
                None => out.mask.set_null(i),
            }
        });
        Ok(())
    }
}

pub(super) struct AnyIntegerFromTimestamp {
    pub reader_tag: ColumnTypeTag,
}

impl ConvertKernel for AnyIntegerFromTimestamp {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_timestamps()?;
        let output = output.as_longs_mut()?;
        let tag = self.reader_tag;
        convert_vector(input, output, batch_size, |inp, out, i| {
            let seconds = millis_to_seconds(inp.get(i).millis());
            down_cast_integer(out, i, seconds, tag);
        });
        Ok(())
    }
}
