//! Kernels producing FLOAT and DOUBLE.

use super::cast::parse_double;
use super::{convert_vector, ConvertKernel, FixUpKernel};
use crate::error::OrcResult;
use crate::time::seconds_as_double;
use crate::vector::ColumnBatch;

pub(super) struct DoubleFromAnyInteger;

impl ConvertKernel for DoubleFromAnyInteger {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_longs()?;
        let output = output.as_doubles_mut()?;
        convert_vector(input, output, batch_size, |inp, out, i| {
            let value = inp.values[i] as f64;
            // Unreachable from a finite long, but kept as a guard.
            if value.is_nan() {
                out.values[i] = f64::NAN;
                out.mask.set_null(i);
            } else {
                out.values[i] = value;
            }
        });
        Ok(())
    }
}

pub(super) struct DoubleFromDecimal;

impl ConvertKernel for DoubleFromDecimal {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_decimals()?;
        let output = output.as_doubles_mut()?;
        convert_vector(input, output, batch_size, |inp, out, i| {
            out.values[i] = inp.get(i).to_f64();
        });
        Ok(())
    }
}

pub(super) struct DoubleFromStringGroup;

impl ConvertKernel for DoubleFromStringGroup {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_bytes()?;
        let output = output.as_doubles_mut()?;
        convert_vector(input, output, batch_size, |inp, out, i| {
            let parsed = std::str::from_utf8(inp.val(i)).ok().and_then(parse_double);
            match parsed {
                Some(value) => out.values[i] = value,
                None => out.mask.set_null(i),
            }
        });
        Ok(())
    }
}

pub(super) struct DoubleFromTimestamp;

impl ConvertKernel for DoubleFromTimestamp {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_timestamps()?;
        let output = output.as_doubles_mut()?;
        convert_vector(input, output, batch_size, |inp, out, i| {
            out.values[i] = seconds_as_double(inp.get(i));
        });
        Ok(())
    }
}

/// DOUBLE file type read as FLOAT: round each value through f32 in place.
/// Overflow goes to infinity, never null, and null slots are left alone.
pub(super) struct FloatFromDouble;

impl FixUpKernel for FloatFromDouble {
    fn fix_up(&mut self, output: &mut ColumnBatch, batch_size: usize) -> OrcResult<()> {
        let out = output.as_doubles_mut()?;
        if out.mask.is_repeating {
            out.values[0] = out.values[0] as f32 as f64;
        } else {
            for value in &mut out.values[..batch_size] {
                *value = *value as f32 as f64;
            }
        }
        Ok(())
    }
}
