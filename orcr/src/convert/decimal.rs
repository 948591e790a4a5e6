//! Kernels producing DECIMAL. The target vector's `set` enforces
//! precision/scale, so every kernel here nulls only on parse failure and
//! leaves range enforcement to the vector.

use super::cast::format_double;
use super::{convert_vector, ConvertKernel};
use crate::decimal::Dec;
use crate::error::OrcResult;
use crate::time::seconds_as_double;
use crate::vector::ColumnBatch;

pub(super) struct DecimalFromAnyInteger;

impl ConvertKernel for DecimalFromAnyInteger {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_longs()?;
        let output = output.as_decimals_mut()?;
        convert_vector(input, output, batch_size, |inp, out, i| {
            out.set(i, Dec::from_i64(inp.values[i]));
        });
        Ok(())
    }
}

/// Goes through the double's text form, as the reference reader does, so the
/// produced decimal matches the decimal a user would read off the double.
pub(super) struct DecimalFromDouble;

impl ConvertKernel for DecimalFromDouble {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_doubles()?;
        let output = output.as_decimals_mut()?;
        convert_vector(input, output, batch_size, |inp, out, i| {
            match Dec::parse(&format_double(inp.values[i])) {
                Some(value) => out.set(i, value),
                None => out.mask.set_null(i),
            }
        });
        Ok(())
    }
}

pub(super) struct DecimalFromStringGroup;

impl ConvertKernel for DecimalFromStringGroup {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_bytes()?;
        let output = output.as_decimals_mut()?;
        convert_vector(input, output, batch_size, |inp, out, i| {
            let parsed = std::str::from_utf8(inp.val(i)).ok().and_then(Dec::parse);
            match parsed {
                Some(value) => out.set(i, value),
                None => out.mask.set_null(i),
            }
        });
        Ok(())
    }
}

pub(super) struct DecimalFromTimestamp;

impl ConvertKernel for DecimalFromTimestamp {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_timestamps()?;
        let output = output.as_decimals_mut()?;
        convert_vector(input, output, batch_size, |inp, out, i| {
            let seconds = seconds_as_double(inp.get(i));
            match Dec::parse(&format_double(seconds)) {
                Some(value) => out.set(i, value),
                None => out.mask.set_null(i),
            }
        });
        Ok(())
    }
}

pub(super) struct DecimalFromDecimal;

impl ConvertKernel for DecimalFromDecimal {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_decimals()?;
        let output = output.as_decimals_mut()?;
        convert_vector(input, output, batch_size, |inp, out, i| {
            out.set(i, inp.get(i));
        });
        Ok(())
    }
}
