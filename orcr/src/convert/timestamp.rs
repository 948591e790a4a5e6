//! Kernels producing TIMESTAMP. The target vector nulls the slot whenever a
//! kernel produces no instant.

use super::{convert_vector, ConvertKernel};
use crate::error::OrcResult;
use crate::time::{
    days_to_millis, decimal_to_timestamp, double_to_timestamp, parse_timestamp, Timestamp,
};
use crate::vector::ColumnBatch;

/// Integer file type: the value is milliseconds since the epoch.
pub(super) struct TimestampFromAnyInteger;

impl ConvertKernel for TimestampFromAnyInteger {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_longs()?;
        let output = output.as_timestamps_mut()?;
        convert_vector(input, output, batch_size, |inp, out, i| {
            out.set(i, Some(Timestamp::from_millis(inp.values[i])));
        });
        Ok(())
    }
}

/// Double file type: seconds since the epoch, fraction as nanoseconds.
pub(super) struct TimestampFromDouble;

impl ConvertKernel for TimestampFromDouble {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_doubles()?;
        let output = output.as_timestamps_mut()?;
        convert_vector(input, output, batch_size, |inp, out, i| {
            out.set(i, double_to_timestamp(inp.values[i]));
        });
        Ok(())
    }
}

pub(super) struct TimestampFromDecimal;

impl ConvertKernel for TimestampFromDecimal {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_decimals()?;
        let output = output.as_timestamps_mut()?;
        convert_vector(input, output, batch_size, |inp, out, i| {
            out.set(i, decimal_to_timestamp(&inp.get(i)));
        });
        Ok(())
    }
}

pub(super) struct TimestampFromStringGroup;

impl ConvertKernel for TimestampFromStringGroup {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_bytes()?;
        let output = output.as_timestamps_mut()?;
        convert_vector(input, output, batch_size, |inp, out, i| {
            let parsed = std::str::from_utf8(inp.val(i))
                .ok()
                .and_then(parse_timestamp);
            out.set(i, parsed);
        });
        Ok(())
    }
}

pub(super) struct TimestampFromDate;

impl ConvertKernel for TimestampFromDate {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_longs()?;
        let output = output.as_timestamps_mut()?;
        convert_vector(input, output, batch_size, |inp, out, i| {
            let millis = days_to_millis(inp.values[i]);
            out.set(i, Some(Timestamp::from_millis(millis)));
        });
        Ok(())
    }
}
