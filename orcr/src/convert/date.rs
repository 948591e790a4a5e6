//! Kernels producing DATE as epoch day counts in a long vector.

use super::{convert_vector, ConvertKernel};
use crate::error::OrcResult;
use crate::time::{millis_to_seconds, parse_date, time_to_date_days};
use crate::vector::ColumnBatch;

pub(super) struct DateFromStringGroup;

impl ConvertKernel for DateFromStringGroup {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_bytes()?;
        let output = output.as_longs_mut()?;
        convert_vector(input, output, batch_size, |inp, out, i| {
            let parsed = std::str::from_utf8(inp.val(i)).ok().and_then(parse_date);
            match parsed {
                Some(days) => out.values[i] = days,
                None => out.mask.set_null(i),
            }
        });
        Ok(())
    }
}

/// The day containing the instant; instants before the epoch floor into the
/// previous day.
pub(super) struct DateFromTimestamp;

impl ConvertKernel for DateFromTimestamp {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_timestamps()?;
        let output = output.as_longs_mut()?;
        convert_vector(input, output, batch_size, |inp, out, i| {
            let seconds = millis_to_seconds(inp.get(i).millis());
            out.values[i] = time_to_date_days(seconds);
        });
        Ok(())
    }
}
