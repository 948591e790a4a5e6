//! Kernels producing the string group (STRING, CHAR, VARCHAR). Every writer
//! funnels through `assign_string_group`, which applies the target's
//! trim/truncate rule.

use super::cast::{binary_to_hex, right_trim_and_truncate, utf8_truncate};
use super::{convert_vector, ConvertKernel, FixUpKernel};
use crate::error::OrcResult;
use crate::time::{format_date, format_timestamp};
use crate::vector::{BytesVector, ColumnBatch};
use orc_core::col_type::{ColumnType, ColumnTypeTag};

/// Store `bytes` into row `index` under the target's rules: STRING as-is,
/// CHAR right-trimmed then truncated, VARCHAR truncated. Truncation is a
/// byte budget and never splits a UTF-8 sequence.
pub(super) fn assign_string_group(
    out: &mut BytesVector,
    index: usize,
    target: ColumnType,
    bytes: &[u8],
) {
    match target.tag() {
        ColumnTypeTag::String => out.set_val(index, bytes),
        ColumnTypeTag::Char => {
            let len = right_trim_and_truncate(bytes, target.max_length() as usize);
            out.set_val(index, &bytes[..len]);
        }
        ColumnTypeTag::Varchar => {
            let len = utf8_truncate(bytes, target.max_length() as usize);
            out.set_val(index, &bytes[..len]);
        }
        other => unreachable!("non string-group target {other:?}"),
    }
}

pub(super) struct StringGroupFromAnyInteger {
    pub reader_type: ColumnType,
}

impl ConvertKernel for StringGroupFromAnyInteger {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_longs()?;
        let output = output.as_bytes_mut()?;
        let reader_type = self.reader_type;
        convert_vector(input, output, batch_size, |inp, out, i| {
            let text = inp.values[i].to_string();
            assign_string_group(out, i, reader_type, text.as_bytes());
        });
        Ok(())
    }
}

/// BOOLEAN file type: the textual form is the literal `TRUE`/`FALSE`, not a
/// digit.
pub(super) struct StringGroupFromBoolean {
    pub reader_type: ColumnType,
}

impl ConvertKernel for StringGroupFromBoolean {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_longs()?;
        let output = output.as_bytes_mut()?;
        let reader_type = self.reader_type;
        convert_vector(input, output, batch_size, |inp, out, i| {
            let text: &[u8] = if inp.values[i] != 0 { b"TRUE" } else { b"FALSE" };
            assign_string_group(out, i, reader_type, text);
        });
        Ok(())
    }
}

pub(super) struct StringGroupFromDouble {
    pub reader_type: ColumnType,
}

impl ConvertKernel for StringGroupFromDouble {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_doubles()?;
        let output = output.as_bytes_mut()?;
        let reader_type = self.reader_type;
        convert_vector(input, output, batch_size, |inp, out, i| {
            let value = inp.values[i];
            if value.is_nan() {
                out.mask.set_null(i);
            } else {
                let text = super::cast::format_double(value);
                assign_string_group(out, i, reader_type, text.as_bytes());
            }
        });
        Ok(())
    }
}

pub(super) struct StringGroupFromDecimal {
    pub reader_type: ColumnType,
    /// Reused text buffer; one decimal's digits per element.
    pub scratch: Vec<u8>,
}

impl ConvertKernel for StringGroupFromDecimal {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_decimals()?;
        let output = output.as_bytes_mut()?;
        let reader_type = self.reader_type;
        let scratch = &mut self.scratch;
        convert_vector(input, output, batch_size, |inp, out, i| {
            scratch.clear();
            inp.get(i).write_str(scratch);
            assign_string_group(out, i, reader_type, scratch);
        });
        Ok(())
    }
}

pub(super) struct StringGroupFromTimestamp {
    pub reader_type: ColumnType,
}

impl ConvertKernel for StringGroupFromTimestamp {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_timestamps()?;
        let output = output.as_bytes_mut()?;
        let reader_type = self.reader_type;
        convert_vector(input, output, batch_size, |inp, out, i| {
            match format_timestamp(inp.get(i)) {
                Some(text) => assign_string_group(out, i, reader_type, text.as_bytes()),
                None => out.mask.set_null(i),
            }
        });
        Ok(())
    }
}

pub(super) struct StringGroupFromDate {
    pub reader_type: ColumnType,
}

impl ConvertKernel for StringGroupFromDate {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_longs()?;
        let output = output.as_bytes_mut()?;
        let reader_type = self.reader_type;
        convert_vector(input, output, batch_size, |inp, out, i| {
            match format_date(inp.values[i]) {
                Some(text) => assign_string_group(out, i, reader_type, text.as_bytes()),
                None => out.mask.set_null(i),
            }
        });
        Ok(())
    }
}

/// String-group file type read as CHAR/VARCHAR: the decoder fills the
/// caller's vector, then the target's trim/truncate rule is re-applied in
/// place. Lengths only ever shrink.
pub(super) struct StringGroupFromStringGroup {
    pub reader_type: ColumnType,
}

impl StringGroupFromStringGroup {
    fn fix_element(&self, out: &mut BytesVector, index: usize) {
        let max_len = self.reader_type.max_length() as usize;
        let adjusted = match self.reader_type.tag() {
            ColumnTypeTag::String => return,
            ColumnTypeTag::Char => right_trim_and_truncate(out.val(index), max_len),
            ColumnTypeTag::Varchar => utf8_truncate(out.val(index), max_len),
            other => unreachable!("non string-group target {other:?}"),
        };
        if adjusted < out.len_of(index) {
            out.truncate_val(index, adjusted);
        }
    }
}

impl FixUpKernel for StringGroupFromStringGroup {
    fn fix_up(&mut self, output: &mut ColumnBatch, batch_size: usize) -> OrcResult<()> {
        let out = output.as_bytes_mut()?;
        if out.mask.is_repeating {
            if out.mask.no_nulls || !out.mask.is_null[0] {
                self.fix_element(out, 0);
            }
        } else if out.mask.no_nulls {
            for i in 0..batch_size {
                self.fix_element(out, i);
            }
        } else {
            for i in 0..batch_size {
                if !out.mask.is_null[i] {
                    self.fix_element(out, i);
                }
            }
        }
        Ok(())
    }
}

pub(super) struct StringGroupFromBinary {
    pub reader_type: ColumnType,
    /// Reused hex buffer; `3n - 1` bytes per n-byte value.
    pub scratch: Vec<u8>,
}

impl ConvertKernel for StringGroupFromBinary {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()> {
        let input = input.as_bytes()?;
        let output = output.as_bytes_mut()?;
        let reader_type = self.reader_type;
        let scratch = &mut self.scratch;
        convert_vector(input, output, batch_size, |inp, out, i| {
            binary_to_hex(inp.val(i), scratch);
            assign_string_group(out, i, reader_type, scratch);
        });
        Ok(())
    }
}
