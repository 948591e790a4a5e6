//! The schema-evolution type-conversion layer.
//!
//! When the reader requests a column in a logical type different from the
//! one stored in the file, `create_convert_reader` binds a conversion reader
//! around the file type's primitive decoder. Conversion readers forward
//! `check_encoding`/`start_stripe`/`seek`/`skip_rows` to the wrapped decoder
//! unchanged and rewrite batches in `next_batch`.
//!
//! Per-element failures (parse errors, range overflow, NaN sources,
//! precision overflow) become nulls at that output index; they never abort
//! a batch. Unsupported category pairs and self-conversions fail at binding
//! time.

mod cast;
mod date;
mod decimal;
mod double;
mod integer;
mod string_group;
mod timestamp;

use crate::error::{fmt_err, OrcResult};
use crate::reader::{ColumnEncoding, ColumnReader, Context, PositionProvider, StripeStreams};
use crate::vector::{
    BytesVector, ColumnBatch, DecimalVector, DoubleVector, LongVector, MaskedVector,
    TimestampVector,
};
use log::debug;
use orc_core::col_type::{ColumnType, ColumnTypeTag};

/// Per-element conversion out of a scratch vector into the caller's vector.
pub(crate) trait ConvertKernel {
    fn convert(
        &mut self,
        input: &ColumnBatch,
        output: &mut ColumnBatch,
        batch_size: usize,
    ) -> OrcResult<()>;
}

/// In-place adjustment of a vector the decoder already filled.
pub(crate) trait FixUpKernel {
    fn fix_up(&mut self, output: &mut ColumnBatch, batch_size: usize) -> OrcResult<()>;
}

/// The vectorized driver: reset the output, then apply `set_element` to the
/// non-null positions, propagating input nulls. A repeating input converts
/// index 0 only and marks the output repeating.
///
/// `set_element` may itself null the slot it is writing.
pub(crate) fn convert_vector<I, O, F>(input: &I, output: &mut O, batch_size: usize, mut set_element: F)
where
    I: MaskedVector,
    O: MaskedVector,
    F: FnMut(&I, &mut O, usize),
{
    output.reset();
    let mask = input.mask();
    if mask.is_repeating {
        output.mask_mut().is_repeating = true;
        if mask.no_nulls || !mask.is_null[0] {
            set_element(input, output, 0);
        } else {
            output.mask_mut().set_null(0);
        }
    } else if mask.no_nulls {
        for i in 0..batch_size {
            set_element(input, output, i);
        }
    } else {
        for i in 0..batch_size {
            if !mask.is_null[i] {
                set_element(input, output, i);
            } else {
                output.mask_mut().set_null(i);
            }
        }
    }
}

/// Conversion reader that decodes into its own scratch vector of the file
/// type's shape, then converts into the caller's vector.
struct ScratchConvertReader<K: ConvertKernel> {
    from: Box<dyn ColumnReader>,
    kernel: K,
    scratch: ColumnBatch,
}

impl<K: ConvertKernel + 'static> ScratchConvertReader<K> {
    fn boxed(
        from: Box<dyn ColumnReader>,
        kernel: K,
        scratch: ColumnBatch,
    ) -> Box<dyn ColumnReader> {
        Box::new(ScratchConvertReader { from, kernel, scratch })
    }
}

impl<K: ConvertKernel> ColumnReader for ScratchConvertReader<K> {
    fn check_encoding(&mut self, encoding: &ColumnEncoding) -> OrcResult<()> {
        // Pass-thru.
        self.from.check_encoding(encoding)
    }

    fn start_stripe(&mut self, stripe: &StripeStreams) -> OrcResult<()> {
        // Pass-thru.
        self.from.start_stripe(stripe)
    }

    fn seek(&mut self, positions: &mut PositionProvider) -> OrcResult<()> {
        // Pass-thru.
        self.from.seek(positions)
    }

    fn skip_rows(&mut self, row_count: u64) -> OrcResult<()> {
        // Pass-thru.
        self.from.skip_rows(row_count)
    }

    fn next_batch(
        &mut self,
        batch: &mut ColumnBatch,
        is_null_hint: Option<&[bool]>,
        batch_size: usize,
    ) -> OrcResult<()> {
        self.from
            .next_batch(&mut self.scratch, is_null_hint, batch_size)?;
        self.kernel.convert(&self.scratch, batch, batch_size)
    }
}

/// Conversion reader for same-shape pairs: the decoder fills the caller's
/// vector directly and the kernel adjusts it in place.
struct InPlaceConvertReader<K: FixUpKernel> {
    from: Box<dyn ColumnReader>,
    kernel: K,
}

impl<K: FixUpKernel + 'static> InPlaceConvertReader<K> {
    fn boxed(from: Box<dyn ColumnReader>, kernel: K) -> Box<dyn ColumnReader> {
        Box::new(InPlaceConvertReader { from, kernel })
    }
}

impl<K: FixUpKernel> ColumnReader for InPlaceConvertReader<K> {
    fn check_encoding(&mut self, encoding: &ColumnEncoding) -> OrcResult<()> {
        // Pass-thru.
        self.from.check_encoding(encoding)
    }

    fn start_stripe(&mut self, stripe: &StripeStreams) -> OrcResult<()> {
        // Pass-thru.
        self.from.start_stripe(stripe)
    }

    fn seek(&mut self, positions: &mut PositionProvider) -> OrcResult<()> {
        // Pass-thru.
        self.from.seek(positions)
    }

    fn skip_rows(&mut self, row_count: u64) -> OrcResult<()> {
        // Pass-thru.
        self.from.skip_rows(row_count)
    }

    fn next_batch(
        &mut self,
        batch: &mut ColumnBatch,
        is_null_hint: Option<&[bool]>,
        batch_size: usize,
    ) -> OrcResult<()> {
        self.from.next_batch(batch, is_null_hint, batch_size)?;
        self.kernel.fix_up(batch, batch_size)
    }
}

/// Scratch batch of the file type's decoded shape.
fn scratch_for(file_type: ColumnType, capacity: usize) -> ColumnBatch {
    let tag = file_type.tag();
    match tag {
        _ if tag.is_integer_family() => ColumnBatch::Long(LongVector::with_capacity(capacity)),
        ColumnTypeTag::Date => ColumnBatch::Long(LongVector::with_capacity(capacity)),
        ColumnTypeTag::Float | ColumnTypeTag::Double => {
            ColumnBatch::Double(DoubleVector::with_capacity(capacity))
        }
        ColumnTypeTag::Decimal => ColumnBatch::Decimal(DecimalVector::with_capacity(
            capacity,
            file_type.precision(),
            file_type.scale(),
        )),
        _ if tag.is_string_group() => ColumnBatch::Bytes(BytesVector::with_capacity(capacity)),
        ColumnTypeTag::Binary => ColumnBatch::Bytes(BytesVector::with_capacity(capacity)),
        ColumnTypeTag::Timestamp => {
            ColumnBatch::Timestamp(TimestampVector::with_capacity(capacity))
        }
        other => unreachable!("no scratch shape for {other:?}"),
    }
}

fn integer_down_cast_needed(file_tag: ColumnTypeTag, reader_tag: ColumnTypeTag) -> bool {
    match (reader_tag.numeric_rank(), file_tag.numeric_rank()) {
        (Some(reader_rank), Some(file_rank)) => reader_rank < file_rank,
        _ => false,
    }
}

fn unsupported(file_type: ColumnType, reader_type: ColumnType) -> crate::error::OrcError {
    fmt_err!(
        Unsupported,
        "unsupported conversion from {} to {}",
        file_type,
        reader_type
    )
}

fn self_conversion(reader_type: ColumnType) -> crate::error::OrcError {
    fmt_err!(
        NoConversionNeeded,
        "no conversion of type {} to self needed",
        reader_type
    )
}

/// Bind the conversion reader for `reader_column`. The schema-evolution map
/// supplies the backing file column and type; the context's provider builds
/// the underlying decoder.
pub fn create_convert_reader(
    reader_column: u32,
    reader_type: ColumnType,
    ctx: &Context,
) -> OrcResult<Box<dyn ColumnReader>> {
    let (file_column, file_type) = ctx.evolution.file_type(reader_column).ok_or_else(|| {
        fmt_err!(
            Invalid,
            "reader column {} has no mapped file column",
            reader_column
        )
    })?;
    debug!(
        "converting column {file_column}: file type {file_type} read as {reader_type}"
    );

    let file_tag = file_type.tag();
    match file_tag {
        _ if file_tag.is_integer_family() => {
            from_integer_family(file_column, file_type, reader_type, ctx)
        }
        ColumnTypeTag::Float | ColumnTypeTag::Double => {
            from_float_family(file_column, file_type, reader_type, ctx)
        }
        ColumnTypeTag::Decimal => from_decimal(file_column, file_type, reader_type, ctx),
        _ if file_tag.is_string_group() => {
            from_string_group(file_column, file_type, reader_type, ctx)
        }
        ColumnTypeTag::Timestamp => from_timestamp(file_column, file_type, reader_type, ctx),
        ColumnTypeTag::Date => from_date(file_column, file_type, reader_type, ctx),
        ColumnTypeTag::Binary => from_binary(file_column, file_type, reader_type, ctx),
        _ => Err(unsupported(file_type, reader_type)),
    }
}

fn from_integer_family(
    file_column: u32,
    file_type: ColumnType,
    reader_type: ColumnType,
    ctx: &Context,
) -> OrcResult<Box<dyn ColumnReader>> {
    let file_tag = file_type.tag();
    let reader_tag = reader_type.tag();
    let decoder = ctx.decoders.create_decoder(file_column, file_type)?;
    let scratch = || scratch_for(file_type, ctx.batch_capacity);
    match reader_tag {
        _ if reader_tag.is_integer_family() => {
            if file_tag == reader_tag {
                return Err(self_conversion(reader_type));
            }
            Ok(InPlaceConvertReader::boxed(
                decoder,
                integer::AnyIntegerFromAnyInteger {
                    reader_tag,
                    down_cast_needed: integer_down_cast_needed(file_tag, reader_tag),
                },
            ))
        }
        ColumnTypeTag::Float | ColumnTypeTag::Double => Ok(ScratchConvertReader::boxed(
            decoder,
            double::DoubleFromAnyInteger,
            scratch(),
        )),
        ColumnTypeTag::Decimal => Ok(ScratchConvertReader::boxed(
            decoder,
            decimal::DecimalFromAnyInteger,
            scratch(),
        )),
        _ if reader_tag.is_string_group() => {
            if file_tag == ColumnTypeTag::Boolean {
                Ok(ScratchConvertReader::boxed(
                    decoder,
                    string_group::StringGroupFromBoolean { reader_type },
                    scratch(),
                ))
            } else {
                Ok(ScratchConvertReader::boxed(
                    decoder,
                    string_group::StringGroupFromAnyInteger { reader_type },
                    scratch(),
                ))
            }
        }
        ColumnTypeTag::Timestamp => Ok(ScratchConvertReader::boxed(
            decoder,
            timestamp::TimestampFromAnyInteger,
            scratch(),
        )),
        _ => Err(unsupported(file_type, reader_type)),
    }
}

fn from_float_family(
    file_column: u32,
    file_type: ColumnType,
    reader_type: ColumnType,
    ctx: &Context,
) -> OrcResult<Box<dyn ColumnReader>> {
    let file_tag = file_type.tag();
    let reader_tag = reader_type.tag();
    let decoder = ctx.decoders.create_decoder(file_column, file_type)?;
    let scratch = || scratch_for(file_type, ctx.batch_capacity);
    match reader_tag {
        _ if reader_tag.is_integer_family() => Ok(ScratchConvertReader::boxed(
            decoder,
            integer::AnyIntegerFromDouble { reader_tag },
            scratch(),
        )),
        ColumnTypeTag::Float => {
            if file_tag == ColumnTypeTag::Float {
                return Err(self_conversion(reader_type));
            }
            Ok(InPlaceConvertReader::boxed(decoder, double::FloatFromDouble))
        }
        ColumnTypeTag::Double => {
            if file_tag == ColumnTypeTag::Double {
                return Err(self_conversion(reader_type));
            }
            // The float decoder already widens into the double vector.
            Ok(decoder)
        }
        ColumnTypeTag::Decimal => Ok(ScratchConvertReader::boxed(
            decoder,
            decimal::DecimalFromDouble,
            scratch(),
        )),
        _ if reader_tag.is_string_group() => Ok(ScratchConvertReader::boxed(
            decoder,
            string_group::StringGroupFromDouble { reader_type },
            scratch(),
        )),
        ColumnTypeTag::Timestamp => Ok(ScratchConvertReader::boxed(
            decoder,
            timestamp::TimestampFromDouble,
            scratch(),
        )),
        _ => Err(unsupported(file_type, reader_type)),
    }
}

fn from_decimal(
    file_column: u32,
    file_type: ColumnType,
    reader_type: ColumnType,
    ctx: &Context,
) -> OrcResult<Box<dyn ColumnReader>> {
    let reader_tag = reader_type.tag();
    let decoder = ctx.decoders.create_decoder(file_column, file_type)?;
    let scratch = || scratch_for(file_type, ctx.batch_capacity);
    match reader_tag {
        _ if reader_tag.is_integer_family() => Ok(ScratchConvertReader::boxed(
            decoder,
            integer::AnyIntegerFromDecimal { reader_tag },
            scratch(),
        )),
        ColumnTypeTag::Float | ColumnTypeTag::Double => Ok(ScratchConvertReader::boxed(
            decoder,
            double::DoubleFromDecimal,
            scratch(),
        )),
        _ if reader_tag.is_string_group() => Ok(ScratchConvertReader::boxed(
            decoder,
            string_group::StringGroupFromDecimal {
                reader_type,
                scratch: Vec::with_capacity(48),
            },
            scratch(),
        )),
        ColumnTypeTag::Timestamp => Ok(ScratchConvertReader::boxed(
            decoder,
            timestamp::TimestampFromDecimal,
            scratch(),
        )),
        // A precision or scale change is a real conversion; the category
        // alone does not make it a self-conversion.
        ColumnTypeTag::Decimal => Ok(ScratchConvertReader::boxed(
            decoder,
            decimal::DecimalFromDecimal,
            scratch(),
        )),
        _ => Err(unsupported(file_type, reader_type)),
    }
}

fn from_string_group(
    file_column: u32,
    file_type: ColumnType,
    reader_type: ColumnType,
    ctx: &Context,
) -> OrcResult<Box<dyn ColumnReader>> {
    let reader_tag = reader_type.tag();
    match reader_tag {
        // Raw bytes pass through; the binary decoder reads the column's
        // streams directly.
        ColumnTypeTag::Binary => {
            return ctx
                .decoders
                .create_decoder(file_column, ColumnType::new(ColumnTypeTag::Binary));
        }
        ColumnTypeTag::String => return Err(self_conversion(reader_type)),
        _ => {}
    }
    let decoder = ctx.decoders.create_decoder(file_column, file_type)?;
    let scratch = || scratch_for(file_type, ctx.batch_capacity);
    match reader_tag {
        _ if reader_tag.is_integer_family() => Ok(ScratchConvertReader::boxed(
            decoder,
            integer::AnyIntegerFromStringGroup { reader_tag },
            scratch(),
        )),
        ColumnTypeTag::Float | ColumnTypeTag::Double => Ok(ScratchConvertReader::boxed(
            decoder,
            double::DoubleFromStringGroup,
            scratch(),
        )),
        ColumnTypeTag::Decimal => Ok(ScratchConvertReader::boxed(
            decoder,
            decimal::DecimalFromStringGroup,
            scratch(),
        )),
        ColumnTypeTag::Char | ColumnTypeTag::Varchar => Ok(InPlaceConvertReader::boxed(
            decoder,
            string_group::StringGroupFromStringGroup { reader_type },
        )),
        ColumnTypeTag::Timestamp => Ok(ScratchConvertReader::boxed(
            decoder,
            timestamp::TimestampFromStringGroup,
            scratch(),
        )),
        ColumnTypeTag::Date => Ok(ScratchConvertReader::boxed(
            decoder,
            date::DateFromStringGroup,
            scratch(),
        )),
        _ => Err(unsupported(file_type, reader_type)),
    }
}

fn from_timestamp(
    file_column: u32,
    file_type: ColumnType,
    reader_type: ColumnType,
    ctx: &Context,
) -> OrcResult<Box<dyn ColumnReader>> {
    let reader_tag = reader_type.tag();
    if reader_tag == ColumnTypeTag::Timestamp {
        return Err(self_conversion(reader_type));
    }
    let decoder = ctx.decoders.create_decoder(file_column, file_type)?;
    let scratch = || scratch_for(file_type, ctx.batch_capacity);
    match reader_tag {
        _ if reader_tag.is_integer_family() => Ok(ScratchConvertReader::boxed(
            decoder,
            integer::AnyIntegerFromTimestamp { reader_tag },
            scratch(),
        )),
        ColumnTypeTag::Float | ColumnTypeTag::Double => Ok(ScratchConvertReader::boxed(
            decoder,
            double::DoubleFromTimestamp,
            scratch(),
        )),
        ColumnTypeTag::Decimal => Ok(ScratchConvertReader::boxed(
            decoder,
            decimal::DecimalFromTimestamp,
            scratch(),
        )),
        _ if reader_tag.is_string_group() => Ok(ScratchConvertReader::boxed(
            decoder,
            string_group::StringGroupFromTimestamp { reader_type },
            scratch(),
        )),
        ColumnTypeTag::Date => Ok(ScratchConvertReader::boxed(
            decoder,
            date::DateFromTimestamp,
            scratch(),
        )),
        _ => Err(unsupported(file_type, reader_type)),
    }
}

fn from_date(
    file_column: u32,
    file_type: ColumnType,
    reader_type: ColumnType,
    ctx: &Context,
) -> OrcResult<Box<dyn ColumnReader>> {
    let reader_tag = reader_type.tag();
    if reader_tag == ColumnTypeTag::Date {
        return Err(self_conversion(reader_type));
    }
    let decoder = ctx.decoders.create_decoder(file_column, file_type)?;
    let scratch = || scratch_for(file_type, ctx.batch_capacity);
    match reader_tag {
        _ if reader_tag.is_string_group() => Ok(ScratchConvertReader::boxed(
            decoder,
            string_group::StringGroupFromDate { reader_type },
            scratch(),
        )),
        ColumnTypeTag::Timestamp => Ok(ScratchConvertReader::boxed(
            decoder,
            timestamp::TimestampFromDate,
            scratch(),
        )),
        _ => Err(unsupported(file_type, reader_type)),
    }
}

fn from_binary(
    file_column: u32,
    file_type: ColumnType,
    reader_type: ColumnType,
    ctx: &Context,
) -> OrcResult<Box<dyn ColumnReader>> {
    let reader_tag = reader_type.tag();
    if reader_tag == ColumnTypeTag::Binary {
        return Err(self_conversion(reader_type));
    }
    if !reader_tag.is_string_group() {
        return Err(unsupported(file_type, reader_type));
    }
    let decoder = ctx.decoders.create_decoder(file_column, file_type)?;
    Ok(ScratchConvertReader::boxed(
        decoder,
        string_group::StringGroupFromBinary {
            reader_type,
            scratch: Vec::new(),
        },
        scratch_for(file_type, ctx.batch_capacity),
    ))
}

/// Whether the factory supports the (file type, reader type) pair. Mirrors
/// the factory's matrix without allocating readers; self-pairs report true
/// here even though the factory itself must not be engaged for them.
pub fn can_convert(file_type: ColumnType, reader_type: ColumnType) -> bool {
    let reader_tag = reader_type.tag();
    // We don't convert from any to complex.
    if reader_tag.is_complex() {
        return false;
    }

    let file_tag = file_type.tag();
    match file_tag {
        _ if file_tag.numeric_rank().is_some() => !matches!(
            reader_tag,
            ColumnTypeTag::Binary | ColumnTypeTag::Date
        ),
        _ if file_tag.is_string_group() => true,
        ColumnTypeTag::Timestamp => reader_tag != ColumnTypeTag::Binary,
        ColumnTypeTag::Date => {
            reader_tag.is_string_group()
                || matches!(reader_tag, ColumnTypeTag::Timestamp | ColumnTypeTag::Date)
        }
        ColumnTypeTag::Binary => {
            reader_tag.is_string_group() || reader_tag == ColumnTypeTag::Binary
        }
        // We don't convert from complex to any.
        _ => false,
    }
}
