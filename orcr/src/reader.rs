//! The contract between the enclosing file reader, the per-type primitive
//! decoders, and the conversion layer.
//!
//! Decoder conventions the conversion layer relies on:
//! - BOOLEAN/BYTE/SHORT/INT/LONG and DATE decoders fill a `LongVector`
//!   (dates as epoch day counts);
//! - FLOAT and DOUBLE decoders fill a `DoubleVector` (floats widened);
//! - STRING/CHAR/VARCHAR and BINARY decoders fill a `BytesVector` with raw
//!   bytes;
//! - DECIMAL decoders fill a `DecimalVector` at the file precision/scale;
//! - TIMESTAMP decoders fill a `TimestampVector`.

use crate::error::OrcResult;
use crate::vector::ColumnBatch;
use orc_core::col_type::ColumnType;

/// Wire encoding of one column within a stripe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnEncoding {
    Direct,
    DirectV2,
    Dictionary { size: u32 },
    DictionaryV2 { size: u32 },
}

/// Handle to a stripe's opened streams; decoders resolve their own streams
/// from it when a stripe starts.
#[derive(Debug)]
pub struct StripeStreams {
    pub stripe_index: u32,
    pub row_count: u64,
}

/// Cursor over recorded stream positions used to seek within a stripe.
#[derive(Debug)]
pub struct PositionProvider {
    positions: Vec<u64>,
    index: usize,
}

impl PositionProvider {
    pub fn new(positions: Vec<u64>) -> PositionProvider {
        PositionProvider { positions, index: 0 }
    }

    pub fn next(&mut self) -> Option<u64> {
        let pos = self.positions.get(self.index).copied();
        if pos.is_some() {
            self.index += 1;
        }
        pos
    }
}

/// One column's decode stream: primitive decoders implement it, and the
/// conversion readers wrap it, forwarding everything but `next_batch`.
pub trait ColumnReader {
    fn check_encoding(&mut self, encoding: &ColumnEncoding) -> OrcResult<()>;

    fn start_stripe(&mut self, stripe: &StripeStreams) -> OrcResult<()>;

    fn seek(&mut self, positions: &mut PositionProvider) -> OrcResult<()>;

    fn skip_rows(&mut self, row_count: u64) -> OrcResult<()>;

    /// Fill the first `batch_size` rows of `batch`. `is_null_hint` is the
    /// enclosing struct's present stream, when one applies.
    fn next_batch(
        &mut self,
        batch: &mut ColumnBatch,
        is_null_hint: Option<&[bool]>,
        batch_size: usize,
    ) -> OrcResult<()>;
}

/// Constructs the primitive decoder for a column. Implementations carry the
/// stripe context the decoders need: compression codec, encoding registry,
/// writer timezone handling, and the Decimal64 reading preference.
pub trait DecoderProvider {
    /// Build a decoder for `column` producing `decode_as`-shaped batches.
    /// `decode_as` is normally the file type; the conversion factory may
    /// instead request the binary decoder for a string column.
    fn create_decoder(&self, column: u32, decode_as: ColumnType) -> OrcResult<Box<dyn ColumnReader>>;
}

/// Schema evolution: which file column and file type back each reader
/// column.
#[derive(Debug, Default)]
pub struct SchemaEvolution {
    file_columns: Vec<Option<(u32, ColumnType)>>,
}

impl SchemaEvolution {
    /// `file_columns[reader_column]` is the mapped (file column id, file
    /// type), or `None` when the reader column has no counterpart in the
    /// file.
    pub fn new(file_columns: Vec<Option<(u32, ColumnType)>>) -> SchemaEvolution {
        SchemaEvolution { file_columns }
    }

    pub fn file_type(&self, reader_column: u32) -> Option<(u32, ColumnType)> {
        self.file_columns.get(reader_column as usize).copied().flatten()
    }
}

/// Everything the conversion factory needs at column-binding time.
pub struct Context<'a> {
    pub evolution: &'a SchemaEvolution,
    pub decoders: &'a dyn DecoderProvider,
    /// Capacity of the scratch vectors, i.e. the largest batch the caller
    /// will request.
    pub batch_capacity: usize,
}
