#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use orc_core::col_type::ColumnType;
use orcr::create_convert_reader;
use orcr::decimal::Dec;
use orcr::reader::{
    ColumnEncoding, ColumnReader, Context, DecoderProvider, PositionProvider, SchemaEvolution,
    StripeStreams,
};
use orcr::time::Timestamp;
use orcr::vector::{
    BytesVector, ColumnBatch, DecimalVector, DoubleVector, LongVector, TimestampVector,
};
use orcr::OrcResult;

/// Typed row data behind a mock decoder; `None` rows decode as nulls.
#[derive(Debug, Clone)]
pub enum MockColumn {
    Longs(Vec<Option<i64>>),
    Doubles(Vec<Option<f64>>),
    Bytes(Vec<Option<Vec<u8>>>),
    Decimals(Vec<Option<Dec>>),
    Timestamps(Vec<Option<Timestamp>>),
}

/// Counts of the calls a wrapped decoder observed, for pass-through checks.
#[derive(Debug, Default)]
pub struct CallLog {
    pub check_encoding: u32,
    pub start_stripe: u32,
    pub seek: u32,
    pub skipped_rows: Vec<u64>,
}

struct MockDecoder {
    column: MockColumn,
    pos: usize,
    repeating: bool,
    log: Rc<RefCell<CallLog>>,
}

impl MockDecoder {
    fn fill(&mut self, batch: &mut ColumnBatch, batch_size: usize) {
        batch.reset();
        if self.repeating {
            batch.mask_mut().is_repeating = true;
        }
        let rows = if self.repeating { 1 } else { batch_size };
        match (&self.column, &mut *batch) {
            (MockColumn::Longs(data), ColumnBatch::Long(v)) => {
                for i in 0..rows {
                    match data[self.pos + i] {
                        Some(value) => v.values[i] = value,
                        None => v.mask.set_null(i),
                    }
                }
            }
            (MockColumn::Doubles(data), ColumnBatch::Double(v)) => {
                for i in 0..rows {
                    match data[self.pos + i] {
                        Some(value) => v.values[i] = value,
                        None => v.mask.set_null(i),
                    }
                }
            }
            (MockColumn::Bytes(data), ColumnBatch::Bytes(v)) => {
                for i in 0..rows {
                    match &data[self.pos + i] {
                        Some(value) => v.set_val(i, value),
                        None => v.mask.set_null(i),
                    }
                }
            }
            (MockColumn::Decimals(data), ColumnBatch::Decimal(v)) => {
                for i in 0..rows {
                    match data[self.pos + i] {
                        Some(value) => v.set(i, value),
                        None => v.mask.set_null(i),
                    }
                }
            }
            (MockColumn::Timestamps(data), ColumnBatch::Timestamp(v)) => {
                for i in 0..rows {
                    v.set(i, data[self.pos + i]);
                }
            }
            (column, batch) => panic!(
                "mock decoder for {column:?} cannot fill a {} batch",
                batch.shape_name()
            ),
        }
        self.pos += batch_size;
    }
}

impl ColumnReader for MockDecoder {
    fn check_encoding(&mut self, _encoding: &ColumnEncoding) -> OrcResult<()> {
        self.log.borrow_mut().check_encoding += 1;
        Ok(())
    }

    fn start_stripe(&mut self, _stripe: &StripeStreams) -> OrcResult<()> {
        self.log.borrow_mut().start_stripe += 1;
        Ok(())
    }

    fn seek(&mut self, _positions: &mut PositionProvider) -> OrcResult<()> {
        self.log.borrow_mut().seek += 1;
        Ok(())
    }

    fn skip_rows(&mut self, row_count: u64) -> OrcResult<()> {
        self.log.borrow_mut().skipped_rows.push(row_count);
        Ok(())
    }

    fn next_batch(
        &mut self,
        batch: &mut ColumnBatch,
        _is_null_hint: Option<&[bool]>,
        batch_size: usize,
    ) -> OrcResult<()> {
        self.fill(batch, batch_size);
        Ok(())
    }
}

pub struct MockProvider {
    columns: HashMap<u32, MockColumn>,
    pub repeating: bool,
    pub log: Rc<RefCell<CallLog>>,
    pub decode_as: RefCell<Vec<ColumnType>>,
}

impl DecoderProvider for MockProvider {
    fn create_decoder(
        &self,
        column: u32,
        decode_as: ColumnType,
    ) -> OrcResult<Box<dyn ColumnReader>> {
        self.decode_as.borrow_mut().push(decode_as);
        let data = self
            .columns
            .get(&column)
            .unwrap_or_else(|| panic!("no mock data for column {column}"))
            .clone();
        Ok(Box::new(MockDecoder {
            column: data,
            pos: 0,
            repeating: self.repeating,
            log: self.log.clone(),
        }))
    }
}

/// One mocked file column (id 0) behind the conversion factory.
pub struct Fixture {
    pub provider: MockProvider,
    pub evolution: SchemaEvolution,
}

impl Fixture {
    pub fn new(file_type: ColumnType, column: MockColumn) -> Fixture {
        let mut columns = HashMap::new();
        columns.insert(0u32, column);
        Fixture {
            provider: MockProvider {
                columns,
                repeating: false,
                log: Rc::new(RefCell::new(CallLog::default())),
                decode_as: RefCell::new(Vec::new()),
            },
            evolution: SchemaEvolution::new(vec![Some((0, file_type))]),
        }
    }

    pub fn repeating(mut self) -> Fixture {
        self.provider.repeating = true;
        self
    }

    pub fn reader(
        &self,
        reader_type: ColumnType,
        capacity: usize,
    ) -> OrcResult<Box<dyn ColumnReader>> {
        let ctx = Context {
            evolution: &self.evolution,
            decoders: &self.provider,
            batch_capacity: capacity,
        };
        create_convert_reader(0, reader_type, &ctx)
    }
}

/// Run one conversion batch end to end through the factory.
pub fn convert_batch(
    file_type: ColumnType,
    reader_type: ColumnType,
    column: MockColumn,
    output: &mut ColumnBatch,
    batch_size: usize,
) {
    let fixture = Fixture::new(file_type, column);
    let mut reader = fixture.reader(reader_type, batch_size).expect("bind reader");
    reader
        .next_batch(output, None, batch_size)
        .expect("convert batch");
}

pub fn long_output(capacity: usize) -> ColumnBatch {
    ColumnBatch::Long(LongVector::with_capacity(capacity))
}

pub fn double_output(capacity: usize) -> ColumnBatch {
    ColumnBatch::Double(DoubleVector::with_capacity(capacity))
}

pub fn bytes_output(capacity: usize) -> ColumnBatch {
    ColumnBatch::Bytes(BytesVector::with_capacity(capacity))
}

pub fn decimal_output(capacity: usize, precision: u8, scale: u8) -> ColumnBatch {
    ColumnBatch::Decimal(DecimalVector::with_capacity(capacity, precision, scale))
}

pub fn decimal64_output(capacity: usize, precision: u8, scale: u8) -> ColumnBatch {
    ColumnBatch::Decimal(DecimalVector::packed64_with_capacity(
        capacity, precision, scale,
    ))
}

pub fn timestamp_output(capacity: usize) -> ColumnBatch {
    ColumnBatch::Timestamp(TimestampVector::with_capacity(capacity))
}

pub fn longs_out(batch: &ColumnBatch, batch_size: usize) -> Vec<Option<i64>> {
    let v = batch.as_longs().unwrap();
    (0..batch_size)
        .map(|i| (!v.mask.is_null(i)).then(|| v.values[i]))
        .collect()
}

pub fn doubles_out(batch: &ColumnBatch, batch_size: usize) -> Vec<Option<f64>> {
    let v = batch.as_doubles().unwrap();
    (0..batch_size)
        .map(|i| (!v.mask.is_null(i)).then(|| v.values[i]))
        .collect()
}

pub fn strings_out(batch: &ColumnBatch, batch_size: usize) -> Vec<Option<String>> {
    let v = batch.as_bytes().unwrap();
    (0..batch_size)
        .map(|i| {
            (!v.mask.is_null(i)).then(|| String::from_utf8(v.val(i).to_vec()).expect("utf-8"))
        })
        .collect()
}

pub fn decimals_out(batch: &ColumnBatch, batch_size: usize) -> Vec<Option<String>> {
    let v = batch.as_decimals().unwrap();
    (0..batch_size)
        .map(|i| (!v.mask.is_null(i)).then(|| v.get(i).to_string()))
        .collect()
}

pub fn timestamps_out(batch: &ColumnBatch, batch_size: usize) -> Vec<Option<Timestamp>> {
    let v = batch.as_timestamps().unwrap();
    (0..batch_size)
        .map(|i| (!v.mask.is_null(i)).then(|| v.get(i)))
        .collect()
}

pub fn dec(text: &str) -> Dec {
    Dec::parse(text).expect("test decimal")
}

pub fn bytes_rows(rows: &[Option<&str>]) -> MockColumn {
    MockColumn::Bytes(
        rows.iter()
            .map(|r| r.map(|s| s.as_bytes().to_vec()))
            .collect(),
    )
}
