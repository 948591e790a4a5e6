/*******************************************************************************
 *     ___                  _   ____  ____
 *    / _ \ _   _  ___  ___| |_|  _ \| __ )
 *   | | | | | | |/ _ \/ __| __| | | |  _ \
 *   | |_| | |_| |  __/\__ \ |_| |_| | |_) |
 *    \__\_\\__,_|\___||___/\__|____/|____/
 *
 *  Copyright (c) 2014-2019 Appsicle
 *  Copyright (c) 2019-2026 QuestDB
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *  http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 *
 ******************************************************************************/
use crate::error::{fmt_err, CoreError, CoreErrorExt, CoreResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Debug, Display, Formatter};
use std::num::NonZeroI32;

/// Maximum number of significant digits a decimal column can carry.
pub const MAX_DECIMAL_PRECISION: u8 = 38;

/// Widest CHAR/VARCHAR length encodable in the type code.
pub const MAX_CHAR_LENGTH: u32 = 0x7F_FFFF;

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ColumnTypeTag {
    Boolean = 1,
    Byte = 2,
    Short = 3,
    Int = 4,
    Long = 5,
    Float = 6,
    Double = 7,
    Decimal = 8,
    String = 9,
    Char = 10,
    Varchar = 11,
    Binary = 12,
    Date = 13,
    Timestamp = 14,
    Struct = 15,
    List = 16,
    Map = 17,
    Union = 18,
}

impl ColumnTypeTag {
    /// Ordering used to decide whether an integer-family conversion narrows.
    /// The explicit ranks matter, not the enum discriminants.
    pub const fn numeric_rank(self) -> Option<u8> {
        match self {
            ColumnTypeTag::Boolean => Some(1),
            ColumnTypeTag::Byte => Some(2),
            ColumnTypeTag::Short => Some(3),
            ColumnTypeTag::Int => Some(4),
            ColumnTypeTag::Long => Some(5),
            ColumnTypeTag::Float => Some(6),
            ColumnTypeTag::Double => Some(7),
            ColumnTypeTag::Decimal => Some(8),
            _ => None,
        }
    }

    /// BOOLEAN through LONG: types decoded into a long vector.
    pub const fn is_integer_family(self) -> bool {
        matches!(
            self,
            ColumnTypeTag::Boolean
                | ColumnTypeTag::Byte
                | ColumnTypeTag::Short
                | ColumnTypeTag::Int
                | ColumnTypeTag::Long
        )
    }

    /// FLOAT and DOUBLE: types decoded into a double vector.
    pub const fn is_float_family(self) -> bool {
        matches!(self, ColumnTypeTag::Float | ColumnTypeTag::Double)
    }

    /// STRING, CHAR and VARCHAR share byte storage but differ in
    /// trim/truncate rules.
    pub const fn is_string_group(self) -> bool {
        matches!(
            self,
            ColumnTypeTag::String | ColumnTypeTag::Char | ColumnTypeTag::Varchar
        )
    }

    pub const fn is_complex(self) -> bool {
        matches!(
            self,
            ColumnTypeTag::Struct | ColumnTypeTag::List | ColumnTypeTag::Map | ColumnTypeTag::Union
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            ColumnTypeTag::Boolean => "boolean",
            ColumnTypeTag::Byte => "byte",
            ColumnTypeTag::Short => "short",
            ColumnTypeTag::Int => "int",
            ColumnTypeTag::Long => "long",
            ColumnTypeTag::Float => "float",
            ColumnTypeTag::Double => "double",
            ColumnTypeTag::Decimal => "decimal",
            ColumnTypeTag::String => "string",
            ColumnTypeTag::Char => "char",
            ColumnTypeTag::Varchar => "varchar",
            ColumnTypeTag::Binary => "binary",
            ColumnTypeTag::Date => "date",
            ColumnTypeTag::Timestamp => "timestamp",
            ColumnTypeTag::Struct => "struct",
            ColumnTypeTag::List => "list",
            ColumnTypeTag::Map => "map",
            ColumnTypeTag::Union => "union",
        }
    }
}

impl TryFrom<u8> for ColumnTypeTag {
    type Error = CoreError;

    fn try_from(tag_num: u8) -> Result<Self, Self::Error> {
        match tag_num {
            1 => Ok(ColumnTypeTag::Boolean),
            2 => Ok(ColumnTypeTag::Byte),
            3 => Ok(ColumnTypeTag::Short),
            4 => Ok(ColumnTypeTag::Int),
            5 => Ok(ColumnTypeTag::Long),
            6 => Ok(ColumnTypeTag::Float),
            7 => Ok(ColumnTypeTag::Double),
            8 => Ok(ColumnTypeTag::Decimal),
            9 => Ok(ColumnTypeTag::String),
            10 => Ok(ColumnTypeTag::Char),
            11 => Ok(ColumnTypeTag::Varchar),
            12 => Ok(ColumnTypeTag::Binary),
            13 => Ok(ColumnTypeTag::Date),
            14 => Ok(ColumnTypeTag::Timestamp),
            15 => Ok(ColumnTypeTag::Struct),
            16 => Ok(ColumnTypeTag::List),
            17 => Ok(ColumnTypeTag::Map),
            18 => Ok(ColumnTypeTag::Union),
            _ => Err(fmt_err!(
                InvalidType,
                "unknown column type tag code: {}",
                tag_num
            )),
        }
    }
}

fn tag_of(col_type: i32) -> u8 {
    (col_type & 0xFF) as u8
}

/// A column type code: the category tag in the low byte and the type
/// parameters in the upper 24 bits.
///
/// DECIMAL packs precision into bits 8..16 and scale into bits 16..24.
/// CHAR/VARCHAR pack max_length into bits 8..31. Other tags carry no
/// parameters.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Ord, PartialOrd)]
#[serde(transparent)]
pub struct ColumnType {
    // Optimization so `Option<ColumnType>` is the same size as `ColumnType`.
    code: NonZeroI32,
}

impl ColumnType {
    /// Build a type with default parameters. CHAR/VARCHAR default to
    /// max_length 256, DECIMAL to (38, 10), following the reference
    /// reader's type descriptions.
    pub fn new(tag: ColumnTypeTag) -> Self {
        match tag {
            ColumnTypeTag::Char | ColumnTypeTag::Varchar => {
                Self::from_parts(tag, 256 << 8)
            }
            ColumnTypeTag::Decimal => Self::from_parts(tag, (38 << 8) | (10 << 16)),
            _ => Self::from_parts(tag, 0),
        }
    }

    pub fn char(max_length: u32) -> CoreResult<Self> {
        Self::string_group_sized(ColumnTypeTag::Char, max_length)
    }

    pub fn varchar(max_length: u32) -> CoreResult<Self> {
        Self::string_group_sized(ColumnTypeTag::Varchar, max_length)
    }

    fn string_group_sized(tag: ColumnTypeTag, max_length: u32) -> CoreResult<Self> {
        if max_length == 0 || max_length > MAX_CHAR_LENGTH {
            return Err(fmt_err!(
                InvalidType,
                "invalid {} max length: {}",
                tag.name(),
                max_length
            ));
        }
        Ok(Self::from_parts(tag, (max_length as i32) << 8))
    }

    pub fn decimal(precision: u8, scale: u8) -> CoreResult<Self> {
        if precision == 0 || precision > MAX_DECIMAL_PRECISION || scale > precision {
            return Err(fmt_err!(
                InvalidType,
                "invalid decimal precision/scale: ({}, {})",
                precision,
                scale
            ));
        }
        Ok(Self::from_parts(
            ColumnTypeTag::Decimal,
            ((precision as i32) << 8) | ((scale as i32) << 16),
        ))
    }

    fn from_parts(tag: ColumnTypeTag, shifted_extra: i32) -> Self {
        let code = NonZeroI32::new(tag as i32 | shifted_extra)
            .expect("column type code should never be zero");
        Self { code }
    }

    pub fn code(&self) -> i32 {
        self.code.get()
    }

    pub fn tag(&self) -> ColumnTypeTag {
        let tag_num: u8 = tag_of(self.code());
        // Constructing from int should already have validated the tag.
        tag_num
            .try_into()
            .expect("invalid column type tag, should already be validated")
    }

    /// DECIMAL precision; 0 for other tags.
    pub fn precision(&self) -> u8 {
        match self.tag() {
            ColumnTypeTag::Decimal => ((self.code() >> 8) & 0xFF) as u8,
            _ => 0,
        }
    }

    /// DECIMAL scale; 0 for other tags.
    pub fn scale(&self) -> u8 {
        match self.tag() {
            ColumnTypeTag::Decimal => ((self.code() >> 16) & 0xFF) as u8,
            _ => 0,
        }
    }

    /// CHAR/VARCHAR byte budget; 0 for other tags.
    pub fn max_length(&self) -> u32 {
        match self.tag() {
            ColumnTypeTag::Char | ColumnTypeTag::Varchar => (self.code() >> 8) as u32,
            _ => 0,
        }
    }
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let tag = self.tag();
        match tag {
            ColumnTypeTag::Decimal => {
                write!(f, "decimal({},{})", self.precision(), self.scale())
            }
            ColumnTypeTag::Char | ColumnTypeTag::Varchar => {
                write!(f, "{}({})", tag.name(), self.max_length())
            }
            _ => write!(f, "{}", tag.name()),
        }
    }
}

impl Debug for ColumnType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ColumnType({}/{})", self.code, self)
    }
}

impl TryFrom<i32> for ColumnType {
    type Error = CoreError;

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        if v <= 0 {
            return Err(fmt_err!(InvalidType, "invalid column type code <= 0: {}", v));
        }
        let tag_num = tag_of(v);
        let tag: ColumnTypeTag = tag_num
            .try_into()
            .with_context(|_| format!("could not parse {v} to a valid ColumnType"))?;
        let parsed = match tag {
            ColumnTypeTag::Decimal => {
                Self::decimal(((v >> 8) & 0xFF) as u8, ((v >> 16) & 0xFF) as u8)
            }
            ColumnTypeTag::Char | ColumnTypeTag::Varchar => {
                Self::string_group_sized(tag, (v >> 8) as u32)
            }
            _ if (v >> 8) != 0 => Err(fmt_err!(
                InvalidType,
                "column type {} carries no parameters, got code {}",
                tag.name(),
                v
            )),
            _ => Ok(Self::from_parts(tag, 0)),
        };
        parsed.with_context(|_| format!("could not parse {v} to a valid ColumnType"))
    }
}

impl<'de> Deserialize<'de> for ColumnType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = i32::deserialize(deserializer)?;
        ColumnType::try_from(code).map_err(serde::de::Error::custom)
    }
}
