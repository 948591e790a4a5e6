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
use orc_core::error::CoreError;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Cause of a reader error.
#[derive(Debug, Clone)]
pub enum OrcErrorCause {
    /// The (file type, reader type) pair is outside the conversion matrix,
    /// or a complex type appeared on either side.
    Unsupported,
    /// The two types are the same category; the conversion layer should not
    /// have been engaged.
    NoConversionNeeded,
    /// Malformed input to the layer (wrong vector shape, bad column id).
    Invalid,
    Core(CoreError),
    Io(Arc<std::io::Error>),
}

impl OrcErrorCause {
    pub fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OrcErrorCause::Core(err) => Some(err),
            OrcErrorCause::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    #[track_caller]
    pub fn into_err(self) -> OrcError {
        OrcError::new(self)
    }
}

/// An error binding or driving a column reader.
///
/// Per-element conversion failures are not errors: they surface as nulls in
/// the output vector and never interrupt a batch.
#[derive(Debug, Clone)]
pub struct OrcError {
    /// What caused the error.
    cause: OrcErrorCause,

    /// Stack of additional contextual information,
    /// printed in reverse order.
    context: Vec<String>,

    backtrace: Arc<Backtrace>,
}

impl OrcError {
    #[track_caller]
    pub fn new(cause: OrcErrorCause) -> Self {
        Self {
            cause,
            context: Vec::new(),
            backtrace: Backtrace::capture().into(),
        }
    }

    #[track_caller]
    pub fn with_descr(cause: OrcErrorCause, descr: impl Into<String>) -> Self {
        Self {
            cause,
            context: vec![descr.into()],
            backtrace: Backtrace::capture().into(),
        }
    }

    pub fn cause(&self) -> &OrcErrorCause {
        &self.cause
    }
}

impl Display for OrcError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Print the context first in reverse order.
        let source = self.cause.source();
        let last_index = self.context.len().saturating_sub(1);
        for (index, context) in self.context.iter().rev().enumerate() {
            if index == last_index {
                write!(f, "{context}")?;
            } else {
                write!(f, "{context}: ")?;
            }
        }
        if let Some(source) = source {
            if self.context.is_empty() {
                write!(f, "{source}")?;
            } else {
                write!(f, ": {source}")?;
            }
        }

        if let BacktraceStatus::Captured = &self.backtrace.status() {
            if f.alternate() {
                write!(f, "\n{}", self.backtrace)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for OrcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.source()
    }
}

impl From<CoreError> for OrcError {
    fn from(source: CoreError) -> Self {
        Self::new(OrcErrorCause::Core(source))
    }
}

impl From<std::io::Error> for OrcError {
    fn from(e: std::io::Error) -> Self {
        Self::new(OrcErrorCause::Io(Arc::new(e)))
    }
}

pub type OrcResult<T> = Result<T, OrcError>;

pub trait OrcErrorExt<T> {
    fn context(self, context: &str) -> Self;
    fn with_context<F>(self, context: F) -> Self
    where
        F: FnOnce(&mut OrcError) -> String;
}

impl<T> OrcErrorExt<T> for OrcResult<T> {
    fn context(self, context: &str) -> Self {
        match self {
            Ok(val) => Ok(val),
            Err(mut err) => {
                err.context.push(context.to_string());
                Err(err)
            }
        }
    }

    fn with_context<F>(self, context: F) -> Self
    where
        F: FnOnce(&mut OrcError) -> String,
    {
        match self {
            Ok(val) => Ok(val),
            Err(mut err) => {
                let context = context(&mut err);
                err.context.push(context);
                Err(err)
            }
        }
    }
}

macro_rules! fmt_err {
    ($cause: ident, $($arg:tt)*) => {
        crate::error::OrcError::with_descr(
            crate::error::OrcErrorCause::$cause,
            format!($($arg)*))
    };
}

pub(crate) use fmt_err;
