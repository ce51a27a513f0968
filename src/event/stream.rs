// JSON Lines event stream decoding

use std::io::BufRead;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::event::RunEvent;

/// A decoded event plus the position it came from.
#[derive(Debug, Clone)]
pub struct EventRecord {
    /// 1-based line number in the source stream.
    pub line: usize,

    /// Event time: the producer's `ts` when present, otherwise the
    /// moment this record was decoded.
    pub at: DateTime<Utc>,

    pub event: RunEvent,
}

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Iterator over JSONL event records. Blank lines are skipped; any
/// malformed line surfaces as an error without consuming the rest of
/// the stream.
pub struct EventStream<R> {
    reader: R,
    line: usize,
}

impl<R: BufRead> EventStream<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line: 0 }
    }
}

impl<R: BufRead> Iterator for EventStream<R> {
    type Item = Result<EventRecord, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut buf = String::new();
            match self.reader.read_line(&mut buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(StreamError::Io(e))),
            }
            self.line += 1;

            let trimmed = buf.trim();
            if trimmed.is_empty() {
                continue;
            }

            match serde_json::from_str::<RunEvent>(trimmed) {
                Ok(event) => {
                    let at = event.ts().unwrap_or_else(Utc::now);
                    return Some(Ok(EventRecord {
                        line: self.line,
                        at,
                        event,
                    }));
                }
                Err(source) => {
                    return Some(Err(StreamError::Parse {
                        line: self.line,
                        source,
                    }));
                }
            }
        }
    }
}
