//! JSON line-delimited training logs.
//!
//! One serialized record per iteration, one document per line, suitable
//! for tailing during a run and for loading into analysis tools.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::training::marquardt::{IterationOutcome, IterationSummary};

/// A single logged training iteration.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IterationRecord {
    pub iteration: usize,
    pub error: f64,
    pub lambda: f64,
    pub retries: usize,
    pub outcome: IterationOutcome,
}

/// Line-delimited JSON writer for training progress.
pub struct TrainingLogger {
    writer: Box<dyn Write + Send>,
}

impl TrainingLogger {
    /// Log to any writer.
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Box::new(writer),
        }
    }

    /// Log to a file, truncating any existing content.
    pub fn to_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }

    /// Append one record as a single JSON line.
    pub fn log(&mut self, iteration: usize, summary: &IterationSummary) -> io::Result<()> {
        let record = IterationRecord {
            iteration,
            error: summary.error,
            lambda: summary.lambda,
            retries: summary.retries,
            outcome: summary.outcome,
        };
        let line = serde_json::to_string(&record)?;
        writeln!(self.writer, "{line}")?;
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn records_serialize_as_one_json_line_each() {
        let buffer = SharedBuffer::default();
        let mut logger = TrainingLogger::new(buffer.clone());

        let summary = IterationSummary {
            error: 1.5,
            lambda: 0.01,
            retries: 2,
            outcome: IterationOutcome::Accepted,
        };
        logger.log(1, &summary).unwrap();
        logger
            .log(
                2,
                &IterationSummary {
                    error: 0.75,
                    lambda: 1e25,
                    retries: 27,
                    outcome: IterationOutcome::LambdaCeiling,
                },
            )
            .unwrap();

        let contents = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["iteration"], 1);
        assert_eq!(first["error"], 1.5);
        assert_eq!(first["retries"], 2);
        assert_eq!(first["outcome"], "accepted");

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["outcome"], "lambda_ceiling");
    }
}
