use std::io::Write;

use log::info;

use crate::error::Result;

/// Receives one value per `print`, in evaluation order.
pub trait Sink {
    fn emit(&mut self, value: i64) -> Result<()>;
}

/// Collects printed values in memory.
impl Sink for Vec<i64> {
    fn emit(&mut self, value: i64) -> Result<()> {
        self.push(value);
        Ok(())
    }
}

/// Writes each value as a decimal line to any `io::Write`.
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        WriterSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for WriterSink<W> {
    fn emit(&mut self, value: i64) -> Result<()> {
        let mut buf: itoa::Buffer = itoa::Buffer::new();
        let text: &str = buf.format(value);

        self.writer.write_all(text.as_bytes())?;
        self.writer.write_all(b"\n")?;

        info!("Printed value: {}", text);

        Ok(())
    }
}
