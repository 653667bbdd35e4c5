use std::collections::VecDeque;
use std::io::{self, Read, Write};

/// Byte-level console used by the trap routines. Reads block until a byte
/// is available.
pub trait Console {
    fn read_byte(&mut self) -> io::Result<u8>;
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

/// Process stdin/stdout.
pub struct StdConsole {
    raw: bool,
}

impl StdConsole {
    pub fn new() -> Self {
        Self { raw: false }
    }

    /// With the host terminal in raw mode the line discipline no longer
    /// maps Enter to `\n` on input or `\n` to `\r\n` on output, so do both here.
    pub fn raw_terminal(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for StdConsole {
    fn read_byte(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        io::stdin().lock().read_exact(&mut buf)?;
        Ok(raw_input(self.raw, buf[0]))
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        raw_output(self.raw, bytes, &mut io::stdout().lock())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

fn raw_input(raw: bool, byte: u8) -> u8 {
    if raw && byte == b'\r' {
        b'\n'
    } else {
        byte
    }
}

fn raw_output<W: Write>(raw: bool, bytes: &[u8], out: &mut W) -> io::Result<()> {
    if !raw {
        return out.write_all(bytes);
    }
    for chunk in bytes.split_inclusive(|&b| b == b'\n') {
        match chunk.split_last() {
            Some((b'\n', head)) => {
                out.write_all(head)?;
                out.write_all(b"\r\n")?;
            }
            _ => out.write_all(chunk)?,
        }
    }
    Ok(())
}

/// In-memory console: scripted input, captured output.
#[derive(Debug, Default, Clone)]
pub struct BufferConsole {
    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(input: impl AsRef<[u8]>) -> Self {
        Self {
            input: input.as_ref().iter().copied().collect(),
            output: Vec::new(),
        }
    }

    pub fn push_input(&mut self, bytes: impl AsRef<[u8]>) {
        self.input.extend(bytes.as_ref());
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }
}

impl Console for BufferConsole {
    fn read_byte(&mut self) -> io::Result<u8> {
        self.input
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "console input exhausted"))
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.output.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_terminal_enter_reads_as_newline() {
        assert_eq!(raw_input(true, b'\r'), b'\n');
        assert_eq!(raw_input(true, b'a'), b'a');
        assert_eq!(raw_input(false, b'\r'), b'\r');
    }

    #[test]
    fn raw_terminal_newline_writes_crlf() {
        let mut out = Vec::new();
        raw_output(true, b"a\nb\n", &mut out).unwrap();
        assert_eq!(out, b"a\r\nb\r\n");

        let mut out = Vec::new();
        raw_output(false, b"a\nb", &mut out).unwrap();
        assert_eq!(out, b"a\nb");
    }
}
