//! Host I/O and introspection.
//!
//! Instructions never touch process globals directly. Input, output,
//! program arguments, environment and the clock are all reached through a
//! [`Host`] handed to the scheduler at construction. In buffered mode the
//! output is captured and can be taken with [`Host::take_output`].

use std::fmt;
use std::io::{self, BufRead, Cursor, Write};

use chrono::NaiveDateTime;
use nfunge_core::Value;

/// Output sink.
pub enum Output {
    Stdout(io::Stdout),
    Buffer(Vec<u8>),
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(out) => out.write(buf),
            Output::Buffer(out) => out.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(out) => out.flush(),
            Output::Buffer(_) => Ok(()),
        }
    }
}

/// Source of the current date and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    System,
    Fixed(NaiveDateTime),
}

pub struct Host {
    input: Box<dyn BufRead>,
    output: Output,
    args: Vec<String>,
    env: Vec<(String, String)>,
    clock: Clock,
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("args", &self.args)
            .field("env", &self.env.len())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl Host {
    /// Process stdin/stdout with the process environment.
    pub fn stdio() -> Self {
        Self {
            input: Box::new(io::BufReader::new(io::stdin())),
            output: Output::Stdout(io::stdout()),
            args: Vec::new(),
            env: std::env::vars().collect(),
            clock: Clock::System,
        }
    }

    /// In-memory input and captured output, with an empty environment.
    pub fn buffered(input: impl Into<Vec<u8>>) -> Self {
        Self {
            input: Box::new(Cursor::new(input.into())),
            output: Output::Buffer(Vec::new()),
            args: Vec::new(),
            env: Vec::new(),
            clock: Clock::System,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_env(mut self, env: Vec<(String, String)>) -> Self {
        self.env = env;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }

    pub fn now(&self) -> NaiveDateTime {
        match self.clock {
            Clock::System => chrono::Local::now().naive_local(),
            Clock::Fixed(t) => t,
        }
    }

    /// Writes one character. Values up to 255 are written as raw bytes,
    /// larger ones as UTF-8.
    pub fn write_char(&mut self, value: Value) -> io::Result<()> {
        if let Ok(byte) = u8::try_from(value) {
            return self.output.write_all(&[byte]);
        }
        let c = u32::try_from(value)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "not a character"))?;
        let mut buf = [0u8; 4];
        self.output.write_all(c.encode_utf8(&mut buf).as_bytes())
    }

    /// Writes a number in `radix` followed by a space.
    pub fn write_int(&mut self, value: Value, radix: u32) -> io::Result<()> {
        let text = format_radix(value, radix)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "radix out of range"))?;
        write!(self.output, "{} ", text)
    }

    /// Reads one byte, `None` at end of input.
    pub fn read_char(&mut self) -> io::Result<Option<Value>> {
        let byte = self.input.fill_buf()?.first().copied();
        if byte.is_some() {
            self.input.consume(1);
        }
        Ok(byte.map(Value::from))
    }

    /// Skips input up to the first digit in `radix`, then reads as many
    /// digits as follow. `None` if input ends first.
    pub fn read_int(&mut self, radix: u32) -> io::Result<Option<Value>> {
        if !(2..=36).contains(&radix) {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "radix out of range"));
        }
        let mut value: Option<Value> = None;
        loop {
            let Some(&byte) = self.input.fill_buf()?.first() else {
                break;
            };
            match (byte as char).to_digit(radix) {
                Some(d) => {
                    let acc = value.unwrap_or(0);
                    value = Some(acc.saturating_mul(radix as Value).saturating_add(d as Value));
                }
                None if value.is_some() => break,
                None => {}
            }
            self.input.consume(1);
        }
        Ok(value)
    }

    pub fn at_eof(&mut self) -> io::Result<bool> {
        Ok(self.input.fill_buf()?.is_empty())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }

    /// Takes everything written so far. Always empty for stdout.
    pub fn take_output(&mut self) -> Vec<u8> {
        match &mut self.output {
            Output::Buffer(buf) => std::mem::take(buf),
            Output::Stdout(_) => Vec::new(),
        }
    }
}

/// Formats `value` in `radix` (2..=36), lowercase digits.
pub fn format_radix(value: Value, radix: u32) -> Option<String> {
    if !(2..=36).contains(&radix) {
        return None;
    }
    if radix == 10 {
        return Some(value.to_string());
    }
    let mut n = value.unsigned_abs();
    let mut digits = Vec::new();
    loop {
        digits.push(char::from_digit((n % radix as u64) as u32, radix)?);
        n /= radix as u64;
        if n == 0 {
            break;
        }
    }
    if value < 0 {
        digits.push('-');
    }
    Some(digits.into_iter().rev().collect())
}
