//! Text reading with an encoding fallback.
//!
//! Content is decoded as UTF-8 first. When that fails the bytes are read
//! as Latin-1, which maps every byte to a character and therefore never
//! fails, so a control-byte heuristic decides whether the content is
//! text at all.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::log::Logger;

/// Maximum share of control bytes a Latin-1 file may contain before it
/// is classified as binary. Control bytes are C0 (except tab, LF, CR,
/// form feed), DEL and the C1 range 0x80..=0x9F. Uniformly random data
/// sits near 24%.
pub const BINARY_CONTROL_RATIO: f64 = 0.10;

const CHUNK_SIZE: usize = 64 * 1024;

/// Which decoding path produced the line count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingUsed {
    /// UTF-8
    Primary,
    /// Latin-1
    Fallback,
    Unreadable,
}

impl EncodingUsed {
    pub fn label(self) -> &'static str {
        match self {
            EncodingUsed::Primary => "utf-8",
            EncodingUsed::Fallback => "latin-1",
            EncodingUsed::Unreadable => "unreadable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOutcome {
    pub encoding: EncodingUsed,
    /// 0 when unreadable
    pub line_count: u64,
}

/// Read `path` and count its lines.
///
/// The file is streamed once in fixed-size chunks; memory use does not
/// grow with file size. Emits a Warning on `log` when the fallback
/// decoding is used or the content is rejected as binary. I/O errors are
/// returned to the caller.
pub fn read_text(path: &Path, binary_ratio: f64, log: &mut Logger) -> io::Result<ReadOutcome> {
    let scan = scan_reader(File::open(path)?, CHUNK_SIZE)?;
    let name = display_name(path);

    if scan.utf8 {
        return Ok(ReadOutcome {
            encoding: EncodingUsed::Primary,
            line_count: scan.lines(),
        });
    }

    let ratio = scan.control_ratio();
    if ratio > binary_ratio {
        log.warning(format!(
            "Unreadable file {}: not valid UTF-8 and {:.0}% control bytes, treating as binary",
            name,
            ratio * 100.0
        ));
        return Ok(ReadOutcome {
            encoding: EncodingUsed::Unreadable,
            line_count: 0,
        });
    }

    log.warning(format!(
        "File {} is not valid UTF-8, read with latin-1 fallback",
        name
    ));
    // Latin-1 maps bytes one to one, so the byte-level count holds.
    Ok(ReadOutcome {
        encoding: EncodingUsed::Fallback,
        line_count: scan.lines(),
    })
}

/// Count lines the way a text-mode reader splits them: `\n`, `\r\n` and
/// `\r` each end a line, and a trailing unterminated segment is a line.
pub fn count_lines(bytes: &[u8]) -> u64 {
    let mut scan = TextScan::default();
    scan.feed(bytes);
    scan.finish();
    scan.lines()
}

/// Share of bytes that would not appear in Latin-1 text.
pub fn control_ratio(bytes: &[u8]) -> f64 {
    let mut scan = TextScan::default();
    scan.feed(bytes);
    scan.control_ratio()
}

fn scan_reader<R: Read>(mut reader: R, chunk_size: usize) -> io::Result<TextScan> {
    let mut scan = TextScan::default();
    let mut buf = vec![0u8; chunk_size];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => scan.feed(&buf[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    scan.finish();
    Ok(scan)
}

/// Running state of a single pass over a file's bytes. Chunk boundaries
/// may fall anywhere, including inside `\r\n` or a UTF-8 sequence.
#[derive(Debug)]
struct TextScan {
    total: u64,
    controls: u64,
    terminated: u64,
    /// Bytes seen since the last line break.
    open_line: bool,
    after_cr: bool,
    utf8: bool,
    /// Start of a UTF-8 sequence cut off by the chunk end.
    carry: Vec<u8>,
}

impl Default for TextScan {
    fn default() -> Self {
        Self {
            total: 0,
            controls: 0,
            terminated: 0,
            open_line: false,
            after_cr: false,
            utf8: true,
            carry: Vec::with_capacity(4),
        }
    }
}

impl TextScan {
    fn feed(&mut self, chunk: &[u8]) {
        self.total += chunk.len() as u64;
        for &b in chunk {
            if is_control(b) {
                self.controls += 1;
            }
            match b {
                b'\n' => {
                    if !self.after_cr {
                        self.terminated += 1;
                    }
                    self.open_line = false;
                    self.after_cr = false;
                }
                b'\r' => {
                    self.terminated += 1;
                    self.open_line = false;
                    self.after_cr = true;
                }
                _ => {
                    self.open_line = true;
                    self.after_cr = false;
                }
            }
        }
        self.check_utf8(chunk);
    }

    fn check_utf8(&mut self, mut chunk: &[u8]) {
        if !self.utf8 {
            return;
        }
        // Complete a sequence left over from the previous chunk.
        while !self.carry.is_empty() {
            let Some((&b, rest)) = chunk.split_first() else {
                return;
            };
            self.carry.push(b);
            chunk = rest;
            match std::str::from_utf8(&self.carry) {
                Ok(_) => self.carry.clear(),
                Err(e) if e.error_len().is_none() => {}
                Err(_) => {
                    self.utf8 = false;
                    return;
                }
            }
        }
        match std::str::from_utf8(chunk) {
            Ok(_) => {}
            Err(e) if e.error_len().is_none() => {
                self.carry.extend_from_slice(&chunk[e.valid_up_to()..]);
            }
            Err(_) => self.utf8 = false,
        }
    }

    /// End of input: a sequence still open is truncated.
    fn finish(&mut self) {
        if !self.carry.is_empty() {
            self.utf8 = false;
            self.carry.clear();
        }
    }

    fn lines(&self) -> u64 {
        self.terminated + u64::from(self.open_line)
    }

    fn control_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.controls as f64 / self.total as f64
    }
}

fn is_control(b: u8) -> bool {
    match b {
        b'\t' | b'\n' | b'\r' | 0x0C => false,
        0x00..=0x1F | 0x7F | 0x80..=0x9F => true,
        _ => false,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
