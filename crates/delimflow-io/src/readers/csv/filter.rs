//! Line-level pre-pass in front of the `csv` tokenizer.
//!
//! The `csv` crate can skip comment lines but never reports their text, it
//! always drops blank lines, and its `Trim` option works on already-split
//! fields (so a quote after a space is data, and quoted padding is lost).
//! This filter sits between the buffered file and the tokenizer and rewrites
//! each line with quote state tracked across lines:
//!
//! - comment lines at a record boundary are removed and remembered;
//! - blank lines are dropped, or rewritten into a single empty field;
//! - unquoted whitespace at the start/end of a field is removed, quoted
//!   content is passed through untouched.

use std::io::{self, BufRead, Read};

use super::format::FormatBytes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    /// Inside quotes, right after a non-doubling escape character.
    Escaped,
    /// Just saw a quote that closes (or, if doubled, continues) a field.
    QuoteClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FilterOptions {
    pub skip_empty_lines: bool,
    pub trim_leading: bool,
    pub trim_trailing: bool,
}

pub(crate) struct LineFilter<R> {
    inner: R,
    fmt: FormatBytes,
    opts: FilterOptions,
    state: QuoteState,
    raw: Vec<u8>,
    line: Vec<u8>,
    pos: usize,
    first_comment: Option<String>,
    last_comment: Option<String>,
}

impl<R: BufRead> LineFilter<R> {
    pub fn new(inner: R, fmt: FormatBytes, opts: FilterOptions) -> Self {
        Self {
            inner,
            fmt,
            opts,
            state: QuoteState::FieldStart,
            raw: Vec::new(),
            line: Vec::new(),
            pos: 0,
            first_comment: None,
            last_comment: None,
        }
    }

    pub fn first_comment(&self) -> Option<&str> {
        self.first_comment.as_deref()
    }

    pub fn last_comment(&self) -> Option<&str> {
        self.last_comment.as_deref()
    }

    /// Load the next line that should reach the tokenizer. Returns false at
    /// end of input.
    fn next_line(&mut self) -> io::Result<bool> {
        loop {
            self.raw.clear();
            self.line.clear();
            self.pos = 0;
            if self.inner.read_until(b'\n', &mut self.raw)? == 0 {
                return Ok(false);
            }

            if self.state == QuoteState::FieldStart {
                if self.raw.first() == Some(&self.fmt.comment) {
                    self.record_comment()?;
                    continue;
                }
                if self.is_blank() {
                    if self.opts.skip_empty_lines {
                        continue;
                    }
                    // `""` parses as one empty field and leaves quote state unchanged.
                    self.line.push(self.fmt.quote);
                    self.line.push(self.fmt.quote);
                    self.line
                        .extend(self.raw.iter().copied().filter(|&b| is_line_end(b)));
                    return Ok(true);
                }
            }

            self.state = rewrite_line(&self.fmt, self.opts, self.state, &self.raw, &mut self.line);
            return Ok(true);
        }
    }

    /// Only line terminators, or only whitespace when leading whitespace is
    /// trimmed anyway.
    fn is_blank(&self) -> bool {
        self.raw.iter().all(|&b| {
            is_line_end(b) || (self.opts.trim_leading && is_space(&self.fmt, b))
        })
    }

    fn record_comment(&mut self) -> io::Result<()> {
        let text = std::str::from_utf8(&self.raw[1..])
            .map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("comment line is not valid UTF-8: {e}"),
                )
            })?
            .trim()
            .to_string();
        if self.first_comment.is_none() {
            self.first_comment = Some(text.clone());
        }
        self.last_comment = Some(text);
        Ok(())
    }
}

impl<R: BufRead> Read for LineFilter<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.pos >= self.line.len() && !self.next_line()? {
            return Ok(0);
        }
        let avail = &self.line[self.pos..];
        let n = avail.len().min(buf.len());
        buf[..n].copy_from_slice(&avail[..n]);
        self.pos += n;
        Ok(n)
    }
}

fn is_line_end(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

/// Field padding: ASCII whitespace/control bytes that are neither a line
/// terminator nor the delimiter (a tab can be either).
fn is_space(fmt: &FormatBytes, b: u8) -> bool {
    b <= b' ' && !is_line_end(b) && b != fmt.delimiter
}

/// Copy `raw` into `out`, dropping unquoted padding per `opts`. Returns the
/// quote state at the end of the line.
fn rewrite_line(
    fmt: &FormatBytes,
    opts: FilterOptions,
    mut state: QuoteState,
    raw: &[u8],
    out: &mut Vec<u8>,
) -> QuoteState {
    // Trailing whitespace already copied into `out` for the current unquoted field.
    let mut pending = 0usize;
    for &b in raw {
        let space = is_space(fmt, b);
        if space {
            if state == QuoteState::FieldStart && opts.trim_leading {
                continue;
            }
            if state == QuoteState::QuoteClosed && opts.trim_trailing {
                state = QuoteState::Unquoted;
                continue;
            }
        }
        if b == fmt.delimiter || is_line_end(b) {
            out.truncate(out.len() - pending);
            pending = 0;
        }
        out.push(b);
        state = step(fmt, state, b);
        if opts.trim_trailing && state == QuoteState::Unquoted {
            pending = if space { pending + 1 } else { 0 };
        }
    }
    out.truncate(out.len() - pending);
    state
}

fn step(fmt: &FormatBytes, state: QuoteState, b: u8) -> QuoteState {
    let boundary = b == fmt.delimiter || is_line_end(b);
    match state {
        QuoteState::FieldStart if b == fmt.quote => QuoteState::Quoted,
        QuoteState::Quoted if b == fmt.escape && !fmt.doubled_quotes() => QuoteState::Escaped,
        QuoteState::Quoted if b == fmt.quote => QuoteState::QuoteClosed,
        QuoteState::Quoted | QuoteState::Escaped => QuoteState::Quoted,
        QuoteState::QuoteClosed if b == fmt.quote && fmt.doubled_quotes() => QuoteState::Quoted,
        QuoteState::FieldStart | QuoteState::Unquoted | QuoteState::QuoteClosed => {
            if boundary {
                QuoteState::FieldStart
            } else {
                QuoteState::Unquoted
            }
        }
    }
}
