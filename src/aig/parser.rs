use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{
    Aig, CircuitTables, Result,
    aig::{Literal, error::ParserError},
};

type ParseResult<T> = std::result::Result<T, ParserError>;

fn read_usize(s: &str, line: usize) -> ParseResult<usize> {
    s.parse::<usize>().map_err(|_| ParserError::InvalidToken {
        line,
        msg: format!("{} expected unsigned integer", s),
    })
}

fn check_even(x: Literal, line: usize) -> ParseResult<()> {
    if x & 1 == 1 {
        return Err(ParserError::InvalidToken {
            line,
            msg: format!("expected literal to be even, got {}", x),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    m: usize,
    i: usize,
    o: usize,
    a: usize,
}

impl TryFrom<&str> for Header {
    type Error = ParserError;

    fn try_from(line: &str) -> ParseResult<Self> {
        let tokens = line.split_whitespace().collect::<Vec<&str>>();

        if tokens.len() < 6 {
            return Err(ParserError::InvalidToken {
                line: 1,
                msg: "missing header tokens".to_string(),
            });
        }

        // The binary magic is tolerated, a lot of ASCII benchmarks carry it anyway
        if tokens[0] != "aag" && tokens[0] != "aig" {
            return Err(ParserError::InvalidToken {
                line: 1,
                msg: "expected aag (or at least aig)".to_string(),
            });
        }

        let m = read_usize(tokens[1], 1)?;
        let i = read_usize(tokens[2], 1)?;
        let l = read_usize(tokens[3], 1)?;
        let o = read_usize(tokens[4], 1)?;
        let a = read_usize(tokens[5], 1)?;

        if tokens.len() > 6 {
            return Err(ParserError::UnsupportedFeature(
                "header only supports M I L O A".to_string(),
            ));
        }
        if l != 0 {
            return Err(ParserError::UnsupportedFeature(format!(
                "latches (header declares {})",
                l
            )));
        }

        Ok(Header { m, i, o, a })
    }
}

fn single_token<'a>(s: &'a str, line: usize, what: &str) -> ParseResult<&'a str> {
    let tokens = s.split_whitespace().collect::<Vec<&str>>();

    if tokens.is_empty() {
        return Err(ParserError::InvalidToken {
            line,
            msg: format!("expected {} token, got nothing", what),
        });
    }

    if tokens.len() > 1 {
        return Err(ParserError::InvalidToken {
            line,
            msg: format!("expected nothing after {}, got {}", what, tokens[1]),
        });
    }
    Ok(tokens[0])
}

fn read_input(s: &str, line: usize) -> ParseResult<Literal> {
    let i = read_usize(single_token(s, line, "input")?, line)?;
    check_even(i, line)?;
    Ok(i)
}

fn read_output(s: &str, line: usize) -> ParseResult<Literal> {
    read_usize(single_token(s, line, "output")?, line)
}

fn read_and(s: &str, line: usize) -> ParseResult<[Literal; 3]> {
    let tokens = s.split_whitespace().collect::<Vec<&str>>();

    if tokens.len() < 3 {
        return Err(ParserError::InvalidToken {
            line,
            msg: "not enough and tokens".to_string(),
        });
    }

    if tokens.len() > 3 {
        return Err(ParserError::InvalidToken {
            line,
            msg: format!("expected nothing after and tokens, got {}", tokens[3]),
        });
    }

    let lhs = read_usize(tokens[0], line)?;
    let rhs0 = read_usize(tokens[1], line)?;
    let rhs1 = read_usize(tokens[2], line)?;

    check_even(lhs, line)?;
    Ok([lhs, rhs0, rhs1])
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Symbol {
    Input(usize, String),
    Output(usize, String),
}

/// Reads a `i<idx> <name>` or `o<idx> <name>` record, the name spanning the rest of the line.
fn read_symbol(s: &str, line: usize) -> ParseResult<Symbol> {
    let invalid = |msg: String| ParserError::InvalidSymbol { line, msg };

    let (head, name) = s
        .split_once(' ')
        .ok_or_else(|| invalid(format!("expected a name after {}", s)))?;
    if name.is_empty() {
        return Err(invalid(format!("empty name for {}", head)));
    }
    let mut chars = head.chars();
    let kind = chars.next();
    let idx = chars
        .as_str()
        .parse::<usize>()
        .map_err(|_| invalid(format!("{} expected a position after the symbol type", head)))?;

    match kind {
        Some('i') => Ok(Symbol::Input(idx, name.to_string())),
        Some('o') => Ok(Symbol::Output(idx, name.to_string())),
        Some('l') => Err(ParserError::UnsupportedFeature("latch symbols".to_string())),
        _ => Err(invalid(format!("unknown symbol type {}", head))),
    }
}

/// Line-counting wrapper over a reader.
struct Lines<R> {
    reader: R,
    line_no: usize,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Lines { reader, line_no: 0 }
    }

    /// Next line without its end of line, [`None`] at the end of the file.
    fn next_line(&mut self) -> ParseResult<Option<String>> {
        let mut line = String::new();
        let n = self
            .reader
            .read_line(&mut line)
            .map_err(|e| ParserError::IoError(e.to_string()))?;
        if n == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        let len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(len);
        Ok(Some(line))
    }

    fn expect_line(&mut self, what: &'static str) -> ParseResult<(String, usize)> {
        match self.next_line()? {
            Some(s) => Ok((s, self.line_no)),
            None => Err(ParserError::MissingLine {
                line: self.line_no + 1,
                what,
            }),
        }
    }
}

/// Reads the whole ASCII AIGER content into tables, without any semantic check.
fn read_tables(reader: impl BufRead) -> ParseResult<CircuitTables> {
    let mut lines = Lines::new(reader);

    let (first, _) = lines.expect_line("header")?;
    let header = Header::try_from(first.as_str())?;

    let mut tables = CircuitTables {
        max: header.m,
        ..Default::default()
    };

    for _ in 0..header.i {
        let (s, line) = lines.expect_line("PI")?;
        tables.inputs.push((read_input(&s, line)?, line));
    }
    for _ in 0..header.o {
        let (s, line) = lines.expect_line("PO")?;
        tables.outputs.push((read_output(&s, line)?, line));
    }
    for _ in 0..header.a {
        let (s, line) = lines.expect_line("AIG")?;
        tables.ands.push((read_and(&s, line)?, line));
    }

    // Symbols until the end of file or the comment section
    while let Some(s) = lines.next_line()? {
        let line = lines.line_no;
        if s == "c" {
            break;
        }
        if s.is_empty() {
            continue;
        }
        match read_symbol(&s, line)? {
            Symbol::Input(idx, name) => tables.input_names.push((idx, name, line)),
            Symbol::Output(idx, name) => tables.output_names.push((idx, name, line)),
        }
    }

    log::debug!(
        "read aag {} {} 0 {} {}: {} lines",
        header.m,
        header.i,
        header.o,
        header.a,
        lines.line_no
    );
    Ok(tables)
}

impl Aig {
    /// Creates an AIG from an open .aag content using ASCII AIGER format.
    ///
    /// Use this function if the file is already open with the reader.
    /// Latches are not supported, everything after the `c` line is ignored.
    pub fn from_ascii(reader: impl BufRead) -> Result<Self> {
        let tables = read_tables(reader)?;
        Aig::from_tables(tables)
    }

    /// Creates an AIG from an .aag file using ASCII AIGER format.
    ///
    /// The binary format is not supported.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("aag") => (),
            Some("aig") => {
                return Err(
                    ParserError::UnsupportedFeature("binary AIGER format".to_string()).into(),
                );
            }
            _ => {
                return Err(
                    ParserError::IoError("invalid extension, expected .aag".to_string()).into(),
                );
            }
        }
        let f = File::open(path.as_ref()).map_err(|z| ParserError::IoError(z.to_string()))?;
        Aig::from_ascii(BufReader::new(f))
    }
}
