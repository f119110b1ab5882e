//! Line-oriented textual form of code tables and bit streams
//!
//! A table is rendered as one `<symbol><separator><bits>` line per symbol,
//! followed by a sentinel line (`END` by default):
//!
//! ```text
//! a: 0
//! b: 11
//! c: 10
//! END
//! ```
//!
//! Bit streams are rendered as runs of `0`/`1` characters.

use std::io::{BufRead, Write};

use crate::bits::{parse_bits, BitSequence};
use crate::config::CodecConfig;
use crate::entropy::{DecodeTable, EncodeTable, FrequencyTable};
use crate::error::{HuffError, Result};

/// Write the encode table, in ascending symbol order, then the sentinel line
///
/// Whitespace and control characters cannot appear as the symbol of a table
/// line and are rejected with [`HuffError::InvalidInput`].
pub fn write_encode_table<W: Write>(
    writer: &mut W,
    table: &EncodeTable<char>,
    config: &CodecConfig,
) -> Result<()> {
    for (&symbol, code) in table {
        check_printable(symbol)?;
        writeln!(writer, "{}{}{}", symbol, config.separator, code)?;
    }
    writeln!(writer, "{}", config.end_sentinel)?;
    Ok(())
}

/// Write a decode table in ascending symbol order, closed by a blank line
pub fn write_decode_table<W: Write>(
    writer: &mut W,
    table: &DecodeTable<char>,
    config: &CodecConfig,
) -> Result<()> {
    for (&symbol, code) in table.sorted_entries() {
        check_printable(symbol)?;
        writeln!(writer, "{}{}{}", symbol, config.separator, code)?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Write `symbol : count` lines in ascending symbol order
pub fn write_frequencies<W: Write>(
    writer: &mut W,
    frequencies: &FrequencyTable<char>,
) -> Result<()> {
    for (symbol, count) in frequencies {
        writeln!(writer, "{} : {}", symbol, count)?;
    }
    Ok(())
}

/// Write a bit sequence as a single line of `0`/`1` characters
pub fn write_bits<W: Write>(writer: &mut W, bits: &BitSequence) -> Result<()> {
    writeln!(writer, "{}", bits)?;
    Ok(())
}

/// Read table lines up to the sentinel line or end of input
///
/// An entry line is a single non-whitespace symbol, the separator, and a run
/// of `0`/`1` characters (empty for a single-symbol table). A run containing
/// anything else fails with [`HuffError::MalformedCode`]. Blank lines and
/// lines of any other shape are skipped. The reader is left just after the
/// sentinel line, so the encoded bits can be read next.
pub fn read_decode_table<R: BufRead + ?Sized>(
    reader: &mut R,
    config: &CodecConfig,
) -> Result<DecodeTable<char>> {
    let mut entries = Vec::new();
    let mut line = String::new();
    let mut line_no = 0usize;

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        line_no += 1;

        let text = line.trim_end_matches(['\r', '\n']);
        if text.trim_end() == config.end_sentinel {
            break;
        }

        match parse_entry(text, &config.separator) {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => {
                if !text.trim().is_empty() {
                    log::warn!("skipping line {} of code table: {:?}", line_no, text);
                }
            }
            Err(HuffError::MalformedCode { message }) => {
                return Err(HuffError::malformed_code(format!(
                    "line {}: {}",
                    line_no, message
                )));
            }
            Err(e) => return Err(e),
        }
    }

    log::debug!("Parsed {} code table entries from {} lines", entries.len(), line_no);
    DecodeTable::from_entries(entries)
}

/// Read the rest of the input as a `0`/`1` bit stream
///
/// Whitespace (including line breaks) is ignored; any other character is a
/// [`HuffError::MalformedCode`].
pub fn read_bits<R: BufRead + ?Sized>(reader: &mut R) -> Result<BitSequence> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_bits(&text)
}

fn parse_entry(text: &str, separator: &str) -> Result<Option<(BitSequence, char)>> {
    let Some(symbol) = text.chars().next() else {
        return Ok(None);
    };
    if symbol.is_whitespace() {
        return Ok(None);
    }

    let rest = &text[symbol.len_utf8()..];
    let bits = match rest.strip_prefix(separator) {
        Some(bits) => bits,
        // editors commonly strip the trailing blank of an empty-code line
        None if !rest.is_empty() && rest == separator.trim_end() => "",
        None => return Ok(None),
    };

    if let Some(bad) = bits.chars().find(|c| !matches!(c, '0' | '1') && !c.is_whitespace()) {
        return Err(HuffError::malformed_code(format!(
            "code for {:?} contains {:?}: {:?}",
            symbol, bad, bits
        )));
    }
    Ok(Some((parse_bits(bits)?, symbol)))
}

fn check_printable(symbol: char) -> Result<()> {
    if symbol.is_whitespace() || symbol.is_control() {
        return Err(HuffError::invalid_input(format!(
            "symbol {:?} cannot be written as a code table line",
            symbol
        )));
    }
    Ok(())
}
