use std::path::Path;

use log::{debug, info};

use crate::{config::arch_config::WordType, rom::Rom};

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("cannot read ROM image: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: invalid address directive `{text}`")]
    BadAddress { line: usize, text: String },

    #[error("line {line}: invalid hex data `{text}`")]
    BadWord { line: usize, text: String },

    #[error("ROM image contains no instructions")]
    Empty,
}

/// Merge one byte into the ROM word that contains `addr`.
fn put_byte(rom: &mut Rom, addr: WordType, byte: u8) {
    let shift = (addr & 0b11) * 8;
    let word = rom.word(addr).unwrap_or(0) & !(0xFF << shift);
    rom.insert(addr, word | ((byte as u32) << shift));
}

/// Parse a hex ROM image.
///
/// ```text
/// @00000000          set the load address (hex, bytes)
/// 00000513           one 32-bit word, as written
/// 13 05 00 00        byte tokens, stored little-endian from the load address
/// ```
///
/// Blank lines are skipped.
pub fn parse_hex(text: &str) -> Result<Rom, LoadError> {
    let mut rom = Rom::new();
    let mut addr: WordType = 0;

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(directive) = line.strip_prefix('@') {
            addr = WordType::from_str_radix(directive.trim(), 16).map_err(|_| {
                LoadError::BadAddress {
                    line: line_num,
                    text: line.to_string(),
                }
            })?;
            continue;
        }

        let bad_word = |token: &str| LoadError::BadWord {
            line: line_num,
            text: token.to_string(),
        };

        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [word] if word.len() == 8 => {
                let word = u32::from_str_radix(word, 16).map_err(|_| bad_word(*word))?;
                rom.insert(addr, word);
                addr = addr.wrapping_add(4);
            }
            bytes if bytes.iter().all(|token| token.len() == 2) => {
                for token in bytes {
                    let byte = u8::from_str_radix(token, 16).map_err(|_| bad_word(*token))?;
                    put_byte(&mut rom, addr, byte);
                    addr = addr.wrapping_add(1);
                }
            }
            _ => return Err(bad_word(line)),
        }
    }

    if rom.is_empty() {
        return Err(LoadError::Empty);
    }

    for (addr, word) in rom.iter().take(8) {
        debug!("ROM {:#010x}: {:08x}", addr, word);
    }

    Ok(rom)
}

/// Read and parse a hex ROM image from `path`.
pub fn load_hex(path: &Path) -> Result<Rom, LoadError> {
    let text = std::fs::read_to_string(path)?;
    let rom = parse_hex(&text)?;
    info!("loaded {} words from {}", rom.len(), path.display());
    Ok(rom)
}
