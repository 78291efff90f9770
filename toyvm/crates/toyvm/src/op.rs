//! Stack machine instructions and their textual form.
//!
//! A program is a sequence of mnemonics separated by whitespace or `;`.
//! `#` starts a comment that runs to the end of the line.
//!
//! ```text
//! push 1; push 2; pair    # (2 . 1)
//! dup setsnd              # second edge points back at the pair
//! gc
//! ```

use crate::error::{Result, VmError};
use std::fmt;
use std::str::FromStr;

/// A single stack machine instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Allocate a scalar and push it
    PushInt(i64),
    /// Replace the two topmost values with a pair of them (top becomes `first`)
    PushPair,
    /// Drop the top value
    Pop,
    /// Push the top value again
    Dup,
    /// Exchange the two topmost values
    Swap,
    /// Push a copy of the value beneath the top
    Over,
    /// Pop a value and store it as `first` of the pair beneath it
    SetFirst,
    /// Pop a value and store it as `second` of the pair beneath it
    SetSecond,
    /// Run a collection
    Collect,
}

impl Op {
    /// Instruction for a mnemonic that takes no operand
    fn from_mnemonic(word: &str) -> Option<Op> {
        Some(match word {
            "pair" => Op::PushPair,
            "pop" => Op::Pop,
            "dup" => Op::Dup,
            "swap" => Op::Swap,
            "over" => Op::Over,
            "setfst" => Op::SetFirst,
            "setsnd" => Op::SetSecond,
            "gc" => Op::Collect,
            _ => return None,
        })
    }

    /// Mnemonic used in program text
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Op::PushInt(_) => "push",
            Op::PushPair => "pair",
            Op::Pop => "pop",
            Op::Dup => "dup",
            Op::Swap => "swap",
            Op::Over => "over",
            Op::SetFirst => "setfst",
            Op::SetSecond => "setsnd",
            Op::Collect => "gc",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::PushInt(value) => write!(f, "push {}", value),
            op => f.write_str(op.mnemonic()),
        }
    }
}

impl FromStr for Op {
    type Err = VmError;

    /// Parse exactly one instruction, e.g. `push 42` or `pair`
    fn from_str(text: &str) -> Result<Self> {
        let program = Program::parse(text)?;
        match program.ops() {
            [op] => Ok(*op),
            [] => Err(VmError::parse(1, text, "expected an instruction")),
            [_, extra, ..] => Err(VmError::parse(1, extra.to_string(), "expected a single instruction")),
        }
    }
}

/// Parsed stack machine program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    ops: Vec<Op>,
}

impl Program {
    pub fn new(ops: Vec<Op>) -> Self {
        Self { ops }
    }

    /// Parse program text
    ///
    /// # Errors
    /// `VmError::Parse` with the 1-based line and the offending token for an
    /// unknown mnemonic, a missing operand, or an operand that is not an
    /// integer.
    pub fn parse(source: &str) -> Result<Self> {
        let mut ops = Vec::new();

        for (index, raw) in source.lines().enumerate() {
            let line = index + 1;
            let code = raw.split('#').next().unwrap_or_default();
            let mut words = code
                .split(|c: char| c.is_whitespace() || c == ';')
                .filter(|word| !word.is_empty());

            while let Some(word) = words.next() {
                let op = match word {
                    "push" => {
                        let operand = words
                            .next()
                            .ok_or_else(|| VmError::parse(line, word, "missing integer operand"))?;
                        let value = operand
                            .parse::<i64>()
                            .map_err(|e| VmError::parse(line, operand, format!("invalid integer: {}", e)))?;
                        Op::PushInt(value)
                    },
                    _ => Op::from_mnemonic(word)
                        .ok_or_else(|| VmError::parse(line, word, "unknown instruction"))?,
                };
                ops.push(op);
            }
        }

        log::debug!("parsed program with {} instructions", ops.len());
        Ok(Self { ops })
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl FromStr for Program {
    type Err = VmError;

    fn from_str(source: &str) -> Result<Self> {
        Program::parse(source)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, op) in self.ops.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", op)?;
        }
        Ok(())
    }
}
