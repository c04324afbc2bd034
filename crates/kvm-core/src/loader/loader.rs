//! Program Loader
//!
//! Parses array-instruction listings into decoded instructions.
//! This layer performs syntactic validation only; kinds and bounds are
//! checked when the program runs.
//!
//! ```text
//! const v1, int:4           # one instruction per line
//! new-array v0, v1, [I
//! filled-new-array {v2, v3}, [J
//! move-result-object v4
//! ```

use std::fs;
use std::path::Path;

use log::debug;

use crate::bytecode::instruction::{Instruction, Reg, MAX_FILLED_ARGS};
use crate::bytecode::opcode::OpCode;
use crate::error::{KvmError, KvmResult};
use crate::value::BoxedValue;

const COMMENT_CHAR: char = '#';

/// Loaded program
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedProgram {
    pub instructions: Vec<Instruction>,
}

/// Listing loader
pub struct ProgramLoader;

impl ProgramLoader {
    /// Load a listing from disk
    pub fn load_file(path: &Path) -> KvmResult<LoadedProgram> {
        let source = fs::read_to_string(path)?;
        Self::load(&source)
    }

    /// Load a listing from source text
    pub fn load(source: &str) -> KvmResult<LoadedProgram> {
        let mut instructions = Vec::new();

        for (number, raw) in source.lines().enumerate() {
            let line = match raw.find(COMMENT_CHAR) {
                Some(at) => &raw[..at],
                None => raw,
            }
            .trim();
            if line.is_empty() {
                continue;
            }
            let instruction = Self::parse_line(line).map_err(|message| KvmError::Parse {
                line: number + 1,
                message,
            })?;
            instructions.push(instruction);
        }

        debug!("loaded {} instructions", instructions.len());
        Ok(LoadedProgram { instructions })
    }

    fn parse_line(line: &str) -> Result<Instruction, String> {
        let (mnemonic, rest) = match line.split_once(char::is_whitespace) {
            Some((m, r)) => (m, r.trim()),
            None => (line, ""),
        };
        let op = OpCode::from_mnemonic(mnemonic)
            .ok_or_else(|| format!("unknown instruction `{}`", mnemonic))?;

        let instruction = match op {
            OpCode::Nop => {
                Self::operands(rest, 0)?;
                Instruction::Nop
            }
            OpCode::ReturnVoid => {
                Self::operands(rest, 0)?;
                Instruction::ReturnVoid
            }
            OpCode::MoveResultObject => {
                let ops = Self::operands(rest, 1)?;
                Instruction::MoveResultObject { dest: Self::read_register(ops[0])? }
            }
            OpCode::Const => {
                // the literal may itself contain a comma, so split once
                let (dest, literal) = rest
                    .split_once(',')
                    .ok_or_else(|| "const expects 2 operands".to_string())?;
                let value: BoxedValue = literal.trim().parse()?;
                Instruction::Const { dest: Self::read_register(dest.trim())?, value }
            }
            OpCode::ArrayLength => {
                let ops = Self::operands(rest, 2)?;
                Instruction::ArrayLength {
                    dest: Self::read_register(ops[0])?,
                    array: Self::read_register(ops[1])?,
                }
            }
            OpCode::NewArray => {
                let ops = Self::operands(rest, 3)?;
                Instruction::NewArray {
                    dest: Self::read_register(ops[0])?,
                    size: Self::read_register(ops[1])?,
                    descriptor: ops[2].to_string(),
                }
            }
            OpCode::FilledNewArray => {
                let (args, descriptor) = Self::read_register_list(rest)?;
                Instruction::FilledNewArray { args, descriptor }
            }
            OpCode::Aget
            | OpCode::AgetWide
            | OpCode::AgetObject
            | OpCode::AgetBoolean
            | OpCode::AgetByte
            | OpCode::AgetChar
            | OpCode::AgetShort => {
                let ops = Self::operands(rest, 3)?;
                Instruction::ArrayGet {
                    op,
                    dest: Self::read_register(ops[0])?,
                    array: Self::read_register(ops[1])?,
                    index: Self::read_register(ops[2])?,
                }
            }
            OpCode::Aput
            | OpCode::AputWide
            | OpCode::AputObject
            | OpCode::AputBoolean
            | OpCode::AputByte
            | OpCode::AputChar
            | OpCode::AputShort => {
                let ops = Self::operands(rest, 3)?;
                Instruction::ArrayPut {
                    op,
                    src: Self::read_register(ops[0])?,
                    array: Self::read_register(ops[1])?,
                    index: Self::read_register(ops[2])?,
                }
            }
        };
        Ok(instruction)
    }

    /// Split comma-separated operands and check their count
    fn operands(rest: &str, expected: usize) -> Result<Vec<&str>, String> {
        let ops: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split(',').map(str::trim).collect()
        };
        if ops.len() != expected {
            return Err(format!("expected {} operands, got {}", expected, ops.len()));
        }
        Ok(ops)
    }

    fn read_register(token: &str) -> Result<Reg, String> {
        token
            .strip_prefix('v')
            .and_then(|n| n.parse::<Reg>().ok())
            .ok_or_else(|| format!("expected register, got `{}`", token))
    }

    /// Parse `{vC, vD, ...}, <descriptor>`
    fn read_register_list(rest: &str) -> Result<(Vec<Reg>, String), String> {
        let body = rest
            .strip_prefix('{')
            .ok_or_else(|| "expected `{` register list".to_string())?;
        let (list, tail) = body
            .split_once('}')
            .ok_or_else(|| "unterminated register list".to_string())?;
        let descriptor = tail
            .trim()
            .strip_prefix(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| "expected type descriptor after register list".to_string())?;

        let mut args = Vec::new();
        for token in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            args.push(Self::read_register(token)?);
        }
        if args.len() > MAX_FILLED_ARGS {
            return Err(format!("at most {} registers allowed, got {}", MAX_FILLED_ARGS, args.len()));
        }
        Ok((args, descriptor.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_form() {
        let source = "
            # build an int[2]
            const v1, int:2
            new-array v0, v1, [I      # trailing comment
            array-length v2, v0
            aput v3, v0, v4
            aget-wide v5, v6, v7
            filled-new-array {v1, v2}, [I
            move-result-object v8
            nop
            return-void
        ";
        let program = ProgramLoader::load(source).unwrap();
        assert_eq!(
            program.instructions,
            vec![
                Instruction::Const { dest: 1, value: BoxedValue::Int(2) },
                Instruction::NewArray { dest: 0, size: 1, descriptor: "[I".to_string() },
                Instruction::ArrayLength { dest: 2, array: 0 },
                Instruction::ArrayPut { op: OpCode::Aput, src: 3, array: 0, index: 4 },
                Instruction::ArrayGet { op: OpCode::AgetWide, dest: 5, array: 6, index: 7 },
                Instruction::FilledNewArray { args: vec![1, 2], descriptor: "[I".to_string() },
                Instruction::MoveResultObject { dest: 8 },
                Instruction::Nop,
                Instruction::ReturnVoid,
            ]
        );
    }

    #[test]
    fn empty_register_list_allowed() {
        let program = ProgramLoader::load("filled-new-array {}, [Z").unwrap();
        assert_eq!(
            program.instructions[0],
            Instruction::FilledNewArray { args: vec![], descriptor: "[Z".to_string() }
        );
    }

    #[test]
    fn errors_carry_line_numbers() {
        let cases = [
            ("nop\nbogus v0", 2),
            ("const v0", 1),
            ("const v0, int:x", 1),
            ("\n\naget v0, v1", 3),
            ("aget v0, v1, r2", 1),
            ("filled-new-array {v0, v1, v2, v3, v4, v5}, [I", 1),
            ("filled-new-array {v0}", 1),
            ("return-void v0", 1),
        ];
        for (source, expected) in cases {
            match ProgramLoader::load(source) {
                Err(KvmError::Parse { line, .. }) => assert_eq!(line, expected, "{:?}", source),
                other => panic!("{:?} loaded as {:?}", source, other),
            }
        }
    }

    #[test]
    fn display_reparses() {
        let source = "const v0, long:-5\nfilled-new-array {v0}, [J\naput-object v1, v2, v3";
        let program = ProgramLoader::load(source).unwrap();
        let listing: Vec<String> = program.instructions.iter().map(|i| i.to_string()).collect();
        assert_eq!(ProgramLoader::load(&listing.join("\n")).unwrap(), program);
    }
}
