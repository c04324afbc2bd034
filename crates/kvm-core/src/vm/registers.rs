//! VM Register File
//!
//! Fixed-size frame of registers holding boxed values.
//! No execution semantics.

use crate::bytecode::Reg;
use crate::error::{KvmError, KvmResult};
use crate::value::BoxedValue;

/// Contents of one register
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Register {
    Empty,
    Value(BoxedValue),
    /// High half of the wide value held in the register below
    WideHigh,
}

/// Register frame
#[derive(Debug)]
pub struct RegisterFile {
    registers: Vec<Register>,
}

impl RegisterFile {
    /// Create a frame of `count` empty registers
    pub fn new(count: usize) -> Self {
        RegisterFile {
            registers: vec![Register::Empty; count],
        }
    }

    /// Inspect a register without interpreting it
    pub fn get(&self, reg: Reg) -> KvmResult<Register> {
        self.registers
            .get(usize::from(reg))
            .copied()
            .ok_or(KvmError::InvalidRegister(reg))
    }

    /// Read the value held in a register
    pub fn read(&self, reg: Reg) -> KvmResult<BoxedValue> {
        match self.get(reg)? {
            Register::Value(v) => Ok(v),
            Register::Empty | Register::WideHigh => Err(KvmError::UninitializedRegister(reg)),
        }
    }

    /// Write a value; wide values also claim the next register.
    ///
    /// Overwriting either half of an existing pair empties the other half.
    pub fn write(&mut self, reg: Reg, value: BoxedValue) -> KvmResult<()> {
        let index = usize::from(reg);
        let wide = value.kind().is_wide();
        let needed = if wide { index + 2 } else { index + 1 };
        if needed > self.registers.len() {
            return Err(KvmError::InvalidRegister(reg));
        }
        for slot in index..needed {
            self.release(slot);
        }
        self.registers[index] = Register::Value(value);
        if wide {
            self.registers[index + 1] = Register::WideHigh;
        }
        Ok(())
    }

    fn release(&mut self, slot: usize) {
        match self.registers[slot] {
            Register::WideHigh if slot > 0 => self.registers[slot - 1] = Register::Empty,
            Register::Value(v) if v.kind().is_wide() => {
                if let Some(high) = self.registers.get_mut(slot + 1) {
                    *high = Register::Empty;
                }
            }
            _ => {}
        }
    }

    /// Number of registers
    pub fn size(&self) -> usize {
        self.registers.len()
    }

    /// Registers that hold a value, in order
    pub fn values(&self) -> impl Iterator<Item = (Reg, BoxedValue)> + '_ {
        self.registers.iter().enumerate().filter_map(|(i, r)| match r {
            Register::Value(v) => Reg::try_from(i).ok().map(|reg| (reg, *v)),
            Register::Empty | Register::WideHigh => None,
        })
    }

    /// Reset every register to empty
    pub fn clear(&mut self) {
        self.registers.fill(Register::Empty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_register_is_uninitialized() {
        let regs = RegisterFile::new(2);
        assert!(matches!(regs.read(1), Err(KvmError::UninitializedRegister(1))));
        assert!(matches!(regs.read(2), Err(KvmError::InvalidRegister(2))));
    }

    #[test]
    fn wide_write_claims_pair() {
        let mut regs = RegisterFile::new(3);
        regs.write(0, BoxedValue::Long(1)).unwrap();
        assert_eq!(regs.get(1).unwrap(), Register::WideHigh);
        assert!(matches!(regs.read(1), Err(KvmError::UninitializedRegister(1))));
        assert!(matches!(regs.write(2, BoxedValue::Double(1.0)), Err(KvmError::InvalidRegister(2))));
        regs.write(2, BoxedValue::Int(3)).unwrap();
        let values: Vec<_> = regs.values().collect();
        assert_eq!(values, vec![(0, BoxedValue::Long(1)), (2, BoxedValue::Int(3))]);
    }

    #[test]
    fn narrow_write_to_high_half_breaks_pair() {
        let mut regs = RegisterFile::new(4);
        regs.write(0, BoxedValue::Double(2.5)).unwrap();
        regs.write(1, BoxedValue::Int(7)).unwrap();
        assert_eq!(regs.get(0).unwrap(), Register::Empty);
        assert_eq!(regs.read(1).unwrap(), BoxedValue::Int(7));
    }

    #[test]
    fn overwriting_low_half_drops_stale_marker() {
        let mut regs = RegisterFile::new(4);
        regs.write(0, BoxedValue::Long(9)).unwrap();
        regs.write(0, BoxedValue::Int(1)).unwrap();
        assert_eq!(regs.get(1).unwrap(), Register::Empty);

        // v1:v2 pair, then a wide write to v0:v1 orphans v2
        regs.write(1, BoxedValue::Long(3)).unwrap();
        regs.write(0, BoxedValue::Long(4)).unwrap();
        assert_eq!(regs.get(1).unwrap(), Register::WideHigh);
        assert_eq!(regs.get(2).unwrap(), Register::Empty);
        let values: Vec<_> = regs.values().collect();
        assert_eq!(values, vec![(0, BoxedValue::Long(4))]);
    }
}
