//! Virtual Machine Core
//!
//! Runs array-instruction programs over a register frame and a heap.
//! Every array load and store goes through the typed array accessor.

use log::{debug, trace};

use crate::bytecode::{Instruction, OpCode, Reg};
use crate::config::KvmConfig;
use crate::error::{KvmError, KvmResult};
use crate::loader::LoadedProgram;
use crate::value::{BoxedValue, ObjRef};

use super::heap::Heap;
use super::registers::{Register, RegisterFile};

/// Array-instruction virtual machine
#[derive(Debug)]
pub struct VirtualMachine {
    config: KvmConfig,
    heap: Heap,
    registers: RegisterFile,

    instructions: Vec<Instruction>,
    pc: usize,

    /// Set by `filled-new-array`, consumed by `move-result-object`
    pending_result: Option<BoxedValue>,
    halted: bool,
}

impl VirtualMachine {
    /// Create a new VM instance
    pub fn new(config: KvmConfig, program: LoadedProgram) -> Self {
        VirtualMachine {
            heap: Heap::new(&config),
            registers: RegisterFile::new(config.register_count),
            instructions: program.instructions,
            pc: 0,
            pending_result: None,
            halted: false,
            config,
        }
    }

    /// Execute until `return-void`, the end of the program, or an error
    pub fn execute(&mut self) -> KvmResult<()> {
        while !self.halted && self.pc < self.instructions.len() {
            self.step()?;
        }
        debug!("stopped at pc {} with {} live objects", self.pc, self.heap.live_objects());
        Ok(())
    }

    /// Execute a single instruction
    pub fn step(&mut self) -> KvmResult<()> {
        let instruction = match self.instructions.get(self.pc) {
            Some(i) => i.clone(),
            None => {
                self.halted = true;
                return Ok(());
            }
        };
        trace!("{:04} {}", self.pc, instruction);
        self.pc += 1;

        match instruction {
            Instruction::Nop => {}
            Instruction::ReturnVoid => self.halted = true,

            Instruction::Const { dest, value } => self.registers.write(dest, value)?,

            Instruction::MoveResultObject { dest } => {
                let result = self.pending_result.take().ok_or(KvmError::NoPendingResult)?;
                self.registers.write(dest, result)?;
            }

            Instruction::ArrayLength { dest, array } => {
                let handle = self.read_reference(OpCode::ArrayLength, array)?;
                let length = self.heap.array_length(handle)?;
                let length = i32::try_from(length).map_err(|_| KvmError::ArrayTooLarge {
                    length,
                    max: i32::MAX as usize,
                })?;
                self.registers.write(dest, BoxedValue::Int(length))?;
            }

            Instruction::NewArray { dest, size, descriptor } => {
                let length = self.read_int(OpCode::NewArray, size)?;
                let handle = self.heap.new_array(&descriptor, length)?;
                self.registers.write(dest, handle.into())?;
            }

            Instruction::FilledNewArray { args, descriptor } => {
                let values = args
                    .iter()
                    .map(|&reg| self.registers.read(reg))
                    .collect::<KvmResult<Vec<_>>>()?;
                let handle = self.heap.filled_new_array(&descriptor, &values)?;
                self.pending_result = Some(handle.into());
            }

            Instruction::ArrayGet { op, dest, array, index } => {
                let handle = self.read_reference(op, array)?;
                let index = self.read_int(op, index)?;
                self.check_variant(op, handle)?;
                let value = self.heap.array_get(handle, index)?;
                self.registers.write(dest, value)?;
            }

            Instruction::ArrayPut { op, src, array, index } => {
                let value = self.registers.read(src)?;
                let handle = self.read_reference(op, array)?;
                let index = self.read_int(op, index)?;
                self.check_variant(op, handle)?;
                self.heap.array_set(handle, index, value)?;
            }
        }
        Ok(())
    }

    /// Reject an `aget*`/`aput*` whose declared variant disagrees with the array
    fn check_variant(&self, op: OpCode, handle: Option<ObjRef>) -> KvmResult<()> {
        let operand = match op.array_operand() {
            Some(operand) => operand,
            None => return Ok(()),
        };
        let kind = self.heap.array(handle)?.kind();
        if operand.accepts(kind) {
            return Ok(());
        }
        Err(KvmError::OperandMismatch {
            opcode: op,
            expected: operand.describe(),
            actual: format!("{} array", kind),
        })
    }

    fn read_int(&self, op: OpCode, reg: Reg) -> KvmResult<i32> {
        let value = self.registers.read(reg)?;
        value.as_int().ok_or_else(|| KvmError::OperandMismatch {
            opcode: op,
            expected: "int",
            actual: value.kind().to_string(),
        })
    }

    fn read_reference(&self, op: OpCode, reg: Reg) -> KvmResult<Option<ObjRef>> {
        let value = self.registers.read(reg)?;
        value.as_reference().ok_or_else(|| KvmError::OperandMismatch {
            opcode: op,
            expected: "reference",
            actual: value.kind().to_string(),
        })
    }

    /// Inspect a register
    pub fn register(&self, reg: Reg) -> KvmResult<Register> {
        self.registers.get(reg)
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    pub fn config(&self) -> &KvmConfig {
        &self.config
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Rewind to the first instruction with an empty frame and heap
    pub fn reset(&mut self) {
        self.heap = Heap::new(&self.config);
        self.registers.clear();
        self.pending_result = None;
        self.pc = 0;
        self.halted = false;
    }
}
