use std::io::Read;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{Config, Quirks};
use crate::consts;
use crate::core::error::{RomError, VmError};
use crate::core::instruction::{self, InstructionKind};
use crate::core::ram;
use crate::core::rom::Rom;
use crate::utils::Operands;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStatus {
    RedrawScreen,
    Continue,
    Waiting,
}

/// Everything the machine can observe or change. Instruction handlers get
/// exclusive access for the duration of one `execute`.
#[derive(Debug, Clone)]
pub struct Processor {
    pub stack: [u16; consts::STACK_SIZE],
    pub registers: [u8; consts::REG_COUNT],
    pub idx_register: u16,
    pub pc: u16,
    pub stack_pointer: usize,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub ram: ram::Ram,
    pub display_buffer: ram::DisplayBuffer,
    pub keyboard_buffer: ram::KeyboardBuffer,
    pub halted_for_key: bool,
    pub pending_key_register: usize,
    pub quirks: Quirks,
    pub(crate) rng: StdRng,
}

impl Default for Processor {
    fn default() -> Self {
        Processor::with_config(&Config::default())
    }
}

impl Processor {
    pub fn new() -> Self {
        Processor::default()
    }

    pub fn with_config(config: &Config) -> Self {
        Processor {
            stack: [0; consts::STACK_SIZE],
            registers: [0; consts::REG_COUNT],
            idx_register: 0,
            pc: consts::PROG_OFFSET as u16,
            stack_pointer: 0,
            delay_timer: 0,
            sound_timer: 0,
            ram: ram::Ram::default(),
            display_buffer: ram::DisplayBuffer::default(),
            keyboard_buffer: ram::KeyboardBuffer::default(),
            halted_for_key: false,
            pending_key_register: 0,
            quirks: config.quirks,
            rng: match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            },
        }
    }

    pub fn load_rom(&mut self, rom: &Rom) {
        self.ram.load_program(&rom.buffer);
        debug!("loaded {} byte program at {:#05x}", rom.len(), consts::PROG_OFFSET);
    }

    /// Reads the whole image before touching memory, so a failed read leaves the machine as it was.
    pub fn load_program<R: Read>(&mut self, reader: &mut R) -> Result<(), RomError> {
        let rom = Rom::from_reader(reader)?;
        self.load_rom(&rom);
        Ok(())
    }

    pub fn fetch(&self) -> u16 {
        self.ram.read_word(self.pc)
    }

    pub fn decode(&self, opcode: u16) -> Option<InstructionKind> {
        instruction::classify(opcode)
    }

    pub fn execute(&mut self, kind: InstructionKind, opcode: u16) -> Result<CycleStatus, VmError> {
        let entry = kind.entry().ok_or(VmError::UnknownOpcode {
            opcode,
            pc: self.pc,
        })?;
        trace!("{:#05x}: {:#06x} {}", self.pc, opcode, kind);
        (entry.handler)(self, Operands::from_raw(opcode))?;
        Ok(match kind {
            InstructionKind::Cls | InstructionKind::Drw => CycleStatus::RedrawScreen,
            InstructionKind::LdVxK => CycleStatus::Waiting,
            _ => CycleStatus::Continue,
        })
    }

    /// One fetch/decode/execute round. Does nothing while a key wait is pending.
    pub fn cycle(&mut self) -> Result<CycleStatus, VmError> {
        if self.halted_for_key {
            return Ok(CycleStatus::Waiting);
        }
        let opcode = self.fetch();
        let kind = self.decode(opcode).ok_or(VmError::UnknownOpcode {
            opcode,
            pc: self.pc,
        })?;
        self.execute(kind, opcode)
    }

    /// Moves past an instruction the host chose not to run.
    pub fn skip_instruction(&mut self) {
        self.advance();
    }

    pub(crate) fn advance(&mut self) {
        self.pc = self.pc.wrapping_add(consts::OP_CODE_BYTES);
    }

    pub(crate) fn skip_if(&mut self, condition: bool) {
        self.advance();
        if condition {
            self.advance();
        }
    }

    pub(crate) fn set_with_flag(&mut self, x: usize, value: u8, flag: bool) {
        self.registers[x] = value;
        self.registers[consts::FLAG_REGISTER] = flag as u8;
        self.advance();
    }

    /// Called by the host at its own timer rate, independent of instruction speed.
    pub fn tick(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    pub fn key_press(&mut self, key: u8) {
        let key = key & 0x0F;
        self.keyboard_buffer.set(key, true);
        if self.halted_for_key {
            self.registers[self.pending_key_register] = key;
            self.halted_for_key = false;
            debug!("key {:X} resumed execution into V{:X}", key, self.pending_key_register);
        }
    }

    pub fn key_release(&mut self, key: u8) {
        self.keyboard_buffer.set(key, false);
    }

    pub fn is_halted_for_key(&self) -> bool {
        self.halted_for_key
    }

    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }
}
