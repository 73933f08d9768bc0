use std::fmt;

use crate::core::error::VmError;
use crate::core::executor;
use crate::core::processor::Processor;
use crate::utils::Operands;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionKind {
    Cls,
    Ret,
    Sys,
    Jp,
    Call,
    SeVxByte,
    SneVxByte,
    SeVxVy,
    LdVxByte,
    AddVxByte,
    LdVxVy,
    Or,
    And,
    Xor,
    AddVxVy,
    Sub,
    Shr,
    Subn,
    Shl,
    SneVxVy,
    LdIAddr,
    JpV0Addr,
    Rnd,
    Drw,
    Skp,
    Sknp,
    LdVxDt,
    LdVxK,
    LdDtVx,
    LdStVx,
    AddIVx,
    LdFVx,
    LdBVx,
    LdIVx,
    LdVxI,
}

impl InstructionKind {
    pub fn mnemonic(&self) -> &'static str {
        use InstructionKind::*;
        match self {
            Cls => "CLS",
            Ret => "RET",
            Sys => "SYS addr",
            Jp => "JP addr",
            Call => "CALL addr",
            SeVxByte => "SE Vx, byte",
            SneVxByte => "SNE Vx, byte",
            SeVxVy => "SE Vx, Vy",
            LdVxByte => "LD Vx, byte",
            AddVxByte => "ADD Vx, byte",
            LdVxVy => "LD Vx, Vy",
            Or => "OR Vx, Vy",
            And => "AND Vx, Vy",
            Xor => "XOR Vx, Vy",
            AddVxVy => "ADD Vx, Vy",
            Sub => "SUB Vx, Vy",
            Shr => "SHR Vx",
            Subn => "SUBN Vx, Vy",
            Shl => "SHL Vx",
            SneVxVy => "SNE Vx, Vy",
            LdIAddr => "LD I, addr",
            JpV0Addr => "JP V0, addr",
            Rnd => "RND Vx, byte",
            Drw => "DRW Vx, Vy, n",
            Skp => "SKP Vx",
            Sknp => "SKNP Vx",
            LdVxDt => "LD Vx, DT",
            LdVxK => "LD Vx, K",
            LdDtVx => "LD DT, Vx",
            LdStVx => "LD ST, Vx",
            AddIVx => "ADD I, Vx",
            LdFVx => "LD F, Vx",
            LdBVx => "LD B, Vx",
            LdIVx => "LD [I], Vx",
            LdVxI => "LD Vx, [I]",
        }
    }

    pub fn entry(&self) -> Option<&'static Instruction> {
        INSTRUCTIONS.iter().find(|instr| instr.kind == *self)
    }
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

pub type Handler = fn(&mut Processor, Operands) -> Result<(), VmError>;

/// One row of the opcode catalog: a raw word belongs to `kind` when
/// `raw & mask == template`.
pub struct Instruction {
    pub kind: InstructionKind,
    pub template: u16,
    pub mask: u16,
    pub handler: Handler,
}

impl Instruction {
    pub fn matches(&self, raw: u16) -> bool {
        raw & self.mask == self.template
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instruction")
            .field("kind", &self.kind)
            .field("template", &format_args!("{:#06x}", self.template))
            .field("mask", &format_args!("{:#06x}", self.mask))
            .finish()
    }
}

macro_rules! row {
    ($kind:ident, $template:expr, $mask:expr, $handler:path) => {
        Instruction {
            kind: InstructionKind::$kind,
            template: $template,
            mask: $mask,
            handler: $handler,
        }
    };
}

/// Matched top to bottom. SYS shares its top nibble with CLS and RET, so it
/// sits last and only catches the 0nnn words those two leave over.
pub static INSTRUCTIONS: [Instruction; 35] = [
    row!(Cls, 0x00E0, 0xFFFF, executor::cls),
    row!(Ret, 0x00EE, 0xFFFF, executor::ret),
    row!(Jp, 0x1000, 0xF000, executor::jp_addr),
    row!(Call, 0x2000, 0xF000, executor::call_addr),
    row!(SeVxByte, 0x3000, 0xF000, executor::se_vx_byte),
    row!(SneVxByte, 0x4000, 0xF000, executor::sne_vx_byte),
    row!(SeVxVy, 0x5000, 0xF00F, executor::se_vx_vy),
    row!(LdVxByte, 0x6000, 0xF000, executor::ld_vx_byte),
    row!(AddVxByte, 0x7000, 0xF000, executor::add_vx_byte),
    row!(LdVxVy, 0x8000, 0xF00F, executor::ld_vx_vy),
    row!(Or, 0x8001, 0xF00F, executor::or_vx_vy),
    row!(And, 0x8002, 0xF00F, executor::and_vx_vy),
    row!(Xor, 0x8003, 0xF00F, executor::xor_vx_vy),
    row!(AddVxVy, 0x8004, 0xF00F, executor::add_vx_vy),
    row!(Sub, 0x8005, 0xF00F, executor::sub_vx_vy),
    row!(Shr, 0x8006, 0xF00F, executor::shr_vx),
    row!(Subn, 0x8007, 0xF00F, executor::subn_vx_vy),
    row!(Shl, 0x800E, 0xF00F, executor::shl_vx),
    row!(SneVxVy, 0x9000, 0xF00F, executor::sne_vx_vy),
    row!(LdIAddr, 0xA000, 0xF000, executor::ld_i_addr),
    row!(JpV0Addr, 0xB000, 0xF000, executor::jp_v0_addr),
    row!(Rnd, 0xC000, 0xF000, executor::rnd_vx_byte),
    row!(Drw, 0xD000, 0xF000, executor::drw_vx_vy_n),
    row!(Skp, 0xE09E, 0xF0FF, executor::skp_vx),
    row!(Sknp, 0xE0A1, 0xF0FF, executor::sknp_vx),
    row!(LdVxDt, 0xF007, 0xF0FF, executor::ld_vx_dt),
    row!(LdVxK, 0xF00A, 0xF0FF, executor::ld_vx_k),
    row!(LdDtVx, 0xF015, 0xF0FF, executor::ld_dt_vx),
    row!(LdStVx, 0xF018, 0xF0FF, executor::ld_st_vx),
    row!(AddIVx, 0xF01E, 0xF0FF, executor::add_i_vx),
    row!(LdFVx, 0xF029, 0xF0FF, executor::ld_f_vx),
    row!(LdBVx, 0xF033, 0xF0FF, executor::ld_b_vx),
    row!(LdIVx, 0xF055, 0xF0FF, executor::ld_i_vx),
    row!(LdVxI, 0xF065, 0xF0FF, executor::ld_vx_i),
    row!(Sys, 0x0000, 0xF000, executor::sys_addr),
];

pub fn lookup(raw: u16) -> Option<&'static Instruction> {
    INSTRUCTIONS.iter().find(|instr| instr.matches(raw))
}

pub fn classify(raw: u16) -> Option<InstructionKind> {
    lookup(raw).map(|instr| instr.kind)
}
