//! Per-instruction semantics. Each handler owns the program counter update for
//! its instruction: +2 for sequential flow, +4 when a skip condition holds, or
//! an explicit target for jumps, calls and returns.
//!
//! Flag-producing instructions compute VF from the operands as they were before
//! the instruction ran, and write VF after the result, so `VF` as destination
//! ends up holding the flag.

use log::{debug, warn};
use rand::Rng;

use crate::config::BlockTransfer;
use crate::consts;
use crate::core::error::VmError;
use crate::core::processor::Processor;
use crate::utils::Operands;

const FLAG: usize = consts::FLAG_REGISTER;

// 00E0
pub fn cls(proc: &mut Processor, _: Operands) -> Result<(), VmError> {
    proc.display_buffer.clear();
    proc.advance();
    Ok(())
}

// 00EE
pub fn ret(proc: &mut Processor, _: Operands) -> Result<(), VmError> {
    if proc.stack_pointer == 0 {
        return Err(VmError::StackUnderflow { pc: proc.pc });
    }
    proc.stack_pointer -= 1;
    proc.pc = proc.stack[proc.stack_pointer];
    Ok(())
}

// 0nnn
pub fn sys_addr(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    warn!("ignoring machine code routine at {:#05x}", ops.nnn);
    proc.advance();
    Ok(())
}

// 1nnn
pub fn jp_addr(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    proc.pc = ops.nnn;
    Ok(())
}

// 2nnn
pub fn call_addr(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    if proc.stack_pointer >= consts::STACK_SIZE {
        return Err(VmError::StackOverflow { pc: proc.pc });
    }
    proc.stack[proc.stack_pointer] = proc.pc.wrapping_add(consts::OP_CODE_BYTES);
    proc.stack_pointer += 1;
    proc.pc = ops.nnn;
    Ok(())
}

// 3xkk
pub fn se_vx_byte(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    proc.skip_if(proc.registers[ops.x] == ops.kk);
    Ok(())
}

// 4xkk
pub fn sne_vx_byte(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    proc.skip_if(proc.registers[ops.x] != ops.kk);
    Ok(())
}

// 5xy0
pub fn se_vx_vy(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    proc.skip_if(proc.registers[ops.x] == proc.registers[ops.y]);
    Ok(())
}

// 6xkk
pub fn ld_vx_byte(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    proc.registers[ops.x] = ops.kk;
    proc.advance();
    Ok(())
}

// 7xkk, no carry
pub fn add_vx_byte(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    proc.registers[ops.x] = proc.registers[ops.x].wrapping_add(ops.kk);
    proc.advance();
    Ok(())
}

// 8xy0
pub fn ld_vx_vy(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    proc.registers[ops.x] = proc.registers[ops.y];
    proc.advance();
    Ok(())
}

// 8xy1
pub fn or_vx_vy(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    proc.registers[ops.x] |= proc.registers[ops.y];
    proc.advance();
    Ok(())
}

// 8xy2
pub fn and_vx_vy(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    proc.registers[ops.x] &= proc.registers[ops.y];
    proc.advance();
    Ok(())
}

// 8xy3
pub fn xor_vx_vy(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    proc.registers[ops.x] ^= proc.registers[ops.y];
    proc.advance();
    Ok(())
}

// 8xy4
pub fn add_vx_vy(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    let (sum, carry) = proc.registers[ops.x].overflowing_add(proc.registers[ops.y]);
    proc.set_with_flag(ops.x, sum, carry);
    Ok(())
}

// 8xy5
pub fn sub_vx_vy(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    let (vx, vy) = (proc.registers[ops.x], proc.registers[ops.y]);
    proc.set_with_flag(ops.x, vx.wrapping_sub(vy), vx >= vy);
    Ok(())
}

// 8xy6
pub fn shr_vx(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    let vx = proc.registers[ops.x];
    proc.set_with_flag(ops.x, vx >> 1, vx & 0b0000_0001 == 1);
    Ok(())
}

// 8xy7
pub fn subn_vx_vy(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    let (vx, vy) = (proc.registers[ops.x], proc.registers[ops.y]);
    proc.set_with_flag(ops.x, vy.wrapping_sub(vx), vy >= vx);
    Ok(())
}

// 8xyE
pub fn shl_vx(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    let vx = proc.registers[ops.x];
    proc.set_with_flag(ops.x, vx << 1, vx & 0b1000_0000 != 0);
    Ok(())
}

// 9xy0
pub fn sne_vx_vy(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    proc.skip_if(proc.registers[ops.x] != proc.registers[ops.y]);
    Ok(())
}

// Annn
pub fn ld_i_addr(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    proc.idx_register = ops.nnn;
    proc.advance();
    Ok(())
}

// Bnnn
pub fn jp_v0_addr(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    proc.pc = ops.nnn.wrapping_add(proc.registers[0] as u16);
    Ok(())
}

// Cxkk
pub fn rnd_vx_byte(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    let rand_val: u8 = proc.rng.gen();
    proc.registers[ops.x] = rand_val & ops.kk;
    proc.advance();
    Ok(())
}

// Dxyn
pub fn drw_vx_vy_n(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    let sprite = proc.ram.read_bytes(proc.idx_register, ops.n as usize);
    let (vx, vy) = (proc.registers[ops.x], proc.registers[ops.y]);
    let collided = proc.display_buffer.draw(&sprite, vx, vy);
    proc.registers[FLAG] = collided as u8;
    proc.advance();
    Ok(())
}

// Ex9E
pub fn skp_vx(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    proc.skip_if(proc.keyboard_buffer.is_pressed(proc.registers[ops.x]));
    Ok(())
}

// ExA1
pub fn sknp_vx(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    proc.skip_if(!proc.keyboard_buffer.is_pressed(proc.registers[ops.x]));
    Ok(())
}

// Fx07
pub fn ld_vx_dt(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    proc.registers[ops.x] = proc.delay_timer;
    proc.advance();
    Ok(())
}

// Fx0A: the host stops fetching until a key press resumes execution.
pub fn ld_vx_k(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    proc.halted_for_key = true;
    proc.pending_key_register = ops.x;
    debug!("waiting for a key press into V{:X}", ops.x);
    proc.advance();
    Ok(())
}

// Fx15
pub fn ld_dt_vx(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    proc.delay_timer = proc.registers[ops.x];
    proc.advance();
    Ok(())
}

// Fx18
pub fn ld_st_vx(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    proc.sound_timer = proc.registers[ops.x];
    proc.advance();
    Ok(())
}

// Fx1E
pub fn add_i_vx(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    let vx = proc.registers[ops.x] as u16;
    let overflow = proc.idx_register as u32 + vx as u32 > consts::ADDR_MASK as u32;
    proc.idx_register = proc.idx_register.wrapping_add(vx);
    proc.registers[FLAG] = overflow as u8;
    proc.advance();
    Ok(())
}

// Fx29
pub fn ld_f_vx(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    proc.idx_register = proc.registers[ops.x] as u16 * consts::FONT_GLYPH_BYTES;
    proc.advance();
    Ok(())
}

// Fx33
pub fn ld_b_vx(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    let num = proc.registers[ops.x];
    let idx = proc.idx_register;
    proc.ram.write(idx, num / 100);
    proc.ram.write(idx.wrapping_add(1), (num / 10) % 10);
    proc.ram.write(idx.wrapping_add(2), num % 10);
    proc.advance();
    Ok(())
}

// Fx55. Observed mode runs opposite to the mnemonic: memory into registers.
pub fn ld_i_vx(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    let count = ops.x + 1;
    match proc.quirks.block_transfer {
        BlockTransfer::Observed => {
            let base = register_window(proc.idx_register, count)?;
            for i in base..base + count {
                proc.registers[i] = proc.ram.read(i as u16);
            }
            proc.idx_register = proc.idx_register.wrapping_add(count as u16);
        }
        BlockTransfer::Conventional => {
            for i in 0..count {
                let addr = proc.idx_register.wrapping_add(i as u16);
                proc.ram.write(addr, proc.registers[i]);
            }
        }
    }
    proc.advance();
    Ok(())
}

// Fx65. Observed mode runs opposite to the mnemonic: registers into memory.
pub fn ld_vx_i(proc: &mut Processor, ops: Operands) -> Result<(), VmError> {
    let count = ops.x + 1;
    match proc.quirks.block_transfer {
        BlockTransfer::Observed => {
            let base = register_window(proc.idx_register, count)?;
            for i in base..base + count {
                proc.ram.write(i as u16, proc.registers[i]);
            }
            proc.idx_register = proc.idx_register.wrapping_add(count as u16);
        }
        BlockTransfer::Conventional => {
            for i in 0..count {
                let addr = proc.idx_register.wrapping_add(i as u16);
                proc.registers[i] = proc.ram.read(addr);
            }
        }
    }
    proc.advance();
    Ok(())
}

/// The observed transfer indexes the register file by I, so `I..I + count` must stay inside it.
fn register_window(index: u16, count: usize) -> Result<usize, VmError> {
    let base = index as usize;
    if base + count > consts::REG_COUNT {
        return Err(VmError::RegisterWindow { index, count });
    }
    Ok(base)
}
