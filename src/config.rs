use crate::consts;

/// How Fx55/Fx65 address the register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockTransfer {
    /// Offsets into both the register file and memory by the current index
    /// register, copies `x + 1` bytes, then advances I by `x + 1`.
    ///
    /// The copy runs against the mnemonics: Fx55 loads `memory[I..]` into
    /// `registers[I..]` and Fx65 stores `registers[I..]` into `memory[I..]`.
    /// Programs that point I at ordinary memory (I at 16 or above) fault with
    /// `VmError::RegisterWindow`. Use `Conventional` to run real programs.
    #[default]
    Observed,
    /// `V0..=Vx` to or from `memory[I..=I + x]`, leaving I unchanged.
    Conventional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Quirks {
    pub block_transfer: BlockTransfer,
}

/// What the host does when decode finds no instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownOpcodePolicy {
    #[default]
    Skip,
    Halt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub quirks: Quirks,
    pub unknown_opcode: UnknownOpcodePolicy,
    pub cycles_per_frame: u32,
    pub timer_hz: u32,
    pub seed: Option<u64>,
    pub scale: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            quirks: Quirks::default(),
            unknown_opcode: UnknownOpcodePolicy::default(),
            cycles_per_frame: consts::CYCLES_PER_FRAME,
            timer_hz: consts::TIMER_HZ,
            seed: None,
            scale: consts::SCALE_FACTOR,
        }
    }
}

impl Config {
    pub fn with_block_transfer(mut self, mode: BlockTransfer) -> Self {
        self.quirks.block_transfer = mode;
        self
    }

    pub fn with_unknown_opcode(mut self, policy: UnknownOpcodePolicy) -> Self {
        self.unknown_opcode = policy;
        self
    }

    pub fn with_cycles_per_frame(mut self, cycles: u32) -> Self {
        self.cycles_per_frame = cycles.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.quirks.block_transfer, BlockTransfer::Observed);
        assert_eq!(config.unknown_opcode, UnknownOpcodePolicy::Skip);
        assert_eq!(config.cycles_per_frame, 9);
        assert_eq!(config.timer_hz, 60);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_builders_clamp() {
        let config = Config::default().with_cycles_per_frame(0).with_scale(0);
        assert_eq!(config.cycles_per_frame, 1);
        assert_eq!(config.scale, 1);
    }
}
