use std::collections::VecDeque;

use log::{error, warn};

use crate::config::{Config, UnknownOpcodePolicy};
use crate::core::error::{RomError, VmError};
use crate::core::processor::{CycleStatus, Processor};
use crate::core::rom::Rom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Pressed(u8),
    Released(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Executed(CycleStatus),
    Waiting,
    Skipped(u16),
    Halted(VmError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    pub cycles: u32,
    pub redraw: bool,
    pub sound: bool,
    pub halted: bool,
}

/// Drives a `Processor` on behalf of a front end. Key events may be queued at
/// any time; they are applied only between instructions.
#[derive(Debug)]
pub struct Host {
    pub processor: Processor,
    config: Config,
    events: VecDeque<KeyEvent>,
    fault: Option<VmError>,
}

impl Host {
    pub fn new(config: Config) -> Self {
        Host {
            processor: Processor::with_config(&config),
            config,
            events: VecDeque::new(),
            fault: None,
        }
    }

    pub fn with_rom(config: Config, rom: &Rom) -> Self {
        let mut host = Host::new(config);
        host.processor.load_rom(rom);
        host
    }

    pub fn load_program<R: std::io::Read>(&mut self, reader: &mut R) -> Result<(), RomError> {
        self.processor.load_program(reader)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fault(&self) -> Option<&VmError> {
        self.fault.as_ref()
    }

    pub fn push_key(&mut self, event: KeyEvent) {
        self.events.push_back(event);
    }

    fn drain_events(&mut self) {
        while let Some(event) = self.events.pop_front() {
            match event {
                KeyEvent::Pressed(key) => self.processor.key_press(key),
                KeyEvent::Released(key) => self.processor.key_release(key),
            }
        }
    }

    pub fn step(&mut self) -> StepOutcome {
        if let Some(err) = &self.fault {
            return StepOutcome::Halted(err.clone());
        }
        self.drain_events();
        if self.processor.is_halted_for_key() {
            return StepOutcome::Waiting;
        }
        match self.processor.cycle() {
            Ok(status) => StepOutcome::Executed(status),
            Err(err)
                if !err.is_fatal() && self.config.unknown_opcode == UnknownOpcodePolicy::Skip =>
            {
                // Non-fatal faults leave the PC on the offending word.
                let opcode = self.processor.fetch();
                warn!("skipping: {}", err);
                self.processor.skip_instruction();
                StepOutcome::Skipped(opcode)
            }
            Err(err) => {
                error!("halting: {}", err);
                self.fault = Some(err.clone());
                StepOutcome::Halted(err)
            }
        }
    }

    /// Runs one timer period worth of instructions, then ticks the timers once.
    pub fn run_frame(&mut self) -> FrameReport {
        let mut report = FrameReport::default();
        for _ in 0..self.config.cycles_per_frame {
            match self.step() {
                StepOutcome::Executed(CycleStatus::RedrawScreen) => {
                    report.cycles += 1;
                    report.redraw = true;
                }
                StepOutcome::Executed(_) | StepOutcome::Skipped(_) => report.cycles += 1,
                StepOutcome::Waiting => break,
                StepOutcome::Halted(_) => {
                    report.halted = true;
                    break;
                }
            }
        }
        if !report.halted {
            self.processor.tick();
        }
        report.sound = self.processor.sound_active();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn host_with(program: &[u8], config: Config) -> Host {
        let rom = Rom::from_bytes(program.to_vec()).expect("program fits");
        Host::with_rom(config.with_seed(3), &rom)
    }

    #[test]
    fn test_skip_policy() {
        let mut host = host_with(&[0xFF, 0xFF, 0x60, 0x01], Config::default());
        assert_eq!(host.step(), StepOutcome::Skipped(0xFFFF));
        assert_eq!(host.step(), StepOutcome::Executed(CycleStatus::Continue));
        assert_eq!(host.processor.registers[0], 1);
    }

    #[test]
    fn test_halt_policy_sticks() {
        let config = Config::default().with_unknown_opcode(UnknownOpcodePolicy::Halt);
        let mut host = host_with(&[0xFF, 0xFF], config);
        let err = VmError::UnknownOpcode {
            opcode: 0xFFFF,
            pc: 0x200,
        };
        assert_eq!(host.step(), StepOutcome::Halted(err.clone()));
        assert_eq!(host.step(), StepOutcome::Halted(err.clone()));
        assert_eq!(host.fault(), Some(&err));
        assert_eq!(host.processor.pc, 0x200);
    }

    #[test]
    fn test_stack_fault_halts_regardless_of_policy() {
        let mut host = host_with(&[0x00, 0xEE], Config::default());
        assert_eq!(
            host.step(),
            StepOutcome::Halted(VmError::StackUnderflow { pc: 0x200 })
        );
        assert!(host.run_frame().halted);
    }

    #[test]
    fn test_register_window_fault_halts_under_skip() {
        // LD I, 0x300; LD [I], V0
        let mut host = host_with(&[0xA3, 0x00, 0xF0, 0x55], Config::default());
        assert_eq!(host.step(), StepOutcome::Executed(CycleStatus::Continue));
        let err = VmError::RegisterWindow {
            index: 0x300,
            count: 1,
        };
        assert_eq!(host.step(), StepOutcome::Halted(err.clone()));
        assert_eq!(host.fault(), Some(&err));
        assert_eq!(host.processor.pc, 0x202);
    }

    #[test]
    fn test_runaway_recursion_overflows() {
        // 0x200: CALL 0x200
        let mut host = host_with(&[0x22, 0x00], Config::default());
        for _ in 0..16 {
            assert_eq!(host.step(), StepOutcome::Executed(CycleStatus::Continue));
        }
        assert_eq!(
            host.step(),
            StepOutcome::Halted(VmError::StackOverflow { pc: 0x200 })
        );
    }

    #[test]
    fn test_queued_key_resumes_wait() {
        // LD V2, K; JP 0x202
        let mut host = host_with(&[0xF2, 0x0A, 0x12, 0x02], Config::default());
        assert_eq!(host.step(), StepOutcome::Executed(CycleStatus::Waiting));
        assert_eq!(host.step(), StepOutcome::Waiting);

        host.push_key(KeyEvent::Pressed(0x7));
        host.push_key(KeyEvent::Released(0x7));
        assert_eq!(host.step(), StepOutcome::Executed(CycleStatus::Continue));
        assert_eq!(host.processor.registers[2], 0x7);
        assert!(!host.processor.keyboard_buffer.is_pressed(0x7));
        assert_eq!(host.processor.pc, 0x202);
    }

    #[test]
    fn test_run_frame_ticks_once() {
        // LD V0, 5; LD ST, V0; LD DT, V0; JP 0x206
        let program = [0x60, 0x05, 0xF0, 0x18, 0xF0, 0x15, 0x12, 0x06];
        let mut host = host_with(&program, Config::default().with_cycles_per_frame(4));
        let report = host.run_frame();
        assert_eq!(
            report,
            FrameReport {
                cycles: 4,
                redraw: false,
                sound: true,
                halted: false,
            }
        );
        assert_eq!(host.processor.delay_timer, 4);
        assert_eq!(host.processor.sound_timer, 4);

        for _ in 0..4 {
            host.run_frame();
        }
        assert_eq!(host.processor.delay_timer, 0);
        assert!(!host.run_frame().sound);
    }

    #[test]
    fn test_run_frame_reports_redraw() {
        // CLS; JP 0x202
        let mut host = host_with(&[0x00, 0xE0, 0x12, 0x02], Config::default());
        assert!(host.run_frame().redraw);
        assert!(!host.run_frame().redraw);
    }

    #[test]
    fn test_timers_tick_while_waiting_for_key() {
        // LD V0, 3; LD DT, V0; LD V1, K
        let program = [0x60, 0x03, 0xF0, 0x15, 0xF1, 0x0A];
        let mut host = host_with(&program, Config::default());
        let report = host.run_frame();
        assert_eq!(report.cycles, 3);
        assert_eq!(host.processor.delay_timer, 2);
        assert_eq!(host.run_frame().cycles, 0);
        assert_eq!(host.processor.delay_timer, 1);
    }
}
