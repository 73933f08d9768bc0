use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use chip8::external::{input, output};
use chip8::{BlockTransfer, Config, Host, Rom, UnknownOpcodePolicy};
use clap::Parser;
use log::{error, info};

#[derive(Parser)]
#[command(name = "chip8")]
#[command(about = "CHIP-8 virtual machine")]
struct Cli {
    /// Program image, loaded at 0x200
    rom: PathBuf,

    /// Fx55/Fx65 copy V0..Vx to/from memory at I and leave I alone
    #[arg(long)]
    conventional_transfer: bool,

    /// Stop on an unknown opcode instead of skipping it
    #[arg(long)]
    halt_on_unknown: bool,

    /// Instructions executed per 60 Hz timer tick
    #[arg(long, default_value_t = chip8::consts::CYCLES_PER_FRAME)]
    cycles_per_frame: u32,

    /// Seed for the RND instruction
    #[arg(long)]
    seed: Option<u64>,

    /// Screen pixels per machine pixel
    #[arg(long, default_value_t = chip8::consts::SCALE_FACTOR)]
    scale: u32,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::default()
            .with_cycles_per_frame(self.cycles_per_frame)
            .with_scale(self.scale);
        if self.conventional_transfer {
            config = config.with_block_transfer(BlockTransfer::Conventional);
        }
        if self.halt_on_unknown {
            config = config.with_unknown_opcode(UnknownOpcodePolicy::Halt);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let config = cli.config();

    let rom = Rom::new(&cli.rom)?;
    let mut host = Host::with_rom(config, &rom);

    let context = sdl2::init()?;
    let mut keyboard = input::KeyboardDriver::new(&context)?;
    let mut screen = output::DisplayDriver::new(&context, host.config().scale)?;
    let frame = Duration::from_secs(1) / host.config().timer_hz;

    info!("running {} ({} bytes)", cli.rom.display(), rom.len());
    let mut sounding = false;
    while keyboard.poll(&mut host) {
        let started = Instant::now();
        let report = host.run_frame();
        if host.processor.display_buffer.take_dirty() {
            screen.draw(&host.processor.display_buffer)?;
        }
        if report.sound != sounding {
            sounding = report.sound;
            info!("sound {}", if sounding { "on" } else { "off" });
        }
        if report.halted {
            if let Some(err) = host.fault() {
                error!("machine halted: {}", err);
            }
            break;
        }
        if let Some(rest) = frame.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }
    Ok(())
}
