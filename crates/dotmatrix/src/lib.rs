use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use dotmatrix_common::clock::{Pacer, SystemClock};
use dotmatrix_core::cpu::disasm::disassemble_range;
use dotmatrix_core::system::StepObserver;
use dotmatrix_core::{Emulator, GameBoy, SystemConfig};

#[derive(Parser, Debug)]
#[command(name = "dotmatrix", version, about = "Headless Game Boy (DMG) emulator")]
pub struct Args {
    /// Path to a ROM-only cartridge image
    pub rom: Option<PathBuf>,

    /// Path to the 256-byte DMG boot ROM
    #[arg(long, default_value = "dmg_boot.bin")]
    pub boot_rom: PathBuf,

    /// Start at 0x0100 in the post-boot state instead of running the boot ROM
    #[arg(long)]
    pub skip_boot: bool,

    /// Number of frames to run
    #[arg(long, default_value_t = 60)]
    pub frames: u64,

    /// Write every completed frame to this file as raw RGB24
    #[arg(long)]
    pub dump: Option<PathBuf>,

    /// Pace emulation against the wall clock
    #[arg(long)]
    pub realtime: bool,

    /// Longest wall-clock slice executed in one tick
    #[arg(long, default_value_t = 500)]
    pub max_slice_ms: u32,

    /// Stop when execution reaches this address (hex, repeatable)
    #[arg(long = "break", value_name = "ADDR", value_parser = parse_hex_addr)]
    pub breakpoints: Vec<u16>,

    /// Print COUNT instructions from the start address and exit
    #[arg(long, value_name = "COUNT")]
    pub disassemble: Option<usize>,
}

/// Parse a 16-bit address written as `0150`, `0x0150` or `$0150`.
pub fn parse_hex_addr(s: &str) -> Result<u16, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .or_else(|| s.strip_prefix('$'))
        .unwrap_or(s);
    u16::from_str_radix(digits, 16).map_err(|err| format!("invalid address '{}': {}", s, err))
}

fn read_file(path: &Path, what: &str) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {} '{}'", what, path.display()))
}

/// Load the boot ROM and cartridge named by `args` and build a machine.
pub fn load_machine(args: &Args) -> Result<GameBoy> {
    let boot_rom = if args.skip_boot {
        None
    } else {
        Some(read_file(&args.boot_rom, "boot ROM")?)
    };
    let rom = args
        .rom
        .as_deref()
        .map(|path| read_file(path, "ROM"))
        .transpose()?;

    let machine = GameBoy::new(boot_rom.as_deref(), rom.as_deref())?;
    Ok(machine)
}

/// Prints machine state when a breakpoint is hit.
struct BreakReporter;

impl StepObserver for BreakReporter {
    fn on_breakpoint(&mut self, machine: &GameBoy, pc: u16) {
        println!("break at ${:04X}", pc);
        println!("  {}", machine.cpu.regs);
    }
}

pub fn run(args: Args) -> Result<()> {
    let mut machine = load_machine(&args)?;

    if let Some(count) = args.disassemble {
        let start = machine.cpu.regs.pc;
        for instruction in disassemble_range(&mut machine.bus, start, count) {
            println!("{}", instruction);
        }
        return Ok(());
    }

    let config = SystemConfig::builder()
        .max_slice_ms(args.max_slice_ms)
        .build();
    let mut emulator = Emulator::new(machine, config);
    for &addr in &args.breakpoints {
        if !emulator.debugger_mut().add_breakpoint(addr) {
            bail!("too many breakpoints, cannot add ${:04X}", addr);
        }
    }
    emulator.add_observer(Box::new(BreakReporter));

    let mut dump = args
        .dump
        .as_deref()
        .map(|path| {
            File::create(path)
                .map(BufWriter::new)
                .with_context(|| format!("failed to create dump file '{}'", path.display()))
        })
        .transpose()?;

    let mut pacer = args.realtime.then(|| Pacer::new(SystemClock::new()));
    let first_frame = emulator.machine().ppu.frame_count();
    let mut last_frame = first_frame;

    while last_frame - first_frame < args.frames {
        // One millisecond is far shorter than a frame, so no frame is missed
        // between dumps.
        let dt = match pacer.as_mut() {
            Some(pacer) => {
                std::thread::sleep(Duration::from_millis(1));
                pacer.delta_ms()
            }
            None => 1,
        };
        emulator.tick(dt)?;

        let frame = emulator.machine().ppu.frame_count();
        if frame != last_frame {
            last_frame = frame;
            if let Some(out) = dump.as_mut() {
                out.write_all(&emulator.machine().frame_rgb24())
                    .context("failed to write frame dump")?;
            }
        }

        if emulator.debugger().single_step() {
            let recent: Vec<String> = emulator
                .debugger()
                .recent()
                .iter()
                .map(|pc| format!("${:04X}", pc))
                .collect();
            println!("  recent: {}", recent.join(" "));
            break;
        }
    }

    if let Some(mut out) = dump {
        out.flush().context("failed to flush frame dump")?;
    }
    log::info!("ran {} frames", last_frame - first_frame);
    Ok(())
}

#[cfg(test)]
mod tests;
