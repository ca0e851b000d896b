use std::path::Path;

use clap::Parser;
use tempfile::TempDir;

use super::*;

const ROM_SIZE: usize = 0x8000;
const FRAME_BYTES: usize = 160 * 144 * 3;

/// ROM-only image with a valid header and `program` at the entry point.
fn rom_image(program: &[u8]) -> Vec<u8> {
    let mut rom = vec![0u8; ROM_SIZE];
    rom[0x134..0x13A].copy_from_slice(b"CLITST");
    rom[0x14D] = rom[0x134..=0x14C]
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_sub(b).wrapping_sub(1));
    rom[0x100..0x100 + program.len()].copy_from_slice(program);
    rom
}

fn write_rom(dir: &TempDir, program: &[u8]) -> PathBuf {
    let path = dir.path().join("test.gb");
    std::fs::write(&path, rom_image(program)).unwrap();
    path
}

fn args(rom: &Path, extra: &[&str]) -> Args {
    let mut argv = vec!["dotmatrix", rom.to_str().unwrap()];
    argv.extend_from_slice(extra);
    Args::try_parse_from(argv).unwrap()
}

#[test]
fn hex_addresses_accept_common_prefixes() {
    assert_eq!(parse_hex_addr("0150"), Ok(0x0150));
    assert_eq!(parse_hex_addr("0x0150"), Ok(0x0150));
    assert_eq!(parse_hex_addr("$FF80"), Ok(0xFF80));
    assert!(parse_hex_addr("zz").is_err());
    assert!(parse_hex_addr("10000").is_err());
}

#[test]
fn cli_defaults_and_repeated_breaks() {
    let args = Args::try_parse_from([
        "dotmatrix",
        "game.gb",
        "--break",
        "0x150",
        "--break",
        "$0200",
    ])
    .unwrap();
    assert_eq!(args.boot_rom, PathBuf::from("dmg_boot.bin"));
    assert_eq!(args.breakpoints, vec![0x0150, 0x0200]);
    assert_eq!(args.max_slice_ms, 500);
    assert!(!args.skip_boot);
    assert!(args.dump.is_none());

    assert!(Args::try_parse_from(["dotmatrix", "--break", "nope"]).is_err());
}

#[test]
fn missing_boot_rom_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let rom = write_rom(&dir, &[0x18, 0xFE]);
    let boot = dir.path().join("missing_boot.bin");

    let args = args(&rom, &["--boot-rom", boot.to_str().unwrap()]);
    let err = load_machine(&args).err().unwrap();
    let message = format!("{:#}", err);
    assert!(message.contains("boot ROM"), "{message}");
    assert!(message.contains("missing_boot.bin"), "{message}");
}

#[test]
fn boot_rom_file_is_mapped() {
    let dir = tempfile::tempdir().unwrap();
    let rom = write_rom(&dir, &[0x18, 0xFE]);
    let boot = dir.path().join("boot.bin");
    std::fs::write(&boot, vec![0u8; 0x100]).unwrap();

    let machine = load_machine(&args(&rom, &["--boot-rom", boot.to_str().unwrap()])).unwrap();
    assert!(machine.boot_rom_mapped());
    assert_eq!(machine.cpu.regs.pc, 0x0000);
}

#[test]
fn skip_boot_starts_at_entry_point() {
    let dir = tempfile::tempdir().unwrap();
    let rom = write_rom(&dir, &[0x18, 0xFE]);

    let machine = load_machine(&args(&rom, &["--skip-boot"])).unwrap();
    assert!(!machine.boot_rom_mapped());
    assert_eq!(machine.cpu.regs.pc, 0x0100);
    assert_eq!(machine.header().map(|h| h.title.as_str()), Some("CLITST"));
}

#[test]
fn unsupported_cartridge_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut image = rom_image(&[]);
    image[0x147] = 0x01;
    let path = dir.path().join("mbc1.gb");
    std::fs::write(&path, image).unwrap();

    assert!(load_machine(&args(&path, &["--skip-boot"])).is_err());
}

#[test]
fn frames_are_dumped_as_rgb24() {
    let dir = tempfile::tempdir().unwrap();
    let rom = write_rom(&dir, &[0x18, 0xFE]);
    let dump = dir.path().join("frames.rgb");

    run(args(
        &rom,
        &["--skip-boot", "--frames", "2", "--dump", dump.to_str().unwrap()],
    ))
    .unwrap();

    let bytes = std::fs::read(&dump).unwrap();
    assert_eq!(bytes.len(), 2 * FRAME_BYTES);
}

#[test]
fn breakpoint_ends_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let rom = write_rom(&dir, &[0x18, 0xFE]);
    let dump = dir.path().join("frames.rgb");

    run(args(
        &rom,
        &[
            "--skip-boot",
            "--frames",
            "100",
            "--break",
            "0x100",
            "--dump",
            dump.to_str().unwrap(),
        ],
    ))
    .unwrap();

    // Stopped on the first instruction, long before a frame completed.
    assert_eq!(std::fs::read(&dump).unwrap().len(), 0);
}

#[test]
fn disassemble_exits_without_running() {
    let dir = tempfile::tempdir().unwrap();
    let rom = write_rom(&dir, &[0x00, 0xC3, 0x50, 0x01]);
    let dump = dir.path().join("frames.rgb");

    run(args(
        &rom,
        &["--skip-boot", "--disassemble", "4", "--dump", dump.to_str().unwrap()],
    ))
    .unwrap();
    assert!(!dump.exists());
}

#[test]
fn core_errors_surface_through_run() {
    let dir = tempfile::tempdir().unwrap();
    let rom = write_rom(&dir, &[0xD3]);

    let err = run(args(&rom, &["--skip-boot"])).err().unwrap();
    assert!(err.to_string().contains("0xD3"), "{err}");
}
