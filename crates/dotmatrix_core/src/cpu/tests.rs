use super::disasm::{disassemble, disassemble_range};
use super::table::{CB_OPCODES, OPCODES};
use super::*;
use crate::error::CoreError;
use once_cell::sync::Lazy;
use pretty_assertions::assert_eq;

struct TestBus {
    memory: [u8; 0x10000],
}

impl Default for TestBus {
    fn default() -> Self {
        Self {
            memory: [0; 0x10000],
        }
    }
}

impl Bus for TestBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }
}

/// A ROM image that is nothing but NOPs.
static NOP_PROGRAM: Lazy<Vec<u8>> = Lazy::new(|| vec![0x00; 0x4000]);

fn setup(program: &[u8], at: u16) -> (Cpu, TestBus) {
    let mut bus = TestBus::default();
    let start = at as usize;
    bus.memory[start..start + program.len()].copy_from_slice(program);

    let mut cpu = Cpu::new(at, DMG_INTERRUPT_VECTORS);
    cpu.regs.sp = 0xFFFE;
    (cpu, bus)
}

fn flags(cpu: &Cpu) -> (bool, bool, bool, bool) {
    (
        cpu.get_flag(Flag::Z),
        cpu.get_flag(Flag::N),
        cpu.get_flag(Flag::H),
        cpu.get_flag(Flag::C),
    )
}

#[test]
fn inc_ff_wraps_to_zero_and_leaves_carry() {
    // INC A, INC B
    let (mut cpu, mut bus) = setup(&[0x3C, 0x04], 0x0000);
    cpu.regs.set_a(0xFF);
    cpu.regs.set_b(0xFF);
    cpu.set_flag(Flag::C, true);

    assert_eq!(cpu.step(&mut bus), Ok(4));
    assert_eq!(cpu.regs.a(), 0x00);
    assert_eq!(flags(&cpu), (true, false, true, true));

    cpu.set_flag(Flag::C, false);
    assert_eq!(cpu.step(&mut bus), Ok(4));
    assert_eq!(cpu.regs.b(), 0x00);
    assert_eq!(flags(&cpu), (true, false, true, false));
}

#[test]
fn inc_hl_indirect_costs_twelve_cycles() {
    // INC (HL)
    let (mut cpu, mut bus) = setup(&[0x34], 0x0000);
    cpu.regs.set_hl(0xC000);
    bus.memory[0xC000] = 0x0F;

    assert_eq!(cpu.step(&mut bus), Ok(12));
    assert_eq!(bus.memory[0xC000], 0x10);
    assert!(cpu.get_flag(Flag::H));
}

#[test]
fn sub_zero_minus_one_borrows() {
    // SUB B, then SUB d8 with the same operands
    let (mut cpu, mut bus) = setup(&[0x90, 0xD6, 0x01], 0x0000);
    cpu.regs.set_a(0x00);
    cpu.regs.set_b(0x01);

    assert_eq!(cpu.step(&mut bus), Ok(4));
    assert_eq!(cpu.regs.a(), 0xFF);
    assert_eq!(flags(&cpu), (false, true, true, true));

    cpu.regs.set_a(0x00);
    assert_eq!(cpu.step(&mut bus), Ok(8));
    assert_eq!(cpu.regs.a(), 0xFF);
    assert_eq!(flags(&cpu), (false, true, true, true));
}

#[test]
fn cp_leaves_accumulator_untouched() {
    // CP d8
    let (mut cpu, mut bus) = setup(&[0xFE, 0x42], 0x0000);
    cpu.regs.set_a(0x42);

    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.a(), 0x42);
    assert_eq!(flags(&cpu), (true, true, false, false));
}

#[test]
fn daa_corrects_bcd_addition() {
    // LD A,0x15 ; ADD A,0x27 ; DAA
    let (mut cpu, mut bus) = setup(&[0x3E, 0x15, 0xC6, 0x27, 0x27], 0x0000);

    cpu.step(&mut bus).unwrap();
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.a(), 0x3C);

    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.a(), 0x42);
    assert!(!cpu.get_flag(Flag::C));
    assert!(!cpu.get_flag(Flag::Z));
}

#[test]
fn daa_corrects_bcd_subtraction() {
    // LD A,0x42 ; SUB 0x15 ; DAA
    let (mut cpu, mut bus) = setup(&[0x3E, 0x42, 0xD6, 0x15, 0x27], 0x0000);

    for _ in 0..3 {
        cpu.step(&mut bus).unwrap();
    }
    assert_eq!(cpu.regs.a(), 0x27);
    assert!(cpu.get_flag(Flag::N));
}

#[test]
fn jr_minus_one_lands_inside_operand() {
    let (mut cpu, mut bus) = setup(&[0x18, 0xFF], 0x0150);

    assert_eq!(cpu.step(&mut bus), Ok(12));
    assert_eq!(cpu.regs.pc, 0x0151);
}

#[test]
fn conditional_branches_report_taken_cycles() {
    // JR NZ,+2
    let (mut cpu, mut bus) = setup(&[0x20, 0x02], 0x0000);
    cpu.set_flag(Flag::Z, true);
    assert_eq!(cpu.step(&mut bus), Ok(8));
    assert_eq!(cpu.regs.pc, 0x0002);

    cpu.regs.pc = 0x0000;
    cpu.set_flag(Flag::Z, false);
    assert_eq!(cpu.step(&mut bus), Ok(12));
    assert_eq!(cpu.regs.pc, 0x0004);

    // CALL NZ,0x1234
    let (mut cpu, mut bus) = setup(&[0xC4, 0x34, 0x12], 0x0000);
    cpu.set_flag(Flag::Z, true);
    assert_eq!(cpu.step(&mut bus), Ok(12));
    assert_eq!(cpu.regs.sp, 0xFFFE);

    cpu.regs.pc = 0x0000;
    cpu.set_flag(Flag::Z, false);
    assert_eq!(cpu.step(&mut bus), Ok(24));
    assert_eq!(cpu.regs.pc, 0x1234);
    assert_eq!(cpu.regs.sp, 0xFFFC);

    // RET Z back to the call site
    bus.memory[0x1234] = 0xC8;
    cpu.set_flag(Flag::Z, false);
    assert_eq!(cpu.step(&mut bus), Ok(8));
    cpu.regs.pc = 0x1234;
    cpu.set_flag(Flag::Z, true);
    assert_eq!(cpu.step(&mut bus), Ok(20));
    assert_eq!(cpu.regs.pc, 0x0003);

    // JP C,a16
    let (mut cpu, mut bus) = setup(&[0xDA, 0x00, 0x20], 0x0000);
    assert_eq!(cpu.step(&mut bus), Ok(12));
    cpu.regs.pc = 0x0000;
    cpu.set_flag(Flag::C, true);
    assert_eq!(cpu.step(&mut bus), Ok(16));
    assert_eq!(cpu.regs.pc, 0x2000);
}

#[test]
fn push_pop_round_trip() {
    // PUSH BC ; POP DE
    let (mut cpu, mut bus) = setup(&[0xC5, 0xD1], 0x0000);
    cpu.regs.set_bc(0xBEEF);

    assert_eq!(cpu.step(&mut bus), Ok(16));
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(bus.memory[0xFFFD], 0xBE);
    assert_eq!(bus.memory[0xFFFC], 0xEF);

    assert_eq!(cpu.step(&mut bus), Ok(12));
    assert_eq!(cpu.regs.de(), 0xBEEF);
    assert_eq!(cpu.regs.sp, 0xFFFE);
}

#[test]
fn pop_af_clears_low_nibble_of_f() {
    // POP AF
    let (mut cpu, mut bus) = setup(&[0xF1], 0x0000);
    cpu.regs.sp = 0xC000;
    bus.memory[0xC000] = 0xFF;
    bus.memory[0xC001] = 0x12;

    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.af(), 0x12F0);
}

#[test]
fn register_pairs_are_high_byte_first() {
    let mut regs = Registers::default();
    regs.set_bc(0x1234);
    assert_eq!((regs.b(), regs.c()), (0x12, 0x34));

    regs.set_l(0xCD);
    regs.set_h(0xAB);
    assert_eq!(regs.hl(), 0xABCD);

    regs.set_f(0xFF);
    assert_eq!(regs.f(), 0xF0);
}

#[test]
fn vblank_is_dispatched_before_timer() {
    let (mut cpu, mut bus) = setup(&[0x00], 0x1234);
    cpu.ime = true;
    bus.memory[0xFFFF] = 0x1F;
    bus.memory[0xFF0F] = 0x05;

    assert_eq!(cpu.step(&mut bus), Ok(20));
    assert_eq!(cpu.regs.pc, 0x0040);
    assert!(!cpu.ime);
    assert_eq!(bus.memory[0xFF0F], 0x04);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(bus.memory[0xFFFD], 0x12);
    assert_eq!(bus.memory[0xFFFC], 0x34);

    // Timer stays pending until IME is raised again.
    assert_eq!(cpu.step(&mut bus), Ok(4));
    assert_eq!(cpu.regs.pc, 0x0041);

    cpu.ime = true;
    assert_eq!(cpu.step(&mut bus), Ok(20));
    assert_eq!(cpu.regs.pc, 0x0050);
    assert_eq!(bus.memory[0xFF0F], 0x00);
}

#[test]
fn custom_vectors_are_used_for_dispatch() {
    let mut bus = TestBus::default();
    let mut cpu = Cpu::new(0x0000, [0x1000, 0x2000, 0x3000, 0x4000, 0x5000]);
    cpu.regs.sp = 0xFFFE;
    cpu.ime = true;
    bus.memory[0xFFFF] = Interrupt::Joypad.mask();
    bus.memory[0xFF0F] = Interrupt::Joypad.mask();

    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.pc, 0x5000);
}

#[test]
fn new_cpu_starts_at_given_address_with_cleared_registers() {
    let cpu = Cpu::new(0x0150, DMG_INTERRUPT_VECTORS);
    assert_eq!(cpu.regs.pc, 0x0150);
    assert_eq!(cpu.regs.sp, 0x0000);
    assert_eq!(
        (cpu.regs.af(), cpu.regs.bc(), cpu.regs.de(), cpu.regs.hl()),
        (0, 0, 0, 0)
    );
    assert!(!cpu.ime);
    assert_eq!(cpu.state(), RunState::Running);
}

#[test]
fn disabled_interrupts_are_not_dispatched() {
    let (mut cpu, mut bus) = setup(&[0x00], 0x0000);
    cpu.ime = true;
    bus.memory[0xFFFF] = 0x00;
    bus.memory[0xFF0F] = 0x1F;

    assert_eq!(cpu.step(&mut bus), Ok(4));
    assert_eq!(cpu.regs.pc, 0x0001);
}

#[test]
fn nop_program_takes_four_cycles_each() {
    let (mut cpu, mut bus) = setup(&NOP_PROGRAM, 0x0000);
    let count = 1000;

    let mut total = 0;
    for _ in 0..count {
        total += cpu.step(&mut bus).unwrap();
    }
    assert_eq!(total, 4 * count);
    assert_eq!(cpu.regs.pc, count as u16);
}

#[test]
fn pc_wraps_at_end_of_address_space() {
    let (mut cpu, mut bus) = setup(&[0x00], 0xFFFF);
    bus.memory[0xFFFF] = 0x00;

    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.pc, 0x0000);
}

#[test]
fn unknown_opcode_is_fatal() {
    let (mut cpu, mut bus) = setup(&[0x00, 0xD3], 0x0000);

    cpu.step(&mut bus).unwrap();
    assert_eq!(
        cpu.step(&mut bus),
        Err(CoreError::UnknownOpcode {
            opcode: 0xD3,
            address: 0x0001
        })
    );
    assert_eq!(cpu.regs.pc, 0x0001);
}

#[test]
fn halt_with_ime_clear_wakes_without_dispatch() {
    // HALT ; NOP
    let (mut cpu, mut bus) = setup(&[0x76, 0x00], 0x0000);

    assert_eq!(cpu.step(&mut bus), Ok(4));
    assert!(cpu.is_halted());
    assert_eq!(cpu.step(&mut bus), Ok(IDLE_CYCLES));
    assert_eq!(cpu.regs.pc, 0x0001);

    bus.memory[0xFFFF] = Interrupt::Timer.mask();
    bus.memory[0xFF0F] = Interrupt::Timer.mask();
    assert_eq!(cpu.step(&mut bus), Ok(4));
    assert!(!cpu.is_halted());
    assert_eq!(cpu.regs.pc, 0x0002);
    assert_eq!(bus.memory[0xFF0F], Interrupt::Timer.mask());
}

#[test]
fn halt_with_ime_set_dispatches() {
    let (mut cpu, mut bus) = setup(&[0x76], 0x0000);
    cpu.ime = true;
    bus.memory[0xFFFF] = 0x01;

    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.state(), RunState::Halted);

    bus.memory[0xFF0F] = 0x01;
    assert_eq!(cpu.step(&mut bus), Ok(20));
    assert_eq!(cpu.state(), RunState::Running);
    assert_eq!(cpu.regs.pc, 0x0040);
}

#[test]
fn ei_takes_effect_after_next_instruction() {
    // EI ; NOP ; NOP
    let (mut cpu, mut bus) = setup(&[0xFB, 0x00, 0x00], 0x0000);
    bus.memory[0xFFFF] = 0x01;
    bus.memory[0xFF0F] = 0x01;

    cpu.step(&mut bus).unwrap();
    assert!(!cpu.ime);
    assert!(cpu.ei_pending());

    // The instruction after EI still runs with IME clear.
    assert_eq!(cpu.step(&mut bus), Ok(4));
    assert_eq!(cpu.regs.pc, 0x0002);
    assert!(cpu.ime);

    assert_eq!(cpu.step(&mut bus), Ok(20));
    assert_eq!(cpu.regs.pc, 0x0040);
}

#[test]
fn di_cancels_pending_ei() {
    // EI ; DI ; NOP
    let (mut cpu, mut bus) = setup(&[0xFB, 0xF3, 0x00], 0x0000);

    for _ in 0..3 {
        cpu.step(&mut bus).unwrap();
    }
    assert!(!cpu.ime);
    assert!(!cpu.ei_pending());
}

#[test]
fn reti_enables_ime_immediately() {
    let (mut cpu, mut bus) = setup(&[0xD9], 0x0000);
    cpu.regs.sp = 0xFFFC;
    bus.memory[0xFFFC] = 0x00;
    bus.memory[0xFFFD] = 0x20;

    assert_eq!(cpu.step(&mut bus), Ok(16));
    assert!(cpu.ime);
    assert_eq!(cpu.regs.pc, 0x2000);
    assert_eq!(cpu.regs.sp, 0xFFFE);
}

#[test]
fn stop_waits_for_joypad_line() {
    // STOP 0 ; NOP
    let (mut cpu, mut bus) = setup(&[0x10, 0x00, 0x00], 0x0000);
    bus.memory[0xFF00] = 0xCF;

    assert_eq!(cpu.step(&mut bus), Ok(4));
    assert_eq!(cpu.state(), RunState::Stopped);
    assert_eq!(cpu.regs.pc, 0x0002);

    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.state(), RunState::Stopped);

    bus.memory[0xFF00] = 0xCE;
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.state(), RunState::Running);
    assert_eq!(cpu.regs.pc, 0x0002);
}

#[test]
fn add_hl_half_carry_comes_from_low_byte() {
    // ADD HL,BC three times
    let (mut cpu, mut bus) = setup(&[0x09, 0x09, 0x09], 0x0000);
    cpu.regs.set_hl(0x00FF);
    cpu.regs.set_bc(0x0001);
    cpu.set_flag(Flag::Z, true);

    assert_eq!(cpu.step(&mut bus), Ok(8));
    assert_eq!(cpu.regs.hl(), 0x0100);
    assert_eq!(flags(&cpu), (true, false, true, false));

    // A carry out of bit 11 alone does not set H.
    cpu.regs.set_hl(0x0F00);
    cpu.regs.set_bc(0x0100);
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.hl(), 0x1000);
    assert_eq!(flags(&cpu), (true, false, false, false));

    cpu.regs.set_hl(0xFFFF);
    cpu.regs.set_bc(0x0001);
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.hl(), 0x0000);
    assert_eq!(flags(&cpu), (true, false, true, true));
}

#[test]
fn signed_sp_offsets() {
    // ADD SP,-1 ; LD HL,SP+2
    let (mut cpu, mut bus) = setup(&[0xE8, 0xFF, 0xF8, 0x02], 0x0000);
    cpu.regs.sp = 0x0001;

    assert_eq!(cpu.step(&mut bus), Ok(16));
    assert_eq!(cpu.regs.sp, 0x0000);
    assert_eq!(flags(&cpu), (false, false, true, true));

    assert_eq!(cpu.step(&mut bus), Ok(12));
    assert_eq!(cpu.regs.hl(), 0x0002);
    assert_eq!(flags(&cpu), (false, false, false, false));
}

#[test]
fn ld_hl_increment_and_decrement() {
    // LD (HL+),A ; LD A,(HL-)
    let (mut cpu, mut bus) = setup(&[0x22, 0x3A], 0x0000);
    cpu.regs.set_a(0x99);
    cpu.regs.set_hl(0xC000);

    cpu.step(&mut bus).unwrap();
    assert_eq!(bus.memory[0xC000], 0x99);
    assert_eq!(cpu.regs.hl(), 0xC001);

    bus.memory[0xC001] = 0x11;
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.a(), 0x11);
    assert_eq!(cpu.regs.hl(), 0xC000);
}

#[test]
fn ld_a16_sp_stores_little_endian() {
    let (mut cpu, mut bus) = setup(&[0x08, 0x00, 0xC0], 0x0000);
    cpu.regs.sp = 0xABCD;

    assert_eq!(cpu.step(&mut bus), Ok(20));
    assert_eq!(bus.memory[0xC000], 0xCD);
    assert_eq!(bus.memory[0xC001], 0xAB);
}

#[test]
fn rotate_accumulator_always_clears_zero() {
    // RLCA with A = 0 would set Z under the CB variant.
    let (mut cpu, mut bus) = setup(&[0x07, 0xCB, 0x07], 0x0000);
    cpu.regs.set_a(0x00);

    cpu.step(&mut bus).unwrap();
    assert!(!cpu.get_flag(Flag::Z));

    assert_eq!(cpu.step(&mut bus), Ok(8));
    assert!(cpu.get_flag(Flag::Z));
}

#[test]
fn cb_prefixed_operations() {
    // BIT 7,H ; SWAP A ; SET 0,(HL) ; BIT 0,(HL) ; RES 0,(HL) ; SRA B
    let program = [0xCB, 0x7C, 0xCB, 0x37, 0xCB, 0xC6, 0xCB, 0x46, 0xCB, 0x86, 0xCB, 0x28];
    let (mut cpu, mut bus) = setup(&program, 0x0000);
    cpu.regs.set_hl(0xC000);
    cpu.regs.set_a(0xF1);
    cpu.regs.set_b(0x81);
    cpu.set_flag(Flag::C, true);

    // H = 0xC0, so bit 7 is set.
    assert_eq!(cpu.step(&mut bus), Ok(8));
    assert_eq!(flags(&cpu), (false, false, true, true));

    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.a(), 0x1F);
    assert_eq!(flags(&cpu), (false, false, false, false));

    assert_eq!(cpu.step(&mut bus), Ok(16));
    assert_eq!(bus.memory[0xC000], 0x01);

    assert_eq!(cpu.step(&mut bus), Ok(12));
    assert!(!cpu.get_flag(Flag::Z));

    assert_eq!(cpu.step(&mut bus), Ok(16));
    assert_eq!(bus.memory[0xC000], 0x00);

    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.b(), 0xC0);
    assert!(cpu.get_flag(Flag::C));
}

#[test]
fn rst_pushes_return_address() {
    let (mut cpu, mut bus) = setup(&[0xEF], 0x0200);

    assert_eq!(cpu.step(&mut bus), Ok(16));
    assert_eq!(cpu.regs.pc, 0x0028);
    assert_eq!(bus.read16(cpu.regs.sp), 0x0201);
}

#[test]
fn post_boot_registers() {
    let cpu = Cpu::post_boot();
    assert_eq!(cpu.regs.af(), 0x01B0);
    assert_eq!(cpu.regs.bc(), 0x0013);
    assert_eq!(cpu.regs.de(), 0x00D8);
    assert_eq!(cpu.regs.hl(), 0x014D);
    assert_eq!(cpu.regs.sp, 0xFFFE);
    assert_eq!(cpu.regs.pc, 0x0100);
}

#[test]
fn opcode_tables_cover_every_defined_encoding() {
    for opcode in 0..=0xFFu8 {
        let defined = OPCODES[opcode as usize].is_some();
        let expected = opcode != 0xCB && !UNDEFINED_OPCODES.contains(&opcode);
        assert_eq!(defined, expected, "opcode {opcode:#04x}");
    }
    assert_eq!(CB_OPCODES.len(), 256);
}

#[test]
fn disassembles_operands() {
    let program = [
        0x3E, 0x42, // LD A,$42
        0x20, 0xFE, // JR NZ,$0002
        0xE0, 0x44, // LDH ($FF44),A
        0xC3, 0x50, 0x01, // JP $0150
        0xCB, 0x7C, // BIT 7,H
        0xF8, 0xFD, // LD HL,SP-3
        0xD3, // undefined
    ];
    let (_, mut bus) = setup(&program, 0x0000);

    let text: Vec<String> = disassemble_range(&mut bus, 0x0000, 7)
        .into_iter()
        .map(|instr| instr.text)
        .collect();
    assert_eq!(
        text,
        vec![
            "LD A,$42",
            "JR NZ,$0002",
            "LDH ($FF44),A",
            "JP $0150",
            "BIT 7,H",
            "LD HL,SP-3",
            "DB $D3",
        ]
    );

    let jp = disassemble(&mut bus, 0x0006);
    assert_eq!(jp.bytes, vec![0xC3, 0x50, 0x01]);
    assert_eq!(jp.length, 3);
    assert_eq!(jp.to_string(), "0006  C3 50 01  JP $0150");
}
