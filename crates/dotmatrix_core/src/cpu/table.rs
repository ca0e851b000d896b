//! Opcode tables for the unprefixed and CB-prefixed instruction sets.
//!
//! Every defined opcode maps to a handler, its encoded length, its base cycle
//! cost and the cost when a conditional branch is taken. The mnemonic is a
//! template used by the disassembler; operand placeholders are `d8`, `d16`,
//! `a8`, `a16`, `r8` (PC-relative) and `s8` (signed offset to SP).

use lazy_static::lazy_static;

use super::{Bus, Cpu};

/// Which of an entry's two cycle costs an instruction consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Timing {
    Base,
    Taken,
}

pub(crate) type Handler = fn(&mut Cpu, &mut dyn Bus, u8) -> Timing;

#[derive(Clone)]
pub(crate) struct OpEntry {
    pub handler: Handler,
    pub mnemonic: String,
    /// Encoded length in bytes, including the opcode (and the CB prefix).
    pub length: u8,
    pub cycles: u32,
    pub cycles_taken: u32,
}

impl OpEntry {
    #[inline]
    pub fn cycles_for(&self, timing: Timing) -> u32 {
        match timing {
            Timing::Base => self.cycles,
            Timing::Taken => self.cycles_taken,
        }
    }
}

/// Opcode byte that selects the CB table.
pub(crate) const CB_PREFIX: u8 = 0xCB;

const REG8: [&str; 8] = ["B", "C", "D", "E", "H", "L", "(HL)", "A"];
const RP: [&str; 4] = ["BC", "DE", "HL", "SP"];
const RP2: [&str; 4] = ["BC", "DE", "HL", "AF"];
const CC: [&str; 4] = ["NZ", "Z", "NC", "C"];
const ALU: [&str; 8] = [
    "ADD A,", "ADC A,", "SUB ", "SBC A,", "AND ", "XOR ", "OR ", "CP ",
];
const SHIFTS: [&str; 8] = ["RLC", "RRC", "RL", "RR", "SLA", "SRA", "SWAP", "SRL"];
const INDIRECT: [&str; 4] = ["(BC)", "(DE)", "(HL+)", "(HL-)"];

lazy_static! {
    pub(crate) static ref OPCODES: Vec<Option<OpEntry>> = build_main_table();
    pub(crate) static ref CB_OPCODES: Vec<OpEntry> = build_cb_table();
}

struct TableBuilder {
    entries: Vec<Option<OpEntry>>,
}

impl TableBuilder {
    fn new() -> Self {
        Self {
            entries: vec![None; 256],
        }
    }

    fn op(
        &mut self,
        opcode: u8,
        mnemonic: impl Into<String>,
        length: u8,
        cycles: u32,
        handler: Handler,
    ) {
        self.branch(opcode, mnemonic, length, cycles, cycles, handler);
    }

    fn branch(
        &mut self,
        opcode: u8,
        mnemonic: impl Into<String>,
        length: u8,
        cycles: u32,
        cycles_taken: u32,
        handler: Handler,
    ) {
        let slot = &mut self.entries[opcode as usize];
        debug_assert!(slot.is_none(), "opcode {opcode:#04x} defined twice");
        *slot = Some(OpEntry {
            handler,
            mnemonic: mnemonic.into(),
            length,
            cycles,
            cycles_taken,
        });
    }
}

#[inline]
fn hl_cost(index: u8, reg: u32, hl: u32) -> u32 {
    if index == 6 {
        hl
    } else {
        reg
    }
}

fn build_main_table() -> Vec<Option<OpEntry>> {
    let mut t = TableBuilder::new();

    t.op(0x00, "NOP", 1, 4, Cpu::exec_nop);
    t.op(0x08, "LD (a16),SP", 3, 20, Cpu::exec_ld_a16_sp);
    t.op(0x10, "STOP", 2, 4, Cpu::exec_stop);
    t.op(0x18, "JR r8", 2, 12, Cpu::exec_jr);
    t.op(0x27, "DAA", 1, 4, Cpu::exec_daa);
    t.op(0x2F, "CPL", 1, 4, Cpu::exec_cpl);
    t.op(0x37, "SCF", 1, 4, Cpu::exec_scf);
    t.op(0x3F, "CCF", 1, 4, Cpu::exec_ccf);
    t.op(0x07, "RLCA", 1, 4, Cpu::exec_rotate_a);
    t.op(0x0F, "RRCA", 1, 4, Cpu::exec_rotate_a);
    t.op(0x17, "RLA", 1, 4, Cpu::exec_rotate_a);
    t.op(0x1F, "RRA", 1, 4, Cpu::exec_rotate_a);

    for (i, rp) in RP.iter().enumerate() {
        let row = (i as u8) << 4;
        t.op(0x01 | row, format!("LD {rp},d16"), 3, 12, Cpu::exec_ld_rr_d16);
        t.op(0x02 | row, format!("LD {},A", INDIRECT[i]), 1, 8, Cpu::exec_ld_indirect_a);
        t.op(0x03 | row, format!("INC {rp}"), 1, 8, Cpu::exec_inc16);
        t.op(0x09 | row, format!("ADD HL,{rp}"), 1, 8, Cpu::exec_add_hl_rr);
        t.op(0x0A | row, format!("LD A,{}", INDIRECT[i]), 1, 8, Cpu::exec_ld_a_indirect);
        t.op(0x0B | row, format!("DEC {rp}"), 1, 8, Cpu::exec_dec16);
    }

    for (i, reg) in REG8.iter().enumerate() {
        let index = i as u8;
        let col = index << 3;
        t.op(0x04 | col, format!("INC {reg}"), 1, hl_cost(index, 4, 12), Cpu::exec_inc8);
        t.op(0x05 | col, format!("DEC {reg}"), 1, hl_cost(index, 4, 12), Cpu::exec_dec8);
        t.op(0x06 | col, format!("LD {reg},d8"), 2, hl_cost(index, 8, 12), Cpu::exec_ld_r_d8);
    }

    for (i, cc) in CC.iter().enumerate() {
        let col = (i as u8) << 3;
        t.branch(0x20 | col, format!("JR {cc},r8"), 2, 8, 12, Cpu::exec_jr_cc);
        t.branch(0xC0 | col, format!("RET {cc}"), 1, 8, 20, Cpu::exec_ret_cc);
        t.branch(0xC2 | col, format!("JP {cc},a16"), 3, 12, 16, Cpu::exec_jp_cc);
        t.branch(0xC4 | col, format!("CALL {cc},a16"), 3, 12, 24, Cpu::exec_call_cc);
    }

    for opcode in 0x40..=0x7Fu8 {
        if opcode == 0x76 {
            t.op(opcode, "HALT", 1, 4, Cpu::exec_halt);
            continue;
        }
        let dst = (opcode >> 3) & 0x07;
        let src = opcode & 0x07;
        let cycles = if dst == 6 || src == 6 { 8 } else { 4 };
        let mnemonic = format!("LD {},{}", REG8[dst as usize], REG8[src as usize]);
        t.op(opcode, mnemonic, 1, cycles, Cpu::exec_ld_r_r);
    }

    for opcode in 0x80..=0xBFu8 {
        let op = ALU[((opcode >> 3) & 0x07) as usize];
        let src = opcode & 0x07;
        let mnemonic = format!("{op}{}", REG8[src as usize]);
        t.op(opcode, mnemonic, 1, hl_cost(src, 4, 8), Cpu::exec_alu_reg);
    }

    for (i, op) in ALU.iter().enumerate() {
        let col = (i as u8) << 3;
        t.op(0xC6 | col, format!("{op}d8"), 2, 8, Cpu::exec_alu_imm);
        t.op(0xC7 | col, format!("RST {:02X}H", i * 8), 1, 16, Cpu::exec_rst);
    }

    for (i, rp) in RP2.iter().enumerate() {
        let row = (i as u8) << 4;
        t.op(0xC1 | row, format!("POP {rp}"), 1, 12, Cpu::exec_pop_rr);
        t.op(0xC5 | row, format!("PUSH {rp}"), 1, 16, Cpu::exec_push_rr);
    }

    t.op(0xC3, "JP a16", 3, 16, Cpu::exec_jp_a16);
    t.op(0xC9, "RET", 1, 16, Cpu::exec_ret);
    t.op(0xCD, "CALL a16", 3, 24, Cpu::exec_call_a16);
    t.op(0xD9, "RETI", 1, 16, Cpu::exec_reti);
    t.op(0xE0, "LDH (a8),A", 2, 12, Cpu::exec_ldh_a8);
    t.op(0xF0, "LDH A,(a8)", 2, 12, Cpu::exec_ldh_a8);
    t.op(0xE2, "LD (C),A", 1, 8, Cpu::exec_ldh_c);
    t.op(0xF2, "LD A,(C)", 1, 8, Cpu::exec_ldh_c);
    t.op(0xE8, "ADD SP,s8", 2, 16, Cpu::exec_add_sp_r8);
    t.op(0xF8, "LD HL,SP+s8", 2, 12, Cpu::exec_ld_hl_sp_r8);
    t.op(0xE9, "JP (HL)", 1, 4, Cpu::exec_jp_hl);
    t.op(0xF9, "LD SP,HL", 1, 8, Cpu::exec_ld_sp_hl);
    t.op(0xEA, "LD (a16),A", 3, 16, Cpu::exec_ld_a16_a);
    t.op(0xFA, "LD A,(a16)", 3, 16, Cpu::exec_ld_a16_a);
    t.op(0xF3, "DI", 1, 4, Cpu::exec_di);
    t.op(0xFB, "EI", 1, 4, Cpu::exec_ei);

    t.entries
}

fn build_cb_table() -> Vec<OpEntry> {
    (0..=0xFFu8)
        .map(|opcode| {
            let y = (opcode >> 3) & 0x07;
            let z = opcode & 0x07;
            let reg = REG8[z as usize];
            let (mnemonic, cycles, handler): (String, u32, Handler) = match opcode >> 6 {
                0 => (
                    format!("{} {reg}", SHIFTS[y as usize]),
                    hl_cost(z, 8, 16),
                    Cpu::exec_cb_shift,
                ),
                1 => (format!("BIT {y},{reg}"), hl_cost(z, 8, 12), Cpu::exec_cb_bit),
                2 => (format!("RES {y},{reg}"), hl_cost(z, 8, 16), Cpu::exec_cb_res),
                _ => (format!("SET {y},{reg}"), hl_cost(z, 8, 16), Cpu::exec_cb_set),
            };
            OpEntry {
                handler,
                mnemonic,
                length: 2,
                cycles,
                cycles_taken: cycles,
            }
        })
        .collect()
}

/// Opcodes with no defined instruction on the SM83.
pub const UNDEFINED_OPCODES: [u8; 11] = [
    0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD,
];
