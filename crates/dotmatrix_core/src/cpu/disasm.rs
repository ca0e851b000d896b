//! A linear disassembler over the opcode tables.
//!
//! There is no control-flow analysis: bytes are decoded one instruction at a
//! time from the given address, so data blocks decode as garbage code.

use std::fmt;

use super::table::{CB_OPCODES, CB_PREFIX, OPCODES};
use super::Bus;

/// One decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub address: u16,
    pub bytes: Vec<u8>,
    pub length: u8,
    pub text: String,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex: Vec<String> = self.bytes.iter().map(|b| format!("{:02X}", b)).collect();
        write!(f, "{:04X}  {:<9} {}", self.address, hex.join(" "), self.text)
    }
}

/// Decode the instruction at `address`. Reads go through the bus, so the
/// boot ROM overlay is honoured.
pub fn disassemble<B: Bus + ?Sized>(bus: &mut B, address: u16) -> Instruction {
    let opcode = bus.read8(address);

    let (template, length) = if opcode == CB_PREFIX {
        let cb = bus.read8(address.wrapping_add(1));
        let entry = &CB_OPCODES[cb as usize];
        (entry.mnemonic.as_str(), entry.length)
    } else {
        match &OPCODES[opcode as usize] {
            Some(entry) => (entry.mnemonic.as_str(), entry.length),
            None => {
                return Instruction {
                    address,
                    bytes: vec![opcode],
                    length: 1,
                    text: format!("DB ${:02X}", opcode),
                }
            }
        }
    };

    let bytes: Vec<u8> = (0..length as u16)
        .map(|offset| bus.read8(address.wrapping_add(offset)))
        .collect();
    let text = render_operands(template, address, &bytes);

    Instruction {
        address,
        bytes,
        length,
        text,
    }
}

/// Decode `count` consecutive instructions starting at `address`.
pub fn disassemble_range<B: Bus + ?Sized>(
    bus: &mut B,
    address: u16,
    count: usize,
) -> Vec<Instruction> {
    let mut listing = Vec::with_capacity(count);
    let mut pc = address;
    for _ in 0..count {
        let instr = disassemble(bus, pc);
        pc = pc.wrapping_add(instr.length as u16);
        listing.push(instr);
    }
    listing
}

fn render_operands(template: &str, address: u16, bytes: &[u8]) -> String {
    let imm8 = bytes.get(1).copied().unwrap_or(0);
    let imm16 = u16::from_le_bytes([imm8, bytes.get(2).copied().unwrap_or(0)]);

    if template.contains("d16") {
        template.replace("d16", &format!("${:04X}", imm16))
    } else if template.contains("a16") {
        template.replace("a16", &format!("${:04X}", imm16))
    } else if template.contains("d8") {
        template.replace("d8", &format!("${:02X}", imm8))
    } else if template.contains("a8") {
        template.replace("a8", &format!("$FF{:02X}", imm8))
    } else if template.contains("r8") {
        let next = address.wrapping_add(bytes.len() as u16);
        let target = next.wrapping_add_signed(imm8 as i8 as i16);
        template.replace("r8", &format!("${:04X}", target))
    } else if template.contains("SP+s8") {
        template.replace("SP+s8", &format!("SP{:+}", imm8 as i8))
    } else if template.contains("s8") {
        template.replace("s8", &format!("{}", imm8 as i8))
    } else {
        template.to_string()
    }
}
