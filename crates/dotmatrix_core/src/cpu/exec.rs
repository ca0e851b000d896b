//! Instruction handlers for the unprefixed opcode table.
//!
//! Each handler receives the opcode byte so that one function can serve a
//! whole encoding group (e.g. all `LD r,r'`), decoding register fields from
//! the opcode bits. Handlers only report whether a conditional branch was
//! taken; cycle costs live in the opcode table.

mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;

use super::table::Timing;
use super::{Bus, Cpu};

impl Cpu {
    pub(in crate::cpu) fn exec_nop(&mut self, _bus: &mut dyn Bus, _opcode: u8) -> Timing {
        Timing::Base
    }
}
