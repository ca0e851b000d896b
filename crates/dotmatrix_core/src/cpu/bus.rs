/// Abstraction over the Game Boy bus (memory and IO) as seen by the CPU.
///
/// Every CPU memory access goes through these calls so the bus can apply its
/// mapping rules (boot ROM overlay, read-only ROM, side-effecting registers).
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);

    /// Little-endian 16-bit read.
    fn read16(&mut self, addr: u16) -> u16 {
        let lo = self.read8(addr) as u16;
        let hi = self.read8(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }
}
