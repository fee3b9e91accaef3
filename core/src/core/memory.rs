/// Base address of the 128-byte console RAM in the CPU address space.
pub const RAM_BASE: u16 = 0x80;

/// Size of the console RAM in bytes.
pub const RAM_SIZE: usize = 128;

/// Read-only view over the emulator's live memory image.
///
/// The emulator owns the memory; a title only ever peeks at it between
/// frames. Implementations must not have side effects on read (no
/// strobes, no latch clearing), so a title can read the same byte twice
/// in one `step()` and see the same value.
pub trait MemoryView {
    /// Read the byte at `addr` in the CPU address space.
    fn peek(&self, addr: u16) -> u8;
}

/// Read a console RAM byte by offset.
///
/// The offset is masked to 7 bits and rebased at [`RAM_BASE`], so the
/// absolute address (`0x8C`) and the RAM-relative offset (`0x0C`) resolve
/// to the same byte.
pub fn read_ram<M: MemoryView + ?Sized>(view: &M, offset: u16) -> u8 {
    view.peek((offset & 0x7F) + RAM_BASE)
}

/// Emulator handle used by the mode-selection protocol.
///
/// Each call advances the emulator by one or more frames as a side effect.
/// The memory view is available between calls so that the caller can poll
/// for the effect of a press.
pub trait Console: MemoryView {
    /// Hold the console's game-select switch for `frames` frames, then
    /// release it.
    fn press_select(&mut self, frames: u32);

    /// Soft reset: hit the reset switch and run until the game's
    /// post-reset initial frame.
    fn soft_reset(&mut self);
}

impl MemoryView for [u8; RAM_SIZE] {
    fn peek(&self, addr: u16) -> u8 {
        self[(addr as usize).wrapping_sub(RAM_BASE as usize) & 0x7F]
    }
}
