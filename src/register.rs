//! Access to the memory-mapped register space.
//!
//! All drivers go through [`AddressSpace`], so the same test sequence runs on the board
//! ([`XilAddressSpace`], [`VolatileAddressSpace`]) and on the host ([`SimulatedAddressSpace`]).
//! There is exactly one execution context, hence `&self` access and no locking.

use core::cell::RefCell;
use core::ptr::{read_volatile, write_volatile};
use heapless::{FnvIndexMap, Vec};

pub trait AddressSpace {
    /// read the 32-bit word at a 4-byte aligned physical address
    fn read32(&self, address: usize) -> u32;
    /// write the 32-bit word at a 4-byte aligned physical address
    fn write32(&self, address: usize, value: u32);
}

impl<A: AddressSpace + ?Sized> AddressSpace for &A {
    fn read32(&self, address: usize) -> u32 {
        (**self).read32(address)
    }
    fn write32(&self, address: usize, value: u32) {
        (**self).write32(address, value)
    }
}

/// direct volatile pointer access, for targets where physical addresses are identity mapped
pub struct VolatileAddressSpace {
    _private: (),
}

impl VolatileAddressSpace {
    /// # Safety
    ///
    /// Every address later passed to this address space must be a valid, aligned and identity mapped
    /// device register; the caller must also make sure the data cache does not hide device state.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl AddressSpace for VolatileAddressSpace {
    fn read32(&self, address: usize) -> u32 {
        unsafe { read_volatile(address as *const u32) }
    }
    fn write32(&self, address: usize, value: u32) {
        unsafe { write_volatile(address as *mut u32, value) }
    }
}

/// register access through the BSP `Xil_In32` / `Xil_Out32`
#[cfg(not(test))]
pub struct XilAddressSpace {
    _private: (),
}

#[cfg(not(test))]
impl XilAddressSpace {
    /// # Safety
    ///
    /// See [`VolatileAddressSpace::new`].
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

#[cfg(not(test))]
impl AddressSpace for XilAddressSpace {
    fn read32(&self, address: usize) -> u32 {
        unsafe { crate::binding::extern_c::xil_in32(address as cty::uint32_t) }
    }
    fn write32(&self, address: usize, value: u32) {
        unsafe { crate::binding::extern_c::xil_out32(address as cty::uint32_t, value) }
    }
}

/// sparse word store standing in for the board: unwritten words read as zero and every write is journaled.
/// `N` is the number of distinct words (must be a power of 2), `J` the journal capacity
pub struct SimulatedAddressSpace<const N: usize = 256, const J: usize = 128> {
    words: RefCell<FnvIndexMap<usize, u32, N>>,
    journal: RefCell<Vec<(usize, u32), J>>,
    /// number of writes that did not fit in the journal
    journal_dropped: RefCell<usize>,
}

impl<const N: usize, const J: usize> SimulatedAddressSpace<N, J> {
    pub fn new() -> Self {
        Self {
            words: RefCell::new(FnvIndexMap::new()),
            journal: RefCell::new(Vec::new()),
            journal_dropped: RefCell::new(0),
        }
    }

    fn store(&self, address: usize, value: u32) {
        debug_assert!(address % 4 == 0, "unaligned access at {address:#x}");
        if self.words.borrow_mut().insert(address, value).is_err() {
            panic!("simulated address space is full, cannot store {address:#x}");
        }
    }

    /// play the hardware side: fill consecutive words starting at `base` without journaling
    pub fn preload(&self, base: usize, words: &[u32]) {
        for (index, &word) in words.iter().enumerate() {
            self.store(base + 4 * index, word);
        }
    }

    /// the writes performed so far, in order
    pub fn journal(&self) -> Vec<(usize, u32), J> {
        self.journal.borrow().clone()
    }

    /// the values written to a single register, in order
    pub fn writes_to(&self, address: usize) -> Vec<u32, J> {
        self.journal
            .borrow()
            .iter()
            .filter(|(written, _)| *written == address)
            .map(|(_, value)| *value)
            .collect()
    }

    pub fn journal_dropped(&self) -> usize {
        *self.journal_dropped.borrow()
    }

    pub fn clear_journal(&self) {
        self.journal.borrow_mut().clear();
        *self.journal_dropped.borrow_mut() = 0;
    }
}

impl<const N: usize, const J: usize> Default for SimulatedAddressSpace<N, J> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize, const J: usize> AddressSpace for SimulatedAddressSpace<N, J> {
    fn read32(&self, address: usize) -> u32 {
        debug_assert!(address % 4 == 0, "unaligned access at {address:#x}");
        self.words.borrow().get(&address).copied().unwrap_or(0)
    }
    fn write32(&self, address: usize, value: u32) {
        self.store(address, value);
        if self.journal.borrow_mut().push((address, value)).is_err() {
            *self.journal_dropped.borrow_mut() += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_address_space_read_write() {
        // cargo test simulated_address_space_read_write -- --nocapture
        let space: SimulatedAddressSpace = SimulatedAddressSpace::new();
        assert_eq!(space.read32(0x4000_0000), 0);
        space.write32(0x4120_0000, 0x55);
        space.write32(0x4121_0000, 0xFFFF_FFFF);
        space.write32(0x4120_0000, 0xAA);
        assert_eq!(space.read32(0x4120_0000), 0xAA);
        assert_eq!(space.read32(0x4121_0000), 0xFFFF_FFFF);
        assert_eq!(space.writes_to(0x4120_0000).as_slice(), &[0x55, 0xAA]);
        assert_eq!(space.journal().len(), 3);
    }

    #[test]
    fn simulated_address_space_preload_not_journaled() {
        // cargo test simulated_address_space_preload_not_journaled -- --nocapture
        let space: SimulatedAddressSpace = SimulatedAddressSpace::new();
        space.preload(0x4000_0000, &[7, 8, 9]);
        assert_eq!(space.read32(0x4000_0008), 9);
        assert_eq!(space.read32(0x4000_000C), 0);
        assert!(space.journal().is_empty());
    }

    #[test]
    fn simulated_address_space_journal_overflow() {
        // cargo test simulated_address_space_journal_overflow -- --nocapture
        let space: SimulatedAddressSpace<16, 4> = SimulatedAddressSpace::new();
        for value in 0..10 {
            space.write32(0x100, value);
        }
        assert_eq!(space.journal().len(), 4);
        assert_eq!(space.journal_dropped(), 6);
        assert_eq!(space.read32(0x100), 9);
        space.clear_journal();
        assert_eq!(space.journal_dropped(), 0);
    }

    #[test]
    fn volatile_address_space_on_memory() {
        // cargo test volatile_address_space_on_memory -- --nocapture
        let mut buffer: [u32; 4] = [0x11, 0x22, 0x33, 0x44];
        let base = buffer.as_mut_ptr() as usize;
        let space = unsafe { VolatileAddressSpace::new() };
        assert_eq!(space.read32(base + 8), 0x33);
        space.write32(base + 4, 0xFFFF_FFFF);
        assert_eq!(space.read32(base + 4), 0xFFFF_FFFF);
    }

    #[test]
    fn address_space_through_reference() {
        // cargo test address_space_through_reference -- --nocapture
        let space: SimulatedAddressSpace = SimulatedAddressSpace::new();
        let borrowed = &space;
        borrowed.write32(0x20, 3);
        assert_eq!(space.read32(0x20), 3);
    }
}
