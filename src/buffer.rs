//! Triggered sample assembly.
//!
//! A sample packs the current value of every enabled channel into one
//! buffer, in scan order, each channel in a cell sized and encoded as its
//! [`ScanType`] says. No padding is inserted between cells.

use std::time::SystemTime;

use byteorder::{BigEndian, ByteOrder, LittleEndian, NativeEndian};

use crate::channel::{ChannelSpec, ChannelValue, Endianness, ScanMask, ScanType, Sign, Storage};

/// One assembled sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledBuffer {
    bytes: Vec<u8>,
}

impl AssembledBuffer {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The consumer of triggered samples.
pub trait SampleSink {
    type Error: std::fmt::Display;

    /// Channels to capture on the next trigger.
    fn active_scan_mask(&self) -> ScanMask;

    /// Take a completed sample. The buffer is dropped once this returns.
    fn push(&mut self, sample: &AssembledBuffer, timestamp: SystemTime) -> Result<(), Self::Error>;

    /// Called once per trigger, whether or not a sample was pushed.
    fn notify_done(&mut self);
}

/// Build a sample from the channels in `mask`.
///
/// `resolve` is called once per enabled channel, in scan order. The first
/// error aborts the whole sample.
pub fn assemble<F, E>(mask: ScanMask, mut resolve: F) -> Result<AssembledBuffer, E>
where
    F: FnMut(&ChannelSpec) -> Result<ChannelValue, E>,
{
    let mut bytes = vec![0u8; mask.scan_bytes()];
    let mut offset = 0;
    for spec in mask.iter() {
        let value = resolve(spec)?;
        let width = spec.scan_type.storage.bytes();
        store(&mut bytes[offset..offset + width], &spec.scan_type, value.value());
        offset += width;
    }
    Ok(AssembledBuffer { bytes })
}

/// Write `value` into `cell`, truncating to the cell width.
fn store(cell: &mut [u8], scan_type: &ScanType, value: i64) {
    match scan_type.endianness {
        Endianness::Native => store_as::<NativeEndian>(cell, scan_type, value),
        Endianness::Little => store_as::<LittleEndian>(cell, scan_type, value),
        Endianness::Big => store_as::<BigEndian>(cell, scan_type, value),
    }
}

fn store_as<O: ByteOrder>(cell: &mut [u8], scan_type: &ScanType, value: i64) {
    match (scan_type.storage, scan_type.sign) {
        (Storage::Bits16, Sign::Signed) => O::write_i16(cell, value as i16),
        (Storage::Bits16, Sign::Unsigned) => O::write_u16(cell, value as u16),
        (Storage::Bits32, Sign::Signed) => O::write_i32(cell, value as i32),
        (Storage::Bits32, Sign::Unsigned) => O::write_u32(cell, value as u32),
    }
}
