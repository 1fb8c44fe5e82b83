// crates/beamsim-core/src/adc/registers.rs

//! Register layout.
//!
//! Control (write-only): bit 0 TRG starts a conversion, bit 2 IE enables the
//! end-of-conversion interrupt.
//! Data (read-only): bits 0-11 last sample, bit 15 EOC.

pub const CR_TRG: u16 = 1 << 0;
pub const CR_IE: u16 = 1 << 2;

pub const DR_VALUE_MASK: u16 = 0x0FFF;
pub const DR_EOC: u16 = 1 << 15;

/// Resolution of the converter in bits.
pub const ADC_BITS: u32 = 12;
/// Number of codes (4096).
pub const ADC_CODES: u32 = 1 << ADC_BITS;
pub const ADC_MAX: u16 = (ADC_CODES - 1) as u16;

/// Decoded control register write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Control {
    pub trigger: bool,
    pub interrupt_enable: bool,
}

impl Control {
    /// Unknown bits are ignored.
    #[inline]
    pub fn decode(raw: u16) -> Control {
        Control {
            trigger: raw & CR_TRG != 0,
            interrupt_enable: raw & CR_IE != 0,
        }
    }

    #[inline]
    pub fn encode(self) -> u16 {
        let mut raw = 0;
        if self.trigger {
            raw |= CR_TRG;
        }
        if self.interrupt_enable {
            raw |= CR_IE;
        }
        raw
    }
}

#[inline]
pub fn data_register(value: u16, eoc: bool) -> u16 {
    (value & DR_VALUE_MASK) | if eoc { DR_EOC } else { 0 }
}

/// Split a data register read into (sample, eoc).
#[inline]
pub fn split_data_register(raw: u16) -> (u16, bool) {
    (raw & DR_VALUE_MASK, raw & DR_EOC != 0)
}
