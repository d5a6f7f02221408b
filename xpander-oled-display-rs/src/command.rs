//! SH1106 command bytes and command-sequence builders.
//!
//! The SH1106 is driven with single-byte commands, some followed by one
//! argument byte. Display RAM is organised as pages of eight pixel rows;
//! each page is addressed with a page command plus a split column address
//! before its data bytes are streamed.

// ---------------------------------------------------------------------------
// Fundamental commands
// ---------------------------------------------------------------------------

/// Set contrast. Followed by one argument byte.
pub const SET_CONTRAST: u8 = 0x81;

/// Resume display from RAM content (entire-display-on disabled).
pub const SET_ENTIRE_ON: u8 = 0xA4;

/// Normal (non-inverted) display.
pub const SET_NORM: u8 = 0xA6;

/// Inverted display.
pub const SET_NORM_INV: u8 = 0xA7;

/// Display off (sleep).
pub const SET_DISP_OFF: u8 = 0xAE;

/// Display on.
pub const SET_DISP_ON: u8 = 0xAF;

// ---------------------------------------------------------------------------
// Addressing
// ---------------------------------------------------------------------------

/// Memory addressing mode. Followed by one argument byte.
pub const SET_MEM_ADDR: u8 = 0x20;

/// Page address base; OR'd with the page index (0–7).
pub const SET_PAGE_ADDRESS: u8 = 0xB0;

/// Lower column nibble base; OR'd with `column & 0x0F`.
pub const SET_LOW_COLUMN: u8 = 0x00;

/// Higher column nibble base; OR'd with `column >> 4`.
pub const SET_HIGH_COLUMN: u8 = 0x10;

// ---------------------------------------------------------------------------
// Hardware configuration
// ---------------------------------------------------------------------------

pub const SET_DISP_START_LINE: u8 = 0x40;
pub const SET_SEG_REMAP: u8 = 0xA1;
pub const SET_MUX_RATIO: u8 = 0xA8;
pub const SET_COMSCANDEC: u8 = 0xC8;
pub const SET_DISP_OFFSET: u8 = 0xD3;
pub const SET_COM_PIN_CFG: u8 = 0xDA;

// ---------------------------------------------------------------------------
// Timing and driving scheme
// ---------------------------------------------------------------------------

pub const SET_DISP_CLK_DIV: u8 = 0xD5;
pub const SET_PRECHARGE: u8 = 0xD9;
pub const SET_VCOM_DESEL: u8 = 0xDB;
pub const SET_CHARGE_PUMP: u8 = 0x8D;

// ---------------------------------------------------------------------------
// Protocol constants
// ---------------------------------------------------------------------------

/// I2C control byte preceding a command byte (Co = 0, D/C = 0).
pub const CONTROL_COMMAND: u8 = 0x00;

/// I2C control byte preceding display data (Co = 0, D/C = 1).
pub const CONTROL_DATA: u8 = 0x40;

/// Default 7-bit I2C address of SH1106 modules.
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Column offset for SPI modules. The SH1106 has 132 columns of RAM and
/// most 128-pixel SPI panels are wired to the middle 128.
pub const SPI_COLUMN_OFFSET: u8 = 2;

/// Number of bytes produced by [`init_sequence`].
pub const INIT_SEQUENCE_LEN: usize = 28;

/// Build the controller configuration sequence for a panel `height` pixels
/// tall (8–64, validated by the caller).
///
/// `external_vcc` selects the charge pump, contrast and pre-charge values
/// for panels with an external high-voltage supply.
pub fn init_sequence(height: u8, external_vcc: bool) -> [u8; INIT_SEQUENCE_LEN] {
    [
        SET_DISP_OFF,
        SET_DISP_CLK_DIV,
        0xF0,
        SET_MUX_RATIO,
        height - 1,
        SET_DISP_OFFSET,
        0x00,
        SET_DISP_START_LINE,
        SET_CHARGE_PUMP,
        if external_vcc { 0x10 } else { 0x14 },
        SET_MEM_ADDR,
        0x00,
        SET_PAGE_ADDRESS,
        SET_COMSCANDEC,
        SET_LOW_COLUMN,
        SET_HIGH_COLUMN,
        SET_COM_PIN_CFG,
        if height == 32 { 0x02 } else { 0x12 },
        SET_CONTRAST,
        if external_vcc { 0x9F } else { 0xCF },
        SET_SEG_REMAP,
        SET_PRECHARGE,
        if external_vcc { 0x22 } else { 0xF1 },
        SET_VCOM_DESEL,
        0x20,
        SET_ENTIRE_ON,
        SET_NORM,
        SET_DISP_ON,
    ]
}

/// Page, low-column and high-column commands that position the RAM write
/// pointer at the start of `page`.
pub const fn page_address(page: u8, column_offset: u8) -> [u8; 3] {
    [
        SET_PAGE_ADDRESS + page,
        SET_LOW_COLUMN | (column_offset & 0x0F),
        SET_HIGH_COLUMN | (column_offset >> 4),
    ]
}

// ── Tests ────────────────────────────────────────────────────────────────
