//! CRC16/CCITT-FALSE as required by the BR Code checksum field (tag `63`).
//!
//! Polynomial `0x1021`, initial value `0xFFFF`, no input or output
//! reflection, no final XOR.

const POLY: u16 = 0x1021;
const INIT: u16 = 0xFFFF;

/// Compute CRC16/CCITT-FALSE over `data`.
pub fn crc16_ccitt_false(data: &[u8]) -> u16 {
    data.iter().fold(INIT, |crc, &byte| {
        let mut crc = crc ^ (u16::from(byte) << 8);
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLY
            } else {
                crc << 1
            };
        }
        crc
    })
}

/// Checksum rendered as four uppercase hex digits.
pub fn crc16_hex(data: &[u8]) -> String {
    format!("{:04X}", crc16_ccitt_false(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_check_value() {
        assert_eq!(crc16_ccitt_false(b"123456789"), 0x29B1);
    }

    #[test]
    fn empty_input_is_init() {
        assert_eq!(crc16_ccitt_false(b""), 0xFFFF);
    }

    #[test]
    fn hex_is_padded_uppercase() {
        assert_eq!(crc16_hex(b"123456789"), "29B1");
        assert_eq!(crc16_hex(b"").len(), 4);
    }
}
