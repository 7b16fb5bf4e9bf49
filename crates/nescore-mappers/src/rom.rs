//! NES ROM file format parsing (iNES and NES 2.0).

use crate::Mirroring;

/// Errors that can occur when parsing NES ROM files.
#[derive(Debug, thiserror::Error)]
pub enum RomError {
    /// ROM file is too small to contain a valid header.
    #[error("ROM file too small: expected at least 16 bytes, got {0}")]
    FileTooSmall(usize),

    /// Invalid iNES magic number in header.
    #[error("Invalid iNES magic number: expected [4E 45 53 1A], got {0:02X?}")]
    InvalidMagic([u8; 4]),

    /// Invalid PRG-ROM size.
    #[error("Invalid PRG-ROM size: {0}")]
    InvalidPrgSize(String),

    /// ROM file size doesn't match header specifications.
    #[error("ROM file size mismatch: expected {expected} bytes, got {actual} bytes")]
    SizeMismatch {
        /// Expected file size in bytes.
        expected: usize,
        /// Actual file size in bytes.
        actual: usize,
    },

    /// No mapper implementation registered for this iNES mapper number.
    #[error("Unsupported mapper number: {0}")]
    UnsupportedMapper(u16),
}

/// iNES/NES 2.0 ROM header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomHeader {
    /// PRG-ROM size in bytes.
    pub prg_rom_size: usize,
    /// CHR-ROM size in bytes (0 indicates CHR-RAM).
    pub chr_rom_size: usize,
    /// Mapper number (0-4095 for NES 2.0, 0-255 for iNES 1.0).
    pub mapper_number: u16,
    /// Submapper number (0-15, NES 2.0 only).
    pub submapper: u8,
    /// Nametable mirroring mode.
    pub mirroring: Mirroring,
    /// Battery-backed PRG-RAM present.
    pub has_battery: bool,
    /// 512-byte trainer present before PRG-ROM.
    pub has_trainer: bool,
    /// True if this is NES 2.0 format.
    pub nes2_format: bool,
    /// PRG-RAM size in bytes.
    pub prg_ram_size: usize,
    /// PRG-NVRAM size in bytes (NES 2.0 only).
    pub prg_nvram_size: usize,
    /// CHR-RAM size in bytes (when `chr_rom_size` is 0).
    pub chr_ram_size: usize,
    /// CHR-NVRAM size in bytes (NES 2.0 only).
    pub chr_nvram_size: usize,
}

impl RomHeader {
    /// iNES magic number: "NES" followed by MS-DOS EOF.
    const MAGIC: [u8; 4] = [0x4E, 0x45, 0x53, 0x1A];

    /// Parse a ROM header from its first 16 bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is too short, the magic number doesn't
    /// match, or the header declares an invalid size.
    #[allow(clippy::similar_names)]
    pub fn parse(data: &[u8]) -> Result<Self, RomError> {
        if data.len() < 16 {
            return Err(RomError::FileTooSmall(data.len()));
        }

        let magic = [data[0], data[1], data[2], data[3]];
        if magic != Self::MAGIC {
            return Err(RomError::InvalidMagic(magic));
        }

        let nes2_format = (data[7] & 0x0C) == 0x08;

        let (mapper_number, submapper) =
            if nes2_format { Self::parse_nes2_mapper(data) } else { (Self::parse_ines_mapper(data), 0) };

        let (prg_rom_size, chr_rom_size) =
            if nes2_format { Self::parse_nes2_sizes(data)? } else { Self::parse_ines_sizes(data)? };

        let mirroring = Self::parse_mirroring(data);
        let has_battery = (data[6] & 0x02) != 0;
        let has_trainer = (data[6] & 0x04) != 0;

        let (prg_ram_size, prg_nvram_size, chr_ram_size, chr_nvram_size) = if nes2_format {
            Self::parse_nes2_ram_sizes(data)
        } else {
            let prg_ram = if data[8] == 0 { 8192 } else { data[8] as usize * 8192 };
            (prg_ram, 0, if chr_rom_size == 0 { 8192 } else { 0 }, 0)
        };

        Ok(Self {
            prg_rom_size,
            chr_rom_size,
            mapper_number,
            submapper,
            mirroring,
            has_battery,
            has_trainer,
            nes2_format,
            prg_ram_size,
            prg_nvram_size,
            chr_ram_size,
            chr_nvram_size,
        })
    }

    fn parse_ines_mapper(data: &[u8]) -> u16 {
        let low = (data[6] & 0xF0) >> 4;
        let high = data[7] & 0xF0;
        u16::from(high | low)
    }

    fn parse_nes2_mapper(data: &[u8]) -> (u16, u8) {
        let low = (data[6] & 0xF0) >> 4;
        let mid = data[7] & 0xF0;
        let high = data[8] & 0x0F;
        let mapper = u16::from(high) << 8 | u16::from(mid | low);
        let submapper = (data[8] & 0xF0) >> 4;
        (mapper, submapper)
    }

    fn parse_ines_sizes(data: &[u8]) -> Result<(usize, usize), RomError> {
        let prg_size = data[4] as usize * 16384;
        let chr_size = data[5] as usize * 8192;

        if prg_size == 0 {
            return Err(RomError::InvalidPrgSize("PRG-ROM size cannot be 0".to_string()));
        }

        Ok((prg_size, chr_size))
    }

    #[allow(clippy::similar_names)]
    fn parse_nes2_sizes(data: &[u8]) -> Result<(usize, usize), RomError> {
        let prg_lsb = data[4] as usize;
        let chr_lsb = data[5] as usize;
        let prg_msb = (data[9] & 0x0F) as usize;
        let chr_msb = ((data[9] & 0xF0) >> 4) as usize;

        let prg_size = if prg_msb == 0x0F {
            let exponent = (prg_lsb & 0xFC) >> 2;
            let multiplier = (prg_lsb & 0x03) * 2 + 1;
            multiplier * (1 << exponent)
        } else {
            (prg_msb << 8 | prg_lsb) * 16384
        };

        let chr_size = if chr_msb == 0x0F {
            let exponent = (chr_lsb & 0xFC) >> 2;
            let multiplier = (chr_lsb & 0x03) * 2 + 1;
            multiplier * (1 << exponent)
        } else {
            (chr_msb << 8 | chr_lsb) * 8192
        };

        if prg_size == 0 {
            return Err(RomError::InvalidPrgSize("PRG-ROM size cannot be 0".to_string()));
        }

        Ok((prg_size, chr_size))
    }

    fn parse_mirroring(data: &[u8]) -> Mirroring {
        if (data[6] & 0x08) != 0 {
            Mirroring::FourScreen
        } else if (data[6] & 0x01) != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        }
    }

    fn parse_nes2_ram_sizes(data: &[u8]) -> (usize, usize, usize, usize) {
        let prg_ram = Self::parse_ram_size(data[10] & 0x0F);
        let prg_nvram = Self::parse_ram_size((data[10] & 0xF0) >> 4);
        let chr_ram = Self::parse_ram_size(data[11] & 0x0F);
        let chr_nvram = Self::parse_ram_size((data[11] & 0xF0) >> 4);
        (prg_ram, prg_nvram, chr_ram, chr_nvram)
    }

    fn parse_ram_size(field: u8) -> usize {
        if field == 0 { 0 } else { 64 << field }
    }
}

/// A parsed NES ROM file.
#[derive(Debug, Clone)]
pub struct Rom {
    /// ROM header information.
    pub header: RomHeader,
    /// 512-byte trainer data, if present.
    pub trainer: Option<Vec<u8>>,
    /// PRG-ROM data (program code).
    pub prg_rom: Vec<u8>,
    /// CHR-ROM data (graphics), or empty if CHR-RAM.
    pub chr_rom: Vec<u8>,
}

impl Rom {
    /// Parse a complete ROM file's bytes into header, trainer, and banks.
    ///
    /// # Errors
    ///
    /// Returns an error if the header is invalid or the file is truncated
    /// relative to what the header declares.
    pub fn load(data: &[u8]) -> Result<Self, RomError> {
        let header = RomHeader::parse(data)?;

        let mut offset = 16;

        let trainer = if header.has_trainer {
            if data.len() < offset + 512 {
                return Err(RomError::FileTooSmall(data.len()));
            }
            let trainer_data = data[offset..offset + 512].to_vec();
            offset += 512;
            Some(trainer_data)
        } else {
            None
        };

        if data.len() < offset + header.prg_rom_size {
            return Err(RomError::SizeMismatch { expected: offset + header.prg_rom_size, actual: data.len() });
        }
        let prg_rom = data[offset..offset + header.prg_rom_size].to_vec();
        offset += header.prg_rom_size;

        let chr_rom = if header.chr_rom_size > 0 {
            if data.len() < offset + header.chr_rom_size {
                return Err(RomError::SizeMismatch {
                    expected: offset + header.chr_rom_size,
                    actual: data.len(),
                });
            }
            data[offset..offset + header.chr_rom_size].to_vec()
        } else {
            Vec::new()
        };

        Ok(Self { header, trainer, prg_rom, chr_rom })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_header(prg_size: u8, chr_size: u8, mapper: u8, mirroring: u8, battery: bool) -> Vec<u8> {
        let mut header = vec![0x4E, 0x45, 0x53, 0x1A];
        header.push(prg_size);
        header.push(chr_size);
        header.push(((mapper & 0x0F) << 4) | mirroring | if battery { 0x02 } else { 0x00 });
        header.push(mapper & 0xF0);
        header.extend_from_slice(&[0; 8]);
        header
    }

    #[test]
    fn valid_ines_header_parses() {
        let header = create_test_header(2, 1, 0, 0, false);
        let parsed = RomHeader::parse(&header).unwrap();
        assert_eq!(parsed.prg_rom_size, 32768);
        assert_eq!(parsed.chr_rom_size, 8192);
        assert_eq!(parsed.mapper_number, 0);
        assert_eq!(parsed.mirroring, Mirroring::Horizontal);
        assert!(!parsed.has_battery);
        assert!(!parsed.nes2_format);
    }

    #[test]
    fn invalid_magic_is_rejected() {
        let mut header = create_test_header(1, 1, 0, 0, false);
        header[0] = 0x00;
        assert!(matches!(RomHeader::parse(&header), Err(RomError::InvalidMagic(_))));
    }

    #[test]
    fn mapper_number_spans_both_header_bytes() {
        let header = create_test_header(1, 1, 0x42, 0, false);
        assert_eq!(RomHeader::parse(&header).unwrap().mapper_number, 0x42);
    }

    #[test]
    fn mirroring_modes_decode_from_flags() {
        let header = create_test_header(1, 1, 0, 0x08, false);
        assert_eq!(RomHeader::parse(&header).unwrap().mirroring, Mirroring::FourScreen);
    }

    #[test]
    fn rom_load_splits_prg_and_chr_banks() {
        let mut rom_data = create_test_header(1, 1, 0, 0, false);
        rom_data.extend_from_slice(&[0x42; 16384]);
        rom_data.extend_from_slice(&[0x55; 8192]);

        let rom = Rom::load(&rom_data).unwrap();
        assert_eq!(rom.prg_rom.len(), 16384);
        assert_eq!(rom.chr_rom.len(), 8192);
        assert_eq!(rom.prg_rom[0], 0x42);
        assert_eq!(rom.chr_rom[0], 0x55);
    }

    #[test]
    fn rom_with_trainer_is_parsed() {
        let mut header = create_test_header(1, 0, 0, 0, false);
        header[6] |= 0x04;

        let mut rom_data = header;
        rom_data.extend_from_slice(&[0xFF; 512]);
        rom_data.extend_from_slice(&[0x42; 16384]);

        let rom = Rom::load(&rom_data).unwrap();
        assert!(rom.header.has_trainer);
        assert_eq!(rom.trainer.unwrap().len(), 512);
    }

    #[test]
    fn truncated_rom_is_a_size_mismatch() {
        let mut rom_data = create_test_header(2, 1, 0, 0, false);
        rom_data.extend_from_slice(&[0x42; 1024]);
        assert!(matches!(Rom::load(&rom_data), Err(RomError::SizeMismatch { .. })));
    }
}
