use crate::error::Chip8Error;
use std::io;
use std::io::Read;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Represents memory map, ROM, RAM etc.
pub trait MemoryMap {
    /// write unknown len of data into memory at a particular address
    fn write_any(&mut self, reader: &mut impl io::Read, addr: u16) -> Result<(), io::Error> {
        let mut buf = Vec::new();
        let len = reader.read_to_end(&mut buf)?;
        self.write(buf.as_slice(), addr, len)
    }

    /// write a chunk of bytes into "RAM"
    fn write(&mut self, data: &[u8], addr: u16, len: usize) -> Result<(), io::Error> {
        let bytes = self.get_rw_slice(addr, len);
        let mut d: &[u8] = data;
        d.read_exact(bytes)?;
        Ok(())
    }

    /// get a two-byte word, big-endian
    fn get_word(&self, addr: u16) -> u16 {
        let word = self.get_ro_slice(addr, 2);
        ((word[0] as u16) << 8) | (word[1] as u16)
    }

    /// get a r/w slice of the underlying memory
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> &mut [u8];

    /// get a r/o slice of the underlying memory
    fn get_ro_slice(&self, addr: u16, len: usize) -> &[u8];
}

/// how much RAM we have
const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// where the hex-digit glyphs live; glyph for digit d is at 0x100 + 5*d
const CHIP8_FONT_ADDR: u16 = 0x0100;
const CHIP8_GLYPH_BYTES: u16 = 5;

/// where the program is loaded
const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// the largest image that fits between the program entry and the top of RAM
pub const CHIP8_MAX_PROGRAM_BYTES: usize = CHIP8_RAM_SIZE_BYTES - CHIP8_PROGRAM_ADDR as usize;

/// The CHIP-8 memory map:
///   0x0000-0x00ff  interpreter reserved
///   0x0100-0x014f  hex-digit font
///   0x0150-0x01ff  interpreter reserved
///   0x0200-0x0fff  program
///
/// The call stack and the framebuffer are not memory-mapped; they live in
/// the interpreter itself.
pub struct Chip8MemoryMap {
    bytes: Box<[u8]>,
    pub program_addr: u16,
}

impl MemoryMap for Chip8MemoryMap {
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> &mut [u8] {
        let a = addr as usize;
        assert!(
            a + len <= self.bytes.len(),
            "memory access out of range: {:#05x}+{}",
            addr,
            len
        );
        &mut self.bytes[a..(a + len)]
    }
    fn get_ro_slice(&self, addr: u16, len: usize) -> &[u8] {
        let a = addr as usize;
        assert!(
            a + len <= self.bytes.len(),
            "memory access out of range: {:#05x}+{}",
            addr,
            len
        );
        &self.bytes[a..(a + len)]
    }
}

impl Chip8MemoryMap {
    /// initialises RAM with the font baked in at 0x100
    pub fn new() -> Result<Self, io::Error> {
        let mut mm = Chip8MemoryMap {
            bytes: Box::new([0u8; CHIP8_RAM_SIZE_BYTES]),
            program_addr: CHIP8_PROGRAM_ADDR,
        };
        mm.write(&CHIP8_FONT, CHIP8_FONT_ADDR, CHIP8_FONT.len())?;
        Ok(mm)
    }

    /// load a CHIP-8 program at 0x200, rejecting images that would spill
    /// past the top of RAM
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<(), Chip8Error> {
        let mut image = Vec::new();
        reader.read_to_end(&mut image)?;
        if image.len() > CHIP8_MAX_PROGRAM_BYTES {
            return Err(Chip8Error::ProgramTooLarge {
                len: image.len(),
                max: CHIP8_MAX_PROGRAM_BYTES,
            });
        }
        self.write(&image, self.program_addr, image.len())?;
        Ok(())
    }

    /// address of the 5-byte glyph for a hex digit
    pub fn glyph_addr(&self, digit: u8) -> u16 {
        CHIP8_FONT_ADDR + u16::from(digit) * CHIP8_GLYPH_BYTES
    }
}

const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_area_zeroed() -> Result<(), io::Error> {
        let m = Chip8MemoryMap::new()?;
        // NB. only from 0x200; the font is baked in below that
        assert_eq!(m.bytes[0x200..], [0; 0xe00]);
        Ok(())
    }

    #[test]
    fn test_font_baked_in() -> Result<(), io::Error> {
        let m = Chip8MemoryMap::new()?;
        assert_eq!(
            m.get_ro_slice(0x100, 5),
            &[0xF0, 0x90, 0x90, 0x90, 0xF0] // glyph for 0
        );
        assert_eq!(
            m.get_ro_slice(0x100 + 5 * 0xf, 5),
            &[0xF0, 0x80, 0xF0, 0x80, 0x80] // glyph for F
        );
        Ok(())
    }

    #[test]
    fn test_glyph_addr() {
        let m = Chip8MemoryMap::new().unwrap();
        assert_eq!(m.glyph_addr(0x0), 0x100);
        assert_eq!(m.glyph_addr(0xa), 0x132);
    }

    #[test]
    fn test_write_any_data_ok() -> Result<(), io::Error> {
        let mut dst = Chip8MemoryMap::new()?;
        let mut src: &[u8] = &[0, 1, 2, 3, 4, 5, 6, 7];
        dst.write_any(&mut src, 8)?;
        assert_eq!(
            dst.bytes[..16],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7]
        );
        Ok(())
    }

    #[test]
    fn test_write_slice_ok() {
        let mut dst = Chip8MemoryMap::new().unwrap();
        let src: &[u8] = &[0, 1, 2, 3, 4, 5, 6, 7];
        dst.write(src, 8, 8).unwrap();
        assert_eq!(
            dst.bytes[..16],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7]
        );
    }

    #[test]
    fn test_read_word() {
        let mut m = Chip8MemoryMap::new().unwrap();
        let src: &[u8] = &[0, 1, 2, 3, 4, 5, 6, 7];
        m.write(src, 0, 8).unwrap();
        assert_eq!(m.get_word(0x4), 0x0405);
    }

    #[test]
    #[should_panic]
    fn test_write_past_top_of_ram_panics() {
        let mut dst = Chip8MemoryMap::new().unwrap();
        let mut src: &[u8] = &[0; 8];
        let _ = dst.write_any(&mut src, 4089);
    }

    #[test]
    fn test_program_load_ok() -> Result<(), Chip8Error> {
        let mut dst = Chip8MemoryMap::new()?;
        let mut prog: &[u8] = &[0x00, 0xe0]; // clear screen
        dst.load_program(&mut prog)?;
        assert_eq!(dst.get_ro_slice(0x200, 2), &[0x00, 0xe0]);
        Ok(())
    }

    #[test]
    fn test_program_load_max_size_ok() {
        let mut dst = Chip8MemoryMap::new().unwrap();
        let image = vec![0xaa; CHIP8_MAX_PROGRAM_BYTES];
        dst.load_program(&mut image.as_slice()).unwrap();
        assert_eq!(dst.bytes[CHIP8_RAM_SIZE_BYTES - 1], 0xaa);
    }

    #[test]
    fn test_program_load_oversized_rejected() {
        let mut dst = Chip8MemoryMap::new().unwrap();
        let image = vec![0; CHIP8_MAX_PROGRAM_BYTES + 1];
        let err = dst.load_program(&mut image.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            Chip8Error::ProgramTooLarge {
                len: 3585,
                max: 3584
            }
        ));
    }
}
