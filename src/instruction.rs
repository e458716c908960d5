/// Decoded form of one 16-bit opcode. Field names follow the usual CHIP-8
/// conventions: `nnn` is a 12-bit address, `nn` an 8-bit constant, `x`/`y`
/// register indices, `n` a 4-bit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearDisplay,
    /// 00EE
    Return,
    /// 1nnn
    Jump(u16),
    /// 2nnn
    Call(u16),
    /// 3xnn
    SkipEqImm { x: u8, nn: u8 },
    /// 4xnn
    SkipNeImm { x: u8, nn: u8 },
    /// 5xy0
    SkipEqReg { x: u8, y: u8 },
    /// 6xnn
    LoadImm { x: u8, nn: u8 },
    /// 7xnn, no carry flag
    AddImm { x: u8, nn: u8 },
    /// 8xy0
    Move { x: u8, y: u8 },
    /// 8xy1
    Or { x: u8, y: u8 },
    /// 8xy2
    And { x: u8, y: u8 },
    /// 8xy3
    Xor { x: u8, y: u8 },
    /// 8xy4, VF = carry
    Add { x: u8, y: u8 },
    /// 8xy5, VF = no borrow
    Sub { x: u8, y: u8 },
    /// 8xy6, VF = bit shifted out
    ShiftRight { x: u8 },
    /// 8xy7, Vx = Vy - Vx, VF = no borrow
    SubFrom { x: u8, y: u8 },
    /// 8xyE, VF = bit shifted out
    ShiftLeft { x: u8 },
    /// 9xy0
    SkipNeReg { x: u8, y: u8 },
    /// Annn
    LoadIndex(u16),
    /// Bnnn
    JumpV0(u16),
    /// Cxnn
    Random { x: u8, nn: u8 },
    /// Dxyn
    Draw { x: u8, y: u8, n: u8 },
    /// Ex9E
    SkipKeyPressed { x: u8 },
    /// ExA1
    SkipKeyReleased { x: u8 },
    /// Fx07
    LoadDelay { x: u8 },
    /// Fx0A, busy-poll until a key is down
    WaitKey { x: u8 },
    /// Fx15
    SetDelay { x: u8 },
    /// Fx18
    SetSound { x: u8 },
    /// Fx1E, VF unaffected
    AddIndex { x: u8 },
    /// Fx29
    LoadGlyph { x: u8 },
    /// Fx33
    StoreBcd { x: u8 },
    /// Fx55, V0..=Vx, I unchanged
    StoreRegisters { x: u8 },
    /// Fx65, V0..=Vx, I unchanged
    LoadRegisters { x: u8 },
}

impl Instruction {
    /// Split an opcode into its nibble fields and pick the instruction, or
    /// None if no instruction matches. The caller decides what a mismatch
    /// means; here it is always fatal.
    pub fn decode(op: u16) -> Option<Instruction> {
        use Instruction::*;

        let nnn = op & 0x0fff;
        let nn = (op & 0x00ff) as u8;
        let x = ((op >> 8) & 0xf) as u8;
        let y = ((op >> 4) & 0xf) as u8;
        let n = (op & 0x000f) as u8;

        match op >> 12 {
            0x0 => match op {
                0x00e0 => Some(ClearDisplay),
                0x00ee => Some(Return),
                // 0nnn machine-code routines don't exist here
                _ => None,
            },
            0x1 => Some(Jump(nnn)),
            0x2 => Some(Call(nnn)),
            0x3 => Some(SkipEqImm { x, nn }),
            0x4 => Some(SkipNeImm { x, nn }),
            0x5 if n == 0 => Some(SkipEqReg { x, y }),
            0x6 => Some(LoadImm { x, nn }),
            0x7 => Some(AddImm { x, nn }),
            0x8 => match n {
                0x0 => Some(Move { x, y }),
                0x1 => Some(Or { x, y }),
                0x2 => Some(And { x, y }),
                0x3 => Some(Xor { x, y }),
                0x4 => Some(Add { x, y }),
                0x5 => Some(Sub { x, y }),
                0x6 => Some(ShiftRight { x }),
                0x7 => Some(SubFrom { x, y }),
                0xe => Some(ShiftLeft { x }),
                _ => None,
            },
            0x9 if n == 0 => Some(SkipNeReg { x, y }),
            0xa => Some(LoadIndex(nnn)),
            0xb => Some(JumpV0(nnn)),
            0xc => Some(Random { x, nn }),
            0xd => Some(Draw { x, y, n }),
            0xe => match nn {
                0x9e => Some(SkipKeyPressed { x }),
                0xa1 => Some(SkipKeyReleased { x }),
                _ => None,
            },
            0xf => match nn {
                0x07 => Some(LoadDelay { x }),
                0x0a => Some(WaitKey { x }),
                0x15 => Some(SetDelay { x }),
                0x18 => Some(SetSound { x }),
                0x1e => Some(AddIndex { x }),
                0x29 => Some(LoadGlyph { x }),
                0x33 => Some(StoreBcd { x }),
                0x55 => Some(StoreRegisters { x }),
                0x65 => Some(LoadRegisters { x }),
                _ => None,
            },
            _ => None,
        }
    }
}
