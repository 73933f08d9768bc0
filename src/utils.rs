/// Operand fields of a raw opcode, split the same way for every instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operands {
    pub x: usize,
    pub y: usize,
    pub n: u8,
    pub kk: u8,
    pub nnn: u16,
}

impl Operands {
    pub fn from_raw(raw: u16) -> Self {
        let (_, x, y, n) = nibble_split(raw);
        Operands {
            x: x as usize,
            y: y as usize,
            n,
            kk: (raw & 0x00FF) as u8,
            nnn: raw & 0x0FFF,
        }
    }
}

pub fn nibble_split(raw: u16) -> (u8, u8, u8, u8) {
    (
        ((raw & 0xF000) >> 12) as u8,
        ((raw & 0x0F00) >> 8) as u8,
        ((raw & 0x00F0) >> 4) as u8,
        (raw & 0x000F) as u8,
    )
}

/// Folds a coordinate back onto `0..size`, stepping by whole screen widths.
pub fn wrap(mut coord: isize, size: usize) -> usize {
    let size = size as isize;
    while coord >= size {
        coord -= size;
    }
    while coord < 0 {
        coord += size;
    }
    coord as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nibble_split() {
        assert_eq!(nibble_split(0xD12F), (0xD, 0x1, 0x2, 0xF));
    }

    #[test]
    fn test_operands() {
        let ops = Operands::from_raw(0x8AB4);
        assert_eq!(ops.x, 0xA);
        assert_eq!(ops.y, 0xB);
        assert_eq!(ops.n, 0x4);
        assert_eq!(ops.kk, 0xB4);
        assert_eq!(ops.nnn, 0xAB4);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(63, 64), 63);
        assert_eq!(wrap(64, 64), 0);
        assert_eq!(wrap(70, 64), 6);
        assert_eq!(wrap(200, 64), 8);
        assert_eq!(wrap(-1, 32), 31);
        assert_eq!(wrap(-33, 32), 31);
    }
}
