use crate::consts;
use crate::utils;

#[derive(Debug, Clone)]
pub struct Ram {
    pub buffer: [u8; consts::RAM_BYTES],
}

impl Default for Ram {
    fn default() -> Self {
        let mut ram = Ram {
            buffer: [0; consts::RAM_BYTES],
        };
        ram.buffer[0..consts::FONT_SET_SIZE].copy_from_slice(&consts::FONT_SET);
        ram
    }
}

impl Ram {
    fn index(addr: u16) -> usize {
        (addr & consts::ADDR_MASK) as usize
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.buffer[Self::index(addr)]
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        self.buffer[Self::index(addr)] = value;
    }

    /// Big-endian word at `addr`; the second byte wraps to 0x000 at the top of memory.
    pub fn read_word(&self, addr: u16) -> u16 {
        ((self.read(addr) as u16) << 8) | self.read(addr.wrapping_add(1)) as u16
    }

    pub fn read_bytes(&self, addr: u16, len: usize) -> Vec<u8> {
        (0..len)
            .map(|i| self.read(addr.wrapping_add(i as u16)))
            .collect()
    }

    pub fn load_program(&mut self, program: &[u8]) {
        let end = consts::PROG_OFFSET + program.len().min(consts::MAX_ROM_BYTES);
        self.buffer[consts::PROG_OFFSET..end]
            .copy_from_slice(&program[..end - consts::PROG_OFFSET]);
    }
}

/// Monochrome 64x32 plane. Pixels only ever change by XOR or a full clear.
#[derive(Debug, Clone)]
pub struct DisplayBuffer {
    pub buffer: [[bool; consts::DISPL_WIDTH]; consts::DISPL_HEIGHT],
    dirty: bool,
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        DisplayBuffer {
            buffer: [[false; consts::DISPL_WIDTH]; consts::DISPL_HEIGHT],
            dirty: false,
        }
    }
}

impl DisplayBuffer {
    pub fn clear(&mut self) {
        self.buffer
            .iter_mut()
            .for_each(|row| *row = [false; consts::DISPL_WIDTH]);
        self.dirty = true;
    }

    /// XORs an 8-pixel-wide sprite onto the plane, wrapping on both axes.
    /// Returns true when any lit pixel was switched off.
    pub fn draw(&mut self, sprite: &[u8], x: u8, y: u8) -> bool {
        let mut collided = false;
        for (row, &bits) in sprite.iter().enumerate() {
            let py = utils::wrap(y as isize + row as isize, consts::DISPL_HEIGHT);
            for shift_pos in 0..consts::SPRITE_WIDTH {
                if bits & (0x80 >> shift_pos) == 0 {
                    continue;
                }
                let px = utils::wrap(x as isize + shift_pos as isize, consts::DISPL_WIDTH);
                let pixel = &mut self.buffer[py][px];
                *pixel ^= true;
                collided |= !*pixel;
            }
        }
        self.dirty = true;
        collided
    }

    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.buffer[utils::wrap(y as isize, consts::DISPL_HEIGHT)]
            [utils::wrap(x as isize, consts::DISPL_WIDTH)]
    }

    pub fn pixels(&self) -> &[[bool; consts::DISPL_WIDTH]; consts::DISPL_HEIGHT] {
        &self.buffer
    }

    /// Coordinates of every lit pixel, row by row.
    pub fn iter_lit(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.buffer.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &on)| on)
                .map(move |(x, _)| (x, y))
        })
    }

    /// Returns whether the plane changed since the last call, and resets the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[derive(Default, Debug, Clone)]
pub struct KeyboardBuffer {
    pub buffer: [bool; consts::KEYBOARD_SIZE],
}

impl KeyboardBuffer {
    pub fn is_pressed(&self, key: u8) -> bool {
        self.buffer[(key & 0x0F) as usize]
    }

    pub fn set(&mut self, key: u8, pressed: bool) {
        self.buffer[(key & 0x0F) as usize] = pressed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(display: &DisplayBuffer) -> Vec<(usize, usize)> {
        display.iter_lit().collect()
    }

    #[test]
    fn test_font_preloaded() {
        let ram = Ram::default();
        assert_eq!(ram.buffer[0..5], [0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(ram.buffer[75..80], [0xF0, 0x80, 0xF0, 0x80, 0x80]);
        assert!(ram.buffer[consts::FONT_SET_SIZE..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_read_word_big_endian() {
        let mut ram = Ram::default();
        ram.write(0x300, 0x12);
        ram.write(0x301, 0x34);
        assert_eq!(ram.read_word(0x300), 0x1234);
    }

    #[test]
    fn test_addresses_wrap() {
        let mut ram = Ram::default();
        ram.write(0x1005, 0xAA);
        assert_eq!(ram.read(0x005), 0xAA);
        ram.write(0xFFF, 0xBE);
        assert_eq!(ram.read_word(0xFFF), 0xBEF0);
    }

    #[test]
    fn test_load_program() {
        let mut ram = Ram::default();
        ram.load_program(&[0x00, 0xE0, 0x12, 0x00]);
        assert_eq!(ram.buffer[0x200..0x204], [0x00, 0xE0, 0x12, 0x00]);
    }

    #[test]
    fn test_pixels_grid() {
        let mut display = DisplayBuffer::default();
        display.draw(&[0b1000_0001], 62, 31);
        let grid = display.pixels();
        assert_eq!(grid.len(), consts::DISPL_HEIGHT);
        assert_eq!(grid[0].len(), consts::DISPL_WIDTH);
        assert!(grid[31][62]);
        assert!(grid[31][5]);
        assert!(!grid[31][63]);
        assert!(!grid[0][62]);
        let on = grid.iter().flatten().filter(|&&px| px).count();
        assert_eq!(on, 2);
    }

    #[test]
    fn test_draw_then_redraw_restores() {
        let mut display = DisplayBuffer::default();
        assert!(!display.draw(&[0xFF, 0x81], 10, 5));
        assert_eq!(lit(&display).len(), 10);
        assert!(display.draw(&[0xFF, 0x81], 10, 5));
        assert!(lit(&display).is_empty());
    }

    #[test]
    fn test_draw_partial_overlap_collides() {
        let mut display = DisplayBuffer::default();
        assert!(!display.draw(&[0x80], 0, 0));
        assert!(display.draw(&[0xC0], 0, 0));
        assert_eq!(lit(&display), vec![(1, 0)]);
    }

    #[test]
    fn test_draw_disjoint_no_collision() {
        let mut display = DisplayBuffer::default();
        assert!(!display.draw(&[0xF0], 0, 0));
        assert!(!display.draw(&[0x0F], 0, 0));
        assert_eq!(lit(&display).len(), 8);
    }

    #[test]
    fn test_draw_wraps_both_axes() {
        let mut display = DisplayBuffer::default();
        display.draw(&[0xFF], 63, 31);
        assert_eq!(
            lit(&display),
            vec![(0, 31), (1, 31), (2, 31), (3, 31), (4, 31), (5, 31), (6, 31), (63, 31)]
        );

        let mut display = DisplayBuffer::default();
        display.draw(&[0x80, 0x80], 0, 31);
        assert_eq!(lit(&display), vec![(0, 0), (0, 31)]);
    }

    #[test]
    fn test_draw_far_out_of_range_coordinates() {
        let mut display = DisplayBuffer::default();
        display.draw(&[0x80], 200, 100);
        assert!(display.is_set(200 % 64, 100 % 32));
    }

    #[test]
    fn test_clear_and_dirty() {
        let mut display = DisplayBuffer::default();
        assert!(!display.take_dirty());
        display.draw(&[0xFF], 0, 0);
        assert!(display.take_dirty());
        assert!(!display.take_dirty());
        display.clear();
        assert!(display.take_dirty());
        assert!(lit(&display).is_empty());
    }

    #[test]
    fn test_keyboard() {
        let mut keys = KeyboardBuffer::default();
        keys.set(0xA, true);
        assert!(keys.is_pressed(0xA));
        assert!(!keys.is_pressed(0xB));
        keys.set(0xA, false);
        assert!(!keys.is_pressed(0xA));
    }
}
