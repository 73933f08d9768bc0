use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

use log::debug;

use crate::consts;
use crate::core::error::RomError;

/// A raw program image, loaded verbatim at 0x200.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Rom {
    pub buffer: Vec<u8>,
}

impl Rom {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, RomError> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let rom = Rom::from_reader(&mut file)?;
        debug!("read {} byte program from {}", rom.len(), path.display());
        Ok(rom)
    }

    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, RomError> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        Rom::from_bytes(buffer)
    }

    pub fn from_bytes(buffer: Vec<u8>) -> Result<Self, RomError> {
        if buffer.len() > consts::MAX_ROM_BYTES {
            return Err(RomError::TooLarge {
                size: buffer.len(),
                max: consts::MAX_ROM_BYTES,
            });
        }
        Ok(Rom { buffer })
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
