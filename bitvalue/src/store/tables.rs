/// Population count of every byte value.
pub const BIT_COUNT: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut byte = 0;
    while byte < 256 {
        table[byte] = (byte as u8).count_ones() as u8;
        byte += 1;
    }
    table
};

/// Every byte value with its bit order reversed.
pub const BYTE_REVERSAL: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut byte = 0;
    while byte < 256 {
        table[byte] = (byte as u8).reverse_bits();
        byte += 1;
    }
    table
};

/// Mask selecting the bits of a first byte at or after `offset`.
#[inline]
#[must_use]
pub const fn head_mask(offset: usize) -> u8 {
    0xFF >> offset
}

/// Mask selecting the occupied high bits of a last byte whose data ends `end % 8` bits in.
#[inline]
#[must_use]
pub const fn tail_mask(end: usize) -> u8 {
    match end % 8 {
        0 => 0xFF,
        used => 0xFF << (8 - used),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_agree_with_std() {
        for byte in 0..=255u8 {
            assert_eq!(u32::from(BIT_COUNT[byte as usize]), byte.count_ones());
            assert_eq!(BYTE_REVERSAL[byte as usize], byte.reverse_bits());
        }
        assert_eq!(BYTE_REVERSAL[0b0000_0001], 0b1000_0000);
        assert_eq!(BYTE_REVERSAL[0b1100_1010], 0b0101_0011);
    }

    #[test]
    fn masks() {
        assert_eq!(head_mask(0), 0xFF);
        assert_eq!(head_mask(3), 0b0001_1111);
        assert_eq!(tail_mask(8), 0xFF);
        assert_eq!(tail_mask(16), 0xFF);
        assert_eq!(tail_mask(3), 0b1110_0000);
        assert_eq!(tail_mask(13), 0b1111_1000);
    }
}
