use crate::store::ByteStore;

/// Returns an independently owned copy of `store` whose first bit sits
/// `new_offset % 8` bits into its first byte.
///
/// The bit length and logical content are preserved exactly. An empty store
/// has no alignment and copies to an empty store.
pub fn offset_copy(store: &ByteStore, new_offset: usize) -> ByteStore {
    let new_offset = new_offset % 8;
    if store.bit_length == 0 {
        return ByteStore::empty();
    }
    let old_offset = store.offset;
    if new_offset == old_offset {
        return store.clone();
    }
    let data = &store.bytes;
    let last = data[data.len() - 1];
    let bits_in_last_byte = match (old_offset + store.bit_length) % 8 {
        0 => 8,
        bits => bits,
    };
    let mut shifted = Vec::with_capacity(data.len() + 1);
    if new_offset < old_offset {
        let shift = old_offset - new_offset;
        shifted.extend(data.windows(2).map(|pair| (pair[0] << shift) | (pair[1] >> (8 - shift))));
        if bits_in_last_byte > shift {
            shifted.push(last << shift);
        }
    } else {
        let shift = new_offset - old_offset;
        shifted.push(data[0] >> shift);
        shifted.extend(data.windows(2).map(|pair| (pair[0] << (8 - shift)) | (pair[1] >> shift)));
        if bits_in_last_byte + shift > 8 {
            shifted.push(last << (8 - shift));
        }
    }
    ByteStore::new(shifted, store.bit_length, new_offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_shift_drops_empty_final_byte() {
        let store = ByteStore::new(vec![0b0000_0111, 0b1000_0000], 4, 5);
        let copy = offset_copy(&store, 0);
        assert_eq!(copy.offset(), 0);
        assert_eq!(copy.bit_len(), 4);
        assert_eq!(copy.raw_bytes(), &[0b1111_0000]);
    }

    #[test]
    fn right_shift_grows_into_new_byte() {
        let store = ByteStore::new(vec![0b1010_1010], 8, 0);
        let copy = offset_copy(&store, 3);
        assert_eq!(copy.offset(), 3);
        assert_eq!(copy.raw_bytes(), &[0b0001_0101, 0b0100_0000]);
    }

    #[test]
    fn every_offset_preserves_bits() {
        let store = ByteStore::new(vec![0b0001_1011, 0b0110_1101, 0b1100_0000], 17, 3);
        let expected: Vec<bool> = (0..17).map(|position| store.get_bit(position).unwrap()).collect();
        for from in 0..8 {
            let moved = offset_copy(&store, from);
            for to in 0..8 {
                let copy = offset_copy(&moved, to);
                assert_eq!(copy.offset(), to);
                assert_eq!(copy.raw_bytes().len(), copy.byte_len());
                let actual: Vec<bool> = (0..17).map(|position| copy.get_bit(position).unwrap()).collect();
                assert_eq!(actual, expected);
            }
        }
    }

    #[test]
    fn offsets_wrap_within_a_byte() {
        let store = ByteStore::new(vec![0b1011_0000], 4, 0);
        let copy = offset_copy(&store, 9);
        assert_eq!(copy.offset(), 1);
        assert_eq!(copy.raw_bytes(), &[0b0101_1000]);
        assert_eq!(offset_copy(&store, 16).raw_bytes(), store.raw_bytes());
    }

    #[test]
    fn empty_store_copies_to_empty() {
        let copy = offset_copy(&ByteStore::empty(), 4);
        assert_eq!(copy.bit_len(), 0);
        assert!(copy.raw_bytes().is_empty());
    }
}
