use bitvalue::{BitValue, Config, Error};
use itertools::iproduct;
use proptest::prelude::*;

proptest! {
    #[test]
    fn from_iter(bits in prop::collection::vec(any::<bool>(), 0..500)) {
        let value: BitValue = bits.iter().copied().collect();
        assert_eq!(value.len(), bits.len());
        assert_eq!(value.iter().collect::<Vec<bool>>(), bits);
    }

    #[test]
    fn alignment_copy_keeps_bits(value in arbitrary_bitvalue(300), offset in 0..8usize) {
        let moved = value.aligned(offset);
        assert_eq!(&moved, &value);
        assert_eq!(moved.bin(), value.bin());
        assert_eq!(moved.to_bytes(), value.to_bytes());
        assert_eq!(moved.digest(), value.digest());
        if !value.is_empty() {
            assert_eq!(moved.offset(), offset);
        }
    }

    #[test]
    fn concatenation(left in arbitrary_unaligned(200), right in arbitrary_unaligned(200)) {
        let joined = &left + &right;
        assert_eq!(joined.len(), left.len() + right.len());
        assert_eq!(joined.slice(..left.len()).unwrap(), left.clone());
        assert_eq!(joined.slice(left.len()..).unwrap(), right.clone());
        let mut prepended = right.clone();
        prepended.prepend(&left);
        assert_eq!(prepended, joined);
    }

    #[test]
    fn insert_then_delete((value, position) in value_and_position(300), inserted in arbitrary_unaligned(100)) {
        let mut edited = value.clone();
        edited.insert(&inserted, position).unwrap();
        assert_eq!(edited.len(), value.len() + inserted.len());
        assert_eq!(edited.slice(position..position + inserted.len()).unwrap(), inserted.clone());
        edited.delete(inserted.len(), position).unwrap();
        assert_eq!(edited, value);
    }

    #[test]
    fn overwrite_matches_splice((value, position) in value_and_position(300), patch in arbitrary_unaligned(64)) {
        prop_assume!(position + patch.len() <= value.len());
        let mut overwritten = value.clone();
        overwritten.overwrite(&patch, position).unwrap();
        let mut expected = value.bin();
        expected.replace_range(position..position + patch.len(), &patch.bin());
        assert_eq!(overwritten.bin(), expected);
    }

    #[test]
    fn count_partitions_length(value in arbitrary_unaligned(500)) {
        assert_eq!(value.count(true) + value.count(false), value.len());
        assert_eq!(value.count(true), value.iter().filter(|bit| *bit).count());
        assert_eq!(value.support().count(), value.count(true));
    }

    #[test]
    fn reverse_is_an_involution(value in arbitrary_unaligned(300)) {
        let mut reversed = value.clone();
        reversed.reverse();
        assert_eq!(reversed.bin(), value.bin().chars().rev().collect::<String>());
        reversed.reverse();
        assert_eq!(reversed, value);
    }

    #[test]
    fn repeat_length(value in arbitrary_unaligned(50), count in 0..20usize) {
        let repeated = value.repeat(count);
        assert_eq!(repeated.len(), value.len() * count);
        assert_eq!(repeated.bin(), value.bin().repeat(count));
    }

    #[test]
    fn shifts_match_text((value, bits) in value_and_position(200)) {
        let text = value.bin();
        let mut left = value.clone();
        left.shift_left(bits);
        assert_eq!(left.bin(), format!("{}{}", &text[bits..], "0".repeat(bits)));
        let mut right = value.clone();
        right.shift_right(bits);
        assert_eq!(right.bin(), format!("{}{}", "0".repeat(bits), &text[..text.len() - bits]));
    }

    #[test]
    fn xor_per_bit((left, right) in equal_length_values(300)) {
        let xored = left.xor(&right).unwrap();
        for (index, bit) in xored.iter().enumerate() {
            assert_eq!(bit, left.get(index).unwrap() ^ right.get(index).unwrap());
        }
        assert_eq!(xored.xor(&right).unwrap(), left);
    }

    #[test]
    fn planted_patterns_are_found((value, position) in value_and_position(400), pattern in arbitrary_unaligned(24)) {
        prop_assume!(!pattern.is_empty() && position + pattern.len() <= value.len());
        let mut haystack = value.clone();
        haystack.overwrite(&pattern, position).unwrap();
        let found = haystack.find(&pattern).unwrap();
        assert!(found <= position);
        assert_eq!(haystack.slice(found..found + pattern.len()).unwrap(), pattern);
    }

    #[test]
    fn token_string_round_trips(value in arbitrary_unaligned(300)) {
        let text = value.to_token_string();
        assert_eq!(text.parse::<BitValue>().unwrap(), value);
    }
}

fn arbitrary_bitvalue(max_length: usize) -> impl Strategy<Value = BitValue> {
    prop::collection::vec(any::<bool>(), 0..max_length).prop_map(BitValue::from_iter)
}

/// A value stored at an arbitrary offset.
fn arbitrary_unaligned(max_length: usize) -> impl Strategy<Value = BitValue> {
    (arbitrary_bitvalue(max_length), 0..8usize).prop_map(|(value, offset)| value.aligned(offset))
}

fn value_and_position(max_length: usize) -> impl Strategy<Value = (BitValue, usize)> {
    arbitrary_unaligned(max_length).prop_flat_map(|value| {
        let length = value.len();
        (Just(value), 0..=length)
    })
}

fn equal_length_values(max_length: usize) -> impl Strategy<Value = (BitValue, BitValue)> {
    (0..max_length).prop_flat_map(|length| {
        (
            prop::collection::vec(any::<bool>(), length).prop_map(BitValue::from_iter),
            (prop::collection::vec(any::<bool>(), length), 0..8usize)
                .prop_map(|(bits, offset)| BitValue::from_iter(bits).aligned(offset)),
        )
    })
}

#[test]
fn append_merges_any_alignment() {
    let front = BitValue::from_bin("10110").unwrap();
    let back = BitValue::from_bin("011").unwrap();
    let expected = BitValue::from_uint(0b1011_0011, 8).unwrap();
    for (front_offset, back_offset) in iproduct!(0..8usize, 0..8usize) {
        let mut joined = front.aligned(front_offset);
        joined.append(&back.aligned(back_offset));
        assert_eq!(joined.len(), 8);
        assert_eq!(joined, expected, "offsets {front_offset} and {back_offset}");
    }
}

#[test]
fn byte_pattern_planted_at_bit_forty() {
    let mut value = BitValue::zeros(200);
    value.overwrite(&BitValue::from_hex("ab").unwrap(), 40).unwrap();
    assert_eq!(value.find_bytes(&[0xAB], 0, value.len()).unwrap(), Some(40));
    let aligned = Config::default().with_byte_aligned(true);
    assert_eq!(value.find_with(&BitValue::from_bytes(&[0xAB]), &aligned), Some(40));
}

#[test]
fn patterns_of_millions_of_bits_are_found() {
    let length = 4_000_000;
    let mut haystack = BitValue::zeros(length + 10);
    let pattern = BitValue::ones(length);
    haystack.overwrite(&pattern, 3).unwrap();
    assert_eq!(haystack.find_in(&pattern, 0, haystack.len(), false).unwrap(), Some(3));
    assert_eq!(haystack.find(&pattern), Some(3));
    assert_eq!(haystack.find_all(&pattern, false).collect::<Vec<_>>(), vec![3]);
    let aligned = Config::default().with_byte_aligned(true);
    assert_eq!(haystack.find_with(&pattern, &aligned), None);
}

#[test]
fn out_of_range_positions() {
    let mut value = BitValue::zeros(10);
    assert_eq!(value.get(10).unwrap_err(), Error::OutOfRange { position: 10, length: 10 });
    assert!(value.set(11, true).is_err());
    assert!(value.delete(4, 7).is_err());
    assert!(value.overwrite(&BitValue::ones(3), 8).is_err());
    assert_eq!(value, BitValue::zeros(10));
}
