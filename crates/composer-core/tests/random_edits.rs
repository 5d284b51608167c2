//! Random edit consistency
//!
//! Runs many random typing, deletion and formatting commands and checks the flattened text
//! against a reference list of grapheme clusters.

use composer_core::ComposerModel;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SAMPLES: &[&str] = &["x", "你", "😄", "👋🏽", "ab", "\n"];

fn utf16_offset(clusters: &[String], index: usize) -> usize {
    clusters[..index]
        .iter()
        .map(|cluster| cluster.encode_utf16().count())
        .sum()
}

#[test]
fn test_random_edits_match_reference() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut model = ComposerModel::new();
    let mut reference: Vec<String> = Vec::new();

    for _ in 0..500 {
        match rng.gen_range(0..10) {
            0..=4 => {
                let index = rng.gen_range(0..=reference.len());
                let offset = utf16_offset(&reference, index);
                let sample = SAMPLES[rng.gen_range(0..SAMPLES.len())];
                model.select(offset, offset).unwrap();
                model.insert_text(sample).unwrap();

                let inserted: Vec<String> = if sample == "ab" {
                    vec!["a".to_string(), "b".to_string()]
                } else {
                    vec![sample.to_string()]
                };
                reference.splice(index..index, inserted);
            }
            5..=6 => {
                if reference.is_empty() {
                    continue;
                }
                let index = rng.gen_range(1..=reference.len());
                let offset = utf16_offset(&reference, index);
                model.select(offset, offset).unwrap();
                let before = model.text();
                model.backspace().unwrap();
                // Backspace at the start of a list item lifts the item instead of deleting.
                if model.text() != before {
                    reference.remove(index - 1);
                }
            }
            7 => {
                let a = rng.gen_range(0..=reference.len());
                let b = rng.gen_range(0..=reference.len());
                let (from, to) = (a.min(b), a.max(b));
                model
                    .delete_in(utf16_offset(&reference, from), utf16_offset(&reference, to))
                    .unwrap();
                reference.drain(from..to);
            }
            8 => {
                let a = rng.gen_range(0..=reference.len());
                let b = rng.gen_range(0..=reference.len());
                let (from, to) = (a.min(b), a.max(b));
                model
                    .select(utf16_offset(&reference, from), utf16_offset(&reference, to))
                    .unwrap();
                match rng.gen_range(0..3) {
                    0 => model.bold().unwrap(),
                    1 => model.underline().unwrap(),
                    _ => model.unordered_list().unwrap(),
                };
            }
            _ => {
                let offset = rng.gen_range(0..=reference.len());
                let offset = utf16_offset(&reference, offset);
                model.select(offset, offset).unwrap();
                model.strike_through().unwrap();
            }
        }

        assert_eq!(model.text(), reference.concat());
        assert_eq!(model.text_len(), utf16_offset(&reference, reference.len()));
    }
}
