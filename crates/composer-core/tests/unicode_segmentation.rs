use composer_core::{ComposerModel, OffsetMapper, Selection};

#[test]
fn test_backspace_deletes_combining_sequence() {
    // "e\u{301}" is "e" + combining acute accent; one extended grapheme cluster.
    let mut model = ComposerModel::new();
    model.replace_text("xe\u{301}").unwrap();
    model.backspace().unwrap();
    assert_eq!(model.text(), "x");
    assert_eq!(model.selection(), Selection::caret(1));
}

#[test]
fn test_delete_deletes_skin_tone_cluster() {
    // "👍🏽" is one grapheme cluster (two scalars, four UTF-16 code units).
    let mut model = ComposerModel::new();
    model.replace_text("a👍🏽b").unwrap();
    model.select(1, 1).unwrap();
    model.delete().unwrap();
    assert_eq!(model.text(), "ab");
    assert_eq!(model.selection(), Selection::caret(1));
}

#[test]
fn test_caret_inside_surrogate_pair_snaps_back_for_typing() {
    let mut model = ComposerModel::new();
    model.replace_text("😄").unwrap();
    model.select(1, 1).unwrap();
    model.insert_text("x").unwrap();
    assert_eq!(model.text(), "x😄");
    assert_eq!(model.selection(), Selection::caret(1));
}

#[test]
fn test_range_deletion_never_splits_a_family() {
    let family = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467}";
    let mut model = ComposerModel::new();
    model.replace_text(&format!("<{family}>")).unwrap();
    model.delete_in(3, 4).unwrap();
    assert_eq!(model.text(), "<>");
    assert_eq!(model.selection(), Selection::caret(1));
}

#[test]
fn test_offset_mapper_over_mixed_text() {
    let mapper = OffsetMapper::new("a\u{1F1EB}\u{1F1F7}e\u{301}\n");
    let spans: Vec<(usize, usize)> = mapper.spans().map(|s| (s.start, s.end)).collect();
    assert_eq!(spans, vec![(0, 1), (1, 5), (5, 7), (7, 8)]);
    assert_eq!(mapper.floor(3), Ok(1));
    assert_eq!(mapper.ceil(6), Ok(7));
    assert_eq!(mapper.previous_boundary(7), Ok(5));
    assert_eq!(mapper.next_boundary(1), Ok(5));
}

#[test]
fn test_cjk_text_is_one_unit_per_character() {
    let mut model = ComposerModel::new();
    model.replace_text("你好世界").unwrap();
    assert_eq!(model.text_len(), 4);
    model.select(1, 3).unwrap();
    model.bold().unwrap();
    assert_eq!(model.html(), "你<strong>好世</strong>界");
}
