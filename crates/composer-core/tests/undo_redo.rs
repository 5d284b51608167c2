use composer_core::{Command, ComposerModel, ComposerOptions, EditCommand, Selection};

#[test]
fn test_undo_redo_typing() {
    let mut model = ComposerModel::new();

    model
        .execute(Command::Edit(EditCommand::InsertText {
            text: "a".to_string(),
        }))
        .unwrap();
    assert_eq!(model.text(), "a");
    assert!(model.can_undo());
    assert!(!model.can_redo());

    model.execute(Command::Edit(EditCommand::Undo)).unwrap();
    assert_eq!(model.text(), "");
    assert!(!model.can_undo());
    assert!(model.can_redo());

    model.execute(Command::Edit(EditCommand::Redo)).unwrap();
    assert_eq!(model.text(), "a");
    assert!(model.can_undo());
    assert!(!model.can_redo());
}

#[test]
fn test_every_insert_is_its_own_step() {
    let mut model = ComposerModel::new();
    for ch in ["a", "b", "c"] {
        model.insert_text(ch).unwrap();
    }
    assert_eq!(model.undo_depth(), 3);

    model.undo().unwrap();
    assert_eq!(model.text(), "ab");
    assert_eq!(model.redo_depth(), 1);
}

#[test]
fn test_undo_restores_html_and_selection() {
    let mut model = ComposerModel::new();
    model.replace_text("This is bold text").unwrap();
    model.select(8, 12).unwrap();
    model.bold().unwrap();
    model.select(0, 0).unwrap();
    model.insert_text(">").unwrap();
    assert_eq!(model.html(), "&gt;This is <strong>bold</strong> text");

    let update = model.undo().unwrap();
    assert_eq!(
        update.html().as_deref(),
        Some("This is <strong>bold</strong> text")
    );
    assert_eq!(model.selection(), Selection::caret(0));

    let update = model.undo().unwrap();
    assert_eq!(update.html().as_deref(), Some("This is bold text"));
    assert_eq!(update.selection(), Some(Selection::new(8, 12)));

    let update = model.redo().unwrap();
    assert_eq!(
        update.html().as_deref(),
        Some("This is <strong>bold</strong> text")
    );
    // Redo restores the selection the model had when the step was undone.
    assert_eq!(model.selection(), Selection::caret(0));
}

#[test]
fn test_new_edit_clears_redo() {
    let mut model = ComposerModel::new();
    model.replace_text("one").unwrap();
    model.replace_text("two").unwrap();
    model.undo().unwrap();
    assert!(model.can_redo());

    model.insert_text("!").unwrap();
    assert!(!model.can_redo());
    assert_eq!(model.text(), "one!");
}

#[test]
fn test_undo_redo_with_empty_history_keep() {
    let mut model = ComposerModel::new();
    assert!(model.undo().unwrap().is_keep());
    assert!(model.redo().unwrap().is_keep());
    assert_eq!(model.version(), 0);
}

#[test]
fn test_exhausted_undo_leaves_redo_stack_intact() {
    let mut model = ComposerModel::new();
    model.replace_text("x").unwrap();
    model.undo().unwrap();
    let version = model.version();

    assert!(model.undo().unwrap().is_keep());
    assert_eq!(model.version(), version);
    assert_eq!(model.undo_depth(), 0);
    assert_eq!(model.redo_depth(), 1);

    model.redo().unwrap();
    assert_eq!(model.text(), "x");
    assert!(model.redo().unwrap().is_keep());
    assert_eq!(model.undo_depth(), 1);
}

#[test]
fn test_undo_and_redo_bump_version() {
    let mut model = ComposerModel::new();
    model.replace_text("x").unwrap();
    model.undo().unwrap();
    model.redo().unwrap();
    assert_eq!(model.version(), 3);
}

#[test]
fn test_history_can_be_disabled() {
    let mut model = ComposerModel::with_options(ComposerOptions::default().with_max_undo_depth(0));
    model.replace_text("x").unwrap();
    assert!(!model.can_undo());
    assert!(model.undo().unwrap().is_keep());
    assert_eq!(model.text(), "x");
}

#[test]
fn test_selection_changes_are_not_history() {
    let mut model = ComposerModel::new();
    model.replace_text("abc").unwrap();
    model.select(0, 1).unwrap();
    model.select(1, 2).unwrap();
    assert_eq!(model.undo_depth(), 1);
}
