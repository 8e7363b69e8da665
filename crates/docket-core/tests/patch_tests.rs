use docket_api::{ChatReply, EditInstruction};
use docket_core::{diff_text, PatchStatus, TextDelta, Workspace};

fn edit(start: usize, delete_length: usize, insert_text: &str) -> EditInstruction {
    EditInstruction {
        start,
        delete_length,
        insert_text: insert_text.to_string(),
    }
}

fn reply_with(edits: Vec<EditInstruction>) -> ChatReply {
    ChatReply {
        message: "Updated the summary.".to_string(),
        edits,
    }
}

// ========================================================================
// Patch application
// ========================================================================

#[test]
fn test_reply_edits_become_an_action() {
    let mut workspace = Workspace::default();
    workspace.set_summary("The cat sat.");

    let action_id = workspace
        .apply_reply(reply_with(vec![edit(4, 3, "dog")]))
        .unwrap()
        .expect("edits should produce an action");

    assert_eq!(workspace.summary_text(), Some("The dog sat."));

    let action = workspace.action(action_id).unwrap();
    assert_eq!(action.patches().len(), 1);
    let patch = &action.patches()[0];
    assert_eq!(patch.deleted_text, "cat");
    assert_eq!(patch.insert_text, "dog");
    assert_eq!(patch.original_start, 4);
    assert_eq!(patch.original_end, 7);
    assert_eq!(patch.status, PatchStatus::Applied);
}

#[test]
fn test_reply_without_edits_only_records_chat() {
    let mut workspace = Workspace::default();
    workspace.set_summary("No changes needed.");

    let action = workspace.apply_reply(reply_with(Vec::new())).unwrap();
    assert!(action.is_none());
    assert_eq!(workspace.actions().len(), 0);
    assert_eq!(workspace.chat().len(), 1);
}

#[test]
fn test_out_of_bounds_instruction_is_rejected_atomically() {
    let mut workspace = Workspace::default();
    workspace.set_summary("short");

    let result = workspace.apply_reply(reply_with(vec![edit(1, 2, "ho"), edit(99, 1, "x")]));
    assert!(result.is_err());
    // Nothing of the action survives: the buffer is back to its old text.
    assert_eq!(workspace.summary_text(), Some("short"));
    assert_eq!(workspace.actions().len(), 0);
}

#[test]
fn test_reply_parses_from_wire_json() {
    let raw = r#"{
        "message": "Replaced the informal phrasing.",
        "edits": [
            { "start": 4, "delete_length": 3, "insert_text": "defendant" }
        ]
    }"#;
    let reply: ChatReply = serde_json::from_str(raw).unwrap();

    let mut workspace = Workspace::default();
    workspace.set_summary("The cat sat.");
    workspace.apply_reply(reply).unwrap();
    assert_eq!(workspace.summary_text(), Some("The defendant sat."));
}

// ========================================================================
// Revert
// ========================================================================

#[test]
fn test_revert_restores_the_original_text_exactly() {
    let mut workspace = Workspace::default();
    let original = "0123456789foo after.";
    workspace.set_summary(original);

    let action_id = workspace
        .apply_reply(reply_with(vec![edit(10, 3, "barbar")]))
        .unwrap()
        .unwrap();
    let edited = workspace.summary_text().unwrap().to_string();
    assert_eq!(edited, "0123456789barbar after.");

    let patch_id = workspace.action(action_id).unwrap().patches()[0].id;
    assert!(workspace.revert_patch(patch_id));

    assert_eq!(workspace.summary_text(), Some(original));
    let patch = workspace.action(action_id).unwrap().patches()[0].clone();
    assert_eq!(patch.status, PatchStatus::Reverted);

    // Re-deriving the revert's delta gives exactly the inverse of the apply.
    let apply_delta = diff_text(original, &edited).unwrap();
    let revert_delta = diff_text(&edited, original).unwrap();
    assert_eq!(
        revert_delta,
        TextDelta {
            start: apply_delta.start,
            removed_len: apply_delta.inserted_len,
            inserted_len: apply_delta.removed_len,
        }
    );
}

#[test]
fn test_reverting_an_earlier_patch_shifts_later_ones() {
    let mut workspace = Workspace::default();
    workspace.set_summary("0123456789 body text, tail end.");

    // P1 inserts five characters at offset 10; P2 lands at offset 30.
    let action_id = workspace
        .apply_reply(reply_with(vec![
            edit(10, 0, "AAAAA"),
            edit(30, 3, "XYZ"),
        ]))
        .unwrap()
        .unwrap();

    let (p1, p2) = {
        let patches = workspace.action(action_id).unwrap().patches();
        (patches[0].clone(), patches[1].clone())
    };
    assert_eq!((p1.current_start, p1.current_end), (10, 15));
    assert_eq!((p2.current_start, p2.current_end), (30, 33));

    assert!(workspace.revert_patch(p1.id));

    let p2_after = workspace.action(action_id).unwrap().patches()[1].clone();
    assert_eq!(p2_after.current_start, p2.current_start - 5);
    assert_eq!(p2_after.current_end, p2.current_end - 5);
    assert_eq!(p2_after.status, PatchStatus::Applied);
}

#[test]
fn test_revert_all_runs_most_recent_first_and_restores_buffer() {
    let mut workspace = Workspace::default();
    let original = "alpha beta gamma";
    workspace.set_summary(original);

    let action_id = workspace
        .apply_reply(reply_with(vec![
            edit(0, 5, "ALPHA"),
            edit(11, 5, "GAMMA"),
        ]))
        .unwrap()
        .unwrap();
    assert_eq!(workspace.summary_text(), Some("ALPHA beta GAMMA"));

    assert_eq!(workspace.revert_all_patches(action_id), 2);
    assert_eq!(workspace.summary_text(), Some(original));
    assert!(workspace
        .action(action_id)
        .unwrap()
        .patches()
        .iter()
        .all(|patch| patch.status == PatchStatus::Reverted));
}

#[test]
fn test_reverted_patch_cannot_be_reverted_twice() {
    let mut workspace = Workspace::default();
    workspace.set_summary("The cat sat.");
    let action_id = workspace
        .apply_reply(reply_with(vec![edit(4, 3, "dog")]))
        .unwrap()
        .unwrap();
    let patch_id = workspace.action(action_id).unwrap().patches()[0].id;

    assert!(workspace.revert_patch(patch_id));
    assert!(!workspace.revert_patch(patch_id));
    assert_eq!(workspace.summary_text(), Some("The cat sat."));
}

// ========================================================================
// Staleness
// ========================================================================

#[test]
fn test_free_form_edit_makes_the_action_stale() {
    let mut workspace = Workspace::default();
    workspace.set_summary("The cat sat on the mat.");
    let action_id = workspace
        .apply_reply(reply_with(vec![edit(4, 3, "dog")]))
        .unwrap()
        .unwrap();
    let patch_id = workspace.action(action_id).unwrap().patches()[0].id;

    // Direct user typing outside the patch stack.
    workspace
        .edit_summary("The dog sat on the rug.")
        .unwrap();

    let action = workspace.action(action_id).unwrap();
    assert!(action.is_stale());

    // Preview and revert are permanent no-ops now.
    assert!(!workspace.preview_patch(patch_id));
    assert!(!workspace.revert_patch(patch_id));
    assert_eq!(workspace.summary_text(), Some("The dog sat on the rug."));

    // The audit description list is still served.
    let descriptions = workspace.action(action_id).unwrap().descriptions();
    assert_eq!(descriptions, vec!["Replaced 'cat' with 'dog'".to_string()]);
    assert!(!workspace.action(action_id).unwrap().diff_lines().is_empty());
}

#[test]
fn test_new_action_marks_the_previous_one_stale() {
    let mut workspace = Workspace::default();
    workspace.set_summary("one two three");

    let first = workspace
        .apply_reply(reply_with(vec![edit(0, 3, "uno")]))
        .unwrap()
        .unwrap();
    let second = workspace
        .apply_reply(reply_with(vec![edit(4, 3, "dos")]))
        .unwrap()
        .unwrap();

    assert!(workspace.action(first).unwrap().is_stale());
    assert!(!workspace.action(second).unwrap().is_stale());
}

#[test]
fn test_dismissed_action_no_longer_accepts_operations() {
    let mut workspace = Workspace::default();
    workspace.set_summary("The cat sat.");
    let action_id = workspace
        .apply_reply(reply_with(vec![edit(4, 3, "dog")]))
        .unwrap()
        .unwrap();
    let patch_id = workspace.action(action_id).unwrap().patches()[0].id;

    assert!(workspace.dismiss_action(action_id));
    assert!(workspace.action(action_id).is_none());
    assert!(!workspace.revert_patch(patch_id));
    // The buffer keeps the applied edit.
    assert_eq!(workspace.summary_text(), Some("The dog sat."));
}
