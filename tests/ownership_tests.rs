mod common;

use flashdeck::ErrorKind;
use flashdeck::config::WorkspaceConfig;
use flashdeck::db::CardDraft;

#[tokio::test]
async fn other_account_is_denied_even_with_same_folder_name() {
    let ws = common::workspace("own-deny", &WorkspaceConfig::default()).await;
    let alice = common::signed_in(&ws, "alice").await;
    let bob = common::signed_in(&ws, "bob").await;

    let alice_folder = ws.folders.create(&alice, "Biology").await.expect("alice folder");
    ws.folders.create(&bob, "Biology").await.expect("bob folder");

    let alice_account = ws.accounts.must_resolve(&alice).await.unwrap();
    let bob_account = ws.accounts.must_resolve(&bob).await.unwrap();

    let folder = ws
        .guard
        .authorize_folder(&alice_account, alice_folder.id)
        .await
        .expect("owner denied");
    assert_eq!(folder.id, alice_folder.id);

    let err = ws
        .guard
        .authorize_folder(&bob_account, alice_folder.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessDenied);

    let err = ws
        .cards
        .list(&bob, alice_folder.id, flashdeck::db::PageSpec::new(0, 10))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessDenied);
}

#[tokio::test]
async fn missing_folder_is_not_found() {
    let ws = common::workspace("own-missing", &WorkspaceConfig::default()).await;
    let alice = common::signed_in(&ws, "alice").await;
    let account = ws.accounts.must_resolve(&alice).await.unwrap();

    let err = ws.guard.authorize_folder(&account, 9999).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = ws.folders.delete(&alice, 9999).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn card_is_scoped_to_the_named_folder() {
    let ws = common::workspace("own-card", &WorkspaceConfig::default()).await;
    let alice = common::signed_in(&ws, "alice").await;
    let account = ws.accounts.must_resolve(&alice).await.unwrap();

    let bio = ws.folders.create(&alice, "Biology").await.unwrap();
    let chem = ws.folders.create(&alice, "Chemistry").await.unwrap();
    let card = ws
        .cards
        .create(&alice, bio.id, &CardDraft::new("What is ATP?", "Energy carrier"))
        .await
        .unwrap();

    let found = ws
        .guard
        .authorize_card(&account, bio.id, card.id)
        .await
        .expect("card in its own folder");
    assert_eq!(found, card);

    let err = ws
        .guard
        .authorize_card(&account, chem.id, card.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = ws
        .cards
        .delete(&alice, chem.id, card.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn cards_of_another_account_cannot_be_touched() {
    let ws = common::workspace("own-card-deny", &WorkspaceConfig::default()).await;
    let alice = common::signed_in(&ws, "alice").await;
    let bob = common::signed_in(&ws, "bob").await;

    let bio = ws.folders.create(&alice, "Biology").await.unwrap();
    let card = ws
        .cards
        .create(&alice, bio.id, &CardDraft::new("q", "a"))
        .await
        .unwrap();

    let err = ws
        .cards
        .update(&bob, bio.id, card.id, &CardDraft::new("hijack", "hijack"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessDenied);

    let err = ws.folders.rename(&bob, bio.id, "Mine").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessDenied);

    let err = ws.folders.delete(&bob, bio.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessDenied);
    assert_eq!(ws.cards.count(&alice, bio.id).await.unwrap(), 1);
}

#[tokio::test]
async fn unprovisioned_caller_is_not_found() {
    let ws = common::workspace("own-unprov", &WorkspaceConfig::default()).await;
    let alice = common::signed_in(&ws, "alice").await;
    let bio = ws.folders.create(&alice, "Biology").await.unwrap();

    let stranger = flashdeck::Principal::new("stranger");
    let err = ws.cards.count(&stranger, bio.id).await.unwrap_err();
    assert!(matches!(err, flashdeck::CoreError::AccountNotFound(_)));
}
