mod proptest_plans;

use super::{LoadState, require, require_email};

#[test]
fn test_require_trims_and_rejects_blank() {
    assert_eq!(require("name", "  Ada  ").unwrap(), "Ada");
    assert!(require("name", "   ").is_err());
}

#[test]
fn test_require_email_shapes() {
    assert_eq!(
        require_email(" ada@example.com ").unwrap(),
        "ada@example.com"
    );
    for bad in [
        "",
        "ada",
        "@example.com",
        "ada@",
        "a@b@c",
        "ada@.com",
        "ada @x.io",
    ] {
        assert!(require_email(bad).is_err(), "{bad:?} should be rejected");
    }
}

#[test]
fn test_load_state_accessors() {
    let ready: LoadState<u8> = LoadState::Ready(1);
    assert_eq!(ready.ready(), Some(&1));
    assert!(ready.error().is_none());

    let failed: LoadState<u8> = LoadState::Failed("Plan not found".to_owned());
    assert_eq!(failed.error(), Some("Plan not found"));
    assert!(LoadState::<u8>::Loading.is_loading());
}
