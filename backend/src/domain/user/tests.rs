//! Validation coverage for user value types.

use super::*;
use rstest::rstest;

#[rstest]
#[case("", UserValidationError::EmptyDisplayName)]
#[case("   ", UserValidationError::EmptyDisplayName)]
#[case("ab", UserValidationError::DisplayNameTooShort { min: DISPLAY_NAME_MIN })]
#[case(&"a".repeat(DISPLAY_NAME_MAX + 1), UserValidationError::DisplayNameTooLong { max: DISPLAY_NAME_MAX })]
#[case("bad-name!", UserValidationError::DisplayNameInvalidCharacters)]
fn invalid_display_names(#[case] raw: &str, #[case] expected: UserValidationError) {
    let err = DisplayName::new(raw).expect_err("display name should be rejected");
    assert_eq!(err, expected);
}

#[rstest]
#[case("  Ada Lovelace ", "Ada Lovelace")]
#[case("coog_42", "coog_42")]
fn valid_display_names_are_trimmed(#[case] raw: &str, #[case] expected: &str) {
    let name = DisplayName::new(raw).expect("valid display name");
    assert_eq!(name.as_ref(), expected);
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("no-at-sign", UserValidationError::MalformedEmail)]
#[case("@campus.edu", UserValidationError::MalformedEmail)]
#[case("ada@", UserValidationError::MalformedEmail)]
#[case("a@b@c", UserValidationError::MalformedEmail)]
#[case("ada lovelace@campus.edu", UserValidationError::MalformedEmail)]
fn invalid_emails(#[case] raw: &str, #[case] expected: UserValidationError) {
    let err = EmailAddress::new(raw).expect_err("email should be rejected");
    assert_eq!(err, expected);
}

#[rstest]
fn emails_are_lower_cased() {
    let email = EmailAddress::new(" Student@UH.edu ").expect("valid email");
    assert_eq!(email.as_ref(), "student@uh.edu");
}

#[rstest]
#[case(1, true)]
#[case(0, false)]
#[case(-1, false)]
fn credits_positive_gate(#[case] balance: i32, #[case] expected: bool) {
    assert_eq!(Credits::new(balance).is_positive(), expected);
}

#[rstest]
fn credits_arithmetic_moves_single_units() {
    let balance = Credits::new(0);
    assert_eq!(balance.checked_minus(1), Some(Credits::new(-1)));
    assert_eq!(balance.checked_plus(1), Some(Credits::new(1)));
}

#[rstest]
#[case(Credits::new(i32::MAX).checked_plus(1))]
#[case(Credits::new(i32::MIN).checked_minus(1))]
fn credits_arithmetic_refuses_to_wrap_or_clamp(#[case] result: Option<Credits>) {
    assert_eq!(result, None);
}

#[rstest]
fn user_serialises_camel_case() {
    let user = User::new(
        UserId::from_uuid(uuid::Uuid::nil()),
        DisplayName::new("Ada Lovelace").expect("name"),
        EmailAddress::new("ada@campus.edu").expect("email"),
        STARTING_CREDITS,
    );
    let value = serde_json::to_value(&user).expect("serialise user");
    assert_eq!(value["displayName"], "Ada Lovelace");
    assert_eq!(value["credits"], 10);
}
