use std::path::PathBuf;

use serde_json::Value;
use taskflow::error::{exit_codes, Error, JsonError};

#[test]
fn exit_code_user_error() {
    for err in [
        Error::Validation("too short".to_string()),
        Error::InvalidArgument("bad input".to_string()),
        Error::NoCategories,
        Error::NotSignedIn,
        Error::ConfirmationRequired("clear all data".to_string()),
    ] {
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR, "{err}");
    }
}

#[test]
fn exit_code_auth_failed() {
    assert_eq!(Error::AccountNotFound.exit_code(), exit_codes::AUTH_FAILED);
    assert_eq!(
        Error::IncorrectCredentials.exit_code(),
        exit_codes::AUTH_FAILED
    );
}

#[test]
fn exit_code_operation_failed() {
    let err = Error::LockFailed(PathBuf::from("/tmp/data/.lock"));
    assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
    let err = Error::Io(std::io::Error::other("disk full"));
    assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn details_include_lock_path() {
    let err = Error::LockFailed(PathBuf::from("/tmp/data/.lock"));
    let details = err.details().expect("details");
    assert_eq!(details["path"], Value::String("/tmp/data/.lock".to_string()));
}

#[test]
fn json_error_includes_details() {
    let err = Error::InvalidConfig("bad config".to_string());
    let json = JsonError::from(&err);
    assert_eq!(json.code, exit_codes::USER_ERROR);
    let details = json.details.expect("details");
    assert_eq!(details["message"], Value::String("bad config".to_string()));
}

#[test]
fn auth_errors_have_no_details() {
    assert!(Error::IncorrectCredentials.details().is_none());
}
