use crate::{DataResult, DataSourceError};

#[test]
fn given_each_state_when_displayed_then_uses_tagged_format() {
    let success: DataResult<u32> = DataResult::Success(5);
    let error: DataResult<u32> = DataResult::Error(DataSourceError::parse("bad body"));
    let loading: DataResult<u32> = DataResult::Loading;

    assert_eq!(success.to_string(), "Success[data=5]");
    assert!(error.to_string().starts_with("Error[exception="));
    assert!(error.to_string().contains("bad body"));
    assert_eq!(loading.to_string(), "Loading");
}

/// **VALUE**: Verifies that `Loading` has no two-state counterpart.
///
/// **BUG THIS CATCHES**: Would catch a conversion that turns an in-flight state into
/// an empty success, which would render an empty list instead of a spinner.
#[test]
fn given_loading_when_converted_to_response_then_none() {
    let loading: DataResult<Vec<u8>> = DataResult::Loading;

    assert!(loading.is_loading());
    assert!(loading.into_response().is_none());
    assert!(DataResult::Success(1).into_response().is_some());
}
