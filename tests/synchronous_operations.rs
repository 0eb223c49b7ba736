//! Retrying synchronous work through `futures::future::ready`

use futures::future::{ready, Ready};
use rebound::testing::FixedBackoff;
use rebound::{assert_attempts, assert_stopped, retry, retry_with, RetryOptions, StopReason};
use std::cell::Cell;

#[derive(Debug, PartialEq)]
enum ParseError {
    Truncated,
    Invalid,
}

fn parse(input: &str) -> Result<u32, ParseError> {
    if input.ends_with(';') {
        input.trim_end_matches(';').parse().map_err(|_| ParseError::Invalid)
    } else {
        Err(ParseError::Truncated)
    }
}

#[test]
fn sync_operation_retries_until_input_complete() {
    let reads = ["4", "42", "42;"];

    let result = futures::executor::block_on(retry(
        |attempt| ready(parse(reads[attempt as usize - 1])),
        FixedBackoff::immediate(5),
    ));

    assert_eq!(result, Ok(42));
}

#[tokio::test]
async fn sync_operation_stops_on_invalid_input() {
    let calls = Cell::new(0);

    let op = |_: u32| -> Ready<Result<u32, ParseError>> {
        calls.set(calls.get() + 1);
        ready(parse("abc;"))
    };

    let result = retry_with(
        op,
        FixedBackoff::immediate(5),
        RetryOptions::<ParseError>::new().unrecoverable_if(|e| *e == ParseError::Invalid),
    )
    .await;

    assert_eq!(calls.get(), 1);
    assert_stopped!(result, StopReason::Unrecoverable);
}

#[tokio::test]
async fn sync_operation_exhausts_budget() {
    let result = retry(|_| ready(parse("1")), FixedBackoff::immediate(3)).await;
    assert_attempts!(result, 4);
}
