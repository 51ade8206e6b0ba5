use std::future::Future;

use url::Url;

use aora_core::{Account, Error, Post, Result, Session, StoredFile, User};

const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// What counts as a meaningful result from a backend call.
/// `None`, empty strings and `false` are falsy. Records and lists always count, even empty ones.
pub trait Outcome {
    type Value;

    fn into_value(self) -> Option<Self::Value>;
}

impl<T> Outcome for Option<T> {
    type Value = T;

    fn into_value(self) -> Option<T> {
        self
    }
}

impl Outcome for String {
    type Value = String;

    fn into_value(self) -> Option<String> {
        (!self.is_empty()).then_some(self)
    }
}

impl Outcome for bool {
    type Value = bool;

    fn into_value(self) -> Option<bool> {
        self.then_some(true)
    }
}

impl<T> Outcome for Vec<T> {
    type Value = Vec<T>;

    fn into_value(self) -> Option<Vec<T>> {
        Some(self)
    }
}

macro_rules! always_present {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Outcome for $ty {
                type Value = $ty;

                fn into_value(self) -> Option<$ty> {
                    Some(self)
                }
            }
        )+
    };
}

always_present!((), Account, Session, User, Post, StoredFile, Url);

/// Await a backend call and normalize its result.
///
/// A falsy result fails with `message` (or a generic one). A failed call is logged
/// together with `context` and handed back unchanged, so its message survives.
/// There are no retries.
pub async fn safe_execute<F, O>(operation: F, message: Option<&str>, context: &[(&str, &str)]) -> Result<O::Value>
where
    F: Future<Output = Result<O>>,
    O: Outcome,
{
    let result = operation.await.and_then(|outcome| {
        outcome
            .into_value()
            .ok_or_else(|| Error::EmptyResult(message.unwrap_or(UNKNOWN_ERROR).to_string()))
    });
    if let Err(ref err) = result {
        tracing::error!(?context, "{}", err);
    }
    result
}
