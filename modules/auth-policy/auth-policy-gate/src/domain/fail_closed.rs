//! Collaborator call wrappers that turn errors and panics into a value.

use std::any::Any;
use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};

use auth_policy_sdk::AuthPolicyError;
use futures::FutureExt;

/// Why a collaborator call produced no answer.
#[derive(Debug, thiserror::Error)]
pub enum CallFailure {
    #[error(transparent)]
    Collaborator(#[from] AuthPolicyError),
    #[error("collaborator panicked: {0}")]
    Panicked(String),
}

/// Call an async collaborator. Panics while building or polling the
/// future are caught.
///
/// # Errors
///
/// Returns [`CallFailure`] if the collaborator returned an error or
/// panicked.
pub async fn call_async<T, F, Fut>(call: F) -> Result<T, CallFailure>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, AuthPolicyError>>,
{
    let fut = catch_unwind(AssertUnwindSafe(call)).map_err(|p| panicked(p.as_ref()))?;
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(result) => result.map_err(CallFailure::from),
        Err(payload) => Err(panicked(payload.as_ref())),
    }
}

/// Call a synchronous collaborator, catching panics.
///
/// # Errors
///
/// Returns [`CallFailure`] if the collaborator returned an error or
/// panicked.
pub fn call_sync<T, F>(call: F) -> Result<T, CallFailure>
where
    F: FnOnce() -> Result<T, AuthPolicyError>,
{
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result.map_err(CallFailure::from),
        Err(payload) => Err(panicked(payload.as_ref())),
    }
}

fn panicked(payload: &(dyn Any + Send)) -> CallFailure {
    CallFailure::Panicked(panic_message(payload))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
