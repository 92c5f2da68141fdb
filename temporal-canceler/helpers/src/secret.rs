//! API key handling.
//!
//! Keys are wrapped in [`ApiKey`] as soon as they leave the config file so
//! that `{:?}` formatting of any struct holding one cannot leak the value
//! into a log line.

use std::fmt;

/// A Temporal Cloud API key. The raw value is only reachable via
/// [`ApiKey::expose`].
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw key, for building the `authorization` header. Never log this.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Source of the API key attached to each outbound call.
///
/// The supplier is consulted on every request rather than once at connect
/// time, so a rotating implementation is picked up without rebuilding the
/// connection.
pub trait ApiKeySupplier: Send + Sync + 'static {
    fn api_key(&self) -> ApiKey;
}

impl ApiKeySupplier for ApiKey {
    fn api_key(&self) -> ApiKey {
        self.clone()
    }
}

impl<F> ApiKeySupplier for F
where
    F: Fn() -> ApiKey + Send + Sync + 'static,
{
    fn api_key(&self) -> ApiKey {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[test]
    fn debug_output_is_redacted() {
        let key = ApiKey::new("tmprl-super-secret");
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("tmprl-super-secret"));
        assert_eq!(rendered, "ApiKey(<redacted>)");
    }

    #[test]
    fn closure_supplier_is_called_per_lookup() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let supplier = move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            ApiKey::new(format!("key-{n}"))
        };

        assert_eq!(supplier.api_key().expose(), "key-0");
        assert_eq!(supplier.api_key().expose(), "key-1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
