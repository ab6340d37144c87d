//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, files natively)
//! - Timers used between network retries

use std::time::Duration;

use crate::scores::Sleeper;

#[cfg(target_arch = "wasm32")]
pub use web::{LocalStorage, TimeoutSleeper as PlatformSleeper};

#[cfg(not(target_arch = "wasm32"))]
pub use native::TokioSleeper as PlatformSleeper;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::*;

    /// Retry delays on the tokio timer
    #[derive(Debug, Clone, Copy, Default)]
    pub struct TokioSleeper;

    impl Sleeper for TokioSleeper {
        async fn sleep(&self, duration: Duration) {
            tokio::time::sleep(duration).await;
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::*;
    use crate::persistence::{KeyValueStore, StorageError};
    use wasm_bindgen::JsValue;

    /// Browser LocalStorage
    #[derive(Debug, Clone)]
    pub struct LocalStorage {
        storage: web_sys::Storage,
    }

    impl LocalStorage {
        pub fn open() -> Result<Self, StorageError> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .map(|storage| Self { storage })
                .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".into()))
        }
    }

    fn js_err(e: JsValue) -> String {
        e.as_string().unwrap_or_else(|| format!("{:?}", e))
    }

    impl KeyValueStore for LocalStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.storage
                .get_item(key)
                .map_err(|e| StorageError::Unavailable(js_err(e)))
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            // Quota errors land here
            self.storage
                .set_item(key, value)
                .map_err(|e| StorageError::WriteRejected(js_err(e)))
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.storage
                .remove_item(key)
                .map_err(|e| StorageError::WriteRejected(js_err(e)))
        }
    }

    /// Retry delays via `setTimeout`
    #[derive(Debug, Clone, Copy, Default)]
    pub struct TimeoutSleeper;

    impl Sleeper for TimeoutSleeper {
        async fn sleep(&self, duration: Duration) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let ms = duration.as_millis().min(i32::MAX as u128) as i32;
            let promise = js_sys::Promise::new(&mut |resolve, _reject| {
                if window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                    .is_err()
                {
                    let _ = resolve.call0(&JsValue::NULL);
                }
            });
            let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
        }
    }
}
