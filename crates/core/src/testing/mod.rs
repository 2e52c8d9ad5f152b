//! Testing utilities and mock implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use holliday_core::testing::MockDispatch;
//!
//! let dispatch = MockDispatch::new();
//! dispatch.set_next_error("disk full");
//!
//! // Use in a ConversionQueue...
//! ```

mod mock_dispatch;

pub use mock_dispatch::{MockDispatch, RecordedCall};
