// Event module - lifecycle event model and stream decoding

pub mod model;
pub mod stream;

pub use model::{RunEvent, Suite, SuiteId, TestCase, TestError};
pub use stream::{EventRecord, EventStream, StreamError};
