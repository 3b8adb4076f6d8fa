//! Byte sources and sinks that drive the inflate engine.
//!
//! The engine never touches caller memory directly: it pulls compressed input
//! through a [`ByteSource`] and pushes decoded output through a [`ByteSink`].

pub mod sink;
pub mod source;

pub use sink::{ByteSink, NullSink, OutputSink, WriterSink};
pub use source::{BoundedSource, ByteSource, InputCursor, ReaderSource};
