//! Audit delivery to the external log service

pub mod http_sink;

pub use http_sink::HttpAuditSink;
