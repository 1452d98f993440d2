pub(crate) mod encode;
pub(crate) mod headers;
pub(crate) mod redact;
pub(crate) mod xml;
