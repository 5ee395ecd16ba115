pub mod generation_request;
pub mod mcq_document;
pub mod source_document;
