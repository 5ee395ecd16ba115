pub mod artifact_fs_repository;
pub mod completion_groq_repository;
pub mod source_file_fs_repository;
