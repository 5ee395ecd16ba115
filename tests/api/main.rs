mod download_file;
mod generate_mcqs;
mod health_check;
mod helpers;
