pub mod generate_mcqs;
