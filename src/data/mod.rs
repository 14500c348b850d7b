mod loader;
mod results;

pub use loader::{load_questions_from_json, parse_questions, DEFAULT_QUESTIONS_PATH};
pub use results::{
    CsvResultStore, MemoryResultStore, ResultRow, ResultStore, DEFAULT_RESULTS_PATH,
    RESULT_HEADER,
};
