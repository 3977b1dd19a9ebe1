pub mod classifier;
pub mod db;
pub mod reply_llm;
