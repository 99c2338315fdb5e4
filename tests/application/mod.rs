mod budget_test;
mod chunking_test;
mod summary_pipeline_test;
