mod add_files_from_nested_directories_to_index;
mod add_reports_stage_outcomes;
