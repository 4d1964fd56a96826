pub mod scores_file;
