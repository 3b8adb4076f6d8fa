#[path = "util/file_list.rs"]
mod file_list;
#[path = "util/file_status.rs"]
mod file_status;
